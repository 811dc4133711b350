pub mod domain;
pub mod error;
pub mod paging;
pub mod protocol;
