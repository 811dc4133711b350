//! Page cursor extraction from the server-supplied `next` URL.

/// Returns the `page` query parameter of `next_url`.
///
/// `None` when the URL is absent or blank, carries no query string, or has no
/// parseable `page` key. Only the first `page` key is considered.
pub fn extract_next_page(next_url: Option<&str>) -> Option<u32> {
    let next_url = next_url?.trim();
    if next_url.is_empty() {
        return None;
    }

    let (_, query) = next_url.split_once('?')?;
    let query = query.split('#').next().unwrap_or_default();

    url::form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == "page")
        .and_then(|(_, value)| value.parse::<u32>().ok())
}
