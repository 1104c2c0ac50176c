use url::Url;

/// Name of the page parameter reserved for a prefilled query
pub const QUERY_PARAM: &str = "q";

/// Read the `q` parameter from a page URL. Unparseable URLs yield `None`.
pub fn query_param(page_url: &str) -> Option<String> {
    let url = Url::parse(page_url).ok()?;
    url.query_pairs()
        .find(|(key, _)| key == QUERY_PARAM)
        .map(|(_, value)| value.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_param() {
        assert_eq!(
            query_param("https://example.com/?q=good%20morning"),
            Some("good morning".to_string())
        );
        assert_eq!(
            query_param("https://example.com/?lang=en&q=mi&q=sina"),
            Some("mi".to_string())
        );
        assert_eq!(query_param("https://example.com/"), None);
        assert_eq!(query_param("not a url"), None);
    }
}
