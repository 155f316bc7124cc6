use url::Url;

/// Stream urls should be absolute. The check is advisory, nothing refuses to save an invalid one.
pub fn is_valid_url(value: &str) -> bool {
    let value = value.trim();
    !value.is_empty() && Url::parse(value).is_ok_and(|url| url.has_host() || url.scheme() == "file")
}

#[cfg(test)]
mod tests {
    use super::is_valid_url;

    #[test]
    fn test_is_valid_url() {
        assert!(is_valid_url("http://example.com/live/1.ts"));
        assert!(is_valid_url("rtmp://10.0.0.1:1935/live"));
        assert!(is_valid_url("file:///tmp/movie.mkv"));
        assert!(!is_valid_url("/live/1.ts"));
        assert!(!is_valid_url(""));
        assert!(!is_valid_url("not a url"));
    }
}
