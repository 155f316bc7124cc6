use std::borrow::Cow;

pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

pub fn get_non_empty_str<'a>(first: &'a str, second: &'a str) -> &'a str {
    if is_blank(first) {
        second
    } else {
        first
    }
}

/// Escapes a value for a `key="value"` attribute of an `#EXTINF` line.
pub fn escape_attribute_value(value: &str) -> Cow<'_, str> {
    if !value.contains(['"', '\\']) {
        return Cow::Borrowed(value);
    }
    let mut escaped = String::with_capacity(value.len() + 4);
    for c in value.chars() {
        if c == '"' || c == '\\' {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    Cow::Owned(escaped)
}

pub fn unescape_attribute_value(value: &str) -> Cow<'_, str> {
    if !value.contains('\\') {
        return Cow::Borrowed(value);
    }
    let mut result = String::with_capacity(value.len());
    let mut it = value.chars();
    while let Some(c) = it.next() {
        if c == '\\' {
            match it.next() {
                Some(next) if next == '"' || next == '\\' => result.push(next),
                Some(next) => {
                    result.push(c);
                    result.push(next);
                }
                None => result.push(c),
            }
        } else {
            result.push(c);
        }
    }
    Cow::Owned(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_attribute_value() {
        assert_eq!(escape_attribute_value("plain"), "plain");
        assert_eq!(escape_attribute_value(r#"say "hi""#), r#"say \"hi\""#);
        assert_eq!(escape_attribute_value(r"C:\tv"), r"C:\\tv");
    }

    #[test]
    fn test_unescape_attribute_value() {
        assert_eq!(unescape_attribute_value(r#"say \"hi\""#), r#"say "hi""#);
        assert_eq!(unescape_attribute_value(r"C:\\tv"), r"C:\tv");
        // unknown escapes are kept as they are
        assert_eq!(unescape_attribute_value(r"a\nb"), r"a\nb");
    }

    #[test]
    fn test_contains_ignore_case() {
        assert!(contains_ignore_case("CCTV-1 HD", "cctv-1"));
        assert!(!contains_ignore_case("CCTV-1 HD", "cctv-2"));
    }
}
