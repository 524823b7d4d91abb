//! Small text and url helpers shared by every adapter.

/// Prefix `https://` when `url` has no http(s) scheme.
#[must_use]
pub fn ensure_scheme(url: &str) -> String {
    if url.starts_with("http") {
        url.to_owned()
    } else {
        format!("https://{url}")
    }
}

/// Concatenate every run of ASCII digits in `text` and parse the result.
///
/// `"1,234 reads"` is `1234`; `"转发 12"` is `12`. Text without digits is
/// `0`. A digit string too large for `u64` saturates.
#[must_use]
pub fn extract_number(text: &str) -> u64 {
    let digits: String = text.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return 0;
    }
    digits.parse().unwrap_or(u64::MAX)
}

/// `scheme://host` part of `url`: its first three `/`-separated segments.
fn origin_of(url: &str) -> String {
    url.split('/').take(3).collect::<Vec<_>>().join("/")
}

/// Resolve a link found on a page of `base_url` to an absolute url.
///
/// - absolute (`http...`): unchanged
/// - scheme-relative (`//host/p`): `https:` prefixed
/// - root-relative (`/p`): joined to the origin of `base_url`
/// - anything else: joined to `base_url` with a `/`
#[must_use]
pub fn normalize_url(url: &str, base_url: &str) -> String {
    let url = url.trim();
    if url.is_empty() {
        return String::new();
    }
    if url.starts_with("http") {
        return url.to_owned();
    }
    if url.starts_with("//") {
        return format!("https:{url}");
    }
    if url.starts_with('/') {
        return format!("{}{url}", origin_of(base_url));
    }
    format!("{}/{url}", base_url.trim_end_matches('/'))
}

const TITLE_CHARS: usize = 30;

/// Title for posts that have none: the first 30 characters of `content`,
/// with `...` appended when it was cut.
#[must_use]
pub fn derive_title(content: &str) -> String {
    let content = content.trim();
    if content.chars().count() > TITLE_CHARS {
        let head: String = content.chars().take(TITLE_CHARS).collect();
        format!("{head}...")
    } else {
        content.to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extract_number_joins_digit_groups() {
        assert_eq!(extract_number("1,234"), 1234);
        assert_eq!(extract_number("阅读 10万+"), 10);
        assert_eq!(extract_number(" 转发 8 "), 8);
    }

    #[test]
    fn extract_number_without_digits_is_zero() {
        assert_eq!(extract_number(""), 0);
        assert_eq!(extract_number("赞"), 0);
    }

    #[test]
    fn extract_number_saturates() {
        assert_eq!(extract_number("99999999999999999999999"), u64::MAX);
    }

    #[test]
    fn normalize_url_handles_every_link_shape() {
        let base = "https://news.qq.com/omn/list";
        assert_eq!(
            normalize_url("https://a.com/x", base),
            "https://a.com/x"
        );
        assert_eq!(normalize_url("//a.com/x", base), "https://a.com/x");
        assert_eq!(normalize_url("/rain/a/1", base), "https://news.qq.com/rain/a/1");
        assert_eq!(
            normalize_url("a/1.html", "https://news.qq.com/"),
            "https://news.qq.com/a/1.html"
        );
        assert_eq!(normalize_url("  ", base), "");
    }

    #[test]
    fn ensure_scheme_only_touches_schemeless_urls() {
        assert_eq!(ensure_scheme("news.qq.com/a"), "https://news.qq.com/a");
        assert_eq!(ensure_scheme("http://x.cn"), "http://x.cn");
    }

    #[test]
    fn derive_title_truncates_on_characters() {
        let long = "新能源汽车".repeat(10);
        let title = derive_title(&long);
        assert_eq!(title.chars().count(), 33);
        assert!(title.ends_with("..."));
        assert_eq!(derive_title("short post"), "short post");
    }
}
