//! Link normalization against the blog's base URL

/// Root a possibly-relative link at `base_url`.
///
/// Links that already start with `http://`, `https://` or with `base_url`
/// itself are returned unchanged. Anything else is appended to `base_url`
/// with exactly one `/` between them when neither side provides it.
///
/// Applying it twice with the same base gives the same result as applying it
/// once, so forms can re-run it on every save.
///
/// - `normalize("/about", "https://blog.example.com")` → `"https://blog.example.com/about"`
/// - `normalize("about", "https://blog.example.com/")` → `"https://blog.example.com/about"`
/// - `normalize("https://other.com/x", "https://blog.example.com")` → `"https://other.com/x"`
pub fn normalize(candidate: &str, base_url: &str) -> String {
    if is_absolute(candidate) || candidate.starts_with(base_url) {
        return candidate.to_string();
    }

    if !candidate.starts_with('/') && !base_url.ends_with('/') {
        format!("{base_url}/{candidate}")
    } else {
        format!("{base_url}{candidate}")
    }
}

/// True when the link carries an `http://` or `https://` scheme.
pub fn is_absolute(candidate: &str) -> bool {
    candidate.starts_with("http://") || candidate.starts_with("https://")
}

/// The base URL with exactly one trailing `/`, used as the default target of
/// a new navigation item.
pub fn home_url(base_url: &str) -> String {
    if base_url.ends_with('/') {
        base_url.to_string()
    } else {
        format!("{base_url}/")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://blog.example.com";

    #[test]
    fn test_leading_slash_joins_directly() {
        assert_eq!(normalize("/about", BASE), "https://blog.example.com/about");
    }

    #[test]
    fn test_missing_slash_is_inserted() {
        assert_eq!(normalize("about", BASE), "https://blog.example.com/about");
    }

    #[test]
    fn test_trailing_slash_on_base_joins_directly() {
        assert_eq!(
            normalize("about", "https://blog.example.com/"),
            "https://blog.example.com/about"
        );
    }

    #[test]
    fn test_both_slashes_are_kept() {
        // Both sides bring a slash; they are concatenated as-is.
        assert_eq!(
            normalize("/about", "https://blog.example.com/"),
            "https://blog.example.com//about"
        );
    }

    #[test]
    fn test_absolute_links_unchanged() {
        assert_eq!(normalize("https://other.com/x", BASE), "https://other.com/x");
        assert_eq!(normalize("http://other.com/x", BASE), "http://other.com/x");
    }

    #[test]
    fn test_already_rooted_unchanged() {
        assert_eq!(
            normalize("https://blog.example.com/tag/rust", BASE),
            "https://blog.example.com/tag/rust"
        );
        let base = "blog.local";
        assert_eq!(normalize("blog.local/about", base), "blog.local/about");
    }

    #[test]
    fn test_image_paths() {
        assert_eq!(
            normalize("/images/2015/05/cover.jpg", "http://127.0.0.1:8084"),
            "http://127.0.0.1:8084/images/2015/05/cover.jpg"
        );
    }

    #[test]
    fn test_empty_candidate() {
        assert_eq!(normalize("", BASE), "https://blog.example.com/");
        assert_eq!(normalize("", "https://blog.example.com/"), "https://blog.example.com/");
    }

    #[test]
    fn test_idempotent() {
        let bases = [
            "https://blog.example.com",
            "https://blog.example.com/",
            "http://localhost:8084/blog",
        ];
        let candidates = ["about", "/about", "", "tag/rust/", "/", "images/a.png"];

        for base in bases {
            for candidate in candidates {
                let once = normalize(candidate, base);
                assert_eq!(normalize(&once, base), once, "{candidate} on {base}");
            }
        }
    }

    #[test]
    fn test_home_url() {
        assert_eq!(home_url(BASE), "https://blog.example.com/");
        assert_eq!(home_url("https://blog.example.com/"), "https://blog.example.com/");
    }

    #[test]
    fn test_is_absolute() {
        assert!(is_absolute("https://x"));
        assert!(is_absolute("http://x"));
        assert!(!is_absolute("ftp://x"));
        assert!(!is_absolute("/x"));
    }
}
