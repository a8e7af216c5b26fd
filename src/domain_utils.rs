use url::Url;

/// Scheme, network location and path of a URL string
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UrlParts {
    pub scheme: String,
    pub domain: String,
    pub path: String,
}

/// Minimal URL component utilities
pub struct DomainUtils;

impl DomainUtils {
    /// Split a URL into its components. Never fails: anything that cannot be
    /// recognised is left empty.
    ///
    /// `domain` is the raw network location between `//` and the first
    /// `/`, `?` or `#`. Userinfo and port stay in, nothing is decoded or
    /// case-folded.
    pub fn split_url(url: &str) -> UrlParts {
        let mut parts = UrlParts::default();
        let url = url.trim_start_matches(|c: char| c <= ' ');
        let mut rest = url;

        if let Some((scheme, tail)) = url.split_once(':') {
            if Self::is_scheme(scheme) {
                parts.scheme = Url::parse(url)
                    .map(|parsed| parsed.scheme().to_string())
                    .unwrap_or_else(|_| scheme.to_lowercase());
                rest = tail;
            }
        }

        if let Some(after) = rest.strip_prefix("//") {
            let end = after.find(['/', '?', '#']).unwrap_or(after.len());
            parts.domain = after[..end].to_string();
            rest = &after[end..];
        }

        let path_end = rest.find(['?', '#']).unwrap_or(rest.len());
        parts.path = rest[..path_end].to_string();

        parts
    }

    fn is_scheme(candidate: &str) -> bool {
        let mut chars = candidate.chars();
        match chars.next() {
            Some(first) if first.is_ascii_alphabetic() => {
                chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
            }
            _ => false,
        }
    }

    /// Number of dot-separated labels. An empty domain still has one (empty) label.
    pub fn label_count(domain: &str) -> usize {
        domain.split('.').count()
    }
}
