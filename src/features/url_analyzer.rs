use super::{UrlFeatures, MAX_SCORE, MIN_SCORE};
use crate::domain_utils::DomainUtils;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref SPECIAL_CHARS: Regex = Regex::new(r#"[!@#$%^&*(),.?":{}|<>]"#).unwrap();
}

const SUSPICIOUS_KEYWORDS: [&str; 4] = ["login", "secure", "account", "verify"];

/// Scores a URL from its text alone; no network access.
pub struct UrlAnalyzer {
    keywords: Vec<String>,
}

impl Default for UrlAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl UrlAnalyzer {
    pub fn new() -> Self {
        Self {
            keywords: SUSPICIOUS_KEYWORDS.iter().map(|k| k.to_string()).collect(),
        }
    }

    pub fn extract(&self, url: &str) -> UrlFeatures {
        let parts = DomainUtils::split_url(url);
        let url_lower = url.to_lowercase();

        UrlFeatures {
            length: url.chars().count(),
            special_chars: SPECIAL_CHARS.find_iter(url).count(),
            subdomains: DomainUtils::label_count(&parts.domain) as i32 - 2,
            https: parts.scheme == "https",
            suspicious_keywords: self
                .keywords
                .iter()
                .filter(|kw| url_lower.contains(kw.as_str()))
                .count(),
        }
    }

    /// Heuristic score in `[MIN_SCORE, MAX_SCORE]`; higher means safer
    pub fn score(&self, url: &str) -> i32 {
        let features = self.extract(url);
        let score = Self::score_features(&features);
        log::debug!("URL features for {url}: {features:?} -> {score}");
        score
    }

    pub fn score_features(features: &UrlFeatures) -> i32 {
        let mut score = 100;

        if features.length > 100 {
            score -= 20;
        }
        if features.special_chars > 5 {
            score -= 15;
        }
        if features.subdomains > 2 {
            score -= 10;
        }
        if !features.https {
            score -= 15;
        }
        if features.suspicious_keywords > 1 {
            score -= 20;
        }

        score.clamp(MIN_SCORE, MAX_SCORE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::analyze_url_features;

    fn padded(prefix: &str, len: usize) -> String {
        let mut url = prefix.to_string();
        while url.chars().count() < len {
            url.push('a');
        }
        url
    }

    #[test]
    fn test_plain_http_url() {
        let analyzer = UrlAnalyzer::new();
        let features = analyzer.extract("http://example.com");

        assert_eq!(features.length, 18);
        assert_eq!(features.special_chars, 2);
        assert_eq!(features.subdomains, 0);
        assert!(!features.https);
        assert_eq!(features.suspicious_keywords, 0);
        assert_eq!(analyzer.score("http://example.com"), 85);
    }

    #[test]
    fn test_long_https_url_with_keywords() {
        let analyzer = UrlAnalyzer::new();
        let url = padded("https://example.com/login/secure/verify?", 150);
        let features = analyzer.extract(&url);

        assert_eq!(features.length, 150);
        assert_eq!(features.suspicious_keywords, 3);
        assert!(features.https);
        assert!(features.special_chars <= 5);
        assert_eq!(analyzer.score(&url), 60);
    }

    #[test]
    fn test_clean_https_url_is_capped() {
        assert_eq!(analyze_url_features("https://example.com"), MAX_SCORE);
    }

    #[test]
    fn test_every_deduction() {
        let url = padded(
            "http://a.b.c.login.example.com/secure?x=1&y=2&z=(3)&",
            120,
        );
        let features = UrlAnalyzer::new().extract(&url);
        assert_eq!(features.subdomains, 4);
        assert!(features.special_chars > 5);
        // 100 - 20 - 15 - 10 - 15 - 20
        assert_eq!(UrlAnalyzer::score_features(&features), 20);
    }

    #[test]
    fn test_keywords_counted_once_and_case_insensitive() {
        let features = UrlAnalyzer::new().extract("https://x.com/LOGIN/login/Login");
        assert_eq!(features.suspicious_keywords, 1);
    }

    #[test]
    fn test_subdomains_not_floored() {
        let analyzer = UrlAnalyzer::new();
        assert_eq!(analyzer.extract("https://localhost/").subdomains, -1);
        assert_eq!(analyzer.extract("not a url").subdomains, -1);
        assert_eq!(analyzer.extract("http://10.0.0.1/").subdomains, 2);
    }

    #[test]
    fn test_subdomains_counted_on_raw_network_location() {
        let analyzer = UrlAnalyzer::new();

        // Userinfo dressed up as a trusted host still counts
        let url = "http://paypal.com.secure.login@evil.com";
        let features = analyzer.extract(url);
        assert_eq!(features.subdomains, 3);
        assert_eq!(features.special_chars, 6);
        // 100 - 15 - 10 - 15 - 20
        assert_eq!(analyzer.score(url), 40);

        // Percent-escaped dots are not label separators
        let features = analyzer.extract("http://a%2Eb%2Ec%2Ed%2Eexample.com/");
        assert_eq!(features.subdomains, 0);
    }

    #[test]
    fn test_malformed_input_never_fails() {
        let analyzer = UrlAnalyzer::new();
        for url in [
            "",
            "::::",
            "http://",
            "https://bad host/login?account=1",
            "%%%@@@###",
            "javascript:alert(1)",
            "ftp://[::1]:21/file",
        ] {
            let score = analyzer.score(url);
            assert!((MIN_SCORE..=MAX_SCORE).contains(&score), "{url} -> {score}");
        }
    }

    #[test]
    fn test_score_is_deterministic() {
        let analyzer = UrlAnalyzer::new();
        let url = "http://secure-login.account.example.co.uk/verify";
        assert_eq!(analyzer.score(url), analyzer.score(url));
        assert_eq!(analyzer.extract(url), analyzer.extract(url));
    }
}
