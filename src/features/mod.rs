pub mod url_analyzer;

use serde::{Deserialize, Serialize};

pub use url_analyzer::UrlAnalyzer;

/// Lowest heuristic score a URL can receive
pub const MIN_SCORE: i32 = 10;
/// Highest heuristic score a URL can receive
pub const MAX_SCORE: i32 = 90;

/// Lexical properties of a single URL
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrlFeatures {
    pub length: usize,
    pub special_chars: usize,
    /// Labels beyond the registrable pair; negative for bare hosts
    pub subdomains: i32,
    pub https: bool,
    pub suspicious_keywords: usize,
}

/// Heuristic score for a URL using the default analyzer
pub fn analyze_url_features(url: &str) -> i32 {
    UrlAnalyzer::new().score(url)
}
