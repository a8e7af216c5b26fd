pub mod config;
pub mod domain_utils;
pub mod features;
pub mod safe_browsing;
pub mod server;
pub mod threat_catalog;
pub mod verdict;

pub use config::Config;
pub use features::{analyze_url_features, UrlAnalyzer, UrlFeatures};
pub use safe_browsing::{LookupError, MatchResult, SafeBrowsingClient, ThreatMatcher};
pub use threat_catalog::ThreatCategory;
pub use verdict::{ThreatReason, Verdict, VerdictAggregator};
