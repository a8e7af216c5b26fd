use crate::features::UrlAnalyzer;
use crate::safe_browsing::{LookupError, MatchResult, ThreatMatcher};
use crate::threat_catalog::{normalize_threat_type, severity_for, ThreatCategory};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

const API_WEIGHT: f64 = 0.7;
const FEATURE_WEIGHT: f64 = 0.3;
/// API score assumed when the lookup found nothing
const NO_MATCH_API_SCORE: f64 = 95.0;
/// Feature score multiplier when the lookup itself failed
const LOOKUP_FAILURE_FACTOR: f64 = 0.5;

pub const MIN_CONFIDENCE: f64 = 10.0;
pub const MAX_CONFIDENCE: f64 = 90.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThreatReason {
    #[serde(rename = "type")]
    pub threat_type: String,
    pub description: String,
    pub prevention: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    pub safe: bool,
    pub reasons: Vec<ThreatReason>,
    pub confidence: f64,
    pub check_id: String,
}

impl ThreatReason {
    /// Reason for a normalized threat name, enriched from the catalog
    pub fn for_threat(name: &str) -> Self {
        match ThreatCategory::from_name(name) {
            Some(category) => {
                let profile = category.profile();
                ThreatReason {
                    threat_type: name.to_string(),
                    description: profile.description.to_string(),
                    prevention: profile.prevention.iter().map(|tip| tip.to_string()).collect(),
                }
            }
            None => ThreatReason {
                threat_type: name.to_string(),
                description: "Unknown threat".to_string(),
                prevention: Vec::new(),
            },
        }
    }

    pub fn lookup_error(error: &LookupError) -> Self {
        ThreatReason {
            threat_type: "Error".to_string(),
            description: error.to_string(),
            prevention: Vec::new(),
        }
    }
}

/// Combines the external threat lookup with the local URL heuristic.
pub struct VerdictAggregator {
    matcher: Arc<dyn ThreatMatcher>,
    analyzer: UrlAnalyzer,
}

impl VerdictAggregator {
    pub fn new(matcher: Arc<dyn ThreatMatcher>) -> Self {
        Self {
            matcher,
            analyzer: UrlAnalyzer::new(),
        }
    }

    /// Evaluate one URL. Always yields a verdict; lookup failures become an
    /// unsafe, low-confidence result.
    pub async fn evaluate(&self, url: &str) -> Verdict {
        let feature_score = self.analyzer.score(url) as f64;
        let check_id = Uuid::new_v4().to_string();

        let verdict = match self.matcher.find(url).await {
            Ok(MatchResult::Matches(threat_types)) if !threat_types.is_empty() => {
                Self::matched(&threat_types, feature_score, check_id)
            }
            Ok(_) => Self::clean(feature_score, check_id),
            Err(e) => {
                log::warn!("Threat lookup failed for {url}: {e}");
                Self::lookup_failed(&e, feature_score, check_id)
            }
        };

        log::info!(
            "Check {}: {} -> {} (confidence {:.2}, {} reason(s))",
            verdict.check_id,
            url,
            if verdict.safe { "safe" } else { "unsafe" },
            verdict.confidence,
            verdict.reasons.len()
        );

        verdict
    }

    fn matched(threat_types: &[String], feature_score: f64, check_id: String) -> Verdict {
        let names: Vec<String> = threat_types
            .iter()
            .map(|t| normalize_threat_type(t))
            .collect();

        let api_score = api_score(&names);
        let confidence = clamp_confidence(blend(api_score, feature_score));

        Verdict {
            safe: false,
            reasons: names.iter().map(|name| ThreatReason::for_threat(name)).collect(),
            confidence: round2(confidence),
            check_id,
        }
    }

    fn clean(feature_score: f64, check_id: String) -> Verdict {
        Verdict {
            safe: true,
            reasons: Vec::new(),
            confidence: round2(clamp_confidence(blend(NO_MATCH_API_SCORE, feature_score))),
            check_id,
        }
    }

    fn lookup_failed(error: &LookupError, feature_score: f64, check_id: String) -> Verdict {
        Verdict {
            safe: false,
            reasons: vec![ThreatReason::lookup_error(error)],
            confidence: round2(feature_score * LOOKUP_FAILURE_FACTOR),
            check_id,
        }
    }
}

/// 100 minus the mean severity of the matched threats, as a percentage
pub fn api_score(names: &[String]) -> f64 {
    if names.is_empty() {
        return NO_MATCH_API_SCORE;
    }
    let total: f64 = names.iter().map(|name| severity_for(name)).sum();
    100.0 - total * 100.0 / names.len() as f64
}

fn blend(api_score: f64, feature_score: f64) -> f64 {
    API_WEIGHT * api_score + FEATURE_WEIGHT * feature_score
}

fn clamp_confidence(value: f64) -> f64 {
    value.clamp(MIN_CONFIDENCE, MAX_CONFIDENCE)
}

/// Two decimals, exact halves to even
fn round2(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::analyze_url_features;
    use async_trait::async_trait;
    use std::collections::HashSet;

    enum Stub {
        Matches(Vec<&'static str>),
        NoMatch,
        Timeout,
    }

    #[async_trait]
    impl ThreatMatcher for Stub {
        async fn find(&self, _url: &str) -> Result<MatchResult, LookupError> {
            match self {
                Stub::Matches(types) => Ok(MatchResult::Matches(
                    types.iter().map(|t| t.to_string()).collect(),
                )),
                Stub::NoMatch => Ok(MatchResult::NoMatch),
                Stub::Timeout => Err(LookupError::Timeout(
                    "error sending request: operation timed out".to_string(),
                )),
            }
        }
    }

    fn aggregator(stub: Stub) -> VerdictAggregator {
        VerdictAggregator::new(Arc::new(stub))
    }

    fn is_rounded(value: f64) -> bool {
        ((value * 100.0).round() / 100.0 - value).abs() < 1e-9
    }

    #[tokio::test]
    async fn test_social_engineering_match() {
        let url = "http://example.com";
        let verdict = aggregator(Stub::Matches(vec!["SOCIAL_ENGINEERING"]))
            .evaluate(url)
            .await;

        assert!(!verdict.safe);
        assert_eq!(verdict.reasons.len(), 1);
        let reason = &verdict.reasons[0];
        assert_eq!(reason.threat_type, "Social Engineering");
        let profile = ThreatCategory::SocialEngineering.profile();
        assert_eq!(reason.description, profile.description);
        assert_eq!(reason.prevention.len(), profile.prevention.len());
        assert_eq!(reason.prevention[0], profile.prevention[0]);

        // 0.7 * 75 + 0.3 * 85
        assert_eq!(analyze_url_features(url), 85);
        assert!((verdict.confidence - 78.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_multiple_and_unknown_matches() {
        let verdict = aggregator(Stub::Matches(vec!["MALWARE", "THREAT_TYPE_UNSPECIFIED"]))
            .evaluate("https://example.com")
            .await;

        assert!(!verdict.safe);
        assert_eq!(verdict.reasons[0].threat_type, "Malware");
        assert_eq!(verdict.reasons[1].threat_type, "Threat Type Unspecified");
        assert_eq!(verdict.reasons[1].description, "Unknown threat");
        assert!(verdict.reasons[1].prevention.is_empty());

        // api = 100 - (0.3 + 0.1) * 100 / 2 = 80; 0.7 * 80 + 0.3 * 90 = 83
        assert!((verdict.confidence - 83.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_match_confidence_is_clamped() {
        let verdict = aggregator(Stub::Matches(vec!["POTENTIALLY_HARMFUL_APPLICATION"]))
            .evaluate("https://example.com")
            .await;
        // 0.7 * 85 + 0.3 * 90 = 86.5, inside the range
        assert!((verdict.confidence - 86.5).abs() < 1e-9);

        let names = vec!["Potentially Harmful Application".to_string()];
        assert!((api_score(&names) - 85.0).abs() < 1e-9);
        assert_eq!(clamp_confidence(blend(100.0, 90.0)), MAX_CONFIDENCE);
        assert_eq!(clamp_confidence(blend(0.0, 10.0)), MIN_CONFIDENCE);
    }

    #[tokio::test]
    async fn test_confidence_halves_round_to_even() {
        let url = "http://login.secure-bank.com/verify";
        let verdict = aggregator(Stub::Matches(vec![
            "MALWARE",
            "MALWARE",
            "MALWARE",
            "POTENTIALLY_HARMFUL_APPLICATION",
        ]))
        .evaluate(url)
        .await;

        // api 73.75, feature 65: 0.7 * 73.75 + 0.3 * 65 = 71.125
        assert_eq!(verdict.confidence, 71.12);

        assert_eq!(round2(42.125), 42.12);
        assert_eq!(round2(42.375), 42.38);
        assert_eq!(round2(42.5), 42.5);
    }

    #[tokio::test]
    async fn test_no_match() {
        let url = "http://login.secure-bank.com/verify";
        let feature_score = analyze_url_features(url);
        assert_eq!(feature_score, 65);

        let verdict = aggregator(Stub::NoMatch).evaluate(url).await;
        assert!(verdict.safe);
        assert!(verdict.reasons.is_empty());
        // 0.7 * 95 + 0.3 * 65
        assert!((verdict.confidence - 86.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_no_match_stays_within_range() {
        // 0.7 * 95 + 0.3 * 90 would be 93.5
        let verdict = aggregator(Stub::NoMatch).evaluate("https://example.com").await;
        assert!(verdict.safe);
        assert_eq!(verdict.confidence, MAX_CONFIDENCE);
    }

    #[tokio::test]
    async fn test_lookup_timeout() {
        let url = "http://example.com";
        let verdict = aggregator(Stub::Timeout).evaluate(url).await;

        assert!(!verdict.safe);
        assert_eq!(verdict.reasons.len(), 1);
        assert_eq!(verdict.reasons[0].threat_type, "Error");
        assert!(verdict.reasons[0].description.contains("timed out"));
        assert!(verdict.reasons[0].prevention.is_empty());
        assert!((verdict.confidence - 42.5).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_confidence_range_and_rounding() {
        let urls = [
            "http://example.com",
            "https://example.com",
            "",
            "not a url",
            "http://a.b.c.d.login.account.example.com/secure/verify?x=(1)&y={2}",
            "https://www.example.org/some/long/path/that/keeps/going/and/going/and/going/until/it/is/well/past/one/hundred/characters",
        ];

        for stub in [
            Stub::Matches(vec!["MALWARE", "UNWANTED_SOFTWARE"]),
            Stub::NoMatch,
            Stub::Timeout,
        ] {
            let aggregator = aggregator(stub);
            for url in urls {
                let verdict = aggregator.evaluate(url).await;
                assert!(
                    (MIN_CONFIDENCE..=MAX_CONFIDENCE).contains(&verdict.confidence),
                    "{url}: {}",
                    verdict.confidence
                );
                assert!(is_rounded(verdict.confidence), "{}", verdict.confidence);
            }
        }
    }

    #[tokio::test]
    async fn test_check_ids_are_unique() {
        let aggregator = aggregator(Stub::NoMatch);
        let mut ids = HashSet::new();
        for _ in 0..10_000 {
            let verdict = aggregator.evaluate("https://example.com").await;
            assert!(ids.insert(verdict.check_id));
        }
        assert_eq!(ids.len(), 10_000);
    }

    #[test]
    fn test_verdict_json_shape() {
        let verdict = Verdict {
            safe: false,
            reasons: vec![ThreatReason::for_threat("Malware")],
            confidence: 78.5,
            check_id: "id".to_string(),
        };
        let value = serde_json::to_value(&verdict).unwrap();

        assert_eq!(value["safe"], false);
        assert_eq!(value["check_id"], "id");
        assert_eq!(value["confidence"], 78.5);
        assert_eq!(value["reasons"][0]["type"], "Malware");
        assert!(value["reasons"][0]["prevention"].is_array());
    }
}
