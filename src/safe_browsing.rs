use crate::config::SafeBrowsingConfig;
use crate::threat_catalog::ThreatCategory;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::error::Error as StdError;
use std::time::Duration;

/// What the threat lookup said about a URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchResult {
    NoMatch,
    /// Raw threat type identifiers as returned by the service, in order
    Matches(Vec<String>),
}

#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    #[error("Threat lookup timed out: {0}")]
    Timeout(String),
    #[error("Threat lookup failed: {0}")]
    Transport(String),
    #[error("Threat lookup returned HTTP {0}")]
    Status(u16),
    #[error("Threat lookup returned an unreadable response: {0}")]
    Decode(String),
}

/// Narrow seam over the external threat-matching service.
#[async_trait]
pub trait ThreatMatcher: Send + Sync {
    async fn find(&self, url: &str) -> Result<MatchResult, LookupError>;
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FindRequest {
    pub client: ClientInfo,
    pub threat_info: ThreatInfo,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientInfo {
    pub client_id: String,
    pub client_version: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreatInfo {
    pub threat_types: Vec<&'static str>,
    pub platform_types: Vec<&'static str>,
    pub threat_entry_types: Vec<&'static str>,
    pub threat_entries: Vec<ThreatEntry>,
}

#[derive(Debug, Serialize)]
pub struct ThreatEntry {
    pub url: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct FindResponse {
    #[serde(default)]
    pub matches: Option<Vec<ThreatMatch>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreatMatch {
    pub threat_type: String,
}

impl FindRequest {
    pub fn for_url(client_id: &str, client_version: &str, url: &str) -> Self {
        Self {
            client: ClientInfo {
                client_id: client_id.to_string(),
                client_version: client_version.to_string(),
            },
            threat_info: ThreatInfo {
                threat_types: ThreatCategory::ALL
                    .iter()
                    .map(|category| category.api_identifier())
                    .collect(),
                platform_types: vec!["ANY_PLATFORM"],
                threat_entry_types: vec!["URL"],
                threat_entries: vec![ThreatEntry {
                    url: url.to_string(),
                }],
            },
        }
    }
}

impl From<FindResponse> for MatchResult {
    fn from(response: FindResponse) -> Self {
        match response.matches {
            Some(matches) if !matches.is_empty() => {
                MatchResult::Matches(matches.into_iter().map(|m| m.threat_type).collect())
            }
            _ => MatchResult::NoMatch,
        }
    }
}

/// Google Safe Browsing v4 `threatMatches:find` client
pub struct SafeBrowsingClient {
    client: Client,
    endpoint: String,
    api_key: String,
    client_id: String,
    client_version: String,
}

impl SafeBrowsingClient {
    pub fn new(config: &SafeBrowsingConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .user_agent(concat!("browsafe/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            api_key: config.api_key.clone().unwrap_or_default(),
            client_id: config.client_id.clone(),
            client_version: config.client_version.clone(),
        })
    }

    async fn lookup(&self, url: &str) -> Result<FindResponse, reqwest::Error> {
        let request = FindRequest::for_url(&self.client_id, &self.client_version, url);

        self.client
            .post(&self.endpoint)
            .query(&[("key", &self.api_key)])
            .json(&request)
            .send()
            .await?
            .error_for_status()?
            .json::<FindResponse>()
            .await
    }
}

#[async_trait]
impl ThreatMatcher for SafeBrowsingClient {
    async fn find(&self, url: &str) -> Result<MatchResult, LookupError> {
        log::debug!("Querying Safe Browsing for: {url}");

        match self.lookup(url).await {
            Ok(response) => Ok(response.into()),
            Err(e) => Err(classify_error(e)),
        }
    }
}

/// Map a reqwest failure onto [`LookupError`]. The request URL carries the
/// API key, so it is stripped before the message is kept.
fn classify_error(error: reqwest::Error) -> LookupError {
    if let Some(status) = error.status() {
        return LookupError::Status(status.as_u16());
    }

    let is_timeout = error.is_timeout();
    let is_decode = error.is_decode();
    let message = describe(&error.without_url());

    if is_timeout {
        LookupError::Timeout(message)
    } else if is_decode {
        LookupError::Decode(message)
    } else {
        LookupError::Transport(message)
    }
}

fn describe(error: &dyn StdError) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
