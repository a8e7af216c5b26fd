use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub safe_browsing: SafeBrowsingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_address: String,
    pub port: u16,
    /// Directory served as the front end; `/` maps to its index.html
    pub static_dir: String,
    /// Allowed CORS origins, or a single "*" for any
    pub cors_origins: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SafeBrowsingConfig {
    pub endpoint: String,
    pub api_key: Option<String>,
    pub client_id: String,
    pub client_version: String,
    pub timeout_ms: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            bind_address: "0.0.0.0".to_string(),
            port: 5000,
            static_dir: "static".to_string(),
            cors_origins: vec!["*".to_string()],
        }
    }
}

impl Default for SafeBrowsingConfig {
    fn default() -> Self {
        SafeBrowsingConfig {
            endpoint: "https://safebrowsing.googleapis.com/v4/threatMatches:find".to_string(),
            api_key: None,
            client_id: "browsafe-detector".to_string(),
            client_version: "1.0".to_string(),
            timeout_ms: 5000,
        }
    }
}

impl Config {
    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration file: {path}"))?;
        let config: Config = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse configuration file: {path}"))?;
        Ok(config)
    }

    pub fn to_file(&self, path: &str) -> anyhow::Result<()> {
        let content = serde_yaml::to_string(self)?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write configuration file: {path}"))?;
        Ok(())
    }

    /// Apply `PORT` and `GOOGLE_API_KEY` from the process environment
    pub fn apply_env(&mut self) -> anyhow::Result<()> {
        self.apply_overrides(
            std::env::var("PORT").ok(),
            std::env::var("GOOGLE_API_KEY").ok(),
        )
    }

    fn apply_overrides(
        &mut self,
        port: Option<String>,
        api_key: Option<String>,
    ) -> anyhow::Result<()> {
        if let Some(port) = port {
            self.server.port = port
                .trim()
                .parse()
                .with_context(|| format!("Invalid PORT value: {port}"))?;
        }
        if let Some(key) = api_key.filter(|k| !k.trim().is_empty()) {
            self.safe_browsing.api_key = Some(key);
        }
        Ok(())
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        match &self.safe_browsing.api_key {
            Some(key) if !key.trim().is_empty() => {}
            _ => bail!("No Safe Browsing API key configured (set GOOGLE_API_KEY or safe_browsing.api_key)"),
        }
        if self.safe_browsing.timeout_ms == 0 {
            bail!("safe_browsing.timeout_ms must be greater than zero");
        }
        if url::Url::parse(&self.safe_browsing.endpoint).is_err() {
            bail!(
                "Invalid Safe Browsing endpoint: {}",
                self.safe_browsing.endpoint
            );
        }
        Ok(())
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.bind_address, self.server.port)
    }
}
