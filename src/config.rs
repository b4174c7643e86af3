use serde::Deserialize;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Gemini API key. When absent the intent parser runs rule-based only.
    #[serde(default)]
    pub gemini_api_key: Option<String>,

    /// Gemini model used for question parsing
    #[serde(default = "default_gemini_model")]
    pub gemini_model: String,

    /// Gemini REST API base URL
    #[serde(default = "default_gemini_api_url")]
    pub gemini_api_url: String,

    /// Timeout for a single oracle call, in seconds
    #[serde(default = "default_oracle_timeout_secs")]
    pub oracle_timeout_secs: u64,

    /// Knowledge base file loaded into the atom space at startup
    #[serde(default = "default_metta_file_path")]
    pub metta_file_path: String,

    /// Subject assumed for questions that do not name one
    #[serde(default = "default_subject")]
    pub default_subject: String,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_gemini_model() -> String {
    "gemini-2.0-flash".to_string()
}

fn default_gemini_api_url() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_oracle_timeout_secs() -> u64 {
    30
}

fn default_metta_file_path() -> String {
    "recommendation.metta".to_string()
}

fn default_subject() -> String {
    "alice".to_string()
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_iter(std::env::vars())
    }

    /// Load configuration from an explicit set of variables
    pub fn from_iter<I>(vars: I) -> anyhow::Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut config = envy::from_iter::<_, Config>(vars)
            .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

        // An empty key in .env means "not configured"
        if config
            .gemini_api_key
            .as_deref()
            .is_some_and(|key| key.trim().is_empty())
        {
            config.gemini_api_key = None;
        }

        Ok(config)
    }

    /// Socket address the server binds to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_iter(vars(&[])).unwrap();
        assert!(config.gemini_api_key.is_none());
        assert_eq!(config.gemini_model, "gemini-2.0-flash");
        assert_eq!(config.metta_file_path, "recommendation.metta");
        assert_eq!(config.default_subject, "alice");
        assert_eq!(config.oracle_timeout_secs, 30);
        assert_eq!(config.bind_address(), "0.0.0.0:5000");
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_iter(vars(&[
            ("GEMINI_API_KEY", "secret"),
            ("METTA_FILE_PATH", "data/kb.metta"),
            ("PORT", "8080"),
        ]))
        .unwrap();
        assert_eq!(config.gemini_api_key.as_deref(), Some("secret"));
        assert_eq!(config.metta_file_path, "data/kb.metta");
        assert_eq!(config.port, 8080);
    }

    #[test]
    fn test_blank_api_key_is_unset() {
        let config = Config::from_iter(vars(&[("GEMINI_API_KEY", "  ")])).unwrap();
        assert!(config.gemini_api_key.is_none());
    }

    #[test]
    fn test_invalid_port_fails() {
        assert!(Config::from_iter(vars(&[("PORT", "not-a-port")])).is_err());
    }
}
