//! Gemini language-model oracle
//!
//! Calls the `generateContent` REST endpoint with a single user turn and hands
//! the raw response body back to the caller. The generated text normally sits
//! at `candidates[0].content.parts[0].text`.
use crate::{error::OracleError, services::providers::LanguageOracle};
use reqwest::Client as HttpClient;
use serde_json::{json, Value};
use std::time::Duration;

const API_KEY_HEADER: &str = "x-goog-api-key";

#[derive(Clone)]
pub struct GeminiOracle {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
    model: String,
}

impl GeminiOracle {
    /// Creates a new Gemini oracle
    pub fn new(
        api_key: String,
        api_url: String,
        model: String,
        timeout: Duration,
    ) -> Result<Self, OracleError> {
        let http_client = HttpClient::builder().timeout(timeout).build()?;

        tracing::info!(model = %model, "Gemini oracle configured");

        Ok(Self {
            http_client,
            api_key,
            api_url,
            model,
        })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.api_url.trim_end_matches('/'),
            self.model
        )
    }

    /// The API key goes in a header, never in the URL
    fn build_request(&self, prompt: &str) -> Result<reqwest::Request, OracleError> {
        let request = self
            .http_client
            .post(self.endpoint())
            .header(API_KEY_HEADER, &self.api_key)
            .json(&Self::request_body(prompt))
            .build()?;
        Ok(request)
    }

    fn request_body(prompt: &str) -> Value {
        json!({
            "contents": [
                {"role": "user", "parts": [{"text": prompt}]}
            ]
        })
    }
}

#[async_trait::async_trait]
impl LanguageOracle for GeminiOracle {
    async fn generate(&self, prompt: &str) -> Result<Value, OracleError> {
        let request = self.build_request(prompt)?;
        let response = self.http_client.execute(request).await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(OracleError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body: Value = response.json().await?;

        tracing::debug!(
            model = %self.model,
            provider = self.name(),
            "Gemini call completed"
        );

        Ok(body)
    }

    fn name(&self) -> &'static str {
        "gemini"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_oracle() -> GeminiOracle {
        GeminiOracle::new(
            "test_key".to_string(),
            "http://test.local/".to_string(),
            "gemini-2.0-flash".to_string(),
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[test]
    fn test_endpoint() {
        let oracle = create_test_oracle();
        assert_eq!(
            oracle.endpoint(),
            "http://test.local/v1beta/models/gemini-2.0-flash:generateContent"
        );
    }

    #[test]
    fn test_request_body_single_user_turn() {
        let body = GeminiOracle::request_body("What movies has bob watched?");
        assert_eq!(body["contents"][0]["role"], "user");
        assert_eq!(
            body["contents"][0]["parts"][0]["text"],
            "What movies has bob watched?"
        );
    }

    #[test]
    fn test_api_key_sent_as_header() {
        let oracle = create_test_oracle();
        let request = oracle.build_request("hello").unwrap();

        assert_eq!(request.url().query(), None);
        assert!(!request.url().as_str().contains("test_key"));
        assert_eq!(request.headers()[API_KEY_HEADER], "test_key");
    }

    #[tokio::test]
    async fn test_unreachable_host_is_an_oracle_error() {
        let oracle = GeminiOracle::new(
            "test_key".to_string(),
            "http://127.0.0.1:9".to_string(),
            "gemini-2.0-flash".to_string(),
            Duration::from_millis(200),
        )
        .unwrap();

        let err = oracle.generate("hello").await.unwrap_err();
        assert!(matches!(err, OracleError::Http(_)));
        assert!(!err.to_string().contains("test_key"));
    }
}
