use super::types::{ErrorEnvelope, GenerateContentRequest, GenerateContentResponse};
use crate::{
    Error, Result,
    config::GeminiConfig,
    tryon::{GenerationRequest, GenerationResponse},
};
use async_trait::async_trait;
use tracing::{debug, error};

/// Authenticated client for a generative image service.
#[async_trait]
pub trait GenerativeClient: Send + Sync {
    async fn generate_content(&self, request: &GenerationRequest) -> Result<GenerationResponse>;
}

pub struct GeminiClient {
    http: reqwest::Client,
    base_url: String,
    model: String,
    api_key: String,
}

impl GeminiClient {
    pub fn new(config: &GeminiConfig) -> Result<Self> {
        let api_key = config
            .api_key()
            .ok_or_else(|| Error::config("Gemini API key is not configured"))?
            .to_string();

        Ok(Self {
            http: reqwest::Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }
}

#[async_trait]
impl GenerativeClient for GeminiClient {
    async fn generate_content(&self, request: &GenerationRequest) -> Result<GenerationResponse> {
        let body = GenerateContentRequest::from(request);

        debug!(
            "Sending generateContent request to model {} with {} parts",
            self.model,
            request.segments().len()
        );

        let response = self
            .http
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorEnvelope>(&text)
                .map(|envelope| envelope.error.message)
                .unwrap_or(text);
            error!("Gemini returned {}: {}", status, message);
            return Err(Error::Service {
                status: status.as_u16(),
                message,
            });
        }

        let wire: GenerateContentResponse = serde_json::from_str(&text)
            .map_err(|e| Error::malformed(format!("generateContent body: {e}")))?;

        if let Some(reason) = wire
            .candidates
            .first()
            .and_then(|candidate| candidate.finish_reason.as_deref())
        {
            debug!("Gemini finished with reason {}", reason);
        }

        GenerationResponse::try_from(wire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn config_with_key(key: Option<&str>) -> GeminiConfig {
        GeminiConfig {
            base_url: "https://example.test/".to_string(),
            model: "gemini-test".to_string(),
            api_key: key.map(str::to_string),
        }
    }

    #[test]
    fn endpoint_includes_model_and_trims_slash() {
        let client = GeminiClient::new(&config_with_key(Some("key"))).unwrap();
        assert_eq!(
            client.endpoint(),
            "https://example.test/v1beta/models/gemini-test:generateContent"
        );
        assert_eq!(client.model(), "gemini-test");
    }

    #[test]
    fn client_requires_a_key() {
        assert!(matches!(
            GeminiClient::new(&config_with_key(None)),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            GeminiClient::new(&config_with_key(Some("  "))),
            Err(Error::Config(_))
        ));
    }
}
