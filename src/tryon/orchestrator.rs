use super::{payload::ImagePayload, request::GenerationRequest};
use crate::{Error, Result, gemini::GenerativeClient};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Issues the single generation call for a person/clothing pair and pulls the
/// resulting image out of the response.
///
/// Each call is one best-effort attempt: no retry, no backoff, no timeout.
#[derive(Clone)]
pub struct TryOnOrchestrator {
    client: Arc<dyn GenerativeClient>,
}

impl TryOnOrchestrator {
    pub fn new(client: Arc<dyn GenerativeClient>) -> Self {
        Self { client }
    }

    pub async fn generate(
        &self,
        person: &ImagePayload,
        clothing: &ImagePayload,
    ) -> Result<ImagePayload> {
        info!(
            "Requesting try-on image (person: {} bytes {}, clothing: {} bytes {})",
            person.len(),
            person.mime_type(),
            clothing.len(),
            clothing.mime_type()
        );

        let request = GenerationRequest::virtual_try_on(person.clone(), clothing.clone());
        let response = self.client.generate_content(&request).await?;

        for text in response.texts() {
            debug!("Service returned text alongside the image: {}", text);
        }

        let block_reason = response.block_reason.clone();
        match response.into_first_image() {
            Some(image) => {
                info!(
                    "Received generated image ({} bytes, {})",
                    image.len(),
                    image.mime_type()
                );
                Ok(image)
            }
            None => {
                warn!(
                    "Generation produced no image (block reason: {})",
                    block_reason.as_deref().unwrap_or("none")
                );
                Err(Error::NoImageGenerated)
            }
        }
    }
}
