use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;
use tryon_rust::{
    Error, Result,
    gemini::GenerativeClient,
    tryon::{GenerationRequest, GenerationResponse, ImagePayload, ResponseSegment},
};

/// Mock generation client for testing
#[derive(Debug, Default)]
pub struct MockGenerativeClient {
    pub responses: Arc<Mutex<Vec<GenerationResponse>>>,
    pub requests: Arc<Mutex<Vec<GenerationRequest>>>,
    pub error: Option<String>,
    /// When set, every call waits for a permit before answering.
    pub gate: Option<Arc<Notify>>,
}

impl MockGenerativeClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_responses(self, responses: Vec<GenerationResponse>) -> Self {
        *self.responses.lock().unwrap() = responses;
        self
    }

    pub fn with_image(self, data: &[u8]) -> Self {
        self.with_responses(vec![image_response(data)])
    }

    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }

    pub fn with_gate(mut self, gate: Arc<Notify>) -> Self {
        self.gate = Some(gate);
        self
    }

    pub fn add_response(&self, response: GenerationResponse) {
        self.responses.lock().unwrap().push(response);
    }

    pub fn get_requests(&self) -> Vec<GenerationRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl GenerativeClient for MockGenerativeClient {
    async fn generate_content(&self, request: &GenerationRequest) -> Result<GenerationResponse> {
        self.requests.lock().unwrap().push(request.clone());

        if let Some(gate) = &self.gate {
            gate.notified().await;
        }

        if let Some(ref error) = self.error {
            return Err(Error::Service {
                status: 500,
                message: error.clone(),
            });
        }

        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            return Err(Error::internal("No more mock responses available"));
        }

        Ok(responses.remove(0))
    }
}

/// Response holding a single image segment with `data`
pub fn image_response(data: &[u8]) -> GenerationResponse {
    GenerationResponse::new(vec![ResponseSegment::Image(ImagePayload::new(
        data.to_vec(),
        "image/png",
    ))])
}

/// Response holding only text
pub fn text_only_response(text: &str) -> GenerationResponse {
    GenerationResponse::new(vec![ResponseSegment::Text(text.to_string())])
}
