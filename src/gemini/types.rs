//! Wire types for the Gemini `generateContent` endpoint.

use crate::{
    Error, Result,
    tryon::{GenerationRequest, GenerationResponse, ImagePayload, RequestSegment, ResponseSegment},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    pub generation_config: GenerationConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub response_modalities: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inline_data: Option<InlineData>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    pub mime_type: String,
    pub data: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    #[serde(default)]
    pub prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<Content>,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    #[serde(default)]
    pub block_reason: Option<String>,
}

/// Error envelope returned with non-2xx statuses.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorEnvelope {
    pub error: ErrorBody,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub code: Option<u16>,
    pub message: String,
    #[serde(default)]
    pub status: Option<String>,
}

impl From<&GenerationRequest> for GenerateContentRequest {
    fn from(request: &GenerationRequest) -> Self {
        let parts = request
            .segments()
            .iter()
            .map(|segment| match segment {
                RequestSegment::Image(image) => Part {
                    text: None,
                    inline_data: Some(InlineData {
                        mime_type: image.mime_type().to_string(),
                        data: image.to_base64(),
                    }),
                },
                RequestSegment::Text(text) => Part {
                    text: Some(text.clone()),
                    inline_data: None,
                },
            })
            .collect();

        Self {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts,
            }],
            generation_config: GenerationConfig {
                response_modalities: request
                    .response_modalities()
                    .iter()
                    .map(|modality| modality.as_str().to_string())
                    .collect(),
            },
        }
    }
}

impl TryFrom<Part> for ResponseSegment {
    type Error = Error;

    fn try_from(part: Part) -> Result<Self> {
        match (part.inline_data, part.text) {
            (Some(inline), _) if !inline.data.is_empty() => {
                let image = ImagePayload::from_base64(&inline.data, inline.mime_type)
                    .map_err(|e| Error::malformed(format!("inline image data: {e}")))?;
                Ok(ResponseSegment::Image(image))
            }
            (_, Some(text)) => Ok(ResponseSegment::Text(text)),
            _ => Ok(ResponseSegment::Empty),
        }
    }
}

impl TryFrom<GenerateContentResponse> for GenerationResponse {
    type Error = Error;

    /// Only the first candidate is considered, and parts after its first
    /// image are never decoded.
    fn try_from(response: GenerateContentResponse) -> Result<Self> {
        let parts = response
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .map(|content| content.parts)
            .unwrap_or_default();

        let mut segments = Vec::with_capacity(parts.len());
        for part in parts {
            let segment = ResponseSegment::try_from(part)?;
            let is_image = matches!(segment, ResponseSegment::Image(_));
            segments.push(segment);
            if is_image {
                break;
            }
        }

        Ok(GenerationResponse {
            segments,
            block_reason: response
                .prompt_feedback
                .and_then(|feedback| feedback.block_reason),
        })
    }
}
