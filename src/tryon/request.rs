use super::payload::ImagePayload;

/// Instruction sent after the two images: dress the person from the first
/// image in the garment from the second, keeping face and background.
pub const TRY_ON_INSTRUCTION: &str = "첫 번째 이미지의 인물이 두 번째 이미지의 옷을 입고 있는 모습을 자연스럽게 생성해줘. 인물의 얼굴과 배경은 최대한 유지해줘.";

/// One unit of content sent to the generation service.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestSegment {
    Image(ImagePayload),
    Text(String),
}

/// Content kinds the service is allowed to answer with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modality {
    Image,
    Text,
}

impl Modality {
    pub fn as_str(&self) -> &'static str {
        match self {
            Modality::Image => "IMAGE",
            Modality::Text => "TEXT",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    segments: Vec<RequestSegment>,
    response_modalities: Vec<Modality>,
}

impl GenerationRequest {
    /// Person image, clothing image, then the fixed instruction.
    pub fn virtual_try_on(person: ImagePayload, clothing: ImagePayload) -> Self {
        Self {
            segments: vec![
                RequestSegment::Image(person),
                RequestSegment::Image(clothing),
                RequestSegment::Text(TRY_ON_INSTRUCTION.to_string()),
            ],
            response_modalities: vec![Modality::Image, Modality::Text],
        }
    }

    pub fn segments(&self) -> &[RequestSegment] {
        &self.segments
    }

    pub fn response_modalities(&self) -> &[Modality] {
        &self.response_modalities
    }
}

/// One unit of content returned by the generation service.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseSegment {
    Image(ImagePayload),
    Text(String),
    Empty,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenerationResponse {
    pub segments: Vec<ResponseSegment>,
    pub block_reason: Option<String>,
}

impl GenerationResponse {
    pub fn new(segments: Vec<ResponseSegment>) -> Self {
        Self {
            segments,
            block_reason: None,
        }
    }

    /// Takes the first image-bearing segment, ignoring anything after it.
    pub fn into_first_image(self) -> Option<ImagePayload> {
        self.segments.into_iter().find_map(|segment| match segment {
            ResponseSegment::Image(image) => Some(image),
            ResponseSegment::Text(_) | ResponseSegment::Empty => None,
        })
    }

    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|segment| match segment {
            ResponseSegment::Text(text) => Some(text.as_str()),
            ResponseSegment::Image(_) | ResponseSegment::Empty => None,
        })
    }
}
