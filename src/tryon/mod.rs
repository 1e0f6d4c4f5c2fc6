pub mod controller;
mod orchestrator;
mod payload;
mod request;

pub use controller::{
    ControllerSnapshot, FailureKind, GeneratedImage, GenerationTicket, Status, TryOnController,
    UiEvent, UiState,
};
pub use orchestrator::TryOnOrchestrator;
pub use payload::{ImagePayload, MediaType, Slot};
pub use request::{
    GenerationRequest, GenerationResponse, Modality, RequestSegment, ResponseSegment,
    TRY_ON_INSTRUCTION,
};
