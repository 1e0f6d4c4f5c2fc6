use super::view::failure_message;
use crate::tryon::{ControllerSnapshot, Status};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct SlotUploadRequest {
    pub data_url: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StateResponse {
    pub status: Status,
    pub trigger_enabled: bool,
    pub person_ready: bool,
    pub clothing_ready: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub generated_at: Option<DateTime<Utc>>,
    pub generation: u64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl From<&ControllerSnapshot> for StateResponse {
    fn from(snapshot: &ControllerSnapshot) -> Self {
        Self {
            status: snapshot.status,
            trigger_enabled: snapshot.trigger_enabled,
            person_ready: snapshot.person_ready,
            clothing_ready: snapshot.clothing_ready,
            error: snapshot
                .failure
                .map(|kind| failure_message(kind).to_string()),
            generated_at: snapshot.generated_at,
            generation: snapshot.generation,
        }
    }
}
