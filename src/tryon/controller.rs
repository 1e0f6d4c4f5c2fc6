use super::payload::{ImagePayload, Slot};
use crate::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

/// Why the last attempt ended in the error state. Display text is chosen by
/// the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    MissingInput,
    GenerationFailed,
    EmptyResult,
}

impl From<&Error> for FailureKind {
    fn from(error: &Error) -> Self {
        match error {
            Error::MissingInput => FailureKind::MissingInput,
            Error::NoImageGenerated => FailureKind::EmptyResult,
            _ => FailureKind::GenerationFailed,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedImage {
    pub image: ImagePayload,
    pub generated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum UiState {
    Idle,
    Loading,
    Success(GeneratedImage),
    Error(FailureKind),
}

impl UiState {
    pub fn status(&self) -> Status {
        match self {
            UiState::Idle => Status::Idle,
            UiState::Loading => Status::Loading,
            UiState::Success(_) => Status::Success,
            UiState::Error(_) => Status::Error,
        }
    }
}

/// Payload-free view of [`UiState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Idle,
    Loading,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    SlotUpdated,
    Trigger,
    TriggerRejected(FailureKind),
    Resolved(GeneratedImage),
    Rejected(FailureKind),
    /// Completion of a request whose inputs changed while it was in flight.
    Discarded,
}

impl UiEvent {
    fn name(&self) -> &'static str {
        match self {
            UiEvent::SlotUpdated => "SlotUpdated",
            UiEvent::Trigger => "Trigger",
            UiEvent::TriggerRejected(_) => "TriggerRejected",
            UiEvent::Resolved(_) => "Resolved",
            UiEvent::Rejected(_) => "Rejected",
            UiEvent::Discarded => "Discarded",
        }
    }
}

/// Inputs handed out by a successful trigger, tagged with the generation id
/// that [`TryOnController::complete`] expects back.
#[derive(Debug, Clone)]
pub struct GenerationTicket {
    pub id: u64,
    pub person: ImagePayload,
    pub clothing: ImagePayload,
}

#[derive(Debug, Clone, Copy)]
struct InFlight {
    id: u64,
    stale: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ControllerSnapshot {
    pub status: Status,
    pub trigger_enabled: bool,
    pub person_ready: bool,
    pub clothing_ready: bool,
    pub failure: Option<FailureKind>,
    pub generated_at: Option<DateTime<Utc>>,
    pub generation: u64,
}

/// The two image slots and the idle/loading/success/error machine they feed.
#[derive(Debug)]
pub struct TryOnController {
    person: Option<ImagePayload>,
    clothing: Option<ImagePayload>,
    state: UiState,
    last_generation: u64,
    in_flight: Option<InFlight>,
}

impl Default for TryOnController {
    fn default() -> Self {
        Self::new()
    }
}

impl TryOnController {
    pub fn new() -> Self {
        Self {
            person: None,
            clothing: None,
            state: UiState::Idle,
            last_generation: 0,
            in_flight: None,
        }
    }

    pub fn state(&self) -> &UiState {
        &self.state
    }

    pub fn slot(&self, slot: Slot) -> Option<&ImagePayload> {
        match slot {
            Slot::Person => self.person.as_ref(),
            Slot::Clothing => self.clothing.as_ref(),
        }
    }

    pub fn result(&self) -> Option<&GeneratedImage> {
        match &self.state {
            UiState::Success(result) => Some(result),
            _ => None,
        }
    }

    pub fn trigger_enabled(&self) -> bool {
        self.person.is_some() && self.clothing.is_some() && self.state != UiState::Loading
    }

    pub fn snapshot(&self) -> ControllerSnapshot {
        ControllerSnapshot {
            status: self.state.status(),
            trigger_enabled: self.trigger_enabled(),
            person_ready: self.person.is_some(),
            clothing_ready: self.clothing.is_some(),
            failure: match self.state {
                UiState::Error(kind) => Some(kind),
                _ => None,
            },
            generated_at: self.result().map(|result| result.generated_at),
            generation: self.last_generation,
        }
    }

    /// Replaces an image slot. Never cancels a request in flight; its result
    /// is discarded when it arrives.
    pub fn set_slot(&mut self, slot: Slot, payload: ImagePayload) -> Result<()> {
        debug!("Updating {} slot ({} bytes)", slot, payload.len());

        match slot {
            Slot::Person => self.person = Some(payload),
            Slot::Clothing => self.clothing = Some(payload),
        }

        if let Some(in_flight) = self.in_flight.as_mut() {
            if !in_flight.stale {
                info!(
                    "Generation {} superseded by {} slot update",
                    in_flight.id, slot
                );
            }
            in_flight.stale = true;
        }

        self.transition(UiEvent::SlotUpdated)
    }

    /// Starts a generation. Rejected while loading; with a slot empty the
    /// machine enters the error state and no ticket is issued.
    pub fn trigger(&mut self) -> Result<GenerationTicket> {
        if self.state == UiState::Loading {
            warn!("Trigger ignored, generation {} still in flight", self.last_generation);
            return Err(Error::Busy);
        }

        let (Some(person), Some(clothing)) = (self.person.clone(), self.clothing.clone()) else {
            self.transition(UiEvent::TriggerRejected(FailureKind::MissingInput))?;
            return Err(Error::MissingInput);
        };

        self.transition(UiEvent::Trigger)?;
        self.last_generation += 1;
        self.in_flight = Some(InFlight {
            id: self.last_generation,
            stale: false,
        });

        Ok(GenerationTicket {
            id: self.last_generation,
            person,
            clothing,
        })
    }

    /// Applies the orchestrator outcome for ticket `id`.
    pub fn complete(&mut self, id: u64, outcome: Result<ImagePayload>) -> Result<()> {
        let in_flight = match self.in_flight {
            Some(in_flight) if in_flight.id == id => in_flight,
            _ => {
                warn!("Completion for unknown generation {} ignored", id);
                return Err(Error::InvalidTransition {
                    current: format!("{:?}", self.state.status()),
                    requested: format!("complete({id})"),
                });
            }
        };
        self.in_flight = None;

        if in_flight.stale {
            info!("Discarding result of stale generation {}", id);
            return self.transition(UiEvent::Discarded);
        }

        let event = match outcome {
            Ok(image) => UiEvent::Resolved(GeneratedImage {
                image,
                generated_at: Utc::now(),
            }),
            Err(e) => {
                error!("Generation {} failed: {}", id, e);
                UiEvent::Rejected(FailureKind::from(&e))
            }
        };

        self.transition(event)
    }

    fn transition(&mut self, event: UiEvent) -> Result<()> {
        let old_status = self.state.status();
        let event_name = event.name();

        let new_state = match (&self.state, event) {
            (UiState::Loading, UiEvent::SlotUpdated) => UiState::Loading,
            (_, UiEvent::SlotUpdated) => UiState::Idle,
            (UiState::Loading, UiEvent::Trigger | UiEvent::TriggerRejected(_)) => {
                return Err(self.invalid(event_name));
            }
            (_, UiEvent::Trigger) => UiState::Loading,
            (_, UiEvent::TriggerRejected(kind)) => UiState::Error(kind),
            (UiState::Loading, UiEvent::Resolved(result)) => UiState::Success(result),
            (UiState::Loading, UiEvent::Rejected(kind)) => UiState::Error(kind),
            (UiState::Loading, UiEvent::Discarded) => UiState::Idle,
            (_, UiEvent::Resolved(_) | UiEvent::Rejected(_) | UiEvent::Discarded) => {
                return Err(self.invalid(event_name));
            }
        };

        if old_status != new_state.status() {
            info!(
                "UI state transition: {:?} -> {:?} (event: {})",
                old_status,
                new_state.status(),
                event_name
            );
        } else {
            debug!("UI staying in state {:?} after event {}", old_status, event_name);
        }

        self.state = new_state;
        Ok(())
    }

    fn invalid(&self, event_name: &str) -> Error {
        warn!(
            "Invalid UI transition from {:?} with event {}",
            self.state.status(),
            event_name
        );
        Error::InvalidTransition {
            current: format!("{:?}", self.state.status()),
            requested: event_name.to_string(),
        }
    }
}
