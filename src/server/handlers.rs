use super::{
    types::{ErrorResponse, SlotUploadRequest, StateResponse},
    view::{self, RESULT_FILENAME, RESULT_MIME_TYPE},
};
use crate::{
    Error,
    gemini::GenerativeClient,
    tryon::{GenerationTicket, ImagePayload, Slot, TryOnController, TryOnOrchestrator},
};
use axum::{
    extract::{Path, State},
    http::{StatusCode, header},
    response::{Html, IntoResponse, Json, Response},
};
use std::sync::Arc;
use tokio::{sync::Mutex, task::JoinHandle};
use tracing::{error, info, warn};

type ApiError = (StatusCode, Json<ErrorResponse>);

#[derive(Clone)]
pub struct AppState {
    pub controller: Arc<Mutex<TryOnController>>,
    pub orchestrator: TryOnOrchestrator,
}

impl AppState {
    pub fn new(client: Arc<dyn GenerativeClient>) -> Self {
        Self {
            controller: Arc::new(Mutex::new(TryOnController::new())),
            orchestrator: TryOnOrchestrator::new(client),
        }
    }
}

fn api_error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
}

fn parse_slot(slot: &str) -> Result<Slot, ApiError> {
    slot.parse()
        .map_err(|_| api_error(StatusCode::NOT_FOUND, format!("Unknown slot: {slot}")))
}

fn image_response(image: &ImagePayload, content_type: &str, disposition: String) -> Response {
    (
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
            (header::CACHE_CONTROL, "no-store".to_string()),
        ],
        image.data().clone(),
    )
        .into_response()
}

pub async fn index(State(state): State<AppState>) -> Html<String> {
    let controller = state.controller.lock().await;
    Html(view::render_page(&controller.snapshot()))
}

pub async fn get_state(State(state): State<AppState>) -> Json<StateResponse> {
    let controller = state.controller.lock().await;
    Json(StateResponse::from(&controller.snapshot()))
}

pub async fn upload_slot(
    State(state): State<AppState>,
    Path(slot): Path<String>,
    Json(request): Json<SlotUploadRequest>,
) -> Result<Json<StateResponse>, ApiError> {
    let slot = parse_slot(&slot)?;

    let payload = ImagePayload::from_data_url(&request.data_url).map_err(|e| {
        warn!("Rejected {} upload: {}", slot, e);
        api_error(StatusCode::BAD_REQUEST, e.to_string())
    })?;

    info!(
        "Received {} image ({} bytes, {})",
        slot,
        payload.len(),
        payload.mime_type()
    );

    let mut controller = state.controller.lock().await;
    controller.set_slot(slot, payload).map_err(|e| {
        error!("Failed to update {} slot: {}", slot, e);
        api_error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
    })?;

    Ok(Json(StateResponse::from(&controller.snapshot())))
}

pub async fn slot_preview(
    State(state): State<AppState>,
    Path(slot): Path<String>,
) -> Result<Response, ApiError> {
    let slot = parse_slot(&slot)?;
    let controller = state.controller.lock().await;

    let image = controller
        .slot(slot)
        .ok_or_else(|| api_error(StatusCode::NOT_FOUND, format!("No {slot} image uploaded")))?;

    Ok(image_response(image, image.mime_type(), "inline".to_string()))
}

pub async fn generate(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<StateResponse>), ApiError> {
    let mut controller = state.controller.lock().await;

    let ticket = match controller.trigger() {
        Ok(ticket) => ticket,
        Err(Error::MissingInput) => {
            let message = controller
                .snapshot()
                .failure
                .map(view::failure_message)
                .unwrap_or_default();
            return Err(api_error(StatusCode::BAD_REQUEST, message));
        }
        Err(Error::Busy) => {
            return Err(api_error(
                StatusCode::CONFLICT,
                "A generation request is already in flight",
            ));
        }
        Err(e) => {
            error!("Failed to start generation: {}", e);
            return Err(api_error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()));
        }
    };

    let snapshot = controller.snapshot();
    drop(controller);

    info!("Starting generation {}", ticket.id);
    spawn_generation(state, ticket);

    Ok((StatusCode::ACCEPTED, Json(StateResponse::from(&snapshot))))
}

/// Runs the orchestrator off the request path and feeds the outcome back into
/// the controller. The controller lock is not held during the call.
pub fn spawn_generation(state: AppState, ticket: GenerationTicket) -> JoinHandle<()> {
    tokio::spawn(async move {
        let outcome = state
            .orchestrator
            .generate(&ticket.person, &ticket.clothing)
            .await;

        let mut controller = state.controller.lock().await;
        if let Err(e) = controller.complete(ticket.id, outcome) {
            warn!("Could not apply result of generation {}: {}", ticket.id, e);
        }
    })
}

pub async fn result_image(State(state): State<AppState>) -> Result<Response, ApiError> {
    let controller = state.controller.lock().await;
    let result = controller
        .result()
        .ok_or_else(|| api_error(StatusCode::NOT_FOUND, "No generated image available"))?;

    Ok(image_response(
        &result.image,
        result.image.mime_type(),
        format!("inline; filename=\"{RESULT_FILENAME}\""),
    ))
}

pub async fn download_result(State(state): State<AppState>) -> Result<Response, ApiError> {
    let controller = state.controller.lock().await;
    let result = controller
        .result()
        .ok_or_else(|| api_error(StatusCode::NOT_FOUND, "No generated image available"))?;

    // Saved under a .png name, so always labelled as PNG
    Ok(image_response(
        &result.image,
        RESULT_MIME_TYPE,
        format!("attachment; filename=\"{RESULT_FILENAME}\""),
    ))
}
