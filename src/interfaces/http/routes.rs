use crate::application::coordinator::{MeetingCoordinator, Settlement};
use crate::config::Config;
use crate::error::MeetingError;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tracing::info;

pub const SUPPORT_MESSAGE: &str =
    "Your payment was received but the booking could not be confirmed. Please contact support.";

#[derive(Clone)]
pub struct AppState {
    pub coordinator: Arc<MeetingCoordinator>,
    pub config: Arc<Config>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/scheduling/thank-you", get(scheduling_thank_you))
        .route("/payments/success", get(payment_success))
        .route("/payments/cancel", get(payment_cancel))
        .with_state(state)
}

#[derive(Debug, Deserialize)]
pub struct ThankYouParams {
    #[serde(default)]
    event_id: String,
    #[serde(default)]
    page_slug: String,
    #[serde(default)]
    edit_hash: String,
}

#[derive(Debug, Deserialize)]
pub struct PaymentParams {
    #[serde(default, rename = "eventId")]
    event_id: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CheckoutResponse {
    pub event_id: String,
    pub success_url: String,
    pub cancel_url: String,
}

#[derive(Debug, Serialize)]
struct SettlementResponse {
    status: Settlement,
}

struct ApiError(MeetingError);

impl From<MeetingError> for ApiError {
    fn from(err: MeetingError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            MeetingError::DuplicateKey { .. } => (StatusCode::CONFLICT, self.0.to_string()),
            err if err.is_remote() => (StatusCode::BAD_GATEWAY, SUPPORT_MESSAGE.to_string()),
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal error".to_string(),
            ),
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

fn bad_request(missing: &str) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({ "error": format!("missing query parameter: {missing}") })),
    )
        .into_response()
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

/// Redirect target after a booking on the scheduler; records the meeting and
/// hands the checkout page what it needs to start the payment.
async fn scheduling_thank_you(
    State(state): State<AppState>,
    Query(params): Query<ThankYouParams>,
) -> Response {
    for (name, value) in [
        ("event_id", &params.event_id),
        ("page_slug", &params.page_slug),
        ("edit_hash", &params.edit_hash),
    ] {
        if value.is_empty() {
            return bad_request(name);
        }
    }

    if let Err(e) = state
        .coordinator
        .record_pending_meeting(&params.event_id, &params.page_slug, &params.edit_hash)
        .await
    {
        return ApiError::from(e).into_response();
    }

    Json(CheckoutResponse {
        success_url: state.config.success_url(&params.event_id),
        cancel_url: state.config.cancel_url(&params.event_id),
        event_id: params.event_id,
    })
    .into_response()
}

async fn payment_success(
    State(state): State<AppState>,
    Query(params): Query<PaymentParams>,
) -> Response {
    if params.event_id.is_empty() {
        return bad_request("eventId");
    }
    info!(event_id = %params.event_id, "payment success");

    match state
        .coordinator
        .accept_pending_meeting(&params.event_id)
        .await
    {
        Ok(status) => Json(SettlementResponse { status }).into_response(),
        Err(e) => ApiError::from(e).into_response(),
    }
}

async fn payment_cancel(
    State(state): State<AppState>,
    Query(params): Query<PaymentParams>,
) -> Response {
    if params.event_id.is_empty() {
        return bad_request("eventId");
    }
    info!(event_id = %params.event_id, "payment cancelled");

    match state
        .coordinator
        .reject_pending_meeting(&params.event_id)
        .await
    {
        Ok(status) => Json(SettlementResponse { status }).into_response(),
        Err(e) => ApiError::from(e).into_response(),
    }
}
