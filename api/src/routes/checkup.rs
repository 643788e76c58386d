use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use serde_json::json;
use uuid::Uuid;

use relance_core::checkup::{
    CheckupOutcome, CheckupResolution, PendingResolutionSignal, ResolveCheckupRequest,
    ResolveCheckupResponse, SignalStatus,
};

use crate::error::AppError;
use crate::extract::AppJson;
use crate::state::AppState;
use crate::trace;

mod resolver;

pub fn router() -> Router<AppState> {
    Router::new().route("/v1/checkup/resolve", post(resolve_checkup))
}

/// Resolve a user's free-text reply to a pending checkup invitation.
///
/// Hybrid classifier: a high-confidence structured signal from the upstream
/// dispatcher wins, the legacy dispatcher boolean comes next, and a
/// deterministic French phrase match on the normalized text is the fallback.
/// A null resolution means "still unclear" — the prompt stays pending and
/// nothing is rejected.
#[utoipa::path(
    post,
    path = "/v1/checkup/resolve",
    request_body = ResolveCheckupRequest,
    responses(
        (status = 200, description = "Resolution computed (null when still unclear)", body = ResolveCheckupResponse),
        (status = 400, description = "Malformed request body", body = relance_core::error::ApiError)
    ),
    tag = "checkup"
)]
pub async fn resolve_checkup(
    State(state): State<AppState>,
    AppJson(req): AppJson<ResolveCheckupRequest>,
) -> Result<Json<ResolveCheckupResponse>, AppError> {
    let request_id = Uuid::now_v7().to_string();
    if let Some(run_id) = req.eval_run_id.as_deref() {
        trace::remember_eval_run(&request_id, run_id);
    }

    let resolution = resolver::resolve_reply(&req);

    trace::log_event(
        &state.db,
        req.eval_run_id.as_deref(),
        &request_id,
        "checkup_resolver",
        "checkup.resolution",
        "info",
        json!({
            "resolution": resolution,
            "had_signal": req.pending_resolution_signal.is_some(),
            "had_dispatcher_boolean": req.wants_checkup_from_dispatcher.is_some(),
        }),
    )
    .await;

    Ok(Json(ResolveCheckupResponse { resolution }))
}
