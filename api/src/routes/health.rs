use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::{Json, Router, routing::get};

use crate::HealthResponse;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}

/// Liveness probe against the history store. "Degraded" does not mean the
/// decision endpoints stop answering — reads fail open — it means cooldowns,
/// quotas, and rotation state are no longer being consulted, so decisions
/// are running on their defaults until the store comes back.
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "History store reachable", body = HealthResponse),
        (status = 503, description = "History store unreachable; decisions running on fail-open defaults", body = HealthResponse)
    ),
    tag = "system"
)]
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let store_ok = sqlx::query_scalar::<_, i32>("SELECT 1")
        .fetch_one(&state.db)
        .await
        .is_ok();

    let (http_status, status) = status_for(store_ok);
    (
        http_status,
        Json(HealthResponse {
            status: status.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }),
    )
}

fn status_for(store_ok: bool) -> (StatusCode, &'static str) {
    if store_ok {
        (StatusCode::OK, "ok")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "degraded")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unreachable_store_reports_degraded_not_down() {
        assert_eq!(status_for(true), (StatusCode::OK, "ok"));
        assert_eq!(
            status_for(false),
            (StatusCode::SERVICE_UNAVAILABLE, "degraded")
        );
    }
}
