use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

use relance_core::outreach::{
    Category, DecideOutreachRequest, DecideOutreachResponse, SkipReason, WindowState,
};

use crate::error::AppError;
use crate::extract::AppJson;
use crate::state::AppState;
use crate::{history, trace};

mod cascade;
mod catalog;
mod rotation;

use cascade::CascadeSnapshot;

pub fn router() -> Router<AppState> {
    Router::new().route("/v1/outreach/decide", post(decide_outreach))
}

/// Evaluate the proactive outreach cascade for one user.
///
/// Pure decision over the read-only message history: at most one template
/// per user per day, selected by category precedence (onboarding > bilan >
/// a8 > socle > a6 > fallback) under cooldowns, the a6 weekly quota, and
/// socle rotation. Never writes; history-store errors degrade to fail-open
/// defaults instead of aborting.
#[utoipa::path(
    post,
    path = "/v1/outreach/decide",
    request_body = DecideOutreachRequest,
    responses(
        (status = 200, description = "Decision computed (possibly null with a skip reason)", body = DecideOutreachResponse),
        (status = 400, description = "Missing user_id or window_state", body = relance_core::error::ApiError)
    ),
    tag = "outreach"
)]
pub async fn decide_outreach(
    State(state): State<AppState>,
    AppJson(req): AppJson<DecideOutreachRequest>,
) -> Result<Json<DecideOutreachResponse>, AppError> {
    let request_id = Uuid::now_v7().to_string();
    if let Some(run_id) = req.eval_run_id.as_deref() {
        trace::remember_eval_run(&request_id, run_id);
    }
    let now = Utc::now();

    let snapshot = probe_gates(&state.db, &req, now).await;
    let response = cascade::select_outreach(
        req.window_state,
        req.due_bilan,
        req.onboarding_incomplete,
        &snapshot,
    );

    trace::log_event(
        &state.db,
        req.eval_run_id.as_deref(),
        &request_id,
        "outreach_cascade",
        "outreach.decision",
        "info",
        json!({
            "user_id": req.user_id,
            "template_key": response.decision.as_ref().map(|d| d.template_key.as_str()),
            "category": response.decision.as_ref().map(|d| d.category.as_str()),
            "reason": response.reason,
        }),
    )
    .await;

    Ok(Json(response))
}

/// Probe the category gates the cascade needs, in precedence order, stopping
/// as soon as the remaining reads cannot influence the outcome. The
/// selection itself is pure (`cascade::select_outreach`); this function only
/// does I/O. Unprobed gates keep their blocking defaults.
async fn probe_gates(
    db: &PgPool,
    req: &DecideOutreachRequest,
    now: DateTime<Utc>,
) -> CascadeSnapshot {
    let mut snapshot = CascadeSnapshot {
        sent_today: history::sent_any_today(db, req.user_id, now).await,
        ..CascadeSnapshot::default()
    };
    if snapshot.sent_today || req.window_state == WindowState::Open {
        return snapshot;
    }

    if req.onboarding_incomplete {
        snapshot.onboarding_clear = history::cooldown_clear(
            db,
            req.user_id,
            catalog::ONBOARDING_KEYS,
            catalog::ONBOARDING_COOLDOWN_HOURS,
            now,
        )
        .await;
        if snapshot.onboarding_clear {
            return snapshot;
        }
    }
    if req.due_bilan {
        return snapshot;
    }

    snapshot.a8_clear = history::cooldown_clear(
        db,
        req.user_id,
        catalog::A8_KEYS,
        catalog::A8_COOLDOWN_HOURS,
        now,
    )
    .await;
    if snapshot.a8_clear {
        return snapshot;
    }

    snapshot.socle_clear = history::cooldown_clear(
        db,
        req.user_id,
        catalog::SOCLE_KEYS,
        catalog::SOCLE_COOLDOWN_HOURS,
        now,
    )
    .await;
    if snapshot.socle_clear {
        snapshot.socle_recent = history::recent_keys(
            db,
            req.user_id,
            catalog::SOCLE_KEYS,
            catalog::SOCLE_KEYS.len() as i64,
        )
        .await;
        return snapshot;
    }

    snapshot.a6_quota_used = history::sends_since(
        db,
        req.user_id,
        catalog::A6_KEYS,
        history::week_anchor(now),
    )
    .await;
    if snapshot.a6_quota_used < catalog::A6_WEEKLY_QUOTA {
        snapshot.a6_clear = history::cooldown_clear(
            db,
            req.user_id,
            catalog::A6_KEYS,
            catalog::A6_COOLDOWN_HOURS,
            now,
        )
        .await;
    }

    snapshot
}
