//! Best-effort decision/event trace sink for offline scenario replay.
//!
//! Tracing is never part of the decision contract: a write failure is
//! swallowed (logged at debug for operators) and the caller's decision is
//! returned unchanged. Everything here is a no-op unless the request
//! carries an evaluation-run identifier.

use std::collections::HashMap;
use std::sync::{LazyLock, Mutex};

use serde_json::Value;
use sqlx::PgPool;
use uuid::Uuid;

/// Process-lifetime lookup of request id → evaluation-run id, so events
/// emitted later in a request resolve their run without re-plumbing it.
/// Keys are unique per run and the process is short-lived, so entries are
/// never invalidated.
static EVAL_RUN_BY_REQUEST: LazyLock<Mutex<HashMap<String, String>>> =
    LazyLock::new(|| Mutex::new(HashMap::new()));

pub fn remember_eval_run(request_id: &str, eval_run_id: &str) {
    EVAL_RUN_BY_REQUEST
        .lock()
        .unwrap_or_else(|poison| poison.into_inner())
        .insert(request_id.to_string(), eval_run_id.to_string());
}

pub fn eval_run_for_request(request_id: &str) -> Option<String> {
    EVAL_RUN_BY_REQUEST
        .lock()
        .unwrap_or_else(|poison| poison.into_inner())
        .get(request_id)
        .cloned()
}

/// Record one trace event. The run id falls back to the per-request cache;
/// no-op when neither yields one, fire-and-forget otherwise.
pub async fn log_event(
    db: &PgPool,
    eval_run_id: Option<&str>,
    request_id: &str,
    source: &str,
    event: &str,
    level: &str,
    payload: Value,
) {
    let Some(run_id) = eval_run_id
        .map(str::to_string)
        .or_else(|| eval_run_for_request(request_id))
    else {
        return;
    };

    let result = sqlx::query(
        r#"
        INSERT INTO trace_events (id, eval_run_id, request_id, source, event, level, payload)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        "#,
    )
    .bind(Uuid::now_v7())
    .bind(&run_id)
    .bind(request_id)
    .bind(source)
    .bind(event)
    .bind(level)
    .bind(&payload)
    .execute(db)
    .await;

    if let Err(err) = result {
        tracing::debug!(
            eval_run_id = %run_id,
            event = %event,
            error = ?err,
            "trace event write failed; swallowed (tracing never affects decisions)"
        );
    }
}
