use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Terminal outcome of a checkup confirmation. `unclear` is not a variant —
/// it is represented as the absence of a resolution, and leaves the pending
/// prompt open for another attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum CheckupOutcome {
    Yes,
    No,
    Defer,
}

/// Which path produced the resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionVia {
    /// Upstream structured signal (or the legacy boolean from the dispatcher)
    Dispatcher,
    /// Deterministic phrase matching on the user's message
    Deterministic,
}

/// A resolved checkup confirmation, tagged with its provenance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct CheckupResolution {
    pub kind: CheckupOutcome,
    pub via: ResolutionVia,
}

impl CheckupResolution {
    pub const fn dispatcher(kind: CheckupOutcome) -> Self {
        Self {
            kind,
            via: ResolutionVia::Dispatcher,
        }
    }

    pub const fn deterministic(kind: CheckupOutcome) -> Self {
        Self {
            kind,
            via: ResolutionVia::Deterministic,
        }
    }
}

/// Whether the upstream classifier considers the user's reply resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SignalStatus {
    Resolved,
    Unresolved,
}

/// Confidence-scored classification of the user's reply, produced by an
/// upstream dispatcher. Untrusted input: the resolver only acts on it above
/// a confidence threshold, and only for the pending type it is asked about.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct PendingResolutionSignal {
    pub status: SignalStatus,
    /// Which pending question this signal answers (e.g. "checkup_entry")
    pub pending_type: String,
    /// Machine decision code (e.g. "checkup.accept"); may be absent when unresolved
    #[serde(default)]
    pub decision_code: Option<String>,
    /// Classifier confidence in [0, 1]
    pub confidence: f64,
}

/// Request to resolve a user's reply while a checkup invitation is pending.
#[derive(Debug, Deserialize, ToSchema)]
pub struct ResolveCheckupRequest {
    /// The raw free-text reply
    pub user_message: String,
    /// Legacy boolean signal from the dispatcher; checked after the structured signal
    #[serde(default)]
    pub wants_checkup_from_dispatcher: Option<bool>,
    /// Structured upstream classification, when the dispatcher produced one
    #[serde(default)]
    pub pending_resolution_signal: Option<PendingResolutionSignal>,
    /// Evaluation-run identifier for offline replay tracing; absent in production
    #[serde(default)]
    pub eval_run_id: Option<String>,
}

/// Resolver outcome. A null resolution means "still unclear, keep waiting" —
/// explicitly not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct ResolveCheckupResponse {
    /// Resolved outcome, or null while the reply is still unclear
    pub resolution: Option<CheckupResolution>,
}
