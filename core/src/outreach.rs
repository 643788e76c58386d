use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// A proactive message category. Categories are totally ordered — the order
/// of the variants below is the precedence order of the outreach cascade,
/// and at most one category fires per evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Onboarding follow-up for users who never finished onboarding
    Onboarding,
    /// Periodic check-in invitation ("bilan")
    Bilan,
    /// Action check on the user's current commitments
    A8,
    /// Deep rotating prompts over the user's foundations ("socle")
    Socle,
    /// Inspiration message, quota-limited per week
    A6,
    /// Default check-in when nothing else is eligible
    A5Fallback,
}

impl Category {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Onboarding => "onboarding",
            Self::Bilan => "bilan",
            Self::A8 => "a8",
            Self::Socle => "socle",
            Self::A6 => "a6",
            Self::A5Fallback => "a5_fallback",
        }
    }
}

/// Whether the user currently has a reactive conversation window open.
/// Proactive outreach never competes with an ongoing conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum WindowState {
    Open,
    Closed,
}

/// Why the cascade decided to send nothing. Absent on a fallback decision —
/// falling through to the default template is not a skip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    AlreadySentToday,
    WindowOpen,
}

/// The single message the cascade selected for a user, or nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct OutreachDecision {
    /// Stable identifier of the message template to send
    pub template_key: String,
    /// Category the template belongs to
    pub category: Category,
}

/// Request to evaluate the outreach cascade for one user.
/// `user_id` and `window_state` are required; a missing field is rejected
/// before any history lookup happens.
#[derive(Debug, Deserialize, ToSchema)]
pub struct DecideOutreachRequest {
    /// User being evaluated
    pub user_id: Uuid,
    /// Current reactive-conversation window state, supplied by the caller
    pub window_state: WindowState,
    /// Whether a periodic check-in is due (due-ness is rate-limited upstream)
    #[serde(default)]
    pub due_bilan: bool,
    /// Whether the user never completed onboarding
    #[serde(default)]
    pub onboarding_incomplete: bool,
    /// Evaluation-run identifier for offline replay tracing; absent in production
    #[serde(default)]
    pub eval_run_id: Option<String>,
}

/// Cascade outcome. Exactly one of the following holds: a decision with no
/// reason, or no decision with a reason, or no decision and no reason is
/// impossible (the fallback category always fires when nothing blocks).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct DecideOutreachResponse {
    /// Selected template, or null when outreach is skipped
    pub decision: Option<OutreachDecision>,
    /// Why outreach was skipped (only when decision is null)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<SkipReason>,
}

impl DecideOutreachResponse {
    pub fn send(template_key: impl Into<String>, category: Category) -> Self {
        Self {
            decision: Some(OutreachDecision {
                template_key: template_key.into(),
                category,
            }),
            reason: None,
        }
    }

    pub fn skip(reason: SkipReason) -> Self {
        Self {
            decision: None,
            reason: Some(reason),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_as_str_matches_wire_form() {
        // `as_str` feeds flat trace payloads; it must agree with the serde
        // wire names so traces and responses never disagree on a category.
        let all = [
            Category::Onboarding,
            Category::Bilan,
            Category::A8,
            Category::Socle,
            Category::A6,
            Category::A5Fallback,
        ];
        for category in all {
            assert_eq!(serde_json::to_value(category).unwrap(), category.as_str());
        }
    }
}
