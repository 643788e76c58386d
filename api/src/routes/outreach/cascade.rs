use super::*;

/// Everything the precedence decision needs from the message-history store,
/// probed up front (with the fail-open policy applied inside
/// `crate::history`). Gates that were never probed stay at their blocking
/// defaults, which is safe because probing stops only once an earlier
/// category is guaranteed to fire.
#[derive(Debug, Clone, Default, PartialEq)]
pub(super) struct CascadeSnapshot {
    /// Any send today, regardless of category
    pub sent_today: bool,
    /// Onboarding cooldown (24h) clear — only probed when the flag is set
    pub onboarding_clear: bool,
    /// a8 cooldown (72h) clear
    pub a8_clear: bool,
    /// socle cooldown (7×24h) clear
    pub socle_clear: bool,
    /// Last N socle keys, newest first (N = rotation length)
    pub socle_recent: Vec<String>,
    /// a6 sends since the most recent Monday 00:00 UTC
    pub a6_quota_used: i64,
    /// a6 cooldown (48h) clear
    pub a6_clear: bool,
}

/// The proactive outreach decision cascade: strictly precedence-ordered,
/// short-circuiting on the first category that fires, pure over its inputs.
/// At most one decision per user per calendar day; proactive outreach never
/// competes with an open reactive conversation.
pub(super) fn select_outreach(
    window_state: WindowState,
    due_bilan: bool,
    onboarding_incomplete: bool,
    snapshot: &CascadeSnapshot,
) -> DecideOutreachResponse {
    if snapshot.sent_today {
        return DecideOutreachResponse::skip(SkipReason::AlreadySentToday);
    }
    if window_state == WindowState::Open {
        return DecideOutreachResponse::skip(SkipReason::WindowOpen);
    }
    if onboarding_incomplete && snapshot.onboarding_clear {
        return DecideOutreachResponse::send(catalog::ONBOARDING_FOLLOWUP_KEY, Category::Onboarding);
    }
    // Due-ness is itself rate-limited upstream, so bilan has no cooldown here.
    if due_bilan {
        return DecideOutreachResponse::send(catalog::BILAN_INVITE_KEY, Category::Bilan);
    }
    if snapshot.a8_clear {
        return DecideOutreachResponse::send(catalog::A8_ACTION_CHECK_KEY, Category::A8);
    }
    if snapshot.socle_clear {
        if let Some(key) = rotation::next_in_rotation(catalog::SOCLE_KEYS, &snapshot.socle_recent) {
            return DecideOutreachResponse::send(key, Category::Socle);
        }
    }
    if snapshot.a6_quota_used < catalog::A6_WEEKLY_QUOTA && snapshot.a6_clear {
        return DecideOutreachResponse::send(catalog::A6_INSPIRATION_KEY, Category::A6);
    }
    DecideOutreachResponse::send(catalog::A5_FALLBACK_KEY, Category::A5Fallback)
}
