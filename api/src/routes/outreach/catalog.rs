//! Immutable template catalog: category → key sets and per-category rate
//! rules. Loaded once at compile time and never mutated; template copy
//! itself lives with the delivery subsystem.

pub(super) const ONBOARDING_FOLLOWUP_KEY: &str = "onboarding_suite";
pub(super) const BILAN_INVITE_KEY: &str = "bilan_invite";
pub(super) const A8_ACTION_CHECK_KEY: &str = "a8_action_check";
pub(super) const A6_INSPIRATION_KEY: &str = "a6_inspiration";
pub(super) const A5_FALLBACK_KEY: &str = "a5_checkin";

pub(super) const ONBOARDING_KEYS: &[&str] = &[ONBOARDING_FOLLOWUP_KEY];
pub(super) const A8_KEYS: &[&str] = &[A8_ACTION_CHECK_KEY];
pub(super) const A6_KEYS: &[&str] = &[A6_INSPIRATION_KEY];

/// Socle prompts rotate in this order; every key is covered once before any
/// repeat.
pub(super) const SOCLE_KEYS: &[&str] = &[
    "socle_energie",
    "socle_sommeil",
    "socle_stress",
    "socle_relations",
    "socle_sens",
    "socle_fiertes",
];

pub(super) const ONBOARDING_COOLDOWN_HOURS: i64 = 24;
pub(super) const A8_COOLDOWN_HOURS: i64 = 72;
pub(super) const SOCLE_COOLDOWN_HOURS: i64 = 7 * 24;
pub(super) const A6_COOLDOWN_HOURS: i64 = 48;

/// Max a6 sends per calendar week (anchored to Monday 00:00 UTC).
pub(super) const A6_WEEKLY_QUOTA: i64 = 2;

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn template_keys_are_unique_across_categories() {
        let mut seen = HashSet::new();
        let all: [&[&str]; 6] = [
            ONBOARDING_KEYS,
            &[BILAN_INVITE_KEY],
            A8_KEYS,
            SOCLE_KEYS,
            A6_KEYS,
            &[A5_FALLBACK_KEY],
        ];
        for key in all.iter().flat_map(|keys| keys.iter()) {
            assert!(seen.insert(*key), "duplicate template key: {key}");
        }
    }

    #[test]
    fn socle_rotation_has_six_keys() {
        assert_eq!(SOCLE_KEYS.len(), 6);
    }
}
