use super::*;

/// Confidence floor below which a resolved upstream signal is ignored.
const SIGNAL_CONFIDENCE_THRESHOLD: f64 = 0.65;
/// The only pending type this resolver answers for.
const CHECKUP_PENDING_TYPE: &str = "checkup_entry";

// Length caps bound recall in favor of precision for the deterministic
// fallback only: a short confirmatory reply is unambiguous, a long message
// containing an affirmative word as an incidental substring is not. Caps
// apply to the normalized text, which is also what the phrases match.
const YES_MAX_LEN: usize = 60;
const DEFER_MAX_LEN: usize = 120;
const NO_MAX_LEN: usize = 80;

// Curated phrase sets, already in normalized form (lowercase, diacritics
// stripped, punctuation collapsed to single spaces).
const YES_PHRASES: &[&str] = &[
    "oui",
    "ouais",
    "ok",
    "okay",
    "oki",
    "d accord",
    "daccord",
    "ca marche",
    "ca me va",
    "c est parti",
    "volontiers",
    "avec plaisir",
    "pourquoi pas",
    "je veux bien",
    "carrement",
    "allons y",
    "vas y",
    "go",
    "yes",
];

const DEFER_PHRASES: &[&str] = &[
    "plus tard",
    "pas maintenant",
    "pas tout de suite",
    "pas aujourd hui",
    "une autre fois",
    "un autre moment",
    "tout a l heure",
    "ce soir",
    "demain",
    "la semaine prochaine",
    "dans un moment",
];

const NO_PHRASES: &[&str] = &[
    "non",
    "no",
    "nope",
    "pas envie",
    "pas interesse",
    "pas interessee",
    "je ne veux pas",
    "je veux pas",
    "laisse tomber",
    "sans facon",
    "pas la peine",
    "jamais",
];

/// Explicit disposition of the upstream signal — dispatched by match, never
/// by implicit fallthrough. Signal absence is the `None` at the call site.
#[derive(Debug, PartialEq)]
pub(super) enum SignalDisposition<'a> {
    /// Resolved for our pending type with enough confidence to act on
    ResolvedHighConfidence(&'a str),
    /// Resolved but below the confidence floor — ignored
    ResolvedLowConfidence,
    /// Unresolved, foreign pending type, or missing decision code — ignored
    Unresolved,
}

pub(super) fn classify_signal(signal: &PendingResolutionSignal) -> SignalDisposition<'_> {
    if signal.status != SignalStatus::Resolved || signal.pending_type != CHECKUP_PENDING_TYPE {
        return SignalDisposition::Unresolved;
    }
    let Some(code) = signal.decision_code.as_deref() else {
        return SignalDisposition::Unresolved;
    };
    if signal.confidence >= SIGNAL_CONFIDENCE_THRESHOLD {
        SignalDisposition::ResolvedHighConfidence(code)
    } else {
        SignalDisposition::ResolvedLowConfidence
    }
}

fn outcome_from_code(code: &str) -> Option<CheckupOutcome> {
    match code {
        "checkup.accept" => Some(CheckupOutcome::Yes),
        "checkup.defer" | "common.defer" => Some(CheckupOutcome::Defer),
        "checkup.decline" => Some(CheckupOutcome::No),
        _ => None,
    }
}

/// Resolve a user's reply to a pending checkup invitation.
///
/// Order: high-confidence structured signal, then the legacy dispatcher
/// boolean, then deterministic phrase matching. `None` means still unclear —
/// the caller keeps the prompt pending.
pub(super) fn resolve_reply(req: &ResolveCheckupRequest) -> Option<CheckupResolution> {
    if let Some(signal) = &req.pending_resolution_signal {
        match classify_signal(signal) {
            SignalDisposition::ResolvedHighConfidence(code) => {
                if let Some(kind) = outcome_from_code(code) {
                    return Some(CheckupResolution::dispatcher(kind));
                }
                // Unrecognized decision codes fall through to the other paths.
            }
            SignalDisposition::ResolvedLowConfidence | SignalDisposition::Unresolved => {}
        }
    }

    if let Some(wants) = req.wants_checkup_from_dispatcher {
        let kind = if wants {
            CheckupOutcome::Yes
        } else {
            CheckupOutcome::No
        };
        return Some(CheckupResolution::dispatcher(kind));
    }

    deterministic_outcome(&normalize_message(&req.user_message))
        .map(CheckupResolution::deterministic)
}

/// Deterministic fallback over the normalized message. Match order is
/// yes → defer → no, with one pinned tie-break: when a text matches both a
/// defer phrase and a no phrase ("non, plus tard"), the explicit negation
/// wins.
pub(super) fn deterministic_outcome(normalized: &str) -> Option<CheckupOutcome> {
    if normalized.is_empty() {
        return None;
    }
    let len = normalized.chars().count();

    if len <= YES_MAX_LEN && matches_any(normalized, YES_PHRASES) {
        return Some(CheckupOutcome::Yes);
    }
    let defer = len <= DEFER_MAX_LEN && matches_any(normalized, DEFER_PHRASES);
    let no = len <= NO_MAX_LEN && matches_any(normalized, NO_PHRASES);
    match (defer, no) {
        (true, true) | (false, true) => Some(CheckupOutcome::No),
        (true, false) => Some(CheckupOutcome::Defer),
        (false, false) => None,
    }
}

fn matches_any(normalized: &str, phrases: &[&str]) -> bool {
    let padded = format!(" {normalized} ");
    phrases
        .iter()
        .any(|phrase| padded.contains(&format!(" {phrase} ")))
}

/// Lowercase, strip diacritics, collapse non-alphanumeric runs to single
/// spaces, trim. Phrase sets are written in this same normalized form.
pub(super) fn normalize_message(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut pending_space = false;
    for ch in raw.to_lowercase().chars() {
        match ch {
            'œ' => push_word(&mut out, "oe", &mut pending_space),
            'æ' => push_word(&mut out, "ae", &mut pending_space),
            _ => {
                let folded = fold_diacritic(ch);
                if folded.is_alphanumeric() {
                    if pending_space && !out.is_empty() {
                        out.push(' ');
                    }
                    pending_space = false;
                    out.push(folded);
                } else {
                    pending_space = true;
                }
            }
        }
    }
    out
}

fn push_word(out: &mut String, word: &str, pending_space: &mut bool) {
    if *pending_space && !out.is_empty() {
        out.push(' ');
    }
    *pending_space = false;
    out.push_str(word);
}

fn fold_diacritic(ch: char) -> char {
    match ch {
        'à' | 'â' | 'ä' | 'á' | 'ã' => 'a',
        'é' | 'è' | 'ê' | 'ë' => 'e',
        'î' | 'ï' | 'í' => 'i',
        'ô' | 'ö' | 'ó' | 'õ' => 'o',
        'ù' | 'û' | 'ü' | 'ú' => 'u',
        'ç' => 'c',
        'ÿ' => 'y',
        _ => ch,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use relance_core::checkup::ResolutionVia;

    fn text_only(message: &str) -> ResolveCheckupRequest {
        ResolveCheckupRequest {
            user_message: message.to_string(),
            wants_checkup_from_dispatcher: None,
            pending_resolution_signal: None,
            eval_run_id: None,
        }
    }

    fn signal(status: SignalStatus, code: Option<&str>, confidence: f64) -> PendingResolutionSignal {
        PendingResolutionSignal {
            status,
            pending_type: CHECKUP_PENDING_TYPE.to_string(),
            decision_code: code.map(str::to_string),
            confidence,
        }
    }

    #[test]
    fn normalizes_case_diacritics_and_punctuation() {
        assert_eq!(normalize_message("Éh... OUI !!"), "eh oui");
        assert_eq!(normalize_message("D'accord"), "d accord");
        assert_eq!(normalize_message("  ça  marche,  à plus  "), "ca marche a plus");
    }

    #[test]
    fn d_accord_resolves_yes_deterministically() {
        let resolution = resolve_reply(&text_only("D'accord")).unwrap();
        assert_eq!(resolution.kind, CheckupOutcome::Yes);
        assert_eq!(resolution.via, ResolutionVia::Deterministic);
    }

    #[test]
    fn negation_beats_defer_when_both_match() {
        // "Non, plus tard" matches both the defer set ("plus tard") and the
        // no set ("non"); the pinned tie-break gives the negation precedence.
        let resolution = resolve_reply(&text_only("Non, plus tard")).unwrap();
        assert_eq!(resolution.kind, CheckupOutcome::No);
        assert_eq!(resolution.via, ResolutionVia::Deterministic);
    }

    #[test]
    fn plain_defer_phrase_resolves_defer() {
        let resolution = resolve_reply(&text_only("plus tard peut-être")).unwrap();
        assert_eq!(resolution.kind, CheckupOutcome::Defer);
    }

    #[test]
    fn dispatcher_boolean_overrides_unclear_text() {
        let req = ResolveCheckupRequest {
            wants_checkup_from_dispatcher: Some(true),
            ..text_only("je sais pas")
        };
        let resolution = resolve_reply(&req).unwrap();
        assert_eq!(resolution.kind, CheckupOutcome::Yes);
        assert_eq!(resolution.via, ResolutionVia::Dispatcher);
    }

    #[test]
    fn dispatcher_boolean_false_resolves_no() {
        let req = ResolveCheckupRequest {
            wants_checkup_from_dispatcher: Some(false),
            ..text_only("hmm")
        };
        let resolution = resolve_reply(&req).unwrap();
        assert_eq!(resolution.kind, CheckupOutcome::No);
        assert_eq!(resolution.via, ResolutionVia::Dispatcher);
    }

    #[test]
    fn high_confidence_accept_wins_over_contradicting_text() {
        let req = ResolveCheckupRequest {
            pending_resolution_signal: Some(signal(
                SignalStatus::Resolved,
                Some("checkup.accept"),
                0.92,
            )),
            ..text_only("non merci")
        };
        let resolution = resolve_reply(&req).unwrap();
        assert_eq!(resolution.kind, CheckupOutcome::Yes);
        assert_eq!(resolution.via, ResolutionVia::Dispatcher);
    }

    #[test]
    fn low_confidence_signal_falls_through_to_text() {
        let req = ResolveCheckupRequest {
            pending_resolution_signal: Some(signal(
                SignalStatus::Resolved,
                Some("checkup.accept"),
                0.42,
            )),
            ..text_only("oui")
        };
        let resolution = resolve_reply(&req).unwrap();
        assert_eq!(resolution.kind, CheckupOutcome::Yes);
        assert_eq!(resolution.via, ResolutionVia::Deterministic);
    }

    #[test]
    fn common_defer_code_maps_to_defer() {
        let req = ResolveCheckupRequest {
            pending_resolution_signal: Some(signal(
                SignalStatus::Resolved,
                Some("common.defer"),
                0.80,
            )),
            ..text_only("")
        };
        assert_eq!(resolve_reply(&req).unwrap().kind, CheckupOutcome::Defer);
    }

    #[test]
    fn decline_code_maps_to_no() {
        let req = ResolveCheckupRequest {
            pending_resolution_signal: Some(signal(
                SignalStatus::Resolved,
                Some("checkup.decline"),
                0.71,
            )),
            ..text_only("")
        };
        assert_eq!(resolve_reply(&req).unwrap().kind, CheckupOutcome::No);
    }

    #[test]
    fn unrecognized_code_falls_through_to_deterministic() {
        let req = ResolveCheckupRequest {
            pending_resolution_signal: Some(signal(
                SignalStatus::Resolved,
                Some("checkup.reschedule"),
                0.95,
            )),
            ..text_only("oui")
        };
        let resolution = resolve_reply(&req).unwrap();
        assert_eq!(resolution.via, ResolutionVia::Deterministic);
        assert_eq!(resolution.kind, CheckupOutcome::Yes);
    }

    #[test]
    fn foreign_pending_type_is_ignored() {
        let mut foreign = signal(SignalStatus::Resolved, Some("checkup.accept"), 0.99);
        foreign.pending_type = "plan_update".to_string();
        assert_eq!(classify_signal(&foreign), SignalDisposition::Unresolved);
    }

    #[test]
    fn unresolved_signal_is_ignored() {
        let req = ResolveCheckupRequest {
            pending_resolution_signal: Some(signal(SignalStatus::Unresolved, None, 0.99)),
            ..text_only("oui")
        };
        assert_eq!(
            resolve_reply(&req).unwrap().via,
            ResolutionVia::Deterministic
        );
    }

    #[test]
    fn long_message_with_incidental_yes_stays_unclear() {
        let long = "oui enfin je ne sais pas trop, il faudrait que je regarde mon agenda \
                    parce que cette semaine est vraiment très chargée au travail";
        assert_eq!(resolve_reply(&text_only(long)), None);
    }

    #[test]
    fn unrelated_text_stays_unclear() {
        assert_eq!(resolve_reply(&text_only("je sais pas trop")), None);
        assert_eq!(resolve_reply(&text_only("")), None);
    }

    #[test]
    fn phrase_match_respects_word_boundaries() {
        // "sinon" must not match the bare "non" phrase.
        assert_eq!(deterministic_outcome("sinon on verra"), None);
    }
}
