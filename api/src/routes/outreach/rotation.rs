use std::collections::HashSet;

/// Pick the next key in a category's rotation: the first key in
/// `ordered_keys` iteration order that is absent from `recent_keys` (the
/// last N sends, N = list length, newest first). When every key has been
/// used, reset to the first key — a full-cycle reset. Coverage of all
/// variants before any repeat holds independent of history arrival order.
pub(super) fn next_in_rotation<'a>(
    ordered_keys: &[&'a str],
    recent_keys: &[String],
) -> Option<&'a str> {
    let used: HashSet<&str> = recent_keys.iter().map(String::as_str).collect();
    ordered_keys
        .iter()
        .copied()
        .find(|key| !used.contains(key))
        .or_else(|| ordered_keys.first().copied())
}
