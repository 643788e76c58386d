//! Read-only client for the delivery subsystem's `message_history` table.
//!
//! Every read here fails open: a store error degrades outreach *precision*
//! (a cooldown or quota may be missed once), never outreach availability.
//! This is deliberate — failing closed would silently suppress all proactive
//! messages during any transient store blip.

use chrono::{DateTime, Datelike, Duration, NaiveTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

/// Start of the current UTC calendar day.
pub fn day_start(now: DateTime<Utc>) -> DateTime<Utc> {
    now.date_naive().and_time(NaiveTime::MIN).and_utc()
}

/// Most recent Monday 00:00 UTC, computed from the ISO day-of-week.
/// Anchors the weekly quota window to calendar weeks rather than a trailing
/// 7×24h window, so quota fairness resets at the same instant for everyone.
pub fn week_anchor(now: DateTime<Utc>) -> DateTime<Utc> {
    let days_since_monday = i64::from(now.weekday().num_days_from_monday());
    let monday = now.date_naive() - Duration::days(days_since_monday);
    monday.and_time(NaiveTime::MIN).and_utc()
}

fn owned_keys(keys: &[&str]) -> Vec<String> {
    keys.iter().map(|key| key.to_string()).collect()
}

/// Has any proactive message (any category) been sent to this user today?
/// Fails open to `false`: an erroring store never blocks the cascade.
pub async fn sent_any_today(db: &PgPool, user_id: Uuid, now: DateTime<Utc>) -> bool {
    let result = sqlx::query_scalar::<_, bool>(
        r#"
        SELECT EXISTS (
            SELECT 1 FROM message_history
            WHERE user_id = $1 AND created_at >= $2
        )
        "#,
    )
    .bind(user_id)
    .bind(day_start(now))
    .fetch_one(db)
    .await;

    match result {
        Ok(sent) => sent,
        Err(err) => {
            tracing::warn!(
                user_id = %user_id,
                error = ?err,
                "message_history read failed; failing open (treating as not sent today)"
            );
            false
        }
    }
}

/// True when none of `keys` were sent to the user within the trailing
/// `hours_lookback` hours. Fails open to `true`.
pub async fn cooldown_clear(
    db: &PgPool,
    user_id: Uuid,
    keys: &[&str],
    hours_lookback: i64,
    now: DateTime<Utc>,
) -> bool {
    let cutoff = now - Duration::hours(hours_lookback);
    let result = sqlx::query_scalar::<_, bool>(
        r#"
        SELECT NOT EXISTS (
            SELECT 1 FROM message_history
            WHERE user_id = $1 AND template_key = ANY($2) AND created_at >= $3
        )
        "#,
    )
    .bind(user_id)
    .bind(owned_keys(keys))
    .bind(cutoff)
    .fetch_one(db)
    .await;

    match result {
        Ok(clear) => clear,
        Err(err) => {
            tracing::warn!(
                user_id = %user_id,
                error = ?err,
                "cooldown lookup failed; failing open (treating cooldown as clear)"
            );
            true
        }
    }
}

/// Number of sends from `keys` at or after `since`. Fails open to `0`
/// (quota treated as unmet).
pub async fn sends_since(
    db: &PgPool,
    user_id: Uuid,
    keys: &[&str],
    since: DateTime<Utc>,
) -> i64 {
    let result = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*)::BIGINT FROM message_history
        WHERE user_id = $1 AND template_key = ANY($2) AND created_at >= $3
        "#,
    )
    .bind(user_id)
    .bind(owned_keys(keys))
    .bind(since)
    .fetch_one(db)
    .await;

    match result {
        Ok(count) => count,
        Err(err) => {
            tracing::warn!(
                user_id = %user_id,
                error = ?err,
                "quota lookup failed; failing open (treating quota as unmet)"
            );
            0
        }
    }
}

/// The last `limit` template keys sent to the user from `keys`, newest
/// first. Fails open to an empty list (rotation resets to its first key).
pub async fn recent_keys(
    db: &PgPool,
    user_id: Uuid,
    keys: &[&str],
    limit: i64,
) -> Vec<String> {
    let result = sqlx::query_scalar::<_, String>(
        r#"
        SELECT template_key FROM message_history
        WHERE user_id = $1 AND template_key = ANY($2)
        ORDER BY created_at DESC
        LIMIT $3
        "#,
    )
    .bind(user_id)
    .bind(owned_keys(keys))
    .bind(limit)
    .fetch_all(db)
    .await;

    match result {
        Ok(recent) => recent,
        Err(err) => {
            tracing::warn!(
                user_id = %user_id,
                error = ?err,
                "rotation history lookup failed; failing open (empty history)"
            );
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn week_anchor_on_a_wednesday_is_previous_monday_midnight() {
        // Wednesday 2026-08-26 15:42:10 UTC
        let now = Utc.with_ymd_and_hms(2026, 8, 26, 15, 42, 10).unwrap();
        let anchor = week_anchor(now);
        assert_eq!(anchor, Utc.with_ymd_and_hms(2026, 8, 24, 0, 0, 0).unwrap());
    }

    #[test]
    fn week_anchor_on_monday_midnight_is_itself() {
        let now = Utc.with_ymd_and_hms(2026, 8, 24, 0, 0, 0).unwrap();
        assert_eq!(week_anchor(now), now);
    }

    #[test]
    fn week_anchor_on_sunday_reaches_back_six_days() {
        // Sunday 2026-08-30 23:59:59 UTC still belongs to the week of the 24th
        let now = Utc.with_ymd_and_hms(2026, 8, 30, 23, 59, 59).unwrap();
        assert_eq!(
            week_anchor(now),
            Utc.with_ymd_and_hms(2026, 8, 24, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn day_start_truncates_to_utc_midnight() {
        let now = Utc.with_ymd_and_hms(2026, 1, 5, 9, 30, 0).unwrap();
        assert_eq!(
            day_start(now),
            Utc.with_ymd_and_hms(2026, 1, 5, 0, 0, 0).unwrap()
        );
    }
}
