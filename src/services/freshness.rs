use chrono::{Duration, NaiveDateTime, Utc};
use tracing::warn;

use crate::errors::{ApiError, Result};
use crate::storage::MonitoringConn;

/// Oldest status dump, in seconds, that is still served.
pub const FRESHNESS_THRESHOLD_SECS: i64 = 5 * 60;

/// Decide whether a status dump written at `marker` is usable at `now`.
///
/// Both timestamps are UTC. A marker in the future counts as fresh.
pub fn evaluate_freshness(marker: NaiveDateTime, now: NaiveDateTime) -> Result<()> {
    let age = now - marker;
    if age > Duration::seconds(FRESHNESS_THRESHOLD_SECS) {
        return Err(ApiError::StaleFeed { age });
    }
    Ok(())
}

/// Reject the request when the monitoring engine stopped updating status.
pub async fn check_freshness<C>(conn: &mut C) -> Result<()>
where
    C: MonitoringConn + ?Sized,
{
    let marker = conn.status_update_time().await?.ok_or_else(|| {
        ApiError::Configuration("icinga_programstatus has no rows".to_string())
    })?;

    evaluate_freshness(marker, Utc::now().naive_utc()).inspect_err(|e| {
        warn!(status_update_time = %marker, "Rejecting request: {}", e);
    })
}
