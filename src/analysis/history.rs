/// Historical series generation.
///
/// Replays the synthesizer over a past window, one independent reading per
/// hour. The series is not a smooth trend: every point is resynthesized.

use chrono::{DateTime, Utc};
use rand::Rng;

use crate::analysis::{check_horizon, shift_hours};
use crate::error::Result;
use crate::locations::find_location;
use crate::model::Reading;
use crate::synth::ReadingSynthesizer;

/// Builds `hours + 1` hourly readings for `device_id`, oldest first, ending
/// at `now`.
///
/// An unregistered device yields an empty series rather than an error so
/// that consumers can degrade gracefully. Windows outside
/// `0..=MAX_HORIZON_HOURS` are `InvalidInput`.
pub fn history<R: Rng>(
    synth: &mut ReadingSynthesizer<R>,
    device_id: &str,
    hours: i64,
    now: DateTime<Utc>,
) -> Result<Vec<Reading>> {
    let hours = i64::from(check_horizon(hours)?);

    let Some(location) = find_location(device_id) else {
        log::warn!("history requested for unknown device '{}', returning empty series", device_id);
        return Ok(Vec::new());
    };

    let series = (0..=hours)
        .rev()
        .map(|i| Ok(synth.synthesize_at(device_id, location, shift_hours(now, -i)?)))
        .collect::<Result<Vec<Reading>>>()?;

    log::debug!("generated {} historical readings for {}", series.len(), device_id);
    Ok(series)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
