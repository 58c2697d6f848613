/// Analysis over synthesized readings.
///
/// Submodules:
/// - `history`: replays the synthesizer across a past window.
/// - `forecast`: projects a snapshot forward and summarizes the run.
/// - `groupings`: organizes a flat snapshot into summaries and filtered views.

pub mod forecast;
pub mod groupings;
pub mod history;

use chrono::{DateTime, Duration, Utc};

use crate::error::{AqmonError, Result};

/// Longest window, in hours, that history or forecast will build (one leap year).
pub const MAX_HORIZON_HOURS: i64 = 24 * 366;

/// Validates an hour window, returning it as a frame index bound.
pub fn check_horizon(hours: i64) -> Result<u32> {
    if !(0..=MAX_HORIZON_HOURS).contains(&hours) {
        return Err(AqmonError::invalid_input(format!(
            "hours must be between 0 and {}, got {}",
            MAX_HORIZON_HOURS, hours
        )));
    }
    u32::try_from(hours)
        .map_err(|_| AqmonError::invalid_input(format!("hours out of range: {}", hours)))
}

/// `time` shifted by `hours`, or `InvalidInput` if the result is not representable.
pub fn shift_hours(time: DateTime<Utc>, hours: i64) -> Result<DateTime<Utc>> {
    Duration::try_hours(hours)
        .and_then(|offset| time.checked_add_signed(offset))
        .ok_or_else(|| {
            AqmonError::invalid_input(format!("cannot shift {} by {} hours", time, hours))
        })
}
