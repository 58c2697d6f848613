/// Forecast projection engine.
///
/// Extrapolates the mean PM2.5/NO2 of a current snapshot forward hour by
/// hour. The growth multiplier combines a linear term with a bounded
/// oscillation, so projected values are intentionally non-monotonic.
/// Confidence decays linearly per hour and is floored at `CONFIDENCE_FLOOR`.
///
/// Per-frame `risk_trend` is a fixed lookup on the hour index, independent
/// of the projected values. The overall `ModelInsight::trend` is computed
/// from the slope of the final frames.

use chrono::{DateTime, Utc};

use crate::analysis::{check_horizon, shift_hours};
use crate::error::{AqmonError, Result};
use crate::model::{round1, Forecast, ForecastFrame, ModelInsight, Reading, RiskTrend};

pub const CONFIDENCE_START: f64 = 0.95;
pub const CONFIDENCE_STEP: f64 = 0.05;
pub const CONFIDENCE_FLOOR: f64 = 0.6;

/// Fallbacks used when insight fields cannot be derived from any frame.
pub const DEFAULT_CONFIDENCE_PCT: u32 = 85;
pub const DEFAULT_RISK_ZONES: u32 = 2;

/// PM2.5 span (µg/m³) covered by one risk zone.
const RISK_ZONE_WIDTH: f64 = 25.0;

/// Mean consecutive delta (µg/m³/h) beyond which the insight is not stable.
const TREND_DELTA: f64 = 1.0;

/// Number of trailing frames the insight trend looks at.
const TREND_WINDOW: usize = 3;

// ---------------------------------------------------------------------------
// Per-hour model
// ---------------------------------------------------------------------------

/// Growth multiplier applied to the baseline at hour `i`.
pub fn growth_multiplier(hour: u32) -> f64 {
    let i = f64::from(hour);
    1.0 + i * 0.1 + (i * 0.5).sin() * 0.2
}

/// Forecast confidence at hour `i`.
pub fn confidence_at(hour: u32) -> f64 {
    (CONFIDENCE_START - f64::from(hour) * CONFIDENCE_STEP).max(CONFIDENCE_FLOOR)
}

/// Fixed per-index trend label.
pub fn trend_at(hour: u32) -> RiskTrend {
    match hour {
        0..=2 => RiskTrend::Increasing,
        3..=5 => RiskTrend::Stable,
        _ => RiskTrend::Decreasing,
    }
}

/// Two-digit 12-hour clock label, e.g. `02:05 PM`.
pub fn time_label(time: DateTime<Utc>) -> String {
    time.format("%I:%M %p").to_string()
}

// ---------------------------------------------------------------------------
// Projection
// ---------------------------------------------------------------------------

/// Projects `hours + 1` frames from the mean PM2.5 and NO2 of `readings`.
///
/// Fails with `InvalidInput` when `readings` is empty or `hours` is outside
/// `0..=MAX_HORIZON_HOURS`.
pub fn project(readings: &[Reading], hours: i64, now: DateTime<Utc>) -> Result<Forecast> {
    if readings.is_empty() {
        return Err(AqmonError::invalid_input(
            "cannot project a forecast from an empty reading set",
        ));
    }

    let count = readings.len() as f64;
    let avg_pm25 = readings.iter().map(|r| r.pm2_5).sum::<f64>() / count;
    let avg_no2 = readings.iter().map(|r| r.no2).sum::<f64>() / count;

    project_baseline(avg_pm25, avg_no2, hours, now)
}

/// Projects from an explicit baseline instead of a reading set.
pub fn project_baseline(
    avg_pm25: f64,
    avg_no2: f64,
    hours: i64,
    now: DateTime<Utc>,
) -> Result<Forecast> {
    let hours = check_horizon(hours)?;

    let frames = (0..=hours)
        .map(|hour| {
            let multiplier = growth_multiplier(hour);
            let timestamp = shift_hours(now, i64::from(hour))?;
            Ok(ForecastFrame {
                hour,
                time_label: time_label(timestamp),
                timestamp,
                pm25_predicted: round1(avg_pm25 * multiplier),
                no2_predicted: round1(avg_no2 * multiplier),
                confidence: confidence_at(hour),
                risk_trend: trend_at(hour),
            })
        })
        .collect::<Result<Vec<ForecastFrame>>>()?;

    let insight = derive_insight(&frames)
        .ok_or_else(|| AqmonError::invalid_input("projection produced no frames"))?;

    log::debug!(
        "projected {} frames from PM2.5={:.1} NO2={:.1}; trend {}",
        frames.len(),
        avg_pm25,
        avg_no2,
        insight.trend
    );

    Ok(Forecast { frames, insight })
}

// ---------------------------------------------------------------------------
// Insights
// ---------------------------------------------------------------------------

/// Overall trend from the mean consecutive PM2.5 delta over the trailing
/// frames. Fewer than two frames is `Stable`.
pub fn insight_trend(frames: &[ForecastFrame]) -> RiskTrend {
    let tail = &frames[frames.len().saturating_sub(TREND_WINDOW)..];
    if tail.len() < 2 {
        return RiskTrend::Stable;
    }

    let total: f64 = tail
        .windows(2)
        .map(|pair| pair[1].pm25_predicted - pair[0].pm25_predicted)
        .sum();
    let mean_delta = total / (tail.len() - 1) as f64;

    if mean_delta > TREND_DELTA {
        RiskTrend::Increasing
    } else if mean_delta < -TREND_DELTA {
        RiskTrend::Decreasing
    } else {
        RiskTrend::Stable
    }
}

/// Final-frame confidence as a whole percentage.
pub fn insight_confidence_pct(frames: &[ForecastFrame]) -> u32 {
    frames
        .last()
        .map(|f| (f.confidence * 100.0).round() as u32)
        .unwrap_or(DEFAULT_CONFIDENCE_PCT)
}

/// Number of 25 µg/m³ zones spanned by the final PM2.5 projection. A zero
/// or non-finite count falls back to `DEFAULT_RISK_ZONES`.
pub fn risk_zone_count(frames: &[ForecastFrame]) -> u32 {
    frames
        .last()
        .map(|f| (f.pm25_predicted / RISK_ZONE_WIDTH).ceil())
        .filter(|zones| zones.is_finite() && *zones >= 1.0)
        .map(|zones| zones as u32)
        .unwrap_or(DEFAULT_RISK_ZONES)
}

/// Frame with the highest projected PM2.5; ties go to the earliest hour.
pub fn peak_frame(frames: &[ForecastFrame]) -> Option<&ForecastFrame> {
    frames.iter().fold(None, |best: Option<&ForecastFrame>, frame| match best {
        Some(b) if frame.pm25_predicted <= b.pm25_predicted => Some(b),
        _ => Some(frame),
    })
}

/// Derives the run summary. Returns `None` only for an empty sequence,
/// which has no peak.
pub fn derive_insight(frames: &[ForecastFrame]) -> Option<ModelInsight> {
    let peak = peak_frame(frames)?.clone();
    Some(ModelInsight {
        trend: insight_trend(frames),
        confidence_pct: insight_confidence_pct(frames),
        peak_frame: peak,
        risk_zone_count: risk_zone_count(frames),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
