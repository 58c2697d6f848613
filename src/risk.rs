/// Pollutant risk classification.
///
/// Each guideline pollutant (PM2.5, NO2, CO) is banded independently into
/// 1–4; the worst band becomes the reading's risk score. PM10 and CO2 are
/// reported but never classified.

use crate::model::RiskLevel;

/// Result of classifying one reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RiskAssessment {
    pub score: u8,
    pub level: RiskLevel,
}

/// Band thresholds, highest first: a value strictly above `bounds[0]` is
/// band 4, above `bounds[1]` band 3, above `bounds[2]` band 2, else 1.
struct Bands {
    bounds: [f64; 3],
}

const PM25_BANDS: Bands = Bands { bounds: [75.0, 35.0, 15.0] };
const NO2_BANDS: Bands = Bands { bounds: [100.0, 50.0, 25.0] };
const CO_BANDS: Bands = Bands { bounds: [30.0, 15.0, 8.0] };

impl Bands {
    fn band(&self, value: f64) -> u8 {
        let [hazardous, high, moderate] = self.bounds;
        if value > hazardous {
            4
        } else if value > high {
            3
        } else if value > moderate {
            2
        } else {
            1
        }
    }
}

/// PM2.5 band (µg/m³).
pub fn pm25_band(value: f64) -> u8 {
    PM25_BANDS.band(value)
}

/// NO2 band (ppb).
pub fn no2_band(value: f64) -> u8 {
    NO2_BANDS.band(value)
}

/// CO band (ppm).
pub fn co_band(value: f64) -> u8 {
    CO_BANDS.band(value)
}

/// Classifies a reading by its worst guideline pollutant.
pub fn classify(pm2_5: f64, no2: f64, co: f64) -> RiskAssessment {
    let score = pm25_band(pm2_5).max(no2_band(no2)).max(co_band(co));
    RiskAssessment {
        score,
        level: RiskLevel::from_score(score),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
