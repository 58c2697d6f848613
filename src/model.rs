/// Shared data types for the air-quality service.
///
/// Every value here is produced fresh by the synthesizer or the forecast
/// engine and handed to consumers read-only. JSON field names follow the
/// pollutant conventions consumers already expect (`PM2_5`, `PM25_predicted`, …).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ---------------------------------------------------------------------------
// Locations
// ---------------------------------------------------------------------------

/// Site category; selects the pollutant multiplier profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LocationType {
    Highway,
    Residential,
    Industrial,
    Park,
}

impl LocationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            LocationType::Highway => "highway",
            LocationType::Residential => "residential",
            LocationType::Industrial => "industrial",
            LocationType::Park => "park",
        }
    }
}

impl From<&str> for LocationType {
    /// Unknown or empty text falls back to `Residential`.
    fn from(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "highway" => LocationType::Highway,
            "industrial" => LocationType::Industrial,
            "park" => LocationType::Park,
            _ => LocationType::Residential,
        }
    }
}

impl fmt::Display for LocationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A monitored site. Lives in the static registry for the whole process.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Location {
    pub id: &'static str,
    pub name: &'static str,
    pub lat: f64,
    pub lng: f64,
    #[serde(rename = "type")]
    pub location_type: LocationType,
}

// ---------------------------------------------------------------------------
// Readings
// ---------------------------------------------------------------------------

/// Named risk category derived from the worst pollutant band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Moderate,
    High,
    Hazardous,
}

impl RiskLevel {
    /// Maps a 1–4 risk score to its level. Scores above 4 saturate at
    /// `Hazardous`, scores below 2 are `Low`.
    pub fn from_score(score: u8) -> Self {
        if score >= 4 {
            RiskLevel::Hazardous
        } else if score >= 3 {
            RiskLevel::High
        } else if score >= 2 {
            RiskLevel::Moderate
        } else {
            RiskLevel::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Moderate => "moderate",
            RiskLevel::High => "high",
            RiskLevel::Hazardous => "hazardous",
        }
    }

    /// `High` and `Hazardous` count toward the high-risk summary.
    pub fn is_elevated(&self) -> bool {
        matches!(self, RiskLevel::High | RiskLevel::Hazardous)
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RiskLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(RiskLevel::Low),
            "moderate" => Ok(RiskLevel::Moderate),
            "high" => Ok(RiskLevel::High),
            "hazardous" => Ok(RiskLevel::Hazardous),
            other => Err(format!("unknown risk level '{}'", other)),
        }
    }
}

/// One synthesized pollutant reading for a device.
///
/// `risk_score` and `risk_level` are always the classifier's verdict over
/// `pm2_5`, `no2` and `co`; PM10 and CO2 never participate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reading {
    pub device_id: String,
    pub timestamp: DateTime<Utc>,
    pub location: Location,
    #[serde(rename = "PM2_5")]
    pub pm2_5: f64,
    #[serde(rename = "PM10")]
    pub pm10: f64,
    #[serde(rename = "NO2")]
    pub no2: f64,
    #[serde(rename = "CO")]
    pub co: f64,
    #[serde(rename = "CO2")]
    pub co2: f64,
    pub temperature: f64,
    pub humidity: f64,
    pub risk_level: RiskLevel,
    pub risk_score: u8,
}

// ---------------------------------------------------------------------------
// Forecasts
// ---------------------------------------------------------------------------

/// Direction label attached to forecast frames and the overall insight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskTrend {
    Increasing,
    Stable,
    Decreasing,
}

impl fmt::Display for RiskTrend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RiskTrend::Increasing => "increasing",
            RiskTrend::Stable => "stable",
            RiskTrend::Decreasing => "decreasing",
        })
    }
}

/// A single projected hour, `hour` hours after the projection started.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastFrame {
    pub hour: u32,
    pub time_label: String,
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "PM25_predicted")]
    pub pm25_predicted: f64,
    #[serde(rename = "NO2_predicted")]
    pub no2_predicted: f64,
    pub confidence: f64,
    pub risk_trend: RiskTrend,
}

/// Summary derived once from a full frame sequence.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelInsight {
    pub trend: RiskTrend,
    pub confidence_pct: u32,
    pub peak_frame: ForecastFrame,
    pub risk_zone_count: u32,
}

/// Output of one projection run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Forecast {
    pub frames: Vec<ForecastFrame>,
    pub insight: ModelInsight,
}

// ---------------------------------------------------------------------------
// Numeric helpers
// ---------------------------------------------------------------------------

/// Rounds to one decimal place (half away from zero).
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_risk_level_from_score_covers_all_bands() {
        assert_eq!(RiskLevel::from_score(1), RiskLevel::Low);
        assert_eq!(RiskLevel::from_score(2), RiskLevel::Moderate);
        assert_eq!(RiskLevel::from_score(3), RiskLevel::High);
        assert_eq!(RiskLevel::from_score(4), RiskLevel::Hazardous);
        assert_eq!(RiskLevel::from_score(0), RiskLevel::Low);
    }

    #[test]
    fn test_location_type_unknown_text_falls_back_to_residential() {
        assert_eq!(LocationType::from("Industrial"), LocationType::Industrial);
        assert_eq!(LocationType::from(" park "), LocationType::Park);
        assert_eq!(LocationType::from("airport"), LocationType::Residential);
        assert_eq!(LocationType::from(""), LocationType::Residential);
    }

    #[test]
    fn test_risk_level_parses_case_insensitively() {
        assert_eq!("HIGH".parse::<RiskLevel>(), Ok(RiskLevel::High));
        assert!("severe".parse::<RiskLevel>().is_err());
    }

    #[test]
    fn test_reading_serializes_with_pollutant_field_names() {
        let reading = Reading {
            device_id: "charsense_001".to_string(),
            timestamp: Utc::now(),
            location: Location {
                id: "charsense_001",
                name: "Hyderabad Central",
                lat: 17.385044,
                lng: 78.486671,
                location_type: LocationType::Highway,
            },
            pm2_5: 40.1,
            pm10: 126.3,
            no2: 60.0,
            co: 15.2,
            co2: 421.0,
            temperature: 28.4,
            humidity: 55.0,
            risk_level: RiskLevel::Hazardous,
            risk_score: 4,
        };

        let json = serde_json::to_value(&reading).unwrap();
        assert_eq!(json["PM2_5"], 40.1);
        assert_eq!(json["risk_level"], "hazardous");
        assert_eq!(json["location"]["type"], "highway");
    }

    #[test]
    fn test_round1() {
        assert_eq!(round1(35.04), 35.0);
        assert_eq!(round1(35.06), 35.1);
        assert_eq!(round1(50.0), 50.0);
    }
}
