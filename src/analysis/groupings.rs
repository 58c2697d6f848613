/// Snapshot aggregation and filtering utilities.
///
/// These helpers take the flat list of `Reading`s produced for a snapshot
/// and answer the questions consumers ask of it: how many sensors are in
/// each risk level, what is the city-wide average, which sites match a
/// search. They only read their input and never feed back into synthesis
/// or projection.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use crate::model::{round1, LocationType, Reading, RiskLevel};

// ---------------------------------------------------------------------------
// Summary statistics
// ---------------------------------------------------------------------------

/// City-wide summary of one snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryStats {
    pub total_sensors: usize,
    pub active_sensors: usize,
    pub avg_pm25: f64,
    pub avg_no2: f64,
    pub high_risk_count: usize,
}

/// Summarizes a snapshot. Averages are rounded to one decimal; an empty
/// snapshot produces all-zero stats.
pub fn summarize(readings: &[Reading]) -> SummaryStats {
    if readings.is_empty() {
        return SummaryStats {
            total_sensors: 0,
            active_sensors: 0,
            avg_pm25: 0.0,
            avg_no2: 0.0,
            high_risk_count: 0,
        };
    }

    let count = readings.len() as f64;
    let avg_pm25 = readings.iter().map(|r| r.pm2_5).sum::<f64>() / count;
    let avg_no2 = readings.iter().map(|r| r.no2).sum::<f64>() / count;

    // Every synthesized reading carries a timestamp, so all sensors report
    SummaryStats {
        total_sensors: readings.len(),
        active_sensors: readings.len(),
        avg_pm25: round1(avg_pm25),
        avg_no2: round1(avg_no2),
        high_risk_count: readings.iter().filter(|r| r.risk_level.is_elevated()).count(),
    }
}

/// Counts readings per risk level. Levels with no readings are absent.
pub fn risk_distribution(readings: &[Reading]) -> BTreeMap<RiskLevel, usize> {
    let mut counts = BTreeMap::new();
    for reading in readings {
        *counts.entry(reading.risk_level).or_insert(0) += 1;
    }
    counts
}

/// Mean PM2.5 per location type.
pub fn mean_pm25_by_type(readings: &[Reading]) -> HashMap<LocationType, f64> {
    let mut sums: HashMap<LocationType, (f64, usize)> = HashMap::new();
    for reading in readings {
        let entry = sums.entry(reading.location.location_type).or_insert((0.0, 0));
        entry.0 += reading.pm2_5;
        entry.1 += 1;
    }
    sums.into_iter()
        .map(|(kind, (sum, n))| (kind, sum / n as f64))
        .collect()
}

// ---------------------------------------------------------------------------
// Filtering
// ---------------------------------------------------------------------------

/// Predicate over readings: optional case-insensitive location-name search
/// and optional exact risk level.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReadingFilter {
    pub search: Option<String>,
    pub risk: Option<RiskLevel>,
}

impl ReadingFilter {
    /// Builds a filter from raw query values. A risk value of `all` (or
    /// nothing) disables the risk predicate; an empty search matches all.
    pub fn from_query(search: Option<&str>, risk: Option<&str>) -> Result<Self, String> {
        let search = search
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        let risk = match risk.map(str::trim) {
            None | Some("") => None,
            Some(value) if value.eq_ignore_ascii_case("all") => None,
            Some(value) => Some(value.parse::<RiskLevel>()?),
        };

        Ok(Self { search, risk })
    }

    pub fn matches(&self, reading: &Reading) -> bool {
        let matches_search = self.search.as_ref().is_none_or(|term| {
            reading
                .location
                .name
                .to_lowercase()
                .contains(&term.to_lowercase())
        });
        let matches_risk = self.risk.is_none_or(|level| reading.risk_level == level);
        matches_search && matches_risk
    }
}

/// Returns the readings accepted by `filter`, preserving order.
pub fn filter_readings(readings: &[Reading], filter: &ReadingFilter) -> Vec<Reading> {
    readings.iter().filter(|r| filter.matches(r)).cloned().collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locations::find_location;
    use crate::risk::classify;
    use chrono::Utc;

    /// Builds a reading with explicit pollutant values for a registry site.
    fn reading(device_id: &str, pm2_5: f64, no2: f64, co: f64) -> Reading {
        let location = find_location(device_id).expect("device should be registered");
        let assessment = classify(pm2_5, no2, co);
        Reading {
            device_id: device_id.to_string(),
            timestamp: Utc::now(),
            location: *location,
            pm2_5,
            pm10: pm2_5 * 1.5,
            no2,
            co,
            co2: 420.0,
            temperature: 28.0,
            humidity: 55.0,
            risk_level: assessment.level,
            risk_score: assessment.score,
        }
    }

    fn snapshot() -> Vec<Reading> {
        vec![
            reading("charsense_001", 63.0, 62.5, 15.2), // high
            reading("charsense_002", 35.0, 30.0, 8.0),  // moderate
            reading("charsense_003", 77.0, 77.5, 19.2), // hazardous
            reading("charsense_005", 21.0, 12.5, 3.2),  // moderate
            reading("charsense_004", 12.0, 10.0, 4.0),  // low
        ]
    }

    // --- Summary --------------------------------------------------------------

    #[test]
    fn test_summarize_counts_and_averages() {
        let stats = summarize(&snapshot());
        assert_eq!(stats.total_sensors, 5);
        assert_eq!(stats.active_sensors, 5);
        // (63 + 35 + 77 + 21 + 12) / 5 = 41.6
        assert_eq!(stats.avg_pm25, 41.6);
        // (62.5 + 30 + 77.5 + 12.5 + 10) / 5 = 38.5
        assert_eq!(stats.avg_no2, 38.5);
        assert_eq!(stats.high_risk_count, 2);
    }

    #[test]
    fn test_summarize_empty_snapshot_is_zeroed() {
        let stats = summarize(&[]);
        assert_eq!(stats.total_sensors, 0);
        assert_eq!(stats.avg_pm25, 0.0);
        assert_eq!(stats.high_risk_count, 0);
    }

    #[test]
    fn test_risk_distribution_counts_present_levels_only() {
        let dist = risk_distribution(&snapshot());
        assert_eq!(dist.get(&RiskLevel::Low), Some(&1));
        assert_eq!(dist.get(&RiskLevel::Moderate), Some(&2));
        assert_eq!(dist.get(&RiskLevel::High), Some(&1));
        assert_eq!(dist.get(&RiskLevel::Hazardous), Some(&1));
        assert_eq!(dist.values().sum::<usize>(), 5);

        let clean = vec![reading("charsense_004", 10.0, 10.0, 2.0)];
        let dist = risk_distribution(&clean);
        assert_eq!(dist.len(), 1);
        assert!(!dist.contains_key(&RiskLevel::Hazardous));
    }

    #[test]
    fn test_mean_pm25_by_type() {
        let means = mean_pm25_by_type(&snapshot());
        assert_eq!(means[&LocationType::Industrial], 77.0);
        assert_eq!(means[&LocationType::Park], 21.0);
        // Banjara Hills + Jubilee Hills
        assert_eq!(means[&LocationType::Residential], 23.5);
    }

    // --- Filtering ------------------------------------------------------------

    #[test]
    fn test_search_is_case_insensitive_substring() {
        let filter = ReadingFilter::from_query(Some("HILLS"), None).unwrap();
        let hits = filter_readings(&snapshot(), &filter);
        let names: Vec<_> = hits.iter().map(|r| r.location.name).collect();
        assert_eq!(names, vec!["Banjara Hills", "Jubilee Hills"]);
    }

    #[test]
    fn test_risk_filter_exact_level() {
        let filter = ReadingFilter::from_query(None, Some("moderate")).unwrap();
        let hits = filter_readings(&snapshot(), &filter);
        assert_eq!(hits.len(), 2);
        assert!(hits.iter().all(|r| r.risk_level == RiskLevel::Moderate));
    }

    #[test]
    fn test_search_and_risk_combine() {
        let filter = ReadingFilter::from_query(Some("park"), Some("moderate")).unwrap();
        let hits = filter_readings(&snapshot(), &filter);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].device_id, "charsense_005");

        let filter = ReadingFilter::from_query(Some("park"), Some("high")).unwrap();
        assert!(filter_readings(&snapshot(), &filter).is_empty());
    }

    #[test]
    fn test_all_and_empty_values_disable_predicates() {
        let filter = ReadingFilter::from_query(Some("  "), Some("all")).unwrap();
        assert_eq!(filter, ReadingFilter::default());
        assert_eq!(filter_readings(&snapshot(), &filter).len(), 5);
    }

    #[test]
    fn test_unknown_risk_value_is_rejected() {
        assert!(ReadingFilter::from_query(None, Some("severe")).is_err());
    }
}
