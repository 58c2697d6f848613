/// Reading synthesizer: produces plausible pollutant readings for a site.
///
/// Baseline levels are scaled by a per-location-type multiplier profile and
/// perturbed by a small bounded variation. Floors keep every pollutant
/// strictly positive before it reaches the classifier.
///
/// The random source is injected so tests and reproducible runs can use a
/// seeded generator.

use chrono::{DateTime, Utc};
use rand::Rng;

use crate::model::{round1, Location, LocationType, Reading};
use crate::risk;

// ---------------------------------------------------------------------------
// Multiplier profiles
// ---------------------------------------------------------------------------

/// Scaling factors applied to the baseline pollutant levels of a site.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Multipliers {
    pub pm2_5: f64,
    pub pm10: f64,
    pub no2: f64,
    pub co: f64,
}

impl Multipliers {
    pub fn for_type(location_type: LocationType) -> Self {
        match location_type {
            LocationType::Highway => Multipliers { pm2_5: 1.8, pm10: 2.1, no2: 2.5, co: 1.9 },
            LocationType::Residential => Multipliers { pm2_5: 1.0, pm10: 1.1, no2: 1.2, co: 1.0 },
            LocationType::Industrial => Multipliers { pm2_5: 2.2, pm10: 2.8, no2: 3.1, co: 2.4 },
            LocationType::Park => Multipliers { pm2_5: 0.6, pm10: 0.7, no2: 0.5, co: 0.4 },
        }
    }
}

// Baselines and spreads
const PM25_BASE: f64 = 35.0;
const PM25_SPREAD: f64 = 20.0;
const PM25_FLOOR: f64 = 5.0;
const PM10_RATIO: f64 = 1.5;
const PM10_FLOOR: f64 = 8.0;
const NO2_BASE: f64 = 25.0;
const NO2_SPREAD: f64 = 15.0;
const NO2_FLOOR: f64 = 5.0;
const CO_BASE: f64 = 8.0;
const CO_SPREAD: f64 = 5.0;
const CO_FLOOR: f64 = 1.0;
const CO2_BASE: f64 = 380.0;
const CO2_SPREAD: f64 = 120.0;
const TEMPERATURE_BASE: f64 = 28.0;
const TEMPERATURE_SPREAD: f64 = 8.0;
const HUMIDITY_BASE: f64 = 55.0;
const HUMIDITY_SPREAD: f64 = 20.0;

// ---------------------------------------------------------------------------
// Synthesizer
// ---------------------------------------------------------------------------

/// Generates readings from an owned random source.
pub struct ReadingSynthesizer<R: Rng> {
    rng: R,
}

impl<R: Rng> ReadingSynthesizer<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    /// Mutable access to the underlying generator, e.g. to derive child seeds.
    pub fn rng_mut(&mut self) -> &mut R {
        &mut self.rng
    }

    /// Draws one variation value in [-0.1, 0.1). Every formula that needs
    /// variation draws its own.
    fn variation(&mut self) -> f64 {
        (self.rng.gen_range(0.0..1.0) - 0.5) * 0.2
    }

    /// Synthesizes a reading stamped with the current time.
    pub fn synthesize(&mut self, device_id: &str, location: &Location) -> Reading {
        self.synthesize_at(device_id, location, Utc::now())
    }

    /// Synthesizes a reading stamped with `timestamp`.
    pub fn synthesize_at(
        &mut self,
        device_id: &str,
        location: &Location,
        timestamp: DateTime<Utc>,
    ) -> Reading {
        let mult = Multipliers::for_type(location.location_type);

        let pm2_5 = ((PM25_BASE + self.variation() * PM25_SPREAD) * mult.pm2_5).max(PM25_FLOOR);
        // PM10 tracks the unrounded PM2.5 rather than its own baseline
        let pm10 = (pm2_5 * PM10_RATIO * mult.pm10).max(PM10_FLOOR);
        let no2 = ((NO2_BASE + self.variation() * NO2_SPREAD) * mult.no2).max(NO2_FLOOR);
        let co = ((CO_BASE + self.variation() * CO_SPREAD) * mult.co).max(CO_FLOOR);
        let co2 = CO2_BASE + self.rng.gen_range(0.0..1.0) * CO2_SPREAD;
        let temperature = TEMPERATURE_BASE + self.variation() * TEMPERATURE_SPREAD;
        let humidity = HUMIDITY_BASE + self.variation() * HUMIDITY_SPREAD;

        let (pm2_5, no2, co) = (round1(pm2_5), round1(no2), round1(co));

        // Classify the published values so the score always agrees with them
        let assessment = risk::classify(pm2_5, no2, co);

        log::debug!(
            "synthesized {} ({}): PM2.5={:.1} NO2={:.1} CO={:.1} -> {}",
            device_id,
            location.location_type,
            pm2_5,
            no2,
            co,
            assessment.level
        );

        Reading {
            device_id: device_id.to_string(),
            timestamp,
            location: *location,
            pm2_5,
            pm10: round1(pm10),
            no2,
            co,
            co2: co2.round(),
            temperature: round1(temperature),
            humidity: round1(humidity),
            risk_level: assessment.level,
            risk_score: assessment.score,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
