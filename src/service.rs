/// Query façade over the synthesis and projection engines.
///
/// `AirQualityService` owns the injected random source and the service
/// configuration, and exposes the three consumer queries:
/// 1. Current snapshot: one fresh reading per registered location
/// 2. History: an hourly replay for one device
/// 3. Forecast: a projected series plus its summary insight
///
/// Nothing is cached between calls; every query draws fresh readings.

use chrono::Utc;
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use std::sync::mpsc;
use threadpool::ThreadPool;

use crate::analysis::{forecast, history};
use crate::config::ServiceConfig;
use crate::error::{AqmonError, Result};
use crate::locations::{find_location, LOCATION_REGISTRY};
use crate::model::{Forecast, Location, Reading};
use crate::synth::ReadingSynthesizer;

/// Forecast selection meaning "average over every location".
pub const ALL_LOCATIONS: &str = "all";

pub struct AirQualityService<R: Rng = StdRng> {
    config: ServiceConfig,
    synth: ReadingSynthesizer<R>,
}

impl AirQualityService<StdRng> {
    /// Create a service with default configuration and an entropy-seeded RNG
    pub fn new() -> Self {
        Self::from_config(ServiceConfig::default())
    }

    /// Create a service from configuration; `rng_seed` pins the RNG if set
    pub fn from_config(config: ServiceConfig) -> Self {
        let rng = match config.rng_seed {
            Some(seed) => {
                log::info!("seeding synthesizer with {}", seed);
                StdRng::seed_from_u64(seed)
            }
            None => StdRng::from_entropy(),
        };
        Self::with_rng(config, rng)
    }
}

impl Default for AirQualityService<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> AirQualityService<R> {
    /// Create a service around an explicit random source
    pub fn with_rng(config: ServiceConfig, rng: R) -> Self {
        Self {
            config,
            synth: ReadingSynthesizer::new(rng),
        }
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    pub fn locations(&self) -> &'static [Location] {
        LOCATION_REGISTRY
    }

    /// One fresh reading per registered location, in registry order.
    pub fn current_readings(&mut self) -> Vec<Reading> {
        let now = Utc::now();
        let readings: Vec<Reading> = LOCATION_REGISTRY
            .iter()
            .map(|location| self.synth.synthesize_at(location.id, location, now))
            .collect();

        log::info!("synthesized snapshot of {} locations", readings.len());
        readings
    }

    /// Same as `current_readings`, computed on a thread pool.
    ///
    /// Each job gets its own generator seeded from the service RNG, so the
    /// result is reproducible for a seeded service regardless of the order
    /// in which workers finish.
    pub fn current_readings_parallel(&mut self, workers: usize) -> Result<Vec<Reading>> {
        let pool = ThreadPool::new(workers.max(1));
        let (tx, rx) = mpsc::channel();
        let now = Utc::now();

        for (idx, location) in LOCATION_REGISTRY.iter().enumerate() {
            let seed = self.synth.rng_mut().next_u64();
            let tx = tx.clone();
            pool.execute(move || {
                let mut synth = ReadingSynthesizer::new(StdRng::seed_from_u64(seed));
                let reading = synth.synthesize_at(location.id, location, now);
                // Receiver outlives the pool; a failed send means the caller gave up
                let _ = tx.send((idx, reading));
            });
        }
        drop(tx);

        let mut slots: Vec<Option<Reading>> = vec![None; LOCATION_REGISTRY.len()];
        for (idx, reading) in rx.iter() {
            slots[idx] = Some(reading);
        }

        let readings = slots
            .into_iter()
            .collect::<Option<Vec<_>>>()
            .ok_or_else(|| AqmonError::Server("snapshot worker exited without a reading".into()))?;

        log::info!(
            "synthesized snapshot of {} locations on {} workers",
            readings.len(),
            workers.max(1)
        );
        Ok(readings)
    }

    /// Hourly history for `device_id`; `None` uses the configured default
    /// window. Unknown devices yield an empty series.
    pub fn history(&mut self, device_id: &str, hours: Option<i64>) -> Result<Vec<Reading>> {
        let hours = self.resolve_hours(hours, self.config.default_history_hours)?;
        history::history(&mut self.synth, device_id, hours, Utc::now())
    }

    /// Projects a forecast from a caller-supplied snapshot.
    pub fn forecast(&self, readings: &[Reading], hours: Option<i64>) -> Result<Forecast> {
        let hours = self.resolve_hours(hours, self.config.default_forecast_hours)?;
        forecast::project(readings, hours, Utc::now())
    }

    /// Projects a forecast from a fresh baseline: `all` averages a full
    /// snapshot, a device id uses that device's reading alone. The window is
    /// validated before any reading is drawn.
    pub fn forecast_for(&mut self, selection: &str, hours: Option<i64>) -> Result<Forecast> {
        let hours = self.resolve_hours(hours, self.config.default_forecast_hours)?;

        let baseline = if selection.eq_ignore_ascii_case(ALL_LOCATIONS) {
            self.current_readings()
        } else {
            let location = find_location(selection)
                .ok_or_else(|| AqmonError::UnknownDevice(selection.to_string()))?;
            vec![self.synth.synthesize(location.id, location)]
        };

        forecast::project(&baseline, hours, Utc::now())
    }

    /// Applies the default window and enforces `0 <= hours <= max_hours`.
    fn resolve_hours(&self, hours: Option<i64>, default: i64) -> Result<i64> {
        let hours = hours.unwrap_or(default);
        if hours < 0 {
            return Err(AqmonError::invalid_input(format!(
                "hours must be non-negative, got {}",
                hours
            )));
        }
        if hours > self.config.max_hours {
            return Err(AqmonError::invalid_input(format!(
                "hours must not exceed {}, got {}",
                self.config.max_hours, hours
            )));
        }
        Ok(hours)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
