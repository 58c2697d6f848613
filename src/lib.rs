/// aqmon_service: air-quality reading synthesis and pollution forecasting.
///
/// # Module structure
///
/// ```text
/// aqmon_service
/// ├── model       — shared data types (Location, Reading, ForecastFrame, ModelInsight, …)
/// ├── error       — AqmonError taxonomy
/// ├── locations   — compiled-in registry of monitored sites
/// ├── risk        — per-pollutant banding and risk classification
/// ├── synth       — reading synthesizer with an injected random source
/// ├── config      — service configuration loader (aqmon.toml)
/// ├── service     — query façade: snapshots, history, forecasts
/// ├── endpoint    — JSON HTTP API over the service
/// └── analysis
///     ├── history   — hourly replay of the synthesizer for one device
///     ├── forecast  — forward projection with confidence decay and insights
///     └── groupings — snapshot summaries, risk distribution and filtering
/// ```

/// Public modules
pub mod analysis;
pub mod config;
pub mod endpoint;
pub mod error;
pub mod locations;
pub mod model;
pub mod risk;
pub mod service;
pub mod synth;
