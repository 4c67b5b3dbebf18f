//! Closed-form estimators for the signals that need no network access.
//!
//! The collector derives season, atmosphere, and humanity from the calendar alone; the
//! remaining signals come from external services and fall back to fixed neutral values
//! when those are unavailable. [`WorldParameters::estimate_offline`] builds a complete
//! record from the estimators and the fallbacks.
use std::f64::consts::TAU;

use tracing::debug;

use crate::error::Result;
use crate::params::{Timestamp, WorldParameters};

/// Entropy used when market data is unavailable.
pub const FALLBACK_ENTROPY: f64 = 0.35;
/// Sentiment used when the headline judge is unavailable.
pub const FALLBACK_SENTIMENT: f64 = 0.5;
/// Ascension used when air-traffic data is unavailable.
pub const FALLBACK_ASCENSION: f64 = 0.7;
/// Cosmic used when the ephemeris is unavailable.
pub const FALLBACK_COSMIC: f64 = 0.5;

const DAYS_PER_YEAR: f64 = 365.0;

const CO2_BASE_PPM: f64 = 422.0;
const CO2_BASE_YEAR: i64 = 2024;
const CO2_TREND_PPM_PER_YEAR: f64 = 2.4;
const CO2_SEASONAL_AMPLITUDE_PPM: f64 = 3.5;
const CO2_FLOOR_PPM: f64 = 415.0;
const CO2_SPAN_PPM: f64 = 35.0;

const POPULATION_BASE: f64 = 8_045_000_000.0;
const POPULATION_GROWTH_PER_SECOND: f64 = 2.2;
const POPULATION_FLOOR: f64 = 8_000_000_000.0;
const POPULATION_SPAN: f64 = 2_000_000_000.0;

/// Season signal for a 1-based day of the year. Peaks ten days before new year.
pub fn season(day_of_year: u32) -> f64 {
    (((day_of_year as f64 + 10.0) * TAU / DAYS_PER_YEAR).cos() + 1.0) / 2.0
}

/// Modelled atmospheric CO2 in ppm: linear trend plus a yearly oscillation.
pub fn co2_ppm(year: i64, day_of_year: u32) -> f64 {
    let trend = (year - CO2_BASE_YEAR) as f64 * CO2_TREND_PPM_PER_YEAR;
    let osc = CO2_SEASONAL_AMPLITUDE_PPM
        * (TAU * (day_of_year as f64 - 10.0) / DAYS_PER_YEAR).cos();
    CO2_BASE_PPM + trend + osc
}

/// Atmosphere signal: modelled CO2 normalized over 415..450 ppm.
pub fn atmosphere(year: i64, day_of_year: u32) -> f64 {
    clamp01((co2_ppm(year, day_of_year) - CO2_FLOOR_PPM) / CO2_SPAN_PPM)
}

/// Modelled world population at a Unix time, growing linearly from mid-2023.
pub fn population(unix_seconds: f64) -> f64 {
    let base = Timestamp::from_utc(2023, 7, 1, 0, 0, 0).unix_seconds();
    POPULATION_BASE + (unix_seconds - base) * POPULATION_GROWTH_PER_SECOND
}

/// Humanity signal: modelled population normalized over 8..10 billion.
pub fn humanity(unix_seconds: f64) -> f64 {
    clamp01((population(unix_seconds) - POPULATION_FLOOR) / POPULATION_SPAN)
}

/// Rounds to the four decimals the collector writes.
pub fn round4(v: f64) -> f64 {
    (v * 10_000.0).round() / 10_000.0
}

#[inline]
fn clamp01(v: f64) -> f64 {
    v.clamp(0.0, 1.0)
}

impl WorldParameters {
    /// Builds a record for `timestamp` from the calendar estimators and the collector's
    /// fallback values for network-sourced signals.
    pub fn estimate_offline(timestamp: &str) -> Result<Self> {
        let instant: Timestamp = timestamp.parse()?;
        let doy = instant.day_of_year();
        let (year, _, _) = instant.utc_date();

        let params = WorldParameters::new(
            timestamp,
            round4(season(doy)),
            FALLBACK_SENTIMENT,
            FALLBACK_ENTROPY,
            round4(humanity(instant.unix_seconds())),
            round4(atmosphere(year, doy)),
        )
        .with_ascension(FALLBACK_ASCENSION)
        .with_cosmic(FALLBACK_COSMIC);

        debug!(
            "Offline estimate for {}: season={}, humanity={}, atmosphere={}.",
            instant, params.p_season, params.p_humanity, params.p_atmosphere
        );
        params.validate()?;
        Ok(params)
    }
}
