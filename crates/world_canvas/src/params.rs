//! World-state input record and the run parameters derived from it.
//!
//! [`WorldParameters`] is produced by the external data-collection job and is read-only
//! to the generator. [`RunParameters`] holds the three scalars that shape synthesis.
use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Normalized world-state signals for one generation.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct WorldParameters {
    /// RFC 3339 instant the signals were collected at. Also keys the random streams.
    pub timestamp: String,
    /// Position in the yearly cycle, 1.0 around midwinter.
    pub p_season: f64,
    /// News sentiment, 0.0 apocalyptic to 1.0 utopian.
    pub p_sentiment: f64,
    /// Market fear (volatility blend).
    pub p_entropy: f64,
    /// World population pressure.
    pub p_humanity: f64,
    /// Atmospheric CO2 proxy.
    pub p_atmosphere: f64,
    /// Air-traffic signal. Carried through, not used by synthesis.
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub p_ascension: Option<f64>,
    /// Moon-phase signal. Carried through, not used by synthesis.
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub p_cosmic: Option<f64>,
}

impl WorldParameters {
    /// Creates a record with the five synthesis signals and no extras.
    pub fn new(
        timestamp: impl Into<String>,
        p_season: f64,
        p_sentiment: f64,
        p_entropy: f64,
        p_humanity: f64,
        p_atmosphere: f64,
    ) -> Self {
        Self {
            timestamp: timestamp.into(),
            p_season,
            p_sentiment,
            p_entropy,
            p_humanity,
            p_atmosphere,
            p_ascension: None,
            p_cosmic: None,
        }
    }

    /// Sets the air-traffic signal.
    pub fn with_ascension(mut self, value: f64) -> Self {
        self.p_ascension = Some(value);
        self
    }

    /// Sets the moon-phase signal.
    pub fn with_cosmic(mut self, value: f64) -> Self {
        self.p_cosmic = Some(value);
        self
    }

    /// Parses the timestamp field.
    pub fn instant(&self) -> Result<Timestamp> {
        self.timestamp.parse()
    }

    /// Validates ranges and the timestamp, returning an error if invalid.
    pub fn validate(&self) -> Result<()> {
        self.instant()?;
        let signals = [
            ("p_season", Some(self.p_season)),
            ("p_sentiment", Some(self.p_sentiment)),
            ("p_entropy", Some(self.p_entropy)),
            ("p_humanity", Some(self.p_humanity)),
            ("p_atmosphere", Some(self.p_atmosphere)),
            ("p_ascension", self.p_ascension),
            ("p_cosmic", self.p_cosmic),
        ];
        for (name, value) in signals {
            let Some(v) = value else { continue };
            if !v.is_finite() || !(0.0..=1.0).contains(&v) {
                return Err(Error::InvalidInput(format!(
                    "{name} must be a finite value in [0, 1], got {v}"
                )));
            }
        }
        Ok(())
    }

    /// Parses and validates a JSON world-state record.
    #[cfg(feature = "json")]
    pub fn from_json(json: &str) -> Result<Self> {
        let params: WorldParameters =
            serde_json::from_str(json).map_err(|e| Error::InvalidInput(e.to_string()))?;
        params.validate()?;
        Ok(params)
    }

    /// Reads and validates a JSON world-state record from `path`.
    #[cfg(feature = "json")]
    pub fn from_json_file(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Serializes the record as pretty-printed JSON.
    #[cfg(feature = "json")]
    pub fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| Error::Other(e.to_string()))
    }
}

/// Scalars derived from the world state that shape a synthesis run.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RunParameters {
    /// Noise frequency, in `[0.002, 0.004]`. Grows with population pressure.
    pub zoom: f64,
    /// Warp displacement in pixels, in `[100, 300]`. Grows with market entropy.
    pub distortion: f64,
    /// Dither amplitude, in `[0.1, 0.2]`. Grows with the CO2 proxy.
    pub grain_amount: f64,
}

impl RunParameters {
    pub fn from_world(params: &WorldParameters) -> Self {
        Self {
            zoom: zoom_for(params.p_humanity),
            distortion: distortion_for(params.p_entropy),
            grain_amount: grain_amount_for(params.p_atmosphere),
        }
    }
}

#[inline]
pub fn zoom_for(p_humanity: f64) -> f64 {
    0.002 + p_humanity * 0.002
}

#[inline]
pub fn distortion_for(p_entropy: f64) -> f64 {
    100.0 + p_entropy * 200.0
}

#[inline]
pub fn grain_amount_for(p_atmosphere: f64) -> f64 {
    0.1 + p_atmosphere * 0.1
}

/// A parsed RFC 3339 instant.
///
/// Only what the generator needs is kept: the UTC calendar date, Unix time, and the
/// original offset.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Timestamp {
    unix_seconds: f64,
    offset_minutes: i32,
}

impl Timestamp {
    /// Seconds since 1970-01-01T00:00:00Z, including the fractional part.
    pub fn unix_seconds(&self) -> f64 {
        self.unix_seconds
    }

    /// UTC offset written in the source string, in minutes.
    pub fn offset_minutes(&self) -> i32 {
        self.offset_minutes
    }

    /// UTC `(year, month, day)`.
    pub fn utc_date(&self) -> (i64, u32, u32) {
        civil_from_days(self.utc_days())
    }

    /// 1-based day of the year in UTC.
    pub fn day_of_year(&self) -> u32 {
        let days = self.utc_days();
        let (year, _, _) = civil_from_days(days);
        (days - days_from_civil(year, 1, 1) + 1) as u32
    }

    /// Builds a timestamp from a UTC civil date and time.
    pub fn from_utc(year: i64, month: u32, day: u32, hour: u32, minute: u32, second: u32) -> Self {
        let days = days_from_civil(year, month, day);
        let secs = days * 86_400 + (hour as i64) * 3_600 + (minute as i64) * 60 + second as i64;
        Self {
            unix_seconds: secs as f64,
            offset_minutes: 0,
        }
    }

    fn utc_days(&self) -> i64 {
        (self.unix_seconds / 86_400.0).floor() as i64
    }
}

impl FromStr for Timestamp {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = |why: &str| Error::InvalidInput(format!("timestamp '{s}': {why}"));
        let b = s.as_bytes();
        if b.len() < 20 {
            return Err(invalid("too short for YYYY-MM-DDTHH:MM:SSZ"));
        }

        let year = digits(b, 0, 4).ok_or_else(|| invalid("bad year"))? as i64;
        let month = digits(b, 5, 2).ok_or_else(|| invalid("bad month"))?;
        let day = digits(b, 8, 2).ok_or_else(|| invalid("bad day"))?;
        let hour = digits(b, 11, 2).ok_or_else(|| invalid("bad hour"))?;
        let minute = digits(b, 14, 2).ok_or_else(|| invalid("bad minute"))?;
        let second = digits(b, 17, 2).ok_or_else(|| invalid("bad second"))?;
        if b[4] != b'-' || b[7] != b'-' || b[13] != b':' || b[16] != b':' {
            return Err(invalid("bad date/time separators"));
        }
        if !matches!(b[10], b'T' | b't' | b' ') {
            return Err(invalid("expected 'T' between date and time"));
        }
        if !(1..=12).contains(&month) || day == 0 || day > days_in_month(year, month) {
            return Err(invalid("date out of range"));
        }
        // 60 admits a leap second.
        if hour > 23 || minute > 59 || second > 60 {
            return Err(invalid("time out of range"));
        }

        let mut pos = 19;
        let mut fraction = 0.0;
        if b[pos] == b'.' {
            let start = pos + 1;
            pos = start;
            while pos < b.len() && b[pos].is_ascii_digit() {
                pos += 1;
            }
            if pos == start {
                return Err(invalid("empty fractional seconds"));
            }
            fraction = format!("0.{}", &s[start..pos])
                .parse::<f64>()
                .map_err(|_| invalid("bad fractional seconds"))?;
        }

        let offset_minutes = match b.get(pos).copied() {
            Some(b'Z' | b'z') if pos + 1 == b.len() => 0,
            Some(sign @ (b'+' | b'-')) if pos + 6 == b.len() && b[pos + 3] == b':' => {
                let oh = digits(b, pos + 1, 2).ok_or_else(|| invalid("bad offset"))?;
                let om = digits(b, pos + 4, 2).ok_or_else(|| invalid("bad offset"))?;
                if oh > 23 || om > 59 {
                    return Err(invalid("offset out of range"));
                }
                let total = (oh * 60 + om) as i32;
                if sign == b'-' {
                    -total
                } else {
                    total
                }
            }
            _ => return Err(invalid("expected 'Z' or a ±HH:MM offset")),
        };

        let days = days_from_civil(year, month, day);
        let local = days * 86_400 + (hour as i64) * 3_600 + (minute as i64) * 60 + second as i64;
        let utc = local - (offset_minutes as i64) * 60;
        Ok(Self {
            unix_seconds: utc as f64 + fraction,
            offset_minutes,
        })
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let secs = self.unix_seconds.floor() as i64;
        let (y, m, d) = civil_from_days(secs.div_euclid(86_400));
        let tod = secs.rem_euclid(86_400);
        write!(
            f,
            "{y:04}-{m:02}-{d:02}T{:02}:{:02}:{:02}Z",
            tod / 3_600,
            (tod / 60) % 60,
            tod % 60
        )
    }
}

fn digits(b: &[u8], start: usize, len: usize) -> Option<u32> {
    let slice = b.get(start..start + len)?;
    slice.iter().try_fold(0u32, |acc, &c| {
        c.is_ascii_digit().then(|| acc * 10 + (c - b'0') as u32)
    })
}

fn is_leap(year: i64) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

fn days_in_month(year: i64, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if is_leap(year) => 29,
        2 => 28,
        _ => 0,
    }
}

/// Days since 1970-01-01 for a proleptic Gregorian date.
pub(crate) fn days_from_civil(year: i64, month: u32, day: u32) -> i64 {
    let y = if month <= 2 { year - 1 } else { year };
    let era = y.div_euclid(400);
    let yoe = y - era * 400;
    let m = month as i64;
    let doy = (153 * (if m > 2 { m - 3 } else { m + 9 }) + 2) / 5 + day as i64 - 1;
    let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy;
    era * 146_097 + doe - 719_468
}

fn civil_from_days(days: i64) -> (i64, u32, u32) {
    let z = days + 719_468;
    let era = z.div_euclid(146_097);
    let doe = z - era * 146_097;
    let yoe = (doe - doe / 1_460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = (doy - (153 * mp + 2) / 5 + 1) as u32;
    let month = if mp < 10 { mp + 3 } else { mp - 9 } as u32;
    let year = yoe + era * 400 + if month <= 2 { 1 } else { 0 };
    (year, month, day)
}
