//! Decoding of CF-convention time axes (`"<unit> since <reference>"`).

use chrono::{Duration, NaiveDate, NaiveDateTime};
use ocean_common::Timestep;

use crate::error::{NetCdfError, NetCdfResult};

/// Time unit of a CF time axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeUnit {
    Seconds,
    Minutes,
    Hours,
    Days,
}

impl TimeUnit {
    fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "seconds" | "second" | "secs" | "sec" | "s" => Some(Self::Seconds),
            "minutes" | "minute" | "mins" | "min" => Some(Self::Minutes),
            "hours" | "hour" | "hrs" | "hr" | "h" => Some(Self::Hours),
            "days" | "day" | "d" => Some(Self::Days),
            _ => None,
        }
    }

    pub fn seconds(&self) -> f64 {
        match self {
            Self::Seconds => 1.0,
            Self::Minutes => 60.0,
            Self::Hours => 3600.0,
            Self::Days => 86400.0,
        }
    }
}

/// Parsed `units` attribute of a time variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CfTimeUnits {
    pub unit: TimeUnit,
    pub reference: NaiveDateTime,
}

const REFERENCE_FORMATS: [&str; 6] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

impl CfTimeUnits {
    /// Parse units such as `"hours since 2021-01-01 00:00:00"`.
    ///
    /// Only the standard (proleptic Gregorian) calendar is supported, and a
    /// trailing `Z`/`UTC` zone designator is accepted and ignored.
    pub fn parse(units: &str) -> NetCdfResult<Self> {
        let invalid = || NetCdfError::InvalidTimeUnits(units.to_string());

        let (unit, reference) = units.trim().split_once(" since ").ok_or_else(invalid)?;
        let unit = TimeUnit::parse(unit.trim()).ok_or_else(invalid)?;

        let reference = reference
            .trim()
            .trim_end_matches("UTC")
            .trim_end_matches('Z')
            .trim();
        let reference = parse_reference(reference).ok_or_else(invalid)?;

        Ok(Self { unit, reference })
    }

    /// Convert an offset along the axis into a timestep.
    pub fn decode(&self, value: f64) -> NetCdfResult<Timestep> {
        if !value.is_finite() {
            return Err(NetCdfError::InvalidFormat(format!(
                "non-finite time value {}",
                value
            )));
        }
        let millis = (value * self.unit.seconds() * 1000.0).round() as i64;
        let datetime = self
            .reference
            .checked_add_signed(Duration::milliseconds(millis))
            .ok_or_else(|| NetCdfError::InvalidFormat(format!("time value {} overflows", value)))?;
        Ok(Timestep::new(datetime))
    }

    pub fn decode_all(&self, values: &[f64]) -> NetCdfResult<Vec<Timestep>> {
        values.iter().map(|&v| self.decode(v)).collect()
    }
}

fn parse_reference(s: &str) -> Option<NaiveDateTime> {
    REFERENCE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(s, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}
