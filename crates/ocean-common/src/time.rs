//! Timestep handling and calendar-day bucketing.

use chrono::{Local, NaiveDate, NaiveDateTime, Timelike};

use crate::error::{OceanError, OceanResult};

/// Input date format accepted on the command line (`YYYYMMDD`).
pub const INPUT_DATE_FORMAT: &str = "%Y%m%d";

/// One entry of a dataset's time axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestep(NaiveDateTime);

impl Timestep {
    pub fn new(datetime: NaiveDateTime) -> Self {
        Self(datetime)
    }

    /// Parse an ISO-like `YYYY-MM-DDTHH:MM[:SS]` timestamp.
    pub fn parse(s: &str) -> OceanResult<Self> {
        for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"] {
            if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
                return Ok(Self(dt));
            }
        }
        Err(OceanError::InvalidTime(s.to_string()))
    }

    pub fn datetime(&self) -> NaiveDateTime {
        self.0
    }

    /// Calendar date portion, `YYYY-MM-DD`.
    pub fn date_string(&self) -> String {
        self.0.format("%Y-%m-%d").to_string()
    }

    /// Two-digit hour.
    pub fn hour_string(&self) -> String {
        format!("{:02}", self.0.hour())
    }

    /// Two-digit minute.
    pub fn minute_string(&self) -> String {
        format!("{:02}", self.0.minute())
    }
}

/// Assign a day index to every timestep.
///
/// The first timestep has day 0; the index increments each time the date
/// string differs from the previous timestep's. Equal consecutive dates
/// share an index, so the result is non-decreasing in time order.
pub fn day_indices(timesteps: &[Timestep]) -> Vec<usize> {
    let mut indices = Vec::with_capacity(timesteps.len());
    let mut previous: Option<String> = None;
    let mut current = 0usize;

    for step in timesteps {
        let date = step.date_string();
        if let Some(prev) = &previous {
            if *prev != date {
                current += 1;
            }
        }
        indices.push(current);
        previous = Some(date);
    }

    indices
}

/// Validate a `YYYYMMDD` run date.
pub fn parse_input_date(s: &str) -> OceanResult<NaiveDate> {
    NaiveDate::parse_from_str(s, INPUT_DATE_FORMAT)
        .map_err(|_| OceanError::InvalidTime(format!("expected YYYYMMDD, got '{}'", s)))
}

/// Today's date in the local timezone as `YYYYMMDD`.
pub fn today_string() -> String {
    Local::now().format(INPUT_DATE_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn steps(raw: &[&str]) -> Vec<Timestep> {
        raw.iter().map(|s| Timestep::parse(s).unwrap()).collect()
    }

    #[test]
    fn test_timestep_parts() {
        let t = Timestep::parse("2021-01-01T06:30:00").unwrap();
        assert_eq!(t.date_string(), "2021-01-01");
        assert_eq!(t.hour_string(), "06");
        assert_eq!(t.minute_string(), "30");
    }

    #[test]
    fn test_day_indices_groups_dates() {
        let ts = steps(&["2021-01-01T00:00", "2021-01-01T12:00", "2021-01-02T00:00"]);
        assert_eq!(day_indices(&ts), vec![0, 0, 1]);
    }

    #[test]
    fn test_day_indices_empty() {
        assert!(day_indices(&[]).is_empty());
    }

    #[test]
    fn test_parse_input_date() {
        assert!(parse_input_date("20210131").is_ok());
        assert!(parse_input_date("2021-01-31").is_err());
        assert!(parse_input_date("20211331").is_err());
    }
}
