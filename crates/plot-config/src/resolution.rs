//! Coastline detail levels.

use std::fmt;
use std::str::FromStr;

/// Coastline resolution in the familiar `c/l/i/h/f` scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Resolution {
    Crude,
    Low,
    Intermediate,
    High,
    Full,
}

impl Resolution {
    /// Chaikin smoothing passes applied to traced coastlines.
    pub fn smoothing_passes(&self) -> u32 {
        match self {
            Resolution::Crude => 0,
            Resolution::Low => 1,
            Resolution::Intermediate => 2,
            Resolution::High => 3,
            Resolution::Full => 4,
        }
    }

    pub fn code(&self) -> char {
        match self {
            Resolution::Crude => 'c',
            Resolution::Low => 'l',
            Resolution::Intermediate => 'i',
            Resolution::High => 'h',
            Resolution::Full => 'f',
        }
    }
}

impl FromStr for Resolution {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "c" | "crude" => Ok(Resolution::Crude),
            "l" | "low" => Ok(Resolution::Low),
            "i" | "intermediate" => Ok(Resolution::Intermediate),
            "h" | "high" => Ok(Resolution::High),
            "f" | "full" => Ok(Resolution::Full),
            other => Err(format!(
                "unknown resolution '{}', expected one of c, l, i, h, f",
                other
            )),
        }
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
