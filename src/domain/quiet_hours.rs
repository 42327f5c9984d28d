use std::{fmt, str::FromStr};

use chrono::NaiveTime;

/// Local-time window during which no check runs. `start` is inclusive,
/// `end` exclusive; a window with `start > end` wraps past midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuietHours {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl QuietHours {
    pub fn new(start: NaiveTime, end: NaiveTime) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, time: NaiveTime) -> bool {
        if self.start <= self.end {
            self.start <= time && time < self.end
        } else {
            time >= self.start || time < self.end
        }
    }
}

impl FromStr for QuietHours {
    type Err = String;

    /// Parses `HH:MM-HH:MM`.
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let (start, end) = raw
            .split_once('-')
            .ok_or_else(|| "expected HH:MM-HH:MM".to_string())?;
        let parse = |part: &str| {
            NaiveTime::parse_from_str(part.trim(), "%H:%M").map_err(|err| err.to_string())
        };
        Ok(Self::new(parse(start)?, parse(end)?))
    }
}

impl fmt::Display for QuietHours {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start.format("%H:%M"), self.end.format("%H:%M"))
    }
}
