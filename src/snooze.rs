//! Snooze delay values, as offered by the snooze panel's pickers.

use crate::error::{AdMomentError, Result};
use std::fmt;
use std::str::FromStr;

/// Minutes offered by the snooze picker.
pub const SELECTABLE_MINUTES: [u32; 7] = [0, 1, 2, 3, 4, 5, 6];
/// Seconds offered by the snooze picker.
pub const SELECTABLE_SECONDS: [u32; 2] = [0, 30];

/// A validated snooze duration: minutes in 0..=6, seconds 0 or 30.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SnoozeDelay {
    minutes: u32,
    seconds: u32,
}

impl SnoozeDelay {
    pub fn try_new(minutes: u32, seconds: u32) -> Result<Self> {
        if !SELECTABLE_MINUTES.contains(&minutes) {
            return Err(AdMomentError::InvalidInput(format!(
                "snooze minutes must be 0-6, got {}",
                minutes
            )));
        }
        if !SELECTABLE_SECONDS.contains(&seconds) {
            return Err(AdMomentError::InvalidInput(format!(
                "snooze seconds must be 0 or 30, got {}",
                seconds
            )));
        }
        Ok(SnoozeDelay { minutes, seconds })
    }

    pub fn minutes(&self) -> u32 {
        self.minutes
    }

    pub fn seconds(&self) -> u32 {
        self.seconds
    }

    pub fn millis(&self) -> u64 {
        u64::from(self.minutes) * 60_000 + u64::from(self.seconds) * 1_000
    }
}

impl Default for SnoozeDelay {
    /// The panel's initial picker selection: 0 min 30 s.
    fn default() -> Self {
        SnoozeDelay {
            minutes: 0,
            seconds: 30,
        }
    }
}

impl fmt::Display for SnoozeDelay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{:02}", self.minutes, self.seconds)
    }
}

impl FromStr for SnoozeDelay {
    type Err = AdMomentError;

    /// Parse "m:ss" (e.g. "2:30") as used on the command line.
    fn from_str(s: &str) -> Result<Self> {
        let (m, sec) = s
            .split_once(':')
            .ok_or_else(|| AdMomentError::InvalidInput(format!("expected m:ss, got '{}'", s)))?;
        let minutes: u32 = m
            .parse()
            .map_err(|_| AdMomentError::InvalidInput(format!("bad minutes in '{}'", s)))?;
        let seconds: u32 = sec
            .parse()
            .map_err(|_| AdMomentError::InvalidInput(format!("bad seconds in '{}'", s)))?;
        SnoozeDelay::try_new(minutes, seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn millis_adds_minutes_and_seconds() {
        let delay = SnoozeDelay::try_new(2, 30).unwrap();
        assert_eq!(delay.millis(), 150_000);
    }

    #[test]
    fn rejects_out_of_range_minutes() {
        assert!(SnoozeDelay::try_new(7, 0).is_err());
    }

    #[test]
    fn rejects_non_picker_seconds() {
        assert!(SnoozeDelay::try_new(1, 15).is_err());
        assert!(SnoozeDelay::try_new(1, 59).is_err());
    }

    #[test]
    fn zero_delay_is_allowed() {
        let delay = SnoozeDelay::try_new(0, 0).unwrap();
        assert_eq!(delay.millis(), 0);
    }

    #[test]
    fn default_matches_panel_initial_selection() {
        assert_eq!(SnoozeDelay::default().millis(), 30_000);
    }

    #[test]
    fn parses_and_displays_m_ss() {
        let delay: SnoozeDelay = "6:30".parse().unwrap();
        assert_eq!(delay.minutes(), 6);
        assert_eq!(delay.seconds(), 30);
        assert_eq!(delay.to_string(), "6:30");
        assert!("1:15".parse::<SnoozeDelay>().is_err());
        assert!("ten".parse::<SnoozeDelay>().is_err());
    }
}
