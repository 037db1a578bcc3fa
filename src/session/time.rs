// Copyright (C) 2026  Caprica Software Limited
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Rational media time.
//!
//! Playhead positions are kept as a value over a timescale rather than as
//! floating point seconds, so that a position restored from a session file
//! lands on the same tick it was saved from.

use std::{fmt, time::Duration};

use crate::util::format::format_time;

/// Ticks per second used for positions sampled from the transport.
pub(crate) const DEFAULT_TIMESCALE: i32 = 600;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) struct MediaTime {
    value: i64,
    timescale: i32,
}

impl MediaTime {
    pub(crate) const ZERO: MediaTime = MediaTime {
        value: 0,
        timescale: DEFAULT_TIMESCALE,
    };

    /// Creates a time of `value / timescale` seconds.
    ///
    /// Returns `None` for a non-positive timescale.
    pub(crate) fn new(value: i64, timescale: i32) -> Option<Self> {
        (timescale > 0).then_some(Self { value, timescale })
    }

    /// Converts floating point seconds to the nearest tick of `timescale`.
    ///
    /// Returns `None` if `seconds` is not finite or the timescale is not
    /// positive.
    pub(crate) fn from_seconds(seconds: f64, timescale: i32) -> Option<Self> {
        if !seconds.is_finite() || timescale <= 0 {
            return None;
        }

        let value = (seconds * f64::from(timescale)).round();
        if value.abs() >= i64::MAX as f64 {
            return None;
        }

        Self::new(value as i64, timescale)
    }

    pub(crate) fn from_duration(duration: Duration, timescale: i32) -> Self {
        let timescale = timescale.max(1);
        let ticks = duration.as_nanos() * timescale as u128 / 1_000_000_000;

        Self {
            value: i64::try_from(ticks).unwrap_or(i64::MAX),
            timescale,
        }
    }

    pub(crate) fn timescale(&self) -> i32 {
        self.timescale
    }

    pub(crate) fn seconds(&self) -> f64 {
        self.value as f64 / f64::from(self.timescale)
    }

    /// Negative times clamp to zero.
    pub(crate) fn to_duration(&self) -> Duration {
        Duration::from_secs_f64(self.seconds().max(0.0))
    }
}

impl Default for MediaTime {
    fn default() -> Self {
        Self::ZERO
    }
}

impl fmt::Display for MediaTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_time(self.to_duration().as_secs()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_non_positive_timescale() {
        assert_eq!(MediaTime::new(10, 0), None);
        assert_eq!(MediaTime::from_seconds(1.0, -600), None);
    }

    #[test]
    fn rejects_non_finite_seconds() {
        assert_eq!(MediaTime::from_seconds(f64::NAN, 600), None);
        assert_eq!(MediaTime::from_seconds(f64::INFINITY, 600), None);
    }

    #[test]
    fn converts_seconds_to_ticks() {
        let time = MediaTime::from_seconds(125.5, 600).unwrap();
        assert_eq!(time, MediaTime::new(75_300, 600).unwrap());
        assert_eq!(time.timescale(), 600);
        assert_eq!(time.seconds(), 125.5);
    }

    #[test]
    fn converts_duration_to_ticks() {
        let time = MediaTime::from_duration(Duration::from_millis(2_500), 600);
        assert_eq!(time, MediaTime::new(1_500, 600).unwrap());
        assert_eq!(time.to_duration(), Duration::from_millis(2_500));
    }

    #[test]
    fn displays_as_minutes_and_seconds() {
        let time = MediaTime::from_seconds(65.9, 600).unwrap();
        assert_eq!(time.to_string(), "01:05");
    }
}
