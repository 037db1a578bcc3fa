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

//! Playback transport.
//!
//! Decoding and audio output are provided by the host. This module keeps the
//! transport side of the player: which state it is in, where the playhead is,
//! and when the loaded track has played to its end. The playhead advances
//! with wall-clock time while playing and is reported as [`MediaTime`] at the
//! default timescale.

use std::time::{Duration, Instant};

use crate::session::{MediaTime, time::DEFAULT_TIMESCALE};

/// Represents the current playback status of the transport.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum PlayerState {
    Playing,
    Paused,
    Stopped,
}

#[derive(Debug)]
pub(crate) struct Transport {
    state: PlayerState,
    /// When the current stretch of playing began, `None` unless playing.
    started_at: Option<Instant>,
    /// Playhead at `started_at`, or the frozen playhead when not playing.
    offset: Duration,
    duration: Option<Duration>,
    volume: f32,
    muted: bool,
}

impl Transport {
    pub(crate) fn new(volume: f32) -> Self {
        Self {
            state: PlayerState::Stopped,
            started_at: None,
            offset: Duration::ZERO,
            duration: None,
            volume: volume.clamp(0.0, 1.0),
            muted: false,
        }
    }

    pub(crate) fn state(&self) -> PlayerState {
        self.state
    }

    /// Loads a track of the given length and starts playing it from `start`.
    pub(crate) fn load(&mut self, duration: Option<Duration>, start: MediaTime) {
        self.load_at(duration, start, Instant::now());
    }

    pub(crate) fn toggle_pause(&mut self) -> PlayerState {
        self.toggle_pause_at(Instant::now())
    }

    pub(crate) fn pause(&mut self) {
        self.pause_at(Instant::now());
    }

    pub(crate) fn stop(&mut self) {
        self.state = PlayerState::Stopped;
        self.started_at = None;
        self.offset = Duration::ZERO;
    }

    pub(crate) fn position(&self) -> MediaTime {
        self.position_at(Instant::now())
    }

    /// Whether the loaded track has played to its end. Tracks of unknown
    /// length never finish on their own.
    pub(crate) fn is_finished(&self) -> bool {
        self.is_finished_at(Instant::now())
    }

    pub(crate) fn volume(&self) -> f32 {
        self.volume
    }

    pub(crate) fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
    }

    pub(crate) fn is_muted(&self) -> bool {
        self.muted
    }

    /// Toggles the output between muted and unmuted. The volume setting is
    /// kept while muted.
    pub(crate) fn toggle_mute(&mut self) -> bool {
        self.muted = !self.muted;
        self.muted
    }

    fn load_at(&mut self, duration: Option<Duration>, start: MediaTime, now: Instant) {
        self.duration = duration;
        self.offset = start.to_duration();
        if let Some(duration) = duration {
            self.offset = self.offset.min(duration);
        }
        self.started_at = Some(now);
        self.state = PlayerState::Playing;
    }

    fn toggle_pause_at(&mut self, now: Instant) -> PlayerState {
        match self.state {
            PlayerState::Playing => self.pause_at(now),
            PlayerState::Paused | PlayerState::Stopped => {
                self.started_at = Some(now);
                self.state = PlayerState::Playing;
            }
        }
        self.state
    }

    fn pause_at(&mut self, now: Instant) {
        if self.state == PlayerState::Playing {
            self.offset = self.elapsed_at(now);
            self.started_at = None;
            self.state = PlayerState::Paused;
        }
    }

    fn elapsed_at(&self, now: Instant) -> Duration {
        let elapsed = self.offset
            + self
                .started_at
                .map(|started_at| now.saturating_duration_since(started_at))
                .unwrap_or_default();

        match self.duration {
            Some(duration) => elapsed.min(duration),
            None => elapsed,
        }
    }

    fn position_at(&self, now: Instant) -> MediaTime {
        MediaTime::from_duration(self.elapsed_at(now), DEFAULT_TIMESCALE)
    }

    fn is_finished_at(&self, now: Instant) -> bool {
        self.state == PlayerState::Playing
            && self
                .duration
                .is_some_and(|duration| self.elapsed_at(now) >= duration)
    }
}
