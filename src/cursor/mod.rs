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

//! Playlist navigation cursor.
//!
//! The cursor is a plain counter over a track list it does not own. It never
//! checks bounds: advancing past the last track, or jumping to an index that
//! does not exist, is detected and handled by the caller, which knows the
//! live track count.
//!
//! History is a single slot. Every move records the index it left, and
//! [`NavigationCursor::back`] returns to that index without updating the slot,
//! so stepping back twice in a row lands on the same track.

use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::session::MediaTime;

#[derive(Debug)]
pub(crate) struct NavigationCursor<R = StdRng> {
    current: usize,
    previous: usize,
    looping: bool,
    last_track: String,
    last_time: Option<MediaTime>,
    rng: R,
}

impl NavigationCursor<StdRng> {
    pub(crate) fn new() -> Self {
        Self::with_rng(StdRng::from_os_rng())
    }
}

impl<R: Rng> NavigationCursor<R> {
    /// Creates a cursor drawing random indices from `rng`.
    pub(crate) fn with_rng(rng: R) -> Self {
        Self {
            current: 0,
            previous: 0,
            looping: false,
            last_track: String::new(),
            last_time: None,
            rng,
        }
    }

    pub(crate) fn current_index(&self) -> usize {
        self.current
    }

    pub(crate) fn previous_index(&self) -> usize {
        self.previous
    }

    pub(crate) fn is_looping(&self) -> bool {
        self.looping
    }

    pub(crate) fn toggle_looping(&mut self) -> bool {
        self.looping = !self.looping;
        self.looping
    }

    /// Identifier of the track most recently passed to
    /// [`update_playback`](Self::update_playback), empty after a reset.
    pub(crate) fn last_track(&self) -> &str {
        &self.last_track
    }

    pub(crate) fn last_time(&self) -> Option<MediaTime> {
        self.last_time
    }

    pub(crate) fn next(&mut self) {
        self.previous = self.current;
        self.current += 1;
    }

    pub(crate) fn back(&mut self) {
        self.current = self.previous;
    }

    /// Moves to a uniformly chosen index in `0..upper_bound`.
    ///
    /// The new index may equal the current one. An `upper_bound` of zero
    /// leaves the cursor where it is.
    pub(crate) fn random(&mut self, upper_bound: usize) {
        if upper_bound == 0 {
            return;
        }

        self.previous = self.current;
        self.current = self.rng.random_range(0..upper_bound);
    }

    pub(crate) fn jump_to(&mut self, index: usize) {
        self.previous = self.current;
        self.current = index;
    }

    /// Returns to the first track and forgets the last played track.
    ///
    /// Both indices are zeroed, so a [`back`](Self::back) straight after a
    /// reset stays on the first track. The loop flag is a user setting and is
    /// kept.
    pub(crate) fn reset(&mut self) {
        self.current = 0;
        self.previous = 0;
        self.last_track.clear();
        self.last_time = None;
    }

    pub(crate) fn update_playback(&mut self, time: Option<MediaTime>, track: &str) {
        self.last_time = time;
        if self.last_track != track {
            self.last_track.clear();
            self.last_track.push_str(track);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cursor() -> NavigationCursor<StdRng> {
        NavigationCursor::with_rng(StdRng::seed_from_u64(3000))
    }

    #[test]
    fn next_advances_and_back_is_single_level() {
        let mut cursor = cursor();

        cursor.next();
        cursor.next();
        cursor.next();
        assert_eq!(cursor.current_index(), 3);
        assert_eq!(cursor.previous_index(), 2);

        cursor.back();
        assert_eq!(cursor.current_index(), 2);

        cursor.back();
        assert_eq!(cursor.current_index(), 2);
    }

    #[test]
    fn next_does_not_check_upper_bound() {
        let mut cursor = cursor();
        cursor.jump_to(usize::MAX - 1);
        cursor.next();
        assert_eq!(cursor.current_index(), usize::MAX);
    }

    #[test]
    fn jump_records_previous() {
        let mut cursor = cursor();
        cursor.jump_to(7);
        cursor.jump_to(2);
        assert_eq!(cursor.current_index(), 2);
        assert_eq!(cursor.previous_index(), 7);

        cursor.back();
        assert_eq!(cursor.current_index(), 7);
    }

    #[test]
    fn random_stays_in_bounds_and_is_roughly_uniform() {
        let mut cursor = cursor();
        let mut counts = [0usize; 10];

        for _ in 0..1000 {
            let before = cursor.current_index();
            cursor.random(10);
            assert_eq!(cursor.previous_index(), before);
            assert!(cursor.current_index() < 10);
            counts[cursor.current_index()] += 1;
        }

        // Chi-square against the uniform expectation of 100 per bucket. The
        // 0.999 quantile for 9 degrees of freedom is 27.88.
        let chi_square: f64 = counts
            .iter()
            .map(|&c| {
                let d = c as f64 - 100.0;
                d * d / 100.0
            })
            .sum();
        assert!(chi_square < 27.88, "chi-square {chi_square} for {counts:?}");
    }

    #[test]
    fn random_with_zero_bound_is_a_no_op() {
        let mut cursor = cursor();
        cursor.jump_to(4);
        cursor.random(0);
        assert_eq!(cursor.current_index(), 4);
        assert_eq!(cursor.previous_index(), 0);
    }

    #[test]
    fn reset_zeroes_both_indices() {
        let mut cursor = cursor();
        cursor.next();
        cursor.update_playback(MediaTime::new(600, 600), "01.mp3");

        cursor.reset();
        assert_eq!(cursor.current_index(), 0);
        assert_eq!(cursor.previous_index(), 0);
        assert_eq!(cursor.last_track(), "");
        assert_eq!(cursor.last_time(), None);

        cursor.back();
        assert_eq!(cursor.current_index(), 0);
    }

    #[test]
    fn reset_keeps_looping() {
        let mut cursor = cursor();
        assert!(cursor.toggle_looping());
        cursor.reset();
        assert!(cursor.is_looping());
    }

    #[test]
    fn update_playback_records_time_and_track() {
        let mut cursor = cursor();
        let time = MediaTime::new(1_800, 600);

        cursor.update_playback(time, "02.mp3");
        assert_eq!(cursor.last_track(), "02.mp3");
        assert_eq!(cursor.last_time(), time);
        assert_eq!(cursor.current_index(), 0);
    }
}
