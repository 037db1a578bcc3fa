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

//! Playback session assembly.
//!
//! The [`SessionAssembler`] is the single owner of the active session: the
//! playlist, the navigation cursor and the session store of the open folder.
//! It is the bounds-checking boundary for navigation. The cursor itself
//! accepts any index, while every move made through the assembler is checked
//! against the live track count.
//!
//! Track changes are saved straight away. Playhead positions are recorded in
//! memory on every tick and written when the caller asks for a save, which
//! lets the event loop throttle periodic writes. Anything unsaved is written
//! before another folder is opened and on [`SessionAssembler::close`].

use log::{debug, info, warn};
use rand::{Rng, rngs::StdRng};

use crate::{
    cursor::NavigationCursor,
    persist::SessionWriter,
    playlist::{Playlist, Track},
    session::{MediaTime, SessionStore},
};

/// Where playback of a newly opened folder should start.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct ResumePoint {
    pub(crate) index: usize,
    pub(crate) track_id: String,
    pub(crate) position: MediaTime,
}

pub(crate) struct SessionAssembler<R = StdRng> {
    store: SessionStore,
    cursor: NavigationCursor<R>,
    writer: SessionWriter,
    playlist: Option<Playlist>,
    default_volume: f32,
    dirty: bool,
}

impl<R: Rng> SessionAssembler<R> {
    pub(crate) fn new(cursor: NavigationCursor<R>, writer: SessionWriter, default_volume: f32) -> Self {
        Self {
            store: SessionStore::new(),
            cursor,
            writer,
            playlist: None,
            default_volume: default_volume.clamp(0.0, 1.0),
            dirty: false,
        }
    }

    /// Makes `playlist` the active session and works out where to resume.
    ///
    /// Unsaved state of the previous folder is written first. The cursor is
    /// then reset and moved to the last played track if the folder's session
    /// names a track that is still in the playlist, resuming at its saved
    /// position. Otherwise playback starts at the first track.
    ///
    /// Returns `None` if the playlist has no tracks.
    pub(crate) fn open_folder(&mut self, playlist: Playlist) -> Option<ResumePoint> {
        self.save_if_dirty();
        self.writer.flush();

        match self.store.load(playlist.folder()) {
            Ok(()) => info!("Loaded session for {}", playlist.folder().display()),
            Err(e) if e.is_not_found() => debug!("{e}, starting a new session"),
            Err(e) => warn!("Ignoring session: {e}"),
        }

        self.cursor.reset();

        let resume_index = self.store.last_track().and_then(|reference| {
            let index = playlist.position_of(&reference);
            if index.is_none() {
                debug!("Last track {} is no longer in the playlist", reference.path().display());
            }
            index
        });

        let position = match resume_index {
            Some(index) => {
                self.cursor.jump_to(index);
                self.store.playback_position().unwrap_or(MediaTime::ZERO)
            }
            None => {
                self.store.clear_last_track();
                MediaTime::ZERO
            }
        };

        self.playlist = Some(playlist);

        let track_id = self.current_track()?.id.clone();
        self.cursor.update_playback(Some(position), &track_id);

        info!("Resuming {} at {}", track_id, position);

        Some(ResumePoint {
            index: self.cursor.current_index(),
            track_id,
            position,
        })
    }

    pub(crate) fn playlist(&self) -> Option<&Playlist> {
        self.playlist.as_ref()
    }

    pub(crate) fn track_count(&self) -> usize {
        self.playlist.as_ref().map_or(0, Playlist::len)
    }

    pub(crate) fn current_index(&self) -> usize {
        self.cursor.current_index()
    }

    /// The track under the cursor, or `None` if the cursor has moved past the
    /// end of the playlist.
    pub(crate) fn current_track(&self) -> Option<&Track> {
        self.playlist.as_ref()?.get(self.cursor.current_index())
    }

    /// Advances to the next track.
    ///
    /// Returns `None` when this moves past the last track. The cursor is left
    /// past the end so the caller can choose what end of playlist means.
    pub(crate) fn next(&mut self) -> Option<&Track> {
        self.cursor.next();
        self.enter_current_track()
    }

    /// Returns to the previously played track, if it is still in range.
    pub(crate) fn back(&mut self) -> Option<&Track> {
        if self.cursor.previous_index() >= self.track_count() {
            return None;
        }

        self.cursor.back();
        self.enter_current_track()
    }

    pub(crate) fn random(&mut self) -> Option<&Track> {
        let count = self.track_count();
        if count == 0 {
            return None;
        }

        self.cursor.random(count);
        self.enter_current_track()
    }

    /// Moves to `index`, leaving the cursor untouched if it is out of range.
    pub(crate) fn jump_to(&mut self, index: usize) -> Option<&Track> {
        if index >= self.track_count() {
            return None;
        }

        self.cursor.jump_to(index);
        self.enter_current_track()
    }

    /// Starts the current track again from the beginning.
    pub(crate) fn replay(&mut self) -> Option<&Track> {
        self.enter_current_track()
    }

    pub(crate) fn is_looping(&self) -> bool {
        self.cursor.is_looping()
    }

    pub(crate) fn toggle_looping(&mut self) -> bool {
        self.cursor.toggle_looping()
    }

    /// Records the playhead of the current track without saving it.
    pub(crate) fn record_position(&mut self, time: MediaTime) {
        let Some(track_id) = self.current_track().map(|track| track.id.clone()) else {
            return;
        };

        self.cursor.update_playback(Some(time), &track_id);
        self.sync_document();
        self.dirty = true;
    }

    /// The saved volume of the session, or the configured default.
    pub(crate) fn volume(&self) -> f32 {
        self.store.volume_level().unwrap_or(self.default_volume)
    }

    /// Stores and saves a new volume, returning it clamped to `[0.0, 1.0]`.
    ///
    /// With no folder open the volume is only held in memory, and is carried
    /// into the next folder that has none of its own.
    pub(crate) fn set_volume(&mut self, volume: f32) -> f32 {
        self.store.set_volume_level(volume);
        self.save();
        self.volume()
    }

    /// Queues a save of the session document.
    pub(crate) fn save(&mut self) {
        if let Some(playlist) = &self.playlist {
            self.writer.save(playlist.folder(), self.store.document().clone());
            self.dirty = false;
        }
    }

    /// Writes any unsaved state and waits for the writer to finish.
    pub(crate) fn close(&mut self) {
        self.save_if_dirty();
        self.writer.flush();
    }

    fn save_if_dirty(&mut self) {
        if self.dirty {
            self.save();
        }
    }

    fn enter_current_track(&mut self) -> Option<&Track> {
        let track_id = self.current_track()?.id.clone();

        self.cursor.update_playback(Some(MediaTime::ZERO), &track_id);
        self.sync_document();
        self.save();

        self.current_track()
    }

    /// Copies the cursor's last track and playhead into the document.
    fn sync_document(&mut self) {
        if !self.cursor.last_track().is_empty() {
            self.store.set_last_track(self.cursor.last_track());
        }
        if let Some(time) = self.cursor.last_time() {
            self.store.set_playback_position(time);
        }
    }
}
