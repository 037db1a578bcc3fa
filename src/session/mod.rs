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

//! Per-folder session persistence.
//!
//! Each playlist folder carries a hidden sidecar file holding the last played
//! track, the playhead position within it, and the volume. The
//! [`SessionStore`] owns the in-memory [`SessionDocument`] for the active
//! folder and exposes failure-tolerant accessors over it.
//!
//! A sidecar that is missing, unreadable or malformed is never fatal. The
//! error is returned for logging and the store continues with an empty
//! document, so playback starts from the first track.
//!
//! # Volume
//!
//! Volume is a user preference rather than a property of a folder, but it is
//! stored per folder. When a newly loaded folder has no volume recorded, the
//! volume of the previous folder is carried into the new in-memory document.

pub(crate) mod document;
pub(crate) mod time;
pub(crate) mod track_ref;

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use log::debug;
use serde_json::{Map, Value};
use thiserror::Error;

pub(crate) use document::SessionDocument;
pub(crate) use time::MediaTime;
pub(crate) use track_ref::TrackRef;

/// Name of the sidecar file inside a playlist folder.
pub(crate) const SIDECAR_FILE: &str = ".3000.json";

const SIDECAR_TEMP_FILE: &str = ".3000.json.tmp";

#[derive(Debug, Error)]
pub(crate) enum SessionError {
    #[error("no session file at {}", .0.display())]
    NotFound(PathBuf),

    #[error("failed to access session file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed session file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to serialize session: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl SessionError {
    /// A folder without a sidecar is the normal state for a folder that has
    /// never been played.
    pub(crate) fn is_not_found(&self) -> bool {
        matches!(self, SessionError::NotFound(_))
    }
}

#[derive(Debug, Default)]
pub(crate) struct SessionStore {
    document: SessionDocument,
}

impl SessionStore {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn sidecar_path(folder: &Path) -> PathBuf {
        folder.join(SIDECAR_FILE)
    }

    /// Replaces the in-memory document with the sidecar of `folder`.
    ///
    /// On success, and when the folder simply has no sidecar yet, the
    /// previous volume is carried into the new document if it records none.
    /// Any other failure leaves an empty document with no carried values.
    ///
    /// # Errors
    ///
    /// Returns the read or parse failure. Callers are expected to log it and
    /// carry on with the empty document.
    pub(crate) fn load(&mut self, folder: &Path) -> Result<(), SessionError> {
        let carried_volume = self.volume_level();

        match read_document(&Self::sidecar_path(folder)) {
            Ok(document) => {
                self.document = document;
                self.carry_volume(carried_volume);
                Ok(())
            }
            Err(e) if e.is_not_found() => {
                self.document = SessionDocument::default();
                self.carry_volume(carried_volume);
                Err(e)
            }
            Err(e) => {
                self.document = SessionDocument::default();
                Err(e)
            }
        }
    }

    /// Writes `document` to the sidecar of `folder`, replacing any existing
    /// file.
    ///
    /// The document is written to a temporary file first and renamed into
    /// place, so a failed write never truncates the previous sidecar.
    ///
    /// # Errors
    ///
    /// Returns an error if the document cannot be serialized or the folder is
    /// not writable.
    pub(crate) fn save(folder: &Path, document: &SessionDocument) -> Result<(), SessionError> {
        let data = serde_json::to_vec(document)?;

        let temp_path = folder.join(SIDECAR_TEMP_FILE);
        let path = Self::sidecar_path(folder);

        fs::write(&temp_path, data).map_err(|source| SessionError::Io {
            path: temp_path.clone(),
            source,
        })?;

        fs::rename(&temp_path, &path).map_err(|source| {
            let _ = fs::remove_file(&temp_path);
            SessionError::Io {
                path: path.clone(),
                source,
            }
        })?;

        debug!("Saved session to {}", path.display());

        Ok(())
    }

    pub(crate) fn document(&self) -> &SessionDocument {
        &self.document
    }

    pub(crate) fn last_track(&self) -> Option<TrackRef> {
        self.document.last_track.as_deref().and_then(TrackRef::parse)
    }

    pub(crate) fn set_last_track(&mut self, track_id: &str) {
        self.document.last_track = Some(track_id.to_string());
    }

    /// Removes the last track from the in-memory document only.
    pub(crate) fn clear_last_track(&mut self) {
        self.document.last_track = None;
    }

    /// The stored volume, clamped to `[0.0, 1.0]`.
    pub(crate) fn volume_level(&self) -> Option<f32> {
        self.document
            .volume_level
            .filter(|v| v.is_finite())
            .map(|v| v.clamp(0.0, 1.0))
    }

    pub(crate) fn set_volume_level(&mut self, volume: f32) {
        self.document.volume_level = Some(volume.clamp(0.0, 1.0));
    }

    /// The saved playhead position, if the document holds both its seconds
    /// and a valid timescale.
    pub(crate) fn playback_position(&self) -> Option<MediaTime> {
        self.document
            .playback_time
            .and_then(|time| time.to_media_time())
    }

    pub(crate) fn set_playback_position(&mut self, time: MediaTime) {
        self.document.playback_time = Some(time.into());
    }

    fn carry_volume(&mut self, volume: Option<f32>) {
        if self.document.volume_level.is_none() {
            self.document.volume_level = volume;
        }
    }
}

fn read_document(path: &Path) -> Result<SessionDocument, SessionError> {
    let data = fs::read(path).map_err(|source| match source.kind() {
        io::ErrorKind::NotFound => SessionError::NotFound(path.to_path_buf()),
        _ => SessionError::Io {
            path: path.to_path_buf(),
            source,
        },
    })?;

    let parse_error = |source| SessionError::Parse {
        path: path.to_path_buf(),
        source,
    };

    // Decoding through a map rejects anything that is not a JSON object.
    let map: Map<String, Value> = serde_json::from_slice(&data).map_err(parse_error)?;
    serde_json::from_value(Value::Object(map)).map_err(parse_error)
}
