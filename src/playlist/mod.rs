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

//! Playlist folder scanning.
//!
//! A playlist is the set of playable files directly inside a folder, ordered
//! by file name. It uses `WalkDir` for the directory listing and `Lofty` to
//! read the title, artist and duration of each file.
//!
//! Files whose tags cannot be read still join the playlist, titled after
//! their file name, since the tags are only used for display.

use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{Context, Result};
use log::{debug, warn};
use lofty::{prelude::*, probe::Probe};
use walkdir::WalkDir;

use crate::session::TrackRef;

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Track {
    /// Path relative to the playlist folder, used as the persisted
    /// identifier.
    pub(crate) id: String,
    pub(crate) path: PathBuf,
    pub(crate) title: String,
    pub(crate) artist: Option<String>,
    pub(crate) duration: Option<Duration>,
}

impl Track {
    /// Builds a track for `path` without reading its tags.
    pub(crate) fn untagged(folder: &Path, path: PathBuf) -> Self {
        let id = path
            .strip_prefix(folder)
            .unwrap_or(&path)
            .to_string_lossy()
            .into_owned();

        let title = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| id.clone());

        Self {
            id,
            path,
            title,
            artist: None,
            duration: None,
        }
    }

    /// Whether `reference` names this track, either by its folder-relative
    /// identifier or by absolute path.
    pub(crate) fn matches(&self, reference: &TrackRef) -> bool {
        if reference.is_absolute() {
            self.path == reference.path()
        } else {
            Path::new(&self.id) == reference.path()
        }
    }

    pub(crate) fn display_name(&self) -> String {
        match &self.artist {
            Some(artist) => format!("{} - {}", artist, self.title),
            None => self.title.clone(),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub(crate) struct Playlist {
    folder: PathBuf,
    tracks: Vec<Track>,
}

impl Playlist {
    pub(crate) fn new(folder: PathBuf, tracks: Vec<Track>) -> Self {
        Self { folder, tracks }
    }

    /// Lists the playable files directly inside `folder`.
    ///
    /// Hidden files, including the session sidecar, are skipped. Extensions
    /// are compared case-insensitively.
    ///
    /// # Errors
    ///
    /// Returns an error if `folder` does not exist or is not a directory.
    pub(crate) fn scan(folder: &Path, extensions: &[String]) -> Result<Self> {
        let folder = fs::canonicalize(folder)
            .with_context(|| format!("Failed to resolve playlist folder {}", folder.display()))?;

        if !folder.is_dir() {
            anyhow::bail!("{} is not a folder", folder.display());
        }

        let tracks: Vec<Track> = WalkDir::new(&folder)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    warn!("Skipping unreadable entry in {}: {}", folder.display(), e);
                    None
                }
            })
            .filter(|entry| entry.file_type().is_file())
            .filter(|entry| !is_hidden(entry.path()))
            .filter(|entry| has_extension(entry.path(), extensions))
            .map(|entry| read_track(&folder, entry.into_path()))
            .collect();

        debug!("Found {} tracks in {}", tracks.len(), folder.display());

        Ok(Self::new(folder, tracks))
    }

    pub(crate) fn folder(&self) -> &Path {
        &self.folder
    }

    pub(crate) fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub(crate) fn len(&self) -> usize {
        self.tracks.len()
    }

    pub(crate) fn get(&self, index: usize) -> Option<&Track> {
        self.tracks.get(index)
    }

    pub(crate) fn position_of(&self, reference: &TrackRef) -> Option<usize> {
        self.tracks.iter().position(|track| track.matches(reference))
    }
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .is_some_and(|name| name.to_string_lossy().starts_with('.'))
}

fn has_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension().is_some_and(|ext| {
        let ext = ext.to_string_lossy();
        extensions.iter().any(|e| e.eq_ignore_ascii_case(&ext))
    })
}

fn read_track(folder: &Path, path: PathBuf) -> Track {
    let mut track = Track::untagged(folder, path);

    let tagged_file = match Probe::open(&track.path).and_then(|p| p.read()) {
        Ok(file) => file,
        Err(e) => {
            debug!("No tags for {}: {}", track.path.display(), e);
            return track;
        }
    };

    let duration = tagged_file.properties().duration();
    if !duration.is_zero() {
        track.duration = Some(duration);
    }

    if let Some(tag) = tagged_file.primary_tag().or_else(|| tagged_file.first_tag()) {
        if let Some(title) = tag.title() {
            track.title = title.to_string();
        }
        track.artist = tag.artist().map(|artist| artist.to_string());
    }

    track
}

#[cfg(test)]
mod tests {
    use super::*;

    use tempfile::tempdir;

    use crate::session::SIDECAR_FILE;

    fn extensions() -> Vec<String> {
        vec!["mp3".to_string(), "m4a".to_string()]
    }

    fn touch(dir: &Path, name: &str) {
        fs::write(dir.join(name), b"not really audio").unwrap();
    }

    #[test]
    fn lists_playable_files_in_name_order() {
        let dir = tempdir().unwrap();
        touch(dir.path(), "b.mp3");
        touch(dir.path(), "a.M4A");
        touch(dir.path(), "c.txt");
        touch(dir.path(), ".hidden.mp3");
        touch(dir.path(), SIDECAR_FILE);
        fs::create_dir(dir.path().join("nested")).unwrap();
        touch(&dir.path().join("nested"), "d.mp3");

        let playlist = Playlist::scan(dir.path(), &extensions()).unwrap();
        let ids: Vec<&str> = playlist.tracks().iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, ["a.M4A", "b.mp3"]);
    }

    #[test]
    fn untagged_files_are_titled_after_file_name() {
        let dir = tempdir().unwrap();
        touch(dir.path(), "01 Opening.mp3");

        let playlist = Playlist::scan(dir.path(), &extensions()).unwrap();
        let track = playlist.get(0).unwrap();
        assert_eq!(track.title, "01 Opening");
        assert_eq!(track.artist, None);
        assert_eq!(track.duration, None);
        assert_eq!(track.display_name(), "01 Opening");
    }

    #[test]
    fn empty_folder_gives_empty_playlist() {
        let dir = tempdir().unwrap();
        let playlist = Playlist::scan(dir.path(), &extensions()).unwrap();
        assert_eq!(playlist.len(), 0);
    }

    #[test]
    fn missing_folder_is_an_error() {
        let dir = tempdir().unwrap();
        assert!(Playlist::scan(&dir.path().join("missing"), &extensions()).is_err());
    }

    #[test]
    fn finds_tracks_by_relative_or_absolute_reference() {
        let dir = tempdir().unwrap();
        touch(dir.path(), "a.mp3");
        touch(dir.path(), "b.mp3");

        let playlist = Playlist::scan(dir.path(), &extensions()).unwrap();

        let relative = TrackRef::parse("b.mp3").unwrap();
        assert_eq!(playlist.position_of(&relative), Some(1));

        let absolute = playlist.folder().join("a.mp3");
        let absolute = TrackRef::parse(&absolute.to_string_lossy()).unwrap();
        assert_eq!(playlist.position_of(&absolute), Some(0));

        let unknown = TrackRef::parse("z.mp3").unwrap();
        assert_eq!(playlist.position_of(&unknown), None);
    }

    #[test]
    fn display_name_includes_artist() {
        let mut track = Track::untagged(Path::new("/music"), PathBuf::from("/music/x.mp3"));
        track.artist = Some("Band".to_string());
        assert_eq!(track.display_name(), "Band - x");
        assert_eq!(track.id, "x.mp3");
    }
}
