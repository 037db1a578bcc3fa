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

//! Now playing text file.
//!
//! Streaming software can display the contents of a text file as an overlay.
//! Whenever a track starts, its display name is written to the configured
//! file.

use std::{fs, path::Path};

use anyhow::{Context, Result};

use crate::playlist::Track;

pub(crate) fn write_now_playing(path: &Path, track: &Track) -> Result<()> {
    fs::write(path, track.display_name())
        .with_context(|| format!("Failed to write now playing file {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::path::PathBuf;

    use tempfile::tempdir;

    #[test]
    fn writes_display_name() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("now-playing.txt");

        let mut track = Track::untagged(Path::new("/music"), PathBuf::from("/music/Song.mp3"));
        track.artist = Some("Artist".to_string());

        write_now_playing(&path, &track).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "Artist - Song");
    }

    #[test]
    fn reports_unwritable_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing").join("now-playing.txt");

        let track = Track::untagged(Path::new("/music"), PathBuf::from("/music/Song.mp3"));
        assert!(write_now_playing(&path, &track).is_err());
    }
}
