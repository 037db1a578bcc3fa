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

//! References to the last played track.
//!
//! Session files written by this application store a path relative to the
//! playlist folder. Older files may instead hold an absolute `file://` URL,
//! which is decoded back into a filesystem path.

use std::path::{Path, PathBuf};

const FILE_SCHEME: &str = "file://";

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct TrackRef(PathBuf);

impl TrackRef {
    /// Parses a stored track reference.
    ///
    /// Returns `None` for blank values, URLs with a scheme other than
    /// `file`, and `file` URLs that do not decode to an absolute path.
    pub(crate) fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        if value.is_empty() || value.contains('\0') {
            return None;
        }

        if let Some(rest) = value.strip_prefix(FILE_SCHEME) {
            let decoded = urlencoding::decode(rest).ok()?;
            let path = decoded.strip_prefix("localhost").unwrap_or(&*decoded);
            if !path.starts_with('/') {
                return None;
            }
            return Some(Self(PathBuf::from(path)));
        }

        if value.contains("://") {
            return None;
        }

        Some(Self(PathBuf::from(value)))
    }

    pub(crate) fn path(&self) -> &Path {
        &self.0
    }

    pub(crate) fn is_absolute(&self) -> bool {
        self.0.has_root()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_relative_path() {
        let track = TrackRef::parse("disc 1/01 intro.mp3").unwrap();
        assert_eq!(track.path(), Path::new("disc 1/01 intro.mp3"));
        assert!(!track.is_absolute());
    }

    #[test]
    fn parses_file_url() {
        let track = TrackRef::parse("file:///Users/me/Music/01%20Intro.m4a").unwrap();
        assert_eq!(track.path(), Path::new("/Users/me/Music/01 Intro.m4a"));
        assert!(track.is_absolute());
    }

    #[test]
    fn parses_file_url_with_localhost() {
        let track = TrackRef::parse("file://localhost/music/a.mp3").unwrap();
        assert_eq!(track.path(), Path::new("/music/a.mp3"));
    }

    #[test]
    fn rejects_invalid_references() {
        assert_eq!(TrackRef::parse(""), None);
        assert_eq!(TrackRef::parse("   "), None);
        assert_eq!(TrackRef::parse("https://example.com/a.mp3"), None);
        assert_eq!(TrackRef::parse("file://relative/a.mp3"), None);
        assert_eq!(TrackRef::parse("a\0b.mp3"), None);
    }
}
