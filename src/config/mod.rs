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

//! Application configuration.
//!
//! This module manages the application configuration file. Settings that
//! belong to a playlist folder live in that folder's session file instead;
//! this file only holds preferences that apply across folders.

use std::{env, path::PathBuf};

use log::LevelFilter;
use serde::{Deserialize, Serialize};

const CONFIG_NAME: &str = "folderplay";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub version: u32,
    /// The most recently opened playlist folder, reopened on start.
    pub last_folder: Option<PathBuf>,
    /// Volume for folders that record none, before any folder supplied one.
    pub default_volume: f32,
    pub volume_step: f32,
    /// Minimum number of seconds between playhead saves while playing.
    pub save_interval_secs: u64,
    pub extensions: Vec<String>,
    /// Text file receiving the now playing track, for streaming overlays.
    pub now_playing_file: Option<PathBuf>,
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            version: 1,
            last_folder: None,
            default_volume: 1.0,
            volume_step: 0.01,
            save_interval_secs: 5,
            extensions: vec!["mp3".to_string(), "m4a".to_string()],
            now_playing_file: Some(env::temp_dir().join("now-playing.txt")),
            log_level: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// The configured log level, falling back to `info` if it is not
    /// recognised.
    pub fn log_level_filter(&self) -> LevelFilter {
        self.log_level.parse().unwrap_or(LevelFilter::Info)
    }
}

pub fn load_config() -> AppConfig {
    confy::load(CONFIG_NAME, None).unwrap_or_default()
}

pub fn save_config(cfg: &AppConfig) -> Result<(), confy::ConfyError> {
    confy::store(CONFIG_NAME, None, cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = AppConfig::default();
        assert_eq!(config.default_volume, 1.0);
        assert_eq!(config.volume_step, 0.01);
        assert_eq!(config.extensions, ["mp3", "m4a"]);
        assert_eq!(config.last_folder, None);
    }

    #[test]
    fn log_level_parsing() {
        let mut config = AppConfig::default();
        assert_eq!(config.log_level_filter(), LevelFilter::Info);

        config.log_level = "DEBUG".to_string();
        assert_eq!(config.log_level_filter(), LevelFilter::Debug);

        config.log_level = "chatty".to_string();
        assert_eq!(config.log_level_filter(), LevelFilter::Info);
    }
}
