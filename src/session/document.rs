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

//! The persisted session document.
//!
//! Every field is optional and decoded leniently. The file is user editable,
//! so a field with an unexpected shape decodes as absent rather than failing
//! the whole document. Unknown keys are ignored and are not written back.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::session::time::MediaTime;

const TIME_SCALE_KEY: &str = "timeScale";
const SECONDS_KEY: &str = "seconds";

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub(crate) struct SessionDocument {
    #[serde(
        rename = "LastTrack",
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_string"
    )]
    pub(crate) last_track: Option<String>,

    #[serde(
        rename = "PlaybackTime",
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_playback_time"
    )]
    pub(crate) playback_time: Option<PlaybackTime>,

    #[serde(
        rename = "VolumeLevel",
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_volume"
    )]
    pub(crate) volume_level: Option<f32>,
}

/// A playhead position as stored on disk: seconds plus the timescale the
/// position was sampled at.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub(crate) struct PlaybackTime {
    #[serde(rename = "timeScale")]
    pub(crate) time_scale: i64,
    pub(crate) seconds: f64,
}

impl PlaybackTime {
    /// Returns `None` if the timescale does not fit a valid [`MediaTime`].
    pub(crate) fn to_media_time(self) -> Option<MediaTime> {
        let timescale = i32::try_from(self.time_scale).ok()?;
        MediaTime::from_seconds(self.seconds, timescale)
    }
}

impl From<MediaTime> for PlaybackTime {
    fn from(time: MediaTime) -> Self {
        Self {
            time_scale: i64::from(time.timescale()),
            seconds: time.seconds(),
        }
    }
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        _ => None,
    })
}

fn lenient_volume<'de, D>(deserializer: D) -> Result<Option<f32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(as_number(&value).map(|v| v as f32))
}

// Both sub-fields must be present, otherwise there is no saved position.
fn lenient_playback_time<'de, D>(deserializer: D) -> Result<Option<PlaybackTime>, D::Error>
where
    D: Deserializer<'de>,
{
    let Value::Object(map) = Value::deserialize(deserializer)? else {
        return Ok(None);
    };

    let time_scale = map.get(TIME_SCALE_KEY).and_then(as_number);
    let seconds = map.get(SECONDS_KEY).and_then(as_number);

    Ok(match (time_scale, seconds) {
        (Some(time_scale), Some(seconds)) => Some(PlaybackTime {
            time_scale: time_scale.trunc() as i64,
            seconds,
        }),
        _ => None,
    })
}

/// Accepts any JSON number, or a string holding one.
fn as_number(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    number.filter(|n| n.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> SessionDocument {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn all_fields_are_optional() {
        assert_eq!(parse("{}"), SessionDocument::default());
    }

    #[test]
    fn reads_sidecar_keys() {
        let document = parse(
            r#"{
                "LastTrack": "02 Song.mp3",
                "PlaybackTime": { "timeScale": 600, "seconds": 12.5 },
                "VolumeLevel": 0.25
            }"#,
        );

        assert_eq!(document.last_track.as_deref(), Some("02 Song.mp3"));
        assert_eq!(
            document.playback_time,
            Some(PlaybackTime {
                time_scale: 600,
                seconds: 12.5
            })
        );
        assert_eq!(document.volume_level, Some(0.25));
    }

    #[test]
    fn volume_accepts_any_numeric_type() {
        assert_eq!(parse(r#"{"VolumeLevel": 1}"#).volume_level, Some(1.0));
        assert_eq!(parse(r#"{"VolumeLevel": "0.5"}"#).volume_level, Some(0.5));
        assert_eq!(parse(r#"{"VolumeLevel": true}"#).volume_level, None);
        assert_eq!(parse(r#"{"VolumeLevel": null}"#).volume_level, None);
    }

    #[test]
    fn partial_playback_time_is_no_position() {
        assert_eq!(parse(r#"{"PlaybackTime": {"seconds": 3.0}}"#).playback_time, None);
        assert_eq!(parse(r#"{"PlaybackTime": {"timeScale": 600}}"#).playback_time, None);
        assert_eq!(parse(r#"{"PlaybackTime": 3.0}"#).playback_time, None);
    }

    #[test]
    fn wrongly_typed_track_is_absent() {
        let document = parse(r#"{"LastTrack": 42, "VolumeLevel": 0.7}"#);
        assert_eq!(document.last_track, None);
        assert_eq!(document.volume_level, Some(0.7));
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let document = parse(r#"{"Shuffle": true, "VolumeLevel": 0.1}"#);
        assert_eq!(document.volume_level, Some(0.1));
    }

    #[test]
    fn non_object_content_is_rejected() {
        assert!(serde_json::from_str::<SessionDocument>("42").is_err());
        assert!(serde_json::from_str::<SessionDocument>("not json").is_err());
    }

    #[test]
    fn unset_fields_are_not_written() {
        let document = SessionDocument {
            volume_level: Some(0.5),
            ..Default::default()
        };

        assert_eq!(serde_json::to_string(&document).unwrap(), r#"{"VolumeLevel":0.5}"#);
    }

    #[test]
    fn writes_position_with_timescale() {
        let document = SessionDocument {
            playback_time: Some(MediaTime::new(1_200, 600).unwrap().into()),
            ..Default::default()
        };

        assert_eq!(
            serde_json::to_string(&document).unwrap(),
            r#"{"PlaybackTime":{"timeScale":600,"seconds":2.0}}"#
        );
    }
}
