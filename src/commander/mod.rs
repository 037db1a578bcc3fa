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

//! Command-line input logic.
//!
//! This module implements the parsing of the commands typed into the player,
//! one per line, dispatching a corresponding application event for each
//! command submitted.

use std::{path::PathBuf, sync::mpsc::Sender};

use anyhow::{Context, Result, bail};

use crate::events::AppEvent;

pub(crate) const HELP: &str = "\
Commands:
  o PATH   open a playlist folder
  p        play / pause
  s        stop
  n        next track
  b        back to the previous track
  r        random track
  j N      jump to track N
  v X      set volume (0.0 - 1.0)
  vu, vd   volume up / down
  m        mute / unmute
  l        loop the current track on / off
  i        show what is playing
  t        list tracks
  h        show this help
  q        quit";

/// Parses one line of input and sends the matching event.
///
/// Blank input is ignored.
///
/// # Errors
///
/// Returns an error for unknown commands, malformed arguments, or if the
/// event channel has closed.
pub(crate) fn run_command(buffer: &str, event_tx: &Sender<AppEvent>) -> Result<()> {
    let buffer = buffer.trim();
    let parts: Vec<&str> = buffer.split_whitespace().collect();

    let event = match parts.as_slice() {
        [] => return Ok(()),

        ["q" | "quit"] => AppEvent::ExitApplication,

        ["o" | "open", _, ..] => {
            let path = buffer
                .split_once(char::is_whitespace)
                .map(|(_, path)| path.trim())
                .unwrap_or_default();
            AppEvent::OpenFolder(PathBuf::from(path))
        }
        ["o" | "open"] => bail!("Missing folder path"),

        ["p" | "play" | "pause"] => AppEvent::TogglePause,
        ["s" | "stop"] => AppEvent::Stop,

        ["n" | "next"] => AppEvent::Next,
        ["b" | "back"] => AppEvent::Previous,
        ["r" | "random"] => AppEvent::Random,
        ["j" | "jump", number] => AppEvent::Jump(parse_track_number(number)?),

        ["v" | "volume", volume] => AppEvent::SetVolume(parse_volume(volume)?),
        ["vu"] => AppEvent::VolumeUp,
        ["vd"] => AppEvent::VolumeDown,
        ["m" | "mute"] => AppEvent::ToggleMute,

        ["l" | "loop"] => AppEvent::ToggleLoop,

        ["i" | "info"] => AppEvent::ShowStatus,
        ["t" | "tracks"] => AppEvent::ShowTracks,
        ["h" | "help" | "?"] => AppEvent::Help,

        [cmd, ..] => bail!("Unknown command '{cmd}', type h for help"),
    };

    event_tx.send(event).context("Event channel closed")?;

    Ok(())
}

/// Track numbers are typed 1-based and returned as a playlist index.
fn parse_track_number(number: &str) -> Result<usize> {
    match number.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n - 1),
        _ => bail!("'{number}' is not a track number"),
    }
}

fn parse_volume(volume: &str) -> Result<f32> {
    match volume.parse::<f32>() {
        Ok(v) if (0.0..=1.0).contains(&v) => Ok(v),
        _ => bail!("Volume must be between 0.0 and 1.0, got '{volume}'"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::mpsc;

    fn parse(buffer: &str) -> Result<Option<AppEvent>> {
        let (event_tx, event_rx) = mpsc::channel();
        run_command(buffer, &event_tx)?;
        Ok(event_rx.try_recv().ok())
    }

    #[test]
    fn navigation_commands() {
        assert_eq!(parse("n").unwrap(), Some(AppEvent::Next));
        assert_eq!(parse("back").unwrap(), Some(AppEvent::Previous));
        assert_eq!(parse(" r ").unwrap(), Some(AppEvent::Random));
        assert_eq!(parse("j 3").unwrap(), Some(AppEvent::Jump(2)));
    }

    #[test]
    fn jump_needs_a_positive_number() {
        assert!(parse("j 0").is_err());
        assert!(parse("j x").is_err());
    }

    #[test]
    fn volume_commands() {
        assert_eq!(parse("v 0.25").unwrap(), Some(AppEvent::SetVolume(0.25)));
        assert_eq!(parse("vu").unwrap(), Some(AppEvent::VolumeUp));
        assert_eq!(parse("vd").unwrap(), Some(AppEvent::VolumeDown));
        assert!(parse("v 2").is_err());
        assert!(parse("v loud").is_err());
    }

    #[test]
    fn open_keeps_spaces_in_path() {
        assert_eq!(
            parse("o /music/Some  Album").unwrap(),
            Some(AppEvent::OpenFolder(PathBuf::from("/music/Some  Album")))
        );
        assert!(parse("o").is_err());
    }

    #[test]
    fn blank_input_is_ignored() {
        assert_eq!(parse("   ").unwrap(), None);
    }

    #[test]
    fn unknown_command_is_an_error() {
        let err = parse("dance now").unwrap_err();
        assert!(err.to_string().contains("dance"));
    }
}
