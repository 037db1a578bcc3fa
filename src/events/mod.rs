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

//! Application events and the main event loop.
//!
//! Every input reaches the application as an [`AppEvent`] on a single
//! channel: command lines typed by the user, the periodic tick that samples
//! the transport, and the events the command parser derives from input. The
//! loop is the only owner of the session, so no state is shared between
//! threads.

mod handlers;
use handlers::*;

use std::path::PathBuf;

use anyhow::Result;

use crate::App;

#[derive(Debug, PartialEq)]
pub(crate) enum AppEvent {
    Input(String),

    OpenFolder(PathBuf),

    TogglePause,
    Stop,

    Next,
    Previous,
    Random,
    Jump(usize),

    SetVolume(f32),
    VolumeUp,
    VolumeDown,
    ToggleMute,

    ToggleLoop,

    ShowStatus,
    ShowTracks,
    Help,

    Tick,

    ExitApplication,
}

/// Runs the main application loop.
///
/// This function loops until a quit event is received or the event channel
/// is closed, then writes out the session before returning.
pub(crate) fn process_events(app: &mut App) -> Result<()> {
    while let Ok(event) = app.event_rx.recv() {
        if matches!(event, AppEvent::ExitApplication) {
            break;
        }

        match event {
            AppEvent::Input(line) => handle_input(app, &line),
            AppEvent::OpenFolder(folder) => handle_open_folder(app, &folder),
            AppEvent::TogglePause => handle_toggle_pause(app),
            AppEvent::Stop => handle_stop(app),
            AppEvent::Next => handle_next(app),
            AppEvent::Previous => handle_previous(app),
            AppEvent::Random => handle_random(app),
            AppEvent::Jump(index) => handle_jump(app, index),
            AppEvent::SetVolume(volume) => handle_set_volume(app, volume),
            AppEvent::VolumeUp => handle_step_volume(app, 1.0),
            AppEvent::VolumeDown => handle_step_volume(app, -1.0),
            AppEvent::ToggleMute => handle_toggle_mute(app),
            AppEvent::ToggleLoop => handle_toggle_loop(app),
            AppEvent::ShowStatus => print_status(app),
            AppEvent::ShowTracks => print_tracks(app),
            AppEvent::Help => print_help(),
            AppEvent::Tick => handle_tick(app),
            AppEvent::ExitApplication => {}
        }
    }

    app.transport.pause();
    app.assembler.record_position(app.transport.position());
    app.assembler.close();

    Ok(())
}
