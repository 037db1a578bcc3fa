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

use std::{
    path::{Path, PathBuf},
    time::{Duration, Instant},
};

use log::{error, info, warn};

use crate::{
    App, commander,
    config::save_config,
    nowplaying::write_now_playing,
    player::PlayerState,
    playlist::Playlist,
    session::MediaTime,
    util::format::format_time,
};

pub(super) fn handle_input(app: &mut App, line: &str) {
    if let Err(e) = commander::run_command(line, &app.event_tx) {
        println!("{e:#}");
    }
}

pub(super) fn handle_open_folder(app: &mut App, folder: &Path) {
    let playlist = match Playlist::scan(folder, &app.config.extensions) {
        Ok(playlist) => playlist,
        Err(e) => {
            warn!("{e:#}");
            println!("Cannot open {}: {e:#}", folder.display());
            return;
        }
    };

    let folder = playlist.folder().to_path_buf();
    info!("Opening playlist {} ({} tracks)", folder.display(), playlist.len());

    app.transport.stop();
    let resume = app.assembler.open_folder(playlist);
    app.transport.set_volume(app.assembler.volume());

    remember_folder(app, folder.clone());

    match resume {
        Some(resume) => start_current_track(app, resume.position),
        None => println!("No playable tracks in {}", folder.display()),
    }
}

pub(super) fn handle_toggle_pause(app: &mut App) {
    if app.assembler.current_track().is_none() {
        println!("Nothing to play");
        return;
    }

    match app.transport.state() {
        PlayerState::Stopped => start_current_track(app, MediaTime::ZERO),
        PlayerState::Playing | PlayerState::Paused => {
            if app.transport.toggle_pause() == PlayerState::Paused {
                app.assembler.record_position(app.transport.position());
                save_now(app);
            }
            print_status(app);
        }
    }
}

pub(super) fn handle_stop(app: &mut App) {
    app.transport.stop();
    app.assembler.record_position(MediaTime::ZERO);
    save_now(app);
    print_status(app);
}

pub(super) fn handle_next(app: &mut App) {
    if app.assembler.next().is_some() {
        start_current_track(app, MediaTime::ZERO);
    } else {
        end_of_playlist(app);
    }
}

pub(super) fn handle_previous(app: &mut App) {
    if app.assembler.back().is_some() {
        start_current_track(app, MediaTime::ZERO);
    } else {
        println!("No previous track");
    }
}

pub(super) fn handle_random(app: &mut App) {
    if app.assembler.random().is_some() {
        start_current_track(app, MediaTime::ZERO);
    } else {
        println!("Nothing to play");
    }
}

pub(super) fn handle_jump(app: &mut App, index: usize) {
    if app.assembler.jump_to(index).is_some() {
        start_current_track(app, MediaTime::ZERO);
    } else {
        println!(
            "No track {}, the playlist has {}",
            index + 1,
            app.assembler.track_count()
        );
    }
}

pub(super) fn handle_set_volume(app: &mut App, volume: f32) {
    let volume = app.assembler.set_volume(volume);
    app.transport.set_volume(volume);
    println!("Volume {:.0}%", volume * 100.0);
}

pub(super) fn handle_step_volume(app: &mut App, direction: f32) {
    let volume = app.assembler.volume() + direction * app.config.volume_step;
    handle_set_volume(app, volume);
}

pub(super) fn handle_toggle_mute(app: &mut App) {
    if app.transport.toggle_mute() {
        println!("Muted");
    } else {
        println!("Unmuted");
    }
}

pub(super) fn handle_toggle_loop(app: &mut App) {
    if app.assembler.toggle_looping() {
        println!("Looping the current track");
    } else {
        println!("Looping off");
    }
}

/// Samples the transport, saving the playhead at most once per configured
/// interval, and moves on when the current track has finished.
pub(super) fn handle_tick(app: &mut App) {
    if app.transport.state() != PlayerState::Playing {
        return;
    }

    if app.transport.is_finished() {
        handle_track_finished(app);
        return;
    }

    app.assembler.record_position(app.transport.position());

    let interval = Duration::from_secs(app.config.save_interval_secs);
    if app.last_save.elapsed() >= interval {
        save_now(app);
    }
}

pub(super) fn print_status(app: &App) {
    let Some(track) = app.assembler.current_track() else {
        println!("Nothing playing");
        return;
    };

    let state = match app.transport.state() {
        PlayerState::Playing => "Playing",
        PlayerState::Paused => "Paused",
        PlayerState::Stopped => "Stopped",
    };

    let length = track
        .duration
        .map(|d| format!(" / {}", format_time(d.as_secs())))
        .unwrap_or_default();

    let mut flags = String::new();
    if app.assembler.is_looping() {
        flags.push_str(" [loop]");
    }
    if app.transport.is_muted() {
        flags.push_str(" [muted]");
    }

    println!(
        "{} {}/{}: {} {}{} vol {:.0}%{}",
        state,
        app.assembler.current_index() + 1,
        app.assembler.track_count(),
        track.display_name(),
        app.transport.position(),
        length,
        app.transport.volume() * 100.0,
        flags
    );
}

pub(super) fn print_tracks(app: &App) {
    let Some(playlist) = app.assembler.playlist() else {
        println!("No playlist open");
        return;
    };

    let current = app.assembler.current_index();
    for (index, track) in playlist.tracks().iter().enumerate() {
        let marker = if index == current { '>' } else { ' ' };
        println!("{marker} {:>3}. {}", index + 1, track.display_name());
    }
}

pub(super) fn print_help() {
    println!("{}", commander::HELP);
}

fn handle_track_finished(app: &mut App) {
    if app.assembler.is_looping() {
        if app.assembler.replay().is_some() {
            start_current_track(app, MediaTime::ZERO);
        }
    } else {
        handle_next(app);
    }
}

/// Playing past the last track wraps back to the first one and stops there.
fn end_of_playlist(app: &mut App) {
    app.transport.stop();
    if app.assembler.jump_to(0).is_some() {
        println!("End of playlist");
    } else {
        println!("Nothing to play");
    }
}

fn start_current_track(app: &mut App, start: MediaTime) {
    let Some(track) = app.assembler.current_track() else {
        return;
    };

    app.transport.load(track.duration, start);
    app.last_save = Instant::now();

    if let Some(path) = &app.config.now_playing_file {
        if let Err(e) = write_now_playing(path, track) {
            warn!("{e:#}");
        }
    }

    print_status(app);
}

fn save_now(app: &mut App) {
    app.assembler.save();
    app.last_save = Instant::now();
}

fn remember_folder(app: &mut App, folder: PathBuf) {
    if app.config.last_folder.as_ref() == Some(&folder) {
        return;
    }

    app.config.last_folder = Some(folder);
    if let Err(e) = save_config(&app.config) {
        error!("Failed to save configuration: {e}");
    }
}
