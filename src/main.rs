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

//! # Folder-based audio player.
//!
//! Plays the audio files of a folder as a playlist and remembers, per
//! folder, which track was playing, where, and at what volume.
//!
//! The session state lives in a hidden file inside each playlist folder, so
//! reopening a folder resumes where it was left, even after the application
//! restarts or other folders were played in between.
//!
//! ## Architecture
//!
//! * The **Main Thread** runs the event loop and is the single owner of the
//!   playback session.
//! * A **Session Writer** thread performs all session file writes, so slow
//!   disks never stall the event loop.
//! * **Input** and **Tick** threads feed typed commands and periodic
//!   transport samples into the event loop via `std::sync::mpsc` channels.
//!
//! Audio output itself is provided by the host; this binary drives the
//! session through a command-line front end.

mod assembler;
mod commander;
mod config;
mod cursor;
mod events;
mod nowplaying;
mod persist;
mod player;
mod playlist;
mod session;
mod util;

use anyhow::{Context, Result};
use std::{
    env, io,
    path::PathBuf,
    sync::mpsc::{self, Receiver, Sender},
    thread,
    time::{Duration, Instant},
};

use crate::{
    assembler::SessionAssembler,
    config::AppConfig,
    cursor::NavigationCursor,
    events::{AppEvent, process_events},
    persist::SessionWriter,
    player::Transport,
};

/// Application state.
struct App {
    pub config: AppConfig,

    pub event_tx: Sender<AppEvent>,
    pub event_rx: Receiver<AppEvent>,

    pub assembler: SessionAssembler,
    pub transport: Transport,

    /// When the playhead was last written to the session file.
    pub last_save: Instant,
}

impl App {
    /// Create a new instance of application state.
    pub fn new(config: AppConfig) -> Result<Self> {
        let (event_tx, event_rx) = mpsc::channel();

        let writer = SessionWriter::spawn()?;
        let assembler =
            SessionAssembler::new(NavigationCursor::new(), writer, config.default_volume);
        let transport = Transport::new(assembler.volume());

        Ok(Self {
            config,
            event_tx,
            event_rx,
            assembler,
            transport,
            last_save: Instant::now(),
        })
    }
}

/// The entry point of the application.
///
/// The folder to play is taken from the first argument, or else the folder
/// played last time.
fn main() -> Result<()> {
    let config = config::load_config();

    init_logging(&config);

    let folder = env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .or_else(|| config.last_folder.clone());

    let mut app = App::new(config).context("Failed to initialise application")?;

    let res = run(&mut app, folder);

    res.context("Application error occurred")
}

/// Installs the logger and a panic hook that routes panics through it.
///
/// The level comes from the configuration and can be overridden with
/// `RUST_LOG`.
fn init_logging(config: &AppConfig) {
    let mut clog = colog::default_builder();
    clog.filter(None, config.log_level_filter());
    clog.parse_env("RUST_LOG");
    clog.init();

    std::panic::set_hook(Box::new(|panic_info| {
        let current_thread = thread::current();
        let thread_name = current_thread.name().unwrap_or("unnamed");
        log::error!("panic in thread '{}': {}", thread_name, panic_info);
    }));
}

/// Starts the input and tick threads and enters the main event loop.
///
/// This function spawns two long-running background threads:
/// * An input thread that forwards each line typed on stdin.
/// * A tick thread to sample the playback transport.
///
/// If `folder` is given it is opened before any input is handled.
///
/// # Errors
///
/// Returns an error if the event processing loop encounters an unrecoverable
/// application error.
fn run(app: &mut App, folder: Option<PathBuf>) -> Result<()> {
    // Forward typed lines, and quit once input is closed.
    let tx_input = app.event_tx.clone();
    thread::spawn(move || {
        for line in io::stdin().lines() {
            let Ok(line) = line else { break };
            if tx_input.send(AppEvent::Input(line)).is_err() {
                return;
            }
        }
        let _ = tx_input.send(AppEvent::ExitApplication);
    });

    // Sample the transport for playhead saves and track completion.
    let tx_tick = app.event_tx.clone();
    thread::spawn(move || {
        loop {
            if tx_tick.send(AppEvent::Tick).is_err() {
                break;
            }
            thread::sleep(Duration::from_millis(250));
        }
    });

    match folder {
        Some(folder) => app.event_tx.send(AppEvent::OpenFolder(folder))?,
        None => println!("Open a folder of audio files with: o PATH (h for help)"),
    }

    process_events(app)
}
