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

//! Background session persistence.
//!
//! Sidecar writes are blocking file I/O, so they are handed to a dedicated
//! worker thread rather than performed on the event loop. The worker takes
//! requests from a single channel and handles them strictly in order, which
//! makes it the one place where session files are written.
//!
//! Saves queued for the same folder are coalesced so that only the latest
//! document is written. A [`SessionWriter::flush`] blocks until every earlier
//! request has been written; it is issued before a new folder is loaded and
//! before exit, so a load never observes a stale save landing after it.

use std::{
    path::{Path, PathBuf},
    sync::mpsc::{self, Receiver, Sender},
    thread,
};

use anyhow::{Context, Result};
use log::{debug, warn};

use crate::session::{SessionDocument, SessionStore};

#[derive(Debug)]
enum WriterRequest {
    Save {
        folder: PathBuf,
        document: SessionDocument,
    },
    Flush(Sender<()>),
}

/// A handle to the session writer thread.
///
/// The worker exits once every handle has been dropped and the queue is
/// drained.
#[derive(Clone, Debug)]
pub(crate) struct SessionWriter {
    request_tx: Sender<WriterRequest>,
}

impl SessionWriter {
    /// Spawns the writer thread and returns a handle to it.
    ///
    /// # Errors
    ///
    /// Returns an error if the thread cannot be spawned.
    pub(crate) fn spawn() -> Result<Self> {
        let (request_tx, request_rx) = mpsc::channel();

        thread::Builder::new()
            .name("session-writer".to_string())
            .spawn(move || session_writer_worker(request_rx))
            .context("Failed to spawn session writer")?;

        Ok(Self { request_tx })
    }

    /// Queues `document` to be written to the sidecar of `folder`.
    pub(crate) fn save(&self, folder: &Path, document: SessionDocument) {
        let request = WriterRequest::Save {
            folder: folder.to_path_buf(),
            document,
        };

        if self.request_tx.send(request).is_err() {
            warn!("Session writer has stopped, dropping save for {}", folder.display());
        }
    }

    /// Blocks until every previously queued save has been attempted.
    pub(crate) fn flush(&self) {
        let (reply_tx, reply_rx) = mpsc::channel();

        if self.request_tx.send(WriterRequest::Flush(reply_tx)).is_ok() {
            let _ = reply_rx.recv();
        }
    }
}

/// Waits for a request, then takes everything else already queued so that
/// repeated saves can be collapsed into one write per folder.
fn session_writer_worker(request_rx: Receiver<WriterRequest>) {
    while let Ok(request) = request_rx.recv() {
        let mut pending: Vec<(PathBuf, SessionDocument)> = Vec::new();

        for request in std::iter::once(request).chain(request_rx.try_iter()) {
            match request {
                WriterRequest::Save { folder, document } => {
                    match pending.iter().position(|(f, _)| *f == folder) {
                        Some(i) => pending[i].1 = document,
                        None => pending.push((folder, document)),
                    }
                }
                WriterRequest::Flush(reply_tx) => {
                    write_pending(&mut pending);
                    let _ = reply_tx.send(());
                }
            }
        }

        write_pending(&mut pending);
    }

    debug!("Session writer stopped");
}

fn write_pending(pending: &mut Vec<(PathBuf, SessionDocument)>) {
    for (folder, document) in pending.drain(..) {
        if let Err(e) = SessionStore::save(&folder, &document) {
            warn!("Session not saved: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use tempfile::tempdir;

    fn document_with_volume(volume: f32) -> SessionDocument {
        SessionDocument {
            volume_level: Some(volume),
            ..Default::default()
        }
    }

    fn stored(folder: &Path) -> SessionStore {
        let mut store = SessionStore::new();
        store.load(folder).unwrap();
        store
    }

    #[test]
    fn flush_waits_for_queued_saves() {
        let dir = tempdir().unwrap();
        let writer = SessionWriter::spawn().unwrap();

        writer.save(dir.path(), document_with_volume(0.3));
        writer.flush();

        assert_eq!(stored(dir.path()).volume_level(), Some(0.3));
    }

    #[test]
    fn latest_save_wins() {
        let dir = tempdir().unwrap();
        let writer = SessionWriter::spawn().unwrap();

        for volume in [0.1, 0.2, 0.3, 0.4] {
            writer.save(dir.path(), document_with_volume(volume));
        }
        writer.flush();

        assert_eq!(stored(dir.path()).volume_level(), Some(0.4));
    }

    #[test]
    fn saves_to_separate_folders_are_kept_apart() {
        let first = tempdir().unwrap();
        let second = tempdir().unwrap();
        let writer = SessionWriter::spawn().unwrap();

        writer.save(first.path(), document_with_volume(0.1));
        writer.save(second.path(), document_with_volume(0.9));
        writer.flush();

        assert_eq!(stored(first.path()).volume_level(), Some(0.1));
        assert_eq!(stored(second.path()).volume_level(), Some(0.9));
    }

    #[test]
    fn failed_save_does_not_stop_the_writer() {
        let dir = tempdir().unwrap();
        let writer = SessionWriter::spawn().unwrap();

        writer.save(&dir.path().join("missing"), document_with_volume(0.5));
        writer.flush();

        writer.save(dir.path(), document_with_volume(0.6));
        writer.flush();

        assert_eq!(stored(dir.path()).volume_level(), Some(0.6));
    }
}
