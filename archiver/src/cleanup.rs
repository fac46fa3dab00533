//! Component M: Ctrl-C driven removal of the in-progress output file.
//! Mirrors the original's `signal.NotifyContext` + cleanup goroutine.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

/// Registers a SIGINT/SIGTERM handler that removes `temp_path` before the
/// process exits. Returns an error only if a handler is already installed
/// (`ctrlc` allows at most one per process).
pub fn install(temp_path: PathBuf) -> Result<(), ctrlc::Error> {
    let temp_path = Arc::new(Mutex::new(Some(temp_path)));
    ctrlc::set_handler(move || {
        if let Ok(mut guard) = temp_path.lock() {
            if let Some(path) = guard.take() {
                let _ = std::fs::remove_file(&path);
            }
        }
        std::process::exit(130);
    })
}
