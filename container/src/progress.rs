//! Component H: a bounded, closeable counter sink shared by the writer and
//! reader paths to report bytes processed.

use std::sync::mpsc::{sync_channel, Receiver, SyncSender};
use std::sync::Mutex;

/// Reports running byte counts over a bounded channel. Writes after `close`
/// (or once the channel is full) are dropped rather than blocking — a slow
/// or absent consumer must never stall compression.
pub struct Progress {
    sender: Mutex<Option<SyncSender<u64>>>,
}

impl Progress {
    pub fn new(capacity: usize) -> (Self, Receiver<u64>) {
        let (tx, rx) = sync_channel(capacity);
        (
            Progress {
                sender: Mutex::new(Some(tx)),
            },
            rx,
        )
    }

    /// A progress sink that reports nothing and is never open.
    pub fn closed() -> Self {
        Progress {
            sender: Mutex::new(None),
        }
    }

    /// Reports `n` if the sink is open and has room; returns `false` without
    /// blocking if the sink is closed or the channel is full.
    pub fn write(&self, n: u64) -> bool {
        let guard = self.sender.lock().unwrap_or_else(|e| e.into_inner());
        match guard.as_ref() {
            Some(tx) => tx.try_send(n).is_ok(),
            None => false,
        }
    }

    pub fn is_open(&self) -> bool {
        let guard = self.sender.lock().unwrap_or_else(|e| e.into_inner());
        guard.is_some()
    }

    /// Idempotent: closing an already-closed sink is a no-op.
    pub fn close(&self) {
        let mut guard = self.sender.lock().unwrap_or_else(|e| e.into_inner());
        *guard = None;
    }
}

impl huffman::ProgressSink for Progress {
    fn report(&self, bytes: u64) {
        let _ = self.write(bytes);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_is_a_noop_once_closed() {
        let (progress, rx) = Progress::new(4);
        assert!(progress.write(1));
        progress.close();
        assert!(!progress.write(2));
        assert!(!progress.is_open());
        assert_eq!(rx.try_recv().ok(), Some(1));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn close_is_idempotent() {
        let progress = Progress::closed();
        assert!(!progress.is_open());
        progress.close();
        assert!(!progress.is_open());
    }
}
