//! Cross-thread settings edits.
//!
//! A UI or control thread holds a [`SettingsSender`] and queues whole
//! [`Settings`] values. The simulation drains the queue at the start of
//! every step and applies each edit in arrival order through the remapper.

use crossbeam_channel::{Receiver, Sender, TrySendError};
use slime_core::Settings;

/// Capacity of the settings queue.
pub(crate) const INBOX_CAPACITY: usize = 64;

/// Why a settings edit could not be queued.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InboxError {
    /// The simulation has been dropped.
    Closed,
    /// The queue is full (back-pressure); retry after the next step.
    Full,
}

impl std::fmt::Display for InboxError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Closed => write!(f, "simulation has shut down"),
            Self::Full => write!(f, "settings queue full"),
        }
    }
}

impl std::error::Error for InboxError {}

/// Handle for queuing settings edits from any thread.
#[derive(Clone, Debug)]
pub struct SettingsSender {
    tx: Sender<Settings>,
}

impl SettingsSender {
    /// Queue `settings` for the next step. Never blocks.
    pub fn send(&self, settings: Settings) -> Result<(), InboxError> {
        self.tx.try_send(settings).map_err(|e| match e {
            TrySendError::Full(_) => InboxError::Full,
            TrySendError::Disconnected(_) => InboxError::Closed,
        })
    }
}

/// Receiving side, owned by the simulation.
#[derive(Debug)]
pub(crate) struct SettingsInbox {
    tx: Sender<Settings>,
    rx: Receiver<Settings>,
}

impl SettingsInbox {
    pub(crate) fn new() -> Self {
        let (tx, rx) = crossbeam_channel::bounded(INBOX_CAPACITY);
        Self { tx, rx }
    }

    pub(crate) fn sender(&self) -> SettingsSender {
        SettingsSender {
            tx: self.tx.clone(),
        }
    }

    /// Everything queued so far, oldest first.
    pub(crate) fn drain(&self) -> Vec<Settings> {
        self.rx.try_iter().collect()
    }
}
