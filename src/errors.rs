// errors.rs
// Error kinds surfaced to the host and the FIFO queue that carries them

use parking_lot::Mutex;
use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

use crate::events::SubscriberId;
use crate::particle::ParticleId;

/// Precondition violations. These are the only failures returned directly.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SimError {
    #[error("unknown group: {0}")]
    UnknownGroup(String),

    #[error("unknown particle: {0:?}")]
    UnknownParticle(ParticleId),

    #[error("subscriber {0:?} is not registered")]
    NotRegistered(SubscriberId),

    #[error("mass must be positive, got {0}")]
    NonPositiveMass(f64),
}

/// Tag of an expected, recoverable failure.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Input,
    Saving,
    Loading,
    Code,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            ErrorKind::Input => "Input-Error",
            ErrorKind::Saving => "Saving-Error",
            ErrorKind::Loading => "Loading-Error",
            ErrorKind::Code => "Code-Error",
        };
        f.write_str(tag)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SimErrorRecord {
    pub kind: ErrorKind,
    pub message: String,
}

impl fmt::Display for SimErrorRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

/// Shared FIFO of error records. Clones refer to the same queue so the UI
/// thread can drain what the stepping thread (or a code worker) pushed.
#[derive(Clone, Default)]
pub struct ErrorQueue {
    inner: Arc<Mutex<VecDeque<SimErrorRecord>>>,
}

impl ErrorQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, kind: ErrorKind, message: impl Into<String>) {
        let record = SimErrorRecord { kind, message: message.into() };
        log::debug!("queued {}", record);
        self.inner.lock().push_back(record);
    }

    /// Remove and return every queued record, oldest first.
    pub fn drain(&self) -> Vec<SimErrorRecord> {
        self.inner.lock().drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }
}
