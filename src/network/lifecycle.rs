//! Server lifecycle
//!
//! `Idle -> Running -> Stopped`, where `Stopped` is terminal.

use std::sync::atomic::{AtomicU8, Ordering};

/// Lifecycle states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum State {
    Idle = 0,
    Running = 1,
    Stopped = 2,
}

/// Shared lifecycle flag
///
/// Read by the acceptor and every connection worker.
#[derive(Debug)]
pub struct Lifecycle {
    state: AtomicU8,
}

impl Lifecycle {
    pub fn new() -> Self {
        Self {
            state: AtomicU8::new(State::Idle as u8),
        }
    }

    pub fn state(&self) -> State {
        match self.state.load(Ordering::Acquire) {
            0 => State::Idle,
            1 => State::Running,
            _ => State::Stopped,
        }
    }

    pub fn is_running(&self) -> bool {
        self.state() == State::Running
    }

    /// `Idle -> Running`; false if the server already started or stopped
    pub fn start(&self) -> bool {
        self.state
            .compare_exchange(
                State::Idle as u8,
                State::Running as u8,
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .is_ok()
    }

    /// Move to `Stopped`; true only for the call that made the transition
    pub fn stop(&self) -> bool {
        self.state.swap(State::Stopped as u8, Ordering::AcqRel) != State::Stopped as u8
    }
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self::new()
    }
}
