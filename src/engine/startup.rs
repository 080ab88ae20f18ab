// Fire-once startup gate
//
// Sprite loading happens outside the simulation. Whichever comes first,
// the "assets ready" signal or the fallback deadline, opens the gate; every
// later signal is ignored so initialisation never runs twice.

use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    /// Waiting for assets
    Pending,
    /// Opened by the ready signal
    Ready,
    /// Opened by the fallback deadline
    TimedOut,
}

#[derive(Debug)]
pub struct StartupGate {
    state: GateState,
    fallback_after: Duration,
}

impl StartupGate {
    pub fn new(fallback_after: Duration) -> Self {
        Self {
            state: GateState::Pending,
            fallback_after,
        }
    }

    pub fn state(&self) -> GateState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.state != GateState::Pending
    }

    /// Assets reported ready. Returns true only if this call opened the gate.
    pub fn signal_ready(&mut self) -> bool {
        if self.is_open() {
            log::debug!("Ready signal after gate opened ({:?}), ignoring", self.state);
            return false;
        }
        self.state = GateState::Ready;
        true
    }

    /// Check the fallback deadline. Returns true only if this call opened the gate.
    pub fn poll_fallback(&mut self, elapsed: Duration) -> bool {
        if self.is_open() || elapsed < self.fallback_after {
            return false;
        }
        log::warn!(
            "Assets not ready after {:?}, starting anyway",
            self.fallback_after
        );
        self.state = GateState::TimedOut;
        true
    }
}
