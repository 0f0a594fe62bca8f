use bevy::prelude::*;
use thiserror::Error;

/// Identifies one load cycle. Entities spawned for a load carry it so late
/// callbacks can be matched against the session.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LoadGeneration(pub u64);

/// A callback arrived for a generation the session no longer accepts.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("callback for generation {generation} dropped (current: {current:?})")]
pub struct StaleCallback {
    pub generation: u64,
    pub current: Option<u64>,
}

/// Hands out generation tokens and decides which callbacks are still wanted.
///
/// Only the most recent generation is accepted, and nothing is accepted once
/// the gate is closed on unmount.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct GenerationGate {
    counter: u64,
    open: bool,
}

impl GenerationGate {
    /// Start a new generation. Every earlier token becomes stale.
    pub fn begin(&mut self) -> LoadGeneration {
        self.counter += 1;
        self.open = true;
        LoadGeneration(self.counter)
    }

    /// Reject everything until the next `begin`.
    pub fn close(&mut self) {
        self.counter += 1;
        self.open = false;
    }

    pub fn current(&self) -> Option<LoadGeneration> {
        self.open.then_some(LoadGeneration(self.counter))
    }

    pub fn admit(&self, generation: LoadGeneration) -> Result<(), StaleCallback> {
        match self.current() {
            Some(current) if current == generation => Ok(()),
            current => Err(StaleCallback {
                generation: generation.0,
                current: current.map(|c| c.0),
            }),
        }
    }
}
