//! Intents: requested state changes from drivers running off the tick thread.
//!
//! Enemy AI workers and input sources never touch the grid or the entity
//! collections. They post intents here, and the tick thread drains and
//! applies them during the update phase.

use std::sync::mpsc::{self, Receiver, Sender};

use super::entity::{Direction, EntityId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Face a direction and advance one step
    Move(Direction),
    /// Face a direction in place
    Turn(Direction),
    /// Fire along the current facing
    Fire,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Intent {
    pub tank: EntityId,
    pub action: Action,
}

impl Intent {
    pub fn new(tank: EntityId, action: Action) -> Self {
        Self { tank, action }
    }
}

/// Sending half handed to drivers
pub type IntentSender = Sender<Intent>;

/// Per-engine inbox, drained once per tick
#[derive(Debug)]
pub struct IntentInbox {
    tx: Sender<Intent>,
    rx: Receiver<Intent>,
}

impl Default for IntentInbox {
    fn default() -> Self {
        let (tx, rx) = mpsc::channel();
        Self { tx, rx }
    }
}

impl IntentInbox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sender(&self) -> IntentSender {
        self.tx.clone()
    }

    /// Everything posted since the last drain, in arrival order
    pub fn drain(&self) -> Vec<Intent> {
        self.rx.try_iter().collect()
    }
}
