//! Ordered slot list for one side of the trade.
//!
//! A side always has at least one slot. Each slot owns an
//! [`AutocompleteController`]; removing a slot tears its controller down so
//! no timer or late response can reach it afterwards.

use std::time::Duration;

use tokio::sync::mpsc::UnboundedSender;
use tracing::debug;
use tradegrader_core::model::Side;

use crate::autocomplete::AutocompleteController;
use crate::error::SlotError;
use crate::events::{ComposerEvent, SlotAddress, SlotKey};

/// Snapshot of one slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slot {
    /// Side the slot lives on.
    pub side: Side,
    /// Current position within the side.
    pub index: usize,
    /// Current text.
    pub text: String,
}

/// The slots of one side, in display order.
#[derive(Debug)]
pub struct SlotList {
    side: Side,
    controllers: Vec<AutocompleteController>,
    next_key: u64,
    quiet: Duration,
    sink: UnboundedSender<ComposerEvent>,
}

impl SlotList {
    /// Creates a list holding a single empty slot.
    #[must_use]
    pub fn new(side: Side, quiet: Duration, sink: UnboundedSender<ComposerEvent>) -> Self {
        let mut list = Self {
            side,
            controllers: Vec::new(),
            next_key: 0,
            quiet,
            sink,
        };
        list.push_empty();
        list
    }

    /// Side this list belongs to.
    #[must_use]
    pub fn side(&self) -> Side {
        self.side
    }

    /// Number of slots. Never zero.
    #[must_use]
    pub fn len(&self) -> usize {
        self.controllers.len()
    }

    /// Returns true if the side holds no slots.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.controllers.is_empty()
    }

    /// Snapshots of every slot, in order.
    #[must_use]
    pub fn slots(&self) -> Vec<Slot> {
        self.controllers
            .iter()
            .enumerate()
            .map(|(index, controller)| Slot {
                side: self.side,
                index,
                text: controller.text().to_owned(),
            })
            .collect()
    }

    /// Appends an empty slot and returns its index.
    pub fn add(&mut self) -> usize {
        self.push_empty();
        let index = self.controllers.len() - 1;
        debug!(side = %self.side, index, "slot added");
        index
    }

    /// Removes the slot at `index`.
    ///
    /// On a single-slot side the slot is cleared instead, so the side keeps
    /// one empty slot.
    ///
    /// # Errors
    ///
    /// Returns [`SlotError::OutOfRange`] if `index` does not exist.
    pub fn remove(&mut self, index: usize) -> Result<(), SlotError> {
        self.check(index)?;
        if self.controllers.len() == 1 {
            self.controllers[index].on_clear();
            debug!(side = %self.side, index, "last slot cleared instead of removed");
        } else {
            let mut removed = self.controllers.remove(index);
            removed.teardown();
            debug!(side = %self.side, index, remaining = self.controllers.len(), "slot removed");
        }
        Ok(())
    }

    /// Writes `text` into the slot without searching.
    ///
    /// # Errors
    ///
    /// Returns [`SlotError::OutOfRange`] if `index` does not exist.
    pub fn update(&mut self, index: usize, text: impl Into<String>) -> Result<(), SlotError> {
        self.controller_mut(index)?.set_text(text);
        Ok(())
    }

    /// Slot texts that contain something other than whitespace, in order.
    ///
    /// The values are returned as typed; only the emptiness check trims.
    #[must_use]
    pub fn non_empty_values(&self) -> Vec<String> {
        self.controllers
            .iter()
            .map(AutocompleteController::text)
            .filter(|text| !text.trim().is_empty())
            .map(str::to_owned)
            .collect()
    }

    /// Controller at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`SlotError::OutOfRange`] if `index` does not exist.
    pub fn controller(&self, index: usize) -> Result<&AutocompleteController, SlotError> {
        self.check(index)?;
        Ok(&self.controllers[index])
    }

    /// Mutable controller at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`SlotError::OutOfRange`] if `index` does not exist.
    pub fn controller_mut(&mut self, index: usize) -> Result<&mut AutocompleteController, SlotError> {
        self.check(index)?;
        Ok(&mut self.controllers[index])
    }

    /// Controller owning `key`, if the slot still exists.
    pub fn controller_by_key_mut(&mut self, key: SlotKey) -> Option<&mut AutocompleteController> {
        self.controllers
            .iter_mut()
            .find(|controller| controller.address().key == key)
    }

    /// Current position of the slot owning `key`.
    #[must_use]
    pub fn index_of(&self, key: SlotKey) -> Option<usize> {
        self.controllers
            .iter()
            .position(|controller| controller.address().key == key)
    }

    /// Iterates over the controllers in order.
    pub fn controllers(&self) -> impl Iterator<Item = &AutocompleteController> {
        self.controllers.iter()
    }

    /// Tears down every controller.
    pub fn teardown_all(&mut self) {
        for controller in &mut self.controllers {
            controller.teardown();
        }
    }

    fn push_empty(&mut self) {
        let address = SlotAddress {
            side: self.side,
            key: SlotKey(self.next_key),
        };
        self.next_key += 1;
        self.controllers.push(AutocompleteController::new(
            address,
            self.quiet,
            self.sink.clone(),
        ));
    }

    fn check(&self, index: usize) -> Result<(), SlotError> {
        if index < self.controllers.len() {
            Ok(())
        } else {
            Err(SlotError::OutOfRange {
                side: self.side,
                index,
                len: self.controllers.len(),
            })
        }
    }
}
