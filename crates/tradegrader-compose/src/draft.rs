//! The two-sided trade under construction.

use std::time::Duration;

use tokio::sync::mpsc::UnboundedSender;
use tradegrader_core::model::{Side, TradeRequest};

use crate::autocomplete::AutocompleteController;
use crate::error::ValidationError;
use crate::events::{ComposerEvent, SlotAddress};
use crate::slots::SlotList;

/// Incoming and outgoing slot lists.
#[derive(Debug)]
pub struct TradeDraft {
    incoming: SlotList,
    outgoing: SlotList,
}

impl TradeDraft {
    /// Creates a draft with one empty slot per side.
    #[must_use]
    pub fn new(quiet: Duration, sink: &UnboundedSender<ComposerEvent>) -> Self {
        Self {
            incoming: SlotList::new(Side::Incoming, quiet, sink.clone()),
            outgoing: SlotList::new(Side::Outgoing, quiet, sink.clone()),
        }
    }

    /// Slot list for `side`.
    #[must_use]
    pub fn side(&self, side: Side) -> &SlotList {
        match side {
            Side::Incoming => &self.incoming,
            Side::Outgoing => &self.outgoing,
        }
    }

    /// Mutable slot list for `side`.
    pub fn side_mut(&mut self, side: Side) -> &mut SlotList {
        match side {
            Side::Incoming => &mut self.incoming,
            Side::Outgoing => &mut self.outgoing,
        }
    }

    /// Controller at `address`, if that slot still exists.
    pub fn controller_at(&mut self, address: SlotAddress) -> Option<&mut AutocompleteController> {
        self.side_mut(address.side).controller_by_key_mut(address.key)
    }

    /// Builds the grading request from the non-blank slot values.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] naming every side without a non-blank
    /// entry.
    pub fn to_request(&self) -> Result<TradeRequest, ValidationError> {
        let incoming_players = self.incoming.non_empty_values();
        let outgoing_players = self.outgoing.non_empty_values();

        let empty_sides: Vec<Side> = [
            (Side::Incoming, incoming_players.is_empty()),
            (Side::Outgoing, outgoing_players.is_empty()),
        ]
        .into_iter()
        .filter_map(|(side, empty)| empty.then_some(side))
        .collect();

        if empty_sides.is_empty() {
            Ok(TradeRequest {
                incoming_players,
                outgoing_players,
            })
        } else {
            Err(ValidationError { empty_sides })
        }
    }

    /// Tears down every slot on both sides.
    pub fn teardown(&mut self) {
        self.incoming.teardown_all();
        self.outgoing.teardown_all();
    }
}
