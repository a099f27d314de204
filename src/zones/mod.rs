//! Zones - where card instances live.
//!
//! Hand, deck, carrion, exile, and traps are ordered sequences. The field
//! is a fixed array of [`FIELD_SLOTS`] slots where an empty slot is a
//! distinct value, not absence from a sequence: the slot index identifies
//! where a creature sits and some effects care about it.
//!
//! Zones store [`InstanceId`]s; the instances themselves live in the
//! `GameState` arena. Movement between zones goes through `GameState`
//! helpers that keep the instance's `zone` field in sync.

use serde::{Deserialize, Serialize};

use crate::core::ids::InstanceId;

/// Number of creature slots on each player's field.
pub const FIELD_SLOTS: usize = 3;

/// The zones a card instance can occupy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ZoneKind {
    Hand,
    Deck,
    Carrion,
    Exile,
    Traps,
    Field,
    /// The single field-spell binding slot.
    FieldSpell,
}

/// One player's zones.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerZones {
    /// Hand, in draw order.
    pub hand: Vec<InstanceId>,
    /// Deck; the top is the end of the vec.
    pub deck: Vec<InstanceId>,
    /// Destroyed creatures, oldest first.
    pub carrion: Vec<InstanceId>,
    /// Removed from the game.
    pub exile: Vec<InstanceId>,
    /// Face-down armed traps.
    pub traps: Vec<InstanceId>,
    /// Fixed battlefield slots. `None` is an empty slot.
    pub field: [Option<InstanceId>; FIELD_SLOTS],
}

impl PlayerZones {
    /// Create empty zones.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The sequence zone for a kind, or `None` for the field.
    fn sequence(&self, kind: ZoneKind) -> Option<&Vec<InstanceId>> {
        match kind {
            ZoneKind::Hand => Some(&self.hand),
            ZoneKind::Deck => Some(&self.deck),
            ZoneKind::Carrion => Some(&self.carrion),
            ZoneKind::Exile => Some(&self.exile),
            ZoneKind::Traps => Some(&self.traps),
            ZoneKind::Field | ZoneKind::FieldSpell => None,
        }
    }

    fn sequence_mut(&mut self, kind: ZoneKind) -> Option<&mut Vec<InstanceId>> {
        match kind {
            ZoneKind::Hand => Some(&mut self.hand),
            ZoneKind::Deck => Some(&mut self.deck),
            ZoneKind::Carrion => Some(&mut self.carrion),
            ZoneKind::Exile => Some(&mut self.exile),
            ZoneKind::Traps => Some(&mut self.traps),
            ZoneKind::Field | ZoneKind::FieldSpell => None,
        }
    }

    /// Append to a sequence zone.
    ///
    /// Panics on `Field`/`FieldSpell`; field placement goes through
    /// [`PlayerZones::place_in_slot`] because slot choice is significant.
    pub fn push(&mut self, kind: ZoneKind, id: InstanceId) {
        self.sequence_mut(kind)
            .unwrap_or_else(|| panic!("{kind:?} is not a sequence zone"))
            .push(id);
    }

    /// Remove an id from a sequence zone. Returns whether it was present.
    pub fn remove(&mut self, kind: ZoneKind, id: InstanceId) -> bool {
        let Some(seq) = self.sequence_mut(kind) else {
            return self.remove_from_field(id).is_some();
        };
        if let Some(pos) = seq.iter().position(|&c| c == id) {
            seq.remove(pos);
            true
        } else {
            false
        }
    }

    /// Whether a sequence zone contains an id.
    #[must_use]
    pub fn contains(&self, kind: ZoneKind, id: InstanceId) -> bool {
        match self.sequence(kind) {
            Some(seq) => seq.contains(&id),
            None => self.slot_of(id).is_some(),
        }
    }

    /// Place a creature in a specific field slot.
    ///
    /// Returns false (and leaves the field unchanged) if the slot is taken
    /// or out of range.
    pub fn place_in_slot(&mut self, slot: usize, id: InstanceId) -> bool {
        match self.field.get_mut(slot) {
            Some(cell @ None) => {
                *cell = Some(id);
                true
            }
            _ => false,
        }
    }

    /// First empty field slot, if any.
    #[must_use]
    pub fn free_slot(&self) -> Option<usize> {
        self.field.iter().position(Option::is_none)
    }

    /// The slot a creature occupies.
    #[must_use]
    pub fn slot_of(&self, id: InstanceId) -> Option<usize> {
        self.field.iter().position(|&cell| cell == Some(id))
    }

    /// Remove a creature from the field, returning its slot.
    pub fn remove_from_field(&mut self, id: InstanceId) -> Option<usize> {
        let slot = self.slot_of(id)?;
        self.field[slot] = None;
        Some(slot)
    }

    /// Creatures on the field, in slot order.
    pub fn field_creatures(&self) -> impl Iterator<Item = InstanceId> + '_ {
        self.field.iter().filter_map(|&cell| cell)
    }

    /// Draw the top card of the deck.
    pub fn draw(&mut self) -> Option<InstanceId> {
        self.deck.pop()
    }

    /// Total instances across every zone (conservation checks).
    #[must_use]
    pub fn total_cards(&self) -> usize {
        self.hand.len()
            + self.deck.len()
            + self.carrion.len()
            + self.exile.len()
            + self.traps.len()
            + self.field_creatures().count()
    }
}
