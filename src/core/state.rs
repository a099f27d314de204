//! Game state: players, the instance arena, and resolution scratch.
//!
//! `GameState` owns everything a single simulation branch mutates: both
//! players (hp + zones), the card-instance arena, the optional field-spell
//! binding, the optional pending trap decision, and the bounded game log.
//!
//! ## Cloning
//!
//! AI search explores continuations on cloned state, and the action layer
//! restores a pre-action clone on failure (all-or-nothing actions). Plain
//! `clone()` is an exact copy for rollback; [`GameState::clone_for_search`]
//! additionally forks the RNG so branches draw independent sequences.

use rustc_hash::FxHashMap;

use crate::cards::instance::CardInstance;
use crate::catalog::CardTemplate;
use crate::combat::AttackTarget;
use crate::core::ids::InstanceId;
use crate::core::log::GameLog;
use crate::core::player::{PerPlayer, PlayerId};
use crate::core::rng::GameRng;
use crate::error::EngineError;
use crate::zones::{PlayerZones, ZoneKind};

/// Starting player health.
pub const STARTING_HP: i32 = 20;

/// One player's mutable state.
#[derive(Clone, Debug)]
pub struct PlayerState {
    /// Display name.
    pub name: String,
    /// Health. May go to zero or below; the loss condition is checked by
    /// the turn/game-over authority, not this engine.
    pub hp: i32,
    /// Whether the turn's standard play allowance was spent.
    pub standard_play_used: bool,
    /// Hand revealed to the opponent until this turn (display hint).
    pub hand_revealed_until: Option<u32>,
    /// This player's zones.
    pub zones: PlayerZones,
}

impl PlayerState {
    fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            hp: STARTING_HP,
            standard_play_used: false,
            hand_revealed_until: None,
            zones: PlayerZones::new(),
        }
    }
}

/// The single active field-spell binding.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FieldSpellBinding {
    /// Who played the field spell.
    pub owner: PlayerId,
    /// The bound card instance.
    pub card: InstanceId,
}

/// The action a trap decision interrupted, stashed until the defender
/// chooses whether to fire.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InterruptedAction {
    /// A declared attack.
    Attack {
        attacker: InstanceId,
        target: AttackTarget,
    },
    /// A card play.
    Play {
        player: PlayerId,
        card: InstanceId,
        slot: Option<u8>,
    },
}

/// The at-most-one pending trap decision.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TrapPrompt {
    /// Who owns the armed trap and decides whether to fire it.
    pub decider: PlayerId,
    /// The armed trap instance.
    pub trap: InstanceId,
    /// The interrupted action, resumed after the decision.
    pub interrupted: InterruptedAction,
}

/// Negation scratch set by trap/hook outcomes and consumed by the action
/// layer when it resumes the interrupted action.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct VetoFlags {
    /// Cancel the attack; the attacker keeps its attack for the turn.
    pub attack: bool,
    /// Cancel combat damage both ways; the attack is still spent.
    pub combat: bool,
    /// Negate the attacker's damage only; retaliation still happens.
    pub damage: bool,
    /// Cancel the interrupted card play.
    pub play: bool,
}

impl VetoFlags {
    /// Clear all flags.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Complete state of one game (or one search branch).
#[derive(Clone, Debug)]
pub struct GameState {
    players: PerPlayer<PlayerState>,

    /// Whose turn it is.
    pub active_player: PlayerId,

    /// Turn counter, starting at 1. Each player's turn is one count.
    pub turn: u32,

    /// Card-instance arena. Zones hold ids into this map.
    cards: FxHashMap<InstanceId, CardInstance>,

    /// At most one active field spell.
    pub field_spell: Option<FieldSpellBinding>,

    /// At most one pending trap decision.
    pub pending_trap: Option<TrapPrompt>,

    /// Negation scratch for the in-flight action.
    pub veto: VetoFlags,

    /// Set by the EndTurn outcome; honored by the action layer after the
    /// sweep.
    pub turn_end_requested: bool,

    /// Bounded observational message log.
    pub log: GameLog,

    /// Deterministic RNG.
    pub rng: GameRng,

    next_instance: u32,
}

impl GameState {
    /// Create a fresh game.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            players: PerPlayer::new(|p| PlayerState::new(format!("{p}"))),
            active_player: PlayerId::One,
            turn: 1,
            cards: FxHashMap::default(),
            field_spell: None,
            pending_trap: None,
            veto: VetoFlags::default(),
            turn_end_requested: false,
            log: GameLog::new(),
            rng: GameRng::new(seed),
            next_instance: 0,
        }
    }

    // === Players ===

    /// A player's state.
    #[must_use]
    pub fn player(&self, player: PlayerId) -> &PlayerState {
        &self.players[player]
    }

    /// A player's mutable state.
    pub fn player_mut(&mut self, player: PlayerId) -> &mut PlayerState {
        &mut self.players[player]
    }

    /// A player's zones.
    #[must_use]
    pub fn zones(&self, player: PlayerId) -> &PlayerZones {
        &self.players[player].zones
    }

    /// A player's mutable zones.
    pub fn zones_mut(&mut self, player: PlayerId) -> &mut PlayerZones {
        &mut self.players[player].zones
    }

    // === Instance arena ===

    /// Look up a card instance.
    #[must_use]
    pub fn card(&self, id: InstanceId) -> Option<&CardInstance> {
        self.cards.get(&id)
    }

    /// Look up a card instance mutably.
    pub fn card_mut(&mut self, id: InstanceId) -> Option<&mut CardInstance> {
        self.cards.get_mut(&id)
    }

    /// Look up a card instance, erroring if it is gone.
    pub fn card_ok(&self, id: InstanceId) -> Result<&CardInstance, EngineError> {
        self.cards.get(&id).ok_or(EngineError::UnknownInstance(id))
    }

    /// Allocate the next instance id.
    pub fn alloc_instance(&mut self) -> InstanceId {
        let id = InstanceId(self.next_instance);
        self.next_instance += 1;
        id
    }

    /// Number of live instances in the arena.
    #[must_use]
    pub fn instance_count(&self) -> usize {
        self.cards.len()
    }

    // === Creation primitives ===

    /// Mint an instance from a template into a sequence zone.
    pub fn mint_into_zone(
        &mut self,
        template: &CardTemplate,
        owner: PlayerId,
        zone: ZoneKind,
    ) -> InstanceId {
        let id = self.alloc_instance();
        let card = CardInstance::from_template(template, id, owner, zone, self.turn);
        self.cards.insert(id, card);
        self.zones_mut(owner).push(zone, id);
        id
    }

    /// Mint a creature token straight onto the first free field slot.
    ///
    /// Returns `None` (minting nothing) when the field is full.
    pub fn summon_token(&mut self, template: &CardTemplate, owner: PlayerId) -> Option<InstanceId> {
        let slot = self.zones(owner).free_slot()?;
        let id = self.alloc_instance();
        let card = CardInstance::from_template(template, id, owner, ZoneKind::Field, self.turn);
        self.cards.insert(id, card);
        self.zones_mut(owner).place_in_slot(slot, id);
        Some(id)
    }

    // === Movement primitives ===

    /// Detach an instance from whatever zone currently lists it.
    ///
    /// Returns false if no zone held it (already detached).
    pub fn detach(&mut self, id: InstanceId) -> bool {
        let Some(card) = self.cards.get(&id) else {
            return false;
        };
        let owner = card.owner;
        let zone = card.zone;
        match zone {
            ZoneKind::Field => self.zones_mut(owner).remove_from_field(id).is_some(),
            ZoneKind::FieldSpell => {
                if self.field_spell.map(|b| b.card) == Some(id) {
                    self.field_spell = None;
                    true
                } else {
                    false
                }
            }
            _ => self.zones_mut(owner).remove(zone, id),
        }
    }

    /// Move an instance to a sequence zone of its owner.
    pub fn move_to_zone(&mut self, id: InstanceId, dest: ZoneKind) -> Result<(), EngineError> {
        debug_assert!(
            !matches!(dest, ZoneKind::Field | ZoneKind::FieldSpell),
            "field placement has dedicated helpers"
        );
        let card = self.cards.get(&id).ok_or(EngineError::UnknownInstance(id))?;
        let owner = card.owner;
        self.detach(id);
        self.zones_mut(owner).push(dest, id);
        if let Some(card) = self.cards.get_mut(&id) {
            card.zone = dest;
        }
        Ok(())
    }

    /// Place a detached (or zone-listed) instance on a field slot of the
    /// given player, transferring control.
    pub fn place_on_field(
        &mut self,
        id: InstanceId,
        player: PlayerId,
        slot: usize,
    ) -> Result<(), EngineError> {
        if self.cards.get(&id).is_none() {
            return Err(EngineError::UnknownInstance(id));
        }
        if self.zones(player).field.get(slot).copied().flatten().is_some()
            || slot >= crate::zones::FIELD_SLOTS
        {
            return Err(EngineError::SlotUnavailable(slot as u8));
        }
        self.detach(id);
        self.zones_mut(player).place_in_slot(slot, id);
        let card = self.cards.get_mut(&id).expect("checked above");
        card.owner = player;
        card.zone = ZoneKind::Field;
        Ok(())
    }

    /// Remove an instance from the simulation entirely (exhausted carrion,
    /// exiled tokens).
    pub fn remove_from_play(&mut self, id: InstanceId) -> Option<CardInstance> {
        self.detach(id);
        self.cards.remove(&id)
    }

    // === Queries ===

    /// Creatures on a player's field, in slot order.
    #[must_use]
    pub fn field_creatures(&self, player: PlayerId) -> Vec<InstanceId> {
        self.zones(player).field_creatures().collect()
    }

    /// Total instances tracked for a player across all zones, counting the
    /// field-spell binding against its owner.
    #[must_use]
    pub fn total_cards(&self, player: PlayerId) -> usize {
        let binding = self
            .field_spell
            .is_some_and(|b| b.owner == player) as usize;
        self.zones(player).total_cards() + binding
    }

    // === Log ===

    /// Append a message to the bounded game log.
    pub fn log(&mut self, message: impl Into<String>) {
        self.log.push(message);
    }

    // === Cloning ===

    /// Clone for an AI search branch: exact copy with a forked RNG.
    #[must_use]
    pub fn clone_for_search(&mut self) -> Self {
        let mut clone = self.clone();
        clone.rng = self.rng.fork();
        clone
    }
}
