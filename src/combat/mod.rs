//! Combat resolution: target legality and simultaneous damage.
//!
//! Target legality is computed fresh at declaration time. Damage in a
//! creature clash is simultaneous (both attack values are read from
//! pre-combat stats) with two keyword-ordered exceptions:
//!
//! - **Ambush** is judged after the attacker's damage lands but before the
//!   defender's is applied: if the defender is already at non-positive
//!   health, retaliation is skipped entirely. A defender whose barrier
//!   absorbed the hit is alive, so it still strikes back.
//! - **Neurotoxic** freezes whatever it actually damaged. Both directions
//!   are independent; two neurotoxic creatures can freeze each other in
//!   one exchange.
//!
//! The resolver only flags deaths (`hp <= 0`, `slain_by` recorded); moving
//! corpses to carrion is the destruction sweep's job.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::cards::keyword::Keyword;
use crate::core::ids::InstanceId;
use crate::core::state::GameState;
use crate::error::EngineError;
use crate::zones::{FIELD_SLOTS, ZoneKind};

/// How many turns a neurotoxic freeze lasts: the victim thaws at the start
/// of the second turn after the exchange.
pub const FREEZE_TURNS: u32 = 2;

/// What an attack is aimed at.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttackTarget {
    /// An opposing creature.
    Creature(InstanceId),
    /// The opposing player directly.
    Player,
}

/// What happened in one creature-versus-creature exchange.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ClashReport {
    /// Damage that actually landed on the defender.
    pub dealt_to_defender: i32,
    /// Damage that actually landed on the attacker.
    pub dealt_to_attacker: i32,
    /// Retaliation was skipped by Ambush.
    pub ambushed: bool,
}

/// Legal creature targets for an attacker, computed fresh.
///
/// Non-Acuity attackers cannot see Hidden or Invisible defenders. If any
/// targetable defender has Lure, only Lure creatures may be struck.
#[must_use]
pub fn legal_targets(state: &GameState, attacker: InstanceId) -> SmallVec<[InstanceId; FIELD_SLOTS]> {
    let Some(card) = state.card(attacker) else {
        return SmallVec::new();
    };
    let acuity = card.has_keyword(Keyword::Acuity);
    let defender = card.owner.opponent();

    let mut targets: SmallVec<[InstanceId; FIELD_SLOTS]> = state
        .zones(defender)
        .field_creatures()
        .filter(|&id| {
            state.card(id).is_some_and(|c| {
                !c.is_destruction_pending()
                    && (acuity
                        || !(c.has_keyword(Keyword::Hidden) || c.has_keyword(Keyword::Invisible)))
            })
        })
        .collect();

    let any_lure = targets
        .iter()
        .any(|&id| state.card(id).is_some_and(|c| c.has_keyword(Keyword::Lure)));
    if any_lure {
        targets.retain(|&mut id| state.card(id).is_some_and(|c| c.has_keyword(Keyword::Lure)));
    }

    targets
}

/// Whether the attacker may strike the defending player directly: only
/// with no legal creature targets, and only past summoning sickness unless
/// it has Haste.
#[must_use]
pub fn can_attack_player(state: &GameState, attacker: InstanceId) -> bool {
    let Some(card) = state.card(attacker) else {
        return false;
    };
    legal_targets(state, attacker).is_empty()
        && (card.has_keyword(Keyword::Haste) || card.summoned_turn < state.turn)
}

/// Validate that a creature can be declared as an attacker at all.
pub fn can_declare(state: &GameState, attacker: InstanceId) -> Result<(), EngineError> {
    let card = state.card_ok(attacker)?;
    if card.zone != ZoneKind::Field || card.is_destruction_pending() {
        return Err(EngineError::NotInZone(attacker));
    }
    if card.has_attacked {
        return Err(EngineError::AlreadyAttacked(attacker));
    }
    if card.is_frozen(state.turn) {
        return Err(EngineError::Frozen(attacker));
    }
    Ok(())
}

/// Resolve a creature-versus-creature exchange.
///
/// `attacker_damage_negated` is set when a trap negated the attacker's
/// damage: the exchange still happens, but the attacker deals 0.
pub fn resolve_clash(
    state: &mut GameState,
    attacker: InstanceId,
    defender: InstanceId,
    attacker_damage_negated: bool,
) -> Result<ClashReport, EngineError> {
    // Both values come from pre-combat stats.
    let (attacker_atk, attacker_kw) = {
        let card = state.card_ok(attacker)?;
        (card.atk, card.keywords())
    };
    let (defender_atk, defender_kw) = {
        let card = state.card_ok(defender)?;
        (card.atk, card.keywords())
    };
    let attacker_atk = if attacker_damage_negated { 0 } else { attacker_atk };

    let mut report = ClashReport::default();
    let freeze_until = state.turn + FREEZE_TURNS;

    // Attacker's damage lands first (for the Ambush check only; the values
    // above are already fixed).
    let defender_card = state.card_mut(defender).expect("checked above");
    report.dealt_to_defender = defender_card.apply_damage(attacker_atk);
    let defender_down = defender_card.is_destruction_pending();
    if defender_down {
        defender_card.slain_by = Some(attacker);
    }
    if attacker_kw.contains(Keyword::Neurotoxic) && report.dealt_to_defender > 0 {
        defender_card.freeze_until(freeze_until);
    }

    report.ambushed = attacker_kw.contains(Keyword::Ambush) && defender_down;
    if !report.ambushed {
        let attacker_card = state.card_mut(attacker).expect("checked above");
        report.dealt_to_attacker = attacker_card.apply_damage(defender_atk);
        if attacker_card.is_destruction_pending() {
            attacker_card.slain_by = Some(defender);
        }
        if defender_kw.contains(Keyword::Neurotoxic) && report.dealt_to_attacker > 0 {
            attacker_card.freeze_until(freeze_until);
        }
    }

    let attacker_name = state.card_ok(attacker)?.name.clone();
    let defender_name = state.card_ok(defender)?.name.clone();
    if report.ambushed {
        state.log(format!("{attacker_name} ambushes {defender_name}"));
    } else {
        state.log(format!("{attacker_name} clashes with {defender_name}"));
    }

    Ok(report)
}

/// Resolve a direct attack on the defending player.
///
/// No defender-side triggers fire here; traps are handled before this
/// point by the action layer.
pub fn resolve_direct(state: &mut GameState, attacker: InstanceId) -> Result<i32, EngineError> {
    let (atk, name, owner) = {
        let card = state.card_ok(attacker)?;
        (card.atk, card.name.clone(), card.owner)
    };
    let defender = owner.opponent();
    state.player_mut(defender).hp -= atk;
    state.log(format!("{name} strikes {defender} for {atk}"));
    Ok(atk)
}
