//! Action entry points.
//!
//! Every player action funnels through here: guards are checked, opposing
//! traps get their interrupt window, hooks fire through the interpreter,
//! and the destruction sweep runs once the action completes - so deaths
//! produced within one action are swept together.
//!
//! Actions are all-or-nothing: a pre-action clone is restored on any
//! error, so callers never observe a partial mutation. A rejected action
//! is an `Err`; a suspended one returns a pending handle the caller
//! resumes later.

use crate::catalog::{CardCategory, Catalog, TrapTrigger};
use crate::combat::{self, AttackTarget};
use crate::consume::{consume, ConsumeSource};
use crate::core::ids::InstanceId;
use crate::core::player::PlayerId;
use crate::core::state::{GameState, InterruptedAction, TrapPrompt};
use crate::effects::interpreter::{Applied, Interpreter, PendingSelection, SelectionRejected};
use crate::effects::outcome::{Choice, HookContext, Outcome};
use crate::effects::{fire_hook, fire_hook_sync, spec, HookKind};
use crate::error::EngineError;
use crate::sweep::run_sweep;
use crate::zones::{FIELD_SLOTS, ZoneKind};

use tracing::warn;

/// How an accepted action left the game.
#[derive(Clone, Debug, PartialEq)]
pub enum ActionResult {
    /// The action fully resolved.
    Completed,
    /// An effect suspended on a target choice; resume with
    /// [`resume_selection`].
    AwaitingSelection(PendingSelection),
    /// An opposing trap may fire; the decision is recorded on
    /// `GameState::pending_trap` and resolved with
    /// [`resolve_trap_decision`].
    AwaitingTrap,
}

/// Run an action body with rollback: any error restores the pre-action
/// state unchanged.
fn atomic<F>(state: &mut GameState, body: F) -> Result<ActionResult, EngineError>
where
    F: FnOnce(&mut GameState) -> Result<ActionResult, EngineError>,
{
    let saved = state.clone();
    match body(state) {
        Ok(result) => Ok(result),
        Err(error) => {
            *state = saved;
            Err(error)
        }
    }
}

fn guard_no_trap(state: &GameState) -> Result<(), EngineError> {
    if state.pending_trap.is_some() {
        return Err(EngineError::TrapDecisionPending);
    }
    Ok(())
}

/// Which trap trigger, if any, a play of this category exposes.
fn play_trigger(category: CardCategory) -> Option<TrapTrigger> {
    match category {
        CardCategory::Prey | CardCategory::Predator => Some(TrapTrigger::CreaturePlayed),
        CardCategory::Spell | CardCategory::FreeSpell | CardCategory::FieldSpell => {
            Some(TrapTrigger::SpellPlayed)
        }
        // Traps arm face-down; nothing sees them.
        CardCategory::Trap => None,
    }
}

/// The first armed opposing trap matching a trigger.
fn matching_trap(
    state: &GameState,
    catalog: &Catalog,
    defender: PlayerId,
    trigger: TrapTrigger,
) -> Option<InstanceId> {
    state.zones(defender).traps.iter().copied().find(|&id| {
        let Some(card) = state.card(id) else {
            return false;
        };
        !card.abilities_cancelled
            && catalog
                .template(card.hook_source())
                .and_then(|t| t.hooks.trap_trigger)
                == Some(trigger)
    })
}

/// Spring a trap: it leaves the traps zone for carrion and its effect runs
/// through the interpreter. Trap effects cannot suspend; a selection
/// emerging here is dropped with a warning.
fn fire_trap(state: &mut GameState, catalog: &Catalog, decider: PlayerId, trap: InstanceId) {
    if !state.zones(decider).contains(ZoneKind::Traps, trap) {
        return;
    }
    let effect = state.card(trap).and_then(|card| {
        if card.abilities_cancelled {
            return None;
        }
        catalog
            .template(card.hook_source())
            .and_then(|t| t.hooks.trap_effect.clone())
    });
    let name = state
        .card(trap)
        .map(|c| c.name.clone())
        .unwrap_or_else(|| "a trap".into());

    let _ = state.move_to_zone(trap, ZoneKind::Carrion);
    state.log(format!("{name} springs"));

    if let Some(spec_effect) = effect {
        let ctx = HookContext::for_card(decider, trap);
        let outcome = spec::eval(state, &ctx, &spec_effect);
        if let Applied::Pending(pending) = Interpreter::apply(state, catalog, ctx, outcome) {
            warn!(title = pending.title(), "trap effect requested a selection; dropped");
        }
    }
}

/// Post-action bookkeeping: sweep the fields, then honor a requested turn
/// end.
fn finish_action(state: &mut GameState, catalog: &Catalog) {
    run_sweep(state, catalog);
    if state.turn_end_requested {
        state.turn_end_requested = false;
        advance_turn(state, catalog);
    }
}

/// The turn boundary: end-of-turn hooks, the hand-over, and
/// start-of-turn upkeep for the new active player.
fn advance_turn(state: &mut GameState, catalog: &Catalog) {
    let ending = state.active_player;
    for id in state.field_creatures(ending) {
        fire_hook_sync(state, catalog, id, HookKind::OnTurnEnd, None);
    }
    run_sweep(state, catalog);

    state.active_player = ending.opponent();
    state.turn += 1;
    let starting = state.active_player;
    let turn = state.turn;
    state.player_mut(starting).standard_play_used = false;

    for id in state.field_creatures(starting) {
        if let Some(card) = state.card_mut(id) {
            card.has_attacked = false;
            if card.frozen_until.is_some_and(|until| until <= turn) {
                card.frozen_until = None;
            }
        }
    }

    for id in state.field_creatures(starting) {
        fire_hook_sync(state, catalog, id, HookKind::OnTurnStart, None);
    }
    run_sweep(state, catalog);

    // An EndTurn emerging from a turn-boundary hook is dropped rather than
    // chained into another boundary.
    state.turn_end_requested = false;
    state.log(format!("{starting} begins turn {turn}"));
}

/// Turn a hook's interpreter result into an action result, sweeping when
/// the action fully resolved.
fn conclude(state: &mut GameState, catalog: &Catalog, applied: Applied) -> ActionResult {
    match applied {
        Applied::Complete => {
            finish_action(state, catalog);
            ActionResult::Completed
        }
        // The sweep waits until the selection chain lands.
        Applied::Pending(pending) => ActionResult::AwaitingSelection(pending),
    }
}

// === Entry points ===

/// Play a card from the active player's hand.
///
/// Creatures need an empty field `slot`; other categories ignore it.
pub fn play_card(
    state: &mut GameState,
    catalog: &Catalog,
    player: PlayerId,
    card: InstanceId,
    slot: Option<u8>,
) -> Result<ActionResult, EngineError> {
    atomic(state, |state| {
        guard_no_trap(state)?;
        if player != state.active_player {
            return Err(EngineError::NotYourTurn(player));
        }
        let instance = state.card_ok(card)?;
        if instance.owner != player || instance.zone != ZoneKind::Hand {
            return Err(EngineError::NotInZone(card));
        }
        let category = instance.category;
        if category.uses_play_allowance() && state.player(player).standard_play_used {
            return Err(EngineError::PlayAllowanceUsed);
        }
        if category.is_creature() {
            let slot = slot.ok_or(EngineError::SlotUnavailable(FIELD_SLOTS as u8))?;
            let occupied = state
                .zones(player)
                .field
                .get(slot as usize)
                .is_none_or(|cell| cell.is_some());
            if occupied {
                return Err(EngineError::SlotUnavailable(slot));
            }
        }

        if let Some(trigger) = play_trigger(category) {
            if let Some(trap) = matching_trap(state, catalog, player.opponent(), trigger) {
                state.pending_trap = Some(TrapPrompt {
                    decider: player.opponent(),
                    trap,
                    interrupted: InterruptedAction::Play { player, card, slot },
                });
                return Ok(ActionResult::AwaitingTrap);
            }
        }

        execute_play(state, catalog, player, card, slot)
    })
}

fn execute_play(
    state: &mut GameState,
    catalog: &Catalog,
    player: PlayerId,
    card: InstanceId,
    slot: Option<u8>,
) -> Result<ActionResult, EngineError> {
    let instance = state.card_ok(card)?;
    let category = instance.category;
    let name = instance.name.clone();

    if category.uses_play_allowance() {
        state.player_mut(player).standard_play_used = true;
    }

    if state.veto.play {
        state.veto.clear();
        state.move_to_zone(card, ZoneKind::Carrion)?;
        state.log(format!("{name} is negated"));
        finish_action(state, catalog);
        return Ok(ActionResult::Completed);
    }

    let applied = match category {
        CardCategory::Prey | CardCategory::Predator => {
            let slot = slot.expect("validated by play_card") as usize;
            state.place_on_field(card, player, slot)?;
            let turn = state.turn;
            if let Some(c) = state.card_mut(card) {
                c.summoned_turn = turn;
            }
            state.log(format!("{player} plays {name}"));
            fire_hook(state, catalog, card, HookKind::OnPlay, None)
        }
        CardCategory::Spell | CardCategory::FreeSpell => {
            // The spent spell rests in carrion before its effect resolves,
            // so zone totals stay conserved even across a suspension.
            state.move_to_zone(card, ZoneKind::Carrion)?;
            state.log(format!("{player} casts {name}"));
            fire_hook(state, catalog, card, HookKind::OnPlay, None)
        }
        CardCategory::Trap => {
            state.move_to_zone(card, ZoneKind::Traps)?;
            state.log(format!("{player} sets a card face-down"));
            Applied::Complete
        }
        CardCategory::FieldSpell => {
            let ctx = HookContext::for_player(player);
            let bind = Interpreter::apply(
                state,
                catalog,
                ctx,
                Outcome::SetFieldSpell { card },
            );
            debug_assert!(matches!(bind, Applied::Complete));
            fire_hook(state, catalog, card, HookKind::OnPlay, None)
        }
    };

    state.veto.clear();
    Ok(conclude(state, catalog, applied))
}

/// Declare an attack with a creature of the active player.
pub fn declare_attack(
    state: &mut GameState,
    catalog: &Catalog,
    attacker: InstanceId,
    target: AttackTarget,
) -> Result<ActionResult, EngineError> {
    atomic(state, |state| {
        guard_no_trap(state)?;
        let card = state.card_ok(attacker)?;
        if card.owner != state.active_player {
            return Err(EngineError::NotYourTurn(card.owner));
        }
        combat::can_declare(state, attacker)?;

        match target {
            AttackTarget::Creature(defender) => {
                if !combat::legal_targets(state, attacker).contains(&defender) {
                    return Err(EngineError::IllegalTarget);
                }
            }
            AttackTarget::Player => {
                if !combat::can_attack_player(state, attacker) {
                    return Err(EngineError::CannotAttackPlayer(attacker));
                }
            }
        }

        let defender = state.active_player.opponent();
        if let Some(trap) = matching_trap(state, catalog, defender, TrapTrigger::AttackDeclared) {
            state.pending_trap = Some(TrapPrompt {
                decider: defender,
                trap,
                interrupted: InterruptedAction::Attack { attacker, target },
            });
            return Ok(ActionResult::AwaitingTrap);
        }

        execute_attack(state, catalog, attacker, target)
    })
}

fn execute_attack(
    state: &mut GameState,
    catalog: &Catalog,
    attacker: InstanceId,
    target: AttackTarget,
) -> Result<ActionResult, EngineError> {
    if state.veto.attack {
        // The attack never happened; the attacker keeps its attack.
        state.veto.clear();
        state.log("the attack is thwarted".to_string());
        finish_action(state, catalog);
        return Ok(ActionResult::Completed);
    }

    // A trap may have removed either side; a stale attack fizzles rather
    // than erroring, the action itself was legal when declared.
    let attacker_ready = state
        .card(attacker)
        .is_some_and(|c| c.zone == ZoneKind::Field && !c.is_destruction_pending());
    let target_ready = match target {
        AttackTarget::Creature(defender) => state
            .card(defender)
            .is_some_and(|c| c.zone == ZoneKind::Field && !c.is_destruction_pending()),
        AttackTarget::Player => true,
    };
    if !attacker_ready || !target_ready {
        state.veto.clear();
        state.log("the attack fizzles".to_string());
        finish_action(state, catalog);
        return Ok(ActionResult::Completed);
    }

    fire_hook_sync(state, catalog, attacker, HookKind::OnBeforeCombat, None);

    match target {
        AttackTarget::Creature(defender) => {
            fire_hook_sync(state, catalog, defender, HookKind::OnDefend, None);

            if state.veto.combat {
                state.log("combat is negated".to_string());
            } else {
                let negate_damage = state.veto.damage;
                combat::resolve_clash(state, attacker, defender, negate_damage)?;
            }
        }
        AttackTarget::Player => {
            if state.veto.combat || state.veto.damage {
                state.log("the strike is negated".to_string());
            } else {
                combat::resolve_direct(state, attacker)?;
            }
        }
    }

    if let Some(card) = state.card_mut(attacker) {
        card.has_attacked = true;
    }
    state.veto.clear();
    finish_action(state, catalog);
    Ok(ActionResult::Completed)
}

/// Consume prey (and edible predators) with a predator of the active
/// player.
pub fn consume_prey(
    state: &mut GameState,
    catalog: &Catalog,
    predator: InstanceId,
    sources: &[ConsumeSource],
) -> Result<ActionResult, EngineError> {
    atomic(state, |state| {
        guard_no_trap(state)?;
        let card = state.card_ok(predator)?;
        if card.owner != state.active_player {
            return Err(EngineError::NotYourTurn(card.owner));
        }

        consume(state, predator, sources)?;
        let applied = fire_hook(state, catalog, predator, HookKind::OnConsume, None);
        Ok(conclude(state, catalog, applied))
    })
}

/// Discard a card from the active player's hand, firing its discard hook.
pub fn discard_card(
    state: &mut GameState,
    catalog: &Catalog,
    player: PlayerId,
    card: InstanceId,
) -> Result<ActionResult, EngineError> {
    atomic(state, |state| {
        guard_no_trap(state)?;
        if player != state.active_player {
            return Err(EngineError::NotYourTurn(player));
        }
        let instance = state.card_ok(card)?;
        if instance.owner != player || instance.zone != ZoneKind::Hand {
            return Err(EngineError::NotInZone(card));
        }
        let name = instance.name.clone();

        state.move_to_zone(card, ZoneKind::Carrion)?;
        state.log(format!("{player} discards {name}"));
        let applied = fire_hook(state, catalog, card, HookKind::OnDiscard, None);
        Ok(conclude(state, catalog, applied))
    })
}

/// Resolve the pending trap decision: fire the trap (or decline), then
/// complete the interrupted action honoring any negation the trap set.
pub fn resolve_trap_decision(
    state: &mut GameState,
    catalog: &Catalog,
    fire: bool,
) -> Result<ActionResult, EngineError> {
    atomic(state, |state| {
        let prompt = state.pending_trap.take().ok_or(EngineError::NoTrapDecision)?;

        if fire {
            fire_trap(state, catalog, prompt.decider, prompt.trap);
        }

        match prompt.interrupted {
            InterruptedAction::Attack { attacker, target } => {
                execute_attack(state, catalog, attacker, target)
            }
            InterruptedAction::Play { player, card, slot } => {
                execute_play(state, catalog, player, card, slot)
            }
        }
    })
}

/// End the active player's turn.
pub fn end_turn(state: &mut GameState, catalog: &Catalog) -> Result<ActionResult, EngineError> {
    atomic(state, |state| {
        guard_no_trap(state)?;
        run_sweep(state, catalog);
        state.turn_end_requested = false;
        advance_turn(state, catalog);
        Ok(ActionResult::Completed)
    })
}

/// Resume a suspended selection with a chosen candidate.
///
/// An off-list choice is rejected, state untouched, and the selection
/// handed back still open.
pub fn resume_selection(
    state: &mut GameState,
    catalog: &Catalog,
    pending: PendingSelection,
    choice: Choice,
) -> Result<ActionResult, SelectionRejected> {
    let applied = Interpreter::resume(state, catalog, pending, choice)?;
    Ok(conclude(state, catalog, applied))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CardTemplate;
    use crate::core::ids::TemplateId;
    use crate::effects::spec::EffectSpec;

    fn catalog() -> Catalog {
        let mut catalog = Catalog::new();
        catalog.register(
            CardTemplate::new(TemplateId::new(1), "Vole", CardCategory::Prey)
                .with_stats(1, 1)
                .with_nutrition(1),
        );
        catalog.register(
            CardTemplate::new(TemplateId::new(2), "Bolt", CardCategory::Spell)
                .on_play(EffectSpec::DamageOpponent(3)),
        );
        catalog.register(
            CardTemplate::new(TemplateId::new(3), "Quick Snack", CardCategory::FreeSpell)
                .on_play(EffectSpec::HealSelf(2)),
        );
        catalog.register(
            CardTemplate::new(TemplateId::new(4), "Snare", CardCategory::Trap)
                .with_trap(TrapTrigger::AttackDeclared, EffectSpec::NegateAttack),
        );
        catalog
    }

    fn in_hand(state: &mut GameState, catalog: &Catalog, player: PlayerId, t: u32) -> InstanceId {
        let template = catalog.template(TemplateId::new(t)).unwrap();
        state.mint_into_zone(template, player, ZoneKind::Hand)
    }

    #[test]
    fn test_play_creature_to_slot() {
        let mut state = GameState::new(1);
        let catalog = catalog();
        let vole = in_hand(&mut state, &catalog, PlayerId::One, 1);

        let result = play_card(&mut state, &catalog, PlayerId::One, vole, Some(1)).unwrap();

        assert!(matches!(result, ActionResult::Completed));
        assert_eq!(state.zones(PlayerId::One).slot_of(vole), Some(1));
        assert_eq!(state.card(vole).unwrap().summoned_turn, state.turn);
        assert!(state.player(PlayerId::One).standard_play_used);
    }

    #[test]
    fn test_play_allowance_enforced_and_free_spell_bypasses() {
        let mut state = GameState::new(1);
        let catalog = catalog();
        let vole = in_hand(&mut state, &catalog, PlayerId::One, 1);
        let second_vole = in_hand(&mut state, &catalog, PlayerId::One, 1);
        let snack = in_hand(&mut state, &catalog, PlayerId::One, 3);

        play_card(&mut state, &catalog, PlayerId::One, vole, Some(0)).unwrap();

        assert_eq!(
            play_card(&mut state, &catalog, PlayerId::One, second_vole, Some(1)),
            Err(EngineError::PlayAllowanceUsed)
        );

        // Free spells don't touch the allowance.
        let hp_before = state.player(PlayerId::One).hp;
        play_card(&mut state, &catalog, PlayerId::One, snack, None).unwrap();
        assert_eq!(state.player(PlayerId::One).hp, hp_before + 2);
    }

    #[test]
    fn test_spell_resolves_from_carrion() {
        let mut state = GameState::new(1);
        let catalog = catalog();
        let bolt = in_hand(&mut state, &catalog, PlayerId::One, 2);

        let hp_before = state.player(PlayerId::Two).hp;
        play_card(&mut state, &catalog, PlayerId::One, bolt, None).unwrap();

        assert_eq!(state.player(PlayerId::Two).hp, hp_before - 3);
        assert_eq!(state.card(bolt).unwrap().zone, ZoneKind::Carrion);
    }

    #[test]
    fn test_inactive_player_cannot_act() {
        let mut state = GameState::new(1);
        let catalog = catalog();
        let vole = in_hand(&mut state, &catalog, PlayerId::Two, 1);

        assert_eq!(
            play_card(&mut state, &catalog, PlayerId::Two, vole, Some(0)),
            Err(EngineError::NotYourTurn(PlayerId::Two))
        );
    }

    #[test]
    fn test_failed_action_rolls_back() {
        let mut state = GameState::new(1);
        let catalog = catalog();
        let vole = in_hand(&mut state, &catalog, PlayerId::One, 1);
        let saved = state.clone();

        // Slot out of range.
        let result = play_card(&mut state, &catalog, PlayerId::One, vole, Some(9));

        assert!(result.is_err());
        assert_eq!(state.total_cards(PlayerId::One), saved.total_cards(PlayerId::One));
        assert!(!state.player(PlayerId::One).standard_play_used);
        assert_eq!(state.card(vole).unwrap().zone, ZoneKind::Hand);
    }

    #[test]
    fn test_trap_interrupts_attack_and_negates() {
        let mut state = GameState::new(1);
        let catalog = catalog();

        // Defender arms a snare.
        let snare = in_hand(&mut state, &catalog, PlayerId::Two, 4);
        state.move_to_zone(snare, ZoneKind::Traps).unwrap();

        // Attacker fields a vole last turn.
        let vole = in_hand(&mut state, &catalog, PlayerId::One, 1);
        state.place_on_field(vole, PlayerId::One, 0).unwrap();
        state.card_mut(vole).unwrap().summoned_turn = 0;

        let result =
            declare_attack(&mut state, &catalog, vole, AttackTarget::Player).unwrap();
        assert!(matches!(result, ActionResult::AwaitingTrap));
        assert!(state.pending_trap.is_some());

        // Other actions are rejected while the decision is open.
        assert_eq!(
            end_turn(&mut state, &catalog),
            Err(EngineError::TrapDecisionPending)
        );

        let hp_before = state.player(PlayerId::Two).hp;
        resolve_trap_decision(&mut state, &catalog, true).unwrap();

        // Attack was negated, trap was spent, attacker not spent.
        assert_eq!(state.player(PlayerId::Two).hp, hp_before);
        assert_eq!(state.card(snare).unwrap().zone, ZoneKind::Carrion);
        assert!(!state.card(vole).unwrap().has_attacked);
        assert!(state.pending_trap.is_none());
        assert_eq!(state.veto, Default::default());
    }

    #[test]
    fn test_declined_trap_lets_attack_through() {
        let mut state = GameState::new(1);
        let catalog = catalog();
        let snare = in_hand(&mut state, &catalog, PlayerId::Two, 4);
        state.move_to_zone(snare, ZoneKind::Traps).unwrap();
        let vole = in_hand(&mut state, &catalog, PlayerId::One, 1);
        state.place_on_field(vole, PlayerId::One, 0).unwrap();
        state.card_mut(vole).unwrap().summoned_turn = 0;

        declare_attack(&mut state, &catalog, vole, AttackTarget::Player).unwrap();
        let hp_before = state.player(PlayerId::Two).hp;
        resolve_trap_decision(&mut state, &catalog, false).unwrap();

        assert_eq!(state.player(PlayerId::Two).hp, hp_before - 1);
        assert!(state.card(vole).unwrap().has_attacked);
        // Declined trap stays armed.
        assert_eq!(state.card(snare).unwrap().zone, ZoneKind::Traps);
    }

    #[test]
    fn test_end_turn_hands_over_and_resets() {
        let mut state = GameState::new(1);
        let catalog = catalog();
        let vole = in_hand(&mut state, &catalog, PlayerId::Two, 1);
        state.place_on_field(vole, PlayerId::Two, 0).unwrap();
        state.card_mut(vole).unwrap().has_attacked = true;
        state.player_mut(PlayerId::One).standard_play_used = true;

        end_turn(&mut state, &catalog).unwrap();

        assert_eq!(state.active_player, PlayerId::Two);
        assert_eq!(state.turn, 2);
        assert!(!state.card(vole).unwrap().has_attacked);
        assert!(!state.player(PlayerId::Two).standard_play_used);
    }

    #[test]
    fn test_discard_moves_to_carrion() {
        let mut state = GameState::new(1);
        let catalog = catalog();
        let vole = in_hand(&mut state, &catalog, PlayerId::One, 1);

        discard_card(&mut state, &catalog, PlayerId::One, vole).unwrap();

        assert_eq!(state.card(vole).unwrap().zone, ZoneKind::Carrion);
    }
}
