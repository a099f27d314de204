//! The effect interpreter: drives an outcome to completion.
//!
//! All game-state mutation funnels through [`Interpreter::apply`]. The
//! interpreter walks a worklist of outcomes; compound outcomes expand in
//! place, deferred descriptors are evaluated against the state current at
//! their position, and a selection request suspends the walk, handing the
//! caller a [`PendingSelection`] that owns the rest of the worklist.
//!
//! Suspension is data, not scheduling: the caller (UI or AI search) holds
//! the pending value and resumes it explicitly with a chosen candidate. A
//! rejected choice hands the untouched pending value back, still open.
//!
//! The interpreter never runs the destruction sweep; the action layer does
//! that once the triggering action completes, so deaths from one compound
//! outcome are swept together.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::catalog::Catalog;
use crate::core::ids::InstanceId;
use crate::core::state::GameState;
use crate::error::EngineError;
use crate::zones::ZoneKind;

use super::continuation;
use super::outcome::{Candidate, Choice, HookContext, Outcome, SelectionRequest};
use super::spec;

/// Result of driving an outcome.
#[derive(Clone, Debug)]
pub enum Applied {
    /// The outcome was fully applied.
    Complete,
    /// Resolution suspended on a choice.
    Pending(PendingSelection),
}

/// A suspended selection: first-class, serializable, resumable.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PendingSelection {
    request: SelectionRequest,
    ctx: HookContext,
    rest: Vec<Outcome>,
}

impl PendingSelection {
    /// The prompt title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.request.title
    }

    /// The enumerable candidate list (no hidden UI state).
    #[must_use]
    pub fn candidates(&self) -> &[Candidate] {
        &self.request.candidates
    }

    /// Whether a choice is among the offered candidates.
    #[must_use]
    pub fn accepts(&self, choice: Choice) -> bool {
        self.request.candidates.iter().any(|c| c.choice == choice)
    }
}

/// A resume attempt with an off-list choice. The selection stays open.
#[derive(Debug)]
pub struct SelectionRejected {
    /// The untouched pending selection, still resumable.
    pub pending: PendingSelection,
    /// Why the choice was rejected.
    pub error: EngineError,
}

/// Applies outcomes to game state.
pub struct Interpreter;

impl Interpreter {
    /// Drive an outcome until it completes or suspends on a choice.
    pub fn apply(
        state: &mut GameState,
        catalog: &Catalog,
        ctx: HookContext,
        outcome: Outcome,
    ) -> Applied {
        let mut work = VecDeque::new();
        work.push_back(outcome);
        Self::run(state, catalog, ctx, work)
    }

    /// Resume a suspended selection with a chosen candidate.
    ///
    /// An off-list choice is rejected without touching state and the
    /// selection remains open.
    pub fn resume(
        state: &mut GameState,
        catalog: &Catalog,
        pending: PendingSelection,
        choice: Choice,
    ) -> Result<Applied, SelectionRejected> {
        if !pending.accepts(choice) {
            return Err(SelectionRejected {
                pending,
                error: EngineError::InvalidChoice,
            });
        }

        let PendingSelection { request, ctx, rest } = pending;
        let next = continuation::resume(state, &ctx, &request.resume, choice);

        let mut work: VecDeque<Outcome> = VecDeque::with_capacity(rest.len() + 1);
        work.push_back(next);
        work.extend(rest);
        Ok(Self::run(state, catalog, ctx, work))
    }

    fn run(
        state: &mut GameState,
        catalog: &Catalog,
        ctx: HookContext,
        mut work: VecDeque<Outcome>,
    ) -> Applied {
        while let Some(outcome) = work.pop_front() {
            match outcome {
                Outcome::None => {}
                Outcome::Sequence(members) => {
                    for member in members.into_iter().rev() {
                        work.push_front(member);
                    }
                }
                Outcome::Defer(spec) => {
                    let evaluated = spec::eval(state, &ctx, &spec);
                    work.push_front(evaluated);
                }
                Outcome::Select(request) => {
                    if !request.has_real_candidates() {
                        // The hook should have returned None instead;
                        // recover by ignoring the request.
                        warn!(title = %request.title, "selection with no candidates skipped");
                        continue;
                    }
                    return Applied::Pending(PendingSelection {
                        request,
                        ctx,
                        rest: work.into_iter().collect(),
                    });
                }
                simple => Self::apply_simple(state, catalog, &ctx, simple),
            }
        }
        Applied::Complete
    }

    fn apply_simple(state: &mut GameState, catalog: &Catalog, ctx: &HookContext, outcome: Outcome) {
        match outcome {
            Outcome::Heal { amount } => {
                state.player_mut(ctx.player).hp += amount;
                state.log(format!("{} restores {amount} health", ctx.player));
            }

            Outcome::Draw { count } => {
                for _ in 0..count {
                    match state.zones_mut(ctx.player).draw() {
                        Some(id) => {
                            state.zones_mut(ctx.player).push(ZoneKind::Hand, id);
                            if let Some(card) = state.card_mut(id) {
                                card.zone = ZoneKind::Hand;
                            }
                        }
                        None => {
                            state.log(format!("{} has no cards left to draw", ctx.player));
                            break;
                        }
                    }
                }
            }

            Outcome::DamageOpponent { amount } => {
                let opponent = ctx.player.opponent();
                state.player_mut(opponent).hp -= amount;
                state.log(format!("{opponent} takes {amount} damage"));
            }

            Outcome::DamageCreature {
                target,
                amount,
                source_label,
            } => match state.card_mut(target) {
                Some(card) => {
                    let name = card.name.clone();
                    let dealt = card.apply_damage(amount);
                    let suffix = source_label.map(|s| format!(" from {s}")).unwrap_or_default();
                    if dealt > 0 {
                        state.log(format!("{name} takes {dealt} damage{suffix}"));
                    } else {
                        state.log(format!("{name}'s barrier absorbs the damage{suffix}"));
                    }
                }
                None => warn!(%target, "damage target is gone; skipped"),
            },

            Outcome::DamageAllCreatures { amount } => {
                let targets: Vec<InstanceId> = crate::core::player::PlayerId::BOTH
                    .iter()
                    .flat_map(|&p| state.field_creatures(p))
                    .collect();
                for id in targets {
                    if let Some(card) = state.card_mut(id) {
                        card.apply_damage(amount);
                    }
                }
                state.log(format!("every creature takes {amount} damage"));
            }

            Outcome::KillTargets(targets) => {
                for id in targets {
                    match state.card_mut(id) {
                        Some(card) => {
                            card.mark_destroyed();
                            let name = card.name.clone();
                            state.log(format!("{name} is destroyed"));
                        }
                        None => warn!(%id, "kill target is gone; skipped"),
                    }
                }
            }

            Outcome::AddKeyword { target, keyword } => match state.card_mut(target) {
                Some(card) => card.grant_keyword(keyword),
                None => warn!(%target, "keyword target is gone; skipped"),
            },

            Outcome::RemoveAbilities(targets) => {
                for id in targets {
                    match state.card_mut(id) {
                        Some(card) => card.abilities_cancelled = true,
                        None => warn!(%id, "ability-removal target is gone; skipped"),
                    }
                }
            }

            Outcome::TransformCard { target, template } => {
                match (state.card(target).is_some(), catalog.template(template)) {
                    (true, Some(new_template)) => {
                        let card = state.card_mut(target).expect("checked above");
                        let old_name = card.name.clone();
                        card.transform(new_template);
                        let new_name = new_template.name.clone();
                        state.log(format!("{old_name} transforms into {new_name}"));
                    }
                    (false, _) => warn!(%target, "transform target is gone; skipped"),
                    (_, None) => warn!(%template, "transform template unknown; skipped"),
                }
            }

            Outcome::BuffCreature { target, atk, hp } => match state.card_mut(target) {
                Some(card) => card.buff(atk, hp),
                None => warn!(%target, "buff target is gone; skipped"),
            },

            Outcome::TeamBuff { player, atk, hp } => {
                let targets = state.field_creatures(player);
                for id in targets {
                    if let Some(card) = state.card_mut(id) {
                        card.buff(atk, hp);
                    }
                }
                state.log(format!("{player}'s creatures gain +{atk}/+{hp}"));
            }

            Outcome::CopyAbilities { target, source } => {
                let Some(src) = state.card(source) else {
                    warn!(%source, "ability-copy source is gone; skipped");
                    return;
                };
                let hooks = src.hook_source();
                let keywords = src.keywords();
                match state.card_mut(target) {
                    Some(card) => {
                        card.hooks_from = Some(hooks);
                        for keyword in keywords {
                            card.grant_keyword(keyword);
                        }
                    }
                    None => warn!(%target, "ability-copy target is gone; skipped"),
                }
            }

            Outcome::CopyStats { target, source } => {
                let Some(src) = state.card(source) else {
                    warn!(%source, "stat-copy source is gone; skipped");
                    return;
                };
                let (atk, hp) = (src.atk, src.hp);
                match state.card_mut(target) {
                    Some(card) => {
                        card.atk = atk;
                        card.hp = hp;
                    }
                    None => warn!(%target, "stat-copy target is gone; skipped"),
                }
            }

            Outcome::StealCreature { target } => {
                let thief = ctx.player;
                let Some(card) = state.card(target) else {
                    warn!(%target, "steal target is gone; skipped");
                    return;
                };
                if card.owner == thief || card.zone != ZoneKind::Field {
                    warn!(%target, "steal target is not an enemy field creature; skipped");
                    return;
                }
                let name = card.name.clone();
                match state.zones(thief).free_slot() {
                    Some(slot) => {
                        // place_on_field transfers control.
                        if state.place_on_field(target, thief, slot).is_ok() {
                            state.log(format!("{thief} steals {name}"));
                        }
                    }
                    None => state.log(format!("{thief} has no room to steal {name}")),
                }
            }

            Outcome::ReturnToHand { target } => {
                let Some(card) = state.card(target) else {
                    warn!(%target, "bounce target is gone; skipped");
                    return;
                };
                if card.zone != ZoneKind::Field {
                    warn!(%target, "bounce target is not on the field; skipped");
                    return;
                }
                let name = card.name.clone();
                let template_id = card.template_id;
                let turn = state.turn;
                if state.move_to_zone(target, ZoneKind::Hand).is_ok() {
                    // A bounced creature goes back to hand as a fresh copy.
                    if let Some(template) = catalog.template(template_id) {
                        if let Some(card) = state.card_mut(target) {
                            card.reset_to_base(template, turn);
                        }
                    }
                    state.log(format!("{name} returns to hand"));
                }
            }

            Outcome::ReviveFromCarrion { target } => {
                let player = ctx.player;
                if !state.zones(player).contains(ZoneKind::Carrion, target) {
                    warn!(%target, "revival target is not in carrion; skipped");
                    return;
                }
                let Some(slot) = state.zones(player).free_slot() else {
                    state.log(format!("{player} has no room for a revival"));
                    return;
                };
                let Some(card) = state.card(target) else {
                    warn!(%target, "revival target is gone; skipped");
                    return;
                };
                if !card.category.is_creature() {
                    warn!(%target, "revival target is not a creature; skipped");
                    return;
                }
                let name = card.name.clone();
                let template_id = card.template_id;
                let turn = state.turn;
                if let Some(template) = catalog.template(template_id) {
                    if let Some(card) = state.card_mut(target) {
                        card.reset_to_base(template, turn);
                    }
                }
                if state.place_on_field(target, player, slot).is_ok() {
                    state.log(format!("{name} claws back from the carrion pile"));
                }
            }

            Outcome::DiscardFromHand { target } => {
                let Some(card) = state.card(target) else {
                    warn!(%target, "discard target is gone; skipped");
                    return;
                };
                if card.zone != ZoneKind::Hand {
                    warn!(%target, "discard target is not in hand; skipped");
                    return;
                }
                let name = card.name.clone();
                if state.move_to_zone(target, ZoneKind::Carrion).is_ok() {
                    state.log(format!("{name} is discarded"));
                }
            }

            Outcome::SummonTokens { player, templates } => {
                for template_id in templates {
                    let Some(template) = catalog.template(template_id) else {
                        warn!(%template_id, "token template unknown; skipped");
                        continue;
                    };
                    let name = template.name.clone();
                    match state.summon_token(template, player) {
                        Some(_) => state.log(format!("{player} summons {name}")),
                        None => {
                            state.log(format!("{player} has no room for {name}"));
                            break;
                        }
                    }
                }
            }

            Outcome::AddToHand {
                player,
                template,
                source_note,
            } => match catalog.template(template) {
                Some(t) => {
                    let name = t.name.clone();
                    state.mint_into_zone(t, player, ZoneKind::Hand);
                    let suffix = source_note.map(|s| format!(" ({s})")).unwrap_or_default();
                    state.log(format!("{name} is added to {player}'s hand{suffix}"));
                }
                None => warn!(%template, "hand-add template unknown; skipped"),
            },

            Outcome::RevealHand { player, turns } => {
                let until = state.turn + turns;
                state.player_mut(player).hand_revealed_until = Some(until);
                state.log(format!("{player}'s hand is revealed"));
            }

            Outcome::SetFieldSpell { card } => {
                let Some(instance) = state.card(card) else {
                    warn!(%card, "field-spell card is gone; skipped");
                    return;
                };
                let name = instance.name.clone();
                // Displace the previous binding to its owner's carrion.
                if let Some(previous) = state.field_spell.take() {
                    let _ = state.move_to_zone(previous.card, ZoneKind::Carrion);
                }
                state.detach(card);
                if let Some(instance) = state.card_mut(card) {
                    instance.zone = ZoneKind::FieldSpell;
                }
                state.field_spell = Some(crate::core::state::FieldSpellBinding {
                    owner: ctx.player,
                    card,
                });
                state.log(format!("{name} settles over the field"));
            }

            Outcome::EndTurn => {
                state.turn_end_requested = true;
            }

            Outcome::NegateAttack => state.veto.attack = true,
            Outcome::NegateDamage => state.veto.damage = true,
            Outcome::NegateCombat => state.veto.combat = true,
            Outcome::NegatePlay => state.veto.play = true,

            // Handled by `run`; unreachable here.
            Outcome::None | Outcome::Sequence(_) | Outcome::Defer(_) | Outcome::Select(_) => {}
        }
    }
}
