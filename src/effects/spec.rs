//! Serializable effect descriptors - the data half of card behavior.
//!
//! Card templates attach an [`EffectSpec`] to each timing hook instead of a
//! function: behavior stays in the pure evaluator below, keyed by the
//! descriptor's tag, so card data can be shipped over the wire and cloned
//! into search branches.
//!
//! Evaluation is pure with respect to already-applied state: it reads the
//! state to build candidate lists but mutates nothing. A descriptor whose
//! selection pool turns out empty evaluates to [`Outcome::None`]: "no
//! legal target" is a result, never an error.

use serde::{Deserialize, Serialize};

use crate::cards::keyword::Keyword;
use crate::core::ids::TemplateId;
use crate::core::state::GameState;

use super::continuation::ResumeToken;
use super::outcome::{Candidate, Choice, HookContext, Outcome, SelectionRequest};

/// What a selection's chosen card has done to it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum SelectAction {
    /// Barrier-aware damage.
    Damage(i32),
    /// Direct kill, bypassing barriers.
    Kill,
    /// Permanent stat change.
    Buff { atk: i32, hp: i32 },
    /// Keyword grant.
    AddKeyword(Keyword),
    /// Cancel the chosen creature's abilities.
    RemoveAbilities,
    /// Bounce the chosen creature to its owner's hand.
    ReturnToHand,
    /// Take control of the chosen enemy creature.
    Steal,
    /// Return the chosen carrion card to the field.
    Revive,
    /// Discard the chosen hand card.
    Discard,
    /// Replace the chosen card with another template.
    Transform(TemplateId),
    /// Copy the chosen card's hooks and keywords onto the hook's source.
    CopyAbilitiesToSource,
    /// Copy the chosen card's current stats onto the hook's source.
    CopyStatsToSource,
}

/// Which cards a selection offers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SelectPool {
    /// Opposing field creatures. Hidden and Invisible creatures cannot be
    /// picked out by effects.
    EnemyCreatures,
    /// The acting player's field creatures.
    FriendlyCreatures,
    /// Every field creature (enemy side filtered as above).
    AllCreatures,
    /// The acting player's carrion pile.
    OwnCarrion,
    /// The acting player's hand.
    OwnHand,
}

/// A selection descriptor: pool, action, and optional chain.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SelectSpec {
    /// Prompt shown to the chooser.
    pub title: String,
    /// Which cards are offered.
    pub pool: SelectPool,
    /// What happens to the chosen card.
    pub action: SelectAction,
    /// When set, a Pass candidate is offered.
    pub optional: bool,
    /// Evaluated after the choice resolves, against the post-choice state.
    /// May itself be another selection: this is how prompts chain.
    pub then: Option<Box<EffectSpec>>,
}

/// The per-card effect descriptor vocabulary.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum EffectSpec {
    /// Damage the opposing player.
    DamageOpponent(i32),
    /// Restore the acting player's health.
    HealSelf(i32),
    /// Draw cards.
    DrawCards(u32),
    /// Barrier-aware damage to every field creature.
    DamageAllCreatures(i32),
    /// Permanently buff the hook's source card.
    BuffSource { atk: i32, hp: i32 },
    /// Permanently buff the acting player's whole field.
    TeamBuff { atk: i32, hp: i32 },
    /// Grant the hook's source card a keyword.
    GrantSourceKeyword(Keyword),
    /// Mint tokens onto the acting player's free slots.
    SummonTokens(Vec<TemplateId>),
    /// Mint a template into the acting player's hand.
    AddToHand(TemplateId),
    /// Reveal the opponent's hand for some turns.
    RevealOpponentHand { turns: u32 },
    /// On-slain only: damage the creature that slew the source.
    RevengeDamage(i32),
    /// End the turn once the current action completes.
    EndTurn,
    /// Trap effects: cancel the pending attack.
    NegateAttack,
    /// Trap effects: cancel combat damage both ways.
    NegateCombat,
    /// Trap effects: negate the attacker's damage.
    NegateDamage,
    /// Trap effects: cancel the pending play.
    NegatePlay,
    /// Suspend for a target choice.
    Select(SelectSpec),
    /// Ordered composition; members are deferred so later ones observe
    /// earlier members' effects.
    Seq(Vec<EffectSpec>),
}

impl EffectSpec {
    /// Convenience constructor for a required selection.
    #[must_use]
    pub fn select(title: impl Into<String>, pool: SelectPool, action: SelectAction) -> Self {
        EffectSpec::Select(SelectSpec {
            title: title.into(),
            pool,
            action,
            optional: false,
            then: None,
        })
    }

    /// Chain a follow-up onto a selection (builder pattern).
    ///
    /// Panics when applied to a non-selection; chains elsewhere are
    /// expressed with [`EffectSpec::Seq`].
    #[must_use]
    pub fn then(mut self, next: EffectSpec) -> Self {
        match &mut self {
            EffectSpec::Select(spec) => {
                spec.then = Some(Box::new(next));
                self
            }
            _ => panic!("then() chains selections; use Seq for other specs"),
        }
    }
}

/// Evaluate a descriptor into an outcome. Pure: reads state, mutates
/// nothing.
#[must_use]
pub fn eval(state: &GameState, ctx: &HookContext, spec: &EffectSpec) -> Outcome {
    match spec {
        EffectSpec::DamageOpponent(amount) => Outcome::DamageOpponent { amount: *amount },
        EffectSpec::HealSelf(amount) => Outcome::Heal { amount: *amount },
        EffectSpec::DrawCards(count) => Outcome::Draw { count: *count },
        EffectSpec::DamageAllCreatures(amount) => Outcome::DamageAllCreatures { amount: *amount },
        EffectSpec::BuffSource { atk, hp } => match ctx.source {
            Some(source) => Outcome::BuffCreature {
                target: source,
                atk: *atk,
                hp: *hp,
            },
            None => Outcome::None,
        },
        EffectSpec::TeamBuff { atk, hp } => Outcome::TeamBuff {
            player: ctx.player,
            atk: *atk,
            hp: *hp,
        },
        EffectSpec::GrantSourceKeyword(keyword) => match ctx.source {
            Some(source) => Outcome::AddKeyword {
                target: source,
                keyword: *keyword,
            },
            None => Outcome::None,
        },
        EffectSpec::SummonTokens(templates) => Outcome::SummonTokens {
            player: ctx.player,
            templates: templates.clone(),
        },
        EffectSpec::AddToHand(template) => Outcome::AddToHand {
            player: ctx.player,
            template: *template,
            source_note: None,
        },
        EffectSpec::RevealOpponentHand { turns } => Outcome::RevealHand {
            player: ctx.player.opponent(),
            turns: *turns,
        },
        EffectSpec::RevengeDamage(amount) => match ctx.slain_by {
            Some(slayer) => Outcome::DamageCreature {
                target: slayer,
                amount: *amount,
                source_label: ctx
                    .source
                    .and_then(|s| state.card(s))
                    .map(|c| c.name.clone()),
            },
            None => Outcome::None,
        },
        EffectSpec::EndTurn => Outcome::EndTurn,
        EffectSpec::NegateAttack => Outcome::NegateAttack,
        EffectSpec::NegateCombat => Outcome::NegateCombat,
        EffectSpec::NegateDamage => Outcome::NegateDamage,
        EffectSpec::NegatePlay => Outcome::NegatePlay,
        EffectSpec::Seq(specs) => Outcome::Sequence(
            specs
                .iter()
                .map(|s| Outcome::Defer(Box::new(s.clone())))
                .collect(),
        ),
        EffectSpec::Select(select) => eval_select(state, ctx, select),
    }
}

fn eval_select(state: &GameState, ctx: &HookContext, select: &SelectSpec) -> Outcome {
    let mut candidates = collect_candidates(state, ctx, select.pool);
    if candidates.is_empty() {
        // No legal target: the hook resolves to nothing, chain included.
        return Outcome::None;
    }
    if select.optional {
        candidates.push(Candidate::new("Pass", Choice::Pass));
    }
    Outcome::Select(SelectionRequest {
        title: select.title.clone(),
        candidates,
        resume: ResumeToken::apply(select.action.clone(), select.then.clone()),
    })
}

fn collect_candidates(state: &GameState, ctx: &HookContext, pool: SelectPool) -> Vec<Candidate> {
    let mut out = Vec::new();
    let own = ctx.player;

    let push_field = |player, effect_targetable: bool, out: &mut Vec<Candidate>| {
        for id in state.zones(player).field_creatures() {
            let Some(card) = state.card(id) else { continue };
            if card.is_destruction_pending() {
                continue;
            }
            if effect_targetable
                && (card.has_keyword(Keyword::Hidden) || card.has_keyword(Keyword::Invisible))
            {
                continue;
            }
            out.push(Candidate::new(card.name.clone(), Choice::Creature(id)));
        }
    };

    match pool {
        SelectPool::EnemyCreatures => push_field(own.opponent(), true, &mut out),
        SelectPool::FriendlyCreatures => push_field(own, false, &mut out),
        SelectPool::AllCreatures => {
            push_field(own, false, &mut out);
            push_field(own.opponent(), true, &mut out);
        }
        SelectPool::OwnCarrion => {
            // Only creatures come back from (or out of) the carrion pile.
            for &id in &state.zones(own).carrion {
                if let Some(card) = state.card(id) {
                    if card.category.is_creature() {
                        out.push(Candidate::new(card.name.clone(), Choice::Card(id)));
                    }
                }
            }
        }
        SelectPool::OwnHand => {
            for &id in &state.zones(own).hand {
                if let Some(card) = state.card(id) {
                    out.push(Candidate::new(card.name.clone(), Choice::Card(id)));
                }
            }
        }
    }

    out
}
