//! Selection continuations as data.
//!
//! A suspended selection must survive serialization and AI replay, so the
//! "what happens next" is a [`ResumeToken`], a tagged value dispatched
//! through the pure `resume` function below, never a captured closure.
//!
//! Chained prompts fall out naturally: the token's `then` descriptor is
//! deferred, so when the interpreter reaches it the candidate list for the
//! *next* prompt is built against the post-choice state.

use serde::{Deserialize, Serialize};

use crate::core::state::GameState;

use super::outcome::{Choice, HookContext, Outcome};
use super::spec::{EffectSpec, SelectAction};

/// The serializable continuation of a selection request.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ResumeToken {
    /// What to do to the chosen card. `None` resumes straight into `then`.
    pub action: Option<SelectAction>,
    /// Evaluated after the action, against the post-action state.
    pub then: Option<Box<EffectSpec>>,
}

impl ResumeToken {
    /// A continuation that does nothing (used by tests and placeholders).
    #[must_use]
    pub fn noop() -> Self {
        Self {
            action: None,
            then: None,
        }
    }

    /// The standard continuation: apply an action, then maybe chain.
    #[must_use]
    pub fn apply(action: SelectAction, then: Option<Box<EffectSpec>>) -> Self {
        Self {
            action: Some(action),
            then,
        }
    }
}

/// Produce the outcome that follows a choice. Pure: reads state, mutates
/// nothing; the interpreter applies whatever comes back.
#[must_use]
pub fn resume(
    _state: &GameState,
    ctx: &HookContext,
    token: &ResumeToken,
    choice: Choice,
) -> Outcome {
    let chain = token
        .then
        .as_ref()
        .map(|spec| Outcome::Defer(spec.clone()));

    // Declining skips the action; an explicit chain still runs.
    let picked = match choice {
        Choice::Creature(id) | Choice::Card(id) => Some(id),
        Choice::Pass => None,
        // Slot and player choices carry no card action in the current
        // vocabulary; they resume straight into the chain.
        Choice::Slot(_) | Choice::Player(_) => None,
    };

    let action_outcome = match (picked, &token.action) {
        (Some(id), Some(action)) => action_to_outcome(ctx, action, id),
        _ => Outcome::None,
    };

    match chain {
        Some(chain) => Outcome::seq([action_outcome, chain]),
        None => action_outcome,
    }
}

fn action_to_outcome(
    ctx: &HookContext,
    action: &SelectAction,
    id: crate::core::ids::InstanceId,
) -> Outcome {
    match action {
        SelectAction::Damage(amount) => Outcome::DamageCreature {
            target: id,
            amount: *amount,
            source_label: None,
        },
        SelectAction::Kill => Outcome::KillTargets(vec![id]),
        SelectAction::Buff { atk, hp } => Outcome::BuffCreature {
            target: id,
            atk: *atk,
            hp: *hp,
        },
        SelectAction::AddKeyword(keyword) => Outcome::AddKeyword {
            target: id,
            keyword: *keyword,
        },
        SelectAction::RemoveAbilities => Outcome::RemoveAbilities(vec![id]),
        SelectAction::ReturnToHand => Outcome::ReturnToHand { target: id },
        SelectAction::Steal => Outcome::StealCreature { target: id },
        SelectAction::Revive => Outcome::ReviveFromCarrion { target: id },
        SelectAction::Discard => Outcome::DiscardFromHand { target: id },
        SelectAction::Transform(template) => Outcome::TransformCard {
            target: id,
            template: *template,
        },
        SelectAction::CopyAbilitiesToSource => match ctx.source {
            Some(source) => Outcome::CopyAbilities {
                target: source,
                source: id,
            },
            None => Outcome::None,
        },
        SelectAction::CopyStatsToSource => match ctx.source {
            Some(source) => Outcome::CopyStats {
                target: source,
                source: id,
            },
            None => Outcome::None,
        },
    }
}
