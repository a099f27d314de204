//! Effect system: outcome vocabulary, descriptors, and the interpreter.
//!
//! - `outcome`: the closed vocabulary of things an effect can do
//! - `spec`: serializable per-card descriptors and their pure evaluator
//! - `continuation`: selection resumption as data
//! - `interpreter`: the only place outcomes mutate state

pub mod continuation;
pub mod interpreter;
pub mod outcome;
pub mod spec;

use tracing::warn;

use crate::catalog::Catalog;
use crate::core::ids::InstanceId;
use crate::core::state::GameState;

use interpreter::{Applied, Interpreter};
use outcome::HookContext;
use spec::EffectSpec;

/// The timing hooks a card can carry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HookKind {
    OnPlay,
    OnSlain,
    OnTurnStart,
    OnTurnEnd,
    OnBeforeCombat,
    OnDefend,
    OnConsume,
    OnDiscard,
}

/// Look up a card's descriptor for a hook, honoring ability cancellation.
///
/// Cancelled cards fire nothing; copied abilities resolve through the
/// instance's hook source template.
#[must_use]
pub fn hook_spec<'a>(
    state: &GameState,
    catalog: &'a Catalog,
    id: InstanceId,
    kind: HookKind,
) -> Option<&'a EffectSpec> {
    let card = state.card(id)?;
    if card.abilities_cancelled {
        return None;
    }
    let hooks = &catalog.template(card.hook_source())?.hooks;
    match kind {
        HookKind::OnPlay => hooks.on_play.as_ref(),
        HookKind::OnSlain => hooks.on_slain.as_ref(),
        HookKind::OnTurnStart => hooks.on_turn_start.as_ref(),
        HookKind::OnTurnEnd => hooks.on_turn_end.as_ref(),
        HookKind::OnBeforeCombat => hooks.on_before_combat.as_ref(),
        HookKind::OnDefend => hooks.on_defend.as_ref(),
        HookKind::OnConsume => hooks.on_consume.as_ref(),
        HookKind::OnDiscard => hooks.on_discard.as_ref(),
    }
}

/// Evaluate and apply a card's hook, returning the interpreter result.
pub fn fire_hook(
    state: &mut GameState,
    catalog: &Catalog,
    id: InstanceId,
    kind: HookKind,
    slain_by: Option<InstanceId>,
) -> Applied {
    let Some(spec) = hook_spec(state, catalog, id, kind) else {
        return Applied::Complete;
    };
    let spec = spec.clone();
    let Some(card) = state.card(id) else {
        return Applied::Complete;
    };
    let ctx = HookContext::for_card(card.owner, id).slain_by(slain_by);
    let outcome = spec::eval(state, &ctx, &spec);
    Interpreter::apply(state, catalog, ctx, outcome)
}

/// Fire a hook in a context that cannot suspend (death triggers, turn
/// hooks, combat hooks, trap effects). A selection emerging here is a
/// content defect: it is logged and dropped, the rest of the pipeline
/// continues.
pub fn fire_hook_sync(
    state: &mut GameState,
    catalog: &Catalog,
    id: InstanceId,
    kind: HookKind,
    slain_by: Option<InstanceId>,
) {
    if let Applied::Pending(pending) = fire_hook(state, catalog, id, kind, slain_by) {
        warn!(
            title = pending.title(),
            ?kind,
            "hook requested a selection in a synchronous context; dropped"
        );
    }
}
