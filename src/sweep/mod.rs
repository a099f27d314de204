//! The destruction/carrion pipeline.
//!
//! Run once after every player action (and after combat) completes. The
//! sweep iterates per-player per-slot, re-checking health at each visit:
//! creatures at non-positive health fire their on-slain hook (combat
//! deaths only, abilities permitting) back through the interpreter, then
//! move unconditionally to their owner's carrion. Deaths caused by a death
//! trigger are caught by the remaining iteration of the same pass.
//!
//! Tearing down the field-spell binding when its card dies also lives
//! here, so every route out of the field goes through one place.

use tracing::debug;

use crate::catalog::Catalog;
use crate::core::player::PlayerId;
use crate::core::state::GameState;
use crate::effects::{fire_hook_sync, HookKind};
use crate::zones::{FIELD_SLOTS, ZoneKind};

/// Sweep both fields, destroying every creature at non-positive health.
///
/// Returns the number of creatures moved to carrion. Running the sweep
/// again with no new damage is a no-op.
pub fn run_sweep(state: &mut GameState, catalog: &Catalog) -> usize {
    let mut destroyed = 0;

    for player in PlayerId::BOTH {
        for slot in 0..FIELD_SLOTS {
            let Some(id) = state.zones(player).field[slot] else {
                continue;
            };
            let Some(card) = state.card(id) else {
                continue;
            };
            if !card.is_destruction_pending() {
                continue;
            }

            let name = card.name.clone();
            let slain_by = card.slain_by;
            debug!(%id, slot, "sweeping destroyed creature");

            // Death triggers fire only for combat deaths, and may
            // themselves fell more creatures; those are picked up by the
            // remaining iteration of this pass.
            if slain_by.is_some() {
                fire_hook_sync(state, catalog, id, HookKind::OnSlain, slain_by);
            }

            // The card moves regardless of what its hook just did.
            if state
                .move_to_zone(id, ZoneKind::Carrion)
                .is_ok()
            {
                destroyed += 1;
                state.log(format!("{name} falls to the carrion pile"));
            }

            if state.field_spell.is_some_and(|b| b.card == id) {
                state.field_spell = None;
                state.log("the field spell fades".to_string());
            }
        }
    }

    destroyed
}
