//! Engine error taxonomy.
//!
//! Nothing here is fatal to the process. "No legal target" is deliberately
//! absent: a hook that finds zero candidates returns [`Outcome::None`]
//! (see `effects::outcome`), never an error. Everything else is either
//! rejected before mutation or rolled back at the action boundary.

use thiserror::Error;

use crate::core::ids::{InstanceId, TemplateId};
use crate::core::player::PlayerId;

/// Errors surfaced by the action entry points and the selection protocol.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum EngineError {
    /// A referenced card instance does not exist in this game.
    #[error("card instance {0} not found")]
    UnknownInstance(InstanceId),

    /// A referenced template id has no catalog entry.
    #[error("template {0} not found in catalog")]
    UnknownTemplate(TemplateId),

    /// The acting player is not the active player.
    #[error("{0} cannot act outside their turn")]
    NotYourTurn(PlayerId),

    /// A card was expected in a specific zone but is elsewhere.
    #[error("card instance {0} is not in the expected zone")]
    NotInZone(InstanceId),

    /// A creature was declared as attacker twice in one turn.
    #[error("creature {0} has already attacked this turn")]
    AlreadyAttacked(InstanceId),

    /// A frozen creature was declared as attacker.
    #[error("creature {0} is frozen")]
    Frozen(InstanceId),

    /// The declared combat target is not legal for this attacker.
    #[error("illegal combat target")]
    IllegalTarget,

    /// Direct attacks on the player require an empty defender field plus
    /// Haste or an earlier summoning turn.
    #[error("creature {0} cannot attack the player directly")]
    CannotAttackPlayer(InstanceId),

    /// The chosen field slot is occupied or out of range.
    #[error("field slot {0} is not available")]
    SlotUnavailable(u8),

    /// The turn's standard play allowance was already spent.
    #[error("standard play already used this turn")]
    PlayAllowanceUsed,

    /// The consuming card is not a predator on the acting player's field.
    #[error("card instance {0} cannot consume")]
    NotAPredator(InstanceId),

    /// A consumption target was invalid (wrong owner, wrong zone, duplicate,
    /// or the predator itself). The whole consumption is rejected.
    #[error("invalid consumption target {0}")]
    InvalidConsumption(InstanceId),

    /// An action arrived while a trap decision is pending.
    #[error("a trap decision is pending")]
    TrapDecisionPending,

    /// A trap decision was resolved but none is pending.
    #[error("no trap decision is pending")]
    NoTrapDecision,

    /// A selection was resumed with a choice not among the offered
    /// candidates. The selection remains open.
    #[error("choice is not among the offered candidates")]
    InvalidChoice,
}
