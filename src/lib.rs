//! # predation
//!
//! The rules engine of a two-player predator/prey collectible card game:
//! creatures fight on a three-slot battlefield, cards trigger effects at
//! defined timing hooks, and predators grow by consuming prey.
//!
//! ## Design Principles
//!
//! 1. **Effects are data**: cards carry serializable effect descriptors,
//!    not closures. A pure evaluator turns a descriptor into an outcome;
//!    only the interpreter mutates state.
//!
//! 2. **Suspension is a value**: an effect that needs a live target choice
//!    returns a `PendingSelection` (candidates enumerable, continuation a
//!    serializable token) which the caller (UI or AI search) resumes
//!    explicitly. No callback queues, no hidden scheduler.
//!
//! 3. **Deaths are swept, never inlined**: damage only flags creatures
//!    destruction-pending; the carrion pipeline relocates them after the
//!    action completes, firing death triggers back through the
//!    interpreter, so simultaneous deaths resolve consistently.
//!
//! 4. **Deterministic and cloneable**: the only randomness flows through a
//!    seeded, forkable RNG, and `GameState` clones cheaply so search can
//!    branch and actions can roll back all-or-nothing.
//!
//! ## Modules
//!
//! - `core`: ids, players, RNG, game log, game state
//! - `catalog`: immutable card templates and their registry
//! - `cards`: runtime instances, keywords, sync snapshots
//! - `zones`: hands/decks/carrion/exile/traps plus the 3-slot field
//! - `effects`: outcome vocabulary, descriptors, continuation resolver
//! - `combat`: target legality and simultaneous keyword-modified damage
//! - `consume`: the nutrition engine
//! - `sweep`: the destruction/carrion pipeline
//! - `actions`: player-action entry points with trap interrupts

pub mod actions;
pub mod cards;
pub mod catalog;
pub mod combat;
pub mod consume;
pub mod core;
pub mod effects;
pub mod error;
pub mod sweep;
pub mod zones;

// Re-export commonly used types
pub use crate::core::{
    GameLog, GameRng, GameRngState, GameState, InstanceId, PerPlayer, PlayerId, PlayerState,
    TemplateId, VetoFlags, STARTING_HP,
};

pub use crate::catalog::{CardCategory, CardTemplate, Catalog, HookSet, TrapTrigger};

pub use crate::cards::{CardInstance, CardSnapshot, Keyword};

pub use crate::zones::{PlayerZones, ZoneKind, FIELD_SLOTS};

pub use crate::effects::{
    interpreter::{Applied, Interpreter, PendingSelection, SelectionRejected},
    outcome::{Candidate, Choice, HookContext, Outcome, SelectionRequest},
    spec::{EffectSpec, SelectAction, SelectPool, SelectSpec},
    HookKind,
};

pub use crate::combat::{AttackTarget, ClashReport, FREEZE_TURNS};

pub use crate::consume::ConsumeSource;

pub use crate::actions::{
    consume_prey, declare_attack, discard_card, end_turn, play_card, resolve_trap_decision,
    resume_selection, ActionResult,
};

pub use crate::error::EngineError;
