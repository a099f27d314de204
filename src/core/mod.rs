//! Core types: identifiers, players, RNG, the game log, and game state.

pub mod ids;
pub mod log;
pub mod player;
pub mod rng;
pub mod state;

pub use ids::{InstanceId, TemplateId};
pub use log::{GameLog, LOG_CAPACITY};
pub use player::{PerPlayer, PlayerId};
pub use rng::{GameRng, GameRngState};
pub use state::{
    FieldSpellBinding, GameState, InterruptedAction, PlayerState, TrapPrompt, VetoFlags,
    STARTING_HP,
};
