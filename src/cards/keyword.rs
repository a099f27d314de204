//! Creature keywords as an enum set.
//!
//! Keywords are capability bits checked constantly during combat target
//! selection and damage resolution, so they live in an `EnumSet` (one word,
//! O(1) membership) rather than a list of names. Pairwise interactions
//! (Ambush/Barrier, Lure/Hidden, Neurotoxic both ways) are covered by
//! combat tests.

use enumset::EnumSetType;
use serde::{Deserialize, Serialize};

/// All creature keywords recognized by the engine.
#[derive(EnumSetType, Debug, Hash, Serialize, Deserialize)]
pub enum Keyword {
    /// Attacker takes no retaliation if its damage kills the defender in
    /// the same exchange.
    Ambush,
    /// One-shot damage shield. Seeds `has_barrier` on the instance.
    Barrier,
    /// Forces attackers to target this creature over non-Lure creatures.
    Lure,
    /// Untargetable by ordinary attackers.
    Hidden,
    /// Untargetable by ordinary attackers.
    Invisible,
    /// Attack targeting ignores Hidden and Invisible.
    Acuity,
    /// Freezes whatever it damages in combat.
    Neurotoxic,
    /// May attack the turn it is summoned.
    Haste,
    /// A predator with this keyword can itself be consumed, contributing
    /// its current attack as nutrition.
    Edible,
}

impl std::fmt::Display for Keyword {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Keyword::Ambush => "Ambush",
            Keyword::Barrier => "Barrier",
            Keyword::Lure => "Lure",
            Keyword::Hidden => "Hidden",
            Keyword::Invisible => "Invisible",
            Keyword::Acuity => "Acuity",
            Keyword::Neurotoxic => "Neurotoxic",
            Keyword::Haste => "Haste",
            Keyword::Edible => "Edible",
        };
        write!(f, "{name}")
    }
}
