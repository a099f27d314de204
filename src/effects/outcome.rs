//! The effect outcome vocabulary.
//!
//! Every hook and trap resolves to an [`Outcome`]: a closed, tagged
//! description of what happens, which only the interpreter turns into state
//! mutation. An outcome is either nothing, one simple effect, an ordered
//! compound of effects, a deferred descriptor (re-evaluated against the
//! state current at its position in the compound), or a selection request
//! that suspends resolution until the caller supplies a choice.
//!
//! Selection requests carry a serializable candidate list and a resumption
//! token, never a live closure: the caller (UI or AI search) can enumerate,
//! persist, and replay them.

use serde::{Deserialize, Serialize};

use crate::cards::keyword::Keyword;
use crate::core::ids::{InstanceId, TemplateId};
use crate::core::player::PlayerId;
use crate::effects::continuation::ResumeToken;
use crate::effects::spec::EffectSpec;

/// Who an effect acts for and which card produced it.
///
/// `Heal`, `Draw`, and `DamageOpponent` are relative to `player`; on-slain
/// hooks additionally see the slayer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HookContext {
    /// The player the effect acts for.
    pub player: PlayerId,
    /// The card whose hook produced the outcome, if any.
    pub source: Option<InstanceId>,
    /// The creature that slew the source (on-slain hooks only).
    pub slain_by: Option<InstanceId>,
}

impl HookContext {
    /// Context for a player-level effect with no source card.
    #[must_use]
    pub fn for_player(player: PlayerId) -> Self {
        Self {
            player,
            source: None,
            slain_by: None,
        }
    }

    /// Context for a card's hook.
    #[must_use]
    pub fn for_card(player: PlayerId, source: InstanceId) -> Self {
        Self {
            player,
            source: Some(source),
            slain_by: None,
        }
    }

    /// Attach the slaying creature (builder pattern).
    #[must_use]
    pub fn slain_by(mut self, slayer: Option<InstanceId>) -> Self {
        self.slain_by = slayer;
        self
    }
}

/// An opaque value a selection candidate stands for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Choice {
    /// A creature on some field.
    Creature(InstanceId),
    /// A card in a hand or carrion pile.
    Card(InstanceId),
    /// A field slot.
    Slot(u8),
    /// A player.
    Player(PlayerId),
    /// Decline the selection.
    Pass,
}

/// One selectable option: a display label plus the value it stands for.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub label: String,
    pub choice: Choice,
}

impl Candidate {
    /// Create a candidate.
    #[must_use]
    pub fn new(label: impl Into<String>, choice: Choice) -> Self {
        Self {
            label: label.into(),
            choice,
        }
    }
}

/// A suspended choice: title, enumerable candidates, and the continuation
/// that produces the next outcome once a candidate is chosen.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SelectionRequest {
    pub title: String,
    pub candidates: Vec<Candidate>,
    pub resume: ResumeToken,
}

impl SelectionRequest {
    /// Whether the request offers anything beyond declining.
    #[must_use]
    pub fn has_real_candidates(&self) -> bool {
        self.candidates
            .iter()
            .any(|c| !matches!(c.choice, Choice::Pass))
    }
}

/// Everything a hook or trap can resolve to.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Outcome {
    /// Nothing happened (e.g. no legal target).
    None,

    // === Player effects (relative to the hook context) ===
    /// Restore health to the acting player. Uncapped.
    Heal { amount: i32 },
    /// Draw cards from the acting player's deck.
    Draw { count: u32 },
    /// Damage the acting player's opponent.
    DamageOpponent { amount: i32 },

    // === Creature effects ===
    /// Barrier-aware damage to one creature.
    DamageCreature {
        target: InstanceId,
        amount: i32,
        source_label: Option<String>,
    },
    /// Barrier-aware damage to every creature on both fields.
    DamageAllCreatures { amount: i32 },
    /// Direct kill: destruction-pending, bypassing barriers.
    KillTargets(Vec<InstanceId>),
    /// Idempotently add a keyword to a creature's effective set.
    AddKeyword {
        target: InstanceId,
        keyword: Keyword,
    },
    /// Cancel abilities: every later hook lookup on these yields nothing.
    RemoveAbilities(Vec<InstanceId>),
    /// Replace a card with a different template.
    TransformCard {
        target: InstanceId,
        template: TemplateId,
    },
    /// Permanent single-creature stat change.
    BuffCreature {
        target: InstanceId,
        atk: i32,
        hp: i32,
    },
    /// Permanent stat change for every creature on a player's field.
    TeamBuff { player: PlayerId, atk: i32, hp: i32 },
    /// Copy hooks and keywords from `source` onto `target`.
    CopyAbilities {
        target: InstanceId,
        source: InstanceId,
    },
    /// Copy current stats from `source` onto `target`.
    CopyStats {
        target: InstanceId,
        source: InstanceId,
    },
    /// Move an enemy creature to the acting player's field.
    StealCreature { target: InstanceId },
    /// Return a field creature to its owner's hand at base stats.
    ReturnToHand { target: InstanceId },
    /// Return a card from the acting player's carrion to the field.
    ReviveFromCarrion { target: InstanceId },
    /// Move a card from its owner's hand to carrion (effect-driven; the
    /// discard *action* additionally fires the discard hook).
    DiscardFromHand { target: InstanceId },

    // === Zone / game effects ===
    /// Mint a token on each free field slot, in order, until slots or
    /// templates run out.
    SummonTokens {
        player: PlayerId,
        templates: Vec<TemplateId>,
    },
    /// Mint a template straight into a player's hand.
    AddToHand {
        player: PlayerId,
        template: TemplateId,
        source_note: Option<String>,
    },
    /// Reveal a player's hand to the opponent for some turns.
    RevealHand { player: PlayerId, turns: u32 },
    /// Bind a field spell for the acting player, displacing any previous
    /// binding to its owner's carrion.
    SetFieldSpell { card: InstanceId },
    /// Request the turn end once the current action completes.
    EndTurn,

    // === Combat/play negation (consumed by the action layer) ===
    /// Cancel the pending attack; the attacker keeps its attack.
    NegateAttack,
    /// Negate the attacker's damage; retaliation still happens.
    NegateDamage,
    /// Cancel combat damage both ways; the attack is spent.
    NegateCombat,
    /// Cancel the pending card play.
    NegatePlay,

    // === Composition ===
    /// Ordered compound: applied left to right, later members observe
    /// earlier members' effects, every member is attempted.
    Sequence(Vec<Outcome>),
    /// A descriptor evaluated lazily, against the state current when the
    /// interpreter reaches it. This is how chained prompts see the result
    /// of earlier choices.
    Defer(Box<EffectSpec>),
    /// Suspend for a choice.
    Select(SelectionRequest),
}

impl Outcome {
    /// Convenience: a sequence, flattening nothing.
    #[must_use]
    pub fn seq(outcomes: impl IntoIterator<Item = Outcome>) -> Self {
        Outcome::Sequence(outcomes.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_has_real_candidates() {
        let req = SelectionRequest {
            title: "Pick".into(),
            candidates: vec![Candidate::new("Pass", Choice::Pass)],
            resume: ResumeToken::noop(),
        };
        assert!(!req.has_real_candidates());

        let req = SelectionRequest {
            title: "Pick".into(),
            candidates: vec![
                Candidate::new("Rat", Choice::Creature(InstanceId(1))),
                Candidate::new("Pass", Choice::Pass),
            ],
            resume: ResumeToken::noop(),
        };
        assert!(req.has_real_candidates());
    }

    #[test]
    fn test_outcome_serialization() {
        let outcome = Outcome::seq([
            Outcome::Heal { amount: 4 },
            Outcome::DamageCreature {
                target: InstanceId(3),
                amount: 2,
                source_label: Some("Thorn Trap".into()),
            },
        ]);

        let json = serde_json::to_string(&outcome).unwrap();
        let back: Outcome = serde_json::from_str(&json).unwrap();
        assert_eq!(outcome, back);
    }
}
