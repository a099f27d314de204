//! Card instances - runtime card state.
//!
//! `CardInstance` is the mutable copy of a template that lives in exactly
//! one zone of exactly one player. Combat stats drift from their base
//! values through buffs, nutrition, and damage; status flags track the
//! one-shot barrier, freezing, summoning sickness, and cancellation.
//!
//! Invariant: `hp <= 0` means the creature is *destruction-pending*. It is
//! never relocated inline during damage application; only the destruction
//! sweep moves it to carrion, so simultaneous deaths are observed
//! consistently within one resolution pass.

use enumset::EnumSet;
use serde::{Deserialize, Serialize};

use crate::catalog::{CardCategory, CardTemplate};
use crate::core::ids::{InstanceId, TemplateId};
use crate::core::player::PlayerId;
use crate::zones::ZoneKind;

use super::keyword::Keyword;

/// A card instance in a game.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CardInstance {
    /// Unique id within this game.
    pub id: InstanceId,

    /// The template this instance was minted from (or transformed into).
    pub template_id: TemplateId,

    /// Display name, copied from the template.
    pub name: String,

    /// Category, copied from the template.
    pub category: CardCategory,

    /// Nutrition granted when consumed as prey, copied from the template.
    pub nutrition: i32,

    /// Current controller. Updated when a creature is stolen.
    pub owner: PlayerId,

    /// Current zone (kept in sync by `GameState` movement helpers).
    pub zone: ZoneKind,

    /// Current attack.
    pub atk: i32,

    /// Current health. `<= 0` means destruction-pending.
    pub hp: i32,

    /// Set when this creature attacks; reset at its controller's turn start.
    pub has_attacked: bool,

    /// Live one-shot damage shield.
    pub has_barrier: bool,

    /// First turn this creature may act again, if frozen.
    pub frozen_until: Option<u32>,

    /// Turn this instance entered the field (for summoning sickness).
    pub summoned_turn: u32,

    /// When set, every hook lookup on this instance yields nothing.
    pub abilities_cancelled: bool,

    /// Template this instance's hooks are read from, when copied from
    /// another card. `None` means its own template.
    pub hooks_from: Option<TemplateId>,

    /// The creature that slew this one, set only by combat resolution.
    /// `Some` marks a pending death as a combat death for the sweep.
    pub slain_by: Option<InstanceId>,

    base_keywords: EnumSet<Keyword>,
    granted: EnumSet<Keyword>,
    removed: EnumSet<Keyword>,
}

impl CardInstance {
    /// Mint an instance from a template.
    #[must_use]
    pub fn from_template(
        template: &CardTemplate,
        id: InstanceId,
        owner: PlayerId,
        zone: ZoneKind,
        turn: u32,
    ) -> Self {
        Self {
            id,
            template_id: template.id,
            name: template.name.clone(),
            category: template.category,
            nutrition: template.nutrition,
            owner,
            zone,
            atk: template.attack,
            hp: template.health,
            has_attacked: false,
            has_barrier: template.keywords.contains(Keyword::Barrier),
            frozen_until: None,
            summoned_turn: turn,
            abilities_cancelled: false,
            hooks_from: None,
            slain_by: None,
            base_keywords: template.keywords,
            granted: EnumSet::new(),
            removed: EnumSet::new(),
        }
    }

    /// The effective keyword set: base plus grants minus removals.
    #[must_use]
    pub fn keywords(&self) -> EnumSet<Keyword> {
        (self.base_keywords | self.granted) - self.removed
    }

    /// O(1) effective-keyword test.
    #[must_use]
    pub fn has_keyword(&self, keyword: Keyword) -> bool {
        self.keywords().contains(keyword)
    }

    /// Grant a keyword. Idempotent. Granting Barrier also arms the shield.
    pub fn grant_keyword(&mut self, keyword: Keyword) {
        self.removed.remove(keyword);
        self.granted.insert(keyword);
        if keyword == Keyword::Barrier {
            self.has_barrier = true;
        }
    }

    /// Remove a keyword from the effective set.
    pub fn remove_keyword(&mut self, keyword: Keyword) {
        self.removed.insert(keyword);
    }

    /// Keyword grants beyond the base set (for sync snapshots).
    #[must_use]
    pub fn granted_keywords(&self) -> EnumSet<Keyword> {
        self.granted
    }

    /// Keyword removals from the base set (for sync snapshots).
    #[must_use]
    pub fn removed_keywords(&self) -> EnumSet<Keyword> {
        self.removed
    }

    /// Restore keyword overrides from a sync snapshot.
    pub fn set_keyword_overrides(&mut self, granted: EnumSet<Keyword>, removed: EnumSet<Keyword>) {
        self.granted = granted;
        self.removed = removed;
    }

    /// Apply damage, honoring the one-shot barrier.
    ///
    /// Returns the amount that actually landed: the barrier absorbs the
    /// whole hit and is consumed, so a shielded creature reports 0.
    pub fn apply_damage(&mut self, amount: i32) -> i32 {
        if amount <= 0 {
            return 0;
        }
        if self.has_barrier {
            self.has_barrier = false;
            return 0;
        }
        self.hp -= amount;
        amount
    }

    /// Mark this instance destruction-pending, bypassing the barrier.
    ///
    /// Used by kill effects; a direct kill is not damage.
    pub fn mark_destroyed(&mut self) {
        self.hp = self.hp.min(0);
    }

    /// Whether this instance awaits the destruction sweep.
    #[must_use]
    pub fn is_destruction_pending(&self) -> bool {
        self.hp <= 0
    }

    /// Whether this creature is frozen on the given turn.
    #[must_use]
    pub fn is_frozen(&self, turn: u32) -> bool {
        self.frozen_until.is_some_and(|until| turn < until)
    }

    /// Freeze until the given turn (keeps the later thaw time if already
    /// frozen).
    pub fn freeze_until(&mut self, until: u32) {
        self.frozen_until = Some(self.frozen_until.map_or(until, |t| t.max(until)));
    }

    /// Permanently adjust current stats. Buffs are cumulative and uncapped.
    pub fn buff(&mut self, atk: i32, hp: i32) {
        self.atk += atk;
        self.hp += hp;
    }

    /// The template whose hooks this instance fires.
    #[must_use]
    pub fn hook_source(&self) -> TemplateId {
        self.hooks_from.unwrap_or(self.template_id)
    }

    /// Become a different card: stats, keywords, and hooks all read from
    /// the new template. Identity, owner, zone, and summoning turn persist.
    pub fn transform(&mut self, template: &CardTemplate) {
        self.template_id = template.id;
        self.name = template.name.clone();
        self.category = template.category;
        self.nutrition = template.nutrition;
        self.atk = template.attack;
        self.hp = template.health;
        self.has_barrier = template.keywords.contains(Keyword::Barrier);
        self.abilities_cancelled = false;
        self.hooks_from = None;
        self.slain_by = None;
        self.base_keywords = template.keywords;
        self.granted = EnumSet::new();
        self.removed = EnumSet::new();
    }

    /// Reset combat state to the template's base values. Used when a
    /// carrion card re-enters play: revival mints a fresh fighter, not a
    /// corpse with negative health.
    pub fn reset_to_base(&mut self, template: &CardTemplate, turn: u32) {
        self.atk = template.attack;
        self.hp = template.health;
        self.has_attacked = false;
        self.has_barrier = template.keywords.contains(Keyword::Barrier);
        self.frozen_until = None;
        self.summoned_turn = turn;
        self.slain_by = None;
    }
}
