//! Card catalog - immutable templates and their lookup registry.
//!
//! `CardTemplate` holds the unchanging properties of a card: its stats,
//! category, keywords, and the effect descriptors attached to its timing
//! hooks. Instance-specific data (current stats, status flags, zone) lives
//! in `CardInstance`.
//!
//! The catalog is an external collaborator from the engine's point of view:
//! the engine only ever reads templates through [`Catalog::template`], and
//! multiplayer sync reconstructs instances by re-resolving template ids
//! through the same lookup.

use enumset::EnumSet;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::cards::keyword::Keyword;
use crate::core::ids::TemplateId;
use crate::effects::spec::EffectSpec;

/// Card categories.
///
/// Prey and predators are creatures that occupy field slots; the rest
/// resolve from the hand.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CardCategory {
    /// Creature consumed by predators for nutrition.
    Prey,
    /// Creature that grows by consuming.
    Predator,
    /// One-shot effect, consumes the turn's standard play.
    Spell,
    /// One-shot effect playable without consuming the standard play.
    FreeSpell,
    /// Face-down card armed in the traps zone, fired on an opponent action.
    Trap,
    /// Persistent spell bound to the field until replaced or torn down.
    FieldSpell,
}

impl CardCategory {
    /// Whether cards of this category occupy field slots.
    #[must_use]
    pub const fn is_creature(self) -> bool {
        matches!(self, CardCategory::Prey | CardCategory::Predator)
    }

    /// Whether playing this category consumes the standard play allowance.
    #[must_use]
    pub const fn uses_play_allowance(self) -> bool {
        !matches!(self, CardCategory::FreeSpell)
    }
}

/// Opponent actions a face-down trap can fire on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrapTrigger {
    /// An opposing creature declared an attack.
    AttackDeclared,
    /// An opposing creature was played.
    CreaturePlayed,
    /// An opposing spell (free or standard) was played.
    SpellPlayed,
}

/// Effect descriptors attached to a template's timing hooks.
///
/// Hooks are data, not closures: each slot holds a serializable
/// [`EffectSpec`] that a pure evaluator turns into an outcome at fire time.
/// Most templates fill only one or two slots.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct HookSet {
    /// Fired when the card is played from hand.
    pub on_play: Option<EffectSpec>,
    /// Fired when the creature dies in combat.
    pub on_slain: Option<EffectSpec>,
    /// Fired at the start of the owner's turn while on the field.
    pub on_turn_start: Option<EffectSpec>,
    /// Fired at the end of the owner's turn while on the field.
    pub on_turn_end: Option<EffectSpec>,
    /// Fired on the attacker before combat damage.
    pub on_before_combat: Option<EffectSpec>,
    /// Fired on the defending creature when attacked.
    pub on_defend: Option<EffectSpec>,
    /// Fired on the predator after it consumes.
    pub on_consume: Option<EffectSpec>,
    /// Fired when the card is discarded from hand.
    pub on_discard: Option<EffectSpec>,
    /// What opposing action arms this trap (trap cards only).
    pub trap_trigger: Option<TrapTrigger>,
    /// The effect a fired trap resolves (trap cards only).
    pub trap_effect: Option<EffectSpec>,
}

/// Immutable card template.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CardTemplate {
    /// Unique identifier for this template.
    pub id: TemplateId,

    /// Card name (for display/debugging).
    pub name: String,

    /// Card category.
    pub category: CardCategory,

    /// Base attack (creatures; 0 otherwise).
    pub attack: i32,

    /// Base health (creatures; 0 otherwise).
    pub health: i32,

    /// Nutrition granted when consumed as prey.
    pub nutrition: i32,

    /// Base keyword set.
    pub keywords: EnumSet<Keyword>,

    /// Timing hooks.
    pub hooks: HookSet,
}

impl CardTemplate {
    /// Create a new template with no stats, keywords, or hooks.
    #[must_use]
    pub fn new(id: TemplateId, name: impl Into<String>, category: CardCategory) -> Self {
        Self {
            id,
            name: name.into(),
            category,
            attack: 0,
            health: 0,
            nutrition: 0,
            keywords: EnumSet::new(),
            hooks: HookSet::default(),
        }
    }

    /// Set attack and health (builder pattern).
    #[must_use]
    pub fn with_stats(mut self, attack: i32, health: i32) -> Self {
        self.attack = attack;
        self.health = health;
        self
    }

    /// Set nutrition (builder pattern).
    #[must_use]
    pub fn with_nutrition(mut self, nutrition: i32) -> Self {
        self.nutrition = nutrition;
        self
    }

    /// Add a keyword (builder pattern).
    #[must_use]
    pub fn with_keyword(mut self, keyword: Keyword) -> Self {
        self.keywords.insert(keyword);
        self
    }

    /// Set the on-play hook (builder pattern).
    #[must_use]
    pub fn on_play(mut self, spec: EffectSpec) -> Self {
        self.hooks.on_play = Some(spec);
        self
    }

    /// Set the on-slain hook (builder pattern).
    #[must_use]
    pub fn on_slain(mut self, spec: EffectSpec) -> Self {
        self.hooks.on_slain = Some(spec);
        self
    }

    /// Set the turn-start hook (builder pattern).
    #[must_use]
    pub fn on_turn_start(mut self, spec: EffectSpec) -> Self {
        self.hooks.on_turn_start = Some(spec);
        self
    }

    /// Set the turn-end hook (builder pattern).
    #[must_use]
    pub fn on_turn_end(mut self, spec: EffectSpec) -> Self {
        self.hooks.on_turn_end = Some(spec);
        self
    }

    /// Set the before-combat hook (builder pattern).
    #[must_use]
    pub fn on_before_combat(mut self, spec: EffectSpec) -> Self {
        self.hooks.on_before_combat = Some(spec);
        self
    }

    /// Set the on-defend hook (builder pattern).
    #[must_use]
    pub fn on_defend(mut self, spec: EffectSpec) -> Self {
        self.hooks.on_defend = Some(spec);
        self
    }

    /// Set the on-consume hook (builder pattern).
    #[must_use]
    pub fn on_consume(mut self, spec: EffectSpec) -> Self {
        self.hooks.on_consume = Some(spec);
        self
    }

    /// Set the discard hook (builder pattern).
    #[must_use]
    pub fn on_discard(mut self, spec: EffectSpec) -> Self {
        self.hooks.on_discard = Some(spec);
        self
    }

    /// Arm this template as a trap (builder pattern).
    #[must_use]
    pub fn with_trap(mut self, trigger: TrapTrigger, effect: EffectSpec) -> Self {
        self.hooks.trap_trigger = Some(trigger);
        self.hooks.trap_effect = Some(effect);
        self
    }
}

/// Registry of card templates.
///
/// ## Example
///
/// ```
/// use predation::catalog::{Catalog, CardTemplate, CardCategory};
/// use predation::core::ids::TemplateId;
///
/// let mut catalog = Catalog::new();
/// catalog.register(
///     CardTemplate::new(TemplateId::new(1), "Marsh Rat", CardCategory::Prey)
///         .with_stats(1, 1)
///         .with_nutrition(1),
/// );
///
/// let found = catalog.template(TemplateId::new(1)).unwrap();
/// assert_eq!(found.name, "Marsh Rat");
/// ```
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    templates: FxHashMap<TemplateId, CardTemplate>,
}

impl Catalog {
    /// Create a new empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a template.
    ///
    /// Panics if a template with the same ID already exists; card data is
    /// assembled once at startup and duplicate ids are a content bug.
    pub fn register(&mut self, template: CardTemplate) {
        if self.templates.contains_key(&template.id) {
            panic!("Template {} already registered", template.id);
        }
        self.templates.insert(template.id, template);
    }

    /// Look up a template by ID.
    #[must_use]
    pub fn template(&self, id: TemplateId) -> Option<&CardTemplate> {
        self.templates.get(&id)
    }

    /// Check if a template ID is registered.
    #[must_use]
    pub fn contains(&self, id: TemplateId) -> bool {
        self.templates.contains_key(&id)
    }

    /// Number of registered templates.
    #[must_use]
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    /// Check if the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}
