//! Identifier types for catalog templates and runtime card instances.
//!
//! A `TemplateId` names an immutable catalog entry; an `InstanceId` names a
//! live (or destroyed-but-remembered) card in one specific game. Instance
//! ids are allocated by `GameState` and are never reused within a game,
//! which keeps selection candidates and sync snapshots unambiguous.

use serde::{Deserialize, Serialize};

/// Catalog key for an immutable card template.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TemplateId(pub u32);

impl TemplateId {
    /// Create a new template ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for TemplateId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Template({})", self.0)
    }
}

/// Unique identifier for a card instance within one game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct InstanceId(pub u32);

impl InstanceId {
    /// Create a new instance ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for InstanceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Instance({})", self.0)
    }
}
