//! Flat card snapshots for multiplayer synchronization.
//!
//! A snapshot carries only the instance-specific fields; immutable template
//! data is reconstructed by re-resolving the template id through the
//! catalog on the receiving side. The round trip is lossless for every
//! mutable field the engine exposes.

use enumset::EnumSet;
use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::core::ids::{InstanceId, TemplateId};
use crate::core::player::PlayerId;
use crate::error::EngineError;
use crate::zones::ZoneKind;

use super::instance::CardInstance;
use super::keyword::Keyword;

/// Flat, wire-friendly image of a [`CardInstance`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CardSnapshot {
    pub template_id: TemplateId,
    pub instance_id: InstanceId,
    pub owner: PlayerId,
    pub zone: ZoneKind,
    pub atk: i32,
    pub hp: i32,
    pub has_attacked: bool,
    pub has_barrier: bool,
    pub frozen_until: Option<u32>,
    pub summoned_turn: u32,
    pub abilities_cancelled: bool,
    pub hooks_from: Option<TemplateId>,
    pub slain_by: Option<InstanceId>,
    pub granted_keywords: EnumSet<Keyword>,
    pub removed_keywords: EnumSet<Keyword>,
}

impl CardSnapshot {
    /// Capture a snapshot of an instance.
    #[must_use]
    pub fn of(card: &CardInstance) -> Self {
        Self {
            template_id: card.template_id,
            instance_id: card.id,
            owner: card.owner,
            zone: card.zone,
            atk: card.atk,
            hp: card.hp,
            has_attacked: card.has_attacked,
            has_barrier: card.has_barrier,
            frozen_until: card.frozen_until,
            summoned_turn: card.summoned_turn,
            abilities_cancelled: card.abilities_cancelled,
            hooks_from: card.hooks_from,
            slain_by: card.slain_by,
            granted_keywords: card.granted_keywords(),
            removed_keywords: card.removed_keywords(),
        }
    }

    /// Reconstruct an instance, re-resolving the template through the
    /// catalog.
    pub fn restore(&self, catalog: &Catalog) -> Result<CardInstance, EngineError> {
        let template = catalog
            .template(self.template_id)
            .ok_or(EngineError::UnknownTemplate(self.template_id))?;

        let mut card = CardInstance::from_template(
            template,
            self.instance_id,
            self.owner,
            self.zone,
            self.summoned_turn,
        );
        card.atk = self.atk;
        card.hp = self.hp;
        card.has_attacked = self.has_attacked;
        card.has_barrier = self.has_barrier;
        card.frozen_until = self.frozen_until;
        card.abilities_cancelled = self.abilities_cancelled;
        card.hooks_from = self.hooks_from;
        card.slain_by = self.slain_by;
        card.set_keyword_overrides(self.granted_keywords, self.removed_keywords);
        Ok(card)
    }

    /// Encode for the wire.
    pub fn to_bytes(&self) -> Result<Vec<u8>, bincode::Error> {
        bincode::serialize(self)
    }

    /// Decode from the wire.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, bincode::Error> {
        bincode::deserialize(bytes)
    }
}
