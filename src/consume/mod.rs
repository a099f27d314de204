//! The consumption/nutrition engine.
//!
//! A predator consumes prey from its controller's field and carrion (and,
//! for Edible predators, other predators). Total nutrition is computed and
//! validated over the whole set before anything mutates, so a bad
//! reference rejects the entire meal - there is no partial digestion.
//!
//! Field-sourced meals move to the owner's carrion; carrion-sourced meals
//! are re-eaten and leave the simulation entirely, so the same corpse can
//! never feed two meals.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::cards::keyword::Keyword;
use crate::catalog::CardCategory;
use crate::core::ids::InstanceId;
use crate::core::state::GameState;
use crate::error::EngineError;
use crate::zones::ZoneKind;

/// Where a consumed card is taken from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConsumeSource {
    /// A creature on the consumer's own field.
    Field(InstanceId),
    /// A card in the consumer's own carrion pile.
    Carrion(InstanceId),
}

impl ConsumeSource {
    /// The referenced instance.
    #[must_use]
    pub const fn id(self) -> InstanceId {
        match self {
            ConsumeSource::Field(id) | ConsumeSource::Carrion(id) => id,
        }
    }
}

/// Nutrition contributed by one consumed card: prey contribute their
/// nutrition value, Edible predators their current attack, anything else
/// nothing.
fn contribution(state: &GameState, id: InstanceId) -> Result<i32, EngineError> {
    let card = state.card_ok(id)?;
    Ok(match card.category {
        CardCategory::Prey => card.nutrition,
        CardCategory::Predator if card.has_keyword(Keyword::Edible) => card.atk,
        _ => 0,
    })
}

/// Consume a set of cards, growing the predator by the total nutrition in
/// both attack and health.
///
/// Atomic: the full set is validated and totalled before any mutation.
/// Returns the nutrition gained.
pub fn consume(
    state: &mut GameState,
    predator: InstanceId,
    targets: &[ConsumeSource],
) -> Result<i32, EngineError> {
    let eater = state.card_ok(predator)?;
    if eater.category != CardCategory::Predator || eater.zone != ZoneKind::Field {
        return Err(EngineError::NotAPredator(predator));
    }
    let owner = eater.owner;

    // Validate the whole set and compute the total before touching state.
    let mut seen: SmallVec<[InstanceId; 4]> = SmallVec::new();
    let mut total = 0;
    for &target in targets {
        let id = target.id();
        if id == predator || seen.contains(&id) {
            return Err(EngineError::InvalidConsumption(id));
        }
        let card = state.card_ok(id)?;
        let expected_zone = match target {
            ConsumeSource::Field(_) => ZoneKind::Field,
            ConsumeSource::Carrion(_) => ZoneKind::Carrion,
        };
        if card.owner != owner || card.zone != expected_zone {
            return Err(EngineError::InvalidConsumption(id));
        }
        total += contribution(state, id)?;
        seen.push(id);
    }

    // All valid: apply.
    let eater = state.card_mut(predator).expect("validated above");
    eater.buff(total, total);
    let eater_name = eater.name.clone();

    for &target in targets {
        match target {
            ConsumeSource::Field(id) => {
                state.move_to_zone(id, ZoneKind::Carrion)?;
            }
            ConsumeSource::Carrion(id) => {
                state.remove_from_play(id);
            }
        }
    }

    state.log(format!("{eater_name} feasts for +{total}/+{total}"));
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{CardTemplate, Catalog};
    use crate::core::ids::TemplateId;
    use crate::core::player::PlayerId;

    fn setup() -> (GameState, Catalog) {
        let mut catalog = Catalog::new();
        catalog.register(
            CardTemplate::new(TemplateId::new(1), "Wolf", CardCategory::Predator).with_stats(3, 3),
        );
        catalog.register(
            CardTemplate::new(TemplateId::new(2), "Vole", CardCategory::Prey)
                .with_stats(1, 1)
                .with_nutrition(1),
        );
        catalog.register(
            CardTemplate::new(TemplateId::new(3), "Hare", CardCategory::Prey)
                .with_stats(1, 1)
                .with_nutrition(2),
        );
        catalog.register(
            CardTemplate::new(TemplateId::new(4), "Grub", CardCategory::Predator)
                .with_stats(2, 1)
                .with_keyword(Keyword::Edible),
        );
        (GameState::new(5), catalog)
    }

    fn on_field(state: &mut GameState, catalog: &Catalog, template: u32) -> InstanceId {
        let t = catalog.template(TemplateId::new(template)).unwrap();
        let id = state.mint_into_zone(t, PlayerId::One, ZoneKind::Hand);
        let slot = state.zones(PlayerId::One).free_slot().unwrap();
        state.place_on_field(id, PlayerId::One, slot).unwrap();
        id
    }

    fn in_carrion(state: &mut GameState, catalog: &Catalog, template: u32) -> InstanceId {
        let t = catalog.template(TemplateId::new(template)).unwrap();
        state.mint_into_zone(t, PlayerId::One, ZoneKind::Carrion)
    }

    #[test]
    fn test_consume_two_prey_totals_once() {
        let (mut state, catalog) = setup();
        let wolf = on_field(&mut state, &catalog, 1);
        let vole = on_field(&mut state, &catalog, 2);
        let hare = in_carrion(&mut state, &catalog, 3);

        let gained = consume(
            &mut state,
            wolf,
            &[ConsumeSource::Field(vole), ConsumeSource::Carrion(hare)],
        )
        .unwrap();

        assert_eq!(gained, 3);
        let wolf_card = state.card(wolf).unwrap();
        assert_eq!((wolf_card.atk, wolf_card.hp), (6, 6));

        // Field-sourced meal moved to carrion; carrion-sourced is gone.
        assert_eq!(state.card(vole).unwrap().zone, ZoneKind::Carrion);
        assert!(state.card(hare).is_none());
    }

    #[test]
    fn test_carrion_card_cannot_be_eaten_twice() {
        let (mut state, catalog) = setup();
        let wolf = on_field(&mut state, &catalog, 1);
        let hare = in_carrion(&mut state, &catalog, 3);

        consume(&mut state, wolf, &[ConsumeSource::Carrion(hare)]).unwrap();

        assert_eq!(
            consume(&mut state, wolf, &[ConsumeSource::Carrion(hare)]),
            Err(EngineError::UnknownInstance(hare))
        );
        let wolf_card = state.card(wolf).unwrap();
        assert_eq!((wolf_card.atk, wolf_card.hp), (5, 5));
    }

    #[test]
    fn test_edible_predator_contributes_attack() {
        let (mut state, catalog) = setup();
        let wolf = on_field(&mut state, &catalog, 1);
        let grub = on_field(&mut state, &catalog, 4);

        let gained = consume(&mut state, wolf, &[ConsumeSource::Field(grub)]).unwrap();

        assert_eq!(gained, 2);
    }

    #[test]
    fn test_inedible_predator_contributes_nothing() {
        let (mut state, catalog) = setup();
        let wolf = on_field(&mut state, &catalog, 1);
        let other_wolf = on_field(&mut state, &catalog, 1);

        let gained = consume(&mut state, wolf, &[ConsumeSource::Field(other_wolf)]).unwrap();

        assert_eq!(gained, 0);
        // Still moves to carrion even without nutrition.
        assert_eq!(state.card(other_wolf).unwrap().zone, ZoneKind::Carrion);
    }

    #[test]
    fn test_invalid_reference_rejects_whole_meal() {
        let (mut state, catalog) = setup();
        let wolf = on_field(&mut state, &catalog, 1);
        let vole = on_field(&mut state, &catalog, 2);

        // Second reference lies about its zone.
        let result = consume(
            &mut state,
            wolf,
            &[ConsumeSource::Field(vole), ConsumeSource::Carrion(vole)],
        );

        assert!(result.is_err());
        // Nothing was applied.
        let wolf_card = state.card(wolf).unwrap();
        assert_eq!((wolf_card.atk, wolf_card.hp), (3, 3));
        assert_eq!(state.card(vole).unwrap().zone, ZoneKind::Field);
    }

    #[test]
    fn test_prey_cannot_consume() {
        let (mut state, catalog) = setup();
        let vole = on_field(&mut state, &catalog, 2);
        let hare = on_field(&mut state, &catalog, 3);

        assert_eq!(
            consume(&mut state, vole, &[ConsumeSource::Field(hare)]),
            Err(EngineError::NotAPredator(vole))
        );
    }

    #[test]
    fn test_predator_cannot_eat_itself() {
        let (mut state, catalog) = setup();
        let wolf = on_field(&mut state, &catalog, 1);

        assert_eq!(
            consume(&mut state, wolf, &[ConsumeSource::Field(wolf)]),
            Err(EngineError::InvalidConsumption(wolf))
        );
    }
}
