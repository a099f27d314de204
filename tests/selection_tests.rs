//! Selection protocol tests: suspension, resumption, chaining, and the
//! equivalence of a resumed chain with a single compound outcome.

use predation::{
    play_card, resume_selection, ActionResult, Applied, CardCategory, CardTemplate, Catalog,
    Choice, EffectSpec, EngineError, GameState, HookContext, InstanceId, Interpreter, Outcome,
    PlayerId, SelectAction, SelectPool, SelectSpec, TemplateId, ZoneKind,
};

fn scavenge_catalog() -> Catalog {
    let mut catalog = Catalog::new();
    catalog.register(
        CardTemplate::new(TemplateId::new(1), "Vole", CardCategory::Prey)
            .with_stats(1, 1)
            .with_nutrition(1),
    );
    catalog.register(
        // Discard one, then draw three.
        CardTemplate::new(TemplateId::new(2), "Scavenge", CardCategory::Spell).on_play(
            EffectSpec::select("Discard a card", SelectPool::OwnHand, SelectAction::Discard)
                .then(EffectSpec::DrawCards(3)),
        ),
    );
    catalog.register(
        CardTemplate::new(TemplateId::new(3), "Cull", CardCategory::Spell).on_play(
            EffectSpec::select(
                "Destroy an enemy creature",
                SelectPool::EnemyCreatures,
                SelectAction::Kill,
            ),
        ),
    );
    catalog
}

/// Seed a deterministic game: a hand card to discard, a deck to draw from,
/// and the spell itself. Returns (state, spell, hand_card).
fn scavenge_setup(catalog: &Catalog) -> (GameState, InstanceId, InstanceId) {
    let mut state = GameState::new(77);
    let vole = catalog.template(TemplateId::new(1)).unwrap();

    for _ in 0..4 {
        state.mint_into_zone(vole, PlayerId::One, ZoneKind::Deck);
    }
    let hand_card = state.mint_into_zone(vole, PlayerId::One, ZoneKind::Hand);
    let spell = state.mint_into_zone(
        catalog.template(TemplateId::new(2)).unwrap(),
        PlayerId::One,
        ZoneKind::Hand,
    );
    (state, spell, hand_card)
}

#[test]
fn test_discard_then_draw_chain() {
    let catalog = scavenge_catalog();
    let (mut state, spell, hand_card) = scavenge_setup(&catalog);

    let pending = match play_card(&mut state, &catalog, PlayerId::One, spell, None).unwrap() {
        ActionResult::AwaitingSelection(pending) => pending,
        other => panic!("expected a selection, got {other:?}"),
    };
    assert_eq!(pending.title(), "Discard a card");
    // The spell already left the hand; only the vole is offered.
    assert_eq!(pending.candidates().len(), 1);

    let result = resume_selection(&mut state, &catalog, pending, Choice::Card(hand_card)).unwrap();
    assert!(matches!(result, ActionResult::Completed));

    assert_eq!(state.card(hand_card).unwrap().zone, ZoneKind::Carrion);
    assert_eq!(state.zones(PlayerId::One).hand.len(), 3);
    assert_eq!(state.zones(PlayerId::One).deck.len(), 1);
}

#[test]
fn test_chain_equals_single_compound_outcome() {
    // A two-step chained selection resolved choice by choice must land on
    // the same final state as one compound outcome containing both
    // effects.
    let catalog = scavenge_catalog();

    // Route A: play the spell and resume the selection.
    let (mut via_chain, spell, hand_card) = scavenge_setup(&catalog);
    let pending = match play_card(&mut via_chain, &catalog, PlayerId::One, spell, None).unwrap() {
        ActionResult::AwaitingSelection(pending) => pending,
        other => panic!("expected a selection, got {other:?}"),
    };
    resume_selection(&mut via_chain, &catalog, pending, Choice::Card(hand_card)).unwrap();

    // Route B: identical seed and minting order, the same two effects as
    // one compound applied directly (spell moved to carrion by hand to
    // mirror the play path).
    let (mut via_compound, spell_b, hand_card_b) = scavenge_setup(&catalog);
    via_compound
        .player_mut(PlayerId::One)
        .standard_play_used = true;
    via_compound.move_to_zone(spell_b, ZoneKind::Carrion).unwrap();
    let outcome = Outcome::seq([
        Outcome::DiscardFromHand {
            target: hand_card_b,
        },
        Outcome::Draw { count: 3 },
    ]);
    let applied = Interpreter::apply(
        &mut via_compound,
        &catalog,
        HookContext::for_player(PlayerId::One),
        outcome,
    );
    assert!(matches!(applied, Applied::Complete));

    assert_eq!(
        via_chain.zones(PlayerId::One),
        via_compound.zones(PlayerId::One)
    );
    assert_eq!(
        via_chain.card(hand_card).unwrap(),
        via_compound.card(hand_card_b).unwrap()
    );
}

#[test]
fn test_selection_rejection_leaves_action_resumable() {
    let catalog = scavenge_catalog();
    let (mut state, spell, hand_card) = scavenge_setup(&catalog);

    let pending = match play_card(&mut state, &catalog, PlayerId::One, spell, None).unwrap() {
        ActionResult::AwaitingSelection(pending) => pending,
        other => panic!("expected a selection, got {other:?}"),
    };

    // Off-list choice: rejected, selection stays open, state untouched.
    let rejected =
        resume_selection(&mut state, &catalog, pending, Choice::Card(InstanceId(999)))
            .unwrap_err();
    assert_eq!(rejected.error, EngineError::InvalidChoice);
    assert_eq!(state.zones(PlayerId::One).hand.len(), 1);

    // The handed-back pending still works.
    let result =
        resume_selection(&mut state, &catalog, rejected.pending, Choice::Card(hand_card)).unwrap();
    assert!(matches!(result, ActionResult::Completed));
    assert_eq!(state.zones(PlayerId::One).hand.len(), 3);
}

#[test]
fn test_sweep_runs_after_selection_chain_lands() {
    let catalog = scavenge_catalog();
    let mut state = GameState::new(9);

    let vole = catalog.template(TemplateId::new(1)).unwrap();
    let enemy = state.mint_into_zone(vole, PlayerId::Two, ZoneKind::Hand);
    state.place_on_field(enemy, PlayerId::Two, 0).unwrap();

    let cull = state.mint_into_zone(
        catalog.template(TemplateId::new(3)).unwrap(),
        PlayerId::One,
        ZoneKind::Hand,
    );

    let pending = match play_card(&mut state, &catalog, PlayerId::One, cull, None).unwrap() {
        ActionResult::AwaitingSelection(pending) => pending,
        other => panic!("expected a selection, got {other:?}"),
    };

    // While suspended, the target is alive and nothing has been swept.
    assert_eq!(state.card(enemy).unwrap().zone, ZoneKind::Field);

    resume_selection(&mut state, &catalog, pending, Choice::Creature(enemy)).unwrap();

    // The kill resolved and the corpse was swept to carrion.
    assert_eq!(state.card(enemy).unwrap().zone, ZoneKind::Carrion);
}

#[test]
fn test_optional_selection_pass_declines() {
    let mut catalog = scavenge_catalog();
    catalog.register(
        CardTemplate::new(TemplateId::new(10), "Pounce", CardCategory::Spell).on_play(
            EffectSpec::Select(SelectSpec {
                title: "Maybe strike".into(),
                pool: SelectPool::EnemyCreatures,
                action: SelectAction::Damage(2),
                optional: true,
                then: None,
            }),
        ),
    );

    let mut state = GameState::new(9);
    let vole = catalog.template(TemplateId::new(1)).unwrap();
    let enemy = state.mint_into_zone(vole, PlayerId::Two, ZoneKind::Hand);
    state.place_on_field(enemy, PlayerId::Two, 0).unwrap();
    let pounce = state.mint_into_zone(
        catalog.template(TemplateId::new(10)).unwrap(),
        PlayerId::One,
        ZoneKind::Hand,
    );

    let pending = match play_card(&mut state, &catalog, PlayerId::One, pounce, None).unwrap() {
        ActionResult::AwaitingSelection(pending) => pending,
        other => panic!("expected a selection, got {other:?}"),
    };
    assert!(pending.accepts(Choice::Pass));

    let result = resume_selection(&mut state, &catalog, pending, Choice::Pass).unwrap();
    assert!(matches!(result, ActionResult::Completed));
    assert_eq!(state.card(enemy).unwrap().hp, 1);
}

#[test]
fn test_no_candidates_means_no_op_not_suspension() {
    let catalog = scavenge_catalog();
    let mut state = GameState::new(9);

    // No enemy creatures: Cull resolves to nothing instead of suspending.
    let cull = state.mint_into_zone(
        catalog.template(TemplateId::new(3)).unwrap(),
        PlayerId::One,
        ZoneKind::Hand,
    );

    let result = play_card(&mut state, &catalog, PlayerId::One, cull, None).unwrap();
    assert!(matches!(result, ActionResult::Completed));
    assert_eq!(state.card(cull).unwrap().zone, ZoneKind::Carrion);
}
