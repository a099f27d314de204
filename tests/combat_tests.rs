//! Combat flow tests driven through the action entry points.
//!
//! These exercise the full declare-attack path: legality, keyword
//! interactions, simultaneous damage, and the destruction sweep that
//! follows combat.

use predation::{
    declare_attack, end_turn, AttackTarget, CardCategory, CardTemplate, Catalog, EngineError,
    GameState, InstanceId, Keyword, PlayerId, TemplateId, ZoneKind, FREEZE_TURNS, STARTING_HP,
};

/// Register a creature template with the given stats and keywords.
fn creature(catalog: &mut Catalog, id: u32, name: &str, atk: i32, hp: i32, keywords: &[Keyword]) {
    let mut template =
        CardTemplate::new(TemplateId::new(id), name, CardCategory::Predator).with_stats(atk, hp);
    for &kw in keywords {
        template = template.with_keyword(kw);
    }
    catalog.register(template);
}

/// Put a veteran (no summoning sickness) creature on a player's field.
fn field(state: &mut GameState, catalog: &Catalog, player: PlayerId, template: u32) -> InstanceId {
    let t = catalog.template(TemplateId::new(template)).unwrap();
    let id = state.mint_into_zone(t, player, ZoneKind::Hand);
    let slot = state.zones(player).free_slot().unwrap();
    state.place_on_field(id, player, slot).unwrap();
    state.card_mut(id).unwrap().summoned_turn = 0;
    id
}

#[test]
fn test_example_scenario_with_sweep() {
    // Spec example: 2/2 attacker vs 1/1 defender. After combat the
    // attacker survives at 1 hp and the defender goes to carrion.
    let mut catalog = Catalog::new();
    creature(&mut catalog, 1, "Fox", 2, 2, &[]);
    creature(&mut catalog, 2, "Mouse", 1, 1, &[]);

    let mut state = GameState::new(11);
    let fox = field(&mut state, &catalog, PlayerId::One, 1);
    let mouse = field(&mut state, &catalog, PlayerId::Two, 2);

    declare_attack(&mut state, &catalog, fox, AttackTarget::Creature(mouse)).unwrap();

    assert_eq!(state.card(fox).unwrap().hp, 1);
    assert_eq!(state.card(fox).unwrap().zone, ZoneKind::Field);
    let mouse_card = state.card(mouse).unwrap();
    assert_eq!(mouse_card.hp, -1);
    assert_eq!(mouse_card.zone, ZoneKind::Carrion);
    assert!(state.zones(PlayerId::Two).contains(ZoneKind::Carrion, mouse));
    assert!(state.card(fox).unwrap().has_attacked);
}

#[test]
fn test_mutual_destruction_swept_together() {
    let mut catalog = Catalog::new();
    creature(&mut catalog, 1, "Ram", 3, 2, &[]);
    creature(&mut catalog, 2, "Elk", 2, 3, &[]);

    let mut state = GameState::new(11);
    let ram = field(&mut state, &catalog, PlayerId::One, 1);
    let elk = field(&mut state, &catalog, PlayerId::Two, 2);

    declare_attack(&mut state, &catalog, ram, AttackTarget::Creature(elk)).unwrap();

    assert_eq!(state.card(ram).unwrap().zone, ZoneKind::Carrion);
    assert_eq!(state.card(elk).unwrap().zone, ZoneKind::Carrion);
    assert_eq!(state.card(ram).unwrap().slain_by, Some(elk));
    assert_eq!(state.card(elk).unwrap().slain_by, Some(ram));
}

#[test]
fn test_ambush_attacker_keeps_full_health() {
    let mut catalog = Catalog::new();
    creature(&mut catalog, 1, "Stalker", 4, 3, &[Keyword::Ambush]);
    creature(&mut catalog, 2, "Bison", 6, 4, &[]);

    let mut state = GameState::new(11);
    let stalker = field(&mut state, &catalog, PlayerId::One, 1);
    let bison = field(&mut state, &catalog, PlayerId::Two, 2);

    declare_attack(&mut state, &catalog, stalker, AttackTarget::Creature(bison)).unwrap();

    // Kill landed, retaliation skipped entirely.
    assert_eq!(state.card(stalker).unwrap().hp, 3);
    assert_eq!(state.card(bison).unwrap().zone, ZoneKind::Carrion);
}

#[test]
fn test_lure_restricts_attack_declarations() {
    let mut catalog = Catalog::new();
    creature(&mut catalog, 1, "Wolf", 2, 2, &[]);
    creature(&mut catalog, 2, "Fawn", 1, 1, &[]);
    creature(&mut catalog, 3, "Bait", 0, 4, &[Keyword::Lure]);

    let mut state = GameState::new(11);
    let wolf = field(&mut state, &catalog, PlayerId::One, 1);
    let fawn = field(&mut state, &catalog, PlayerId::Two, 2);
    let bait = field(&mut state, &catalog, PlayerId::Two, 3);

    // Neither the unprotected creature nor the player is a legal target.
    assert_eq!(
        declare_attack(&mut state, &catalog, wolf, AttackTarget::Creature(fawn)),
        Err(EngineError::IllegalTarget)
    );
    assert_eq!(
        declare_attack(&mut state, &catalog, wolf, AttackTarget::Player),
        Err(EngineError::CannotAttackPlayer(wolf))
    );

    declare_attack(&mut state, &catalog, wolf, AttackTarget::Creature(bait)).unwrap();
    assert_eq!(state.card(bait).unwrap().hp, 2);
}

#[test]
fn test_neurotoxic_freeze_wears_off() {
    let mut catalog = Catalog::new();
    creature(&mut catalog, 1, "Asp", 1, 6, &[Keyword::Neurotoxic]);
    creature(&mut catalog, 2, "Ox", 2, 8, &[]);

    let mut state = GameState::new(11);
    let asp = field(&mut state, &catalog, PlayerId::One, 1);
    let ox = field(&mut state, &catalog, PlayerId::Two, 2);

    declare_attack(&mut state, &catalog, asp, AttackTarget::Creature(ox)).unwrap();

    let frozen_until = state.turn + FREEZE_TURNS;
    assert_eq!(state.card(ox).unwrap().frozen_until, Some(frozen_until));

    // Player Two's turn: the ox is still numb.
    end_turn(&mut state, &catalog).unwrap();
    assert_eq!(state.active_player, PlayerId::Two);
    assert_eq!(
        declare_attack(&mut state, &catalog, ox, AttackTarget::Creature(asp)),
        Err(EngineError::Frozen(ox))
    );

    // Two turns later it thaws at its own turn start.
    end_turn(&mut state, &catalog).unwrap();
    end_turn(&mut state, &catalog).unwrap();
    assert_eq!(state.active_player, PlayerId::Two);
    assert!(state.card(ox).unwrap().frozen_until.is_none());
    declare_attack(&mut state, &catalog, ox, AttackTarget::Creature(asp)).unwrap();
}

#[test]
fn test_direct_attack_requires_empty_board() {
    let mut catalog = Catalog::new();
    creature(&mut catalog, 1, "Wolf", 3, 3, &[]);
    creature(&mut catalog, 2, "Fawn", 1, 1, &[]);

    let mut state = GameState::new(11);
    let wolf = field(&mut state, &catalog, PlayerId::One, 1);
    let fawn = field(&mut state, &catalog, PlayerId::Two, 2);

    assert_eq!(
        declare_attack(&mut state, &catalog, wolf, AttackTarget::Player),
        Err(EngineError::CannotAttackPlayer(wolf))
    );

    // Clear the way, then strike the player.
    declare_attack(&mut state, &catalog, wolf, AttackTarget::Creature(fawn)).unwrap();
    end_turn(&mut state, &catalog).unwrap();
    end_turn(&mut state, &catalog).unwrap();

    declare_attack(&mut state, &catalog, wolf, AttackTarget::Player).unwrap();
    assert_eq!(state.player(PlayerId::Two).hp, STARTING_HP - 3);
}

#[test]
fn test_one_attack_per_turn() {
    let mut catalog = Catalog::new();
    creature(&mut catalog, 1, "Wolf", 1, 5, &[]);
    creature(&mut catalog, 2, "Ox", 0, 9, &[]);

    let mut state = GameState::new(11);
    let wolf = field(&mut state, &catalog, PlayerId::One, 1);
    let ox = field(&mut state, &catalog, PlayerId::Two, 2);

    declare_attack(&mut state, &catalog, wolf, AttackTarget::Creature(ox)).unwrap();
    assert_eq!(
        declare_attack(&mut state, &catalog, wolf, AttackTarget::Creature(ox)),
        Err(EngineError::AlreadyAttacked(wolf))
    );

    // The attack refreshes on the owner's next turn.
    end_turn(&mut state, &catalog).unwrap();
    end_turn(&mut state, &catalog).unwrap();
    declare_attack(&mut state, &catalog, wolf, AttackTarget::Creature(ox)).unwrap();
    assert_eq!(state.card(ox).unwrap().hp, 7);
}

#[test]
fn test_barrier_absorbs_exactly_one_combat_hit() {
    let mut catalog = Catalog::new();
    creature(&mut catalog, 1, "Wolf", 2, 9, &[]);
    creature(&mut catalog, 2, "Shelled", 0, 5, &[Keyword::Barrier]);

    let mut state = GameState::new(11);
    let wolf = field(&mut state, &catalog, PlayerId::One, 1);
    let shelled = field(&mut state, &catalog, PlayerId::Two, 2);

    declare_attack(&mut state, &catalog, wolf, AttackTarget::Creature(shelled)).unwrap();
    assert_eq!(state.card(shelled).unwrap().hp, 5);
    assert!(!state.card(shelled).unwrap().has_barrier);

    end_turn(&mut state, &catalog).unwrap();
    end_turn(&mut state, &catalog).unwrap();

    // The second identical hit lands in full.
    declare_attack(&mut state, &catalog, wolf, AttackTarget::Creature(shelled)).unwrap();
    assert_eq!(state.card(shelled).unwrap().hp, 3);
}
