mod common;

use std::collections::BTreeMap;

use ai_core::{EntityId, Vec2};
use ai_enemy::{
    BehaviorState, ControllerKind, DoorInfo, Gap, HullInfo, ItemInfo, Sector, Structure, Target,
    TargetEvaluator, TargetKind, TargetMemoryStore, TargetingRule, WallBreachLocator,
};
use common::{creature, human, TestWorld, AGENT};

const SUB: EntityId = EntityId(500);
const HULL_A: EntityId = EntityId(600);
const HULL_B: EntityId = EntityId(601);

fn rules(list: &[(&str, BehaviorState, f32)]) -> BTreeMap<String, TargetingRule> {
    list.iter()
        .map(|&(tag, state, priority)| (tag.to_owned(), TargetingRule::new(tag, state, priority)))
        .collect()
}

fn evaluator<'a>(
    rules: &'a BTreeMap<String, TargetingRule>,
    locator: &'a WallBreachLocator,
) -> TargetEvaluator<'a> {
    TargetEvaluator {
        agent: AGENT,
        position: Vec2::ZERO,
        submarine: None,
        hull: None,
        state: BehaviorState::Idle,
        combat_strength: 1.0,
        sight: 1.0,
        hearing: 1.0,
        aggressive_boarding: false,
        rules,
        locator,
    }
}

fn locator() -> WallBreachLocator {
    WallBreachLocator::new(1.0, false)
}

fn door(id: u64, info: DoorInfo) -> Target {
    Target::new(EntityId(id), Vec2::new(200.0, 0.0), TargetKind::Door(info))
        .with_ranges(1000.0, 1000.0)
        .with_health(100.0)
}

#[test]
fn single_human_in_range_is_selected_with_its_rule() {
    let rules = rules(&[("human", BehaviorState::Attack, 50.0)]);
    let locator = locator();
    let world = TestWorld::default().with_target(human(2, Vec2::new(300.0, 0.0)));
    let mut memory = TargetMemoryStore::default();

    let evaluation = evaluator(&rules, &locator).evaluate(&world, &mut memory);

    assert_eq!(evaluation.target, Some(EntityId(2)));
    let rule = evaluation.rule.expect("rule");
    assert_eq!(rule.state, BehaviorState::Attack);
    assert_eq!(memory.priority(EntityId(2)), Some(10.0));
    let expected = 50.0 * 10.0 / 300.0f32.sqrt();
    assert!((evaluation.score - expected).abs() < 1e-3);
}

#[test]
fn agent_ignores_itself_and_disabled_targets() {
    let rules = rules(&[("human", BehaviorState::Attack, 50.0)]);
    let locator = locator();
    let world = TestWorld::default()
        .with_target(human(AGENT.0, Vec2::new(200.0, 0.0)))
        .with_target(human(3, Vec2::new(200.0, 0.0)).disabled());
    let evaluation = evaluator(&rules, &locator).evaluate(&world, &mut TargetMemoryStore::default());
    assert_eq!(evaluation.target, None);
}

#[test]
fn evaluation_is_deterministic_for_a_snapshot() {
    let rules = rules(&[
        ("human", BehaviorState::Attack, 50.0),
        ("weaker", BehaviorState::Attack, 20.0),
    ]);
    let locator = locator();
    let world = TestWorld::default()
        .with_target(human(2, Vec2::new(300.0, 40.0)))
        .with_target(creature(
            3,
            Vec2::new(-150.0, 0.0),
            "crawler",
            ControllerKind::EnemyAi { combat_strength: 0.2 },
        ))
        .with_target(human(4, Vec2::new(0.0, 600.0)));
    let mut seeded = TargetMemoryStore::default();
    seeded.get_or_create(EntityId(4)).set_priority(40.0);

    let mut first = seeded.clone();
    let mut second = seeded.clone();
    let a = evaluator(&rules, &locator).evaluate(&world, &mut first);
    let b = evaluator(&rules, &locator).evaluate(&world, &mut second);
    assert_eq!(a, b);
    assert_eq!(a.target, Some(EntityId(4)));
}

#[test]
fn remembered_targets_seem_closer() {
    let rules = rules(&[("human", BehaviorState::Attack, 50.0)]);
    let locator = locator();
    let world = TestWorld::default()
        .with_target(human(2, Vec2::new(400.0, 0.0)))
        .with_target(human(3, Vec2::new(700.0, 0.0)));

    let fresh = evaluator(&rules, &locator).evaluate(&world, &mut TargetMemoryStore::default());
    assert_eq!(fresh.target, Some(EntityId(2)));

    let mut memory = TargetMemoryStore::default();
    memory.get_or_create(EntityId(3));
    let remembered = evaluator(&rules, &locator).evaluate(&world, &mut memory);
    assert_eq!(remembered.target, Some(EntityId(3)));
}

#[test]
fn targets_out_of_sight_and_hearing_are_rejected() {
    let rules = rules(&[("human", BehaviorState::Attack, 50.0)]);
    let locator = locator();
    let mut eval = evaluator(&rules, &locator);
    eval.sight = 0.1;
    eval.hearing = 0.0;

    let far = human(2, Vec2::new(300.0, 0.0));
    assert_eq!(eval.effective_distance(&far, false), None);
    // Memory halves the distance before the range check.
    let near = human(2, Vec2::new(180.0, 0.0));
    assert_eq!(eval.effective_distance(&near, false), None);
    assert_eq!(eval.effective_distance(&near, true), Some(100.0));
}

#[test]
fn visibility_sector_is_anchored_on_the_target() {
    let rules = rules(&[("human", BehaviorState::Attack, 50.0)]);
    let locator = locator();
    let eval = evaluator(&rules, &locator);
    let facing_right = Sector::new(Vec2::UNIT_X, 0.5);

    let seen = human(2, Vec2::new(-300.0, 0.0)).with_sector(facing_right);
    assert!(eval.effective_distance(&seen, false).is_some());

    let unseen = human(2, Vec2::new(300.0, 0.0)).with_sector(facing_right);
    assert!(eval.effective_distance(&unseen, false).is_none());
}

#[test]
fn distance_is_floored_then_tripled_across_floors() {
    let rules = rules(&[("human", BehaviorState::Attack, 50.0)]);
    let locator = locator();
    let mut eval = evaluator(&rules, &locator);
    eval.submarine = Some(SUB);
    eval.hull = Some(HullInfo {
        id: HULL_A,
        height: 30.0,
    });

    let level = human(2, Vec2::new(20.0, 10.0));
    assert_eq!(eval.effective_distance(&level, false), Some(100.0));

    let upstairs = human(2, Vec2::new(0.0, 50.0));
    assert_eq!(eval.effective_distance(&upstairs, false), Some(300.0));
}

#[test]
fn targets_above_the_level_are_ignored() {
    let rules = rules(&[("human", BehaviorState::Attack, 50.0)]);
    let locator = locator();
    let mut world = TestWorld::default().with_target(human(2, Vec2::new(0.0, 300.0)));
    world.level_height = Some(200.0);
    let evaluation = evaluator(&rules, &locator).evaluate(&world, &mut TargetMemoryStore::default());
    assert_eq!(evaluation.target, None);
}

#[test]
fn creatures_inside_a_submarine_count_as_rooms_for_outsiders() {
    let locator = locator();
    let inside = human(2, Vec2::new(300.0, 0.0)).inside(SUB, Some(HULL_A));

    let humans_only = rules(&[("human", BehaviorState::Attack, 50.0)]);
    let eval = evaluator(&humans_only, &locator);
    let class = eval.classify(&inside, None).expect("classified");
    assert_eq!(class.tag, "room");

    let world = TestWorld::default().with_target(inside.clone());
    let evaluation = eval.evaluate(&world, &mut TargetMemoryStore::default());
    assert_eq!(evaluation.target, None);

    let with_rooms = rules(&[("room", BehaviorState::Attack, 30.0)]);
    let evaluation = evaluator(&with_rooms, &locator).evaluate(&world, &mut TargetMemoryStore::default());
    assert_eq!(evaluation.target, Some(EntityId(2)));
}

#[test]
fn dead_creatures_respect_boundaries_and_compartments() {
    let rules = rules(&[("dead", BehaviorState::Eat, 40.0)]);
    let locator = locator();
    let mut eval = evaluator(&rules, &locator);
    let mut corpse = human(2, Vec2::new(100.0, 0.0));
    if let TargetKind::Creature(info) = &mut corpse.kind {
        info.dead = true;
    }

    let outside = eval.classify(&corpse, None).expect("same side");
    assert_eq!((outside.tag.as_str(), outside.multiplier), ("dead", 1.0));

    let inside = corpse.clone().inside(SUB, Some(HULL_B));
    assert_eq!(eval.classify(&inside, None), None);

    eval.submarine = Some(SUB);
    eval.hull = Some(HullInfo {
        id: HULL_A,
        height: 100.0,
    });
    let other_room = eval.classify(&inside, None).expect("same submarine");
    assert_eq!(other_room.multiplier, 0.5);
}

#[test]
fn other_hostiles_are_tagged_by_strength() {
    let rules = rules(&[]);
    let locator = locator();
    let mut eval = evaluator(&rules, &locator);
    let hostile = |strength| {
        creature(
            2,
            Vec2::new(100.0, 0.0),
            "crawler",
            ControllerKind::EnemyAi {
                combat_strength: strength,
            },
        )
    };

    assert_eq!(eval.classify(&hostile(5.0), None).map(|c| c.tag), Some("stronger".into()));
    assert_eq!(eval.classify(&hostile(0.5), None).map(|c| c.tag), Some("weaker".into()));
    assert_eq!(eval.classify(&hostile(1.0), None), None);

    // Fear ignores the boundary and doubles the value.
    let stronger_inside = hostile(5.0).inside(SUB, Some(HULL_A));
    assert_eq!(eval.classify(&stronger_inside, None), None);
    eval.state = BehaviorState::Escape;
    let feared = eval.classify(&stronger_inside, None).expect("feared");
    assert_eq!((feared.tag.as_str(), feared.multiplier), ("stronger", 2.0));
}

#[test]
fn species_rules_apply_to_other_creatures() {
    let rules = rules(&[("moloch", BehaviorState::Escape, 10.0)]);
    let locator = locator();
    let eval = evaluator(&rules, &locator);
    let moloch = creature(2, Vec2::new(100.0, 0.0), "Moloch", ControllerKind::HumanAi);
    assert_eq!(eval.classify(&moloch, None).map(|c| c.tag), Some("moloch".into()));

    let unknown = creature(3, Vec2::new(100.0, 0.0), "hammerhead", ControllerKind::HumanAi);
    assert_eq!(eval.classify(&unknown, None), None);
}

#[test]
fn doors_are_skipped_when_open_unless_boarding() {
    let rules = rules(&[("door", BehaviorState::Attack, 20.0)]);
    let locator = locator();
    let mut eval = evaluator(&rules, &locator);

    let closed = door(3, DoorInfo::default());
    assert_eq!(eval.classify(&closed, None).map(|c| c.tag), Some("door".into()));
    let open = door(3, DoorInfo { open: true, ..DoorInfo::default() });
    assert_eq!(eval.classify(&open, None), None);
    let broken = door(3, DoorInfo::default()).with_health(0.0);
    assert_eq!(eval.classify(&broken, None), None);

    eval.aggressive_boarding = true;
    let outer_open = door(
        3,
        DoorInfo {
            open: true,
            outdoor: true,
            ..DoorInfo::default()
        },
    );
    assert_eq!(eval.classify(&outer_open, None).map(|c| c.multiplier), Some(5.0));
    assert_eq!(eval.classify(&closed, None).map(|c| c.multiplier), Some(0.0));

    eval.hull = Some(HullInfo {
        id: HULL_A,
        height: 100.0,
    });
    assert_eq!(eval.classify(&closed, None).map(|c| c.multiplier), Some(1.0));
    assert_eq!(eval.classify(&outer_open, None).map(|c| c.multiplier), Some(0.0));
}

#[test]
fn boarders_value_walls_by_their_gaps() {
    let rules = rules(&[("wall", BehaviorState::Attack, 10.0)]);
    let locator = WallBreachLocator::new(1.2, true);
    let mut eval = evaluator(&rules, &locator);
    let wall_target = Target::new(EntityId(7), Vec2::new(200.0, 0.0), TargetKind::Structure)
        .with_ranges(1000.0, 1000.0)
        .with_health(100.0);
    let mut wall = Structure::new(EntityId(7), Vec2::new(200.0, 0.0), false, 6, 0.5).in_submarine(SUB);
    wall.sections[1].gap = Some(Gap {
        position: Vec2::new(200.0, -0.75),
        open: 0.5,
        room_to_room: false,
        flow_target: None,
    });

    assert_eq!(eval.classify(&wall_target, Some(&wall)).map(|c| c.multiplier), Some(1.0));

    eval.aggressive_boarding = true;
    assert_eq!(eval.classify(&wall_target, Some(&wall)).map(|c| c.multiplier), Some(3.0));

    for section in &mut wall.sections[2..5] {
        section.body_disabled = true;
    }
    assert_eq!(eval.classify(&wall_target, Some(&wall)).map(|c| c.multiplier), Some(0.0));

    eval.hull = Some(HullInfo {
        id: HULL_A,
        height: 100.0,
    });
    wall.sections.iter_mut().for_each(|s| s.body_disabled = false);
    assert_eq!(eval.classify(&wall_target, Some(&wall)).map(|c| c.multiplier), Some(0.0));
}

#[test]
fn rooms_are_ignored_from_inside() {
    let rules = rules(&[("room", BehaviorState::Attack, 10.0)]);
    let locator = locator();
    let mut eval = evaluator(&rules, &locator);
    let room = Target::new(HULL_A, Vec2::new(100.0, 0.0), TargetKind::Room);
    assert!(eval.classify(&room, None).is_some());
    eval.hull = Some(HullInfo {
        id: HULL_B,
        height: 100.0,
    });
    assert!(eval.classify(&room, None).is_none());
}

#[test]
fn item_tags_override_the_room_tag() {
    let rules = rules(&[
        ("room", BehaviorState::Attack, 10.0),
        ("battery", BehaviorState::Attack, 30.0),
    ]);
    let locator = locator();
    let eval = evaluator(&rules, &locator);
    let item = |tags: &[&str]| {
        Target::new(
            EntityId(9),
            Vec2::new(100.0, 0.0),
            TargetKind::Item(ItemInfo {
                tags: tags.iter().map(|t| t.to_string()).collect(),
                holder: None,
            }),
        )
        .inside(SUB, Some(HULL_A))
    };

    assert_eq!(eval.classify(&item(&["junk"]), None).map(|c| c.tag), Some("room".into()));
    assert_eq!(
        eval.classify(&item(&["junk", "Battery"]), None).map(|c| c.tag),
        Some("battery".into())
    );
    let destroyed = item(&["battery"]).with_health(0.0);
    assert_eq!(eval.classify(&destroyed, None), None);
}

#[test]
fn ties_keep_the_earlier_target() {
    let rules = rules(&[("human", BehaviorState::Attack, 50.0)]);
    let locator = locator();
    let world = TestWorld::default()
        .with_target(human(5, Vec2::new(300.0, 0.0)))
        .with_target(human(2, Vec2::new(-300.0, 0.0)));
    let evaluation = evaluator(&rules, &locator).evaluate(&world, &mut TargetMemoryStore::default());
    assert_eq!(evaluation.target, Some(EntityId(5)));
}
