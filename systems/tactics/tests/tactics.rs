use roguepilot_core::{
    Action, HealthPackSnapshot, ItemSnapshot, LevelView, Location, MonsterId, Offset,
};
use roguepilot_system_objective::{Objective, ObjectivePlan};
use roguepilot_system_pathfinding::Route;
use roguepilot_system_tactics::{
    advance, Pilot, PilotConfig, StickyState, TacticalState, Transition, Turn,
};
use roguepilot_world::{query, Level, PawnStats};

fn level_with(layout: &str, configure: impl FnOnce(&mut Level)) -> LevelView {
    let mut level = Level::from_layout(layout).expect("layout parses");
    configure(&mut level);
    query::level_view(&level)
}

fn decide(view: &LevelView) -> Action {
    Pilot::default().decide(view)
}

const PACK_NEARBY: &str = "
.H...
@....
....E
";

#[test]
fn wounded_player_steps_onto_adjacent_health_pack() {
    let view = level_with(PACK_NEARBY, |level| level.set_player_health(99));

    assert_eq!(decide(&view), Action::Step(Offset::new(1, -1)));
}

#[test]
fn healthy_player_ignores_adjacent_health_pack() {
    let view = level_with(PACK_NEARBY, |_| {});

    match decide(&view) {
        Action::Step(offset) => {
            assert_ne!(offset, Offset::new(1, -1));
            assert_eq!(offset.dx(), 1, "should head for the exit, got {offset:?}");
        }
        other => panic!("expected a step towards the exit, got {other:?}"),
    }
}

#[test]
fn weak_adjacent_monster_is_attacked() {
    let view = level_with(
        "
.....
.@M..
....E
",
        |_| {},
    );
    let mut pilot = Pilot::default();

    assert_eq!(pilot.decide(&view), Action::Attack(Offset::new(1, 0)));
    assert_eq!(pilot.sticky().target, Some(MonsterId::new(0)));
}

#[test]
fn cornered_player_escapes_through_the_only_opening() {
    let view = level_with(
        "
#####
#@.M#
#####
",
        |_| {},
    );

    assert_eq!(decide(&view), Action::Step(Offset::new(1, 0)));
}

#[test]
fn fightable_target_is_approached_along_the_route() {
    let view = level_with(
        "
.........
.@.......
.......M.
.........
",
        |_| {},
    );

    match decide(&view) {
        Action::Step(offset) => assert_eq!(offset.dx(), 1),
        other => panic!("expected an approach step, got {other:?}"),
    }
}

#[test]
fn adjacent_upgrade_is_grabbed_before_approaching() {
    let view = level_with(
        "
.I.....
.@...M.
.......
",
        |_| {},
    );

    assert_eq!(decide(&view), Action::Step(Offset::new(0, -1)));
}

#[test]
fn strong_monster_sends_the_player_to_the_exit() {
    let view = level_with(
        "
.......
.@M....
......E
",
        |level| {
            level
                .set_monster_stats(Location::new(2, 1), PawnStats::new(100, 50, 50))
                .expect("monster exists");
        },
    );

    assert!(matches!(decide(&view), Action::Step(_)));
}

#[test]
fn sealed_exit_falls_back_to_attacking_in_range() {
    let view = level_with(
        "
######
#@M#E#
######
",
        |level| {
            level
                .set_monster_stats(Location::new(2, 1), PawnStats::new(100, 50, 50))
                .expect("monster exists");
        },
    );

    assert_eq!(decide(&view), Action::Attack(Offset::new(1, 0)));
}

#[test]
fn missing_exit_closes_in_on_the_nearest_monster() {
    let view = level_with(
        "
#########
#@..#.M.#
#...#...#
#########
",
        |_| {},
    );

    assert_eq!(decide(&view), Action::Step(Offset::new(1, 0)));
}

#[test]
fn empty_level_yields_no_action() {
    let view = level_with("@..", |_| {});

    assert_eq!(decide(&view), Action::None);
}

const CROWD: &str = "
E......
.@.....
...M...
..M....
.......
";

#[test]
fn tolerable_crowd_is_engaged() {
    let view = level_with(CROWD, |_| {});

    assert_eq!(decide(&view), Action::Step(Offset::new(1, 1)));
}

#[test]
fn dangerous_crowd_triggers_retreat_and_clears_target_at_exit() {
    let view = level_with(CROWD, |level| {
        for at in [Location::new(3, 2), Location::new(2, 3)] {
            level
                .set_monster_stats(at, PawnStats::new(30, 20, 5))
                .expect("monster exists");
        }
    });
    let mut pilot = Pilot::default();

    assert_eq!(pilot.decide(&view), Action::Step(Offset::new(-1, -1)));
    assert_eq!(pilot.sticky().target, None);
}

#[test]
fn wounded_player_walks_to_a_distant_health_pack() {
    let view = level_with(
        "
@....H
......
.....E
",
        |level| level.set_player_health(50),
    );

    assert_eq!(decide(&view), Action::Step(Offset::new(1, 0)));
}

#[test]
fn objective_without_route_attacks_weakest_in_range() {
    let view = level_with(
        "
..M
.@M
...
",
        |level| {
            level
                .set_monster_stats(Location::new(2, 1), PawnStats::new(3, 5, 5))
                .expect("monster exists");
        },
    );
    let config = PilotConfig::default();
    let turn = Turn::new(&view, &config);
    let plan = ObjectivePlan {
        objective: Objective::HealthPack(HealthPackSnapshot {
            location: Location::new(0, 0),
        }),
        route: Route::new(),
    };

    let (transition, _) = advance(
        TacticalState::SeeObjective { plan: plan.clone() },
        &turn,
        StickyState::default(),
    );
    assert_eq!(transition, Transition::Act(Action::Attack(Offset::new(1, 0))));

    let quiet = level_with("@..", |_| {});
    let turn = Turn::new(&quiet, &config);
    let (transition, _) = advance(
        TacticalState::SeeObjective { plan },
        &turn,
        StickyState::default(),
    );
    assert_eq!(transition, Transition::Act(Action::None));
}

#[test]
fn objective_route_ending_at_the_player_attacks_in_range() {
    let view = level_with(
        "
...
.@M
...
",
        |_| {},
    );
    let config = PilotConfig::default();
    let turn = Turn::new(&view, &config);
    let plan = ObjectivePlan {
        objective: Objective::HealthPack(HealthPackSnapshot {
            location: Location::new(2, 1),
        }),
        route: Route::single(Location::new(1, 1)),
    };

    let (transition, _) = advance(
        TacticalState::SeeObjective { plan },
        &turn,
        StickyState::default(),
    );
    assert_eq!(transition, Transition::Act(Action::Attack(Offset::new(1, 0))));
}

const ITEM_AHEAD: &str = "
@....I
......
......
E.....
";

#[test]
fn healthy_player_walks_to_an_upgrade_before_the_exit() {
    let view = level_with(ITEM_AHEAD, |_| {});
    let config = PilotConfig::default();
    let turn = Turn::new(&view, &config);

    let (transition, _) = advance(TacticalState::ExitLevel, &turn, StickyState::default());
    match transition {
        Transition::Goto(TacticalState::SeeObjective { plan }) => {
            assert_eq!(plan.objective, Objective::Item(view.items()[0]));
        }
        other => panic!("expected to pursue the item, got {other:?}"),
    }
    assert_eq!(decide(&view), Action::Step(Offset::new(1, 0)));
}

#[test]
fn healthy_player_with_a_better_item_heads_for_the_exit() {
    let view = level_with(ITEM_AHEAD, |_| {});
    let config = PilotConfig::default();
    let turn = Turn::new(&view, &config);
    let worn = ItemSnapshot {
        location: Location::new(0, 0),
        attack_bonus: 50,
        defence_bonus: 50,
    };
    let sticky = StickyState {
        target: None,
        equipped: Some(worn),
    };

    let (transition, _) = advance(TacticalState::ExitLevel, &turn, sticky);
    assert_eq!(transition, Transition::Act(Action::Step(Offset::new(0, 1))));
}

#[test]
fn idle_without_monsters_heads_for_the_exit_state() {
    let view = level_with(".@..E", |_| {});
    let config = PilotConfig::default();
    let turn = Turn::new(&view, &config);

    let (transition, sticky) = advance(TacticalState::Idle, &turn, StickyState::default());
    assert_eq!(transition, Transition::Goto(TacticalState::ExitLevel));
    assert_eq!(sticky, StickyState::default());
}

#[test]
fn decisions_are_deterministic() {
    let view = level_with(CROWD, |_| {});

    assert_eq!(decide(&view), decide(&view));
}
