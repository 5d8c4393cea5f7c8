use roguepilot_core::{LevelView, Location};
use roguepilot_system_threat::{is_cornered, is_final_level, ThreatEvaluator};
use roguepilot_world::{query, Level, PawnStats};

fn level_with(layout: &str, configure: impl FnOnce(&mut Level)) -> LevelView {
    let mut level = Level::from_layout(layout).expect("layout parses");
    configure(&mut level);
    query::level_view(&level)
}

const OPEN: &str = "
#######
#.....#
#.@M..#
#.....#
#....E#
#######
";

const SEALED_EXIT: &str = "
#########
#.......#
#.@M....#
#.....###
#.....#E#
#########
";

#[test]
fn weak_adjacent_monster_is_fightable() {
    let view = level_with(OPEN, |_| {});
    let evaluator = ThreatEvaluator::default();
    let monster = view.monsters()[0];

    assert!(evaluator.damage_to(&view, &monster) >= monster.health);
    assert!(evaluator.can_fight(&view, &[monster]));
}

#[test]
fn strong_monster_is_not_fightable() {
    let view = level_with(OPEN, |level| {
        level
            .set_monster_stats(Location::new(3, 2), PawnStats::new(100, 20, 20))
            .expect("monster exists");
    });
    let evaluator = ThreatEvaluator::default();

    assert_eq!(evaluator.damage_to(&view, &view.monsters()[0]), 5);
    assert_eq!(evaluator.damage_from(&view, &view.monsters()[0]), 20);
    assert!(!evaluator.can_fight(&view, view.monsters()));
}

#[test]
fn killable_weakest_opponent_is_discounted_from_crowd() {
    let crowd = "
######
#.M..#
#.@M.#
######
";
    let tolerable = level_with(crowd, |_| {});
    assert!(ThreatEvaluator::default().can_fight(&tolerable, tolerable.monsters()));

    let dangerous = level_with(crowd, |level| {
        level
            .set_monster_stats(Location::new(2, 1), PawnStats::new(50, 10, 5))
            .expect("monster exists");
    });
    // Weakest is killable, the survivor deals 10 per exchange: 10 * 10 == 100.
    assert!(!ThreatEvaluator::default().can_fight(&dangerous, dangerous.monsters()));
}

#[test]
fn unkillable_weakest_opponent_counts_toward_incoming_damage() {
    let view = level_with(OPEN, |level| {
        level
            .set_monster_stats(Location::new(3, 2), PawnStats::new(40, 9, 10))
            .expect("monster exists");
    });
    let evaluator = ThreatEvaluator::default();
    let monster = view.monsters()[0];

    assert!(evaluator.damage_to(&view, &monster) < monster.health);
    assert_eq!(evaluator.damage_from(&view, &monster), 9);
    assert!(evaluator.can_fight(&view, &[monster]));
}

#[test]
fn final_level_lowers_hits_to_take() {
    let stats = PawnStats::new(100, 20, 50);
    let sealed = level_with(SEALED_EXIT, |level| {
        level
            .set_monster_stats(Location::new(3, 2), stats)
            .expect("monster exists");
    });
    let open = level_with(OPEN, |level| {
        level
            .set_monster_stats(Location::new(3, 2), stats)
            .expect("monster exists");
    });
    let evaluator = ThreatEvaluator::default();

    assert!(is_final_level(&sealed));
    assert!(!is_final_level(&open));
    assert_eq!(evaluator.hits_to_take(&sealed), 3);
    assert_eq!(evaluator.hits_to_take(&open), 10);
    assert!(evaluator.can_fight(&sealed, sealed.monsters()));
    assert!(!evaluator.can_fight(&open, open.monsters()));
}

#[test]
fn raising_defence_never_raises_incoming_damage() {
    let evaluator = ThreatEvaluator::default();
    let mut previous_damage = i32::MAX;
    let mut fightable_before = false;

    for defence in 1..=60 {
        let view = level_with(OPEN, |level| {
            level.set_player_stats(PawnStats::new(100, 1, defence));
            level
                .set_monster_stats(Location::new(3, 2), PawnStats::new(500, 30, 30))
                .expect("monster exists");
        });
        let damage = evaluator.damage_from(&view, &view.monsters()[0]);
        let fightable = evaluator.can_fight(&view, view.monsters());

        assert!(damage <= previous_damage, "defence {defence} raised damage");
        assert!(fightable || !fightable_before, "defence {defence} lost a fight");
        previous_damage = damage;
        fightable_before = fightable;
    }

    assert!(fightable_before, "high defence should make the fight acceptable");
}

#[test]
fn doubling_defence_strictly_lowers_incoming_damage() {
    let evaluator = ThreatEvaluator::default();
    let damage_at = |defence| {
        let view = level_with(OPEN, |level| level.set_player_stats(PawnStats::new(100, 10, defence)));
        evaluator.damage_from(&view, &view.monsters()[0])
    };

    assert!(damage_at(10) < damage_at(5));
}

#[test]
fn cornered_only_with_a_single_open_neighbor() {
    let view = level_with(
        "
#####
#@..#
#####
",
        |_| {},
    );

    assert!(is_cornered(&view, Location::new(1, 1)));
    assert!(!is_cornered(&view, Location::new(2, 1)));
}

#[test]
fn exposure_counts_monsters_within_danger_radius() {
    let view = level_with(
        "
##########
#@.......#
#........#
#...M...M#
##########
",
        |_| {},
    );
    let evaluator = ThreatEvaluator::default();
    let cells = [Location::new(2, 1), Location::new(3, 1)];

    // Only the monster at (4, 3) lies within two steps of the run.
    assert_eq!(evaluator.straight_run_damage(&view, &cells), 5);
    assert_eq!(evaluator.straight_run_damage(&view, &[Location::new(1, 1)]), 0);
}

#[test]
fn overwhelming_damage_saturates_instead_of_overflowing() {
    let view = level_with(
        "
@....
.M.M.
..M..
",
        |level| {
            for at in [Location::new(1, 1), Location::new(3, 1), Location::new(2, 2)] {
                level
                    .set_monster_stats(at, PawnStats::new(10, i32::MAX, 1))
                    .expect("monster exists");
            }
        },
    );
    let evaluator = ThreatEvaluator::default();
    let run = [Location::new(1, 0), Location::new(2, 0), Location::new(3, 0)];

    assert_eq!(evaluator.straight_run_damage(&view, &run), i32::MAX);
    assert!(!evaluator.can_fight(&view, view.monsters()));
}
