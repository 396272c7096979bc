//! Whole-turn integration tests through the in-memory oracle

use std::fs;
use std::path::Path;

use rampart::core::config::{load_strategy, StrategyConfig};
use rampart::core::types::{Coord, Currency, Flank, MobileKind, Side, StructureKind};
use rampart::oracle::{GameOracle, PlannedAction, SnapshotOracle, TurnSnapshot};
use rampart::strategy::{
    load_build_plan, BuildPlan, Commander, TurnAlgo, TurnDriver, TurnStrategy, VecSink,
};

fn data(path: &str) -> std::path::PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("data").join(path)
}

fn build_order() -> BuildPlan {
    load_build_plan(&data("build_order.json")).unwrap()
}

fn snapshot(name: &str) -> TurnSnapshot {
    TurnSnapshot::from_json(&fs::read_to_string(data(name)).unwrap()).unwrap()
}

fn removals(oracle: &SnapshotOracle) -> Vec<Coord> {
    oracle
        .plan()
        .actions
        .iter()
        .filter_map(|action| match action {
            PlannedAction::Remove { location } => Some(*location),
            _ => None,
        })
        .collect()
}

fn mobile_spawns(oracle: &SnapshotOracle) -> u32 {
    [MobileKind::Scout, MobileKind::Demolisher, MobileKind::Interceptor]
        .into_iter()
        .map(|kind| oracle.plan().spawned(kind.into()))
        .sum()
}

#[test]
fn test_opening_turn_walls_both_flanks_and_builds() {
    let mut commander = Commander::with_seed(StrategyConfig::default(), build_order(), 1);
    let mut oracle = SnapshotOracle::from_snapshot(&snapshot("snapshots/turn_00.json")).unwrap();

    let report = commander.take_turn(&mut oracle);

    assert_eq!(report.closed_flanks, vec![Flank::Left, Flank::Right]);
    for cell in [(0, 13), (1, 13), (27, 13), (26, 13)] {
        let cell = Coord::new(cell.0, cell.1);
        assert_eq!(oracle.plan().spawns_at(cell).count(), 1);
        assert!(removals(&oracle).contains(&cell));
    }
    // 40 SP covers the blocking walls and the whole build order
    assert_eq!(report.build.accepted, 16);
    assert!(!report.build.halted);
    assert_eq!(oracle.resource(Currency::Structure, Side::Own), 2.0);

    assert_eq!(mobile_spawns(&oracle), 0);
    assert_eq!(report.next_mode, TurnStrategy::Defend);
}

#[test]
fn test_rush_threat_closes_exactly_one_flank() {
    for seed in 0..8 {
        let mut commander = Commander::with_seed(StrategyConfig::default(), build_order(), seed);
        let mut oracle = SnapshotOracle::new(5)
            .with_resources(Side::Own, 0.0, 4.0)
            .with_resources(Side::Opponent, 10.0, 15.0);

        let report = commander.take_turn(&mut oracle);

        assert_eq!(report.closed_flanks.len(), 1);
        let walled = Flank::BOTH
            .into_iter()
            .filter(|flank| report.view.edge(*flank).own_blocked)
            .count();
        assert_eq!(walled, 1);
        // Only the still-open flank gets interceptors: max(15 / 4, 3) = 3
        assert_eq!(report.deployment.waves.len(), 1);
        assert_eq!(report.deployment.requested(MobileKind::Interceptor), 3);
    }
}

#[test]
fn test_replay_refunds_then_attacks_weaker_flank() {
    let mut driver = TurnDriver::new(
        Commander::with_seed(StrategyConfig::default(), build_order(), 3),
        VecSink::default(),
    );

    let first = snapshot("snapshots/turn_01.json");
    let mut oracle = SnapshotOracle::from_snapshot(&first).unwrap();
    let report = driver.play_turn(&mut oracle).unwrap();

    assert_eq!(report.refunded, vec![Coord::new(3, 13)]);
    assert!(report.build.halted);
    assert!(report.deployment.waves.is_empty());
    assert_eq!(report.next_mode, TurnStrategy::Defend);

    for frame in &first.frames {
        driver.on_action_frame(&frame.to_string());
    }
    assert_eq!(
        driver.algo().intel().scored_on_locations,
        vec![Coord::new(5, 8), Coord::new(5, 8)]
    );
    assert_eq!(driver.algo().intel().opponent_spend(1), 6.0);

    // The upgraded turret guards the left corner, so the right flank is the target
    let mut oracle = SnapshotOracle::from_snapshot(&snapshot("snapshots/turn_02.json")).unwrap();
    let report = driver.play_turn(&mut oracle).unwrap();
    assert!(report.view.left.strength > report.view.right.strength);
    assert_eq!(report.next_mode, TurnStrategy::AttackRight);
    assert_eq!(driver.algo().mode(), TurnStrategy::AttackRight);

    let submitted = &driver.sink().plans;
    assert_eq!(submitted.len(), 2);
    assert!(submitted[1]
        .actions
        .contains(&PlannedAction::Remove { location: Coord::new(27, 13) }));
    assert!(submitted[1]
        .actions
        .contains(&PlannedAction::Remove { location: Coord::new(26, 13) }));
}

#[test]
fn test_attack_turn_keeps_lane_and_sends_waves() {
    let mut commander = Commander::with_seed(StrategyConfig::default(), build_order(), 9)
        .with_mode(TurnStrategy::AttackRight);
    let mut oracle = SnapshotOracle::new(3)
        .with_resources(Side::Own, 8.0, 12.0)
        .with_resources(Side::Opponent, 10.0, 5.0);
    oracle.place(StructureKind::Wall, Coord::new(0, 13), false);
    oracle.place(StructureKind::Wall, Coord::new(1, 13), false);

    let report = commander.take_turn(&mut oracle);

    // The right lane stays open: no walls on its blocking cells
    assert!(report.closed_flanks.is_empty());
    assert!(!oracle.contains_stationary_unit(Coord::new(27, 13)));
    assert!(!oracle.contains_stationary_unit(Coord::new(26, 13)));

    // 3 defensive interceptors, then scouts 5 + 4 from the left spawn cells
    let waves: Vec<(MobileKind, Coord, u32)> = report
        .deployment
        .waves
        .iter()
        .map(|w| (w.kind, w.location, w.requested))
        .collect();
    assert_eq!(
        waves,
        vec![
            (MobileKind::Interceptor, Coord::new(23, 9), 3),
            (MobileKind::Scout, Coord::new(4, 9), 5),
            (MobileKind::Scout, Coord::new(3, 10), 4),
        ]
    );
    assert_eq!(oracle.resource(Currency::Mobile, Side::Own), 0.0);
    assert_eq!(report.next_mode, TurnStrategy::Defend);
}

#[test]
fn test_trapped_lane_gets_siege() {
    let mut commander = Commander::with_seed(StrategyConfig::default(), build_order(), 9)
        .with_mode(TurnStrategy::AttackLeft);
    let mut oracle = SnapshotOracle::new(7)
        .with_resources(Side::Own, 0.0, 20.0)
        .with_resources(Side::Opponent, 10.0, 2.0);
    oracle.place(StructureKind::Wall, Coord::new(27, 13), false);
    oracle.place(StructureKind::Wall, Coord::new(26, 13), false);
    oracle.place(StructureKind::Turret, Coord::new(0, 14), true);

    let report = commander.take_turn(&mut oracle);

    assert!(report.view.left.misdirecting);
    assert_eq!(report.deployment.waves[0].kind, MobileKind::Interceptor);
    assert_eq!(report.deployment.waves[0].location, Coord::new(1, 12));
    assert_eq!(report.deployment.waves[1].kind, MobileKind::Demolisher);
    assert_eq!(report.deployment.waves[1].location, Coord::new(2, 11));
    assert!(oracle.plan().spawned(MobileKind::Demolisher.into()) >= 2);
}

#[test]
fn test_adaptive_threshold_changes_rush_response() {
    let adaptive = load_strategy(&data("strategies/adaptive.toml")).unwrap();
    let frame = snapshot("snapshots/turn_01.json").frames[0].to_string();

    let play = |config: StrategyConfig| {
        let mut commander = Commander::with_seed(config, build_order(), 4);
        commander.on_action_frame(&frame);
        let mut oracle = SnapshotOracle::new(6)
            .with_resources(Side::Own, 0.0, 3.0)
            .with_resources(Side::Opponent, 10.0, 7.0);
        commander.take_turn(&mut oracle).closed_flanks
    };

    // 7 MP is no rush for the fixed threshold: both flanks close
    assert_eq!(play(StrategyConfig::default()).len(), 2);
    // A 6 MP attack was seen, so 7 MP is a rush: one flank stays open
    assert_eq!(play(adaptive).len(), 1);
}

#[test]
fn test_flat_build_order_from_data() {
    let plan = load_build_plan(&data("build_order_flat.json")).unwrap();
    let mut commander = Commander::with_seed(StrategyConfig::default(), plan, 2);
    let mut oracle = SnapshotOracle::new(4)
        .with_resources(Side::Own, 7.0, 0.0)
        .with_resources(Side::Opponent, 10.0, 20.0);
    for cell in [(0, 13), (1, 13), (27, 13), (26, 13)] {
        oracle.place(StructureKind::Wall, Coord::new(cell.0, cell.1), false);
    }

    let report = commander.take_turn(&mut oracle);

    // Turrets and walls (6 SP), then both upgrades and the support are unaffordable
    assert_eq!(report.build.accepted, 4);
    assert_eq!(report.build.unfunded, 3);
    assert!(!report.build.halted);
    assert_eq!(oracle.resource(Currency::Structure, Side::Own), 1.0);
}
