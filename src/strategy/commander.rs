//! Commander - the per-bot decision context
//!
//! Owns everything that survives between turns: the configuration, the
//! build order, the mode chosen at the end of the previous turn, the RNG
//! behind the flank coin flip, and what was learned from action frames.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::core::config::StrategyConfig;
use crate::core::types::{Coord, Currency, Flank, Side, Turn};
use crate::oracle::GameOracle;
use crate::strategy::build_plan::BuildPlan;
use crate::strategy::defense::{BuildReport, DefenseBuilder};
use crate::strategy::deployment::{deploy, DeploymentReport};
use crate::strategy::edge::BattlefieldView;
use crate::strategy::intel::Intel;
use crate::strategy::mode::{next_mode, TurnStrategy};

/// A bot that can be driven turn by turn
pub trait TurnAlgo {
    /// Decide and issue every action for the oracle's current turn
    fn on_turn(&mut self, oracle: &mut dyn GameOracle) -> TurnReport;

    /// Digest one action frame between turns
    fn on_action_frame(&mut self, frame: &str);

    /// Mode the next turn will be played in
    fn mode(&self) -> TurnStrategy;
}

/// Summary of one turn's decisions
#[derive(Debug, Clone, Serialize)]
pub struct TurnReport {
    pub turn: Turn,
    /// Mode this turn was played in
    pub mode: TurnStrategy,
    /// Mode chosen for the next turn
    pub next_mode: TurnStrategy,
    /// Board reading after our own flank changes
    pub view: BattlefieldView,
    pub closed_flanks: Vec<Flank>,
    pub refunded: Vec<Coord>,
    pub build: BuildReport,
    pub deployment: DeploymentReport,
}

pub struct Commander {
    config: StrategyConfig,
    build_plan: BuildPlan,
    mode: TurnStrategy,
    intel: Intel,
    rng: ChaCha8Rng,
    seed: u64,
}

impl Commander {
    /// Seed from the configuration, or from entropy when none is configured
    pub fn new(config: StrategyConfig, build_plan: BuildPlan) -> Self {
        let seed = config
            .seed
            .unwrap_or_else(|| rand::thread_rng().gen::<u64>());
        Self::with_seed(config, build_plan, seed)
    }

    /// Create with specific RNG seed for deterministic behavior
    pub fn with_seed(config: StrategyConfig, build_plan: BuildPlan, seed: u64) -> Self {
        info!("Random seed: {}", seed);
        Self {
            config,
            build_plan,
            mode: TurnStrategy::default(),
            intel: Intel::new(),
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// Start from a mode other than defend
    pub fn with_mode(mut self, mode: TurnStrategy) -> Self {
        self.mode = mode;
        self
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn config(&self) -> &StrategyConfig {
        &self.config
    }

    pub fn intel(&self) -> &Intel {
        &self.intel
    }

    /// Play one turn: edge blocks, refunds, build order, deployment, next mode
    pub fn take_turn<O: GameOracle + ?Sized>(&mut self, oracle: &mut O) -> TurnReport {
        let mode = self.mode;
        let mut view = BattlefieldView::observe(oracle, &self.config);
        info!(
            "Turn {} [{}]: {:.1} SP, {:.1} MP vs {:.1} MP",
            view.turn,
            mode,
            oracle.resource(Currency::Structure, Side::Own),
            view.own_mp,
            view.opponent_mp
        );

        let block_threshold = self.intel.block_threshold(&self.config.thresholds);
        let defense = DefenseBuilder::new(&self.config);
        let closed_flanks =
            defense.maintain_edge_blocks(oracle, &mut view, mode, block_threshold, &mut self.rng);
        let refunded = defense.refund_low_health(oracle);
        let build = defense.execute_build_plan(
            oracle,
            &self.build_plan,
            self.config.thresholds.build_reserve,
            mode,
        );
        debug!(
            "Build order: {} placed, {} rejected, {} unfunded{}",
            build.accepted,
            build.rejected,
            build.unfunded,
            if build.halted { " (halted)" } else { "" }
        );

        let deployment = deploy(oracle, &view, mode, &self.config);
        let next_mode = self.advance_mode(oracle, &view);

        TurnReport {
            turn: view.turn,
            mode,
            next_mode,
            view,
            closed_flanks,
            refunded,
            build,
            deployment,
        }
    }

    /// Record one raw action frame; malformed frames are logged and dropped
    pub fn observe_frame(&mut self, frame: &str) {
        if let Err(e) = self.intel.observe_frame(frame, &self.config.costs) {
            warn!("Ignoring unreadable action frame: {}", e);
        }
    }

    /// Choose next turn's mode and clear the lane an attack will need
    fn advance_mode<O: GameOracle + ?Sized>(
        &mut self,
        oracle: &mut O,
        view: &BattlefieldView,
    ) -> TurnStrategy {
        let next = next_mode(
            oracle.resource(Currency::Mobile, Side::Own),
            oracle.resource(Currency::Mobile, Side::Opponent),
            view.left.strength,
            view.right.strength,
            &self.config.thresholds,
        );
        if let Some(flank) = next.attack_flank() {
            for cell in self.config.layout(flank).attack_lane_clear {
                oracle.remove(cell);
            }
        }
        if next != self.mode {
            info!("Switching from {} to {}", self.mode, next);
        }
        self.mode = next;
        next
    }
}

impl TurnAlgo for Commander {
    fn on_turn(&mut self, oracle: &mut dyn GameOracle) -> TurnReport {
        self.take_turn(oracle)
    }

    fn on_action_frame(&mut self, frame: &str) {
        self.observe_frame(frame);
    }

    fn mode(&self) -> TurnStrategy {
        self.mode
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{MobileKind, StructureKind};
    use crate::oracle::{PlannedAction, SnapshotOracle};
    use crate::strategy::build_plan::BuildJob;

    fn plan() -> BuildPlan {
        BuildPlan::Grouped(vec![vec![
            BuildJob::Spawn {
                kind: StructureKind::Turret,
                location: Coord::new(3, 12),
            },
            BuildJob::Spawn {
                kind: StructureKind::Turret,
                location: Coord::new(24, 12),
            },
        ]])
    }

    fn commander(seed: u64) -> Commander {
        Commander::with_seed(StrategyConfig::default(), plan(), seed)
    }

    #[test]
    fn test_configured_seed_is_used() {
        let config = StrategyConfig {
            seed: Some(99),
            ..StrategyConfig::default()
        };
        assert_eq!(Commander::new(config, plan()).seed(), 99);
    }

    #[test]
    fn test_opening_turn_defends_and_walls_both_flanks() {
        let mut commander = commander(7);
        let mut oracle = SnapshotOracle::new(0);

        let report = commander.take_turn(&mut oracle);

        assert_eq!(report.mode, TurnStrategy::Defend);
        assert_eq!(report.closed_flanks, vec![Flank::Left, Flank::Right]);
        assert_eq!(report.build.accepted, 2);
        // Both flanks are walled, so no interceptors go out
        assert!(report.deployment.waves.is_empty());
        // 5 MP left is below the attack minimum
        assert_eq!(report.next_mode, TurnStrategy::Defend);
        assert_eq!(commander.mode(), TurnStrategy::Defend);
    }

    #[test]
    fn test_rich_turn_switches_to_attack_and_clears_lane() {
        let mut commander = commander(7);
        let mut oracle = SnapshotOracle::new(3)
            .with_resources(Side::Own, 0.0, 8.0)
            .with_resources(Side::Opponent, 0.0, 4.0);
        oracle.place(StructureKind::Wall, Coord::new(0, 13), false);
        oracle.place(StructureKind::Wall, Coord::new(1, 13), false);
        oracle.place(StructureKind::Wall, Coord::new(27, 13), false);
        oracle.place(StructureKind::Wall, Coord::new(26, 13), false);
        // A turret guarding the left corner makes the right flank the target
        oracle.place(StructureKind::Turret, Coord::new(1, 14), false);

        // Both flanks already walled: nothing is deployed and 8 MP is kept
        let report = commander.take_turn(&mut oracle);
        assert!(report.deployment.waves.is_empty());
        assert_eq!(report.next_mode, TurnStrategy::Defend);

        let mut oracle = SnapshotOracle::new(4)
            .with_resources(Side::Own, 0.0, 12.0)
            .with_resources(Side::Opponent, 0.0, 4.0);
        oracle.place(StructureKind::Wall, Coord::new(27, 13), false);
        oracle.place(StructureKind::Wall, Coord::new(26, 13), false);
        oracle.place(StructureKind::Wall, Coord::new(0, 13), false);
        oracle.place(StructureKind::Wall, Coord::new(1, 13), false);
        oracle.place(StructureKind::Turret, Coord::new(1, 14), false);
        let report = commander.take_turn(&mut oracle);

        assert_eq!(report.next_mode, TurnStrategy::AttackRight);
        let removed: Vec<Coord> = oracle
            .plan()
            .actions
            .iter()
            .filter_map(|a| match a {
                PlannedAction::Remove { location } => Some(*location),
                _ => None,
            })
            .collect();
        assert_eq!(removed, vec![Coord::new(27, 13), Coord::new(26, 13)]);
    }

    #[test]
    fn test_attack_turn_sends_scouts() {
        let mut commander = commander(3).with_mode(TurnStrategy::AttackLeft);
        let mut oracle = SnapshotOracle::new(9)
            .with_resources(Side::Own, 0.0, 9.0)
            .with_resources(Side::Opponent, 0.0, 3.0);
        oracle.place(StructureKind::Wall, Coord::new(27, 13), false);
        oracle.place(StructureKind::Wall, Coord::new(26, 13), false);

        let report = commander.take_turn(&mut oracle);

        assert_eq!(report.mode, TurnStrategy::AttackLeft);
        // 3 interceptors, then scouts 5 + 1 with what is left
        assert_eq!(report.deployment.requested(MobileKind::Interceptor), 3);
        assert_eq!(oracle.plan().spawned(MobileKind::Scout.into()), 6);
        assert_eq!(report.next_mode, TurnStrategy::Defend);
    }

    #[test]
    fn test_same_seed_same_coin_flips() {
        let run = |seed| {
            let mut commander = commander(seed);
            (0..6)
                .map(|turn| {
                    let mut oracle = SnapshotOracle::new(turn + 1)
                        .with_resources(Side::Own, 10.0, 2.0)
                        .with_resources(Side::Opponent, 10.0, 13.0);
                    commander.take_turn(&mut oracle).closed_flanks
                })
                .collect::<Vec<_>>()
        };
        assert_eq!(run(11), run(11));
    }

    #[test]
    fn test_bad_frames_are_ignored() {
        let mut commander = commander(1);
        commander.on_action_frame("garbage");
        commander.on_action_frame(
            r#"{"turnInfo": [1, 2, 5], "events": {"breach": [[[4, 9], 1.0, 3, "9", 2]]}}"#,
        );
        assert_eq!(commander.intel().scored_on_locations, vec![Coord::new(4, 9)]);
    }
}
