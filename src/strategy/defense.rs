//! Defense builder: refunds, edge blocking and the budgeted build order

use rand::Rng;
use serde::Serialize;
use tracing::debug;

use crate::arena::friendly_side_locations;
use crate::core::config::StrategyConfig;
use crate::core::types::{Coord, Currency, Flank, Side, StructureKind};
use crate::oracle::GameOracle;
use crate::strategy::build_plan::{BuildJob, BuildPlan};
use crate::strategy::edge::BattlefieldView;
use crate::strategy::mode::TurnStrategy;

/// What happened to the build order this turn
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BuildReport {
    /// Jobs the engine accepted
    pub accepted: usize,
    /// Jobs attempted but rejected (occupied cell, already upgraded, ...)
    pub rejected: usize,
    /// Jobs skipped because they would dip into the reserve
    pub unfunded: usize,
    /// Spawns skipped to keep the attack lane free
    pub kept_clear: usize,
    /// A grouped plan stopped early
    pub halted: bool,
}

enum JobOutcome {
    Accepted,
    Rejected,
    Unfunded,
    KeptClear,
}

/// Mutates our half of the board before any mobile units are deployed
pub struct DefenseBuilder<'a> {
    config: &'a StrategyConfig,
}

impl<'a> DefenseBuilder<'a> {
    pub fn new(config: &'a StrategyConfig) -> Self {
        Self { config }
    }

    /// Remove damaged walls and turrets so the engine refunds part of their cost
    ///
    /// Returns the cells whose removal was accepted.
    pub fn refund_low_health<O: GameOracle + ?Sized>(&self, oracle: &mut O) -> Vec<Coord> {
        let thresholds = &self.config.thresholds;
        let mut refunded = Vec::new();
        for cell in friendly_side_locations() {
            let Some(structure) = oracle.stationary_unit_at(cell) else {
                continue;
            };
            let threshold = match structure.kind {
                StructureKind::Turret => thresholds.refund_turret,
                StructureKind::Wall => thresholds.refund_wall,
                StructureKind::Support => continue,
            };
            if structure.health_ratio() < threshold && oracle.remove(cell) {
                debug!(
                    "Refunding {} at {} ({:.0}% health)",
                    structure.kind,
                    cell,
                    structure.health_ratio() * 100.0
                );
                refunded.push(cell);
            }
        }
        refunded
    }

    /// Open or close our own flank walls
    ///
    /// Both flanks are sealed on the opening turn. When every lane is open and
    /// a rush looks likely, exactly one flank (picked at random) is closed.
    /// Otherwise each flank is closed on its own when it is open on both
    /// sides, we are not attacking through it, and either the opponent is
    /// short of mobile points or we are attacking the other flank.
    ///
    /// Returns the flanks that were closed, in order.
    pub fn maintain_edge_blocks<O, R>(
        &self,
        oracle: &mut O,
        view: &mut BattlefieldView,
        mode: TurnStrategy,
        block_threshold: f64,
        rng: &mut R,
    ) -> Vec<Flank>
    where
        O: GameOracle + ?Sized,
        R: Rng,
    {
        let mut closed = Vec::new();

        if view.turn == 0 {
            for flank in Flank::BOTH {
                self.block_flank(oracle, view, flank);
                closed.push(flank);
            }
        }

        if mode == TurnStrategy::Defend
            && view.opponent_mp >= block_threshold
            && view.both_flanks_open()
        {
            let flank = if rng.gen_range(0..=1) == 0 {
                Flank::Left
            } else {
                Flank::Right
            };
            debug!(
                "Both lanes open with opponent at {} MP; closing {} flank",
                view.opponent_mp, flank
            );
            self.block_flank(oracle, view, flank);
            closed.push(flank);
            return closed;
        }

        for flank in Flank::BOTH {
            if !view.edge(flank).is_open() || mode.is_attacking(flank) {
                continue;
            }
            if view.opponent_mp < block_threshold || mode.is_attacking(flank.opposite()) {
                debug!("Closing {} flank", flank);
                self.block_flank(oracle, view, flank);
                closed.push(flank);
            }
        }

        closed
    }

    /// Spawn the blocking walls of `flank`
    ///
    /// Each wall is upgraded when the opponent holds many mobile points and is
    /// then immediately queued for removal. The removal order is kept exactly
    /// as the strategy issues it; see DESIGN.md.
    pub fn block_flank<O: GameOracle + ?Sized>(
        &self,
        oracle: &mut O,
        view: &mut BattlefieldView,
        flank: Flank,
    ) {
        let layout = self.config.layout(flank);
        let upgrade = view.opponent_mp > self.config.thresholds.upgrade_edge_wall_enemy_mp;
        for &cell in &layout.edge_block {
            oracle.spawn(StructureKind::Wall.into(), cell, 1);
            if upgrade {
                oracle.upgrade(cell);
            }
            oracle.remove(cell);
        }
        view.edge_mut(flank).own_blocked = true;
    }

    /// Walk the build order, never leaving less than `reserve` structure points
    pub fn execute_build_plan<O: GameOracle + ?Sized>(
        &self,
        oracle: &mut O,
        plan: &BuildPlan,
        reserve: f64,
        mode: TurnStrategy,
    ) -> BuildReport {
        let lane_clear = mode
            .attack_flank()
            .map(|flank| self.config.layout(flank).attack_lane_clear)
            .unwrap_or_default();
        let mut report = BuildReport::default();

        match plan {
            BuildPlan::Grouped(groups) => {
                'plan: for group in groups {
                    for job in group {
                        let outcome = run_job(oracle, job, reserve, &lane_clear);
                        report.record(&outcome);
                        if matches!(outcome, JobOutcome::Unfunded) {
                            report.halted = true;
                            debug!(
                                "Build order halted at {:?}: {:.1} SP left",
                                job,
                                oracle.resource(Currency::Structure, Side::Own)
                            );
                            break 'plan;
                        }
                    }
                }
            }
            BuildPlan::Flat(jobs) => {
                for job in jobs {
                    let outcome = run_job(oracle, job, reserve, &lane_clear);
                    report.record(&outcome);
                }
            }
        }

        report
    }
}

impl BuildReport {
    fn record(&mut self, outcome: &JobOutcome) {
        match outcome {
            JobOutcome::Accepted => self.accepted += 1,
            JobOutcome::Rejected => self.rejected += 1,
            JobOutcome::Unfunded => self.unfunded += 1,
            JobOutcome::KeptClear => self.kept_clear += 1,
        }
    }
}

fn run_job<O: GameOracle + ?Sized>(
    oracle: &mut O,
    job: &BuildJob,
    reserve: f64,
    lane_clear: &[Coord],
) -> JobOutcome {
    if !job.is_upgrade() && lane_clear.contains(&job.location()) {
        return JobOutcome::KeptClear;
    }

    // Upgrades are priced by whatever actually stands in the cell
    let priced_kind = match *job {
        BuildJob::Spawn { kind, .. } => kind,
        BuildJob::Upgrade { location, .. } => match oracle.stationary_unit_at(location) {
            Some(structure) => structure.kind,
            None => return JobOutcome::Rejected,
        },
    };
    let cost = oracle.cost_of(priced_kind.into(), job.is_upgrade()).structure;
    if oracle.resource(Currency::Structure, Side::Own) - cost < reserve {
        return JobOutcome::Unfunded;
    }

    let accepted = match *job {
        BuildJob::Spawn { kind, location } => oracle.spawn(kind.into(), location, 1),
        BuildJob::Upgrade { location, .. } => oracle.upgrade(location),
    };
    if accepted {
        JobOutcome::Accepted
    } else {
        JobOutcome::Rejected
    }
}
