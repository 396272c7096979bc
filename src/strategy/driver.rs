//! Turn driver and the submission boundary

use std::io::Write;

use crate::core::error::{BotError, Result};
use crate::oracle::{DeploymentPlan, GameOracle};
use crate::strategy::commander::{Commander, TurnAlgo, TurnReport};

/// Where finished deployment plans go
pub trait PlanSink {
    fn submit(&mut self, plan: &DeploymentPlan) -> Result<()>;
}

/// Writes one JSON object per turn
pub struct JsonLinesSink<W: Write> {
    writer: W,
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> PlanSink for JsonLinesSink<W> {
    fn submit(&mut self, plan: &DeploymentPlan) -> Result<()> {
        let line = serde_json::to_string(plan)?;
        writeln!(self.writer, "{}", line)
            .and_then(|_| self.writer.flush())
            .map_err(|e| BotError::Submission(format!("turn {}: {}", plan.turn, e)))
    }
}

/// Keeps submitted plans in memory
#[derive(Debug, Default)]
pub struct VecSink {
    pub plans: Vec<DeploymentPlan>,
}

impl PlanSink for VecSink {
    fn submit(&mut self, plan: &DeploymentPlan) -> Result<()> {
        self.plans.push(plan.clone());
        Ok(())
    }
}

/// Runs a bot turn by turn and submits exactly one plan per turn
pub struct TurnDriver<S: PlanSink, A: TurnAlgo = Commander> {
    algo: A,
    sink: S,
}

impl<S: PlanSink, A: TurnAlgo> TurnDriver<S, A> {
    pub fn new(algo: A, sink: S) -> Self {
        Self { algo, sink }
    }

    /// Decide the turn, then hand everything queued on the oracle to the sink
    pub fn play_turn(&mut self, oracle: &mut dyn GameOracle) -> Result<TurnReport> {
        let report = self.algo.on_turn(oracle);
        let plan = oracle.drain_plan();
        self.sink.submit(&plan)?;
        Ok(report)
    }

    pub fn on_action_frame(&mut self, frame: &str) {
        self.algo.on_action_frame(frame);
    }

    pub fn algo(&self) -> &A {
        &self.algo
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::StrategyConfig;
    use crate::core::types::{Coord, StructureKind};
    use crate::oracle::SnapshotOracle;
    use crate::strategy::build_plan::{BuildJob, BuildPlan};

    fn commander() -> Commander {
        let plan = BuildPlan::Flat(vec![BuildJob::Spawn {
            kind: StructureKind::Turret,
            location: Coord::new(13, 12),
        }]);
        Commander::with_seed(StrategyConfig::default(), plan, 5)
    }

    #[test]
    fn test_one_plan_per_turn() {
        let mut driver = TurnDriver::new(commander(), VecSink::default());
        for turn in 0..3 {
            let mut oracle = SnapshotOracle::new(turn);
            let report = driver.play_turn(&mut oracle).unwrap();
            assert_eq!(report.turn, turn);
            assert!(oracle.plan().is_empty());
        }
        let plans = &driver.sink().plans;
        assert_eq!(plans.len(), 3);
        assert_eq!(plans[1].turn, 1);
        assert!(!plans[0].is_empty());
    }

    #[test]
    fn test_empty_turn_still_submits() {
        let mut driver = TurnDriver::new(commander(), VecSink::default());
        let mut oracle = SnapshotOracle::new(8).with_resources(
            crate::core::types::Side::Own,
            0.0,
            0.0,
        );
        for cell in [(0, 13), (1, 13), (27, 13), (26, 13)] {
            oracle.place(StructureKind::Wall, Coord::new(cell.0, cell.1), false);
        }
        driver.play_turn(&mut oracle).unwrap();
        let plans = driver.into_sink().plans;
        assert_eq!(plans.len(), 1);
        assert!(plans[0].is_empty());
    }

    #[test]
    fn test_json_lines_output() {
        let mut driver = TurnDriver::new(commander(), JsonLinesSink::new(Vec::new()));
        driver.play_turn(&mut SnapshotOracle::new(0)).unwrap();
        driver.play_turn(&mut SnapshotOracle::new(1)).unwrap();

        let output = String::from_utf8(driver.into_sink().into_inner()).unwrap();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 2);
        let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["turn"], 0);
        assert_eq!(first["actions"][0]["action"], "spawn");
        assert_eq!(first["actions"][0]["unit"], "wall");
    }
}
