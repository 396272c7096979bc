//! Turn strategy: board analysis, defense, deployment and mode selection

pub mod build_plan;
pub mod commander;
pub mod defense;
pub mod deployment;
pub mod driver;
pub mod edge;
pub mod heuristics;
pub mod intel;
pub mod mode;

pub use build_plan::{load_build_plan, BuildJob, BuildPlan};
pub use commander::{Commander, TurnAlgo, TurnReport};
pub use defense::{BuildReport, DefenseBuilder};
pub use deployment::{deploy, DeploymentReport, Wave};
pub use driver::{JsonLinesSink, PlanSink, TurnDriver, VecSink};
pub use edge::{BattlefieldView, EdgeState};
pub use intel::{ActionFrame, Intel};
pub use mode::{next_mode, TurnStrategy};
