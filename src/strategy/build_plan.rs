//! Declarative build orders
//!
//! A build order is designer data: an ordered list of spawn and upgrade
//! steps. It is validated once at load time and then executed verbatim every
//! turn by the defense builder.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::arena::is_own_half;
use crate::core::error::{BotError, Result};
use crate::core::types::{Coord, StructureKind, UnitKind};

/// One step of a build order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BuildJob {
    Spawn { kind: StructureKind, location: Coord },
    Upgrade { kind: StructureKind, location: Coord },
}

impl BuildJob {
    pub fn kind(&self) -> StructureKind {
        match self {
            BuildJob::Spawn { kind, .. } | BuildJob::Upgrade { kind, .. } => *kind,
        }
    }

    pub fn location(&self) -> Coord {
        match self {
            BuildJob::Spawn { location, .. } | BuildJob::Upgrade { location, .. } => *location,
        }
    }

    pub fn is_upgrade(&self) -> bool {
        matches!(self, BuildJob::Upgrade { .. })
    }
}

/// How a build order reacts to an unaffordable step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildPlan {
    /// Groups of jobs; the first unaffordable step halts the whole remaining plan
    Grouped(Vec<Vec<BuildJob>>),
    /// A single list; an unaffordable step is skipped and the next one tried
    Flat(Vec<BuildJob>),
}

impl BuildPlan {
    pub fn job_count(&self) -> usize {
        match self {
            BuildPlan::Grouped(groups) => groups.iter().map(Vec::len).sum(),
            BuildPlan::Flat(jobs) => jobs.len(),
        }
    }

    /// Parse and validate a JSON build order
    pub fn from_json(contents: &str) -> Result<Self> {
        let raw: RawPlan = serde_json::from_str(contents)?;
        let mut index = 0;
        let plan = match raw {
            RawPlan::Grouped(groups) => {
                let mut resolved = Vec::with_capacity(groups.len());
                for group in groups {
                    let mut jobs = Vec::with_capacity(group.len());
                    for raw_job in group {
                        jobs.push(raw_job.resolve(index)?);
                        index += 1;
                    }
                    resolved.push(jobs);
                }
                BuildPlan::Grouped(resolved)
            }
            RawPlan::Flat(raw_jobs) => {
                let mut jobs = Vec::with_capacity(raw_jobs.len());
                for raw_job in raw_jobs {
                    jobs.push(raw_job.resolve(index)?);
                    index += 1;
                }
                BuildPlan::Flat(jobs)
            }
        };

        if plan.job_count() == 0 {
            return Err(BotError::InvalidConfig("build order has no jobs".to_string()));
        }
        Ok(plan)
    }
}

/// Load a build order file; any defect is fatal
pub fn load_build_plan(path: &Path) -> Result<BuildPlan> {
    let contents = fs::read_to_string(path)?;
    BuildPlan::from_json(&contents)
}

/// Build order entry as written in the file
#[derive(Debug, Deserialize)]
struct RawBuildJob {
    #[serde(rename = "type")]
    job_type: String,
    unit: String,
    location: Coord,
}

impl RawBuildJob {
    fn resolve(self, index: usize) -> Result<BuildJob> {
        let kind = match UnitKind::from_name(&self.unit)? {
            UnitKind::Structure(kind) => kind,
            UnitKind::Mobile(kind) => {
                return Err(BotError::InvalidBuildJob {
                    index,
                    reason: format!("{} is a mobile unit and cannot be built", kind),
                })
            }
        };
        if !is_own_half(self.location) {
            return Err(BotError::InvalidBuildJob {
                index,
                reason: format!("{} is not on our half of the arena", self.location),
            });
        }
        match self.job_type.as_str() {
            "spawn" => Ok(BuildJob::Spawn {
                kind,
                location: self.location,
            }),
            "upgrade" => Ok(BuildJob::Upgrade {
                kind,
                location: self.location,
            }),
            other => Err(BotError::InvalidBuildJob {
                index,
                reason: format!("unknown job type {:?}", other),
            }),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawPlan {
    Grouped(Vec<Vec<RawBuildJob>>),
    Flat(Vec<RawBuildJob>),
}
