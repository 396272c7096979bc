//! Mobile unit deployment for the current mode

use serde::Serialize;
use tracing::debug;

use crate::core::config::StrategyConfig;
use crate::core::types::{Coord, Currency, Flank, MobileKind, Side};
use crate::oracle::GameOracle;
use crate::strategy::edge::BattlefieldView;
use crate::strategy::heuristics::{
    first_wave_count, interceptor_count, second_wave_count, siege_count, tank_count,
};
use crate::strategy::mode::TurnStrategy;

/// One spawn request and whether the engine took it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Wave {
    pub kind: MobileKind,
    pub location: Coord,
    pub requested: u32,
    pub accepted: bool,
}

/// Spawn requests issued this turn, in order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DeploymentReport {
    pub waves: Vec<Wave>,
}

impl DeploymentReport {
    /// Units requested of `kind`, accepted or not
    pub fn requested(&self, kind: MobileKind) -> u32 {
        self.waves
            .iter()
            .filter(|wave| wave.kind == kind)
            .map(|wave| wave.requested)
            .sum()
    }
}

/// Deploy this turn's mobile units for `mode`
///
/// `view` must already reflect any flank closed earlier this turn.
pub fn deploy<O: GameOracle + ?Sized>(
    oracle: &mut O,
    view: &BattlefieldView,
    mode: TurnStrategy,
    config: &StrategyConfig,
) -> DeploymentReport {
    let mut report = DeploymentReport::default();
    match mode.attack_flank() {
        None => defend(oracle, view, config, &mut report),
        Some(flank) => attack(oracle, view, flank, config, &mut report),
    }
    report
}

fn defend<O: GameOracle + ?Sized>(
    oracle: &mut O,
    view: &BattlefieldView,
    config: &StrategyConfig,
    report: &mut DeploymentReport,
) {
    let count = interceptor_count(view.opponent_mp, &config.heuristics);
    for flank in Flank::BOTH {
        if !view.edge(flank).is_open() {
            continue;
        }
        let layout = config.layout(flank);
        send(oracle, report, MobileKind::Interceptor, layout.defense_interceptor, count);
    }
}

fn attack<O: GameOracle + ?Sized>(
    oracle: &mut O,
    view: &BattlefieldView,
    flank: Flank,
    config: &StrategyConfig,
    report: &mut DeploymentReport,
) {
    let edge = view.edge(flank);
    let layout = config.layout(flank);
    let heuristics = &config.heuristics;

    if edge.misdirecting {
        debug!("{} lane is trapped; sending demolishers behind interceptors", flank);
        send(
            oracle,
            report,
            MobileKind::Interceptor,
            layout.tank_spawn,
            tank_count(edge.strength, heuristics),
        );
        send(
            oracle,
            report,
            MobileKind::Demolisher,
            layout.siege_spawn,
            siege_count(edge.strength, heuristics),
        );
    } else if !edge.opponent_blocked {
        send(
            oracle,
            report,
            MobileKind::Interceptor,
            layout.defense_interceptor,
            interceptor_count(view.opponent_mp, heuristics),
        );
    }

    let own_mp = oracle.resource(Currency::Mobile, Side::Own);
    let first = first_wave_count(edge.strength, heuristics);
    let second = second_wave_count(own_mp, first);
    debug!(
        "Scout waves through {} flank: {} then {} ({:.1} MP, strength {:.2})",
        flank, first, second, own_mp, edge.strength
    );
    send(oracle, report, MobileKind::Scout, layout.scout_cells[0], first);
    send(oracle, report, MobileKind::Scout, layout.scout_cells[1], second);
}

fn send<O: GameOracle + ?Sized>(
    oracle: &mut O,
    report: &mut DeploymentReport,
    kind: MobileKind,
    location: Coord,
    count: u32,
) {
    if count == 0 {
        return;
    }
    let accepted = oracle.spawn(kind.into(), location, count);
    report.waves.push(Wave {
        kind,
        location,
        requested: count,
        accepted,
    });
}
