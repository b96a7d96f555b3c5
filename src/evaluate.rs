//! Map fitness
//!
//! A map's score is the sum of three independent terms. Higher is better,
//! and the total may go negative.

use std::collections::HashSet;

use crate::grid::GridState;

/// Baseline the resource-balance term subtracts mine distance from.
pub const RESOURCE_BALANCE_BASELINE: i64 = 100;
/// Points per distinct terrain symbol.
pub const GEOMETRY_POINTS_PER_SYMBOL: i64 = 10;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ScoreBreakdown {
    /// Manhattan distance between the first two player bases
    pub base_distance: i64,
    /// Baseline minus the distance between the first two gold mines
    pub resource_balance: i64,
    /// Distinct terrain symbols, scaled
    pub map_geometry: i64,
}

impl ScoreBreakdown {
    pub fn total(&self) -> i64 {
        self.base_distance + self.resource_balance + self.map_geometry
    }
}

fn manhattan(a: (usize, usize), b: (usize, usize)) -> i64 {
    (a.0 as i64 - b.0 as i64).abs() + (a.1 as i64 - b.1 as i64).abs()
}

/// Total fitness of a map.
pub fn evaluate(grid: &GridState) -> i64 {
    score_breakdown(grid).total()
}

pub fn score_breakdown(grid: &GridState) -> ScoreBreakdown {
    ScoreBreakdown {
        base_distance: base_distance_score(grid),
        resource_balance: resource_balance_score(grid),
        map_geometry: map_geometry_score(grid),
    }
}

/// Only the first two players count; fewer than two scores zero.
pub fn base_distance_score(grid: &GridState) -> i64 {
    match grid.players() {
        [a, b, ..] => manhattan((a.x, a.y), (b.x, b.y)),
        _ => 0,
    }
}

/// Only the first two mines count; fewer than two scores zero.
/// Not clamped: mines more than 100 apart score below zero.
pub fn resource_balance_score(grid: &GridState) -> i64 {
    match grid.gold_mines() {
        [a, b, ..] => RESOURCE_BALANCE_BASELINE - manhattan((a.x, a.y), (b.x, b.y)),
        _ => 0,
    }
}

pub fn map_geometry_score(grid: &GridState) -> i64 {
    let symbols: HashSet<char> = grid.terrain().iter().map(|(_, _, t)| t.symbol()).collect();
    symbols.len() as i64 * GEOMETRY_POINTS_PER_SYMBOL
}
