//! Hill climbing over single-cell edits.
//!
//! Each iteration rewrites one random cell of the best map so far, rescores
//! it and keeps the result only if the score went strictly up. There is no
//! annealing, no restarts and no early exit: the climber always runs its
//! full iteration budget.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::evaluate::evaluate;
use crate::generator::{perturb_cell, MutationPolicy};
use crate::grid::GridState;
use crate::rng::RandomSource;

/// How a candidate is materialised from the best map.
///
/// Both strategies draw the same random values and accept the same edits;
/// they differ only in memory traffic.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CandidateStrategy {
    /// Deep-copy the best map, edit the copy, swap it in on improvement.
    #[default]
    Clone,
    /// Edit the best map in place and undo the one cell on rejection.
    Rollback,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClimbConfig {
    /// Number of candidate edits to try
    pub iterations: usize,
    pub policy: MutationPolicy,
    pub strategy: CandidateStrategy,
}

impl Default for ClimbConfig {
    fn default() -> Self {
        Self {
            iterations: 100,
            policy: MutationPolicy::default(),
            strategy: CandidateStrategy::default(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClimbState {
    Running { iteration: usize },
    Done,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepOutcome {
    /// The candidate beat the best score and replaced the best map.
    Improved { score: i64 },
    /// The candidate scored no better and was thrown away.
    Rejected { score: i64 },
    /// No cell was eligible for mutation; the iteration still counts.
    NoCandidate,
    /// The budget is spent; nothing happened.
    Done,
}

/// Summary of a finished climb.
#[derive(Clone, Debug)]
pub struct ClimbReport {
    pub best: GridState,
    pub best_score: i64,
    pub initial_score: i64,
    /// Best score after each iteration
    pub score_trace: Vec<i64>,
    /// Number of improving edits kept
    pub accepted: usize,
}

pub struct HillClimber<R> {
    config: ClimbConfig,
    rng: R,
    best: GridState,
    best_score: i64,
    initial_score: i64,
    iteration: usize,
    accepted: usize,
    score_trace: Vec<i64>,
}

impl<R: RandomSource> HillClimber<R> {
    /// Start a climb from `initial`, scoring it once up front.
    pub fn new(config: ClimbConfig, rng: R, initial: GridState) -> Self {
        let initial_score = evaluate(&initial);
        Self {
            score_trace: Vec::with_capacity(config.iterations),
            config,
            rng,
            best: initial,
            best_score: initial_score,
            initial_score,
            iteration: 0,
            accepted: 0,
        }
    }

    pub fn state(&self) -> ClimbState {
        if self.iteration < self.config.iterations {
            ClimbState::Running { iteration: self.iteration }
        } else {
            ClimbState::Done
        }
    }

    pub fn best(&self) -> &GridState {
        &self.best
    }

    pub fn best_score(&self) -> i64 {
        self.best_score
    }

    /// Run one iteration.
    pub fn step(&mut self) -> StepOutcome {
        if self.state() == ClimbState::Done {
            return StepOutcome::Done;
        }

        let outcome = match self.config.strategy {
            CandidateStrategy::Clone => self.step_clone(),
            CandidateStrategy::Rollback => self.step_rollback(),
        };

        if let StepOutcome::Improved { score } = outcome {
            self.accepted += 1;
            debug!(iteration = self.iteration, score, "improved");
        }
        self.iteration += 1;
        self.score_trace.push(self.best_score);
        outcome
    }

    fn step_clone(&mut self) -> StepOutcome {
        let mut candidate = self.best.clone();
        if perturb_cell(&mut candidate, &mut self.rng, self.config.policy).is_none() {
            return StepOutcome::NoCandidate;
        }

        let score = evaluate(&candidate);
        if score > self.best_score {
            self.best = candidate;
            self.best_score = score;
            StepOutcome::Improved { score }
        } else {
            StepOutcome::Rejected { score }
        }
    }

    fn step_rollback(&mut self) -> StepOutcome {
        let Some(edit) = perturb_cell(&mut self.best, &mut self.rng, self.config.policy) else {
            return StepOutcome::NoCandidate;
        };

        let score = evaluate(&self.best);
        if score > self.best_score {
            self.best_score = score;
            StepOutcome::Improved { score }
        } else {
            edit.revert(&mut self.best);
            StepOutcome::Rejected { score }
        }
    }

    /// Spend the remaining budget and return the best map found.
    pub fn run(mut self) -> ClimbReport {
        while self.step() != StepOutcome::Done {}

        info!(
            iterations = self.iteration,
            accepted = self.accepted,
            initial_score = self.initial_score,
            best_score = self.best_score,
            "hill climb finished"
        );

        ClimbReport {
            best: self.best,
            best_score: self.best_score,
            initial_score: self.initial_score,
            score_trace: self.score_trace,
            accepted: self.accepted,
        }
    }
}

/// Climb from `initial` with the given config and source.
pub fn hill_climb<R: RandomSource>(initial: GridState, config: ClimbConfig, rng: R) -> ClimbReport {
    HillClimber::new(config, rng, initial).run()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::{GeneratorConfig, MapGenerator};
    use crate::tile::Tile;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn seeded_map(seed: u64) -> (GridState, ChaCha8Rng) {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let grid = MapGenerator::new(GeneratorConfig::default(), &mut rng)
            .generate(32, 32)
            .unwrap();
        (grid, rng)
    }

    #[test]
    fn test_runs_exactly_budget() {
        let (grid, mut rng) = seeded_map(1);
        let config = ClimbConfig { iterations: 37, ..Default::default() };
        let report = hill_climb(grid, config, &mut rng);
        assert_eq!(report.score_trace.len(), 37);
    }

    #[test]
    fn test_score_trace_is_monotone() {
        for seed in 0..10 {
            let (grid, mut rng) = seeded_map(seed);
            let report = hill_climb(grid, ClimbConfig::default(), &mut rng);

            assert!(report.best_score >= report.initial_score);
            let mut prev = report.initial_score;
            for &score in &report.score_trace {
                assert!(score >= prev);
                prev = score;
            }
            assert_eq!(report.score_trace.last().copied(), Some(report.best_score));
            assert_eq!(evaluate(&report.best), report.best_score);
        }
    }

    #[test]
    fn test_state_machine() {
        let (grid, mut rng) = seeded_map(2);
        let config = ClimbConfig { iterations: 2, ..Default::default() };
        let mut climber = HillClimber::new(config, &mut rng, grid);

        assert_eq!(climber.state(), ClimbState::Running { iteration: 0 });
        assert_ne!(climber.step(), StepOutcome::Done);
        assert_eq!(climber.state(), ClimbState::Running { iteration: 1 });
        assert_ne!(climber.step(), StepOutcome::Done);
        assert_eq!(climber.state(), ClimbState::Done);
        assert_eq!(climber.step(), StepOutcome::Done);
    }

    #[test]
    fn test_zero_budget_returns_initial() {
        let (grid, mut rng) = seeded_map(3);
        let expected = grid.clone();
        let config = ClimbConfig { iterations: 0, ..Default::default() };
        let report = hill_climb(grid, config, &mut rng);
        assert_eq!(report.best, expected);
        assert!(report.score_trace.is_empty());
        assert_eq!(report.accepted, 0);
    }

    #[test]
    fn test_equal_score_is_not_accepted() {
        // Already holds all three mutation symbols; no edit can raise the score.
        let grid = GridState::from_rows(&[".tw", "wt."]).unwrap();
        let expected = grid.clone();
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let report = hill_climb(grid, ClimbConfig::default(), &mut rng);
        assert_eq!(report.accepted, 0);
        assert_eq!(report.best, expected);
    }

    #[test]
    fn test_improvement_from_single_symbol_map() {
        let grid = GridState::new(4, 4);
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let report = hill_climb(grid, ClimbConfig::default(), &mut rng);
        assert_eq!(report.initial_score, 10);
        // Any tree or water edit adds a symbol; 100 draws all landing on
        // '.' would need (1/3)^100 luck.
        assert!(report.best_score >= 20);
        assert!(report.accepted >= 1);
    }

    #[test]
    fn test_strategies_agree() {
        for policy in [MutationPolicy::PreserveEntities, MutationPolicy::Unrestricted] {
            let (grid, rng) = seeded_map(5);
            let mut rng_a = rng.clone();
            let mut rng_b = rng;

            let clone = hill_climb(
                grid.clone(),
                ClimbConfig { strategy: CandidateStrategy::Clone, policy, ..Default::default() },
                &mut rng_a,
            );
            let rollback = hill_climb(
                grid,
                ClimbConfig { strategy: CandidateStrategy::Rollback, policy, ..Default::default() },
                &mut rng_b,
            );

            assert_eq!(clone.best, rollback.best);
            assert_eq!(clone.score_trace, rollback.score_trace);
            assert_eq!(clone.accepted, rollback.accepted);
        }
    }

    #[test]
    fn test_preserve_entities_keeps_markers() {
        let (grid, mut rng) = seeded_map(6);
        let config = ClimbConfig { iterations: 2000, ..Default::default() };
        let report = hill_climb(grid, config, &mut rng);
        for p in report.best.players() {
            assert_eq!(report.best.tile(p.x, p.y), Tile::PlayerBase);
        }
        for p in report.best.peasants() {
            assert_eq!(report.best.tile(p.x, p.y), Tile::Peasant);
        }
    }

    #[test]
    fn test_no_candidate_still_counts() {
        let mut grid = GridState::new(1, 1);
        grid.mark_player(0, 0, 0);
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let config = ClimbConfig { iterations: 3, ..Default::default() };
        let mut climber = HillClimber::new(config, &mut rng, grid);
        assert_eq!(climber.step(), StepOutcome::NoCandidate);
        let report = climber.run();
        assert_eq!(report.score_trace, vec![10, 10, 10]);
    }
}
