//! Random map generation
//!
//! Builds a skirmish map in fixed phases: lakes, trees, gold mines,
//! player bases, peasants. Every draw comes from the injected
//! `RandomSource` in a fixed order, so one seed always gives one map.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{MapgenError, Result};
use crate::grid::{GridState, GOLD_MINE_CLEAR_RADIUS};
use crate::rng::RandomSource;
use crate::tile::Tile;

/// Tunable counts and probabilities for map generation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Number of lakes to scatter
    pub lake_attempts: usize,
    /// Smallest number of water draws per lake
    pub lake_size_min: usize,
    /// Largest number of water draws per lake
    pub lake_size_max: usize,
    /// Max per-axis offset of a water draw from the lake center
    pub lake_jitter: usize,
    /// Chance an empty cell becomes a tree (0.0-1.0)
    pub tree_probability: f64,
    pub gold_mines: usize,
    /// Half-width of the square each gold mine clears
    pub gold_mine_clear_radius: usize,
    pub players: usize,
    pub peasants: usize,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            lake_attempts: 3,
            lake_size_min: 5,
            lake_size_max: 10,
            lake_jitter: 2,
            tree_probability: 0.1,
            gold_mines: 2,
            gold_mine_clear_radius: GOLD_MINE_CLEAR_RADIUS,
            players: 2,
            peasants: 2,
        }
    }
}

impl GeneratorConfig {
    pub fn validate(&self) -> Result<()> {
        if self.lake_size_min > self.lake_size_max {
            return Err(MapgenError::InvalidConfig(format!(
                "lake_size_min ({}) exceeds lake_size_max ({})",
                self.lake_size_min, self.lake_size_max
            )));
        }
        if !(0.0..=1.0).contains(&self.tree_probability) {
            return Err(MapgenError::InvalidConfig(format!(
                "tree_probability must be within [0, 1], got {}",
                self.tree_probability
            )));
        }
        Ok(())
    }
}

/// Which cells the hill climber is allowed to rewrite.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MutationPolicy {
    /// Cells holding a registered player, mine or peasant are never picked.
    #[default]
    PreserveEntities,
    /// Any cell may be picked, and entity markers can be painted over
    /// while the entity stays registered.
    Unrestricted,
}

/// One applied single-cell mutation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CellEdit {
    pub x: usize,
    pub y: usize,
    pub previous: Tile,
    pub replacement: Tile,
}

impl CellEdit {
    /// Put the cell back the way it was.
    pub fn revert(&self, grid: &mut GridState) {
        grid.set_cell(self.x, self.y, self.previous);
    }
}

/// Rewrite one random cell with empty, tree or water.
///
/// Draws x, y, then the replacement symbol. Under `PreserveEntities` the
/// cell draw is repeated until it misses every registered entity; if the
/// entities cover the whole map there is nothing to pick and `None` comes
/// back without touching the grid.
pub fn perturb_cell<R: RandomSource>(
    grid: &mut GridState,
    rng: &mut R,
    policy: MutationPolicy,
) -> Option<CellEdit> {
    let (width, height) = (grid.width(), grid.height());
    if width == 0 || height == 0 {
        return None;
    }

    let (x, y) = match policy {
        MutationPolicy::Unrestricted => (rng.index(width), rng.index(height)),
        MutationPolicy::PreserveEntities => {
            if grid.occupied_cell_count() >= width * height {
                return None;
            }
            loop {
                let x = rng.index(width);
                let y = rng.index(height);
                if !grid.is_occupied(x, y) {
                    break (x, y);
                }
            }
        }
    };

    let replacement = *rng.choose(&Tile::MUTATION_CHOICES)?;
    let previous = grid.set_cell(x, y, replacement);
    if previous.is_entity_marker() {
        debug!(x, y, marker = %previous, "entity marker overwritten");
    }
    Some(CellEdit { x, y, previous, replacement })
}

/// Produces fresh maps from a config and a borrowed random source.
pub struct MapGenerator<R> {
    config: GeneratorConfig,
    rng: R,
}

impl<R: RandomSource> MapGenerator<R> {
    pub fn new(config: GeneratorConfig, rng: R) -> Self {
        Self { config, rng }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Give back the random source, e.g. to hand it on to the optimizer.
    pub fn into_rng(self) -> R {
        self.rng
    }

    /// Allocate a map of the given size and populate it.
    pub fn generate(&mut self, width: usize, height: usize) -> Result<GridState> {
        let mut grid = GridState::new(width, height);
        self.generate_random_map(&mut grid)?;
        Ok(grid)
    }

    /// Wipe `grid` and fill it: lakes, trees, gold mines, players, peasants.
    pub fn generate_random_map(&mut self, grid: &mut GridState) -> Result<()> {
        self.config.validate()?;
        if grid.width() == 0 || grid.height() == 0 {
            return Err(MapgenError::InvalidConfig(format!(
                "map must be at least 1x1, got {}x{}",
                grid.width(),
                grid.height()
            )));
        }
        grid.clear();

        self.scatter_lakes(grid);
        let trees = self.scatter_trees(grid);
        debug!(trees, water = grid.terrain().count_where(|t| *t == Tile::Water), "terrain scattered");

        for _ in 0..self.config.gold_mines {
            let (x, y) = grid.sample_empty_cell(&mut self.rng, "gold mine")?;
            grid.place_gold_mine_with_radius(x, y, self.config.gold_mine_clear_radius);
        }

        for id in 0..self.config.players {
            grid.place_player(id as u32, &mut self.rng)?;
        }

        for id in 0..self.config.peasants {
            grid.place_peasant(id as u32, &mut self.rng)?;
        }

        info!(
            width = grid.width(),
            height = grid.height(),
            gold_mines = grid.gold_mines().len(),
            players = grid.players().len(),
            peasants = grid.peasants().len(),
            "generated map"
        );
        Ok(())
    }

    /// Lakes are clouds of jittered water draws around a random center.
    /// Draws that fall off the map are dropped and overlaps are allowed.
    fn scatter_lakes(&mut self, grid: &mut GridState) {
        let jitter = self.config.lake_jitter as i64;

        for _ in 0..self.config.lake_attempts {
            let lake_size = self
                .rng
                .int_inclusive(self.config.lake_size_min as i64, self.config.lake_size_max as i64);
            let lx = self.rng.index(grid.width()) as i64;
            let ly = self.rng.index(grid.height()) as i64;

            for _ in 0..lake_size {
                let nx = lx + self.rng.int_inclusive(-jitter, jitter);
                let ny = ly + self.rng.int_inclusive(-jitter, jitter);
                if grid.terrain().in_bounds(nx, ny) {
                    grid.set_cell(nx as usize, ny as usize, Tile::Water);
                }
            }
        }
    }

    /// Each still-empty cell independently becomes a tree.
    /// Only empty cells consume a draw.
    fn scatter_trees(&mut self, grid: &mut GridState) -> usize {
        let mut planted = 0;
        for y in 0..grid.height() {
            for x in 0..grid.width() {
                if grid.tile(x, y).is_empty() && self.rng.chance(self.config.tree_probability) {
                    grid.set_cell(x, y, Tile::Tree);
                    planted += 1;
                }
            }
        }
        planted
    }
}
