//! Skirmish map generation library
//!
//! Generates a tile map for a two-player strategy game, scores it, and
//! refines it by hill climbing before export.

pub mod config;
pub mod error;
pub mod evaluate;
pub mod export;
pub mod generator;
pub mod grid;
pub mod optimizer;
pub mod rng;
pub mod tile;
pub mod tilemap;

pub use config::MapgenConfig;
pub use error::{MapgenError, Result};
pub use grid::GridState;
pub use optimizer::ClimbReport;

use generator::MapGenerator;
use rng::RandomSource;

/// Generate a map and hill-climb it, drawing everything from `rng` in order:
/// generation first, then one batch of draws per climb iteration.
pub fn generate_and_climb<R: RandomSource>(config: &MapgenConfig, rng: &mut R) -> Result<ClimbReport> {
    config.validate()?;
    let initial = MapGenerator::new(config.generator.clone(), &mut *rng).generate(config.width, config.height)?;
    Ok(optimizer::hill_climb(initial, config.climb.clone(), rng))
}
