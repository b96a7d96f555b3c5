//! Run configuration
//!
//! Defaults, optionally replaced by a JSON file, then adjusted by CLI flags.
//! Any field missing from the file keeps its default.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{MapgenError, Result};
use crate::generator::GeneratorConfig;
use crate::optimizer::ClimbConfig;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapgenConfig {
    pub width: usize,
    pub height: usize,
    pub generator: GeneratorConfig,
    pub climb: ClimbConfig,
}

impl Default for MapgenConfig {
    fn default() -> Self {
        Self {
            width: 32,
            height: 32,
            generator: GeneratorConfig::default(),
            climb: ClimbConfig::default(),
        }
    }
}

impl MapgenConfig {
    pub fn from_json(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|source| MapgenError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(MapgenError::InvalidConfig(format!(
                "map must be at least 1x1, got {}x{}",
                self.width, self.height
            )));
        }
        self.generator.validate()?;

        // Only a lower bound: lakes and trees also take cells, so a map
        // that passes this can still hit `PlacementExhausted`.
        let entities = self
            .generator
            .players
            .saturating_add(self.generator.peasants)
            .saturating_add(self.generator.gold_mines);
        let cells = self.width.saturating_mul(self.height);
        if entities > cells {
            warn!(
                entities,
                cells,
                "more entities than cells; placement is certain to run out of room"
            );
        }
        Ok(())
    }
}
