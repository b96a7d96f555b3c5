//! Map state: terrain buffer plus entity registries
//!
//! A `GridState` is a plain value. Cloning it yields a fully independent
//! copy, which is what the hill climber relies on when it scores candidates.
//!
//! Terrain symbols and the entity lists are not kept in sync after
//! placement. Writing over a marker with `set_cell` leaves the entity
//! registered; see `MutationPolicy` for how the search handles that.

use std::fmt;

use crate::error::{MapgenError, Result};
use crate::rng::RandomSource;
use crate::tile::Tile;
use crate::tilemap::Tilemap;

/// Half-width of the square a gold mine clears around itself (5x5).
pub const GOLD_MINE_CLEAR_RADIUS: usize = 2;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Player {
    pub id: u32,
    pub x: usize,
    pub y: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GoldMine {
    pub x: usize,
    pub y: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Peasant {
    pub id: u32,
    pub x: usize,
    pub y: usize,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GridState {
    terrain: Tilemap<Tile>,
    players: Vec<Player>,
    gold_mines: Vec<GoldMine>,
    peasants: Vec<Peasant>,
}

impl GridState {
    /// An all-empty map with no entities.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            terrain: Tilemap::new_with(width, height, Tile::Empty),
            players: Vec::new(),
            gold_mines: Vec::new(),
            peasants: Vec::new(),
        }
    }

    /// Build a map from row strings, one symbol per character.
    /// No entities are registered, whatever markers the rows contain.
    pub fn from_rows<S: AsRef<str>>(rows: &[S]) -> Result<Self> {
        let height = rows.len();
        let width = rows.first().map(|r| r.as_ref().chars().count()).unwrap_or(0);
        if width == 0 || height == 0 {
            return Err(MapgenError::InvalidConfig("map rows must be non-empty".into()));
        }

        let mut grid = Self::new(width, height);
        for (y, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.chars().count() != width {
                return Err(MapgenError::InvalidConfig(format!(
                    "row {} has {} symbols, expected {}",
                    y,
                    row.chars().count(),
                    width
                )));
            }
            for (x, c) in row.chars().enumerate() {
                grid.terrain.set(x, y, Tile::from_symbol(c));
            }
        }
        Ok(grid)
    }

    pub fn width(&self) -> usize {
        self.terrain.width
    }

    pub fn height(&self) -> usize {
        self.terrain.height
    }

    pub fn terrain(&self) -> &Tilemap<Tile> {
        &self.terrain
    }

    pub fn tile(&self, x: usize, y: usize) -> Tile {
        *self.terrain.get(x, y)
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn gold_mines(&self) -> &[GoldMine] {
        &self.gold_mines
    }

    pub fn peasants(&self) -> &[Peasant] {
        &self.peasants
    }

    /// Overwrite one cell. No check of the symbol or of what was there;
    /// returns the previous tile so callers can roll the write back.
    pub fn set_cell(&mut self, x: usize, y: usize, tile: Tile) -> Tile {
        self.terrain.replace(x, y, tile)
    }

    /// Empty every cell and drop all registered entities.
    pub fn clear(&mut self) {
        self.terrain.fill(Tile::Empty);
        self.players.clear();
        self.gold_mines.clear();
        self.peasants.clear();
    }

    pub fn empty_cell_count(&self) -> usize {
        self.terrain.count_where(|t| t.is_empty())
    }

    /// Whether a registered entity sits at `(x, y)`, regardless of what
    /// the terrain currently shows there.
    pub fn is_occupied(&self, x: usize, y: usize) -> bool {
        self.players.iter().any(|p| p.x == x && p.y == y)
            || self.gold_mines.iter().any(|g| g.x == x && g.y == y)
            || self.peasants.iter().any(|p| p.x == x && p.y == y)
    }

    /// Number of distinct cells holding a registered entity.
    pub fn occupied_cell_count(&self) -> usize {
        let mut cells: Vec<(usize, usize)> = self
            .players
            .iter()
            .map(|p| (p.x, p.y))
            .chain(self.gold_mines.iter().map(|g| (g.x, g.y)))
            .chain(self.peasants.iter().map(|p| (p.x, p.y)))
            .collect();
        cells.sort_unstable();
        cells.dedup();
        cells.len()
    }

    /// Clear the 5x5 square around `(x, y)` and drop a gold mine in the middle.
    pub fn place_gold_mine(&mut self, x: usize, y: usize) {
        self.place_gold_mine_with_radius(x, y, GOLD_MINE_CLEAR_RADIUS);
    }

    /// Clear the square of the given radius (clipped to the map), mark the
    /// center and register the mine. Whatever was in the square is lost,
    /// including earlier mine markers.
    pub fn place_gold_mine_with_radius(&mut self, x: usize, y: usize, radius: usize) {
        for (nx, ny) in self.terrain.window(x, y, radius) {
            self.terrain.set(nx, ny, Tile::Empty);
        }
        self.gold_mines.push(GoldMine { x, y });
        self.terrain.set(x, y, Tile::GoldMine);
    }

    /// Register a player at a known cell and mark it.
    pub fn mark_player(&mut self, id: u32, x: usize, y: usize) {
        self.players.push(Player { id, x, y });
        self.terrain.set(x, y, Tile::PlayerBase);
    }

    /// Register a peasant at a known cell and mark it.
    pub fn mark_peasant(&mut self, id: u32, x: usize, y: usize) {
        self.peasants.push(Peasant { id, x, y });
        self.terrain.set(x, y, Tile::Peasant);
    }

    /// Put a player base on a uniformly random empty cell.
    pub fn place_player<R: RandomSource>(&mut self, id: u32, rng: &mut R) -> Result<(usize, usize)> {
        let (x, y) = self.sample_empty_cell(rng, "player")?;
        self.mark_player(id, x, y);
        Ok((x, y))
    }

    /// Put a peasant on a uniformly random empty cell.
    pub fn place_peasant<R: RandomSource>(&mut self, id: u32, rng: &mut R) -> Result<(usize, usize)> {
        let (x, y) = self.sample_empty_cell(rng, "peasant")?;
        self.mark_peasant(id, x, y);
        Ok((x, y))
    }

    /// Rejection-sample a cell that currently holds `Tile::Empty`.
    ///
    /// Draws x then y until the cell is empty. A map with no empty cell
    /// would never terminate, so that case is refused up front.
    pub fn sample_empty_cell<R: RandomSource>(
        &self,
        rng: &mut R,
        entity: &'static str,
    ) -> Result<(usize, usize)> {
        if self.empty_cell_count() == 0 {
            return Err(MapgenError::PlacementExhausted {
                entity,
                width: self.width(),
                height: self.height(),
            });
        }

        loop {
            let x = rng.index(self.width());
            let y = rng.index(self.height());
            if self.tile(x, y).is_empty() {
                return Ok((x, y));
            }
        }
    }

    /// Row strings, top to bottom, one symbol per cell.
    pub fn row_strings(&self) -> Vec<String> {
        self.terrain
            .rows()
            .map(|row| row.iter().map(|t| t.symbol()).collect())
            .collect()
    }
}

impl fmt::Display for GridState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.row_strings() {
            writeln!(f, "{}", row)?;
        }
        Ok(())
    }
}
