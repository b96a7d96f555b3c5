//! Terrain symbols
//!
//! Every cell of a map holds one single-character symbol. The known symbols
//! get their own variants; anything else round-trips through `Other`.

use std::fmt;

/// A single terrain symbol.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Tile {
    #[default]
    Empty,      // '.'
    Water,      // 'w'
    Tree,       // 't'
    GoldMine,   // 'G'
    PlayerBase, // 'P'
    Peasant,    // 'p'
    Other(char),
}

impl Tile {
    /// Symbols the hill climber may write into a cell.
    pub const MUTATION_CHOICES: [Tile; 3] = [Tile::Empty, Tile::Tree, Tile::Water];

    pub fn symbol(self) -> char {
        match self {
            Tile::Empty => '.',
            Tile::Water => 'w',
            Tile::Tree => 't',
            Tile::GoldMine => 'G',
            Tile::PlayerBase => 'P',
            Tile::Peasant => 'p',
            Tile::Other(c) => c,
        }
    }

    pub fn from_symbol(c: char) -> Self {
        match c {
            '.' => Tile::Empty,
            'w' => Tile::Water,
            't' => Tile::Tree,
            'G' => Tile::GoldMine,
            'P' => Tile::PlayerBase,
            'p' => Tile::Peasant,
            other => Tile::Other(other),
        }
    }

    pub fn is_empty(self) -> bool {
        self == Tile::Empty
    }

    /// Markers written by entity placement rather than terrain scatter.
    pub fn is_entity_marker(self) -> bool {
        matches!(self, Tile::GoldMine | Tile::PlayerBase | Tile::Peasant)
    }
}

impl From<char> for Tile {
    fn from(c: char) -> Self {
        Tile::from_symbol(c)
    }
}

impl fmt::Display for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_symbols_map_to_variants() {
        for c in ['.', 'w', 't', 'G', 'P', 'p'] {
            let tile = Tile::from_symbol(c);
            assert!(!matches!(tile, Tile::Other(_)), "{} fell through", c);
            assert_eq!(tile.symbol(), c);
        }
    }

    #[test]
    fn test_unknown_symbol_is_preserved() {
        let tile = Tile::from('#');
        assert_eq!(tile, Tile::Other('#'));
        assert_eq!(tile.to_string(), "#");
    }

    #[test]
    fn test_entity_markers() {
        assert!(Tile::GoldMine.is_entity_marker());
        assert!(Tile::Peasant.is_entity_marker());
        assert!(!Tile::Tree.is_entity_marker());
        assert!(!Tile::Other('P').is_entity_marker());
    }
}
