//! Game-state export
//!
//! Serializes a finished map into the `<gamestate>` entity listing the game
//! engine's loader reads. Entity 0 is the map itself; players, gold mines
//! and peasants follow with ids counting up from 1.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use tracing::info;

use crate::error::{MapgenError, Result};
use crate::grid::GridState;

/// Starting resources and fixed unit stats written for each entity.
pub const PLAYER_START_GOLD: u32 = 2000;
pub const PLAYER_START_WOOD: u32 = 1500;
pub const GOLD_MINE_REMAINING_GOLD: u32 = 100_000;
pub const GOLD_MINE_HITPOINTS: u32 = 25_500;
pub const PEASANT_HITPOINTS: u32 = 30;

/// Owner label for a 0-based id. Peasants use their own id here, which
/// need not match any registered player.
fn owner_label(id: u32) -> String {
    format!("player{}", id + 1)
}

/// Render the map and its entities as `<gamestate>` text.
pub fn to_gamestate_xml(grid: &GridState) -> String {
    let mut out = String::new();
    write_gamestate(grid, &mut out).expect("formatting into a String is infallible");
    out
}

fn write_gamestate(grid: &GridState, out: &mut String) -> std::fmt::Result {
    writeln!(out, "<gamestate>")?;
    writeln!(out, "\t<entity id=\"0\">")?;
    writeln!(out, "\t\t<type>map</type>")?;
    writeln!(out, "\t\t<width>{}</width>", grid.width())?;
    writeln!(out, "\t\t<height>{}</height>", grid.height())?;
    writeln!(out, "\t\t<background>")?;
    for row in grid.row_strings() {
        writeln!(out, "\t\t\t<row>{}</row>", row)?;
    }
    writeln!(out, "\t\t</background>")?;
    writeln!(out, "\t</entity>")?;

    let mut entity_id = 1;

    for player in grid.players() {
        writeln!(out, "\t<entity id=\"{}\">", entity_id)?;
        writeln!(out, "\t\t<type>WPlayer</type>")?;
        writeln!(out, "\t\t<gold>{}</gold>", PLAYER_START_GOLD)?;
        writeln!(out, "\t\t<wood>{}</wood>", PLAYER_START_WOOD)?;
        writeln!(out, "\t\t<owner>{}</owner>", owner_label(player.id))?;
        writeln!(out, "\t</entity>")?;
        entity_id += 1;
    }

    for mine in grid.gold_mines() {
        writeln!(out, "\t<entity id=\"{}\">", entity_id)?;
        writeln!(out, "\t\t<type>WGoldMine</type>")?;
        writeln!(out, "\t\t<x>{}</x>", mine.x)?;
        writeln!(out, "\t\t<y>{}</y>", mine.y)?;
        writeln!(out, "\t\t<remaining_gold>{}</remaining_gold>", GOLD_MINE_REMAINING_GOLD)?;
        writeln!(out, "\t\t<current_hitpoints>{}</current_hitpoints>", GOLD_MINE_HITPOINTS)?;
        writeln!(out, "\t</entity>")?;
        entity_id += 1;
    }

    for peasant in grid.peasants() {
        writeln!(out, "\t<entity id=\"{}\">", entity_id)?;
        writeln!(out, "\t\t<type>WPeasant</type>")?;
        writeln!(out, "\t\t<x>{}</x>", peasant.x)?;
        writeln!(out, "\t\t<y>{}</y>", peasant.y)?;
        writeln!(out, "\t\t<owner>{}</owner>", owner_label(peasant.id))?;
        writeln!(out, "\t\t<current_hitpoints>{}</current_hitpoints>", PEASANT_HITPOINTS)?;
        writeln!(out, "\t</entity>")?;
        entity_id += 1;
    }

    writeln!(out, "</gamestate>")
}

/// Write the `<gamestate>` text for `grid` to `path`.
pub fn save_to_file(grid: &GridState, path: &Path) -> Result<()> {
    let text = to_gamestate_xml(grid);
    fs::write(path, &text).map_err(|source| MapgenError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    info!(path = %path.display(), bytes = text.len(), "wrote game state");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_grid() -> GridState {
        let mut grid = GridState::from_rows(&[".....", ".....", ".....", ".....", "....."]).unwrap();
        grid.place_gold_mine(0, 0);
        grid.mark_player(0, 4, 4);
        grid.mark_player(1, 4, 0);
        grid.mark_peasant(1, 2, 4);
        grid
    }

    #[test]
    fn test_exact_layout() {
        let mut grid = GridState::from_rows(&["w.", ".t"]).unwrap();
        grid.mark_player(0, 1, 0);
        let expected = "<gamestate>\n\
            \t<entity id=\"0\">\n\
            \t\t<type>map</type>\n\
            \t\t<width>2</width>\n\
            \t\t<height>2</height>\n\
            \t\t<background>\n\
            \t\t\t<row>wP</row>\n\
            \t\t\t<row>.t</row>\n\
            \t\t</background>\n\
            \t</entity>\n\
            \t<entity id=\"1\">\n\
            \t\t<type>WPlayer</type>\n\
            \t\t<gold>2000</gold>\n\
            \t\t<wood>1500</wood>\n\
            \t\t<owner>player1</owner>\n\
            \t</entity>\n\
            </gamestate>\n";
        assert_eq!(to_gamestate_xml(&grid), expected);
    }

    #[test]
    fn test_entity_ids_and_order() {
        let xml = to_gamestate_xml(&sample_grid());
        let ids: Vec<&str> = xml
            .lines()
            .filter_map(|l| l.trim().strip_prefix("<entity id=\""))
            .map(|rest| rest.trim_end_matches("\">"))
            .collect();
        assert_eq!(ids, vec!["0", "1", "2", "3", "4"]);

        let player = xml.find("WPlayer").unwrap();
        let mine = xml.find("WGoldMine").unwrap();
        let peasant = xml.find("WPeasant").unwrap();
        assert!(player < mine && mine < peasant);
    }

    #[test]
    fn test_peasant_owner_follows_peasant_id() {
        let xml = to_gamestate_xml(&sample_grid());
        let peasant_block = &xml[xml.find("WPeasant").unwrap()..];
        assert!(peasant_block.contains("<owner>player2</owner>"));
        assert!(peasant_block.contains("<x>2</x>"));
        assert!(peasant_block.contains("<current_hitpoints>30</current_hitpoints>"));
    }

    #[test]
    fn test_gold_mine_block() {
        let xml = to_gamestate_xml(&sample_grid());
        assert!(xml.contains("<remaining_gold>100000</remaining_gold>"));
        assert!(xml.contains("<current_hitpoints>25500</current_hitpoints>"));
        assert!(xml.contains("<row>G...P</row>"));
    }

    #[test]
    fn test_save_to_file_round_trip() {
        let grid = sample_grid();
        let path = std::env::temp_dir().join(format!("skirmish_mapgen_export_{}.xml", std::process::id()));
        save_to_file(&grid, &path).unwrap();
        let written = fs::read_to_string(&path).unwrap();
        let _ = fs::remove_file(&path);
        assert_eq!(written, to_gamestate_xml(&grid));
    }

    #[test]
    fn test_save_to_missing_directory_fails() {
        let path = std::env::temp_dir().join("skirmish_mapgen_no_such_dir").join("map.xml");
        let err = save_to_file(&sample_grid(), &path).unwrap_err();
        assert!(matches!(err, MapgenError::Io { .. }));
    }
}
