//! ASCII renderer for terminal viewing with optional ANSI colors.

use std::fmt::Write as _;

use crate::game::{FactionId, GameOutcome, GameState, Map, Tile};

/// ANSI color codes for factions.
const FACTION_COLORS: [&str; 2] = [
    "\x1b[31m", // Faction 0: Red
    "\x1b[34m", // Faction 1: Blue
];

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const GRAY: &str = "\x1b[90m";

/// Owner marks printed after each glyph.
const OWNER_MARKS: [char; 2] = ['₀', '₁'];

/// Terrain glyphs only, one row per line.
///
/// ```text
/// f.f..^.......f.^.~
/// f.^.f..^~.^..ff~..
/// ```
#[must_use]
pub fn render_terrain(map: &Map) -> String {
    let width = usize::from(map.width());
    let mut output = String::with_capacity(map.len() + usize::from(map.height()));
    for (index, tile) in map.tiles().iter().enumerate() {
        output.push(tile.terrain.glyph());
        if (index + 1) % width == 0 {
            output.push('\n');
        }
    }
    output
}

/// Render the whole state: header, bordered grid, legend and faction lines.
///
/// Each cell shows the unit glyph if a unit stands there, else the building
/// glyph, else the terrain glyph, followed by the owner's subscript.
///
/// ```text
/// Turn 3 - Myanmar (0) to move
/// ┌─────────────────────────┐
/// │ .₀f₀^ ~ ...             │
/// └─────────────────────────┘
/// ```
#[must_use]
pub fn render_ascii(state: &GameState, color: bool) -> String {
    let mut output = String::new();
    render_header(&mut output, state);
    render_map(&mut output, state, color);
    output.push_str(
        "\nLegend: .=plains f=forest ^=mountain ~=water #=city  \
         F/L/M/B/P=building @=landmark  i/a/c/s=unit  ₀₁=owner\n\n",
    );
    render_faction_stats(&mut output, state, color);
    output
}

fn render_header(output: &mut String, state: &GameState) {
    let _ = match state.outcome() {
        GameOutcome::InProgress => {
            let faction = state.current_faction;
            writeln!(
                output,
                "Turn {} - {} ({faction}) to move",
                state.turn_number,
                faction.profile().display_name
            )
        }
        GameOutcome::Won { winner } => writeln!(
            output,
            "Turn {} - {} ({winner}) has won",
            state.turn_number,
            winner.profile().display_name
        ),
    };
}

fn render_map(output: &mut String, state: &GameState, color: bool) {
    let width = usize::from(state.width());
    let rule = "─".repeat(width * 2 + 1);
    let _ = writeln!(output, "┌{rule}┐");
    for row in state.map.tiles().chunks(width) {
        output.push_str("│ ");
        for tile in row {
            render_tile(output, tile, color);
        }
        output.push_str("│\n");
    }
    let _ = writeln!(output, "└{rule}┘");
}

fn render_tile(output: &mut String, tile: &Tile, color: bool) {
    let glyph = tile_glyph(tile);
    let mark = tile.owner.map_or(' ', |owner| OWNER_MARKS[owner.index()]);
    if !color {
        output.push(glyph);
        output.push(mark);
        return;
    }
    let paint = match tile.unit.map(|unit| unit.owner).or(tile.owner) {
        Some(faction) => faction_color(faction),
        None => GRAY,
    };
    let weight = if tile.is_capital { BOLD } else { "" };
    let _ = write!(output, "{paint}{weight}{glyph}{mark}{RESET}");
}

/// Unit over building over terrain.
fn tile_glyph(tile: &Tile) -> char {
    if let Some(unit) = tile.unit {
        unit.kind.glyph()
    } else if let Some(building) = tile.building {
        building.glyph()
    } else {
        tile.terrain.glyph()
    }
}

fn faction_color(faction: FactionId) -> &'static str {
    FACTION_COLORS[faction.index()]
}

fn render_faction_stats(output: &mut String, state: &GameState, color: bool) {
    for faction in FactionId::ALL {
        let stats = state.stats(faction);
        let (paint, reset) = if color {
            (faction_color(faction), RESET)
        } else {
            ("", "")
        };
        let _ = writeln!(
            output,
            "{paint}{:<8} ({faction}){reset}  capital {}/{}  territory {:<3} units {:<3} buildings {:<3} {}",
            faction.profile().display_name,
            stats.capital_hit_points,
            crate::game::rules::CAPITAL_STARTING_HIT_POINTS,
            stats.territory,
            stats.units,
            stats.buildings,
            stats.resources,
        );
    }
}
