//! Validate command implementation.

use std::fs;
use std::path::PathBuf;

use super::CliError;
use tunti::game::{check_invariants, FactionId};
use tunti::snapshot::{self, MapFile};
use tunti::GameState;

/// Execute the validate command.
///
/// Accepts a full snapshot or a map-only file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not a valid game.
pub(crate) fn execute(path: PathBuf) -> Result<(), CliError> {
    let text = fs::read_to_string(&path)?;

    println!("Validating: {}", path.display());
    println!();

    let json_ok = serde_json::from_str::<serde_json::Value>(&text).is_ok();
    print_check("JSON syntax", json_ok);
    if !json_ok {
        return Err(CliError::new("Not a JSON document"));
    }

    let (kind, state) = match snapshot::decode(&text) {
        Ok((state, updated_at)) => {
            print_check("snapshot format", true);
            println!("    updatedAt: {updated_at}");
            ("snapshot", state)
        }
        Err(snapshot_err) => match MapFile::from_json(&text).and_then(MapFile::into_state) {
            Ok(state) => {
                print_check("map file format", true);
                ("map file", state)
            }
            Err(map_err) => {
                print_check("snapshot format", false);
                print_check("map file format", false);
                return Err(CliError::new(format!(
                    "Not a valid game file\n  as snapshot: {snapshot_err}\n  as map file: {map_err}"
                )));
            }
        },
    };

    let violations = check_invariants(&state);
    print_check("tile invariants", violations.is_empty());
    for violation in &violations {
        println!("    {violation}");
    }

    println!();
    print_summary(kind, &state);
    println!();
    println!("Validation successful!");
    Ok(())
}

fn print_summary(kind: &str, state: &GameState) {
    println!("Summary ({kind}):");
    println!("  Grid:         {} x {}", state.width(), state.height());
    println!("  Turn:         {}", state.turn_number);
    println!("  To move:      faction {}", state.current_faction);
    for faction in FactionId::ALL {
        let capital = state.capital_of(faction);
        println!(
            "  Capital {faction}:    {} hit points {}",
            capital.coord,
            state.capital_hit_points_of(faction)
        );
    }
}

fn print_check(name: &str, ok: bool) {
    let status = if ok { "OK" } else { "FAILED" };
    let symbol = if ok { "✓" } else { "✗" };
    println!("  {symbol} {name}: {status}");
}
