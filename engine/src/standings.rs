use crate::grid::{self, Grid};
use crate::{ParseError, ParseResult};

/// Locate and read a rank (or seed) block for a known team count.
///
/// The block is a column holding the unbroken run `n..1` top to bottom, each
/// value paired with a team name in the next column. The same scan serves
/// final rankings and seedings; only the sheet differs. Returns an empty
/// list when no block exists, which is how sheets without standings read.
pub fn extract(grid: &Grid, num_teams: usize) -> ParseResult<Vec<(u32, String)>> {
    if num_teams == 0 {
        return Err(ParseError::InvalidTeamCount(num_teams));
    }
    let Some((row, col)) = find_anchor(grid, num_teams) else {
        return Ok(Vec::new());
    };
    read_block(grid, row, col, num_teams)
}

/// Row-major scan for the first anchor, so ties resolve to the smallest
/// (row, column).
fn find_anchor(grid: &Grid, n: usize) -> Option<(usize, usize)> {
    for row in 0..grid.height() {
        let width = grid.row(row).map(<[String]>::len).unwrap_or(0);
        for col in 0..width {
            if is_run_anchor(grid, row, col, n) {
                return Some((row, col));
            }
        }
    }
    None
}

/// The anchor is the cell holding "1" at the bottom of the run; the n - 1
/// rows above it count up to n, every value flanked by a team name.
fn is_run_anchor(grid: &Grid, row: usize, col: usize, n: usize) -> bool {
    for offset in 0..n {
        let Some(run_row) = row.checked_sub(offset) else {
            return false;
        };
        let value = grid.cell(run_row, col).unwrap_or("");
        if !grid::is_numeric(value) || value.parse() != Ok(offset + 1) {
            return false;
        }
        if grid.cell(run_row, col + 1).unwrap_or("").is_empty() {
            return false;
        }
    }
    // A populated n + 1 just above the run means this is a slice of a longer
    // numeric sequence, not a standings block.
    if let Some(above) = row.checked_sub(n) {
        let value = grid.cell(above, col).unwrap_or("");
        let neighbor = grid.cell(above, col + 1).unwrap_or("");
        if grid::is_numeric(value) && value.parse() == Ok(n + 1) && !neighbor.is_empty() {
            return false;
        }
    }
    true
}

fn read_block(
    grid: &Grid,
    anchor_row: usize,
    col: usize,
    n: usize,
) -> ParseResult<Vec<(u32, String)>> {
    let top = anchor_row + 1 - n;
    let mut entries: Vec<(u32, String)> = Vec::new();
    for row in top..=anchor_row {
        let value = grid.cell(row, col).unwrap_or("");
        let team = grid.cell(row, col + 1).unwrap_or("");
        if !grid::is_numeric(value) || team.is_empty() || grid::is_numeric(team) {
            continue;
        }
        let Ok(rank) = value.parse::<u32>() else {
            continue;
        };
        if entries.iter().any(|(r, _)| *r == rank) {
            continue;
        }
        entries.push((rank, team.to_owned()));
    }
    if entries.len() != n {
        return Err(ParseError::StandingsCount {
            expected: n,
            found: entries.len(),
        });
    }
    entries.sort_by_key(|(rank, _)| *rank);
    Ok(entries)
}
