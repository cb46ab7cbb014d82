use crate::grid::{self, Grid};
use crate::{Match, Stage};
use std::collections::HashSet;

const POOL_MARKER_PREFIX: &str = "pool ";

/// Everything recovered from one elimination-bracket sheet.
#[derive(Debug, Default)]
pub struct BracketSheet {
    pub matches: Vec<Match>,
    /// Lower-cased pool labels whose results the bracket already embeds.
    /// Pool matches under these labels would double-count if kept.
    pub subsumed_pools: HashSet<String>,
}

/// One side of a bracket match: a (seed, name, score) triplet anchored at a
/// slot column.
#[derive(Debug)]
struct Slot {
    column: usize,
    row: usize,
    seed: String,
    name: String,
    score: u32,
}

#[derive(Debug)]
struct Marker {
    column: usize,
    row: usize,
    label: String,
}

/// Scan an elimination-bracket sheet for match slots and pair them up.
///
/// Slots sort by (column, row) and pair consecutively; two sorted slots in
/// the same column are the two halves of one match. The layout is assumed to
/// keep an even slot count per column, so a pair crossing a column boundary
/// is taken as-is.
pub fn extract(grid: &Grid) -> BracketSheet {
    let columns = anchor_columns(grid);
    let (slots, markers) = collect_slots(grid, &columns);

    let mut matches = Vec::new();
    for pair in slots.chunks_exact(2) {
        let (a, b) = (&pair[0], &pair[1]);
        let round = round_index(&columns, a.column);
        let pool_name = nearest_marker(&markers, a.column, a.row)
            .map(|m| m.label.clone())
            .unwrap_or_default();
        matches.push(Match {
            id: format!("{}-v-{}", a.seed, b.seed),
            team_a: a.name.clone(),
            score_a: a.score,
            team_b: b.name.clone(),
            score_b: b.score,
            position_a: a.seed.clone(),
            position_b: b.seed.clone(),
            stage: Stage::Brackets,
            pool_name,
            bracket_name: round_label(round),
            bracket_round: round as i32,
            time: String::new(),
        });
    }

    let subsumed_pools = markers.iter().map(|m| m.label.to_lowercase()).collect();
    BracketSheet {
        matches,
        subsumed_pools,
    }
}

/// Columns that anchor a slot somewhere in the grid, sorted and deduplicated.
///
/// An anchor is a cell holding exactly "1" (the top seed of a branch) whose
/// right neighbor is non-empty, whose second neighbor is numeric, and whose
/// third neighbor is absent or ASCII-free. The last check rules out
/// unrelated numeric triplets inside wider tables.
fn anchor_columns(grid: &Grid) -> Vec<usize> {
    let mut columns = Vec::new();
    for row in 0..grid.height() {
        let width = grid.row(row).map(<[String]>::len).unwrap_or(0);
        for col in 0..width {
            if grid.cell(row, col) != Some("1") {
                continue;
            }
            let name = grid.cell(row, col + 1).unwrap_or("");
            let score = grid.cell(row, col + 2).unwrap_or("");
            let trailing_ok = grid.cell(row, col + 3).map(grid::lacks_ascii).unwrap_or(true);
            if !name.is_empty() && grid::is_numeric(score) && trailing_ok {
                columns.push(col);
            }
        }
    }
    columns.sort_unstable();
    columns.dedup();
    columns
}

fn collect_slots(grid: &Grid, columns: &[usize]) -> (Vec<Slot>, Vec<Marker>) {
    let mut slots = Vec::new();
    let mut markers = Vec::new();
    for row in 0..grid.height() {
        for &column in columns {
            let seed = grid.cell(row, column).unwrap_or("");
            if is_pool_marker(seed) {
                markers.push(Marker {
                    column,
                    row,
                    label: seed.to_owned(),
                });
                continue;
            }
            let name = grid.cell(row, column + 1).unwrap_or("");
            let score = grid.cell(row, column + 2).unwrap_or("");
            if !grid::is_numeric(seed) || name.is_empty() || !grid::is_numeric(score) {
                continue;
            }
            let Ok(score) = score.parse() else { continue };
            slots.push(Slot {
                column,
                row,
                seed: seed.to_owned(),
                name: name.to_owned(),
                score,
            });
        }
    }
    slots.sort_by_key(|s| (s.column, s.row));
    (slots, markers)
}

fn is_pool_marker(cell: &str) -> bool {
    cell.get(..POOL_MARKER_PREFIX.len())
        .map(|head| head.eq_ignore_ascii_case(POOL_MARKER_PREFIX))
        .unwrap_or(false)
}

/// Round index for a slot column, counted from the rightmost (final) column.
fn round_index(columns: &[usize], column: usize) -> usize {
    columns
        .iter()
        .rev()
        .position(|&c| c == column)
        .unwrap_or(0)
}

/// Label for a round index: 0 is "Finals", then "Semis", "Quarters", and
/// "Pre " repeats from there out. Only correct once the bracket is fully
/// populated; a mid-tournament sheet missing its later rounds shifts every
/// label toward the final.
pub fn round_label(round: usize) -> String {
    match round {
        0 => "Finals".to_owned(),
        1 => "Semis".to_owned(),
        2 => "Quarters".to_owned(),
        n => format!("{}Quarters", "Pre ".repeat(n - 2)),
    }
}

/// Closest pool marker at or above the match in the same column, if any.
fn nearest_marker<'a>(markers: &'a [Marker], column: usize, row: usize) -> Option<&'a Marker> {
    markers
        .iter()
        .filter(|m| m.column == column && m.row <= row)
        .max_by_key(|m| m.row)
}

#[cfg(test)]
mod tests {
    use super::*;

    // Four-team bracket: semifinal slots in column 0, final slots in
    // column 4. Team names live at col+1, scores at col+2.
    const FOUR_TEAM_SHEET: &str = "\
Pool A,,,,,,
1,Red,15,,,,
4,Blue,10,,1,Red,12
2,Green,13,,2,Green,15
3,Yellow,11,,,,
";

    #[test]
    fn pairs_slots_into_matches_by_column_then_row() {
        let grid = Grid::from_csv(FOUR_TEAM_SHEET).unwrap();
        let sheet = extract(&grid);
        assert_eq!(sheet.matches.len(), 3);

        let semi = &sheet.matches[0];
        assert_eq!(semi.team_a, "Red");
        assert_eq!(semi.score_a, 15);
        assert_eq!(semi.team_b, "Blue");
        assert_eq!(semi.score_b, 10);
        assert_eq!(semi.id, "1-v-4");
        assert_eq!(semi.position_a, "1");
        assert_eq!(semi.position_b, "4");
        assert_eq!(semi.stage, Stage::Brackets);
        assert_eq!(semi.bracket_name, "Semis");
        assert_eq!(semi.bracket_round, 1);
        assert_eq!(semi.time, "");

        assert_eq!(sheet.matches[1].id, "2-v-3");
        assert_eq!(sheet.matches[1].bracket_name, "Semis");

        let finals = &sheet.matches[2];
        assert_eq!(finals.team_a, "Red");
        assert_eq!(finals.team_b, "Green");
        assert_eq!(finals.score_a, 12);
        assert_eq!(finals.score_b, 15);
        assert_eq!(finals.bracket_name, "Finals");
        assert_eq!(finals.bracket_round, 0);
    }

    #[test]
    fn pool_markers_attribute_matches_and_report_subsumed_pools() {
        let grid = Grid::from_csv(FOUR_TEAM_SHEET).unwrap();
        let sheet = extract(&grid);
        assert_eq!(sheet.matches[0].pool_name, "Pool A");
        assert_eq!(sheet.matches[1].pool_name, "Pool A");
        // Final column has no marker above it.
        assert_eq!(sheet.matches[2].pool_name, "");
        assert!(sheet.subsumed_pools.contains("pool a"));
        assert_eq!(sheet.subsumed_pools.len(), 1);
    }

    #[test]
    fn marker_attribution_uses_the_closest_marker_above() {
        let csv = "\
Pool A,,,
1,Red,15,
2,Blue,10,
Pool B,,,
1,Lime,9,
2,Teal,13,
";
        let grid = Grid::from_csv(csv).unwrap();
        let sheet = extract(&grid);
        assert_eq!(sheet.matches.len(), 2);
        assert_eq!(sheet.matches[0].pool_name, "Pool A");
        assert_eq!(sheet.matches[1].pool_name, "Pool B");
        assert!(sheet.subsumed_pools.contains("pool a"));
        assert!(sheet.subsumed_pools.contains("pool b"));
    }

    #[test]
    fn ascii_in_the_trailing_cell_disqualifies_the_anchor() {
        let csv = "1,Red,15,notes\n2,Blue,10,\n";
        let grid = Grid::from_csv(csv).unwrap();
        assert!(extract(&grid).matches.is_empty());
    }

    #[test]
    fn absent_trailing_cell_still_anchors() {
        let csv = "1,Red,15\n2,Blue,10\n";
        let grid = Grid::from_csv(csv).unwrap();
        let sheet = extract(&grid);
        assert_eq!(sheet.matches.len(), 1);
        assert_eq!(sheet.matches[0].id, "1-v-2");
    }

    #[test]
    fn an_odd_slot_is_left_unpaired() {
        let csv = "1,Red,15\n2,Blue,10\n3,Green,7\n";
        let grid = Grid::from_csv(csv).unwrap();
        let sheet = extract(&grid);
        assert_eq!(sheet.matches.len(), 1);
    }

    #[test]
    fn incomplete_slots_are_skipped_silently() {
        // Score missing on the second slot, so only the complete pair below
        // forms a match.
        let csv = "1,Red,15\n4,Blue,\n2,Green,13\n3,Yellow,11\n";
        let grid = Grid::from_csv(csv).unwrap();
        let sheet = extract(&grid);
        assert_eq!(sheet.matches.len(), 1);
        assert_eq!(sheet.matches[0].team_a, "Red");
        assert_eq!(sheet.matches[0].team_b, "Green");
    }

    #[test]
    fn round_labels_count_back_from_the_final_column() {
        let columns = [2, 5, 8];
        let labels: Vec<String> = [8, 5, 2]
            .iter()
            .map(|&c| round_label(round_index(&columns, c)))
            .collect();
        assert_eq!(labels, ["Finals", "Semis", "Quarters"]);
    }

    #[test]
    fn deep_rounds_stack_pre_prefixes() {
        assert_eq!(round_label(0), "Finals");
        assert_eq!(round_label(1), "Semis");
        assert_eq!(round_label(2), "Quarters");
        assert_eq!(round_label(3), "Pre Quarters");
        assert_eq!(round_label(4), "Pre Pre Quarters");
    }

    #[test]
    fn marker_prefix_is_case_insensitive_and_needs_the_space() {
        assert!(is_pool_marker("Pool A"));
        assert!(is_pool_marker("POOL b"));
        assert!(!is_pool_marker("Pool"));
        assert!(!is_pool_marker("Poolside"));
        assert!(!is_pool_marker(""));
    }
}
