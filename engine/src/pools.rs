use crate::grid::{self, Grid};
use crate::{Match, ParseError, ParseResult, Stage};

const SCORE_HEADER: &str = "Score";
const TIME_HEADER: &str = "Time";

/// Bucket for pool labels that don't follow the letter scheme.
const EXTRA_POOL: &str = "Pool [Extra]";

/// Scan a pool-play sheet for completed matches.
///
/// Score columns pair up left to right (1st with 2nd, 3rd with 4th); a
/// trailing unpaired column is ignored. A row contributes a match for a pair
/// only when both score cells are purely numeric. Team names sit directly
/// outside the score pair, and the combined position label ("A1 v A2") two
/// columns left of it.
pub fn extract(grid: &Grid) -> ParseResult<Vec<Match>> {
    let score_columns = grid.header_columns(SCORE_HEADER);
    let time_columns = grid.header_columns(TIME_HEADER);

    let mut matches = Vec::new();
    for row in 0..grid.height() {
        for (pair, cols) in score_columns.chunks_exact(2).enumerate() {
            let (left, right) = (cols[0], cols[1]);
            let score_l = grid.cell(row, left).unwrap_or("");
            let score_r = grid.cell(row, right).unwrap_or("");
            if !grid::is_numeric(score_l) || !grid::is_numeric(score_r) {
                continue;
            }
            let (Ok(score_a), Ok(score_b)) = (score_l.parse(), score_r.parse()) else {
                continue;
            };

            // Name cells guard against misaligned columns: a numeric "name"
            // means the score pair landed somewhere it shouldn't.
            let team_a = left
                .checked_sub(1)
                .and_then(|col| grid.cell(row, col))
                .unwrap_or("");
            let team_b = grid.cell(row, right + 1).unwrap_or("");
            if team_a.is_empty()
                || team_b.is_empty()
                || grid::is_numeric(team_a)
                || grid::is_numeric(team_b)
            {
                continue;
            }

            let label = left
                .checked_sub(2)
                .and_then(|col| grid.cell(row, col))
                .unwrap_or("");
            let Some((position_a, position_b)) = split_position_label(label) else {
                return Err(ParseError::MalformedPosition {
                    row,
                    cell: label.to_owned(),
                });
            };

            let time = time_columns
                .get(pair)
                .and_then(|&col| grid.cell(row, col))
                .unwrap_or("");

            matches.push(Match {
                id: format!("{position_a}-v-{position_b}"),
                team_a: team_a.to_owned(),
                score_a,
                team_b: team_b.to_owned(),
                score_b,
                pool_name: pool_name_for(label),
                position_a,
                position_b,
                stage: Stage::Pool,
                bracket_name: String::new(),
                bracket_round: -1,
                time: time.to_owned(),
            });
        }
    }
    Ok(matches)
}

/// Split a combined "A1 vs A2" label into its two position tokens. The
/// "vs"/"v" separator is optional; whitespace alone also splits.
fn split_position_label(label: &str) -> Option<(String, String)> {
    let tokens: Vec<&str> = label
        .split_whitespace()
        .filter(|t| !t.eq_ignore_ascii_case("v") && !t.eq_ignore_ascii_case("vs"))
        .collect();
    match tokens[..] {
        [a, b] => Some((a.to_owned(), b.to_owned())),
        _ => None,
    }
}

/// "A1 v A2" starts with 'A', so the match belongs to "Pool A". Labels that
/// don't start with a letter share the extra bucket.
fn pool_name_for(label: &str) -> String {
    match label.chars().next() {
        Some(c) if c.is_alphabetic() => format!("Pool {}", c.to_uppercase()),
        _ => EXTRA_POOL.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const POOL_SHEET: &str = "\
,,Score,Score,,Time
A1 v A2,Team X,21,15,Team Y,10:00
A3 v A4,Team Z,-,15,Team W,11:00
";

    #[test]
    fn extracts_a_completed_pool_match() {
        let grid = Grid::from_csv(POOL_SHEET).unwrap();
        let matches = extract(&grid).unwrap();
        assert_eq!(matches.len(), 1);

        let m = &matches[0];
        assert_eq!(m.id, "A1-v-A2");
        assert_eq!(m.team_a, "Team X");
        assert_eq!(m.score_a, 21);
        assert_eq!(m.team_b, "Team Y");
        assert_eq!(m.score_b, 15);
        assert_eq!(m.position_a, "A1");
        assert_eq!(m.position_b, "A2");
        assert_eq!(m.stage, Stage::Pool);
        assert_eq!(m.pool_name, "Pool A");
        assert_eq!(m.bracket_name, "");
        assert_eq!(m.bracket_round, -1);
        assert_eq!(m.time, "10:00");
    }

    #[test]
    fn rows_with_non_numeric_scores_are_skipped() {
        let grid = Grid::from_csv(POOL_SHEET).unwrap();
        let matches = extract(&grid).unwrap();
        assert!(matches.iter().all(|m| m.id != "A3-v-A4"));
    }

    #[test]
    fn numeric_name_cells_reject_the_row() {
        let csv = ",,Score,Score,\nA1 v A2,12,21,15,Team Y\n";
        let grid = Grid::from_csv(csv).unwrap();
        assert!(extract(&grid).unwrap().is_empty());
    }

    #[test]
    fn empty_name_cells_reject_the_row() {
        let csv = ",,Score,Score,\nA1 v A2,,21,15,Team Y\n";
        let grid = Grid::from_csv(csv).unwrap();
        assert!(extract(&grid).unwrap().is_empty());
    }

    #[test]
    fn malformed_position_label_is_a_hard_failure() {
        let csv = ",,Score,Score,\nCrossover,Team X,21,15,Team Y\n";
        let grid = Grid::from_csv(csv).unwrap();
        let err = extract(&grid).unwrap_err();
        assert!(matches!(
            err,
            ParseError::MalformedPosition { row: 1, ref cell } if cell == "Crossover"
        ));
    }

    #[test]
    fn numeric_position_labels_go_to_the_extra_pool() {
        let csv = ",,Score,Score,\n1 v 2,Team X,21,15,Team Y\n";
        let grid = Grid::from_csv(csv).unwrap();
        let matches = extract(&grid).unwrap();
        assert_eq!(matches[0].pool_name, "Pool [Extra]");
        assert_eq!(matches[0].id, "1-v-2");
    }

    #[test]
    fn vs_separator_and_case_are_accepted() {
        assert_eq!(
            split_position_label("B1 VS B2"),
            Some(("B1".to_owned(), "B2".to_owned()))
        );
        assert_eq!(
            split_position_label("B1 B2"),
            Some(("B1".to_owned(), "B2".to_owned()))
        );
        assert_eq!(split_position_label("B1"), None);
        assert_eq!(split_position_label(""), None);
        assert_eq!(split_position_label("B1 v B2 v B3"), None);
    }

    #[test]
    fn trailing_unpaired_score_column_is_discarded() {
        let csv = ",,Score,Score,,,Score\nA1 v A2,Team X,21,15,Team Y,,9\n";
        let grid = Grid::from_csv(csv).unwrap();
        let matches = extract(&grid).unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].score_a, 21);
    }

    #[test]
    fn side_by_side_pools_share_a_row() {
        let csv = "\
,,Score,Score,,Time,,,Score,Score,,Time
A1 v A2,Team X,21,15,Team Y,10:00,B1 v B2,Team P,13,11,Team Q,12:00
";
        let grid = Grid::from_csv(csv).unwrap();
        let matches = extract(&grid).unwrap();
        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].pool_name, "Pool A");
        assert_eq!(matches[0].time, "10:00");
        assert_eq!(matches[1].pool_name, "Pool B");
        assert_eq!(matches[1].id, "B1-v-B2");
        assert_eq!(matches[1].time, "12:00");
    }
}
