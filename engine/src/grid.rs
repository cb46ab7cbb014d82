use crate::ParseResult;
use std::io;
use std::path::Path;

/// Header labels are only searched this far down the sheet.
pub const HEADER_ROWS: usize = 4;

/// Read-only tabular view of one CSV sheet.
///
/// Cells are whitespace-trimmed at load time. Rows may have differing
/// lengths; out-of-range coordinates read as absent rather than erroring.
#[derive(Debug, Clone, Default)]
pub struct Grid {
    rows: Vec<Vec<String>>,
}

impl Grid {
    pub fn from_path(path: impl AsRef<Path>) -> ParseResult<Self> {
        let reader = builder().from_path(path)?;
        Self::collect(reader)
    }

    pub fn from_csv(text: &str) -> ParseResult<Self> {
        Self::from_reader(text.as_bytes())
    }

    pub fn from_reader<R: io::Read>(reader: R) -> ParseResult<Self> {
        Self::collect(builder().from_reader(reader))
    }

    fn collect<R: io::Read>(mut reader: csv::Reader<R>) -> ParseResult<Self> {
        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            rows.push(record.iter().map(str::to_owned).collect());
        }
        Ok(Self { rows })
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    pub fn row(&self, row: usize) -> Option<&[String]> {
        self.rows.get(row).map(Vec::as_slice)
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&str> {
        self.rows.get(row)?.get(col).map(String::as_str)
    }

    /// Columns whose header cell equals `label` within the first
    /// [`HEADER_ROWS`] rows, in discovery order. Repeated labels are all
    /// kept; callers that need pairs take them two at a time.
    pub fn header_columns(&self, label: &str) -> Vec<usize> {
        let mut columns = Vec::new();
        for row in self.rows.iter().take(HEADER_ROWS) {
            for (col, cell) in row.iter().enumerate() {
                if cell == label {
                    columns.push(col);
                }
            }
        }
        columns
    }
}

fn builder() -> csv::ReaderBuilder {
    let mut builder = csv::ReaderBuilder::new();
    builder
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All);
    builder
}

/// True for non-empty cells of ASCII digits only: no sign, no decimals.
pub fn is_numeric(cell: &str) -> bool {
    !cell.is_empty() && cell.bytes().all(|b| b.is_ascii_digit())
}

/// True when the cell has no ASCII content at all. Empty cells qualify, as
/// do cells holding only decorative glyphs (arrows, box drawing).
pub fn lacks_ascii(cell: &str) -> bool {
    !cell.chars().any(|c| c.is_ascii())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cells_are_trimmed_and_rows_may_be_ragged() {
        let grid = Grid::from_csv("a ,  b\nc\n").unwrap();
        assert_eq!(grid.height(), 2);
        assert_eq!(grid.cell(0, 0), Some("a"));
        assert_eq!(grid.cell(0, 1), Some("b"));
        assert_eq!(grid.cell(1, 0), Some("c"));
        assert_eq!(grid.cell(1, 1), None);
        assert_eq!(grid.cell(5, 0), None);
    }

    #[test]
    fn header_columns_keeps_repeats_in_discovery_order() {
        let grid = Grid::from_csv(",Score,,Score,Time\n,,Score,,\n").unwrap();
        assert_eq!(grid.header_columns("Score"), vec![1, 3, 2]);
        assert_eq!(grid.header_columns("Time"), vec![4]);
    }

    #[test]
    fn header_columns_ignores_labels_below_the_header_band() {
        let grid = Grid::from_csv("a\nb\nc\nd\nScore\n").unwrap();
        assert!(grid.header_columns("Score").is_empty());
    }

    #[test]
    fn header_columns_searches_the_full_header_band() {
        let grid = Grid::from_csv("a\nb\nc\nScore\n").unwrap();
        assert_eq!(grid.header_columns("Score"), vec![0]);
    }

    #[test]
    fn numeric_cells_are_plain_unsigned_integers() {
        assert!(is_numeric("0"));
        assert!(is_numeric("21"));
        assert!(!is_numeric(""));
        assert!(!is_numeric("-1"));
        assert!(!is_numeric("+2"));
        assert!(!is_numeric("1.5"));
        assert!(!is_numeric("12a"));
    }

    #[test]
    fn ascii_free_check_accepts_empty_and_decorative_cells() {
        assert!(lacks_ascii(""));
        assert!(lacks_ascii("→"));
        assert!(!lacks_ascii("x"));
        assert!(!lacks_ascii("→ x"));
    }
}
