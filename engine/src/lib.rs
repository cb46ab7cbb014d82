pub mod assemble;
pub mod brackets;
pub mod client;
pub mod grid;
pub mod names;
pub mod pools;
pub mod standings;

pub use assemble::{StageGrids, assemble};
pub use grid::Grid;

use serde::Serialize;
use std::fmt;

// ---------------------------------------------------------------------------
// Domain types: clean model, independent of any one sheet layout
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    #[default]
    Pool,
    Brackets,
}

/// One completed match, from either stage.
///
/// `id` is built from the two bracket positions rather than the team names,
/// so it survives later renames by the name reconciler.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Match {
    pub id: String,
    pub team_a: String,
    pub score_a: u32,
    pub team_b: String,
    pub score_b: u32,
    pub position_a: String,
    pub position_b: String,
    pub stage: Stage,
    /// Originating pool label ("Pool A"), empty when unknown.
    pub pool_name: String,
    /// Round label ("Finals", "Semis", ...), empty for pool matches.
    pub bracket_name: String,
    /// Round index counted from the final, -1 for pool matches.
    pub bracket_round: i32,
    pub time: String,
}

/// Final placement: rank 1 is the winner.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RankEntry {
    pub rank: u32,
    pub team: String,
}

/// Pre-tournament seeding. Seed names are the canonical team spellings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SeedEntry {
    pub seed: u32,
    pub team: String,
}

/// Everything recovered from one tournament's sheets.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TournamentData {
    pub scores: Vec<Match>,
    pub rankings: Vec<RankEntry>,
    pub seedings: Vec<SeedEntry>,
}

impl TournamentData {
    pub fn is_empty(&self) -> bool {
        self.scores.is_empty() && self.rankings.is_empty() && self.seedings.is_empty()
    }
}

pub type ParseResult<T> = Result<T, ParseError>;

#[derive(Debug)]
pub enum ParseError {
    /// A position-label cell did not split into exactly two tokens.
    MalformedPosition { row: usize, cell: String },
    /// A standings block was found but yielded the wrong number of entries,
    /// meaning the anchor heuristic latched onto the wrong column.
    StandingsCount { expected: usize, found: usize },
    /// The per-tournament team count is missing or non-positive.
    InvalidTeamCount(usize),
    Csv(csv::Error),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::MalformedPosition { row, cell } => {
                write!(f, "Malformed position label {cell:?} in row {row}")
            }
            ParseError::StandingsCount { expected, found } => {
                write!(f, "Standings block has {found} entries, expected {expected}")
            }
            ParseError::InvalidTeamCount(n) => write!(f, "Invalid team count: {n}"),
            ParseError::Csv(e) => write!(f, "CSV error: {e}"),
        }
    }
}

impl std::error::Error for ParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ParseError::Csv(e) => Some(e),
            _ => None,
        }
    }
}

impl From<csv::Error> for ParseError {
    fn from(e: csv::Error) -> Self {
        ParseError::Csv(e)
    }
}
