use crate::grid::Grid;
use crate::names::NameTable;
use crate::{ParseError, ParseResult, RankEntry, SeedEntry, TournamentData};
use crate::{brackets, pools, standings};
use std::collections::HashSet;

/// The up-to-three sheets one tournament publishes. Any may be absent; an
/// absent sheet just contributes nothing.
#[derive(Debug, Default)]
pub struct StageGrids {
    pub pools: Option<Grid>,
    pub brackets: Option<Grid>,
    pub seeds: Option<Grid>,
}

/// Run every extractor over the available sheets and merge the results into
/// one tournament record.
///
/// Rankings come from the bracket sheet, seedings from the seeds sheet.
/// Pool matches already embedded in the bracket are dropped, and afterwards
/// every team name in matches and rankings is rewritten to the canonical
/// spelling from the seed list. Seed entries themselves are never rewritten.
pub fn assemble(grids: &StageGrids, num_teams: usize) -> ParseResult<TournamentData> {
    if (grids.brackets.is_some() || grids.seeds.is_some()) && num_teams == 0 {
        return Err(ParseError::InvalidTeamCount(num_teams));
    }

    let mut rankings = Vec::new();
    let mut bracket_matches = Vec::new();
    let mut subsumed = HashSet::new();
    if let Some(grid) = &grids.brackets {
        let sheet = brackets::extract(grid);
        bracket_matches = sheet.matches;
        subsumed = sheet.subsumed_pools;
        rankings = standings::extract(grid, num_teams)?
            .into_iter()
            .map(|(rank, team)| RankEntry { rank, team })
            .collect();
    }

    let mut scores = Vec::new();
    if let Some(grid) = &grids.pools {
        scores = pools::extract(grid)?;
        scores.retain(|m| !subsumed.contains(&m.pool_name.to_lowercase()));
    }
    scores.extend(bracket_matches);

    let seedings: Vec<SeedEntry> = match &grids.seeds {
        Some(grid) => standings::extract(grid, num_teams)?
            .into_iter()
            .map(|(seed, team)| SeedEntry { seed, team })
            .collect(),
        None => Vec::new(),
    };

    let table = NameTable::new(seedings.iter().map(|s| s.team.as_str()));
    for m in &mut scores {
        m.team_a = table.resolve(&m.team_a);
        m.team_b = table.resolve(&m.team_b);
    }
    for entry in &mut rankings {
        entry.team = table.resolve(&entry.team);
    }

    Ok(TournamentData {
        scores,
        rankings,
        seedings,
    })
}
