use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::Path;

/// One tournament in the registry file.
///
/// Unknown keys ride along in `extra` so the output record keeps whatever
/// presentation metadata the registry carries (location, dates, links).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TournamentEntry {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    pub sheet_id: String,
    /// Tournaments past this date are no longer re-processed.
    pub expiry: NaiveDate,
    pub num_teams: usize,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

impl TournamentEntry {
    pub fn slug(&self) -> String {
        self.slug.clone().unwrap_or_else(|| slugify(&self.name))
    }

    pub fn is_stale(&self, today: NaiveDate) -> bool {
        today > self.expiry
    }
}

pub fn slugify(name: &str) -> String {
    name.replace(' ', "-").to_lowercase()
}

pub fn load(path: &Path) -> Result<Vec<TournamentEntry>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("could not read registry {}", path.display()))?;
    let entries: Vec<TournamentEntry> = serde_json::from_str(&raw)
        .with_context(|| format!("invalid registry {}", path.display()))?;
    for entry in &entries {
        if entry.num_teams == 0 {
            anyhow::bail!("registry entry '{}' has a zero team count", entry.name);
        }
    }
    Ok(entries)
}
