use crate::registry::TournamentEntry;
use anyhow::{Context, Result};
use log::{info, warn};
use scoregrid::client::SheetsClient;
use scoregrid::{Grid, StageGrids, TournamentData, assemble};
use serde_json::Value;
use std::fs;
use std::path::PathBuf;

/// Worksheet tabs fetched for every tournament, in stage order.
const STAGE_TABS: [&str; 3] = ["Pools", "Brackets", "Seeds"];

pub struct Pipeline {
    data_dir: PathBuf,
    out_dir: PathBuf,
}

impl Pipeline {
    pub fn new(data_dir: PathBuf, out_dir: PathBuf) -> Self {
        Self { data_dir, out_dir }
    }

    fn raw_path(&self, slug: &str, stage: &str) -> PathBuf {
        self.data_dir.join(format!("{slug}-{stage}.csv"))
    }

    /// Download every stage tab into the raw data directory. A tab the
    /// spreadsheet doesn't publish is skipped with a warning, since plenty
    /// of tournaments run pools only.
    pub async fn fetch(&self, client: &SheetsClient, entry: &TournamentEntry) -> Result<()> {
        let slug = entry.slug();
        for tab in STAGE_TABS {
            info!("Downloading '{tab}' data for '{}'", entry.name);
            match client.fetch_tab(&entry.sheet_id, tab).await {
                Ok(body) => {
                    let path = self.raw_path(&slug, &tab.to_lowercase());
                    fs::write(&path, body)
                        .with_context(|| format!("could not write {}", path.display()))?;
                }
                Err(err) => warn!("Skipping '{tab}' for '{}': {err}", entry.name),
            }
        }
        Ok(())
    }

    /// Parse whichever raw stage files exist and write the combined record
    /// next to the registry.
    pub fn convert(&self, entry: &TournamentEntry) -> Result<()> {
        let slug = entry.slug();
        let grids = StageGrids {
            pools: self.load_grid(&slug, "pools")?,
            brackets: self.load_grid(&slug, "brackets")?,
            seeds: self.load_grid(&slug, "seeds")?,
        };
        let data = assemble(&grids, entry.num_teams)
            .with_context(|| format!("could not parse sheets for '{}'", entry.name))?;
        if data.is_empty() {
            warn!("No data found for '{}'", entry.name);
        }

        let record = output_record(entry, &data)?;
        let path = self.out_dir.join(format!("{slug}.json"));
        let body = serde_json::to_string_pretty(&record)?;
        fs::write(&path, body).with_context(|| format!("could not write {}", path.display()))?;
        info!("Wrote {}", path.display());
        Ok(())
    }

    fn load_grid(&self, slug: &str, stage: &str) -> Result<Option<Grid>> {
        let path = self.raw_path(slug, stage);
        if !path.exists() {
            return Ok(None);
        }
        let grid = Grid::from_path(&path)
            .with_context(|| format!("could not read {}", path.display()))?;
        Ok(Some(grid))
    }
}

/// Registry metadata plus the parsed results as one flat JSON object, the
/// shape the site consumes directly.
fn output_record(entry: &TournamentEntry, data: &TournamentData) -> Result<Value> {
    let mut record = serde_json::to_value(entry)?;
    let Value::Object(map) = &mut record else {
        anyhow::bail!("registry entry '{}' did not serialize to an object", entry.name);
    };
    map.insert("slug".into(), Value::String(entry.slug()));
    map.insert("data".into(), serde_json::to_value(&data.scores)?);
    map.insert("rankings".into(), serde_json::to_value(&data.rankings)?);
    map.insert("seedings".into(), serde_json::to_value(&data.seedings)?);
    Ok(record)
}
