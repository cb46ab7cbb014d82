mod pipeline;
mod registry;

use crate::pipeline::Pipeline;
use anyhow::{Context, Result};
use chrono::Local;
use log::{error, info, warn};
use pico_args::Arguments;
use scoregrid::client::SheetsClient;
use std::fs;
use std::path::PathBuf;

const HELP: &str = "\
Turn tournament scoring spreadsheets into structured JSON results

USAGE:
  ultiscores [OPTIONS]

OPTIONS:
  -s, --slug SLUG          Process a single tournament, even past its expiry
      --registry PATH      Tournament registry file  [default: public/data/tournaments.json]
      --data-dir PATH      Raw CSV download directory  [default: data/raw]
      --out-dir PATH       Generated JSON directory  [default: public/data]

FLAGS:
  --fetch                  Download the sheets before converting
  -h, --help               Print help information

ENVIRONMENT:
  RUST_LOG                 Log filter  [default: info]
";

struct Args {
    slug: Option<String>,
    registry: PathBuf,
    data_dir: PathBuf,
    out_dir: PathBuf,
    fetch: bool,
}

fn parse_args() -> Result<Args, pico_args::Error> {
    let mut pargs = Arguments::from_env();

    // Help has a higher priority and should be handled separately.
    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        std::process::exit(0);
    }

    let args = Args {
        slug: pargs.opt_value_from_str(["-s", "--slug"])?,
        registry: pargs
            .opt_value_from_str("--registry")?
            .unwrap_or_else(|| PathBuf::from("public/data/tournaments.json")),
        data_dir: pargs
            .opt_value_from_str("--data-dir")?
            .unwrap_or_else(|| PathBuf::from("data/raw")),
        out_dir: pargs
            .opt_value_from_str("--out-dir")?
            .unwrap_or_else(|| PathBuf::from("public/data")),
        fetch: pargs.contains("--fetch"),
    };

    let leftover = pargs.finish();
    if !leftover.is_empty() {
        eprintln!("Unknown argument: {:?}\n\n{HELP}", leftover[0]);
        std::process::exit(2);
    }
    Ok(args)
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = match parse_args() {
        Ok(args) => args,
        Err(err) => {
            eprintln!("Argument error: {err}\n\n{HELP}");
            std::process::exit(2);
        }
    };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_target(false)
        .init();

    let entries = registry::load(&args.registry)?;
    let today = Local::now().date_naive();

    fs::create_dir_all(&args.data_dir)
        .with_context(|| format!("could not create {}", args.data_dir.display()))?;
    fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("could not create {}", args.out_dir.display()))?;

    let pipeline = Pipeline::new(args.data_dir, args.out_dir);
    let client = SheetsClient::new();

    let mut processed = 0usize;
    let mut failed = 0usize;
    for entry in &entries {
        if let Some(want) = &args.slug {
            if entry.slug() != *want {
                continue;
            }
        } else if entry.is_stale(today) {
            info!("Skipping '{}' with expiry date in the past.", entry.name);
            continue;
        }

        if args.fetch && let Err(err) = pipeline.fetch(&client, entry).await {
            error!("Fetch failed for '{}': {err:#}", entry.name);
            failed += 1;
            continue;
        }

        match pipeline.convert(entry) {
            Ok(()) => processed += 1,
            Err(err) => {
                error!("{err:#}");
                failed += 1;
            }
        }
    }

    if processed == 0 && failed == 0
        && let Some(want) = &args.slug
    {
        warn!("No registry entry matched '{want}'");
    }
    info!("Processed {processed} tournament(s)");
    if failed > 0 {
        anyhow::bail!("{failed} tournament(s) failed");
    }
    Ok(())
}
