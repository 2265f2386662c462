use std::fs::{self, File};
use std::path::PathBuf;

use anyhow::{Context, Result};

use cwc_dashboard::dataset;
use cwc_dashboard::fake_data::{self, FakeTournamentConfig};

fn main() -> Result<()> {
    let out_path =
        parse_out_path_arg().unwrap_or_else(|| PathBuf::from("data/crick_df_cleaned.csv"));
    let mut cfg = FakeTournamentConfig::default();
    if let Some(seed) = std::env::var("CWC_FAKE_SEED")
        .ok()
        .and_then(|v| v.trim().parse::<u64>().ok())
    {
        cfg.seed = seed;
    }

    let records = fake_data::generate(&cfg);

    if let Some(parent) = out_path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("create directory {}", parent.display()))?;
    }
    let file = File::create(&out_path)
        .with_context(|| format!("create {}", out_path.display()))?;
    dataset::write_csv(&records, file)?;

    println!("Sample dataset written");
    println!("Path: {}", out_path.display());
    println!("Years: {:?}", cfg.years);
    println!("Matches: {}", records.len());
    Ok(())
}

fn parse_out_path_arg() -> Option<PathBuf> {
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    for (idx, arg) in args.iter().enumerate() {
        if let Some(path) = arg.strip_prefix("--out=") {
            let trimmed = path.trim();
            if !trimmed.is_empty() {
                return Some(PathBuf::from(trimmed));
            }
        }
        if arg == "--out" {
            let Some(next) = args.get(idx + 1) else {
                continue;
            };
            if !next.trim().is_empty() {
                return Some(PathBuf::from(next));
            }
        }
    }
    None
}
