use std::path::PathBuf;

use anyhow::{Context, Result, bail};

use cwc_dashboard::config::AppConfig;
use cwc_dashboard::country_map;
use cwc_dashboard::dataset::Dataset;
use cwc_dashboard::summary::YearSummary;

fn main() -> Result<()> {
    let config = AppConfig::load();
    let data_path = parse_arg("--data")
        .map(PathBuf::from)
        .unwrap_or(config.data_path);
    let team = parse_arg("--team");

    let (dataset, report) = Dataset::load_csv(&data_path)?;
    if !report.is_clean() {
        println!("Rejected rows: {}", report.rejected.len());
        for reason in report.rejected.iter().take(8) {
            println!(" - {reason}");
        }
    }

    let year = match parse_arg("--year") {
        Some(raw) => raw
            .trim()
            .parse::<i32>()
            .with_context(|| format!("invalid --year value {raw:?}"))?,
        None => match dataset.years().last() {
            Some(year) => *year,
            None => bail!("dataset {} has no rows", data_path.display()),
        },
    };

    let summary = YearSummary::compute(&dataset, year, team.as_deref());
    print_summary(&summary);

    if let Some(dir) = parse_arg("--xlsx") {
        let path = cwc_dashboard::export::default_export_path(&PathBuf::from(dir), &summary);
        let written = cwc_dashboard::export::export_year_summary(&summary, &path)?;
        println!();
        println!("Workbook: {}", written.path.display());
    }

    Ok(())
}

fn print_summary(summary: &YearSummary) {
    println!("World Cup {}", summary.year);
    match &summary.winner {
        Ok(team) => println!("Winner: {team} ({})", country_map::display_name(team)),
        Err(err) => println!("Winner: {err}"),
    }
    println!(
        "Matches: {} (played {}, abandoned {})",
        summary.counts.total, summary.counts.played, summary.counts.abandoned
    );
    for (category, n) in &summary.categories {
        println!("  {:<13}{n:>3}", category.label());
    }

    println!();
    println!("{:<8}{:>7}{:>9}", "Team", "Runs", "Wickets");
    for t in &summary.team_totals {
        println!("{:<8}{:>7}{:>9}", t.team, t.runs, t.wickets);
    }

    let Some(focus) = summary.focus_team.as_deref() else {
        return;
    };
    println!();
    println!("{focus}: {} innings", summary.series.len());
    for (idx, (runs, wickets)) in summary.series.iter().enumerate() {
        println!("  #{:<3}{runs:>4}/{wickets}", idx + 1);
    }
    println!();
    println!("{:<20}{:>7}{:>9}", "Venue", "Runs", "Wickets");
    for v in &summary.venues {
        println!("{:<20}{:>7}{:>9}", v.venue, v.runs, v.wickets);
    }
}

fn parse_arg(name: &str) -> Option<String> {
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let prefix = format!("{name}=");
    for (idx, arg) in args.iter().enumerate() {
        if let Some(value) = arg.strip_prefix(&prefix) {
            let trimmed = value.trim();
            if !trimmed.is_empty() {
                return Some(trimmed.to_string());
            }
        }
        if arg == name {
            let Some(next) = args.get(idx + 1) else {
                continue;
            };
            if !next.trim().is_empty() {
                return Some(next.trim().to_string());
            }
        }
    }
    None
}
