use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rust_xlsxwriter::{Workbook, Worksheet};

use crate::summary::YearSummary;

pub struct ExportReport {
    pub path: PathBuf,
    pub teams: usize,
    pub venues: usize,
    pub series: usize,
    pub categories: usize,
}

pub fn default_export_path(dir: &Path, summary: &YearSummary) -> PathBuf {
    let stamp = chrono::Utc::now().format("%Y%m%d_%H%M%S");
    let team = summary.focus_team.as_deref().unwrap_or("all");
    dir.join(format!("cwc_{}_{}_{stamp}.xlsx", summary.year, team))
}

pub fn export_year_summary(summary: &YearSummary, path: &Path) -> Result<ExportReport> {
    let winner = match &summary.winner {
        Ok(team) => team.clone(),
        Err(err) => err.to_string(),
    };
    let summary_rows = vec![
        vec!["Field".to_string(), "Value".to_string()],
        vec!["Year".to_string(), summary.year.to_string()],
        vec!["Winner".to_string(), winner],
        vec![
            "Focus Team".to_string(),
            summary.focus_team.clone().unwrap_or_default(),
        ],
        vec!["Total Matches".to_string(), summary.counts.total.to_string()],
        vec!["Played".to_string(), summary.counts.played.to_string()],
        vec!["Abandoned".to_string(), summary.counts.abandoned.to_string()],
        vec!["Generated".to_string(), chrono::Utc::now().to_rfc3339()],
    ];

    let mut team_rows = vec![vec![
        "Team".to_string(),
        "Runs".to_string(),
        "Wickets".to_string(),
    ]];
    team_rows.extend(
        summary
            .team_totals
            .iter()
            .map(|t| vec![t.team.clone(), t.runs.to_string(), t.wickets.to_string()]),
    );

    let mut venue_rows = vec![vec![
        "Venue".to_string(),
        "Runs".to_string(),
        "Wickets".to_string(),
    ]];
    venue_rows.extend(
        summary
            .venues
            .iter()
            .map(|v| vec![v.venue.clone(), v.runs.to_string(), v.wickets.to_string()]),
    );

    let mut series_rows = vec![vec![
        "Match".to_string(),
        "Runs".to_string(),
        "Wickets".to_string(),
    ]];
    series_rows.extend(
        summary
            .series
            .iter()
            .enumerate()
            .map(|(idx, (runs, wickets))| {
                vec![(idx + 1).to_string(), runs.to_string(), wickets.to_string()]
            }),
    );

    let mut category_rows = vec![vec!["Category".to_string(), "Matches".to_string()]];
    category_rows.extend(
        summary
            .categories
            .iter()
            .map(|(category, n)| vec![category.label().to_string(), n.to_string()]),
    );

    let mut workbook = Workbook::new();
    for (name, rows) in [
        ("Summary", &summary_rows),
        ("TeamTotals", &team_rows),
        ("Venues", &venue_rows),
        ("Series", &series_rows),
        ("Categories", &category_rows),
    ] {
        let sheet = workbook.add_worksheet();
        sheet.set_name(name)?;
        write_rows(sheet, rows)?;
    }

    workbook
        .save(path)
        .with_context(|| format!("failed writing workbook to {}", path.display()))?;

    Ok(ExportReport {
        path: path.to_path_buf(),
        teams: team_rows.len().saturating_sub(1),
        venues: venue_rows.len().saturating_sub(1),
        series: series_rows.len().saturating_sub(1),
        categories: category_rows.len().saturating_sub(1),
    })
}

fn write_rows(worksheet: &mut Worksheet, rows: &[Vec<String>]) -> Result<()> {
    for (row_idx, row) in rows.iter().enumerate() {
        for (col_idx, value) in row.iter().enumerate() {
            worksheet
                .write_string(row_idx as u32, col_idx as u16, value)
                .with_context(|| format!("write cell ({row_idx},{col_idx})"))?;
        }
    }
    Ok(())
}
