use std::path::PathBuf;

use cwc_dashboard::dataset::{Dataset, MatchCategory};
use cwc_dashboard::error::DashboardError;
use cwc_dashboard::summary::{CategorySummary, SummaryCache, YearSummary};

fn fixture() -> Dataset {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push("matches.csv");
    Dataset::load_csv(&path).expect("fixture should load").0
}

#[test]
fn year_summary_follows_winner_by_default() {
    let data = fixture();
    let summary = YearSummary::compute(&data, 2015, None);
    assert_eq!(summary.winner, Ok("AUS".to_string()));
    assert_eq!(summary.focus_team.as_deref(), Some("AUS"));
    assert_eq!(summary.counts.total, 7);
    assert_eq!(summary.series.len(), 5);
    assert_eq!(summary.venues.len(), 4);
    assert_eq!(summary.teams, vec!["AUS", "BAN", "ENG", "IND", "NZ", "SA"]);

    let nz = YearSummary::compute(&data, 2015, Some("NZ"));
    assert_eq!(nz.winner, Ok("AUS".to_string()));
    assert_eq!(nz.focus_team.as_deref(), Some("NZ"));
    assert_eq!(nz.series, vec![(152, 9), (125, 2), (299, 6), (183, 10)]);
}

#[test]
fn year_without_final_still_summarises() {
    let data = fixture();
    let summary = YearSummary::compute(&data, 2019, None);
    assert!(matches!(summary.winner, Err(DashboardError::DataNotFound(_))));
    assert_eq!(summary.focus_team, None);
    assert!(summary.series.is_empty());
    assert!(summary.venues.is_empty());
    assert_eq!(summary.counts.total, 4);
    assert_eq!(summary.team_totals.len(), 5);
}

#[test]
fn unknown_year_is_an_empty_summary() {
    let data = fixture();
    let summary = YearSummary::compute(&data, 2003, Some("AUS"));
    assert!(matches!(
        summary.winner,
        Err(DashboardError::InputValidation(_))
    ));
    assert_eq!(summary.counts.total, 0);
    assert!(summary.team_totals.is_empty());
    assert!(summary.categories.is_empty());
}

#[test]
fn cache_returns_what_a_fresh_compute_would() {
    let data = fixture();
    let mut cache = SummaryCache::new();

    let first = cache.year(&data, 2011, None);
    let second = cache.year(&data, 2011, None);
    assert_eq!(*first, YearSummary::compute(&data, 2011, None));
    assert!(std::sync::Arc::ptr_eq(&first, &second));
    assert_eq!((cache.hits(), cache.misses()), (1, 1));

    let sl = cache.year(&data, 2011, Some("SL"));
    assert_eq!(sl.focus_team.as_deref(), Some("SL"));
    assert_eq!(cache.misses(), 2);

    let finals = cache.category(&data, &MatchCategory::Final);
    assert_eq!(*finals, CategorySummary::compute(&data, &MatchCategory::Final));
    assert_eq!(finals.counts.total, 2);
    cache.category(&data, &MatchCategory::Final);
    assert_eq!(cache.hits(), 2);
    assert_eq!(cache.len(), 3);

    cache.clear();
    assert!(cache.is_empty());
}

#[test]
fn warm_fills_every_year_once() {
    let data = fixture();
    let mut cache = SummaryCache::new();
    cache.year(&data, 2015, None);
    assert_eq!(cache.warm(&data), 2);
    assert_eq!(cache.warm(&data), 0);

    let misses = cache.misses();
    let warmed = cache.year(&data, 2019, None);
    assert_eq!(cache.misses(), misses);
    assert_eq!(*warmed, YearSummary::compute(&data, 2019, None));
}

#[test]
fn league_category_summary() {
    let data = fixture();
    let league = CategorySummary::compute(&data, &MatchCategory::League);
    assert_eq!(league.counts.total, 9);
    assert_eq!(league.counts.abandoned, 2);
    // Tie and abandoned rows have no winner.
    let wins: usize = league.winners.iter().map(|(_, n)| n).sum();
    assert_eq!(wins, 5);
    assert_eq!(league.winners[0], ("NZ".to_string(), 2));
}
