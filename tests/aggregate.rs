use std::path::PathBuf;

use cwc_dashboard::aggregate::{self, MatchCounts, VenueAggregate};
use cwc_dashboard::dataset::{Dataset, MatchCategory, MatchRecord, MatchStatus};
use cwc_dashboard::error::DashboardError;

fn fixture() -> Dataset {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push("matches.csv");
    Dataset::load_csv(&path).expect("fixture should load").0
}

fn record(
    year: i32,
    category: MatchCategory,
    (team_1, team_2): (&str, &str),
    (team_1_runs, team_2_runs): (u32, u32),
    (team_1_wickets, team_2_wickets): (u8, u8),
    venue: &str,
    winner: Option<&str>,
) -> MatchRecord {
    MatchRecord {
        world_cup_year: year,
        match_category: category,
        team_1: team_1.to_string(),
        team_2: team_2.to_string(),
        team_1_runs,
        team_2_runs,
        team_1_wickets,
        team_2_wickets,
        venue: venue.to_string(),
        winning_team: winner.map(str::to_string),
        match_status: MatchStatus::Played,
    }
}

#[test]
fn final_2015_scenario() {
    let records = vec![record(
        2015,
        MatchCategory::Final,
        ("AUS", "NZ"),
        (183, 150),
        (4, 7),
        "Melbourne",
        Some("AUS"),
    )];
    let slice = aggregate::filter_by_year(&records, 2015);
    assert_eq!(slice.len(), 1);
    assert_eq!(
        aggregate::find_final_winner(slice.iter().copied()),
        Ok("AUS".to_string())
    );
    assert_eq!(
        aggregate::counts(slice.iter().copied()),
        MatchCounts {
            total: 1,
            played: 1,
            abandoned: 0
        }
    );
    assert_eq!(
        aggregate::venue_totals(slice.iter().copied(), "AUS"),
        vec![VenueAggregate {
            venue: "Melbourne".to_string(),
            runs: 183,
            wickets: 7,
        }]
    );
}

#[test]
fn team_totals_match_raw_sums() {
    let data = fixture();
    for year in data.years() {
        let slice = aggregate::filter_by_year(data.records(), year);
        let totals = aggregate::team_totals(slice.iter().copied());
        for t in &totals {
            let expected: u32 = slice
                .iter()
                .filter_map(|r| r.runs_for(&t.team))
                .sum();
            assert_eq!(t.runs, expected, "{year} {}", t.team);
            let expected_wickets: u32 = slice
                .iter()
                .filter_map(|r| r.wickets_lost(&t.team))
                .map(u32::from)
                .sum();
            assert_eq!(t.wickets, expected_wickets, "{year} {}", t.team);
        }
        assert_eq!(totals.len(), aggregate::unique_teams(slice.iter().copied()).len());
    }

    let slice = aggregate::filter_by_year(data.records(), 2015);
    let aus = aggregate::team_totals(slice.iter().copied())
        .into_iter()
        .find(|t| t.team == "AUS")
        .expect("AUS played in 2015");
    assert_eq!((aus.runs, aus.wickets), (1007, 29));
}

#[test]
fn series_has_one_point_per_appearance() {
    let data = fixture();
    let slice = aggregate::filter_by_year(data.records(), 2015);
    let series = aggregate::team_runs_wickets_series(slice.iter().copied(), "AUS");
    assert_eq!(series, vec![(342, 9), (151, 10), (0, 0), (328, 7), (186, 3)]);

    for team in aggregate::unique_teams(slice.iter().copied()) {
        let appearances = slice.iter().filter(|r| r.involves(&team)).count();
        let points = aggregate::team_runs_wickets_series(slice.iter().copied(), &team);
        assert_eq!(points.len(), appearances);
    }

    assert!(aggregate::team_runs_wickets_series(slice.iter().copied(), "ZIM").is_empty());
}

#[test]
fn venues_use_opponent_wickets_in_first_seen_order() {
    let data = fixture();
    let slice = aggregate::filter_by_year(data.records(), 2015);
    let venues = aggregate::venue_totals(slice.iter().copied(), "AUS");
    let summary: Vec<(&str, u32, u32)> = venues
        .iter()
        .map(|v| (v.venue.as_str(), v.runs, v.wickets))
        .collect();
    assert_eq!(
        summary,
        vec![
            ("Melbourne", 528, 20),
            ("Auckland", 151, 9),
            ("Brisbane", 0, 0),
            ("Sydney", 328, 10),
        ]
    );
}

#[test]
fn counts_keep_unknown_status_out_of_played_and_abandoned() {
    let data = fixture();
    for year in data.years() {
        let slice = aggregate::filter_by_year(data.records(), year);
        let counts = aggregate::counts(slice.iter().copied());
        assert!(counts.played + counts.abandoned <= counts.total);
    }

    let slice = aggregate::filter_by_year(data.records(), 2019);
    assert_eq!(
        aggregate::counts(slice.iter().copied()),
        MatchCounts {
            total: 4,
            played: 3,
            abandoned: 0
        }
    );
    let slice = aggregate::filter_by_year(data.records(), 2015);
    assert_eq!(
        aggregate::counts(slice.iter().copied()),
        MatchCounts {
            total: 7,
            played: 6,
            abandoned: 1
        }
    );
}

#[test]
fn final_winner_errors_are_recoverable() {
    let data = fixture();
    let none = aggregate::filter_by_year(data.records(), 2019);
    assert!(matches!(
        aggregate::find_final_winner(none.iter().copied()),
        Err(DashboardError::DataNotFound(_))
    ));

    // Two tournaments, two Finals.
    assert!(matches!(
        aggregate::find_final_winner(data.records()),
        Err(DashboardError::DataNotFound(_))
    ));

    let no_result = vec![record(
        2019,
        MatchCategory::Final,
        ("NZ", "ENG"),
        (241, 241),
        (8, 10),
        "Lord's",
        None,
    )];
    assert!(matches!(
        aggregate::find_final_winner(&no_result),
        Err(DashboardError::DataNotFound(_))
    ));

    let empty: Vec<MatchRecord> = Vec::new();
    assert!(aggregate::find_final_winner(&empty).is_err());
}

#[test]
fn category_views() {
    let data = fixture();
    let slice = aggregate::filter_by_year(data.records(), 2015);
    let dist = aggregate::category_distribution(slice.iter().copied());
    assert_eq!(dist.get(&MatchCategory::League), Some(&4));
    assert_eq!(dist.get(&MatchCategory::SemiFinal), Some(&2));
    assert_eq!(dist.get(&MatchCategory::Final), Some(&1));
    assert_eq!(dist.values().sum::<usize>(), slice.len());

    let finals = aggregate::filter_by_category(data.records(), &MatchCategory::Final);
    assert_eq!(finals.len(), 2);
    assert_eq!(
        aggregate::winner_distribution(finals.iter().copied()),
        vec![("AUS".to_string(), 1), ("IND".to_string(), 1)]
    );
    let runs: Vec<(String, u32)> = aggregate::team_one_runs(finals.iter().copied())
        .into_iter()
        .map(|t| (t.team, t.runs))
        .collect();
    assert_eq!(runs, vec![("AUS".to_string(), 186), ("IND".to_string(), 277)]);

    let other = MatchCategory::Other("Quarter-Final".to_string());
    assert!(aggregate::filter_by_category(data.records(), &other).is_empty());
}

#[test]
fn aggregations_are_idempotent() {
    let data = fixture();
    let slice = aggregate::filter_by_year(data.records(), 2015);
    assert_eq!(
        aggregate::team_totals(slice.iter().copied()),
        aggregate::team_totals(slice.iter().copied())
    );
    assert_eq!(
        aggregate::venue_totals(slice.iter().copied(), "NZ"),
        aggregate::venue_totals(slice.iter().copied(), "NZ")
    );
    assert_eq!(
        aggregate::winner_distribution(data.records()),
        aggregate::winner_distribution(data.records())
    );
}
