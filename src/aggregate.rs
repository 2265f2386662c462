//! Pure aggregations over slices of [`MatchRecord`].
//!
//! Every function takes any iterator of borrowed records, so callers can pass
//! the whole dataset (`dataset.records()`) or a filtered slice
//! (`filtered.iter().copied()`) without cloning rows. Results are freshly
//! allocated per call; nothing here holds state between calls.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::dataset::{MatchCategory, MatchRecord, MatchStatus};
use crate::error::{DashResult, DashboardError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamAggregate {
    pub team: String,
    pub runs: u32,
    pub wickets: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VenueAggregate {
    pub venue: String,
    pub runs: u32,
    pub wickets: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MatchCounts {
    pub total: usize,
    pub played: usize,
    pub abandoned: usize,
}

pub fn filter_by_year<'a, I>(records: I, year: i32) -> Vec<&'a MatchRecord>
where
    I: IntoIterator<Item = &'a MatchRecord>,
{
    records
        .into_iter()
        .filter(|r| r.world_cup_year == year)
        .collect()
}

pub fn filter_by_category<'a, I>(records: I, category: &MatchCategory) -> Vec<&'a MatchRecord>
where
    I: IntoIterator<Item = &'a MatchRecord>,
{
    records
        .into_iter()
        .filter(|r| &r.match_category == category)
        .collect()
}

/// Runs and wickets per team, summed over its appearances on either side.
/// Sorted by team code.
pub fn team_totals<'a, I>(records: I) -> Vec<TeamAggregate>
where
    I: IntoIterator<Item = &'a MatchRecord>,
{
    let mut totals: BTreeMap<&str, (u32, u32)> = BTreeMap::new();
    for r in records {
        let one = totals.entry(&r.team_1).or_default();
        one.0 += r.team_1_runs;
        one.1 += u32::from(r.team_1_wickets);
        let two = totals.entry(&r.team_2).or_default();
        two.0 += r.team_2_runs;
        two.1 += u32::from(r.team_2_wickets);
    }
    totals
        .into_iter()
        .map(|(team, (runs, wickets))| TeamAggregate {
            team: team.to_string(),
            runs,
            wickets,
        })
        .collect()
}

/// `(runs, wickets lost)` for `team` in every record it played, in record order.
pub fn team_runs_wickets_series<'a, I>(records: I, team: &str) -> Vec<(u32, u8)>
where
    I: IntoIterator<Item = &'a MatchRecord>,
{
    records
        .into_iter()
        .filter_map(|r| Some((r.runs_for(team)?, r.wickets_lost(team)?)))
        .collect()
}

/// Venue-wise runs scored by `team` and wickets taken by its bowlers.
///
/// The wickets column is the opponent's wickets lost, not `team`'s own.
/// Venues keep their first-appearance order.
pub fn venue_totals<'a, I>(records: I, team: &str) -> Vec<VenueAggregate>
where
    I: IntoIterator<Item = &'a MatchRecord>,
{
    let mut out: Vec<VenueAggregate> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();
    for r in records {
        let (Some(runs), Some(wickets)) = (r.runs_for(team), r.wickets_taken(team)) else {
            continue;
        };
        let slot = *index.entry(&r.venue).or_insert_with(|| {
            out.push(VenueAggregate {
                venue: r.venue.clone(),
                runs: 0,
                wickets: 0,
            });
            out.len() - 1
        });
        out[slot].runs += runs;
        out[slot].wickets += u32::from(wickets);
    }
    out
}

pub fn category_distribution<'a, I>(records: I) -> BTreeMap<MatchCategory, usize>
where
    I: IntoIterator<Item = &'a MatchRecord>,
{
    let mut dist = BTreeMap::new();
    for r in records {
        *dist.entry(r.match_category.clone()).or_insert(0) += 1;
    }
    dist
}

/// Unknown statuses only count towards `total`.
pub fn counts<'a, I>(records: I) -> MatchCounts
where
    I: IntoIterator<Item = &'a MatchRecord>,
{
    let mut out = MatchCounts::default();
    for r in records {
        out.total += 1;
        match r.match_status {
            MatchStatus::Played => out.played += 1,
            MatchStatus::Abandoned => out.abandoned += 1,
            MatchStatus::Other(_) => {}
        }
    }
    out
}

pub fn find_final_winner<'a, I>(records: I) -> DashResult<String>
where
    I: IntoIterator<Item = &'a MatchRecord>,
{
    let finals = filter_by_category(records, &MatchCategory::Final);
    let final_match = match finals.as_slice() {
        [only] => *only,
        [] => {
            return Err(DashboardError::DataNotFound(
                "no Final match in selection".to_string(),
            ));
        }
        many => {
            return Err(DashboardError::DataNotFound(format!(
                "{} Final matches in selection, expected one",
                many.len()
            )));
        }
    };
    final_match.winning_team.clone().ok_or_else(|| {
        DashboardError::DataNotFound(format!(
            "Final {} vs {} has no recorded winner",
            final_match.team_1, final_match.team_2
        ))
    })
}

/// Every team code appearing on either side, sorted and deduplicated.
pub fn unique_teams<'a, I>(records: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a MatchRecord>,
{
    let mut teams = BTreeSet::new();
    for r in records {
        teams.insert(r.team_1.as_str());
        teams.insert(r.team_2.as_str());
    }
    teams.into_iter().map(str::to_string).collect()
}

/// Wins per team, most wins first. No-result records are skipped.
pub fn winner_distribution<'a, I>(records: I) -> Vec<(String, usize)>
where
    I: IntoIterator<Item = &'a MatchRecord>,
{
    let mut wins: HashMap<&str, usize> = HashMap::new();
    for r in records {
        if let Some(winner) = r.winning_team.as_deref() {
            *wins.entry(winner).or_insert(0) += 1;
        }
    }
    let mut out: Vec<(String, usize)> = wins
        .into_iter()
        .map(|(team, n)| (team.to_string(), n))
        .collect();
    out.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    out
}

/// Runs and wickets of the `team_1` side only, per team code.
pub fn team_one_runs<'a, I>(records: I) -> Vec<TeamAggregate>
where
    I: IntoIterator<Item = &'a MatchRecord>,
{
    let mut totals: BTreeMap<&str, (u32, u32)> = BTreeMap::new();
    for r in records {
        let slot = totals.entry(&r.team_1).or_default();
        slot.0 += r.team_1_runs;
        slot.1 += u32::from(r.team_1_wickets);
    }
    totals
        .into_iter()
        .map(|(team, (runs, wickets))| TeamAggregate {
            team: team.to_string(),
            runs,
            wickets,
        })
        .collect()
}
