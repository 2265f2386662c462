use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use rayon::prelude::*;

use crate::aggregate::{self, MatchCounts, TeamAggregate, VenueAggregate};
use crate::dataset::{Dataset, MatchCategory};
use crate::error::{DashResult, DashboardError};

/// Everything the details screen shows for one tournament year.
#[derive(Debug, Clone, PartialEq)]
pub struct YearSummary {
    pub year: i32,
    pub winner: DashResult<String>,
    pub counts: MatchCounts,
    pub categories: BTreeMap<MatchCategory, usize>,
    pub team_totals: Vec<TeamAggregate>,
    pub teams: Vec<String>,
    /// Selected team, else the tournament winner.
    pub focus_team: Option<String>,
    pub series: Vec<(u32, u8)>,
    pub venues: Vec<VenueAggregate>,
}

impl YearSummary {
    pub fn compute(dataset: &Dataset, year: i32, team: Option<&str>) -> Self {
        if !dataset.contains_year(year) {
            return Self::empty(
                year,
                DashboardError::InputValidation(format!("year {year} is not in the dataset")),
            );
        }

        let slice = aggregate::filter_by_year(dataset.records(), year);
        let winner = aggregate::find_final_winner(slice.iter().copied());
        let focus_team = team
            .map(str::to_string)
            .or_else(|| winner.as_ref().ok().cloned());

        let (series, venues) = match focus_team.as_deref() {
            Some(focus) => (
                aggregate::team_runs_wickets_series(slice.iter().copied(), focus),
                aggregate::venue_totals(slice.iter().copied(), focus),
            ),
            None => (Vec::new(), Vec::new()),
        };

        Self {
            year,
            counts: aggregate::counts(slice.iter().copied()),
            categories: aggregate::category_distribution(slice.iter().copied()),
            team_totals: aggregate::team_totals(slice.iter().copied()),
            teams: aggregate::unique_teams(slice.iter().copied()),
            winner,
            focus_team,
            series,
            venues,
        }
    }

    fn empty(year: i32, reason: DashboardError) -> Self {
        Self {
            year,
            winner: Err(reason),
            counts: MatchCounts::default(),
            categories: BTreeMap::new(),
            team_totals: Vec::new(),
            teams: Vec::new(),
            focus_team: None,
            series: Vec::new(),
            venues: Vec::new(),
        }
    }
}

/// What the overview screen shows for one match category.
#[derive(Debug, Clone, PartialEq)]
pub struct CategorySummary {
    pub category: MatchCategory,
    pub counts: MatchCounts,
    pub team_runs: Vec<TeamAggregate>,
    pub winners: Vec<(String, usize)>,
}

impl CategorySummary {
    pub fn compute(dataset: &Dataset, category: &MatchCategory) -> Self {
        let slice = aggregate::filter_by_category(dataset.records(), category);
        Self {
            category: category.clone(),
            counts: aggregate::counts(slice.iter().copied()),
            team_runs: aggregate::team_one_runs(slice.iter().copied()),
            winners: aggregate::winner_distribution(slice.iter().copied()),
        }
    }
}

type YearKey = (i32, Option<String>);

/// Memo over summaries. The dataset never changes after load, so an entry
/// is valid for the whole process.
#[derive(Debug, Clone, Default)]
pub struct SummaryCache {
    years: HashMap<YearKey, Arc<YearSummary>>,
    categories: HashMap<MatchCategory, Arc<CategorySummary>>,
    hits: usize,
    misses: usize,
}

impl SummaryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn year(&mut self, dataset: &Dataset, year: i32, team: Option<&str>) -> Arc<YearSummary> {
        let key = (year, team.map(str::to_string));
        if let Some(hit) = self.years.get(&key) {
            self.hits += 1;
            return Arc::clone(hit);
        }
        self.misses += 1;
        let summary = Arc::new(YearSummary::compute(dataset, year, team));
        self.years.insert(key, Arc::clone(&summary));
        summary
    }

    pub fn category(&mut self, dataset: &Dataset, category: &MatchCategory) -> Arc<CategorySummary> {
        if let Some(hit) = self.categories.get(category) {
            self.hits += 1;
            return Arc::clone(hit);
        }
        self.misses += 1;
        let summary = Arc::new(CategorySummary::compute(dataset, category));
        self.categories
            .insert(category.clone(), Arc::clone(&summary));
        summary
    }

    /// Precomputes the default (winner-focused) summary of every year.
    /// Returns how many entries were added.
    pub fn warm(&mut self, dataset: &Dataset) -> usize {
        let missing: Vec<i32> = dataset
            .years()
            .into_iter()
            .filter(|year| !self.years.contains_key(&(*year, None)))
            .collect();
        let computed: Vec<YearSummary> = missing
            .par_iter()
            .map(|year| YearSummary::compute(dataset, *year, None))
            .collect();
        let added = computed.len();
        for summary in computed {
            self.years.insert((summary.year, None), Arc::new(summary));
        }
        added
    }

    pub fn clear(&mut self) {
        self.years.clear();
        self.categories.clear();
    }

    pub fn len(&self) -> usize {
        self.years.len() + self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn hits(&self) -> usize {
        self.hits
    }

    pub fn misses(&self) -> usize {
        self.misses
    }
}
