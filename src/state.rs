use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::Arc;

use crate::country_map;
use crate::dataset::{Dataset, MatchCategory};
use crate::error::DashboardError;
use crate::export;
use crate::sentiment::{self, SentimentAdapter};
use crate::summary::{CategorySummary, SummaryCache, YearSummary};

const MAX_LOGS: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Overview,
    Details,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Editing,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    ToggleScreen,
    ToggleHelp,
    SelectCategory(MatchCategory),
    NextYear,
    PrevYear,
    NextDetailsTeam,
    PrevDetailsTeam,
    ResetDetailsTeam,
    NextSentimentTeam,
    PrevSentimentTeam,
    BeginEditing,
    InputChar(char),
    InputBackspace,
    CancelEditing,
    SubmitSentiment,
    Export,
}

#[derive(Debug, Clone)]
pub struct AppState {
    pub screen: Screen,
    pub dataset: Arc<Dataset>,
    pub years: Vec<i32>,
    pub year_idx: usize,
    pub category: MatchCategory,
    /// `None` means "follow the tournament winner".
    pub details_team: Option<String>,
    pub sentiment_teams: Vec<String>,
    pub sentiment_team_idx: usize,
    pub input: String,
    pub input_mode: InputMode,
    pub prediction: Option<String>,
    pub sentiment: Option<&'static SentimentAdapter>,
    pub cache: SummaryCache,
    pub logs: VecDeque<String>,
    pub help_overlay: bool,
    pub export_dir: PathBuf,
}

impl AppState {
    pub fn new(dataset: Arc<Dataset>) -> Self {
        let years = dataset.years();
        let sentiment_teams = dataset.teams();
        Self {
            screen: Screen::Overview,
            // Latest tournament first.
            year_idx: years.len().saturating_sub(1),
            years,
            dataset,
            category: MatchCategory::Final,
            details_team: None,
            sentiment_teams,
            sentiment_team_idx: 0,
            input: String::new(),
            input_mode: InputMode::Normal,
            prediction: None,
            sentiment: None,
            cache: SummaryCache::new(),
            logs: VecDeque::with_capacity(MAX_LOGS),
            help_overlay: false,
            export_dir: PathBuf::from("."),
        }
    }

    pub fn push_log(&mut self, msg: impl Into<String>) {
        self.logs.push_back(msg.into());
        while self.logs.len() > MAX_LOGS {
            self.logs.pop_front();
        }
    }

    pub fn selected_year(&self) -> Option<i32> {
        self.years.get(self.year_idx).copied()
    }

    pub fn selected_sentiment_team(&self) -> Option<&str> {
        self.sentiment_teams
            .get(self.sentiment_team_idx)
            .map(String::as_str)
    }

    pub fn year_summary(&mut self) -> Option<Arc<YearSummary>> {
        let year = self.selected_year()?;
        let team = self.details_team.clone();
        Some(self.cache.year(&self.dataset, year, team.as_deref()))
    }

    pub fn category_summary(&mut self) -> Arc<CategorySummary> {
        let category = self.category.clone();
        self.cache.category(&self.dataset, &category)
    }

    fn step_year(&mut self, forward: bool) {
        if self.years.is_empty() {
            return;
        }
        let len = self.years.len();
        self.year_idx = if forward {
            (self.year_idx + 1) % len
        } else {
            (self.year_idx + len - 1) % len
        };
        // Teams differ between tournaments.
        self.details_team = None;
    }

    fn step_details_team(&mut self, forward: bool) {
        let Some(summary) = self.year_summary() else {
            return;
        };
        if summary.teams.is_empty() {
            return;
        }
        let len = summary.teams.len();
        let current = summary
            .focus_team
            .as_ref()
            .and_then(|focus| summary.teams.iter().position(|t| t == focus));
        let next = match (current, forward) {
            (Some(idx), true) => (idx + 1) % len,
            (Some(idx), false) => (idx + len - 1) % len,
            (None, true) => 0,
            (None, false) => len - 1,
        };
        self.details_team = Some(summary.teams[next].clone());
    }

    fn step_sentiment_team(&mut self, forward: bool) {
        let len = self.sentiment_teams.len();
        if len == 0 {
            return;
        }
        self.sentiment_team_idx = if forward {
            (self.sentiment_team_idx + 1) % len
        } else {
            (self.sentiment_team_idx + len - 1) % len
        };
    }

    fn submit_sentiment(&mut self) {
        self.input_mode = InputMode::Normal;
        let Some(code) = self.selected_sentiment_team().map(str::to_string) else {
            self.prediction = Some("No team selected".to_string());
            return;
        };
        let Some(adapter) = self.sentiment else {
            self.prediction = Some("Sentiment models unavailable".to_string());
            self.push_log("[WARN] Sentiment request ignored: models not loaded");
            return;
        };
        if country_map::resolve(&code).is_none() {
            self.push_log(format!("[WARN] No display name for {code}, using the code"));
        }
        match sentiment::analyze_team_text(adapter, &code, &self.input) {
            Ok(label) => {
                self.push_log(format!("[INFO] Sentiment for {code}: {label}"));
                self.prediction = Some(label.to_string());
            }
            Err(DashboardError::InputValidation(msg)) => {
                self.prediction = Some(msg);
            }
            Err(err) => {
                self.push_log(format!("[ERROR] Sentiment failed: {err}"));
                self.prediction = Some(err.to_string());
            }
        }
    }

    fn export_current(&mut self) {
        let Some(summary) = self.year_summary() else {
            self.push_log("[INFO] Nothing to export");
            return;
        };
        let path = export::default_export_path(&self.export_dir, &summary);
        match export::export_year_summary(&summary, &path) {
            Ok(report) => self.push_log(format!(
                "[INFO] Exported {} ({} teams, {} venues)",
                report.path.display(),
                report.teams,
                report.venues
            )),
            Err(err) => self.push_log(format!("[ERROR] Export failed: {err:#}")),
        }
    }
}

pub fn apply_action(state: &mut AppState, action: Action) {
    match action {
        Action::ToggleScreen => {
            state.screen = match state.screen {
                Screen::Overview => Screen::Details,
                Screen::Details => Screen::Overview,
            };
        }
        Action::ToggleHelp => state.help_overlay = !state.help_overlay,
        Action::SelectCategory(category) => {
            state.category = category;
        }
        Action::NextYear => state.step_year(true),
        Action::PrevYear => state.step_year(false),
        Action::NextDetailsTeam => state.step_details_team(true),
        Action::PrevDetailsTeam => state.step_details_team(false),
        Action::ResetDetailsTeam => state.details_team = None,
        Action::NextSentimentTeam => state.step_sentiment_team(true),
        Action::PrevSentimentTeam => state.step_sentiment_team(false),
        Action::BeginEditing => state.input_mode = InputMode::Editing,
        Action::InputChar(c) => {
            if state.input_mode == InputMode::Editing {
                state.input.push(c);
            }
        }
        Action::InputBackspace => {
            if state.input_mode == InputMode::Editing {
                state.input.pop();
            }
        }
        Action::CancelEditing => state.input_mode = InputMode::Normal,
        Action::SubmitSentiment => state.submit_sentiment(),
        Action::Export => state.export_current(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_is_bounded() {
        let mut state = AppState::new(Arc::new(Dataset::default()));
        for i in 0..(MAX_LOGS + 10) {
            state.push_log(format!("line {i}"));
        }
        assert_eq!(state.logs.len(), MAX_LOGS);
        assert_eq!(state.logs.front().map(String::as_str), Some("line 10"));
    }

    #[test]
    fn empty_dataset_has_no_year() {
        let mut state = AppState::new(Arc::new(Dataset::default()));
        assert!(state.year_summary().is_none());
        apply_action(&mut state, Action::NextYear);
        assert_eq!(state.selected_year(), None);
    }
}
