//! Entity-targeted sentiment over free text.
//!
//! Two pretrained artifacts sit behind this module: an entity recognizer and
//! a binary sentiment classifier. Both are loaded once and then only read.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};

use crate::country_map;
use crate::error::{DashResult, DashboardError};

pub const POSITIVE: &str = "POSITIVE";
pub const NEGATIVE: &str = "NEGATIVE";
pub const NEUTRAL: &str = "NEUTRAL";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entity {
    pub word: String,
    pub label: String,
    pub start: usize,
    pub end: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassLabel {
    pub label: String,
    pub score: f32,
}

pub trait EntityRecognizer: Send + Sync {
    fn recognize(&self, text: &str) -> Vec<Entity>;
}

pub trait SentimentClassifier: Send + Sync {
    fn classify(&self, text: &str) -> ClassLabel;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SentimentLabel {
    Positive(String),
    Negative(String),
    Neutral(String),
    NoSentimentDetected(String),
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SentimentLabel::Positive(t) => write!(f, "Positive sentiment for {t}"),
            SentimentLabel::Negative(t) => write!(f, "Negative sentiment for {t}"),
            SentimentLabel::Neutral(t) => write!(f, "Neutral sentiment for {t}"),
            SentimentLabel::NoSentimentDetected(t) => write!(f, "No sentiment detected for {t}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelPaths {
    pub ner: PathBuf,
    pub sentiment: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NerEntry {
    pub surface: String,
    #[serde(default = "default_entity_label")]
    pub label: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NerArtifact {
    pub version: u32,
    pub entities: Vec<NerEntry>,
}

/// Dictionary-backed recognizer: reports known surface forms found on word
/// boundaries. On overlap the earliest, then longest, match wins.
#[derive(Debug, Clone)]
pub struct GazetteerRecognizer {
    entries: Vec<NerEntry>,
}

impl GazetteerRecognizer {
    pub fn from_artifact(artifact: NerArtifact) -> Self {
        let mut entries: Vec<NerEntry> = artifact
            .entities
            .into_iter()
            .filter(|e| !e.surface.trim().is_empty())
            .collect();
        entries.sort_by(|a, b| b.surface.len().cmp(&a.surface.len()));
        Self { entries }
    }

    pub fn load(path: &Path) -> DashResult<Self> {
        let artifact: NerArtifact = read_artifact(path)?;
        Ok(Self::from_artifact(artifact))
    }
}

impl EntityRecognizer for GazetteerRecognizer {
    fn recognize(&self, text: &str) -> Vec<Entity> {
        let mut candidates: Vec<(usize, usize, &NerEntry)> = Vec::new();
        for entry in &self.entries {
            for (start, found) in text.match_indices(entry.surface.as_str()) {
                let end = start + found.len();
                if on_word_boundary(text, start, end) {
                    candidates.push((start, end, entry));
                }
            }
        }
        candidates.sort_by(|a, b| a.0.cmp(&b.0).then((b.1 - b.0).cmp(&(a.1 - a.0))));

        let mut out: Vec<Entity> = Vec::new();
        let mut covered_to = 0usize;
        for (start, end, entry) in candidates {
            if !out.is_empty() && start < covered_to {
                continue;
            }
            covered_to = end;
            out.push(Entity {
                word: text[start..end].to_string(),
                label: entry.label.clone(),
                start,
                end,
            });
        }
        out
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LexiconArtifact {
    pub version: u32,
    pub positive: HashMap<String, f32>,
    pub negative: HashMap<String, f32>,
    #[serde(default)]
    pub negations: Vec<String>,
    #[serde(default)]
    pub neutral_band: f32,
}

/// Weighted-lexicon polarity classifier. A negation token flips the sign of
/// the next lexicon hit.
#[derive(Debug, Clone)]
pub struct LexiconClassifier {
    positive: HashMap<String, f32>,
    negative: HashMap<String, f32>,
    negations: HashSet<String>,
    neutral_band: f32,
}

impl LexiconClassifier {
    pub fn from_artifact(artifact: LexiconArtifact) -> Self {
        let lower = |m: HashMap<String, f32>| {
            m.into_iter()
                .map(|(k, v)| (k.to_lowercase(), v.abs()))
                .collect::<HashMap<_, _>>()
        };
        Self {
            positive: lower(artifact.positive),
            negative: lower(artifact.negative),
            negations: artifact
                .negations
                .into_iter()
                .map(|n| n.to_lowercase().replace('\u{2019}', "'"))
                .collect(),
            neutral_band: artifact.neutral_band.max(0.0),
        }
    }

    pub fn load(path: &Path) -> DashResult<Self> {
        let artifact: LexiconArtifact = read_artifact(path)?;
        Ok(Self::from_artifact(artifact))
    }

    pub fn score(&self, text: &str) -> f32 {
        let lower = text.to_lowercase().replace('\u{2019}', "'");
        let mut score = 0.0f32;
        let mut negate = false;
        // Apostrophes stay inside tokens: "didn't" is one token.
        for token in lower.split(|c: char| !(c.is_alphanumeric() || c == '\'')) {
            let token = token.trim_matches('\'');
            if token.is_empty() {
                continue;
            }
            if self.negations.contains(token) {
                negate = true;
                continue;
            }
            let weight = if let Some(w) = self.positive.get(token) {
                *w
            } else if let Some(w) = self.negative.get(token) {
                -*w
            } else {
                continue;
            };
            score += if negate { -weight } else { weight };
            negate = false;
        }
        score
    }
}

impl SentimentClassifier for LexiconClassifier {
    fn classify(&self, text: &str) -> ClassLabel {
        let score = self.score(text);
        let label = if score > self.neutral_band {
            POSITIVE
        } else if score < -self.neutral_band {
            NEGATIVE
        } else {
            NEUTRAL
        };
        ClassLabel {
            label: label.to_string(),
            score: 1.0 / (1.0 + (-score.abs()).exp()),
        }
    }
}

pub struct SentimentAdapter {
    ner: Box<dyn EntityRecognizer>,
    classifier: Box<dyn SentimentClassifier>,
}

impl fmt::Debug for SentimentAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SentimentAdapter").finish_non_exhaustive()
    }
}

impl SentimentAdapter {
    pub fn new(
        ner: impl EntityRecognizer + 'static,
        classifier: impl SentimentClassifier + 'static,
    ) -> Self {
        Self {
            ner: Box::new(ner),
            classifier: Box::new(classifier),
        }
    }

    pub fn load(paths: &ModelPaths) -> DashResult<Self> {
        let ner = GazetteerRecognizer::load(&paths.ner)?;
        let classifier = LexiconClassifier::load(&paths.sentiment)?;
        Ok(Self::new(ner, classifier))
    }

    pub fn infer(&self, text: &str, target_entity: &str) -> SentimentLabel {
        let entities = self.ner.recognize(text);
        if !entities.iter().any(|e| e.word == target_entity) {
            return SentimentLabel::NoSentimentDetected(target_entity.to_string());
        }

        let top = self.classifier.classify(text);
        match top.label.as_str() {
            POSITIVE => SentimentLabel::Positive(target_entity.to_string()),
            NEGATIVE => SentimentLabel::Negative(target_entity.to_string()),
            _ => SentimentLabel::Neutral(target_entity.to_string()),
        }
    }
}

static SHARED: OnceCell<SentimentAdapter> = OnceCell::new();

/// Process-wide adapter. A failed load is not cached, so a later call can
/// retry once the artifacts are in place.
pub fn shared(paths: &ModelPaths) -> DashResult<&'static SentimentAdapter> {
    SHARED.get_or_try_init(|| SentimentAdapter::load(paths))
}

/// Sentiment of `text` towards the team behind `code`.
///
/// The team's display name is appended to the text ("... from India") so
/// the recognizer has the entity to anchor on.
pub fn analyze_team_text(
    adapter: &SentimentAdapter,
    code: &str,
    text: &str,
) -> DashResult<SentimentLabel> {
    if text.trim().is_empty() {
        return Err(DashboardError::InputValidation(
            "No input provided for analysis.".to_string(),
        ));
    }
    let name = country_map::display_name(code);
    let input = format!("{text} from {name}");
    Ok(adapter.infer(&input, name))
}

fn read_artifact<T: serde::de::DeserializeOwned>(path: &Path) -> DashResult<T> {
    let raw = fs::read_to_string(path).map_err(|err| {
        DashboardError::ModelUnavailable(format!("read {}: {err}", path.display()))
    })?;
    serde_json::from_str(&raw).map_err(|err| {
        DashboardError::ModelUnavailable(format!("parse {}: {err}", path.display()))
    })
}

fn on_word_boundary(text: &str, start: usize, end: usize) -> bool {
    let before = text[..start].chars().next_back();
    let after = text[end..].chars().next();
    !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
}

fn default_entity_label() -> String {
    "MISC".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recognizer(words: &[&str]) -> GazetteerRecognizer {
        GazetteerRecognizer::from_artifact(NerArtifact {
            version: 1,
            entities: words
                .iter()
                .map(|w| NerEntry {
                    surface: w.to_string(),
                    label: "LOC".to_string(),
                })
                .collect(),
        })
    }

    fn classifier() -> LexiconClassifier {
        LexiconClassifier::from_artifact(LexiconArtifact {
            version: 1,
            positive: HashMap::from([("brilliant".to_string(), 2.0), ("won".to_string(), 1.0)]),
            negative: HashMap::from([("awful".to_string(), 2.0), ("lost".to_string(), 1.0)]),
            negations: vec!["not".to_string()],
            neutral_band: 0.5,
        })
    }

    #[test]
    fn recognizer_respects_word_boundaries() {
        let ner = recognizer(&["India", "SA"]);
        let found = ner.recognize("Indian fans cheered for India and SAS lost to SA");
        let words: Vec<&str> = found.iter().map(|e| e.word.as_str()).collect();
        assert_eq!(words, vec!["India", "SA"]);
    }

    #[test]
    fn recognizer_prefers_longest_overlap() {
        let ner = recognizer(&["New", "New Zealand"]);
        let found = ner.recognize("New Zealand batted first");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].word, "New Zealand");
        assert_eq!((found[0].start, found[0].end), (0, 11));
    }

    #[test]
    fn negation_flips_next_hit() {
        let clf = classifier();
        assert_eq!(clf.classify("a brilliant knock").label, POSITIVE);
        assert_eq!(clf.classify("not brilliant at all").label, NEGATIVE);
        assert_eq!(clf.classify("they won and lost").label, NEUTRAL);
    }

    #[test]
    fn contracted_negations_match() {
        let clf = LexiconClassifier::from_artifact(LexiconArtifact {
            version: 1,
            positive: HashMap::from([("win".to_string(), 1.0), ("brilliant".to_string(), 2.0)]),
            negative: HashMap::new(),
            negations: vec!["didn't".to_string(), "wasn't".to_string()],
            neutral_band: 0.25,
        });
        assert_eq!(clf.classify("India didn't win").label, NEGATIVE);
        assert_eq!(clf.classify("India didn\u{2019}t win").label, NEGATIVE);
        assert_eq!(clf.score("India wasn't brilliant"), -2.0);
        assert_eq!(clf.classify("'brilliant' said everyone").label, POSITIVE);
    }

    #[test]
    fn label_display_matches_dashboard_text() {
        assert_eq!(
            SentimentLabel::NoSentimentDetected("India".to_string()).to_string(),
            "No sentiment detected for India"
        );
        assert_eq!(
            SentimentLabel::Positive("India".to_string()).to_string(),
            "Positive sentiment for India"
        );
    }
}
