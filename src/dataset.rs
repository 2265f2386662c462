use std::collections::BTreeSet;
use std::fmt;
use std::fs::File;
use std::io;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Deserializer, Serialize};

const MAX_WICKETS: u8 = 10;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MatchCategory {
    League,
    SemiFinal,
    Final,
    Other(String),
}

impl MatchCategory {
    /// Exact-string parse; unknown spellings are kept verbatim.
    pub fn parse(raw: &str) -> Self {
        match raw {
            "League-Match" => MatchCategory::League,
            "Semi-Final" => MatchCategory::SemiFinal,
            "Final" => MatchCategory::Final,
            other => MatchCategory::Other(other.to_string()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            MatchCategory::League => "League-Match",
            MatchCategory::SemiFinal => "Semi-Final",
            MatchCategory::Final => "Final",
            MatchCategory::Other(raw) => raw,
        }
    }
}

impl fmt::Display for MatchCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MatchStatus {
    Played,
    Abandoned,
    Other(String),
}

impl MatchStatus {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "played" => MatchStatus::Played,
            "abandoned" => MatchStatus::Abandoned,
            other => MatchStatus::Other(other.to_string()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            MatchStatus::Played => "played",
            MatchStatus::Abandoned => "abandoned",
            MatchStatus::Other(raw) => raw,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchRecord {
    pub world_cup_year: i32,
    pub match_category: MatchCategory,
    pub team_1: String,
    pub team_2: String,
    pub team_1_runs: u32,
    pub team_2_runs: u32,
    pub team_1_wickets: u8,
    pub team_2_wickets: u8,
    pub venue: String,
    /// `None` when the match has no result.
    pub winning_team: Option<String>,
    pub match_status: MatchStatus,
}

impl MatchRecord {
    pub fn involves(&self, team: &str) -> bool {
        self.team_1 == team || self.team_2 == team
    }

    /// Runs scored by `team`, if it played in this record.
    pub fn runs_for(&self, team: &str) -> Option<u32> {
        if self.team_1 == team {
            Some(self.team_1_runs)
        } else if self.team_2 == team {
            Some(self.team_2_runs)
        } else {
            None
        }
    }

    /// Wickets `team` lost while batting.
    pub fn wickets_lost(&self, team: &str) -> Option<u8> {
        if self.team_1 == team {
            Some(self.team_1_wickets)
        } else if self.team_2 == team {
            Some(self.team_2_wickets)
        } else {
            None
        }
    }

    /// Wickets the opponent lost, i.e. wickets taken by `team`'s bowlers.
    pub fn wickets_taken(&self, team: &str) -> Option<u8> {
        if self.team_1 == team {
            Some(self.team_2_wickets)
        } else if self.team_2 == team {
            Some(self.team_1_wickets)
        } else {
            None
        }
    }

    pub fn opponent(&self, team: &str) -> Option<&str> {
        if self.team_1 == team {
            Some(&self.team_2)
        } else if self.team_2 == team {
            Some(&self.team_1)
        } else {
            None
        }
    }

    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.team_1 == self.team_2 {
            return Err(format!("team_1 and team_2 are both {}", self.team_1));
        }
        if self.team_1_wickets > MAX_WICKETS || self.team_2_wickets > MAX_WICKETS {
            return Err(format!(
                "wickets out of range ({} / {})",
                self.team_1_wickets, self.team_2_wickets
            ));
        }
        if let Some(winner) = &self.winning_team
            && !self.involves(winner)
        {
            return Err(format!(
                "winning_team {winner} is neither {} nor {}",
                self.team_1, self.team_2
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct LoadReport {
    pub rows_read: usize,
    pub rows_loaded: usize,
    pub rejected: Vec<String>,
}

impl LoadReport {
    pub fn is_clean(&self) -> bool {
        self.rejected.is_empty()
    }
}

/// The match table, loaded once and never mutated afterwards.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    records: Vec<MatchRecord>,
}

impl Dataset {
    pub fn from_records(records: Vec<MatchRecord>) -> Self {
        Self { records }
    }

    pub fn load_csv(path: &Path) -> Result<(Self, LoadReport)> {
        let file =
            File::open(path).with_context(|| format!("open dataset {}", path.display()))?;
        Self::from_reader(file).with_context(|| format!("read dataset {}", path.display()))
    }

    pub fn from_reader<R: io::Read>(reader: R) -> Result<(Self, LoadReport)> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut report = LoadReport::default();
        let mut records = Vec::new();
        for (idx, row) in reader.deserialize::<CsvRow>().enumerate() {
            // Header is line 1.
            let line = idx + 2;
            report.rows_read += 1;
            let row = match row {
                Ok(row) => row,
                Err(err) => {
                    report.rejected.push(format!("row {line}: {err}"));
                    continue;
                }
            };
            let record = row.into_record();
            if let Err(reason) = record.validate() {
                report.rejected.push(format!("row {line}: {reason}"));
                continue;
            }
            records.push(record);
        }
        report.rows_loaded = records.len();
        Ok((Self { records }, report))
    }

    pub fn records(&self) -> &[MatchRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn years(&self) -> Vec<i32> {
        self.records
            .iter()
            .map(|r| r.world_cup_year)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn contains_year(&self, year: i32) -> bool {
        self.records.iter().any(|r| r.world_cup_year == year)
    }

    pub fn teams(&self) -> Vec<String> {
        crate::aggregate::unique_teams(&self.records)
    }
}

pub fn write_csv<W: io::Write>(records: &[MatchRecord], writer: W) -> Result<()> {
    let mut writer = csv::Writer::from_writer(writer);
    for record in records {
        writer
            .serialize(CsvRow::from_record(record))
            .context("serialize match row")?;
    }
    writer.flush().context("flush csv writer")?;
    Ok(())
}

#[derive(Debug, Serialize, Deserialize)]
struct CsvRow {
    #[serde(deserialize_with = "whole_number")]
    world_cup_year: i32,
    match_category: String,
    team_1: String,
    team_2: String,
    #[serde(deserialize_with = "whole_number")]
    team_1_runs: u32,
    #[serde(deserialize_with = "whole_number")]
    team_2_runs: u32,
    #[serde(deserialize_with = "whole_number")]
    team_1_wickets: u8,
    #[serde(deserialize_with = "whole_number")]
    team_2_wickets: u8,
    venue: String,
    #[serde(default)]
    winning_team: String,
    match_status: String,
}

impl CsvRow {
    fn into_record(self) -> MatchRecord {
        let winning_team = if is_no_result(&self.winning_team) {
            None
        } else {
            Some(self.winning_team)
        };
        MatchRecord {
            world_cup_year: self.world_cup_year,
            match_category: MatchCategory::parse(&self.match_category),
            team_1: self.team_1,
            team_2: self.team_2,
            team_1_runs: self.team_1_runs,
            team_2_runs: self.team_2_runs,
            team_1_wickets: self.team_1_wickets,
            team_2_wickets: self.team_2_wickets,
            venue: self.venue,
            winning_team,
            match_status: MatchStatus::parse(&self.match_status),
        }
    }

    fn from_record(record: &MatchRecord) -> Self {
        Self {
            world_cup_year: record.world_cup_year,
            match_category: record.match_category.label().to_string(),
            team_1: record.team_1.clone(),
            team_2: record.team_2.clone(),
            team_1_runs: record.team_1_runs,
            team_2_runs: record.team_2_runs,
            team_1_wickets: record.team_1_wickets,
            team_2_wickets: record.team_2_wickets,
            venue: record.venue.clone(),
            winning_team: record.winning_team.clone().unwrap_or_default(),
            match_status: record.match_status.label().to_string(),
        }
    }
}

fn is_no_result(raw: &str) -> bool {
    let lower = raw.trim().to_ascii_lowercase();
    matches!(lower.as_str(), "" | "nr" | "no result" | "tie" | "tied")
}

// The cleaned dataset went through pandas, so counts can show up as "183.0".
fn whole_number<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: TryFrom<i64>,
{
    let value = f64::deserialize(deserializer)?;
    if !value.is_finite() || value.fract() != 0.0 {
        return Err(serde::de::Error::custom(format!(
            "expected a whole number, got {value}"
        )));
    }
    T::try_from(value as i64)
        .map_err(|_| serde::de::Error::custom(format!("number {value} out of range")))
}

#[cfg(test)]
mod tests {
    use super::{MatchCategory, MatchStatus, is_no_result};

    #[test]
    fn category_parse_is_exact() {
        assert_eq!(MatchCategory::parse("Final"), MatchCategory::Final);
        assert_eq!(MatchCategory::parse("League-Match"), MatchCategory::League);
        assert_eq!(
            MatchCategory::parse("final"),
            MatchCategory::Other("final".to_string())
        );
        assert_eq!(MatchCategory::SemiFinal.label(), "Semi-Final");
        assert_eq!(
            MatchCategory::parse("League"),
            MatchCategory::Other("League".to_string())
        );
    }

    #[test]
    fn status_parse_keeps_unknown_values() {
        assert_eq!(MatchStatus::parse("played"), MatchStatus::Played);
        assert_eq!(
            MatchStatus::parse("washed out"),
            MatchStatus::Other("washed out".to_string())
        );
    }

    #[test]
    fn no_result_markers() {
        assert!(is_no_result(""));
        assert!(is_no_result("No Result"));
        assert!(is_no_result("NR"));
        assert!(!is_no_result("AUS"));
    }
}
