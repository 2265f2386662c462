use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::sentiment::ModelPaths;

const DEFAULT_DATA_PATH: &str = "data/crick_df_cleaned.csv";
const DEFAULT_NER_MODEL: &str = "models/ner_model.json";
const DEFAULT_SENTIMENT_MODEL: &str = "models/sentiment_model.json";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub data_path: PathBuf,
    pub models: ModelPaths,
    pub export_dir: PathBuf,
    pub warm_cache: bool,
    pub tick_rate: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            models: ModelPaths {
                ner: PathBuf::from(DEFAULT_NER_MODEL),
                sentiment: PathBuf::from(DEFAULT_SENTIMENT_MODEL),
            },
            export_dir: PathBuf::from("."),
            warm_cache: true,
            tick_rate: Duration::from_millis(250),
        }
    }
}

impl AppConfig {
    /// Reads `.env.local` then `.env` (first value wins), then the process
    /// environment.
    pub fn load() -> Self {
        let _ = dotenvy::from_filename(".env.local");
        let _ = dotenvy::from_filename(".env");
        Self::from_env()
    }

    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            data_path: path_env("CWC_DATA_PATH").unwrap_or(defaults.data_path),
            models: ModelPaths {
                ner: path_env("CWC_NER_MODEL").unwrap_or(defaults.models.ner),
                sentiment: path_env("CWC_SENTIMENT_MODEL").unwrap_or(defaults.models.sentiment),
            },
            export_dir: path_env("CWC_EXPORT_DIR").unwrap_or(defaults.export_dir),
            warm_cache: env::var("CWC_WARM_CACHE")
                .ok()
                .map(|val| parse_flag(&val))
                .unwrap_or(defaults.warm_cache),
            tick_rate: Duration::from_millis(
                env::var("CWC_TICK_MS")
                    .ok()
                    .and_then(|val| val.trim().parse::<u64>().ok())
                    .unwrap_or(250)
                    .clamp(50, 2000),
            ),
        }
    }
}

fn path_env(key: &str) -> Option<PathBuf> {
    let val = env::var(key).ok()?;
    let trimmed = val.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(PathBuf::from(trimmed))
}

fn parse_flag(raw: &str) -> bool {
    !matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "0" | "false" | "no" | "off"
    )
}

#[cfg(test)]
mod tests {
    use super::parse_flag;

    #[test]
    fn flag_parsing() {
        assert!(parse_flag("1"));
        assert!(parse_flag("yes"));
        assert!(!parse_flag(" OFF "));
        assert!(!parse_flag("0"));
    }
}
