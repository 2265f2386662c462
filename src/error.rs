use thiserror::Error;

/// Recoverable failures surfaced by the aggregation and sentiment layers.
///
/// None of these should take the dashboard down: data errors render as
/// "no data", model errors only disable the sentiment panel.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DashboardError {
    #[error("no data: {0}")]
    DataNotFound(String),

    #[error("invalid input: {0}")]
    InputValidation(String),

    #[error("model unavailable: {0}")]
    ModelUnavailable(String),
}

pub type DashResult<T> = std::result::Result<T, DashboardError>;
