use std::fmt;

/// Result type for healthlens-types operations
pub type Result<T> = std::result::Result<T, ValidationError>;

/// Local selection problems, detected before any request is built
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// No metric selected
    MissingMetric,

    /// Metric identifier outside the known set
    UnknownMetric(String),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::MissingMetric => write!(f, "Please select a metric."),
            ValidationError::UnknownMetric(id) => write!(f, "Unknown metric: {}", id),
        }
    }
}

impl std::error::Error for ValidationError {}
