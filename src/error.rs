//! Error types for the laundry-analytics library.

use thiserror::Error;

/// Result type alias for analytics operations.
pub type Result<T> = std::result::Result<T, AnalyticsError>;

/// Errors that can occur while loading data or running an analysis.
#[derive(Error, Debug)]
pub enum AnalyticsError {
    /// No order rows matched the given customer identifier.
    #[error("no order data for customer {0}")]
    UnknownCustomer(String),

    /// No order rows matched the given facility identifier.
    #[error("no order data for facility {0}")]
    UnknownFacility(String),

    /// Input data is empty.
    #[error("empty input data")]
    EmptyData,

    /// Insufficient data points for the operation.
    #[error("insufficient data: need at least {needed}, got {got}")]
    InsufficientData { needed: usize, got: usize },

    /// Invalid parameter value.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Dimension mismatch between data structures.
    #[error("dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    /// Model has not been fitted yet.
    #[error("model must be fitted before prediction")]
    FitRequired,

    /// A date field could not be parsed.
    #[error("unparseable date '{value}' in column {column}")]
    DateParse { column: &'static str, value: String },

    /// Computation error (e.g., numerical issues).
    #[error("computation error: {0}")]
    ComputationError(String),

    /// CSV read or decode failure.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// Filesystem failure while reading the dataset or writing reports.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
