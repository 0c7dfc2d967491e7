//! Typed errors for the dashboard library

use crate::schema::ColumnKind;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading, aggregating or rendering the dataset
#[derive(Debug, Error)]
pub enum DashboardError {
    /// The input file is missing, unreadable or not a valid table
    #[error("data unavailable at {}: {reason}", path.display())]
    DataUnavailable { path: PathBuf, reason: String },

    /// A statistic cannot be computed because there are no usable rows
    #[error("insufficient data: {0}")]
    InsufficientData(String),

    /// A column the operation depends on is not in the table
    #[error("column not found: {0}")]
    MissingColumn(String),

    /// The classifier produced no column of the requested kind
    #[error("no {0} columns available")]
    NoColumns(ColumnKind),

    /// Chart backend failure
    #[error("chart rendering failed: {0}")]
    Chart(String),

    #[error(transparent)]
    Polars(#[from] polars::prelude::PolarsError),
}

/// Result alias for library operations that fail with a [`DashboardError`]
pub type DashboardResult<T> = std::result::Result<T, DashboardError>;
