//! TourLens: exploratory data analysis dashboard for travel package purchases
//!
//! The library loads a customer table with Polars, computes headline KPIs and
//! descriptive statistics, renders SVG charts with plotters and serves them as a
//! single HTML page over axum.

pub mod cli;
pub mod data;
pub mod error;
pub mod kpi;
pub mod page;
pub mod schema;
pub mod selection;
pub mod server;
pub mod session;
pub mod stats;
pub mod viz;

// Re-export public items for easier access
pub use cli::Args;
pub use data::Dataset;
pub use error::{DashboardError, DashboardResult};
pub use kpi::{KpiAggregator, KpiSnapshot};
pub use schema::{ColumnKind, ColumnSets, ForceCategorical};
pub use selection::{AnalysisType, Relationship, Selection, SelectionQuery, VariableType};
pub use server::{router, serve, AppState};
pub use session::Session;
pub use viz::render_selection;

/// Common result type used throughout the application
pub type Result<T> = anyhow::Result<T>;
