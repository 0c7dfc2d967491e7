//! Per-request dashboard context
//!
//! Each interaction rebuilds a [`Session`] from the shared dataset and the sidebar query,
//! then recomputes KPIs, column classes and charts from scratch.

use crate::data::Dataset;
use crate::error::{DashboardError, DashboardResult};
use crate::kpi::{KpiAggregator, KpiSnapshot};
use crate::page::{self, Body, MenuState};
use crate::schema::ColumnSets;
use crate::selection::{Selection, SelectionQuery};
use crate::viz;
use tracing::{debug, warn};

pub struct Session<'a> {
    dataset: &'a Dataset,
    columns: ColumnSets,
    query: SelectionQuery,
}

impl<'a> Session<'a> {
    pub fn new(dataset: &'a Dataset, query: SelectionQuery) -> Self {
        Self {
            dataset,
            columns: dataset.classify(),
            query,
        }
    }

    pub fn columns(&self) -> &ColumnSets {
        &self.columns
    }

    pub fn kpis(&self) -> DashboardResult<KpiSnapshot> {
        KpiAggregator::new(self.dataset).snapshot()
    }

    pub fn selection(&self) -> DashboardResult<Selection> {
        Selection::resolve(&self.query, &self.columns)
    }

    /// Render the full dashboard page.
    ///
    /// Missing KPIs or an unresolvable selection become notices on the page; only chart
    /// failures are returned as errors.
    pub fn render_page(&self) -> DashboardResult<String> {
        let kpis = self.kpis();
        if let Err(e) = &kpis {
            warn!(error = %e, "KPIs unavailable");
        }
        let kpis = kpis.as_ref().map_err(ToString::to_string);

        let html = match self.selection() {
            Ok(selection) => {
                debug!(branch = selection.branch(), "rendering selection");
                let rendered = viz::render_selection(self.dataset, &selection)?;
                page::document(
                    kpis,
                    &MenuState::from_selection(&selection),
                    &self.columns,
                    Body::Charts(&rendered),
                )
            }
            Err(e @ DashboardError::NoColumns(_)) => {
                warn!(error = %e, "no selectable columns");
                page::document(
                    kpis,
                    &MenuState::from_query(&self.query),
                    &self.columns,
                    Body::Notice(e.to_string()),
                )
            }
            Err(e) => return Err(e),
        };

        Ok(html)
    }
}
