//! Headline KPIs computed over the whole loaded table

use crate::data::Dataset;
use crate::error::{DashboardError, DashboardResult};
use crate::stats;
use polars::prelude::BooleanChunked;
use tracing::warn;

/// Purchase outcome flag column
pub const PURCHASE_COLUMN: &str = "ProdTaken";
/// Number of sales follow-ups column
pub const FOLLOWUPS_COLUMN: &str = "NumberOfFollowups";
/// Customer age column
pub const AGE_COLUMN: &str = "Age";

/// The six headline values shown above the charts
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KpiSnapshot {
    pub total: usize,
    pub purchased: usize,
    pub not_purchased: usize,
    /// Percentage, rounded to two decimals
    pub conversion_rate: f64,
    /// `None` when no purchaser has a follow-up count
    pub avg_followups: Option<u64>,
    /// `None` when the table has no ages
    pub avg_age: Option<u64>,
}

/// Computes KPIs on demand from a dataset; nothing is cached
pub struct KpiAggregator<'a> {
    dataset: &'a Dataset,
}

impl<'a> KpiAggregator<'a> {
    pub fn new(dataset: &'a Dataset) -> Self {
        Self { dataset }
    }

    pub fn total_count(&self) -> usize {
        self.dataset.height()
    }

    /// Number of rows whose purchase flag is set
    pub fn purchased_count(&self) -> DashboardResult<usize> {
        Ok(self.purchase_flags()?.into_iter().filter(|&p| p).count())
    }

    pub fn not_purchased_count(&self) -> DashboardResult<usize> {
        Ok(self.total_count() - self.purchased_count()?)
    }

    /// Purchased share of all rows as a percentage rounded to two decimals
    ///
    /// # Errors
    /// * `InsufficientData` on an empty table
    pub fn conversion_rate(&self) -> DashboardResult<f64> {
        let total = self.total_count();
        if total == 0 {
            return Err(DashboardError::InsufficientData(
                "conversion rate needs at least one record".to_string(),
            ));
        }
        let purchased = self.purchased_count()?;
        Ok(round_to_cents(100.0 * purchased as f64 / total as f64))
    }

    /// Mean follow-up count among purchasers, rounded up
    pub fn avg_followups_among_purchasers(&self) -> DashboardResult<u64> {
        let mask: BooleanChunked = self.purchase_flags()?.into_iter().collect();
        let purchasers = self.dataset.frame().filter(&mask)?;

        let avg = stats::column_mean(&purchasers, FOLLOWUPS_COLUMN)?.ok_or_else(|| {
            DashboardError::InsufficientData("no purchasers with follow-up counts".to_string())
        })?;
        Ok(avg.ceil() as u64)
    }

    /// Mean age, rounded half to even
    pub fn avg_age(&self) -> DashboardResult<u64> {
        let avg = stats::column_mean(self.dataset.frame(), AGE_COLUMN)?
            .ok_or_else(|| DashboardError::InsufficientData("no age values".to_string()))?;
        Ok(avg.round_ties_even() as u64)
    }

    /// All six KPIs at once
    ///
    /// # Errors
    /// * `InsufficientData` on an empty table
    /// * `MissingColumn` if the purchase flag column is absent
    pub fn snapshot(&self) -> DashboardResult<KpiSnapshot> {
        let conversion_rate = self.conversion_rate()?;
        let purchased = self.purchased_count()?;
        let total = self.total_count();

        Ok(KpiSnapshot {
            total,
            purchased,
            not_purchased: total - purchased,
            conversion_rate,
            avg_followups: optional(self.avg_followups_among_purchasers())?,
            avg_age: optional(self.avg_age())?,
        })
    }

    fn purchase_flags(&self) -> DashboardResult<Vec<bool>> {
        let labels = self.dataset.labels(PURCHASE_COLUMN)?;
        Ok(labels
            .iter()
            .map(|label| label.as_deref().is_some_and(is_purchase))
            .collect())
    }
}

/// `1`, `1.0`, `true` and `yes` mark a purchase
fn is_purchase(label: &str) -> bool {
    let label = label.trim();
    match label.parse::<f64>() {
        Ok(v) => v != 0.0,
        Err(_) => label.eq_ignore_ascii_case("true") || label.eq_ignore_ascii_case("yes"),
    }
}

/// Two decimals, halves to even
fn round_to_cents(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}

/// Secondary KPIs degrade to `None` instead of failing the snapshot
fn optional(result: DashboardResult<u64>) -> DashboardResult<Option<u64>> {
    match result {
        Ok(v) => Ok(Some(v)),
        Err(DashboardError::InsufficientData(_)) => Ok(None),
        Err(DashboardError::MissingColumn(name)) => {
            warn!(column = %name, "KPI column missing");
            Ok(None)
        }
        Err(e) => Err(e),
    }
}
