//! Descriptive statistics and aggregations behind the charts
//!
//! Column aggregates (describe, value counts, crosstabs, group means) run as Polars
//! lazy queries; binning and density estimates for drawing work on plain slices.

use crate::error::{DashboardError, DashboardResult};
use ndarray::Array2;
use polars::prelude::*;
use std::cmp::Ordering;

/// Upper bound on automatically chosen histogram bins
const MAX_AUTO_BINS: usize = 200;

const COUNT: &str = "count";
const ROW: &str = "row";
const COLUMN: &str = "column";
const VALUE: &str = "value";

/// Summary of a numeric column, like a dataframe `describe()`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Describe {
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation; `None` with fewer than two values
    pub std: Option<f64>,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
}

/// Describe the present values of `column`, or `None` if there are none
pub fn describe(frame: &DataFrame, column: &str) -> DashboardResult<Option<Describe>> {
    require(frame, column)?;
    let value = || col(column).cast(DataType::Float64);
    let quartile = |q: f64, name: &str| value().quantile(lit(q), QuantileInterpolOptions::Linear).alias(name);

    let summary = frame
        .clone()
        .lazy()
        .select([
            value().count().cast(DataType::Float64).alias(COUNT),
            value().mean().alias("mean"),
            value().std(1).alias("std"),
            value().min().alias("min"),
            quartile(0.25, "q1"),
            quartile(0.5, "median"),
            quartile(0.75, "q3"),
            value().max().alias("max"),
        ])
        .collect()?;

    let count = scalar(&summary, COUNT)?.unwrap_or(0.0) as usize;
    if count == 0 {
        return Ok(None);
    }
    let get = |name: &str| -> DashboardResult<f64> { Ok(scalar(&summary, name)?.unwrap_or(f64::NAN)) };

    Ok(Some(Describe {
        count,
        mean: get("mean")?,
        std: scalar(&summary, "std")?.filter(|s| count > 1 && s.is_finite()),
        min: get("min")?,
        q1: get("q1")?,
        median: get("median")?,
        q3: get("q3")?,
        max: get("max")?,
    }))
}

/// Mean of the present values of `column`; `None` when it has none
pub fn column_mean(frame: &DataFrame, column: &str) -> DashboardResult<Option<f64>> {
    require(frame, column)?;
    let out = frame
        .clone()
        .lazy()
        .select([col(column).cast(DataType::Float64).mean().alias(VALUE)])
        .collect()?;
    scalar(&out, VALUE)
}

fn require(frame: &DataFrame, column: &str) -> DashboardResult<()> {
    frame
        .column(column)
        .map(|_| ())
        .map_err(|_| DashboardError::MissingColumn(column.to_string()))
}

/// First value of a one-row result column
fn scalar(frame: &DataFrame, name: &str) -> DashboardResult<Option<f64>> {
    Ok(frame.column(name)?.cast(&DataType::Float64)?.f64()?.get(0))
}

/// Quantile of an ascending slice with linear interpolation between ranks
fn quantile(sorted: &[f64], q: f64) -> f64 {
    match sorted.len() {
        0 => f64::NAN,
        1 => sorted[0],
        n => {
            let pos = q.clamp(0.0, 1.0) * (n - 1) as f64;
            let lo = pos.floor() as usize;
            let hi = pos.ceil() as usize;
            sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
        }
    }
}

fn sorted(values: &[f64]) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    sorted
}

/// Order labels numerically when both parse as numbers, otherwise lexically
pub fn compare_labels(a: &str, b: &str) -> Ordering {
    match (a.trim().parse::<f64>(), b.trim().parse::<f64>()) {
        (Ok(x), Ok(y)) => x.total_cmp(&y).then_with(|| a.cmp(b)),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => a.cmp(b),
    }
}

fn sort_labels(labels: &mut [String]) {
    labels.sort_by(|a, b| compare_labels(a, b));
}

/// Occurrences of each present label of `column`, most frequent first
pub fn value_counts(frame: &DataFrame, column: &str) -> DashboardResult<Vec<(String, usize)>> {
    require(frame, column)?;
    let out = frame
        .clone()
        .lazy()
        .select([col(column).cast(DataType::String).alias(ROW)])
        .filter(col(ROW).is_not_null())
        .group_by([col(ROW)])
        .agg([len().cast(DataType::UInt64).alias(COUNT)])
        .collect()?;

    let labels = out.column(ROW)?.str()?;
    let counts = out.column(COUNT)?.u64()?;
    let mut counts: Vec<(String, usize)> = labels
        .into_iter()
        .zip(counts.into_iter())
        .filter_map(|(label, n)| Some((label?.to_string(), n? as usize)))
        .collect();
    counts.sort_by(|(la, a), (lb, b)| b.cmp(a).then_with(|| compare_labels(la, lb)));
    Ok(counts)
}

/// Joint frequency table of two categorical columns
#[derive(Debug, Clone, PartialEq)]
pub struct Crosstab {
    pub rows: Vec<String>,
    pub columns: Vec<String>,
    /// `counts[[r, c]]` counts records labelled `rows[r]` and `columns[c]`
    pub counts: Array2<usize>,
}

impl Crosstab {
    /// Count label pairs of columns `x` and `y`; records with a null on either side are dropped.
    ///
    /// `x` and `y` may name the same column.
    pub fn new(frame: &DataFrame, x: &str, y: &str) -> DashboardResult<Self> {
        require(frame, x)?;
        require(frame, y)?;
        let out = frame
            .clone()
            .lazy()
            .select([
                col(x).cast(DataType::String).alias(ROW),
                col(y).cast(DataType::String).alias(COLUMN),
            ])
            .filter(col(ROW).is_not_null().and(col(COLUMN).is_not_null()))
            .group_by([col(ROW), col(COLUMN)])
            .agg([len().cast(DataType::UInt64).alias(COUNT)])
            .collect()?;

        let cells: Vec<(&str, &str, usize)> = out
            .column(ROW)?
            .str()?
            .into_iter()
            .zip(out.column(COLUMN)?.str()?.into_iter())
            .zip(out.column(COUNT)?.u64()?.into_iter())
            .filter_map(|((r, c), n)| Some((r?, c?, n? as usize)))
            .collect();

        let rows = distinct(cells.iter().map(|(r, _, _)| *r));
        let columns = distinct(cells.iter().map(|(_, c, _)| *c));
        let mut counts: Array2<usize> = Array2::zeros((rows.len(), columns.len()));
        for (r, c, n) in cells {
            counts[[position(&rows, r), position(&columns, c)]] = n;
        }

        Ok(Self {
            rows,
            columns,
            counts,
        })
    }

    /// Each cell as a percentage of its row total
    pub fn row_percentages(&self) -> Array2<f64> {
        let mut pct: Array2<f64> = Array2::zeros(self.counts.dim());
        for (r, row) in self.counts.outer_iter().enumerate() {
            let total: usize = row.sum();
            if total == 0 {
                continue;
            }
            for (c, &n) in row.iter().enumerate() {
                pct[[r, c]] = 100.0 * n as f64 / total as f64;
            }
        }
        pct
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() || self.columns.is_empty()
    }
}

fn distinct<'a>(labels: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut out: Vec<String> = labels.map(str::to_string).collect();
    sort_labels(&mut out);
    out.dedup();
    out
}

fn position(sorted: &[String], label: &str) -> usize {
    sorted.iter().position(|l| l == label).unwrap_or_default()
}

/// Present `numerical` values grouped by the label in `category`
fn by_category(frame: &DataFrame, numerical: &str, category: &str) -> DashboardResult<LazyGroupBy> {
    require(frame, numerical)?;
    require(frame, category)?;
    Ok(frame
        .clone()
        .lazy()
        .select([
            col(category).cast(DataType::String).alias(ROW),
            col(numerical).cast(DataType::Float64).alias(VALUE),
        ])
        .filter(col(ROW).is_not_null().and(col(VALUE).is_not_null()))
        .group_by([col(ROW)]))
}

/// Numeric values per category label, categories in label order
pub fn group_values(frame: &DataFrame, numerical: &str, category: &str) -> DashboardResult<Vec<(String, Vec<f64>)>> {
    let out = by_category(frame, numerical, category)?.agg([col(VALUE)]).collect()?;

    let labels = out.column(ROW)?.str()?;
    let lists = out.column(VALUE)?.list()?;
    let mut groups = Vec::with_capacity(out.height());
    for (label, values) in labels.into_iter().zip(lists.into_iter()) {
        let (Some(label), Some(values)) = (label, values) else {
            continue;
        };
        let values: Vec<f64> = values.f64()?.into_iter().flatten().collect();
        groups.push((label.to_string(), values));
    }
    groups.sort_by(|(a, _), (b, _)| compare_labels(a, b));
    Ok(groups)
}

/// Mean numeric value per category label, categories in label order
pub fn group_means(frame: &DataFrame, numerical: &str, category: &str) -> DashboardResult<Vec<(String, f64)>> {
    let out = by_category(frame, numerical, category)?
        .agg([col(VALUE).mean().alias(VALUE)])
        .collect()?;

    let mut means: Vec<(String, f64)> = out
        .column(ROW)?
        .str()?
        .into_iter()
        .zip(out.column(VALUE)?.f64()?.into_iter())
        .filter_map(|(label, mean)| Some((label?.to_string(), mean?)))
        .collect();
    means.sort_by(|(a, _), (b, _)| compare_labels(a, b));
    Ok(means)
}

/// Five-number summary with Tukey whiskers
#[derive(Debug, Clone, PartialEq)]
pub struct BoxStats {
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    /// Smallest value within 1.5 IQR below `q1`
    pub lower_whisker: f64,
    /// Largest value within 1.5 IQR above `q3`
    pub upper_whisker: f64,
    pub outliers: Vec<f64>,
}

pub fn box_stats(values: &[f64]) -> Option<BoxStats> {
    if values.is_empty() {
        return None;
    }
    let sorted = sorted(values);
    let q1 = quantile(&sorted, 0.25);
    let median = quantile(&sorted, 0.5);
    let q3 = quantile(&sorted, 0.75);
    let iqr = q3 - q1;
    let lo_fence = q1 - 1.5 * iqr;
    let hi_fence = q3 + 1.5 * iqr;

    let inside = || sorted.iter().copied().filter(|v| (lo_fence..=hi_fence).contains(v));
    let lower_whisker = inside().next().unwrap_or(q1);
    let upper_whisker = inside().last().unwrap_or(q3);
    let outliers = sorted
        .iter()
        .copied()
        .filter(|v| !(lo_fence..=hi_fence).contains(v))
        .collect();

    Some(BoxStats {
        q1,
        median,
        q3,
        lower_whisker,
        upper_whisker,
        outliers,
    })
}

/// Equal-width bin counts
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    /// `counts.len() + 1` ascending bin edges
    pub edges: Vec<f64>,
    pub counts: Vec<usize>,
}

impl Histogram {
    /// Bin `values` into `bins` equal-width bins; the last bin is closed on the right.
    ///
    /// A constant column gets a unit-wide range centred on its value.
    pub fn new(values: &[f64], bins: usize) -> Self {
        let bins = bins.max(1);
        let (lo, hi) = padded_range(values);
        let width = (hi - lo) / bins as f64;
        let edges: Vec<f64> = (0..=bins).map(|i| lo + width * i as f64).collect();

        let mut counts = vec![0; bins];
        for &v in values {
            counts[bin_index(v, lo, width, bins)] += 1;
        }

        Self { edges, counts }
    }

    pub fn bin_width(&self) -> f64 {
        match self.edges.as_slice() {
            [first, second, ..] => second - first,
            _ => 1.0,
        }
    }

    pub fn max_count(&self) -> usize {
        self.counts.iter().copied().max().unwrap_or(0)
    }
}

fn padded_range(values: &[f64]) -> (f64, f64) {
    let lo = values.iter().copied().fold(f64::INFINITY, f64::min);
    let hi = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if !lo.is_finite() || !hi.is_finite() {
        (0.0, 1.0)
    } else if lo == hi {
        (lo - 0.5, hi + 0.5)
    } else {
        (lo, hi)
    }
}

fn bin_index(v: f64, lo: f64, width: f64, bins: usize) -> usize {
    (((v - lo) / width).floor().max(0.0) as usize).min(bins - 1)
}

/// Bin count from the larger of the Sturges and Freedman-Diaconis estimates
pub fn auto_bin_count(values: &[f64]) -> usize {
    let n = values.len();
    if n < 2 {
        return 1;
    }
    let sorted = sorted(values);
    let range = sorted[n - 1] - sorted[0];
    if range == 0.0 {
        return 1;
    }

    let sturges_width = range / ((n as f64).log2() + 1.0);
    let iqr = quantile(&sorted, 0.75) - quantile(&sorted, 0.25);
    let fd_width = 2.0 * iqr / (n as f64).cbrt();
    let width = if fd_width > 0.0 {
        fd_width.min(sturges_width)
    } else {
        sturges_width
    };

    ((range / width).ceil() as usize).clamp(1, MAX_AUTO_BINS)
}

/// Gaussian kernel density on `points` evenly spaced samples over the data range,
/// using Scott's bandwidth. `None` when the data has no spread.
pub fn kde(values: &[f64], points: usize) -> Option<Vec<(f64, f64)>> {
    let n = values.len();
    if n < 2 || points < 2 {
        return None;
    }
    let mean = values.iter().sum::<f64>() / n as f64;
    let std = (values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1) as f64).sqrt();
    if std == 0.0 {
        return None;
    }

    let bandwidth = std * (n as f64).powf(-0.2);
    let lo = values.iter().copied().fold(f64::INFINITY, f64::min);
    let hi = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let step = (hi - lo) / (points - 1) as f64;
    let norm = 1.0 / (n as f64 * bandwidth * (2.0 * std::f64::consts::PI).sqrt());

    let curve = (0..points)
        .map(|i| {
            let x = lo + step * i as f64;
            let density: f64 = values
                .iter()
                .map(|v| (-0.5 * ((x - v) / bandwidth).powi(2)).exp())
                .sum();
            (x, density * norm)
        })
        .collect();
    Some(curve)
}

/// Two-dimensional bin counts over paired observations
#[derive(Debug, Clone, PartialEq)]
pub struct DensityGrid {
    pub x_edges: Vec<f64>,
    pub y_edges: Vec<f64>,
    /// `counts[[ix, iy]]`
    pub counts: Array2<usize>,
}

impl DensityGrid {
    /// Bin `pairs` into up to `bins` x `bins` cells; a constant axis collapses to one bin
    pub fn new(pairs: &[(f64, f64)], bins: usize) -> Self {
        let xs: Vec<f64> = pairs.iter().map(|p| p.0).collect();
        let ys: Vec<f64> = pairs.iter().map(|p| p.1).collect();
        let (x_lo, x_hi, x_bins) = axis(&xs, bins);
        let (y_lo, y_hi, y_bins) = axis(&ys, bins);
        let x_width = (x_hi - x_lo) / x_bins as f64;
        let y_width = (y_hi - y_lo) / y_bins as f64;

        let mut counts: Array2<usize> = Array2::zeros((x_bins, y_bins));
        for &(x, y) in pairs {
            let ix = bin_index(x, x_lo, x_width, x_bins);
            let iy = bin_index(y, y_lo, y_width, y_bins);
            counts[[ix, iy]] += 1;
        }

        Self {
            x_edges: (0..=x_bins).map(|i| x_lo + x_width * i as f64).collect(),
            y_edges: (0..=y_bins).map(|i| y_lo + y_width * i as f64).collect(),
            counts,
        }
    }

    pub fn max_count(&self) -> usize {
        self.counts.iter().copied().max().unwrap_or(0)
    }
}

fn axis(values: &[f64], bins: usize) -> (f64, f64, usize) {
    let (lo, hi) = padded_range(values);
    let constant = values.first().is_some_and(|first| values.iter().all(|v| v == first));
    let bins = if constant || values.is_empty() { 1 } else { bins.max(1) };
    (lo, hi, bins)
}

/// `(x, y)` observations where both columns are present
pub fn paired(frame: &DataFrame, x: &str, y: &str) -> DashboardResult<Vec<(f64, f64)>> {
    require(frame, x)?;
    require(frame, y)?;
    let out = frame
        .clone()
        .lazy()
        .select([
            col(x).cast(DataType::Float64).alias(ROW),
            col(y).cast(DataType::Float64).alias(COLUMN),
        ])
        .filter(col(ROW).is_not_null().and(col(COLUMN).is_not_null()))
        .collect()?;

    let pairs = out
        .column(ROW)?
        .f64()?
        .into_iter()
        .zip(out.column(COLUMN)?.f64()?.into_iter())
        .filter_map(|(a, b)| Some((a?, b?)))
        .filter(|(a, b)| a.is_finite() && b.is_finite())
        .collect();
    Ok(pairs)
}
