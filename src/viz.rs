//! Chart rendering with Plotters' SVG backend
//!
//! Every view is a standalone SVG document returned as a string, ready to be inlined in
//! the dashboard page. Backgrounds are left transparent so the page theme shows through.

use crate::data::Dataset;
use crate::error::{DashboardError, DashboardResult};
use crate::selection::Selection;
use crate::stats::{self, BoxStats, Crosstab, DensityGrid, Describe, Histogram};
use plotters::coord::types::RangedCoordf64;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters::style::{FontDesc, FontFamily, FontStyle};
use std::f64::consts::PI;

/// Pixel size of a single chart
pub const CHART_SIZE: (u32, u32) = (640, 420);

/// Samples along the density curve
const KDE_POINTS: usize = 200;
/// Cells per axis of the two-variable density heatmap
const DENSITY_BINS: usize = 20;
/// Category labels longer than this are shortened on axes
const MAX_LABEL_CHARS: usize = 14;

const TEXT: RGBColor = RGBColor(0xFA, 0xFA, 0xFA);
const MUTED: RGBColor = RGBColor(0x9A, 0xA4, 0xB2);
const AXIS: RGBColor = RGBColor(0x80, 0x80, 0x80);
const GRID: RGBColor = RGBColor(0x2A, 0x30, 0x3C);
const PANEL: RGBColor = RGBColor(0x1D, 0x23, 0x2F);
const HIST_COLOR: RGBColor = RGBColor(0x57, 0xA8, 0xFF);
const BOX_COLOR: RGBColor = RGBColor(0x70, 0xFF, 0x75);

/// Qualitative palette for category colours
const PALETTE: [RGBColor; 10] = [
    RGBColor(0x63, 0x6E, 0xFA),
    RGBColor(0xEF, 0x55, 0x3B),
    RGBColor(0x00, 0xCC, 0x96),
    RGBColor(0xAB, 0x63, 0xFA),
    RGBColor(0xFF, 0xA1, 0x5A),
    RGBColor(0x19, 0xD3, 0xF3),
    RGBColor(0xFF, 0x66, 0x92),
    RGBColor(0xB6, 0xE8, 0x80),
    RGBColor(0xFF, 0x97, 0xFF),
    RGBColor(0xFE, 0xCB, 0x52),
];

/// Sequential scale for heatmaps, dark to bright
const HEAT_STOPS: [(f64, f64, f64); 4] = [
    (13.0, 8.0, 135.0),
    (156.0, 23.0, 158.0),
    (237.0, 121.0, 83.0),
    (240.0, 249.0, 33.0),
];

type Area<'a> = DrawingArea<SVGBackend<'a>, Shift>;
type Chart<'a, 'b> = ChartContext<'a, SVGBackend<'b>, Cartesian2d<RangedCoordf64, RangedCoordf64>>;

/// A titled chart
#[derive(Debug, Clone, PartialEq)]
pub struct View {
    pub title: String,
    pub svg: String,
}

/// Text shown in the sidebar next to the charts
#[derive(Debug, Clone, PartialEq)]
pub enum SidePanel {
    Summary { column: String, stats: Option<Describe> },
    Counts { column: String, counts: Vec<(String, usize)> },
}

/// Everything rendered for one selection
#[derive(Debug, Clone, PartialEq)]
pub struct Rendered {
    pub primary: View,
    pub secondary: View,
    pub panel: Option<SidePanel>,
}

/// Render both views, and the side panel where the branch has one, for a selection
pub fn render_selection(dataset: &Dataset, selection: &Selection) -> DashboardResult<Rendered> {
    let rendered = match selection {
        Selection::UnivariateNumerical { column } => {
            let values = dataset.numeric_values(column)?;
            Rendered {
                primary: View {
                    title: format!("Histogram + KDE of {column}"),
                    svg: histogram_kde(column, &values)?,
                },
                secondary: View {
                    title: format!("Boxplot of {column}"),
                    svg: boxplot(column, &values)?,
                },
                panel: Some(SidePanel::Summary {
                    column: column.clone(),
                    stats: stats::describe(dataset.frame(), column)?,
                }),
            }
        }
        Selection::UnivariateCategorical { column } => {
            let counts = stats::value_counts(dataset.frame(), column)?;
            Rendered {
                primary: View {
                    title: format!("Bar Chart - {column}"),
                    svg: count_bar(column, &counts)?,
                },
                secondary: View {
                    title: format!("Pie Chart - {column}"),
                    svg: count_pie(&counts)?,
                },
                panel: Some(SidePanel::Counts {
                    column: column.clone(),
                    counts,
                }),
            }
        }
        Selection::NumVsNum { x, y } => {
            let pairs = stats::paired(dataset.frame(), x, y)?;
            Rendered {
                primary: View {
                    title: format!("Scatter Plot ({x} vs {y})"),
                    svg: scatter(x, y, &pairs)?,
                },
                secondary: View {
                    title: "Correlation Heat Tile".to_string(),
                    svg: density_heatmap(x, y, &pairs)?,
                },
                panel: None,
            }
        }
        Selection::CatVsCat { x, y } => {
            let table = Crosstab::new(dataset.frame(), x, y)?;
            Rendered {
                primary: View {
                    title: format!("Count Grouped ({x} vs {y})"),
                    svg: grouped_counts(x, y, &table)?,
                },
                secondary: View {
                    title: "Cross Tab (%)".to_string(),
                    svg: crosstab_heatmap(x, y, &table)?,
                },
                panel: None,
            }
        }
        Selection::NumVsCat {
            numerical,
            category,
        } => {
            let groups = stats::group_values(dataset.frame(), numerical, category)?;
            let means = stats::group_means(dataset.frame(), numerical, category)?;
            Rendered {
                primary: View {
                    title: format!("Box Plot ({numerical} across {category})"),
                    svg: category_boxplot(numerical, category, &groups)?,
                },
                secondary: View {
                    title: format!("Mean {numerical} by {category}"),
                    svg: category_means(numerical, category, &means)?,
                },
                panel: None,
            }
        }
    };

    Ok(rendered)
}

/// Draw into a fresh SVG document
fn render(draw: impl FnOnce(&Area<'_>) -> crate::Result<()>) -> DashboardResult<String> {
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, CHART_SIZE).into_drawing_area();
        draw(&root).map_err(|e| DashboardError::Chart(e.to_string()))?;
        root.present().map_err(|e| DashboardError::Chart(e.to_string()))?;
    }
    Ok(svg)
}

/// Histogram with a scaled kernel density curve
pub fn histogram_kde(column: &str, values: &[f64]) -> DashboardResult<String> {
    render(|root| {
        if values.is_empty() {
            return no_data(root);
        }
        let hist = Histogram::new(values, stats::auto_bin_count(values));
        let x_range = hist.edges[0]..hist.edges[hist.edges.len() - 1];
        let bin_width = hist.bin_width();
        let scale = values.len() as f64 * bin_width;
        let curve = stats::kde(values, KDE_POINTS);

        let curve_peak = curve
            .iter()
            .flatten()
            .map(|&(_, d)| d * scale)
            .fold(0.0, f64::max);
        let y_max = (hist.max_count() as f64).max(curve_peak) * 1.1;

        let mut chart = cartesian(root, x_range, 0.0..y_max.max(1.0))?;
        draw_mesh(&mut chart, column, "Count", false, false)?;

        chart.draw_series(hist.counts.iter().enumerate().map(|(i, &n)| {
            Rectangle::new([(hist.edges[i], 0.0), (hist.edges[i + 1], n as f64)], HIST_COLOR.mix(0.75).filled())
        }))?;
        chart.draw_series(hist.counts.iter().enumerate().map(|(i, &n)| {
            Rectangle::new([(hist.edges[i], 0.0), (hist.edges[i + 1], n as f64)], WHITE.stroke_width(1))
        }))?;

        if let Some(curve) = curve {
            chart.draw_series(LineSeries::new(
                curve.into_iter().map(|(x, d)| (x, d * scale)),
                HIST_COLOR.stroke_width(2),
            ))?;
        }
        Ok(())
    })
}

/// Horizontal box plot of one numeric column
pub fn boxplot(column: &str, values: &[f64]) -> DashboardResult<String> {
    render(|root| {
        let Some(summary) = stats::box_stats(values) else {
            return no_data(root);
        };
        let (lo, hi) = padded_bounds(values.iter().copied());

        let mut chart = cartesian(root, lo..hi, -1.0..1.0)?;
        draw_mesh(&mut chart, column, "", false, true)?;
        draw_box(&mut chart, 0.0, 0.4, &summary, BOX_COLOR, false)?;
        Ok(())
    })
}

/// Bar chart of category counts
pub fn count_bar(column: &str, counts: &[(String, usize)]) -> DashboardResult<String> {
    render(|root| {
        if counts.is_empty() {
            return no_data(root);
        }
        let y_max = counts.iter().map(|(_, n)| *n).max().unwrap_or(1) as f64 * 1.1;

        let mut chart = cartesian(root, 0.0..counts.len() as f64, 0.0..y_max)?;
        draw_mesh(&mut chart, column, "count", true, false)?;

        chart.draw_series(counts.iter().enumerate().map(|(i, (_, n))| {
            let x = i as f64;
            Rectangle::new([(x + 0.1, 0.0), (x + 0.9, *n as f64)], PALETTE[0].mix(0.85).filled())
        }))?;

        let labels: Vec<&str> = counts.iter().map(|(l, _)| l.as_str()).collect();
        draw_x_categories(root, &chart, &labels)?;
        Ok(())
    })
}

/// Pie chart of category proportions, with a legend
pub fn count_pie(counts: &[(String, usize)]) -> DashboardResult<String> {
    render(|root| {
        let total: usize = counts.iter().map(|(_, n)| n).sum();
        if total == 0 {
            return no_data(root);
        }

        let (w, h) = CHART_SIZE;
        let center = (w as f64 * 0.38, h as f64 / 2.0);
        let radius = (h as f64 / 2.0) - 24.0;
        let mut start = -PI / 2.0;

        for (i, (_, n)) in counts.iter().enumerate() {
            let share = *n as f64 / total as f64;
            let sweep = share * 2.0 * PI;
            let color = PALETTE[i % PALETTE.len()];

            let steps = ((sweep / 0.04).ceil() as usize).max(2);
            let mut points = vec![(center.0 as i32, center.1 as i32)];
            points.extend((0..=steps).map(|s| {
                let a = start + sweep * s as f64 / steps as f64;
                polar(center, radius, a)
            }));
            root.draw(&Polygon::new(points, color.filled()))?;

            if share >= 0.04 {
                let mid = start + sweep / 2.0;
                root.draw(&Text::new(
                    format!("{:.1}%", share * 100.0),
                    polar(center, radius * 0.68, mid),
                    centered(font(13.0).color(&BLACK)),
                ))?;
            }
            start += sweep;
        }

        // legend
        let legend_x = (w as f64 * 0.76) as i32;
        for (i, (label, _)) in counts.iter().enumerate().take(16) {
            let y = 30 + i as i32 * 22;
            let color = PALETTE[i % PALETTE.len()];
            root.draw(&Rectangle::new([(legend_x, y), (legend_x + 12, y + 12)], color.filled()))?;
            root.draw(&Text::new(short(label), (legend_x + 18, y), font(12.0).color(&TEXT)))?;
        }
        Ok(())
    })
}

/// Scatter plot of paired observations
pub fn scatter(x: &str, y: &str, pairs: &[(f64, f64)]) -> DashboardResult<String> {
    render(|root| {
        if pairs.is_empty() {
            return no_data(root);
        }
        let (x_lo, x_hi) = padded_bounds(pairs.iter().map(|p| p.0));
        let (y_lo, y_hi) = padded_bounds(pairs.iter().map(|p| p.1));

        let mut chart = cartesian(root, x_lo..x_hi, y_lo..y_hi)?;
        draw_mesh(&mut chart, x, y, false, false)?;

        chart.draw_series(
            pairs
                .iter()
                .map(|&point| Circle::new(point, 3, PALETTE[0].mix(0.8).filled())),
        )?;
        Ok(())
    })
}

/// Two-dimensional histogram as coloured tiles
pub fn density_heatmap(x: &str, y: &str, pairs: &[(f64, f64)]) -> DashboardResult<String> {
    render(|root| {
        if pairs.is_empty() {
            return no_data(root);
        }
        let grid = DensityGrid::new(pairs, DENSITY_BINS);
        let x_range = grid.x_edges[0]..grid.x_edges[grid.x_edges.len() - 1];
        let y_range = grid.y_edges[0]..grid.y_edges[grid.y_edges.len() - 1];
        let max = grid.max_count().max(1) as f64;

        let mut chart = cartesian(root, x_range, y_range)?;
        draw_mesh(&mut chart, x, y, false, false)?;

        chart.draw_series(grid.counts.indexed_iter().filter(|(_, n)| **n > 0).map(|((ix, iy), &n)| {
            Rectangle::new(
                [(grid.x_edges[ix], grid.y_edges[iy]), (grid.x_edges[ix + 1], grid.y_edges[iy + 1])],
                heat_color(n as f64 / max).filled(),
            )
        }))?;
        Ok(())
    })
}

/// Counts of `x` categories, one bar per `y` category side by side
pub fn grouped_counts(x: &str, y: &str, table: &Crosstab) -> DashboardResult<String> {
    render(|root| {
        if table.is_empty() {
            return no_data(root);
        }
        let groups = table.columns.len();
        let y_max = table.counts.iter().copied().max().unwrap_or(1) as f64 * 1.1;

        let mut chart = cartesian(root, 0.0..table.rows.len() as f64, 0.0..y_max)?;
        draw_mesh(&mut chart, x, "count", true, false)?;

        let slot = 0.8 / groups as f64;
        for (j, label) in table.columns.iter().enumerate() {
            let color = PALETTE[j % PALETTE.len()];
            chart
                .draw_series(table.counts.column(j).iter().enumerate().map(|(i, &n)| {
                    let x0 = i as f64 + 0.1 + slot * j as f64;
                    Rectangle::new([(x0, 0.0), (x0 + slot, n as f64)], color.filled())
                }))?
                .label(format!("{y}={}", short(label)))
                .legend(move |(lx, ly)| Rectangle::new([(lx, ly - 5), (lx + 10, ly + 5)], color.filled()));
        }

        chart
            .configure_series_labels()
            .background_style(&PANEL.mix(0.85))
            .border_style(&AXIS)
            .label_font(font(12.0).color(&TEXT))
            .position(SeriesLabelPosition::UpperRight)
            .draw()?;

        let labels: Vec<&str> = table.rows.iter().map(String::as_str).collect();
        draw_x_categories(root, &chart, &labels)?;
        Ok(())
    })
}

/// Row-normalised crosstab as an annotated heatmap; first row at the top
pub fn crosstab_heatmap(x: &str, y: &str, table: &Crosstab) -> DashboardResult<String> {
    render(|root| {
        if table.is_empty() {
            return no_data(root);
        }
        let pct = table.row_percentages();
        let n_rows = table.rows.len();
        let n_cols = table.columns.len();

        let mut chart = cartesian(root, 0.0..n_cols as f64, 0.0..n_rows as f64)?;
        draw_mesh(&mut chart, y, x, true, true)?;

        // row r is drawn at band n_rows - 1 - r
        let band = |r: usize| (n_rows - 1 - r) as f64;
        chart.draw_series(pct.indexed_iter().map(|((r, c), &p)| {
            Rectangle::new(
                [(c as f64, band(r)), (c as f64 + 1.0, band(r) + 1.0)],
                heat_color(p / 100.0).filled(),
            )
        }))?;

        if n_rows * n_cols <= 400 {
            for ((r, c), &p) in pct.indexed_iter() {
                let ink = if p > 60.0 { BLACK } else { WHITE };
                let at = chart.backend_coord(&(c as f64 + 0.5, band(r) + 0.5));
                root.draw(&Text::new(format!("{p:.1}"), at, centered(font(12.0).color(&ink))))?;
            }
        }

        let col_labels: Vec<&str> = table.columns.iter().map(String::as_str).collect();
        let row_labels: Vec<&str> = table.rows.iter().rev().map(String::as_str).collect();
        draw_x_categories(root, &chart, &col_labels)?;
        draw_y_categories(root, &chart, &row_labels)?;
        Ok(())
    })
}

/// Vertical box plots of a numeric column, one per category
pub fn category_boxplot(numerical: &str, category: &str, groups: &[(String, Vec<f64>)]) -> DashboardResult<String> {
    render(|root| {
        if groups.is_empty() {
            return no_data(root);
        }
        let (lo, hi) = padded_bounds(groups.iter().flat_map(|(_, v)| v.iter().copied()));

        let mut chart = cartesian(root, 0.0..groups.len() as f64, lo..hi)?;
        draw_mesh(&mut chart, category, numerical, true, false)?;

        for (i, (_, values)) in groups.iter().enumerate() {
            if let Some(summary) = stats::box_stats(values) {
                draw_box(&mut chart, i as f64 + 0.5, 0.3, &summary, PALETTE[0], true)?;
            }
        }

        let labels: Vec<&str> = groups.iter().map(|(l, _)| l.as_str()).collect();
        draw_x_categories(root, &chart, &labels)?;
        Ok(())
    })
}

/// Bar chart of the mean of a numeric column per category
pub fn category_means(numerical: &str, category: &str, means: &[(String, f64)]) -> DashboardResult<String> {
    render(|root| {
        if means.is_empty() {
            return no_data(root);
        }
        let lo = means.iter().map(|(_, m)| *m).fold(0.0, f64::min);
        let hi = means.iter().map(|(_, m)| *m).fold(0.0, f64::max);
        let span = (hi - lo).max(1.0);

        let mut chart = cartesian(root, 0.0..means.len() as f64, (lo - span * 0.05).min(0.0)..hi + span * 0.1)?;
        draw_mesh(&mut chart, category, numerical, true, false)?;

        chart.draw_series(means.iter().enumerate().map(|(i, (_, m))| {
            let x = i as f64;
            Rectangle::new([(x + 0.1, 0.0), (x + 0.9, *m)], PALETTE[0].filled())
        }))?;

        let labels: Vec<&str> = means.iter().map(|(l, _)| l.as_str()).collect();
        draw_x_categories(root, &chart, &labels)?;
        Ok(())
    })
}

fn cartesian<'a, 'b>(
    root: &'a Area<'b>,
    x: std::ops::Range<f64>,
    y: std::ops::Range<f64>,
) -> crate::Result<Chart<'a, 'b>> {
    let chart = ChartBuilder::on(root)
        .margin(14)
        .x_label_area_size(48)
        .y_label_area_size(60)
        .build_cartesian_2d(x, y)?;
    Ok(chart)
}

fn blank(_: &f64) -> String {
    String::new()
}

/// Axes and grid in the dark theme; categorical axes get their labels drawn separately
fn draw_mesh(
    chart: &mut Chart<'_, '_>,
    x_desc: &str,
    y_desc: &str,
    categorical_x: bool,
    categorical_y: bool,
) -> crate::Result<()> {
    let mut mesh = chart.configure_mesh();
    mesh.x_desc(x_desc)
        .y_desc(y_desc)
        .axis_style(&AXIS)
        .bold_line_style(&GRID)
        .light_line_style(&GRID.mix(0.4))
        .label_style(font(12.0).color(&MUTED))
        .axis_desc_style(font(14.0).color(&TEXT));

    if categorical_x {
        mesh.disable_x_mesh().x_label_formatter(&blank);
    }
    if categorical_y {
        mesh.disable_y_mesh().y_label_formatter(&blank);
    }
    mesh.draw()?;
    Ok(())
}

/// Category `i` occupies `[i, i + 1)` on the x axis
fn draw_x_categories(root: &Area<'_>, chart: &Chart<'_, '_>, labels: &[&str]) -> crate::Result<()> {
    let y = chart.y_range().start;
    for (i, label) in labels.iter().enumerate() {
        let (px, py) = chart.backend_coord(&(i as f64 + 0.5, y));
        let style = font(12.0).color(&MUTED).pos(Pos::new(HPos::Center, VPos::Top));
        root.draw(&Text::new(short(label), (px, py + 6), style))?;
    }
    Ok(())
}

/// Category `i` occupies `[i, i + 1)` on the y axis
fn draw_y_categories(root: &Area<'_>, chart: &Chart<'_, '_>, labels: &[&str]) -> crate::Result<()> {
    let x = chart.x_range().start;
    for (i, label) in labels.iter().enumerate() {
        let (px, py) = chart.backend_coord(&(x, i as f64 + 0.5));
        let style = font(12.0).color(&MUTED).pos(Pos::new(HPos::Right, VPos::Center));
        root.draw(&Text::new(short(label), (px - 6, py), style))?;
    }
    Ok(())
}

/// Box, median, whiskers and outliers; `vertical` puts values on the y axis
fn draw_box(
    chart: &mut Chart<'_, '_>,
    center: f64,
    half: f64,
    summary: &BoxStats,
    color: RGBColor,
    vertical: bool,
) -> crate::Result<()> {
    let at = |pos: f64, value: f64| if vertical { (pos, value) } else { (value, pos) };
    let line = |a: (f64, f64), b: (f64, f64)| PathElement::new(vec![a, b], TEXT.stroke_width(1));

    chart.draw_series(std::iter::once(Rectangle::new(
        [at(center - half, summary.q1), at(center + half, summary.q3)],
        color.mix(0.7).filled(),
    )))?;
    chart.draw_series(std::iter::once(Rectangle::new(
        [at(center - half, summary.q1), at(center + half, summary.q3)],
        TEXT.stroke_width(1),
    )))?;

    chart.draw_series([
        line(at(center - half, summary.median), at(center + half, summary.median)),
        line(at(center, summary.q1), at(center, summary.lower_whisker)),
        line(at(center, summary.q3), at(center, summary.upper_whisker)),
        line(at(center - half / 2.0, summary.lower_whisker), at(center + half / 2.0, summary.lower_whisker)),
        line(at(center - half / 2.0, summary.upper_whisker), at(center + half / 2.0, summary.upper_whisker)),
    ])?;

    chart.draw_series(
        summary
            .outliers
            .iter()
            .map(|&v| Circle::new(at(center, v), 3, color.filled())),
    )?;
    Ok(())
}

fn no_data(root: &Area<'_>) -> crate::Result<()> {
    let (w, h) = CHART_SIZE;
    root.draw(&Text::new(
        "No data to display",
        ((w / 2) as i32, (h / 2) as i32),
        centered(font(16.0).color(&MUTED)),
    ))?;
    Ok(())
}

/// Range of `values` with a 5% margin; a single value gets a unit-wide window
fn padded_bounds(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let (lo, hi) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));
    if !lo.is_finite() || !hi.is_finite() {
        return (0.0, 1.0);
    }
    if lo == hi {
        return (lo - 0.5, hi + 0.5);
    }
    let pad = (hi - lo) * 0.05;
    (lo - pad, hi + pad)
}

fn heat_color(t: f64) -> RGBColor {
    let pos = t.clamp(0.0, 1.0) * (HEAT_STOPS.len() - 1) as f64;
    let i = (pos.floor() as usize).min(HEAT_STOPS.len() - 2);
    let f = pos - i as f64;
    let (a, b) = (HEAT_STOPS[i], HEAT_STOPS[i + 1]);
    let mix = |x: f64, y: f64| (x + (y - x) * f).round() as u8;
    RGBColor(mix(a.0, b.0), mix(a.1, b.1), mix(a.2, b.2))
}

fn polar(center: (f64, f64), radius: f64, angle: f64) -> (i32, i32) {
    (
        (center.0 + radius * angle.cos()).round() as i32,
        (center.1 + radius * angle.sin()).round() as i32,
    )
}

fn font(size: f64) -> FontDesc<'static> {
    FontDesc::new(FontFamily::SansSerif, size, FontStyle::Normal)
}

fn centered(style: TextStyle<'static>) -> TextStyle<'static> {
    style.pos(Pos::new(HPos::Center, VPos::Center))
}

fn short(label: &str) -> String {
    if label.chars().count() <= MAX_LABEL_CHARS {
        label.to_string()
    } else {
        let mut s: String = label.chars().take(MAX_LABEL_CHARS - 1).collect();
        s.push('…');
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::df;

    fn counts() -> Vec<(String, usize)> {
        vec![("Basic".to_string(), 5), ("Deluxe".to_string(), 3), ("King".to_string(), 1)]
    }

    #[test]
    fn test_histogram_kde_svg() {
        let svg = histogram_kde("Age", &[25.0, 31.0, 31.0, 40.0, 52.0, 61.0]).unwrap();
        assert!(svg.contains("<svg"));
        assert!(svg.contains("Age"));
        assert!(svg.contains("polyline") || svg.contains("path"));
    }

    #[test]
    fn test_constant_column_renders() {
        assert!(histogram_kde("Flat", &[3.0; 5]).is_ok());
        assert!(boxplot("Flat", &[3.0; 5]).is_ok());
        assert!(scatter("Flat", "Flat", &[(3.0, 3.0); 4]).is_ok());
        assert!(density_heatmap("Flat", "Flat", &[(3.0, 3.0); 4]).is_ok());
    }

    #[test]
    fn test_empty_inputs_show_placeholder() {
        let svg = histogram_kde("Age", &[]).unwrap();
        assert!(svg.contains("No data to display"));
        assert!(count_pie(&[]).unwrap().contains("No data to display"));
        assert!(category_means("Age", "Gender", &[]).unwrap().contains("No data to display"));
    }

    #[test]
    fn test_categorical_charts_label_categories() {
        let bar = count_bar("ProductPitched", &counts()).unwrap();
        assert!(bar.contains("Deluxe"));

        let pie = count_pie(&counts()).unwrap();
        assert!(pie.contains("King"));
        assert!(pie.contains("55.6%"));
    }

    #[test]
    fn test_crosstab_heatmap_annotates_percentages() {
        let frame = df!("X" => &["A", "A", "B"], "Y" => &["0", "1", "1"]).unwrap();
        let table = Crosstab::new(&frame, "X", "Y").unwrap();

        let svg = crosstab_heatmap("X", "Y", &table).unwrap();
        assert!(svg.contains("50.0"));
        assert!(svg.contains("100.0"));
        assert!(grouped_counts("X", "Y", &table).unwrap().contains("Y=1"));
    }

    #[test]
    fn test_category_boxplot_and_means() {
        let groups = vec![
            ("Female".to_string(), vec![20.0, 30.0, 35.0]),
            ("Male".to_string(), vec![25.0, 45.0]),
        ];
        assert!(category_boxplot("Age", "Gender", &groups).unwrap().contains("Female"));

        let means = vec![("Female".to_string(), 28.3), ("Male".to_string(), 35.0)];
        assert!(category_means("Age", "Gender", &means).unwrap().contains("Male"));
    }

    #[test]
    fn test_short_labels() {
        assert_eq!(short("Salaried"), "Salaried");
        assert_eq!(short("Large Business Owner").chars().count(), MAX_LABEL_CHARS);
    }

    #[test]
    fn test_heat_color_endpoints() {
        assert_eq!(heat_color(0.0), RGBColor(13, 8, 135));
        assert_eq!(heat_color(1.0), RGBColor(240, 249, 33));
    }
}
