//! HTML composition for the dashboard page

use crate::kpi::KpiSnapshot;
use crate::schema::{ColumnKind, ColumnSets};
use crate::selection::{AnalysisType, Relationship, Selection, SelectionQuery, VariableType};
use crate::viz::{Rendered, SidePanel, View};

pub const PAGE_TITLE: &str = "Travel Package Purchase Insights Dashboard";

const STYLE: &str = r#"
    * { box-sizing: border-box; }
    body { margin: 0; background: #0e1117; color: #FAFAFA;
           font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Helvetica, Arial, sans-serif; }
    .layout { display: flex; min-height: 100vh; }
    .sidebar { width: 300px; flex-shrink: 0; background: #161b22; padding: 1.5rem 1.2rem; }
    .sidebar label { display: block; font-size: 13px; color: #9aa4b2; margin: 1rem 0 .35rem; }
    .sidebar select { width: 100%; padding: .45rem; background: #0e1117; color: #FAFAFA;
                      border: 1px solid #30363d; border-radius: 8px; }
    .sidebar hr { border: none; border-top: 1px solid #30363d; margin: 1.5rem 0; }
    .main { flex: 1; padding: 2rem; min-width: 0; }
    .header-text { font-size: 32px; font-weight: 700; color: #00C0FF; margin-bottom: 1.5rem; }
    h2 { font-size: 22px; color: #C4C4C4; }
    h4 { margin: .5rem 0; }
    .kpis { display: grid; grid-template-columns: repeat(6, 1fr); gap: 1rem; }
    .kpi-card { background: #1d232f; padding: 18px; border-radius: 16px; text-align: center;
                box-shadow: 0 6px 18px rgba(0,0,0,0.45); }
    .kpi-title { font-size: 13px; color: #9aa4b2; }
    .kpi-value { font-size: 28px; font-weight: 700; }
    .kpi-icon { font-size: 26px; margin-bottom: 6px; }
    .charts { display: grid; grid-template-columns: 1fr 1fr; gap: 1.5rem; }
    .chart svg { width: 100%; height: auto; }
    .summary { background: #1d232f; padding: 15px; border-radius: 10px; line-height: 1.8; font-size: 15px; }
    .notice { background: #2d2416; border: 1px solid #d29922; padding: 1rem; border-radius: 10px; }
    hr.section { border: none; border-top: 1px solid #30363d; margin: 2rem 0; }
"#;

/// Sidebar menu state: what each select shows as chosen
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MenuState {
    pub analysis: AnalysisType,
    pub variable: VariableType,
    pub relation: Relationship,
    pub column: Option<String>,
    pub x: Option<String>,
    pub y: Option<String>,
}

impl MenuState {
    /// Menus reflecting a resolved selection
    pub fn from_selection(selection: &Selection) -> Self {
        let mut state = MenuState {
            analysis: selection.analysis(),
            ..MenuState::default()
        };
        match selection {
            Selection::UnivariateNumerical { column } => {
                state.column = Some(column.clone());
            }
            Selection::UnivariateCategorical { column } => {
                state.variable = VariableType::Categorical;
                state.column = Some(column.clone());
            }
            Selection::NumVsNum { x, y } => {
                state.x = Some(x.clone());
                state.y = Some(y.clone());
            }
            Selection::CatVsCat { x, y } => {
                state.relation = Relationship::CatCat;
                state.x = Some(x.clone());
                state.y = Some(y.clone());
            }
            Selection::NumVsCat { numerical, category } => {
                state.relation = Relationship::NumCat;
                state.x = Some(numerical.clone());
                state.y = Some(category.clone());
            }
        }
        state
    }

    /// Menus echoing the raw query, used when no selection could be resolved
    pub fn from_query(query: &SelectionQuery) -> Self {
        MenuState {
            analysis: query.analysis(),
            variable: query.variable(),
            relation: query.relation(),
            column: query.column.clone(),
            x: query.x.clone(),
            y: query.y.clone(),
        }
    }
}

/// Main-panel body below the KPI row
pub enum Body<'a> {
    Charts(&'a Rendered),
    Notice(String),
}

/// Assemble the full page
pub fn document(kpis: Result<&KpiSnapshot, String>, menus: &MenuState, sets: &ColumnSets, body: Body<'_>) -> String {
    let panel = match &body {
        Body::Charts(rendered) => rendered.panel.as_ref(),
        Body::Notice(_) => None,
    };

    let mut html = String::with_capacity(64 * 1024);
    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"UTF-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n");
    html.push_str(&format!("<title>{}</title>\n", escape(PAGE_TITLE)));
    html.push_str(&format!("<style>{STYLE}</style>\n</head>\n<body>\n<div class=\"layout\">\n"));

    html.push_str(&sidebar(menus, sets, panel));

    html.push_str("<main class=\"main\">\n");
    html.push_str(&format!("<div class=\"header-text\">🧳 {}</div>\n", escape(PAGE_TITLE)));
    html.push_str("<h2>📌 Key Metrics</h2>\n");
    match kpis {
        Ok(snapshot) => html.push_str(&kpi_cards(snapshot)),
        Err(message) => html.push_str(&notice(&message)),
    }
    html.push_str("<hr class=\"section\">\n<h2>📊 EDA Visualization</h2>\n");
    match body {
        Body::Charts(rendered) => html.push_str(&chart_grid(rendered)),
        Body::Notice(message) => html.push_str(&notice(&message)),
    }
    html.push_str("</main>\n</div>\n</body>\n</html>\n");
    html
}

/// The six KPI cards
pub fn kpi_cards(kpi: &KpiSnapshot) -> String {
    let dash = || "—".to_string();
    let cards = [
        ("👥", "Total Customers", kpi.total.to_string()),
        ("🛒", "Purchased", kpi.purchased.to_string()),
        ("❌", "Not Purchased", kpi.not_purchased.to_string()),
        ("📈", "Conversion Rate", format!("{}%", decimal(kpi.conversion_rate))),
        ("📞", "Avg Follow-ups", kpi.avg_followups.map_or_else(dash, |v| v.to_string())),
        ("🎯", "Avg Age", kpi.avg_age.map_or_else(dash, |v| v.to_string())),
    ];

    let mut html = String::from("<div class=\"kpis\">\n");
    for (icon, title, value) in cards {
        html.push_str(&format!(
            "<div class=\"kpi-card\"><div class=\"kpi-icon\">{icon}</div>\
             <div class=\"kpi-title\">{title}</div><div class=\"kpi-value\">{}</div></div>\n",
            escape(&value)
        ));
    }
    html.push_str("</div>\n");
    html
}

fn notice(message: &str) -> String {
    format!("<div class=\"notice\">⚠️ {}</div>\n", escape(message))
}

fn chart_grid(rendered: &Rendered) -> String {
    let cell = |view: &View| {
        format!(
            "<section class=\"chart\"><h4>📍 {}</h4>\n{}\n</section>\n",
            escape(&view.title),
            view.svg
        )
    };
    format!(
        "<div class=\"charts\">\n{}{}</div>\n",
        cell(&rendered.primary),
        cell(&rendered.secondary)
    )
}

fn sidebar(menus: &MenuState, sets: &ColumnSets, panel: Option<&SidePanel>) -> String {
    let mut html = String::from("<aside class=\"sidebar\">\n<form method=\"get\" action=\"/\">\n");

    let analysis: Vec<(&str, &str)> = AnalysisType::ALL.iter().map(|a| (a.as_str(), a.label())).collect();
    html.push_str(&select("Choose EDA Type", "analysis", &analysis, Some(menus.analysis.as_str())));

    match menus.analysis {
        AnalysisType::Univariate => {
            let variables: Vec<(&str, &str)> =
                VariableType::ALL.iter().map(|v| (v.as_str(), v.label())).collect();
            html.push_str(&select("Select Variable Type", "variable", &variables, Some(menus.variable.as_str())));

            let (label, kind) = match menus.variable {
                VariableType::Numerical => ("Select Numerical Column", ColumnKind::Numerical),
                VariableType::Categorical => ("Select Categorical Column", ColumnKind::Categorical),
            };
            html.push_str(&column_select(label, "column", sets.columns(kind), menus.column.as_deref()));
        }
        AnalysisType::Bivariate => {
            let relations: Vec<(&str, &str)> =
                Relationship::ALL.iter().map(|r| (r.as_str(), r.label())).collect();
            html.push_str(&select(
                "Select Variable Relationship",
                "relation",
                &relations,
                Some(menus.relation.as_str()),
            ));

            let (x_label, x_kind, y_label, y_kind) = match menus.relation {
                Relationship::NumNum => (
                    "Select X variable",
                    ColumnKind::Numerical,
                    "Select Y variable",
                    ColumnKind::Numerical,
                ),
                Relationship::CatCat => (
                    "Select X variable",
                    ColumnKind::Categorical,
                    "Select Y variable",
                    ColumnKind::Categorical,
                ),
                Relationship::NumCat => (
                    "Select Numerical Variable",
                    ColumnKind::Numerical,
                    "Select Category Variable",
                    ColumnKind::Categorical,
                ),
            };
            html.push_str(&column_select(x_label, "x", sets.columns(x_kind), menus.x.as_deref()));
            html.push_str(&column_select(y_label, "y", sets.columns(y_kind), menus.y.as_deref()));
        }
    }
    html.push_str("<noscript><button type=\"submit\">Apply</button></noscript>\n</form>\n");

    if let Some(panel) = panel {
        html.push_str("<hr>\n");
        html.push_str(&side_panel(panel));
    }
    html.push_str("</aside>\n");
    html
}

fn column_select(label: &str, name: &str, columns: &[String], chosen: Option<&str>) -> String {
    let options: Vec<(&str, &str)> = columns.iter().map(|c| (c.as_str(), c.as_str())).collect();
    select(label, name, &options, chosen)
}

/// A `<select>` that resubmits the form on change
fn select(label: &str, name: &str, options: &[(&str, &str)], chosen: Option<&str>) -> String {
    let mut html = format!(
        "<label for=\"{name}\">{}</label>\n<select id=\"{name}\" name=\"{name}\" onchange=\"this.form.submit()\">\n",
        escape(label)
    );
    for (value, text) in options {
        let selected = if chosen == Some(*value) { " selected" } else { "" };
        html.push_str(&format!(
            "<option value=\"{}\"{selected}>{}</option>\n",
            escape(value),
            escape(text)
        ));
    }
    html.push_str("</select>\n");
    html
}

/// Sidebar text for the univariate branches
pub fn side_panel(panel: &SidePanel) -> String {
    match panel {
        SidePanel::Summary { column, stats } => {
            let mut html = String::from("<h3>📊 Statistical Summary</h3>\n<div class=\"summary\">\n");
            html.push_str(&format!("<b>Summary of {}</b><br><br>\n", escape(column)));
            match stats {
                Some(d) => {
                    let std = d.std.map_or_else(|| "nan".to_string(), decimal);
                    let rows = [
                        ("Count   ", format!("{}", d.count)),
                        ("Mean    ", decimal(d.mean)),
                        ("Std Dev ", std),
                        ("Min     ", decimal(d.min)),
                        ("Max     ", decimal(d.max)),
                        ("25%     ", decimal(d.q1)),
                        ("Median  ", decimal(d.median)),
                        ("75%     ", decimal(d.q3)),
                    ];
                    for (name, value) in rows {
                        html.push_str(&format!("<b>{name}:</b> {value}<br>\n"));
                    }
                }
                None => html.push_str("No values<br>\n"),
            }
            html.push_str("</div>\n");
            html
        }
        SidePanel::Counts { column, counts } => {
            let mut html = format!("<h3>📊 Count Summary</h3>\n<p><b>{}</b></p>\n", escape(column));
            for (label, n) in counts {
                html.push_str(&format!("<p>{} : {n}</p>\n", escape(label)));
            }
            html
        }
    }
}

/// Round to two decimals and print like a float literal (`60.0`, `18.82`)
pub fn decimal(value: f64) -> String {
    let rounded = (value * 100.0).round() / 100.0;
    if rounded.fract() == 0.0 && rounded.is_finite() {
        format!("{rounded:.1}")
    } else {
        format!("{rounded}")
    }
}

pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
