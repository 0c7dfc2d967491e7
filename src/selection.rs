//! Sidebar selection state and its resolution into a chart branch

use crate::error::{DashboardError, DashboardResult};
use crate::schema::{ColumnKind, ColumnSets};
use serde::Deserialize;
use std::str::FromStr;

/// First sidebar menu
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AnalysisType {
    #[default]
    Univariate,
    Bivariate,
}

impl AnalysisType {
    pub const ALL: [AnalysisType; 2] = [AnalysisType::Univariate, AnalysisType::Bivariate];

    pub fn as_str(self) -> &'static str {
        match self {
            AnalysisType::Univariate => "univariate",
            AnalysisType::Bivariate => "bivariate",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AnalysisType::Univariate => "Univariate Analysis",
            AnalysisType::Bivariate => "Bivariate Analysis",
        }
    }
}

impl FromStr for AnalysisType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL.into_iter().find(|v| v.as_str() == s).ok_or(())
    }
}

/// Second sidebar menu for univariate analysis
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum VariableType {
    #[default]
    Numerical,
    Categorical,
}

impl VariableType {
    pub const ALL: [VariableType; 2] = [VariableType::Numerical, VariableType::Categorical];

    pub fn as_str(self) -> &'static str {
        match self {
            VariableType::Numerical => "numerical",
            VariableType::Categorical => "categorical",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            VariableType::Numerical => "Numerical",
            VariableType::Categorical => "Categorical",
        }
    }
}

impl FromStr for VariableType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL.into_iter().find(|v| v.as_str() == s).ok_or(())
    }
}

/// Second sidebar menu for bivariate analysis
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Relationship {
    #[default]
    NumNum,
    CatCat,
    NumCat,
}

impl Relationship {
    pub const ALL: [Relationship; 3] = [Relationship::NumNum, Relationship::CatCat, Relationship::NumCat];

    pub fn as_str(self) -> &'static str {
        match self {
            Relationship::NumNum => "num_num",
            Relationship::CatCat => "cat_cat",
            Relationship::NumCat => "num_cat",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Relationship::NumNum => "Num vs Num",
            Relationship::CatCat => "Cat vs Cat",
            Relationship::NumCat => "Num vs Cat",
        }
    }
}

impl FromStr for Relationship {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL.into_iter().find(|v| v.as_str() == s).ok_or(())
    }
}

/// Raw sidebar form values; anything missing or unknown falls back to a default
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SelectionQuery {
    pub analysis: Option<String>,
    pub variable: Option<String>,
    pub relation: Option<String>,
    pub column: Option<String>,
    pub x: Option<String>,
    pub y: Option<String>,
}

impl SelectionQuery {
    fn parsed<T: FromStr + Default>(value: &Option<String>) -> T {
        value.as_deref().and_then(|v| v.parse().ok()).unwrap_or_default()
    }

    pub fn analysis(&self) -> AnalysisType {
        Self::parsed(&self.analysis)
    }

    pub fn variable(&self) -> VariableType {
        Self::parsed(&self.variable)
    }

    pub fn relation(&self) -> Relationship {
        Self::parsed(&self.relation)
    }
}

/// The chart branch to render, carrying its resolved columns
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    UnivariateNumerical { column: String },
    UnivariateCategorical { column: String },
    NumVsNum { x: String, y: String },
    CatVsCat { x: String, y: String },
    NumVsCat { numerical: String, category: String },
}

impl Selection {
    /// Resolve the sidebar query against the classified columns.
    ///
    /// Requested columns that are not in the relevant set are replaced by the first column
    /// of that set.
    ///
    /// # Errors
    /// * `NoColumns` if the branch needs a column kind the table does not have
    pub fn resolve(query: &SelectionQuery, sets: &ColumnSets) -> DashboardResult<Self> {
        let pick = |requested: &Option<String>, kind: ColumnKind| -> DashboardResult<String> {
            let options = sets.columns(kind);
            requested
                .as_ref()
                .filter(|name| options.contains(name))
                .or_else(|| options.first())
                .cloned()
                .ok_or(DashboardError::NoColumns(kind))
        };

        let selection = match query.analysis() {
            AnalysisType::Univariate => match query.variable() {
                VariableType::Numerical => Selection::UnivariateNumerical {
                    column: pick(&query.column, ColumnKind::Numerical)?,
                },
                VariableType::Categorical => Selection::UnivariateCategorical {
                    column: pick(&query.column, ColumnKind::Categorical)?,
                },
            },
            AnalysisType::Bivariate => match query.relation() {
                Relationship::NumNum => Selection::NumVsNum {
                    x: pick(&query.x, ColumnKind::Numerical)?,
                    y: pick(&query.y, ColumnKind::Numerical)?,
                },
                Relationship::CatCat => Selection::CatVsCat {
                    x: pick(&query.x, ColumnKind::Categorical)?,
                    y: pick(&query.y, ColumnKind::Categorical)?,
                },
                Relationship::NumCat => Selection::NumVsCat {
                    numerical: pick(&query.x, ColumnKind::Numerical)?,
                    category: pick(&query.y, ColumnKind::Categorical)?,
                },
            },
        };

        Ok(selection)
    }

    pub fn analysis(&self) -> AnalysisType {
        match self {
            Selection::UnivariateNumerical { .. } | Selection::UnivariateCategorical { .. } => {
                AnalysisType::Univariate
            }
            _ => AnalysisType::Bivariate,
        }
    }

    /// Short branch name for logs
    pub fn branch(&self) -> &'static str {
        match self {
            Selection::UnivariateNumerical { .. } => "univariate-numerical",
            Selection::UnivariateCategorical { .. } => "univariate-categorical",
            Selection::NumVsNum { .. } => "num-vs-num",
            Selection::CatVsCat { .. } => "cat-vs-cat",
            Selection::NumVsCat { .. } => "num-vs-cat",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sets() -> ColumnSets {
        ColumnSets {
            numerical: vec!["Age".to_string(), "MonthlyIncome".to_string()],
            categorical: vec!["CityTier".to_string(), "Gender".to_string()],
        }
    }

    fn query(pairs: &[(&str, &str)]) -> SelectionQuery {
        let get = |key: &str| {
            pairs
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.to_string())
        };
        SelectionQuery {
            analysis: get("analysis"),
            variable: get("variable"),
            relation: get("relation"),
            column: get("column"),
            x: get("x"),
            y: get("y"),
        }
    }

    #[test]
    fn test_default_selection() {
        let selection = Selection::resolve(&SelectionQuery::default(), &sets()).unwrap();
        assert_eq!(selection, Selection::UnivariateNumerical { column: "Age".to_string() });
    }

    #[test]
    fn test_each_branch() {
        let s = sets();
        let cases = [
            (
                query(&[("variable", "categorical"), ("column", "Gender")]),
                Selection::UnivariateCategorical { column: "Gender".to_string() },
            ),
            (
                query(&[("analysis", "bivariate"), ("x", "MonthlyIncome"), ("y", "Age")]),
                Selection::NumVsNum { x: "MonthlyIncome".to_string(), y: "Age".to_string() },
            ),
            (
                query(&[("analysis", "bivariate"), ("relation", "cat_cat"), ("x", "Gender"), ("y", "Gender")]),
                Selection::CatVsCat { x: "Gender".to_string(), y: "Gender".to_string() },
            ),
            (
                query(&[("analysis", "bivariate"), ("relation", "num_cat"), ("x", "Age"), ("y", "CityTier")]),
                Selection::NumVsCat { numerical: "Age".to_string(), category: "CityTier".to_string() },
            ),
        ];

        for (q, expected) in cases {
            assert_eq!(Selection::resolve(&q, &s).unwrap(), expected);
        }
    }

    #[test]
    fn test_unknown_column_falls_back_to_first() {
        // Gender is categorical, so it is not a valid numerical choice
        let q = query(&[("column", "Gender")]);
        assert_eq!(
            Selection::resolve(&q, &sets()).unwrap(),
            Selection::UnivariateNumerical { column: "Age".to_string() }
        );

        let q = query(&[("analysis", "bivariate"), ("relation", "cat_cat"), ("x", "Dropped")]);
        assert_eq!(
            Selection::resolve(&q, &sets()).unwrap(),
            Selection::CatVsCat { x: "CityTier".to_string(), y: "CityTier".to_string() }
        );
    }

    #[test]
    fn test_unknown_menu_values_use_defaults() {
        let q = query(&[("analysis", "trivariate"), ("variable", "ordinal")]);
        assert_eq!(q.analysis(), AnalysisType::Univariate);
        assert_eq!(q.variable(), VariableType::Numerical);
        assert_eq!(q.relation(), Relationship::NumNum);
    }

    #[test]
    fn test_no_columns_of_kind() {
        let s = ColumnSets {
            numerical: vec![],
            categorical: vec!["Gender".to_string()],
        };
        let result = Selection::resolve(&SelectionQuery::default(), &s);
        assert!(matches!(result, Err(DashboardError::NoColumns(ColumnKind::Numerical))));
    }
}
