//! Column classification into numerical and categorical sets

use polars::prelude::*;
use std::fmt;

/// Columns stored as numbers that are analysed as discrete categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ForceCategorical {
    CityTier,
    ProdTaken,
    NumberOfPersonVisiting,
    OwnCar,
    NumberOfFollowups,
    PreferredPropertyStar,
    NumberOfTrips,
    NumberOfChildrenVisiting,
    Passport,
    PitchSatisfactionScore,
}

impl ForceCategorical {
    /// Default override list, in dataset order
    pub const ALL: [ForceCategorical; 10] = [
        ForceCategorical::CityTier,
        ForceCategorical::ProdTaken,
        ForceCategorical::NumberOfPersonVisiting,
        ForceCategorical::OwnCar,
        ForceCategorical::NumberOfFollowups,
        ForceCategorical::PreferredPropertyStar,
        ForceCategorical::NumberOfTrips,
        ForceCategorical::NumberOfChildrenVisiting,
        ForceCategorical::Passport,
        ForceCategorical::PitchSatisfactionScore,
    ];

    /// Header name of the column in the input file
    pub fn column_name(self) -> &'static str {
        match self {
            ForceCategorical::CityTier => "CityTier",
            ForceCategorical::ProdTaken => "ProdTaken",
            ForceCategorical::NumberOfPersonVisiting => "NumberOfPersonVisiting",
            ForceCategorical::OwnCar => "OwnCar",
            ForceCategorical::NumberOfFollowups => "NumberOfFollowups",
            ForceCategorical::PreferredPropertyStar => "PreferredPropertyStar",
            ForceCategorical::NumberOfTrips => "NumberOfTrips",
            ForceCategorical::NumberOfChildrenVisiting => "NumberOfChildrenVisiting",
            ForceCategorical::Passport => "Passport",
            ForceCategorical::PitchSatisfactionScore => "PitchSatisfactionScore",
        }
    }

    pub fn matches(self, name: &str) -> bool {
        self.column_name() == name
    }
}

/// Analysis kind of a column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnKind {
    Numerical,
    Categorical,
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnKind::Numerical => write!(f, "numerical"),
            ColumnKind::Categorical => write!(f, "categorical"),
        }
    }
}

/// Disjoint numerical/categorical partition of a table's columns, in table order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnSets {
    pub numerical: Vec<String>,
    pub categorical: Vec<String>,
}

impl ColumnSets {
    /// Partition the columns of `frame`.
    ///
    /// A column is categorical when it appears in `overrides` or its storage type is not
    /// numeric; every other column is numerical. Overrides naming absent columns are ignored.
    pub fn classify(frame: &DataFrame, overrides: &[ForceCategorical]) -> Self {
        let mut sets = ColumnSets::default();

        for series in frame.get_columns() {
            let name = series.name();
            let forced = overrides.iter().any(|o| o.matches(name));

            if !forced && series.dtype().is_numeric() {
                sets.numerical.push(name.to_string());
            } else {
                sets.categorical.push(name.to_string());
            }
        }

        sets
    }

    pub fn columns(&self, kind: ColumnKind) -> &[String] {
        match kind {
            ColumnKind::Numerical => &self.numerical,
            ColumnKind::Categorical => &self.categorical,
        }
    }

    pub fn kind_of(&self, name: &str) -> Option<ColumnKind> {
        if self.numerical.iter().any(|c| c == name) {
            Some(ColumnKind::Numerical)
        } else if self.categorical.iter().any(|c| c == name) {
            Some(ColumnKind::Categorical)
        } else {
            None
        }
    }

    pub fn len(&self) -> usize {
        self.numerical.len() + self.categorical.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_frame() -> DataFrame {
        df!(
            "Age" => &[41.0, 49.0, 37.0],
            "CityTier" => &[3i64, 1, 1],
            "ProdTaken" => &[1i64, 0, 1],
            "MonthlyIncome" => &[20993i64, 20130, 17090],
            "Occupation" => &["Salaried", "Salaried", "Free Lancer"]
        )
        .unwrap()
    }

    #[test]
    fn test_classify_partitions_columns() {
        let frame = sample_frame();
        let sets = ColumnSets::classify(&frame, &ForceCategorical::ALL);

        assert_eq!(sets.numerical, vec!["Age", "MonthlyIncome"]);
        assert_eq!(sets.categorical, vec!["CityTier", "ProdTaken", "Occupation"]);

        // disjoint and exhaustive
        assert!(sets.numerical.iter().all(|c| !sets.categorical.contains(c)));
        assert_eq!(sets.len(), frame.width());
    }

    #[test]
    fn test_classify_without_overrides_uses_storage_type() {
        let sets = ColumnSets::classify(&sample_frame(), &[]);
        assert_eq!(sets.numerical, vec!["Age", "CityTier", "ProdTaken", "MonthlyIncome"]);
        assert_eq!(sets.categorical, vec!["Occupation"]);
    }

    #[test]
    fn test_absent_override_column_is_skipped() {
        // most of the override list is missing from this frame
        let frame = df!(
            "Age" => &[30.0, 40.0],
            "Passport" => &[0i64, 1]
        )
        .unwrap();

        let sets = ColumnSets::classify(&frame, &ForceCategorical::ALL);
        assert_eq!(sets.numerical, vec!["Age"]);
        assert_eq!(sets.categorical, vec!["Passport"]);
        assert_eq!(sets.kind_of("Passport"), Some(ColumnKind::Categorical));
        assert_eq!(sets.kind_of("CityTier"), None);
    }

    #[test]
    fn test_column_names_round_trip() {
        for entry in ForceCategorical::ALL {
            assert!(entry.matches(entry.column_name()));
        }
        assert_eq!(ColumnKind::Numerical.to_string(), "numerical");
    }
}
