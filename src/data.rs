//! Dataset loading and column access using Polars

use crate::error::{DashboardError, DashboardResult};
use crate::schema::{ColumnSets, ForceCategorical};
use polars::prelude::*;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Rows scanned before the CSV reader settles on column types
const INFER_SCHEMA_ROWS: usize = 10_000;

/// In-memory record table, immutable after load
#[derive(Debug, Clone)]
pub struct Dataset {
    frame: DataFrame,
    source: PathBuf,
    overrides: Vec<ForceCategorical>,
}

impl Dataset {
    /// Load a CSV file and coerce the default force-categorical columns
    pub fn load(path: impl AsRef<Path>) -> DashboardResult<Self> {
        Self::load_with(path, &ForceCategorical::ALL)
    }

    /// Load a CSV file and coerce the given force-categorical columns
    ///
    /// # Errors
    /// * `DataUnavailable` if the file is missing or cannot be parsed as a table
    pub fn load_with(path: impl AsRef<Path>, overrides: &[ForceCategorical]) -> DashboardResult<Self> {
        let path = path.as_ref();
        let unavailable = |reason: String| DashboardError::DataUnavailable {
            path: path.to_path_buf(),
            reason,
        };

        if !path.is_file() {
            return Err(unavailable("file not found".to_string()));
        }

        let frame = LazyCsvReader::new(path)
            .with_has_header(true)
            .with_infer_schema_length(Some(INFER_SCHEMA_ROWS))
            .finish()
            .and_then(LazyFrame::collect)
            .map_err(|e| unavailable(e.to_string()))?;

        if frame.width() == 0 {
            return Err(unavailable("no columns".to_string()));
        }

        debug!(
            path = %path.display(),
            rows = frame.height(),
            columns = frame.width(),
            "dataset read"
        );

        let mut dataset = Self::from_frame(frame, overrides)?;
        dataset.source = path.to_path_buf();
        Ok(dataset)
    }

    /// Wrap an existing frame, coercing the override columns it contains
    pub fn from_frame(mut frame: DataFrame, overrides: &[ForceCategorical]) -> DashboardResult<Self> {
        for entry in overrides {
            let name = entry.column_name();
            let Ok(series) = frame.column(name) else {
                debug!(column = name, "override column absent, skipping");
                continue;
            };
            let coerced = as_labels(series)?;
            frame.with_column(coerced)?;
        }

        Ok(Self {
            frame,
            source: PathBuf::new(),
            overrides: overrides.to_vec(),
        })
    }

    pub fn frame(&self) -> &DataFrame {
        &self.frame
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Number of records
    pub fn height(&self) -> usize {
        self.frame.height()
    }

    /// Number of columns
    pub fn width(&self) -> usize {
        self.frame.width()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.frame.column(name).is_ok()
    }

    /// Partition this dataset's columns with the overrides it was loaded with
    pub fn classify(&self) -> ColumnSets {
        ColumnSets::classify(&self.frame, &self.overrides)
    }

    /// Column values as floats aligned with rows; nulls, unparsable labels and NaN become `None`
    pub fn numeric_column(&self, name: &str) -> DashboardResult<Vec<Option<f64>>> {
        let values = self.series(name)?.cast(&DataType::Float64)?;
        let values = values
            .f64()?
            .into_iter()
            .map(|v| v.filter(|x| x.is_finite()))
            .collect();
        Ok(values)
    }

    /// Present float values of a column, in row order
    pub fn numeric_values(&self, name: &str) -> DashboardResult<Vec<f64>> {
        Ok(self.numeric_column(name)?.into_iter().flatten().collect())
    }

    /// Column values as labels aligned with rows; nulls become `None`
    pub fn labels(&self, name: &str) -> DashboardResult<Vec<Option<String>>> {
        let labels = self.series(name)?.cast(&DataType::String)?;
        let labels = labels
            .str()?
            .into_iter()
            .map(|v| v.map(str::to_string))
            .collect();
        Ok(labels)
    }

    fn series(&self, name: &str) -> DashboardResult<&Series> {
        self.frame
            .column(name)
            .map_err(|_| DashboardError::MissingColumn(name.to_string()))
    }
}

/// Cast a column to string labels; integral floats lose their trailing `.0`
fn as_labels(series: &Series) -> PolarsResult<Series> {
    if series.dtype().is_float() {
        let floats = series.cast(&DataType::Float64)?;
        let integral = floats.f64()?.into_iter().flatten().all(|v| v.fract() == 0.0);
        if integral {
            return series.cast(&DataType::Int64)?.cast(&DataType::String);
        }
    }
    series.cast(&DataType::String)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::ColumnKind;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_test_csv() -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "CustomerID,ProdTaken,Age,CityTier,PreferredPropertyStar,Occupation,MonthlyIncome").unwrap();
        writeln!(file, "200000,1,41.0,3,3.0,Salaried,20993.0").unwrap();
        writeln!(file, "200001,0,49.0,1,4.0,Salaried,20130.0").unwrap();
        writeln!(file, "200002,1,37.0,1,,Free Lancer,17090.0").unwrap();
        writeln!(file, "200003,0,,1,5.0,Salaried,").unwrap();
        file
    }

    #[test]
    fn test_load_coerces_override_columns() {
        let file = create_test_csv();
        let dataset = Dataset::load(file.path()).unwrap();

        assert_eq!(dataset.height(), 4);
        assert_eq!(dataset.width(), 7);
        assert_eq!(dataset.frame().column("CityTier").unwrap().dtype(), &DataType::String);

        let stars = dataset.labels("PreferredPropertyStar").unwrap();
        assert_eq!(
            stars,
            vec![Some("3".to_string()), Some("4".to_string()), None, Some("5".to_string())]
        );
    }

    #[test]
    fn test_numeric_access_skips_nulls() {
        let file = create_test_csv();
        let dataset = Dataset::load(file.path()).unwrap();

        assert_eq!(dataset.numeric_values("Age").unwrap(), vec![41.0, 49.0, 37.0]);
        // labels of coerced columns still parse as numbers
        assert_eq!(
            dataset.numeric_column("ProdTaken").unwrap(),
            vec![Some(1.0), Some(0.0), Some(1.0), Some(0.0)]
        );
    }

    #[test]
    fn test_classify_loaded_dataset() {
        let file = create_test_csv();
        let sets = Dataset::load(file.path()).unwrap().classify();

        assert_eq!(sets.numerical, vec!["CustomerID", "Age", "MonthlyIncome"]);
        assert_eq!(sets.kind_of("Occupation"), Some(ColumnKind::Categorical));
        assert_eq!(sets.kind_of("ProdTaken"), Some(ColumnKind::Categorical));
    }

    #[test]
    fn test_missing_file_is_data_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let result = Dataset::load(dir.path().join("absent.csv"));
        assert!(matches!(result, Err(DashboardError::DataUnavailable { .. })));
    }

    #[test]
    fn test_missing_column_lookup() {
        let file = create_test_csv();
        let dataset = Dataset::load(file.path()).unwrap();
        assert!(matches!(
            dataset.numeric_values("Nope"),
            Err(DashboardError::MissingColumn(name)) if name == "Nope"
        ));
    }
}
