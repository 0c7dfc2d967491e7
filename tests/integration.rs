//! Integration tests for TourLens

use std::io::Write;
use tempfile::NamedTempFile;
use tourlens::stats::Crosstab;
use tourlens::{
    render_selection, ColumnKind, DashboardError, Dataset, ForceCategorical, KpiAggregator, Selection,
    SelectionQuery, Session,
};

const HEADER: &str = "CustomerID,ProdTaken,Age,TypeofContact,CityTier,DurationOfPitch,Occupation,Gender,\
NumberOfPersonVisiting,NumberOfFollowups,ProductPitched,PreferredPropertyStar,MaritalStatus,NumberOfTrips,\
Passport,PitchSatisfactionScore,OwnCar,NumberOfChildrenVisiting,Designation,MonthlyIncome";

/// Create a test CSV file shaped like the travel dataset
fn create_test_csv() -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "{HEADER}").unwrap();

    let rows = [
        "200000,1,41.0,Self Enquiry,3,6.0,Salaried,Female,3,3.0,Deluxe,3.0,Single,1.0,1,2,1,0.0,Manager,20993.0",
        "200001,0,49.0,Company Invited,1,14.0,Salaried,Male,3,4.0,Deluxe,4.0,Divorced,2.0,0,3,1,2.0,Manager,20130.0",
        "200002,1,37.0,Self Enquiry,1,8.0,Free Lancer,Male,3,4.0,Basic,3.0,Single,7.0,1,3,0,0.0,Executive,17090.0",
        "200003,0,33.0,Company Invited,1,9.0,Salaried,Female,2,3.0,Basic,3.0,Divorced,2.0,1,5,1,1.0,Executive,17909.0",
        "200004,0,,Self Enquiry,1,8.0,Small Business,Male,2,3.0,Basic,4.0,Divorced,1.0,0,5,1,0.0,Executive,18468.0",
        "200005,1,32.0,Company Invited,1,8.0,Salaried,Male,3,3.0,Basic,3.0,Single,1.0,0,5,1,1.0,Executive,18068.0",
        "200006,0,59.0,Self Enquiry,1,9.0,Small Business,Female,2,2.0,Basic,5.0,Divorced,5.0,1,2,1,1.0,Executive,17670.0",
        "200007,1,30.0,Self Enquiry,1,30.0,Salaried,Male,3,3.0,Basic,3.0,Married,2.0,0,3,0,1.0,Executive,17693.0",
        "200008,1,38.0,Company Invited,1,29.0,Salaried,Male,2,4.0,Standard,3.0,Unmarried,1.0,0,3,0,0.0,Senior Manager,24526.0",
        "200009,0,36.0,Self Enquiry,1,33.0,Small Business,Male,3,3.0,Deluxe,3.0,Divorced,7.0,0,3,1,0.0,Manager,20237.0",
    ];
    for row in rows {
        writeln!(file, "{row}").unwrap();
    }

    file
}

fn create_header_only_csv() -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "{HEADER}").unwrap();
    file
}

fn query(pairs: &[(&str, &str)]) -> SelectionQuery {
    let get = |key: &str| pairs.iter().find(|(k, _)| *k == key).map(|(_, v)| v.to_string());
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
fn test_end_to_end_kpis() {
    let file = create_test_csv();
    let dataset = Dataset::load(file.path()).unwrap();
    assert_eq!(dataset.height(), 10);

    let kpi = KpiAggregator::new(&dataset).snapshot().unwrap();
    assert_eq!(kpi.total, 10);
    assert_eq!(kpi.purchased, 5);
    assert_eq!(kpi.not_purchased, 5);
    assert_eq!(kpi.conversion_rate, 50.0);
    // purchasers' follow-ups: 3, 4, 3, 3, 4 -> mean 3.4 -> 4
    assert_eq!(kpi.avg_followups, Some(4));
    // mean of nine present ages is 355 / 9 = 39.44
    assert_eq!(kpi.avg_age, Some(39));
}

#[test]
fn test_classification_partitions_columns() {
    let file = create_test_csv();
    let dataset = Dataset::load(file.path()).unwrap();
    let sets = dataset.classify();

    assert_eq!(sets.len(), dataset.width());
    for name in &sets.numerical {
        assert!(!sets.categorical.contains(name));
    }
    for entry in ForceCategorical::ALL {
        assert_eq!(sets.kind_of(entry.column_name()), Some(ColumnKind::Categorical));
    }
    for name in ["CustomerID", "Age", "DurationOfPitch", "MonthlyIncome"] {
        assert_eq!(sets.kind_of(name), Some(ColumnKind::Numerical), "{name}");
    }
    assert_eq!(sets.kind_of("Occupation"), Some(ColumnKind::Categorical));
}

#[test]
fn test_every_branch_renders() {
    let file = create_test_csv();
    let dataset = Dataset::load(file.path()).unwrap();
    let sets = dataset.classify();

    let queries = [
        query(&[("column", "MonthlyIncome")]),
        query(&[("variable", "categorical"), ("column", "Occupation")]),
        query(&[("analysis", "bivariate"), ("x", "Age"), ("y", "MonthlyIncome")]),
        query(&[("analysis", "bivariate"), ("relation", "cat_cat"), ("x", "Gender"), ("y", "ProdTaken")]),
        query(&[("analysis", "bivariate"), ("relation", "num_cat"), ("x", "Age"), ("y", "CityTier")]),
    ];

    for q in &queries {
        let selection = Selection::resolve(q, &sets).unwrap();
        let rendered = render_selection(&dataset, &selection).unwrap();
        assert!(rendered.primary.svg.contains("<svg"), "{}", selection.branch());
        assert!(rendered.secondary.svg.contains("<svg"), "{}", selection.branch());
    }
}

#[test]
fn test_same_column_on_both_axes() {
    let file = create_test_csv();
    let dataset = Dataset::load(file.path()).unwrap();

    for q in [
        query(&[("analysis", "bivariate"), ("x", "Age"), ("y", "Age")]),
        query(&[("analysis", "bivariate"), ("relation", "cat_cat"), ("x", "Gender"), ("y", "Gender")]),
    ] {
        let html = Session::new(&dataset, q).render_page().unwrap();
        assert!(html.contains("<svg"));
    }
}

#[test]
fn test_crosstab_rows_sum_to_hundred() {
    let file = create_test_csv();
    let dataset = Dataset::load(file.path()).unwrap();

    let table = Crosstab::new(dataset.frame(), "Gender", "ProdTaken").unwrap();
    assert_eq!(table.rows, vec!["Female".to_string(), "Male".to_string()]);
    assert_eq!(table.columns, vec!["0".to_string(), "1".to_string()]);

    for row in table.row_percentages().rows() {
        assert!((row.sum() - 100.0).abs() < 1e-9);
    }
}

#[test]
fn test_unknown_column_falls_back() {
    let file = create_test_csv();
    let dataset = Dataset::load(file.path()).unwrap();

    let html = Session::new(&dataset, query(&[("column", "NotAColumn")])).render_page().unwrap();
    assert!(html.contains("Histogram + KDE of CustomerID"));
}

#[test]
fn test_missing_override_column_is_skipped() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "ProdTaken,Age,Gender").unwrap();
    writeln!(file, "1,30.0,Male").unwrap();
    writeln!(file, "0,40.0,Female").unwrap();

    let dataset = Dataset::load(file.path()).unwrap();
    let sets = dataset.classify();
    assert_eq!(sets.numerical, vec!["Age".to_string()]);
    assert_eq!(sets.categorical, vec!["ProdTaken".to_string(), "Gender".to_string()]);

    let kpi = KpiAggregator::new(&dataset).snapshot().unwrap();
    assert_eq!(kpi.avg_followups, None);
    assert_eq!(kpi.avg_age, Some(35));
}

#[test]
fn test_empty_table_degrades() {
    let file = create_header_only_csv();
    let dataset = Dataset::load(file.path()).unwrap();
    assert_eq!(dataset.height(), 0);

    let aggregator = KpiAggregator::new(&dataset);
    assert_eq!(aggregator.total_count(), 0);
    assert!(matches!(aggregator.conversion_rate(), Err(DashboardError::InsufficientData(_))));

    let html = Session::new(&dataset, SelectionQuery::default()).render_page().unwrap();
    assert!(html.contains("insufficient data"));
}

#[test]
fn test_missing_file_is_unavailable() {
    let dir = tempfile::tempdir().unwrap();
    let result = Dataset::load(dir.path().join("Traveling_Dataset.csv"));
    assert!(matches!(result, Err(DashboardError::DataUnavailable { .. })));
}
