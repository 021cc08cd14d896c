//! End-to-end pipeline tests: load → filter → aggregate/paginate.

use std::collections::BTreeSet;
use std::path::PathBuf;

use expansion_tracker::data::aggregate::{aggregate, Metric};
use expansion_tracker::data::cache::SourceCache;
use expansion_tracker::data::filter::{self, FilterSpec};
use expansion_tracker::data::loader::{ExclusionRule, LoadOptions};
use expansion_tracker::data::model::FieldValue;
use expansion_tracker::data::page::{page, PageState};

const PROJECTS_CSV: &str = "\
Company Name,Host Country,Region,Sector,Project Type,Investment Amount,Project Stage
Acme Robotics,Thailand,Southeast Asia,Manufacturing,Greenfield,120.0,Announced
Bolt Energy,Vietnam,Southeast Asia,Renewable Energy,Expansion,80.5,Operational
Crane Logistics,Thailand,Southeast Asia,Logistics,Greenfield,N/A,Announced
Drift Marine,Japan,East Asia,Manufacturing,Joint Venture,200.0,Under Construction
Everglade Foods,Germany,Europe,Food Processing,Expansion,45.0,Operational
Fathom Semiconductors,Japan,East Asia,Electronics,Greenfield,310.0,Announced
Gale Textiles,Mexico,Latin America,Manufacturing,,15.0,Announced
";

fn write_projects(dir: &tempfile::TempDir) -> PathBuf {
    let path = dir.path().join("projects.csv");
    std::fs::write(&path, PROJECTS_CSV).unwrap();
    path
}

fn one_of(values: &[&str]) -> BTreeSet<FieldValue> {
    values
        .iter()
        .map(|v| FieldValue::String(v.to_string()))
        .collect()
}

#[test]
fn seven_rows_filtered_to_thailand_fit_one_page() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_projects(&dir);

    let mut cache = SourceCache::new();
    let table = cache.load(&path, &LoadOptions::default()).unwrap();
    assert_eq!(table.len(), 7);

    let mut spec = FilterSpec::new("company_name");
    spec.set_membership("host_country", one_of(&["Thailand"]));
    let filtered = filter::apply(&table, &spec);
    assert_eq!(filtered.len(), 2);

    // A stale cursor from browsing the unfiltered table self-heals.
    let mut state = PageState::new(3);
    state.current_page = 3;
    let (slice, total) = page(&filtered.records, &mut state);
    assert_eq!(total, 1);
    assert_eq!(state.current_page, 1);

    let names: Vec<String> = slice
        .iter()
        .map(|r| r.get("company_name").to_string())
        .collect();
    assert_eq!(names, vec!["Acme Robotics", "Crane Logistics"]);
}

#[test]
fn repeated_loads_are_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_projects(&dir);

    let options = LoadOptions::default();
    let mut cache = SourceCache::new();
    let first = cache.load(&path, &options).unwrap();
    let second = cache.load(&path, &options).unwrap();
    assert_eq!(*first, *second);

    // Even after invalidation, reparsing yields a structurally identical table.
    cache.invalidate(&path);
    let third = cache.load(&path, &options).unwrap();
    assert_eq!(*first, *third);
}

#[test]
fn lenient_coercion_flows_through_to_sums() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_projects(&dir);

    let mut cache = SourceCache::new();
    let table = cache.load(&path, &LoadOptions::default()).unwrap();

    // Crane Logistics' "N/A" became null and the row survived.
    assert_eq!(table.records[2].get("investment_amount"), &FieldValue::Null);

    // Null counts as 0 in the sum, so Southeast Asia is 120 + 80.5 + 0.
    let result = aggregate(&table, "region", &Metric::Sum("investment_amount".to_string()));
    assert_eq!(
        result.rows[0],
        (FieldValue::String("Southeast Asia".to_string()), 200.5)
    );
}

#[test]
fn counts_group_in_first_seen_order() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_projects(&dir);

    let mut cache = SourceCache::new();
    let table = cache.load(&path, &LoadOptions::default()).unwrap();

    let result = aggregate(&table, "region", &Metric::Count);
    let rows: Vec<(String, f64)> = result
        .rows
        .iter()
        .map(|(k, v)| (k.to_string(), *v))
        .collect();
    assert_eq!(
        rows,
        vec![
            ("Southeast Asia".to_string(), 3.0),
            ("East Asia".to_string(), 2.0),
            ("Europe".to_string(), 1.0),
            ("Latin America".to_string(), 1.0),
        ]
    );
}

#[test]
fn exclusion_rules_shrink_the_table_before_everything_else() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_projects(&dir);

    let options = LoadOptions {
        exclusions: vec![ExclusionRule::RequireValue {
            field: "project_type".to_string(),
        }],
        ..LoadOptions::default()
    };
    let mut cache = SourceCache::new();
    let table = cache.load(&path, &options).unwrap();

    // Gale Textiles has no project type and never enters the pipeline.
    assert_eq!(table.len(), 6);
    assert!(table
        .records
        .iter()
        .all(|r| !r.get("project_type").is_null()));

    let result = aggregate(&table, "region", &Metric::Count);
    assert!(result
        .rows
        .iter()
        .all(|(k, _)| k != &FieldValue::String("Latin America".to_string())));
}

#[test]
fn search_and_membership_compose_over_the_paged_view() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_projects(&dir);

    let mut cache = SourceCache::new();
    let table = cache.load(&path, &LoadOptions::default()).unwrap();

    let mut spec = FilterSpec::new("company_name");
    spec.search = "EN".to_string();
    spec.set_membership("region", one_of(&["Southeast Asia"]));

    let filtered = filter::apply(&table, &spec);
    let names: Vec<String> = filtered
        .records
        .iter()
        .map(|r| r.get("company_name").to_string())
        .collect();
    // Case-insensitive: "Bolt Energy" matches "EN"; Japan's rows are
    // membership-filtered out.
    assert_eq!(names, vec!["Bolt Energy"]);

    let mut state = PageState::new(6);
    let (slice, total) = page(&filtered.records, &mut state);
    assert_eq!((slice.len(), total), (1, 1));
}
