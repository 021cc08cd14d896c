use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

// ---------------------------------------------------------------------------
// FieldValue – a single cell in a project record
// ---------------------------------------------------------------------------

/// A dynamically-typed cell value.
/// Using `BTreeMap` / `BTreeSet` downstream so `FieldValue` must be `Ord`.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    String(String),
    Number(f64),
    /// ISO-8601 date string kept as text for simplicity.
    Date(String),
    Null,
}

// -- Manual Eq/Ord so we can put FieldValue in BTreeSet --

impl Eq for FieldValue {}

impl PartialOrd for FieldValue {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FieldValue {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        use FieldValue::*;
        fn discriminant(v: &FieldValue) -> u8 {
            match v {
                Null => 0,
                Number(_) => 1,
                String(_) => 2,
                Date(_) => 3,
            }
        }
        let da = discriminant(self);
        let db = discriminant(other);
        if da != db {
            return da.cmp(&db);
        }
        match (self, other) {
            (Null, Null) => std::cmp::Ordering::Equal,
            (Number(a), Number(b)) => a.total_cmp(b),
            (String(a), String(b)) | (Date(a), Date(b)) => a.cmp(b),
            _ => std::cmp::Ordering::Equal,
        }
    }
}

impl std::hash::Hash for FieldValue {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            FieldValue::String(s) | FieldValue::Date(s) => s.hash(state),
            FieldValue::Number(f) => f.to_bits().hash(state),
            FieldValue::Null => {}
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::String(s) => write!(f, "{s}"),
            FieldValue::Number(v) => {
                if v.fract() == 0.0 && v.abs() < 1e15 {
                    write!(f, "{v:.0}")
                } else {
                    write!(f, "{v}")
                }
            }
            FieldValue::Date(d) => write!(f, "{d}"),
            FieldValue::Null => write!(f, "<null>"),
        }
    }
}

impl FieldValue {
    /// Try to interpret the value as an `f64` for metric sums.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Number(v) => Some(*v),
            _ => None,
        }
    }

    /// Whether the cell holds no value.
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }
}

// ---------------------------------------------------------------------------
// Field-name canonicalization
// ---------------------------------------------------------------------------

/// Canonical form of a raw column header: trimmed, lower-cased, runs of
/// internal whitespace replaced with a single underscore.  All downstream
/// lookups are exact matches on this form.
pub fn normalize_field_name(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut pending_sep = false;
    for ch in raw.trim().chars() {
        if ch.is_whitespace() {
            pending_sep = true;
            continue;
        }
        if pending_sep && !out.is_empty() {
            out.push('_');
        }
        pending_sep = false;
        for lc in ch.to_lowercase() {
            out.push(lc);
        }
    }
    out
}

// ---------------------------------------------------------------------------
// ProjectRecord – one row of the dataset
// ---------------------------------------------------------------------------

/// A single project (one row of the source table).
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectRecord {
    /// Canonical field name → value.
    pub fields: BTreeMap<String, FieldValue>,
}

impl ProjectRecord {
    /// Value of a field, `Null` when the record does not carry it.
    pub fn get(&self, field: &str) -> &FieldValue {
        self.fields.get(field).unwrap_or(&FieldValue::Null)
    }
}

// ---------------------------------------------------------------------------
// ProjectTable – the complete loaded dataset
// ---------------------------------------------------------------------------

/// The full parsed dataset with pre-computed column indices.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectTable {
    /// All projects (rows), in source order.
    pub records: Vec<ProjectRecord>,
    /// Ordered list of canonical column names (union across records).
    pub column_names: Vec<String>,
    /// For each column the sorted set of unique non-null values.
    pub unique_values: BTreeMap<String, BTreeSet<FieldValue>>,
}

impl ProjectTable {
    /// Build column indices from the loaded records.  Records missing a
    /// column of the union schema get an explicit `Null` for it, so every
    /// record carries the full schema.  Nulls are left out of
    /// `unique_values`: they are never offered as filter choices.
    pub fn from_records(mut records: Vec<ProjectRecord>) -> Self {
        let mut column_names_set: BTreeSet<String> = BTreeSet::new();
        let mut unique_values: BTreeMap<String, BTreeSet<FieldValue>> = BTreeMap::new();

        for rec in &records {
            for (col, val) in &rec.fields {
                column_names_set.insert(col.clone());
                if !val.is_null() {
                    unique_values
                        .entry(col.clone())
                        .or_default()
                        .insert(val.clone());
                }
            }
        }
        let column_names: Vec<String> = column_names_set.into_iter().collect();

        for rec in &mut records {
            for col in &column_names {
                rec.fields
                    .entry(col.clone())
                    .or_insert(FieldValue::Null);
            }
        }

        ProjectTable {
            records,
            column_names,
            unique_values,
        }
    }

    /// Number of projects.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Count of distinct non-null values in a column.
    pub fn unique_count(&self, column: &str) -> usize {
        self.unique_values.get(column).map_or(0, |s| s.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(pairs: &[(&str, FieldValue)]) -> ProjectRecord {
        ProjectRecord {
            fields: pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect(),
        }
    }

    #[test]
    fn normalize_trims_lowercases_and_joins_spaces() {
        assert_eq!(normalize_field_name("  Host Country "), "host_country");
        assert_eq!(normalize_field_name("Investment   Amount"), "investment_amount");
        assert_eq!(normalize_field_name("region"), "region");
        assert_eq!(normalize_field_name("Summary  of\tProject"), "summary_of_project");
    }

    #[test]
    fn union_schema_backfills_nulls() {
        let table = ProjectTable::from_records(vec![
            rec(&[("region", FieldValue::String("Asia".into()))]),
            rec(&[("sector", FieldValue::String("Energy".into()))]),
        ]);
        assert_eq!(table.column_names, vec!["region".to_string(), "sector".to_string()]);
        assert_eq!(table.records[0].get("sector"), &FieldValue::Null);
        assert_eq!(table.records[1].get("region"), &FieldValue::Null);
    }

    #[test]
    fn unique_values_exclude_null() {
        let table = ProjectTable::from_records(vec![
            rec(&[("region", FieldValue::String("Asia".into()))]),
            rec(&[("region", FieldValue::Null)]),
            rec(&[("region", FieldValue::String("Asia".into()))]),
        ]);
        let vals = table.unique_values.get("region").unwrap();
        assert_eq!(vals.len(), 1);
        assert!(vals.contains(&FieldValue::String("Asia".into())));
        assert_eq!(table.unique_count("region"), 1);
    }

    #[test]
    fn number_display_drops_integral_fraction() {
        assert_eq!(FieldValue::Number(120.0).to_string(), "120");
        assert_eq!(FieldValue::Number(12.5).to_string(), "12.5");
    }
}
