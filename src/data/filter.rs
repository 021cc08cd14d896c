use std::collections::{BTreeMap, BTreeSet};

use super::model::{FieldValue, ProjectRecord, ProjectTable};

// ---------------------------------------------------------------------------
// FilterSpec – the active search / membership predicates
// ---------------------------------------------------------------------------

/// Declarative filter state.  All active predicates compose with logical
/// AND; an empty search term or an empty membership set is a no-op rather
/// than a constraint.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterSpec {
    /// Case-insensitive substring search term.
    pub search: String,
    /// The field the search term is matched against.
    pub search_field: String,
    /// Per-field allowed-value sets.  A field that is absent, or mapped to
    /// an empty set, does not constrain rows.
    pub membership: BTreeMap<String, BTreeSet<FieldValue>>,
}

impl FilterSpec {
    pub fn new(search_field: impl Into<String>) -> Self {
        FilterSpec {
            search: String::new(),
            search_field: search_field.into(),
            membership: BTreeMap::new(),
        }
    }

    /// Replace the allowed-value set for one field.
    pub fn set_membership(&mut self, field: impl Into<String>, values: BTreeSet<FieldValue>) {
        self.membership.insert(field.into(), values);
    }

    /// Drop all predicates, keeping the configured search field.
    pub fn clear(&mut self) {
        self.search.clear();
        self.membership.clear();
    }

    /// Whether any predicate is currently active.
    pub fn is_active(&self) -> bool {
        !self.search.trim().is_empty() || self.membership.values().any(|s| !s.is_empty())
    }
}

// ---------------------------------------------------------------------------
// Predicate evaluation
// ---------------------------------------------------------------------------

/// Whether one record passes every active predicate.
///
/// * Search: case-insensitive substring containment on the designated
///   field.  A blank term matches everything; a null field never matches a
///   non-empty term.
/// * Membership: the record's value must be in the allowed set.  An empty
///   set is a no-op; a null field never matches an active set.
pub fn matches(record: &ProjectRecord, spec: &FilterSpec) -> bool {
    let term = spec.search.trim();
    if !term.is_empty() {
        let needle = term.to_lowercase();
        let hit = match record.get(&spec.search_field) {
            FieldValue::Null => false,
            value => value.to_string().to_lowercase().contains(&needle),
        };
        if !hit {
            return false;
        }
    }

    for (field, allowed) in &spec.membership {
        if allowed.is_empty() {
            continue;
        }
        match record.get(field) {
            FieldValue::Null => return false,
            value => {
                if !allowed.contains(value) {
                    return false;
                }
            }
        }
    }

    true
}

/// Apply the filter to a table, producing a new table in source row order.
/// Pure and infallible: malformed or absent fields simply fail to match.
pub fn apply(table: &ProjectTable, spec: &FilterSpec) -> ProjectTable {
    let records: Vec<ProjectRecord> = table
        .records
        .iter()
        .filter(|rec| matches(rec, spec))
        .cloned()
        .collect();
    ProjectTable::from_records(records)
}
