use std::collections::BTreeMap;

use super::model::{FieldValue, ProjectTable};

// ---------------------------------------------------------------------------
// Aggregation – group totals for the summary chart
// ---------------------------------------------------------------------------

/// Summary metric computed per group.
#[derive(Debug, Clone, PartialEq)]
pub enum Metric {
    /// Rows per group.
    Count,
    /// Sum of a numeric field per group; null cells count as 0.
    Sum(String),
}

/// Ordered (group value, metric value) pairs for one grouping field.
/// Group order is first occurrence in the input table, not alphabetical;
/// the chart may re-sort, the aggregator does not.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregationResult {
    pub group_field: String,
    pub rows: Vec<(FieldValue, f64)>,
}

/// Single pass over the table, accumulating one total per distinct value of
/// `group_field`.  Rows whose grouping field is null are dropped: they
/// never form an "(unknown)" bucket.
pub fn aggregate(table: &ProjectTable, group_field: &str, metric: &Metric) -> AggregationResult {
    let mut rows: Vec<(FieldValue, f64)> = Vec::new();
    let mut index: BTreeMap<FieldValue, usize> = BTreeMap::new();

    for rec in &table.records {
        let key = rec.get(group_field);
        if key.is_null() {
            continue;
        }

        let contribution = match metric {
            Metric::Count => 1.0,
            Metric::Sum(field) => rec.get(field).as_f64().unwrap_or(0.0),
        };

        match index.get(key) {
            Some(&i) => rows[i].1 += contribution,
            None => {
                index.insert(key.clone(), rows.len());
                rows.push((key.clone(), contribution));
            }
        }
    }

    AggregationResult {
        group_field: group_field.to_string(),
        rows,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::ProjectRecord;
    use std::collections::BTreeMap;

    fn table(rows: &[(Option<&str>, Option<f64>)]) -> ProjectTable {
        let records = rows
            .iter()
            .map(|(group, amount)| {
                let mut fields = BTreeMap::new();
                fields.insert(
                    "region".to_string(),
                    group.map_or(FieldValue::Null, |g| FieldValue::String(g.to_string())),
                );
                fields.insert(
                    "investment_amount".to_string(),
                    amount.map_or(FieldValue::Null, FieldValue::Number),
                );
                ProjectRecord { fields }
            })
            .collect();
        ProjectTable::from_records(records)
    }

    #[test]
    fn count_preserves_first_seen_order_and_drops_null_group() {
        let t = table(&[
            (Some("A"), None),
            (Some("A"), None),
            (Some("B"), None),
            (None, None),
        ]);
        let result = aggregate(&t, "region", &Metric::Count);
        assert_eq!(
            result.rows,
            vec![
                (FieldValue::String("A".to_string()), 2.0),
                (FieldValue::String("B".to_string()), 1.0),
            ]
        );
    }

    #[test]
    fn first_seen_order_is_not_alphabetical() {
        let t = table(&[(Some("Zeta"), None), (Some("Alpha"), None), (Some("Zeta"), None)]);
        let result = aggregate(&t, "region", &Metric::Count);
        let keys: Vec<String> = result.rows.iter().map(|(k, _)| k.to_string()).collect();
        assert_eq!(keys, vec!["Zeta", "Alpha"]);
    }

    #[test]
    fn sum_treats_null_as_zero() {
        let t = table(&[
            (Some("Asia"), Some(100.0)),
            (Some("Asia"), None),
            (Some("Europe"), Some(40.5)),
        ]);
        let result = aggregate(&t, "region", &Metric::Sum("investment_amount".to_string()));
        assert_eq!(
            result.rows,
            vec![
                (FieldValue::String("Asia".to_string()), 100.0),
                (FieldValue::String("Europe".to_string()), 40.5),
            ]
        );
    }

    #[test]
    fn unknown_group_field_yields_empty_result() {
        let t = table(&[(Some("Asia"), None)]);
        let result = aggregate(&t, "no_such_field", &Metric::Count);
        assert!(result.rows.is_empty());
    }
}
