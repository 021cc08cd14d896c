use std::collections::BTreeMap;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use arrow::array::{
    Array, AsArray, BooleanArray, Float32Array, Float64Array, Int32Array, Int64Array, StringArray,
};
use arrow::datatypes::DataType;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde::Deserialize;
use serde_json::Value as JsonValue;
use thiserror::Error;

use super::model::{normalize_field_name, FieldValue, ProjectRecord, ProjectTable};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Loading failures.  Coercion failures are not represented here: a cell
/// that fails numeric coercion becomes `Null` and the row is kept.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The backing store cannot be read at all.  Fatal to the session.
    #[error("cannot read source {}: {source}", path.display())]
    SourceUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unsupported file extension: .{0}")]
    UnsupportedFormat(String),

    /// The source opened but its content is structurally unreadable.
    #[error("malformed source: {0}")]
    Malformed(String),
}

// ---------------------------------------------------------------------------
// Load options
// ---------------------------------------------------------------------------

/// Declarative row-exclusion rule, applied after coercion and before the
/// table is built.  A row violating any rule is dropped.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum ExclusionRule {
    /// Drop rows where `field` equals `value` (exact match on the rendered
    /// value, e.g. `host_country` = `China`).
    ForbidValue { field: String, value: String },
    /// Drop rows where `field` is null or missing.
    RequireValue { field: String },
}

impl ExclusionRule {
    fn excludes(&self, record: &ProjectRecord) -> bool {
        match self {
            ExclusionRule::ForbidValue { field, value } => {
                let cell = record.get(field);
                !cell.is_null() && cell.to_string() == *value
            }
            ExclusionRule::RequireValue { field } => record.get(field).is_null(),
        }
    }
}

/// Static loading configuration: which fields get typed coercion and which
/// rows are excluded outright.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadOptions {
    /// Fields coerced text → number; failures become `Null`.
    pub numeric_fields: Vec<String>,
    /// Fields kept as ISO-8601 date text.
    pub date_fields: Vec<String>,
    /// Rules dropping rows before the table is built.
    pub exclusions: Vec<ExclusionRule>,
}

impl Default for LoadOptions {
    fn default() -> Self {
        LoadOptions {
            numeric_fields: vec!["investment_amount".to_string()],
            date_fields: vec!["date".to_string()],
            exclusions: Vec::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a project dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – delimited text with a header row (primary format)
/// * `.json`    – `[{ "company_name": "...", ...fields }, ...]`
/// * `.parquet` – flat scalar columns
///
/// Column headers are canonicalized (trimmed, lower-cased, whitespace runs
/// replaced with `_`).  If two raw headers canonicalize to the same name,
/// the later column overwrites the earlier one and a warning is logged.
pub fn load_file(path: &Path, options: &LoadOptions) -> Result<ProjectTable, LoadError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let records = match ext.as_str() {
        "csv" => read_csv(path)?,
        "json" => read_json(path)?,
        "parquet" | "pq" => read_parquet(path)?,
        other => return Err(LoadError::UnsupportedFormat(other.to_string())),
    };

    Ok(build_table(records, options))
}

/// Coerce designated fields, apply exclusion rules, build the table.
fn build_table(mut records: Vec<ProjectRecord>, options: &LoadOptions) -> ProjectTable {
    for rec in &mut records {
        coerce_record(rec, options);
    }

    let before = records.len();
    records.retain(|rec| !options.exclusions.iter().any(|rule| rule.excludes(rec)));
    let dropped = before - records.len();
    if dropped > 0 {
        log::info!("{dropped} of {before} rows dropped by exclusion rules");
    }

    ProjectTable::from_records(records)
}

/// Apply the designated-type coercions to one record, in place.
///
/// Numeric coercion is lenient: a cell like `"N/A"` becomes `Null` and the
/// row is retained.
fn coerce_record(record: &mut ProjectRecord, options: &LoadOptions) {
    for field in &options.numeric_fields {
        if let Some(val) = record.fields.get_mut(field) {
            if let FieldValue::String(s) | FieldValue::Date(s) = val {
                let parsed = s.trim().parse::<f64>().ok();
                *val = match parsed {
                    Some(n) => FieldValue::Number(n),
                    None => FieldValue::Null,
                };
            }
        }
    }
    for field in &options.date_fields {
        if let Some(val) = record.fields.get_mut(field) {
            if let FieldValue::String(s) = val {
                let text = std::mem::take(s);
                *val = FieldValue::Date(text);
            }
        }
    }
}

/// Canonicalize raw headers and warn about names that collide after
/// canonicalization (the later column wins).
fn normalize_headers(raw: &[String]) -> Vec<String> {
    let headers: Vec<String> = raw.iter().map(|h| normalize_field_name(h)).collect();
    for (i, name) in headers.iter().enumerate() {
        if !name.is_empty() && headers[..i].contains(name) {
            log::warn!(
                "duplicate column '{name}' after header normalization; later column overwrites earlier"
            );
        }
    }
    headers
}

/// A trimmed text cell; empty cells are null.
fn cell_value(raw: &str) -> FieldValue {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        FieldValue::Null
    } else {
        FieldValue::String(trimmed.to_string())
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

fn read_csv(path: &Path) -> Result<Vec<ProjectRecord>, LoadError> {
    let file = File::open(path).map_err(|e| LoadError::SourceUnavailable {
        path: path.to_path_buf(),
        source: e,
    })?;
    let mut reader = csv::Reader::from_reader(file);

    let headers = normalize_headers(
        &reader
            .headers()
            .map_err(|e| LoadError::Malformed(format!("reading CSV headers: {e}")))?
            .iter()
            .map(|h| h.to_string())
            .collect::<Vec<_>>(),
    );

    let mut records = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let row = result.map_err(|e| LoadError::Malformed(format!("CSV row {row_no}: {e}")))?;

        let mut fields = BTreeMap::new();
        for (col_idx, raw) in row.iter().enumerate() {
            let Some(name) = headers.get(col_idx) else {
                continue;
            };
            if name.is_empty() {
                continue;
            }
            fields.insert(name.clone(), cell_value(raw));
        }
        records.push(ProjectRecord { fields });
    }
    Ok(records)
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, the default
/// `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "company_name": "Acme", "host_country": "Thailand", "investment_amount": 120.0 },
///   ...
/// ]
/// ```
fn read_json(path: &Path) -> Result<Vec<ProjectRecord>, LoadError> {
    let text = std::fs::read_to_string(path).map_err(|e| LoadError::SourceUnavailable {
        path: path.to_path_buf(),
        source: e,
    })?;
    let root: JsonValue = serde_json::from_str(&text)
        .map_err(|e| LoadError::Malformed(format!("parsing JSON: {e}")))?;

    let rows = root
        .as_array()
        .ok_or_else(|| LoadError::Malformed("expected top-level JSON array".to_string()))?;

    let mut records = Vec::with_capacity(rows.len());
    for (i, row) in rows.iter().enumerate() {
        let obj = row
            .as_object()
            .ok_or_else(|| LoadError::Malformed(format!("row {i} is not a JSON object")))?;

        let mut fields = BTreeMap::new();
        for (key, val) in obj {
            let name = normalize_field_name(key);
            if name.is_empty() {
                continue;
            }
            fields.insert(name, json_to_field(val));
        }
        records.push(ProjectRecord { fields });
    }
    Ok(records)
}

fn json_to_field(val: &JsonValue) -> FieldValue {
    match val {
        JsonValue::String(s) => cell_value(s),
        JsonValue::Number(n) => match n.as_f64() {
            Some(f) => FieldValue::Number(f),
            None => FieldValue::String(n.to_string()),
        },
        JsonValue::Bool(b) => FieldValue::String(b.to_string()),
        JsonValue::Null => FieldValue::Null,
        other => FieldValue::String(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file of flat scalar columns (strings, ints, floats,
/// bools).  Works with files written by both **Pandas** (`df.to_parquet()`)
/// and **Polars** (`df.write_parquet()`).
fn read_parquet(path: &Path) -> Result<Vec<ProjectRecord>, LoadError> {
    let file = File::open(path).map_err(|e| LoadError::SourceUnavailable {
        path: path.to_path_buf(),
        source: e,
    })?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .map_err(|e| LoadError::Malformed(format!("reading parquet metadata: {e}")))?;
    let reader = builder
        .build()
        .map_err(|e| LoadError::Malformed(format!("building parquet reader: {e}")))?;

    let mut records = Vec::new();
    for batch_result in reader {
        let batch =
            batch_result.map_err(|e| LoadError::Malformed(format!("reading record batch: {e}")))?;
        let schema = batch.schema();

        let columns = normalize_headers(
            &schema
                .fields()
                .iter()
                .map(|f| f.name().clone())
                .collect::<Vec<_>>(),
        );

        for row in 0..batch.num_rows() {
            let mut fields = BTreeMap::new();
            for (col_idx, name) in columns.iter().enumerate() {
                if name.is_empty() {
                    continue;
                }
                fields.insert(name.clone(), extract_field_value(batch.column(col_idx), row));
            }
            records.push(ProjectRecord { fields });
        }
    }
    Ok(records)
}

/// Extract a single scalar value from an Arrow column at a given row.
fn extract_field_value(col: &Arc<dyn Array>, row: usize) -> FieldValue {
    if col.is_null(row) {
        return FieldValue::Null;
    }
    match col.data_type() {
        DataType::Utf8 | DataType::LargeUtf8 => {
            if let Some(s) = col.as_any().downcast_ref::<StringArray>() {
                cell_value(s.value(row))
            } else {
                // LargeStringArray
                let s = col.as_string::<i64>();
                cell_value(s.value(row))
            }
        }
        DataType::Int32 => {
            let arr = col.as_any().downcast_ref::<Int32Array>().unwrap();
            FieldValue::Number(arr.value(row) as f64)
        }
        DataType::Int64 => {
            let arr = col.as_any().downcast_ref::<Int64Array>().unwrap();
            FieldValue::Number(arr.value(row) as f64)
        }
        DataType::Float32 => {
            let arr = col.as_any().downcast_ref::<Float32Array>().unwrap();
            FieldValue::Number(arr.value(row) as f64)
        }
        DataType::Float64 => {
            let arr = col.as_any().downcast_ref::<Float64Array>().unwrap();
            FieldValue::Number(arr.value(row))
        }
        DataType::Boolean => {
            let arr = col.as_any().downcast_ref::<BooleanArray>().unwrap();
            FieldValue::String(arr.value(row).to_string())
        }
        _ => FieldValue::String(format!("{:?}", col.data_type())),
    }
}
