//! Row extraction for INSERT and UPDATE payloads
//!
//! Rows come in as key/value [`Record`]s, JSON objects, or application
//! types implementing [`Model`]. Extraction turns a batch of them into a
//! column list plus value rows, or a single row into `column = value`
//! assignments.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::expression::{c, Expression, IntoExpression, UpdateExpression};
use crate::value::Value;

/// Ordered column -> value map
///
/// Keys are kept sorted so the column order of generated statements is
/// stable.
#[derive(Debug, Clone, Default)]
pub struct Record(BTreeMap<String, Expression>);

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a column, replacing any previous value
    pub fn set(mut self, column: impl Into<String>, value: impl IntoExpression) -> Self {
        self.0.insert(column.into(), value.into_expression());
        self
    }

    pub fn insert(&mut self, column: impl Into<String>, value: impl IntoExpression) {
        self.0.insert(column.into(), value.into_expression());
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.0.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Expression)> {
        self.0.iter()
    }
}

impl<V: Into<Value>> From<HashMap<String, V>> for Record {
    fn from(map: HashMap<String, V>) -> Self {
        Record(
            map.into_iter()
                .map(|(k, v)| (k, Expression::Value(v.into())))
                .collect(),
        )
    }
}

impl<V: Into<Value>> From<BTreeMap<String, V>> for Record {
    fn from(map: BTreeMap<String, V>) -> Self {
        Record(
            map.into_iter()
                .map(|(k, v)| (k, Expression::Value(v.into())))
                .collect(),
        )
    }
}

/// Build a [`Record`] from `column => value` pairs
///
/// ```
/// use sqlset_core::record;
///
/// let row = record! { "name" => "Test1", "age" => 42 };
/// assert_eq!(row.len(), 2);
/// ```
#[macro_export]
macro_rules! record {
    () => {
        $crate::row::Record::new()
    };
    ($($column:expr => $value:expr),+ $(,)?) => {
        $crate::row::Record::new()$(.set($column, $value))+
    };
}

/// Produces the storage representation of a field value
pub trait Valuer: fmt::Debug + Send + Sync {
    fn to_value(&self) -> std::result::Result<Value, Box<dyn std::error::Error + Send + Sync>>;
}

/// Per-field options, parsed from a comma separated tag such as
/// `"pk,skipinsert"`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FieldOptions {
    pub skip_insert: bool,
    pub skip_update: bool,
    pub primary_key: bool,
    pub ignored: bool,
}

impl FieldOptions {
    pub fn parse(tag: &str) -> Self {
        let mut options = Self::default();
        for option in tag.split(',').map(str::trim) {
            match option {
                "skipinsert" => options.skip_insert = true,
                "skipupdate" => options.skip_update = true,
                "pk" => options.primary_key = true,
                "-" => options.ignored = true,
                _ => {}
            }
        }
        options
    }
}

#[derive(Debug, Clone)]
pub enum FieldValue {
    Value(Expression),
    Valuer(Arc<dyn Valuer>),
    /// Fields of an embedded record, flattened in place
    Embedded(Vec<Field>),
}

/// One field of a [`Model`]
#[derive(Debug, Clone)]
pub struct Field {
    name: String,
    column: Option<String>,
    options: FieldOptions,
    value: FieldValue,
}

impl Field {
    /// Field mapped to its lowercased name
    pub fn new(name: impl Into<String>, value: impl IntoExpression) -> Self {
        Self::with_value(name.into(), FieldValue::Value(value.into_expression()))
    }

    /// Field whose value is produced by a [`Valuer`]
    pub fn valuer(name: impl Into<String>, valuer: impl Valuer + 'static) -> Self {
        Self::with_value(name.into(), FieldValue::Valuer(Arc::new(valuer)))
    }

    /// Embedded record whose fields are inlined into the parent
    pub fn embedded(name: impl Into<String>, fields: Vec<Field>) -> Self {
        Self::with_value(name.into(), FieldValue::Embedded(fields))
    }

    fn with_value(name: String, value: FieldValue) -> Self {
        Self {
            column: Some(name.to_lowercase()),
            name,
            options: FieldOptions::default(),
            value,
        }
    }

    /// Explicit column name; `"-"` removes the field from all statements
    pub fn column(mut self, column: impl Into<String>) -> Self {
        let column = column.into();
        self.column = if column == "-" { None } else { Some(column) };
        self
    }

    /// Options tag, e.g. `"skipinsert,skipupdate"`
    pub fn options(mut self, tag: &str) -> Self {
        self.options = FieldOptions::parse(tag);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn column_name(&self) -> Option<&str> {
        self.column.as_deref()
    }

    pub fn field_options(&self) -> FieldOptions {
        self.options
    }

    fn included(&self, mode: Mode) -> bool {
        if self.options.ignored {
            return false;
        }
        match mode {
            Mode::Insert => !self.options.skip_insert,
            Mode::Update => !self.options.skip_update,
        }
    }
}

/// Application types that can be written as rows
///
/// ```
/// use sqlset_core::row::{Field, Model};
///
/// struct Item {
///     id: i64,
///     name: String,
/// }
///
/// impl Model for Item {
///     fn fields(&self) -> Vec<Field> {
///         vec![
///             Field::new("ID", self.id).options("pk,skipinsert,skipupdate"),
///             Field::new("Name", self.name.clone()),
///         ]
///     }
/// }
/// ```
pub trait Model {
    /// Fields in declaration order
    fn fields(&self) -> Vec<Field>;

    /// Name used to check that a batch holds only one model type
    fn type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// A row given to an INSERT, UPDATE or upsert
#[derive(Debug, Clone)]
pub enum RowSource {
    Record(Record),
    Model {
        type_name: &'static str,
        fields: Vec<Field>,
    },
    /// Anything that is neither map-like nor record-like
    Unsupported(String),
}

impl RowSource {
    pub fn model<M: Model + ?Sized>(model: &M) -> Self {
        RowSource::Model {
            type_name: model.type_name(),
            fields: model.fields(),
        }
    }

    fn kind(&self) -> &str {
        match self {
            RowSource::Record(_) => "Record",
            RowSource::Model { type_name, .. } => type_name,
            RowSource::Unsupported(kind) => kind,
        }
    }
}

impl From<Record> for RowSource {
    fn from(record: Record) -> Self {
        RowSource::Record(record)
    }
}

impl<V: Into<Value>> From<HashMap<String, V>> for RowSource {
    fn from(map: HashMap<String, V>) -> Self {
        RowSource::Record(map.into())
    }
}

impl From<serde_json::Value> for RowSource {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Object(map) => RowSource::Record(Record(
                map.into_iter()
                    .map(|(k, v)| (k, Expression::Value(v.into())))
                    .collect(),
            )),
            serde_json::Value::Null => RowSource::Unsupported("null".to_string()),
            serde_json::Value::Bool(_) => RowSource::Unsupported("bool".to_string()),
            serde_json::Value::Number(_) => RowSource::Unsupported("number".to_string()),
            serde_json::Value::String(_) => RowSource::Unsupported("string".to_string()),
            serde_json::Value::Array(_) => RowSource::Unsupported("array".to_string()),
        }
    }
}

impl From<Value> for RowSource {
    fn from(value: Value) -> Self {
        RowSource::Unsupported(value.type_name().to_string())
    }
}

impl<M: Model> From<&M> for RowSource {
    fn from(model: &M) -> Self {
        RowSource::model(model)
    }
}

/// Column names plus value rows of a multi-row INSERT
#[derive(Debug, Clone, Default)]
pub struct RowBatch {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Expression>>,
}

#[derive(Debug, Clone, Copy)]
enum Mode {
    Insert,
    Update,
}

/// Extract the column list and value rows of an INSERT
///
/// Every row must be of the same kind (all records or all the same model).
/// Record keys are fixed by the first row; later rows must match them.
pub fn extract_insert(rows: &[RowSource]) -> Result<RowBatch> {
    let Some(first) = rows.first() else {
        return Ok(RowBatch::default());
    };
    for row in rows {
        if row.kind() != first.kind() {
            return Err(Error::type_mismatch(first.kind(), row.kind()));
        }
    }

    let batch = match first {
        RowSource::Record(first_record) => {
            let columns: Vec<String> = first_record.keys().cloned().collect();
            let mut values = Vec::with_capacity(rows.len());
            for row in rows {
                let RowSource::Record(record) = row else {
                    return Err(Error::type_mismatch(first.kind(), row.kind()));
                };
                if record.len() != columns.len() {
                    return Err(Error::RowLengthMismatch {
                        expected: columns.len(),
                        got: record.len(),
                    });
                }
                if !record.keys().eq(columns.iter()) {
                    return Err(Error::KeyMismatch {
                        expected: format_keys(columns.iter()),
                        got: format_keys(record.keys()),
                    });
                }
                values.push(record.iter().map(|(_, v)| v.clone()).collect());
            }
            RowBatch {
                columns,
                rows: values,
            }
        }
        RowSource::Model { .. } => {
            let mut columns = Vec::new();
            let mut values = Vec::with_capacity(rows.len());
            for (idx, row) in rows.iter().enumerate() {
                let RowSource::Model { fields, .. } = row else {
                    return Err(Error::type_mismatch(first.kind(), row.kind()));
                };
                let pairs = collect_fields(fields, Mode::Insert)?;
                let row_columns: Vec<String> = pairs.iter().map(|(col, _)| col.clone()).collect();
                if idx == 0 {
                    columns = row_columns;
                } else if row_columns.len() != columns.len() {
                    return Err(Error::RowLengthMismatch {
                        expected: columns.len(),
                        got: row_columns.len(),
                    });
                } else if row_columns != columns {
                    return Err(Error::KeyMismatch {
                        expected: format_keys(columns.iter()),
                        got: format_keys(row_columns.iter()),
                    });
                }
                values.push(pairs.into_iter().map(|(_, v)| v).collect());
            }
            RowBatch {
                columns,
                rows: values,
            }
        }
        RowSource::Unsupported(kind) => {
            return Err(Error::UnsupportedInputType { kind: kind.clone() })
        }
    };

    tracing::trace!(
        columns = batch.columns.len(),
        rows = batch.rows.len(),
        "extracted insert rows"
    );
    Ok(batch)
}

/// Extract the `column = value` assignments of an UPDATE
pub fn extract_update(row: &RowSource) -> Result<Vec<UpdateExpression>> {
    let pairs = match row {
        RowSource::Record(record) => record
            .iter()
            .map(|(col, value)| (col.clone(), value.clone()))
            .collect(),
        RowSource::Model { fields, .. } => collect_fields(fields, Mode::Update)?,
        RowSource::Unsupported(kind) => {
            return Err(Error::UnsupportedInputType { kind: kind.clone() })
        }
    };

    tracing::trace!(assignments = pairs.len(), "extracted update values");
    Ok(pairs
        .into_iter()
        .map(|(column, value)| UpdateExpression {
            column: c(column),
            value,
        })
        .collect())
}

fn collect_fields(fields: &[Field], mode: Mode) -> Result<Vec<(String, Expression)>> {
    let mut pairs = Vec::new();
    flatten_fields(fields, mode, &mut pairs)?;
    Ok(pairs)
}

fn flatten_fields(
    fields: &[Field],
    mode: Mode,
    pairs: &mut Vec<(String, Expression)>,
) -> Result<()> {
    for field in fields {
        if let FieldValue::Embedded(inner) = &field.value {
            if !field.options.ignored {
                flatten_fields(inner, mode, pairs)?;
            }
            continue;
        }
        let Some(column) = field.column.as_ref() else {
            continue;
        };
        if !field.included(mode) {
            continue;
        }
        let value = match &field.value {
            FieldValue::Value(expr) => expr.clone(),
            FieldValue::Valuer(valuer) => valuer
                .to_value()
                .map(Expression::Value)
                .map_err(|e| Error::value_conversion(column.as_str(), e.to_string()))?,
            FieldValue::Embedded(_) => continue,
        };
        pairs.push((column.clone(), value));
    }
    Ok(())
}

fn format_keys<'k>(keys: impl Iterator<Item = &'k String>) -> String {
    let keys: Vec<&str> = keys.map(String::as_str).collect();
    format!("[{}]", keys.join(","))
}
