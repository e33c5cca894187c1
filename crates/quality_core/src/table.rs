//! Tabular data representation.
//!
//! A [`Table`] is an ordered set of named [`Column`]s of equal length. It is the
//! common shape produced by every I/O adapter and consumed by the validation
//! engine, so rules never need to know where the data came from.

use crate::{QualityError, Result};
use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Map key wrapping an infinite float, which JSON has no literal for.
const NON_FINITE_KEY: &str = "float";

/// A single cell value.
///
/// Serialized untagged so that values read naturally in suite files
/// (`value_set: [Engineering, 3, null]`) and in stored results. Infinite
/// floats are written as `{"float": "inf"}` / `{"float": "-inf"}`; a NaN float
/// is a missing value and is written as `null`.
#[derive(Debug, Clone, PartialEq)]
pub enum DataValue {
    /// Null/missing value
    Null,
    /// Boolean value
    Bool(bool),
    /// Integer value
    Int(i64),
    /// Floating point value
    Float(f64),
    /// String value (timestamps and dates are rendered as ISO 8601 strings)
    String(String),
}

impl DataValue {
    /// Returns true if this value is missing: `Null` or a NaN float.
    pub fn is_null(&self) -> bool {
        match self {
            DataValue::Null => true,
            DataValue::Float(x) => x.is_nan(),
            _ => false,
        }
    }

    /// Returns the type name of this value.
    pub fn type_name(&self) -> &'static str {
        match self {
            DataValue::Null => "null",
            DataValue::Bool(_) => "boolean",
            DataValue::Int(_) => "int64",
            DataValue::Float(_) => "float64",
            DataValue::String(_) => "string",
        }
    }

    /// Attempts to get this value as a string.
    pub fn as_string(&self) -> Option<&str> {
        match self {
            DataValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Attempts to get this value as an integer.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            DataValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Attempts to get this value as a float. Integers widen.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            DataValue::Float(f) => Some(*f),
            DataValue::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Attempts to get this value as a boolean.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            DataValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Compares two values, treating `Int` and `Float` as the same numeric domain.
    ///
    /// Missing values only match missing values. An `Int` matches a `Float`
    /// only if the float is integral and equal to it exactly.
    pub fn loosely_equals(&self, other: &DataValue) -> bool {
        if self.is_null() || other.is_null() {
            return self.is_null() && other.is_null();
        }

        match (self, other) {
            (DataValue::Int(a), DataValue::Float(b)) | (DataValue::Float(b), DataValue::Int(a)) => {
                b.fract() == 0.0 && *b as i128 == i128::from(*a)
            }
            _ => self == other,
        }
    }
}

impl fmt::Display for DataValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataValue::Null => write!(f, "null"),
            DataValue::Bool(b) => write!(f, "{b}"),
            DataValue::Int(i) => write!(f, "{i}"),
            DataValue::Float(x) => write!(f, "{x}"),
            DataValue::String(s) => write!(f, "{s}"),
        }
    }
}

impl From<String> for DataValue {
    fn from(s: String) -> Self {
        DataValue::String(s)
    }
}

impl From<&str> for DataValue {
    fn from(s: &str) -> Self {
        DataValue::String(s.to_string())
    }
}

impl From<i64> for DataValue {
    fn from(i: i64) -> Self {
        DataValue::Int(i)
    }
}

impl From<i32> for DataValue {
    fn from(i: i32) -> Self {
        DataValue::Int(i as i64)
    }
}

impl From<f64> for DataValue {
    /// NaN becomes `Null`.
    fn from(f: f64) -> Self {
        if f.is_nan() {
            DataValue::Null
        } else {
            DataValue::Float(f)
        }
    }
}

impl From<bool> for DataValue {
    fn from(b: bool) -> Self {
        DataValue::Bool(b)
    }
}

impl<T: Into<DataValue>> From<Option<T>> for DataValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(DataValue::Null, Into::into)
    }
}

impl Serialize for DataValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            DataValue::Null => serializer.serialize_unit(),
            DataValue::Bool(b) => serializer.serialize_bool(*b),
            DataValue::Int(i) => serializer.serialize_i64(*i),
            DataValue::Float(x) if x.is_nan() => serializer.serialize_unit(),
            DataValue::Float(x) if x.is_infinite() => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry(NON_FINITE_KEY, if *x > 0.0 { "inf" } else { "-inf" })?;
                map.end()
            }
            DataValue::Float(x) => serializer.serialize_f64(*x),
            DataValue::String(s) => serializer.serialize_str(s),
        }
    }
}

struct DataValueVisitor;

impl<'de> Visitor<'de> for DataValueVisitor {
    type Value = DataValue;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("null, a boolean, a number, a string or {\"float\": \"inf\" | \"-inf\"}")
    }

    fn visit_unit<E: de::Error>(self) -> std::result::Result<DataValue, E> {
        Ok(DataValue::Null)
    }

    fn visit_none<E: de::Error>(self) -> std::result::Result<DataValue, E> {
        Ok(DataValue::Null)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> std::result::Result<DataValue, D::Error> {
        DataValue::deserialize(deserializer)
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> std::result::Result<DataValue, E> {
        Ok(DataValue::Bool(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> std::result::Result<DataValue, E> {
        Ok(DataValue::Int(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> std::result::Result<DataValue, E> {
        Ok(i64::try_from(v).map_or(DataValue::Float(v as f64), DataValue::Int))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> std::result::Result<DataValue, E> {
        Ok(DataValue::from(v))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<DataValue, E> {
        Ok(DataValue::String(v.to_string()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> std::result::Result<DataValue, E> {
        Ok(DataValue::String(v))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> std::result::Result<DataValue, A::Error> {
        let (key, value): (String, String) = map
            .next_entry()?
            .ok_or_else(|| <A::Error as de::Error>::invalid_length(0, &self))?;
        if key != NON_FINITE_KEY {
            return Err(de::Error::unknown_field(&key, &[NON_FINITE_KEY]));
        }
        if map.next_key::<String>()?.is_some() {
            return Err(de::Error::invalid_length(2, &self));
        }

        match value.as_str() {
            "inf" => Ok(DataValue::Float(f64::INFINITY)),
            "-inf" => Ok(DataValue::Float(f64::NEG_INFINITY)),
            other => Err(de::Error::invalid_value(
                de::Unexpected::Str(other),
                &"\"inf\" or \"-inf\"",
            )),
        }
    }
}

impl<'de> Deserialize<'de> for DataValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserializer.deserialize_any(DataValueVisitor)
    }
}

/// A named column of values.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    name: String,
    values: Vec<DataValue>,
}

impl Column {
    /// Creates a column from anything convertible into [`DataValue`]s.
    ///
    /// ```rust
    /// use quality_core::{Column, DataValue};
    ///
    /// let names = Column::new("name", [Some("Alice"), None, Some("Charlie")]);
    /// assert_eq!(names.len(), 3);
    /// assert_eq!(names.values()[1], DataValue::Null);
    /// ```
    pub fn new<I, V>(name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<DataValue>,
    {
        Self {
            name: name.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns the column name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the column values in row order.
    pub fn values(&self) -> &[DataValue] {
        &self.values
    }

    /// Returns the number of values.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if the column holds no values.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Returns the number of null values.
    pub fn null_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_null()).count()
    }
}

/// A table of equally sized, uniquely named columns.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    columns: Vec<Column>,
    row_count: usize,
}

impl Table {
    /// Creates a new empty table.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Creates a table from columns.
    ///
    /// # Errors
    ///
    /// Returns [`QualityError::InvalidTable`] if two columns share a name or the
    /// columns differ in length.
    pub fn new(columns: Vec<Column>) -> Result<Self> {
        let row_count = columns.first().map(Column::len).unwrap_or(0);

        for (idx, column) in columns.iter().enumerate() {
            if column.len() != row_count {
                return Err(QualityError::InvalidTable(format!(
                    "column '{}' has {} values, expected {}",
                    column.name,
                    column.len(),
                    row_count
                )));
            }
            if columns[..idx].iter().any(|c| c.name == column.name) {
                return Err(QualityError::InvalidTable(format!(
                    "duplicate column name '{}'",
                    column.name
                )));
            }
        }

        Ok(Self { columns, row_count })
    }

    /// Starts a fluent table definition.
    pub fn builder() -> TableBuilder {
        TableBuilder::default()
    }

    /// Returns the number of rows.
    pub fn row_count(&self) -> usize {
        self.row_count
    }

    /// Returns true if the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.row_count == 0
    }

    /// Returns the columns in declaration order.
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Looks up a column by name.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Returns the column names in declaration order.
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }
}

/// Fluent builder for [`Table`].
///
/// # Example
///
/// ```rust
/// use quality_core::Table;
///
/// let table = Table::builder()
///     .column("name", [Some("Alice"), None, Some("Charlie")])
///     .column("age", [25, 30, 150])
///     .build()
///     .unwrap();
///
/// assert_eq!(table.row_count(), 3);
/// assert_eq!(table.column_names(), vec!["name", "age"]);
/// ```
#[derive(Debug, Default)]
pub struct TableBuilder {
    columns: Vec<Column>,
}

impl TableBuilder {
    /// Adds a column.
    pub fn column<I, V>(mut self, name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<DataValue>,
    {
        self.columns.push(Column::new(name, values));
        self
    }

    /// Builds the table, checking column lengths and names.
    pub fn build(self) -> Result<Table> {
        Table::new(self.columns)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_value_types() {
        assert_eq!(DataValue::Null.type_name(), "null");
        assert_eq!(DataValue::String("test".into()).type_name(), "string");
        assert_eq!(DataValue::Int(42).type_name(), "int64");
        assert_eq!(DataValue::Float(3.5).type_name(), "float64");
        assert_eq!(DataValue::Bool(true).type_name(), "boolean");
    }

    #[test]
    fn test_data_value_conversions() {
        let val = DataValue::String("hello".into());
        assert_eq!(val.as_string(), Some("hello"));
        assert_eq!(val.as_int(), None);

        let val = DataValue::Int(42);
        assert_eq!(val.as_int(), Some(42));
        assert_eq!(val.as_float(), Some(42.0));
        assert_eq!(val.as_string(), None);

        assert_eq!(DataValue::from(None::<i64>), DataValue::Null);
        assert_eq!(DataValue::from(Some("x")), DataValue::String("x".into()));
    }

    #[test]
    fn test_loose_numeric_equality() {
        assert!(DataValue::Int(1).loosely_equals(&DataValue::Float(1.0)));
        assert!(DataValue::Float(2.0).loosely_equals(&DataValue::Int(2)));
        assert!(!DataValue::Int(1).loosely_equals(&DataValue::String("1".into())));
        assert!(DataValue::Null.loosely_equals(&DataValue::Null));
    }

    #[test]
    fn test_untagged_serialization() {
        let values = vec![
            DataValue::Null,
            DataValue::Bool(true),
            DataValue::Int(7),
            DataValue::Float(1.5),
            DataValue::String("USD".into()),
        ];
        let json = serde_json::to_string(&values).unwrap();
        assert_eq!(json, r#"[null,true,7,1.5,"USD"]"#);

        let back: Vec<DataValue> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, values);
    }

    #[test]
    fn test_non_finite_floats_survive_json() {
        let values = vec![
            DataValue::Float(f64::INFINITY),
            DataValue::Float(f64::NEG_INFINITY),
            DataValue::Float(-0.5),
        ];
        let json = serde_json::to_string(&values).unwrap();
        assert_eq!(json, r#"[{"float":"inf"},{"float":"-inf"},-0.5]"#);

        let back: Vec<DataValue> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, values);
    }

    #[test]
    fn test_non_finite_map_rejects_other_shapes() {
        assert!(serde_json::from_str::<DataValue>(r#"{"float":"huge"}"#).is_err());
        assert!(serde_json::from_str::<DataValue>(r#"{"value":"inf"}"#).is_err());
        assert!(serde_json::from_str::<DataValue>(r#"{"float":"inf","x":"y"}"#).is_err());
    }

    #[test]
    fn test_nan_is_missing() {
        assert_eq!(DataValue::from(f64::NAN), DataValue::Null);
        assert_eq!(DataValue::from(Some(f64::NAN)), DataValue::Null);
        assert!(DataValue::Float(f64::NAN).is_null());
        assert!(DataValue::Float(f64::NAN).loosely_equals(&DataValue::Null));
        assert_eq!(serde_json::to_string(&DataValue::Float(f64::NAN)).unwrap(), "null");
        assert_eq!(Column::new("x", [1.0, f64::NAN]).null_count(), 1);
    }

    #[test]
    fn test_loose_equality_is_exact_for_large_ints() {
        let two_pow_53 = 9_007_199_254_740_992_i64;
        assert!(DataValue::Int(two_pow_53).loosely_equals(&DataValue::Float(two_pow_53 as f64)));
        assert!(!DataValue::Int(two_pow_53 + 1).loosely_equals(&DataValue::Float(two_pow_53 as f64)));
        assert!(!DataValue::Int(1).loosely_equals(&DataValue::Float(f64::INFINITY)));
    }

    #[test]
    fn test_table_operations() {
        let table = Table::builder()
            .column("id", [1, 2, 3])
            .column("name", [Some("a"), None, Some("c")])
            .build()
            .unwrap();

        assert_eq!(table.row_count(), 3);
        assert!(!table.is_empty());
        assert_eq!(table.column("name").unwrap().null_count(), 1);
        assert!(table.column("missing").is_none());
    }

    #[test]
    fn test_table_rejects_ragged_columns() {
        let err = Table::builder()
            .column("a", [1, 2])
            .column("b", [1])
            .build()
            .unwrap_err();
        assert!(matches!(err, QualityError::InvalidTable(_)));
    }

    #[test]
    fn test_table_rejects_duplicate_names() {
        let err = Table::builder()
            .column("a", [1])
            .column("a", [2])
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("duplicate column name 'a'"));
    }

    #[test]
    fn test_empty_table() {
        let table = Table::empty();
        assert!(table.is_empty());
        assert!(table.columns().is_empty());
    }
}
