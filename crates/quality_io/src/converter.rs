//! Type conversion between Arrow arrays and engine values.

use crate::ReaderError;
use arrow_array::cast::AsArray;
use arrow_array::types::{
    Decimal128Type, Float32Type, Float64Type, Int8Type, Int16Type, Int32Type, Int64Type,
    UInt8Type, UInt16Type, UInt32Type, UInt64Type,
};
use arrow_array::{Array, ArrayRef, RecordBatch};
use arrow_schema::DataType;
use datafusion::arrow::util::display::{ArrayFormatter, FormatOptions};
use quality_core::{Column, DataValue, Table};
use tracing::debug;

fn downcast_error(expected: &str) -> ReaderError {
    ReaderError::TypeConversionError(format!("Failed to downcast to {expected}"))
}

/// Converts a whole Arrow array to `DataValue`s.
///
/// Booleans, integers, floats, decimals and strings map to native variants;
/// a NaN float becomes `Null`.
/// Every other type (timestamps, dates, binary, nested) is rendered as its
/// Arrow display string.
pub fn array_to_values(array: &ArrayRef) -> Result<Vec<DataValue>, ReaderError> {
    macro_rules! primitive {
        ($arrow:ty, $name:literal, $convert:expr) => {{
            let typed = array
                .as_primitive_opt::<$arrow>()
                .ok_or_else(|| downcast_error($name))?;
            (0..typed.len())
                .map(|i| {
                    if typed.is_null(i) {
                        DataValue::Null
                    } else {
                        $convert(typed.value(i))
                    }
                })
                .collect()
        }};
    }

    let values = match array.data_type() {
        DataType::Null => vec![DataValue::Null; array.len()],
        DataType::Boolean => {
            let typed = array
                .as_boolean_opt()
                .ok_or_else(|| downcast_error("BooleanArray"))?;
            typed.iter().map(DataValue::from).collect()
        }
        DataType::Int8 => primitive!(Int8Type, "Int8Array", |v: i8| DataValue::Int(v.into())),
        DataType::Int16 => primitive!(Int16Type, "Int16Array", |v: i16| DataValue::Int(v.into())),
        DataType::Int32 => primitive!(Int32Type, "Int32Array", |v: i32| DataValue::Int(v.into())),
        DataType::Int64 => primitive!(Int64Type, "Int64Array", DataValue::Int),
        DataType::UInt8 => primitive!(UInt8Type, "UInt8Array", |v: u8| DataValue::Int(v.into())),
        DataType::UInt16 => {
            primitive!(UInt16Type, "UInt16Array", |v: u16| DataValue::Int(v.into()))
        }
        DataType::UInt32 => {
            primitive!(UInt32Type, "UInt32Array", |v: u32| DataValue::Int(v.into()))
        }
        DataType::UInt64 => primitive!(UInt64Type, "UInt64Array", |v: u64| {
            i64::try_from(v).map_or(DataValue::Float(v as f64), DataValue::Int)
        }),
        DataType::Float32 => {
            primitive!(Float32Type, "Float32Array", |v: f32| DataValue::from(f64::from(v)))
        }
        DataType::Float64 => primitive!(Float64Type, "Float64Array", DataValue::from),
        DataType::Decimal128(_, scale) => {
            let divisor = 10f64.powi(i32::from(*scale));
            primitive!(Decimal128Type, "Decimal128Array", |v: i128| {
                DataValue::Float(v as f64 / divisor)
            })
        }
        DataType::Utf8 => {
            let typed = array
                .as_string_opt::<i32>()
                .ok_or_else(|| downcast_error("StringArray"))?;
            typed.iter().map(DataValue::from).collect()
        }
        DataType::LargeUtf8 => {
            let typed = array
                .as_string_opt::<i64>()
                .ok_or_else(|| downcast_error("LargeStringArray"))?;
            typed.iter().map(DataValue::from).collect()
        }
        DataType::Utf8View => {
            let typed = array
                .as_string_view_opt()
                .ok_or_else(|| downcast_error("StringViewArray"))?;
            typed.iter().map(DataValue::from).collect()
        }
        other => {
            debug!("Rendering Arrow type {:?} as strings", other);
            display_values(array)?
        }
    };

    Ok(values)
}

fn display_values(array: &ArrayRef) -> Result<Vec<DataValue>, ReaderError> {
    let options = FormatOptions::default();
    let formatter = ArrayFormatter::try_new(array.as_ref(), &options)
        .map_err(|e| ReaderError::TypeConversionError(e.to_string()))?;

    Ok((0..array.len())
        .map(|i| {
            if array.is_null(i) {
                DataValue::Null
            } else {
                DataValue::String(formatter.value(i).to_string())
            }
        })
        .collect())
}

/// Assembles a `Table` from collected record batches.
///
/// `column_names` fixes the column order and is taken from the scan schema, so
/// a file with a header but no rows still yields its (empty) columns.
pub fn record_batches_to_table(
    column_names: &[String],
    batches: &[RecordBatch],
) -> Result<Table, ReaderError> {
    let mut columns = Vec::with_capacity(column_names.len());

    for (idx, name) in column_names.iter().enumerate() {
        let mut values = Vec::new();
        for batch in batches {
            if idx >= batch.num_columns() {
                return Err(ReaderError::TypeConversionError(format!(
                    "record batch has {} columns, expected at least {}",
                    batch.num_columns(),
                    idx + 1
                )));
            }
            values.extend(array_to_values(batch.column(idx))?);
        }
        columns.push(Column::new(name.clone(), values));
    }

    Table::new(columns).map_err(|e| ReaderError::TypeConversionError(e.to_string()))
}
