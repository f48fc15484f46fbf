use crate::{err, ErrorKind, Result};
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

// Column values are floats wrapped in OrderedFloat, so that every column
// type carries a total order. NaN never enters a column: every conversion
// boundary rejects it.
pub type Float32 = OrderedFloat<f32>;
pub type Float64 = OrderedFloat<f64>;

// The closed set of column data types. There is no open polymorphism over
// this set anywhere: dispatch is a compile-time switch (see
// with_data_type!), one monomorphisation per type.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub enum DataType {
    Int32,
    Int64,
    Float32,
    Float64,
    String,
}

impl DataType {
    pub fn name(&self) -> &'static str {
        match self {
            DataType::Int32 => "int32",
            DataType::Int64 => "int64",
            DataType::Float32 => "float32",
            DataType::Float64 => "float64",
            DataType::String => "string",
        }
    }

    pub fn parse(tag: &str) -> Result<DataType> {
        match tag {
            "int32" => Ok(DataType::Int32),
            "int64" => Ok(DataType::Int64),
            "float32" => Ok(DataType::Float32),
            "float64" => Ok(DataType::Float64),
            "string" => Ok(DataType::String),
            _ => Err(err(
                ErrorKind::InvalidArgument,
                format!("unknown data type tag: {:?}", tag),
            )),
        }
    }
}

impl std::fmt::Display for DataType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

// A single cell value: one of the five column types, or NULL. The derived
// order compares payloads only between like-typed values; code that
// compares values always narrows both sides to one column type first.
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub enum Value {
    Null,
    Int32(i32),
    Int64(i64),
    Float32(Float32),
    Float64(Float64),
    String(String),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn data_type(&self) -> Option<DataType> {
        match self {
            Value::Null => None,
            Value::Int32(_) => Some(DataType::Int32),
            Value::Int64(_) => Some(DataType::Int64),
            Value::Float32(_) => Some(DataType::Float32),
            Value::Float64(_) => Some(DataType::Float64),
            Value::String(_) => Some(DataType::String),
        }
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Value {
        Value::Int32(v)
    }
}
impl From<i64> for Value {
    fn from(v: i64) -> Value {
        Value::Int64(v)
    }
}
impl From<f32> for Value {
    fn from(v: f32) -> Value {
        Value::Float32(OrderedFloat(v))
    }
}
impl From<f64> for Value {
    fn from(v: f64) -> Value {
        Value::Float64(OrderedFloat(v))
    }
}
impl From<&str> for Value {
    fn from(v: &str) -> Value {
        Value::String(v.to_string())
    }
}
impl From<String> for Value {
    fn from(v: String) -> Value {
        Value::String(v)
    }
}

// Implemented by the five concrete column types. from_value performs the
// lossless narrowing the append and scan paths rely on: int widens to int
// or float, float narrows to float, and anything lossy or cross-kind is a
// type mismatch. NULL never narrows.
pub trait ColumnValue:
    Clone + std::fmt::Debug + Default + Eq + Ord + std::hash::Hash + Send + Sync + 'static
{
    const DATA_TYPE: DataType;
    fn from_value(value: &Value) -> Result<Self>;
    fn into_value(self) -> Value;
}

fn mismatch<T>(value: &Value, target: DataType) -> Result<T> {
    Err(err(
        ErrorKind::TypeMismatch,
        format!("cannot losslessly convert {:?} to {}", value, target),
    ))
}

fn reject_nan(value: f64) -> Result<f64> {
    if value.is_nan() {
        Err(err(ErrorKind::InvalidArgument, "NaN is not a column value"))
    } else {
        Ok(value)
    }
}

// An i64 survives the round trip to float exactly iff the cast back (taken
// through i128, which neither cast can saturate) reproduces it.
fn exact_f32(value: i64) -> Option<f32> {
    let f = value as f32;
    (f as i128 == value as i128).then_some(f)
}

fn exact_f64(value: i64) -> Option<f64> {
    let f = value as f64;
    (f as i128 == value as i128).then_some(f)
}

impl ColumnValue for i32 {
    const DATA_TYPE: DataType = DataType::Int32;

    fn from_value(value: &Value) -> Result<i32> {
        match value {
            Value::Int32(v) => Ok(*v),
            Value::Int64(v) => match i32::try_from(*v) {
                Ok(v) => Ok(v),
                Err(_) => mismatch(value, Self::DATA_TYPE),
            },
            _ => mismatch(value, Self::DATA_TYPE),
        }
    }

    fn into_value(self) -> Value {
        Value::Int32(self)
    }
}

impl ColumnValue for i64 {
    const DATA_TYPE: DataType = DataType::Int64;

    fn from_value(value: &Value) -> Result<i64> {
        match value {
            Value::Int32(v) => Ok(*v as i64),
            Value::Int64(v) => Ok(*v),
            _ => mismatch(value, Self::DATA_TYPE),
        }
    }

    fn into_value(self) -> Value {
        Value::Int64(self)
    }
}

impl ColumnValue for Float32 {
    const DATA_TYPE: DataType = DataType::Float32;

    fn from_value(value: &Value) -> Result<Float32> {
        match value {
            Value::Float32(v) => {
                reject_nan(v.0 as f64)?;
                Ok(*v)
            }
            Value::Float64(v) => {
                let v = reject_nan(v.0)?;
                let narrowed = v as f32;
                if narrowed as f64 == v {
                    Ok(OrderedFloat(narrowed))
                } else {
                    mismatch(value, Self::DATA_TYPE)
                }
            }
            Value::Int32(v) => match exact_f32(*v as i64) {
                Some(f) => Ok(OrderedFloat(f)),
                None => mismatch(value, Self::DATA_TYPE),
            },
            Value::Int64(v) => match exact_f32(*v) {
                Some(f) => Ok(OrderedFloat(f)),
                None => mismatch(value, Self::DATA_TYPE),
            },
            _ => mismatch(value, Self::DATA_TYPE),
        }
    }

    fn into_value(self) -> Value {
        Value::Float32(self)
    }
}

impl ColumnValue for Float64 {
    const DATA_TYPE: DataType = DataType::Float64;

    fn from_value(value: &Value) -> Result<Float64> {
        match value {
            Value::Float32(v) => {
                reject_nan(v.0 as f64)?;
                Ok(OrderedFloat(v.0 as f64))
            }
            Value::Float64(v) => {
                reject_nan(v.0)?;
                Ok(*v)
            }
            Value::Int32(v) => Ok(OrderedFloat(*v as f64)),
            Value::Int64(v) => match exact_f64(*v) {
                Some(f) => Ok(OrderedFloat(f)),
                None => mismatch(value, Self::DATA_TYPE),
            },
            _ => mismatch(value, Self::DATA_TYPE),
        }
    }

    fn into_value(self) -> Value {
        Value::Float64(self)
    }
}

impl ColumnValue for String {
    const DATA_TYPE: DataType = DataType::String;

    fn from_value(value: &Value) -> Result<String> {
        match value {
            Value::String(v) => Ok(v.clone()),
            _ => mismatch(value, Self::DATA_TYPE),
        }
    }

    fn into_value(self) -> Value {
        Value::String(self)
    }
}

// Expands to a match over the closed type set, binding $ty to the concrete
// column type in each arm. This is the compile-time replacement for
// dispatching on a runtime type tag: every use site monomorphises once per
// type.
#[macro_export]
macro_rules! with_data_type {
    ($data_type:expr, $ty:ident => $body:expr) => {
        match $data_type {
            $crate::DataType::Int32 => {
                type $ty = i32;
                $body
            }
            $crate::DataType::Int64 => {
                type $ty = i64;
                $body
            }
            $crate::DataType::Float32 => {
                type $ty = $crate::Float32;
                $body
            }
            $crate::DataType::Float64 => {
                type $ty = $crate::Float64;
                $body
            }
            $crate::DataType::String => {
                type $ty = ::std::string::String;
                $body
            }
        }
    };
}
