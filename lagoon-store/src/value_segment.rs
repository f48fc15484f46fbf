use lagoon_base::{err, ColumnValue, DataType, ErrorKind, Float32, Float64, Result, Value};

// Uncompressed storage for one column of one chunk: a vector of T plus a
// parallel null-flag vector (kept even for non-nullable columns, where it
// stays all-false). A NULL row holds a default-constructed T placeholder.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ValueColumn<T: ColumnValue> {
    values: Vec<T>,
    nulls: Vec<bool>,
    nullable: bool,
}

impl<T: ColumnValue> ValueColumn<T> {
    pub fn new(nullable: bool) -> ValueColumn<T> {
        ValueColumn {
            values: Vec::new(),
            nulls: Vec::new(),
            nullable,
        }
    }

    // Fails exactly when append would: arity aside, a row is appendable to
    // a chunk iff check_append passes on every column. Mutates nothing.
    pub fn check_append(&self, value: &Value) -> Result<()> {
        if value.is_null() {
            if self.nullable {
                Ok(())
            } else {
                Err(err(
                    ErrorKind::NotNullable,
                    "cannot append NULL to a non-nullable column",
                ))
            }
        } else {
            T::from_value(value).map(|_| ())
        }
    }

    pub fn append(&mut self, value: &Value) -> Result<()> {
        if value.is_null() {
            if !self.nullable {
                return Err(err(
                    ErrorKind::NotNullable,
                    "cannot append NULL to a non-nullable column",
                ));
            }
            self.values.push(T::default());
            self.nulls.push(true);
        } else {
            self.values.push(T::from_value(value)?);
            self.nulls.push(false);
        }
        Ok(())
    }

    pub fn get(&self, offset: usize) -> Result<T> {
        self.get_typed(offset).ok_or_else(|| {
            err(
                ErrorKind::NullDereference,
                format!("value at offset {} is NULL", offset),
            )
        })
    }

    pub fn get_typed(&self, offset: usize) -> Option<T> {
        if self.nulls[offset] {
            None
        } else {
            Some(self.values[offset].clone())
        }
    }

    pub fn value_at(&self, offset: usize) -> Value {
        match self.get_typed(offset) {
            Some(v) => v.into_value(),
            None => Value::Null,
        }
    }

    pub fn is_null(&self, offset: usize) -> bool {
        self.nulls[offset]
    }

    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &[T] {
        &self.values
    }

    pub fn null_values(&self) -> Result<&[bool]> {
        if self.nullable {
            Ok(&self.nulls)
        } else {
            Err(err(
                ErrorKind::NotNullable,
                "non-nullable column has no null flags",
            ))
        }
    }

    pub fn estimate_memory_usage(&self) -> usize {
        std::mem::size_of::<T>() * self.values.len()
    }
}

// The closed set of value segments, one variant per column type. All
// encoding-generic code goes through with_value_column! and monomorphises
// per variant.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ValueSegment {
    Int32(ValueColumn<i32>),
    Int64(ValueColumn<i64>),
    Float32(ValueColumn<Float32>),
    Float64(ValueColumn<Float64>),
    String(ValueColumn<String>),
}

impl From<ValueColumn<i32>> for ValueSegment {
    fn from(col: ValueColumn<i32>) -> ValueSegment {
        ValueSegment::Int32(col)
    }
}
impl From<ValueColumn<i64>> for ValueSegment {
    fn from(col: ValueColumn<i64>) -> ValueSegment {
        ValueSegment::Int64(col)
    }
}
impl From<ValueColumn<Float32>> for ValueSegment {
    fn from(col: ValueColumn<Float32>) -> ValueSegment {
        ValueSegment::Float32(col)
    }
}
impl From<ValueColumn<Float64>> for ValueSegment {
    fn from(col: ValueColumn<Float64>) -> ValueSegment {
        ValueSegment::Float64(col)
    }
}
impl From<ValueColumn<String>> for ValueSegment {
    fn from(col: ValueColumn<String>) -> ValueSegment {
        ValueSegment::String(col)
    }
}

// Expands to a match over the five variants, binding $col to the typed
// column in each arm.
#[macro_export]
macro_rules! with_value_column {
    ($segment:expr, $col:ident => $body:expr) => {
        match $segment {
            $crate::ValueSegment::Int32($col) => $body,
            $crate::ValueSegment::Int64($col) => $body,
            $crate::ValueSegment::Float32($col) => $body,
            $crate::ValueSegment::Float64($col) => $body,
            $crate::ValueSegment::String($col) => $body,
        }
    };
}

impl ValueSegment {
    pub fn new(data_type: DataType, nullable: bool) -> ValueSegment {
        lagoon_base::with_data_type!(data_type, T => {
            ValueSegment::from(ValueColumn::<T>::new(nullable))
        })
    }

    pub fn data_type(&self) -> DataType {
        match self {
            ValueSegment::Int32(_) => DataType::Int32,
            ValueSegment::Int64(_) => DataType::Int64,
            ValueSegment::Float32(_) => DataType::Float32,
            ValueSegment::Float64(_) => DataType::Float64,
            ValueSegment::String(_) => DataType::String,
        }
    }

    pub fn check_append(&self, value: &Value) -> Result<()> {
        with_value_column!(self, col => col.check_append(value))
    }

    pub fn append(&mut self, value: &Value) -> Result<()> {
        with_value_column!(self, col => col.append(value))
    }

    pub fn value_at(&self, offset: usize) -> Value {
        with_value_column!(self, col => col.value_at(offset))
    }

    pub fn is_null(&self, offset: usize) -> bool {
        with_value_column!(self, col => col.is_null(offset))
    }

    pub fn is_nullable(&self) -> bool {
        with_value_column!(self, col => col.is_nullable())
    }

    pub fn len(&self) -> usize {
        with_value_column!(self, col => col.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn estimate_memory_usage(&self) -> usize {
        with_value_column!(self, col => col.estimate_memory_usage())
    }
}
