use crate::attr::AttributeVector;
use crate::value_segment::{ValueColumn, ValueSegment};
use crate::with_value_column;
use lagoon_base::{
    err, ColumnValue, DataType, ErrorKind, Float32, Float64, Result, Value, ValueId,
    INVALID_VALUE_ID,
};
use std::collections::BTreeMap;

// Dictionary-compressed storage for one column of one chunk: a sorted,
// duplicate-free dictionary of T plus one value id per row, packed into an
// attribute vector of the narrowest width that fits.
//
// Id layout: for a nullable column, id 0 is reserved for NULL and real
// values start at 1, so dictionary[id - 1] decodes an id. For a
// non-nullable column ids are dictionary offsets directly and
// null_value_id() is INVALID_VALUE_ID.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DictColumn<T: ColumnValue> {
    dictionary: Vec<T>,
    attribute_vector: AttributeVector,
    nullable: bool,
}

impl<T: ColumnValue> DictColumn<T> {
    pub fn encode(source: &ValueColumn<T>) -> Result<DictColumn<T>> {
        let nullable = source.is_nullable();
        let base = if nullable { 1_u32 } else { 0_u32 };

        // Distinct non-null values, in ascending key order. The map value
        // is the id assigned in a second pass, once the full key set is
        // known.
        let mut codes = source
            .values()
            .iter()
            .enumerate()
            .filter(|(offset, _)| !source.is_null(*offset))
            .map(|(_, value)| (value, ValueId(0)))
            .collect::<BTreeMap<&T, ValueId>>();
        for (next, (_, code)) in codes.iter_mut().enumerate() {
            *code = ValueId(base + next as u32);
        }
        let dictionary = codes.keys().map(|value| (*value).clone()).collect::<Vec<T>>();

        let max_value_id = (dictionary.len() as u64 + base as u64).saturating_sub(1);
        let mut attribute_vector = AttributeVector::for_max_id(max_value_id, source.len())?;
        for offset in 0..source.len() {
            if source.is_null(offset) {
                // Freshly allocated slots already hold the null id 0.
                continue;
            }
            let value = &source.values()[offset];
            let code = codes
                .get(value)
                .ok_or_else(|| err(ErrorKind::InvariantViolation, "value missing from dictionary"))?;
            attribute_vector.set(offset, *code)?;
        }

        Ok(DictColumn {
            dictionary,
            attribute_vector,
            nullable,
        })
    }

    pub fn null_value_id(&self) -> ValueId {
        if self.nullable {
            ValueId(0)
        } else {
            INVALID_VALUE_ID
        }
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
        let value_id = self.attribute_vector.get(offset);
        if self.nullable {
            if value_id.0 == 0 {
                return None;
            }
            Some(self.dictionary[(value_id.0 - 1) as usize].clone())
        } else {
            Some(self.dictionary[value_id.0 as usize].clone())
        }
    }

    pub fn value_at(&self, offset: usize) -> Value {
        match self.get_typed(offset) {
            Some(v) => v.into_value(),
            None => Value::Null,
        }
    }

    pub fn is_null(&self, offset: usize) -> bool {
        self.nullable && self.attribute_vector.get(offset).0 == 0
    }

    // Decodes a value id as handed out by the attribute vector. Fails on
    // the null id.
    pub fn value_of_value_id(&self, value_id: ValueId) -> Result<&T> {
        if self.nullable {
            if value_id.0 == 0 {
                return Err(err(
                    ErrorKind::NullDereference,
                    "cannot decode the null value id",
                ));
            }
            Ok(&self.dictionary[(value_id.0 - 1) as usize])
        } else {
            Ok(&self.dictionary[value_id.0 as usize])
        }
    }

    // Both bounds return the dictionary *offset* as a ValueId: the first
    // entry not less than (resp. greater than) the probe. Past the end is
    // INVALID_VALUE_ID. Callers comparing against attribute vector reads
    // of a nullable column add 1 themselves.
    pub fn lower_bound(&self, value: &T) -> ValueId {
        let offset = self.dictionary.partition_point(|entry| entry < value);
        if offset == self.dictionary.len() {
            INVALID_VALUE_ID
        } else {
            ValueId(offset as u32)
        }
    }

    pub fn upper_bound(&self, value: &T) -> ValueId {
        let offset = self.dictionary.partition_point(|entry| entry <= value);
        if offset == self.dictionary.len() {
            INVALID_VALUE_ID
        } else {
            ValueId(offset as u32)
        }
    }

    pub fn unique_values_count(&self) -> usize {
        self.dictionary.len()
    }

    pub fn len(&self) -> usize {
        self.attribute_vector.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    pub fn dictionary(&self) -> &[T] {
        &self.dictionary
    }

    pub fn attribute_vector(&self) -> &AttributeVector {
        &self.attribute_vector
    }

    pub fn estimate_memory_usage(&self) -> usize {
        std::mem::size_of::<T>() * self.dictionary.len()
            + self.attribute_vector.estimate_memory_usage()
    }
}

// The closed set of dictionary segments, one variant per column type.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DictSegment {
    Int32(DictColumn<i32>),
    Int64(DictColumn<i64>),
    Float32(DictColumn<Float32>),
    Float64(DictColumn<Float64>),
    String(DictColumn<String>),
}

impl From<DictColumn<i32>> for DictSegment {
    fn from(col: DictColumn<i32>) -> DictSegment {
        DictSegment::Int32(col)
    }
}
impl From<DictColumn<i64>> for DictSegment {
    fn from(col: DictColumn<i64>) -> DictSegment {
        DictSegment::Int64(col)
    }
}
impl From<DictColumn<Float32>> for DictSegment {
    fn from(col: DictColumn<Float32>) -> DictSegment {
        DictSegment::Float32(col)
    }
}
impl From<DictColumn<Float64>> for DictSegment {
    fn from(col: DictColumn<Float64>) -> DictSegment {
        DictSegment::Float64(col)
    }
}
impl From<DictColumn<String>> for DictSegment {
    fn from(col: DictColumn<String>) -> DictSegment {
        DictSegment::String(col)
    }
}

// Expands to a match over the five variants, binding $col to the typed
// dictionary column in each arm.
#[macro_export]
macro_rules! with_dict_column {
    ($segment:expr, $col:ident => $body:expr) => {
        match $segment {
            $crate::DictSegment::Int32($col) => $body,
            $crate::DictSegment::Int64($col) => $body,
            $crate::DictSegment::Float32($col) => $body,
            $crate::DictSegment::Float64($col) => $body,
            $crate::DictSegment::String($col) => $body,
        }
    };
}

impl DictSegment {
    pub fn encode(source: &ValueSegment) -> Result<DictSegment> {
        with_value_column!(source, col => Ok(DictSegment::from(DictColumn::encode(col)?)))
    }

    pub fn data_type(&self) -> DataType {
        match self {
            DictSegment::Int32(_) => DataType::Int32,
            DictSegment::Int64(_) => DataType::Int64,
            DictSegment::Float32(_) => DataType::Float32,
            DictSegment::Float64(_) => DataType::Float64,
            DictSegment::String(_) => DataType::String,
        }
    }

    pub fn value_at(&self, offset: usize) -> Value {
        with_dict_column!(self, col => col.value_at(offset))
    }

    pub fn is_null(&self, offset: usize) -> bool {
        with_dict_column!(self, col => col.is_null(offset))
    }

    pub fn is_nullable(&self) -> bool {
        with_dict_column!(self, col => col.is_nullable())
    }

    pub fn null_value_id(&self) -> ValueId {
        with_dict_column!(self, col => col.null_value_id())
    }

    // Bounds over an arbitrary search value, narrowed to the column type
    // first. A value the column type cannot represent is a type mismatch.
    pub fn lower_bound(&self, value: &Value) -> Result<ValueId> {
        with_dict_column!(self, col => Ok(col.lower_bound(&ColumnValue::from_value(value)?)))
    }

    pub fn upper_bound(&self, value: &Value) -> Result<ValueId> {
        with_dict_column!(self, col => Ok(col.upper_bound(&ColumnValue::from_value(value)?)))
    }

    pub fn unique_values_count(&self) -> usize {
        with_dict_column!(self, col => col.unique_values_count())
    }

    pub fn len(&self) -> usize {
        with_dict_column!(self, col => col.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn attribute_vector(&self) -> &AttributeVector {
        with_dict_column!(self, col => col.attribute_vector())
    }

    pub fn estimate_memory_usage(&self) -> usize {
        with_dict_column!(self, col => col.estimate_memory_usage())
    }
}
