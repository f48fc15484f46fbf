use funty::Unsigned;
use lagoon_base::{err, ErrorKind, Result, ValueId, INVALID_VALUE_ID};

// Fixed-length backing store for value ids, generic over the unsigned
// integer actually held. One impl serves all three widths.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FixedWidthVector<U: Unsigned> {
    vals: Vec<U>,
}

impl<U: Unsigned + TryFrom<u32>> FixedWidthVector<U> {
    fn zeroed(len: usize) -> Self {
        FixedWidthVector {
            vals: vec![U::ZERO; len],
        }
    }

    fn get(&self, index: usize) -> ValueId {
        ValueId(self.vals[index].as_u32())
    }

    fn set(&mut self, index: usize, value_id: ValueId) -> Result<()> {
        self.vals[index] = U::try_from(value_id.0).map_err(|_| {
            err(
                ErrorKind::InvariantViolation,
                "value id exceeds attribute vector width",
            )
        })?;
        Ok(())
    }

    fn len(&self) -> usize {
        self.vals.len()
    }
}

// Width-adaptive array of value ids: 1, 2 or 4 byte backing chosen at
// construction from the largest id the owning dictionary will hand out.
// Indexing out of [0, len) is a bug and panics.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AttributeVector {
    Width1(FixedWidthVector<u8>),
    Width2(FixedWidthVector<u16>),
    Width4(FixedWidthVector<u32>),
}

impl AttributeVector {
    // max_value_id is the largest id that will ever be stored. Ids at or
    // past INVALID_VALUE_ID fit no backing: such a dictionary would need
    // ids wider than 32 bits.
    pub fn for_max_id(max_value_id: u64, len: usize) -> Result<AttributeVector> {
        if max_value_id >= INVALID_VALUE_ID.0 as u64 {
            return Err(err(
                ErrorKind::CapacityExceeded,
                "dictionary would require value ids wider than 32 bits",
            ));
        }
        Ok(if max_value_id <= u8::MAX as u64 {
            AttributeVector::Width1(FixedWidthVector::zeroed(len))
        } else if max_value_id <= u16::MAX as u64 {
            AttributeVector::Width2(FixedWidthVector::zeroed(len))
        } else {
            AttributeVector::Width4(FixedWidthVector::zeroed(len))
        })
    }

    pub fn get(&self, index: usize) -> ValueId {
        match self {
            AttributeVector::Width1(v) => v.get(index),
            AttributeVector::Width2(v) => v.get(index),
            AttributeVector::Width4(v) => v.get(index),
        }
    }

    pub fn set(&mut self, index: usize, value_id: ValueId) -> Result<()> {
        match self {
            AttributeVector::Width1(v) => v.set(index, value_id),
            AttributeVector::Width2(v) => v.set(index, value_id),
            AttributeVector::Width4(v) => v.set(index, value_id),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            AttributeVector::Width1(v) => v.len(),
            AttributeVector::Width2(v) => v.len(),
            AttributeVector::Width4(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn width_bytes(&self) -> usize {
        match self {
            AttributeVector::Width1(_) => 1,
            AttributeVector::Width2(_) => 2,
            AttributeVector::Width4(_) => 4,
        }
    }

    pub fn estimate_memory_usage(&self) -> usize {
        self.width_bytes() * self.len()
    }
}
