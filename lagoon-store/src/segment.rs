use crate::dict_segment::DictSegment;
use crate::ref_segment::ReferenceSegment;
use crate::value_segment::ValueSegment;
use lagoon_base::{Result, Value};
use std::sync::Arc;

// One physical column of one chunk, in one of the three encodings. A
// Segment is a cheap-clone handle: cloning shares the underlying storage,
// which therefore survives the owning chunk being replaced by compression.
// Encoding-specific code lives in exactly one place per encoding, behind a
// match on this enum.
#[derive(Clone, Debug)]
pub enum Segment {
    Value(Arc<ValueSegment>),
    Dict(Arc<DictSegment>),
    Reference(Arc<ReferenceSegment>),
}

impl From<ValueSegment> for Segment {
    fn from(segment: ValueSegment) -> Segment {
        Segment::Value(Arc::new(segment))
    }
}
impl From<DictSegment> for Segment {
    fn from(segment: DictSegment) -> Segment {
        Segment::Dict(Arc::new(segment))
    }
}
impl From<ReferenceSegment> for Segment {
    fn from(segment: ReferenceSegment) -> Segment {
        Segment::Reference(Arc::new(segment))
    }
}

impl Segment {
    pub fn len(&self) -> usize {
        match self {
            Segment::Value(s) => s.len(),
            Segment::Dict(s) => s.len(),
            Segment::Reference(s) => s.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn value_at(&self, offset: usize) -> Result<Value> {
        match self {
            Segment::Value(s) => Ok(s.value_at(offset)),
            Segment::Dict(s) => Ok(s.value_at(offset)),
            Segment::Reference(s) => s.value_at(offset),
        }
    }

    pub fn is_null(&self, offset: usize) -> Result<bool> {
        match self {
            Segment::Value(s) => Ok(s.is_null(offset)),
            Segment::Dict(s) => Ok(s.is_null(offset)),
            Segment::Reference(s) => Ok(s.value_at(offset)?.is_null()),
        }
    }

    pub fn estimate_memory_usage(&self) -> usize {
        match self {
            Segment::Value(s) => s.estimate_memory_usage(),
            Segment::Dict(s) => s.estimate_memory_usage(),
            Segment::Reference(s) => s.estimate_memory_usage(),
        }
    }
}
