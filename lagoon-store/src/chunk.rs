use crate::segment::Segment;
use lagoon_base::{err, ColumnId, ErrorKind, Result, Value};
use std::sync::Arc;

// A horizontal slice of a table: one segment per column, all of the same
// length, in schema column order. A chunk accepts appends only while it is
// the table's tail and made of value segments; the table stops routing
// appends here once the chunk is full or compressed.
#[derive(Clone, Debug, Default)]
pub struct Chunk {
    segments: Vec<Segment>,
}

impl Chunk {
    pub fn new() -> Chunk {
        Chunk {
            segments: Vec::new(),
        }
    }

    // Segments are added at schema time (empty) or when assembling an
    // operator/compression result (all the same length).
    pub fn add_segment(&mut self, segment: Segment) {
        debug_assert!(
            self.segments.is_empty() || self.segments[0].len() == segment.len(),
            "segment length does not match chunk"
        );
        self.segments.push(segment);
    }

    pub fn segment(&self, column_id: ColumnId) -> Result<Segment> {
        self.segments
            .get(column_id.0 as usize)
            .cloned()
            .ok_or_else(|| {
                err(
                    ErrorKind::InvalidArgument,
                    format!("chunk has no column {:?}", column_id),
                )
            })
    }

    pub fn column_count(&self) -> usize {
        self.segments.len()
    }

    pub fn len(&self) -> usize {
        self.segments.first().map(Segment::len).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // Appends one row, fanning each value to its column's segment. The
    // whole row is validated against every column before anything is
    // mutated, so a failed append leaves the chunk untouched.
    pub fn append(&mut self, row: &[Value]) -> Result<()> {
        if row.len() != self.segments.len() {
            return Err(err(
                ErrorKind::InvalidArgument,
                format!(
                    "row arity {} does not match column count {}",
                    row.len(),
                    self.segments.len()
                ),
            ));
        }
        for (segment, value) in self.segments.iter().zip(row) {
            match segment {
                Segment::Value(s) => s.check_append(value)?,
                _ => {
                    return Err(err(
                        ErrorKind::InvariantViolation,
                        "cannot append to a compressed chunk",
                    ))
                }
            }
        }
        for (segment, value) in self.segments.iter_mut().zip(row) {
            match segment {
                Segment::Value(s) => Arc::make_mut(s).append(value)?,
                _ => unreachable!(),
            }
        }
        Ok(())
    }

    pub fn estimate_memory_usage(&self) -> usize {
        self.segments
            .iter()
            .map(Segment::estimate_memory_usage)
            .sum()
    }
}
