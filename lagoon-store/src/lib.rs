// Columnar storage. A table is a schema plus an ordered list of chunks;
// a chunk holds one segment per column; a segment stores one column's rows
// in one of three physical encodings:
//
// - Value: growable vector of T plus a parallel null-flag vector. The only
//   encoding that accepts appends; the tail chunk of a table is made of
//   these.
// - Dict: sorted duplicate-free dictionary plus an attribute vector of
//   value ids, packed to the narrowest of u8/u16/u32 that fits the largest
//   id. Produced by chunk compression, immutable thereafter.
// - Reference: (table, column, position list) triple giving a zero-copy
//   view over rows of another table. Produced by operators.
//
// Rows appended to a table land in the tail chunk; once the tail reaches
// target_chunk_size (or is sealed by compression) the next append opens a
// fresh tail. Chunks are shared as Arc handles: compression builds a
// replacement chunk off to the side, one worker per column, and publishes
// it with a single swap under the table's lock. A reader holding the old
// handle keeps reading the old segments, untorn.

mod attr;
mod catalog;
mod chunk;
mod dict_segment;
mod ref_segment;
mod segment;
mod table;
mod value_segment;

pub use attr::AttributeVector;
pub use catalog::Catalog;
pub use chunk::Chunk;
pub use dict_segment::{DictColumn, DictSegment};
pub use ref_segment::ReferenceSegment;
pub use segment::Segment;
pub use table::{ColumnDefinition, Table, DEFAULT_TARGET_CHUNK_SIZE};
pub use value_segment::{ValueColumn, ValueSegment};

#[cfg(test)]
mod test;
