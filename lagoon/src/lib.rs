// Lagoon is a small in-memory columnar relational engine. Tables are
// broken into fixed-size row ranges (chunks); each column of a chunk is a
// segment in one of several physical encodings; operators walk a table's
// chunks and emit zero-copy reference views over it.
//
// The workspace splits into:
//
//   lagoon-base   base types: errors, ids, the value variant
//   lagoon-store  segments, chunks, tables, chunk compression, catalog
//   lagoon-ops    operators (table scan)
//
// This crate just re-exports the public surface of the three.

pub use lagoon_base::{
    err, ChunkId, ChunkOffset, ColumnId, ColumnValue, DataType, Error, ErrorKind, Float32,
    Float64, PosList, Result, RowId, Value, ValueId, INVALID_VALUE_ID,
};
pub use lagoon_ops::{GetTable, Operator, ScanOp, TableScan, TableWrapper};
pub use lagoon_store::{
    AttributeVector, Catalog, Chunk, ColumnDefinition, DictColumn, DictSegment, ReferenceSegment,
    Segment, Table, ValueColumn, ValueSegment, DEFAULT_TARGET_CHUNK_SIZE,
};
