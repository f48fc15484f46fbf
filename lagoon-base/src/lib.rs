mod error;
mod ids;
mod value;

pub use error::{err, Error, ErrorKind, Result};
pub use ids::{ChunkId, ChunkOffset, ColumnId, PosList, RowId, ValueId, INVALID_VALUE_ID};
pub use value::{ColumnValue, DataType, Float32, Float64, Value};
