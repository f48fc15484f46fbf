use serde::{Deserialize, Serialize};

// Columns are addressed by their position in the table schema. The order of
// segments within every chunk matches this numbering.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub struct ColumnId(pub u16);

// Chunks are addressed by their position in the table's chunk list. Chunk
// ids are stable: compression replaces the chunk behind an id, it never
// renumbers.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub struct ChunkId(pub u32);

// A row position inside a single chunk, in [0, chunk.len()).
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub struct ChunkOffset(pub u32);

// An index handed out by a dictionary segment. INVALID_VALUE_ID means
// "absent": a failed lookup, or a bound that ran past the dictionary end.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub struct ValueId(pub u32);

pub const INVALID_VALUE_ID: ValueId = ValueId(u32::MAX);

// A (chunk, offset) pair addressing one row of one table.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub struct RowId {
    pub chunk_id: ChunkId,
    pub chunk_offset: ChunkOffset,
}

impl RowId {
    // Sentinel row id. Reading through it yields NULL wherever a position
    // list needs a hole.
    pub const NULL: RowId = RowId {
        chunk_id: ChunkId(u32::MAX),
        chunk_offset: ChunkOffset(u32::MAX),
    };

    pub fn new(chunk_id: ChunkId, chunk_offset: ChunkOffset) -> RowId {
        RowId {
            chunk_id,
            chunk_offset,
        }
    }

    pub fn is_null(&self) -> bool {
        *self == RowId::NULL
    }
}

// Ordered sequence of row ids produced by operators. Immutable once built,
// and shared between all the reference segments of an output chunk.
pub type PosList = Vec<RowId>;
