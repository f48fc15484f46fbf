use crate::chunk::Chunk;
use crate::dict_segment::DictSegment;
use crate::segment::Segment;
use crate::value_segment::ValueSegment;
use lagoon_base::{err, ChunkId, ColumnId, DataType, ErrorKind, Result, Value};
use parking_lot::RwLock;
use rayon::prelude::*;
use std::sync::Arc;
use tracing::debug;

pub const DEFAULT_TARGET_CHUNK_SIZE: u32 = 1 << 16;

// One column of a table schema.
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct ColumnDefinition {
    pub name: String,
    pub data_type: DataType,
    pub nullable: bool,
}

// Everything behind the table's lock: the schema (frozen once the first
// row lands), the chunk list, and whether the tail chunk has been sealed
// by compression. Chunk slots hold Arc handles so that replacing a slot
// never invalidates a reader.
#[derive(Debug)]
struct TableInner {
    columns: Vec<ColumnDefinition>,
    chunks: Vec<Arc<Chunk>>,
    tail_sealed: bool,
}

impl TableInner {
    fn row_count(&self) -> u64 {
        // Not (chunks - 1) * target + tail: compressing the tail seals it
        // at whatever size it had, so a non-tail chunk may be short.
        self.chunks.iter().map(|chunk| chunk.len() as u64).sum()
    }

    fn new_tail_chunk(&mut self) {
        let mut chunk = Chunk::new();
        for column in &self.columns {
            chunk.add_segment(Segment::from(ValueSegment::new(
                column.data_type,
                column.nullable,
            )));
        }
        self.chunks.push(Arc::new(chunk));
        self.tail_sealed = false;
    }

    fn column_definition(&self, column_id: ColumnId) -> Result<&ColumnDefinition> {
        self.columns.get(column_id.0 as usize).ok_or_else(|| {
            err(
                ErrorKind::InvalidArgument,
                format!("table has no column {:?}", column_id),
            )
        })
    }
}

// An in-memory table: schema, target chunk size, and chunks. Appends are
// single-writer; everything else may run concurrently, including
// compression of one chunk while another is read or appended to.
#[derive(Debug)]
pub struct Table {
    target_chunk_size: u32,
    inner: RwLock<TableInner>,
}

impl Table {
    pub fn new(target_chunk_size: u32) -> Table {
        let mut inner = TableInner {
            columns: Vec::new(),
            chunks: Vec::new(),
            tail_sealed: false,
        };
        inner.new_tail_chunk();
        Table {
            target_chunk_size,
            inner: RwLock::new(inner),
        }
    }

    // Wraps a ready-made chunk, as operators do for their output. The
    // chunk is sealed: a later append opens a fresh tail instead of
    // touching it.
    pub fn with_chunk(
        columns: Vec<ColumnDefinition>,
        chunk: Chunk,
        target_chunk_size: u32,
    ) -> Table {
        Table {
            target_chunk_size,
            inner: RwLock::new(TableInner {
                columns,
                chunks: vec![Arc::new(chunk)],
                tail_sealed: true,
            }),
        }
    }

    // Columns can only be added while the table holds no rows. Every
    // existing chunk grows an empty value segment so the segment order
    // keeps matching the schema.
    pub fn add_column(&self, name: &str, data_type: DataType, nullable: bool) -> Result<()> {
        let mut inner = self.inner.write();
        if inner.row_count() > 0 {
            return Err(err(
                ErrorKind::InvalidArgument,
                "cannot add a column to a non-empty table",
            ));
        }
        for chunk in &mut inner.chunks {
            Arc::make_mut(chunk).add_segment(Segment::from(ValueSegment::new(data_type, nullable)));
        }
        inner.columns.push(ColumnDefinition {
            name: name.to_string(),
            data_type,
            nullable,
        });
        Ok(())
    }

    pub fn append(&self, row: &[Value]) -> Result<()> {
        let mut inner = self.inner.write();
        let tail_full = match inner.chunks.last() {
            Some(tail) => tail.len() >= self.target_chunk_size as usize,
            None => true,
        };
        if tail_full || inner.tail_sealed {
            inner.new_tail_chunk();
        }
        let tail = inner
            .chunks
            .last_mut()
            .ok_or_else(|| err(ErrorKind::InvariantViolation, "table has no tail chunk"))?;
        Arc::make_mut(tail).append(row)
    }

    pub fn row_count(&self) -> u64 {
        self.inner.read().row_count()
    }

    pub fn chunk_count(&self) -> usize {
        self.inner.read().chunks.len()
    }

    // The returned handle stays valid (and keeps its segments alive) even
    // if the chunk behind this id is subsequently replaced by
    // compression.
    pub fn get_chunk(&self, chunk_id: ChunkId) -> Result<Arc<Chunk>> {
        self.inner
            .read()
            .chunks
            .get(chunk_id.0 as usize)
            .cloned()
            .ok_or_else(|| {
                err(
                    ErrorKind::InvalidArgument,
                    format!("table has no chunk {:?}", chunk_id),
                )
            })
    }

    pub fn column_count(&self) -> usize {
        self.inner.read().columns.len()
    }

    pub fn column_name(&self, column_id: ColumnId) -> Result<String> {
        Ok(self.inner.read().column_definition(column_id)?.name.clone())
    }

    pub fn column_type(&self, column_id: ColumnId) -> Result<DataType> {
        Ok(self.inner.read().column_definition(column_id)?.data_type)
    }

    pub fn column_nullable(&self, column_id: ColumnId) -> Result<bool> {
        Ok(self.inner.read().column_definition(column_id)?.nullable)
    }

    pub fn column_names(&self) -> Vec<String> {
        self.inner
            .read()
            .columns
            .iter()
            .map(|column| column.name.clone())
            .collect()
    }

    pub fn column_id_by_name(&self, name: &str) -> Result<ColumnId> {
        self.inner
            .read()
            .columns
            .iter()
            .position(|column| column.name == name)
            .map(|index| ColumnId(index as u16))
            .ok_or_else(|| {
                err(
                    ErrorKind::InvalidArgument,
                    format!("table has no column named {:?}", name),
                )
            })
    }

    pub fn definitions(&self) -> Vec<ColumnDefinition> {
        self.inner.read().columns.clone()
    }

    pub fn target_chunk_size(&self) -> u32 {
        self.target_chunk_size
    }

    // Replaces the chunk behind chunk_id with its dictionary-compressed
    // equivalent. The source segments are frozen (either the chunk is
    // already non-tail, or sealing below freezes it), so the workers read
    // them without coordination, one worker per column, each writing only
    // its own output slot. Publication is a single slot swap under the
    // write lock: a concurrent reader sees wholly the old chunk or wholly
    // the new one. Any failure leaves the old chunk in place.
    pub fn compress_chunk(&self, chunk_id: ChunkId) -> Result<()> {
        let old_chunk = self.get_chunk(chunk_id)?;
        let column_count = old_chunk.column_count();
        debug!(target: "lagoon", chunk = chunk_id.0, columns = column_count, "compressing chunk");

        let compressed = (0..column_count)
            .into_par_iter()
            .map(|index| {
                let segment = old_chunk.segment(ColumnId(index as u16))?;
                match segment {
                    Segment::Value(source) => Ok(Segment::from(DictSegment::encode(&source)?)),
                    _ => Err(err(
                        ErrorKind::InvalidArgument,
                        "chunk is not made of value segments",
                    )),
                }
            })
            .collect::<Result<Vec<Segment>>>()?;

        let mut new_chunk = Chunk::new();
        for segment in compressed {
            new_chunk.add_segment(segment);
        }

        let mut inner = self.inner.write();
        inner.chunks[chunk_id.0 as usize] = Arc::new(new_chunk);
        if chunk_id.0 as usize == inner.chunks.len() - 1 {
            inner.tail_sealed = true;
        }
        Ok(())
    }
}

impl Default for Table {
    fn default() -> Table {
        Table::new(DEFAULT_TARGET_CHUNK_SIZE)
    }
}
