use crate::table::Table;
use lagoon_base::{err, ColumnId, ErrorKind, PosList, Result, RowId, Value};
use std::sync::Arc;

// Zero-copy view over one column of another table: a shared position list
// resolved against the referenced table row by row. The Arc on the table
// keeps the viewed data alive for as long as any reader holds this
// segment.
#[derive(Clone, Debug)]
pub struct ReferenceSegment {
    referenced_table: Arc<Table>,
    referenced_column_id: ColumnId,
    positions: Arc<PosList>,
}

impl ReferenceSegment {
    pub fn new(
        referenced_table: Arc<Table>,
        referenced_column_id: ColumnId,
        positions: Arc<PosList>,
    ) -> Result<ReferenceSegment> {
        if referenced_column_id.0 as usize >= referenced_table.column_count() {
            return Err(err(
                ErrorKind::InvalidArgument,
                format!(
                    "referenced table has no column {:?}",
                    referenced_column_id
                ),
            ));
        }
        Ok(ReferenceSegment {
            referenced_table,
            referenced_column_id,
            positions,
        })
    }

    pub fn value_at(&self, offset: usize) -> Result<Value> {
        self.value_at_row_id(self.positions[offset])
    }

    // Resolves one row id against the referenced table. The NULL sentinel
    // resolves to NULL; a reference into a further reference segment
    // tunnels through it.
    pub fn value_at_row_id(&self, row_id: RowId) -> Result<Value> {
        if row_id.is_null() {
            return Ok(Value::Null);
        }
        let chunk = self.referenced_table.get_chunk(row_id.chunk_id)?;
        let segment = chunk.segment(self.referenced_column_id)?;
        segment.value_at(row_id.chunk_offset.0 as usize)
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn pos_list(&self) -> &Arc<PosList> {
        &self.positions
    }

    pub fn referenced_table(&self) -> &Arc<Table> {
        &self.referenced_table
    }

    pub fn referenced_column_id(&self) -> ColumnId {
        self.referenced_column_id
    }

    pub fn estimate_memory_usage(&self) -> usize {
        std::mem::size_of::<RowId>() * self.positions.len()
    }
}
