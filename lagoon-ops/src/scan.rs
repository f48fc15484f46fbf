use crate::Operator;
use lagoon_base::{
    err, ChunkId, ChunkOffset, ColumnId, ColumnValue, ErrorKind, PosList, Result, RowId, Value,
};
use lagoon_base::with_data_type;
use lagoon_store::{
    with_dict_column, with_value_column, Chunk, DictColumn, ReferenceSegment, Segment, Table,
    ValueColumn,
};
use std::cmp::Ordering;
use std::sync::Arc;

// The comparison operators a scan supports.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum ScanOp {
    Equals,
    NotEquals,
    LessThan,
    LessThanEquals,
    GreaterThan,
    GreaterThanEquals,
}

impl ScanOp {
    fn matches(&self, ordering: Ordering) -> bool {
        match self {
            ScanOp::Equals => ordering == Ordering::Equal,
            ScanOp::NotEquals => ordering != Ordering::Equal,
            ScanOp::LessThan => ordering == Ordering::Less,
            ScanOp::LessThanEquals => ordering != Ordering::Greater,
            ScanOp::GreaterThan => ordering == Ordering::Greater,
            ScanOp::GreaterThanEquals => ordering != Ordering::Less,
        }
    }
}

// Filters one column of the input table against a search value, emitting a
// single-chunk table of reference segments. NULL cells never match any
// predicate. The emitted references always point into the materialised
// base table: scanning a reference table chains onto its base rather than
// stacking a view on a view, and the matched positions are the original
// row ids.
pub struct TableScan {
    input: Arc<dyn Operator>,
    column_id: ColumnId,
    scan_op: ScanOp,
    search_value: Value,
}

impl TableScan {
    pub fn new(
        input: Arc<dyn Operator>,
        column_id: ColumnId,
        scan_op: ScanOp,
        search_value: Value,
    ) -> TableScan {
        TableScan {
            input,
            column_id,
            scan_op,
            search_value,
        }
    }

    pub fn column_id(&self) -> ColumnId {
        self.column_id
    }

    pub fn scan_op(&self) -> ScanOp {
        self.scan_op
    }

    pub fn search_value(&self) -> &Value {
        &self.search_value
    }

    fn scan_value_column<T: ColumnValue>(
        &self,
        column: &ValueColumn<T>,
        chunk_id: ChunkId,
        positions: &mut PosList,
    ) -> Result<()> {
        let search = T::from_value(&self.search_value)?;
        for (offset, value) in column.values().iter().enumerate() {
            if column.is_null(offset) {
                continue;
            }
            if self.scan_op.matches(value.cmp(&search)) {
                positions.push(RowId::new(chunk_id, ChunkOffset(offset as u32)));
            }
        }
        Ok(())
    }

    fn scan_dict_column<T: ColumnValue>(
        &self,
        column: &DictColumn<T>,
        chunk_id: ChunkId,
        positions: &mut PosList,
    ) -> Result<()> {
        let search = T::from_value(&self.search_value)?;
        for offset in 0..column.len() {
            let value = match column.get_typed(offset) {
                Some(value) => value,
                None => continue,
            };
            if self.scan_op.matches(value.cmp(&search)) {
                positions.push(RowId::new(chunk_id, ChunkOffset(offset as u32)));
            }
        }
        Ok(())
    }

    fn scan_reference_segment(
        &self,
        segment: &ReferenceSegment,
        positions: &mut PosList,
    ) -> Result<()> {
        let data_type = segment
            .referenced_table()
            .column_type(segment.referenced_column_id())?;
        with_data_type!(data_type, T => {
            let search = T::from_value(&self.search_value)?;
            for &row_id in segment.pos_list().iter() {
                let value = segment.value_at_row_id(row_id)?;
                if value.is_null() {
                    continue;
                }
                if self.scan_op.matches(T::from_value(&value)?.cmp(&search)) {
                    positions.push(row_id);
                }
            }
            Ok(())
        })
    }
}

impl Operator for TableScan {
    fn execute(&self) -> Result<Arc<Table>> {
        if self.search_value.is_null() {
            return Err(err(
                ErrorKind::InvalidArgument,
                "cannot scan for a NULL search value",
            ));
        }
        let table = self.input.execute()?;

        let mut positions = PosList::new();
        // Set when a scanned segment is itself a reference: the output
        // then points into that segment's base table. All reference
        // segments of one input share a single base table.
        let mut base_table: Option<Arc<Table>> = None;
        for index in 0..table.chunk_count() {
            let chunk_id = ChunkId(index as u32);
            let chunk = table.get_chunk(chunk_id)?;
            match chunk.segment(self.column_id)? {
                Segment::Value(segment) => {
                    with_value_column!(&*segment, col => {
                        self.scan_value_column(col, chunk_id, &mut positions)
                    })?
                }
                Segment::Dict(segment) => {
                    with_dict_column!(&*segment, col => {
                        self.scan_dict_column(col, chunk_id, &mut positions)
                    })?
                }
                Segment::Reference(segment) => {
                    self.scan_reference_segment(&segment, &mut positions)?;
                    base_table = Some(segment.referenced_table().clone());
                }
            }
        }

        let base = base_table.unwrap_or(table);
        let positions = Arc::new(positions);
        let mut chunk = Chunk::new();
        for index in 0..base.column_count() {
            let segment =
                ReferenceSegment::new(base.clone(), ColumnId(index as u16), positions.clone())?;
            chunk.add_segment(Segment::from(segment));
        }
        Ok(Arc::new(Table::with_chunk(
            base.definitions(),
            chunk,
            base.target_chunk_size(),
        )))
    }
}
