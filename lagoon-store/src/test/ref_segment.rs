use crate::{Chunk, ReferenceSegment, Segment, Table};
use lagoon_base::{ChunkId, ChunkOffset, ColumnId, DataType, ErrorKind, PosList, RowId, Value};
use std::sync::Arc;
use test_log::test;

fn base_table() -> Arc<Table> {
    let table = Table::new(4);
    table.add_column("a", DataType::Int32, true).unwrap();
    table.add_column("b", DataType::String, false).unwrap();
    for (a, b) in [
        (Value::Int32(3), "x"),
        (Value::Null, "y"),
        (Value::Int32(4), "z"),
        (Value::Int32(1), "w"),
        (Value::Int32(5), "v"),
    ] {
        table.append(&[a, Value::from(b)]).unwrap();
    }
    Arc::new(table)
}

fn row(chunk: u32, offset: u32) -> RowId {
    RowId::new(ChunkId(chunk), ChunkOffset(offset))
}

#[test]
fn test_resolution() {
    let table = base_table();
    let positions = Arc::new(vec![row(0, 2), row(1, 0), row(0, 1)]);
    let segment = ReferenceSegment::new(table.clone(), ColumnId(0), positions.clone()).unwrap();

    assert_eq!(segment.len(), 3);
    assert_eq!(segment.pos_list().as_slice(), positions.as_slice());
    assert_eq!(segment.referenced_column_id(), ColumnId(0));
    assert_eq!(segment.value_at(0).unwrap(), Value::Int32(4));
    assert_eq!(segment.value_at(1).unwrap(), Value::Int32(5));
    // Row (0, 1) holds NULL in column a.
    assert_eq!(segment.value_at(2).unwrap(), Value::Null);

    // Each read equals the base-table read at the same row id.
    for (index, row_id) in positions.iter().enumerate() {
        let direct = table
            .get_chunk(row_id.chunk_id)
            .unwrap()
            .segment(ColumnId(0))
            .unwrap()
            .value_at(row_id.chunk_offset.0 as usize)
            .unwrap();
        assert_eq!(segment.value_at(index).unwrap(), direct);
    }
}

#[test]
fn test_null_row_id_sentinel() {
    let table = base_table();
    let positions = Arc::new(vec![RowId::NULL, row(0, 0)]);
    let segment = ReferenceSegment::new(table, ColumnId(1), positions).unwrap();
    assert_eq!(segment.value_at(0).unwrap(), Value::Null);
    assert_eq!(segment.value_at(1).unwrap(), Value::from("x"));
}

#[test]
fn test_unknown_column_is_rejected() {
    let table = base_table();
    let err = ReferenceSegment::new(table, ColumnId(2), Arc::new(PosList::new())).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
}

#[test]
fn test_reads_tunnel_through_references() {
    let table = base_table();
    let positions = Arc::new(vec![row(0, 2), row(1, 0)]);
    let mut view_chunk = Chunk::new();
    for index in 0..table.column_count() {
        view_chunk.add_segment(Segment::from(
            ReferenceSegment::new(table.clone(), ColumnId(index as u16), positions.clone())
                .unwrap(),
        ));
    }
    let view = Arc::new(Table::with_chunk(table.definitions(), view_chunk, 4));

    // A reference over the view resolves through the view's own
    // references down to the base values.
    let nested =
        ReferenceSegment::new(view, ColumnId(1), Arc::new(vec![row(0, 1), row(0, 0)])).unwrap();
    assert_eq!(nested.value_at(0).unwrap(), Value::from("v"));
    assert_eq!(nested.value_at(1).unwrap(), Value::from("z"));
}

#[test]
fn test_memory_estimate() {
    let table = base_table();
    let positions = Arc::new(vec![row(0, 0), row(0, 1)]);
    let segment = ReferenceSegment::new(table, ColumnId(0), positions).unwrap();
    assert_eq!(
        segment.estimate_memory_usage(),
        2 * std::mem::size_of::<RowId>()
    );
}
