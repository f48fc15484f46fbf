use crate::{Segment, Table};
use lagoon_base::{ChunkId, ColumnId, DataType, ErrorKind, Value};
use std::sync::Arc;
use test_log::test;

fn two_column_table(target_chunk_size: u32) -> Table {
    let table = Table::new(target_chunk_size);
    table.add_column("a", DataType::Int32, false).unwrap();
    table.add_column("b", DataType::String, false).unwrap();
    table
}

#[test]
fn test_append_and_retrieve() {
    let table = two_column_table(4);
    for (a, b) in [(1, "x"), (2, "y"), (3, "z"), (4, "w"), (5, "v")] {
        table.append(&[Value::Int32(a), Value::from(b)]).unwrap();
    }
    assert_eq!(table.row_count(), 5);
    assert_eq!(table.chunk_count(), 2);
    assert_eq!(table.get_chunk(ChunkId(0)).unwrap().len(), 4);
    assert_eq!(table.get_chunk(ChunkId(1)).unwrap().len(), 1);
    assert_eq!(
        table
            .get_chunk(ChunkId(0))
            .unwrap()
            .segment(ColumnId(1))
            .unwrap()
            .value_at(2)
            .unwrap(),
        Value::from("z")
    );
}

#[test]
fn test_schema_accessors() {
    let table = two_column_table(4);
    assert_eq!(table.column_count(), 2);
    assert_eq!(table.column_names(), vec!["a", "b"]);
    assert_eq!(table.column_name(ColumnId(1)).unwrap(), "b");
    assert_eq!(table.column_type(ColumnId(0)).unwrap(), DataType::Int32);
    assert!(!table.column_nullable(ColumnId(0)).unwrap());
    assert_eq!(table.column_id_by_name("b").unwrap(), ColumnId(1));
    assert_eq!(table.target_chunk_size(), 4);

    let err = table.column_name(ColumnId(2)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    let err = table.column_id_by_name("c").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    let err = table.get_chunk(ChunkId(9)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
}

#[test]
fn test_add_column_only_while_empty() {
    let table = two_column_table(4);
    table.append(&[Value::Int32(1), Value::from("x")]).unwrap();
    let err = table
        .add_column("c", DataType::Float64, true)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    assert_eq!(table.column_count(), 2);
}

#[test]
fn test_append_atomicity() {
    let table = two_column_table(4);
    let err = table
        .append(&[Value::Int32(1), Value::Int32(2)])
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::TypeMismatch);
    assert_eq!(table.row_count(), 0);
    let err = table.append(&[Value::Int32(1)]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    assert_eq!(table.row_count(), 0);
}

#[test]
fn test_compress_chunk_round_trip() {
    let table = Table::new(4);
    table.add_column("n", DataType::Int64, true).unwrap();
    table.add_column("s", DataType::String, false).unwrap();
    let rows: Vec<[Value; 2]> = vec![
        [Value::Int64(7), Value::from("pelican")],
        [Value::Null, Value::from("auk")],
        [Value::Int64(7), Value::from("gull")],
        [Value::Int64(3), Value::from("auk")],
        [Value::Int64(9), Value::from("tern")],
    ];
    for row in &rows {
        table.append(row).unwrap();
    }

    let before = read_all(&table);
    table.compress_chunk(ChunkId(0)).unwrap();

    let chunk = table.get_chunk(ChunkId(0)).unwrap();
    for index in 0..table.column_count() {
        assert!(matches!(
            chunk.segment(ColumnId(index as u16)).unwrap(),
            Segment::Dict(_)
        ));
    }
    assert_eq!(read_all(&table), before);
    assert_eq!(table.row_count(), 5);
}

fn read_all(table: &Table) -> Vec<Vec<Value>> {
    let mut rows = Vec::new();
    for chunk_index in 0..table.chunk_count() {
        let chunk = table.get_chunk(ChunkId(chunk_index as u32)).unwrap();
        for offset in 0..chunk.len() {
            let mut row = Vec::new();
            for column in 0..chunk.column_count() {
                row.push(
                    chunk
                        .segment(ColumnId(column as u16))
                        .unwrap()
                        .value_at(offset)
                        .unwrap(),
                );
            }
            rows.push(row);
        }
    }
    rows
}

#[test]
fn test_compress_seals_tail() {
    let table = two_column_table(4);
    table.append(&[Value::Int32(1), Value::from("x")]).unwrap();
    table.append(&[Value::Int32(2), Value::from("y")]).unwrap();
    table.compress_chunk(ChunkId(0)).unwrap();

    // The sealed tail stays short; the next append opens a fresh chunk.
    table.append(&[Value::Int32(3), Value::from("z")]).unwrap();
    assert_eq!(table.chunk_count(), 2);
    assert_eq!(table.get_chunk(ChunkId(0)).unwrap().len(), 2);
    assert_eq!(table.get_chunk(ChunkId(1)).unwrap().len(), 1);
    assert_eq!(table.row_count(), 3);
}

#[test]
fn test_compress_errors_leave_chunk_in_place() {
    let table = two_column_table(4);
    table.append(&[Value::Int32(1), Value::from("x")]).unwrap();
    table.compress_chunk(ChunkId(0)).unwrap();
    let before = read_all(&table);

    let err = table.compress_chunk(ChunkId(0)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    assert_eq!(read_all(&table), before);

    let err = table.compress_chunk(ChunkId(7)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
}

#[test]
fn test_concurrent_compression_read_safety() {
    let table = Arc::new(two_column_table(4));
    for (a, b) in [(1, "x"), (2, "y"), (3, "z"), (4, "w"), (5, "v")] {
        table.append(&[Value::Int32(a), Value::from(b)]).unwrap();
    }

    // A handle taken before compression keeps reading the uncompressed
    // segments, whatever the table does meanwhile.
    let old_chunk = table.get_chunk(ChunkId(0)).unwrap();
    let old_segment = old_chunk.segment(ColumnId(0)).unwrap();

    let worker = {
        let table = table.clone();
        std::thread::spawn(move || table.compress_chunk(ChunkId(0)))
    };
    worker.join().unwrap().unwrap();

    assert!(matches!(old_segment, Segment::Value(_)));
    for (offset, expected) in [1, 2, 3, 4].iter().enumerate() {
        assert_eq!(
            old_segment.value_at(offset).unwrap(),
            Value::Int32(*expected)
        );
    }

    // A freshly taken handle sees the dictionary encoding with equal
    // values.
    let new_segment = table
        .get_chunk(ChunkId(0))
        .unwrap()
        .segment(ColumnId(0))
        .unwrap();
    assert!(matches!(new_segment, Segment::Dict(_)));
    for (offset, expected) in [1, 2, 3, 4].iter().enumerate() {
        assert_eq!(
            new_segment.value_at(offset).unwrap(),
            Value::Int32(*expected)
        );
    }
}

#[test]
fn test_concurrent_compression_of_distinct_chunks() {
    let table = Arc::new(two_column_table(2));
    for value in 0..8 {
        table
            .append(&[Value::Int32(value), Value::from("v")])
            .unwrap();
    }
    assert_eq!(table.chunk_count(), 4);

    let workers = (0..3_u32)
        .map(|chunk| {
            let table = table.clone();
            std::thread::spawn(move || table.compress_chunk(ChunkId(chunk)))
        })
        .collect::<Vec<_>>();
    for worker in workers {
        worker.join().unwrap().unwrap();
    }

    for chunk in 0..3_u32 {
        let segment = table
            .get_chunk(ChunkId(chunk))
            .unwrap()
            .segment(ColumnId(0))
            .unwrap();
        assert!(matches!(segment, Segment::Dict(_)));
    }
    assert_eq!(table.row_count(), 8);
}

#[test]
fn test_default_target_chunk_size() {
    let table = Table::default();
    assert_eq!(table.target_chunk_size(), crate::DEFAULT_TARGET_CHUNK_SIZE);
}

#[test]
fn test_with_chunk_is_sealed() {
    let source = two_column_table(4);
    source
        .append(&[Value::Int32(1), Value::from("x")])
        .unwrap();
    let chunk = (*source.get_chunk(ChunkId(0)).unwrap()).clone();

    let table = Table::with_chunk(source.definitions(), chunk, 4);
    assert_eq!(table.row_count(), 1);
    table.append(&[Value::Int32(2), Value::from("y")]).unwrap();
    assert_eq!(table.chunk_count(), 2);
    assert_eq!(table.get_chunk(ChunkId(0)).unwrap().len(), 1);
}
