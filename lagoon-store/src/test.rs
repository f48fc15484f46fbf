mod ref_segment;
mod table;

use lagoon_base::{ColumnValue, Value};

use crate::ValueColumn;

// Builds a column from literal cell values, NULLs included.
pub(crate) fn column_of<T: ColumnValue>(nullable: bool, values: &[Value]) -> ValueColumn<T> {
    let mut column = ValueColumn::new(nullable);
    for value in values {
        column.append(value).unwrap();
    }
    column
}
