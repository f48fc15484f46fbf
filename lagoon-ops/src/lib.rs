// Relational operators. An operator consumes the table produced by its
// input operator and produces a table of its own, synchronously, on the
// calling thread. Filtering operators produce reference-segment tables:
// zero-copy views over the materialised table they scanned.

mod scan;

pub use scan::{ScanOp, TableScan};

use lagoon_base::Result;
use lagoon_store::{Catalog, Table};
use std::sync::Arc;

pub trait Operator: Send + Sync {
    fn execute(&self) -> Result<Arc<Table>>;
}

// Resolves a named table through the process-wide catalog; the usual root
// of an operator graph.
pub struct GetTable {
    name: String,
}

impl GetTable {
    pub fn new(name: impl Into<String>) -> GetTable {
        GetTable { name: name.into() }
    }

    pub fn table_name(&self) -> &str {
        &self.name
    }
}

impl Operator for GetTable {
    fn execute(&self) -> Result<Arc<Table>> {
        Catalog::global().get(&self.name)
    }
}

// Lifts an existing table into an operator graph, chiefly for tests and
// ad-hoc pipelines.
pub struct TableWrapper {
    table: Arc<Table>,
}

impl TableWrapper {
    pub fn new(table: Arc<Table>) -> TableWrapper {
        TableWrapper { table }
    }
}

impl Operator for TableWrapper {
    fn execute(&self) -> Result<Arc<Table>> {
        Ok(self.table.clone())
    }
}
