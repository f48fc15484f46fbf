use crate::table::Table;
use lagoon_base::{err, ErrorKind, Result};
use parking_lot::RwLock;
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::io::Write;
use std::sync::{Arc, OnceLock};

// The process-wide registry of named tables. Names are unique; tables are
// shared out as Arc handles, so dropping a name does not invalidate anyone
// still holding the table.
pub struct Catalog {
    tables: RwLock<BTreeMap<String, Arc<Table>>>,
}

impl Catalog {
    pub fn new() -> Catalog {
        Catalog {
            tables: RwLock::new(BTreeMap::new()),
        }
    }

    // The single process-wide instance. First use constructs it; the
    // OnceLock makes concurrent first uses race-free.
    pub fn global() -> &'static Catalog {
        static CATALOG: OnceLock<Catalog> = OnceLock::new();
        CATALOG.get_or_init(Catalog::new)
    }

    pub fn add(&self, name: &str, table: Arc<Table>) -> Result<()> {
        match self.tables.write().entry(name.to_string()) {
            Entry::Occupied(_) => Err(err(
                ErrorKind::NameExists,
                format!("table {:?} already exists", name),
            )),
            Entry::Vacant(entry) => {
                entry.insert(table);
                Ok(())
            }
        }
    }

    pub fn drop_table(&self, name: &str) -> Result<()> {
        self.tables.write().remove(name).map(|_| ()).ok_or_else(|| {
            err(
                ErrorKind::NoSuchName,
                format!("no table named {:?}", name),
            )
        })
    }

    pub fn get(&self, name: &str) -> Result<Arc<Table>> {
        self.tables.read().get(name).cloned().ok_or_else(|| {
            err(
                ErrorKind::NoSuchName,
                format!("no table named {:?}", name),
            )
        })
    }

    pub fn has(&self, name: &str) -> bool {
        self.tables.read().contains_key(name)
    }

    pub fn names(&self) -> Vec<String> {
        self.tables.read().keys().cloned().collect()
    }

    pub fn reset(&self) {
        self.tables.write().clear();
    }

    // Emits one fixed text block per table, in the map's enumeration
    // order.
    pub fn print(&self, out: &mut impl Write) -> std::io::Result<()> {
        let tables = self.tables.read();
        for (name, table) in tables.iter() {
            writeln!(out, "=== {} ===", name)?;
            writeln!(out, "#columns: {}", table.column_count())?;
            writeln!(out, "#rows: {}", table.row_count())?;
            writeln!(out, "#chunks: {}", table.chunk_count())?;
            writeln!(out, "columns:")?;
            for column in table.definitions() {
                writeln!(out, "  {} ({})", column.name, column.data_type)?;
            }
        }
        Ok(())
    }
}

impl Default for Catalog {
    fn default() -> Catalog {
        Catalog::new()
    }
}
