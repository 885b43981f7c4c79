// Copyright 2025 Stoolap Contributors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Table catalog
//!
//! User tables live in a collation-keyed map behind a read/write lock. The
//! `systypes` system table is built on first use and held weakly, so a
//! simulation that never queries it pays nothing for it.

use std::sync::{Arc, Weak};

use parking_lot::{Mutex, RwLock};
use tracing::debug;

use super::systypes::{self, SYSTYPES};
use crate::core::{default_collation, CollatedMap, DataValue, Error, Result, Table};

#[derive(Default)]
struct SystemTableCache {
    table: Weak<Table>,
    retained: Option<Arc<Table>>,
}

/// The set of tables visible to a simulation
pub struct Catalog {
    tables: RwLock<CollatedMap<Table>>,
    system_types: Mutex<SystemTableCache>,
    retain_system_catalog: bool,
}

impl Catalog {
    pub fn new(retain_system_catalog: bool) -> Self {
        Self {
            tables: RwLock::new(CollatedMap::new()),
            system_types: Mutex::new(SystemTableCache::default()),
            retain_system_catalog,
        }
    }

    /// Add a new user table
    pub fn create_table(&self, table: Table) -> Result<()> {
        let mut tables = self.tables.write();
        if tables.contains_key(table.name()) {
            return Err(Error::ObjectAlreadyExists(table.name().to_string()));
        }
        debug!(
            table = %table.name(),
            columns = table.columns().len(),
            "created table"
        );
        tables.insert(table.name().to_string(), table);
        Ok(())
    }

    /// Append rows to a user table, returning how many were stored
    pub fn insert(
        &self,
        table_name: &str,
        columns: Option<&[String]>,
        rows: Vec<Vec<DataValue>>,
    ) -> Result<usize> {
        let mut tables = self.tables.write();
        let table = tables
            .get_mut(table_name)
            .ok_or_else(|| Error::InvalidObjectName(table_name.to_string()))?;
        let count = table.insert(columns, rows)?;
        debug!(table = %table.name(), rows = count, "inserted rows");
        Ok(count)
    }

    /// Run `f` against a table by name
    ///
    /// User tables shadow the system catalog. Returns `None` when no table
    /// has the name.
    pub fn read<R>(&self, name: &str, f: impl FnOnce(&Table) -> R) -> Result<Option<R>> {
        {
            let tables = self.tables.read();
            if let Some(table) = tables.get(name) {
                return Ok(Some(f(table)));
            }
        }
        if Self::is_system_table(name) {
            let table = self.system_types()?;
            return Ok(Some(f(&table)));
        }
        Ok(None)
    }

    /// Check whether a user table exists
    pub fn contains_table(&self, name: &str) -> bool {
        self.tables.read().contains_key(name)
    }

    /// Names of all user tables
    pub fn table_names(&self) -> Vec<String> {
        let tables = self.tables.read();
        let mut names: Vec<String> = tables.iter().map(|(name, _)| name.to_string()).collect();
        names.sort_unstable_by(|a, b| default_collation().compare(a, b));
        names
    }

    /// Check whether a name refers to the system catalog
    pub fn is_system_table(name: &str) -> bool {
        default_collation().equals(name, SYSTYPES)
    }

    /// The `systypes` table, rebuilt if every earlier copy was dropped
    pub fn system_types(&self) -> Result<Arc<Table>> {
        let mut cache = self.system_types.lock();
        if let Some(table) = cache.table.upgrade() {
            return Ok(table);
        }
        let table = Arc::new(systypes::build()?);
        debug!(rows = table.rows().len(), "materialized system catalog");
        cache.table = Arc::downgrade(&table);
        if self.retain_system_catalog {
            cache.retained = Some(Arc::clone(&table));
        }
        Ok(table)
    }
}

impl std::fmt::Debug for Catalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Catalog")
            .field("tables", &self.table_names())
            .field("retain_system_catalog", &self.retain_system_catalog)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Column, DataType};

    fn table(name: &str) -> Table {
        Table::new(name, vec![Column::new("a", DataType::Int, true)]).unwrap()
    }

    #[test]
    fn test_create_and_read() {
        let catalog = Catalog::new(true);
        catalog.create_table(table("Users")).unwrap();
        assert!(catalog.contains_table("USERS"));
        let width = catalog.read("users", |t| t.columns().len()).unwrap();
        assert_eq!(width, Some(1));
        assert_eq!(catalog.read("missing", |_| ()).unwrap(), None);
    }

    #[test]
    fn test_duplicate_table() {
        let catalog = Catalog::new(true);
        catalog.create_table(table("t")).unwrap();
        assert_eq!(
            catalog.create_table(table("T")),
            Err(Error::ObjectAlreadyExists("T".to_string()))
        );
    }

    #[test]
    fn test_insert_unknown_table() {
        let catalog = Catalog::new(true);
        assert_eq!(
            catalog.insert("nope", None, vec![]),
            Err(Error::InvalidObjectName("nope".to_string()))
        );
    }

    #[test]
    fn test_system_catalog_retained() {
        let catalog = Catalog::new(true);
        let first = catalog.system_types().unwrap();
        drop(first);
        let a = catalog.system_types().unwrap();
        let b = catalog.system_types().unwrap();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn test_system_catalog_regenerated() {
        let catalog = Catalog::new(false);
        let first = catalog.system_types().unwrap();
        let rows = first.rows().len();
        drop(first);
        // Every copy was dropped; the next use rebuilds an equivalent table
        let second = catalog.system_types().unwrap();
        assert_eq!(second.rows().len(), rows);
        assert_eq!(catalog.read("SysTypes", |t| t.rows().len()).unwrap(), Some(34));
    }
}
