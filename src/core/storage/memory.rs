use std::collections::HashMap;

use crate::core::error::DbError;
use crate::core::types::Table;
use super::Storage;

#[derive(Debug, Default)]
pub struct MemoryStorage {
    tables: HashMap<String, Table>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        MemoryStorage {
            tables: HashMap::new(),
        }
    }
}

impl Storage for MemoryStorage {
    fn create_table(&mut self, table: Table) -> Result<(), DbError> {
        if self.tables.contains_key(table.name()) {
            return Err(DbError::TableExists(table.name().to_string()));
        }
        self.tables.insert(table.name().to_string(), table);
        Ok(())
    }

    fn get_table(&self, table_name: &str) -> Option<&Table> {
        self.tables.get(table_name)
    }

    fn get_table_mut(&mut self, table_name: &str) -> Option<&mut Table> {
        self.tables.get_mut(table_name)
    }

    fn list_tables(&self) -> Vec<String> {
        let mut names: Vec<String> = self.tables.keys().cloned().collect();
        names.sort();
        names
    }
}
