pub mod memory;

use crate::core::error::DbError;
use crate::core::types::Table;

/// 表的存放位置。表一旦创建就一直存在，没有删除操作。
pub trait Storage {
    fn create_table(&mut self, table: Table) -> Result<(), DbError>;
    fn get_table(&self, table_name: &str) -> Option<&Table>;
    fn get_table_mut(&mut self, table_name: &str) -> Option<&mut Table>;
    fn list_tables(&self) -> Vec<String>;
}
