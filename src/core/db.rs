use tracing::debug;

use crate::core::error::DbError;
use crate::core::sql::{parse_statement, split_statements, ExecutionResult, SqlExecutor, SqlStatement};
use crate::core::storage::{memory::MemoryStorage, Storage};
use crate::core::types::{Column, Table};

/// 批处理中一条语句的结果
#[derive(Debug)]
pub struct BatchEntry {
    /// 从 1 开始的语句序号
    pub index: usize,
    pub statement: String,
    pub result: Result<ExecutionResult, DbError>,
}

pub struct Database {
    storage: Box<dyn Storage>,
}

impl Default for Database {
    fn default() -> Self {
        Self::new()
    }
}

impl Database {
    pub fn new() -> Self {
        Self::with_storage(Box::new(MemoryStorage::new()))
    }

    pub fn with_storage(storage: Box<dyn Storage>) -> Self {
        Database { storage }
    }

    /// 解析并执行一条语句（不含结尾分号）
    pub fn execute_sql(&mut self, sql: &str) -> Result<ExecutionResult, DbError> {
        debug!(sql, "executing statement");
        let statement = parse_statement(sql)?;
        self.execute(statement)
    }

    pub fn execute(&mut self, statement: SqlStatement) -> Result<ExecutionResult, DbError> {
        SqlExecutor::new(&mut *self.storage).execute(statement)
    }

    /// 拆分整段输入并逐条执行。某条语句失败不影响后续语句。
    pub fn execute_batch(&mut self, input: &str) -> Vec<BatchEntry> {
        split_statements(input)
            .into_iter()
            .enumerate()
            .map(|(i, statement)| {
                let result = self.execute_sql(&statement);
                if let Err(e) = &result {
                    debug!(index = i + 1, error = %e, "statement failed");
                }
                BatchEntry {
                    index: i + 1,
                    statement,
                    result,
                }
            })
            .collect()
    }

    // 表操作
    pub fn create_table(&mut self, name: &str, columns: Vec<Column>) -> Result<(), DbError> {
        let table = Table::new(name.to_string(), columns)?;
        self.storage.create_table(table)
    }

    pub fn table(&self, name: &str) -> Result<&Table, DbError> {
        self.storage
            .get_table(name)
            .ok_or_else(|| DbError::TableNotFound(name.to_string()))
    }

    pub fn table_mut(&mut self, name: &str) -> Result<&mut Table, DbError> {
        self.storage
            .get_table_mut(name)
            .ok_or_else(|| DbError::TableNotFound(name.to_string()))
    }

    pub fn list_tables(&self) -> Vec<String> {
        self.storage.list_tables()
    }
}
