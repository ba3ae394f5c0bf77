pub mod cli;
pub mod core;

pub use crate::core::db::{BatchEntry, Database};
pub use crate::core::error::{DbError, ErrorKind};
pub use crate::core::sql::{parse_statement, split_statements, ExecutionResult, SqlStatement};
pub use crate::core::types::{Column, ColumnType, QueryResult, Value};

/// 在一个全新的内存数据库上执行整段输入，返回每条语句的结果
pub fn execute_batch(input: &str) -> Vec<BatchEntry> {
    Database::new().execute_batch(input)
}
