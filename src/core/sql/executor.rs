use tracing::{debug, info};

use crate::core::error::DbError;
use crate::core::storage::Storage;
use crate::core::types::{QueryResult, Table, Value};
use super::{Projection, SqlStatement};

/// 一条语句的执行结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionResult {
    TableCreated,
    RowsInserted(usize),
    RowsDeleted(usize),
    RowsUpdated(usize),
    Query(QueryResult),
}

impl ExecutionResult {
    /// 只有 SELECT 产生表格结果
    pub fn query(&self) -> Option<&QueryResult> {
        match self {
            ExecutionResult::Query(result) => Some(result),
            _ => None,
        }
    }

    pub fn into_query(self) -> Option<QueryResult> {
        match self {
            ExecutionResult::Query(result) => Some(result),
            _ => None,
        }
    }
}

pub struct SqlExecutor<'a> {
    storage: &'a mut dyn Storage,
}

impl<'a> SqlExecutor<'a> {
    pub fn new(storage: &'a mut dyn Storage) -> Self {
        SqlExecutor { storage }
    }

    pub fn execute(&mut self, statement: SqlStatement) -> Result<ExecutionResult, DbError> {
        match statement {
            SqlStatement::CreateTable { name, columns } => {
                let table = Table::new(name, columns)?;
                info!(table = table.name(), columns = table.columns().len(), "creating table");
                self.storage.create_table(table)?;
                Ok(ExecutionResult::TableCreated)
            }
            SqlStatement::Insert { table, columns, rows } => {
                let table_data = self.table_mut(&table)?;
                let inserted = insert_rows(table_data, &columns, rows)?;
                debug!(table = %table, inserted, "rows inserted");
                Ok(ExecutionResult::RowsInserted(inserted))
            }
            SqlStatement::Delete { table, where_clause } => {
                let deleted = self.table_mut(&table)?.delete_where(where_clause.as_ref())?;
                debug!(table = %table, deleted, "rows deleted");
                Ok(ExecutionResult::RowsDeleted(deleted))
            }
            SqlStatement::Update { table, set, where_clause } => {
                let updated = self
                    .table_mut(&table)?
                    .update_where(&set, where_clause.as_ref())?;
                debug!(table = %table, updated, "rows updated");
                Ok(ExecutionResult::RowsUpdated(updated))
            }
            SqlStatement::Select { columns, table, where_clause } => {
                let table_data = self
                    .storage
                    .get_table(&table)
                    .ok_or_else(|| DbError::TableNotFound(table.clone()))?;

                let projection = match &columns {
                    Projection::All => None,
                    Projection::Columns(names) => Some(names.as_slice()),
                };
                let result = table_data.select_where(projection, where_clause.as_ref())?;
                debug!(table = %table, rows = result.rows.len(), "query finished");
                Ok(ExecutionResult::Query(result))
            }
        }
    }

    fn table_mut(&mut self, name: &str) -> Result<&mut Table, DbError> {
        self.storage
            .get_table_mut(name)
            .ok_or_else(|| DbError::TableNotFound(name.to_string()))
    }
}

// 按列名把每个元组展开成整行，未列出的列取默认值。
// 每个元组独立插入，遇到第一个失败就停止，之前的元组保留。
fn insert_rows(table: &mut Table, columns: &[String], rows: Vec<Vec<Value>>) -> Result<usize, DbError> {
    let targets = columns
        .iter()
        .map(|column| table.column_index(column))
        .collect::<Result<Vec<_>, _>>()?;

    let mut inserted = 0;
    for tuple in rows {
        if tuple.len() != targets.len() {
            return Err(DbError::ArityMismatch {
                expected: targets.len(),
                actual: tuple.len(),
            });
        }

        let mut row = vec![None; table.columns().len()];
        for (&index, value) in targets.iter().zip(tuple) {
            row[index] = Some(value);
        }
        table.insert_row(row)?;
        inserted += 1;
    }
    Ok(inserted)
}
