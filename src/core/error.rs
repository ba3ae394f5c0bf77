use crate::core::types::TypeError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DbError {
    #[error("{0}")]
    SqlError(String),

    #[error("Unknown table: {0}")]
    TableNotFound(String),

    #[error("Unknown column: {0}")]
    ColumnNotFound(String),

    #[error("Table already exists: {0}")]
    TableExists(String),

    #[error("Duplicate column {column} in table {table}")]
    DuplicateColumn { table: String, column: String },

    #[error("INSERT values tuple length mismatch: expected {expected}, got {actual}")]
    ArityMismatch { expected: usize, actual: usize },

    #[error("{0}")]
    TypeError(#[from] TypeError),
}

/// 错误类别，调用方据此决定是继续下一条语句还是向上传播
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Parse,
    NotFound,
    DuplicateName,
    TypeMismatch,
    ArityMismatch,
}

impl DbError {
    pub fn parse(message: impl Into<String>) -> Self {
        DbError::SqlError(message.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            DbError::SqlError(_) => ErrorKind::Parse,
            DbError::TableNotFound(_) | DbError::ColumnNotFound(_) => ErrorKind::NotFound,
            DbError::TableExists(_) | DbError::DuplicateColumn { .. } => ErrorKind::DuplicateName,
            DbError::ArityMismatch { .. } => ErrorKind::ArityMismatch,
            DbError::TypeError(_) => ErrorKind::TypeMismatch,
        }
    }

    // 批处理报告中使用的阶段名
    pub fn stage(&self) -> &'static str {
        match self.kind() {
            ErrorKind::Parse => "Parse error",
            _ => "Execution error",
        }
    }
}
