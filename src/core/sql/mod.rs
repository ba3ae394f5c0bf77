mod executor;
mod formatter;
mod lexer;
mod parser;
mod splitter;

pub use executor::{ExecutionResult, SqlExecutor};
pub use formatter::TableFormatter;
pub use lexer::{Lexer, Token};
pub use parser::Parser;
pub use splitter::split_statements;

use std::cmp::Ordering;
use std::fmt;

use crate::core::error::DbError;
use crate::core::types::{Column, Value};

// SQL语句类型
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqlStatement {
    CreateTable {
        name: String,
        columns: Vec<Column>,
    },
    Insert {
        table: String,
        columns: Vec<String>,
        rows: Vec<Vec<Value>>,
    },
    Delete {
        table: String,
        where_clause: Option<WhereClause>,
    },
    Update {
        table: String,
        set: Vec<(String, Value)>,
        where_clause: Option<WhereClause>,
    },
    Select {
        columns: Projection,
        table: String,
        where_clause: Option<WhereClause>,
    },
}

// SELECT 的输出列
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Projection {
    All,
    Columns(Vec<String>),
}

// WHERE子句：单个 列-操作符-字面量 比较
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WhereClause {
    pub column: String,
    pub operator: Operator,
    pub value: Value,
}

// 操作符
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Eq,
    Ne,
    Lt,
    Gt,
    Le,
    Ge,
}

/// 解析一条已拆分好的语句
pub fn parse_statement(sql: &str) -> Result<SqlStatement, DbError> {
    Parser::new(sql).parse()
}

impl Operator {
    /// 把三路比较结果映射为该操作符的真假
    pub fn matches(self, ordering: Ordering) -> bool {
        match self {
            Operator::Eq => ordering == Ordering::Equal,
            Operator::Ne => ordering != Ordering::Equal,
            Operator::Lt => ordering == Ordering::Less,
            Operator::Gt => ordering == Ordering::Greater,
            Operator::Le => ordering != Ordering::Greater,
            Operator::Ge => ordering != Ordering::Less,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Operator::Eq => "=",
            Operator::Ne => "!=",
            Operator::Lt => "<",
            Operator::Gt => ">",
            Operator::Le => "<=",
            Operator::Ge => ">=",
        }
    }
}

impl WhereClause {
    /// 用单元格的值求条件；类型不同时返回类型错误，整个操作随之中止
    pub fn matches_value(&self, cell: &Value) -> Result<bool, DbError> {
        let ordering = cell.compare(&self.value)?;
        Ok(self.operator.matches(ordering))
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl fmt::Display for WhereClause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "WHERE {} {} {}", self.column, self.operator, self.value.to_literal())
    }
}

fn write_where(f: &mut fmt::Formatter<'_>, where_clause: &Option<WhereClause>) -> fmt::Result {
    match where_clause {
        Some(clause) => write!(f, " {}", clause),
        None => Ok(()),
    }
}

fn join_literals(values: &[Value]) -> String {
    values
        .iter()
        .map(Value::to_literal)
        .collect::<Vec<_>>()
        .join(", ")
}

// 规范化的语句文本，重新解析后得到相同的语句
impl fmt::Display for SqlStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SqlStatement::CreateTable { name, columns } => {
                let defs = columns
                    .iter()
                    .map(|c| format!("{} {}", c.name, c.data_type))
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(f, "CREATE TABLE {} ({})", name, defs)
            }
            SqlStatement::Insert { table, columns, rows } => {
                let tuples = rows
                    .iter()
                    .map(|row| format!("({})", join_literals(row)))
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(f, "INSERT INTO {} ({}) VALUES {}", table, columns.join(", "), tuples)
            }
            SqlStatement::Delete { table, where_clause } => {
                write!(f, "DELETE FROM {}", table)?;
                write_where(f, where_clause)
            }
            SqlStatement::Update { table, set, where_clause } => {
                let assignments = set
                    .iter()
                    .map(|(column, value)| format!("{} = {}", column, value.to_literal()))
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(f, "UPDATE {} SET {}", table, assignments)?;
                write_where(f, where_clause)
            }
            SqlStatement::Select { columns, table, where_clause } => {
                match columns {
                    Projection::All => write!(f, "SELECT * FROM {}", table)?,
                    Projection::Columns(names) => {
                        write!(f, "SELECT {} FROM {}", names.join(", "), table)?
                    }
                }
                write_where(f, where_clause)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn operators_follow_three_way_outcome() {
        use std::cmp::Ordering::*;
        let table = [
            (Operator::Eq, [false, true, false]),
            (Operator::Ne, [true, false, true]),
            (Operator::Lt, [true, false, false]),
            (Operator::Gt, [false, false, true]),
            (Operator::Le, [true, true, false]),
            (Operator::Ge, [false, true, true]),
        ];
        for (op, expected) in table {
            let actual = [op.matches(Less), op.matches(Equal), op.matches(Greater)];
            assert_eq!(actual, expected, "operator {}", op);
        }
    }

    #[test]
    fn canonical_text_reparses_to_same_statement() {
        let statements = [
            "CREATE TABLE people (name str, age int)",
            "CREATE TABLE empty ()",
            "INSERT INTO people (name, age) VALUES (\"a;b\", -3), (\"\", 0)",
            "INSERT INTO people () VALUES ()",
            "DELETE FROM people",
            "DELETE FROM people WHERE age >= 18",
            "UPDATE people SET age = 1, name = \"x y\" WHERE name != \"bob\"",
            "SELECT * FROM people WHERE name < \"m\"",
            "SELECT age, name FROM people",
        ];
        for sql in statements {
            let parsed = parse_statement(sql).unwrap();
            let reparsed = parse_statement(&parsed.to_string()).unwrap();
            assert_eq!(parsed, reparsed, "{}", sql);
        }
    }
}
