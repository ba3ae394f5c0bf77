use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::core::error::DbError;
use crate::core::sql::WhereClause;

/// 列的标量类型，建表时确定，之后不再改变
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnType {
    Int,
    Str,
}

/// 带类型标签的标量值
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Int(i64),
    Str(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub name: String,
    pub data_type: ColumnType,
}

/// 与输出格式无关的查询结果
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct QueryResult {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TypeError {
    #[error("Type mismatch in comparison: {left} vs {right}")]
    Comparison { left: ColumnType, right: ColumnType },

    #[error("Type mismatch on insert into column {column}: expected {expected}, got {actual}")]
    Insert {
        column: String,
        expected: ColumnType,
        actual: ColumnType,
    },

    #[error("Type mismatch in UPDATE for column {column}: expected {expected}, got {actual}")]
    Update {
        column: String,
        expected: ColumnType,
        actual: ColumnType,
    },
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnType::Int => write!(f, "int"),
            ColumnType::Str => write!(f, "str"),
        }
    }
}

impl Value {
    pub fn default_of(column_type: ColumnType) -> Self {
        match column_type {
            ColumnType::Int => Value::Int(0),
            ColumnType::Str => Value::Str(String::new()),
        }
    }

    pub fn column_type(&self) -> ColumnType {
        match self {
            Value::Int(_) => ColumnType::Int,
            Value::Str(_) => ColumnType::Str,
        }
    }

    /// 同类型值之间的全序比较；整数按数值，字符串按字节字典序。
    /// 不同类型的值不可比较，返回类型错误而不是做隐式转换。
    pub fn compare(&self, other: &Value) -> Result<Ordering, TypeError> {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => Ok(a.cmp(b)),
            (Value::Str(a), Value::Str(b)) => Ok(a.as_bytes().cmp(b.as_bytes())),
            _ => Err(TypeError::Comparison {
                left: self.column_type(),
                right: other.column_type(),
            }),
        }
    }

    /// 语句文本中的字面量形式，字符串带双引号
    pub fn to_literal(&self) -> String {
        match self {
            Value::Int(n) => n.to_string(),
            Value::Str(s) => format!("\"{}\"", s),
        }
    }
}

// 展示形式：整数为十进制文本，字符串原样输出
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(n) => write!(f, "{}", n),
            Value::Str(s) => write!(f, "{}", s),
        }
    }
}

impl Column {
    pub fn new(name: impl Into<String>, data_type: ColumnType) -> Self {
        Column {
            name: name.into(),
            data_type,
        }
    }
}

/// 内存表：列定义在构造后不可变，行按插入顺序保存。
///
/// 每一行的单元格数量等于列数，且第 `i` 个单元格的类型与第 `i` 列一致，
/// 所有修改操作都会维持这一点。
#[derive(Debug, Clone)]
pub struct Table {
    name: String,
    columns: Vec<Column>,
    column_index: HashMap<String, usize>,
    rows: Vec<Vec<Value>>,
}

impl Table {
    pub fn new(name: String, columns: Vec<Column>) -> Result<Self, DbError> {
        let mut column_index = HashMap::with_capacity(columns.len());
        for (i, column) in columns.iter().enumerate() {
            if column_index.insert(column.name.clone(), i).is_some() {
                return Err(DbError::DuplicateColumn {
                    table: name,
                    column: column.name.clone(),
                });
            }
        }

        Ok(Table {
            name,
            columns,
            column_index,
            rows: Vec::new(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    pub fn column_index(&self, column: &str) -> Result<usize, DbError> {
        self.column_index
            .get(column)
            .copied()
            .ok_or_else(|| DbError::ColumnNotFound(column.to_string()))
    }

    /// 插入一行。`values` 与列一一对应，`None` 的位置填入该列类型的默认值。
    pub fn insert_row(&mut self, values: Vec<Option<Value>>) -> Result<(), DbError> {
        if values.len() != self.columns.len() {
            return Err(DbError::ArityMismatch {
                expected: self.columns.len(),
                actual: values.len(),
            });
        }

        let mut row = Vec::with_capacity(self.columns.len());
        for (value, column) in values.into_iter().zip(&self.columns) {
            match value {
                Some(value) => {
                    if value.column_type() != column.data_type {
                        return Err(TypeError::Insert {
                            column: column.name.clone(),
                            expected: column.data_type,
                            actual: value.column_type(),
                        }
                        .into());
                    }
                    row.push(value);
                }
                None => row.push(Value::default_of(column.data_type)),
            }
        }

        self.rows.push(row);
        Ok(())
    }

    /// 删除满足条件的行，返回删除的行数。
    /// 先对所有行求值，再统一删除，条件求值失败时表保持不变。
    pub fn delete_where(&mut self, where_clause: Option<&WhereClause>) -> Result<usize, DbError> {
        let matcher = self.matcher(where_clause);
        let mut matched = Vec::with_capacity(self.rows.len());
        for row in &self.rows {
            matched.push(matcher.matches(row)?);
        }

        let before = self.rows.len();
        let mut flags = matched.into_iter();
        self.rows.retain(|_| !flags.next().unwrap_or(false));
        Ok(before - self.rows.len())
    }

    /// 按赋值列表原地更新满足条件的行，返回更新的行数。
    ///
    /// 列名在访问任何行之前全部解析；类型检查逐行逐列进行，遇到第一个
    /// 不匹配就停止，之前已经写入的行和单元格保持写入后的状态。
    pub fn update_where(
        &mut self,
        set: &[(String, Value)],
        where_clause: Option<&WhereClause>,
    ) -> Result<usize, DbError> {
        let targets = set
            .iter()
            .map(|(column, _)| self.column_index(column))
            .collect::<Result<Vec<_>, _>>()?;
        let matcher = self.matcher(where_clause);

        let mut updated = 0;
        for row in self.rows.iter_mut() {
            if !matcher.matches(row)? {
                continue;
            }
            for (&index, (_, value)) in targets.iter().zip(set) {
                let column = &self.columns[index];
                if value.column_type() != column.data_type {
                    return Err(TypeError::Update {
                        column: column.name.clone(),
                        expected: column.data_type,
                        actual: value.column_type(),
                    }
                    .into());
                }
                row[index] = value.clone();
            }
            updated += 1;
        }
        Ok(updated)
    }

    /// 投影并过滤。`columns` 为 `None` 时按表结构顺序输出全部列。
    pub fn select_where(
        &self,
        columns: Option<&[String]>,
        where_clause: Option<&WhereClause>,
    ) -> Result<QueryResult, DbError> {
        let projection = self.build_projection(columns)?;
        let matcher = self.matcher(where_clause);

        let headers = projection
            .iter()
            .map(|&i| self.columns[i].name.clone())
            .collect();

        let mut rows = Vec::new();
        for row in &self.rows {
            if matcher.matches(row)? {
                rows.push(projection.iter().map(|&i| row[i].to_string()).collect());
            }
        }

        Ok(QueryResult { headers, rows })
    }

    fn build_projection(&self, columns: Option<&[String]>) -> Result<Vec<usize>, DbError> {
        match columns {
            None => Ok((0..self.columns.len()).collect()),
            Some(names) => names.iter().map(|name| self.column_index(name)).collect(),
        }
    }

    fn matcher<'w>(&self, where_clause: Option<&'w WhereClause>) -> RowMatcher<'w> {
        match where_clause {
            None => RowMatcher::All,
            Some(clause) => RowMatcher::Condition {
                index: self.column_index(&clause.column),
                clause,
            },
        }
    }
}

// 行过滤器。条件列的查找结果先保存下来，求值第一行时才报告未知列，
// 所以没有行被访问时不会出错
enum RowMatcher<'w> {
    All,
    Condition {
        index: Result<usize, DbError>,
        clause: &'w WhereClause,
    },
}

impl RowMatcher<'_> {
    fn matches(&self, row: &[Value]) -> Result<bool, DbError> {
        match self {
            RowMatcher::All => Ok(true),
            RowMatcher::Condition { index, clause } => {
                let index = index.as_ref().map_err(Clone::clone)?;
                clause.matches_value(&row[*index])
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::sql::Operator;

    fn people() -> Table {
        let mut table = Table::new(
            "people".to_string(),
            vec![Column::new("name", ColumnType::Str), Column::new("age", ColumnType::Int)],
        )
        .unwrap();
        for (name, age) in [("alice", 30), ("bob", 25), ("carol", 35)] {
            table
                .insert_row(vec![Some(Value::Str(name.to_string())), Some(Value::Int(age))])
                .unwrap();
        }
        table
    }

    fn condition(column: &str, operator: Operator, value: Value) -> WhereClause {
        WhereClause {
            column: column.to_string(),
            operator,
            value,
        }
    }

    #[test]
    fn compare_orders_within_a_tag() {
        assert_eq!(Value::Int(-3).compare(&Value::Int(2)).unwrap(), Ordering::Less);
        assert_eq!(
            Value::Str("b".into()).compare(&Value::Str("ab".into())).unwrap(),
            Ordering::Greater
        );
        assert_eq!(
            Value::Str("Z".into()).compare(&Value::Str("a".into())).unwrap(),
            Ordering::Less
        );
    }

    #[test]
    fn compare_across_tags_is_a_type_error() {
        let err = Value::Int(1).compare(&Value::Str("1".into())).unwrap_err();
        assert_eq!(
            err,
            TypeError::Comparison {
                left: ColumnType::Int,
                right: ColumnType::Str
            }
        );
    }

    #[test]
    fn defaults_per_type() {
        assert_eq!(Value::default_of(ColumnType::Int), Value::Int(0));
        assert_eq!(Value::default_of(ColumnType::Str), Value::Str(String::new()));
    }

    #[test]
    fn duplicate_column_names_are_rejected() {
        let err = Table::new(
            "t".to_string(),
            vec![Column::new("a", ColumnType::Int), Column::new("a", ColumnType::Str)],
        )
        .unwrap_err();
        assert!(matches!(err, DbError::DuplicateColumn { .. }));
    }

    #[test]
    fn insert_fills_defaults_and_checks_types() {
        let mut table = people();
        table.insert_row(vec![None, Some(Value::Int(1))]).unwrap();
        assert_eq!(table.rows()[3], vec![Value::Str(String::new()), Value::Int(1)]);

        let err = table
            .insert_row(vec![Some(Value::Int(7)), None])
            .unwrap_err();
        assert!(matches!(err, DbError::TypeError(TypeError::Insert { .. })));
        assert_eq!(table.rows().len(), 4);
    }

    #[test]
    fn select_projects_in_requested_order() {
        let table = people();
        let columns = vec!["age".to_string(), "name".to_string()];
        let result = table
            .select_where(Some(&columns), Some(&condition("age", Operator::Le, Value::Int(30))))
            .unwrap();
        assert_eq!(result.headers, vec!["age", "name"]);
        assert_eq!(result.rows, vec![vec!["30", "alice"], vec!["25", "bob"]]);
    }

    #[test]
    fn select_unknown_column_fails() {
        let table = people();
        let columns = vec!["height".to_string()];
        let err = table.select_where(Some(&columns), None).unwrap_err();
        assert_eq!(err, DbError::ColumnNotFound("height".to_string()));
    }

    #[test]
    fn delete_returns_removed_count() {
        let mut table = people();
        let removed = table
            .delete_where(Some(&condition("name", Operator::Ne, Value::Str("bob".into()))))
            .unwrap();
        assert_eq!(removed, 2);
        assert_eq!(table.rows().len(), 1);
        assert_eq!(table.delete_where(None).unwrap(), 1);
        assert!(table.rows().is_empty());
    }

    #[test]
    fn delete_with_mismatched_literal_removes_nothing() {
        let mut table = people();
        let err = table
            .delete_where(Some(&condition("age", Operator::Eq, Value::Str("30".into()))))
            .unwrap_err();
        assert!(matches!(err, DbError::TypeError(TypeError::Comparison { .. })));
        assert_eq!(table.rows().len(), 3);
    }

    #[test]
    fn update_stops_at_first_mismatch_without_rollback() {
        let mut table = people();
        let set = vec![
            ("age".to_string(), Value::Int(99)),
            ("name".to_string(), Value::Int(1)),
        ];
        let err = table.update_where(&set, None).unwrap_err();
        assert!(matches!(err, DbError::TypeError(TypeError::Update { .. })));
        // 第一行的 age 已经写入，其余行未被访问
        assert_eq!(table.rows()[0][1], Value::Int(99));
        assert_eq!(table.rows()[1][1], Value::Int(25));
    }

    #[test]
    fn update_unknown_column_touches_nothing() {
        let mut table = people();
        let set = vec![
            ("age".to_string(), Value::Int(1)),
            ("missing".to_string(), Value::Int(1)),
        ];
        assert!(table.update_where(&set, None).is_err());
        assert_eq!(table.rows()[0][1], Value::Int(30));
    }
}
