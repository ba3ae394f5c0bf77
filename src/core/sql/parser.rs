use crate::core::error::DbError;
use crate::core::types::{Column, ColumnType, Value};
use super::lexer::{Lexer, Token};
use super::{Operator, Projection, SqlStatement, WhereClause};

/// 递归下降语法分析器，一次解析一条完整语句。
///
/// 关键字区分大小写，只接受全大写；列类型名只接受小写的 `int` / `str`。
pub struct Parser<'a> {
    lexer: Lexer<'a>,
}

impl<'a> Parser<'a> {
    pub fn new(sql: &'a str) -> Self {
        Parser {
            lexer: Lexer::new(sql),
        }
    }

    pub fn parse(mut self) -> Result<SqlStatement, DbError> {
        let keyword = match self.lexer.next_token() {
            Token::Identifier(keyword) => keyword,
            token => {
                return Err(DbError::parse(format!(
                    "Expected statement keyword, found {}",
                    token
                )))
            }
        };

        let (statement, kind) = match keyword.as_str() {
            "CREATE" => (self.parse_create_table()?, "CREATE TABLE"),
            "INSERT" => (self.parse_insert()?, "INSERT"),
            "DELETE" => (self.parse_delete()?, "DELETE"),
            "UPDATE" => (self.parse_update()?, "UPDATE"),
            "SELECT" => (self.parse_select()?, "SELECT"),
            _ => {
                return Err(DbError::parse(format!(
                    "Unknown statement type: {} (keywords must be uppercase)",
                    keyword
                )))
            }
        };

        // 一次只接受一条语句
        if !self.lexer.is_at_end() {
            return Err(DbError::parse(format!("Unexpected tokens after {}", kind)));
        }
        Ok(statement)
    }

    fn parse_create_table(&mut self) -> Result<SqlStatement, DbError> {
        self.expect_keyword("TABLE")?;
        let name = self.expect_identifier()?;
        let columns = self.parse_paren_list(|parser| {
            let name = parser.expect_identifier()?;
            let data_type = parser.parse_column_type()?;
            Ok(Column { name, data_type })
        })?;
        Ok(SqlStatement::CreateTable { name, columns })
    }

    fn parse_column_type(&mut self) -> Result<ColumnType, DbError> {
        match self.lexer.next_token() {
            Token::Identifier(type_name) => match type_name.as_str() {
                "int" => Ok(ColumnType::Int),
                "str" => Ok(ColumnType::Str),
                _ => Err(DbError::parse(format!(
                    "Unknown type: {} (types must be 'int' or 'str')",
                    type_name
                ))),
            },
            token => Err(DbError::parse(format!("Expected type name, found {}", token))),
        }
    }

    fn parse_insert(&mut self) -> Result<SqlStatement, DbError> {
        self.expect_keyword("INTO")?;
        let table = self.expect_identifier()?;
        let columns = self.parse_paren_list(|parser| parser.expect_identifier())?;
        self.expect_keyword("VALUES")?;

        let mut rows = vec![self.parse_paren_list(|parser| parser.parse_value())?];
        while self.lexer.peek() == Token::Comma {
            self.lexer.next_token();
            rows.push(self.parse_paren_list(|parser| parser.parse_value())?);
        }

        Ok(SqlStatement::Insert { table, columns, rows })
    }

    fn parse_delete(&mut self) -> Result<SqlStatement, DbError> {
        self.expect_keyword("FROM")?;
        let table = self.expect_identifier()?;
        let where_clause = self.parse_where_clause()?;
        Ok(SqlStatement::Delete { table, where_clause })
    }

    fn parse_update(&mut self) -> Result<SqlStatement, DbError> {
        let table = self.expect_identifier()?;
        self.expect_keyword("SET")?;

        let mut set = vec![self.parse_assignment()?];
        while self.lexer.peek() == Token::Comma {
            self.lexer.next_token();
            set.push(self.parse_assignment()?);
        }

        let where_clause = self.parse_where_clause()?;
        Ok(SqlStatement::Update { table, set, where_clause })
    }

    fn parse_assignment(&mut self) -> Result<(String, Value), DbError> {
        let column = self.expect_identifier()?;
        self.expect(Token::Eq)?;
        let value = self.parse_value()?;
        Ok((column, value))
    }

    fn parse_select(&mut self) -> Result<SqlStatement, DbError> {
        let columns = match self.lexer.next_token() {
            Token::Asterisk => Projection::All,
            Token::Identifier(first) => {
                let mut names = vec![first];
                while self.lexer.peek() == Token::Comma {
                    self.lexer.next_token();
                    names.push(self.expect_identifier()?);
                }
                Projection::Columns(names)
            }
            token => {
                return Err(DbError::parse(format!(
                    "Expected '*' or column list after SELECT, found {}",
                    token
                )))
            }
        };

        self.expect_keyword("FROM")?;
        let table = self.expect_identifier()?;
        let where_clause = self.parse_where_clause()?;
        Ok(SqlStatement::Select { columns, table, where_clause })
    }

    fn parse_where_clause(&mut self) -> Result<Option<WhereClause>, DbError> {
        if !matches!(self.lexer.peek(), Token::Identifier(ref kw) if kw == "WHERE") {
            return Ok(None);
        }
        self.lexer.next_token();

        let column = match self.lexer.next_token() {
            Token::Identifier(name) => name,
            token => {
                return Err(DbError::parse(format!(
                    "Expected column name after WHERE, found {}",
                    token
                )))
            }
        };
        let operator = self.parse_operator()?;
        let value = self.parse_value()?;
        Ok(Some(WhereClause { column, operator, value }))
    }

    fn parse_operator(&mut self) -> Result<Operator, DbError> {
        match self.lexer.next_token() {
            Token::Eq => Ok(Operator::Eq),
            Token::Ne => Ok(Operator::Ne),
            Token::Lt => Ok(Operator::Lt),
            Token::Gt => Ok(Operator::Gt),
            Token::Le => Ok(Operator::Le),
            Token::Ge => Ok(Operator::Ge),
            token => Err(DbError::parse(format!(
                "Expected comparison operator (=, !=, <, >, <=, >=), found {}",
                token
            ))),
        }
    }

    fn parse_value(&mut self) -> Result<Value, DbError> {
        match self.lexer.next_token() {
            Token::Number(text) => text
                .parse::<i64>()
                .map(Value::Int)
                .map_err(|_| DbError::parse(format!("Invalid integer literal: {}", text))),
            Token::String(s) => Ok(Value::Str(s)),
            token => Err(DbError::parse(format!(
                "Expected literal (number or \"string\"), found {}",
                token
            ))),
        }
    }

    /// `( [item { , item }] )`，允许空列表
    fn parse_paren_list<T>(
        &mut self,
        mut item: impl FnMut(&mut Self) -> Result<T, DbError>,
    ) -> Result<Vec<T>, DbError> {
        self.expect(Token::LParen)?;
        let mut items = Vec::new();
        loop {
            if self.lexer.peek() == Token::RParen {
                self.lexer.next_token();
                return Ok(items);
            }
            if !items.is_empty() {
                self.expect(Token::Comma)?;
            }
            items.push(item(self)?);
        }
    }

    fn expect_keyword(&mut self, keyword: &str) -> Result<(), DbError> {
        match self.lexer.next_token() {
            Token::Identifier(ref word) if word == keyword => Ok(()),
            token => Err(DbError::parse(format!("Expected '{}', found {}", keyword, token))),
        }
    }

    fn expect_identifier(&mut self) -> Result<String, DbError> {
        match self.lexer.next_token() {
            Token::Identifier(name) => Ok(name),
            token => Err(DbError::parse(format!("Expected identifier, found {}", token))),
        }
    }

    fn expect(&mut self, expected: Token) -> Result<(), DbError> {
        match self.lexer.next_token() {
            token if token == expected => Ok(()),
            token => Err(DbError::parse(format!("Expected {}, found {}", expected, token))),
        }
    }
}
