use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    // 标识符与字面量（关键字也以标识符形式出现，由语法分析器按原文区分）
    Identifier(String),
    Number(String),
    String(String),
    // 分隔符
    Asterisk,  // *
    Comma,     // ,
    LParen,    // (
    RParen,    // )
    Semicolon, // ;
    // 操作符
    Eq, // =
    Ne, // !=
    Lt, // <
    Gt, // >
    Le, // <=
    Ge, // >=
    // 无法识别的字符
    Unknown(char),
    End,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Identifier(s) => write!(f, "identifier '{}'", s),
            Token::Number(s) => write!(f, "number {}", s),
            Token::String(s) => write!(f, "string \"{}\"", s),
            Token::Asterisk => write!(f, "'*'"),
            Token::Comma => write!(f, "','"),
            Token::LParen => write!(f, "'('"),
            Token::RParen => write!(f, "')'"),
            Token::Semicolon => write!(f, "';'"),
            Token::Eq => write!(f, "'='"),
            Token::Ne => write!(f, "'!='"),
            Token::Lt => write!(f, "'<'"),
            Token::Gt => write!(f, "'>'"),
            Token::Le => write!(f, "'<='"),
            Token::Ge => write!(f, "'>='"),
            Token::Unknown(c) => write!(f, "unrecognized symbol '{}'", c),
            Token::End => write!(f, "end of input"),
        }
    }
}

/// 按需产生记号的词法分析器，只保存一个游标位置。
///
/// 复制一份 `Lexer` 即可得到当前位置的快照，`peek` 就是这样实现的。
#[derive(Debug, Clone, Copy)]
pub struct Lexer<'a> {
    input: &'a str,
    position: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Lexer { input, position: 0 }
    }

    /// 查看下一个记号但不移动位置
    pub fn peek(&self) -> Token {
        let mut snapshot = *self;
        snapshot.next_token()
    }

    pub fn is_at_end(&self) -> bool {
        self.peek() == Token::End
    }

    /// 读出全部记号（不含结尾的 `End`）
    pub fn tokenize(mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        loop {
            match self.next_token() {
                Token::End => break,
                token => tokens.push(token),
            }
        }
        tokens
    }

    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace();

        let c = match self.current() {
            Some(c) => c,
            None => return Token::End,
        };

        if c == b'"' {
            return self.read_string();
        }
        if c.is_ascii_alphanumeric() || c == b'_' || c == b'-' {
            return self.read_identifier_or_number();
        }

        self.position += 1;
        match c {
            b'*' => Token::Asterisk,
            b',' => Token::Comma,
            b'(' => Token::LParen,
            b')' => Token::RParen,
            b';' => Token::Semicolon,
            b'=' => Token::Eq,
            b'!' if self.current() == Some(b'=') => {
                self.position += 1;
                Token::Ne
            }
            b'<' if self.current() == Some(b'=') => {
                self.position += 1;
                Token::Le
            }
            b'<' => Token::Lt,
            b'>' if self.current() == Some(b'=') => {
                self.position += 1;
                Token::Ge
            }
            b'>' => Token::Gt,
            _ => {
                // 回退后按完整的 UTF-8 字符读取
                self.position -= 1;
                self.read_unknown()
            }
        }
    }

    fn current(&self) -> Option<u8> {
        self.input.as_bytes().get(self.position).copied()
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.current(), Some(c) if c.is_ascii_whitespace()) {
            self.position += 1;
        }
    }

    // 双引号之间的内容原样保留，不处理转义；缺少右引号时读到输入结尾
    fn read_string(&mut self) -> Token {
        self.position += 1;
        let start = self.position;
        let bytes = self.input.as_bytes();
        while self.position < bytes.len() && bytes[self.position] != b'"' {
            self.position += 1;
        }
        let content = self.input[start..self.position].to_string();
        if self.position < bytes.len() {
            self.position += 1;
        }
        Token::String(content)
    }

    fn read_identifier_or_number(&mut self) -> Token {
        let start = self.position;
        let bytes = self.input.as_bytes();

        if bytes[start] == b'-' || bytes[start].is_ascii_digit() {
            if bytes[self.position] == b'-' {
                self.position += 1;
            }
            let mut is_number = matches!(self.current(), Some(c) if c.is_ascii_digit());
            if is_number {
                while matches!(self.current(), Some(c) if c.is_ascii_digit()) {
                    self.position += 1;
                }
                // 形如 123abc 的记号按标识符处理
                if matches!(self.current(), Some(c) if c.is_ascii_alphabetic() || c == b'_') {
                    is_number = false;
                }
            }
            if is_number {
                return Token::Number(self.input[start..self.position].to_string());
            }
            self.position = start;
        }

        while matches!(self.current(), Some(c) if c.is_ascii_alphanumeric() || c == b'_' || c == b'.') {
            self.position += 1;
        }
        // 单独的 '-' 不属于标识符字符集，作为一个字符的标识符返回
        if self.position == start {
            self.position += 1;
        }
        Token::Identifier(self.input[start..self.position].to_string())
    }

    fn read_unknown(&mut self) -> Token {
        let c = self.input[self.position..].chars().next().unwrap_or('\u{FFFD}');
        self.position += c.len_utf8().max(1);
        Token::Unknown(c)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(input: &str) -> Vec<Token> {
        Lexer::new(input).tokenize()
    }

    fn ident(s: &str) -> Token {
        Token::Identifier(s.to_string())
    }

    #[test]
    fn keywords_are_identifiers() {
        assert_eq!(
            tokens("SELECT * FROM t"),
            vec![ident("SELECT"), Token::Asterisk, ident("FROM"), ident("t")]
        );
    }

    #[test]
    fn operators_and_punctuation() {
        assert_eq!(
            tokens("= != < > <= >= ( ) , ;"),
            vec![
                Token::Eq,
                Token::Ne,
                Token::Lt,
                Token::Gt,
                Token::Le,
                Token::Ge,
                Token::LParen,
                Token::RParen,
                Token::Comma,
                Token::Semicolon,
            ]
        );
        assert_eq!(tokens("a<=1"), vec![ident("a"), Token::Le, Token::Number("1".into())]);
    }

    #[test]
    fn bang_without_equals_is_unknown() {
        assert_eq!(tokens("!a"), vec![Token::Unknown('!'), ident("a")]);
    }

    #[test]
    fn numbers_and_negative_numbers() {
        assert_eq!(
            tokens("42 -7"),
            vec![Token::Number("42".into()), Token::Number("-7".into())]
        );
    }

    #[test]
    fn digit_run_followed_by_letter_is_identifier() {
        assert_eq!(tokens("123abc"), vec![ident("123abc")]);
        assert_eq!(tokens("1_x"), vec![ident("1_x")]);
    }

    #[test]
    fn lone_minus_is_single_char_identifier() {
        assert_eq!(tokens("-"), vec![ident("-")]);
        assert_eq!(tokens("-abc"), vec![ident("-"), ident("abc")]);
    }

    #[test]
    fn identifiers_may_contain_dots() {
        assert_eq!(tokens("t.col_1"), vec![ident("t.col_1")]);
    }

    #[test]
    fn strings_are_verbatim() {
        assert_eq!(
            tokens(r#""a, b\n;" x"#),
            vec![Token::String(r"a, b\n;".into()), ident("x")]
        );
    }

    #[test]
    fn unterminated_string_runs_to_end() {
        assert_eq!(tokens("\"abc def"), vec![Token::String("abc def".into())]);
    }

    #[test]
    fn whitespace_is_skipped() {
        assert_eq!(tokens(" \t\n a \n"), vec![ident("a")]);
        assert_eq!(tokens("   "), vec![]);
    }

    #[test]
    fn peek_does_not_advance() {
        let mut lexer = Lexer::new("a b");
        assert_eq!(lexer.peek(), ident("a"));
        assert_eq!(lexer.peek(), ident("a"));
        assert_eq!(lexer.next_token(), ident("a"));
        assert_eq!(lexer.peek(), ident("b"));
        assert!(!lexer.is_at_end());
        lexer.next_token();
        assert!(lexer.is_at_end());
        assert_eq!(lexer.next_token(), Token::End);
    }

    #[test]
    fn non_ascii_symbol_is_one_token() {
        assert_eq!(tokens("é"), vec![Token::Unknown('é')]);
    }
}
