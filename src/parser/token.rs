// Copyright 2025 Stoolap Contributors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Token types for the T-SQL tokenizer
//!
//! This module defines the tokens produced by the tokenizer and the reserved
//! keyword table.

use std::fmt;
use std::sync::LazyLock;

use rustc_hash::FxHashMap;

use crate::core::{DataValue, Error};

macro_rules! keywords {
    ($($variant:ident => $text:literal),+ $(,)?) => {
        /// Reserved T-SQL keyword
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum Keyword {
            $($variant),+
        }

        impl Keyword {
            /// All reserved keywords
            pub const ALL: &'static [Keyword] = &[$(Keyword::$variant),+];

            /// Canonical upper-case spelling
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Keyword::$variant => $text),+
                }
            }
        }
    };
}

keywords! {
    Add => "ADD",
    All => "ALL",
    Alter => "ALTER",
    And => "AND",
    Any => "ANY",
    As => "AS",
    Asc => "ASC",
    Begin => "BEGIN",
    Between => "BETWEEN",
    Break => "BREAK",
    By => "BY",
    Case => "CASE",
    Check => "CHECK",
    Close => "CLOSE",
    Column => "COLUMN",
    Commit => "COMMIT",
    Constraint => "CONSTRAINT",
    Continue => "CONTINUE",
    Create => "CREATE",
    Cross => "CROSS",
    Cursor => "CURSOR",
    Database => "DATABASE",
    Declare => "DECLARE",
    Default => "DEFAULT",
    Delete => "DELETE",
    Desc => "DESC",
    Distinct => "DISTINCT",
    Drop => "DROP",
    Else => "ELSE",
    End => "END",
    Except => "EXCEPT",
    Exec => "EXEC",
    Execute => "EXECUTE",
    Exists => "EXISTS",
    Fetch => "FETCH",
    Foreign => "FOREIGN",
    From => "FROM",
    Full => "FULL",
    Function => "FUNCTION",
    Goto => "GOTO",
    Grant => "GRANT",
    Group => "GROUP",
    Having => "HAVING",
    Identity => "IDENTITY",
    If => "IF",
    In => "IN",
    Index => "INDEX",
    Inner => "INNER",
    Insert => "INSERT",
    Intersect => "INTERSECT",
    Into => "INTO",
    Is => "IS",
    Join => "JOIN",
    Key => "KEY",
    Left => "LEFT",
    Like => "LIKE",
    Merge => "MERGE",
    Not => "NOT",
    Null => "NULL",
    Of => "OF",
    Off => "OFF",
    On => "ON",
    Open => "OPEN",
    Option => "OPTION",
    Or => "OR",
    Order => "ORDER",
    Outer => "OUTER",
    Over => "OVER",
    Primary => "PRIMARY",
    Print => "PRINT",
    Procedure => "PROCEDURE",
    References => "REFERENCES",
    Return => "RETURN",
    Revoke => "REVOKE",
    Right => "RIGHT",
    Rollback => "ROLLBACK",
    Save => "SAVE",
    Select => "SELECT",
    Set => "SET",
    Table => "TABLE",
    Then => "THEN",
    Top => "TOP",
    Tran => "TRAN",
    Transaction => "TRANSACTION",
    Truncate => "TRUNCATE",
    Union => "UNION",
    Unique => "UNIQUE",
    Update => "UPDATE",
    Use => "USE",
    Values => "VALUES",
    View => "VIEW",
    When => "WHEN",
    Where => "WHERE",
    While => "WHILE",
    With => "WITH",
}

static KEYWORDS: LazyLock<FxHashMap<&'static str, Keyword>> =
    LazyLock::new(|| Keyword::ALL.iter().map(|k| (k.as_str(), *k)).collect());

impl Keyword {
    /// Look up a reserved keyword, ignoring case
    pub fn lookup(word: &str) -> Option<Keyword> {
        if word.bytes().all(|b| b.is_ascii_uppercase()) {
            return KEYWORDS.get(word).copied();
        }
        KEYWORDS.get(word.to_ascii_uppercase().as_str()).copied()
    }

    /// Keywords that begin a statement the simulator recognizes but does not run
    pub fn is_unsupported_statement(&self) -> bool {
        matches!(
            self,
            Keyword::Alter
                | Keyword::Begin
                | Keyword::Break
                | Keyword::Close
                | Keyword::Commit
                | Keyword::Continue
                | Keyword::Declare
                | Keyword::Delete
                | Keyword::Drop
                | Keyword::Exec
                | Keyword::Execute
                | Keyword::Fetch
                | Keyword::Goto
                | Keyword::Grant
                | Keyword::If
                | Keyword::Merge
                | Keyword::Open
                | Keyword::Print
                | Keyword::Return
                | Keyword::Revoke
                | Keyword::Rollback
                | Keyword::Save
                | Keyword::Truncate
                | Keyword::Update
                | Keyword::Use
                | Keyword::While
                | Keyword::With
        )
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Numeric literal, typed by the smallest type that holds it
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Numeric {
    Int(i32),
    BigInt(i64),
    Float(f64),
}

impl From<Numeric> for DataValue {
    fn from(n: Numeric) -> Self {
        match n {
            Numeric::Int(v) => DataValue::int(v),
            Numeric::BigInt(v) => DataValue::bigint(v),
            Numeric::Float(v) => DataValue::float(v),
        }
    }
}

/// Token classification with any decoded payload
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    /// Run of spaces, tabs and line breaks
    Whitespace,
    /// `-- ...` or `/* ... */`
    Comment,
    Numeric(Numeric),
    /// Single operator character
    Operator(char),
    Comma,
    OpenParen,
    CloseParen,
    /// `;`
    StatementTerminator,
    ReservedKeyword(Keyword),
    /// Regular identifier that is not a reserved keyword
    UnquotedString,
    /// `[name]`, with `]]` decoded
    BracketDelimitedString(String),
    /// `@name`
    AtPrefixedString(String),
    /// `@@name`
    DoubleAtPrefixedString(String),
    /// `'text'` or `N'text'`, with `''` decoded
    StringLiteral { value: String, unicode: bool },
}

/// Token represents a lexical token
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// The type of the token
    pub kind: TokenKind,
    /// The source text of the token
    pub literal: String,
    /// Character index of the first character in the source
    pub position: usize,
}

impl Token {
    /// Create a new token
    pub fn new(kind: TokenKind, literal: impl Into<String>, position: usize) -> Self {
        Self {
            kind,
            literal: literal.into(),
            position,
        }
    }

    /// Whitespace and comments carry no meaning for the grammar
    pub fn is_trivia(&self) -> bool {
        matches!(self.kind, TokenKind::Whitespace | TokenKind::Comment)
    }

    pub fn is_keyword(&self, keyword: Keyword) -> bool {
        self.kind == TokenKind::ReservedKeyword(keyword)
    }

    pub fn is_operator(&self, symbol: char) -> bool {
        self.kind == TokenKind::Operator(symbol)
    }

    /// The name for an identifier token, with brackets removed
    pub fn identifier(&self) -> Option<&str> {
        match &self.kind {
            TokenKind::UnquotedString => Some(&self.literal),
            TokenKind::BracketDelimitedString(name) => Some(name),
            _ => None,
        }
    }

    /// The syntax error SQL Server reports when this token is unexpected
    pub fn syntax_error(&self) -> Error {
        match &self.kind {
            TokenKind::ReservedKeyword(keyword) => {
                Error::IncorrectSyntaxNearKeyword(keyword.as_str().to_string())
            }
            TokenKind::BracketDelimitedString(name) => Error::syntax(name.as_str()),
            TokenKind::StringLiteral { value, .. } => Error::syntax(value.as_str()),
            _ => Error::syntax(self.literal.as_str()),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}({}) at {}", self.kind, self.literal, self.position)
    }
}
