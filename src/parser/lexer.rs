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

//! T-SQL tokenizer
//!
//! The tokenizer is a lazy iterator: each call to `next` scans exactly one
//! token, so a batch can fail on a later character after earlier statements
//! have already run. Whitespace and comments are produced as tokens; the
//! parser skips them.

use tracing::trace;

use super::token::{Keyword, Numeric, Token, TokenKind};
use crate::core::{Error, Result};

/// Tokenizer over a command text
pub struct Lexer {
    /// Input characters
    input: Vec<char>,
    /// Index of the next character to scan
    position: usize,
    /// Set after an error; no further tokens are produced
    failed: bool,
}

impl Lexer {
    /// Create a new tokenizer for the given input
    pub fn new(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            position: 0,
            failed: false,
        }
    }

    fn peek(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.input.get(self.position + offset).copied()
    }

    fn advance_while(&mut self, predicate: impl Fn(char) -> bool) {
        while self.peek().is_some_and(&predicate) {
            self.position += 1;
        }
    }

    fn text_from(&self, start: usize) -> String {
        self.input[start..self.position].iter().collect()
    }

    /// Scan one token starting at the current position
    fn scan(&mut self) -> Option<Result<Token>> {
        let start = self.position;
        let c = self.peek()?;

        let kind = match c {
            ' ' | '\t' | '\r' | '\n' => {
                self.advance_while(is_whitespace);
                TokenKind::Whitespace
            }
            '-' if self.peek_at(1) == Some('-') => {
                self.advance_while(|c| c != '\r' && c != '\n');
                TokenKind::Comment
            }
            // A dangling minus can never start a valid expression
            '-' if self.peek_at(1).is_none() => {
                self.position += 1;
                return Some(Err(Error::syntax("-")));
            }
            '/' if self.peek_at(1) == Some('*') => match self.scan_block_comment() {
                Ok(()) => TokenKind::Comment,
                Err(e) => return Some(Err(e)),
            },
            '0'..='9' => TokenKind::Numeric(self.scan_number()),
            '@' => match self.scan_variable(start) {
                Ok(kind) => kind,
                Err(e) => return Some(Err(e)),
            },
            '[' => match self.scan_delimited(']') {
                Ok(name) => TokenKind::BracketDelimitedString(name),
                Err(e) => return Some(Err(e)),
            },
            '\'' => match self.scan_delimited('\'') {
                Ok(value) => TokenKind::StringLiteral {
                    value,
                    unicode: false,
                },
                Err(e) => return Some(Err(e)),
            },
            'N' | 'n' if self.peek_at(1) == Some('\'') => {
                self.position += 1;
                match self.scan_delimited('\'') {
                    Ok(value) => TokenKind::StringLiteral {
                        value,
                        unicode: true,
                    },
                    Err(e) => return Some(Err(e)),
                }
            }
            c if is_identifier_start(c) => {
                self.advance_while(is_identifier_part);
                let word = self.text_from(start);
                match Keyword::lookup(&word) {
                    Some(keyword) => TokenKind::ReservedKeyword(keyword),
                    None => TokenKind::UnquotedString,
                }
            }
            ',' => {
                self.position += 1;
                TokenKind::Comma
            }
            '(' => {
                self.position += 1;
                TokenKind::OpenParen
            }
            ')' => {
                self.position += 1;
                TokenKind::CloseParen
            }
            ';' => {
                self.position += 1;
                TokenKind::StatementTerminator
            }
            c if is_operator_char(c) => {
                self.position += 1;
                TokenKind::Operator(c)
            }
            other => {
                return Some(Err(Error::UnexpectedCharacter {
                    character: other,
                    index: start,
                }))
            }
        };

        let token = Token::new(kind, self.text_from(start), start);
        trace!(kind = ?token.kind, position = token.position, "token");
        Some(Ok(token))
    }

    /// Block comments nest: every `/*` needs its own `*/`
    fn scan_block_comment(&mut self) -> Result<()> {
        self.position += 2;
        let mut depth = 1usize;
        while depth > 0 {
            match (self.peek(), self.peek_at(1)) {
                (None, _) => return Err(Error::MissingEndCommentMark),
                (Some('/'), Some('*')) => {
                    depth += 1;
                    self.position += 2;
                }
                (Some('*'), Some('/')) => {
                    depth -= 1;
                    self.position += 2;
                }
                _ => self.position += 1,
            }
        }
        Ok(())
    }

    fn scan_number(&mut self) -> Numeric {
        let start = self.position;
        let mut is_float = false;

        self.advance_while(|c| c.is_ascii_digit());
        if self.peek() == Some('.') && self.peek_at(1).is_some_and(|c| c.is_ascii_digit()) {
            is_float = true;
            self.position += 1;
            self.advance_while(|c| c.is_ascii_digit());
        }
        if matches!(self.peek(), Some('e' | 'E')) {
            let digits_at = match self.peek_at(1) {
                Some('+' | '-') => 2,
                _ => 1,
            };
            if self.peek_at(digits_at).is_some_and(|c| c.is_ascii_digit()) {
                is_float = true;
                self.position += digits_at;
                self.advance_while(|c| c.is_ascii_digit());
            }
        }

        let text = self.text_from(start);
        if !is_float {
            if let Ok(v) = text.parse::<i32>() {
                return Numeric::Int(v);
            }
            if let Ok(v) = text.parse::<i64>() {
                return Numeric::BigInt(v);
            }
        }
        // Digit strings always parse as f64, saturating to infinity at worst
        Numeric::Float(text.parse::<f64>().unwrap_or(f64::INFINITY))
    }

    fn scan_variable(&mut self, start: usize) -> Result<TokenKind> {
        let double = self.peek_at(1) == Some('@');
        self.position += if double { 2 } else { 1 };
        let name_start = self.position;
        self.advance_while(is_identifier_part);
        if self.position == name_start {
            return Err(Error::UnexpectedCharacter {
                character: '@',
                index: start,
            });
        }
        let name = self.text_from(name_start);
        Ok(if double {
            TokenKind::DoubleAtPrefixedString(name)
        } else {
            TokenKind::AtPrefixedString(name)
        })
    }

    /// Scan `'...'` or `[...]` where a doubled closing character escapes itself
    fn scan_delimited(&mut self, close: char) -> Result<String> {
        self.position += 1;
        let mut value = String::new();
        loop {
            match self.peek() {
                None => return Err(Error::UnclosedQuotation(value)),
                Some(c) if c == close => {
                    if self.peek_at(1) == Some(close) {
                        value.push(close);
                        self.position += 2;
                    } else {
                        self.position += 1;
                        return Ok(value);
                    }
                }
                Some(c) => {
                    value.push(c);
                    self.position += 1;
                }
            }
        }
    }
}

impl Iterator for Lexer {
    type Item = Result<Token>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        let item = self.scan();
        if matches!(item, Some(Err(_))) {
            self.failed = true;
        }
        item
    }
}

/// Tokenize a command text lazily
pub fn tokenize(input: &str) -> Lexer {
    Lexer::new(input)
}

fn is_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\r' | '\n')
}

fn is_identifier_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == '#'
}

fn is_identifier_part(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | '@' | '#' | '$')
}

/// Check if a character is a single-character operator
pub fn is_operator_char(c: char) -> bool {
    matches!(
        c,
        '+' | '-' | '*' | '/' | '%' | '&' | '|' | '^' | '=' | '<' | '>' | '!' | '.'
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<TokenKind> {
        tokenize(input)
            .map(|t| t.unwrap().kind)
            .filter(|k| !matches!(k, TokenKind::Whitespace))
            .collect()
    }

    #[test]
    fn test_basic_select() {
        assert_eq!(
            kinds("SELECT 1, name FROM t;"),
            vec![
                TokenKind::ReservedKeyword(Keyword::Select),
                TokenKind::Numeric(Numeric::Int(1)),
                TokenKind::Comma,
                TokenKind::UnquotedString,
                TokenKind::ReservedKeyword(Keyword::From),
                TokenKind::UnquotedString,
                TokenKind::StatementTerminator,
            ]
        );
    }

    #[test]
    fn test_numeric_widths() {
        assert_eq!(kinds("2147483647"), vec![TokenKind::Numeric(Numeric::Int(i32::MAX))]);
        assert_eq!(
            kinds("2147483648"),
            vec![TokenKind::Numeric(Numeric::BigInt(2_147_483_648))]
        );
        assert_eq!(kinds("1.5"), vec![TokenKind::Numeric(Numeric::Float(1.5))]);
        assert_eq!(kinds("2e3"), vec![TokenKind::Numeric(Numeric::Float(2000.0))]);
    }

    #[test]
    fn test_strings_and_brackets() {
        assert_eq!(
            kinds("'it''s' N'x' [a]]b]"),
            vec![
                TokenKind::StringLiteral {
                    value: "it's".to_string(),
                    unicode: false
                },
                TokenKind::StringLiteral {
                    value: "x".to_string(),
                    unicode: true
                },
                TokenKind::BracketDelimitedString("a]b".to_string()),
            ]
        );
        // Bracketed keywords are plain names
        assert_eq!(
            kinds("[select]"),
            vec![TokenKind::BracketDelimitedString("select".to_string())]
        );
    }

    #[test]
    fn test_variables() {
        assert_eq!(
            kinds("@p0 @@VERSION"),
            vec![
                TokenKind::AtPrefixedString("p0".to_string()),
                TokenKind::DoubleAtPrefixedString("VERSION".to_string()),
            ]
        );
    }

    #[test]
    fn test_comments() {
        let tokens: Vec<_> = tokenize("1 -- one\n/* a /* nested */ b */2")
            .map(|t| t.unwrap().kind)
            .collect();
        assert_eq!(tokens.iter().filter(|k| **k == TokenKind::Comment).count(), 2);
        assert_eq!(tokens.last(), Some(&TokenKind::Numeric(Numeric::Int(2))));
    }

    #[test]
    fn test_errors() {
        let last = tokenize("SELECT /* open").last().unwrap();
        assert_eq!(last, Err(Error::MissingEndCommentMark));

        let last = tokenize("SELECT 'abc").last().unwrap();
        assert_eq!(last, Err(Error::UnclosedQuotation("abc".to_string())));

        let last = tokenize("SELECT 1 -").last().unwrap();
        assert_eq!(last, Err(Error::syntax("-")));

        let last = tokenize("SELECT ?").last().unwrap();
        assert_eq!(
            last,
            Err(Error::UnexpectedCharacter {
                character: '?',
                index: 7
            })
        );
    }

    #[test]
    fn test_stops_after_error() {
        let mut lexer = tokenize("\"x\" 1");
        assert!(matches!(lexer.next(), Some(Err(_))));
        assert!(lexer.next().is_none());
    }

    #[test]
    fn test_literal_and_position() {
        let tokens: Vec<_> = tokenize("a  [b]").map(|t| t.unwrap()).collect();
        assert_eq!(tokens[2].literal, "[b]");
        assert_eq!(tokens[2].position, 3);
    }
}
