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

//! Token cursor used by the statement parsers
//!
//! Wraps the lazy tokenizer, drops whitespace and comments, and keeps a small
//! lookahead buffer. Running out of tokens where one is required reports a
//! syntax error near the last token read, as SQL Server does.

use std::collections::VecDeque;

use super::lexer::Lexer;
use super::token::{Keyword, Token, TokenKind};
use crate::core::{Error, Result};

pub struct TokenCursor {
    lexer: Lexer,
    lookahead: VecDeque<Token>,
    /// Literal of the most recently consumed token
    last_literal: String,
}

impl TokenCursor {
    pub fn new(input: &str) -> Self {
        Self {
            lexer: Lexer::new(input),
            lookahead: VecDeque::new(),
            last_literal: String::new(),
        }
    }

    /// Buffer up to `n` significant tokens; returns false if input ends first
    fn fill(&mut self, n: usize) -> Result<bool> {
        while self.lookahead.len() < n {
            match self.lexer.next() {
                None => return Ok(false),
                Some(Err(e)) => return Err(e),
                Some(Ok(token)) if token.is_trivia() => continue,
                Some(Ok(token)) => self.lookahead.push_back(token),
            }
        }
        Ok(true)
    }

    /// Next significant token without consuming it
    pub fn peek(&mut self) -> Result<Option<&Token>> {
        self.fill(1)?;
        Ok(self.lookahead.front())
    }

    /// Significant token `n` places ahead (0 is the next one)
    pub fn peek_nth(&mut self, n: usize) -> Result<Option<&Token>> {
        self.fill(n + 1)?;
        Ok(self.lookahead.get(n))
    }

    /// Check the next token against a predicate without consuming it
    pub fn peek_is(&mut self, predicate: impl FnOnce(&Token) -> bool) -> Result<bool> {
        Ok(self.peek()?.is_some_and(predicate))
    }

    pub fn peek_keyword(&mut self, keyword: Keyword) -> Result<bool> {
        self.peek_is(|t| t.is_keyword(keyword))
    }

    /// Consume the next significant token
    pub fn next(&mut self) -> Result<Option<Token>> {
        self.fill(1)?;
        let token = self.lookahead.pop_front();
        if let Some(token) = &token {
            self.last_literal.clone_from(&token.literal);
        }
        Ok(token)
    }

    /// Consume the next token, failing at end of input
    pub fn expect_next(&mut self) -> Result<Token> {
        match self.next()? {
            Some(token) => Ok(token),
            None => Err(self.unexpected_end()),
        }
    }

    /// Syntax error for input that ended too early
    pub fn unexpected_end(&self) -> Error {
        Error::syntax(self.last_literal.as_str())
    }

    /// Consume the next token if it satisfies the predicate
    pub fn next_if(&mut self, predicate: impl FnOnce(&Token) -> bool) -> Result<Option<Token>> {
        if self.peek_is(predicate)? {
            self.next()
        } else {
            Ok(None)
        }
    }

    pub fn consume_keyword(&mut self, keyword: Keyword) -> Result<bool> {
        Ok(self.next_if(|t| t.is_keyword(keyword))?.is_some())
    }

    pub fn consume_kind(&mut self, kind: &TokenKind) -> Result<bool> {
        Ok(self.next_if(|t| t.kind == *kind)?.is_some())
    }

    /// Consume an operator character only if it directly follows `previous`
    ///
    /// Two-character comparison operators must be written without a gap.
    pub fn consume_adjacent_operator(&mut self, previous: &Token, symbol: char) -> Result<bool> {
        let adjacent = previous.position + previous.literal.chars().count();
        Ok(self
            .next_if(|t| t.is_operator(symbol) && t.position == adjacent)?
            .is_some())
    }

    pub fn expect_keyword(&mut self, keyword: Keyword) -> Result<Token> {
        let token = self.expect_next()?;
        if token.is_keyword(keyword) {
            Ok(token)
        } else {
            Err(token.syntax_error())
        }
    }

    pub fn expect_kind(&mut self, kind: &TokenKind) -> Result<Token> {
        let token = self.expect_next()?;
        if token.kind == *kind {
            Ok(token)
        } else {
            Err(token.syntax_error())
        }
    }

    /// Consume a regular or bracketed identifier
    pub fn expect_identifier(&mut self) -> Result<String> {
        let token = self.expect_next()?;
        match token.identifier() {
            Some(name) => Ok(name.to_string()),
            None => Err(token.syntax_error()),
        }
    }

    /// Consume a dotted object name such as `dbo.Users`
    pub fn expect_object_name(&mut self) -> Result<Vec<String>> {
        let mut parts = vec![self.expect_identifier()?];
        while self.next_if(|t| t.is_operator('.'))?.is_some() {
            parts.push(self.expect_identifier()?);
        }
        Ok(parts)
    }

    /// Consume an alias: an identifier or a string literal
    pub fn expect_alias(&mut self) -> Result<String> {
        let token = self.expect_next()?;
        alias_text(&token).ok_or_else(|| token.syntax_error())
    }

    /// Consume an alias written without `AS`, if one follows
    pub fn next_implicit_alias(&mut self) -> Result<Option<String>> {
        let token = self.next_if(|t| alias_text(t).is_some())?;
        Ok(token.and_then(|t| alias_text(&t)))
    }
}

fn alias_text(token: &Token) -> Option<String> {
    match &token.kind {
        TokenKind::StringLiteral { value, .. } => Some(value.clone()),
        _ => token.identifier().map(str::to_string),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skips_trivia() {
        let mut cursor = TokenCursor::new("  SELECT /* c */ 1 -- x\n");
        assert!(cursor.consume_keyword(Keyword::Select).unwrap());
        assert_eq!(cursor.expect_next().unwrap().literal, "1");
        assert!(cursor.next().unwrap().is_none());
    }

    #[test]
    fn test_unexpected_end_reports_last_token() {
        let mut cursor = TokenCursor::new("SELECT 1 +");
        cursor.next().unwrap();
        cursor.next().unwrap();
        cursor.next().unwrap();
        assert_eq!(cursor.expect_next(), Err(Error::syntax("+")));
    }

    #[test]
    fn test_adjacent_operator() {
        let mut cursor = TokenCursor::new("<> < >");
        let lt = cursor.expect_next().unwrap();
        assert!(cursor.consume_adjacent_operator(&lt, '>').unwrap());
        let lt = cursor.expect_next().unwrap();
        assert!(!cursor.consume_adjacent_operator(&lt, '>').unwrap());
    }

    #[test]
    fn test_object_name() {
        let mut cursor = TokenCursor::new("dbo . [My Table]");
        assert_eq!(
            cursor.expect_object_name().unwrap(),
            vec!["dbo".to_string(), "My Table".to_string()]
        );
    }

    #[test]
    fn test_peek_nth() {
        let mut cursor = TokenCursor::new("a , b");
        assert_eq!(cursor.peek_nth(2).unwrap().map(|t| t.literal.as_str()), Some("b"));
        assert_eq!(cursor.expect_identifier().unwrap(), "a");
    }
}
