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

//! T-SQL tokenizer and parsing support
//!
//! - [`Lexer`] - Lazy tokenizer over a command text
//! - [`TokenCursor`] - Lookahead over significant tokens
//! - [`token`] - Token and keyword types
//! - [`Precedence`] - Operator precedence levels
//!
//! Statements are parsed and run one at a time by the executor, so there is
//! no separate syntax tree for whole batches.
//!
//! # Example
//!
//! ```
//! use sqlsim::parser::{tokenize, token::TokenKind};
//!
//! let kinds: Vec<_> = tokenize("SELECT 1")
//!     .map(|t| t.unwrap().kind)
//!     .collect();
//! assert_eq!(kinds.len(), 3);
//! assert_eq!(kinds[1], TokenKind::Whitespace);
//! ```

pub mod cursor;
pub mod lexer;
pub mod precedence;
pub mod token;

pub use cursor::TokenCursor;
pub use lexer::{tokenize, Lexer};
pub use precedence::Precedence;
pub use token::{Keyword, Numeric, Token, TokenKind};
