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

//! DDL Statement Execution
//!
//! ```text
//! CREATE TABLE name (
//!     column type [(length | MAX | precision, scale)] [NULL | NOT NULL],
//!     ...
//! )
//! ```
//!
//! Columns are nullable unless declared `NOT NULL`. Length and precision
//! are accepted and ignored.

use crate::core::{Column, DataType, Error, Result, Table};
use crate::parser::{Keyword, TokenKind};

use super::context::ExecutionContext;
use super::expression::last_part;
use super::result::StatementOutcome;

/// Parse and run the rest of a CREATE statement
pub(crate) fn execute_create(ctx: &mut ExecutionContext<'_>) -> Result<StatementOutcome> {
    let token = ctx.cursor.expect_next()?;
    match token.kind {
        TokenKind::ReservedKeyword(Keyword::Table) => {}
        TokenKind::ReservedKeyword(keyword) => {
            return Err(Error::unsupported(format!("CREATE {}", keyword)))
        }
        TokenKind::UnquotedString => {
            return Err(Error::unsupported(format!(
                "CREATE {}",
                token.literal.to_ascii_uppercase()
            )))
        }
        _ => return Err(token.syntax_error()),
    }

    let name = ctx.cursor.expect_object_name()?;
    let name = last_part(&name).to_string();

    ctx.cursor.expect_kind(&TokenKind::OpenParen)?;
    let mut columns = Vec::new();
    loop {
        columns.push(parse_column(ctx, columns.len() + 1)?);
        if !ctx.cursor.consume_kind(&TokenKind::Comma)? {
            break;
        }
    }
    ctx.cursor.expect_kind(&TokenKind::CloseParen)?;

    let table = Table::new(name, columns)?;
    ctx.simulation().catalog().create_table(table)?;
    Ok(StatementOutcome::not_applicable())
}

fn parse_column(ctx: &mut ExecutionContext<'_>, ordinal: usize) -> Result<Column> {
    let name = ctx.cursor.expect_identifier()?;
    let type_name = ctx.cursor.expect_identifier()?;
    let data_type = DataType::from_name(&type_name).ok_or(Error::UnknownDataType {
        ordinal,
        name: type_name,
    })?;

    if ctx.cursor.consume_kind(&TokenKind::OpenParen)? {
        skip_type_arguments(ctx)?;
    }

    let mut nullable = true;
    if ctx.cursor.consume_keyword(Keyword::Not)? {
        ctx.cursor.expect_keyword(Keyword::Null)?;
        nullable = false;
    } else {
        ctx.cursor.consume_keyword(Keyword::Null)?;
    }

    let constrained = ctx.cursor.peek_is(|t| {
        [
            Keyword::Primary,
            Keyword::Identity,
            Keyword::Default,
            Keyword::Constraint,
            Keyword::Unique,
            Keyword::Check,
            Keyword::References,
            Keyword::Foreign,
        ]
        .iter()
        .any(|k| t.is_keyword(*k))
    })?;
    if constrained {
        return Err(Error::unsupported("Column constraints"));
    }

    Ok(Column::new(name, data_type, nullable))
}

/// Consume `n)`, `MAX)` or `p, s)` after a type name
fn skip_type_arguments(ctx: &mut ExecutionContext<'_>) -> Result<()> {
    loop {
        let token = ctx.cursor.expect_next()?;
        let valid = match &token.kind {
            TokenKind::Numeric(_) => true,
            TokenKind::UnquotedString => token.literal.eq_ignore_ascii_case("max"),
            _ => false,
        };
        if !valid {
            return Err(token.syntax_error());
        }
        let next = ctx.cursor.expect_next()?;
        match next.kind {
            TokenKind::Comma => continue,
            TokenKind::CloseParen => return Ok(()),
            _ => return Err(next.syntax_error()),
        }
    }
}
