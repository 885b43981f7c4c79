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

//! DML Statement Execution
//!
//! ```text
//! INSERT [INTO] table [(column, ...)] VALUES (expr, ...) [, (expr, ...) ...]
//! ```

use crate::core::{DataValue, Error, Result};
use crate::parser::{Keyword, TokenKind};

use super::context::ExecutionContext;
use super::expression::{last_part, Expression, NoRow};
use super::result::StatementOutcome;

/// Parse and run the rest of an INSERT statement
///
/// Every row is converted and checked before any is stored, so a failing
/// row leaves the table unchanged.
pub(crate) fn execute_insert(ctx: &mut ExecutionContext<'_>) -> Result<StatementOutcome> {
    ctx.cursor.consume_keyword(Keyword::Into)?;
    let name = ctx.cursor.expect_object_name()?;
    let name = last_part(&name).to_string();

    let columns = if ctx.cursor.consume_kind(&TokenKind::OpenParen)? {
        Some(parse_column_list(ctx)?)
    } else {
        None
    };

    let token = ctx.cursor.expect_next()?;
    match token.kind {
        TokenKind::ReservedKeyword(Keyword::Values) => {}
        TokenKind::ReservedKeyword(Keyword::Select) => {
            return Err(Error::unsupported("INSERT ... SELECT"))
        }
        TokenKind::ReservedKeyword(Keyword::Default) => {
            return Err(Error::unsupported("INSERT ... DEFAULT VALUES"))
        }
        TokenKind::ReservedKeyword(Keyword::Exec | Keyword::Execute) => {
            return Err(Error::unsupported("INSERT ... EXECUTE"))
        }
        _ => return Err(token.syntax_error()),
    }

    let mut rows = Vec::new();
    loop {
        rows.push(parse_row(ctx)?);
        if !ctx.cursor.consume_kind(&TokenKind::Comma)? {
            break;
        }
    }

    let count = ctx
        .simulation()
        .catalog()
        .insert(&name, columns.as_deref(), rows)?;
    Ok(StatementOutcome::non_query(
        i32::try_from(count).unwrap_or(i32::MAX),
    ))
}

fn parse_column_list(ctx: &mut ExecutionContext<'_>) -> Result<Vec<String>> {
    let mut columns = Vec::new();
    loop {
        let name = ctx.cursor.expect_object_name()?;
        columns.push(last_part(&name).to_string());
        if !ctx.cursor.consume_kind(&TokenKind::Comma)? {
            break;
        }
    }
    ctx.cursor.expect_kind(&TokenKind::CloseParen)?;
    Ok(columns)
}

fn parse_row(ctx: &mut ExecutionContext<'_>) -> Result<Vec<DataValue>> {
    ctx.cursor.expect_kind(&TokenKind::OpenParen)?;
    let mut values = Vec::new();
    loop {
        values.push(Expression::parse(ctx)?.run(&NoRow)?);
        if !ctx.cursor.consume_kind(&TokenKind::Comma)? {
            break;
        }
    }
    ctx.cursor.expect_kind(&TokenKind::CloseParen)?;
    Ok(values)
}
