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

//! SELECT statements
//!
//! ```text
//! SELECT [TOP (expr) | TOP n] item [, item ...]
//!     [FROM table [[AS] alias] | FROM (SELECT ...) [AS] alias]
//!     [WHERE predicate]
//! ```
//!
//! The whole statement is parsed first, then run against the catalog.
//! Rows are filtered, projected, then truncated to the TOP count.

use tracing::trace;

use crate::core::{CollatedMap, DataValue, Error, Result, Scalar, Table};
use crate::parser::{Keyword, TokenKind};

use super::boolean::BooleanExpression;
use super::context::ExecutionContext;
use super::expression::{last_part, Expression, RowLookup};
use super::result::RowSet;
use super::simulation::Simulation;

/// One entry of the select list
#[derive(Debug, Clone)]
pub enum SelectItem {
    /// `*`
    Wildcard,
    Expression(Expression),
}

/// A FROM source
#[derive(Debug, Clone)]
pub enum Source {
    /// Catalog table; the alias does not take part in column resolution
    Table {
        name: Vec<String>,
        alias: Option<String>,
    },
    /// Parenthesized subquery
    Derived {
        selection: Box<Selection>,
        alias: String,
    },
}

/// A parsed SELECT statement
#[derive(Debug, Clone)]
pub struct Selection {
    top: Option<usize>,
    items: Vec<SelectItem>,
    source: Option<Source>,
    filter: Option<BooleanExpression>,
}

impl Selection {
    /// Parse the rest of a SELECT after the `SELECT` keyword
    pub fn parse(ctx: &mut ExecutionContext<'_>) -> Result<Selection> {
        if ctx.cursor.peek_keyword(Keyword::Distinct)? || ctx.cursor.peek_keyword(Keyword::All)? {
            return Err(Error::unsupported("SELECT DISTINCT or ALL"));
        }
        let top = if ctx.cursor.consume_keyword(Keyword::Top)? {
            Some(Self::parse_top(ctx)?)
        } else {
            None
        };

        let mut items = Vec::new();
        loop {
            items.push(Self::parse_item(ctx)?);
            if !ctx.cursor.consume_kind(&TokenKind::Comma)? {
                break;
            }
        }

        let source = if ctx.cursor.consume_keyword(Keyword::From)? {
            Some(Source::parse(ctx)?)
        } else {
            None
        };
        if source.is_none() && items.iter().any(|i| matches!(i, SelectItem::Wildcard)) {
            return Err(Error::MustSpecifyTable);
        }

        let filter = if ctx.cursor.consume_keyword(Keyword::Where)? {
            Some(BooleanExpression::parse(ctx)?)
        } else {
            None
        };

        if let Some(clause) = Self::unsupported_clause(ctx)? {
            return Err(Error::unsupported(clause));
        }

        Ok(Selection {
            top,
            items,
            source,
            filter,
        })
    }

    fn unsupported_clause(ctx: &mut ExecutionContext<'_>) -> Result<Option<&'static str>> {
        let Some(token) = ctx.cursor.peek()? else {
            return Ok(None);
        };
        Ok(match token.kind {
            TokenKind::ReservedKeyword(Keyword::Order) => Some("The ORDER BY clause"),
            TokenKind::ReservedKeyword(Keyword::Group) => Some("The GROUP BY clause"),
            TokenKind::ReservedKeyword(Keyword::Having) => Some("The HAVING clause"),
            TokenKind::ReservedKeyword(Keyword::Union) => Some("UNION"),
            TokenKind::ReservedKeyword(Keyword::Except) => Some("EXCEPT"),
            TokenKind::ReservedKeyword(Keyword::Intersect) => Some("INTERSECT"),
            _ => None,
        })
    }

    fn parse_top(ctx: &mut ExecutionContext<'_>) -> Result<usize> {
        let expression = if ctx.cursor.consume_kind(&TokenKind::OpenParen)? {
            let expression = Expression::parse(ctx)?;
            ctx.cursor.expect_kind(&TokenKind::CloseParen)?;
            expression
        } else {
            let token = ctx.cursor.expect_next()?;
            match token.kind {
                TokenKind::Numeric(n) => Expression::Value(n.into()),
                TokenKind::AtPrefixedString(ref name) => Expression::Value(ctx.parameter(name)?),
                _ => return Err(token.syntax_error()),
            }
        };

        let count = match expression.run(&TopArgument)?.into_value() {
            Some(Scalar::Int(n)) => i64::from(n),
            Some(Scalar::BigInt(n)) => n,
            _ => return Err(Error::TopRequiresInteger),
        };
        usize::try_from(count).map_err(|_| Error::TopNegative)
    }

    fn parse_item(ctx: &mut ExecutionContext<'_>) -> Result<SelectItem> {
        if ctx.cursor.next_if(|t| t.is_operator('*'))?.is_some() {
            return Ok(SelectItem::Wildcard);
        }
        let expression = Expression::parse_aliased(ctx)?;
        if matches!(expression, Expression::Named { .. }) {
            return Ok(SelectItem::Expression(expression));
        }
        Ok(SelectItem::Expression(match ctx.cursor.next_implicit_alias()? {
            Some(name) => Expression::Named {
                expression: Box::new(expression),
                name,
            },
            None => expression,
        }))
    }

    /// Output column names
    pub fn column_names(&self, source_columns: &[String]) -> Vec<String> {
        let mut names = Vec::with_capacity(self.items.len());
        for item in &self.items {
            match item {
                SelectItem::Wildcard => names.extend(source_columns.iter().cloned()),
                SelectItem::Expression(expression) => names.push(expression.name().to_string()),
            }
        }
        names
    }

    /// Run the query and materialize its rows
    pub fn execute(&self, simulation: &Simulation) -> Result<RowSet> {
        let source = match &self.source {
            Some(source) => source.load(simulation)?,
            None => SourceRows::single_row(),
        };
        let columns = self.column_names(&source.columns);
        let limit = self.top.unwrap_or(usize::MAX);

        let mut rows = Vec::new();
        for values in &source.rows {
            if rows.len() >= limit {
                break;
            }
            let row = SourceRow {
                source: &source,
                values,
            };
            if let Some(filter) = &self.filter {
                if !filter.run(&row)? {
                    continue;
                }
            }
            let mut output = Vec::with_capacity(columns.len());
            for item in &self.items {
                match item {
                    SelectItem::Wildcard => output.extend(values.iter().cloned()),
                    SelectItem::Expression(expression) => output.push(expression.run(&row)?),
                }
            }
            rows.push(output);
        }

        trace!(columns = columns.len(), rows = rows.len(), "selection produced rows");
        Ok(RowSet::new(columns, rows))
    }
}

impl Source {
    fn parse(ctx: &mut ExecutionContext<'_>) -> Result<Source> {
        let source = if ctx.cursor.consume_kind(&TokenKind::OpenParen)? {
            ctx.cursor.expect_keyword(Keyword::Select)?;
            let selection = ctx.nested(Selection::parse)?;
            let close = ctx.cursor.expect_kind(&TokenKind::CloseParen)?;
            let alias = match Self::parse_alias(ctx)? {
                Some(alias) => alias,
                None => return Err(close.syntax_error()),
            };
            Source::Derived {
                selection: Box::new(selection),
                alias,
            }
        } else {
            let name = ctx.cursor.expect_object_name()?;
            let alias = Self::parse_alias(ctx)?;
            Source::Table { name, alias }
        };

        let joined = ctx.cursor.peek_is(|t| {
            t.kind == TokenKind::Comma
                || [
                    Keyword::Join,
                    Keyword::Inner,
                    Keyword::Left,
                    Keyword::Right,
                    Keyword::Full,
                    Keyword::Cross,
                    Keyword::Outer,
                ]
                .iter()
                .any(|k| t.is_keyword(*k))
        })?;
        if joined {
            return Err(Error::unsupported("Joining multiple sources"));
        }
        Ok(source)
    }

    fn parse_alias(ctx: &mut ExecutionContext<'_>) -> Result<Option<String>> {
        if ctx.cursor.consume_keyword(Keyword::As)? {
            return ctx.cursor.expect_identifier().map(Some);
        }
        Ok(ctx
            .cursor
            .next_if(|t| t.identifier().is_some())?
            .and_then(|t| t.identifier().map(str::to_string)))
    }

    fn load(&self, simulation: &Simulation) -> Result<SourceRows> {
        match self {
            Source::Table { name, .. } => {
                let table_name = last_part(name);
                simulation
                    .catalog()
                    .read(table_name, SourceRows::from_table)?
                    .ok_or_else(|| Error::InvalidObjectName(name.join(".")))
            }
            Source::Derived { selection, alias } => {
                let (columns, rows) = selection.execute(simulation)?.into_parts();
                if let Some(position) = columns.iter().position(String::is_empty) {
                    return Err(Error::NoColumnName {
                        ordinal: position + 1,
                        alias: alias.clone(),
                    });
                }
                Ok(SourceRows::new(columns, rows))
            }
        }
    }
}

/// Rows a selection reads from, with a name index over the columns
struct SourceRows {
    columns: Vec<String>,
    ordinals: CollatedMap<usize>,
    rows: Vec<Vec<DataValue>>,
}

impl SourceRows {
    fn new(columns: Vec<String>, rows: Vec<Vec<DataValue>>) -> Self {
        let mut ordinals = CollatedMap::new();
        for (i, column) in columns.iter().enumerate() {
            if !ordinals.contains_key(column) {
                ordinals.insert(column.as_str(), i);
            }
        }
        Self {
            columns,
            ordinals,
            rows,
        }
    }

    fn from_table(table: &Table) -> Self {
        Self {
            columns: table.column_names(),
            ordinals: table.column_ordinals().clone(),
            rows: table.rows().to_vec(),
        }
    }

    /// The single empty row a FROM-less SELECT evaluates against
    fn single_row() -> Self {
        Self::new(Vec::new(), vec![Vec::new()])
    }
}

struct SourceRow<'a> {
    source: &'a SourceRows,
    values: &'a [DataValue],
}

impl RowLookup for SourceRow<'_> {
    fn lookup(&self, parts: &[String]) -> Result<DataValue> {
        let name = last_part(parts);
        self.source
            .ordinals
            .get(name)
            .and_then(|&i| self.values.get(i))
            .cloned()
            .ok_or_else(|| Error::InvalidColumnName(name.to_string()))
    }
}

/// Lookup for the TOP row count, where column references are not allowed
struct TopArgument;

impl RowLookup for TopArgument {
    fn lookup(&self, parts: &[String]) -> Result<DataValue> {
        Err(Error::TopColumnReference(last_part(parts).to_string()))
    }
}
