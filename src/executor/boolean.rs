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

//! Predicates for WHERE clauses
//!
//! A comparison with a NULL on either side is never true. `AND` binds
//! tighter than `OR`.

use std::fmt;

use crate::core::{ComparisonOperator, Result};
use crate::parser::{Keyword, TokenKind};

use super::context::ExecutionContext;
use super::expression::{Expression, RowLookup};

/// Boolean expression tree
#[derive(Debug, Clone)]
pub enum BooleanExpression {
    Comparison {
        operator: ComparisonOperator,
        left: Expression,
        right: Expression,
    },
    And(Box<BooleanExpression>, Box<BooleanExpression>),
    Or(Box<BooleanExpression>, Box<BooleanExpression>),
}

impl BooleanExpression {
    pub fn parse(ctx: &mut ExecutionContext<'_>) -> Result<BooleanExpression> {
        let mut left = Self::parse_and(ctx)?;
        while ctx.cursor.consume_keyword(Keyword::Or)? {
            let right = Self::parse_and(ctx)?;
            left = BooleanExpression::Or(Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn parse_and(ctx: &mut ExecutionContext<'_>) -> Result<BooleanExpression> {
        let mut left = Self::parse_comparison(ctx)?;
        while ctx.cursor.consume_keyword(Keyword::And)? {
            let right = Self::parse_comparison(ctx)?;
            left = BooleanExpression::And(Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn parse_comparison(ctx: &mut ExecutionContext<'_>) -> Result<BooleanExpression> {
        let left = Expression::parse(ctx)?;
        let operator = Self::parse_operator(ctx)?;
        let right = Expression::parse(ctx)?;
        Ok(BooleanExpression::Comparison {
            operator,
            left,
            right,
        })
    }

    fn parse_operator(ctx: &mut ExecutionContext<'_>) -> Result<ComparisonOperator> {
        let token = ctx.cursor.expect_next()?;
        let TokenKind::Operator(symbol) = token.kind else {
            return Err(token.syntax_error());
        };
        let cursor = &mut ctx.cursor;
        let operator = match symbol {
            '=' => ComparisonOperator::Eq,
            '<' if cursor.consume_adjacent_operator(&token, '>')? => ComparisonOperator::Ne,
            '<' if cursor.consume_adjacent_operator(&token, '=')? => ComparisonOperator::Lte,
            '<' => ComparisonOperator::Lt,
            '>' if cursor.consume_adjacent_operator(&token, '=')? => ComparisonOperator::Gte,
            '>' => ComparisonOperator::Gt,
            '!' if cursor.consume_adjacent_operator(&token, '=')? => ComparisonOperator::Ne,
            '!' if cursor.consume_adjacent_operator(&token, '<')? => ComparisonOperator::Gte,
            '!' if cursor.consume_adjacent_operator(&token, '>')? => ComparisonOperator::Lte,
            _ => return Err(token.syntax_error()),
        };
        Ok(operator)
    }

    /// Evaluate against a row
    pub fn run(&self, row: &dyn RowLookup) -> Result<bool> {
        match self {
            BooleanExpression::Comparison {
                operator,
                left,
                right,
            } => {
                let left = left.run(row)?;
                let right = right.run(row)?;
                Ok(left
                    .compare(&right)?
                    .is_some_and(|ordering| operator.matches(ordering)))
            }
            BooleanExpression::And(left, right) => Ok(left.run(row)? && right.run(row)?),
            BooleanExpression::Or(left, right) => Ok(left.run(row)? || right.run(row)?),
        }
    }
}

impl fmt::Display for BooleanExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BooleanExpression::Comparison {
                operator,
                left,
                right,
            } => write!(f, "{} {} {}", left, operator, right),
            BooleanExpression::And(left, right) => write!(f, "({} AND {})", left, right),
            BooleanExpression::Or(left, right) => write!(f, "({} OR {})", left, right),
        }
    }
}
