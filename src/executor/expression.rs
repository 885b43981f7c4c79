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

//! Scalar expressions
//!
//! Expressions are parsed straight from the token cursor and evaluated
//! against a row through the [`RowLookup`] trait.
//!
//! # Precedence
//!
//! The parser reads a primary, then on an operator parses the entire rest
//! of the expression as the right operand. The resulting right-leaning tree
//! is then rotated: while the right child is a binary node that does not
//! bind tighter than the current node, the right child becomes the root.
//! Rotating on equal precedence turns `1 - 2 - 3` into `(1 - 2) - 3`.

use std::fmt;
use std::sync::Arc;

use crate::core::{BinaryOperator, DataType, DataValue, Error, Result};
use crate::functions::{global_registry, validate_arg_count, ScalarFunction};
use crate::parser::{Keyword, Precedence, TokenKind};

use super::context::ExecutionContext;

/// Resolves column references while an expression runs
pub trait RowLookup {
    /// Value of the column named by the reference parts
    fn lookup(&self, parts: &[String]) -> Result<DataValue>;
}

/// Lookup for expressions evaluated without a source row
#[derive(Debug, Clone, Copy, Default)]
pub struct NoRow;

impl RowLookup for NoRow {
    fn lookup(&self, parts: &[String]) -> Result<DataValue> {
        Err(Error::InvalidColumnName(last_part(parts).to_string()))
    }
}

pub(crate) fn last_part(parts: &[String]) -> &str {
    parts.last().map(String::as_str).unwrap_or_default()
}

/// Scalar expression tree
#[derive(Debug, Clone)]
pub enum Expression {
    /// Literal or bound parameter
    Value(DataValue),

    /// Column reference; only the last part is used for resolution
    Reference(Vec<String>),

    /// Expression with an alias
    Named {
        expression: Box<Expression>,
        name: String,
    },

    /// `( expression )`
    Parenthesized(Box<Expression>),

    /// Unary minus
    Negative(Box<Expression>),

    Binary {
        operator: BinaryOperator,
        left: Box<Expression>,
        right: Box<Expression>,
    },

    /// Built-in function call
    Function {
        function: Arc<dyn ScalarFunction>,
        arguments: Vec<Expression>,
    },
}

impl Expression {
    /// Parse an operand expression; an `AS` after it is left unread
    pub fn parse(ctx: &mut ExecutionContext<'_>) -> Result<Expression> {
        Self::parse_expression(ctx, false)
    }

    /// Parse a select-list expression, including a trailing `AS alias`
    pub fn parse_aliased(ctx: &mut ExecutionContext<'_>) -> Result<Expression> {
        Self::parse_expression(ctx, true)
    }

    fn parse_expression(ctx: &mut ExecutionContext<'_>, aliased: bool) -> Result<Expression> {
        ctx.nested(|ctx| {
            let left = Self::parse_primary(ctx)?;

            if aliased && ctx.cursor.consume_keyword(Keyword::As)? {
                let name = ctx.cursor.expect_alias()?;
                return Ok(Expression::Named {
                    expression: Box::new(left),
                    name,
                });
            }
            let operator = match ctx.cursor.peek()?.map(|t| &t.kind) {
                Some(TokenKind::Operator(c)) => BinaryOperator::from_symbol(*c),
                _ => None,
            };
            let Some(operator) = operator else {
                return Ok(left);
            };
            ctx.cursor.next()?;
            let right = Self::parse_expression(ctx, aliased)?;
            Ok(Self::binary(operator, left, right))
        })
    }

    /// Combine two operands, hoisting an alias on the right to the top
    fn binary(operator: BinaryOperator, left: Expression, right: Expression) -> Expression {
        match right {
            Expression::Named { expression, name } => Expression::Named {
                expression: Box::new(Self::binary(operator, left, *expression)),
                name,
            },
            right => Expression::Binary {
                operator,
                left: Box::new(left),
                right: Box::new(right),
            }
            .adjust_for_precedence(),
        }
    }

    fn adjust_for_precedence(self) -> Expression {
        let Expression::Binary {
            operator,
            left,
            right,
        } = self
        else {
            return self;
        };
        match *right {
            Expression::Binary {
                operator: right_operator,
                left: right_left,
                right: right_right,
            } if !Precedence::of(right_operator).binds_tighter_than(Precedence::of(operator)) => {
                let rotated = Expression::Binary {
                    operator,
                    left,
                    right: right_left,
                }
                .adjust_for_precedence();
                Expression::Binary {
                    operator: right_operator,
                    left: Box::new(rotated),
                    right: right_right,
                }
            }
            right => Expression::Binary {
                operator,
                left,
                right: Box::new(right),
            },
        }
    }

    fn parse_primary(ctx: &mut ExecutionContext<'_>) -> Result<Expression> {
        let token = ctx.cursor.expect_next()?;
        match &token.kind {
            TokenKind::Numeric(n) => Ok(Expression::Value((*n).into())),
            TokenKind::StringLiteral { value, unicode } => Ok(Expression::Value(if *unicode {
                DataValue::nvarchar(value)
            } else {
                DataValue::varchar(value)
            })),
            TokenKind::ReservedKeyword(Keyword::Null) => {
                Ok(Expression::Value(DataValue::null(DataType::Int)))
            }
            TokenKind::AtPrefixedString(name) => ctx.parameter(name).map(Expression::Value),
            TokenKind::DoubleAtPrefixedString(name) => {
                ctx.system_variable(name).map(Expression::Value)
            }
            TokenKind::Operator('-') => Ok(Expression::Negative(Box::new(
                ctx.nested(Self::parse_primary)?,
            ))),
            TokenKind::Operator('+') => ctx.nested(Self::parse_primary),
            TokenKind::OpenParen => {
                let inner = Self::parse(ctx)?;
                ctx.cursor.expect_kind(&TokenKind::CloseParen)?;
                Ok(Expression::Parenthesized(Box::new(inner)))
            }
            TokenKind::UnquotedString | TokenKind::BracketDelimitedString(_) => {
                let mut parts = vec![token.identifier().unwrap_or_default().to_string()];
                while ctx.cursor.next_if(|t| t.is_operator('.'))?.is_some() {
                    parts.push(ctx.cursor.expect_identifier()?);
                }
                if ctx.cursor.peek_is(|t| t.kind == TokenKind::OpenParen)? {
                    return Self::parse_call(ctx, &parts.join("."));
                }
                Ok(Expression::Reference(parts))
            }
            _ => Err(token.syntax_error()),
        }
    }

    fn parse_call(ctx: &mut ExecutionContext<'_>, name: &str) -> Result<Expression> {
        let function = global_registry().resolve(name)?;
        ctx.cursor.expect_kind(&TokenKind::OpenParen)?;

        let mut arguments = Vec::new();
        if !ctx.cursor.consume_kind(&TokenKind::CloseParen)? {
            loop {
                arguments.push(Self::parse(ctx)?);
                if !ctx.cursor.consume_kind(&TokenKind::Comma)? {
                    break;
                }
            }
            ctx.cursor.expect_kind(&TokenKind::CloseParen)?;
        }
        validate_arg_count(function.as_ref(), arguments.len())?;
        Ok(Expression::Function {
            function,
            arguments,
        })
    }

    /// Evaluate against a row
    pub fn run(&self, row: &dyn RowLookup) -> Result<DataValue> {
        match self {
            Expression::Value(value) => Ok(value.clone()),
            Expression::Reference(parts) => row.lookup(parts),
            Expression::Named { expression, .. } | Expression::Parenthesized(expression) => {
                expression.run(row)
            }
            Expression::Negative(operand) => operand.run(row)?.negate(),
            Expression::Binary {
                operator,
                left,
                right,
            } => {
                let left = left.run(row)?;
                let right = right.run(row)?;
                left.binary(*operator, &right)
            }
            Expression::Function {
                function,
                arguments,
            } => {
                let args = arguments
                    .iter()
                    .map(|argument| argument.run(row))
                    .collect::<Result<Vec<_>>>()?;
                function.evaluate(&args)
            }
        }
    }

    /// Column name this expression produces in a result set
    ///
    /// Empty for computed values without an alias.
    pub fn name(&self) -> &str {
        match self {
            Expression::Reference(parts) => last_part(parts),
            Expression::Named { name, .. } => name,
            Expression::Parenthesized(inner) => inner.name(),
            _ => "",
        }
    }

    pub fn precedence(&self) -> Precedence {
        match self {
            Expression::Binary { operator, .. } => Precedence::of(*operator),
            _ => Precedence::Primary,
        }
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Value(value) => write!(f, "{}", value),
            Expression::Reference(parts) => write!(f, "{}", parts.join(".")),
            Expression::Named { expression, name } => write!(f, "{} AS {}", expression, name),
            Expression::Parenthesized(inner) => write!(f, "({})", inner),
            Expression::Negative(operand) => write!(f, "-{}", operand),
            Expression::Binary {
                operator,
                left,
                right,
            } => {
                // Fully bracketed so the grouping is visible
                write!(f, "[{} {} {}]", left, operator, right)
            }
            Expression::Function {
                function,
                arguments,
            } => {
                write!(f, "{}(", function.name())?;
                for (i, argument) in arguments.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", argument)?;
                }
                write!(f, ")")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::context::Bindings;
    use crate::executor::simulation::Simulation;

    fn parse(text: &str) -> Result<Expression> {
        let simulation = Simulation::new();
        let bindings: Bindings = [("p", DataValue::int(10))].into_iter().collect();
        let mut ctx = ExecutionContext::new(&simulation, text, &bindings);
        Expression::parse_aliased(&mut ctx)
    }

    fn eval(text: &str) -> Result<DataValue> {
        parse(text)?.run(&NoRow)
    }

    #[test]
    fn test_left_to_right_grouping() {
        assert_eq!(parse("1 - 2 - 3 - 4").unwrap().to_string(), "[[[1 - 2] - 3] - 4]");
        assert_eq!(eval("1 - 2 - 3 - 4").unwrap(), DataValue::int(-8));
        assert_eq!(eval("100 / 10 / 5").unwrap(), DataValue::int(2));
    }

    #[test]
    fn test_multiplicative_binds_tighter() {
        assert_eq!(parse("1 + 2 * 3").unwrap().to_string(), "[1 + [2 * 3]]");
        assert_eq!(parse("1 * 2 + 3 * 4").unwrap().to_string(), "[[1 * 2] + [3 * 4]]");
        assert_eq!(parse("1 * 2 * 3 + 4").unwrap().to_string(), "[[[1 * 2] * 3] + 4]");
        assert_eq!(parse("1 - 2 * 3 - 4").unwrap().to_string(), "[[1 - [2 * 3]] - 4]");
        assert_eq!(eval("2 + 3 * 4 - 1").unwrap(), DataValue::int(13));
    }

    #[test]
    fn test_modulus_groups_with_additive() {
        assert_eq!(parse("1 % 2 * 3").unwrap().to_string(), "[1 % [2 * 3]]");
        assert_eq!(eval("1 % 2 * 3").unwrap(), DataValue::int(1));
        assert_eq!(parse("8 % 5 + 1").unwrap().to_string(), "[[8 % 5] + 1]");
    }

    #[test]
    fn test_nesting_limit() {
        let nested = |depth: usize| format!("{}1{}", "(".repeat(depth), ")".repeat(depth));
        assert_eq!(eval(&nested(20)).unwrap(), DataValue::int(1));
        assert_eq!(eval(&nested(5000)).unwrap_err(), Error::NestedTooDeeply);
        assert_eq!(eval(&"- ".repeat(5000)).unwrap_err(), Error::NestedTooDeeply);
        let chain = vec!["1"; 5000].join(" + ");
        assert_eq!(eval(&chain).unwrap_err(), Error::NestedTooDeeply);
    }

    #[test]
    fn test_alias_only_where_allowed() {
        let simulation = Simulation::new();
        let bindings = Bindings::new();
        let mut ctx = ExecutionContext::new(&simulation, "1 + 2 AS x", &bindings);
        let expr = Expression::parse(&mut ctx).unwrap();
        assert_eq!(expr.name(), "");
        assert!(ctx.cursor.peek_keyword(Keyword::As).unwrap());

        assert_eq!(
            eval("ABS(1 AS x)").unwrap_err(),
            Error::IncorrectSyntaxNearKeyword("AS".to_string())
        );
        assert_eq!(
            eval("(1 AS x)").unwrap_err(),
            Error::IncorrectSyntaxNearKeyword("AS".to_string())
        );
    }

    #[test]
    fn test_parentheses_override() {
        assert_eq!(eval("(2 + 3) * 4").unwrap(), DataValue::int(20));
        assert_eq!(eval("2 * (3 - 1) % 3").unwrap(), DataValue::int(1));
    }

    #[test]
    fn test_alias_is_hoisted() {
        let expr = parse("1 + 2 * 3 AS total").unwrap();
        assert_eq!(expr.name(), "total");
        assert_eq!(expr.run(&NoRow).unwrap(), DataValue::int(7));
        assert!(matches!(expr, Expression::Named { .. }));
    }

    #[test]
    fn test_unary_minus() {
        assert_eq!(eval("-5 + 2").unwrap(), DataValue::int(-3));
        assert_eq!(eval("2 * -3").unwrap(), DataValue::int(-6));
    }

    #[test]
    fn test_parameters_and_functions() {
        assert_eq!(eval("@p * 2").unwrap(), DataValue::int(20));
        assert_eq!(eval("abs(-4)").unwrap(), DataValue::int(4));
        assert_eq!(eval("DATALENGTH(N'ab')").unwrap(), DataValue::int(4));
        assert_eq!(
            parse("@missing").unwrap_err(),
            Error::MustDeclareScalarVariable("missing".to_string())
        );
        assert_eq!(
            parse("nope(1)").unwrap_err(),
            Error::UnknownFunction("nope".to_string())
        );
        assert!(matches!(
            parse("abs(1, 2)").unwrap_err(),
            Error::WrongArgumentCount { .. }
        ));
    }

    #[test]
    fn test_names() {
        assert_eq!(parse("dbo.t.col").unwrap().name(), "col");
        assert_eq!(parse("(col)").unwrap().name(), "col");
        assert_eq!(parse("1 + 1").unwrap().name(), "");
        assert_eq!(parse("[a b]").unwrap().name(), "a b");
    }

    #[test]
    fn test_reference_without_row() {
        assert_eq!(
            eval("missing + 1").unwrap_err(),
            Error::InvalidColumnName("missing".to_string())
        );
    }

    #[test]
    fn test_null_literal() {
        let value = eval("NULL").unwrap();
        assert!(value.is_null());
        assert_eq!(value.data_type(), DataType::Int);
        assert!(eval("NULL + 1").unwrap().is_null());
    }

    #[test]
    fn test_stops_before_comparison() {
        let simulation = Simulation::new();
        let bindings = Bindings::new();
        let mut ctx = ExecutionContext::new(&simulation, "a = 1", &bindings);
        let expr = Expression::parse(&mut ctx).unwrap();
        assert_eq!(expr.name(), "a");
        assert!(ctx.cursor.peek_is(|t| t.is_operator('=')).unwrap());
    }
}
