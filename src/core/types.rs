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

//! Core type definitions for the simulator
//!
//! This module defines the SQL data types, the binary arithmetic operators
//! and the comparison operators, together with the per-type rules for
//! conversion, comparison and arithmetic.

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use super::collation::default_collation;
use super::error::{Error, Result};
use super::value::Scalar;

/// SQL data types supported by the simulator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum DataType {
    /// 32-bit signed integer
    Int = 0,

    /// 64-bit signed integer
    BigInt = 1,

    /// 64-bit floating point number
    Float = 2,

    /// Single-byte character string
    VarChar = 3,

    /// Unicode character string
    NVarChar = 4,
}

impl DataType {
    /// SQL name of the type, as SQL Server prints it in diagnostics
    pub fn name(&self) -> &'static str {
        match self {
            DataType::Int => "int",
            DataType::BigInt => "bigint",
            DataType::Float => "float",
            DataType::VarChar => "varchar",
            DataType::NVarChar => "nvarchar",
        }
    }

    /// Resolve a type name used in `CREATE TABLE`
    ///
    /// Fixed-length and legacy spellings map onto the closest simulated type.
    pub fn from_name(name: &str) -> Option<Self> {
        const NAMES: &[(&str, DataType)] = &[
            ("int", DataType::Int),
            ("integer", DataType::Int),
            ("bigint", DataType::BigInt),
            ("float", DataType::Float),
            ("real", DataType::Float),
            ("varchar", DataType::VarChar),
            ("char", DataType::VarChar),
            ("text", DataType::VarChar),
            ("nvarchar", DataType::NVarChar),
            ("nchar", DataType::NVarChar),
            ("ntext", DataType::NVarChar),
            ("sysname", DataType::NVarChar),
        ];
        NAMES
            .iter()
            .find(|(candidate, _)| candidate.eq_ignore_ascii_case(name))
            .map(|(_, data_type)| *data_type)
    }

    /// Returns true for int, bigint and float
    pub fn is_numeric(&self) -> bool {
        matches!(self, DataType::Int | DataType::BigInt | DataType::Float)
    }

    /// Returns true for the integer types
    pub fn is_integer(&self) -> bool {
        matches!(self, DataType::Int | DataType::BigInt)
    }

    /// Returns true for varchar and nvarchar
    pub fn is_string(&self) -> bool {
        matches!(self, DataType::VarChar | DataType::NVarChar)
    }

    /// Check if this type can carry the given arithmetic operator
    pub fn supports(&self, operator: BinaryOperator) -> bool {
        match self {
            DataType::Int | DataType::BigInt => true,
            DataType::Float => !matches!(
                operator,
                BinaryOperator::Modulus
                    | BinaryOperator::BitwiseAnd
                    | BinaryOperator::BitwiseOr
                    | BinaryOperator::BitwiseExclusiveOr
            ),
            DataType::VarChar | DataType::NVarChar => operator == BinaryOperator::Add,
        }
    }

    /// The type both operands widen to for arithmetic
    ///
    /// Numeric types widen int < bigint < float and string types widen
    /// varchar < nvarchar. Mixing a number with a string has no common type.
    pub fn common_type(left: DataType, right: DataType) -> Option<DataType> {
        if left == right {
            return Some(left);
        }
        if (left.is_numeric() && right.is_numeric()) || (left.is_string() && right.is_string()) {
            return Some(if left.rank() >= right.rank() { left } else { right });
        }
        None
    }

    /// The type both operands are converted to before comparing
    ///
    /// Unlike arithmetic, comparing a number with a string converts the
    /// string to the numeric type.
    pub fn comparison_type(left: DataType, right: DataType) -> DataType {
        if let Some(common) = Self::common_type(left, right) {
            return common;
        }
        if left.is_numeric() {
            left
        } else {
            right
        }
    }

    fn rank(&self) -> u8 {
        match self {
            DataType::Int | DataType::VarChar => 0,
            DataType::BigInt | DataType::NVarChar => 1,
            DataType::Float => 2,
        }
    }

    /// Convert a raw value of type `from` into this type
    pub fn convert_from(&self, from: DataType, value: &Scalar) -> Result<Scalar> {
        match (self, value) {
            (DataType::Int, Scalar::Int(v)) => Ok(Scalar::Int(*v)),
            (DataType::Int, Scalar::BigInt(v)) => i32::try_from(*v)
                .map(Scalar::Int)
                .map_err(|_| Error::ArithmeticOverflow(self.name().to_string())),
            (DataType::Int, Scalar::Float(v)) => {
                let truncated = v.trunc();
                if truncated < i32::MIN as f64 || truncated > i32::MAX as f64 {
                    return Err(Error::ArithmeticOverflow(self.name().to_string()));
                }
                Ok(Scalar::Int(truncated as i32))
            }
            (DataType::BigInt, Scalar::Int(v)) => Ok(Scalar::BigInt(i64::from(*v))),
            (DataType::BigInt, Scalar::BigInt(v)) => Ok(Scalar::BigInt(*v)),
            (DataType::BigInt, Scalar::Float(v)) => {
                let truncated = v.trunc();
                if truncated < i64::MIN as f64 || truncated >= i64::MAX as f64 {
                    return Err(Error::ArithmeticOverflow(self.name().to_string()));
                }
                Ok(Scalar::BigInt(truncated as i64))
            }
            (DataType::Float, Scalar::Int(v)) => Ok(Scalar::Float(f64::from(*v))),
            (DataType::Float, Scalar::BigInt(v)) => Ok(Scalar::Float(*v as f64)),
            (DataType::Float, Scalar::Float(v)) => Ok(Scalar::Float(*v)),
            (DataType::Int | DataType::BigInt | DataType::Float, Scalar::Text(text)) => {
                self.parse_text(from, text)
            }
            (DataType::VarChar | DataType::NVarChar, Scalar::Text(text)) => {
                Ok(Scalar::Text(Arc::clone(text)))
            }
            (DataType::VarChar | DataType::NVarChar, number) => {
                Ok(Scalar::Text(Arc::from(number.to_string())))
            }
        }
    }

    fn parse_text(&self, from: DataType, text: &str) -> Result<Scalar> {
        let trimmed = text.trim();
        let failed = || Error::conversion_failed(text, from.name(), self.name());
        match self {
            DataType::Int => match trimmed.parse::<i32>() {
                Ok(v) => Ok(Scalar::Int(v)),
                Err(_) if trimmed.parse::<i64>().is_ok() => {
                    Err(Error::ArithmeticOverflow(self.name().to_string()))
                }
                Err(_) => Err(failed()),
            },
            DataType::BigInt => trimmed
                .parse::<i64>()
                .map(Scalar::BigInt)
                .map_err(|_| failed()),
            DataType::Float => trimmed
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .map(Scalar::Float)
                .ok_or_else(failed),
            DataType::VarChar | DataType::NVarChar => Ok(Scalar::Text(Arc::from(text))),
        }
    }

    /// Compare two raw values already converted to this type
    pub fn compare(&self, left: &Scalar, right: &Scalar) -> Ordering {
        match (left, right) {
            (Scalar::Int(a), Scalar::Int(b)) => a.cmp(b),
            (Scalar::BigInt(a), Scalar::BigInt(b)) => a.cmp(b),
            (Scalar::Float(a), Scalar::Float(b)) => a.total_cmp(b),
            (Scalar::Text(a), Scalar::Text(b)) => default_collation().compare(a, b),
            // Mixed representations only occur if a caller skipped conversion
            (a, b) => a.rank().cmp(&b.rank()),
        }
    }

    /// Storage size of a raw value of this type, in bytes
    pub fn byte_length(&self, value: &Scalar) -> i32 {
        match (self, value) {
            (DataType::Int, _) => 4,
            (DataType::BigInt | DataType::Float, _) => 8,
            (DataType::VarChar, Scalar::Text(text)) => saturate(text.len()),
            (DataType::NVarChar, Scalar::Text(text)) => saturate(text.encode_utf16().count() * 2),
            (DataType::VarChar | DataType::NVarChar, number) => saturate(number.to_string().len()),
        }
    }

    /// Apply an arithmetic operator to two raw values of this type
    pub fn apply(&self, operator: BinaryOperator, left: &Scalar, right: &Scalar) -> Result<Scalar> {
        let overflow = || Error::ArithmeticOverflow(self.name().to_string());
        match (left, right) {
            (Scalar::Int(a), Scalar::Int(b)) => {
                let (a, b) = (*a, *b);
                let result = match operator {
                    BinaryOperator::Add => a.checked_add(b),
                    BinaryOperator::Subtract => a.checked_sub(b),
                    BinaryOperator::Multiply => a.checked_mul(b),
                    BinaryOperator::Divide | BinaryOperator::Modulus if b == 0 => {
                        return Err(Error::DivideByZero)
                    }
                    BinaryOperator::Divide => a.checked_div(b),
                    BinaryOperator::Modulus => a.checked_rem(b),
                    BinaryOperator::BitwiseAnd => Some(a & b),
                    BinaryOperator::BitwiseOr => Some(a | b),
                    BinaryOperator::BitwiseExclusiveOr => Some(a ^ b),
                };
                result.map(Scalar::Int).ok_or_else(overflow)
            }
            (Scalar::BigInt(a), Scalar::BigInt(b)) => {
                let (a, b) = (*a, *b);
                let result = match operator {
                    BinaryOperator::Add => a.checked_add(b),
                    BinaryOperator::Subtract => a.checked_sub(b),
                    BinaryOperator::Multiply => a.checked_mul(b),
                    BinaryOperator::Divide | BinaryOperator::Modulus if b == 0 => {
                        return Err(Error::DivideByZero)
                    }
                    BinaryOperator::Divide => a.checked_div(b),
                    BinaryOperator::Modulus => a.checked_rem(b),
                    BinaryOperator::BitwiseAnd => Some(a & b),
                    BinaryOperator::BitwiseOr => Some(a | b),
                    BinaryOperator::BitwiseExclusiveOr => Some(a ^ b),
                };
                result.map(Scalar::BigInt).ok_or_else(overflow)
            }
            (Scalar::Float(a), Scalar::Float(b)) => {
                let result = match operator {
                    BinaryOperator::Add => a + b,
                    BinaryOperator::Subtract => a - b,
                    BinaryOperator::Multiply => a * b,
                    BinaryOperator::Divide if *b == 0.0 => return Err(Error::DivideByZero),
                    BinaryOperator::Divide => a / b,
                    _ => return Err(self.incompatible(operator)),
                };
                if result.is_finite() {
                    Ok(Scalar::Float(result))
                } else {
                    Err(overflow())
                }
            }
            (Scalar::Text(a), Scalar::Text(b)) if operator == BinaryOperator::Add => {
                let mut joined = String::with_capacity(a.len() + b.len());
                joined.push_str(a);
                joined.push_str(b);
                Ok(Scalar::Text(Arc::from(joined)))
            }
            _ => Err(self.incompatible(operator)),
        }
    }

    fn incompatible(&self, operator: BinaryOperator) -> Error {
        Error::IncompatibleOperands {
            left: self.name().to_string(),
            right: self.name().to_string(),
            operator: operator.operator_name().to_string(),
        }
    }
}

fn saturate(len: usize) -> i32 {
    i32::try_from(len).unwrap_or(i32::MAX)
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Binary arithmetic and bitwise operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOperator {
    /// Addition or string concatenation (+)
    Add,
    /// Subtraction (-)
    Subtract,
    /// Multiplication (*)
    Multiply,
    /// Division (/)
    Divide,
    /// Remainder (%)
    Modulus,
    /// Bitwise AND (&)
    BitwiseAnd,
    /// Bitwise OR (|)
    BitwiseOr,
    /// Bitwise exclusive OR (^)
    BitwiseExclusiveOr,
}

impl BinaryOperator {
    /// Map an operator character to its operator
    pub fn from_symbol(symbol: char) -> Option<Self> {
        Some(match symbol {
            '+' => BinaryOperator::Add,
            '-' => BinaryOperator::Subtract,
            '*' => BinaryOperator::Multiply,
            '/' => BinaryOperator::Divide,
            '%' => BinaryOperator::Modulus,
            '&' => BinaryOperator::BitwiseAnd,
            '|' => BinaryOperator::BitwiseOr,
            '^' => BinaryOperator::BitwiseExclusiveOr,
            _ => return None,
        })
    }

    pub fn symbol(&self) -> char {
        match self {
            BinaryOperator::Add => '+',
            BinaryOperator::Subtract => '-',
            BinaryOperator::Multiply => '*',
            BinaryOperator::Divide => '/',
            BinaryOperator::Modulus => '%',
            BinaryOperator::BitwiseAnd => '&',
            BinaryOperator::BitwiseOr => '|',
            BinaryOperator::BitwiseExclusiveOr => '^',
        }
    }

    /// Operator name used in type diagnostics
    pub fn operator_name(&self) -> &'static str {
        match self {
            BinaryOperator::Add => "add",
            BinaryOperator::Subtract => "subtract",
            BinaryOperator::Multiply => "multiply",
            BinaryOperator::Divide => "divide",
            BinaryOperator::Modulus => "modulo",
            BinaryOperator::BitwiseAnd => "boolean AND",
            BinaryOperator::BitwiseOr => "boolean OR",
            BinaryOperator::BitwiseExclusiveOr => "boolean XOR",
        }
    }
}

impl fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Comparison operators for predicates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComparisonOperator {
    /// Equality (=)
    Eq,
    /// Inequality (<> or !=)
    Ne,
    /// Greater than (>)
    Gt,
    /// Greater than or equal (>= or !<)
    Gte,
    /// Less than (<)
    Lt,
    /// Less than or equal (<= or !>)
    Lte,
}

impl ComparisonOperator {
    /// Check whether an ordering between two operands satisfies the operator
    pub fn matches(&self, ordering: Ordering) -> bool {
        match self {
            ComparisonOperator::Eq => ordering == Ordering::Equal,
            ComparisonOperator::Ne => ordering != Ordering::Equal,
            ComparisonOperator::Gt => ordering == Ordering::Greater,
            ComparisonOperator::Gte => ordering != Ordering::Less,
            ComparisonOperator::Lt => ordering == Ordering::Less,
            ComparisonOperator::Lte => ordering != Ordering::Greater,
        }
    }
}

impl fmt::Display for ComparisonOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            ComparisonOperator::Eq => "=",
            ComparisonOperator::Ne => "<>",
            ComparisonOperator::Gt => ">",
            ComparisonOperator::Gte => ">=",
            ComparisonOperator::Lt => "<",
            ComparisonOperator::Lte => "<=",
        };
        f.write_str(symbol)
    }
}
