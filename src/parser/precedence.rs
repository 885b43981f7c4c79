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

//! Operator precedence levels for T-SQL expressions
//!
//! Lower values bind tighter, matching the ordering in the T-SQL reference.

use crate::core::BinaryOperator;

/// Precedence level of an expression node
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Precedence {
    /// Literals, references, calls and parenthesized groups
    Primary = 0,
    /// `*`, `/`
    Multiplicative = 2,
    /// `+`, `-`, `%`, `&`, `|`, `^`
    Additive = 3,
}

impl Precedence {
    /// Precedence of a binary operator
    pub fn of(operator: BinaryOperator) -> Self {
        match operator {
            BinaryOperator::Multiply | BinaryOperator::Divide => Precedence::Multiplicative,
            BinaryOperator::Add
            | BinaryOperator::Subtract
            | BinaryOperator::Modulus
            | BinaryOperator::BitwiseAnd
            | BinaryOperator::BitwiseOr
            | BinaryOperator::BitwiseExclusiveOr => Precedence::Additive,
        }
    }

    pub fn value(self) -> u8 {
        self as u8
    }

    /// Check if this level binds strictly tighter than `other`
    pub fn binds_tighter_than(self, other: Precedence) -> bool {
        self.value() < other.value()
    }
}
