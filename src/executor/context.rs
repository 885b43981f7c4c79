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

//! Execution Context
//!
//! Per-batch state threaded through the statement parsers: the token cursor,
//! the simulation being run against, the bound parameters and the session
//! values that `@@` references read.

use crate::core::{CollatedMap, DataValue, Error, Result};
use crate::parser::TokenCursor;

use super::simulation::Simulation;

/// Deepest nesting of expressions and derived tables a statement may use
pub const MAX_NESTING_DEPTH: usize = 128;

/// Parameter values keyed by name without the leading `@`
pub type Bindings = CollatedMap<DataValue>;

/// Execution context for one command text
pub struct ExecutionContext<'a> {
    pub(crate) cursor: TokenCursor,
    simulation: &'a Simulation,
    bindings: &'a Bindings,
    /// Rows affected or returned by the previous statement
    row_count: i32,
    /// Expressions and derived tables currently being parsed
    nesting: usize,
}

impl<'a> ExecutionContext<'a> {
    pub fn new(simulation: &'a Simulation, command_text: &str, bindings: &'a Bindings) -> Self {
        Self {
            cursor: TokenCursor::new(command_text),
            simulation,
            bindings,
            row_count: 0,
            nesting: 0,
        }
    }

    pub fn simulation(&self) -> &'a Simulation {
        self.simulation
    }

    /// Value bound to `@name`
    pub fn parameter(&self, name: &str) -> Result<DataValue> {
        self.bindings
            .get(name)
            .cloned()
            .ok_or_else(|| Error::MustDeclareScalarVariable(name.to_string()))
    }

    /// Value of a `@@name` system function
    pub fn system_variable(&self, name: &str) -> Result<DataValue> {
        let collation = self.bindings.collation();
        if collation.equals(name, "VERSION") {
            Ok(DataValue::nvarchar(self.simulation.version()))
        } else if collation.equals(name, "ROWCOUNT") {
            Ok(DataValue::int(self.row_count))
        } else {
            Err(Error::unsupported(format!("@@{}", name)))
        }
    }

    pub(crate) fn set_row_count(&mut self, count: i32) {
        self.row_count = count;
    }

    /// Run a recursive parse one nesting level deeper
    ///
    /// Fails with [`Error::NestedTooDeeply`] past [`MAX_NESTING_DEPTH`].
    pub(crate) fn nested<T>(&mut self, parse: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        if self.nesting >= MAX_NESTING_DEPTH {
            return Err(Error::NestedTooDeeply);
        }
        self.nesting += 1;
        let result = parse(self);
        self.nesting -= 1;
        result
    }
}
