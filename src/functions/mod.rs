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

//! Built-in function system
//!
//! - [`ScalarFunction`] - Trait implemented by every built-in function
//! - [`FunctionRegistry`] - Case-insensitive lookup of built-ins by name

pub mod registry;
pub mod scalar;

use std::fmt;

use crate::core::{DataValue, Error, Result};

pub use registry::{global_registry, FunctionRegistry};

/// Trait for scalar (row-at-a-time) functions
pub trait ScalarFunction: Send + Sync + fmt::Debug {
    /// Function name as SQL Server prints it in diagnostics
    fn name(&self) -> &str;

    /// Number of arguments the function takes
    fn arity(&self) -> usize {
        1
    }

    /// Evaluate the function with the given arguments
    fn evaluate(&self, args: &[DataValue]) -> Result<DataValue>;
}

/// Check an argument list length against a function's arity
pub fn validate_arg_count(function: &dyn ScalarFunction, count: usize) -> Result<()> {
    if count == function.arity() {
        Ok(())
    } else {
        Err(Error::WrongArgumentCount {
            function: function.name().to_string(),
            count: function.arity(),
        })
    }
}
