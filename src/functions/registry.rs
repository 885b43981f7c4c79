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

//! Function registry
//!
//! Maps built-in function names to their implementations. Lookups ignore case.

use std::sync::{Arc, OnceLock};

use super::scalar::{AbsFunction, DataLengthFunction};
use super::ScalarFunction;
use crate::core::{CollatedMap, Error, Result};

/// Global function registry instance
static GLOBAL_REGISTRY: OnceLock<FunctionRegistry> = OnceLock::new();

/// Get the global function registry
#[inline]
pub fn global_registry() -> &'static FunctionRegistry {
    GLOBAL_REGISTRY.get_or_init(FunctionRegistry::new)
}

/// Registry of built-in scalar functions
#[derive(Debug)]
pub struct FunctionRegistry {
    scalar_functions: CollatedMap<Arc<dyn ScalarFunction>>,
}

impl FunctionRegistry {
    /// Create a registry holding every built-in
    pub fn new() -> Self {
        let mut registry = Self {
            scalar_functions: CollatedMap::new(),
        };
        registry.register(Arc::new(AbsFunction));
        registry.register(Arc::new(DataLengthFunction));
        registry
    }

    fn register(&mut self, function: Arc<dyn ScalarFunction>) {
        let name = function.name().to_string();
        self.scalar_functions.insert(name, function);
    }

    /// Get a scalar function by name
    pub fn get_scalar(&self, name: &str) -> Option<Arc<dyn ScalarFunction>> {
        self.scalar_functions.get(name).cloned()
    }

    /// Resolve a function name or fail the way SQL Server does
    pub fn resolve(&self, name: &str) -> Result<Arc<dyn ScalarFunction>> {
        self.get_scalar(name)
            .ok_or_else(|| Error::UnknownFunction(name.to_string()))
    }

    /// Names of all registered functions
    pub fn scalar_names(&self) -> Vec<&str> {
        self.scalar_functions.iter().map(|(name, _)| name).collect()
    }
}

impl Default for FunctionRegistry {
    fn default() -> Self {
        Self::new()
    }
}
