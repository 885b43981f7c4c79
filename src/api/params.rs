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

//! Command parameters
//!
//! Parameters are named; a leading `@` is dropped and names compare without
//! regard to case. A parameter without a declared type takes the type of its
//! value, and a NULL value with no declared type is treated as nvarchar.
//!
//! # Examples
//!
//! ```
//! use sqlsim::api::{Parameter, ParameterCollection};
//! use sqlsim::DataType;
//!
//! let mut parameters = ParameterCollection::new();
//! parameters.add_with_value("@id", 7);
//! parameters.add(Parameter::with_type("name", DataType::VarChar, "Alice"));
//! parameters.add_with_value("missing", None::<i32>);
//!
//! assert_eq!(parameters.get("ID").unwrap().data_type(), DataType::Int);
//! assert_eq!(parameters.get("missing").unwrap().data_type(), DataType::NVarChar);
//! ```

use std::sync::Arc;

use crate::core::{default_collation, DataType, DataValue, Result, Scalar};
use crate::executor::Bindings;

/// Trait for host values that can be bound to parameters
///
/// `None` binds NULL.
pub trait ToParam {
    fn to_param(&self) -> Option<Scalar>;
}

impl ToParam for i32 {
    fn to_param(&self) -> Option<Scalar> {
        Some(Scalar::Int(*self))
    }
}

impl ToParam for i64 {
    fn to_param(&self) -> Option<Scalar> {
        Some(Scalar::BigInt(*self))
    }
}

impl ToParam for f64 {
    fn to_param(&self) -> Option<Scalar> {
        Some(Scalar::Float(*self))
    }
}

impl ToParam for &str {
    fn to_param(&self) -> Option<Scalar> {
        Some(Scalar::Text(Arc::from(*self)))
    }
}

impl ToParam for String {
    fn to_param(&self) -> Option<Scalar> {
        Some(Scalar::Text(Arc::from(self.as_str())))
    }
}

impl ToParam for Scalar {
    fn to_param(&self) -> Option<Scalar> {
        Some(self.clone())
    }
}

impl<T: ToParam> ToParam for Option<T> {
    fn to_param(&self) -> Option<Scalar> {
        self.as_ref().and_then(ToParam::to_param)
    }
}

/// A named command parameter
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    name: String,
    value: Option<Scalar>,
    declared_type: Option<DataType>,
}

impl Parameter {
    /// Create a parameter whose type follows its value
    pub fn new(name: impl AsRef<str>, value: impl ToParam) -> Self {
        Self {
            name: strip_prefix(name.as_ref()),
            value: value.to_param(),
            declared_type: None,
        }
    }

    /// Create a parameter with a declared type; the value is converted to it
    pub fn with_type(name: impl AsRef<str>, data_type: DataType, value: impl ToParam) -> Self {
        Self {
            name: strip_prefix(name.as_ref()),
            value: value.to_param(),
            declared_type: Some(data_type),
        }
    }

    /// Name without the leading `@`
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> Option<&Scalar> {
        self.value.as_ref()
    }

    pub fn set_value(&mut self, value: impl ToParam) {
        self.value = value.to_param();
    }

    pub fn declared_type(&self) -> Option<DataType> {
        self.declared_type
    }

    pub fn set_declared_type(&mut self, data_type: Option<DataType>) {
        self.declared_type = data_type;
    }

    /// The declared type, or the one inferred from the value
    pub fn data_type(&self) -> DataType {
        match (self.declared_type, &self.value) {
            (Some(declared), _) => declared,
            (None, Some(value)) => value.natural_type(),
            (None, None) => DataType::NVarChar,
        }
    }

    /// The value the command text sees for `@name`
    pub fn to_data_value(&self) -> Result<DataValue> {
        let data_type = self.data_type();
        match &self.value {
            None => Ok(DataValue::null(data_type)),
            Some(value) => DataValue::from_scalar(value.clone()).convert_to(data_type),
        }
    }
}

fn strip_prefix(name: &str) -> String {
    name.strip_prefix('@').unwrap_or(name).to_string()
}

/// Parameters attached to a command
#[derive(Debug, Clone, Default)]
pub struct ParameterCollection {
    parameters: Vec<Parameter>,
}

impl ParameterCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a parameter, replacing any with the same name
    pub fn add(&mut self, parameter: Parameter) -> &mut Parameter {
        let index = match self.position(parameter.name()) {
            Some(index) => {
                self.parameters[index] = parameter;
                index
            }
            None => {
                self.parameters.push(parameter);
                self.parameters.len() - 1
            }
        };
        &mut self.parameters[index]
    }

    pub fn add_with_value(&mut self, name: impl AsRef<str>, value: impl ToParam) -> &mut Parameter {
        self.add(Parameter::new(name, value))
    }

    pub fn get(&self, name: &str) -> Option<&Parameter> {
        self.position(name).map(|i| &self.parameters[i])
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Parameter> {
        self.position(name).map(|i| &mut self.parameters[i])
    }

    pub fn remove(&mut self, name: &str) -> Option<Parameter> {
        self.position(name).map(|i| self.parameters.remove(i))
    }

    pub fn clear(&mut self) {
        self.parameters.clear();
    }

    pub fn len(&self) -> usize {
        self.parameters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Parameter> {
        self.parameters.iter()
    }

    /// Values keyed by name, as the executor reads them
    pub fn bindings(&self) -> Result<Bindings> {
        let mut bindings = Bindings::new();
        for parameter in &self.parameters {
            bindings.insert(parameter.name(), parameter.to_data_value()?);
        }
        Ok(bindings)
    }

    fn position(&self, name: &str) -> Option<usize> {
        let name = name.strip_prefix('@').unwrap_or(name);
        let collation = default_collation();
        self.parameters
            .iter()
            .position(|p| collation.equals(p.name(), name))
    }
}

impl<'a> IntoIterator for &'a ParameterCollection {
    type Item = &'a Parameter;
    type IntoIter = std::slice::Iter<'a, Parameter>;

    fn into_iter(self) -> Self::IntoIter {
        self.parameters.iter()
    }
}
