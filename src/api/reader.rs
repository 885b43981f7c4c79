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

//! Forward-only reader over query results
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//! use sqlsim::api::Connection;
//! use sqlsim::Simulation;
//!
//! let connection = Connection::new(Arc::new(Simulation::new()));
//! connection.open();
//! let mut reader = connection
//!     .create_command("SELECT 1 AS id, N'Alice' AS name")
//!     .execute_reader()
//!     .unwrap();
//!
//! while reader.read() {
//!     let id: i32 = reader.get(0).unwrap();
//!     let name: String = reader.get_by_name("name").unwrap();
//!     assert_eq!((id, name.as_str()), (1, "Alice"));
//! }
//! ```

use std::collections::VecDeque;

use crate::core::{DataType, DataValue, Error, Result, Scalar};
use crate::executor::{RowSet, NOT_APPLICABLE};

/// Host type name used in cast failures
fn host_type_name(data_type: DataType) -> &'static str {
    match data_type {
        DataType::Int => "System.Int32",
        DataType::BigInt => "System.Int64",
        DataType::Float => "System.Double",
        DataType::VarChar | DataType::NVarChar => "System.String",
    }
}

/// Trait for reading a column value as a host type
pub trait FromValue: Sized {
    fn from_value(value: &DataValue) -> Result<Self>;
}

fn cast<T>(value: &DataValue, to: &str, f: impl FnOnce(&Scalar) -> Option<T>) -> Result<T> {
    let scalar = value.value().ok_or(Error::NullValue)?;
    f(scalar).ok_or_else(|| Error::invalid_cast(host_type_name(value.data_type()), to))
}

impl FromValue for i32 {
    fn from_value(value: &DataValue) -> Result<Self> {
        cast(value, "System.Int32", |s| match s {
            Scalar::Int(n) => Some(*n),
            _ => None,
        })
    }
}

impl FromValue for i64 {
    fn from_value(value: &DataValue) -> Result<Self> {
        cast(value, "System.Int64", |s| match s {
            Scalar::BigInt(n) => Some(*n),
            _ => None,
        })
    }
}

impl FromValue for f64 {
    fn from_value(value: &DataValue) -> Result<Self> {
        cast(value, "System.Double", |s| match s {
            Scalar::Float(n) => Some(*n),
            _ => None,
        })
    }
}

impl FromValue for String {
    fn from_value(value: &DataValue) -> Result<Self> {
        cast(value, "System.String", |s| match s {
            Scalar::Text(text) => Some(text.to_string()),
            _ => None,
        })
    }
}

impl FromValue for DataValue {
    fn from_value(value: &DataValue) -> Result<Self> {
        Ok(value.clone())
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: &DataValue) -> Result<Self> {
        if value.is_null() {
            Ok(None)
        } else {
            Ok(Some(T::from_value(value)?))
        }
    }
}

/// Reader over the row sets a command produced
///
/// Starts positioned before the first row of the first row set.
#[derive(Debug)]
pub struct DataReader {
    current: Option<RowSet>,
    pending: VecDeque<RowSet>,
    /// Index of the next row `read` moves to
    next_row: usize,
    row: Option<usize>,
    records_affected: i32,
}

impl DataReader {
    pub(crate) fn new(row_sets: Vec<RowSet>, records_affected: i32) -> Self {
        let mut pending = VecDeque::from(row_sets);
        Self {
            current: pending.pop_front(),
            pending,
            next_row: 0,
            row: None,
            records_affected,
        }
    }

    /// Advance to the next row; false once the row set is exhausted
    pub fn read(&mut self) -> bool {
        let Some(current) = &self.current else {
            return false;
        };
        if self.next_row < current.row_count() {
            self.row = Some(self.next_row);
            self.next_row += 1;
            true
        } else {
            self.row = None;
            false
        }
    }

    /// Move to the next row set; false if there is none
    pub fn next_result(&mut self) -> bool {
        self.current = self.pending.pop_front();
        self.next_row = 0;
        self.row = None;
        self.current.is_some()
    }

    pub fn field_count(&self) -> usize {
        self.current.as_ref().map_or(0, |c| c.columns().len())
    }

    pub fn has_rows(&self) -> bool {
        self.current.as_ref().is_some_and(|c| !c.is_empty())
    }

    /// Sum of rows changed by the batch, or -1 if nothing reported a count
    pub fn records_affected(&self) -> i32 {
        self.records_affected
    }

    pub fn get_name(&self, ordinal: usize) -> Result<&str> {
        self.columns()
            .get(ordinal)
            .map(String::as_str)
            .ok_or(Error::OrdinalOutOfRange(ordinal))
    }

    /// Ordinal of a column, ignoring case
    pub fn get_ordinal(&self, name: &str) -> Result<usize> {
        self.current
            .as_ref()
            .and_then(|c| c.column_index(name))
            .ok_or_else(|| Error::ColumnNotFound(name.to_string()))
    }

    pub fn get_value(&self, ordinal: usize) -> Result<&DataValue> {
        let (Some(current), Some(row)) = (&self.current, self.row) else {
            return Err(Error::NoData);
        };
        current
            .rows()
            .get(row)
            .ok_or(Error::NoData)?
            .get(ordinal)
            .ok_or(Error::OrdinalOutOfRange(ordinal))
    }

    pub fn is_null(&self, ordinal: usize) -> Result<bool> {
        Ok(self.get_value(ordinal)?.is_null())
    }

    /// Read a column of the current row as a host type
    pub fn get<T: FromValue>(&self, ordinal: usize) -> Result<T> {
        T::from_value(self.get_value(ordinal)?)
    }

    pub fn get_by_name<T: FromValue>(&self, name: &str) -> Result<T> {
        self.get(self.get_ordinal(name)?)
    }

    fn columns(&self) -> &[String] {
        self.current
            .as_ref()
            .map(|c| c.columns())
            .unwrap_or_default()
    }
}

impl Default for DataReader {
    fn default() -> Self {
        Self::new(Vec::new(), NOT_APPLICABLE)
    }
}
