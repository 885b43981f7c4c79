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

//! Table definitions and in-memory row storage

use std::fmt;
use std::sync::OnceLock;

use super::collation::CollatedMap;
use super::error::{Error, Result};
use super::types::DataType;
use super::value::DataValue;

/// Column definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    /// Column name as declared
    pub name: String,

    /// Column data type
    pub data_type: DataType,

    /// Whether the column accepts NULL
    pub nullable: bool,
}

impl Column {
    pub fn new(name: impl Into<String>, data_type: DataType, nullable: bool) -> Self {
        Self {
            name: name.into(),
            data_type,
            nullable,
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name, self.data_type)?;
        if !self.nullable {
            write!(f, " NOT NULL")?;
        }
        Ok(())
    }
}

/// A table: its columns and the rows stored in it
///
/// Rows are kept in insertion order. Every stored row has exactly one value
/// per column, already converted to the column type.
pub struct Table {
    name: String,
    columns: Vec<Column>,
    rows: Vec<Vec<DataValue>>,

    /// Column name to ordinal, built on first lookup
    ordinal_cache: OnceLock<CollatedMap<usize>>,
}

impl Table {
    /// Create an empty table
    ///
    /// Fails if two columns share a name under the default collation.
    pub fn new(name: impl Into<String>, columns: Vec<Column>) -> Result<Self> {
        let name = name.into();
        let mut seen = CollatedMap::new();
        for column in &columns {
            if seen.insert(column.name.as_str(), ()).is_some() {
                return Err(Error::DuplicateColumn {
                    table: name,
                    column: column.name.clone(),
                });
            }
        }
        Ok(Self {
            name,
            columns,
            rows: Vec::new(),
            ordinal_cache: OnceLock::new(),
        })
    }

    /// Create a table with rows already in place
    pub fn with_rows(
        name: impl Into<String>,
        columns: Vec<Column>,
        rows: Vec<Vec<DataValue>>,
    ) -> Result<Self> {
        let mut table = Self::new(name, columns)?;
        table.rows = rows;
        Ok(table)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<DataValue>] {
        &self.rows
    }

    /// Column names in declaration order
    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    /// Column name to ordinal map
    pub fn column_ordinals(&self) -> &CollatedMap<usize> {
        self.ordinal_cache.get_or_init(|| {
            self.columns
                .iter()
                .enumerate()
                .map(|(i, c)| (c.name.as_str(), i))
                .collect()
        })
    }

    /// Ordinal of a column by name
    pub fn column_ordinal(&self, name: &str) -> Option<usize> {
        self.column_ordinals().get(name).copied()
    }

    /// Append rows, returning how many were stored
    ///
    /// `columns` names the target columns in the order values are supplied;
    /// `None` means every column in declaration order. Values are converted
    /// to the column types and unlisted columns receive NULL. Every row is
    /// validated before any is stored.
    pub fn insert(&mut self, columns: Option<&[String]>, rows: Vec<Vec<DataValue>>) -> Result<usize> {
        let targets = self.resolve_targets(columns)?;

        let mut prepared = Vec::with_capacity(rows.len());
        for values in rows {
            if values.len() != targets.len() {
                return Err(match (columns.is_some(), values.len() < targets.len()) {
                    (true, true) => Error::InsertMoreColumnsThanValues,
                    (true, false) => Error::InsertFewerColumnsThanValues,
                    (false, _) => Error::ColumnCountMismatch,
                });
            }

            let mut row: Vec<DataValue> = self
                .columns
                .iter()
                .map(|c| DataValue::null(c.data_type))
                .collect();
            for (&ordinal, value) in targets.iter().zip(values) {
                row[ordinal] = value.convert_to(self.columns[ordinal].data_type)?;
            }

            if let Some(column) = self
                .columns
                .iter()
                .zip(&row)
                .find_map(|(c, v)| (!c.nullable && v.is_null()).then_some(c))
            {
                return Err(Error::NotNullViolation {
                    table: self.name.clone(),
                    column: column.name.clone(),
                });
            }
            prepared.push(row);
        }

        let count = prepared.len();
        self.rows.extend(prepared);
        Ok(count)
    }

    fn resolve_targets(&self, columns: Option<&[String]>) -> Result<Vec<usize>> {
        let Some(names) = columns else {
            return Ok((0..self.columns.len()).collect());
        };
        let mut targets = Vec::with_capacity(names.len());
        for name in names {
            let ordinal = self
                .column_ordinal(name)
                .ok_or_else(|| Error::InvalidColumnName(name.clone()))?;
            if targets.contains(&ordinal) {
                return Err(Error::DuplicateInsertColumn(self.columns[ordinal].name.clone()));
            }
            targets.push(ordinal);
        }
        Ok(targets)
    }
}

impl Clone for Table {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            columns: self.columns.clone(),
            rows: self.rows.clone(),
            ordinal_cache: OnceLock::new(),
        }
    }
}

impl fmt::Debug for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Table")
            .field("name", &self.name)
            .field("columns", &self.columns)
            .field("rows", &self.rows.len())
            .finish()
    }
}
