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

//! Execution Result Types
//!
//! Every statement in a batch produces one [`StatementOutcome`]: either a
//! materialized row set or a count of affected rows.

use crate::core::{default_collation, DataValue};

/// Records-affected value for statements where a count does not apply
pub const NOT_APPLICABLE: i32 = -1;

/// Materialized query result
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RowSet {
    columns: Vec<String>,
    rows: Vec<Vec<DataValue>>,
}

impl RowSet {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<DataValue>>) -> Self {
        Self { columns, rows }
    }

    /// Column names; computed columns without an alias have an empty name
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<DataValue>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Ordinal of the first column with the given name, ignoring case
    pub fn column_index(&self, name: &str) -> Option<usize> {
        let collation = default_collation();
        self.columns.iter().position(|c| collation.equals(c, name))
    }

    /// First column of the first row
    pub fn scalar(&self) -> Option<&DataValue> {
        self.rows.first().and_then(|row| row.first())
    }

    pub fn into_parts(self) -> (Vec<String>, Vec<Vec<DataValue>>) {
        (self.columns, self.rows)
    }
}

/// Result of one statement
#[derive(Debug, Clone, PartialEq)]
pub enum StatementOutcome {
    /// A SELECT produced rows
    RowSet(RowSet),

    /// A statement that returns no rows
    NonQuery {
        /// Rows changed, or [`NOT_APPLICABLE`]
        records_affected: i32,
    },
}

impl StatementOutcome {
    pub fn non_query(records_affected: i32) -> Self {
        StatementOutcome::NonQuery { records_affected }
    }

    /// Outcome for statements that change no rows, such as DDL
    pub fn not_applicable() -> Self {
        Self::non_query(NOT_APPLICABLE)
    }

    /// Affected-row count, if this outcome carries a meaningful one
    pub fn records_affected(&self) -> Option<i32> {
        match self {
            StatementOutcome::NonQuery { records_affected } if *records_affected != NOT_APPLICABLE => {
                Some(*records_affected)
            }
            _ => None,
        }
    }

    pub fn is_row_set(&self) -> bool {
        matches!(self, StatementOutcome::RowSet(_))
    }

    pub fn as_row_set(&self) -> Option<&RowSet> {
        match self {
            StatementOutcome::RowSet(rows) => Some(rows),
            StatementOutcome::NonQuery { .. } => None,
        }
    }

    pub fn into_row_set(self) -> Option<RowSet> {
        match self {
            StatementOutcome::RowSet(rows) => Some(rows),
            StatementOutcome::NonQuery { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_affected() {
        assert_eq!(StatementOutcome::non_query(3).records_affected(), Some(3));
        assert_eq!(StatementOutcome::not_applicable().records_affected(), None);
        let rows = StatementOutcome::RowSet(RowSet::default());
        assert_eq!(rows.records_affected(), None);
        assert!(rows.is_row_set());
    }

    #[test]
    fn test_row_set_accessors() {
        let set = RowSet::new(
            vec!["Id".to_string(), String::new()],
            vec![vec![DataValue::int(1), DataValue::int(2)]],
        );
        assert_eq!(set.column_index("id"), Some(0));
        assert_eq!(set.column_index("x"), None);
        assert_eq!(set.scalar(), Some(&DataValue::int(1)));
        assert_eq!(set.row_count(), 1);
    }
}
