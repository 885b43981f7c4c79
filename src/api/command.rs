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

//! Commands
//!
//! A [`Command`] carries a command text and its parameters, and runs them
//! on the connection it is bound to. The whole text runs on every execute
//! call; the method picks which part of the outcomes it reports.
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
//!
//! let create = connection.create_command("CREATE TABLE people (id int, name nvarchar(20))");
//! assert_eq!(create.execute_non_query().unwrap(), -1);
//!
//! let mut insert = connection.create_command("INSERT people VALUES (@id, @name)");
//! insert.parameters_mut().add_with_value("@id", 1);
//! insert.parameters_mut().add_with_value("@name", "Alice");
//! assert_eq!(insert.execute_non_query().unwrap(), 1);
//! ```

use std::future::{ready, Ready};

use tracing::{trace, warn};

use crate::core::{DataValue, Error, Result};
use crate::executor::{StatementOutcome, NOT_APPLICABLE};

use super::connection::Connection;
use super::params::ParameterCollection;
use super::reader::DataReader;
use super::transaction::Transaction;

/// A command text with parameters, bound to a connection
#[derive(Debug, Clone, Default)]
pub struct Command {
    connection: Option<Connection>,
    command_text: String,
    parameters: ParameterCollection,
    transaction: Option<Transaction>,
}

impl Command {
    /// Create a command with no connection
    pub fn new(command_text: impl Into<String>) -> Self {
        Self {
            command_text: command_text.into(),
            ..Self::default()
        }
    }

    pub fn connection(&self) -> Option<&Connection> {
        self.connection.as_ref()
    }

    /// Bind or unbind the connection
    ///
    /// A transaction from another connection is dropped.
    pub fn set_connection(&mut self, connection: Option<Connection>) {
        if let (Some(transaction), Some(connection)) = (&self.transaction, &connection) {
            if !transaction.connection().same_as(connection) {
                self.transaction = None;
            }
        }
        self.connection = connection;
    }

    pub fn command_text(&self) -> &str {
        &self.command_text
    }

    pub fn set_command_text(&mut self, command_text: impl Into<String>) {
        self.command_text = command_text.into();
    }

    pub fn parameters(&self) -> &ParameterCollection {
        &self.parameters
    }

    pub fn parameters_mut(&mut self) -> &mut ParameterCollection {
        &mut self.parameters
    }

    pub fn transaction(&self) -> Option<&Transaction> {
        self.transaction.as_ref()
    }

    /// Attach a transaction, or detach with `None`
    ///
    /// The transaction must be live and belong to this command's connection.
    pub fn set_transaction(&mut self, transaction: Option<Transaction>) -> Result<()> {
        if let Some(transaction) = &transaction {
            let usable = match &self.connection {
                Some(connection) => transaction.check_usable_with(connection),
                None if transaction.is_completed() => Err(Error::TransactionMismatch),
                None => Ok(()),
            };
            if let Err(e) = usable {
                warn!(error = %e, "transaction rejected");
                return Err(e);
            }
        }
        self.transaction = transaction;
        Ok(())
    }

    /// Run the command and return the summed count of changed rows
    ///
    /// Returns -1 when no statement reported a count.
    pub fn execute_non_query(&self) -> Result<i32> {
        let outcomes = self.run("ExecuteNonQuery")?;
        Ok(records_affected(&outcomes))
    }

    /// Run the command and read its row sets
    pub fn execute_reader(&self) -> Result<DataReader> {
        let outcomes = self.run("ExecuteReader")?;
        let affected = records_affected(&outcomes);
        let row_sets = outcomes
            .into_iter()
            .filter_map(StatementOutcome::into_row_set)
            .collect();
        Ok(DataReader::new(row_sets, affected))
    }

    /// Run the command and return the first column of the first row
    ///
    /// Returns `None` when no row set has a row.
    pub fn execute_scalar(&self) -> Result<Option<DataValue>> {
        let outcomes = self.run("ExecuteScalar")?;
        Ok(outcomes
            .iter()
            .find_map(StatementOutcome::as_row_set)
            .and_then(|rows| rows.scalar())
            .cloned())
    }

    pub fn execute_non_query_async(&self) -> Ready<Result<i32>> {
        ready(self.execute_non_query())
    }

    pub fn execute_reader_async(&self) -> Ready<Result<DataReader>> {
        ready(self.execute_reader())
    }

    pub fn execute_scalar_async(&self) -> Ready<Result<Option<DataValue>>> {
        ready(self.execute_scalar())
    }

    fn run(&self, operation: &'static str) -> Result<Vec<StatementOutcome>> {
        let Some(connection) = &self.connection else {
            warn!(operation, "command has no connection");
            return Err(Error::ConnectionNotInitialized(operation));
        };
        if !connection.is_open() {
            warn!(operation, "connection is closed");
            return Err(Error::ConnectionClosed(operation));
        }
        if let Some(transaction) = &self.transaction {
            transaction.check_usable_with(connection)?;
        }

        let bindings = self.parameters.bindings()?;
        trace!(operation, text = %self.command_text, "executing command");
        connection
            .simulation()
            .execute_batch(&self.command_text, &bindings)
    }
}

fn records_affected(outcomes: &[StatementOutcome]) -> i32 {
    outcomes
        .iter()
        .filter_map(StatementOutcome::records_affected)
        .reduce(|total, n| total.saturating_add(n))
        .unwrap_or(NOT_APPLICABLE)
}
