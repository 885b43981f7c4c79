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

//! Connection to a simulation
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//! use sqlsim::api::{Connection, ConnectionState};
//! use sqlsim::Simulation;
//!
//! let connection = Connection::new(Arc::new(Simulation::new()));
//! assert_eq!(connection.state(), ConnectionState::Closed);
//! connection.open();
//!
//! let command = connection.create_command("SELECT 1 + 1 AS two");
//! let two = command.execute_scalar().unwrap().unwrap();
//! assert_eq!(two.as_i32(), Some(2));
//! ```

use std::fmt;
use std::future::{ready, Ready};
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::core::{Error, Result};
use crate::executor::Simulation;

use super::command::Command;
use super::transaction::Transaction;

/// Whether a connection can run commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Closed,
    Open,
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectionState::Closed => write!(f, "Closed"),
            ConnectionState::Open => write!(f, "Open"),
        }
    }
}

struct ConnectionInner {
    simulation: Arc<Simulation>,
    state: Mutex<ConnectionState>,
}

/// A connection to a [`Simulation`]
///
/// Clones share the same connection; every connection created from one
/// simulation sees the same tables.
#[derive(Clone)]
pub struct Connection {
    inner: Arc<ConnectionInner>,
}

impl Connection {
    /// Create a closed connection
    pub fn new(simulation: Arc<Simulation>) -> Self {
        Self {
            inner: Arc::new(ConnectionInner {
                simulation,
                state: Mutex::new(ConnectionState::Closed),
            }),
        }
    }

    pub fn simulation(&self) -> &Arc<Simulation> {
        &self.inner.simulation
    }

    pub fn state(&self) -> ConnectionState {
        *self.inner.state.lock()
    }

    pub fn is_open(&self) -> bool {
        self.state() == ConnectionState::Open
    }

    pub fn open(&self) {
        *self.inner.state.lock() = ConnectionState::Open;
        debug!("connection opened");
    }

    pub fn close(&self) {
        *self.inner.state.lock() = ConnectionState::Closed;
        debug!("connection closed");
    }

    /// Open the connection; completes immediately
    pub fn open_async(&self) -> Ready<()> {
        self.open();
        ready(())
    }

    /// Close the connection; completes immediately
    pub fn close_async(&self) -> Ready<()> {
        self.close();
        ready(())
    }

    /// Create a command bound to this connection
    pub fn create_command(&self, command_text: impl Into<String>) -> Command {
        let mut command = Command::new(command_text);
        command.set_connection(Some(self.clone()));
        command
    }

    /// Start a transaction on an open connection
    pub fn begin_transaction(&self) -> Result<Transaction> {
        if !self.is_open() {
            warn!(operation = "BeginTransaction", "connection is closed");
            return Err(Error::ConnectionClosed("BeginTransaction"));
        }
        debug!("transaction started");
        Ok(Transaction::new(self.clone()))
    }

    /// Check whether both handles refer to the same connection
    pub fn same_as(&self, other: &Connection) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connection")
            .field("state", &self.state())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_close() {
        let connection = Connection::new(Arc::new(Simulation::new()));
        assert!(!connection.is_open());
        connection.open();
        assert_eq!(connection.state(), ConnectionState::Open);
        let clone = connection.clone();
        clone.close();
        assert_eq!(connection.state(), ConnectionState::Closed);
        assert!(connection.same_as(&clone));
    }

    #[test]
    fn test_begin_transaction_requires_open() {
        let connection = Connection::new(Arc::new(Simulation::new()));
        assert_eq!(
            connection.begin_transaction().unwrap_err(),
            Error::ConnectionClosed("BeginTransaction")
        );
        connection.open();
        assert!(connection.begin_transaction().is_ok());
    }

    #[test]
    fn test_connections_share_simulation() {
        let simulation = Arc::new(Simulation::new());
        let first = Connection::new(Arc::clone(&simulation));
        let second = Connection::new(simulation);
        first.open();
        second.open();
        first
            .create_command("CREATE TABLE t (v int)")
            .execute_non_query()
            .unwrap();
        assert!(second.simulation().catalog().contains_table("T"));
        assert!(!first.same_as(&second));
    }
}
