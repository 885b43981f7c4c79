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

//! Transaction API
//!
//! The simulation has no isolation or undo; a transaction only tracks which
//! connection it belongs to and whether it has ended. Commit and rollback
//! both end it without touching any data.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::debug;

use crate::core::{Error, Result};
use crate::executor::Simulation;

use super::connection::Connection;

struct TransactionInner {
    connection: Connection,
    completed: AtomicBool,
}

/// A transaction started on a [`Connection`]
///
/// Clones refer to the same transaction, so a command holding one sees it
/// complete when any handle commits.
#[derive(Clone)]
pub struct Transaction {
    inner: Arc<TransactionInner>,
}

impl Transaction {
    pub(crate) fn new(connection: Connection) -> Self {
        Self {
            inner: Arc::new(TransactionInner {
                connection,
                completed: AtomicBool::new(false),
            }),
        }
    }

    pub fn connection(&self) -> &Connection {
        &self.inner.connection
    }

    pub fn simulation(&self) -> &Arc<Simulation> {
        self.inner.connection.simulation()
    }

    pub fn is_completed(&self) -> bool {
        self.inner.completed.load(Ordering::Acquire)
    }

    pub fn commit(&self) -> Result<()> {
        self.complete("commit")
    }

    pub fn rollback(&self) -> Result<()> {
        self.complete("rollback")
    }

    fn complete(&self, action: &'static str) -> Result<()> {
        if self.inner.completed.swap(true, Ordering::AcqRel) {
            return Err(Error::TransactionCompleted);
        }
        debug!(action, "transaction completed");
        Ok(())
    }

    /// Check that this transaction is live and belongs to `connection`
    pub(crate) fn check_usable_with(&self, connection: &Connection) -> Result<()> {
        if self.is_completed()
            || !self.connection().same_as(connection)
            || !Arc::ptr_eq(self.simulation(), connection.simulation())
        {
            return Err(Error::TransactionMismatch);
        }
        Ok(())
    }

    pub fn same_as(&self, other: &Transaction) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transaction")
            .field("completed", &self.is_completed())
            .finish()
    }
}
