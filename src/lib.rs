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

//! # sqlsim - In-process SQL Server simulator
//!
//! sqlsim runs a subset of T-SQL against in-memory tables, behind a data
//! provider API shaped like the one applications use to talk to a real
//! server. Tests can exercise data access code without a database.
//!
//! ## Key Features
//!
//! - **T-SQL Batches** - `CREATE TABLE`, `INSERT ... VALUES`, `SELECT` with
//!   `TOP`, `WHERE` and derived tables, separated by `;`
//! - **SQL Server Typing** - int, bigint, float, varchar and nvarchar with
//!   SQL Server's promotion, conversion and overflow rules
//! - **SQL Server Errors** - failures carry the server's message text and
//!   error number
//! - **System Catalog** - `systypes` is queryable like any table
//! - **Provider API** - connections, commands, parameters, readers and
//!   transactions
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use sqlsim::api::Connection;
//! use sqlsim::Simulation;
//!
//! let connection = Connection::new(Arc::new(Simulation::new()));
//! connection.open();
//!
//! let command = connection.create_command(
//!     "CREATE TABLE t (v int); INSERT t VALUES (5); SELECT v * 2 AS doubled FROM t",
//! );
//! let mut reader = command.execute_reader().unwrap();
//! assert!(reader.read());
//! assert_eq!(reader.get::<i32>(0).unwrap(), 10);
//! ```
//!
//! ## Modules
//!
//! - [`api`] - Provider interface ([`api::Connection`], [`api::Command`])
//! - [`core`] - Core types ([`DataType`], [`DataValue`], [`Table`], [`Error`])
//! - [`storage`] - Table catalog, system catalog and configuration
//! - [`parser`] - T-SQL tokenizer
//! - [`functions`] - Built-in scalar functions
//! - [`executor`] - Statement parsing and execution ([`Simulation`])

pub mod api;
pub mod core;
pub mod executor;
pub mod functions;
pub mod parser;
pub mod storage;

// Re-export main types for convenience
pub use core::{
    BinaryOperator, CollatedMap, Collation, Column, ComparisonOperator, DataType, DataValue,
    Error, Result, Scalar, Table,
};

// Re-export config types
pub use storage::{Catalog, SimulationConfig, DEFAULT_VERSION};

// Re-export function types
pub use functions::{FunctionRegistry, ScalarFunction};

// Re-export executor types
pub use executor::{Bindings, Execution, RowSet, Simulation, StatementOutcome, NOT_APPLICABLE};

// Re-export API types
pub use api::{
    Command, Connection, ConnectionState, DataReader, FromValue, Parameter, ParameterCollection,
    ToParam, Transaction,
};
