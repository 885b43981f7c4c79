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

//! Data provider API
//!
//! Connection, command, parameter and reader types modeled on a SQL Server
//! data provider.
//!
//! # Quick Start
//!
//! ```
//! use std::sync::Arc;
//! use sqlsim::api::Connection;
//! use sqlsim::Simulation;
//!
//! let simulation = Arc::new(Simulation::new());
//! let connection = Connection::new(Arc::clone(&simulation));
//! connection.open();
//!
//! connection
//!     .create_command("CREATE TABLE users (id int NOT NULL, name nvarchar(50))")
//!     .execute_non_query()
//!     .unwrap();
//!
//! let mut insert = connection.create_command("INSERT INTO users VALUES (@id, @name)");
//! insert.parameters_mut().add_with_value("id", 1);
//! insert.parameters_mut().add_with_value("name", "Alice");
//! assert_eq!(insert.execute_non_query().unwrap(), 1);
//!
//! let mut reader = connection
//!     .create_command("SELECT name FROM users WHERE id = 1")
//!     .execute_reader()
//!     .unwrap();
//! assert!(reader.read());
//! assert_eq!(reader.get::<String>(0).unwrap(), "Alice");
//! ```
//!
//! # Async
//!
//! The `_async` methods return [`std::future::Ready`]; the work is done
//! before the future is returned.

pub mod command;
pub mod connection;
pub mod params;
pub mod reader;
pub mod transaction;

pub use command::Command;
pub use connection::{Connection, ConnectionState};
pub use params::{Parameter, ParameterCollection, ToParam};
pub use reader::{DataReader, FromValue};
pub use transaction::Transaction;
