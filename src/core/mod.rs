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

//! Core types and definitions for the simulator
//!
//! - [`DataType`] - SQL data types (int, bigint, float, varchar, nvarchar)
//! - [`BinaryOperator`] - Arithmetic and bitwise operators
//! - [`ComparisonOperator`] - Predicate operators (=, <>, >, <, etc.)
//! - [`DataValue`] - Typed runtime values that may be NULL
//! - [`Table`] - Column definitions with their stored rows
//! - [`Collation`] - String comparison used for names and values
//! - [`Error`] - The single error type of the crate

pub mod collation;
pub mod error;
pub mod schema;
pub mod types;
pub mod value;

pub use collation::{default_collation, CaseInsensitive, CollatedMap, Collation};
pub use error::{Error, Result};
pub use schema::{Column, Table};
pub use types::{BinaryOperator, ComparisonOperator, DataType};
pub use value::{DataValue, Scalar};
