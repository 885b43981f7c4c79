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

//! Statement Executor
//!
//! Statements are parsed straight off the token cursor and run as soon as
//! each one is complete:
//!
//! ```text
//! command text
//!   ↓
//! TokenCursor (whitespace and comments dropped)
//!   ↓
//! Execution (dispatch on the leading keyword)
//!   ├── SELECT  → Selection → Expression / BooleanExpression
//!   ├── CREATE  → ddl
//!   ├── INSERT  → dml
//!   └── SET     → session options
//!   ↓
//! StatementOutcome
//! ```
//!
//! # Components
//!
//! - [`Simulation`] - Catalog owner and batch entry point
//! - [`Execution`] - Lazy iterator over statement outcomes
//! - [`Expression`] - Scalar expression tree
//! - [`BooleanExpression`] - WHERE predicates
//! - [`Selection`] - SELECT statements

pub mod boolean;
pub mod context;
pub mod expression;
pub mod result;
pub mod selection;
pub mod simulation;

mod ddl;
mod dml;

pub use boolean::BooleanExpression;
pub use context::{Bindings, ExecutionContext, MAX_NESTING_DEPTH};
pub use expression::{Expression, NoRow, RowLookup};
pub use result::{RowSet, StatementOutcome, NOT_APPLICABLE};
pub use selection::{SelectItem, Selection, Source};
pub use simulation::{Execution, Simulation};
