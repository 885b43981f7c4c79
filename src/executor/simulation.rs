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

//! Simulation
//!
//! A [`Simulation`] owns the catalog that every connection created from it
//! shares. [`Simulation::execute`] runs a command text one statement at a
//! time, yielding each outcome as soon as its statement finishes.
//!
//! # Example
//!
//! ```
//! use sqlsim::{Bindings, Simulation};
//!
//! let simulation = Simulation::new();
//! let bindings = Bindings::new();
//! let outcomes = simulation
//!     .execute_batch("CREATE TABLE t (v int); INSERT t VALUES (5); SELECT v FROM t", &bindings)
//!     .unwrap();
//! assert_eq!(outcomes.len(), 3);
//! assert_eq!(outcomes[1].records_affected(), Some(1));
//! ```

use std::fmt;

use tracing::debug;

use crate::core::{default_collation, Error, Result};
use crate::parser::{Keyword, Token, TokenKind};
use crate::storage::{Catalog, SimulationConfig};

use super::context::{Bindings, ExecutionContext};
use super::ddl::execute_create;
use super::dml::execute_insert;
use super::result::StatementOutcome;
use super::selection::Selection;

/// Session options accepted by `SET` and otherwise ignored
const SESSION_OPTIONS: &[&str] = &["NOCOUNT", "IMPLICIT_TRANSACTIONS"];

/// An in-memory SQL Server instance
pub struct Simulation {
    config: SimulationConfig,
    catalog: Catalog,
}

impl Simulation {
    pub fn new() -> Self {
        Self::with_config(SimulationConfig::default())
    }

    pub fn with_config(config: SimulationConfig) -> Self {
        let catalog = Catalog::new(config.retain_system_catalog);
        Self { config, catalog }
    }

    /// Text reported by `@@VERSION`
    pub fn version(&self) -> &str {
        &self.config.version
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Run a command text lazily
    ///
    /// Each call to `next` parses and runs one statement. After the first
    /// error the iterator yields nothing more; statements before it keep
    /// their effects.
    pub fn execute<'a>(&'a self, command_text: &str, bindings: &'a Bindings) -> Execution<'a> {
        Execution {
            ctx: ExecutionContext::new(self, command_text, bindings),
            finished: false,
        }
    }

    /// Run a command text to completion
    pub fn execute_batch(
        &self,
        command_text: &str,
        bindings: &Bindings,
    ) -> Result<Vec<StatementOutcome>> {
        self.execute(command_text, bindings).collect()
    }
}

impl Default for Simulation {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Simulation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Simulation")
            .field("version", &self.config.version)
            .field("catalog", &self.catalog)
            .finish()
    }
}

/// Iterator over the outcomes of one command text
pub struct Execution<'a> {
    ctx: ExecutionContext<'a>,
    finished: bool,
}

impl Execution<'_> {
    /// Run the statement introduced by `token`
    ///
    /// Returns `None` for statements that produce no outcome.
    fn run_statement(&mut self, token: Token) -> Result<Option<StatementOutcome>> {
        let ctx = &mut self.ctx;
        let keyword = match token.kind {
            TokenKind::ReservedKeyword(keyword) => keyword,
            _ => return Err(token.syntax_error()),
        };
        let outcome = match keyword {
            Keyword::Select => {
                let selection = Selection::parse(ctx)?;
                StatementOutcome::RowSet(selection.execute(ctx.simulation())?)
            }
            Keyword::Create => execute_create(ctx)?,
            Keyword::Insert => execute_insert(ctx)?,
            Keyword::Set => {
                Self::set_option(ctx)?;
                return Ok(None);
            }
            keyword if keyword.is_unsupported_statement() => {
                return Err(Error::unsupported(format!("The {} statement", keyword)))
            }
            _ => return Err(token.syntax_error()),
        };
        debug!(statement = %keyword, "executed statement");
        Ok(Some(outcome))
    }

    fn set_option(ctx: &mut ExecutionContext<'_>) -> Result<()> {
        let token = ctx.cursor.expect_next()?;
        let Some(name) = token.identifier() else {
            return Err(token.syntax_error());
        };
        let collation = default_collation();
        if !SESSION_OPTIONS.iter().any(|o| collation.equals(name, o)) {
            return Err(Error::unsupported(format!(
                "SET {}",
                name.to_ascii_uppercase()
            )));
        }
        let value = ctx.cursor.expect_next()?;
        if !value.is_keyword(Keyword::On) && !value.is_keyword(Keyword::Off) {
            return Err(value.syntax_error());
        }
        debug!(option = %name, value = %value.literal, "ignored session option");
        Ok(())
    }
}

impl Iterator for Execution<'_> {
    type Item = Result<StatementOutcome>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.finished {
            let token = match self.ctx.cursor.next() {
                Ok(Some(token)) => token,
                Ok(None) => {
                    self.finished = true;
                    return None;
                }
                Err(e) => {
                    self.finished = true;
                    return Some(Err(e));
                }
            };
            if token.kind == TokenKind::StatementTerminator {
                continue;
            }
            match self.run_statement(token) {
                Ok(Some(outcome)) => {
                    let count = match &outcome {
                        StatementOutcome::RowSet(rows) => {
                            i32::try_from(rows.row_count()).unwrap_or(i32::MAX)
                        }
                        StatementOutcome::NonQuery { .. } => outcome.records_affected().unwrap_or(0),
                    };
                    self.ctx.set_row_count(count);
                    return Some(Ok(outcome));
                }
                Ok(None) => self.ctx.set_row_count(0),
                Err(e) => {
                    self.finished = true;
                    debug!(error = %e, "statement failed");
                    return Some(Err(e));
                }
            }
        }
        None
    }
}

impl std::iter::FusedIterator for Execution<'_> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::DataValue;

    fn run(simulation: &Simulation, text: &str) -> Result<Vec<StatementOutcome>> {
        simulation.execute_batch(text, &Bindings::new())
    }

    #[test]
    fn test_empty_batches() {
        let simulation = Simulation::new();
        assert!(run(&simulation, "").unwrap().is_empty());
        assert!(run(&simulation, "  -- nothing\n /* here */ ;;").unwrap().is_empty());
    }

    #[test]
    fn test_session_options() {
        let simulation = Simulation::new();
        assert!(run(&simulation, "SET NOCOUNT ON; set implicit_transactions off")
            .unwrap()
            .is_empty());
        assert!(matches!(
            run(&simulation, "SET ANSI_NULLS ON"),
            Err(Error::Unsupported(_))
        ));
        assert_eq!(
            run(&simulation, "SET NOCOUNT 1"),
            Err(Error::syntax("1"))
        );
    }

    #[test]
    fn test_statement_dispatch_errors() {
        let simulation = Simulation::new();
        assert!(matches!(
            run(&simulation, "UPDATE t SET a = 1"),
            Err(Error::Unsupported(_))
        ));
        assert_eq!(
            run(&simulation, "FROM t"),
            Err(Error::IncorrectSyntaxNearKeyword("FROM".to_string()))
        );
        assert_eq!(run(&simulation, "foo"), Err(Error::syntax("foo")));
        assert_eq!(run(&simulation, ")"), Err(Error::syntax(")")));
    }

    #[test]
    fn test_lazy_execution_stops_at_error() {
        let simulation = Simulation::new();
        let bindings = Bindings::new();
        let mut execution = simulation.execute("SELECT 1; SELECT x; SELECT 2", &bindings);
        assert!(execution.next().unwrap().is_ok());
        assert_eq!(
            execution.next().unwrap(),
            Err(Error::InvalidColumnName("x".to_string()))
        );
        assert!(execution.next().is_none());
        assert!(execution.next().is_none());
    }

    #[test]
    fn test_row_count_tracks_previous_statement() {
        let simulation = Simulation::new();
        let outcomes = run(
            &simulation,
            "CREATE TABLE t (v int); INSERT t VALUES (1), (2); SELECT @@ROWCOUNT",
        )
        .unwrap();
        let rows = outcomes[2].as_row_set().unwrap();
        assert_eq!(rows.scalar(), Some(&DataValue::int(2)));
    }

    #[test]
    fn test_version() {
        let config = SimulationConfig::new().with_version("Test Server");
        let simulation = Simulation::with_config(config);
        let outcomes = run(&simulation, "SELECT @@VERSION").unwrap();
        assert_eq!(
            outcomes[0].as_row_set().unwrap().scalar(),
            Some(&DataValue::nvarchar("Test Server"))
        );
    }
}
