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

//! Comment Invariance Tests
//!
//! Whitespace and comments between tokens never change what a batch does.

use proptest::prelude::*;
use sqlsim::{Bindings, Simulation, StatementOutcome};

const STATEMENTS: &[&[&str]] = &[
    &[
        "SELECT", "1", "+", "2", "*", "3", "AS", "v", ",", "N'x'", ",", "ABS", "(", "-", "4", ")",
    ],
    &[
        "CREATE", "TABLE", "t", "(", "a", "int", "NOT", "NULL", ",", "b", "nvarchar", "(", "10",
        ")", ")", ";", "INSERT", "t", "(", "b", ",", "a", ")", "VALUES", "(", "'q'", ",", "7",
        ")", ";", "SELECT", "TOP", "(", "1", ")", "a", ",", "b", "FROM", "t", "WHERE", "a", ">=",
        "7",
    ],
    &[
        "SELECT", "DATALENGTH", "(", "'abc'", ")", "-", "1", "%", "2", "FROM", "(", "SELECT",
        "1", "AS", "[x]", ")", "AS", "d",
    ],
];

const TRIVIA: &[&str] = &[" ", "\n", "\t", "\r\n", " -- note\n", " /* c */ ", " /* a /* b */ */ "];

fn join(tokens: &[&str], gaps: &[usize]) -> String {
    let mut text = String::from(TRIVIA[gaps[0] % TRIVIA.len()]);
    for (token, gap) in tokens.iter().zip(&gaps[1..]) {
        text.push_str(token);
        text.push_str(TRIVIA[gap % TRIVIA.len()]);
    }
    text
}

fn outcomes(text: &str) -> Vec<StatementOutcome> {
    Simulation::new()
        .execute_batch(text, &Bindings::new())
        .expect("batch should run")
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]
    #[test]
    fn prop_trivia_does_not_change_outcomes(
        index in 0..STATEMENTS.len(),
        gaps in proptest::collection::vec(any::<usize>(), 64),
    ) {
        let tokens = STATEMENTS[index];
        let plain = tokens.join(" ");
        let decorated = join(tokens, &gaps);
        prop_assert_eq!(outcomes(&plain), outcomes(&decorated), "text={:?}", decorated);
    }
}
