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

//! Math scalar functions

use crate::core::{DataValue, Error, Result, Scalar};
use crate::functions::{validate_arg_count, ScalarFunction};

// ============================================================================
// ABS
// ============================================================================

/// ABS function - absolute value, keeping the argument's type
///
/// A NULL argument of any type yields NULL of that type.
#[derive(Debug, Default)]
pub struct AbsFunction;

impl ScalarFunction for AbsFunction {
    fn name(&self) -> &str {
        "abs"
    }

    fn evaluate(&self, args: &[DataValue]) -> Result<DataValue> {
        validate_arg_count(self, args.len())?;
        let arg = &args[0];
        let overflow = || Error::ArithmeticOverflow(arg.data_type().name().to_string());

        match arg.value() {
            None => Ok(DataValue::null(arg.data_type())),
            Some(Scalar::Int(v)) => Ok(DataValue::int(v.checked_abs().ok_or_else(overflow)?)),
            Some(Scalar::BigInt(v)) => {
                Ok(DataValue::bigint(v.checked_abs().ok_or_else(overflow)?))
            }
            Some(Scalar::Float(v)) => Ok(DataValue::float(v.abs())),
            _ => Err(Error::InvalidArgumentType {
                data_type: arg.data_type().name().to_string(),
                function: self.name().to_string(),
            }),
        }
    }
}
