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

//! String scalar functions

use crate::core::{DataType, DataValue, Result};
use crate::functions::{validate_arg_count, ScalarFunction};

// ============================================================================
// DATALENGTH
// ============================================================================

/// DATALENGTH function - storage size of a value in bytes
#[derive(Debug, Default)]
pub struct DataLengthFunction;

impl ScalarFunction for DataLengthFunction {
    fn name(&self) -> &str {
        "datalength"
    }

    fn evaluate(&self, args: &[DataValue]) -> Result<DataValue> {
        validate_arg_count(self, args.len())?;
        Ok(match args[0].byte_length() {
            Some(len) => DataValue::int(len),
            None => DataValue::null(DataType::Int),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_datalength() {
        let f = DataLengthFunction;
        assert_eq!(f.evaluate(&[DataValue::int(1)]).unwrap(), DataValue::int(4));
        assert_eq!(f.evaluate(&[DataValue::bigint(1)]).unwrap(), DataValue::int(8));
        assert_eq!(f.evaluate(&[DataValue::float(1.0)]).unwrap(), DataValue::int(8));
        assert_eq!(
            f.evaluate(&[DataValue::nvarchar("abc")]).unwrap(),
            DataValue::int(6)
        );
        assert_eq!(
            f.evaluate(&[DataValue::varchar("abc")]).unwrap(),
            DataValue::int(3)
        );
    }

    #[test]
    fn test_datalength_null() {
        let f = DataLengthFunction;
        assert_eq!(
            f.evaluate(&[DataValue::null(DataType::NVarChar)]).unwrap(),
            DataValue::null(DataType::Int)
        );
    }

    #[test]
    fn test_datalength_arity() {
        let f = DataLengthFunction;
        assert_eq!(
            f.evaluate(&[]).unwrap_err().to_string(),
            "The datalength function requires 1 argument(s)."
        );
    }
}
