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

//! Runtime values with type information
//!
//! A [`DataValue`] pairs an optional raw [`Scalar`] with the [`DataType`] it
//! belongs to, so a NULL still knows its type. All arithmetic, comparison and
//! conversion goes through the type rules in [`super::types`].

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use super::error::{Error, Result};
use super::types::{BinaryOperator, DataType};

/// A raw, non-null value
///
/// Text uses `Arc<str>` so rows clone cheaply during scans.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    /// 32-bit signed integer
    Int(i32),

    /// 64-bit signed integer
    BigInt(i64),

    /// 64-bit floating point
    Float(f64),

    /// Character string
    Text(Arc<str>),
}

impl Scalar {
    /// The type a raw value has when nothing else declares one
    pub fn natural_type(&self) -> DataType {
        match self {
            Scalar::Int(_) => DataType::Int,
            Scalar::BigInt(_) => DataType::BigInt,
            Scalar::Float(_) => DataType::Float,
            Scalar::Text(_) => DataType::NVarChar,
        }
    }

    pub(crate) fn rank(&self) -> u8 {
        match self {
            Scalar::Int(_) => 0,
            Scalar::BigInt(_) => 1,
            Scalar::Float(_) => 2,
            Scalar::Text(_) => 3,
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Int(v) => write!(f, "{}", v),
            Scalar::BigInt(v) => write!(f, "{}", v),
            Scalar::Float(v) => write!(f, "{}", v),
            Scalar::Text(s) => f.write_str(s),
        }
    }
}

/// A typed SQL value that may be NULL
#[derive(Debug, Clone, PartialEq)]
pub struct DataValue {
    value: Option<Scalar>,
    data_type: DataType,
}

impl DataValue {
    // =========================================================================
    // Constructors
    // =========================================================================

    /// Create a NULL of the given type
    pub fn null(data_type: DataType) -> Self {
        Self {
            value: None,
            data_type,
        }
    }

    pub fn int(value: i32) -> Self {
        Self {
            value: Some(Scalar::Int(value)),
            data_type: DataType::Int,
        }
    }

    pub fn bigint(value: i64) -> Self {
        Self {
            value: Some(Scalar::BigInt(value)),
            data_type: DataType::BigInt,
        }
    }

    pub fn float(value: f64) -> Self {
        Self {
            value: Some(Scalar::Float(value)),
            data_type: DataType::Float,
        }
    }

    pub fn varchar(value: impl AsRef<str>) -> Self {
        Self {
            value: Some(Scalar::Text(Arc::from(value.as_ref()))),
            data_type: DataType::VarChar,
        }
    }

    pub fn nvarchar(value: impl AsRef<str>) -> Self {
        Self {
            value: Some(Scalar::Text(Arc::from(value.as_ref()))),
            data_type: DataType::NVarChar,
        }
    }

    /// Wrap a raw value in its natural type
    pub fn from_scalar(value: Scalar) -> Self {
        Self {
            data_type: value.natural_type(),
            value: Some(value),
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn data_type(&self) -> DataType {
        self.data_type
    }

    /// The raw value, or `None` for NULL
    pub fn value(&self) -> Option<&Scalar> {
        self.value.as_ref()
    }

    pub fn into_value(self) -> Option<Scalar> {
        self.value
    }

    pub fn is_null(&self) -> bool {
        self.value.is_none()
    }

    pub fn as_i32(&self) -> Option<i32> {
        match self.value {
            Some(Scalar::Int(v)) => Some(v),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self.value {
            Some(Scalar::Int(v)) => Some(i64::from(v)),
            Some(Scalar::BigInt(v)) => Some(v),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self.value {
            Some(Scalar::Int(v)) => Some(f64::from(v)),
            Some(Scalar::BigInt(v)) => Some(v as f64),
            Some(Scalar::Float(v)) => Some(v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match &self.value {
            Some(Scalar::Text(s)) => Some(&**s),
            _ => None,
        }
    }

    // =========================================================================
    // Operations
    // =========================================================================

    /// Convert this value to another type
    pub fn convert_to(&self, target: DataType) -> Result<DataValue> {
        match &self.value {
            None => Ok(DataValue::null(target)),
            Some(_) if target == self.data_type => Ok(self.clone()),
            Some(raw) => Ok(DataValue {
                value: Some(target.convert_from(self.data_type, raw)?),
                data_type: target,
            }),
        }
    }

    /// Apply a binary arithmetic or bitwise operator
    ///
    /// Both operands are widened to their common type first. A NULL operand
    /// makes the result NULL of the common type, or of the non-null operand's
    /// type when there is no common one.
    pub fn binary(&self, operator: BinaryOperator, other: &DataValue) -> Result<DataValue> {
        let common = match DataType::common_type(self.data_type, other.data_type) {
            Some(common) => common,
            None if self.is_null() => return Ok(DataValue::null(other.data_type)),
            None if other.is_null() => return Ok(DataValue::null(self.data_type)),
            None => {
                return Err(Error::NoCommonType {
                    operation: operator.operator_name().to_string(),
                    left: self.data_type.name().to_string(),
                    right: other.data_type.name().to_string(),
                })
            }
        };

        let (Some(left), Some(right)) = (&self.value, &other.value) else {
            return Ok(DataValue::null(common));
        };

        if !common.supports(operator) {
            return Err(Error::IncompatibleOperands {
                left: self.data_type.name().to_string(),
                right: other.data_type.name().to_string(),
                operator: operator.operator_name().to_string(),
            });
        }

        let left = common.convert_from(self.data_type, left)?;
        let right = common.convert_from(other.data_type, right)?;
        Ok(DataValue {
            value: Some(common.apply(operator, &left, &right)?),
            data_type: common,
        })
    }

    /// Arithmetic negation
    pub fn negate(&self) -> Result<DataValue> {
        let overflow = || Error::ArithmeticOverflow(self.data_type.name().to_string());
        let value = match &self.value {
            None => return Ok(self.clone()),
            Some(Scalar::Int(v)) => Scalar::Int(v.checked_neg().ok_or_else(overflow)?),
            Some(Scalar::BigInt(v)) => Scalar::BigInt(v.checked_neg().ok_or_else(overflow)?),
            Some(Scalar::Float(v)) => Scalar::Float(-v),
            Some(Scalar::Text(_)) => {
                return Err(Error::InvalidOperandType {
                    data_type: self.data_type.name().to_string(),
                    operator: "minus".to_string(),
                })
            }
        };
        Ok(DataValue {
            value: Some(value),
            data_type: self.data_type,
        })
    }

    /// Compare two values for a predicate
    ///
    /// Returns `None` when either side is NULL. A string compared with a
    /// number is converted to the numeric type, which can fail.
    pub fn compare(&self, other: &DataValue) -> Result<Option<Ordering>> {
        let (Some(left), Some(right)) = (&self.value, &other.value) else {
            return Ok(None);
        };
        let target = DataType::comparison_type(self.data_type, other.data_type);
        let left = target.convert_from(self.data_type, left)?;
        let right = target.convert_from(other.data_type, right)?;
        Ok(Some(target.compare(&left, &right)))
    }

    /// Storage size in bytes, or `None` for NULL
    pub fn byte_length(&self) -> Option<i32> {
        self.value
            .as_ref()
            .map(|raw| self.data_type.byte_length(raw))
    }
}

impl fmt::Display for DataValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            Some(raw) => write!(f, "{}", raw),
            None => f.write_str("NULL"),
        }
    }
}

// =========================================================================
// From implementations
// =========================================================================

impl From<i32> for DataValue {
    fn from(v: i32) -> Self {
        DataValue::int(v)
    }
}

impl From<i64> for DataValue {
    fn from(v: i64) -> Self {
        DataValue::bigint(v)
    }
}

impl From<f64> for DataValue {
    fn from(v: f64) -> Self {
        DataValue::float(v)
    }
}

impl From<&str> for DataValue {
    fn from(v: &str) -> Self {
        DataValue::nvarchar(v)
    }
}

impl From<String> for DataValue {
    fn from(v: String) -> Self {
        DataValue::nvarchar(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_propagation() {
        let null = DataValue::null(DataType::Int);
        let sum = null.binary(BinaryOperator::Add, &DataValue::bigint(1)).unwrap();
        assert!(sum.is_null());
        assert_eq!(sum.data_type(), DataType::BigInt);

        // No common type: the null takes the other operand's type
        let sum = null.binary(BinaryOperator::Add, &DataValue::nvarchar("x")).unwrap();
        assert!(sum.is_null());
        assert_eq!(sum.data_type(), DataType::NVarChar);
    }

    #[test]
    fn test_widening() {
        let result = DataValue::int(2)
            .binary(BinaryOperator::Multiply, &DataValue::float(1.5))
            .unwrap();
        assert_eq!(result, DataValue::float(3.0));

        let result = DataValue::varchar("a")
            .binary(BinaryOperator::Add, &DataValue::nvarchar("b"))
            .unwrap();
        assert_eq!(result, DataValue::nvarchar("ab"));
    }

    #[test]
    fn test_no_common_type() {
        let err = DataValue::int(1)
            .binary(BinaryOperator::Add, &DataValue::nvarchar("1"))
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "The simulator doesn't know how to run the add operation between int and nvarchar."
        );
    }

    #[test]
    fn test_incompatible_operator() {
        let err = DataValue::nvarchar("a")
            .binary(BinaryOperator::Modulus, &DataValue::nvarchar("b"))
            .unwrap_err();
        assert_eq!(
            err,
            Error::IncompatibleOperands {
                left: "nvarchar".to_string(),
                right: "nvarchar".to_string(),
                operator: "modulo".to_string(),
            }
        );
    }

    #[test]
    fn test_compare_mixed() {
        let ord = DataValue::nvarchar("10")
            .compare(&DataValue::int(9))
            .unwrap();
        assert_eq!(ord, Some(Ordering::Greater));
        assert_eq!(
            DataValue::int(1).compare(&DataValue::null(DataType::Int)).unwrap(),
            None
        );
        assert!(DataValue::nvarchar("x").compare(&DataValue::int(1)).is_err());
        assert_eq!(
            DataValue::varchar("abc").compare(&DataValue::nvarchar("ABC")).unwrap(),
            Some(Ordering::Equal)
        );
    }

    #[test]
    fn test_negate() {
        assert_eq!(DataValue::int(5).negate().unwrap(), DataValue::int(-5));
        assert!(DataValue::int(i32::MIN).negate().is_err());
        assert!(DataValue::nvarchar("a").negate().is_err());
        assert!(DataValue::null(DataType::Float).negate().unwrap().is_null());
    }

    #[test]
    fn test_convert_to() {
        let v = DataValue::nvarchar("12").convert_to(DataType::Int).unwrap();
        assert_eq!(v, DataValue::int(12));
        let v = DataValue::null(DataType::Int).convert_to(DataType::NVarChar).unwrap();
        assert_eq!(v, DataValue::null(DataType::NVarChar));
        assert_eq!(
            DataValue::bigint(i64::MAX).convert_to(DataType::Int),
            Err(Error::ArithmeticOverflow("int".to_string()))
        );
    }

    #[test]
    fn test_byte_length() {
        assert_eq!(DataValue::int(1).byte_length(), Some(4));
        assert_eq!(DataValue::nvarchar("ab").byte_length(), Some(4));
        assert_eq!(DataValue::varchar("ab").byte_length(), Some(2));
        assert_eq!(DataValue::null(DataType::Int).byte_length(), None);
    }
}
