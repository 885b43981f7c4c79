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

//! Error types for the simulator
//!
//! Every variant renders the exact message SQL Server (or its client provider)
//! produces for the same failure, because callers assert on message text.

use thiserror::Error;

/// Result type alias for simulator operations
pub type Result<T> = std::result::Result<T, Error>;

/// Simulated SQL error
///
/// This is the single error type surfaced at the public boundary. The
/// variants keep the failure causes apart so the interpreter can produce the
/// matching diagnostic, while [`Error::number`] reports the SQL Server error
/// number where one exists.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    // =========================================================================
    // Syntax errors
    // =========================================================================
    /// Unexpected token, referenced by its literal text
    #[error("Incorrect syntax near '{0}'.")]
    IncorrectSyntax(String),

    /// Unexpected reserved keyword
    #[error("Incorrect syntax near the keyword '{0}'.")]
    IncorrectSyntaxNearKeyword(String),

    /// Character the tokenizer cannot classify
    #[error("Incorrect syntax near '{character}' at index {index}.")]
    UnexpectedCharacter { character: char, index: usize },

    /// Block comment still open at end of input
    #[error("Missing end comment mark '*/'.")]
    MissingEndCommentMark,

    /// String literal or bracketed identifier still open at end of input
    #[error("Unclosed quotation mark after the character string '{0}'.")]
    UnclosedQuotation(String),

    // =========================================================================
    // Name resolution errors
    // =========================================================================
    /// Table not found in the catalog
    #[error("Invalid object name '{0}'.")]
    InvalidObjectName(String),

    /// Column reference that matches no source column
    #[error("Invalid column name '{0}'.")]
    InvalidColumnName(String),

    /// `@name` reference without a bound parameter
    #[error("Must declare the scalar variable \"@{0}\".")]
    MustDeclareScalarVariable(String),

    /// Call to a function name the simulator does not know
    #[error("'{0}' is not a recognized built-in function name.")]
    UnknownFunction(String),

    /// `CREATE TABLE` with a type name the simulator does not know
    #[error("Column, parameter, or variable #{ordinal}: Cannot find data type {name}.")]
    UnknownDataType { ordinal: usize, name: String },

    /// `SELECT *` without a `FROM` clause
    #[error("Must specify table to select from.")]
    MustSpecifyTable,

    /// Derived table column without a name
    #[error("No column name was specified for column {ordinal} of '{alias}'.")]
    NoColumnName { ordinal: usize, alias: String },

    /// Expressions or derived tables nested past the supported depth
    #[error("Some part of your SQL statement is nested too deeply. Rewrite the query or break it up into smaller queries.")]
    NestedTooDeeply,

    // =========================================================================
    // TOP clause errors
    // =========================================================================
    /// TOP row count that does not evaluate to an integer
    #[error("The number of rows provided for a TOP or FETCH clauses row count parameter must be an integer.")]
    TopRequiresInteger,

    /// TOP row count below zero
    #[error("A TOP N or FETCH rows count value may not be negative.")]
    TopNegative,

    /// Column reference inside the TOP row count expression
    #[error("The reference to column \"{0}\" is not allowed in an argument to a TOP, OFFSET, or FETCH clause. Only references to columns at an outer scope or standalone expressions and subqueries are allowed here.")]
    TopColumnReference(String),

    // =========================================================================
    // Catalog and DML errors
    // =========================================================================
    /// `CREATE TABLE` for a name already in the catalog
    #[error("There is already an object named '{0}' in the database.")]
    ObjectAlreadyExists(String),

    /// `CREATE TABLE` naming the same column twice
    #[error("Column names in each table must be unique. Column name '{column}' in table '{table}' is specified more than once.")]
    DuplicateColumn { table: String, column: String },

    /// NULL written into a NOT NULL column
    #[error("Cannot insert the value NULL into column '{column}', table '{table}'; column does not allow nulls. INSERT fails.")]
    NotNullViolation { table: String, column: String },

    /// Column list longer than the VALUES list
    #[error("There are more columns in the INSERT statement than values specified in the VALUES clause. The number of values in the VALUES clause must match the number of columns specified in the INSERT statement.")]
    InsertMoreColumnsThanValues,

    /// VALUES list longer than the column list
    #[error("There are fewer columns in the INSERT statement than values specified in the VALUES clause. The number of values in the VALUES clause must match the number of columns specified in the INSERT statement.")]
    InsertFewerColumnsThanValues,

    /// INSERT column list naming a column twice
    #[error("The column name '{0}' is specified more than once in the SET clause or column list of an INSERT. A column cannot be assigned more than one value in the same clause. Modify the clause to make sure that a column is updated only once. If this statement updates or inserts columns into a view, column aliasing can conceal the duplication in your code.")]
    DuplicateInsertColumn(String),

    /// VALUES list that does not match the table width
    #[error("Column name or number of supplied values does not match table definition.")]
    ColumnCountMismatch,

    // =========================================================================
    // Type and arithmetic errors
    // =========================================================================
    /// The operands have no common type that can carry the operation
    #[error("The simulator doesn't know how to run the {operation} operation between {left} and {right}.")]
    NoCommonType {
        operation: String,
        left: String,
        right: String,
    },

    /// The common type exists but does not support the operator
    #[error("The data types {left} and {right} are incompatible in the {operator} operator.")]
    IncompatibleOperands {
        left: String,
        right: String,
        operator: String,
    },

    /// Built-in function applied to an argument of the wrong type
    #[error("Argument data type {data_type} is invalid for argument 1 of {function} function.")]
    InvalidArgumentType { data_type: String, function: String },

    /// Unary operator applied to an operand of the wrong type
    #[error("Operand data type {data_type} is invalid for {operator} operator.")]
    InvalidOperandType { data_type: String, operator: String },

    /// Built-in function called with the wrong number of arguments
    #[error("The {function} function requires {count} argument(s).")]
    WrongArgumentCount { function: String, count: usize },

    /// Value that cannot be converted to the target type
    #[error("Conversion failed when converting the {from} value '{value}' to data type {to}.")]
    ConversionFailed {
        value: String,
        from: String,
        to: String,
    },

    /// Result outside the range of the target type
    #[error("Arithmetic overflow error converting expression to data type {0}.")]
    ArithmeticOverflow(String),

    /// Integer or float division by zero
    #[error("Divide by zero error encountered.")]
    DivideByZero,

    // =========================================================================
    // Unsupported constructs
    // =========================================================================
    /// Construct recognized by the grammar but not simulated
    #[error("{0} is not supported by the simulator.")]
    Unsupported(String),

    // =========================================================================
    // Provider (adapter layer) errors
    // =========================================================================
    /// Command executed while its connection is closed
    #[error("{0} requires an open and available Connection. The connection's current state is closed.")]
    ConnectionClosed(&'static str),

    /// Command executed without a connection
    #[error("{0}: Connection property has not been initialized.")]
    ConnectionNotInitialized(&'static str),

    /// Transaction that belongs to another connection or simulation
    #[error("The transaction is either not associated with the current connection or has been completed.")]
    TransactionMismatch,

    /// Transaction used after commit or rollback
    #[error("This SqlTransaction has completed; it is no longer usable.")]
    TransactionCompleted,

    /// Reader accessed before `read` or after the last row
    #[error("Invalid attempt to read when no data is present.")]
    NoData,

    /// Reader ordinal outside the row
    #[error("Index was outside the bounds of the array.")]
    OrdinalOutOfRange(usize),

    /// Reader column name that matches no column
    #[error("{0}")]
    ColumnNotFound(String),

    /// NULL read as a non-nullable host type
    #[error("Data is Null. This method or property cannot be called on Null values.")]
    NullValue,

    /// Value that cannot be read as the requested host type
    #[error("Unable to cast object of type '{from}' to type '{to}'.")]
    InvalidCast { from: String, to: String },
}

impl Error {
    /// Create an IncorrectSyntax error
    pub fn syntax(near: impl Into<String>) -> Self {
        Error::IncorrectSyntax(near.into())
    }

    /// Create an Unsupported error
    pub fn unsupported(what: impl Into<String>) -> Self {
        Error::Unsupported(what.into())
    }

    /// Create a ConversionFailed error
    pub fn conversion_failed(
        value: impl Into<String>,
        from: impl Into<String>,
        to: impl Into<String>,
    ) -> Self {
        Error::ConversionFailed {
            value: value.into(),
            from: from.into(),
            to: to.into(),
        }
    }

    /// Create an InvalidCast error
    pub fn invalid_cast(from: impl Into<String>, to: impl Into<String>) -> Self {
        Error::InvalidCast {
            from: from.into(),
            to: to.into(),
        }
    }

    /// SQL Server error number for this failure, if SQL Server raises one
    pub fn number(&self) -> Option<i32> {
        let number = match self {
            Error::IncorrectSyntax(_) | Error::UnexpectedCharacter { .. } => 102,
            Error::IncorrectSyntaxNearKeyword(_) => 156,
            Error::MissingEndCommentMark => 113,
            Error::UnclosedQuotation(_) => 105,
            Error::InvalidObjectName(_) => 208,
            Error::InvalidColumnName(_) => 207,
            Error::MustDeclareScalarVariable(_) => 137,
            Error::UnknownFunction(_) => 195,
            Error::UnknownDataType { .. } => 2715,
            Error::MustSpecifyTable => 263,
            Error::NoColumnName { .. } => 8155,
            Error::NestedTooDeeply => 191,
            Error::TopRequiresInteger => 1060,
            Error::TopNegative => 1014,
            Error::TopColumnReference(_) => 4115,
            Error::ObjectAlreadyExists(_) => 2714,
            Error::DuplicateColumn { .. } => 2705,
            Error::NotNullViolation { .. } => 515,
            Error::InsertMoreColumnsThanValues => 109,
            Error::InsertFewerColumnsThanValues => 110,
            Error::ColumnCountMismatch => 213,
            Error::IncompatibleOperands { .. } => 402,
            Error::InvalidArgumentType { .. } => 8116,
            Error::InvalidOperandType { .. } => 8117,
            Error::WrongArgumentCount { .. } => 174,
            Error::DuplicateInsertColumn(_) => 264,
            Error::ConversionFailed { .. } => 245,
            Error::ArithmeticOverflow(_) => 8115,
            Error::DivideByZero => 8134,
            Error::NoCommonType { .. }
            | Error::Unsupported(_)
            | Error::ConnectionClosed(_)
            | Error::ConnectionNotInitialized(_)
            | Error::TransactionMismatch
            | Error::TransactionCompleted
            | Error::NullValue
            | Error::NoData
            | Error::OrdinalOutOfRange(_)
            | Error::ColumnNotFound(_)
            | Error::InvalidCast { .. } => return None,
        };
        Some(number)
    }

    /// Check if this is a syntax error raised while scanning or parsing
    pub fn is_syntax_error(&self) -> bool {
        matches!(
            self,
            Error::IncorrectSyntax(_)
                | Error::IncorrectSyntaxNearKeyword(_)
                | Error::UnexpectedCharacter { .. }
                | Error::MissingEndCommentMark
                | Error::UnclosedQuotation(_)
        )
    }

    /// Check if this is a "not found" type error
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Error::InvalidObjectName(_)
                | Error::InvalidColumnName(_)
                | Error::MustDeclareScalarVariable(_)
                | Error::UnknownFunction(_)
                | Error::UnknownDataType { .. }
        )
    }

    /// Check if this failure comes from the provider layer rather than the engine
    pub fn is_provider_error(&self) -> bool {
        matches!(
            self,
            Error::ConnectionClosed(_)
                | Error::ConnectionNotInitialized(_)
                | Error::TransactionMismatch
                | Error::TransactionCompleted
                | Error::NullValue
                | Error::NoData
                | Error::OrdinalOutOfRange(_)
                | Error::ColumnNotFound(_)
                | Error::InvalidCast { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            Error::syntax("FROM").to_string(),
            "Incorrect syntax near 'FROM'."
        );
        assert_eq!(
            Error::InvalidObjectName("users".to_string()).to_string(),
            "Invalid object name 'users'."
        );
        assert_eq!(
            Error::InvalidColumnName("email".to_string()).to_string(),
            "Invalid column name 'email'."
        );
        assert_eq!(
            Error::MustDeclareScalarVariable("p0".to_string()).to_string(),
            "Must declare the scalar variable \"@p0\"."
        );
        assert_eq!(
            Error::UnknownFunction("FOO".to_string()).to_string(),
            "'FOO' is not a recognized built-in function name."
        );
        assert_eq!(
            Error::MissingEndCommentMark.to_string(),
            "Missing end comment mark '*/'."
        );
    }

    #[test]
    fn test_structured_error_display() {
        let err = Error::IncompatibleOperands {
            left: "nvarchar".to_string(),
            right: "nvarchar".to_string(),
            operator: "modulo".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "The data types nvarchar and nvarchar are incompatible in the modulo operator."
        );

        let err = Error::conversion_failed("abc", "varchar", "int");
        assert_eq!(
            err.to_string(),
            "Conversion failed when converting the varchar value 'abc' to data type int."
        );

        let err = Error::NotNullViolation {
            table: "t".to_string(),
            column: "v".to_string(),
        };
        assert!(err.to_string().starts_with("Cannot insert the value NULL into column 'v'"));
    }

    #[test]
    fn test_error_numbers() {
        assert_eq!(Error::syntax("x").number(), Some(102));
        assert_eq!(Error::InvalidObjectName("t".into()).number(), Some(208));
        assert_eq!(Error::TopRequiresInteger.number(), Some(1060));
        assert_eq!(Error::unsupported("UPDATE").number(), None);
    }

    #[test]
    fn test_error_classification() {
        assert!(Error::MissingEndCommentMark.is_syntax_error());
        assert!(!Error::unsupported("UPDATE").is_syntax_error());
        assert!(Error::InvalidColumnName("c".into()).is_not_found());
        assert!(!Error::DivideByZero.is_not_found());
        assert!(Error::TransactionMismatch.is_provider_error());
        assert!(!Error::TopNegative.is_provider_error());
    }

    #[test]
    fn test_unsupported_is_distinct_from_syntax() {
        let unsupported = Error::unsupported("The UPDATE statement");
        let syntax = Error::IncorrectSyntaxNearKeyword("UPDATE".to_string());
        assert_ne!(unsupported, syntax);
        assert_eq!(
            unsupported.to_string(),
            "The UPDATE statement is not supported by the simulator."
        );
    }
}
