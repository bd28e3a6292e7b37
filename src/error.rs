use thiserror::Error;

/// Errors raised by the search engine and the grid/constraint types.
///
/// Errors coming out of user-supplied cost or perturbation functions are not
/// wrapped; they travel through [`anyhow::Error`] untouched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    /// A row of the configuration is not a permutation of its category.
    #[error("invalid configuration at row {row}: {reason}")]
    InvalidConfiguration {
        /// index of the offending row
        row: usize,
        /// human readable description of the violation
        reason: String,
    },
    /// The iteration budget must be positive.
    #[error("iteration budget must be positive, got {0}")]
    InvalidIterationBudget(usize),
    /// The schema could not be built.
    #[error("invalid schema: {0}")]
    InvalidSchema(String),
    /// A constraint referenced a category or value the schema does not know.
    #[error("unknown value {value:?} in category {category:?}")]
    UnknownValue {
        /// category name
        category: String,
        /// value name
        value: String,
    },
    /// A configuration was scored against constraints built for another schema.
    #[error("configuration does not belong to the schema of the constraint set")]
    SchemaMismatch,
    /// A constraint referenced a slot outside the grid.
    #[error("column {column} is out of range for a grid with {n_cols} columns")]
    ColumnOutOfRange {
        /// requested column
        column: usize,
        /// number of columns in the grid
        n_cols: usize,
    },
}
