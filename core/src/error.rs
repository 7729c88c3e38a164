use std::borrow::Cow;
use std::collections::TryReserveError;
use std::fmt;

use compact_str::CompactString;
use thiserror::Error;

/// Which kind of selection a failing descriptor belonged to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SelectionKind {
    WholeModel,
    SingleColumn,
    FunctionResult,
}

impl fmt::Display for SelectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SelectionKind::WholeModel => "whole-model",
            SelectionKind::SingleColumn => "single-column",
            SelectionKind::FunctionResult => "function-result",
        })
    }
}

/// Failure raised by a model constructor while reading its field mapping.
#[derive(Debug, Error)]
pub enum FieldError {
    /// The mapping did not contain a field the model requires
    #[error("required field `{0}` is missing")]
    Missing(&'static str),

    /// The value could not be converted into the field's Rust type
    #[error("field `{field}` has an incompatible value: {reason}")]
    Mismatch {
        field: &'static str,
        reason: Cow<'static, str>,
    },
}

#[derive(Debug, Error)]
pub enum CramponError {
    /// A select-list entry could not be classified
    #[error("cannot classify select entry {position}: {reason}")]
    Classification {
        position: usize,
        reason: Cow<'static, str>,
    },

    /// A JSON-encoded model field held malformed JSON
    #[error("row {row}, select entry {position}: cannot decode JSON field `{model}.{field}`: {source}")]
    Decoding {
        model: &'static str,
        field: &'static str,
        row: usize,
        position: usize,
        #[source]
        source: serde_json::Error,
    },

    /// A raw row lacked a key that a descriptor expects
    #[error("row {row}, select entry {position}: missing column `{key}` for {kind} selection")]
    MissingColumn {
        key: CompactString,
        row: usize,
        position: usize,
        kind: SelectionKind,
    },

    /// A model could not be built from its decoded fields
    #[error("row {row}, select entry {position}: cannot construct `{model}`: {source}")]
    Construction {
        model: &'static str,
        row: usize,
        position: usize,
        #[source]
        source: FieldError,
    },

    /// The result buffer could not be allocated
    #[error("cannot allocate room for {requested} cast rows: {source}")]
    Allocation {
        requested: usize,
        #[source]
        source: TryReserveError,
    },

    /// A value could not be converted into the requested Rust type
    #[error("Conversion error: {0}")]
    ConversionError(Cow<'static, str>),

    /// The query could not be built
    #[error("Query error: {0}")]
    QueryError(Cow<'static, str>),

    /// Error executing a query
    #[error("Execution error: {0}")]
    ExecutionError(String),

    /// No rows returned when at least one was expected
    #[error("No rows found")]
    NotFound,

    #[cfg(feature = "tokio-postgres")]
    #[error("Postgres error: {0}")]
    Postgres(#[from] tokio_postgres::Error),
}

impl CramponError {
    /// Row index the error refers to, when it came out of the casting engine.
    pub fn row(&self) -> Option<usize> {
        match self {
            CramponError::Decoding { row, .. }
            | CramponError::MissingColumn { row, .. }
            | CramponError::Construction { row, .. } => Some(*row),
            _ => None,
        }
    }

    /// Select-list position the error refers to, if any.
    pub fn position(&self) -> Option<usize> {
        match self {
            CramponError::Classification { position, .. }
            | CramponError::Decoding { position, .. }
            | CramponError::MissingColumn { position, .. }
            | CramponError::Construction { position, .. } => Some(*position),
            _ => None,
        }
    }
}

/// Result type for crampon operations
pub type Result<T> = std::result::Result<T, CramponError>;
