//! Typed errors for parsing, ordering, value construction and traversal.
//!
//! Parse and construction errors are fatal to the single operation that
//! produced them. [`VisitorError`] is what visitor callbacks return; only its
//! [`Abort`](VisitorError::Abort) variant terminates a traversal, everything
//! else is logged and skipped.

use thiserror::Error;

use crate::path::Path;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Failure to turn a raw path string into a [`Path`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("path must not be empty")]
    Empty,

    #[error("malformed path '{path}': {message}")]
    Malformed { path: String, message: String },

    #[error("unknown element '{element}' in path: {path}")]
    UnknownElement { path: String, element: String },

    #[error("unknown attribute '{attribute}' for element '{element}' in path: {path}")]
    UnknownAttribute { path: String, element: String, attribute: String },

    #[error("duplicate attribute '{attribute}' for element '{element}' in path: {path}")]
    DuplicateAttribute { path: String, element: String, attribute: String },

    #[error("invalid sort index for element '{element}' in path {path}: {message}")]
    InvalidSortIndex { path: String, element: String, message: &'static str },

    #[error("invalid draft status '{value}' for element '{element}' in path: {path}")]
    InvalidDraftStatus { path: String, element: String, value: String },

    #[error("unexpected root element '{found}' (expected '{expected}') in path: {path}")]
    UnexpectedRoot { path: String, expected: String, found: String },

    #[error("unexpected value attribute '{attribute}' in distinguishing path: {path}")]
    UnexpectedValueAttribute { path: String, attribute: String },
}

/// Misuse of paths: mixing schemas or asking a path for value data.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PathError {
    #[error("cannot compare paths with different schema types: {lhs} / {rhs}")]
    SchemaMismatch { lhs: String, rhs: String },

    #[error("cannot get value attribute '{attribute}' of element '{element}' from distinguishing path: {path}")]
    ValueAttributeLookup { path: String, element: String, attribute: String },
}

/// Unrecognized `draft` attribute value.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown draft status '{0}'")]
pub struct UnknownDraftStatus(pub String);

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueError {
    #[error("reserved marker '{0}' cannot be used as a value")]
    ReservedPayload(String),

    #[error("replacement path {replacement} does not match the element structure of {original}")]
    StructureMismatch { original: String, replacement: String },

    #[error("value attribute '{attribute}' refers to element '{element}' which is not in path {path}")]
    DetachedAttribute { path: String, element: String, attribute: String },

    #[error("attribute '{attribute}' of element '{element}' is not a value attribute in path {path}")]
    NotAValueAttribute { path: String, element: String, attribute: String },

    #[error(transparent)]
    Path(#[from] PathError),
}

#[derive(Debug, Error)]
pub enum DataSourceError {
    #[error("duplicate path: {0}")]
    DuplicatePath(Path),

    #[error("path {ancestor} is a prefix of path {descendant}")]
    AntichainViolation { ancestor: Path, descendant: Path },

    #[error(transparent)]
    Path(#[from] PathError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Value(#[from] ValueError),
}

/// Returned by visitor callbacks.
#[derive(Debug, Error)]
pub enum VisitorError {
    /// Isolated failure; logged with the offending path, traversal continues.
    #[error("visitor failed: {0}")]
    Failed(#[source] BoxError),

    /// Terminates the traversal and is reported to its caller.
    #[error("visitation aborted: {0}")]
    Abort(#[source] BoxError),
}

impl VisitorError {
    pub fn failed(err: impl Into<BoxError>) -> Self {
        Self::Failed(err.into())
    }

    pub fn abort(err: impl Into<BoxError>) -> Self {
        Self::Abort(err.into())
    }
}

/// Fatal outcome of a single traversal.
#[derive(Debug, Error)]
pub enum TraversalError {
    #[error("unexpected child path {child} after value at {previous}")]
    UnexpectedChild { previous: Path, child: Path },

    #[error("unexpected ancestor path {ancestor} after value at {previous}")]
    UnexpectedAncestor { previous: Path, ancestor: Path },

    #[error("visitation aborted at {path}: {source}")]
    Aborted {
        path: Path,
        #[source]
        source: BoxError,
    },
}
