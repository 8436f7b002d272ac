//! Schema-ordered path/value model for LDML locale data.
//!
//! Locale data is a set of leaf [`Value`]s, each addressed by a [`Path`]
//! such as `//ldml/dates/calendars/calendar[@type="gregorian"]`. Which
//! attributes identify a path, how elements are ordered and which elements
//! need an explicit sort index is decided by an injected [`Schema`].
//!
//! Values are consumed through visitors: a [`ValueVisitor`] sees the leaves
//! only, while a [`PrefixVisitor`] also sees every intermediate path being
//! entered and left and may hand sub-trees over to sub-visitors.

mod draft;
mod error;
pub mod parser;
pub mod path;
pub mod schema;
mod source;
mod value;
pub mod visit;

#[cfg(test)]
mod testing;

pub use draft::DraftStatus;
pub use error::{
    BoxError, DataSourceError, ParseError, PathError, TraversalError, UnknownDraftStatus, ValueError,
    VisitorError,
};
pub use parser::{ParseOptions, PathParser};
pub use path::{AttributeKey, Path, compare};
pub use schema::{AttributeKind, Schema};
pub use source::{DataSource, DataSourceBuilder, InMemoryDataSource};
pub use value::{INHERITANCE_MARKER, NO_INHERITANCE_MARKER, Value, ValueAttributes};
pub use visit::{PathOrder, PrefixContext, PrefixVisitor, PrefixVisitorHost, ValueVisitor};
