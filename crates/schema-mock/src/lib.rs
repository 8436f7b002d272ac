//! Deterministic, table-driven [`Schema`](ldmlpath_core::Schema) for tests,
//! benches and prototypes.
//!
//! The default instance is a reduced LDML schema embedded from
//! `assets/ldml_schema.xml`. Other schemas can be assembled with
//! [`MockSchema::builder`] or loaded with [`MockSchema::from_xml`].

mod load;
mod schema;

#[cfg(test)]
mod tests;

use thiserror::Error;

pub use schema::{AttributeSpec, ElementSpec, MockSchema, MockSchemaBuilder, ValueOrder, ldml_schema};

#[derive(Debug, Error)]
pub enum MockSchemaError {
    #[error("failed to parse schema XML: {0}")]
    Xml(#[from] quick_xml::DeError),

    #[error("unknown kind '{kind}' for attribute '{attribute}'")]
    UnknownKind { attribute: String, kind: String },

    #[error("element '{0}' is declared more than once")]
    DuplicateElement(String),

    #[error("root element '{0}' is not declared")]
    MissingRoot(String),
}
