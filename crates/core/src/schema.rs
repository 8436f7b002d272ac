//! The schema ("DTD") collaborator consulted while parsing and ordering paths.
//!
//! A [`Schema`] answers classification questions about elements and
//! attributes and supplies the comparators which define DTD order. The
//! schema itself is never owned by this crate; it is injected as an
//! `Arc<dyn Schema>` so several schemas can be used side by side.

use std::cmp::Ordering;
use std::fmt::Debug;

/// Synthetic attribute carrying the sort index of "ordered" elements.
pub const SORT_INDEX_ATTRIBUTE: &str = "_q";

/// Metadata attribute holding the draft (approval) status of an element.
pub const DRAFT_ATTRIBUTE: &str = "draft";

/// How an attribute participates in the path/value model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttributeKind {
    /// Part of the identity of a path element.
    Distinguishing,
    /// Part of the payload, carried by the value.
    Value,
    /// Known to the schema but ignored by the model.
    Metadata,
}

pub trait Schema: Send + Sync + Debug {
    /// Name of the root element which identifies this schema (e.g. `ldml`).
    fn root_element(&self) -> &str;

    /// Orders element names in DTD order.
    fn compare_elements(&self, lhs: &str, rhs: &str) -> Ordering;

    /// Orders attribute names in DTD order.
    fn compare_attributes(&self, lhs: &str, rhs: &str) -> Ordering;

    /// Orders two values of the same attribute on the same element.
    fn compare_attribute_values(
        &self,
        element: &str,
        attribute: &str,
        lhs: &str,
        rhs: &str,
    ) -> Ordering {
        let _ = (element, attribute);
        lhs.cmp(rhs)
    }

    /// Classifies an attribute, or `None` if the schema does not know it.
    fn attribute_kind(&self, element: &str, attribute: &str) -> Option<AttributeKind>;

    fn is_distinguishing(&self, element: &str, attribute: &str) -> bool {
        self.attribute_kind(element, attribute) == Some(AttributeKind::Distinguishing)
    }

    fn is_value_attribute(&self, element: &str, attribute: &str) -> bool {
        self.attribute_kind(element, attribute) == Some(AttributeKind::Value)
    }

    /// Whether siblings of this element need an explicit sort index.
    fn is_ordered(&self, element: &str) -> bool;

    fn is_known_element(&self, element: &str) -> bool;
}

/// Element or attribute names carrying a namespace prefix (e.g. `icu:`) are
/// outside of any schema and bypass validation.
pub fn has_namespace(name: &str) -> bool {
    name.contains(':')
}
