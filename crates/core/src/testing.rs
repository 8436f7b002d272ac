//! Minimal schema used by the unit tests of this crate.

use std::cmp::Ordering;
use std::sync::Arc;

use crate::schema::{AttributeKind, Schema};

const ELEMENTS: &[&str] = &[
    "ldml",
    "identity",
    "version",
    "dates",
    "calendars",
    "calendar",
    "months",
    "monthContext",
    "monthWidth",
    "month",
    "numbers",
    "symbols",
    "decimal",
    "rbnf",
    "rule",
    "alias",
    "special",
];

const ATTRIBUTES: &[&str] = &["_q", "type", "alt", "draft", "references", "value", "source", "path"];

#[derive(Debug)]
pub(crate) struct TableSchema {
    root: &'static str,
}

impl Schema for TableSchema {
    fn root_element(&self) -> &str {
        self.root
    }

    fn compare_elements(&self, lhs: &str, rhs: &str) -> Ordering {
        position(ELEMENTS, lhs).cmp(&position(ELEMENTS, rhs))
    }

    fn compare_attributes(&self, lhs: &str, rhs: &str) -> Ordering {
        position(ATTRIBUTES, lhs).cmp(&position(ATTRIBUTES, rhs))
    }

    fn compare_attribute_values(&self, _: &str, attribute: &str, lhs: &str, rhs: &str) -> Ordering {
        match (attribute, lhs.parse::<u32>(), rhs.parse::<u32>()) {
            ("type", Ok(l), Ok(r)) => l.cmp(&r),
            _ => lhs.cmp(rhs),
        }
    }

    fn attribute_kind(&self, element: &str, attribute: &str) -> Option<AttributeKind> {
        if element == "ldml" || !ELEMENTS.contains(&element) {
            return None;
        }
        match (element, attribute) {
            (_, "type" | "alt") => Some(AttributeKind::Distinguishing),
            (_, "draft" | "references") => Some(AttributeKind::Metadata),
            ("rule", "value") | ("rbnf" | "alias", "source") | ("alias", "path") => {
                Some(AttributeKind::Value)
            }
            _ => None,
        }
    }

    fn is_ordered(&self, element: &str) -> bool {
        element == "rule"
    }

    fn is_known_element(&self, element: &str) -> bool {
        ELEMENTS.contains(&element)
    }
}

fn position(table: &[&str], name: &str) -> usize {
    table.iter().position(|n| *n == name).unwrap_or(table.len())
}

pub(crate) fn test_schema() -> Arc<dyn Schema> {
    Arc::new(TableSchema { root: "ldml" })
}

/// Same tables, but rooted at a different element.
pub(crate) fn other_schema() -> Arc<dyn Schema> {
    Arc::new(TableSchema { root: "supplementalData" })
}
