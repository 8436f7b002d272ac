use std::fmt::{Display, Formatter};

use string_cache::DefaultAtom;

/// Identifies an attribute by the element it belongs to.
///
/// Element names never repeat within a single path, so a key is enough to
/// address an attribute anywhere in a path or among a value's attributes.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct AttributeKey {
    element: DefaultAtom,
    attribute: DefaultAtom,
}

impl AttributeKey {
    pub fn new(element: &str, attribute: &str) -> Self {
        Self { element: DefaultAtom::from(element), attribute: DefaultAtom::from(attribute) }
    }

    pub fn element(&self) -> &str {
        &self.element
    }

    pub fn attribute(&self) -> &str {
        &self.attribute
    }
}

impl Display for AttributeKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}@{}", self.element, self.attribute)
    }
}

impl From<(&str, &str)> for AttributeKey {
    fn from(value: (&str, &str)) -> Self {
        AttributeKey::new(value.0, value.1)
    }
}
