//! Leaf values: a payload string plus the value attributes of its path.

use std::fmt::{Debug, Display, Formatter};

use compact_str::CompactString;
use smallvec::SmallVec;

use crate::error::ValueError;
use crate::path::{AttributeKey, Path};

/// Payload marking a value inherited from a parent locale.
pub const INHERITANCE_MARKER: &str = "↑↑↑";

/// Payload marking a value which must not be inherited.
pub const NO_INHERITANCE_MARKER: &str = "∅∅∅";

/// Non-distinguishing attributes of a value, keyed by element and attribute.
///
/// Order is path order (root first) and schema attribute order within one
/// element once attached to a [`Value`].
#[derive(Clone, Default, PartialEq, Eq)]
pub struct ValueAttributes {
    entries: SmallVec<[(AttributeKey, CompactString); 2]>,
}

impl ValueAttributes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = (&AttributeKey, &str)> + '_ {
        self.entries.iter().map(|(k, v)| (k, v.as_str()))
    }

    pub fn get(&self, key: &AttributeKey) -> Option<&str> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
    }

    /// Attributes of the named element as `(attribute, value)` pairs.
    pub fn for_element<'a>(&'a self, element: &'a str) -> impl Iterator<Item = (&'a str, &'a str)> + 'a {
        self.entries
            .iter()
            .filter(move |(k, _)| k.element() == element)
            .map(|(k, v)| (k.attribute(), v.as_str()))
    }

    /// Adds or replaces an attribute.
    pub fn insert(&mut self, key: AttributeKey, value: impl Into<CompactString>) {
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Appends without checking for an existing key; the parser has already
    /// rejected duplicates.
    pub(crate) fn push(&mut self, key: AttributeKey, value: &str) {
        self.entries.push((key, CompactString::from(value)));
    }
}

impl Debug for ValueAttributes {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_map().entries(self.iter().map(|(k, v)| (k.to_string(), v))).finish()
    }
}

impl<K: Into<AttributeKey>, V: Into<CompactString>> FromIterator<(K, V)> for ValueAttributes {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut attributes = Self::new();
        for (k, v) in iter {
            attributes.insert(k.into(), v);
        }
        attributes
    }
}

/// A leaf of the data tree.
///
/// Values are immutable; [`Value::replace_path`] creates a copy bound to a
/// different path of the same shape.
#[derive(Clone, PartialEq, Eq)]
pub struct Value {
    payload: CompactString,
    attributes: ValueAttributes,
    path: Path,
}

impl Value {
    /// Creates a value for a distinguishing path.
    ///
    /// Every value attribute must belong to an element of `path` and, for
    /// elements the schema knows, be classified as a value attribute. The
    /// inheritance markers are not valid payloads.
    pub fn new(
        payload: impl Into<CompactString>,
        mut attributes: ValueAttributes,
        path: Path,
    ) -> Result<Value, ValueError> {
        let payload = payload.into();
        if matches!(payload.as_str(), INHERITANCE_MARKER | NO_INHERITANCE_MARKER) {
            return Err(ValueError::ReservedPayload(payload.into_string()));
        }
        let schema = path.schema();
        let mut depths = SmallVec::<[usize; 2]>::with_capacity(attributes.len());
        for (key, _) in attributes.iter() {
            if schema.is_known_element(key.element())
                && !schema.is_value_attribute(key.element(), key.attribute())
            {
                return Err(ValueError::NotAValueAttribute {
                    path: path.to_string(),
                    element: key.element().to_owned(),
                    attribute: key.attribute().to_owned(),
                });
            }
            let depth = path.ancestors().position(|p| p.name() == key.element()).ok_or_else(|| {
                ValueError::DetachedAttribute {
                    path: path.to_string(),
                    element: key.element().to_owned(),
                    attribute: key.attribute().to_owned(),
                }
            })?;
            depths.push(path.length() - depth);
        }
        let mut keyed: SmallVec<[(usize, (AttributeKey, CompactString)); 2]> =
            depths.into_iter().zip(attributes.entries.drain(..)).collect();
        keyed.sort_by(|(da, (ka, _)), (db, (kb, _))| {
            da.cmp(db).then_with(|| schema.compare_attributes(ka.attribute(), kb.attribute()))
        });
        attributes.entries = keyed.into_iter().map(|(_, entry)| entry).collect();
        Ok(Value { payload, attributes, path })
    }

    pub fn payload(&self) -> &str {
        &self.payload
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn value_attributes(&self) -> &ValueAttributes {
        &self.attributes
    }

    /// Looks up a value attribute, or a distinguishing attribute of the path.
    pub fn get(&self, key: &AttributeKey) -> Option<&str> {
        if self.path.schema().is_value_attribute(key.element(), key.attribute()) {
            return self.attributes.get(key);
        }
        self.path.get(key).ok().flatten()
    }

    /// The path including value attributes, as it would appear in source data.
    pub fn full_path(&self) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail.
        let _ = self.path.write_full(&mut out, &self.attributes);
        out
    }

    /// Rebinds this value to another path with the same element names at
    /// every depth, keeping payload and value attributes.
    pub fn replace_path(&self, path: Path) -> Result<Value, ValueError> {
        crate::path::compare(&self.path, &path)?;
        if !self.path.same_structure(&path) {
            return Err(ValueError::StructureMismatch {
                original: self.path.to_string(),
                replacement: path.to_string(),
            });
        }
        Ok(Value { payload: self.payload.clone(), attributes: self.attributes.clone(), path })
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} = {}", self.full_path(), self.payload)
    }
}

impl Debug for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Value")
            .field("path", &self.full_path())
            .field("payload", &self.payload.as_str())
            .finish()
    }
}
