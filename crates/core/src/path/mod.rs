//! Immutable, structurally shared path elements.
//!
//! A [`Path`] is one element of a hierarchical location (e.g. the `bar` in
//! `//ldml/foo/bar[@type="x"]`) together with an owning link to its parent.
//! Only distinguishing attributes are stored; value attributes live on the
//! [`Value`](crate::Value) and metadata attributes are dropped, which makes a
//! path a suitable key for lookups.
//!
//! Paths are cheap to clone. Consecutive parses share unchanged prefixes, but
//! equality and hashing are always structural.

mod key;
mod order;

use std::fmt::{Debug, Display, Formatter, Write as _};
use std::hash::{DefaultHasher, Hash, Hasher};
use std::sync::Arc;

use compact_str::CompactString;
use smallvec::SmallVec;
use string_cache::DefaultAtom;

use crate::draft::DraftStatus;
use crate::error::PathError;
use crate::schema::Schema;
use crate::value::ValueAttributes;

pub use key::AttributeKey;
pub use order::compare;

/// Distinguishing attributes of a single element, in schema order.
pub(crate) type AttributeList = SmallVec<[(DefaultAtom, CompactString); 2]>;

#[derive(Clone)]
pub struct Path(Arc<Node>);

struct Node {
    parent: Option<Path>,
    schema: Arc<dyn Schema>,
    name: DefaultAtom,
    attributes: AttributeList,
    sort_index: Option<u32>,
    // Inherited from the top-most element declaring a status.
    draft_status: Option<DraftStatus>,
    length: usize,
    hash: u64,
}

impl Path {
    pub(crate) fn new(
        parent: Option<Path>,
        schema: Arc<dyn Schema>,
        name: DefaultAtom,
        attributes: AttributeList,
        sort_index: Option<u32>,
        local_draft_status: Option<DraftStatus>,
    ) -> Self {
        let length = parent.as_ref().map_or(0, Path::length) + 1;
        let draft_status = resolve_draft_status(parent.as_ref(), local_draft_status);
        let mut hasher = DefaultHasher::new();
        parent.as_ref().map(|p| p.0.hash).hash(&mut hasher);
        (*name).hash(&mut hasher);
        sort_index.hash(&mut hasher);
        for (k, v) in &attributes {
            (**k).hash(&mut hasher);
            v.as_str().hash(&mut hasher);
        }
        Path(Arc::new(Node {
            parent,
            schema,
            name,
            attributes,
            sort_index,
            draft_status,
            length,
            hash: hasher.finish(),
        }))
    }

    /// Qualified element name, including any namespace prefix (e.g. `icu:transforms`).
    pub fn name(&self) -> &str {
        &self.0.name
    }

    /// Parent element, or `None` for the root element.
    pub fn parent(&self) -> Option<&Path> {
        self.0.parent.as_ref()
    }

    /// Number of elements in this path, the root counting as one.
    pub fn length(&self) -> usize {
        self.0.length
    }

    pub fn is_root(&self) -> bool {
        self.0.parent.is_none()
    }

    /// Sort index of an element the schema marks as ordered.
    pub fn sort_index(&self) -> Option<u32> {
        self.0.sort_index
    }

    /// Draft status inherited from the top-most element which declares one.
    pub fn draft_status(&self) -> Option<DraftStatus> {
        self.0.draft_status
    }

    pub fn schema(&self) -> &Arc<dyn Schema> {
        &self.0.schema
    }

    /// Name of the schema root element shared by the whole chain.
    pub fn root_element(&self) -> &str {
        self.0.schema.root_element()
    }

    pub fn attribute_count(&self) -> usize {
        self.0.attributes.len()
    }

    /// Distinguishing attributes of this element in schema order.
    pub fn attributes(&self) -> impl ExactSizeIterator<Item = (&str, &str)> + '_ {
        self.0.attributes.iter().map(|(k, v)| (&**k, v.as_str()))
    }

    pub(crate) fn attribute_list(&self) -> &AttributeList {
        &self.0.attributes
    }

    /// Distinguishing attribute of this element only.
    pub fn local_attribute(&self, name: &str) -> Option<&str> {
        self.0.attributes.iter().find(|(k, _)| &**k == name).map(|(_, v)| v.as_str())
    }

    /// Looks up a distinguishing attribute on the element named by the key,
    /// searching from this element towards the root.
    ///
    /// Value attributes are not stored in paths; asking for one is an error
    /// rather than a silent miss.
    pub fn get(&self, key: &AttributeKey) -> Result<Option<&str>, PathError> {
        if self.0.schema.is_value_attribute(key.element(), key.attribute()) {
            return Err(PathError::ValueAttributeLookup {
                path: self.to_string(),
                element: key.element().to_owned(),
                attribute: key.attribute().to_owned(),
            });
        }
        Ok(self
            .ancestors()
            .filter(|p| p.name() == key.element())
            .find_map(|p| p.local_attribute(key.attribute())))
    }

    pub fn contains_element(&self, name: &str) -> bool {
        self.ancestors().any(|p| p.name() == name)
    }

    /// This path followed by each of its parents up to the root.
    pub fn ancestors(&self) -> Ancestors<'_> {
        Ancestors { next: Some(self) }
    }

    /// The prefix of this path with the given length.
    pub fn ancestor(&self, length: usize) -> Option<&Path> {
        if length == 0 || length > self.length() {
            return None;
        }
        self.ancestors().nth(self.length() - length)
    }

    /// Whether this path is a strict prefix of `other`.
    pub fn is_ancestor_of(&self, other: &Path) -> bool {
        self.length() < other.length() && other.ancestor(self.length()) == Some(self)
    }

    /// Number of leading elements two paths have in common.
    pub fn common_prefix_length(lhs: &Path, rhs: &Path) -> usize {
        let min = lhs.length().min(rhs.length());
        let mut a = lhs.ancestor(min);
        let mut b = rhs.ancestor(min);
        let mut common = min;
        let mut length = min;
        while let (Some(pa), Some(pb)) = (a, b) {
            if Arc::ptr_eq(&pa.0, &pb.0) {
                // Shared node, so the remaining prefix is shared too.
                break;
            }
            if !pa.local_equals(pb) {
                common = length - 1;
            }
            a = pa.parent();
            b = pb.parent();
            length -= 1;
        }
        common
    }

    pub(crate) fn local_equals(&self, other: &Path) -> bool {
        self.0.name == other.0.name
            && self.0.sort_index == other.0.sort_index
            && self.0.attributes == other.0.attributes
    }

    /// Equivalent content at this depth, used to reuse elements of a
    /// previously parsed path.
    pub(crate) fn matches_content(
        &self,
        name: &str,
        sort_index: Option<u32>,
        attributes: &AttributeList,
        local_draft_status: Option<DraftStatus>,
    ) -> bool {
        &*self.0.name == name
            && self.0.sort_index == sort_index
            && self.0.attributes == *attributes
            && self.0.draft_status
                == resolve_draft_status(self.0.parent.as_ref(), local_draft_status)
    }

    pub(crate) fn same_structure(&self, other: &Path) -> bool {
        self.length() == other.length()
            && self.ancestors().zip(other.ancestors()).all(|(a, b)| a.0.name == b.0.name)
    }

    pub(crate) fn ptr_eq(&self, other: &Path) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Renders this path, interleaving any value attributes for each element
    /// in schema attribute order.
    pub(crate) fn write_full(
        &self,
        out: &mut String,
        value_attributes: &ValueAttributes,
    ) -> std::fmt::Result {
        match self.parent() {
            Some(parent) => {
                parent.write_full(out, value_attributes)?;
                out.push('/');
            }
            None => out.push_str("//"),
        }
        let mut extra = value_attributes.for_element(self.name()).peekable();
        if extra.peek().is_none() {
            return self.write_local(out);
        }
        let mut merged: SmallVec<[(&str, &str); 4]> = self.attributes().collect();
        merged.extend(extra);
        let schema = self.schema();
        merged.sort_by(|(a, _), (b, _)| schema.compare_attributes(a, b));
        out.push_str(self.name());
        if let Some(index) = self.sort_index() {
            write!(out, "#{index}")?;
        }
        for (k, v) in merged {
            write!(out, "[@{k}=\"{v}\"]")?;
        }
        Ok(())
    }

    fn write_local<W: std::fmt::Write>(&self, out: &mut W) -> std::fmt::Result {
        out.write_str(self.name())?;
        if let Some(index) = self.sort_index() {
            write!(out, "#{index}")?;
        }
        for (k, v) in self.attributes() {
            write!(out, "[@{k}=\"{v}\"]")?;
        }
        Ok(())
    }
}

fn resolve_draft_status(
    parent: Option<&Path>,
    local: Option<DraftStatus>,
) -> Option<DraftStatus> {
    parent.and_then(Path::draft_status).or(local)
}

impl PartialEq for Path {
    fn eq(&self, other: &Self) -> bool {
        if self.ptr_eq(other) {
            return true;
        }
        if self.0.hash != other.0.hash || self.length() != other.length() {
            return false;
        }
        // Leaf elements almost always differ first, so compare bottom-up.
        for (a, b) in self.ancestors().zip(other.ancestors()) {
            if a.ptr_eq(b) {
                return true;
            }
            if !a.local_equals(b) {
                return false;
            }
        }
        self.root_element() == other.root_element()
    }
}

impl Eq for Path {}

impl Hash for Path {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.0.hash);
    }
}

impl Display for Path {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.parent() {
            Some(parent) => write!(f, "{parent}/")?,
            None => f.write_str("//")?,
        }
        self.write_local(f)
    }
}

impl Debug for Path {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Path").field(&self.to_string()).finish()
    }
}

pub struct Ancestors<'a> {
    next: Option<&'a Path>,
}

impl<'a> Iterator for Ancestors<'a> {
    type Item = &'a Path;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = current.parent();
        Some(current)
    }
}
