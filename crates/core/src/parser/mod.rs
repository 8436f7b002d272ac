//! Turns raw path strings into [`Path`] chains.
//!
//! Attributes are classified by the injected [`Schema`]: distinguishing
//! attributes end up in the path, value attributes are handed back to the
//! caller and metadata attributes are dropped (except for the draft status,
//! which is kept as a side field of the path).
//!
//! When parsing consecutive paths, passing the previous result lets the
//! parser reuse every element up to the first difference, so sorted input
//! only allocates its changed suffix.

use std::sync::Arc;

use compact_str::CompactString;
use pest::Parser as _;
use pest::iterators::Pair;
use smallvec::SmallVec;
use string_cache::DefaultAtom;

use crate::draft::DraftStatus;
use crate::error::{ParseError, UnknownDraftStatus};
use crate::path::{AttributeKey, AttributeList, Path};
use crate::schema::{
    AttributeKind, DRAFT_ATTRIBUTE, SORT_INDEX_ATTRIBUTE, Schema, has_namespace,
};
use crate::value::ValueAttributes;

mod grammar {
    #[derive(pest_derive::Parser)]
    #[grammar = "parser/path.pest"]
    pub(super) struct PathGrammar;
}

use grammar::{PathGrammar, Rule};

/// Parser behaviour switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    distinguishing_only: bool,
    strict_sort_index: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self { distinguishing_only: false, strict_sort_index: true }
    }
}

impl ParseOptions {
    /// Rejects value attributes instead of collecting them.
    pub fn with_distinguishing_only(mut self, enabled: bool) -> Self {
        self.distinguishing_only = enabled;
        self
    }

    /// Requires a sort index on ordered elements and forbids it elsewhere.
    pub fn with_strict_sort_index(mut self, enabled: bool) -> Self {
        self.strict_sort_index = enabled;
        self
    }

    pub fn distinguishing_only(&self) -> bool {
        self.distinguishing_only
    }

    pub fn strict_sort_index(&self) -> bool {
        self.strict_sort_index
    }
}

#[derive(Debug, Clone)]
pub struct PathParser {
    schema: Arc<dyn Schema>,
    options: ParseOptions,
}

struct RawElement<'a> {
    name: &'a str,
    sort_suffix: Option<&'a str>,
    attributes: SmallVec<[(&'a str, &'a str); 4]>,
}

impl PathParser {
    pub fn new(schema: Arc<dyn Schema>) -> Self {
        Self { schema, options: ParseOptions::default() }
    }

    pub fn with_options(mut self, options: ParseOptions) -> Self {
        self.options = options;
        self
    }

    pub fn schema(&self) -> &Arc<dyn Schema> {
        &self.schema
    }

    pub fn options(&self) -> ParseOptions {
        self.options
    }

    /// Parses a full path, returning its distinguishing path and any value
    /// attributes (in path and schema attribute order).
    ///
    /// `previous` is the result of the preceding parse, if any; elements it
    /// shares with the new path are reused rather than reallocated.
    pub fn parse(
        &self,
        full_path: &str,
        previous: Option<&Path>,
    ) -> Result<(Path, ValueAttributes), ParseError> {
        if full_path.is_empty() {
            return Err(ParseError::Empty);
        }
        let elements = split_elements(full_path)?;
        let previous: SmallVec<[&Path; 12]> = match previous {
            Some(p) => {
                let mut chain: SmallVec<[&Path; 12]> = p.ancestors().collect();
                chain.reverse();
                chain
            }
            None => SmallVec::new(),
        };

        let mut value_attributes = ValueAttributes::default();
        let mut path: Option<Path> = None;
        let mut diverged = false;
        for (n, raw) in elements.iter().enumerate() {
            self.check_element(full_path, n, raw.name)?;
            let sort_index = self.sort_index(full_path, raw)?;

            let mut attributes = AttributeList::new();
            let mut draft_status = None;
            for &(key, value) in &self.sorted_attributes(full_path, raw)? {
                match self.classify(full_path, raw.name, key)? {
                    AttributeKind::Distinguishing => {
                        attributes.push((DefaultAtom::from(key), CompactString::from(value)));
                    }
                    AttributeKind::Value if self.options.distinguishing_only => {
                        return Err(ParseError::UnexpectedValueAttribute {
                            path: full_path.to_owned(),
                            attribute: key.to_owned(),
                        });
                    }
                    AttributeKind::Value => {
                        value_attributes.push(AttributeKey::new(raw.name, key), value);
                    }
                    AttributeKind::Metadata if key == DRAFT_ATTRIBUTE => {
                        let status = value.parse::<DraftStatus>().map_err(
                            |UnknownDraftStatus(status)| ParseError::InvalidDraftStatus {
                                path: full_path.to_owned(),
                                element: raw.name.to_owned(),
                                value: status,
                            },
                        )?;
                        draft_status = Some(status);
                    }
                    AttributeKind::Metadata => {}
                }
            }

            if !diverged
                && let Some(prev) = previous.get(n)
                && prev.matches_content(raw.name, sort_index, &attributes, draft_status)
            {
                path = Some((*prev).clone());
                continue;
            }
            path = Some(Path::new(
                path,
                Arc::clone(&self.schema),
                DefaultAtom::from(raw.name),
                attributes,
                sort_index,
                draft_status,
            ));
            diverged = true;
        }
        let path = path.ok_or(ParseError::Empty)?;
        Ok((path, value_attributes))
    }

    fn check_element(&self, full_path: &str, n: usize, name: &str) -> Result<(), ParseError> {
        if n == 0 {
            let expected = self.schema.root_element();
            if name != expected {
                return Err(ParseError::UnexpectedRoot {
                    path: full_path.to_owned(),
                    expected: expected.to_owned(),
                    found: name.to_owned(),
                });
            }
        } else if !has_namespace(name) && !self.schema.is_known_element(name) {
            return Err(ParseError::UnknownElement {
                path: full_path.to_owned(),
                element: name.to_owned(),
            });
        }
        Ok(())
    }

    fn sort_index(&self, full_path: &str, raw: &RawElement<'_>) -> Result<Option<u32>, ParseError> {
        let invalid = |message| ParseError::InvalidSortIndex {
            path: full_path.to_owned(),
            element: raw.name.to_owned(),
            message,
        };
        // The "#n" suffix (as rendered by Path) takes priority over "_q".
        let raw_index = raw.sort_suffix.or_else(|| {
            raw.attributes.iter().find(|(k, _)| *k == SORT_INDEX_ATTRIBUTE).map(|(_, v)| *v)
        });
        let sort_index = raw_index
            .map(|s| s.parse::<u32>().map_err(|_| invalid("not a non-negative integer")))
            .transpose()?;
        if self.options.strict_sort_index {
            let ordered = !has_namespace(raw.name) && self.schema.is_ordered(raw.name);
            match (ordered, sort_index) {
                (true, None) => return Err(invalid("missing sort index for ordered element")),
                (false, Some(_)) => return Err(invalid("unexpected sort index")),
                _ => {}
            }
        }
        Ok(sort_index)
    }

    fn sorted_attributes<'a>(
        &self,
        full_path: &str,
        raw: &RawElement<'a>,
    ) -> Result<SmallVec<[(&'a str, &'a str); 4]>, ParseError> {
        let mut sorted = raw.attributes.clone();
        sorted.sort_by(|(a, _), (b, _)| self.schema.compare_attributes(a, b).then_with(|| a.cmp(b)));
        if let Some(pair) = sorted.windows(2).find(|w| w[0].0 == w[1].0) {
            return Err(ParseError::DuplicateAttribute {
                path: full_path.to_owned(),
                element: raw.name.to_owned(),
                attribute: pair[0].0.to_owned(),
            });
        }
        sorted.retain(|(k, _)| *k != SORT_INDEX_ATTRIBUTE);
        Ok(sorted)
    }

    fn classify(
        &self,
        full_path: &str,
        element: &str,
        attribute: &str,
    ) -> Result<AttributeKind, ParseError> {
        if let Some(kind) = self.schema.attribute_kind(element, attribute) {
            return Ok(kind);
        }
        // Extension data in unknown namespaces is never filtered out.
        if has_namespace(element) || has_namespace(attribute) {
            return Ok(AttributeKind::Distinguishing);
        }
        Err(ParseError::UnknownAttribute {
            path: full_path.to_owned(),
            element: element.to_owned(),
            attribute: attribute.to_owned(),
        })
    }
}

impl Path {
    /// Parses a path which may only contain distinguishing (and metadata)
    /// attributes.
    pub fn parse_distinguishing(schema: Arc<dyn Schema>, path: &str) -> Result<Path, ParseError> {
        let parser = PathParser::new(schema)
            .with_options(ParseOptions::default().with_distinguishing_only(true));
        parser.parse(path, None).map(|(path, _)| path)
    }
}

fn split_elements(full_path: &str) -> Result<SmallVec<[RawElement<'_>; 8]>, ParseError> {
    let mut pairs = PathGrammar::parse(Rule::path, full_path).map_err(|err| {
        ParseError::Malformed { path: full_path.to_owned(), message: err.variant.message().into_owned() }
    })?;
    let Some(root) = pairs.next() else {
        return Err(ParseError::Empty);
    };
    Ok(root.into_inner().filter(|p| p.as_rule() == Rule::element).map(raw_element).collect())
}

fn raw_element(pair: Pair<'_, Rule>) -> RawElement<'_> {
    let mut element = RawElement { name: "", sort_suffix: None, attributes: SmallVec::new() };
    for part in pair.into_inner() {
        match part.as_rule() {
            Rule::name => element.name = part.as_str(),
            Rule::sort_suffix => {
                element.sort_suffix = part.into_inner().next().map(|index| index.as_str());
            }
            Rule::attribute => {
                let mut inner = part.into_inner();
                let key = inner.next().map_or("", |p| p.as_str());
                let value = inner.next().map_or("", |p| p.as_str());
                element.attributes.push((key, value));
            }
            _ => {}
        }
    }
    element
}
