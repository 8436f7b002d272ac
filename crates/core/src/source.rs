//! Immutable collections of values and their traversal.
//!
//! A [`DataSource`] only has to stream its values in the requested order and
//! answer point lookups; plain and prefix visitation are provided on top of
//! that. Reading a data source never mutates it, so any number of traversals
//! may run concurrently, each with its own [`PrefixVisitorHost`].

use std::sync::Arc;

use tracing::debug;

use crate::draft::DraftStatus;
use crate::error::{DataSourceError, PathError, TraversalError};
use crate::parser::{ParseOptions, PathParser};
use crate::path::{Path, compare};
use crate::schema::Schema;
use crate::value::Value;
use crate::visit::{PathOrder, PrefixVisitor, PrefixVisitorHost, ValueVisitor, isolate};

pub trait DataSource {
    /// Streams all values in (at least) the requested order.
    fn values(&self, order: PathOrder) -> Box<dyn Iterator<Item = &Value> + '_>;

    /// The value stored at exactly this distinguishing path.
    fn get(&self, path: &Path) -> Option<&Value>;

    /// Visits every value once.
    ///
    /// Isolated visitor failures are logged and skipped; an abort ends the
    /// traversal with [`TraversalError::Aborted`].
    fn accept(&self, order: PathOrder, visitor: &mut dyn ValueVisitor) -> Result<(), TraversalError> {
        for value in self.values(order) {
            isolate(value.path(), visitor.visit(value))?;
        }
        Ok(())
    }

    /// Visits every value together with the start and end of all its
    /// prefixes. Unordered requests are served grouped.
    fn accept_prefix(
        &self,
        order: PathOrder,
        visitor: &mut dyn PrefixVisitor,
    ) -> Result<(), TraversalError> {
        let mut host = PrefixVisitorHost::new(visitor);
        for value in self.values(order.for_prefix_visitation()) {
            host.visit(value)?;
        }
        host.finish()
    }
}

/// A data source over a fixed set of values held in memory.
///
/// Construction validates the set eagerly: all paths must share one schema,
/// be unique and form an antichain (no path is a prefix of another).
#[derive(Debug, Clone)]
pub struct InMemoryDataSource {
    values: Vec<Value>,
    // Indices into `values` in schema order.
    sorted: Vec<usize>,
}

impl InMemoryDataSource {
    pub fn new(values: impl IntoIterator<Item = Value>) -> Result<Self, DataSourceError> {
        let values: Vec<Value> = values.into_iter().collect();
        if let Some(first) = values.first() {
            let root = first.path().root_element();
            if let Some(other) = values.iter().find(|v| v.path().root_element() != root) {
                return Err(PathError::SchemaMismatch {
                    lhs: first.path().to_string(),
                    rhs: other.path().to_string(),
                }
                .into());
            }
        }

        let mut sorted: Vec<usize> = (0..values.len()).collect();
        // Same schema root for every path, so the infallible order is safe.
        sorted.sort_by(|&a, &b| values[a].path().cmp(values[b].path()));
        for pair in sorted.windows(2) {
            let (lhs, rhs) = (values[pair[0]].path(), values[pair[1]].path());
            if lhs == rhs {
                return Err(DataSourceError::DuplicatePath(rhs.clone()));
            }
            // A prefix sorts immediately before its first descendant.
            if lhs.is_ancestor_of(rhs) {
                return Err(DataSourceError::AntichainViolation {
                    ancestor: lhs.clone(),
                    descendant: rhs.clone(),
                });
            }
        }
        Ok(Self { values, sorted })
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl DataSource for InMemoryDataSource {
    fn values(&self, order: PathOrder) -> Box<dyn Iterator<Item = &Value> + '_> {
        match order {
            PathOrder::Unordered => Box::new(self.values.iter()),
            PathOrder::Grouped | PathOrder::Dtd => {
                Box::new(self.sorted.iter().map(|&index| &self.values[index]))
            }
        }
    }

    fn get(&self, path: &Path) -> Option<&Value> {
        let found = self.sorted.binary_search_by(|&index| {
            // A path of another schema cannot be stored here.
            compare(self.values[index].path(), path).unwrap_or(std::cmp::Ordering::Less)
        });
        match found {
            Ok(position) => Some(&self.values[self.sorted[position]]),
            Err(_) => None,
        }
    }
}

/// Builds an [`InMemoryDataSource`] from raw (full path, payload) pairs.
///
/// Consecutive paths are parsed with prefix reuse, so adding them in sorted
/// order keeps memory use low.
#[derive(Debug)]
pub struct DataSourceBuilder {
    parser: PathParser,
    minimal_draft_status: Option<DraftStatus>,
    values: Vec<Value>,
    previous: Option<Path>,
    dropped: usize,
}

impl DataSourceBuilder {
    pub fn new(schema: Arc<dyn Schema>) -> Self {
        Self {
            parser: PathParser::new(schema),
            minimal_draft_status: None,
            values: Vec::new(),
            previous: None,
            dropped: 0,
        }
    }

    pub fn with_parse_options(mut self, options: ParseOptions) -> Self {
        self.parser = self.parser.with_options(options);
        self
    }

    /// Drops values whose draft status is weaker than `status`.
    pub fn with_minimal_draft_status(mut self, status: DraftStatus) -> Self {
        self.minimal_draft_status = Some(status);
        self
    }

    /// Parses `full_path` and adds a value for it.
    pub fn add(&mut self, full_path: &str, payload: &str) -> Result<&mut Self, DataSourceError> {
        let (path, attributes) = self.parser.parse(full_path, self.previous.as_ref())?;
        self.previous = Some(path.clone());
        if let Some(minimum) = self.minimal_draft_status
            && !minimum.admits(path.draft_status())
        {
            self.dropped += 1;
            return Ok(self);
        }
        self.values.push(Value::new(payload, attributes, path)?);
        Ok(self)
    }

    /// Adds an already constructed value.
    pub fn add_value(&mut self, value: Value) -> &mut Self {
        self.values.push(value);
        self
    }

    pub fn build(self) -> Result<InMemoryDataSource, DataSourceError> {
        let total = self.values.len();
        let source = InMemoryDataSource::new(self.values)?;
        debug!(values = total, dropped = self.dropped, "built in-memory data source");
        Ok(source)
    }
}
