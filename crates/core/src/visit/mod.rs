//! Visitation protocol over the values of a data source.
//!
//! [`ValueVisitor`]s see each [`Value`] once and never observe intermediate
//! paths. [`PrefixVisitor`]s additionally see every prefix (ancestor path) as
//! the traversal enters and leaves it, and may install sub-visitors which
//! take over everything below the prefix they were installed at. The
//! synthesized start/end events are produced by [`PrefixVisitorHost`].

mod host;

use tracing::{trace, warn};

pub use host::PrefixVisitorHost;

use crate::error::{TraversalError, VisitorError};
use crate::path::Path;
use crate::value::Value;

/// Ordering guarantee requested for a traversal, weakest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum PathOrder {
    /// No guarantee.
    Unordered,
    /// Values sharing an ancestor are visited contiguously.
    Grouped,
    /// Schema order, see [`compare`](crate::path::compare).
    #[default]
    Dtd,
}

impl PathOrder {
    /// The order actually used for prefix visitation, which needs at least
    /// grouped values.
    pub fn for_prefix_visitation(self) -> PathOrder {
        self.max(PathOrder::Grouped)
    }
}

pub trait ValueVisitor {
    fn visit(&mut self, value: &Value) -> Result<(), VisitorError>;
}

impl<F> ValueVisitor for F
where
    F: FnMut(&Value) -> Result<(), VisitorError>,
{
    fn visit(&mut self, value: &Value) -> Result<(), VisitorError> {
        self(value)
    }
}

pub trait PrefixVisitor {
    /// Called when the traversal enters `prefix`. Sub-visitors installed
    /// through `context` receive everything below `prefix`.
    fn visit_prefix_start(
        &mut self,
        prefix: &Path,
        context: &mut PrefixContext<'_>,
    ) -> Result<(), VisitorError> {
        let _ = (prefix, context);
        Ok(())
    }

    /// Called when the traversal leaves `prefix`.
    fn visit_prefix_end(&mut self, prefix: &Path) -> Result<(), VisitorError> {
        let _ = prefix;
        Ok(())
    }
}

/// Handed to [`PrefixVisitor::visit_prefix_start`], scoped to one prefix.
pub struct PrefixContext<'v> {
    prefix: Path,
    pending: Option<Handler<'v>>,
}

impl<'v> PrefixContext<'v> {
    pub(crate) fn new(prefix: Path) -> Self {
        Self { prefix, pending: None }
    }

    /// The prefix being started.
    pub fn prefix(&self) -> &Path {
        &self.prefix
    }

    /// Installs a leaf visitor for all values below the current prefix.
    pub fn install<V>(&mut self, visitor: V)
    where
        V: ValueVisitor + 'v,
    {
        self.install_with(visitor, drop);
    }

    /// Installs a leaf visitor; `on_done` receives it back once the current
    /// prefix is closed.
    pub fn install_with<V, F>(&mut self, visitor: V, on_done: F)
    where
        V: ValueVisitor + 'v,
        F: FnOnce(V) + 'v,
    {
        self.set(Handler::Value(Box::new(Installed { visitor, on_done })));
    }

    /// Installs a prefix visitor which will see the prefixes and values
    /// below the current prefix.
    pub fn install_prefix<P>(&mut self, visitor: P)
    where
        P: PrefixVisitor + 'v,
    {
        self.install_prefix_with(visitor, drop);
    }

    pub fn install_prefix_with<P, F>(&mut self, visitor: P, on_done: F)
    where
        P: PrefixVisitor + 'v,
        F: FnOnce(P) + 'v,
    {
        self.set(Handler::Prefix(Box::new(Installed { visitor, on_done })));
    }

    fn set(&mut self, handler: Handler<'v>) {
        if self.pending.is_some() {
            warn!(prefix = %self.prefix, "sub-visitor already installed for prefix, ignoring");
            return;
        }
        trace!(prefix = %self.prefix, "installing sub-visitor");
        self.pending = Some(handler);
    }

    pub(crate) fn take(self) -> Option<Handler<'v>> {
        self.pending
    }
}

/// An entry of the visitor stack.
pub(crate) enum Handler<'v> {
    Value(Box<dyn InstalledValue + 'v>),
    Prefix(Box<dyn InstalledPrefix + 'v>),
}

pub(crate) trait InstalledValue {
    fn visit(&mut self, value: &Value) -> Result<(), VisitorError>;
    fn finish(self: Box<Self>);
}

pub(crate) trait InstalledPrefix {
    fn visitor(&mut self) -> &mut dyn PrefixVisitor;
    fn finish(self: Box<Self>);
}

struct Installed<V, F> {
    visitor: V,
    on_done: F,
}

impl<V: ValueVisitor, F: FnOnce(V)> InstalledValue for Installed<V, F> {
    fn visit(&mut self, value: &Value) -> Result<(), VisitorError> {
        self.visitor.visit(value)
    }

    fn finish(self: Box<Self>) {
        let Installed { visitor, on_done } = *self;
        on_done(visitor);
    }
}

impl<P: PrefixVisitor, F: FnOnce(P)> InstalledPrefix for Installed<P, F> {
    fn visitor(&mut self) -> &mut dyn PrefixVisitor {
        &mut self.visitor
    }

    fn finish(self: Box<Self>) {
        let Installed { visitor, on_done } = *self;
        on_done(visitor);
    }
}

/// Applies the failure policy to the outcome of a single callback: isolated
/// failures are logged and swallowed, aborts end the traversal.
pub(crate) fn isolate(path: &Path, result: Result<(), VisitorError>) -> Result<bool, TraversalError> {
    match result {
        Ok(()) => Ok(true),
        Err(VisitorError::Failed(error)) => {
            warn!(path = %path, error = %error, "visitor failed, continuing traversal");
            Ok(false)
        }
        Err(VisitorError::Abort(source)) => {
            Err(TraversalError::Aborted { path: path.clone(), source })
        }
    }
}
