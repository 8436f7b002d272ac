use smallvec::SmallVec;
use tracing::trace;

use super::{Handler, PrefixContext, PrefixVisitor, isolate};
use crate::error::TraversalError;
use crate::path::Path;
use crate::value::Value;

/// Rebuilds prefix start/end events from a grouped stream of values.
///
/// The host keeps a stack of visitors. The root visitor is at the bottom and
/// never popped; every sub-visitor installed from a
/// [`PrefixContext`] is pushed together with the prefix it was installed at
/// and popped (running its done callback) when that prefix is closed.
///
/// A host holds the state of exactly one traversal. Feed it values with
/// [`visit`](Self::visit) and call [`finish`](Self::finish) at the end of the
/// stream to close all open prefixes.
pub struct PrefixVisitorHost<'v> {
    root: &'v mut dyn PrefixVisitor,
    stack: Vec<Scope<'v>>,
    last: Option<Path>,
}

struct Scope<'v> {
    prefix: Path,
    handler: Handler<'v>,
}

impl<'v> PrefixVisitorHost<'v> {
    pub fn new(root: &'v mut dyn PrefixVisitor) -> Self {
        Self { root, stack: Vec::new(), last: None }
    }

    /// Number of installed sub-visitors currently on the stack.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Emits the prefix events separating the previous value from `value`,
    /// then hands `value` to the active visitor.
    ///
    /// Values must arrive at least grouped, and no value path may be a
    /// prefix of another.
    pub fn visit(&mut self, value: &Value) -> Result<(), TraversalError> {
        let path = value.path();
        let common = match self.last.clone() {
            Some(last) => {
                let common = Path::common_prefix_length(&last, path);
                if common == last.length() {
                    return Err(TraversalError::UnexpectedChild { previous: last, child: path.clone() });
                }
                if common == path.length() {
                    return Err(TraversalError::UnexpectedAncestor {
                        previous: last,
                        ancestor: path.clone(),
                    });
                }
                self.close(&last, common)?;
                common
            }
            None => 0,
        };

        let mut opened: SmallVec<[&Path; 12]> =
            path.ancestors().skip(1).take_while(|p| p.length() > common).collect();
        while let Some(prefix) = opened.pop() {
            self.start(prefix)?;
        }

        let result = match self.stack.last_mut() {
            Some(Scope { handler: Handler::Value(visitor), .. }) => visitor.visit(value),
            _ => {
                trace!(path = %path, "value not consumed by prefix visitor");
                Ok(())
            }
        };
        isolate(path, result)?;
        self.last = Some(path.clone());
        Ok(())
    }

    /// Closes every prefix still open after the last value.
    pub fn finish(mut self) -> Result<(), TraversalError> {
        if let Some(last) = self.last.take() {
            self.close(&last, 0)?;
        }
        debug_assert!(self.stack.is_empty());
        Ok(())
    }

    /// Ends the prefixes of `from` which are longer than `target`, innermost
    /// first.
    fn close(&mut self, from: &Path, target: usize) -> Result<(), TraversalError> {
        for prefix in from.ancestors().skip(1).take_while(|p| p.length() > target) {
            self.end(prefix)?;
        }
        Ok(())
    }

    fn start(&mut self, prefix: &Path) -> Result<(), TraversalError> {
        let mut context = PrefixContext::new(prefix.clone());
        let result = match self.stack.last_mut() {
            None => self.root.visit_prefix_start(prefix, &mut context),
            Some(Scope { handler: Handler::Prefix(visitor), .. }) => {
                visitor.visitor().visit_prefix_start(prefix, &mut context)
            }
            // Leaf visitors only see values.
            Some(Scope { handler: Handler::Value(_), .. }) => return Ok(()),
        };
        // A failed callback does not get to install anything.
        if isolate(prefix, result)?
            && let Some(handler) = context.take()
        {
            self.stack.push(Scope { prefix: prefix.clone(), handler });
        }
        Ok(())
    }

    fn end(&mut self, prefix: &Path) -> Result<(), TraversalError> {
        if self.stack.last().is_some_and(|scope| scope.prefix.length() == prefix.length())
            && let Some(scope) = self.stack.pop()
        {
            trace!(prefix = %prefix, "uninstalling sub-visitor");
            match scope.handler {
                Handler::Value(visitor) => visitor.finish(),
                Handler::Prefix(visitor) => visitor.finish(),
            }
        }
        let result = match self.stack.last_mut() {
            None => self.root.visit_prefix_end(prefix),
            Some(Scope { handler: Handler::Prefix(visitor), .. }) => {
                visitor.visitor().visit_prefix_end(prefix)
            }
            Some(Scope { handler: Handler::Value(_), .. }) => return Ok(()),
        };
        isolate(prefix, result).map(|_| ())
    }
}
