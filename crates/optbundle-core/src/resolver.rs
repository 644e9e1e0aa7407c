//! Flattening bundles into ordered option lists.

use tracing::{debug, trace};

use crate::bundle::{Bundle, Item, Node};
use crate::dedup::dedup_last_wins;
use crate::{BundleOption, StructuralError};

/// Default bound on bundle nesting depth.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Expands bundles into the chronological sequence of their options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolver {
    max_depth: usize,
}

impl Default for Resolver {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl Resolver {
    /// Create a resolver that rejects bundles nested deeper than `max_depth`.
    pub fn new(max_depth: usize) -> Self {
        Self { max_depth }
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Flatten `bundle` into its options, oldest first.
    ///
    /// Nested bundles are spliced in at the position they were added. With
    /// `dedup`, only the last option of each kind survives, kept at the
    /// position of that last occurrence.
    pub fn flatten<O: BundleOption>(
        &self,
        bundle: &Bundle<O>,
        dedup: bool,
    ) -> Result<Vec<O>, StructuralError> {
        let mut out = Vec::with_capacity(bundle.len());
        let mut open = Vec::new();
        if let Some(head) = bundle.head_ptr() {
            open.push(head);
        }
        self.expand(bundle, 0, &mut open, &mut out)?;

        let flattened = out.len();
        let options = if dedup { dedup_last_wins(out) } else { out };
        debug!(
            items = bundle.len(),
            flattened,
            dedup,
            returned = options.len(),
            "flattened bundle"
        );
        Ok(options)
    }

    // `open` holds the chain heads of every bundle currently being expanded.
    fn expand<O: BundleOption>(
        &self,
        bundle: &Bundle<O>,
        depth: usize,
        open: &mut Vec<*const Node<O>>,
        out: &mut Vec<O>,
    ) -> Result<(), StructuralError> {
        for item in bundle.chain().into_iter().rev() {
            match item {
                Item::Opt(opt) => out.push(opt.clone()),
                Item::Bundle(nested) => {
                    let Some(head) = nested.head_ptr() else {
                        continue;
                    };
                    let depth = depth + 1;
                    if open.contains(&head) {
                        return Err(StructuralError::Cycle { depth });
                    }
                    if depth > self.max_depth {
                        return Err(StructuralError::TooDeep {
                            limit: self.max_depth,
                        });
                    }
                    trace!(depth, items = nested.len(), "expanding nested bundle");
                    open.push(head);
                    self.expand(nested, depth, open, out)?;
                    open.pop();
                }
            }
        }
        Ok(())
    }
}
