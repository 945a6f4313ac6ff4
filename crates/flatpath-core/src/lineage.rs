//! Ancestor chains of composite identities
//!
//! A [`Lineage`] records which records and arrays sit between the root and
//! the node currently being visited. Each recursive step builds a new link
//! on its own stack frame that points back at its parent, so sibling
//! branches never see each other's entries and nothing has to be removed on
//! the way back up.
//!
//! Chains usually hold single identities; deep equality chains pairs of
//! identities, one per side being compared.

use crate::value::NodeId;

/// Stack-linked chain of composite identities from the root to a node
#[derive(Debug, Clone, Copy)]
pub(crate) struct Lineage<'a, T = NodeId> {
    node: Option<T>,
    parent: Option<&'a Lineage<'a, T>>,
}

impl<'a, T: Copy + PartialEq> Lineage<'a, T> {
    /// Empty chain for a top-level call
    pub(crate) const fn root() -> Self {
        Self {
            node: None,
            parent: None,
        }
    }

    /// Whether `id` is already an ancestor of the current node
    pub(crate) fn contains(&self, id: T) -> bool {
        let mut current = Some(self);
        while let Some(link) = current {
            if link.node == Some(id) {
                return true;
            }
            current = link.parent;
        }
        false
    }

    /// Extend the chain with one more composite
    pub(crate) fn with<'b>(&'b self, id: T) -> Lineage<'b, T>
    where
        'a: 'b,
    {
        Lineage {
            node: Some(id),
            parent: Some(self),
        }
    }
}
