//! Ordered child storage for a container node.

use std::collections::BTreeSet;

use crate::error::{BuildError, BuildResult};
use crate::tree::NodeId;

/// What a [`ChildList`] accepts.
///
/// Validation implies `allows_children`; [`ChildPolicy::validating`] sets
/// both.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChildPolicy {
    /// Element children may be added.
    pub allows_children: bool,
    /// Text and CDATA may be added.
    pub allows_text: bool,
    /// Element children are checked against a whitelist of names.
    pub validates_children: bool,
}

impl ChildPolicy {
    /// Accepts elements and text, without a whitelist.
    pub const OPEN: ChildPolicy = ChildPolicy {
        allows_children: true,
        allows_text: true,
        validates_children: false,
    };

    /// Accepts nothing but comments.
    pub const LEAF: ChildPolicy = ChildPolicy {
        allows_children: false,
        allows_text: false,
        validates_children: false,
    };

    /// Accepts whitelisted elements; text only if `allows_text`.
    #[must_use]
    pub fn validating(allows_text: bool) -> Self {
        Self {
            allows_children: true,
            allows_text,
            validates_children: true,
        }
    }
}

impl Default for ChildPolicy {
    fn default() -> Self {
        Self::OPEN
    }
}

/// The children of one container, in document order.
///
/// The list is the only owner of its children: a node id appears in at
/// most one list of a document.
#[derive(Debug, Clone, Default)]
pub struct ChildList {
    nodes: Vec<NodeId>,
    policy: ChildPolicy,
    permitted: BTreeSet<String>,
}

impl ChildList {
    /// Creates an empty list. `permitted` only matters when the policy
    /// validates children.
    #[must_use]
    pub fn new<I, S>(policy: ChildPolicy, permitted: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let policy = ChildPolicy {
            allows_children: policy.allows_children || policy.validates_children,
            ..policy
        };
        Self {
            nodes: Vec::new(),
            policy,
            permitted: permitted.into_iter().map(Into::into).collect(),
        }
    }

    /// The list's policy.
    #[must_use]
    pub fn policy(&self) -> ChildPolicy {
        self.policy
    }

    /// Whitelisted element names.
    pub fn permitted(&self) -> impl Iterator<Item = &str> {
        self.permitted.iter().map(String::as_str)
    }

    /// Adds names to the whitelist.
    pub fn permit<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.permitted.extend(names.into_iter().map(Into::into));
    }

    /// Checks whether an element named `child` may join a container
    /// named `parent`.
    ///
    /// # Errors
    ///
    /// - [`BuildError::NotAllowed`] if the list takes no children.
    /// - [`BuildError::InvalidChild`] if validating and `child` is not
    ///   whitelisted.
    pub fn admit_element(&self, parent: &str, child: &str) -> BuildResult<()> {
        if !self.policy.allows_children {
            return Err(BuildError::not_allowed(format!(
                "'{parent}' does not accept child elements"
            )));
        }
        if self.policy.validates_children && !self.permitted.contains(child) {
            return Err(BuildError::InvalidChild {
                parent: parent.to_string(),
                child: child.to_string(),
            });
        }
        Ok(())
    }

    /// Checks whether text may join a container named `parent`.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::NotAllowed`] if the list takes no text.
    pub fn admit_text(&self, parent: &str) -> BuildResult<()> {
        if self.policy.allows_text {
            Ok(())
        } else {
            Err(BuildError::not_allowed(format!(
                "'{parent}' does not accept text"
            )))
        }
    }

    pub(crate) fn push(&mut self, id: NodeId) {
        self.nodes.push(id);
    }

    /// Child ids in order.
    #[must_use]
    pub fn ids(&self) -> &[NodeId] {
        &self.nodes
    }

    /// The last child.
    #[must_use]
    pub fn last(&self) -> Option<NodeId> {
        self.nodes.last().copied()
    }

    /// Returns true if `id` is one of the children.
    #[must_use]
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains(&id)
    }

    /// Number of children.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if there are no children.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validating_implies_children() {
        let list = ChildList::new(
            ChildPolicy {
                allows_children: false,
                allows_text: false,
                validates_children: true,
            },
            ["row"],
        );
        assert!(list.policy().allows_children);
        assert!(list.admit_element("table", "row").is_ok());
    }

    #[test]
    fn test_whitelist_rejects_unknown() {
        let list = ChildList::new(ChildPolicy::validating(false), ["row"]);
        assert_eq!(
            list.admit_element("table", "column"),
            Err(BuildError::InvalidChild {
                parent: "table".to_string(),
                child: "column".to_string(),
            })
        );
    }

    #[test]
    fn test_leaf_refuses_elements_and_text() {
        let list = ChildList::new(ChildPolicy::LEAF, Vec::<String>::new());
        assert!(matches!(
            list.admit_element("br", "span"),
            Err(BuildError::NotAllowed { .. })
        ));
        assert!(matches!(
            list.admit_text("br"),
            Err(BuildError::NotAllowed { .. })
        ));
    }

    #[test]
    fn test_permit_extends_whitelist() {
        let mut list = ChildList::new(ChildPolicy::validating(true), ["a"]);
        list.permit(["b"]);
        assert_eq!(list.permitted().collect::<Vec<_>>(), vec!["a", "b"]);
        assert!(list.admit_text("p").is_ok());
    }
}
