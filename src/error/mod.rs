//! Error types for markup tree construction.
//!
//! Every failure is raised synchronously by the call that caused it. A
//! failed mutation leaves the reachable tree exactly as it was, and rendering
//! never fails once construction succeeded.

use thiserror::Error;

use crate::util::names::NameClass;

/// Convenience alias for results of tree-building operations.
pub type BuildResult<T> = Result<T, BuildError>;

/// The error type returned by tree-building operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BuildError {
    /// A candidate element, attribute, prefix, or nmtoken name was rejected
    /// by the active validator for its class.
    #[error("invalid {class} name '{name}'")]
    InvalidName {
        /// Which validator rejected the name.
        class: NameClass,
        /// The rejected candidate.
        name: String,
    },

    /// The target node's configuration forbids the operation.
    #[error("operation not allowed: {reason}")]
    NotAllowed {
        /// Human-readable description of what was refused.
        reason: String,
    },

    /// A validating child list rejected a child whose element name is not
    /// whitelisted.
    #[error("'{child}' is not a permitted child of '{parent}'")]
    InvalidChild {
        /// Element name of the container.
        parent: String,
        /// Element name of the rejected child.
        child: String,
    },

    /// The node already belongs to a different parent.
    #[error("'{name}' is already attached to another parent")]
    AlreadyAttached {
        /// Element name of the node being attached.
        name: String,
    },

    /// The node was already added to this same parent.
    #[error("'{name}' has already been added to this parent")]
    AlreadyAdded {
        /// Element name of the node being attached.
        name: String,
    },

    /// A namespace identifier could not be parsed as a URI.
    #[error("malformed namespace identifier '{identifier}': {source}")]
    MalformedIdentifier {
        /// The rejected identifier string.
        identifier: String,
        /// Why the identifier was refused.
        source: IdentifierError,
    },
}

/// Why a namespace identifier is not a URI reference.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IdentifierError {
    /// The URL parser refused it.
    #[error(transparent)]
    Url(#[from] url::ParseError),

    /// It holds a character that may not appear in a URI reference.
    #[error("character {0:?} is not allowed in a URI reference")]
    Character(char),
}

impl BuildError {
    pub(crate) fn not_allowed(reason: impl Into<String>) -> Self {
        Self::NotAllowed {
            reason: reason.into(),
        }
    }
}
