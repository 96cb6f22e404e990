//! Namespace declarations.

use std::fmt;

use url::{ParseError, Url};

use crate::error::{BuildError, BuildResult, IdentifierError};
use crate::serial::escape::escape;
use crate::util::names::{NameClass, NameValidators};

/// A namespace declaration: an identifier URI plus an optional prefix.
///
/// Namespaces are plain values. Equality and ordering go by prefix first,
/// then identifier, with the unprefixed (default) namespace sorting ahead
/// of every prefixed one.
///
/// # Examples
///
/// ```
/// use xmlwright::tree::Namespace;
/// use xmlwright::util::names::NameValidators;
///
/// let validators = NameValidators::new();
/// let svg = Namespace::new("http://www.w3.org/2000/svg", Some("svg"), &validators).unwrap();
/// assert_eq!(svg.to_string(), "xmlns:svg='http://www.w3.org/2000/svg'");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Namespace {
    // Field order drives the derived ordering.
    prefix: Option<String>,
    identifier: String,
}

impl Namespace {
    /// Creates a namespace, checking the prefix against the prefix validator
    /// and the identifier against URI syntax.
    ///
    /// # Errors
    ///
    /// - [`BuildError::InvalidName`] if the prefix is rejected.
    /// - [`BuildError::MalformedIdentifier`] if the identifier is not a URI.
    pub fn new(
        identifier: &str,
        prefix: Option<&str>,
        validators: &NameValidators,
    ) -> BuildResult<Self> {
        if let Some(prefix) = prefix {
            validators.check(NameClass::Prefix, prefix)?;
        }
        check_identifier(identifier).map_err(|source| BuildError::MalformedIdentifier {
            identifier: identifier.to_string(),
            source,
        })?;
        Ok(Self {
            prefix: prefix.map(str::to_string),
            identifier: identifier.to_string(),
        })
    }

    /// The namespace URI, exactly as given.
    #[must_use]
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// The prefix, or `None` for a default namespace.
    #[must_use]
    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    /// The declaring attribute name: `xmlns` or `xmlns:prefix`.
    #[must_use]
    pub fn attribute_name(&self) -> String {
        match &self.prefix {
            Some(prefix) => format!("xmlns:{prefix}"),
            None => "xmlns".to_string(),
        }
    }
}

/// Base for resolving relative identifiers. Only used to check syntax.
const RELATIVE_BASE: &str = "http://namespace.invalid/";

/// Accepts absolute URIs and relative references, including the empty one
/// that undeclares a default namespace.
fn check_identifier(identifier: &str) -> Result<(), IdentifierError> {
    if let Some(c) = identifier.chars().find(|&c| !is_uri_char(c)) {
        return Err(IdentifierError::Character(c));
    }
    match Url::parse(identifier) {
        Ok(_) => Ok(()),
        Err(ParseError::RelativeUrlWithoutBase) => {
            let base = Url::parse(RELATIVE_BASE)?;
            Url::options().base_url(Some(&base)).parse(identifier)?;
            Ok(())
        }
        Err(err) => Err(err.into()),
    }
}

/// RFC 3986 unreserved, reserved and `%`; non-ASCII passes for IRIs.
fn is_uri_char(c: char) -> bool {
    !c.is_ascii() || c.is_ascii_alphanumeric() || "-._~:/?#[]@!$&'()*+,;=%".contains(c)
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}='{}'",
            self.attribute_name(),
            escape(&self.identifier)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ns(identifier: &str, prefix: Option<&str>) -> Namespace {
        let Ok(ns) = Namespace::new(identifier, prefix, &NameValidators::new()) else {
            panic!("namespace {identifier} should be valid");
        };
        ns
    }

    #[test]
    fn test_default_namespace_display() {
        assert_eq!(
            ns("urn:example:books", None).to_string(),
            "xmlns='urn:example:books'"
        );
    }

    #[test]
    fn test_identifier_kept_verbatim() {
        assert_eq!(ns("http://example.com", None).identifier(), "http://example.com");
    }

    #[test]
    fn test_invalid_prefix_fails_construction() {
        let result = Namespace::new("urn:x", Some("1p"), &NameValidators::new());
        assert!(matches!(
            result,
            Err(BuildError::InvalidName {
                class: NameClass::Prefix,
                ..
            })
        ));
    }

    #[test]
    fn test_malformed_identifier() {
        let result = Namespace::new("not a uri", Some("p"), &NameValidators::new());
        assert!(matches!(
            result,
            Err(BuildError::MalformedIdentifier { .. })
        ));
    }

    #[test]
    fn test_relative_identifiers_accepted() {
        assert_eq!(ns("", None).to_string(), "xmlns=''");
        assert_eq!(ns("books", Some("b")).identifier(), "books");
        assert_eq!(ns("../schemas/a.xsd#top", Some("s")).identifier(), "../schemas/a.xsd#top");
    }

    #[test]
    fn test_disallowed_characters_rejected() {
        let result = Namespace::new("urn:a b", None, &NameValidators::new());
        assert!(matches!(
            result,
            Err(BuildError::MalformedIdentifier {
                source: IdentifierError::Character(' '),
                ..
            })
        ));
        let result = Namespace::new("http://[::1", None, &NameValidators::new());
        assert!(matches!(
            result,
            Err(BuildError::MalformedIdentifier {
                source: IdentifierError::Url(_),
                ..
            })
        ));
    }

    #[test]
    fn test_ordering_unprefixed_first() {
        let mut all = vec![
            ns("urn:b", Some("b")),
            ns("urn:a", Some("a")),
            ns("urn:z", None),
        ];
        all.sort();
        let prefixes: Vec<Option<&str>> = all.iter().map(Namespace::prefix).collect();
        assert_eq!(prefixes, vec![None, Some("a"), Some("b")]);
    }

    #[test]
    fn test_value_equality() {
        assert_eq!(ns("urn:a", Some("a")), ns("urn:a", Some("a")));
        assert_ne!(ns("urn:a", Some("a")), ns("urn:b", Some("a")));
    }
}
