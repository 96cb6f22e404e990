//! Attribute and namespace storage for a single element or processing
//! instruction.
//!
//! An [`AttributeTable`] maps attribute names to string values. It also
//! carries the owner's [`NamespaceRegistry`], because both render into the
//! same opening tag: namespaces first, then attributes in the table's
//! [`SortOrder`].

use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::fmt;

use crate::error::{BuildError, BuildResult};
use crate::serial::escape::escape;
use crate::tree::Namespace;
use crate::util::names::{NameClass, NameValidators};

/// `xml:id`, always accepted by every table.
pub const XML_ID: &str = "xml:id";
/// `xml:lang`, always accepted by every table.
pub const XML_LANG: &str = "xml:lang";
/// `xml:space`, always accepted by every table.
pub const XML_SPACE: &str = "xml:space";

const RESERVED: [&str; 3] = [XML_ID, XML_LANG, XML_SPACE];

/// Returns true for the reserved attribute names that bypass name
/// validation and registration.
#[must_use]
pub fn is_reserved_attribute(name: &str) -> bool {
    RESERVED.contains(&name)
}

/// A deduplicated, sorted set of namespace declarations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NamespaceRegistry {
    namespaces: BTreeSet<Namespace>,
}

impl NamespaceRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a namespace. Returns false if an equal one was already present.
    pub fn set_namespace(&mut self, namespace: Namespace) -> bool {
        self.namespaces.insert(namespace)
    }

    /// All namespaces, unprefixed first, then by prefix.
    #[must_use]
    pub fn get_namespaces(&self) -> Vec<Namespace> {
        self.namespaces.iter().cloned().collect()
    }

    /// Iterates in sorted order without cloning.
    pub fn iter(&self) -> impl Iterator<Item = &Namespace> {
        self.namespaces.iter()
    }

    /// Looks up the namespace bound to `prefix` (`None` for the default one).
    #[must_use]
    pub fn find(&self, prefix: Option<&str>) -> Option<&Namespace> {
        self.namespaces.iter().find(|ns| ns.prefix() == prefix)
    }

    /// Number of declarations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.namespaces.len()
    }

    /// Returns true if nothing has been declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.namespaces.is_empty()
    }
}

/// Display order for attribute names.
#[derive(Clone, Default)]
pub enum SortOrder {
    /// Byte-wise lexical order.
    #[default]
    Lexical,
    /// The listed names first, in the listed order; everything else after
    /// them, lexically.
    Sequence(Vec<String>),
    /// A caller-supplied total order.
    Custom(fn(&str, &str) -> Ordering),
}

impl SortOrder {
    /// Compares two attribute names under this order.
    #[must_use]
    pub fn compare(&self, a: &str, b: &str) -> Ordering {
        match self {
            Self::Lexical => a.cmp(b),
            Self::Sequence(names) => {
                let rank = |name: &str| names.iter().position(|n| n == name);
                match (rank(a), rank(b)) {
                    (Some(ra), Some(rb)) => ra.cmp(&rb),
                    (Some(_), None) => Ordering::Less,
                    (None, Some(_)) => Ordering::Greater,
                    (None, None) => a.cmp(b),
                }
            }
            Self::Custom(compare) => compare(a, b),
        }
    }
}

impl fmt::Debug for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lexical => write!(f, "Lexical"),
            Self::Sequence(names) => f.debug_tuple("Sequence").field(names).finish(),
            Self::Custom(_) => write!(f, "Custom(..)"),
        }
    }
}

/// Attribute storage with optional validity checking.
///
/// In checking mode only registered names (plus the reserved `xml:id`,
/// `xml:lang` and `xml:space`) may be set.
#[derive(Debug, Clone)]
pub struct AttributeTable {
    namespaces: NamespaceRegistry,
    values: HashMap<String, String>,
    allows_attributes: bool,
    checks_validity: bool,
    permitted: HashSet<String>,
    order: SortOrder,
}

impl AttributeTable {
    /// Creates an open table: any valid name may be set.
    #[must_use]
    pub fn new() -> Self {
        Self {
            namespaces: NamespaceRegistry::new(),
            values: HashMap::new(),
            allows_attributes: true,
            checks_validity: false,
            permitted: HashSet::new(),
            order: SortOrder::default(),
        }
    }

    /// Creates a table that refuses every attribute.
    #[must_use]
    pub fn forbidding() -> Self {
        Self {
            allows_attributes: false,
            ..Self::new()
        }
    }

    /// Creates a table in checking mode with no names registered yet.
    #[must_use]
    pub fn checking() -> Self {
        Self {
            checks_validity: true,
            ..Self::new()
        }
    }

    /// Returns true unless the table refuses every attribute.
    #[must_use]
    pub fn allows_attributes(&self) -> bool {
        self.allows_attributes
    }

    /// Returns true in checking mode.
    #[must_use]
    pub fn checks_validity(&self) -> bool {
        self.checks_validity
    }

    /// Returns true if `name` may be set under the current mode.
    #[must_use]
    pub fn is_permitted(&self, name: &str) -> bool {
        !self.checks_validity || is_reserved_attribute(name) || self.permitted.contains(name)
    }

    /// Sets, replaces, appends to, or deletes an attribute and returns the
    /// previous value.
    ///
    /// `None` deletes. With `append`, a non-blank existing value becomes
    /// `old + append + value`; otherwise the value is replaced.
    ///
    /// # Errors
    ///
    /// - [`BuildError::NotAllowed`] if the table refuses all attributes, or
    ///   in checking mode when `name` is not registered.
    /// - [`BuildError::InvalidName`] if the attribute validator rejects `name`.
    pub fn set_attribute(
        &mut self,
        validators: &NameValidators,
        name: &str,
        value: Option<&str>,
        append: Option<&str>,
    ) -> BuildResult<Option<String>> {
        if !self.allows_attributes {
            return Err(BuildError::not_allowed(format!(
                "attribute '{name}' on a node that permits none"
            )));
        }
        if !is_reserved_attribute(name) {
            validators.check(NameClass::Attribute, name)?;
        }
        if !self.is_permitted(name) {
            return Err(BuildError::not_allowed(format!(
                "attribute '{name}' is not registered"
            )));
        }

        let Some(value) = value else {
            return Ok(self.values.remove(name));
        };
        let joined = match (self.values.get(name), append) {
            (Some(old), Some(separator)) if !old.trim().is_empty() => {
                format!("{old}{separator}{value}")
            }
            _ => value.to_string(),
        };
        Ok(self.values.insert(name.to_string(), joined))
    }

    /// Stores a pseudo-attribute, skipping name validation and the mode
    /// checks.
    pub(crate) fn insert_unchecked(&mut self, name: &str, value: &str) {
        self.values.insert(name.to_string(), value.to_string());
    }

    /// Registers names accepted in checking mode. Every name is validated
    /// before any is registered.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::InvalidName`] for the first rejected name; in
    /// that case nothing is registered.
    pub fn register_attributes<I, S>(
        &mut self,
        validators: &NameValidators,
        names: I,
    ) -> BuildResult<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let names: Vec<String> = names.into_iter().map(|n| n.as_ref().to_string()).collect();
        for name in &names {
            if !is_reserved_attribute(name) {
                validators.check(NameClass::Attribute, name)?;
            }
        }
        self.permitted.extend(names);
        Ok(())
    }

    /// Ranks the given names first, in the given order, when rendering.
    pub fn register_sequence<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.order = SortOrder::Sequence(names.into_iter().map(|n| n.as_ref().to_string()).collect());
    }

    /// Replaces the display order.
    pub fn set_sort_order(&mut self, order: SortOrder) {
        self.order = order;
    }

    /// The active display order.
    #[must_use]
    pub fn sort_order(&self) -> &SortOrder {
        &self.order
    }

    /// Returns the value of an attribute.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// Number of attributes, not counting namespace declarations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if there are neither attributes nor namespaces.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty() && self.namespaces.is_empty()
    }

    /// Attributes as `(name, value)` pairs in display order.
    #[must_use]
    pub fn sorted(&self) -> Vec<(&str, &str)> {
        let mut pairs: Vec<(&str, &str)> = self
            .values
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
            .collect();
        pairs.sort_by(|a, b| self.order.compare(a.0, b.0));
        pairs
    }

    /// Adds a namespace declaration. See [`NamespaceRegistry::set_namespace`].
    pub fn set_namespace(&mut self, namespace: Namespace) -> bool {
        self.namespaces.set_namespace(namespace)
    }

    /// See [`NamespaceRegistry::get_namespaces`].
    #[must_use]
    pub fn get_namespaces(&self) -> Vec<Namespace> {
        self.namespaces.get_namespaces()
    }

    /// The namespace registry.
    #[must_use]
    pub fn namespaces(&self) -> &NamespaceRegistry {
        &self.namespaces
    }

    /// One `name='value'` fragment per namespace, then per attribute, in
    /// display order.
    #[must_use]
    pub fn fragments(&self) -> Vec<String> {
        self.namespaces
            .iter()
            .map(Namespace::to_string)
            .chain(
                self.sorted()
                    .into_iter()
                    .map(|(name, value)| format!("{name}='{}'", escape(value))),
            )
            .collect()
    }
}

impl Default for AttributeTable {
    fn default() -> Self {
        Self::new()
    }
}
