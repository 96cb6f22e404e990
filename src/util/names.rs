//! Pluggable name validation.
//!
//! Four classes of names are checked while a tree is built: element names,
//! attribute names, namespace prefixes and name tokens. Each class has its
//! own [`NameValidator`], held together in a [`NameValidators`] set that a
//! [`Document`](crate::tree::Document) owns. Any validator can be swapped at
//! runtime; registered listeners are told about every replacement.
//!
//! Validators are consulted at attach time and are not snapshotted, so a
//! replacement only affects names checked afterwards.

use std::fmt;
use std::sync::{Arc, OnceLock};

use regex::Regex;
use tracing::debug;

use crate::error::{BuildError, BuildResult};
use crate::util::qname::{is_reserved, split_qname};

/// The class of name a validator is responsible for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NameClass {
    /// Element names, optionally `prefix:local`.
    Element,
    /// Attribute names, optionally `prefix:local`.
    Attribute,
    /// Namespace prefixes.
    Prefix,
    /// Name tokens, used for id-like attribute values.
    NmToken,
}

impl NameClass {
    /// All four classes, in a fixed order.
    pub const ALL: [NameClass; 4] = [
        NameClass::Element,
        NameClass::Attribute,
        NameClass::Prefix,
        NameClass::NmToken,
    ];
}

impl fmt::Display for NameClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Element => write!(f, "element"),
            Self::Attribute => write!(f, "attribute"),
            Self::Prefix => write!(f, "prefix"),
            Self::NmToken => write!(f, "nmtoken"),
        }
    }
}

type Predicate = dyn Fn(&str) -> bool + Send + Sync;

/// A predicate deciding whether a candidate string is an acceptable name.
///
/// Cloning is cheap; clones share the same predicate.
///
/// # Examples
///
/// ```
/// use xmlwright::util::names::NameValidator;
///
/// let lower = NameValidator::new("lowercase", |s| s.chars().all(|c| c.is_ascii_lowercase()));
/// assert!(lower.is_valid("item"));
/// assert!(!lower.is_valid("Item"));
/// ```
#[derive(Clone)]
pub struct NameValidator {
    label: Arc<str>,
    check: Arc<Predicate>,
}

impl NameValidator {
    /// Wraps a predicate. The label only shows up in `Debug` output and
    /// change notifications.
    pub fn new<F>(label: &str, check: F) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        Self {
            label: Arc::from(label),
            check: Arc::new(check),
        }
    }

    /// A validator that accepts every candidate.
    #[must_use]
    pub fn permissive() -> Self {
        Self::new("permissive", |_| true)
    }

    /// The built-in validator for `class`.
    #[must_use]
    pub fn default_for(class: NameClass) -> Self {
        match class {
            NameClass::Element => Self::new("default element", is_qualified_name),
            NameClass::Attribute => Self::new("default attribute", is_qualified_name),
            NameClass::Prefix => Self::new("default prefix", is_prefix),
            NameClass::NmToken => Self::new("default nmtoken", is_nmtoken),
        }
    }

    /// Runs the predicate.
    #[must_use]
    pub fn is_valid(&self, candidate: &str) -> bool {
        (self.check)(candidate)
    }

    /// The label given at construction.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Returns true if both handles share the same predicate.
    #[must_use]
    pub fn same_as(&self, other: &NameValidator) -> bool {
        Arc::ptr_eq(&self.check, &other.check)
    }
}

impl fmt::Debug for NameValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("NameValidator").field(&self.label).finish()
    }
}

#[allow(clippy::unwrap_used)]
fn ncname_regex() -> &'static Regex {
    static NCNAME: OnceLock<Regex> = OnceLock::new();
    NCNAME.get_or_init(|| Regex::new(r"^[\p{L}_][\p{L}\p{N}_.\-\x{B7}]*$").unwrap())
}

#[allow(clippy::unwrap_used)]
fn nmtoken_regex() -> &'static Regex {
    static NMTOKEN: OnceLock<Regex> = OnceLock::new();
    NMTOKEN.get_or_init(|| Regex::new(r"^[\p{L}\p{N}_.:\-\x{B7}]+$").unwrap())
}

fn is_ncname(candidate: &str) -> bool {
    ncname_regex().is_match(candidate)
}

fn is_prefix(candidate: &str) -> bool {
    is_ncname(candidate) && !is_reserved(candidate)
}

fn is_qualified_name(candidate: &str) -> bool {
    if is_reserved(candidate) {
        return false;
    }
    match split_qname(candidate) {
        Some((Some(prefix), local)) => is_ncname(prefix) && is_ncname(local),
        Some((None, local)) => is_ncname(local),
        None => false,
    }
}

fn is_nmtoken(candidate: &str) -> bool {
    nmtoken_regex().is_match(candidate)
}

/// Describes one validator replacement, passed to every listener.
#[derive(Debug)]
pub struct ValidatorChange<'a> {
    /// The class whose validator changed.
    pub class: NameClass,
    /// The validator that was active before.
    pub old: &'a NameValidator,
    /// The validator now active.
    pub new: &'a NameValidator,
}

/// Handle returned by [`NameValidators::add_listener`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Listener = Arc<dyn Fn(&ValidatorChange<'_>) + Send + Sync>;

/// The validator set consulted while building a tree.
///
/// # Examples
///
/// ```
/// use xmlwright::util::names::{NameClass, NameValidator, NameValidators};
///
/// let mut validators = NameValidators::new();
/// assert!(validators.check(NameClass::Element, "1bad").is_err());
///
/// validators.set(NameClass::Element, NameValidator::permissive());
/// assert!(validators.check(NameClass::Element, "1bad").is_ok());
///
/// validators.restore_defaults();
/// assert!(validators.check(NameClass::Element, "1bad").is_err());
/// ```
#[derive(Clone)]
pub struct NameValidators {
    element: NameValidator,
    attribute: NameValidator,
    prefix: NameValidator,
    nmtoken: NameValidator,
    listeners: Vec<(ListenerId, Listener)>,
    next_listener: u64,
}

impl NameValidators {
    /// Creates a set holding the built-in validators and no listeners.
    #[must_use]
    pub fn new() -> Self {
        Self {
            element: NameValidator::default_for(NameClass::Element),
            attribute: NameValidator::default_for(NameClass::Attribute),
            prefix: NameValidator::default_for(NameClass::Prefix),
            nmtoken: NameValidator::default_for(NameClass::NmToken),
            listeners: Vec::new(),
            next_listener: 1,
        }
    }

    /// Returns the active validator for `class`.
    #[must_use]
    pub fn get(&self, class: NameClass) -> &NameValidator {
        match class {
            NameClass::Element => &self.element,
            NameClass::Attribute => &self.attribute,
            NameClass::Prefix => &self.prefix,
            NameClass::NmToken => &self.nmtoken,
        }
    }

    fn slot_mut(&mut self, class: NameClass) -> &mut NameValidator {
        match class {
            NameClass::Element => &mut self.element,
            NameClass::Attribute => &mut self.attribute,
            NameClass::Prefix => &mut self.prefix,
            NameClass::NmToken => &mut self.nmtoken,
        }
    }

    /// Replaces the validator for `class`, notifies every listener, and
    /// returns the validator that was active before.
    pub fn set(&mut self, class: NameClass, validator: NameValidator) -> NameValidator {
        let old = std::mem::replace(self.slot_mut(class), validator);
        debug!(
            %class,
            old = old.label(),
            new = self.get(class).label(),
            "name validator replaced"
        );
        let change = ValidatorChange {
            class,
            old: &old,
            new: self.get(class),
        };
        for (_, listener) in &self.listeners {
            listener(&change);
        }
        old
    }

    /// Puts the built-in validator back for every class. Each class fires
    /// its own notification.
    pub fn restore_defaults(&mut self) {
        for class in NameClass::ALL {
            self.set(class, NameValidator::default_for(class));
        }
    }

    /// Registers a listener called on every validator replacement.
    pub fn add_listener<F>(&mut self, listener: F) -> ListenerId
    where
        F: Fn(&ValidatorChange<'_>) + Send + Sync + 'static,
    {
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        self.listeners.push((id, Arc::new(listener)));
        debug!(listener = id.0, "validator listener registered");
        id
    }

    /// Removes a listener. Returns false if it was not registered.
    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(registered, _)| *registered != id);
        let removed = self.listeners.len() != before;
        if removed {
            debug!(listener = id.0, "validator listener removed");
        }
        removed
    }

    /// Returns true if `candidate` passes the validator for `class`.
    #[must_use]
    pub fn is_valid(&self, class: NameClass, candidate: &str) -> bool {
        self.get(class).is_valid(candidate)
    }

    /// Checks `candidate` against the validator for `class`.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::InvalidName`] if the validator rejects it.
    pub fn check(&self, class: NameClass, candidate: &str) -> BuildResult<()> {
        if self.is_valid(class, candidate) {
            Ok(())
        } else {
            Err(BuildError::InvalidName {
                class,
                name: candidate.to_string(),
            })
        }
    }
}

impl Default for NameValidators {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for NameValidators {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NameValidators")
            .field("element", &self.element)
            .field("attribute", &self.attribute)
            .field("prefix", &self.prefix)
            .field("nmtoken", &self.nmtoken)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
