//! Construction options for elements and documents.

use super::children::ChildPolicy;

/// How a new element accepts children and attributes, and how it lays out.
///
/// # Examples
///
/// ```
/// use xmlwright::tree::ElementConfig;
///
/// let table = ElementConfig::default()
///     .validating(["row"])
///     .text(false)
///     .checked_attributes(["summary"]);
/// assert!(table.allows_children);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementConfig {
    /// Element children may be added. Defaults to `true`.
    pub allows_children: bool,
    /// Text and CDATA may be added. Defaults to `true`.
    pub allows_text: bool,
    /// Element children must be whitelisted. Defaults to `false`.
    pub validates_children: bool,
    /// The child whitelist, used when `validates_children` is set.
    pub permitted_children: Vec<String>,
    /// Attributes may be set at all. Defaults to `true`.
    pub allows_attributes: bool,
    /// Only registered attribute names may be set. Defaults to `false`.
    pub checks_attributes: bool,
    /// Attribute names registered up front for checking mode.
    pub permitted_attributes: Vec<String>,
    /// Block (own line) rather than inline layout. Defaults to `true`.
    pub block: bool,
}

impl Default for ElementConfig {
    fn default() -> Self {
        Self {
            allows_children: true,
            allows_text: true,
            validates_children: false,
            permitted_children: Vec::new(),
            allows_attributes: true,
            checks_attributes: false,
            permitted_attributes: Vec::new(),
            block: true,
        }
    }
}

impl ElementConfig {
    /// An element that takes neither children nor text.
    #[must_use]
    pub fn leaf() -> Self {
        Self::default().children(false).text(false)
    }

    /// An inline element.
    #[must_use]
    pub fn inline() -> Self {
        Self::default().block(false)
    }

    /// Enables or disables element children.
    #[must_use]
    pub fn children(mut self, allows: bool) -> Self {
        self.allows_children = allows;
        self
    }

    /// Enables or disables text children.
    #[must_use]
    pub fn text(mut self, allows: bool) -> Self {
        self.allows_text = allows;
        self
    }

    /// Restricts element children to the given names. Implies
    /// `allows_children`.
    #[must_use]
    pub fn validating<I, S>(mut self, permitted: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.validates_children = true;
        self.allows_children = true;
        self.permitted_children
            .extend(permitted.into_iter().map(Into::into));
        self
    }

    /// Enables or disables attributes altogether.
    #[must_use]
    pub fn attributes(mut self, allows: bool) -> Self {
        self.allows_attributes = allows;
        self
    }

    /// Turns on attribute checking with the given names registered.
    #[must_use]
    pub fn checked_attributes<I, S>(mut self, permitted: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.checks_attributes = true;
        self.permitted_attributes
            .extend(permitted.into_iter().map(Into::into));
        self
    }

    /// Chooses block or inline layout.
    #[must_use]
    pub fn block(mut self, block: bool) -> Self {
        self.block = block;
        self
    }

    pub(crate) fn child_policy(&self) -> ChildPolicy {
        ChildPolicy {
            allows_children: self.allows_children || self.validates_children,
            allows_text: self.allows_text,
            validates_children: self.validates_children,
        }
    }
}

/// Options for a new [`Document`](super::Document).
///
/// The defaults give a root named `root` and an XML declaration with
/// version `1.0`, encoding `UTF-8` and `standalone='yes'`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentOptions {
    /// Name of the root element.
    pub root_name: String,
    /// Configuration of the root element.
    pub root: ElementConfig,
    /// Whether to emit an XML declaration.
    pub declaration: bool,
    /// Declared XML version.
    pub version: String,
    /// Declared encoding label, if any.
    pub encoding: Option<String>,
    /// Declared standalone flag, if any.
    pub standalone: Option<bool>,
}

impl Default for DocumentOptions {
    fn default() -> Self {
        Self {
            root_name: "root".to_string(),
            root: ElementConfig::default(),
            declaration: true,
            version: "1.0".to_string(),
            encoding: Some("UTF-8".to_string()),
            standalone: Some(true),
        }
    }
}

impl DocumentOptions {
    /// Sets the root element name.
    #[must_use]
    pub fn root_name(mut self, name: &str) -> Self {
        self.root_name = name.to_string();
        self
    }

    /// Sets the root element configuration.
    #[must_use]
    pub fn root(mut self, config: ElementConfig) -> Self {
        self.root = config;
        self
    }

    /// Enables or disables the XML declaration.
    #[must_use]
    pub fn declaration(mut self, declare: bool) -> Self {
        self.declaration = declare;
        self
    }

    /// Sets the declared version.
    #[must_use]
    pub fn version(mut self, version: &str) -> Self {
        self.version = version.to_string();
        self
    }

    /// Sets or clears the declared encoding.
    #[must_use]
    pub fn encoding(mut self, encoding: Option<&str>) -> Self {
        self.encoding = encoding.map(str::to_string);
        self
    }

    /// Sets or clears the standalone flag.
    #[must_use]
    pub fn standalone(mut self, standalone: Option<bool>) -> Self {
        self.standalone = standalone;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leaf_config() {
        let config = ElementConfig::leaf();
        assert!(!config.allows_children);
        assert!(!config.allows_text);
        assert!(config.block);
    }

    #[test]
    fn test_validating_forces_children() {
        let config = ElementConfig::leaf().validating(["row"]);
        assert!(config.child_policy().allows_children);
        assert!(config.child_policy().validates_children);
        assert_eq!(config.permitted_children, vec!["row".to_string()]);
    }

    #[test]
    fn test_document_defaults() {
        let options = DocumentOptions::default();
        assert_eq!(options.root_name, "root");
        assert_eq!(options.encoding.as_deref(), Some("UTF-8"));
        assert_eq!(options.standalone, Some(true));
        assert!(options.declaration);
    }
}
