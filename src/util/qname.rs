//! Qualified name handling.
//!
//! Element and attribute names may carry at most one namespace separator:
//! `prefix:local` or just `local`. See <https://www.w3.org/TR/xml-names/#NT-QName>.

/// The namespace separator inside a qualified name.
pub const SEPARATOR: char = ':';

/// Splits a qualified name into its prefix and local part.
///
/// Returns `None` when the name holds more than one separator, since such
/// a name can never be qualified.
///
/// # Examples
///
/// ```
/// use xmlwright::util::qname::split_qname;
///
/// assert_eq!(split_qname("svg:rect"), Some((Some("svg"), "rect")));
/// assert_eq!(split_qname("div"), Some((None, "div")));
/// assert_eq!(split_qname("a:b:c"), None);
/// ```
#[must_use]
pub fn split_qname(qname: &str) -> Option<(Option<&str>, &str)> {
    match qname.split_once(SEPARATOR) {
        Some((_, local)) if local.contains(SEPARATOR) => None,
        Some((prefix, local)) => Some((Some(prefix), local)),
        None => Some((None, qname)),
    }
}

/// Returns the prefix of a qualified name, if it has one.
#[must_use]
pub fn prefix_of(qname: &str) -> Option<&str> {
    split_qname(qname).and_then(|(prefix, _)| prefix)
}

/// Returns true if `name` starts with the reserved `xml` prefix in any case
/// and is at least three characters long.
#[must_use]
pub fn is_reserved(name: &str) -> bool {
    name.len() >= 3 && name.as_bytes()[..3].eq_ignore_ascii_case(b"xml")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_qname_with_prefix() {
        assert_eq!(split_qname("xml:lang"), Some((Some("xml"), "lang")));
    }

    #[test]
    fn test_split_qname_without_prefix() {
        assert_eq!(split_qname("div"), Some((None, "div")));
    }

    #[test]
    fn test_split_qname_empty() {
        assert_eq!(split_qname(""), Some((None, "")));
    }

    #[test]
    fn test_split_qname_colon_at_edges() {
        assert_eq!(split_qname(":local"), Some((Some(""), "local")));
        assert_eq!(split_qname("prefix:"), Some((Some("prefix"), "")));
    }

    #[test]
    fn test_split_qname_multiple_colons() {
        assert_eq!(split_qname("a:b:c"), None);
        assert_eq!(split_qname("a::"), None);
    }

    #[test]
    fn test_prefix_of() {
        assert_eq!(prefix_of("svg:rect"), Some("svg"));
        assert_eq!(prefix_of("rect"), None);
    }

    #[test]
    fn test_is_reserved() {
        assert!(is_reserved("xml"));
        assert!(is_reserved("XmLfoo"));
        assert!(!is_reserved("xm"));
        assert!(!is_reserved("axml"));
        assert!(!is_reserved("é"));
    }
}
