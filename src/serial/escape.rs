//! Escaping transforms applied while rendering.
//!
//! - [`escape`] / [`unescape`]: the five predefined markup entities, used for
//!   text content and attribute values. `unescape(escape(s)) == s` for every
//!   string.
//! - [`cdata`]: wraps text in CDATA sections, splitting around `]]>`.
//! - [`verbatim`]: no escaping at all, for predefined markup.
//! - [`comment_body`]: hyphen-safe comment text.

use std::borrow::Cow;

/// Signature shared by the text escaping transforms.
pub type EscapeFn = for<'a> fn(&'a str) -> Cow<'a, str>;

const CDATA_OPEN: &str = "<![CDATA[";
const CDATA_CLOSE: &str = "]]>";

/// Escapes `&`, `<`, `>`, `"` and `'` with their predefined entities.
///
/// # Examples
///
/// ```
/// use xmlwright::serial::escape::escape;
///
/// assert_eq!(escape("a < b & 'c'"), "a &lt; b &amp; &apos;c&apos;");
/// assert_eq!(escape("plain"), "plain");
/// ```
#[must_use]
pub fn escape(text: &str) -> Cow<'_, str> {
    let Some(first) = text.find(&['&', '<', '>', '"', '\''][..]) else {
        return Cow::Borrowed(text);
    };
    let mut out = String::with_capacity(text.len() + 16);
    out.push_str(&text[..first]);
    for ch in text[first..].chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(ch),
        }
    }
    Cow::Owned(out)
}

/// Reverses [`escape`]. Numeric character references are decoded as well;
/// any other entity passes through unchanged.
///
/// # Examples
///
/// ```
/// use xmlwright::serial::escape::unescape;
///
/// assert_eq!(unescape("&lt;a&gt; &#65;&#x42; &nbsp;"), "<a> AB &nbsp;");
/// ```
#[must_use]
pub fn unescape(text: &str) -> Cow<'_, str> {
    if !text.contains('&') {
        return Cow::Borrowed(text);
    }
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let candidate = &rest[amp..];
        match candidate.find(';').map(|end| &candidate[..=end]) {
            Some(reference) => match decode_reference(reference) {
                Some(ch) => {
                    out.push(ch);
                    rest = &candidate[reference.len()..];
                }
                None => {
                    out.push('&');
                    rest = &candidate[1..];
                }
            },
            None => {
                out.push_str(candidate);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    Cow::Owned(out)
}

/// Decodes `&name;`, `&#NNN;` or `&#xHHH;` to a single character.
fn decode_reference(reference: &str) -> Option<char> {
    match reference {
        "&amp;" => return Some('&'),
        "&lt;" => return Some('<'),
        "&gt;" => return Some('>'),
        "&quot;" => return Some('"'),
        "&apos;" => return Some('\''),
        _ => {}
    }
    let inner = reference.strip_prefix("&#")?.strip_suffix(';')?;
    let code_point = if let Some(hex) = inner.strip_prefix(|c: char| c == 'x' || c == 'X') {
        u32::from_str_radix(hex, 16).ok()?
    } else {
        inner.parse::<u32>().ok()?
    };
    char::from_u32(code_point)
}

/// Wraps text in a CDATA section.
///
/// Every `]]>` inside the text is split across two sections so the output
/// stays well-formed. Empty input yields an empty section.
///
/// # Examples
///
/// ```
/// use xmlwright::serial::escape::cdata;
///
/// assert_eq!(cdata("x < y"), "<![CDATA[x < y]]>");
/// assert_eq!(cdata(""), "<![CDATA[]]>");
/// assert_eq!(cdata("a]]>b"), "<![CDATA[a]]]]><![CDATA[>b]]>");
/// ```
#[must_use]
pub fn cdata(text: &str) -> Cow<'_, str> {
    let mut out = String::with_capacity(text.len() + CDATA_OPEN.len() + CDATA_CLOSE.len());
    out.push_str(CDATA_OPEN);
    let mut runs = text.split(CDATA_CLOSE).peekable();
    while let Some(run) = runs.next() {
        out.push_str(run);
        if runs.peek().is_some() {
            // "]]" closes this section, ">" opens the next one.
            out.push_str("]]");
            out.push_str(CDATA_CLOSE);
            out.push_str(CDATA_OPEN);
            out.push('>');
        }
    }
    out.push_str(CDATA_CLOSE);
    Cow::Owned(out)
}

/// Passes text through untouched.
#[must_use]
pub fn verbatim(text: &str) -> Cow<'_, str> {
    Cow::Borrowed(text)
}

/// Prepares comment text: each hyphen becomes `&#45;` and each line is
/// trimmed. Returns an empty string for blank input.
#[must_use]
pub fn comment_body(text: &str) -> String {
    text.lines()
        .map(|line| line.trim().replace('-', "&#45;"))
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_escape_all_predefined() {
        assert_eq!(escape(r#"<&>"'"#), "&lt;&amp;&gt;&quot;&apos;");
    }

    #[test]
    fn test_escape_borrows_clean_input() {
        assert!(matches!(escape("clean text"), Cow::Borrowed(_)));
        assert!(matches!(unescape("clean text"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_escape_existing_entity() {
        assert_eq!(escape("&amp;"), "&amp;amp;");
    }

    #[test]
    fn test_unescape_round_trip() {
        for s in [
            "",
            "   ",
            "\t\n",
            "&amp;",
            "&lt;tag&gt;",
            "a & b",
            "trailing &",
            "&;",
            "&#;",
            "&#xZZ;",
            "5 > 3 < 4",
            "'quoted' \"double\"",
            "ünïcödé & 日本",
        ] {
            assert_eq!(unescape(&escape(s)), s, "round trip of {s:?}");
        }
    }

    #[test]
    fn test_unescape_unknown_entity_passes_through() {
        assert_eq!(unescape("&nbsp;&copy;"), "&nbsp;&copy;");
        assert_eq!(unescape("a &b c"), "a &b c");
        assert_eq!(unescape("&&amp;"), "&&");
    }

    #[test]
    fn test_unescape_numeric() {
        assert_eq!(unescape("&#45;&#x2D;&#X2d;"), "---");
        assert_eq!(unescape("&#1114112;"), "&#1114112;");
    }

    #[test]
    fn test_escape_of_unescape_well_formed() {
        let s = "&lt;a href=&quot;x&quot;&gt;&amp;&apos;";
        assert_eq!(escape(&unescape(s)), s);
    }

    #[test]
    fn test_cdata_multiple_breaks() {
        assert_eq!(
            cdata("]]>]]>"),
            "<![CDATA[]]]]><![CDATA[>]]]]><![CDATA[>]]>"
        );
    }

    #[test]
    fn test_comment_body_hyphens() {
        let body = comment_body("a--b");
        assert_eq!(body, "a&#45;&#45;b");
        assert!(!body.contains("--"));
    }

    #[test]
    fn test_comment_body_trims_lines() {
        assert_eq!(comment_body("  one \n   two  "), "one\ntwo");
        assert_eq!(comment_body("   "), "");
    }

    proptest! {
        #[test]
        fn prop_unescape_reverses_escape(s in any::<String>()) {
            let escaped = escape(&s);
            prop_assert_eq!(unescape(&escaped), s.as_str());
        }

        #[test]
        fn prop_entity_heavy_text_round_trips(
            parts in prop::collection::vec(
                prop_oneof![
                    Just("&".to_string()),
                    Just(";".to_string()),
                    Just("#".to_string()),
                    Just("&amp;".to_string()),
                    Just("&#x41;".to_string()),
                    "[<>\"'a-z0-9 ]{0,4}",
                ],
                0..16
            )
        ) {
            let s = parts.concat();
            let escaped = escape(&s);
            prop_assert!(!escaped.contains(['<', '>', '"', '\'']));
            prop_assert_eq!(unescape(&escaped), s.as_str());
        }
    }
}
