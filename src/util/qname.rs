//! `QName` (qualified name) handling.
//!
//! A `QName` is a name of the form `prefix:localname` or just `localname` (with
//! no prefix). This module splits qualified names and checks them against the
//! `Name` production of XML 1.0 and the `QName` production of Namespaces in
//! XML 1.0.
//!
//! See <https://www.w3.org/TR/xml-names/#NT-QName>

/// The namespace bound to the reserved `xml` prefix.
pub const XML_NAMESPACE: &str = "http://www.w3.org/XML/1998/namespace";

/// The namespace of namespace declaration attributes (`xmlns`, `xmlns:*`).
pub const XMLNS_NAMESPACE: &str = "http://www.w3.org/2000/xmlns/";

/// The SVG namespace.
pub const SVG_NAMESPACE: &str = "http://www.w3.org/2000/svg";

/// The `XLink` namespace, used by SVG `xlink:href`.
pub const XLINK_NAMESPACE: &str = "http://www.w3.org/1999/xlink";

/// Splits a `QName` into its prefix and local name parts.
///
/// Returns `(Some(prefix), localname)` if the name contains a colon,
/// or `(None, localname)` if it does not.
///
/// # Examples
///
/// ```
/// use domcore::util::qname::split_qname;
///
/// assert_eq!(split_qname("svg:rect"), (Some("svg"), "rect"));
/// assert_eq!(split_qname("div"), (None, "div"));
/// ```
#[must_use]
pub fn split_qname(qname: &str) -> (Option<&str>, &str) {
    match qname.find(':') {
        Some(pos) => (Some(&qname[..pos]), &qname[pos + 1..]),
        None => (None, qname),
    }
}

/// Returns `true` if `c` is a valid `NameStartChar` per XML 1.0 §2.3 [4].
#[must_use]
pub fn is_name_start_char(c: char) -> bool {
    matches!(c,
        ':' | 'A'..='Z' | '_' | 'a'..='z' |
        '\u{C0}'..='\u{D6}' | '\u{D8}'..='\u{F6}' | '\u{F8}'..='\u{2FF}' |
        '\u{370}'..='\u{37D}' | '\u{37F}'..='\u{1FFF}' |
        '\u{200C}'..='\u{200D}' | '\u{2070}'..='\u{218F}' |
        '\u{2C00}'..='\u{2FEF}' | '\u{3001}'..='\u{D7FF}' |
        '\u{F900}'..='\u{FDCF}' | '\u{FDF0}'..='\u{FFFD}' |
        '\u{10000}'..='\u{EFFFF}'
    )
}

/// Returns `true` if `c` is a valid `NameChar` per XML 1.0 §2.3 [4a].
#[must_use]
pub fn is_name_char(c: char) -> bool {
    is_name_start_char(c)
        || matches!(c,
            '-' | '.' | '0'..='9' | '\u{B7}' |
            '\u{300}'..='\u{36F}' | '\u{203F}'..='\u{2040}'
        )
}

/// Returns `true` if `name` matches the XML 1.0 `Name` production.
#[must_use]
pub fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if is_name_start_char(first) => chars.all(is_name_char),
        _ => false,
    }
}

/// Returns `true` if `name` is a colon-free `Name` (an `NCName`).
#[must_use]
pub fn is_valid_ncname(name: &str) -> bool {
    !name.contains(':') && is_valid_name(name)
}

/// Validates that a name is a legal `QName` per Namespaces in XML 1.0 §4.
///
/// A `QName` has at most one colon, and neither prefix nor local part may be
/// empty. Returns an error message if invalid, or `None` if valid.
#[must_use]
pub fn validate_qname(name: &str) -> Option<&'static str> {
    let colon_count = name.chars().filter(|&c| c == ':').count();
    if colon_count > 1 {
        return Some("QName contains multiple colons");
    }
    if colon_count == 1 && (name.starts_with(':') || name.ends_with(':')) {
        return Some("QName has empty prefix or local part");
    }
    None
}
