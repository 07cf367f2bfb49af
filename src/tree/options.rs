//! Options controlling how strictly a [`Dom`](super::Dom) validates names.

/// Construction-time checks applied by a [`Dom`](super::Dom).
///
/// Use the builder pattern to configure options:
///
/// ```
/// use domcore::tree::DomOptions;
///
/// let opts = DomOptions::default()
///     .strict_names(false)
///     .namespace_checks(true);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DomOptions {
    /// If true, element, attribute, PI target, entity reference and doctype
    /// names must match the XML 1.0 `Name` production. If false, they only
    /// need to be non-empty.
    pub strict_names: bool,
    /// If true, namespace-aware constructors and `set_prefix` enforce the
    /// Namespaces in XML rules for the `xml` and `xmlns` prefixes.
    pub namespace_checks: bool,
}

impl Default for DomOptions {
    fn default() -> Self {
        Self {
            strict_names: true,
            namespace_checks: true,
        }
    }
}

impl DomOptions {
    /// Enables or disables XML `Name` validation.
    #[must_use]
    pub fn strict_names(mut self, yes: bool) -> Self {
        self.strict_names = yes;
        self
    }

    /// Enables or disables namespace well-formedness checks.
    #[must_use]
    pub fn namespace_checks(mut self, yes: bool) -> Self {
        self.namespace_checks = yes;
        self
    }
}
