//! DOM feature queries (`Node.isSupported`).
//!
//! The answer comes from a fixed table: this crate implements the Core
//! module and the XML extensions (CDATA sections, entity references,
//! processing instructions, document types) for DOM Levels 1 through 3.

use tracing::trace;

use crate::tree::{Dom, NodeId};

/// Feature names and the versions reported for each.
const SUPPORTED: &[(&str, &[&str])] = &[
    ("core", &["1.0", "2.0", "3.0"]),
    ("xml", &["1.0", "2.0", "3.0"]),
];

/// Returns `true` if `feature` is implemented at `version`.
///
/// Feature names compare case-insensitively. An empty version matches any
/// supported version of the feature.
///
/// # Examples
///
/// ```
/// use domcore::features::has_feature;
///
/// assert!(has_feature("Core", "2.0"));
/// assert!(has_feature("xml", ""));
/// assert!(!has_feature("Events", "2.0"));
/// ```
#[must_use]
pub fn has_feature(feature: &str, version: &str) -> bool {
    SUPPORTED.iter().any(|(name, versions)| {
        name.eq_ignore_ascii_case(feature) && (version.is_empty() || versions.contains(&version))
    })
}

impl Dom {
    /// Returns `true` if this implementation supports `feature` at
    /// `version`. See [`has_feature`].
    #[must_use]
    pub fn is_supported(feature: &str, version: &str) -> bool {
        has_feature(feature, version)
    }

    /// The per-node form of [`is_supported`](Dom::is_supported). Every node
    /// type reports the same table.
    #[must_use]
    pub fn is_supported_feature(&self, id: NodeId, feature: &str, version: &str) -> bool {
        let supported = has_feature(feature, version);
        trace!(node_type = %self.node_type(id), feature, version, supported, "feature query");
        supported
    }
}
