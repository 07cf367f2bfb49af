//! Error types for tree construction and mutation.
//!
//! Every failure maps onto one of the W3C `DOMException` conditions, and
//! [`DomError::code`] returns the numeric code the DOM standard assigns to
//! it. All checks run before a tree is touched, so an `Err` always means
//! the tree is exactly as it was before the call.

use thiserror::Error;

use crate::tree::NodeType;

/// The error type returned by fallible tree operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomError {
    /// A mutation would break the tree shape: a cycle, children on a leaf
    /// node, a disallowed child type, or a reference node that is not a
    /// child of the target.
    #[error("hierarchy request error: {0}")]
    HierarchyRequest(String),

    /// The node was created by a different document than the one it is
    /// being inserted into.
    #[error("wrong document: node is owned by a different document")]
    WrongDocument,

    /// A name does not match the XML `Name` production, or a fixed-name
    /// node type was given some other name.
    #[error("invalid character in name `{0}`")]
    InvalidCharacter(String),

    /// A value was supplied for, or set on, a node type that carries none.
    #[error("no data allowed: {0} nodes carry no value")]
    NoDataAllowed(NodeType),

    /// The referenced child or attribute is not where the caller said it is.
    #[error("not found: {0}")]
    NotFound(String),

    /// The operation is not available for this node type.
    #[error("not supported: {0}")]
    NotSupported(String),

    /// The attribute node is already owned by another element.
    #[error("attribute is already in use by another element")]
    InUseAttribute,

    /// A namespace-qualified name breaks the Namespaces in XML rules.
    #[error("namespace error: {0}")]
    Namespace(String),

    /// A value-bearing node type was constructed without a value.
    #[error("missing value: {0} nodes require a value")]
    MissingValue(NodeType),
}

impl DomError {
    /// Returns the `DOMException` code for this error.
    ///
    /// `MissingValue` has no dedicated DOM code and reports
    /// `TYPE_MISMATCH_ERR` (17).
    #[must_use]
    pub fn code(&self) -> u16 {
        match self {
            Self::HierarchyRequest(_) => 3,
            Self::WrongDocument => 4,
            Self::InvalidCharacter(_) => 5,
            Self::NoDataAllowed(_) => 6,
            Self::NotFound(_) => 8,
            Self::NotSupported(_) => 9,
            Self::InUseAttribute => 10,
            Self::Namespace(_) => 14,
            Self::MissingValue(_) => 17,
        }
    }

    /// Returns `true` for the structural failures (`HierarchyRequest`,
    /// `WrongDocument`, `NotFound`) raised by the four mutation operations.
    #[must_use]
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            Self::HierarchyRequest(_) | Self::WrongDocument | Self::NotFound(_)
        )
    }
}

/// Convenience alias for results carrying a [`DomError`].
pub type DomResult<T> = Result<T, DomError>;
