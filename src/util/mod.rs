//! Utility modules.
//!
//! Contains XML name validation and `QName` handling.

pub mod qname;
