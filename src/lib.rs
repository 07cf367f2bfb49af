//! # domcore
//!
//! A W3C DOM Core node tree for Rust: typed nodes in an arena, structural
//! mutation with the DOM's hierarchy rules, namespace-aware naming,
//! per-element attribute maps, cloning, importing and text normalization.
//!
//! The tree is the substrate for document consumers such as an SVG parser
//! or renderer. It has no parser or serializer of its own.
//!
//! ## Quick Start
//!
//! ```
//! use domcore::{Dom, DomError};
//!
//! # fn main() -> Result<(), DomError> {
//! let mut dom = Dom::new();
//! let doc = dom.create_document();
//!
//! let svg = dom.create_element(doc, "svg")?;
//! let title = dom.create_element(doc, "title")?;
//! let text = dom.create_text_node(doc, "Hello")?;
//! dom.append_child(doc, svg)?;
//! dom.append_child(svg, title)?;
//! dom.append_child(title, text)?;
//! dom.set_attribute(svg, "width", "100")?;
//!
//! assert_eq!(dom.document_element(doc), Some(svg));
//! assert_eq!(dom.text_content(svg).as_deref(), Some("Hello"));
//! assert_eq!(dom.get_attribute(svg, "width"), Some("100"));
//!
//! // A document accepts only one element child.
//! let extra = dom.create_element(doc, "svg")?;
//! assert!(dom.append_child(doc, extra).is_err());
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod features;
pub mod tree;
pub mod util;

// Re-export primary types at the crate root for convenience.
pub use error::{DomError, DomResult};
pub use tree::{Dom, DomOptions, NodeId, NodeKind, NodeType, QualifiedName};
