//! Inline XML embedding of named clusters.
//!
//! # Data Flow
//! ```text
//! Encode:
//!     NamedCluster
//!     → attributes.rs (ordered descriptor table, getters)
//!     → codec.rs (stringify, encode passwords, build element tree)
//!     → xml.rs (serialize, no prolog)
//!     → "<root><child><id>..</id><value>..</value><type>..</type></child>..</root>"
//!
//! Decode:
//!     XML text
//!     → xml.rs (parse root element, prolog ignored)
//!     → codec.rs (clone base cluster, walk <child> entries)
//!     → attributes.rs (identifier → setter)
//!     → NamedCluster
//! ```
//!
//! # Design Decisions
//! - Field order and names come from a static table, never from reflection
//! - Unknown identifiers are skipped and logged so newer writers stay readable
//! - Failures degrade: encode yields "", decode yields the unmodified clone
//! - Parser and writer state live only for the duration of one call

pub mod attributes;
pub mod codec;
pub mod xml;

use thiserror::Error;

pub use attributes::{Accessor, Attribute, FieldError, ATTRIBUTES};
pub use codec::EmbedCodec;
pub use xml::XmlElement;

/// Error type for embedded XML handling.
#[derive(Debug, Error)]
pub enum EmbedError {
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("XML escape error: {0}")]
    Escape(#[from] quick_xml::escape::EscapeError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialized XML is not valid UTF-8")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("document has no root element")]
    NoRoot,

    #[error("unbalanced element tags")]
    Unbalanced,

    #[error("invalid root tag {0:?}")]
    InvalidTag(String),
}
