//! Variable substitution subsystem.
//!
//! # Data Flow
//! ```text
//! Raw field value ("${NAMENODE_HOST}", "/data/%%DAY%%")
//!     → syntax.rs (recognise references, extract names)
//!     → space.rs (look names up: own values → parent chain)
//!     → substituted string (unresolved references left in place)
//! ```
//!
//! # Design Decisions
//! - Three reference forms: `${name}`, `%%name%%`, `$[hex,hex]`
//! - Unknown names are never an error; the reference stays verbatim
//! - A `Variables` space is shared through `Arc`, never owned exclusively
//! - Parent links give hierarchical fallback without copying

pub mod space;
pub mod syntax;

pub use space::{RowField, VariableSpace, Variables};
pub use syntax::{is_variable, uses_variables, variable_name};
