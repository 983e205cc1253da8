//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Serialization boundary (XML embed, profile file):
//!     plaintext in memory
//!     → password.rs encode ("Encrypted <hex>")
//!     → stored form on the wire
//!
//! Load boundary:
//!     stored form
//!     → password.rs decode (marker → decrypt, else legacy Base64)
//!     → plaintext in memory
//! ```
//!
//! # Design Decisions
//! - Secrets are plaintext only in memory; every persisted form is encoded
//! - Encoding is idempotent: marker-carrying values are never re-encoded
//! - Values that reference variables are stored as-is and resolved at use time
//! - Decoding never fails; undecodable input is returned unchanged

pub mod password;

pub use password::{PasswordCodec, SeededPasswordCodec, PASSWORD_ENCRYPTED_PREFIX};
