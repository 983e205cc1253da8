//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → tracing events (error!/warn!/debug!) with structured fields
//!
//! Consumers:
//!     → logging.rs subscriber (stderr, compact or pretty)
//! ```
//!
//! # Design Decisions
//! - Library code only emits events; installing a subscriber is the binary's job
//! - `RUST_LOG` overrides the configured level
//! - Failures that degrade to a safe default are logged, never raised

pub mod logging;

pub use logging::init_logging;
