//! Cluster profile configuration.
//!
//! # Data Flow
//! ```text
//! profile file (TOML)
//!     → loader.rs (read & deserialize)
//!     → validation.rs (semantic checks)
//!     → ProfileConfig (validated)
//!     → ClusterConfig::to_cluster (decode stored passwords)
//!     → NamedCluster values for the caller's registry
//! ```
//!
//! # Design Decisions
//! - All fields have defaults to allow minimal profiles
//! - Validation separates syntactic (serde) from semantic checks
//! - Passwords are stored encoded in the file and decoded on load

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{ClusterConfig, LogFormat, LoggingConfig, ProfileConfig};
pub use validation::{validate_config, ValidationError};
