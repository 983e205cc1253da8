//! Named cluster profiles: path resolution and inline XML embedding.

pub mod cluster;
pub mod config;
pub mod embed;
pub mod observability;
pub mod security;
pub mod variables;

pub use cluster::{NamedCluster, SiteFile, SiteFileMerge};
pub use config::ProfileConfig;
pub use embed::EmbedCodec;
pub use security::{PasswordCodec, SeededPasswordCodec};
pub use variables::{VariableSpace, Variables};
