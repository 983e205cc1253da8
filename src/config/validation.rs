//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Reject blank and duplicate cluster names
//! - Check that ports are numbers or variable references
//! - Check the log level
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ProfileConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;

use thiserror::Error;

use crate::config::schema::{ClusterConfig, ProfileConfig};
use crate::variables::uses_variables;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// A single semantic problem in a profile.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("cluster #{index} has a blank name")]
    BlankName { index: usize },

    #[error("cluster {0:?} is defined more than once")]
    DuplicateName(String),

    #[error("cluster {cluster:?}: {field} {value:?} is neither a port nor a variable")]
    InvalidPort {
        cluster: String,
        field: &'static str,
        value: String,
    },

    #[error("unknown log level {0:?}")]
    InvalidLogLevel(String),
}

/// Validate a parsed profile, collecting every problem found.
pub fn validate_config(config: &ProfileConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let level = config.logging.level.trim().to_ascii_lowercase();
    if !level.is_empty() && !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ValidationError::InvalidLogLevel(config.logging.level.clone()));
    }

    let mut seen = HashSet::new();
    for (index, cluster) in config.clusters.iter().enumerate() {
        if cluster.name.trim().is_empty() {
            errors.push(ValidationError::BlankName { index });
        } else if !seen.insert(cluster.name.as_str()) {
            errors.push(ValidationError::DuplicateName(cluster.name.clone()));
        }
        check_ports(cluster, &mut errors);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_ports(cluster: &ClusterConfig, errors: &mut Vec<ValidationError>) {
    let ports = [
        ("hdfs_port", &cluster.hdfs_port),
        ("job_tracker_port", &cluster.job_tracker_port),
        ("zoo_keeper_port", &cluster.zoo_keeper_port),
    ];
    for (field, value) in ports {
        let trimmed = value.trim();
        if trimmed.is_empty() || uses_variables(trimmed) || trimmed.parse::<u16>().is_ok() {
            continue;
        }
        errors.push(ValidationError::InvalidPort {
            cluster: cluster.name.clone(),
            field,
            value: value.clone(),
        });
    }
}
