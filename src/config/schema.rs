//! Configuration schema definitions.
//!
//! This module defines the structure of a cluster profile file.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

use crate::cluster::{NamedCluster, SiteFile};
use crate::security::PasswordCodec;

/// Root of a cluster profile file.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ProfileConfig {
    /// Logging settings for the command-line tool.
    pub logging: LoggingConfig,

    /// Named cluster definitions.
    pub clusters: Vec<ClusterConfig>,
}

impl ProfileConfig {
    /// Find a cluster definition by exact name.
    pub fn find(&self, name: &str) -> Option<&ClusterConfig> {
        self.clusters.iter().find(|c| c.name == name)
    }

    /// Build every defined cluster, decoding stored passwords with `codec`.
    pub fn to_clusters(&self, codec: &dyn PasswordCodec) -> Vec<NamedCluster> {
        self.clusters.iter().map(|c| c.to_cluster(codec)).collect()
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    pub level: String,

    /// Output layout.
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Compact,
        }
    }
}

/// Log output layout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Pretty,
}

/// One named cluster as written in a profile file.
///
/// Password fields hold the stored (encoded) form.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ClusterConfig {
    pub name: String,
    pub shim_identifier: String,

    /// Storage scheme; left unset to default from `mapr`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_scheme: Option<String>,

    pub hdfs_host: String,
    pub hdfs_port: String,
    pub hdfs_username: String,
    pub hdfs_password: String,
    pub job_tracker_host: String,
    pub job_tracker_port: String,
    pub zoo_keeper_host: String,
    pub zoo_keeper_port: String,
    pub oozie_url: String,

    /// Deprecated; prefer `storage_scheme = "maprfs"`.
    pub mapr: bool,

    pub gateway_url: String,
    pub gateway_username: String,
    pub gateway_password: String,
    pub use_gateway: bool,
    pub kafka_bootstrap_servers: String,

    /// Milliseconds since the Unix epoch; load time when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_modified_date: Option<i64>,

    pub site_files: Vec<SiteFile>,
}

impl ClusterConfig {
    /// Build the in-memory cluster, decoding stored passwords.
    pub fn to_cluster(&self, codec: &dyn PasswordCodec) -> NamedCluster {
        let mut cluster = NamedCluster::with_name(&self.name);
        cluster.set_shim_identifier(&self.shim_identifier);
        cluster.set_mapr(self.mapr);
        if let Some(scheme) = &self.storage_scheme {
            cluster.set_storage_scheme(scheme);
        }
        cluster.set_hdfs_host(&self.hdfs_host);
        cluster.set_hdfs_port(&self.hdfs_port);
        cluster.set_hdfs_username(&self.hdfs_username);
        cluster.set_hdfs_password(decode_secret(codec, &self.hdfs_password));
        cluster.set_job_tracker_host(&self.job_tracker_host);
        cluster.set_job_tracker_port(&self.job_tracker_port);
        cluster.set_zoo_keeper_host(&self.zoo_keeper_host);
        cluster.set_zoo_keeper_port(&self.zoo_keeper_port);
        cluster.set_oozie_url(&self.oozie_url);
        cluster.set_gateway_url(&self.gateway_url);
        cluster.set_gateway_username(&self.gateway_username);
        cluster.set_gateway_password(decode_secret(codec, &self.gateway_password));
        cluster.set_use_gateway(self.use_gateway);
        cluster.set_kafka_bootstrap_servers(&self.kafka_bootstrap_servers);
        if let Some(millis) = self.last_modified_date {
            cluster.set_last_modified_date(millis);
        }
        cluster.set_site_files(self.site_files.clone());
        cluster
    }

    /// Capture an in-memory cluster, encoding its passwords.
    pub fn from_cluster(cluster: &NamedCluster, codec: &dyn PasswordCodec) -> Self {
        Self {
            name: cluster.name().to_string(),
            shim_identifier: cluster.shim_identifier().to_string(),
            storage_scheme: Some(cluster.storage_scheme().to_string()),
            hdfs_host: cluster.hdfs_host().to_string(),
            hdfs_port: cluster.hdfs_port().to_string(),
            hdfs_username: cluster.hdfs_username().to_string(),
            hdfs_password: encode_secret(codec, cluster.hdfs_password()),
            job_tracker_host: cluster.job_tracker_host().to_string(),
            job_tracker_port: cluster.job_tracker_port().to_string(),
            zoo_keeper_host: cluster.zoo_keeper_host().to_string(),
            zoo_keeper_port: cluster.zoo_keeper_port().to_string(),
            oozie_url: cluster.oozie_url().to_string(),
            mapr: cluster.is_mapr(),
            gateway_url: cluster.gateway_url().to_string(),
            gateway_username: cluster.gateway_username().to_string(),
            gateway_password: encode_secret(codec, cluster.gateway_password()),
            use_gateway: cluster.use_gateway(),
            kafka_bootstrap_servers: cluster.kafka_bootstrap_servers().to_string(),
            last_modified_date: Some(cluster.last_modified_date()),
            site_files: cluster.site_files().to_vec(),
        }
    }
}

fn decode_secret(codec: &dyn PasswordCodec, stored: &str) -> String {
    if stored.is_empty() {
        String::new()
    } else {
        codec.decode(stored)
    }
}

fn encode_secret(codec: &dyn PasswordCodec, plaintext: &str) -> String {
    if plaintext.is_empty() {
        String::new()
    } else {
        codec.encode(plaintext)
    }
}
