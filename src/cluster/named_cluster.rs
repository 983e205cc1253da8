//! The named cluster entity.

use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::io::Cursor;
use std::sync::{Arc, OnceLock};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::cluster::resolver::UrlResolver;
use crate::cluster::site_file::SiteFile;
use crate::cluster::uri::ClusterUriBuilder;
use crate::cluster::{HDFS_SCHEME, MAPRFS_SCHEME};
use crate::security::{PasswordCodec, SeededPasswordCodec};
use crate::variables::syntax::{is_variable, variable_name};
use crate::variables::{VariableSpace, Variables};

/// How `replace_meta_with` treats the target's existing site files.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SiteFileMerge {
    /// Drop the target's site files and copy the source's.
    #[default]
    Replace,
    /// Keep the target's site files and append copies of the source's.
    Append,
}

/// A reusable, named description of how to address a cluster.
///
/// Text fields use the empty string for "unset". Passwords are held in
/// plaintext and only encoded when the cluster is serialized.
#[derive(Debug)]
pub struct NamedCluster {
    name: String,
    shim_identifier: String,
    storage_scheme: OnceLock<String>,
    hdfs_host: String,
    hdfs_port: String,
    hdfs_username: String,
    hdfs_password: String,
    job_tracker_host: String,
    job_tracker_port: String,
    zoo_keeper_host: String,
    zoo_keeper_port: String,
    oozie_url: String,
    mapr: bool,
    gateway_url: String,
    gateway_username: String,
    gateway_password: String,
    use_gateway: bool,
    kafka_bootstrap_servers: String,
    last_modified_date: i64,
    site_files: Vec<SiteFile>,
    variables: Arc<Variables>,
}

impl Default for NamedCluster {
    fn default() -> Self {
        Self {
            name: String::new(),
            shim_identifier: String::new(),
            storage_scheme: OnceLock::new(),
            hdfs_host: String::new(),
            hdfs_port: String::new(),
            hdfs_username: String::new(),
            hdfs_password: String::new(),
            job_tracker_host: String::new(),
            job_tracker_port: String::new(),
            zoo_keeper_host: String::new(),
            zoo_keeper_port: String::new(),
            oozie_url: String::new(),
            mapr: false,
            gateway_url: String::new(),
            gateway_username: String::new(),
            gateway_password: String::new(),
            use_gateway: false,
            kafka_bootstrap_servers: String::new(),
            last_modified_date: now_millis(),
            site_files: Vec::new(),
            variables: Arc::new(Variables::new()),
        }
    }
}

impl NamedCluster {
    /// Create an empty cluster with a fresh, parent-less variable space.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(name: impl Into<String>) -> Self {
        let mut cluster = Self::new();
        cluster.name = name.into();
        cluster
    }

    /// Copy every field of `other` into this cluster and stamp the
    /// modification time. Site files are replaced.
    pub fn replace_meta(&mut self, other: &NamedCluster) {
        self.replace_meta_with(other, SiteFileMerge::Replace);
    }

    pub fn replace_meta_with(&mut self, other: &NamedCluster, merge: SiteFileMerge) {
        self.name = other.name.clone();
        self.shim_identifier = other.shim_identifier.clone();
        self.set_storage_scheme(other.storage_scheme());
        self.hdfs_host = other.hdfs_host.clone();
        self.hdfs_port = other.hdfs_port.clone();
        self.hdfs_username = other.hdfs_username.clone();
        self.hdfs_password = other.hdfs_password.clone();
        self.job_tracker_host = other.job_tracker_host.clone();
        self.job_tracker_port = other.job_tracker_port.clone();
        self.zoo_keeper_host = other.zoo_keeper_host.clone();
        self.zoo_keeper_port = other.zoo_keeper_port.clone();
        self.oozie_url = other.oozie_url.clone();
        self.set_mapr(other.is_mapr());
        self.gateway_url = other.gateway_url.clone();
        self.gateway_username = other.gateway_username.clone();
        self.gateway_password = other.gateway_password.clone();
        self.use_gateway = other.use_gateway;
        self.kafka_bootstrap_servers = other.kafka_bootstrap_servers.clone();
        self.last_modified_date = now_millis();
        if merge == SiteFileMerge::Replace {
            self.site_files.clear();
        }
        self.site_files.extend(other.site_files.iter().cloned());
    }

    /// Resolve `path` into an absolute cluster URL.
    ///
    /// Returns the path unchanged when the cluster is not configured well
    /// enough to rewrite it, and `None` when rewriting failed.
    pub fn resolve(&self, path: &str, variables: Option<&dyn VariableSpace>) -> Option<String> {
        UrlResolver::new(self, variables).resolve(path)
    }

    /// Base URI of this cluster for `scheme`, or `None` if it cannot be built.
    pub fn generate_url(&self, scheme: &str, variables: Option<&dyn VariableSpace>) -> Option<String> {
        ClusterUriBuilder::new(scheme)
            .host(&self.hdfs_host)
            .port(&self.hdfs_port)
            .username(&self.hdfs_username)
            .password(&self.hdfs_password)
            .variables(variables)
            .build()
    }

    /// The host after variable resolution, or `None` when it references a
    /// variable that cannot be resolved.
    pub fn host_name_parsed(&self, variables: Option<&dyn VariableSpace>) -> Option<String> {
        if is_variable(&self.hdfs_host) {
            return variables.and_then(|v| v.get_variable(variable_name(&self.hdfs_host)));
        }
        Some(self.hdfs_host.trim().to_string())
    }

    pub fn is_hdfs_host_empty(&self, variables: Option<&dyn VariableSpace>) -> bool {
        self.host_name_parsed(variables)
            .map_or(true, |host| host.trim().is_empty())
    }

    // Site files

    pub fn site_files(&self) -> &[SiteFile] {
        &self.site_files
    }

    pub fn site_files_mut(&mut self) -> &mut Vec<SiteFile> {
        &mut self.site_files
    }

    pub fn set_site_files(&mut self, site_files: Vec<SiteFile>) {
        self.site_files = site_files;
    }

    pub fn add_site_file(&mut self, name: impl Into<String>, content: impl Into<String>) {
        self.site_files.push(SiteFile::new(name, content));
    }

    pub fn push_site_file(&mut self, site_file: SiteFile) {
        self.site_files.push(site_file);
    }

    /// First site file with exactly this name.
    pub fn find_site_file(&self, name: &str) -> Option<&SiteFile> {
        self.site_files.iter().find(|file| file.name == name)
    }

    /// A reader over the content of the first site file with this name.
    pub fn site_file_reader(&self, name: &str) -> Option<Cursor<Vec<u8>>> {
        self.find_site_file(name)
            .map(|file| Cursor::new(file.content.clone().into_bytes()))
    }

    // Variables

    /// The variable space this cluster reads from.
    pub fn variables(&self) -> &Arc<Variables> {
        &self.variables
    }

    /// Point this cluster at a space owned elsewhere.
    pub fn share_variables_with(&mut self, variables: Arc<Variables>) {
        self.variables = variables;
    }

    pub fn initialize_variables_from(&self, parent: Option<Arc<Variables>>) {
        self.variables.initialize_variables_from(parent);
    }

    pub fn copy_variables_from(&self, other: &dyn VariableSpace) {
        self.variables.copy_variables_from(other);
    }

    pub fn inject_variables(&self, values: &HashMap<String, String>) {
        self.variables.inject_variables(values);
    }

    pub fn set_variable(&self, name: impl Into<String>, value: impl Into<String>) {
        self.variables.set_variable(name, value);
    }

    pub fn get_variable(&self, name: &str) -> Option<String> {
        self.variables.get_variable(name)
    }

    pub fn list_variables(&self) -> Vec<String> {
        self.variables.list_variables()
    }

    pub fn environment_substitute(&self, text: &str) -> String {
        self.variables.environment_substitute(text)
    }

    pub fn boolean_value_of_variable(&self, expression: &str, default: bool) -> bool {
        self.variables.boolean_value_of_variable(expression, default)
    }

    // Passwords

    pub fn encode_password(&self, password: &str) -> String {
        SeededPasswordCodec.encode(password)
    }

    pub fn decode_password(&self, password: &str) -> String {
        SeededPasswordCodec.decode(password)
    }

    // Fields

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn shim_identifier(&self) -> &str {
        &self.shim_identifier
    }

    pub fn set_shim_identifier(&mut self, shim_identifier: impl Into<String>) {
        self.shim_identifier = shim_identifier.into();
    }

    /// The storage scheme, defaulting (once) to `maprfs` for legacy MapR
    /// clusters and `hdfs` otherwise.
    pub fn storage_scheme(&self) -> &str {
        self.storage_scheme.get_or_init(|| {
            if self.mapr {
                MAPRFS_SCHEME.to_string()
            } else {
                HDFS_SCHEME.to_string()
            }
        })
    }

    /// Set the storage scheme; an empty value unsets it.
    pub fn set_storage_scheme(&mut self, storage_scheme: impl Into<String>) {
        let storage_scheme = storage_scheme.into();
        self.storage_scheme = OnceLock::new();
        if !storage_scheme.is_empty() {
            let _ = self.storage_scheme.set(storage_scheme);
        }
    }

    /// Legacy MapR flag, superseded by the storage scheme once one is known.
    pub fn is_mapr(&self) -> bool {
        match self.storage_scheme.get() {
            Some(scheme) => scheme == MAPRFS_SCHEME,
            None => self.mapr,
        }
    }

    pub fn set_mapr(&mut self, mapr: bool) {
        self.mapr = mapr;
        if mapr {
            self.set_storage_scheme(MAPRFS_SCHEME);
        }
    }

    pub fn hdfs_host(&self) -> &str {
        &self.hdfs_host
    }

    pub fn set_hdfs_host(&mut self, hdfs_host: impl Into<String>) {
        self.hdfs_host = hdfs_host.into();
    }

    pub fn hdfs_port(&self) -> &str {
        &self.hdfs_port
    }

    pub fn set_hdfs_port(&mut self, hdfs_port: impl Into<String>) {
        self.hdfs_port = hdfs_port.into();
    }

    pub fn hdfs_username(&self) -> &str {
        &self.hdfs_username
    }

    pub fn set_hdfs_username(&mut self, hdfs_username: impl Into<String>) {
        self.hdfs_username = hdfs_username.into();
    }

    /// Plaintext HDFS password.
    pub fn hdfs_password(&self) -> &str {
        &self.hdfs_password
    }

    pub fn set_hdfs_password(&mut self, hdfs_password: impl Into<String>) {
        self.hdfs_password = hdfs_password.into();
    }

    pub fn job_tracker_host(&self) -> &str {
        &self.job_tracker_host
    }

    pub fn set_job_tracker_host(&mut self, job_tracker_host: impl Into<String>) {
        self.job_tracker_host = job_tracker_host.into();
    }

    pub fn job_tracker_port(&self) -> &str {
        &self.job_tracker_port
    }

    pub fn set_job_tracker_port(&mut self, job_tracker_port: impl Into<String>) {
        self.job_tracker_port = job_tracker_port.into();
    }

    pub fn zoo_keeper_host(&self) -> &str {
        &self.zoo_keeper_host
    }

    pub fn set_zoo_keeper_host(&mut self, zoo_keeper_host: impl Into<String>) {
        self.zoo_keeper_host = zoo_keeper_host.into();
    }

    pub fn zoo_keeper_port(&self) -> &str {
        &self.zoo_keeper_port
    }

    pub fn set_zoo_keeper_port(&mut self, zoo_keeper_port: impl Into<String>) {
        self.zoo_keeper_port = zoo_keeper_port.into();
    }

    pub fn oozie_url(&self) -> &str {
        &self.oozie_url
    }

    pub fn set_oozie_url(&mut self, oozie_url: impl Into<String>) {
        self.oozie_url = oozie_url.into();
    }

    pub fn gateway_url(&self) -> &str {
        &self.gateway_url
    }

    pub fn set_gateway_url(&mut self, gateway_url: impl Into<String>) {
        self.gateway_url = gateway_url.into();
    }

    pub fn gateway_username(&self) -> &str {
        &self.gateway_username
    }

    pub fn set_gateway_username(&mut self, gateway_username: impl Into<String>) {
        self.gateway_username = gateway_username.into();
    }

    /// Plaintext gateway password.
    pub fn gateway_password(&self) -> &str {
        &self.gateway_password
    }

    pub fn set_gateway_password(&mut self, gateway_password: impl Into<String>) {
        self.gateway_password = gateway_password.into();
    }

    pub fn use_gateway(&self) -> bool {
        self.use_gateway
    }

    pub fn set_use_gateway(&mut self, use_gateway: bool) {
        self.use_gateway = use_gateway;
    }

    pub fn kafka_bootstrap_servers(&self) -> &str {
        &self.kafka_bootstrap_servers
    }

    pub fn set_kafka_bootstrap_servers(&mut self, kafka_bootstrap_servers: impl Into<String>) {
        self.kafka_bootstrap_servers = kafka_bootstrap_servers.into();
    }

    /// Milliseconds since the Unix epoch.
    pub fn last_modified_date(&self) -> i64 {
        self.last_modified_date
    }

    pub fn set_last_modified_date(&mut self, last_modified_date: i64) {
        self.last_modified_date = last_modified_date;
    }
}

/// Full copy with its own, fresh variable space.
impl Clone for NamedCluster {
    fn clone(&self) -> Self {
        let mut copy = NamedCluster::new();
        copy.replace_meta(self);
        copy
    }
}

impl PartialEq for NamedCluster {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for NamedCluster {}

impl Hash for NamedCluster {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl fmt::Display for NamedCluster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Named cluster: {}", self.name)
    }
}

fn now_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or_default()
}
