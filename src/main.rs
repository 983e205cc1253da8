//! Named cluster command-line tool.
//!
//! Works against a TOML profile file of named clusters:
//!
//! ```text
//! named-cluster --config clusters.toml list
//! named-cluster --config clusters.toml resolve clusterA /data/${DAY} --var DAY=2024-01-01
//! named-cluster --config clusters.toml export clusterA --root-tag NamedCluster
//! named-cluster --config clusters.toml import clusterA embedded.xml
//! named-cluster encrypt 's3cret'
//! ```

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use serde_json::json;

use named_cluster::config::{load_config, ClusterConfig, ConfigError, LoggingConfig, ProfileConfig};
use named_cluster::observability::init_logging;
use named_cluster::{NamedCluster, PasswordCodec, SeededPasswordCodec, Variables};

#[derive(Parser)]
#[command(name = "named-cluster")]
#[command(about = "Resolve paths and embed named cluster profiles", long_about = None)]
struct Cli {
    /// Cluster profile file.
    #[arg(short, long, default_value = "clusters.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the clusters defined in the profile
    List,
    /// Print one cluster as JSON (passwords encoded)
    Show { name: String },
    /// Resolve a path against a cluster
    Resolve {
        name: String,
        path: String,
        /// Variable for substitution, as KEY=VALUE (repeatable)
        #[arg(long = "var", value_parser = parse_key_val)]
        vars: Vec<(String, String)>,
    },
    /// Print a cluster as inline XML
    Export {
        name: String,
        #[arg(long, default_value = "NamedCluster")]
        root_tag: String,
    },
    /// Apply inline XML over a cluster and print the result as JSON
    Import { name: String, file: PathBuf },
    /// Print the stored form of a password
    Encrypt { password: String },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let codec = SeededPasswordCodec;

    match cli.command {
        Commands::List => {
            let profile = open_profile(&cli.config)?;
            let clusters: Vec<_> = profile
                .to_clusters(&codec)
                .iter()
                .map(|c| {
                    json!({
                        "name": c.name(),
                        "storage_scheme": c.storage_scheme(),
                        "host": c.hdfs_host(),
                        "use_gateway": c.use_gateway(),
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&clusters)?);
        }
        Commands::Show { name } => {
            let profile = open_profile(&cli.config)?;
            let cluster = find_cluster(&profile, &name, &codec)?;
            let config = ClusterConfig::from_cluster(&cluster, &codec);
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
        Commands::Resolve { name, path, vars } => {
            let profile = open_profile(&cli.config)?;
            let cluster = find_cluster(&profile, &name, &codec)?;
            let variables = Variables::new();
            variables.inject_variables(&vars.into_iter().collect::<HashMap<_, _>>());
            match cluster.resolve(&path, Some(&variables)) {
                Some(url) => println!("{}", url),
                None => return Err(format!("could not resolve {path} against {name}").into()),
            }
        }
        Commands::Export { name, root_tag } => {
            let profile = open_profile(&cli.config)?;
            let cluster = find_cluster(&profile, &name, &codec)?;
            let xml = cluster.to_xml_for_embed(&root_tag);
            if xml.is_empty() {
                return Err(format!("could not export {name}").into());
            }
            println!("{}", xml);
        }
        Commands::Import { name, file } => {
            let profile = open_profile(&cli.config)?;
            let base = find_cluster(&profile, &name, &codec)?;
            let xml = fs::read_to_string(&file)?;
            let cluster = base.from_xml_for_embed(&xml);
            let config = ClusterConfig::from_cluster(&cluster, &codec);
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
        Commands::Encrypt { password } => {
            init_logging(&LoggingConfig::default());
            println!("{}", codec.encode(&password));
        }
    }

    Ok(())
}

/// Load the profile and install logging as it configures.
fn open_profile(path: &Path) -> Result<ProfileConfig, ConfigError> {
    let profile = load_config(path)?;
    init_logging(&profile.logging);
    tracing::debug!(
        config = ?path,
        clusters = profile.clusters.len(),
        "Profile loaded"
    );
    Ok(profile)
}

fn find_cluster(
    profile: &ProfileConfig,
    name: &str,
    codec: &dyn PasswordCodec,
) -> Result<NamedCluster, String> {
    profile
        .find(name)
        .map(|c| c.to_cluster(codec))
        .ok_or_else(|| format!("no cluster named {name:?}"))
}

fn parse_key_val(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, found {s:?}"))?;
    Ok((key.to_string(), value.to_string()))
}
