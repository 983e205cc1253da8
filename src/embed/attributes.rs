//! The ordered table of embeddable cluster attributes.
//!
//! Identifiers are the wire names used by existing job definitions and must
//! not change.

use thiserror::Error;

use crate::cluster::NamedCluster;

/// A value that a setter could not accept.
#[derive(Debug, Error)]
pub enum FieldError {
    #[error("expected a boolean, found {0:?}")]
    Boolean(String),

    #[error("expected an integer, found {0:?}")]
    Integer(String),
}

/// How an attribute is read from and written to a cluster.
#[derive(Clone, Copy)]
pub enum Accessor {
    /// A single value rendered as text.
    Scalar {
        get: fn(&NamedCluster) -> String,
        set: fn(&mut NamedCluster, &str) -> Result<(), FieldError>,
    },
    /// The nested site file list.
    SiteFiles,
}

/// One embeddable attribute.
#[derive(Clone, Copy)]
pub struct Attribute {
    pub id: &'static str,
    pub accessor: Accessor,
}

impl Attribute {
    /// Attributes whose identifier mentions a password are encoded on the wire.
    pub fn is_secret(&self) -> bool {
        self.id.to_ascii_lowercase().contains("password")
    }
}

impl std::fmt::Debug for Attribute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Attribute").field("id", &self.id).finish()
    }
}

/// Every embeddable attribute, in wire order.
///
/// `mapr` precedes `storageScheme` so an explicit scheme wins over the legacy
/// flag on decode.
pub static ATTRIBUTES: [Attribute; 20] = [
    Attribute {
        id: "name",
        accessor: Accessor::Scalar {
            get: |c| c.name().to_string(),
            set: |c, v| {
                c.set_name(v);
                Ok(())
            },
        },
    },
    Attribute {
        id: "shimIdentifier",
        accessor: Accessor::Scalar {
            get: |c| c.shim_identifier().to_string(),
            set: |c, v| {
                c.set_shim_identifier(v);
                Ok(())
            },
        },
    },
    Attribute {
        id: "mapr",
        accessor: Accessor::Scalar {
            get: |c| c.is_mapr().to_string(),
            set: |c, v| {
                c.set_mapr(parse_flag(v)?);
                Ok(())
            },
        },
    },
    Attribute {
        id: "storageScheme",
        accessor: Accessor::Scalar {
            get: |c| c.storage_scheme().to_string(),
            set: |c, v| {
                c.set_storage_scheme(v);
                Ok(())
            },
        },
    },
    Attribute {
        id: "hdfsHost",
        accessor: Accessor::Scalar {
            get: |c| c.hdfs_host().to_string(),
            set: |c, v| {
                c.set_hdfs_host(v);
                Ok(())
            },
        },
    },
    Attribute {
        id: "hdfsPort",
        accessor: Accessor::Scalar {
            get: |c| c.hdfs_port().to_string(),
            set: |c, v| {
                c.set_hdfs_port(v);
                Ok(())
            },
        },
    },
    Attribute {
        id: "hdfsUsername",
        accessor: Accessor::Scalar {
            get: |c| c.hdfs_username().to_string(),
            set: |c, v| {
                c.set_hdfs_username(v);
                Ok(())
            },
        },
    },
    Attribute {
        id: "hdfsPassword",
        accessor: Accessor::Scalar {
            get: |c| c.hdfs_password().to_string(),
            set: |c, v| {
                c.set_hdfs_password(v);
                Ok(())
            },
        },
    },
    Attribute {
        id: "jobTrackerHost",
        accessor: Accessor::Scalar {
            get: |c| c.job_tracker_host().to_string(),
            set: |c, v| {
                c.set_job_tracker_host(v);
                Ok(())
            },
        },
    },
    Attribute {
        id: "jobTrackerPort",
        accessor: Accessor::Scalar {
            get: |c| c.job_tracker_port().to_string(),
            set: |c, v| {
                c.set_job_tracker_port(v);
                Ok(())
            },
        },
    },
    Attribute {
        id: "zooKeeperHost",
        accessor: Accessor::Scalar {
            get: |c| c.zoo_keeper_host().to_string(),
            set: |c, v| {
                c.set_zoo_keeper_host(v);
                Ok(())
            },
        },
    },
    Attribute {
        id: "zooKeeperPort",
        accessor: Accessor::Scalar {
            get: |c| c.zoo_keeper_port().to_string(),
            set: |c, v| {
                c.set_zoo_keeper_port(v);
                Ok(())
            },
        },
    },
    Attribute {
        id: "oozieUrl",
        accessor: Accessor::Scalar {
            get: |c| c.oozie_url().to_string(),
            set: |c, v| {
                c.set_oozie_url(v);
                Ok(())
            },
        },
    },
    Attribute {
        id: "gatewayUrl",
        accessor: Accessor::Scalar {
            get: |c| c.gateway_url().to_string(),
            set: |c, v| {
                c.set_gateway_url(v);
                Ok(())
            },
        },
    },
    Attribute {
        id: "gatewayUsername",
        accessor: Accessor::Scalar {
            get: |c| c.gateway_username().to_string(),
            set: |c, v| {
                c.set_gateway_username(v);
                Ok(())
            },
        },
    },
    Attribute {
        id: "gatewayPassword",
        accessor: Accessor::Scalar {
            get: |c| c.gateway_password().to_string(),
            set: |c, v| {
                c.set_gateway_password(v);
                Ok(())
            },
        },
    },
    Attribute {
        id: "useGateway",
        accessor: Accessor::Scalar {
            get: |c| c.use_gateway().to_string(),
            set: |c, v| {
                c.set_use_gateway(parse_flag(v)?);
                Ok(())
            },
        },
    },
    Attribute {
        id: "kafkaBootstrapServers",
        accessor: Accessor::Scalar {
            get: |c| c.kafka_bootstrap_servers().to_string(),
            set: |c, v| {
                c.set_kafka_bootstrap_servers(v);
                Ok(())
            },
        },
    },
    Attribute {
        id: "lastModifiedDate",
        accessor: Accessor::Scalar {
            get: |c| c.last_modified_date().to_string(),
            set: |c, v| {
                let millis: i64 = v
                    .trim()
                    .parse()
                    .map_err(|_| FieldError::Integer(v.to_string()))?;
                c.set_last_modified_date(millis);
                Ok(())
            },
        },
    },
    Attribute {
        id: "siteFiles",
        accessor: Accessor::SiteFiles,
    },
];

/// Look up an attribute by its wire identifier.
pub fn attribute(id: &str) -> Option<&'static Attribute> {
    ATTRIBUTES.iter().find(|a| a.id == id)
}

fn parse_flag(value: &str) -> Result<bool, FieldError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "y" | "yes" | "on" | "1" => Ok(true),
        "false" | "n" | "no" | "off" | "0" | "" => Ok(false),
        _ => Err(FieldError::Boolean(value.to_string())),
    }
}
