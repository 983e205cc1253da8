//! Shared cluster fixtures for integration tests.

use std::collections::HashMap;

use named_cluster::NamedCluster;

/// An HDFS cluster at `nn1:8020`.
pub fn hdfs_cluster(name: &str) -> NamedCluster {
    let mut cluster = NamedCluster::with_name(name);
    cluster.set_storage_scheme("hdfs");
    cluster.set_hdfs_host("nn1");
    cluster.set_hdfs_port("8020");
    cluster
}

/// A cluster routed through the gateway.
#[allow(dead_code)]
pub fn gateway_cluster(name: &str) -> NamedCluster {
    let mut cluster = NamedCluster::with_name(name);
    cluster.set_gateway_url("https://gw.example.com:8443/gateway");
    cluster.set_gateway_username("admin");
    cluster.set_gateway_password("gw-secret");
    cluster.set_use_gateway(true);
    cluster
}

/// A cluster with every attribute populated.
#[allow(dead_code)]
pub fn full_cluster(name: &str) -> NamedCluster {
    let mut cluster = hdfs_cluster(name);
    cluster.set_shim_identifier("cdh61");
    cluster.set_hdfs_username("hdfs");
    cluster.set_hdfs_password("hdfs-secret");
    cluster.set_job_tracker_host("rm1");
    cluster.set_job_tracker_port("8032");
    cluster.set_zoo_keeper_host("zk1,zk2");
    cluster.set_zoo_keeper_port("2181");
    cluster.set_oozie_url("http://oozie:11000/oozie");
    cluster.set_gateway_url("https://gw.example.com:8443/gateway");
    cluster.set_gateway_username("admin");
    cluster.set_gateway_password("gw-secret");
    cluster.set_kafka_bootstrap_servers("k1:9092,k2:9092");
    cluster.set_last_modified_date(1_700_000_000_000);
    cluster.add_site_file("core-site.xml", "<configuration>\n  <property/>\n</configuration>");
    cluster.add_site_file("hdfs-site.xml", "<configuration/>");
    cluster
}

/// A variable map built from pairs.
#[allow(dead_code)]
pub fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}
