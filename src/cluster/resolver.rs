//! Path-to-URL resolution against a named cluster.
//!
//! # Responsibilities
//! - Choose the addressing mode (gateway, maprfs, default)
//! - Re-root relative paths under the cluster base URI
//! - Keep `${..}` placeholders of the incoming path intact
//!
//! # Design Decisions
//! - Placeholders are masked with `/` only in a scratch copy used to find the
//!   authority boundary; the returned path is cut from the unmasked copy
//! - A path whose variables expand to a fully qualified URL is not re-rooted
//! - Prefix checks only, no regex

use thiserror::Error;
use url::Url;

use crate::cluster::named_cluster::NamedCluster;
use crate::cluster::{has_scheme, KNOWN_SCHEMES, MAPRFS_SCHEME, NC_SCHEME};
use crate::variables::space::Layered;
use crate::variables::VariableSpace;

/// Reasons a path cannot be resolved.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("cannot parse {uri}: {source}")]
    Parse {
        uri: String,
        #[source]
        source: url::ParseError,
    },

    #[error("{0} has no authority section")]
    NoAuthority(String),

    #[error("authority of {0} does not line up with the incoming path")]
    Misaligned(String),

    #[error("{0} has an empty port")]
    EmptyPort(String),
}

/// Resolves incoming paths for one cluster and one variable context.
pub struct UrlResolver<'a> {
    cluster: &'a NamedCluster,
    variables: Option<&'a dyn VariableSpace>,
}

impl<'a> UrlResolver<'a> {
    pub fn new(cluster: &'a NamedCluster, variables: Option<&'a dyn VariableSpace>) -> Self {
        Self { cluster, variables }
    }

    /// Resolve `incoming` into an absolute cluster URL.
    ///
    /// Returns `None` only when a rewrite was attempted and failed.
    pub fn resolve(&self, incoming: &str) -> Option<String> {
        if self.cluster.use_gateway() {
            return Some(self.resolve_gateway(incoming));
        }

        let layered = self
            .variables
            .map(|primary| Layered::new(primary, &**self.cluster.variables()));
        let variables = layered.as_ref().map(|l| l as &dyn VariableSpace);

        if self.cluster.is_mapr() {
            let url = self.resolve_logged(incoming, MAPRFS_SCHEME, variables)?;
            if has_scheme(&url, MAPRFS_SCHEME) {
                return Some(url);
            }
            return Some(format!("{}://{}", MAPRFS_SCHEME, url));
        }

        let scheme = self.cluster.storage_scheme();
        self.resolve_logged(incoming, scheme, variables)
    }

    fn resolve_gateway(&self, incoming: &str) -> String {
        if has_scheme(incoming, NC_SCHEME) {
            return incoming.to_string();
        }
        let path = incoming.trim_start_matches('/');
        format!("{}://{}/{}", NC_SCHEME, self.cluster.name(), path)
    }

    fn resolve_logged(
        &self,
        incoming: &str,
        scheme: &str,
        variables: Option<&dyn VariableSpace>,
    ) -> Option<String> {
        match self.resolve_against(incoming, scheme, variables) {
            Ok(url) => Some(url),
            Err(e) => {
                tracing::error!(
                    cluster = %self.cluster.name(),
                    incoming = %incoming,
                    error = %e,
                    "Could not resolve path against cluster"
                );
                None
            }
        }
    }

    /// Re-root `incoming` under the base URI built for `scheme`.
    pub fn resolve_against(
        &self,
        incoming: &str,
        scheme: &str,
        variables: Option<&dyn VariableSpace>,
    ) -> Result<String, ResolveError> {
        let base = if scheme == MAPRFS_SCHEME {
            None
        } else {
            self.cluster.generate_url(scheme, variables)
        };

        let Some(base) = base else {
            tracing::debug!(cluster = %self.cluster.name(), "No cluster URI, leaving path unchanged");
            return Ok(incoming.to_string());
        };
        if self.cluster.is_hdfs_host_empty(variables) {
            tracing::debug!(cluster = %self.cluster.name(), "Cluster host unset, leaving path unchanged");
            return Ok(incoming.to_string());
        }
        if incoming == "/" {
            return Ok(base);
        }

        let masked = mask_placeholders(incoming);
        let (scratch, qualified) =
            if has_scheme(incoming, scheme) || has_scheme(incoming, NC_SCHEME) {
                (masked, incoming.to_string())
            } else {
                (format!("{base}{masked}"), format!("{base}{incoming}"))
            };

        let root_len = root_uri_len(&scratch)?;
        let path = qualified
            .get(root_len - 1..)
            .ok_or_else(|| ResolveError::Misaligned(qualified.clone()))?;

        let expanded = match variables {
            Some(variables) => variables.environment_substitute(path),
            None => path.to_string(),
        };
        let already_qualified = KNOWN_SCHEMES
            .iter()
            .any(|known| expanded.starts_with(&format!("{known}://")));

        if already_qualified {
            Ok(path.to_string())
        } else {
            Ok(format!("{base}{path}"))
        }
    }
}

/// Replace placeholder characters so a URI parser sees plain path segments.
fn mask_placeholders(path: &str) -> String {
    path.chars()
        .map(|c| if matches!(c, '$' | '{' | '}') { '/' } else { c })
        .collect()
}

/// Length of `scheme://authority/` in `uri`, counting the slash that opens the
/// path even when the path is empty.
fn root_uri_len(uri: &str) -> Result<usize, ResolveError> {
    let parsed = Url::parse(uri).map_err(|source| ResolveError::Parse {
        uri: uri.to_string(),
        source,
    })?;

    let authority_start = parsed.scheme().len() + "://".len();
    let separator = uri.get(parsed.scheme().len()..authority_start);
    if separator != Some("://") {
        return Err(ResolveError::NoAuthority(uri.to_string()));
    }

    let authority_len = uri[authority_start..]
        .find(['/', '?', '#'])
        .unwrap_or(uri.len() - authority_start);
    if uri[authority_start..authority_start + authority_len].ends_with(':') {
        return Err(ResolveError::EmptyPort(uri.to_string()));
    }
    Ok(authority_start + authority_len + 1)
}
