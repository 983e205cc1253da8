//! Auxiliary configuration files bundled with a cluster.

use serde::{Deserialize, Serialize};

/// A named text fragment, e.g. `core-site.xml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct SiteFile {
    pub name: String,
    #[serde(default)]
    pub content: String,
}

impl SiteFile {
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }
}
