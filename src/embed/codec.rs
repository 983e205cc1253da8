//! Encoding and decoding of the embed format.

use tracing::{error, warn};

use crate::cluster::{NamedCluster, SiteFile};
use crate::embed::attributes::{attribute, Accessor, ATTRIBUTES};
use crate::embed::xml::XmlElement;
use crate::embed::EmbedError;
use crate::security::{PasswordCodec, SeededPasswordCodec};

pub const CHILD: &str = "child";
pub const CHILDREN: &str = "children";
pub const ID: &str = "id";
pub const VALUE: &str = "value";
pub const TYPE: &str = "type";
pub const STRING_TYPE: &str = "String";

/// `value` written for the site file list wrapper.
pub const SITE_FILE_TYPE: &str = "SiteFile";
pub const SITE_FILE_CONTENTS: &str = "siteFileContents";
pub const SITE_FILE_NAME: &str = "siteFileName";

/// Identifiers older writers emit that carry nothing to restore.
const IGNORED_IDS: [&str; 2] = ["class", "parentVariableSpace"];

/// Converts clusters to and from inline XML.
#[derive(Clone, Copy)]
pub struct EmbedCodec<'a> {
    passwords: &'a dyn PasswordCodec,
}

impl Default for EmbedCodec<'static> {
    fn default() -> Self {
        Self {
            passwords: &SeededPasswordCodec,
        }
    }
}

impl<'a> EmbedCodec<'a> {
    pub fn new(passwords: &'a dyn PasswordCodec) -> Self {
        Self { passwords }
    }

    /// Serialize `cluster` under `root_tag`, or `""` on failure.
    pub fn to_xml(&self, cluster: &NamedCluster, root_tag: &str) -> String {
        match self.try_to_xml(cluster, root_tag) {
            Ok(xml) => xml,
            Err(e) => {
                error!(cluster = %cluster.name(), error = %e, "Could not build embedded cluster xml");
                String::new()
            }
        }
    }

    pub fn try_to_xml(&self, cluster: &NamedCluster, root_tag: &str) -> Result<String, EmbedError> {
        if !is_valid_tag(root_tag) {
            return Err(EmbedError::InvalidTag(root_tag.to_string()));
        }
        self.to_element(cluster, root_tag).to_xml_string()
    }

    /// Build the element tree for `cluster`.
    pub fn to_element(&self, cluster: &NamedCluster, root_tag: &str) -> XmlElement {
        let mut root = XmlElement::new(root_tag);
        for attr in ATTRIBUTES.iter() {
            let field = match attr.accessor {
                Accessor::SiteFiles => field_element(
                    attr.id,
                    SITE_FILE_TYPE,
                    Some(site_files_element(cluster.site_files())),
                ),
                Accessor::Scalar { get, .. } => {
                    let mut value = get(cluster);
                    if attr.is_secret() && !value.is_empty() {
                        value = self.passwords.encode(&value);
                    }
                    field_element(attr.id, &value, None)
                }
            };
            root.push(field);
        }
        root
    }

    /// Parse `xml` and apply it over a copy of `base`.
    ///
    /// Unparseable input yields the unmodified copy.
    pub fn from_xml(&self, base: &NamedCluster, xml: &str) -> NamedCluster {
        match XmlElement::parse(xml) {
            Ok(root) => self.from_element(base, &root),
            Err(e) => {
                error!(error = %e, "Could not parse embedded cluster xml");
                base.clone()
            }
        }
    }

    /// Apply the `<child>` entries of `root` over a copy of `base`.
    ///
    /// Identifiers absent from `root` keep the values of `base`.
    pub fn from_element(&self, base: &NamedCluster, root: &XmlElement) -> NamedCluster {
        let mut cluster = base.clone();
        for field in root.children_named(CHILD) {
            let Some(id) = field.child_text(ID).map(str::trim) else {
                warn!("Embedded cluster field has no id, skipping");
                continue;
            };
            if IGNORED_IDS.contains(&id) {
                continue;
            }
            let Some(attr) = attribute(id) else {
                warn!(field = %id, "Unknown embedded cluster field, skipping");
                continue;
            };

            match attr.accessor {
                Accessor::SiteFiles => cluster.set_site_files(decode_site_files(field)),
                Accessor::Scalar { set, .. } => {
                    let raw = field.child_text(VALUE).unwrap_or_default();
                    let value = if attr.is_secret() {
                        self.passwords.decode(raw)
                    } else {
                        raw.to_string()
                    };
                    if let Err(e) = set(&mut cluster, &value) {
                        warn!(field = %id, error = %e, "Could not set field in embedded cluster");
                    }
                }
            }
        }
        cluster
    }
}

impl NamedCluster {
    /// Inline XML for embedding in a job definition, or `""` on failure.
    pub fn to_xml_for_embed(&self, root_tag: &str) -> String {
        EmbedCodec::default().to_xml(self, root_tag)
    }

    /// A copy of this cluster overwritten with the fields found in `xml`.
    pub fn from_xml_for_embed(&self, xml: &str) -> NamedCluster {
        EmbedCodec::default().from_xml(self, xml)
    }
}

fn field_element(id: &str, value: &str, children: Option<XmlElement>) -> XmlElement {
    let mut field = XmlElement::new(CHILD);
    field.push(XmlElement::leaf(ID, id));
    field.push(XmlElement::leaf(VALUE, value));
    field.push(XmlElement::leaf(TYPE, STRING_TYPE));
    if let Some(children) = children {
        field.push(children);
    }
    field
}

fn site_files_element(site_files: &[SiteFile]) -> XmlElement {
    let mut wrapper = XmlElement::new(CHILDREN);
    for (index, site_file) in site_files.iter().enumerate() {
        let mut leaves = XmlElement::new(CHILDREN);
        leaves.push(field_element(SITE_FILE_CONTENTS, &site_file.content, None));
        leaves.push(field_element(SITE_FILE_NAME, &site_file.name, None));
        wrapper.push(field_element(&index.to_string(), "", Some(leaves)));
    }
    wrapper
}

fn decode_site_files(field: &XmlElement) -> Vec<SiteFile> {
    match field.child(CHILDREN) {
        Some(wrapper) => wrapper.children_named(CHILD).map(decode_site_file).collect(),
        None => Vec::new(),
    }
}

fn decode_site_file(entry: &XmlElement) -> SiteFile {
    let mut site_file = SiteFile::default();
    let Some(leaves) = entry.child(CHILDREN) else {
        return site_file;
    };
    for leaf in leaves.children_named(CHILD) {
        let value = leaf.child_text(VALUE).unwrap_or_default().to_string();
        match leaf.child_text(ID).map(str::trim) {
            Some(SITE_FILE_CONTENTS) | Some("content") => site_file.content = value,
            Some(SITE_FILE_NAME) | Some("name") => site_file.name = value,
            Some("") | None => {}
            Some(other) => warn!(field = %other, "Unknown site file field, skipping"),
        }
    }
    site_file
}

fn is_valid_tag(tag: &str) -> bool {
    let mut chars = tag.chars();
    match chars.next() {
        Some(first) if first.is_alphabetic() || first == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | '.' | ':'))
}
