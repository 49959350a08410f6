//! Interconnect attachments of a component.
//!
//! A component reaches the on-chip interconnect through attachments. Each one
//! occupies one router port once the component is mapped, and each one adds
//! the cost of its network interface (NIF) or bridge to the component's
//! resource requirement.

use mfpga_resource::ResourceInfo;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The type tag of an [`Attachment`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttachmentKind {
    /// Slave access point.
    Sap,
    /// Slave output point.
    Sop,
    /// Bridge to another interconnect.
    Bridge,
    /// Edge (boundary) connection.
    Edge,
}

impl fmt::Display for AttachmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttachmentKind::Sap => write!(f, "sap"),
            AttachmentKind::Sop => write!(f, "sop"),
            AttachmentKind::Bridge => write!(f, "bridge"),
            AttachmentKind::Edge => write!(f, "edge"),
        }
    }
}

/// An attachment that reaches the interconnect through a network interface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NifAttachment {
    /// Attachment name, unique within its component.
    pub name: String,
    /// Name of the network interface core.
    pub nif: String,
    /// Resource cost of the network interface.
    #[serde(default)]
    pub resources: ResourceInfo,
}

/// An attachment that reaches the interconnect through a bridge core.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BridgeAttachment {
    /// Attachment name, unique within its component.
    pub name: String,
    /// Name of the bridge core.
    pub bridge: String,
    /// Resource cost of the bridge.
    #[serde(default)]
    pub resources: ResourceInfo,
}

/// A typed attachment of a component to the on-chip interconnect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Attachment {
    /// Slave access point.
    Sap(NifAttachment),
    /// Slave output point.
    Sop(NifAttachment),
    /// Bridge to another interconnect.
    Bridge(BridgeAttachment),
    /// Edge connection.
    Edge(NifAttachment),
}

impl Attachment {
    /// Returns the type tag.
    pub fn kind(&self) -> AttachmentKind {
        match self {
            Attachment::Sap(_) => AttachmentKind::Sap,
            Attachment::Sop(_) => AttachmentKind::Sop,
            Attachment::Bridge(_) => AttachmentKind::Bridge,
            Attachment::Edge(_) => AttachmentKind::Edge,
        }
    }

    /// Returns the attachment name.
    pub fn name(&self) -> &str {
        match self {
            Attachment::Sap(a) | Attachment::Sop(a) | Attachment::Edge(a) => &a.name,
            Attachment::Bridge(b) => &b.name,
        }
    }
}

/// A key/value pair consumed by hardware-project emitters when instantiating
/// the interface core of an attachment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigArtifact {
    /// Parameter name.
    pub key: String,
    /// Parameter value.
    pub value: String,
}

impl ConfigArtifact {
    fn new(key: &str, value: impl Into<String>) -> Self {
        Self {
            key: key.to_string(),
            value: value.into(),
        }
    }
}

/// Capability interface shared by every attachment variant.
pub trait AttachmentCost {
    /// Returns the resources this attachment adds to its component.
    fn resources(&self) -> &ResourceInfo;

    /// Returns the parameters needed to instantiate the attachment's
    /// interface core.
    fn configuration_artifacts(&self) -> Vec<ConfigArtifact>;
}

impl AttachmentCost for Attachment {
    fn resources(&self) -> &ResourceInfo {
        match self {
            Attachment::Sap(a) | Attachment::Sop(a) | Attachment::Edge(a) => &a.resources,
            Attachment::Bridge(b) => &b.resources,
        }
    }

    fn configuration_artifacts(&self) -> Vec<ConfigArtifact> {
        let kind = self.kind().to_string();
        match self {
            Attachment::Sap(a) | Attachment::Sop(a) => vec![
                ConfigArtifact::new("kind", kind),
                ConfigArtifact::new("port", &a.name),
                ConfigArtifact::new("nif", &a.nif),
            ],
            Attachment::Edge(a) => vec![
                ConfigArtifact::new("kind", kind),
                ConfigArtifact::new("port", &a.name),
                ConfigArtifact::new("nif", &a.nif),
                ConfigArtifact::new("boundary", "true"),
            ],
            Attachment::Bridge(b) => vec![
                ConfigArtifact::new("kind", kind),
                ConfigArtifact::new("port", &b.name),
                ConfigArtifact::new("bridge", &b.bridge),
            ],
        }
    }
}
