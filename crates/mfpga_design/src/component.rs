//! Logical components and their computed resource requirements.

use crate::attachment::{Attachment, AttachmentCost};
use mfpga_common::{ComponentId, GroupId};
use mfpga_resource::ResourceInfo;
use serde::{Deserialize, Serialize};

/// A logical unit of a design that must be placed on exactly one FPGA.
///
/// The component's resource requirement is its own declared resources plus
/// the cost of every attachment's interface core. It is recomputed on every
/// query because attachments may change after construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Component {
    /// Assigned when the component is added to a [`Design`](crate::Design).
    pub id: ComponentId,
    /// Unique name within the design.
    pub name: String,
    /// Supported architecture families. Empty means every family.
    pub architectures: Vec<String>,
    /// Resources of the component core itself.
    pub own_resources: ResourceInfo,
    /// Interconnect attachments, one router port each.
    pub attachments: Vec<Attachment>,
    /// Whether the component is a design input (I/O source).
    pub is_input: bool,
    group: Option<GroupId>,
}

impl Component {
    /// Creates an ungrouped component with no attachments.
    pub fn new(name: impl Into<String>, own_resources: ResourceInfo) -> Self {
        Self {
            id: ComponentId::from_raw(0),
            name: name.into(),
            architectures: Vec::new(),
            own_resources,
            attachments: Vec::new(),
            is_input: false,
            group: None,
        }
    }

    /// Adds a supported architecture family.
    pub fn with_architecture(mut self, family: impl Into<String>) -> Self {
        self.architectures.push(family.into());
        self
    }

    /// Adds an interconnect attachment.
    pub fn with_attachment(mut self, attachment: Attachment) -> Self {
        self.attachments.push(attachment);
        self
    }

    /// Marks the component as a design input.
    pub fn as_input(mut self) -> Self {
        self.is_input = true;
        self
    }

    /// Own resources plus the interface cost of every attachment.
    pub fn resources(&self) -> ResourceInfo {
        let mut total = self.own_resources.clone();
        for attachment in &self.attachments {
            total.add(attachment.resources());
        }
        total
    }

    /// Number of router ports the component occupies once mapped.
    pub fn port_count(&self) -> u32 {
        self.attachments.len() as u32
    }

    /// Returns `true` if the component can be implemented on `family`.
    ///
    /// Family names compare case-insensitively.
    pub fn supports_architecture(&self, family: &str) -> bool {
        self.architectures.is_empty()
            || self
                .architectures
                .iter()
                .any(|a| a.eq_ignore_ascii_case(family))
    }

    /// The group that owns this component, if any.
    pub fn group(&self) -> Option<GroupId> {
        self.group
    }

    /// Returns `true` if the component belongs to a group.
    pub fn is_grouped(&self) -> bool {
        self.group.is_some()
    }

    pub(crate) fn join_group(&mut self, group: GroupId) {
        self.group = Some(group);
    }

    pub(crate) fn leave_group(&mut self) {
        self.group = None;
    }

    /// Clears group membership without updating the owning group.
    ///
    /// Only for cleanup when normal removal through the group is impossible.
    /// The owning group still lists this component afterwards, so the design
    /// must not be mapped again until it is rebuilt.
    pub fn force_clear_group(&mut self) {
        self.group = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attachment::{BridgeAttachment, NifAttachment};

    fn nif(name: &str, lut: u64) -> NifAttachment {
        NifAttachment {
            name: name.to_string(),
            nif: "nif".to_string(),
            resources: ResourceInfo::new().with("LUT", lut),
        }
    }

    #[test]
    fn resources_include_attachments() {
        let c = Component::new("dma", ResourceInfo::new().with("LUT", 100).with("FF", 40))
            .with_attachment(Attachment::Sap(nif("ctrl", 5)))
            .with_attachment(Attachment::Bridge(BridgeAttachment {
                name: "up".to_string(),
                bridge: "b".to_string(),
                resources: ResourceInfo::new().with("LUT", 20).with("BRAM", 1),
            }));
        let r = c.resources();
        assert_eq!(r.get("LUT"), 125);
        assert_eq!(r.get("FF"), 40);
        assert_eq!(r.get("BRAM"), 1);
        assert_eq!(c.port_count(), 2);
    }

    #[test]
    fn resources_follow_attachment_changes() {
        let mut c = Component::new("dma", ResourceInfo::new().with("LUT", 10));
        assert_eq!(c.resources().get("LUT"), 10);
        c.attachments.push(Attachment::Edge(nif("io", 3)));
        assert_eq!(c.resources().get("LUT"), 13);
    }

    #[test]
    fn empty_architectures_support_everything() {
        let c = Component::new("x", ResourceInfo::new());
        assert!(c.supports_architecture("artix7"));
        let c = c.with_architecture("ECP5");
        assert!(c.supports_architecture("ecp5"));
        assert!(!c.supports_architecture("artix7"));
    }

    #[test]
    fn force_clear_group() {
        let mut c = Component::new("x", ResourceInfo::new());
        c.join_group(GroupId::from_raw(3));
        assert_eq!(c.group(), Some(GroupId::from_raw(3)));
        c.force_clear_group();
        assert!(!c.is_grouped());
    }
}
