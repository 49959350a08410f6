//! Groups (subsystems) of components that are mapped as a unit.

use crate::component::Component;
use mfpga_common::{Arena, ComponentId, FpgaId, GroupId};
use mfpga_resource::ResourceInfo;
use serde::{Deserialize, Serialize};

/// The FPGA a group is mapped to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupTarget {
    /// ID of the target FPGA in its platform.
    pub fpga: FpgaId,
    /// Name of the target FPGA, kept for error messages.
    pub name: String,
}

/// A set of components that must be mapped and unmapped together.
///
/// Membership is a list of component IDs; the group does not own the
/// components themselves. Membership changes through [`Group::add`] and
/// [`Group::remove`] do no dependency checking. Use
/// [`Design::add_to_group`](crate::Design::add_to_group) to keep the
/// components' back-references in sync.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    /// Assigned when the group is added to a [`Design`](crate::Design).
    pub id: GroupId,
    /// Group name.
    pub name: String,
    members: Vec<ComponentId>,
    target: Option<GroupTarget>,
}

impl Group {
    /// Creates an empty, unmapped group.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: GroupId::from_raw(0),
            name: name.into(),
            members: Vec::new(),
            target: None,
        }
    }

    /// Member components in insertion order.
    pub fn members(&self) -> &[ComponentId] {
        &self.members
    }

    /// Returns `true` if `component` is a member.
    pub fn contains(&self, component: ComponentId) -> bool {
        self.members.contains(&component)
    }

    /// Number of members.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Returns `true` if the group has no members.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Adds a member. Returns `false` if it was already present.
    pub fn add(&mut self, component: ComponentId) -> bool {
        if self.contains(component) {
            return false;
        }
        self.members.push(component);
        true
    }

    /// Removes a member. Returns `false` if it was not present.
    pub fn remove(&mut self, component: ComponentId) -> bool {
        let before = self.members.len();
        self.members.retain(|&m| m != component);
        self.members.len() != before
    }

    /// Moves every member of `other` into `self` (deduplicated) and leaves
    /// `other` empty.
    pub fn merge_with(&mut self, other: &mut Group) {
        for member in std::mem::take(&mut other.members) {
            self.add(member);
        }
    }

    /// Returns `true` if the member sets intersect.
    pub fn shares_member_with(&self, other: &Group) -> bool {
        self.members.iter().any(|m| other.contains(*m))
    }

    /// Sum of every member's resource requirement.
    pub fn required_resources(&self, components: &Arena<ComponentId, Component>) -> ResourceInfo {
        let mut total = ResourceInfo::new();
        for &id in &self.members {
            total.add(&components[id].resources());
        }
        total
    }

    /// Total number of router ports the members occupy.
    pub fn port_count(&self, components: &Arena<ComponentId, Component>) -> u32 {
        self.members
            .iter()
            .map(|&id| components[id].port_count())
            .sum()
    }

    /// Returns `true` if the group is bound to an FPGA.
    pub fn is_mapped(&self) -> bool {
        self.target.is_some()
    }

    /// The FPGA the group is mapped to, if any.
    pub fn target(&self) -> Option<&GroupTarget> {
        self.target.as_ref()
    }

    /// ID of the FPGA the group is mapped to, if any.
    pub fn target_fpga(&self) -> Option<FpgaId> {
        self.target.as_ref().map(|t| t.fpga)
    }

    /// Binds the group to an FPGA. Called by the FPGA mapping transaction.
    pub fn set_target(&mut self, target: GroupTarget) {
        self.target = Some(target);
    }

    /// Clears the mapping. Called by the FPGA unmapping transaction.
    pub fn clear_target(&mut self) {
        self.target = None;
    }
}
