//! The design container: components, connections and groups in arenas.

use crate::component::Component;
use crate::connection::Connection;
use crate::group::Group;
use mfpga_common::{Arena, ComponentId, ConnectionId, GroupId, MappingError};
use mfpga_resource::ResourceInfo;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The logical side of a mapping problem.
///
/// Components, connections and groups are stored in append-only arenas, so
/// their IDs stay valid for the lifetime of the design. Groups emptied by a
/// merge stay in the arena with no members.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Design {
    components: Arena<ComponentId, Component>,
    connections: Arena<ConnectionId, Connection>,
    groups: Arena<GroupId, Group>,
    /// Auxiliary index: component name to ID (rebuilt on deserialization).
    #[serde(skip)]
    component_by_name: HashMap<String, ComponentId>,
    /// Auxiliary index: group name to ID (rebuilt on deserialization).
    #[serde(skip)]
    group_by_name: HashMap<String, GroupId>,
}

impl Design {
    /// Creates an empty design.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a component and returns its ID. Any group state on the incoming
    /// component is discarded.
    pub fn add_component(&mut self, mut component: Component) -> ComponentId {
        let id = self.components.next_id();
        component.id = id;
        component.leave_group();
        self.component_by_name.insert(component.name.clone(), id);
        self.components.alloc(component)
    }

    /// Adds a connection between two components and returns its ID.
    pub fn add_connection(
        &mut self,
        from: ComponentId,
        to: ComponentId,
        data_density: f64,
    ) -> ConnectionId {
        let id = self.connections.next_id();
        self.connections.alloc(Connection {
            id,
            from,
            to,
            data_density,
        })
    }

    /// Adds an empty group and returns its ID.
    pub fn add_group(&mut self, name: impl Into<String>) -> GroupId {
        let id = self.groups.next_id();
        let mut group = Group::new(name);
        group.id = id;
        self.group_by_name.insert(group.name.clone(), id);
        self.groups.alloc(group)
    }

    /// Adds `component` to `group` and marks it grouped.
    ///
    /// Idempotent if the component is already in `group`. Fails with
    /// [`MappingError::ComponentAlreadyGrouped`] if it belongs to another
    /// group.
    pub fn add_to_group(
        &mut self,
        group: GroupId,
        component: ComponentId,
    ) -> Result<(), MappingError> {
        match self.components[component].group() {
            Some(current) if current == group => return Ok(()),
            Some(current) => {
                return Err(MappingError::ComponentAlreadyGrouped {
                    component: self.components[component].name.clone(),
                    group: self.groups[current].name.clone(),
                });
            }
            None => {}
        }
        self.groups[group].add(component);
        self.components[component].join_group(group);
        Ok(())
    }

    /// Removes `component` from `group` and clears its membership.
    ///
    /// Returns `false` if the component was not a member.
    pub fn remove_from_group(&mut self, group: GroupId, component: ComponentId) -> bool {
        if !self.groups[group].remove(component) {
            return false;
        }
        if self.components[component].group() == Some(group) {
            self.components[component].leave_group();
        }
        true
    }

    /// Moves every member of `from` into `into`, leaving `from` empty.
    ///
    /// Mapped groups cannot be merged: their resources are already accounted
    /// on an FPGA.
    pub fn merge_groups(&mut self, into: GroupId, from: GroupId) -> Result<(), MappingError> {
        if into == from {
            return Ok(());
        }
        for id in [into, from] {
            if let Some(target) = self.groups[id].target() {
                return Err(MappingError::GroupAlreadyMapped {
                    group: self.groups[id].name.clone(),
                    target: target.name.clone(),
                });
            }
        }
        let mut donor = std::mem::replace(&mut self.groups[from], Group::new(""));
        for &member in donor.members() {
            self.components[member].join_group(into);
        }
        self.groups[into].merge_with(&mut donor);
        self.groups[from] = donor;
        Ok(())
    }

    /// Returns `true` if the two groups have a member in common.
    pub fn shares_member(&self, a: GroupId, b: GroupId) -> bool {
        self.groups[a].shares_member_with(&self.groups[b])
    }

    /// Returns the component with the given ID.
    pub fn component(&self, id: ComponentId) -> &Component {
        &self.components[id]
    }

    /// Returns a mutable reference to the component with the given ID.
    pub fn component_mut(&mut self, id: ComponentId) -> &mut Component {
        &mut self.components[id]
    }

    /// Looks up a component by name.
    pub fn component_by_name(&self, name: &str) -> Option<ComponentId> {
        self.component_by_name.get(name).copied()
    }

    /// All components.
    pub fn components(&self) -> &Arena<ComponentId, Component> {
        &self.components
    }

    /// Returns the connection with the given ID.
    pub fn connection(&self, id: ConnectionId) -> &Connection {
        &self.connections[id]
    }

    /// All connections.
    pub fn connections(&self) -> &Arena<ConnectionId, Connection> {
        &self.connections
    }

    /// Returns the group with the given ID.
    pub fn group(&self, id: GroupId) -> &Group {
        &self.groups[id]
    }

    /// Returns a mutable reference to the group with the given ID.
    pub fn group_mut(&mut self, id: GroupId) -> &mut Group {
        &mut self.groups[id]
    }

    /// Looks up a group by name.
    pub fn group_by_name(&self, name: &str) -> Option<GroupId> {
        self.group_by_name.get(name).copied()
    }

    /// All groups, including ones emptied by merges.
    pub fn groups(&self) -> &Arena<GroupId, Group> {
        &self.groups
    }

    /// IDs of groups that have at least one member.
    pub fn non_empty_groups(&self) -> impl Iterator<Item = GroupId> + '_ {
        self.groups
            .iter()
            .filter(|(_, g)| !g.is_empty())
            .map(|(id, _)| id)
    }

    /// Sum of the member requirements of `group`.
    pub fn required_resources(&self, group: GroupId) -> ResourceInfo {
        self.groups[group].required_resources(&self.components)
    }

    /// Router ports needed by the members of `group`.
    pub fn group_port_count(&self, group: GroupId) -> u32 {
        self.groups[group].port_count(&self.components)
    }

    /// Returns `true` if every member of `group` supports `family`.
    pub fn group_supports_architecture(&self, group: GroupId, family: &str) -> bool {
        self.groups[group]
            .members()
            .iter()
            .all(|&c| self.components[c].supports_architecture(family))
    }

    /// Returns `true` if `group` contains an input component.
    pub fn group_has_input(&self, group: GroupId) -> bool {
        self.groups[group]
            .members()
            .iter()
            .any(|&c| self.components[c].is_input)
    }

    /// Components that do not belong to any group.
    pub fn ungrouped_components(&self) -> impl Iterator<Item = ComponentId> + '_ {
        self.components
            .iter()
            .filter(|(_, c)| !c.is_grouped())
            .map(|(id, _)| id)
    }

    /// Rebuilds auxiliary indices after deserialization.
    pub fn rebuild_indices(&mut self) {
        self.component_by_name = self
            .components
            .iter()
            .map(|(id, c)| (c.name.clone(), id))
            .collect();
        self.group_by_name = self
            .groups
            .iter()
            .map(|(id, g)| (g.name.clone(), id))
            .collect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attachment::{Attachment, NifAttachment};
    use crate::group::GroupTarget;
    use mfpga_common::FpgaId;

    fn lut(n: u64) -> ResourceInfo {
        ResourceInfo::new().with("LUT", n)
    }

    fn sample() -> (Design, ComponentId, ComponentId, ComponentId) {
        let mut d = Design::new();
        let a = d.add_component(Component::new("a", lut(10)));
        let b = d.add_component(
            Component::new("b", lut(20)).with_attachment(Attachment::Sap(NifAttachment {
                name: "p".to_string(),
                nif: "nif".to_string(),
                resources: lut(1),
            })),
        );
        let c = d.add_component(Component::new("c", lut(30)).as_input());
        (d, a, b, c)
    }

    #[test]
    fn add_component_assigns_ids_and_index() {
        let (d, a, b, _) = sample();
        assert_eq!(d.component(a).id, a);
        assert_eq!(d.component(b).name, "b");
        assert_eq!(d.component_by_name("b"), Some(b));
        assert_eq!(d.component_by_name("zzz"), None);
    }

    #[test]
    fn add_to_group_sets_membership() {
        let (mut d, a, b, _) = sample();
        let g = d.add_group("g");
        d.add_to_group(g, a).unwrap();
        d.add_to_group(g, b).unwrap();
        d.add_to_group(g, b).unwrap();
        assert_eq!(d.group(g).members(), &[a, b]);
        assert_eq!(d.component(a).group(), Some(g));
        assert_eq!(d.required_resources(g), lut(31));
        assert_eq!(d.group_port_count(g), 1);
    }

    #[test]
    fn component_cannot_join_two_groups() {
        let (mut d, a, _, _) = sample();
        let g1 = d.add_group("g1");
        let g2 = d.add_group("g2");
        d.add_to_group(g1, a).unwrap();
        let err = d.add_to_group(g2, a).unwrap_err();
        assert_eq!(
            err.to_string(),
            "component 'a' already belongs to group 'g1'"
        );
        assert!(d.group(g2).is_empty());
    }

    #[test]
    fn remove_from_group_clears_flag() {
        let (mut d, a, _, _) = sample();
        let g = d.add_group("g");
        d.add_to_group(g, a).unwrap();
        assert!(d.remove_from_group(g, a));
        assert!(!d.component(a).is_grouped());
        assert!(!d.remove_from_group(g, a));
        assert_eq!(d.ungrouped_components().count(), 3);
    }

    #[test]
    fn merge_groups_moves_members() {
        let (mut d, a, b, c) = sample();
        let g1 = d.add_group("g1");
        let g2 = d.add_group("g2");
        d.add_to_group(g1, a).unwrap();
        d.add_to_group(g2, b).unwrap();
        d.add_to_group(g2, c).unwrap();
        d.merge_groups(g1, g2).unwrap();
        assert_eq!(d.group(g1).members(), &[a, b, c]);
        assert!(d.group(g2).is_empty());
        assert_eq!(d.group(g2).name, "g2");
        assert_eq!(d.component(c).group(), Some(g1));
        assert_eq!(d.non_empty_groups().collect::<Vec<_>>(), vec![g1]);
    }

    #[test]
    fn merge_refuses_mapped_groups() {
        let (mut d, a, b, _) = sample();
        let g1 = d.add_group("g1");
        let g2 = d.add_group("g2");
        d.add_to_group(g1, a).unwrap();
        d.add_to_group(g2, b).unwrap();
        d.group_mut(g2).set_target(GroupTarget {
            fpga: FpgaId::from_raw(0),
            name: "F0".to_string(),
        });
        assert!(matches!(
            d.merge_groups(g1, g2),
            Err(MappingError::GroupAlreadyMapped { .. })
        ));
        assert_eq!(d.group(g2).len(), 1);
    }

    #[test]
    fn shares_member_detects_overlap() {
        let (mut d, a, b, _) = sample();
        let g1 = d.add_group("g1");
        let g2 = d.add_group("g2");
        d.add_to_group(g1, a).unwrap();
        d.add_to_group(g2, b).unwrap();
        assert!(!d.shares_member(g1, g2));
        d.group_mut(g2).add(a);
        assert!(d.shares_member(g1, g2));
    }

    #[test]
    fn architecture_and_input_queries() {
        let mut d = Design::new();
        let a = d.add_component(Component::new("a", lut(1)).with_architecture("ecp5"));
        let b = d.add_component(Component::new("b", lut(1)).as_input());
        let g = d.add_group("g");
        d.add_to_group(g, a).unwrap();
        d.add_to_group(g, b).unwrap();
        assert!(d.group_supports_architecture(g, "ECP5"));
        assert!(!d.group_supports_architecture(g, "artix7"));
        assert!(d.group_has_input(g));
    }

    #[test]
    fn serde_roundtrip_rebuilds_indices() {
        let (mut d, a, b, _) = sample();
        d.add_connection(a, b, 2.5);
        let g = d.add_group("g");
        d.add_to_group(g, a).unwrap();
        let json = serde_json::to_string(&d).unwrap();
        let mut back: Design = serde_json::from_str(&json).unwrap();
        assert_eq!(back.component_by_name("a"), None);
        back.rebuild_indices();
        assert_eq!(back.component_by_name("a"), Some(a));
        assert_eq!(back.group_by_name("g"), Some(g));
        assert_eq!(back.connections().len(), 1);
        assert_eq!(back.component(a).group(), Some(g));
    }
}
