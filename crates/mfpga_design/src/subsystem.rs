//! Subsystem discovery: grouping components by connectivity.
//!
//! Every connection between two ungrouped components seeds a two-member
//! island. An island that shares a member with islands found earlier absorbs
//! them, so after one pass over the connections each island is a connected
//! component of the connection graph. Ungrouped components without any
//! connection become singleton groups. Components that already belong to an
//! explicit group are left where they are.

use crate::design::Design;
use crate::group::Group;
use mfpga_common::GroupId;

/// Groups every ungrouped component of `design` and returns the IDs of the
/// new groups in discovery order.
///
/// New groups are named `subsystem_{id}`.
pub fn discover_subsystems(design: &mut Design) -> Vec<GroupId> {
    let mut islands: Vec<Group> = Vec::new();

    for (_, connection) in design.connections().iter() {
        let (from, to) = (connection.from, connection.to);
        if design.component(from).is_grouped() || design.component(to).is_grouped() {
            continue;
        }
        let mut island = Group::new("");
        island.add(from);
        island.add(to);
        for other in islands.iter_mut() {
            if island.shares_member_with(other) {
                island.merge_with(other);
            }
        }
        islands.retain(|g| !g.is_empty());
        islands.push(island);
    }

    let connected: Vec<_> = islands.iter().flat_map(|g| g.members().to_vec()).collect();
    let singletons: Vec<_> = design
        .ungrouped_components()
        .filter(|c| !connected.contains(c))
        .collect();
    for component in singletons {
        let mut island = Group::new("");
        island.add(component);
        islands.push(island);
    }

    let mut created = Vec::with_capacity(islands.len());
    for island in islands {
        let name = format!("subsystem_{}", design.groups().len());
        let id = design.add_group(name);
        for &member in island.members() {
            if let Err(err) = design.add_to_group(id, member) {
                log::warn!("subsystem discovery skipped a component: {err}");
            }
        }
        log::debug!(
            "discovered subsystem '{}' with {} component(s)",
            design.group(id).name,
            design.group(id).len()
        );
        created.push(id);
    }
    created
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::Component;
    use mfpga_common::ComponentId;
    use mfpga_resource::ResourceInfo;

    fn design_with(n: usize) -> (Design, Vec<ComponentId>) {
        let mut d = Design::new();
        let ids = (0..n)
            .map(|i| d.add_component(Component::new(format!("c{i}"), ResourceInfo::new())))
            .collect();
        (d, ids)
    }

    fn members(d: &Design, g: GroupId) -> Vec<ComponentId> {
        let mut m = d.group(g).members().to_vec();
        m.sort();
        m
    }

    #[test]
    fn chains_collapse_into_one_island() {
        let (mut d, c) = design_with(4);
        d.add_connection(c[0], c[1], 1.0);
        d.add_connection(c[2], c[3], 1.0);
        d.add_connection(c[1], c[2], 1.0);
        let groups = discover_subsystems(&mut d);
        assert_eq!(groups.len(), 1);
        assert_eq!(members(&d, groups[0]), c);
    }

    #[test]
    fn separate_islands_and_singletons() {
        let (mut d, c) = design_with(5);
        d.add_connection(c[0], c[1], 1.0);
        d.add_connection(c[2], c[3], 1.0);
        let groups = discover_subsystems(&mut d);
        assert_eq!(groups.len(), 3);
        assert_eq!(members(&d, groups[0]), vec![c[0], c[1]]);
        assert_eq!(members(&d, groups[1]), vec![c[2], c[3]]);
        assert_eq!(members(&d, groups[2]), vec![c[4]]);
        assert_eq!(d.ungrouped_components().count(), 0);
    }

    #[test]
    fn explicit_groups_are_left_alone() {
        let (mut d, c) = design_with(3);
        let explicit = d.add_group("explicit");
        d.add_to_group(explicit, c[0]).unwrap();
        d.add_connection(c[0], c[1], 1.0);
        d.add_connection(c[1], c[2], 1.0);
        let groups = discover_subsystems(&mut d);
        assert_eq!(groups.len(), 1);
        assert_eq!(members(&d, groups[0]), vec![c[1], c[2]]);
        assert_eq!(d.group(explicit).members(), &[c[0]]);
        assert_eq!(d.group(groups[0]).name, "subsystem_1");
    }

    #[test]
    fn self_loop_is_a_singleton() {
        let (mut d, c) = design_with(1);
        d.add_connection(c[0], c[0], 1.0);
        let groups = discover_subsystems(&mut d);
        assert_eq!(groups.len(), 1);
        assert_eq!(d.group(groups[0]).len(), 1);
    }
}
