//! Group placement order.

use mfpga_common::GroupId;
use mfpga_design::Design;
use std::cmp::Reverse;

/// Returns the non-empty groups of `design` in placement order: groups
/// holding an input component first, then by descending total required
/// amount, then by name.
pub fn placement_order(design: &Design) -> Vec<GroupId> {
    let mut keyed: Vec<_> = design
        .non_empty_groups()
        .map(|id| {
            let group = design.group(id);
            (
                !design.group_has_input(id),
                Reverse(design.required_resources(id).total_amount()),
                group.name.clone(),
                id,
            )
        })
        .collect();
    keyed.sort();
    keyed.into_iter().map(|(.., id)| id).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use mfpga_design::Component;
    use mfpga_resource::ResourceInfo;

    fn add(design: &mut Design, name: &str, lut: u64, input: bool) -> GroupId {
        let mut c = Component::new(format!("{name}_c"), ResourceInfo::new().with("LUT", lut));
        if input {
            c = c.as_input();
        }
        let c = design.add_component(c);
        let g = design.add_group(name);
        design.add_to_group(g, c).unwrap();
        g
    }

    #[test]
    fn inputs_then_size_then_name() {
        let mut d = Design::new();
        let small = add(&mut d, "small", 10, false);
        let big = add(&mut d, "big", 90, false);
        let io = add(&mut d, "io", 1, true);
        let b = add(&mut d, "b", 50, false);
        let a = add(&mut d, "a", 50, false);
        d.add_group("empty");
        assert_eq!(placement_order(&d), vec![io, big, a, b, small]);
    }
}
