//! Placement results in a serializable form.

use mfpga_design::Design;
use mfpga_platform::Platform;
use mfpga_resource::ResourceInfo;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Where everything ended up after a placement pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacementReport {
    /// One entry per FPGA in platform order.
    pub fpgas: Vec<FpgaReport>,
    /// Names of groups that could not be placed.
    pub unplaced: Vec<String>,
    /// One entry per link in platform order.
    pub links: Vec<LinkReport>,
}

/// Placement state of one FPGA.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FpgaReport {
    /// FPGA name.
    pub name: String,
    /// Architecture family.
    pub family: String,
    /// Cluster, if any.
    pub cluster: Option<String>,
    /// Hops from the nearest input FPGA.
    pub distance_from_input: u32,
    /// Mapped groups in mapping order.
    pub groups: Vec<String>,
    /// Components of the mapped groups.
    pub components: Vec<String>,
    /// Used resources, including the interconnect.
    pub used: ResourceInfo,
    /// Total resources.
    pub total: ResourceInfo,
    /// Routers in the interconnect.
    pub routers: usize,
    /// Bridges in the interconnect.
    pub bridges: usize,
}

/// Traffic on one link.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkReport {
    /// Link display name.
    pub name: String,
    /// Connections routed over the link.
    pub connections: usize,
    /// Sum of their data densities.
    pub usage: f64,
    /// Usage relative to the fastest link.
    pub link_usage: f64,
}

impl PlacementReport {
    /// Snapshots the mapping state of `platform`.
    pub fn build(design: &Design, platform: &Platform, unplaced: Vec<String>) -> Self {
        let fpgas = platform
            .fpgas()
            .values()
            .map(|fpga| FpgaReport {
                name: fpga.name.clone(),
                family: fpga.family.clone(),
                cluster: fpga.cluster().map(str::to_string),
                distance_from_input: fpga.distance_from_input,
                groups: fpga
                    .mapped_groups()
                    .iter()
                    .map(|&g| design.group(g).name.clone())
                    .collect(),
                components: fpga
                    .mapped_components(design)
                    .into_iter()
                    .map(|c| design.component(c).name.clone())
                    .collect(),
                used: fpga.used_resources(),
                total: fpga.total_resources(),
                routers: fpga.vortex().router_count(),
                bridges: fpga.vortex().bridge_count(),
            })
            .collect();
        let links = platform
            .links()
            .values()
            .map(|link| LinkReport {
                name: link.name.clone(),
                connections: link.connections().count(),
                usage: link.usage(),
                link_usage: link.link_usage(),
            })
            .collect();
        Self {
            fpgas,
            unplaced,
            links,
        }
    }

    /// Returns `true` if every group was placed.
    pub fn is_complete(&self) -> bool {
        self.unplaced.is_empty()
    }

    /// Looks up the entry of an FPGA by name.
    pub fn fpga(&self, name: &str) -> Option<&FpgaReport> {
        self.fpgas.iter().find(|f| f.name == name)
    }

    /// Name of the FPGA hosting `group`, if it was placed.
    pub fn fpga_of_group(&self, group: &str) -> Option<&str> {
        self.fpgas
            .iter()
            .find(|f| f.groups.iter().any(|g| g == group))
            .map(|f| f.name.as_str())
    }
}

impl fmt::Display for PlacementReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for fpga in &self.fpgas {
            write!(f, "{} ({}", fpga.name, fpga.family)?;
            if let Some(cluster) = &fpga.cluster {
                write!(f, ", cluster {cluster}")?;
            }
            writeln!(f, ", distance {})", fpga.distance_from_input)?;
            writeln!(f, "  groups:     {}", fpga.groups.join(", "))?;
            writeln!(f, "  components: {}", fpga.components.join(", "))?;
            writeln!(
                f,
                "  routers:    {} ({} bridges)",
                fpga.routers, fpga.bridges
            )?;
            for (name, total) in fpga.total.iter() {
                writeln!(f, "  {name:<10}  {:>8} / {total}", fpga.used.get(name))?;
            }
        }
        for link in &self.links {
            writeln!(
                f,
                "link {}: {} connection(s), usage {:.2} (relative {:.2})",
                link.name, link.connections, link.usage, link.link_usage
            )?;
        }
        if !self.unplaced.is_empty() {
            writeln!(f, "unplaced: {}", self.unplaced.join(", "))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mfpga_design::Component;
    use mfpga_platform::{Fpga, VortexSpec};

    #[test]
    fn build_snapshots_mapping() {
        let mut design = Design::new();
        let c = design.add_component(Component::new("core", ResourceInfo::new().with("LUT", 12)));
        let g = design.add_group("g");
        design.add_to_group(g, c).unwrap();

        let mut platform = Platform::new();
        let f = platform.add_fpga(Fpga::new(
            "F0",
            "artix7",
            &ResourceInfo::new().with("LUT", 100),
            VortexSpec::default(),
        ));
        let f1 = platform.add_fpga(Fpga::new(
            "F1",
            "artix7",
            &ResourceInfo::new().with("LUT", 100),
            VortexSpec::default(),
        ));
        platform.add_link(f, f1, 10.0, true);
        platform.map_group(f, &mut design, g).unwrap();

        let report = PlacementReport::build(&design, &platform, vec!["late".to_string()]);
        let f0 = report.fpga("F0").unwrap();
        assert_eq!(f0.groups, vec!["g"]);
        assert_eq!(f0.components, vec!["core"]);
        assert_eq!(f0.used.get("LUT"), 12);
        assert_eq!(report.fpga_of_group("g"), Some("F0"));
        assert_eq!(report.links[0].name, "F0 <-> F1");
        assert!(!report.is_complete());

        let text = report.to_string();
        assert!(text.contains("F0 (artix7, distance 0)"));
        assert!(text.contains("unplaced: late"));

        let json = serde_json::to_string(&report).unwrap();
        let back: PlacementReport = serde_json::from_str(&json).unwrap();
        assert_eq!(back, report);
    }
}
