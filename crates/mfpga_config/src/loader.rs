//! Descriptor loading, validation and conversion into model objects.

use crate::error::ConfigError;
use crate::types::{AttachmentConfig, ComponentConfig, DesignConfig, PlatformConfig, VortexConfig};
use mfpga_common::ComponentId;
use mfpga_design::{
    discover_subsystems, Attachment, AttachmentKind, BridgeAttachment, Component, Design,
    NifAttachment,
};
use mfpga_platform::{Fpga, Platform, ScoreWeights, VortexSpec};
use std::collections::HashSet;
use std::path::Path;

/// A design together with the placement weights declared next to it.
#[derive(Debug)]
pub struct LoadedDesign {
    /// The design, with every component grouped.
    pub design: Design,
    /// Comparator weights from the `[placement]` table.
    pub weights: ScoreWeights,
}

/// Loads and validates a platform descriptor from a file.
pub fn load_platform(path: &Path) -> Result<Platform, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    load_platform_from_str(&content)
}

/// Parses and validates a platform descriptor from a string.
pub fn load_platform_from_str(content: &str) -> Result<Platform, ConfigError> {
    let config: PlatformConfig =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    validate_platform(&config)?;
    build_platform(&config)
}

/// Loads and validates a design descriptor from a file.
pub fn load_design(path: &Path) -> Result<LoadedDesign, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    load_design_from_str(&content)
}

/// Parses and validates a design descriptor from a string.
///
/// Components not named by an explicit `[[group]]` are grouped by
/// connectivity.
pub fn load_design_from_str(content: &str) -> Result<LoadedDesign, ConfigError> {
    let config: DesignConfig =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    validate_design(&config)?;
    let design = build_design(&config)?;
    Ok(LoadedDesign {
        design,
        weights: config.placement.into(),
    })
}

fn require_name(kind: &str, name: &str) -> Result<(), ConfigError> {
    if name.trim().is_empty() {
        return Err(ConfigError::ValidationError(format!(
            "{kind} name must not be empty"
        )));
    }
    Ok(())
}

fn unique<'a>(
    kind: &'static str,
    names: impl IntoIterator<Item = &'a str>,
) -> Result<HashSet<&'a str>, ConfigError> {
    let mut seen = HashSet::new();
    for name in names {
        require_name(kind, name)?;
        if !seen.insert(name) {
            return Err(ConfigError::Duplicate {
                kind,
                name: name.to_string(),
            });
        }
    }
    Ok(seen)
}

fn resolve(kind: &'static str, names: &HashSet<&str>, name: &str) -> Result<(), ConfigError> {
    if names.contains(name) {
        Ok(())
    } else {
        Err(ConfigError::UnknownReference {
            kind,
            name: name.to_string(),
        })
    }
}

fn validate_vortex(owner: &str, vortex: &VortexConfig) -> Result<(), ConfigError> {
    if vortex.ports_per_router <= 2 {
        return Err(ConfigError::ValidationError(format!(
            "{owner}: ports_per_router must be greater than 2, got {}",
            vortex.ports_per_router
        )));
    }
    Ok(())
}

fn validate_platform(config: &PlatformConfig) -> Result<(), ConfigError> {
    validate_vortex("vortex", &config.vortex)?;
    let fpgas = unique("fpga", config.fpgas.iter().map(|f| f.name.as_str()))?;
    for fpga in &config.fpgas {
        require_name("family", &fpga.family)?;
        if let Some(vortex) = &fpga.vortex {
            validate_vortex(&format!("fpga '{}'", fpga.name), vortex)?;
        }
        if let Some(cluster) = &fpga.cluster {
            require_name("cluster", cluster)?;
        }
    }
    for link in &config.links {
        resolve("fpga", &fpgas, &link.from)?;
        resolve("fpga", &fpgas, &link.to)?;
        if link.from == link.to {
            return Err(ConfigError::ValidationError(format!(
                "link from '{}' to itself",
                link.from
            )));
        }
        if !link.speed.is_finite() || link.speed <= 0.0 {
            return Err(ConfigError::ValidationError(format!(
                "link '{}' -> '{}': speed must be positive, got {}",
                link.from, link.to, link.speed
            )));
        }
    }
    Ok(())
}

fn build_platform(config: &PlatformConfig) -> Result<Platform, ConfigError> {
    let mut platform = Platform::new();
    for fc in &config.fpgas {
        let spec = VortexSpec::from(fc.vortex.as_ref().unwrap_or(&config.vortex));
        let mut fpga = Fpga::new(&fc.name, &fc.family, &fc.resources, spec);
        if let Some(distance) = fc.distance {
            fpga = fpga.with_distance(distance);
        }
        if fc.input {
            fpga = fpga.as_input();
        }
        let id = platform.add_fpga(fpga);
        if let Some(cluster) = &fc.cluster {
            if platform.cluster(cluster).is_none() {
                platform.add_cluster(cluster.as_str())?;
            }
            platform.add_fpga_to_cluster(cluster, id)?;
        }
    }
    for lc in &config.links {
        let (Some(from), Some(to)) = (
            platform.fpga_by_name(&lc.from),
            platform.fpga_by_name(&lc.to),
        ) else {
            return Err(ConfigError::UnknownReference {
                kind: "fpga",
                name: format!("{} / {}", lc.from, lc.to),
            });
        };
        platform.add_link(from, to, lc.speed, lc.bidirectional);
    }
    log::debug!(
        "loaded platform: {} FPGA(s), {} link(s), {} cluster(s)",
        platform.fpgas().len(),
        platform.links().len(),
        platform.clusters().len()
    );
    Ok(platform)
}

fn validate_design(config: &DesignConfig) -> Result<(), ConfigError> {
    let components = unique(
        "component",
        config.components.iter().map(|c| c.name.as_str()),
    )?;
    for component in &config.components {
        let names = component.attachments.iter().map(|a| a.name.as_str());
        unique("attachment", names).map_err(|err| match err {
            ConfigError::Duplicate { name, .. } => ConfigError::Duplicate {
                kind: "attachment",
                name: format!("{}.{name}", component.name),
            },
            other => other,
        })?;
    }
    for connection in &config.connections {
        resolve("component", &components, &connection.from)?;
        resolve("component", &components, &connection.to)?;
        if !connection.density.is_finite() || connection.density < 0.0 {
            return Err(ConfigError::ValidationError(format!(
                "connection '{}' -> '{}': density must be non-negative, got {}",
                connection.from, connection.to, connection.density
            )));
        }
    }
    unique("group", config.groups.iter().map(|g| g.name.as_str()))?;
    let mut claimed = HashSet::new();
    for group in &config.groups {
        for member in &group.members {
            resolve("component", &components, member)?;
            if !claimed.insert(member.as_str()) {
                return Err(ConfigError::ValidationError(format!(
                    "component '{member}' is listed in more than one group"
                )));
            }
        }
    }
    Ok(())
}

fn build_attachment(config: &AttachmentConfig) -> Attachment {
    let core = config
        .core
        .clone()
        .unwrap_or_else(|| format!("{}_{}", config.name, config.kind));
    let nif = |nif: String| NifAttachment {
        name: config.name.clone(),
        nif,
        resources: config.resources.clone(),
    };
    match config.kind {
        AttachmentKind::Sap => Attachment::Sap(nif(core)),
        AttachmentKind::Sop => Attachment::Sop(nif(core)),
        AttachmentKind::Edge => Attachment::Edge(nif(core)),
        AttachmentKind::Bridge => Attachment::Bridge(BridgeAttachment {
            name: config.name.clone(),
            bridge: core,
            resources: config.resources.clone(),
        }),
    }
}

fn build_component(config: &ComponentConfig) -> Component {
    let mut component = Component::new(&config.name, config.resources.clone());
    for family in &config.architectures {
        component = component.with_architecture(family);
    }
    for attachment in &config.attachments {
        component = component.with_attachment(build_attachment(attachment));
    }
    if config.input {
        component = component.as_input();
    }
    component
}

fn component_id(design: &Design, name: &str) -> Result<ComponentId, ConfigError> {
    design
        .component_by_name(name)
        .ok_or_else(|| ConfigError::UnknownReference {
            kind: "component",
            name: name.to_string(),
        })
}

fn build_design(config: &DesignConfig) -> Result<Design, ConfigError> {
    let mut design = Design::new();
    for component in &config.components {
        design.add_component(build_component(component));
    }
    for connection in &config.connections {
        let from = component_id(&design, &connection.from)?;
        let to = component_id(&design, &connection.to)?;
        design.add_connection(from, to, connection.density);
    }
    for group in &config.groups {
        let id = design.add_group(&group.name);
        for member in &group.members {
            let component = component_id(&design, member)?;
            design.add_to_group(id, component)?;
        }
    }
    let discovered = discover_subsystems(&mut design);
    log::debug!(
        "loaded design: {} component(s), {} connection(s), {} explicit and {} discovered group(s)",
        design.components().len(),
        design.connections().len(),
        config.groups.len(),
        discovered.len()
    );
    Ok(design)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mfpga_design::AttachmentCost;
    use std::io::Write;

    const PLATFORM: &str = r#"
[vortex]
ports_per_router = 4
router = { LUT = 2 }
bridge = { LUT = 1 }
bridge_endpoint = { LUT = 1 }

[[fpga]]
name = "F0"
family = "artix7"
resources = { LUT = 100, FF = 200 }
input = true
cluster = "board0"

[[fpga]]
name = "F1"
family = "artix7"
resources = { LUT = 150, FF = 200 }
cluster = "board0"
vortex = { ports_per_router = 8 }

[[fpga]]
name = "F2"
family = "ecp5"
resources = { LUT = 80 }
distance = 7

[[link]]
from = "F0"
to = "F1"
speed = 10.0

[[link]]
from = "F1"
to = "F2"
speed = 2.5
bidirectional = false
"#;

    const DESIGN: &str = r#"
[[component]]
name = "rx"
resources = { LUT = 20 }
input = true

[[component.attachment]]
kind = "sap"
name = "ctrl"
resources = { LUT = 3 }

[[component]]
name = "dsp"
resources = { LUT = 40 }
architectures = ["artix7"]

[[component.attachment]]
kind = "bridge"
name = "up"
core = "axi_bridge"
resources = { LUT = 5 }

[[component]]
name = "log"
resources = { LUT = 10 }

[[component]]
name = "lonely"
resources = { LUT = 1 }

[[connection]]
from = "rx"
to = "dsp"
density = 4.0

[[connection]]
from = "dsp"
to = "log"

[[group]]
name = "front"
members = ["rx"]

[placement]
io_weight = -2.0
"#;

    #[test]
    fn parse_platform() {
        let platform = load_platform_from_str(PLATFORM).unwrap();
        assert_eq!(platform.fpgas().len(), 3);
        let f0 = platform.fpga(platform.fpga_by_name("F0").unwrap());
        assert!(f0.is_input);
        assert_eq!(f0.total_resources().get("FF"), 200);
        assert_eq!(f0.vortex_spec().ports_per_router, 4);
        assert_eq!(f0.vortex_spec().router.get("LUT"), 2);
        assert_eq!(f0.cluster(), Some("board0"));

        let f1 = platform.fpga(platform.fpga_by_name("F1").unwrap());
        assert_eq!(f1.vortex_spec().ports_per_router, 8);
        assert!(f1.vortex_spec().router.is_empty());

        let f2 = platform.fpga(platform.fpga_by_name("F2").unwrap());
        assert_eq!(f2.distance_from_input, 7);
        assert_eq!(f2.cluster(), None);

        assert_eq!(platform.cluster("board0").unwrap().members().len(), 2);
        let names: Vec<_> = platform.links().values().map(|l| l.name.as_str()).collect();
        assert_eq!(names, vec!["F0 <-> F1", "F1 -> F2"]);
    }

    #[test]
    fn small_routers_are_rejected() {
        let toml = r#"
[vortex]
ports_per_router = 2
"#;
        let err = load_platform_from_str(toml).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));

        let toml = r#"
[[fpga]]
name = "F0"
family = "artix7"
vortex = { ports_per_router = 1 }
"#;
        let err = load_platform_from_str(toml).unwrap_err();
        assert!(err.to_string().contains("fpga 'F0'"));
    }

    #[test]
    fn duplicate_fpga_is_rejected() {
        let toml = r#"
[[fpga]]
name = "F0"
family = "artix7"

[[fpga]]
name = "F0"
family = "ecp5"
"#;
        let err = load_platform_from_str(toml).unwrap_err();
        assert_eq!(err.to_string(), "duplicate fpga 'F0'");
    }

    #[test]
    fn unknown_link_endpoint_is_rejected() {
        let toml = r#"
[[fpga]]
name = "F0"
family = "artix7"

[[link]]
from = "F0"
to = "F9"
speed = 1.0
"#;
        let err = load_platform_from_str(toml).unwrap_err();
        assert_eq!(err.to_string(), "unknown fpga 'F9'");
    }

    #[test]
    fn non_positive_link_speed_is_rejected() {
        let toml = r#"
[[fpga]]
name = "F0"
family = "artix7"

[[fpga]]
name = "F1"
family = "artix7"

[[link]]
from = "F0"
to = "F1"
speed = 0.0
"#;
        let err = load_platform_from_str(toml).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn empty_name_is_rejected() {
        let toml = r#"
[[fpga]]
name = ""
family = "artix7"
"#;
        let err = load_platform_from_str(toml).unwrap_err();
        assert_eq!(err.to_string(), "validation error: fpga name must not be empty");
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let err = load_platform_from_str("[[fpga]\nname =").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn parse_design() {
        let loaded = load_design_from_str(DESIGN).unwrap();
        let design = &loaded.design;
        assert_eq!(loaded.weights.resource_weight, 1.0);
        assert_eq!(loaded.weights.io_weight, -2.0);

        let rx = design.component(design.component_by_name("rx").unwrap());
        assert!(rx.is_input);
        assert_eq!(rx.resources().get("LUT"), 23);
        assert_eq!(rx.port_count(), 1);
        assert_eq!(rx.attachments[0].kind(), AttachmentKind::Sap);

        let dsp = design.component(design.component_by_name("dsp").unwrap());
        assert!(dsp.supports_architecture("Artix7"));
        assert!(!dsp.supports_architecture("ecp5"));
        let artifacts = dsp.attachments[0].configuration_artifacts();
        assert!(artifacts.iter().any(|a| a.key == "bridge" && a.value == "axi_bridge"));

        let front = design.group_by_name("front").unwrap();
        assert_eq!(design.group(front).members().len(), 1);

        // rx is claimed by "front", so discovery sees dsp -> log plus lonely.
        assert!(design.ungrouped_components().next().is_none());
        let dsp_group = dsp.group().unwrap();
        let log_group = design
            .component(design.component_by_name("log").unwrap())
            .group()
            .unwrap();
        assert_eq!(dsp_group, log_group);
        assert_eq!(design.non_empty_groups().count(), 3);
        assert_eq!(design.connections().len(), 2);
    }

    #[test]
    fn default_attachment_core_name() {
        let toml = r#"
[[component]]
name = "c"

[[component.attachment]]
kind = "edge"
name = "north"
"#;
        let loaded = load_design_from_str(toml).unwrap();
        let c = loaded.design.component(loaded.design.component_by_name("c").unwrap());
        match &c.attachments[0] {
            Attachment::Edge(a) => assert_eq!(a.nif, "north_edge"),
            other => panic!("unexpected attachment {other:?}"),
        }
    }

    #[test]
    fn placement_defaults() {
        let loaded = load_design_from_str("").unwrap();
        assert_eq!(loaded.weights, ScoreWeights::default());
        assert!(loaded.design.components().is_empty());
    }

    #[test]
    fn unknown_connection_endpoint_is_rejected() {
        let toml = r#"
[[component]]
name = "a"

[[connection]]
from = "a"
to = "ghost"
"#;
        let err = load_design_from_str(toml).unwrap_err();
        assert_eq!(err.to_string(), "unknown component 'ghost'");
    }

    #[test]
    fn duplicate_attachment_is_rejected() {
        let toml = r#"
[[component]]
name = "a"

[[component.attachment]]
kind = "sap"
name = "p"

[[component.attachment]]
kind = "sop"
name = "p"
"#;
        let err = load_design_from_str(toml).unwrap_err();
        assert_eq!(err.to_string(), "duplicate attachment 'a.p'");
    }

    #[test]
    fn component_in_two_groups_is_rejected() {
        let toml = r#"
[[component]]
name = "a"

[[group]]
name = "g1"
members = ["a"]

[[group]]
name = "g2"
members = ["a"]
"#;
        let err = load_design_from_str(toml).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn negative_density_is_rejected() {
        let toml = r#"
[[component]]
name = "a"

[[component]]
name = "b"

[[connection]]
from = "a"
to = "b"
density = -1.0
"#;
        let err = load_design_from_str(toml).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn load_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let platform_path = dir.path().join("platform.toml");
        let design_path = dir.path().join("design.toml");
        std::fs::File::create(&platform_path)
            .unwrap()
            .write_all(PLATFORM.as_bytes())
            .unwrap();
        std::fs::write(&design_path, DESIGN).unwrap();

        let platform = load_platform(&platform_path).unwrap();
        assert_eq!(platform.fpgas().len(), 3);
        let loaded = load_design(&design_path).unwrap();
        assert_eq!(loaded.design.components().len(), 4);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_platform(&dir.path().join("nope.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::IoError(_)));
    }
}
