//! Descriptor types deserialized from `platform.toml` and `design.toml`.

use mfpga_design::AttachmentKind;
use mfpga_platform::{ScoreWeights, VortexSpec};
use mfpga_resource::ResourceInfo;
use serde::Deserialize;

/// The top-level platform descriptor.
#[derive(Debug, Deserialize)]
pub struct PlatformConfig {
    /// Interconnect defaults applied to every FPGA without an override.
    #[serde(default)]
    pub vortex: VortexConfig,
    /// FPGA declarations (`[[fpga]]`).
    #[serde(default, rename = "fpga")]
    pub fpgas: Vec<FpgaConfig>,
    /// Inter-FPGA links (`[[link]]`).
    #[serde(default, rename = "link")]
    pub links: Vec<LinkConfig>,
}

/// Router geometry and fabric building-block costs.
#[derive(Debug, Clone, Deserialize)]
pub struct VortexConfig {
    /// Ports on one router; must be greater than 2.
    #[serde(default = "default_ports_per_router")]
    pub ports_per_router: u32,
    /// Resources of one router.
    #[serde(default)]
    pub router: ResourceInfo,
    /// Resources of one bridge.
    #[serde(default)]
    pub bridge: ResourceInfo,
    /// Resources of one bridge endpoint.
    #[serde(default)]
    pub bridge_endpoint: ResourceInfo,
}

impl Default for VortexConfig {
    fn default() -> Self {
        Self {
            ports_per_router: default_ports_per_router(),
            router: ResourceInfo::new(),
            bridge: ResourceInfo::new(),
            bridge_endpoint: ResourceInfo::new(),
        }
    }
}

impl From<&VortexConfig> for VortexSpec {
    fn from(config: &VortexConfig) -> Self {
        VortexSpec {
            ports_per_router: config.ports_per_router,
            router: config.router.clone(),
            bridge: config.bridge.clone(),
            bridge_endpoint: config.bridge_endpoint.clone(),
        }
    }
}

fn default_ports_per_router() -> u32 {
    8
}

/// One FPGA of the platform.
#[derive(Debug, Deserialize)]
pub struct FpgaConfig {
    /// Unique FPGA name.
    pub name: String,
    /// Architecture family (e.g. "artix7").
    pub family: String,
    /// Total resources.
    #[serde(default)]
    pub resources: ResourceInfo,
    /// Marks an input/source FPGA.
    #[serde(default)]
    pub input: bool,
    /// Configured hop distance from the inputs, used when the FPGA is not
    /// reachable from any input over the links.
    #[serde(default)]
    pub distance: Option<u32>,
    /// Interconnect override for this FPGA.
    #[serde(default)]
    pub vortex: Option<VortexConfig>,
    /// Cluster to join; created on first use.
    #[serde(default)]
    pub cluster: Option<String>,
}

/// A link between two FPGAs.
#[derive(Debug, Deserialize)]
pub struct LinkConfig {
    /// Source FPGA name.
    pub from: String,
    /// Destination FPGA name.
    pub to: String,
    /// Link speed in arbitrary but consistent units.
    pub speed: f64,
    /// Whether traffic may flow both ways.
    #[serde(default = "default_true")]
    pub bidirectional: bool,
}

fn default_true() -> bool {
    true
}

/// The top-level design descriptor.
#[derive(Debug, Deserialize)]
pub struct DesignConfig {
    /// Component declarations (`[[component]]`).
    #[serde(default, rename = "component")]
    pub components: Vec<ComponentConfig>,
    /// Connections between components (`[[connection]]`).
    #[serde(default, rename = "connection")]
    pub connections: Vec<ConnectionConfig>,
    /// Explicit groups (`[[group]]`).
    #[serde(default, rename = "group")]
    pub groups: Vec<GroupConfig>,
    /// Placement weights.
    #[serde(default)]
    pub placement: PlacementConfig,
}

/// One component of the design.
#[derive(Debug, Deserialize)]
pub struct ComponentConfig {
    /// Unique component name.
    pub name: String,
    /// Resources of the component itself, excluding attachments.
    #[serde(default)]
    pub resources: ResourceInfo,
    /// Supported FPGA families; empty means any.
    #[serde(default)]
    pub architectures: Vec<String>,
    /// Marks a component that consumes platform input.
    #[serde(default)]
    pub input: bool,
    /// Interconnect attachments (`[[component.attachment]]`).
    #[serde(default, rename = "attachment")]
    pub attachments: Vec<AttachmentConfig>,
}

/// One interconnect attachment of a component.
#[derive(Debug, Deserialize)]
pub struct AttachmentConfig {
    /// Attachment type.
    pub kind: AttachmentKind,
    /// Attachment name, unique within its component.
    pub name: String,
    /// Name of the interface core; defaults to `{name}_{kind}`.
    #[serde(default)]
    pub core: Option<String>,
    /// Resources of the interface core.
    #[serde(default)]
    pub resources: ResourceInfo,
}

/// A directed connection between two components.
#[derive(Debug, Deserialize)]
pub struct ConnectionConfig {
    /// Source component name.
    pub from: String,
    /// Destination component name.
    pub to: String,
    /// Data density carried by the connection.
    #[serde(default = "default_density")]
    pub density: f64,
}

fn default_density() -> f64 {
    1.0
}

/// An explicit group of components that must share an FPGA.
#[derive(Debug, Deserialize)]
pub struct GroupConfig {
    /// Unique group name.
    pub name: String,
    /// Member component names.
    #[serde(default)]
    pub members: Vec<String>,
}

/// Comparator weights for the placement driver.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PlacementConfig {
    /// Weight of the resource score.
    #[serde(default = "default_resource_weight")]
    pub resource_weight: f64,
    /// Weight of the input distance.
    #[serde(default = "default_io_weight")]
    pub io_weight: f64,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            resource_weight: default_resource_weight(),
            io_weight: default_io_weight(),
        }
    }
}

impl From<PlacementConfig> for ScoreWeights {
    fn from(config: PlacementConfig) -> Self {
        ScoreWeights {
            resource_weight: config.resource_weight,
            io_weight: config.io_weight,
        }
    }
}

fn default_resource_weight() -> f64 {
    ScoreWeights::default().resource_weight
}

fn default_io_weight() -> f64 {
    ScoreWeights::default().io_weight
}
