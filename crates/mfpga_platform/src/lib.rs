//! Physical platform model and the single-FPGA mapping API.
//!
//! A [`Platform`] owns [`Fpga`]s, the [`Link`]s between them and the
//! [`Cluster`]s that group them. Each FPGA carries a resource ledger, the set
//! of groups mapped onto it, and its on-chip interconnect ([`Vortex`]) whose
//! router/bridge cost grows with the number of attached ports.
//!
//! [`FpgaComparator`] scores FPGAs as mapping targets; the placement driver
//! builds on it and on [`Fpga::map_group`] / [`Fpga::unmap_group`].

#![warn(missing_docs)]

pub mod cluster;
pub mod comparator;
pub mod fpga;
pub mod link;
pub mod platform;
pub mod vortex;

pub use cluster::Cluster;
pub use comparator::{FpgaComparator, ScoreWeights};
pub use fpga::Fpga;
pub use link::Link;
pub use platform::Platform;
pub use vortex::{Bridge, PortBinding, Router, Vortex, VortexSpec, MAX_ROUTER_ITERATIONS};
