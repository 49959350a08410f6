//! Parsing and validation of `platform.toml` and `design.toml` descriptors.
//!
//! A platform descriptor lists FPGAs, their resource budgets, clusters,
//! inter-FPGA links and the interconnect geometry. A design descriptor lists
//! components, their attachments and connections, optional explicit groups
//! and the placement weights. Both are validated before they are turned into
//! a [`Platform`](mfpga_platform::Platform) or a
//! [`Design`](mfpga_design::Design).

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod types;

pub use error::ConfigError;
pub use loader::{
    load_design, load_design_from_str, load_platform, load_platform_from_str, LoadedDesign,
};
pub use types::*;
