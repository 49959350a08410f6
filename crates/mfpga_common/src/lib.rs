//! Shared foundational types used across the multi-FPGA mapping workspace.
//!
//! This crate provides opaque entity IDs, the dense [`Arena`] used to own
//! components, groups, FPGAs and links, the [`MappingError`] taxonomy that
//! every mapping transaction reports through, and the [`InternalError`] type
//! reserved for bugs in the mapper itself.

#![warn(missing_docs)]

pub mod arena;
pub mod error;
pub mod ids;
pub mod result;

pub use arena::{Arena, ArenaId};
pub use error::MappingError;
pub use ids::{BridgeId, ComponentId, ConnectionId, FpgaId, GroupId, LinkId, RouterId};
pub use result::{InternalError, MfpgaResult};
