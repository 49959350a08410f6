//! Logical design model for multi-FPGA mapping.
//!
//! A [`Design`] owns the logical side of a mapping problem:
//!
//! - [`Component`]s with their declared resources and interconnect
//!   [`Attachment`]s (SAP, SOP, Bridge, Edge)
//! - [`Connection`]s between components, weighted by data density
//! - [`Group`]s (subsystems) of components that must be mapped as a unit
//!
//! Everything is stored in arenas and cross-referenced by ID. Groups can be
//! supplied explicitly or discovered from connectivity with
//! [`discover_subsystems`].

#![warn(missing_docs)]

pub mod attachment;
pub mod component;
pub mod connection;
pub mod design;
pub mod group;
pub mod subsystem;

pub use attachment::{
    Attachment, AttachmentCost, AttachmentKind, BridgeAttachment, ConfigArtifact, NifAttachment,
};
pub use component::Component;
pub use connection::Connection;
pub use design::Design;
pub use group::{Group, GroupTarget};
pub use subsystem::discover_subsystems;
