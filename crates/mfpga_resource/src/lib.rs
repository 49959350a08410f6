//! Named-resource accounting for FPGA mapping.
//!
//! Two types cover every resource question the mapper asks:
//!
//! - [`ResourceInfo`] is a plain vector of named amounts (a component's
//!   requirement, a router's cost, a group's total). It supports set algebra
//!   independent of any capacity.
//! - [`ResourceSet`] is a ledger of `(total, used)` pairs per resource with
//!   atomic allocate/deallocate transactions that never let `used` leave
//!   `0..=total`.

#![warn(missing_docs)]

pub mod info;
pub mod set;

pub use info::ResourceInfo;
pub use set::{ResourceEntry, ResourceSet};
