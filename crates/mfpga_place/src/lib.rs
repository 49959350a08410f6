//! Greedy multi-FPGA placement driver.
//!
//! Builds a complete placement pass out of the single-FPGA mapping API in
//! `mfpga_platform`. The pass is a heuristic: each group is committed to the
//! best candidate at the time it is considered and never revisited.
//!
//! # Pipeline
//!
//! 1. **Prepare**: group any ungrouped components by connectivity, compute
//!    hop distances from the input FPGAs, normalize link speeds
//! 2. **Order**: input groups first, then larger groups before smaller ones
//! 3. **Assign**: map each group to the highest-scoring FPGA that supports
//!    its architecture and has room for it plus its interconnect growth
//! 4. **Links**: account every cross-FPGA connection on a direct link
//! 5. **Report**: snapshot the result as a [`PlacementReport`]
//!
//! # Usage
//!
//! ```ignore
//! use mfpga_place::{place_design, PlacementOptions};
//!
//! let report = place_design(&mut design, &mut platform, &PlacementOptions::default(), &sink)?;
//! assert!(report.is_complete());
//! ```

#![warn(missing_docs)]

pub mod assign;
pub mod links;
pub mod order;
pub mod report;

pub use assign::{assign_group, Assignment};
pub use links::account_connections;
pub use order::placement_order;
pub use report::{FpgaReport, LinkReport, PlacementReport};

use mfpga_common::MappingError;
use mfpga_design::{discover_subsystems, Design};
use mfpga_diagnostics::DiagnosticSink;
use mfpga_platform::{Platform, ScoreWeights};

/// Knobs for a placement pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacementOptions {
    /// Comparator weights used to rank candidate FPGAs.
    pub weights: ScoreWeights,
    /// Recompute `distance_from_input` from the link graph before placing.
    pub compute_distances: bool,
    /// Normalize link speeds against the fastest link before placing.
    pub normalize_links: bool,
}

impl Default for PlacementOptions {
    fn default() -> Self {
        Self {
            weights: ScoreWeights::default(),
            compute_distances: true,
            normalize_links: true,
        }
    }
}

/// Places every group of `design` onto `platform`.
///
/// Groups that cannot be placed are reported to `sink` as errors and listed
/// in [`PlacementReport::unplaced`]; the pass continues with the remaining
/// groups. Only internal errors abort the pass.
pub fn place_design(
    design: &mut Design,
    platform: &mut Platform,
    options: &PlacementOptions,
    sink: &DiagnosticSink,
) -> Result<PlacementReport, MappingError> {
    if design.ungrouped_components().next().is_some() {
        discover_subsystems(design);
    }
    if options.compute_distances {
        platform.compute_input_distances();
    }
    if options.normalize_links {
        platform.normalize_links();
    }

    let order = placement_order(design);
    log::info!(
        "placing {} group(s) on {} FPGA(s)",
        order.len(),
        platform.fpgas().len()
    );
    let mut unplaced = Vec::new();
    for group in order {
        if assign_group(design, platform, group, options.weights, sink)? == Assignment::Unplaced {
            unplaced.push(design.group(group).name.clone());
        }
    }

    account_connections(design, platform, sink)?;
    Ok(PlacementReport::build(design, platform, unplaced))
}
