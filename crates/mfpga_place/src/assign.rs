//! Greedy assignment of groups to FPGAs.

use mfpga_common::{FpgaId, GroupId, MappingError};
use mfpga_design::Design;
use mfpga_diagnostics::{Diagnostic, DiagnosticCode, DiagnosticSink};
use mfpga_platform::{Fpga, FpgaComparator, Platform, ScoreWeights};

/// Outcome of trying to place one group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Assignment {
    /// The group was mapped by this call.
    Placed(FpgaId),
    /// The group was already mapped before this call.
    AlreadyPlaced(FpgaId),
    /// No compatible FPGA could take the group.
    Unplaced,
}

/// Maps `group` onto the best-scoring FPGA that supports its architecture and
/// has room for it, falling back to the next candidate if the interconnect
/// rejects an attachment.
///
/// Failures that only concern this group are reported to `sink` and yield
/// [`Assignment::Unplaced`]; internal errors are returned.
pub fn assign_group(
    design: &mut Design,
    platform: &mut Platform,
    group: GroupId,
    weights: ScoreWeights,
    sink: &DiagnosticSink,
) -> Result<Assignment, MappingError> {
    if let Some(fpga) = design.group(group).target_fpga() {
        return Ok(Assignment::AlreadyPlaced(fpga));
    }
    let name = design.group(group).name.clone();

    let compatible: Vec<&Fpga> = platform
        .fpgas()
        .values()
        .filter(|f| design.group_supports_architecture(group, &f.family))
        .collect();
    if compatible.is_empty() {
        sink.emit(
            Diagnostic::error(
                DiagnosticCode::UNSUPPORTED_ARCHITECTURE,
                format!("no FPGA family is supported by every component of group '{name}'"),
            )
            .with_subject(format!("group '{name}'")),
        );
        return Ok(Assignment::Unplaced);
    }

    let comparator = FpgaComparator::new(weights, compatible.iter().copied());
    let mut feasible = Vec::new();
    let mut rejections = Vec::new();
    for &fpga in &compatible {
        if fpga.has_sufficient_resources(design, group)? {
            feasible.push(fpga);
        } else {
            let needed = fpga.resources_to_support(design, group)?;
            rejections.push(
                MappingError::InsufficientResources {
                    fpga: fpga.name.clone(),
                    group: name.clone(),
                    report: fpga.resources().support_report(&needed),
                }
                .to_string(),
            );
        }
    }
    comparator.rank(&mut feasible);
    let ranked: Vec<FpgaId> = feasible.iter().map(|f| f.id).collect();
    log::debug!("group '{name}': {} feasible of {} compatible FPGA(s)", ranked.len(), compatible.len());

    for fpga in ranked {
        match platform.map_group(fpga, design, group) {
            Ok(()) => {
                let fpga_name = &platform.fpga(fpga).name;
                sink.emit(
                    Diagnostic::note(
                        DiagnosticCode::GROUP_PLACED,
                        format!("placed group '{name}' on FPGA '{fpga_name}'"),
                    )
                    .with_subject(format!("group '{name}'")),
                );
                return Ok(Assignment::Placed(fpga));
            }
            Err(err @ MappingError::AttachmentRejected { .. })
            | Err(err @ MappingError::InsufficientResources { .. }) => {
                log::debug!("group '{name}' rejected: {err}");
                rejections.push(err.to_string());
            }
            Err(err) => return Err(err),
        }
    }

    let mut diag = Diagnostic::error(
        DiagnosticCode::UNPLACEABLE_GROUP,
        format!("group '{name}' does not fit on any FPGA"),
    )
    .with_subject(format!("group '{name}'"));
    for rejection in rejections {
        diag = diag.with_note(rejection);
    }
    sink.emit(diag.with_help("split the group or add capacity to the platform"));
    Ok(Assignment::Unplaced)
}
