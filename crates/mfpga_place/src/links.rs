//! Link-usage accounting for connections that cross FPGAs.

use mfpga_common::MappingError;
use mfpga_design::Design;
use mfpga_diagnostics::{Diagnostic, DiagnosticCode, DiagnosticSink};
use mfpga_platform::Platform;

/// Routes every connection whose endpoints sit on different FPGAs over a
/// direct link between them. Connections without a direct link are reported
/// as warnings; connections already routed over their link are skipped.
///
/// Returns the number of connections newly routed.
pub fn account_connections(
    design: &Design,
    platform: &mut Platform,
    sink: &DiagnosticSink,
) -> Result<usize, MappingError> {
    let mut routed = 0;
    for (id, connection) in design.connections().iter() {
        let from = design.component(connection.from);
        let to = design.component(connection.to);
        let endpoints = from
            .group()
            .and_then(|g| design.group(g).target_fpga())
            .zip(to.group().and_then(|g| design.group(g).target_fpga()));
        let Some((a, b)) = endpoints else {
            continue;
        };
        if a == b {
            continue;
        }
        let Some(link) = platform.link_between(a, b) else {
            let (fa, fb) = (&platform.fpga(a).name, &platform.fpga(b).name);
            sink.emit(
                Diagnostic::warning(
                    DiagnosticCode::NO_DIRECT_LINK,
                    format!("no direct link from FPGA '{fa}' to FPGA '{fb}'"),
                )
                .with_subject(format!("connection '{}' -> '{}'", from.name, to.name))
                .with_note(format!("data density {}", connection.data_density)),
            );
            continue;
        };
        let link = platform.link_mut(link);
        if link.connections().any(|c| c == id) {
            continue;
        }
        link.add_connection(id, connection.data_density)?;
        routed += 1;
    }
    log::debug!("routed {routed} cross-FPGA connection(s)");
    Ok(routed)
}
