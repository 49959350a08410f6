//! `mfpga map`: placement pipeline.
//!
//! 1. Load `platform.toml` and `design.toml` via `mfpga_config`
//! 2. Run the placement driver
//! 3. Render diagnostics to stderr
//! 4. Print the placement report as text or JSON

use mfpga_diagnostics::{DiagnosticRenderer, DiagnosticSink, Severity, TerminalRenderer};
use mfpga_place::{place_design, PlacementOptions};

use crate::{GlobalArgs, MapArgs, ReportFormat};

/// Runs the `mfpga map` command.
///
/// Returns exit code 0 if every group was placed, 1 otherwise.
pub fn run(args: &MapArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let mut platform = mfpga_config::load_platform(&args.platform)?;
    let loaded = mfpga_config::load_design(&args.design)?;
    let mut design = loaded.design;

    if !global.quiet {
        eprintln!(
            "   Mapping {} component(s) onto {} FPGA(s)",
            design.components().len(),
            platform.fpgas().len()
        );
    }

    let options = PlacementOptions {
        weights: loaded.weights,
        ..PlacementOptions::default()
    };
    let sink = DiagnosticSink::new();
    let report = place_design(&mut design, &mut platform, &options, &sink)?;

    let renderer = TerminalRenderer::new(global.color);
    for diag in sink.diagnostics() {
        let shown = match diag.severity {
            Severity::Error => true,
            Severity::Warning => !global.quiet,
            Severity::Note | Severity::Help => global.verbose,
        };
        if shown {
            eprint!("{}", renderer.render(&diag));
        }
    }

    match args.format {
        ReportFormat::Text => print!("{report}"),
        ReportFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }

    if !global.quiet {
        eprintln!(
            "   Result: {} group(s) placed, {} unplaced, {} warning(s)",
            report.fpgas.iter().map(|f| f.groups.len()).sum::<usize>(),
            report.unplaced.len(),
            sink.count(Severity::Warning)
        );
    }

    Ok(if sink.has_errors() { 1 } else { 0 })
}
