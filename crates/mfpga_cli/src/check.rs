//! `mfpga check`: descriptor validation and group requirements.

use mfpga_design::Design;
use mfpga_platform::Platform;

use crate::{CheckArgs, GlobalArgs};

/// Runs the `mfpga check` command.
///
/// Loads both descriptors, then lists every group with its requirement and
/// the FPGAs that could host it on their own. Returns exit code 1 if some
/// group has no such FPGA.
pub fn run(args: &CheckArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let platform = mfpga_config::load_platform(&args.platform)?;
    let design = mfpga_config::load_design(&args.design)?.design;

    if !global.quiet {
        eprintln!(
            "   Checking {} group(s) against {} FPGA(s)",
            design.non_empty_groups().count(),
            platform.fpgas().len()
        );
    }

    let (text, hopeless) = summarize(&design, &platform)?;
    print!("{text}");
    if hopeless > 0 {
        eprintln!("error: {hopeless} group(s) fit on no FPGA");
        return Ok(1);
    }
    Ok(0)
}

/// Renders one block per group and counts groups without any host.
fn summarize(
    design: &Design,
    platform: &Platform,
) -> Result<(String, usize), Box<dyn std::error::Error>> {
    let mut out = String::new();
    let mut hopeless = 0;
    for group in design.non_empty_groups() {
        let g = design.group(group);
        out.push_str(&format!(
            "{} ({} component(s), {} port(s))\n  requires {}\n",
            g.name,
            g.len(),
            design.group_port_count(group),
            design.required_resources(group)
        ));
        let mut hosts = Vec::new();
        for fpga in platform.fpgas().values() {
            if design.group_supports_architecture(group, &fpga.family)
                && fpga.has_sufficient_resources(design, group)?
            {
                hosts.push(fpga.name.as_str());
            }
        }
        if hosts.is_empty() {
            hopeless += 1;
            out.push_str("  fits on: none\n");
        } else {
            out.push_str(&format!("  fits on: {}\n", hosts.join(", ")));
        }
    }
    Ok((out, hopeless))
}
