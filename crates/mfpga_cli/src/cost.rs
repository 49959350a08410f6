//! `mfpga cost`: interconnect cost table for one FPGA.

use mfpga_platform::Fpga;

use crate::{CostArgs, GlobalArgs};

/// Runs the `mfpga cost` command.
///
/// Prints how many routers and bridges the FPGA's interconnect needs to seat
/// `--ports` attachments and what they cost against its total resources.
pub fn run(args: &CostArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let platform = mfpga_config::load_platform(&args.platform)?;
    let id = platform
        .fpga_by_name(&args.fpga)
        .ok_or_else(|| format!("unknown FPGA '{}'", args.fpga))?;
    let fpga = platform.fpga(id);

    if !global.quiet {
        eprintln!(
            "   Pricing {} port(s) on {} ({} ports per router)",
            args.ports,
            fpga.name,
            fpga.vortex_spec().ports_per_router
        );
    }
    print!("{}", cost_table(fpga, args.ports)?);
    Ok(0)
}

fn cost_table(fpga: &Fpga, ports: u32) -> Result<String, Box<dyn std::error::Error>> {
    let spec = fpga.vortex_spec();
    let routers = spec.router_count_for(ports)?;
    let cost = spec.infrastructure_cost(ports)?;
    let total = fpga.total_resources();

    let mut out = format!(
        "routers: {routers}\nbridges: {}\n",
        routers.saturating_sub(1)
    );
    for (name, amount) in cost.iter() {
        out.push_str(&format!("  {name:<10}  {amount:>8} / {}\n", total.get(name)));
    }
    Ok(out)
}
