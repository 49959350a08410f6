//! Descriptor to placement flow, end to end.

use mfpga_common::MappingError;
use mfpga_config::{load_design_from_str, load_platform_from_str};
use mfpga_diagnostics::{DiagnosticCode, DiagnosticRenderer, DiagnosticSink, TerminalRenderer};
use mfpga_place::{place_design, PlacementOptions, PlacementReport};
use mfpga_platform::Platform;
use mfpga_design::Design;

fn place(platform: &str, design: &str) -> (Platform, Design, PlacementReport, DiagnosticSink) {
    let mut platform = load_platform_from_str(platform).unwrap();
    let loaded = load_design_from_str(design).unwrap();
    let mut design = loaded.design;
    let options = PlacementOptions {
        weights: loaded.weights,
        ..PlacementOptions::default()
    };
    let sink = DiagnosticSink::new();
    let report = place_design(&mut design, &mut platform, &options, &sink).unwrap();
    (platform, design, report, sink)
}

const SINGLE_FPGA: &str = r#"
[vortex]
ports_per_router = 4
router = { LUT = 2 }
bridge = { LUT = 1 }
bridge_endpoint = { LUT = 1 }

[[fpga]]
name = "F"
family = "artix7"
resources = { LUT = 100 }
input = true
"#;

#[test]
fn first_group_builds_one_router() {
    let design = r#"
[[component]]
name = "a"
resources = { LUT = 8 }

[[component.attachment]]
kind = "sap"
name = "p0"
resources = { LUT = 1 }

[[component.attachment]]
kind = "sop"
name = "p1"
resources = { LUT = 1 }
"#;
    let (_, _, report, sink) = place(SINGLE_FPGA, design);
    assert!(report.is_complete());
    assert!(!sink.has_errors());
    let f = report.fpga("F").unwrap();
    assert_eq!(f.routers, 1);
    assert_eq!(f.bridges, 0);
    assert_eq!(f.used.get("LUT"), 10 + 2);
    assert_eq!(f.components, vec!["a"]);
}

#[test]
fn oversized_second_group_is_reported_and_leaves_usage() {
    let design = r#"
[[component]]
name = "a"
resources = { LUT = 8 }
input = true

[[component.attachment]]
kind = "sap"
name = "p0"
resources = { LUT = 1 }

[[component.attachment]]
kind = "sop"
name = "p1"
resources = { LUT = 1 }

[[component]]
name = "b"
resources = { LUT = 95 }
"#;
    let (_, design, report, sink) = place(SINGLE_FPGA, design);
    let b_group = design
        .group(design.component(design.component_by_name("b").unwrap()).group().unwrap())
        .name
        .clone();
    assert_eq!(report.unplaced, vec![b_group]);
    assert_eq!(report.fpga("F").unwrap().used.get("LUT"), 12);

    let diags = sink.take_all();
    let error = diags
        .iter()
        .find(|d| d.code == DiagnosticCode::UNPLACEABLE_GROUP)
        .unwrap();
    assert!(error.notes[0].ends_with("'LUT' : 95 / 88"));

    let text = TerminalRenderer::new(false).render(error);
    assert!(text.starts_with("error[E301]: group"));
    assert!(text.contains("= note:"));
    assert!(text.contains("'LUT' : 95 / 88"));
}

const TWO_BOARDS: &str = r#"
[[fpga]]
name = "A"
family = "artix7"
resources = { LUT = 100 }
input = true
cluster = "C1"

[[fpga]]
name = "B"
family = "artix7"
resources = { LUT = 100 }
cluster = "C1"

[[link]]
from = "A"
to = "B"
speed = 1.0
"#;

#[test]
fn placed_group_cannot_move_to_another_fpga() {
    let design = r#"
[[component]]
name = "core"
resources = { LUT = 10 }
"#;
    let (mut platform, mut design, report, _) = place(TWO_BOARDS, design);
    let group = design.group_by_name("subsystem_0").unwrap();
    let host = report.fpga_of_group("subsystem_0").unwrap().to_string();
    let other = if host == "A" { "B" } else { "A" };
    let other = platform.fpga_by_name(other).unwrap();

    let err = platform.map_group(other, &mut design, group).unwrap_err();
    assert_eq!(
        err,
        MappingError::GroupAlreadyMapped {
            group: "subsystem_0".to_string(),
            target: host,
        }
    );
    assert!(platform.fpga(other).used_resources().is_zero());
}

#[test]
fn clustered_fpga_cannot_join_second_cluster() {
    let mut platform = load_platform_from_str(TWO_BOARDS).unwrap();
    let b = platform.fpga_by_name("B").unwrap();
    platform.add_cluster("C2").unwrap();
    let err = platform.add_fpga_to_cluster("C2", b).unwrap_err();
    assert!(matches!(err, MappingError::FpgaAlreadyClustered { .. }));
    assert_eq!(platform.fpga(b).cluster(), Some("C1"));
    assert!(platform.cluster("C1").unwrap().contains(b));
    assert!(platform.cluster("C2").unwrap().members().is_empty());
}

#[test]
fn cross_fpga_traffic_is_normalized_against_fastest_link() {
    let platform = r#"
[[fpga]]
name = "F0"
family = "fam0"
resources = { LUT = 100 }
input = true

[[fpga]]
name = "F1"
family = "fam1"
resources = { LUT = 100 }

[[fpga]]
name = "F2"
family = "fam1"
resources = { LUT = 100 }

[[link]]
from = "F0"
to = "F1"
speed = 100.0

[[link]]
from = "F1"
to = "F2"
speed = 200.0
"#;
    let design = r#"
[[component]]
name = "x"
resources = { LUT = 10 }
architectures = ["fam0"]

[[component]]
name = "y"
resources = { LUT = 10 }
architectures = ["fam1"]

[[connection]]
from = "x"
to = "y"
density = 10.0

[[group]]
name = "gx"
members = ["x"]

[[group]]
name = "gy"
members = ["y"]
"#;
    let (_, _, report, sink) = place(platform, design);
    assert!(report.is_complete());
    assert_eq!(report.fpga_of_group("gx"), Some("F0"));
    // F1 is one hop closer to the input than F2.
    assert_eq!(report.fpga_of_group("gy"), Some("F1"));
    assert_eq!(report.fpga("F2").unwrap().distance_from_input, 2);

    let link = report.links.iter().find(|l| l.name == "F0 <-> F1").unwrap();
    assert_eq!(link.connections, 1);
    assert_eq!(link.usage, 10.0);
    assert_eq!(link.link_usage, 20.0);
    assert!(sink.diagnostics().iter().all(|d| d.code != DiagnosticCode::NO_DIRECT_LINK));
}

#[test]
fn missing_direct_link_is_a_warning() {
    let platform = r#"
[[fpga]]
name = "F0"
family = "fam0"
resources = { LUT = 100 }

[[fpga]]
name = "F1"
family = "fam1"
resources = { LUT = 100 }
"#;
    let design = r#"
[[component]]
name = "x"
architectures = ["fam0"]

[[component]]
name = "y"
architectures = ["fam1"]

[[connection]]
from = "x"
to = "y"

[[group]]
name = "gx"
members = ["x"]

[[group]]
name = "gy"
members = ["y"]
"#;
    let (_, _, report, sink) = place(platform, design);
    assert!(report.is_complete());
    assert!(!sink.has_errors());
    assert!(sink
        .diagnostics()
        .iter()
        .any(|d| d.code == DiagnosticCode::NO_DIRECT_LINK));
}

#[test]
fn larger_closer_fpga_wins() {
    let platform = r#"
[[fpga]]
name = "in"
family = "artix7"
resources = { LUT = 50 }
input = true

[[fpga]]
name = "big_near"
family = "artix7"
resources = { LUT = 400 }

[[fpga]]
name = "big_far"
family = "artix7"
resources = { LUT = 400 }

[[fpga]]
name = "small_near"
family = "artix7"
resources = { LUT = 100 }

[[link]]
from = "in"
to = "big_near"
speed = 1.0

[[link]]
from = "in"
to = "small_near"
speed = 1.0

[[link]]
from = "big_near"
to = "big_far"
speed = 1.0
"#;
    let design = r#"
[[component]]
name = "core"
resources = { LUT = 60 }
"#;
    let (_, _, report, _) = place(platform, design);
    assert_eq!(report.fpga_of_group("subsystem_0"), Some("big_near"));
}

#[test]
fn unmapping_after_placement_restores_availability() {
    let design = r#"
[[component]]
name = "a"
resources = { LUT = 8 }

[[component.attachment]]
kind = "sap"
name = "p0"
resources = { LUT = 1 }
"#;
    let mut platform = load_platform_from_str(SINGLE_FPGA).unwrap();
    let f = platform.fpga_by_name("F").unwrap();
    let before = platform.fpga(f).available_resources();
    let mut design = load_design_from_str(design).unwrap().design;
    let sink = DiagnosticSink::new();
    place_design(&mut design, &mut platform, &PlacementOptions::default(), &sink).unwrap();
    assert_ne!(platform.fpga(f).available_resources(), before);

    let group = design.group_by_name("subsystem_0").unwrap();
    platform.unmap_group(f, &mut design, group).unwrap();
    assert_eq!(platform.fpga(f).available_resources(), before);
    assert_eq!(platform.fpga(f).vortex().router_count(), 0);
    assert!(!design.group(group).is_mapped());
}

#[test]
fn report_serializes_to_json() {
    let design = r#"
[[component]]
name = "a"
resources = { LUT = 8 }
"#;
    let (_, _, report, _) = place(SINGLE_FPGA, design);
    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["fpgas"][0]["name"], "F");
    assert_eq!(json["fpgas"][0]["used"]["LUT"], 8);
    assert_eq!(json["unplaced"].as_array().unwrap().len(), 0);
}
