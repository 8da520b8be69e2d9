mod support;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use csg_recipe::{ExportEnvelope, ExportFormat, compile_recipe, export_geometry};
use serde_json::json;

use crate::support::approx_eq;

fn bracket() -> serde_json::Value {
    json!({
        "version": 1,
        "name": "Bracket #2 (left)",
        "root": {
            "type": "union",
            "children": [
                { "type": "cuboid", "size": [10, 2, 2] },
                { "type": "cuboid", "size": [2, 2, 10], "center": [4, 0, 4] }
            ]
        }
    })
}

#[test]
fn ascii_stl_export() {
    let result = compile_recipe(&bracket()).unwrap();
    let file = export_geometry(&result.geometry, ExportFormat::Stl, Some("Bracket #2 (left)")).unwrap();
    assert_eq!(file.filename, "Bracket_2_left_.stl");
    assert_eq!(file.extension, "stl");
    assert_eq!(file.mime, "model/stl");

    let text = String::from_utf8(file.bytes).unwrap();
    assert!(text.starts_with("solid Bracket_2_left_\n"));
    assert!(text.trim_end().ends_with("endsolid Bracket_2_left_"));
    let facets = text.matches("facet normal").count();
    assert!(facets >= 12);
    assert_eq!(text.matches("vertex ").count(), facets * 3);
}

#[test]
fn obj_export() {
    let result = compile_recipe(&bracket()).unwrap();
    let file = export_geometry(&result.geometry, ExportFormat::Obj, None).unwrap();
    assert_eq!(file.filename, "model.obj");
    assert_eq!(file.mime, "model/obj");

    let text = String::from_utf8(file.bytes).unwrap();
    let vertices = text.lines().filter(|l| l.starts_with("v ")).count();
    assert!(vertices > 0);
    for line in text.lines().filter(|l| l.starts_with("f ")) {
        for index in line[2..].split(' ') {
            let index: usize = index.parse().unwrap();
            assert!((1..=vertices).contains(&index), "{line}");
        }
    }
}

#[cfg(feature = "stl-io")]
#[test]
fn binary_stl_export() {
    let result = compile_recipe(&bracket()).unwrap();
    let file = export_geometry(&result.geometry, ExportFormat::StlBinary, Some("bracket")).unwrap();
    assert_eq!(file.filename, "bracket.stl");
    let count = u32::from_le_bytes(file.bytes[80..84].try_into().unwrap()) as usize;
    assert_eq!(file.bytes.len(), 84 + count * 50);
    assert!(count >= 12);
}

#[test]
fn envelope_carries_base64_and_stats() {
    let result = compile_recipe(&bracket()).unwrap();
    let file = export_geometry(&result.geometry, ExportFormat::Stl, Some("bracket")).unwrap();
    let envelope = ExportEnvelope::new(ExportFormat::Stl, &file, result.stats());

    let value = serde_json::to_value(&envelope).unwrap();
    assert_eq!(value["ok"], json!(true));
    assert_eq!(value["format"], json!("stl"));
    assert_eq!(value["filename"], json!("bracket.stl"));
    assert_eq!(value["mime"], json!("model/stl"));
    assert_eq!(value["stats"]["nodeCount"], json!(3));
    let expected = [[-5.0, -1.0, -1.0], [5.0, 1.0, 9.0]];
    for (corner, expected) in expected.iter().enumerate() {
        for (axis, e) in expected.iter().enumerate() {
            let got = value["stats"]["boundingBox"][corner][axis].as_f64().unwrap();
            assert!(approx_eq(got, *e, 1e-9), "{got} != {e}");
        }
    }

    let decoded = STANDARD
        .decode(value["bytesBase64"].as_str().unwrap())
        .unwrap();
    assert_eq!(decoded, file.bytes);
}
