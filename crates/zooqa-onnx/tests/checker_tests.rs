//! Structural checker tests: valid models pass, each violation class is
//! reported with the offending name.

use zooqa_onnx::builder::{GraphBuilder, ModelBuilder};
use zooqa_onnx::{check_model, check_model_file, elem_type, parse_model, CheckError};

fn valid_two_node_model() -> ModelBuilder {
    ModelBuilder::new()
        .opset("", 13)
        .graph(
            GraphBuilder::new("g")
                .input("x", elem_type::FLOAT, &[1, 8])
                .initializer("w", elem_type::FLOAT, &[8, 8])
                .node("MatMul", "mm", &["x", "w"], &["h"])
                .node("Relu", "act", &["h"], &["y"])
                .output("y", elem_type::FLOAT, &[1, 8]),
        )
}

#[test]
fn valid_model_passes() {
    let model = parse_model(&valid_two_node_model().encode()).unwrap();
    assert_eq!(check_model(&model), Ok(()));
}

#[test]
fn ir_version_zero_is_rejected() {
    let model = parse_model(&valid_two_node_model().ir_version(0).encode()).unwrap();
    assert_eq!(check_model(&model), Err(CheckError::BadIrVersion(0)));
}

#[test]
fn missing_opset_import_is_rejected() {
    let bytes = ModelBuilder::new().graph(GraphBuilder::new("g")).encode();
    let model = parse_model(&bytes).unwrap();
    assert_eq!(check_model(&model), Err(CheckError::NoOpsetImport));
}

#[test]
fn duplicate_opset_domain_is_rejected() {
    let model =
        parse_model(&valid_two_node_model().opset("", 14).encode()).unwrap();
    assert_eq!(
        check_model(&model),
        Err(CheckError::DuplicateOpsetDomain(String::new()))
    );
}

#[test]
fn non_positive_opset_version_is_rejected() {
    let bytes = ModelBuilder::new().opset("", 0).graph(GraphBuilder::new("g")).encode();
    let model = parse_model(&bytes).unwrap();
    assert_eq!(
        check_model(&model),
        Err(CheckError::BadOpsetVersion { domain: String::new(), version: 0 })
    );
}

#[test]
fn missing_graph_is_rejected() {
    let model = parse_model(&ModelBuilder::new().opset("", 13).encode()).unwrap();
    assert_eq!(check_model(&model), Err(CheckError::MissingGraph));
}

#[test]
fn empty_op_type_is_rejected() {
    let bytes = ModelBuilder::new()
        .opset("", 13)
        .graph(
            GraphBuilder::new("g")
                .input("x", elem_type::FLOAT, &[1])
                .node("", "broken", &["x"], &["y"])
                .output("y", elem_type::FLOAT, &[1]),
        )
        .encode();
    let model = parse_model(&bytes).unwrap();
    assert_eq!(check_model(&model), Err(CheckError::EmptyOpType { node: "broken".into() }));
}

#[test]
fn unknown_node_input_is_rejected() {
    let bytes = ModelBuilder::new()
        .opset("", 13)
        .graph(
            GraphBuilder::new("g")
                .input("x", elem_type::FLOAT, &[1])
                .node("Relu", "act", &["ghost"], &["y"])
                .output("y", elem_type::FLOAT, &[1]),
        )
        .encode();
    let model = parse_model(&bytes).unwrap();
    assert_eq!(
        check_model(&model),
        Err(CheckError::UnknownInput { node: "act".into(), input: "ghost".into() })
    );
}

#[test]
fn forward_reference_is_rejected() {
    // "h" is produced by the second node; consuming it first violates the
    // topological-order rule.
    let bytes = ModelBuilder::new()
        .opset("", 13)
        .graph(
            GraphBuilder::new("g")
                .input("x", elem_type::FLOAT, &[1])
                .node("Relu", "late", &["h"], &["y"])
                .node("Identity", "early", &["x"], &["h"])
                .output("y", elem_type::FLOAT, &[1]),
        )
        .encode();
    let model = parse_model(&bytes).unwrap();
    assert_eq!(
        check_model(&model),
        Err(CheckError::UnknownInput { node: "late".into(), input: "h".into() })
    );
}

#[test]
fn duplicate_node_output_is_rejected() {
    let bytes = ModelBuilder::new()
        .opset("", 13)
        .graph(
            GraphBuilder::new("g")
                .input("x", elem_type::FLOAT, &[1])
                .node("Identity", "a", &["x"], &["y"])
                .node("Relu", "b", &["x"], &["y"])
                .output("y", elem_type::FLOAT, &[1]),
        )
        .encode();
    let model = parse_model(&bytes).unwrap();
    assert_eq!(check_model(&model), Err(CheckError::DuplicateValue("y".into())));
}

#[test]
fn initializer_may_shadow_graph_input() {
    // Pre-IR-4 exporters list every initializer as a graph input too; that
    // is not a duplicate definition.
    let bytes = ModelBuilder::new()
        .opset("", 13)
        .graph(
            GraphBuilder::new("g")
                .input("x", elem_type::FLOAT, &[1])
                .input("w", elem_type::FLOAT, &[1])
                .initializer("w", elem_type::FLOAT, &[1])
                .node("Add", "add", &["x", "w"], &["y"])
                .output("y", elem_type::FLOAT, &[1]),
        )
        .encode();
    let model = parse_model(&bytes).unwrap();
    assert_eq!(check_model(&model), Ok(()));
}

#[test]
fn optional_input_slot_is_allowed() {
    // An empty input name marks an unused optional slot (e.g. Clip without
    // an explicit min).
    let bytes = ModelBuilder::new()
        .opset("", 13)
        .graph(
            GraphBuilder::new("g")
                .input("x", elem_type::FLOAT, &[1])
                .node("Clip", "clip", &["x", "", "max"], &["y"])
                .initializer("max", elem_type::FLOAT, &[])
                .output("y", elem_type::FLOAT, &[1]),
        )
        .encode();
    let model = parse_model(&bytes).unwrap();
    assert_eq!(check_model(&model), Ok(()));
}

#[test]
fn unproduced_graph_output_is_rejected() {
    let bytes = ModelBuilder::new()
        .opset("", 13)
        .graph(
            GraphBuilder::new("g")
                .input("x", elem_type::FLOAT, &[1])
                .node("Identity", "id", &["x"], &["y"])
                .output("z", elem_type::FLOAT, &[1]),
        )
        .encode();
    let model = parse_model(&bytes).unwrap();
    assert_eq!(check_model(&model), Err(CheckError::UnproducedOutput("z".into())));
}

#[test]
fn graph_output_fed_by_initializer_passes() {
    let bytes = ModelBuilder::new()
        .opset("", 13)
        .graph(
            GraphBuilder::new("g")
                .initializer("c", elem_type::FLOAT, &[1])
                .output("c", elem_type::FLOAT, &[1]),
        )
        .encode();
    let model = parse_model(&bytes).unwrap();
    assert_eq!(check_model(&model), Ok(()));
}

#[test]
fn check_model_file_reports_path_on_parse_failure() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.onnx");
    std::fs::write(&path, [0xfb, 0x01, 0x02]).unwrap();

    let err = check_model_file(&path).unwrap_err();
    assert!(format!("{err:#}").contains("broken.onnx"));
}

#[test]
fn check_model_file_accepts_valid_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ok.onnx");
    valid_two_node_model().write_to(&path).unwrap();
    check_model_file(&path).unwrap();
}
