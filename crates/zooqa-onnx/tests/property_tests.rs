//! Property tests for the wire codec and the model round trip.

use proptest::prelude::*;
use zooqa_onnx::builder::{GraphBuilder, ModelBuilder};
use zooqa_onnx::wire::{Decoder, Encoder};
use zooqa_onnx::{elem_type, parse_model};

proptest! {
    /// Every u64 survives an encode/decode round trip.
    #[test]
    fn varint_round_trips(value in any::<u64>()) {
        let mut enc = Encoder::new();
        enc.raw_varint(value);
        let bytes = enc.into_bytes();
        prop_assert!(bytes.len() <= 10);
        let mut dec = Decoder::new(&bytes);
        prop_assert_eq!(dec.varint().unwrap(), value);
        prop_assert!(dec.is_empty());
    }

    /// Field keys round-trip for the full field-number range.
    #[test]
    fn tag_round_trips(field in 1u32..=536_870_911, value in any::<u64>()) {
        let mut enc = Encoder::new();
        enc.varint_field(field, value);
        let bytes = enc.into_bytes();
        let mut dec = Decoder::new(&bytes);
        let (f, w) = dec.tag().unwrap();
        prop_assert_eq!(f, field);
        prop_assert_eq!(w, 0);
        prop_assert_eq!(dec.varint().unwrap(), value);
    }

    /// String payloads round-trip byte-for-byte.
    #[test]
    fn string_field_round_trips(s in "[a-zA-Z0-9_./ -]{0,64}") {
        let mut enc = Encoder::new();
        enc.string_field(4, &s);
        let bytes = enc.into_bytes();
        let mut dec = Decoder::new(&bytes);
        let (field, _) = dec.tag().unwrap();
        prop_assert_eq!(field, 4);
        prop_assert_eq!(dec.string(field).unwrap(), s);
    }

    /// A decoder never panics on arbitrary bytes: it either consumes the
    /// buffer or reports a structured error.
    #[test]
    fn parse_model_never_panics(bytes in proptest::collection::vec(any::<u8>(), 0..512)) {
        let _ = parse_model(&bytes);
    }

    /// Parsed models round-trip through JSON without data loss.
    #[test]
    fn model_json_roundtrip(opset in 1i64..=30, name in "[a-z][a-z0-9_]{0,12}") {
        let bytes = ModelBuilder::new()
            .opset("", opset)
            .graph(
                GraphBuilder::new(&name)
                    .input("x", elem_type::FLOAT, &[1])
                    .node("Identity", "id", &["x"], &["y"])
                    .output("y", elem_type::FLOAT, &[1]),
            )
            .encode();
        let model = parse_model(&bytes).unwrap();
        let json = serde_json::to_string(&model).expect("serialize");
        let back: zooqa_onnx::ModelFile = serde_json::from_str(&json).expect("deserialize");
        prop_assert_eq!(model, back);
    }

    /// Builder output parses back with the declared opset and names intact.
    #[test]
    fn built_model_round_trips(
        opset in 1i64..=30,
        ir in 3i64..=10,
        graph_name in "[a-z][a-z0-9_]{0,16}",
        node_name in "[a-z][a-z0-9_]{0,16}",
    ) {
        let bytes = ModelBuilder::new()
            .ir_version(ir)
            .opset("", opset)
            .graph(
                GraphBuilder::new(&graph_name)
                    .input("x", elem_type::FLOAT, &[1])
                    .node("Identity", &node_name, &["x"], &["y"])
                    .output("y", elem_type::FLOAT, &[1]),
            )
            .encode();
        let model = parse_model(&bytes).unwrap();
        prop_assert_eq!(model.ir_version, ir);
        prop_assert_eq!(model.first_opset_version(), Some(opset));
        let graph = model.graph.unwrap();
        prop_assert_eq!(graph.name, graph_name);
        prop_assert_eq!(&graph.nodes[0].name, &node_name);
    }
}
