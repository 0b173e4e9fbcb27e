//! Programmatic construction of small ONNX model files.
//!
//! Test suites and fixtures need real model bytes on disk without dragging in
//! an exporter toolchain. [`ModelBuilder`] assembles the structural subset
//! this crate parses and serializes it with the wire [`Encoder`], so the
//! output is a genuine `ModelProto` any ONNX reader accepts.
//!
//! Tensor payloads are intentionally absent: a built model describes shape
//! and topology, which is all the checker and the skip rules look at.

use std::path::Path;

use crate::model::field;
use crate::wire::Encoder;
use crate::Result;

/// Builder for a serialized `ModelProto`.
#[derive(Debug, Clone)]
pub struct ModelBuilder {
    ir_version: i64,
    producer_name: String,
    producer_version: String,
    opsets: Vec<(String, i64)>,
    graph: Option<GraphBuilder>,
}

impl Default for ModelBuilder {
    fn default() -> Self {
        Self {
            ir_version: 8,
            producer_name: String::new(),
            producer_version: String::new(),
            opsets: Vec::new(),
            graph: None,
        }
    }
}

impl ModelBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ir_version(mut self, version: i64) -> Self {
        self.ir_version = version;
        self
    }

    pub fn producer(mut self, name: &str, version: &str) -> Self {
        self.producer_name = name.to_owned();
        self.producer_version = version.to_owned();
        self
    }

    /// Declare an operator-set import; empty domain is the default ONNX domain.
    pub fn opset(mut self, domain: &str, version: i64) -> Self {
        self.opsets.push((domain.to_owned(), version));
        self
    }

    pub fn graph(mut self, graph: GraphBuilder) -> Self {
        self.graph = Some(graph);
        self
    }

    /// Serialize to `ModelProto` bytes.
    pub fn encode(&self) -> Vec<u8> {
        use field::model as f;

        let mut enc = Encoder::new();
        enc.int64_field(f::IR_VERSION, self.ir_version);
        if !self.producer_name.is_empty() {
            enc.string_field(f::PRODUCER_NAME, &self.producer_name);
        }
        if !self.producer_version.is_empty() {
            enc.string_field(f::PRODUCER_VERSION, &self.producer_version);
        }
        if let Some(graph) = &self.graph {
            enc.message_field(f::GRAPH, &graph.encode());
        }
        for (domain, version) in &self.opsets {
            let mut opset = Encoder::new();
            if !domain.is_empty() {
                opset.string_field(field::opset::DOMAIN, domain);
            }
            opset.int64_field(field::opset::VERSION, *version);
            enc.message_field(f::OPSET_IMPORT, &opset);
        }
        enc.into_bytes()
    }

    /// Serialize and write the model to `path`.
    pub fn write_to(&self, path: impl AsRef<Path>) -> Result<()> {
        std::fs::write(path, self.encode())?;
        Ok(())
    }
}

/// Builder for the `GraphProto` portion of a model.
#[derive(Debug, Clone, Default)]
pub struct GraphBuilder {
    name: String,
    nodes: Vec<NodeSpec>,
    inputs: Vec<ValueSpec>,
    outputs: Vec<ValueSpec>,
    initializers: Vec<InitSpec>,
}

#[derive(Debug, Clone)]
struct NodeSpec {
    op_type: String,
    name: String,
    inputs: Vec<String>,
    outputs: Vec<String>,
}

#[derive(Debug, Clone)]
struct ValueSpec {
    name: String,
    elem_type: i32,
    dims: Vec<i64>,
}

#[derive(Debug, Clone)]
struct InitSpec {
    name: String,
    data_type: i32,
    dims: Vec<i64>,
}

impl GraphBuilder {
    pub fn new(name: &str) -> Self {
        Self { name: name.to_owned(), ..Self::default() }
    }

    pub fn input(mut self, name: &str, elem_type: i32, dims: &[i64]) -> Self {
        self.inputs.push(ValueSpec { name: name.to_owned(), elem_type, dims: dims.to_vec() });
        self
    }

    pub fn output(mut self, name: &str, elem_type: i32, dims: &[i64]) -> Self {
        self.outputs.push(ValueSpec { name: name.to_owned(), elem_type, dims: dims.to_vec() });
        self
    }

    /// Declare a constant tensor by name/dtype/shape (no payload).
    pub fn initializer(mut self, name: &str, data_type: i32, dims: &[i64]) -> Self {
        self.initializers.push(InitSpec { name: name.to_owned(), data_type, dims: dims.to_vec() });
        self
    }

    pub fn node(mut self, op_type: &str, name: &str, inputs: &[&str], outputs: &[&str]) -> Self {
        self.nodes.push(NodeSpec {
            op_type: op_type.to_owned(),
            name: name.to_owned(),
            inputs: inputs.iter().map(|s| (*s).to_owned()).collect(),
            outputs: outputs.iter().map(|s| (*s).to_owned()).collect(),
        });
        self
    }

    fn encode(&self) -> Encoder {
        use field::graph as f;

        let mut enc = Encoder::new();
        for node in &self.nodes {
            enc.message_field(f::NODE, &node.encode());
        }
        if !self.name.is_empty() {
            enc.string_field(f::NAME, &self.name);
        }
        for init in &self.initializers {
            enc.message_field(f::INITIALIZER, &init.encode());
        }
        for input in &self.inputs {
            enc.message_field(f::INPUT, &input.encode());
        }
        for output in &self.outputs {
            enc.message_field(f::OUTPUT, &output.encode());
        }
        enc
    }
}

impl NodeSpec {
    fn encode(&self) -> Encoder {
        use field::node as f;

        let mut enc = Encoder::new();
        for input in &self.inputs {
            enc.string_field(f::INPUT, input);
        }
        for output in &self.outputs {
            enc.string_field(f::OUTPUT, output);
        }
        if !self.name.is_empty() {
            enc.string_field(f::NAME, &self.name);
        }
        enc.string_field(f::OP_TYPE, &self.op_type);
        enc
    }
}

impl InitSpec {
    fn encode(&self) -> Encoder {
        use field::tensor as f;

        let mut enc = Encoder::new();
        // Packed dims, as proto3 writers emit them.
        let mut packed = Encoder::new();
        for dim in &self.dims {
            packed.raw_varint(*dim as u64);
        }
        enc.bytes_field(f::DIMS, packed.as_bytes());
        enc.varint_field(f::DATA_TYPE, self.data_type as u64);
        enc.string_field(f::NAME, &self.name);
        enc
    }
}

impl ValueSpec {
    fn encode(&self) -> Encoder {
        let mut shape = Encoder::new();
        for dim in &self.dims {
            let mut entry = Encoder::new();
            entry.varint_field(field::dim::DIM_VALUE, *dim as u64);
            shape.message_field(field::shape::DIM, &entry);
        }

        let mut tensor_type = Encoder::new();
        tensor_type.varint_field(field::tensor_type::ELEM_TYPE, self.elem_type as u64);
        tensor_type.message_field(field::tensor_type::SHAPE, &shape);

        let mut type_proto = Encoder::new();
        type_proto.message_field(field::type_proto::TENSOR_TYPE, &tensor_type);

        let mut enc = Encoder::new();
        enc.string_field(field::value_info::NAME, &self.name);
        enc.message_field(field::value_info::TYPE, &type_proto);
        enc
    }
}
