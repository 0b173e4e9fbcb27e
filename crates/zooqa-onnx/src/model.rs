//! Structural model types and the wire-level parser.

use serde::{Deserialize, Serialize};

use crate::wire::{Decoder, WIRE_LEN, WIRE_VARINT};
use crate::Result;

/// Field numbers from `onnx.proto`, grouped per message.
pub(crate) mod field {
    pub mod model {
        pub const IR_VERSION: u32 = 1;
        pub const PRODUCER_NAME: u32 = 2;
        pub const PRODUCER_VERSION: u32 = 3;
        pub const DOMAIN: u32 = 4;
        pub const MODEL_VERSION: u32 = 5;
        pub const GRAPH: u32 = 7;
        pub const OPSET_IMPORT: u32 = 8;
    }
    pub mod opset {
        pub const DOMAIN: u32 = 1;
        pub const VERSION: u32 = 2;
    }
    pub mod graph {
        pub const NODE: u32 = 1;
        pub const NAME: u32 = 2;
        pub const INITIALIZER: u32 = 5;
        pub const INPUT: u32 = 11;
        pub const OUTPUT: u32 = 12;
        pub const VALUE_INFO: u32 = 13;
    }
    pub mod node {
        pub const INPUT: u32 = 1;
        pub const OUTPUT: u32 = 2;
        pub const NAME: u32 = 3;
        pub const OP_TYPE: u32 = 4;
        pub const DOMAIN: u32 = 7;
    }
    pub mod tensor {
        pub const DIMS: u32 = 1;
        pub const DATA_TYPE: u32 = 2;
        pub const NAME: u32 = 8;
    }
    pub mod value_info {
        pub const NAME: u32 = 1;
        pub const TYPE: u32 = 2;
    }
    pub mod type_proto {
        pub const TENSOR_TYPE: u32 = 1;
    }
    pub mod tensor_type {
        pub const ELEM_TYPE: u32 = 1;
        pub const SHAPE: u32 = 2;
    }
    pub mod shape {
        pub const DIM: u32 = 1;
    }
    pub mod dim {
        pub const DIM_VALUE: u32 = 1;
        pub const DIM_PARAM: u32 = 2;
    }
}

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Parsed structural subset of an ONNX model file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelFile {
    /// Declared IR version of the container format.
    pub ir_version: i64,
    pub producer_name: String,
    pub producer_version: String,
    /// Model namespace (reverse-DNS by convention, often empty).
    pub domain: String,
    pub model_version: i64,
    /// Operator-set imports, in file order.
    pub opset_imports: Vec<OpsetId>,
    pub graph: Option<Graph>,
}

impl ModelFile {
    /// Version of the first declared operator-set import, if any.
    ///
    /// The first entry is the one backend-support policies key off.
    pub fn first_opset_version(&self) -> Option<i64> {
        self.opset_imports.first().map(|op| op.version)
    }
}

/// One operator-set import (`OperatorSetIdProto`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpsetId {
    /// Operator domain; empty string means the default ONNX domain.
    pub domain: String,
    pub version: i64,
}

/// Structural subset of `GraphProto`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Graph {
    pub name: String,
    /// Nodes in file (topological) order.
    pub nodes: Vec<Node>,
    /// Constant tensors; only name/dtype/dims are kept, payloads are skipped.
    pub initializers: Vec<TensorSummary>,
    pub inputs: Vec<ValueInfo>,
    pub outputs: Vec<ValueInfo>,
    pub value_infos: Vec<ValueInfo>,
}

/// Structural subset of `NodeProto`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub name: String,
    pub op_type: String,
    pub domain: String,
    /// Value names consumed; an empty string marks an unused optional slot.
    pub inputs: Vec<String>,
    pub outputs: Vec<String>,
}

/// Name, dtype, and shape of an initializer tensor (payload skipped).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TensorSummary {
    pub name: String,
    /// ONNX `TensorProto.DataType` discriminant; see [`crate::elem_type`].
    pub data_type: i32,
    pub dims: Vec<i64>,
}

/// A graph input, output, or intermediate value (`ValueInfoProto`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValueInfo {
    pub name: String,
    /// Element type, 0 when the file omits type information.
    pub elem_type: i32,
    pub dims: Vec<Dim>,
}

/// One dimension of a tensor shape: fixed, or named-symbolic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Dim {
    Value(i64),
    Param(String),
}

// ---------------------------------------------------------------------------
// Parser
// ---------------------------------------------------------------------------

/// Parse a serialized `ModelProto` into its structural subset.
///
/// Unknown fields are skipped so files written by newer exporters still
/// parse; malformed wire data is an error.
pub fn parse_model(data: &[u8]) -> Result<ModelFile> {
    use field::model as f;

    let mut dec = Decoder::new(data);
    let mut model = ModelFile::default();
    while !dec.is_empty() {
        let (fieldno, wire) = dec.tag()?;
        match (fieldno, wire) {
            (f::IR_VERSION, WIRE_VARINT) => model.ir_version = dec.varint()? as i64,
            (f::PRODUCER_NAME, WIRE_LEN) => model.producer_name = dec.string(fieldno)?,
            (f::PRODUCER_VERSION, WIRE_LEN) => model.producer_version = dec.string(fieldno)?,
            (f::DOMAIN, WIRE_LEN) => model.domain = dec.string(fieldno)?,
            (f::MODEL_VERSION, WIRE_VARINT) => model.model_version = dec.varint()? as i64,
            (f::GRAPH, WIRE_LEN) => model.graph = Some(parse_graph(dec.bytes(fieldno)?)?),
            (f::OPSET_IMPORT, WIRE_LEN) => {
                model.opset_imports.push(parse_opset(dec.bytes(fieldno)?)?);
            }
            _ => dec.skip(fieldno, wire)?,
        }
    }
    Ok(model)
}

fn parse_opset(data: &[u8]) -> Result<OpsetId> {
    use field::opset as f;

    let mut dec = Decoder::new(data);
    let mut opset = OpsetId::default();
    while !dec.is_empty() {
        let (fieldno, wire) = dec.tag()?;
        match (fieldno, wire) {
            (f::DOMAIN, WIRE_LEN) => opset.domain = dec.string(fieldno)?,
            (f::VERSION, WIRE_VARINT) => opset.version = dec.varint()? as i64,
            _ => dec.skip(fieldno, wire)?,
        }
    }
    Ok(opset)
}

fn parse_graph(data: &[u8]) -> Result<Graph> {
    use field::graph as f;

    let mut dec = Decoder::new(data);
    let mut graph = Graph::default();
    while !dec.is_empty() {
        let (fieldno, wire) = dec.tag()?;
        match (fieldno, wire) {
            (f::NODE, WIRE_LEN) => graph.nodes.push(parse_node(dec.bytes(fieldno)?)?),
            (f::NAME, WIRE_LEN) => graph.name = dec.string(fieldno)?,
            (f::INITIALIZER, WIRE_LEN) => {
                graph.initializers.push(parse_tensor_summary(dec.bytes(fieldno)?)?);
            }
            (f::INPUT, WIRE_LEN) => graph.inputs.push(parse_value_info(dec.bytes(fieldno)?)?),
            (f::OUTPUT, WIRE_LEN) => graph.outputs.push(parse_value_info(dec.bytes(fieldno)?)?),
            (f::VALUE_INFO, WIRE_LEN) => {
                graph.value_infos.push(parse_value_info(dec.bytes(fieldno)?)?);
            }
            _ => dec.skip(fieldno, wire)?,
        }
    }
    Ok(graph)
}

fn parse_node(data: &[u8]) -> Result<Node> {
    use field::node as f;

    let mut dec = Decoder::new(data);
    let mut node = Node::default();
    while !dec.is_empty() {
        let (fieldno, wire) = dec.tag()?;
        match (fieldno, wire) {
            (f::INPUT, WIRE_LEN) => node.inputs.push(dec.string(fieldno)?),
            (f::OUTPUT, WIRE_LEN) => node.outputs.push(dec.string(fieldno)?),
            (f::NAME, WIRE_LEN) => node.name = dec.string(fieldno)?,
            (f::OP_TYPE, WIRE_LEN) => node.op_type = dec.string(fieldno)?,
            (f::DOMAIN, WIRE_LEN) => node.domain = dec.string(fieldno)?,
            _ => dec.skip(fieldno, wire)?,
        }
    }
    Ok(node)
}

fn parse_tensor_summary(data: &[u8]) -> Result<TensorSummary> {
    use field::tensor as f;

    let mut dec = Decoder::new(data);
    let mut tensor = TensorSummary::default();
    while !dec.is_empty() {
        let (fieldno, wire) = dec.tag()?;
        match (fieldno, wire) {
            // proto3 packs repeated int64 by default, but unpacked
            // encodings are legal and do occur.
            (f::DIMS, WIRE_LEN) => {
                let mut packed = Decoder::new(dec.bytes(fieldno)?);
                while !packed.is_empty() {
                    tensor.dims.push(packed.varint()? as i64);
                }
            }
            (f::DIMS, WIRE_VARINT) => tensor.dims.push(dec.varint()? as i64),
            (f::DATA_TYPE, WIRE_VARINT) => tensor.data_type = dec.varint()? as i32,
            (f::NAME, WIRE_LEN) => tensor.name = dec.string(fieldno)?,
            _ => dec.skip(fieldno, wire)?,
        }
    }
    Ok(tensor)
}

fn parse_value_info(data: &[u8]) -> Result<ValueInfo> {
    use field::value_info as f;

    let mut dec = Decoder::new(data);
    let mut info = ValueInfo::default();
    while !dec.is_empty() {
        let (fieldno, wire) = dec.tag()?;
        match (fieldno, wire) {
            (f::NAME, WIRE_LEN) => info.name = dec.string(fieldno)?,
            (f::TYPE, WIRE_LEN) => parse_type(dec.bytes(fieldno)?, &mut info)?,
            _ => dec.skip(fieldno, wire)?,
        }
    }
    Ok(info)
}

fn parse_type(data: &[u8], info: &mut ValueInfo) -> Result<()> {
    let mut dec = Decoder::new(data);
    while !dec.is_empty() {
        let (fieldno, wire) = dec.tag()?;
        match (fieldno, wire) {
            (field::type_proto::TENSOR_TYPE, WIRE_LEN) => {
                parse_tensor_type(dec.bytes(fieldno)?, info)?;
            }
            _ => dec.skip(fieldno, wire)?,
        }
    }
    Ok(())
}

fn parse_tensor_type(data: &[u8], info: &mut ValueInfo) -> Result<()> {
    use field::tensor_type as f;

    let mut dec = Decoder::new(data);
    while !dec.is_empty() {
        let (fieldno, wire) = dec.tag()?;
        match (fieldno, wire) {
            (f::ELEM_TYPE, WIRE_VARINT) => info.elem_type = dec.varint()? as i32,
            (f::SHAPE, WIRE_LEN) => parse_shape(dec.bytes(fieldno)?, info)?,
            _ => dec.skip(fieldno, wire)?,
        }
    }
    Ok(())
}

fn parse_shape(data: &[u8], info: &mut ValueInfo) -> Result<()> {
    let mut dec = Decoder::new(data);
    while !dec.is_empty() {
        let (fieldno, wire) = dec.tag()?;
        match (fieldno, wire) {
            (field::shape::DIM, WIRE_LEN) => info.dims.push(parse_dim(dec.bytes(fieldno)?)?),
            _ => dec.skip(fieldno, wire)?,
        }
    }
    Ok(())
}

fn parse_dim(data: &[u8]) -> Result<Dim> {
    use field::dim as f;

    let mut dec = Decoder::new(data);
    // A dimension with neither value nor param is dynamic and unnamed.
    let mut dim = Dim::Param(String::new());
    while !dec.is_empty() {
        let (fieldno, wire) = dec.tag()?;
        match (fieldno, wire) {
            (f::DIM_VALUE, WIRE_VARINT) => dim = Dim::Value(dec.varint()? as i64),
            (f::DIM_PARAM, WIRE_LEN) => dim = Dim::Param(dec.string(fieldno)?),
            _ => dec.skip(fieldno, wire)?,
        }
    }
    Ok(dim)
}
