//! Lightweight ONNX file-format types, parser, and structural checker.
//!
//! Provides a minimal, dependency-light library for inspecting ONNX model
//! files: declared IR version, operator-set imports, and a structural summary
//! of the graph (nodes, inputs, outputs, initializers). The file is walked at
//! the protobuf wire level; fields this library does not model (attributes,
//! tensor payloads, functions) are skipped, so files from newer toolchains
//! still parse.
//!
//! Numeric execution is out of scope — an inference backend owns that. This
//! crate answers the questions a test orchestrator asks: *which opset does
//! this model declare?* and *is the graph internally consistent?*
//!
//! # Example
//!
//! ```no_run
//! use zooqa_onnx::read_file;
//!
//! let model = read_file("model.onnx").unwrap();
//! println!("ir_version={}", model.ir_version);
//! if let Some(version) = model.first_opset_version() {
//!     println!("opset {version}");
//! }
//! ```

use std::io;
use std::path::Path;

use thiserror::Error;

pub mod builder;
pub mod check;
mod model;
pub mod wire;

pub use check::{check_model, check_model_file, CheckError};
pub use model::{parse_model, Dim, Graph, ModelFile, Node, OpsetId, ValueInfo};
pub use model::TensorSummary;

/// Errors returned when decoding an ONNX file at the wire level.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum OnnxError {
    #[error("truncated varint at byte {0}")]
    TruncatedVarint(usize),
    #[error("varint longer than 10 bytes at byte {0}")]
    OverlongVarint(usize),
    #[error("field {field}: length {len} runs past end of buffer")]
    LengthOutOfBounds { field: u32, len: u64 },
    #[error("field {field}: unsupported wire type {wire}")]
    UnsupportedWireType { field: u32, wire: u8 },
    #[error("field {field}: string is not valid UTF-8")]
    InvalidString { field: u32 },
    #[error("truncated fixed-width value at byte {0}")]
    TruncatedFixed(usize),
    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, OnnxError>;

/// Tensor element-type discriminants used by model inputs and outputs.
///
/// Numeric values match the ONNX `TensorProto.DataType` enumeration.
pub mod elem_type {
    pub const UNDEFINED: i32 = 0;
    pub const FLOAT: i32 = 1;
    pub const UINT8: i32 = 2;
    pub const INT8: i32 = 3;
    pub const INT32: i32 = 6;
    pub const INT64: i32 = 7;
    pub const BOOL: i32 = 9;
    pub const DOUBLE: i32 = 11;
}

/// Read and parse an ONNX model file from disk.
///
/// Only the structural subset is materialized; tensor payloads are skipped,
/// so this is cheap even for large models.
pub fn read_file(path: impl AsRef<Path>) -> Result<ModelFile> {
    let data = std::fs::read(path)?;
    parse_model(&data)
}
