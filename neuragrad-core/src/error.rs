use crate::types::DType;
use thiserror::Error;

/// Custom error type for the NeuraGrad engine.
#[derive(Error, Debug, PartialEq, Clone)] // PartialEq for easier testing
pub enum NeuraGradError {
    /// An operation was invoked for a capability it does not implement.
    #[error("Operation '{op}' does not implement {capability}")]
    UnimplementedOperation { op: String, capability: &'static str },

    #[error("DType mismatch during {operation}: expected {expected:?}, got {actual:?}")]
    DTypeMismatch {
        expected: DType,
        actual: DType,
        operation: String,
    },

    #[error("Shape mismatch: expected {expected:?}, got {actual:?} during operation {operation}")]
    ShapeMismatch {
        expected: Vec<usize>,
        actual: Vec<usize>,
        operation: String,
    },

    #[error("Cannot broadcast shapes: {shape1:?} and {shape2:?}")]
    BroadcastError {
        shape1: Vec<usize>,
        shape2: Vec<usize>,
    },

    #[error("Tensor creation error: data length {data_len} does not match shape {shape:?}")]
    TensorCreationError { data_len: usize, shape: Vec<usize> },

    #[error("Operation '{op}' expects {expected} inputs, got {actual}")]
    ArityMismatch {
        op: String,
        expected: usize,
        actual: usize,
    },

    #[error("Gradient of '{op}' returned {actual} partial adjoints for {expected} inputs")]
    GradientArityMismatch {
        op: String,
        expected: usize,
        actual: usize,
    },

    #[error("Operation requires tensor to require grad, but it doesn't.")]
    RequiresGradNotMet,

    #[error("Tensor handle {index} does not belong to this graph ({len} nodes)")]
    InvalidTensor { index: usize, len: usize },

    #[error("Tensor handle {index} was issued by another graph or before the last clear")]
    ForeignTensor { index: usize },

    #[error("Expected a single-element array, got shape {shape:?}")]
    NotAScalar { shape: Vec<usize> },

    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, NeuraGradError>;
