//! # Operation catalogue (`ops`)
//!
//! Differentiable operations, grouped into submodules by functionality.
//!
//! ## Structure:
//!
//! - **Op structs:** each operation is a struct (e.g. `EWiseAdd`, `Summation`) implementing
//!   [`Op`](crate::autograd::Op). It carries the operation's parameters, computes the
//!   forward value through [`backend::kernels`](crate::backend::kernels), and builds the
//!   partial adjoints of its inputs from other ops, so gradients are themselves
//!   differentiable.
//! - **`_op` functions:** each operation has a function (named `xxx_op`) that applies the
//!   struct to its inputs in a [`Graph`].
//!
//! ## Submodules:
//!
//! - [`arithmetic`]: element-wise arithmetic with broadcasting, and scalar variants.
//! - [`math_elem`]: element-wise math functions (`exp`, `ln`).
//! - [`reduction`]: reductions (`sum`).
//! - [`view`]: shape changes between broadcast-compatible shapes.

pub mod arithmetic;
pub mod math_elem;
pub mod reduction;
pub mod view;

pub use arithmetic::{
    add_op, add_scalar_op, div_op, mul_op, mul_scalar_op, neg_op, pow_scalar_op, sub_op,
    AddScalar, EWiseAdd, EWiseDiv, EWiseMul, EWiseSub, MulScalar, Negate, PowerScalar,
};
pub use math_elem::{exp_op, ln_op, Exp, Log};
pub use reduction::{sum_op, Summation};
pub use view::{broadcast_to_op, sum_to_op, BroadcastTo, SumTo};

use crate::autograd::Graph;
use crate::backend::NdArray;
use crate::error::{NeuraGradError, Result};
use crate::tensor::Tensor;

/// Fails with `ArityMismatch` unless exactly `expected` arrays were passed.
pub(crate) fn check_arity(op: &str, inputs: &[&NdArray], expected: usize) -> Result<()> {
    if inputs.len() != expected {
        return Err(NeuraGradError::ArityMismatch {
            op: op.to_string(),
            expected,
            actual: inputs.len(),
        });
    }
    Ok(())
}

/// The single input of `node`.
pub(crate) fn unary_input(graph: &Graph, op: &str, node: Tensor) -> Result<Tensor> {
    match graph.get(node)?.inputs() {
        [a] => Ok(*a),
        other => Err(NeuraGradError::ArityMismatch {
            op: op.to_string(),
            expected: 1,
            actual: other.len(),
        }),
    }
}

/// The two inputs of `node`, in order.
pub(crate) fn binary_inputs(graph: &Graph, op: &str, node: Tensor) -> Result<(Tensor, Tensor)> {
    match graph.get(node)?.inputs() {
        [a, b] => Ok((*a, *b)),
        other => Err(NeuraGradError::ArityMismatch {
            op: op.to_string(),
            expected: 2,
            actual: other.len(),
        }),
    }
}

/// Sums a broadcast gradient back down to `shape`, leaving it untouched when the
/// shapes already agree.
pub(crate) fn reduce_to_shape(graph: &mut Graph, grad: Tensor, shape: &[usize]) -> Result<Tensor> {
    if graph.get(grad)?.value().shape() == shape {
        return Ok(grad);
    }
    sum_to_op(graph, grad, shape.to_vec())
}
