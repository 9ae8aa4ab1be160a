use crate::autograd::{Gradients, Graph, Op};
use crate::backend::{kernels, NdArray};
use crate::error::Result;
use crate::ops::{binary_inputs, check_arity, reduce_to_shape};
use crate::tensor::Tensor;

/// Element-wise addition with broadcasting.
///
/// The adjoint flows through unchanged to both inputs, summed over any broadcast
/// dimensions.
#[derive(Debug, Clone, Copy, Default)]
pub struct EWiseAdd;

impl Op for EWiseAdd {
    fn name(&self) -> &str {
        "add"
    }

    fn compute(&self, inputs: &[&NdArray]) -> Result<NdArray> {
        check_arity(self.name(), inputs, 2)?;
        kernels::add(inputs[0], inputs[1])
    }

    fn gradient(&self, graph: &mut Graph, out_grad: Tensor, node: Tensor) -> Result<Gradients> {
        let (a, b) = binary_inputs(graph, self.name(), node)?;
        let a_shape = a.shape(graph);
        let b_shape = b.shape(graph);
        let grad_a = reduce_to_shape(graph, out_grad, &a_shape)?;
        let grad_b = reduce_to_shape(graph, out_grad, &b_shape)?;
        Ok((grad_a, grad_b).into())
    }
}

/// Adds two tensors element-wise, broadcasting as needed.
///
/// # Errors
/// Returns `BroadcastError` for incompatible shapes and `DTypeMismatch` when the
/// dtypes differ.
pub fn add_op(graph: &mut Graph, a: Tensor, b: Tensor) -> Result<Tensor> {
    graph.apply(EWiseAdd, &[a, b])
}

#[cfg(test)]
#[path = "add_test.rs"]
mod tests;
