use crate::autograd::{Gradients, Graph, Op};
use crate::backend::{kernels, NdArray};
use crate::error::Result;
use crate::ops::{broadcast_to_op, check_arity, unary_input};
use crate::tensor::Tensor;

/// Sums every element into a zero-dimensional tensor.
///
/// The gradient broadcasts the scalar adjoint back to the input's shape.
#[derive(Debug, Clone, Copy, Default)]
pub struct Summation;

impl Op for Summation {
    fn name(&self) -> &str {
        "sum"
    }

    fn compute(&self, inputs: &[&NdArray]) -> Result<NdArray> {
        check_arity(self.name(), inputs, 1)?;
        Ok(kernels::sum_all(inputs[0]))
    }

    fn gradient(&self, graph: &mut Graph, out_grad: Tensor, node: Tensor) -> Result<Gradients> {
        let a = unary_input(graph, self.name(), node)?;
        let shape = a.shape(graph);
        Ok(broadcast_to_op(graph, out_grad, shape)?.into())
    }
}

pub fn sum_op(graph: &mut Graph, a: Tensor) -> Result<Tensor> {
    graph.apply(Summation, &[a])
}

#[cfg(test)]
#[path = "sum_test.rs"]
mod tests;
