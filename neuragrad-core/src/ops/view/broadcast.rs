use crate::autograd::{Gradients, Graph, Op};
use crate::backend::{kernels, NdArray};
use crate::error::Result;
use crate::ops::{check_arity, unary_input};
use crate::tensor::Tensor;

/// Repeats the input along broadcast dimensions to reach `shape`.
///
/// Follows NumPy rules: leading dimensions may be added and size-1 dimensions
/// expanded. The gradient is the adjoint summed back to the input shape.
#[derive(Debug, Clone, PartialEq)]
pub struct BroadcastTo {
    pub shape: Vec<usize>,
}

impl Op for BroadcastTo {
    fn name(&self) -> &str {
        "broadcast_to"
    }

    fn compute(&self, inputs: &[&NdArray]) -> Result<NdArray> {
        check_arity(self.name(), inputs, 1)?;
        kernels::broadcast_to(inputs[0], &self.shape)
    }

    fn gradient(&self, graph: &mut Graph, out_grad: Tensor, node: Tensor) -> Result<Gradients> {
        let a = unary_input(graph, self.name(), node)?;
        let shape = a.shape(graph);
        Ok(sum_to_op(graph, out_grad, shape)?.into())
    }
}

/// Sums the input over broadcast dimensions down to `shape`; the adjoint of
/// [`BroadcastTo`].
#[derive(Debug, Clone, PartialEq)]
pub struct SumTo {
    pub shape: Vec<usize>,
}

impl Op for SumTo {
    fn name(&self) -> &str {
        "sum_to"
    }

    fn compute(&self, inputs: &[&NdArray]) -> Result<NdArray> {
        check_arity(self.name(), inputs, 1)?;
        kernels::sum_to_shape(inputs[0], &self.shape)
    }

    fn gradient(&self, graph: &mut Graph, out_grad: Tensor, node: Tensor) -> Result<Gradients> {
        let a = unary_input(graph, self.name(), node)?;
        let shape = a.shape(graph);
        Ok(broadcast_to_op(graph, out_grad, shape)?.into())
    }
}

/// # Errors
/// Returns `BroadcastError` if `a` cannot be broadcast to exactly `shape`.
pub fn broadcast_to_op(graph: &mut Graph, a: Tensor, shape: Vec<usize>) -> Result<Tensor> {
    graph.apply(BroadcastTo { shape }, &[a])
}

/// # Errors
/// Returns `BroadcastError` if `shape` does not broadcast to the shape of `a`.
pub fn sum_to_op(graph: &mut Graph, a: Tensor, shape: Vec<usize>) -> Result<Tensor> {
    graph.apply(SumTo { shape }, &[a])
}

#[cfg(test)]
#[path = "broadcast_test.rs"]
mod tests;
