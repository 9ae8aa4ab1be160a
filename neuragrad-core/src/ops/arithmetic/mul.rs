use crate::autograd::{Gradients, Graph, Op};
use crate::backend::{kernels, NdArray};
use crate::error::Result;
use crate::ops::{binary_inputs, check_arity, reduce_to_shape};
use crate::tensor::Tensor;

/// Element-wise multiplication with broadcasting.
///
/// `d(a*b)/da = b` and `d(a*b)/db = a`; each partial is reduced to its input's
/// shape.
#[derive(Debug, Clone, Copy, Default)]
pub struct EWiseMul;

impl Op for EWiseMul {
    fn name(&self) -> &str {
        "mul"
    }

    fn compute(&self, inputs: &[&NdArray]) -> Result<NdArray> {
        check_arity(self.name(), inputs, 2)?;
        kernels::mul(inputs[0], inputs[1])
    }

    fn gradient(&self, graph: &mut Graph, out_grad: Tensor, node: Tensor) -> Result<Gradients> {
        let (a, b) = binary_inputs(graph, self.name(), node)?;
        let a_shape = a.shape(graph);
        let b_shape = b.shape(graph);

        let grad_a_unreduced = mul_op(graph, out_grad, b)?;
        let grad_a = reduce_to_shape(graph, grad_a_unreduced, &a_shape)?;

        let grad_b_unreduced = mul_op(graph, out_grad, a)?;
        let grad_b = reduce_to_shape(graph, grad_b_unreduced, &b_shape)?;

        Ok((grad_a, grad_b).into())
    }
}

pub fn mul_op(graph: &mut Graph, a: Tensor, b: Tensor) -> Result<Tensor> {
    graph.apply(EWiseMul, &[a, b])
}

#[cfg(test)]
#[path = "mul_test.rs"]
mod tests;
