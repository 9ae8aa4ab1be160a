use crate::autograd::{Gradients, Graph, Op};
use crate::backend::{kernels, NdArray};
use crate::error::Result;
use crate::ops::{binary_inputs, check_arity, mul_op, neg_op, reduce_to_shape};
use crate::tensor::Tensor;

/// Element-wise division `a / b` with broadcasting.
///
/// `d(a/b)/da = 1/b` and `d(a/b)/db = -a/b² = -(a/b)/b`, so the output value is
/// reused for the second partial.
#[derive(Debug, Clone, Copy, Default)]
pub struct EWiseDiv;

impl Op for EWiseDiv {
    fn name(&self) -> &str {
        "div"
    }

    fn compute(&self, inputs: &[&NdArray]) -> Result<NdArray> {
        check_arity(self.name(), inputs, 2)?;
        kernels::div(inputs[0], inputs[1])
    }

    fn gradient(&self, graph: &mut Graph, out_grad: Tensor, node: Tensor) -> Result<Gradients> {
        let (a, b) = binary_inputs(graph, self.name(), node)?;
        let a_shape = a.shape(graph);
        let b_shape = b.shape(graph);

        let grad_a_unreduced = div_op(graph, out_grad, b)?;
        let grad_a = reduce_to_shape(graph, grad_a_unreduced, &a_shape)?;

        let scaled = mul_op(graph, out_grad, node)?;
        let quotient = div_op(graph, scaled, b)?;
        let grad_b_unreduced = neg_op(graph, quotient)?;
        let grad_b = reduce_to_shape(graph, grad_b_unreduced, &b_shape)?;

        Ok((grad_a, grad_b).into())
    }
}

pub fn div_op(graph: &mut Graph, a: Tensor, b: Tensor) -> Result<Tensor> {
    graph.apply(EWiseDiv, &[a, b])
}

#[cfg(test)]
#[path = "div_test.rs"]
mod tests;
