use crate::autograd::{Gradients, Graph, Op};
use crate::backend::{kernels, NdArray};
use crate::error::Result;
use crate::ops::{binary_inputs, check_arity, neg_op, reduce_to_shape};
use crate::tensor::Tensor;

/// Element-wise subtraction `a - b` with broadcasting.
#[derive(Debug, Clone, Copy, Default)]
pub struct EWiseSub;

impl Op for EWiseSub {
    fn name(&self) -> &str {
        "sub"
    }

    fn compute(&self, inputs: &[&NdArray]) -> Result<NdArray> {
        check_arity(self.name(), inputs, 2)?;
        kernels::sub(inputs[0], inputs[1])
    }

    fn gradient(&self, graph: &mut Graph, out_grad: Tensor, node: Tensor) -> Result<Gradients> {
        let (a, b) = binary_inputs(graph, self.name(), node)?;
        let a_shape = a.shape(graph);
        let b_shape = b.shape(graph);
        let grad_a = reduce_to_shape(graph, out_grad, &a_shape)?;
        let negated = neg_op(graph, out_grad)?;
        let grad_b = reduce_to_shape(graph, negated, &b_shape)?;
        Ok((grad_a, grad_b).into())
    }
}

pub fn sub_op(graph: &mut Graph, a: Tensor, b: Tensor) -> Result<Tensor> {
    graph.apply(EWiseSub, &[a, b])
}

#[cfg(test)]
#[path = "sub_test.rs"]
mod tests;
