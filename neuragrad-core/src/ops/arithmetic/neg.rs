use crate::autograd::{Gradients, Graph, Op};
use crate::backend::{kernels, NdArray};
use crate::error::Result;
use crate::ops::check_arity;
use crate::tensor::Tensor;

/// Element-wise negation.
#[derive(Debug, Clone, Copy, Default)]
pub struct Negate;

impl Op for Negate {
    fn name(&self) -> &str {
        "neg"
    }

    fn compute(&self, inputs: &[&NdArray]) -> Result<NdArray> {
        check_arity(self.name(), inputs, 1)?;
        Ok(kernels::neg(inputs[0]))
    }

    fn gradient(&self, graph: &mut Graph, out_grad: Tensor, _node: Tensor) -> Result<Gradients> {
        Ok(neg_op(graph, out_grad)?.into())
    }
}

pub fn neg_op(graph: &mut Graph, a: Tensor) -> Result<Tensor> {
    graph.apply(Negate, &[a])
}

#[cfg(test)]
#[path = "neg_test.rs"]
mod tests;
