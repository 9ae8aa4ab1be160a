use crate::autograd::{Gradients, Graph, Op};
use crate::backend::{kernels, NdArray};
use crate::error::Result;
use crate::ops::{check_arity, div_op, unary_input};
use crate::tensor::Tensor;

/// Element-wise natural logarithm.
///
/// Non-positive inputs follow IEEE semantics (`ln(0) = -inf`, `ln(x<0) = NaN`).
#[derive(Debug, Clone, Copy, Default)]
pub struct Log;

impl Op for Log {
    fn name(&self) -> &str {
        "ln"
    }

    fn compute(&self, inputs: &[&NdArray]) -> Result<NdArray> {
        check_arity(self.name(), inputs, 1)?;
        Ok(kernels::ln(inputs[0]))
    }

    /// `d(ln x)/dx = 1/x`
    fn gradient(&self, graph: &mut Graph, out_grad: Tensor, node: Tensor) -> Result<Gradients> {
        let a = unary_input(graph, self.name(), node)?;
        Ok(div_op(graph, out_grad, a)?.into())
    }
}

pub fn ln_op(graph: &mut Graph, a: Tensor) -> Result<Tensor> {
    graph.apply(Log, &[a])
}

#[cfg(test)]
#[path = "ln_test.rs"]
mod tests;
