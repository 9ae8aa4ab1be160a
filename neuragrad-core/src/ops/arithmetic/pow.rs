use crate::autograd::{Gradients, Graph, Op};
use crate::backend::{kernels, NdArray};
use crate::error::Result;
use crate::ops::{check_arity, mul_op, mul_scalar_op, unary_input};
use crate::tensor::Tensor;

/// Raises every element to a constant power.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PowerScalar {
    pub exponent: f64,
}

impl Op for PowerScalar {
    fn name(&self) -> &str {
        "pow_scalar"
    }

    fn compute(&self, inputs: &[&NdArray]) -> Result<NdArray> {
        check_arity(self.name(), inputs, 1)?;
        Ok(kernels::pow_scalar(inputs[0], self.exponent))
    }

    /// `d(x^p)/dx = p * x^(p-1)`
    fn gradient(&self, graph: &mut Graph, out_grad: Tensor, node: Tensor) -> Result<Gradients> {
        let a = unary_input(graph, self.name(), node)?;
        let lowered = pow_scalar_op(graph, a, self.exponent - 1.0)?;
        let local = mul_scalar_op(graph, lowered, self.exponent)?;
        Ok(mul_op(graph, out_grad, local)?.into())
    }
}

pub fn pow_scalar_op(graph: &mut Graph, a: Tensor, exponent: f64) -> Result<Tensor> {
    graph.apply(PowerScalar { exponent }, &[a])
}

#[cfg(test)]
#[path = "pow_test.rs"]
mod tests;
