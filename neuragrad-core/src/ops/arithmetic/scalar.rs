use crate::autograd::{Gradients, Graph, Op};
use crate::backend::{kernels, NdArray};
use crate::error::Result;
use crate::ops::check_arity;
use crate::tensor::Tensor;

/// Adds a constant to every element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AddScalar {
    pub scalar: f64,
}

impl Op for AddScalar {
    fn name(&self) -> &str {
        "add_scalar"
    }

    fn compute(&self, inputs: &[&NdArray]) -> Result<NdArray> {
        check_arity(self.name(), inputs, 1)?;
        Ok(kernels::add_scalar(inputs[0], self.scalar))
    }

    fn gradient(&self, _graph: &mut Graph, out_grad: Tensor, _node: Tensor) -> Result<Gradients> {
        Ok(out_grad.into())
    }
}

/// Multiplies every element by a constant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MulScalar {
    pub scalar: f64,
}

impl Op for MulScalar {
    fn name(&self) -> &str {
        "mul_scalar"
    }

    fn compute(&self, inputs: &[&NdArray]) -> Result<NdArray> {
        check_arity(self.name(), inputs, 1)?;
        Ok(kernels::mul_scalar(inputs[0], self.scalar))
    }

    fn gradient(&self, graph: &mut Graph, out_grad: Tensor, _node: Tensor) -> Result<Gradients> {
        Ok(mul_scalar_op(graph, out_grad, self.scalar)?.into())
    }
}

pub fn add_scalar_op(graph: &mut Graph, a: Tensor, scalar: f64) -> Result<Tensor> {
    graph.apply(AddScalar { scalar }, &[a])
}

pub fn mul_scalar_op(graph: &mut Graph, a: Tensor, scalar: f64) -> Result<Tensor> {
    graph.apply(MulScalar { scalar }, &[a])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::testing::check_tensor_near;

    #[test]
    fn test_add_scalar() {
        let mut graph = Graph::new();
        let a = graph.tensor(vec![1.0f64, 2.0], vec![2], true).unwrap();
        let b = add_scalar_op(&mut graph, a, 10.0).unwrap();
        check_tensor_near(&graph, b, &[2], &[11.0, 12.0], 1e-12);
        assert_eq!(b.op_name(&graph), Some("add_scalar"));

        b.backward(&mut graph, None).unwrap();
        check_tensor_near(&graph, a.grad(&graph).unwrap(), &[2], &[1.0, 1.0], 1e-12);
    }

    #[test]
    fn test_mul_scalar_f32() {
        let mut graph = Graph::new();
        let a = graph.tensor(vec![1.5f32, -2.0], vec![2], true).unwrap();
        let b = mul_scalar_op(&mut graph, a, 4.0).unwrap();
        check_tensor_near(&graph, b, &[2], &[6.0, -8.0], 1e-6);

        b.backward(&mut graph, None).unwrap();
        check_tensor_near(&graph, a.grad(&graph).unwrap(), &[2], &[4.0, 4.0], 1e-6);
    }
}
