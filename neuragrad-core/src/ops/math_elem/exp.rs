use crate::autograd::{Gradients, Graph, Op};
use crate::backend::{kernels, NdArray};
use crate::error::Result;
use crate::ops::{check_arity, mul_op};
use crate::tensor::Tensor;

/// Element-wise natural exponential. Its derivative is its own output.
#[derive(Debug, Clone, Copy, Default)]
pub struct Exp;

impl Op for Exp {
    fn name(&self) -> &str {
        "exp"
    }

    fn compute(&self, inputs: &[&NdArray]) -> Result<NdArray> {
        check_arity(self.name(), inputs, 1)?;
        Ok(kernels::exp(inputs[0]))
    }

    fn gradient(&self, graph: &mut Graph, out_grad: Tensor, node: Tensor) -> Result<Gradients> {
        Ok(mul_op(graph, out_grad, node)?.into())
    }
}

pub fn exp_op(graph: &mut Graph, a: Tensor) -> Result<Tensor> {
    graph.apply(Exp, &[a])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::autograd::grad_check::{check_grad, GradCheckConfig};
    use approx::assert_relative_eq;

    #[test]
    fn test_exp_forward() {
        let mut graph = Graph::new();
        let a = graph.tensor(vec![0.0f64, 1.0, -1.0], vec![3], false).unwrap();
        let result = exp_op(&mut graph, a).unwrap();
        let values = result.to_f64_vec(&graph);
        assert_relative_eq!(values[0], 1.0);
        assert_relative_eq!(values[1], std::f64::consts::E, epsilon = 1e-12);
        assert_relative_eq!(values[2], 1.0 / std::f64::consts::E, epsilon = 1e-12);
    }

    #[test]
    fn test_exp_backward() {
        let mut graph = Graph::new();
        let a = graph.tensor(vec![0.0f64, 2.0], vec![2], true).unwrap();
        let result = exp_op(&mut graph, a).unwrap();
        result.backward(&mut graph, None).unwrap();
        let grad = a.grad(&graph).unwrap().to_f64_vec(&graph);
        assert_relative_eq!(grad[0], 1.0, epsilon = 1e-12);
        assert_relative_eq!(grad[1], 2.0f64.exp(), epsilon = 1e-12);
    }

    #[test]
    fn test_exp_grad_check() {
        let a = NdArray::from_vec(vec![-1.0f64, 0.25, 1.5], vec![3]).unwrap();
        let result = check_grad(|g, x| exp_op(g, x[0]), &[a], None, &GradCheckConfig::default());
        assert!(result.is_ok(), "{result:?}");
    }
}
