use approx::assert_relative_eq;
use neuragrad_core::{Graph, Tensor};

/// Asserts that `t` has a grad whose values match `expected`.
#[allow(dead_code)]
pub fn assert_grad_eq(graph: &Graph, t: Tensor, expected: &[f64]) {
    let grad = t.grad(graph).expect("tensor has no grad");
    let values = grad.to_f64_vec(graph);
    assert_eq!(values.len(), expected.len(), "grad length mismatch");
    for (actual, expected) in values.iter().zip(expected) {
        assert_relative_eq!(*actual, *expected, epsilon = 1e-9, max_relative = 1e-9);
    }
}

/// Creates an `f64` leaf from host data.
#[allow(dead_code)]
pub fn leaf(graph: &mut Graph, data: Vec<f64>, shape: Vec<usize>, requires_grad: bool) -> Tensor {
    graph
        .tensor(data, shape, requires_grad)
        .expect("Test tensor creation failed")
}
