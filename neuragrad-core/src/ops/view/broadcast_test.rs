use super::*;
use crate::autograd::grad_check::{check_grad, GradCheckConfig};
use crate::error::NeuraGradError;
use crate::utils::testing::check_tensor_near;

#[test]
fn test_broadcast_to_forward() {
    let mut graph = Graph::new();
    let row = graph.tensor(vec![1.0f64, 2.0, 3.0], vec![3], false).unwrap();
    let expanded = broadcast_to_op(&mut graph, row, vec![2, 3]).unwrap();
    check_tensor_near(&graph, expanded, &[2, 3], &[1.0, 2.0, 3.0, 1.0, 2.0, 3.0], 1e-12);
}

#[test]
fn test_broadcast_to_incompatible() {
    let mut graph = Graph::new();
    let row = graph.tensor(vec![1.0f64, 2.0, 3.0], vec![3], false).unwrap();
    assert!(matches!(
        broadcast_to_op(&mut graph, row, vec![2, 4]),
        Err(NeuraGradError::BroadcastError { .. })
    ));
}

#[test]
fn test_sum_to_forward() {
    let mut graph = Graph::new();
    let matrix = graph.tensor(vec![1.0f64, 2.0, 3.0, 4.0, 5.0, 6.0], vec![2, 3], false).unwrap();
    let columns = sum_to_op(&mut graph, matrix, vec![1, 3]).unwrap();
    check_tensor_near(&graph, columns, &[1, 3], &[5.0, 7.0, 9.0], 1e-12);
    let rows = sum_to_op(&mut graph, matrix, vec![2, 1]).unwrap();
    check_tensor_near(&graph, rows, &[2, 1], &[6.0, 15.0], 1e-12);
}

#[test]
fn test_broadcast_backward_sums() {
    let mut graph = Graph::new();
    let column = graph.tensor(vec![1.0f64, 2.0], vec![2, 1], true).unwrap();
    let expanded = broadcast_to_op(&mut graph, column, vec![2, 4]).unwrap();
    expanded.backward(&mut graph, None).unwrap();
    check_tensor_near(&graph, column.grad(&graph).unwrap(), &[2, 1], &[4.0, 4.0], 1e-12);
}

#[test]
fn test_broadcast_and_sum_to_grad_check() {
    let a = NdArray::from_vec(vec![0.3f64, -1.2], vec![2, 1]).unwrap();
    let weights = NdArray::from_vec(vec![1.0f64, 2.0, 3.0, 4.0, 5.0, 6.0], vec![2, 3]).unwrap();
    let result = check_grad(
        |g, x| broadcast_to_op(g, x[0], vec![2, 3]),
        &[a],
        Some(weights),
        &GradCheckConfig::default(),
    );
    assert!(result.is_ok(), "{result:?}");

    let b = NdArray::from_vec(vec![0.5f64, 1.5, -2.0, 0.25, 1.0, -0.75], vec![2, 3]).unwrap();
    let result = check_grad(
        |g, x| sum_to_op(g, x[0], vec![3]),
        &[b],
        None,
        &GradCheckConfig::default(),
    );
    assert!(result.is_ok(), "{result:?}");
}
