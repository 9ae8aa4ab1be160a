use super::*;
use crate::error::NeuraGradError;
use crate::tensor_data::NodeKind;
use crate::types::DType;
use crate::utils::testing::check_tensor_near;

#[test]
fn test_add_tensors_ok() {
    let mut graph = Graph::new();
    let t1 = graph.tensor(vec![1.0f32, 2.0, 3.0, 4.0], vec![2, 2], false).unwrap();
    let t2 = graph.tensor(vec![5.0f32, 6.0, 7.0, 8.0], vec![2, 2], false).unwrap();
    let result = add_op(&mut graph, t1, t2).unwrap();
    check_tensor_near(&graph, result, &[2, 2], &[6.0, 8.0, 10.0, 12.0], 1e-6);
    assert_eq!(result.dtype(&graph), DType::F32);
    assert!(!result.requires_grad(&graph));
    assert_eq!(result.kind(&graph), NodeKind::Leaf);
}

#[test]
fn test_add_tensors_shape_mismatch() {
    let mut graph = Graph::new();
    let t1 = graph.tensor(vec![1.0f64, 2.0], vec![2], false).unwrap();
    let t2 = graph.tensor(vec![1.0f64, 2.0, 3.0], vec![3], false).unwrap();
    let result = add_op(&mut graph, t1, t2);
    assert!(matches!(result, Err(NeuraGradError::BroadcastError { .. })));
}

#[test]
fn test_add_broadcasting() {
    let mut graph = Graph::new();
    let matrix = graph.tensor(vec![1.0f64, 2.0, 3.0, 4.0], vec![2, 2], false).unwrap();
    let row = graph.tensor(vec![10.0f64, 20.0], vec![1, 2], false).unwrap();
    let result = add_op(&mut graph, matrix, row).unwrap();
    check_tensor_near(&graph, result, &[2, 2], &[11.0, 22.0, 13.0, 24.0], 1e-12);
}

#[test]
fn test_add_records_edges() {
    let mut graph = Graph::new();
    let a = graph.scalar(1.0f64, true);
    let b = graph.scalar(2.0f64, false);
    let c = add_op(&mut graph, a, b).unwrap();
    assert!(c.requires_grad(&graph));
    assert_eq!(c.kind(&graph), NodeKind::Computed);
    assert_eq!(c.inputs(&graph), &[a, b]);
    assert_eq!(c.op_name(&graph), Some("add"));
}

#[test]
fn test_add_backward_simple() {
    let mut graph = Graph::new();
    let a = graph.tensor(vec![1.0f64, 2.0, 3.0], vec![3], true).unwrap();
    let b = graph.tensor(vec![4.0f64, 5.0, 6.0], vec![3], true).unwrap();
    let output = add_op(&mut graph, a, b).unwrap();
    output.backward(&mut graph, None).unwrap();

    let grad_a = a.grad(&graph).unwrap();
    let grad_b = b.grad(&graph).unwrap();
    check_tensor_near(&graph, grad_a, &[3], &[1.0, 1.0, 1.0], 1e-12);
    check_tensor_near(&graph, grad_b, &[3], &[1.0, 1.0, 1.0], 1e-12);
}

#[test]
fn test_add_backward_broadcast_reduces() {
    let mut graph = Graph::new();
    let matrix = graph.tensor(vec![1.0f64; 6], vec![2, 3], true).unwrap();
    let row = graph.tensor(vec![0.0f64; 3], vec![3], true).unwrap();
    let column = graph.tensor(vec![0.0f64; 2], vec![2, 1], true).unwrap();
    let partial = add_op(&mut graph, matrix, row).unwrap();
    let output = add_op(&mut graph, partial, column).unwrap();
    output.backward(&mut graph, None).unwrap();

    check_tensor_near(&graph, matrix.grad(&graph).unwrap(), &[2, 3], &[1.0; 6], 1e-12);
    check_tensor_near(&graph, row.grad(&graph).unwrap(), &[3], &[2.0, 2.0, 2.0], 1e-12);
    check_tensor_near(&graph, column.grad(&graph).unwrap(), &[2, 1], &[3.0, 3.0], 1e-12);
}
