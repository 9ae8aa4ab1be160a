use super::*;
use crate::ops::{add_op, exp_op, mul_op, mul_scalar_op, neg_op};
use crate::tensor_data::NodeKind;
use crate::types::DType;

#[derive(Debug)]
struct Unimplemented;

impl Op for Unimplemented {
    fn name(&self) -> &str {
        "unimplemented"
    }
}

#[test]
fn test_leaf_construction_and_clear() {
    let mut graph = Graph::new();
    assert!(graph.is_empty());
    let a = graph.leaf(NdArray::allocate(&[3], DType::F32), true);
    let b = graph.scalar(1.0f64, false);
    assert_eq!(graph.len(), 2);
    assert!(graph[a].requires_grad());
    assert!(!graph[b].requires_grad());

    graph.clear();
    assert!(graph.is_empty());
    assert!(graph.get(a).is_err());
}

#[test]
fn test_get_out_of_range_handle() {
    let mut graph = Graph::new();
    let a = graph.scalar(0.0f64, false);
    graph.scalar(1.0f64, false);
    let beyond = Tensor::new(graph.id(), 5);
    assert_eq!(
        graph.get(beyond).unwrap_err(),
        NeuraGradError::InvalidTensor { index: 5, len: 2 }
    );
    assert!(graph.get(a).is_ok());
}

#[test]
fn test_get_rejects_handle_from_other_graph() {
    let mut other = Graph::new();
    let foreign = other.scalar(1.0f64, false);

    let mut graph = Graph::new();
    let local = graph.scalar(100.0f64, false);
    assert_eq!(foreign.index(), local.index());
    assert_ne!(foreign, local);
    assert_eq!(
        graph.get(foreign).unwrap_err(),
        NeuraGradError::ForeignTensor { index: 0 }
    );
    assert!(matches!(
        add_op(&mut graph, local, foreign),
        Err(NeuraGradError::ForeignTensor { .. })
    ));
}

#[test]
fn test_clear_invalidates_old_handles() {
    let mut graph = Graph::new();
    let stale = graph.scalar(3.0f64, true);
    let before = graph.id();
    graph.clear();
    assert_ne!(graph.id(), before);

    let fresh = graph.scalar(7.0f64, true);
    assert_eq!(stale.index(), fresh.index());
    assert_ne!(stale, fresh);
    assert_eq!(
        graph.get(stale).unwrap_err(),
        NeuraGradError::ForeignTensor { index: 0 }
    );
    assert_eq!(
        graph.backward(stale, None),
        Err(NeuraGradError::ForeignTensor { index: 0 })
    );
}

#[test]
fn test_backward_rejects_foreign_seed() {
    let mut other = Graph::new();
    let seed = other.scalar(1.0f64, false);

    let mut graph = Graph::new();
    let x = graph.scalar(2.0f64, true);
    let y = mul_op(&mut graph, x, x).unwrap();
    assert!(matches!(
        graph.backward(y, Some(seed)),
        Err(NeuraGradError::ForeignTensor { .. })
    ));
    assert!(x.grad(&graph).is_none());
}

#[test]
fn test_apply_propagates_requires_grad() {
    let mut graph = Graph::new();
    let a = graph.scalar(1.0f64, true);
    let b = graph.scalar(2.0f64, false);
    let c = add_op(&mut graph, a, b).unwrap();
    let data = &graph[c];
    assert!(data.requires_grad());
    assert_eq!(data.kind(), NodeKind::Computed);
    assert_eq!(data.inputs(), &[a, b]);
    assert_eq!(data.num_outputs(), 1);
    assert_eq!(data.op().map(|op| op.name()), Some("add"));
}

#[test]
fn test_grad_free_short_circuit() {
    let mut graph = Graph::new();
    let a = graph.scalar(1.0f64, false);
    let b = graph.scalar(2.0f64, false);
    let c = mul_op(&mut graph, a, b).unwrap();
    assert_eq!(c.kind(&graph), NodeKind::Leaf);
    assert!(c.is_leaf(&graph));
    assert!(c.inputs(&graph).is_empty());
    assert_eq!(c.item(&graph).unwrap(), 2.0);
}

#[test]
fn test_apply_with_requires_grad_override() {
    let mut graph = Graph::new();
    let a = graph.scalar(1.0f64, true);
    let frozen = graph
        .apply_with_requires_grad(crate::ops::Negate, &[a], false)
        .unwrap();
    assert_eq!(frozen.kind(&graph), NodeKind::Leaf);
    assert!(frozen.inputs(&graph).is_empty());

    let b = graph.scalar(1.0f64, false);
    let tracked = graph
        .apply_with_requires_grad(crate::ops::Negate, &[b], true)
        .unwrap();
    assert_eq!(tracked.kind(&graph), NodeKind::Computed);
    assert_eq!(tracked.inputs(&graph), &[b]);
}

#[test]
fn test_unimplemented_op_fails_on_compute() {
    let mut graph = Graph::new();
    let a = graph.scalar(1.0f64, true);
    let before = graph.len();
    let err = graph.apply(Unimplemented, &[a]).unwrap_err();
    assert_eq!(
        err,
        NeuraGradError::UnimplementedOperation {
            op: "unimplemented".to_string(),
            capability: "compute",
        }
    );
    assert_eq!(graph.len(), before);
}

#[test]
fn test_topological_sort_orders_inputs_first() {
    let mut graph = Graph::new();
    let x = graph.scalar(2.0f64, true);
    let y = graph.scalar(3.0f64, true);
    let a = mul_op(&mut graph, x, y).unwrap();
    let b = exp_op(&mut graph, x).unwrap();
    let c = add_op(&mut graph, a, b).unwrap();
    let d = neg_op(&mut graph, c).unwrap();

    let order = graph.topological_sort(&[d]).unwrap();
    assert_eq!(order.len(), 6);
    assert_eq!(order.last(), Some(&d));
    let position = |t: Tensor| order.iter().position(|&o| o == t).unwrap();
    for &node in &order {
        for &input in graph[node].inputs() {
            assert!(position(input) < position(node));
        }
    }
}

#[test]
fn test_topological_sort_deduplicates_diamond() {
    let mut graph = Graph::new();
    let w = graph.scalar(3.0f64, true);
    let left = mul_scalar_op(&mut graph, w, 2.0).unwrap();
    let right = mul_scalar_op(&mut graph, w, 5.0).unwrap();
    let top = add_op(&mut graph, left, right).unwrap();

    let order = graph.topological_sort(&[top]).unwrap();
    assert_eq!(order.len(), 4);
    assert_eq!(order.iter().filter(|&&t| t == w).count(), 1);
    assert_eq!(order[0], w);
}

#[test]
fn test_topological_sort_multiple_roots() {
    let mut graph = Graph::new();
    let x = graph.scalar(1.0f64, true);
    let a = neg_op(&mut graph, x).unwrap();
    let b = exp_op(&mut graph, x).unwrap();
    let order = graph.topological_sort(&[a, b]).unwrap();
    assert_eq!(order, vec![x, a, b]);
}

#[test]
fn test_zero_grad_clears_everything() {
    let mut graph = Graph::new();
    let x = graph.scalar(1.0f64, true);
    let y = exp_op(&mut graph, x).unwrap();
    graph.backward(y, None).unwrap();
    assert!(x.grad(&graph).is_some());
    assert!(y.grad(&graph).is_some());

    graph.zero_grad();
    assert!(x.grad(&graph).is_none());
    assert!(y.grad(&graph).is_none());
}

#[test]
fn test_backward_requires_grad() {
    let mut graph = Graph::new();
    let x = graph.scalar(1.0f64, false);
    assert_eq!(
        graph.backward(x, None),
        Err(NeuraGradError::RequiresGradNotMet)
    );
}

#[test]
fn test_backward_appends_to_arena_until_clear() {
    let mut graph = Graph::new();
    let x = graph.scalar(2.0f64, true);
    let y = mul_op(&mut graph, x, x).unwrap();
    let built = graph.len();

    graph.backward(y, None).unwrap();
    let after_first = graph.len();
    assert!(after_first > built);

    graph.zero_grad();
    graph.backward(y, None).unwrap();
    assert!(graph.len() > after_first);

    graph.clear();
    assert!(graph.is_empty());
}
