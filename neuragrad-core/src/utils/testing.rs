use crate::autograd::Graph;
use crate::tensor::Tensor;

/// Checks that a tensor has the expected shape and that its data is within
/// `tolerance` of `expected_data`, element by element.
///
/// Works for any dtype; values are widened to `f64` before comparison.
/// Panics with the first mismatching index otherwise.
pub fn check_tensor_near(
    graph: &Graph,
    actual: Tensor,
    expected_shape: &[usize],
    expected_data: &[f64],
    tolerance: f64,
) {
    assert_eq!(actual.shape(graph), expected_shape, "Shape mismatch");

    let actual_data = actual.to_f64_vec(graph);
    assert_eq!(
        actual_data.len(),
        expected_data.len(),
        "Data length mismatch"
    );

    for (i, (a, e)) in actual_data.iter().zip(expected_data.iter()).enumerate() {
        let diff = (a - e).abs();
        if diff > tolerance {
            panic!(
                "Data mismatch at index {}: actual={:?}, expected={:?}, diff={:?}, tolerance={:?}",
                i, a, e, diff, tolerance
            );
        }
    }
}
