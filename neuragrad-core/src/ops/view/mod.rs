// Shape operations between broadcast-compatible shapes
pub mod broadcast;

pub use broadcast::{broadcast_to_op, sum_to_op, BroadcastTo, SumTo};
