pub mod exp;
pub mod ln;

pub use exp::{exp_op, Exp};
pub use ln::{ln_op, Log};
