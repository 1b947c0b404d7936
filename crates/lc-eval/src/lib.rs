pub mod error;
pub mod eval;

pub use error::EvalError;
pub use eval::{normalize, step};
