pub mod error;
pub mod pipeline;

pub use error::DriverError;
pub use pipeline::{Calculus, Mode, Outcome, Pipeline};
