pub mod constraint;
pub mod error;
pub mod unify;

pub use constraint::{recon, reconstruct, Constraint};
pub use error::InferError;
pub use unify::{apply_all, unify, Subst};
