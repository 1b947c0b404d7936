use miette::Diagnostic;
use thiserror::Error;

use lc_ast::{CoreError, Type};

#[derive(Error, Diagnostic, Debug, Clone, PartialEq, Eq)]
pub enum InferError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Core(#[from] CoreError),

    #[error("cannot unify {left} with {right}")]
    #[diagnostic(code("U-001"))]
    UnifyFail { left: Type, right: Type },

    #[error("occurs check failed: {var} occurs in {ty}")]
    #[diagnostic(code("U-002"))]
    OccursCheck { var: String, ty: Type },

    #[error("tuples of different arity cannot unify: {left} vs {right}")]
    #[diagnostic(code("U-003"))]
    TupleArityMismatch { left: usize, right: usize },

    #[error("{0} is not part of the reconstructed calculus")]
    #[diagnostic(code("U-004"))]
    UnsupportedConstruct(&'static str),
}
