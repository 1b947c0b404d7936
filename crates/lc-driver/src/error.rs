use miette::Diagnostic;
use thiserror::Error;

use lc_eval::EvalError;
use lc_infer::InferError;
use lc_surface::BuildError;
use lc_typecheck::TypeError;

use crate::Calculus;

#[derive(Error, Diagnostic, Debug, Clone, PartialEq, Eq)]
pub enum DriverError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Build(#[from] BuildError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Eval(#[from] EvalError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Check(#[from] TypeError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Infer(#[from] InferError),

    #[error("{0:?} has no type checker; only evaluation is available at this level")]
    #[diagnostic(code("D-001"))]
    NoChecker(Calculus),
}
