use miette::Diagnostic;
use thiserror::Error;

use lc_ast::CoreError;

#[derive(Error, Diagnostic, Debug, Clone, PartialEq, Eq)]
pub enum EvalError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Core(#[from] CoreError),

    #[error("record has no field labeled {0}")]
    #[diagnostic(code("E-001"))]
    MissingLabel(String),
}
