use miette::Diagnostic;
use thiserror::Error;

use lc_ast::CoreError;

#[derive(Error, Diagnostic, Debug, Clone, PartialEq, Eq)]
pub enum BuildError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Core(#[from] CoreError),

    #[error("duplicate label in record literal: {0}")]
    #[diagnostic(code("B-001"))]
    DuplicateLabel(String),
}
