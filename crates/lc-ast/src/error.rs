//! Errors raised by the shared term/type machinery: context lookup, shifting
//! and substitution. Per-phase crates (eval, typecheck, infer) define their
//! own error enums and wrap this one with `#[from]`.

use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Diagnostic, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("unbound name: {0}")]
    #[diagnostic(code("C-001"))]
    UnboundName(String),

    #[error("duplicate label in record: {0}")]
    #[diagnostic(code("C-002"))]
    DuplicateLabel(String),

    #[error("scoping error: {0}")]
    #[diagnostic(code("C-003"))]
    ScopingError(String),
}
