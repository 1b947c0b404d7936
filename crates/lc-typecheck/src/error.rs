use miette::Diagnostic;
use thiserror::Error;

use lc_ast::{CoreError, Type};

#[derive(Error, Diagnostic, Debug, Clone, PartialEq, Eq)]
pub enum TypeError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Core(#[from] CoreError),

    #[error("parameter type mismatch: expected {expected}, got {got}")]
    #[diagnostic(code("T-001"))]
    ParamMismatch { expected: Type, got: Type },

    #[error("expected an arrow type, got {0}")]
    #[diagnostic(code("T-002"))]
    NotArrow(Type),

    #[error("expected a universal type, got {0}")]
    #[diagnostic(code("T-003"))]
    NotUniv(Type),

    #[error("expected an existential type, got {0}")]
    #[diagnostic(code("T-004"))]
    NotExis(Type),

    #[error("record has no field labeled {0}")]
    #[diagnostic(code("T-005"))]
    MissingLabel(String),

    #[error("projection target {0} is not a record")]
    #[diagnostic(code("T-006"))]
    BadProj(Type),

    #[error("then/else branches disagree: {then_ty} vs {else_ty}")]
    #[diagnostic(code("T-007"))]
    IfBranchMismatch { then_ty: Type, else_ty: Type },

    #[error("existential package body has type {actual}, expected {expected}")]
    #[diagnostic(code("T-008"))]
    PackMismatch { expected: Type, actual: Type },

    #[error("lambda parameter {0} has no type annotation, but this calculus requires one")]
    #[diagnostic(code("T-009"))]
    MissingAnnotation(String),
}
