//! Shared abstract syntax, context and de Bruijn machinery for the family of
//! interpreters: a nameless AST (terms and types), the binding context, and
//! the shift/substitute engine that every level builds on.

pub mod binding;
pub mod context;
pub mod error;
pub mod ident;
pub mod shift;
pub mod subst;
pub mod term;
pub mod types;

pub use binding::Binding;
pub use context::Context;
pub use error::CoreError;
pub use ident::FreshVarGen;
pub use shift::{shift_and_clone, Shift};
pub use subst::{subst, subst_top, type_into_term, type_into_term_top};
pub use term::Term;
pub use types::{subst_id, type_subst, type_subst_top, Type};
