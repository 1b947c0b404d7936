//! Ordered stack of name/binding pairs shared by the AST builder, checker,
//! evaluator and reconstructor. Lookup scans from the top (innermost binder
//! wins); `get_binding(idx)` inverts that to resolve a de Bruijn index.

use crate::binding::Binding;
use crate::error::CoreError;
use crate::ident::FreshVarGen;
use crate::types::{subst_id, Type};

#[derive(Debug, Clone, Default)]
pub struct Context {
    bindings: Vec<(String, Binding)>,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn add_binding(&mut self, name: impl Into<String>, binding: Binding) {
        self.bindings.push((name.into(), binding));
    }

    /// Pops the most recently added binding. Panics on an empty context,
    /// which would indicate an unbalanced push/pop somewhere in the caller
    /// (a bug, not a user-facing error).
    pub fn pop_binding(&mut self) -> (String, Binding) {
        self.bindings.pop().expect("pop_binding called on an empty context")
    }

    pub fn top(&self) -> Option<&(String, Binding)> {
        self.bindings.last()
    }

    /// Scan from the top for `name`, returning its de Bruijn index and
    /// binding. The innermost (most recently pushed) binding wins.
    pub fn find_binding(&self, name: &str) -> Result<(usize, &Binding), CoreError> {
        self.bindings
            .iter()
            .rev()
            .enumerate()
            .find(|(_, (n, _))| n == name)
            .map(|(idx, (_, b))| (idx, b))
            .ok_or_else(|| CoreError::UnboundName(name.to_string()))
    }

    pub fn get_binding(&self, idx: usize) -> &Binding {
        let pos = self.bindings.len() - 1 - idx;
        &self.bindings[pos].1
    }

    pub fn get_name(&self, idx: usize) -> &str {
        let pos = self.bindings.len() - 1 - idx;
        &self.bindings[pos].0
    }

    /// Resolve the type of variable `idx`. For a [`Binding::Scheme`] this
    /// *instantiates* the scheme: every quantified variable is replaced with
    /// a fresh unification variable drawn from `gen`.
    pub fn get_type(&self, idx: usize, gen: &mut FreshVarGen) -> Result<Type, CoreError> {
        match self.get_binding(idx) {
            Binding::Var(ty) => Ok(ty.clone()),
            Binding::Scheme(quantified, body) => {
                let mut ty = body.clone();
                for q in quantified {
                    let fresh = Type::Id(gen.next());
                    ty = subst_id(&ty, q, &fresh);
                }
                Ok(ty)
            }
            other => Err(CoreError::ScopingError(format!(
                "variable {} ({}) has no associated type: {other:?}",
                idx,
                self.get_name(idx)
            ))),
        }
    }

    /// Push `binding`, run `f` with it in scope, then pop it — guaranteed,
    /// even if `f` unwinds. Prefer this over manual push/pop pairs.
    pub fn with_binding<F, R>(&mut self, name: impl Into<String>, binding: Binding, f: F) -> R
    where
        F: FnOnce(&mut Context) -> R,
    {
        self.add_binding(name, binding);

        struct PopGuard<'a>(&'a mut Context);
        impl Drop for PopGuard<'_> {
            fn drop(&mut self) {
                self.0.pop_binding();
            }
        }

        let mut guard = PopGuard(self);
        f(&mut *guard.0)
    }
}
