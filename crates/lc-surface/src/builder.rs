//! The AST builder (§4.2): turns a [`crate::surface`] tree into the nameless
//! [`lc_ast::Term`]/[`lc_ast::Type`] representation, resolving every name to
//! a de Bruijn index against a [`Context`] threaded through the recursion.
//! For binders the builder pushes the bound name(s) before building the
//! body and pops on every exit path via [`Context::with_binding`].

use std::collections::HashSet;

use lc_ast::{Binding, Context, Term, Type};

use crate::error::BuildError;
use crate::surface::{Command, SurfaceTerm, SurfaceType};

/// Build a type from its surface form. A bare identifier resolves against
/// `ctx` if a [`Binding::TyVar`] of that name is in scope (level 6); other-
/// wise it is treated as a free type name (`Type::Id`, level 5).
pub fn build_type(ctx: &Context, ty: &SurfaceType) -> Result<Type, BuildError> {
    match ty {
        SurfaceType::Bool => Ok(Type::Bool),
        SurfaceType::Nat => Ok(Type::Nat),
        SurfaceType::Top => Ok(Type::Top),
        SurfaceType::Bot => Ok(Type::Bot),
        SurfaceType::Arrow(t1, t2) => {
            Ok(Type::arrow(build_type(ctx, t1)?, build_type(ctx, t2)?))
        }
        SurfaceType::Record(fields) => {
            let mut seen = HashSet::new();
            let mut out = Vec::with_capacity(fields.len());
            for (label, t) in fields {
                if !seen.insert(label.clone()) {
                    return Err(BuildError::DuplicateLabel(label.clone()));
                }
                out.push((label.clone(), build_type(ctx, t)?));
            }
            Ok(Type::Record(out))
        }
        SurfaceType::Tuple(tys) => {
            Ok(Type::Tuple(tys.iter().map(|t| build_type(ctx, t)).collect::<Result<_, _>>()?))
        }
        SurfaceType::Ident(name) => match ctx.find_binding(name) {
            Ok((idx, Binding::TyVar)) => Ok(Type::TyVar(idx, ctx.len())),
            _ => Ok(Type::Id(name.clone())),
        },
        SurfaceType::Univ(name, body) => {
            let body = ctx.clone().with_binding(name.clone(), Binding::TyVar, |ctx| {
                build_type(ctx, body)
            })?;
            Ok(Type::Univ(name.clone(), Box::new(body)))
        }
        SurfaceType::Exis(name, body) => {
            let body = ctx.clone().with_binding(name.clone(), Binding::TyVar, |ctx| {
                build_type(ctx, body)
            })?;
            Ok(Type::Exis(name.clone(), Box::new(body)))
        }
    }
}

/// Build a term from its surface form against `ctx`, which is extended (and
/// restored) for every binder encountered.
pub fn build_term(ctx: &mut Context, t: &SurfaceTerm) -> Result<Term, BuildError> {
    match t {
        SurfaceTerm::Var(name) => {
            let (idx, _) = ctx.find_binding(name)?;
            Ok(Term::Var(idx, ctx.len()))
        }
        SurfaceTerm::Abs(name, ann, body) => {
            let ty = ann.as_ref().map(|t| build_type(ctx, t)).transpose()?;
            let binding = match &ty {
                Some(t) => Binding::Var(t.clone()),
                None => Binding::Opaque,
            };
            let body = ctx.with_binding(name.clone(), binding, |ctx| build_term(ctx, body))?;
            Ok(Term::Abs(name.clone(), ty.map(Box::new), Box::new(body)))
        }
        SurfaceTerm::App(f, a) => Ok(Term::app(build_term(ctx, f)?, build_term(ctx, a)?)),
        SurfaceTerm::If(c, a, b) => Ok(Term::If(
            Box::new(build_term(ctx, c)?),
            Box::new(build_term(ctx, a)?),
            Box::new(build_term(ctx, b)?),
        )),
        SurfaceTerm::Let(name, init, body) => {
            let init = build_term(ctx, init)?;
            let body = ctx
                .with_binding(name.clone(), Binding::Opaque, |ctx| build_term(ctx, body))?;
            Ok(Term::Let(name.clone(), Box::new(init), Box::new(body)))
        }
        SurfaceTerm::Tuple(fields) => Ok(Term::Tuple(
            fields.iter().map(|f| build_term(ctx, f)).collect::<Result<_, _>>()?,
        )),
        SurfaceTerm::Record(fields) => {
            let mut seen = HashSet::new();
            let mut out = Vec::with_capacity(fields.len());
            for (label, f) in fields {
                if !seen.insert(label.clone()) {
                    return Err(BuildError::DuplicateLabel(label.clone()));
                }
                out.push((label.clone(), build_term(ctx, f)?));
            }
            Ok(Term::Record(out))
        }
        SurfaceTerm::Proj(t, label) => {
            Ok(Term::Proj(Box::new(build_term(ctx, t)?), label.clone()))
        }
        SurfaceTerm::True => Ok(Term::True),
        SurfaceTerm::False => Ok(Term::False),
        SurfaceTerm::Num(n) => Ok(Term::from_numeral(*n)),
        SurfaceTerm::Succ(t) => Ok(Term::Succ(Box::new(build_term(ctx, t)?))),
        SurfaceTerm::Pred(t) => Ok(Term::Pred(Box::new(build_term(ctx, t)?))),
        SurfaceTerm::IsZero(t) => Ok(Term::IsZero(Box::new(build_term(ctx, t)?))),
        SurfaceTerm::TypeAbs(name, body) => {
            let body =
                ctx.with_binding(name.clone(), Binding::TyVar, |ctx| build_term(ctx, body))?;
            Ok(Term::TypeAbs(name.clone(), Box::new(body)))
        }
        SurfaceTerm::TypeApp(t, ty) => {
            Ok(Term::TypeApp(Box::new(build_term(ctx, t)?), Box::new(build_type(ctx, ty)?)))
        }
        SurfaceTerm::ExisPack(hidden, body, as_ty) => Ok(Term::ExisPack(
            Box::new(build_type(ctx, hidden)?),
            Box::new(build_term(ctx, body)?),
            Box::new(build_type(ctx, as_ty)?),
        )),
        SurfaceTerm::ExisUnpack(tyname, varname, init, body) => {
            let init = build_term(ctx, init)?;
            let body = ctx.with_binding(tyname.clone(), Binding::TyVar, |ctx| {
                ctx.with_binding(varname.clone(), Binding::Opaque, |ctx| build_term(ctx, body))
            })?;
            Ok(Term::ExisUnpack(
                tyname.clone(),
                varname.clone(),
                Box::new(init),
                Box::new(body),
            ))
        }
    }
}

/// Build and install a top-level command. `Bind` extends `ctx` as a side
/// effect and returns the bound name; `Term` leaves `ctx` untouched and
/// returns the built term for the caller (driver) to evaluate/typecheck.
pub enum BuiltCommand {
    Bound(String),
    Term(Term),
}

pub fn build_command(ctx: &mut Context, cmd: &Command) -> Result<BuiltCommand, BuildError> {
    match cmd {
        Command::Bind(name, ty) => {
            let ty = build_type(ctx, ty)?;
            ctx.add_binding(name.clone(), Binding::Var(ty));
            Ok(BuiltCommand::Bound(name.clone()))
        }
        Command::Term(t) => Ok(BuiltCommand::Term(build_term(ctx, t)?)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::SurfaceTerm as S;

    #[test]
    fn resolves_nested_binders_to_de_bruijn_indices() {
        // (lambda x. lambda y. x) -- x should resolve to index 1 inside the
        // inner lambda (y is innermost, index 0).
        let surface = S::Abs(
            "x".into(),
            None,
            Box::new(S::Abs("y".into(), None, Box::new(S::Var("x".into())))),
        );
        let mut ctx = Context::new();
        let term = build_term(&mut ctx, &surface).unwrap();
        assert_eq!(ctx.len(), 0, "builder must not leak bindings past the top-level call");
        match term {
            Term::Abs(_, _, outer_body) => match *outer_body {
                Term::Abs(_, _, inner_body) => {
                    assert!(matches!(*inner_body, Term::Var(1, 2)));
                }
                _ => panic!("expected nested Abs"),
            },
            _ => panic!("expected Abs"),
        }
    }

    #[test]
    fn unbound_variable_is_rejected() {
        let mut ctx = Context::new();
        let err = build_term(&mut ctx, &S::Var("z".into())).unwrap_err();
        assert!(matches!(err, BuildError::Core(lc_ast::CoreError::UnboundName(_))));
    }

    #[test]
    fn duplicate_record_label_is_rejected() {
        let mut ctx = Context::new();
        let surface = S::Record(vec![("x".into(), S::True), ("x".into(), S::False)]);
        let err = build_term(&mut ctx, &surface).unwrap_err();
        assert!(matches!(err, BuildError::DuplicateLabel(l) if l == "x"));
    }

    #[test]
    fn numeral_expands_to_succ_chain() {
        let mut ctx = Context::new();
        let term = build_term(&mut ctx, &S::Num(3)).unwrap();
        assert_eq!(term.to_string(), "succ succ succ 0");
        assert!(term.is_numeric_value());
    }

    #[test]
    fn bind_command_extends_context_and_is_visible_later() {
        let mut ctx = Context::new();
        let bound = build_command(&mut ctx, &Command::Bind("x".into(), SurfaceType::Bool)).unwrap();
        assert!(matches!(bound, BuiltCommand::Bound(name) if name == "x"));
        let looked_up = build_command(&mut ctx, &Command::Term(S::Var("x".into()))).unwrap();
        assert!(matches!(looked_up, BuiltCommand::Term(Term::Var(0, 1))));
    }
}
