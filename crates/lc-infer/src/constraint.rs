//! Constraint generation (§4.7): `recon(t, ctx, gen)` walks a term and
//! returns its type together with the equality constraints that must hold
//! for that type to be valid. `Let` is the one case that doesn't just
//! accumulate constraints upward — it solves its initializer's constraints
//! immediately so it can generalize over the *solved* type, which is what
//! makes this Hindley-Milner rather than plain unification-based checking.

use lc_ast::{Binding, Context, FreshVarGen, Term, Type};

use crate::error::InferError;
use crate::unify::unify;

/// `L ≡ R`, an equality obligation emitted during reconstruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Constraint(pub Type, pub Type);

/// Reconstructs a principal type for `term`, threading `gen` for fresh
/// unification variables and solving every constraint as it goes so `Let`
/// always generalizes over a fully solved initializer type.
pub fn reconstruct(ctx: &mut Context, gen: &mut FreshVarGen, term: &Term) -> Result<Type, InferError> {
    let (ty, constraints) = recon(ctx, gen, term)?;
    let substs = unify(constraints)?;
    Ok(crate::unify::apply_all(&ty, &substs))
}

/// Returns `term`'s type and the outstanding constraints a caller must fold
/// into its own unification run before trusting that type.
pub fn recon(
    ctx: &mut Context,
    gen: &mut FreshVarGen,
    term: &Term,
) -> Result<(Type, Vec<Constraint>), InferError> {
    match term {
        Term::True | Term::False => Ok((Type::Bool, Vec::new())),
        Term::Zero => Ok((Type::Nat, Vec::new())),
        Term::Succ(inner) | Term::Pred(inner) => {
            let (ty, mut cs) = recon(ctx, gen, inner)?;
            cs.push(Constraint(ty, Type::Nat));
            Ok((Type::Nat, cs))
        }
        Term::IsZero(inner) => {
            let (ty, mut cs) = recon(ctx, gen, inner)?;
            cs.push(Constraint(ty, Type::Nat));
            Ok((Type::Bool, cs))
        }
        Term::Var(idx, _) => {
            let ty = ctx.get_type(*idx, gen)?;
            Ok((ty, Vec::new()))
        }
        Term::Abs(name, ty, body) => {
            let param = match ty {
                Some(t) => (**t).clone(),
                None => Type::Id(gen.next()),
            };
            let (ret, cs) = ctx.with_binding(name.clone(), Binding::Var(param.clone()), |ctx| {
                recon(ctx, gen, body)
            })?;
            Ok((Type::arrow(param, ret), cs))
        }
        Term::App(t1, t2) => {
            let (ty1, mut cs) = recon(ctx, gen, t1)?;
            let (ty2, cs2) = recon(ctx, gen, t2)?;
            cs.extend(cs2);
            let result = Type::Id(gen.next());
            cs.push(Constraint(ty1, Type::arrow(ty2, result.clone())));
            Ok((result, cs))
        }
        Term::If(cond, then, els) => {
            let (cond_ty, mut cs) = recon(ctx, gen, cond)?;
            cs.push(Constraint(cond_ty, Type::Bool));
            let (then_ty, then_cs) = recon(ctx, gen, then)?;
            cs.extend(then_cs);
            let (else_ty, else_cs) = recon(ctx, gen, els)?;
            cs.extend(else_cs);
            cs.push(Constraint(then_ty.clone(), else_ty));
            Ok((then_ty, cs))
        }
        Term::Tuple(fields) => {
            let mut tys = Vec::with_capacity(fields.len());
            let mut cs = Vec::new();
            for f in fields {
                let (ty, fcs) = recon(ctx, gen, f)?;
                tys.push(ty);
                cs.extend(fcs);
            }
            Ok((Type::Tuple(tys), cs))
        }
        Term::Let(name, init, body) => {
            let (init_ty, init_cs) = recon(ctx, gen, init)?;
            let substs = unify(init_cs)?;
            let solved_init_ty = crate::unify::apply_all(&init_ty, &substs);

            let ctx_free = context_free_ids(ctx);
            let mut ty_free = Vec::new();
            solved_init_ty.free_ids(&mut ty_free);
            let quantified: Vec<String> =
                ty_free.into_iter().filter(|v| !ctx_free.contains(v)).collect();

            let binding = if quantified.is_empty() {
                Binding::Var(solved_init_ty)
            } else {
                Binding::Scheme(quantified, solved_init_ty)
            };
            ctx.with_binding(name.clone(), binding, |ctx| recon(ctx, gen, body))
        }
        Term::Record(_) | Term::Proj(_, _) => {
            Err(InferError::UnsupportedConstruct("records"))
        }
        Term::TypeAbs(_, _)
        | Term::TypeApp(_, _)
        | Term::ExisPack(_, _, _)
        | Term::ExisUnpack(_, _, _, _) => {
            Err(InferError::UnsupportedConstruct("System F constructs"))
        }
    }
}

/// The free `Id` names occurring anywhere in `ctx` — `free(ctx)` in §4.7's
/// generalization rule. A `Scheme`'s own quantified variables don't count as
/// free, since they're already bound by that scheme.
fn context_free_ids(ctx: &Context) -> std::collections::HashSet<String> {
    let mut set = std::collections::HashSet::new();
    for idx in 0..ctx.len() {
        match ctx.get_binding(idx) {
            Binding::Var(ty) => {
                let mut ids = Vec::new();
                ty.free_ids(&mut ids);
                set.extend(ids);
            }
            Binding::Scheme(quantified, body) => {
                let mut ids = Vec::new();
                body.free_ids(&mut ids);
                ids.retain(|v| !quantified.contains(v));
                set.extend(ids);
            }
            Binding::TyVar | Binding::Opaque => {}
        }
    }
    set
}

#[cfg(test)]
mod tests {
    use super::*;
    use lc_ast::Term;

    fn run(term: &Term) -> Type {
        let mut ctx = Context::new();
        let mut gen = FreshVarGen::new();
        reconstruct(&mut ctx, &mut gen, term).expect("reconstruction should succeed")
    }

    #[test]
    fn identity_reconstructs_to_an_arrow_with_equal_ends() {
        // lambda x. x
        let t = Term::Abs("x".into(), None, Box::new(Term::Var(0, 1)));
        let ty = run(&t);
        let (param, ret) = ty.as_arrow().unwrap();
        assert_eq!(param, ret);
    }

    #[test]
    fn let_bound_identity_is_polymorphic() {
        // lambda x. let y = lambda z. z in y
        let inner_id = Term::Abs("z".into(), None, Box::new(Term::Var(0, 2)));
        let t = Term::Abs(
            "x".into(),
            None,
            Box::new(Term::Let("y".into(), Box::new(inner_id), Box::new(Term::Var(0, 2)))),
        );
        let ty = run(&t);
        // x -> (b -> b) for some b, with b unconstrained by x's own type.
        let (_, inner) = ty.as_arrow().unwrap();
        let (b_param, b_ret) = inner.as_arrow().unwrap();
        assert_eq!(b_param, b_ret);
    }

    #[test]
    fn self_application_fails_the_occurs_check() {
        // lambda x. x x
        let t = Term::Abs(
            "x".into(),
            None,
            Box::new(Term::app(Term::Var(0, 1), Term::Var(0, 1))),
        );
        let mut ctx = Context::new();
        let mut gen = FreshVarGen::new();
        assert!(reconstruct(&mut ctx, &mut gen, &t).is_err());
    }
}
