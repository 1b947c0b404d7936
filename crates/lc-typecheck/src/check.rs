//! Syntax-directed type synthesis (§4.5), shared by levels 3 (simply typed),
//! 4 (records + subtyping) and 6 (System F). [`Level`] selects the two
//! points where those calculi actually diverge: how `App` checks its
//! argument and how `If` reconciles its branches. Every other case —
//! including the System F and existential cases — is level-independent:
//! earlier calculi simply never construct the terms that reach them.

use lc_ast::{type_subst_top, Context, FreshVarGen, Term, Type};

use crate::error::TypeError;
use crate::subtype::{join, subtype};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    /// Level 3: simply typed, no subtyping. `App` demands equal parameter
    /// types; `If` demands equal branch types.
    Simple,
    /// Level 4: `App` accepts any subtype of the parameter; `If` returns
    /// the join of the branches (possibly widening to `Top`).
    Sub,
}

/// `typeof(t, ctx)`.
pub fn typeof_term(ctx: &mut Context, level: Level, t: &Term) -> Result<Type, TypeError> {
    match t {
        Term::True | Term::False => Ok(Type::Bool),
        Term::Zero => Ok(Type::Nat),
        Term::Succ(inner) | Term::Pred(inner) => {
            expect_type(ctx, level, inner, &Type::Nat)?;
            Ok(Type::Nat)
        }
        Term::IsZero(inner) => {
            expect_type(ctx, level, inner, &Type::Nat)?;
            Ok(Type::Bool)
        }
        Term::Var(idx, _) => {
            let mut throwaway = FreshVarGen::new();
            Ok(ctx.get_type(*idx, &mut throwaway)?)
        }
        Term::Abs(name, ty, body) => {
            let param_ty = ty
                .as_ref()
                .map(|t| (**t).clone())
                .ok_or_else(|| TypeError::MissingAnnotation(name.clone()))?;
            let body_ty = ctx.with_binding(name.clone(), lc_ast::Binding::Var(param_ty.clone()), |ctx| {
                typeof_term(ctx, level, body)
            })?;
            Ok(Type::arrow(param_ty, body_ty))
        }
        Term::App(t1, t2) => {
            let ty1 = typeof_term(ctx, level, t1)?;
            let (param, ret) = ty1.as_arrow().ok_or_else(|| TypeError::NotArrow(ty1.clone()))?;
            let ty2 = typeof_term(ctx, level, t2)?;
            let ok = match level {
                Level::Simple => &ty2 == param,
                Level::Sub => subtype(&ty2, param),
            };
            if !ok {
                return Err(TypeError::ParamMismatch { expected: param.clone(), got: ty2 });
            }
            Ok(ret.clone())
        }
        Term::If(cond, then, els) => {
            expect_type(ctx, level, cond, &Type::Bool)?;
            let then_ty = typeof_term(ctx, level, then)?;
            let else_ty = typeof_term(ctx, level, els)?;
            match level {
                Level::Simple => {
                    if then_ty != else_ty {
                        return Err(TypeError::IfBranchMismatch { then_ty, else_ty });
                    }
                    Ok(then_ty)
                }
                Level::Sub => {
                    let joined = join(&then_ty, &else_ty);
                    if joined == Type::Top && then_ty != Type::Top && else_ty != Type::Top {
                        log::warn!(
                            "if-branches {then_ty} / {else_ty} only share Top as a common type"
                        );
                    }
                    Ok(joined)
                }
            }
        }
        Term::Let(name, init, body) => {
            let init_ty = typeof_term(ctx, level, init)?;
            ctx.with_binding(name.clone(), lc_ast::Binding::Var(init_ty), |ctx| {
                typeof_term(ctx, level, body)
            })
        }
        Term::Tuple(fields) => {
            let tys = fields
                .iter()
                .map(|f| typeof_term(ctx, level, f))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Type::Tuple(tys))
        }
        Term::Record(fields) => {
            let tys = fields
                .iter()
                .map(|(l, f)| Ok((l.clone(), typeof_term(ctx, level, f)?)))
                .collect::<Result<Vec<_>, TypeError>>()?;
            Ok(Type::Record(tys))
        }
        Term::Proj(inner, label) => {
            let ty = typeof_term(ctx, level, inner)?;
            match &ty {
                Type::Record(_) => {
                    ty.record_get(label).cloned().ok_or_else(|| TypeError::MissingLabel(label.clone()))
                }
                _ => Err(TypeError::BadProj(ty)),
            }
        }
        Term::TypeAbs(name, body) => {
            let body_ty = ctx.with_binding(name.clone(), lc_ast::Binding::TyVar, |ctx| {
                typeof_term(ctx, level, body)
            })?;
            Ok(Type::Univ(name.clone(), Box::new(body_ty)))
        }
        Term::TypeApp(inner, arg_ty) => {
            let ty = typeof_term(ctx, level, inner)?;
            let (_, body) = ty.as_univ().ok_or_else(|| TypeError::NotUniv(ty.clone()))?;
            Ok(type_subst_top(body, arg_ty)?)
        }
        Term::ExisPack(hidden, body, as_ty) => {
            let (_, as_body) =
                as_ty.as_exis().ok_or_else(|| TypeError::NotExis((**as_ty).clone()))?;
            let expected = type_subst_top(as_body, hidden)?;
            let actual = typeof_term(ctx, level, body)?;
            if actual != expected {
                return Err(TypeError::PackMismatch { expected, actual });
            }
            Ok((**as_ty).clone())
        }
        Term::ExisUnpack(tyname, varname, init, body) => {
            let init_ty = typeof_term(ctx, level, init)?;
            let (_, inner_ty) =
                init_ty.as_exis().ok_or_else(|| TypeError::NotExis(init_ty.clone()))?;
            let inner_ty = inner_ty.clone();
            let body_ty = ctx.with_binding(tyname.clone(), lc_ast::Binding::TyVar, |ctx| {
                ctx.with_binding(varname.clone(), lc_ast::Binding::Var(inner_ty), |ctx| {
                    typeof_term(ctx, level, body)
                })
            })?;
            let mut result = body_ty.clone();
            lc_ast::Shift::shift(&mut result, -2).map_err(|_| {
                TypeError::Core(lc_ast::CoreError::ScopingError(format!(
                    "unpacked type variable {tyname} escapes its scope in result type {body_ty}"
                )))
            })?;
            Ok(result)
        }
    }
}

fn expect_type(
    ctx: &mut Context,
    level: Level,
    t: &Term,
    expected: &Type,
) -> Result<(), TypeError> {
    let ty = typeof_term(ctx, level, t)?;
    if &ty == expected {
        Ok(())
    } else {
        Err(TypeError::ParamMismatch { expected: expected.clone(), got: ty })
    }
}
