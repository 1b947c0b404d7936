//! Small-step, call-by-value evaluation (§4.4). `step` tries each rule in
//! order and returns the first that applies; [`normalize`] iterates it to a
//! normal form. `NoRuleApplies` is modeled as `Ok(None)` rather than an error
//! variant — it's an internal loop-exit signal (§7), not a user-facing
//! failure, and this keeps it unrepresentable as one.

use log::trace;

use lc_ast::{subst_top, type_into_term_top, Term};

use crate::error::EvalError;

/// Attempt one reduction step. Returns `Ok(None)` when no rule applies.
pub fn step(t: &Term) -> Result<Option<Term>, EvalError> {
    use Term::*;
    let stepped = match t {
        // 1. App(Abs(_,_,body), v) -> substTop(v, body)
        App(t1, t2) if matches!(**t1, Abs(..)) && t2.is_value() => {
            let Abs(_, _, body) = t1.as_ref() else { unreachable!() };
            Some(subst_top(t2, body)?)
        }
        // 2. App(v, t) -> App(v, eval(t))   when v value, t not
        App(t1, t2) if t1.is_value() => step(t2)?.map(|t2p| Term::app((**t1).clone(), t2p)),
        // 3. App(t, u) -> App(eval(t), u)
        App(t1, t2) => step(t1)?.map(|t1p| Term::app(t1p, (**t2).clone())),

        // 4. Let(_, v, body) -> substTop(v, body)
        Let(_, init, body) if init.is_value() => Some(subst_top(init, body)?),
        // 5. Let(n, t, body) -> Let(n, eval(t), body)
        Let(n, init, body) => {
            step(init)?.map(|initp| Term::Let(n.clone(), Box::new(initp), body.clone()))
        }

        // 6. If
        If(cond, then, els) => match cond.as_ref() {
            True => Some((**then).clone()),
            False => Some((**els).clone()),
            _ => step(cond)?.map(|condp| {
                Term::If(Box::new(condp), then.clone(), els.clone())
            }),
        },

        // 7. Succ(Pred(v)) / Pred(Succ(v)) -> v, when v numeric
        Succ(inner) if matches!(inner.as_ref(), Pred(v) if v.is_numeric_value()) => {
            let Pred(v) = inner.as_ref() else { unreachable!() };
            Some((**v).clone())
        }
        Pred(inner) if matches!(inner.as_ref(), Succ(v) if v.is_numeric_value()) => {
            let Succ(v) = inner.as_ref() else { unreachable!() };
            Some((**v).clone())
        }
        // 8. Pred(Zero) -> Zero
        Pred(inner) if matches!(inner.as_ref(), Zero) => Some(Zero),
        // 9. reduce the argument of Succ/Pred/IsZero when not numeric
        Succ(inner) if !inner.is_numeric_value() => step(inner)?.map(|i| Succ(Box::new(i))),
        Pred(inner) if !inner.is_numeric_value() => step(inner)?.map(|i| Pred(Box::new(i))),
        IsZero(inner) if !inner.is_numeric_value() => {
            step(inner)?.map(|i| IsZero(Box::new(i)))
        }
        // 10. IsZero(Zero) -> True; IsZero(Succ v) -> False
        IsZero(inner) => match inner.as_ref() {
            Zero => Some(True),
            Succ(v) if v.is_numeric_value() => Some(False),
            _ => None,
        },

        // 11. Proj(Record fs, l) -> fs[l]
        Proj(inner, label) => match inner.as_ref() {
            Record(fields) if fields.iter().all(|(_, f)| f.is_value()) => {
                let found = fields
                    .iter()
                    .find(|(l, _)| l == label)
                    .map(|(_, f)| f.clone())
                    .ok_or_else(|| EvalError::MissingLabel(label.clone()))?;
                Some(found)
            }
            _ => step(inner)?.map(|ip| Proj(Box::new(ip), label.clone())),
        },

        // Tuples and records: reduce the leftmost non-value field.
        Tuple(fields) => step_sequence(fields)?.map(Tuple),
        Record(fields) => step_record_fields(fields)?.map(Record),

        // 12. TypeApp(TypeAbs(_, body), ty) -> typeIntoTermTop(ty, body)
        TypeApp(inner, ty) => match inner.as_ref() {
            TypeAbs(_, body) => Some(type_into_term_top(ty, body)?),
            _ => step(inner)?.map(|ip| TypeApp(Box::new(ip), ty.clone())),
        },

        // 13. ExisUnpack(_, _, ExisPack(hidden, v, _), body)
        //       -> typeIntoTermTop(hidden, substTop(shift(v,1), body))
        ExisUnpack(tyname, varname, init, body) => match init.as_ref() {
            ExisPack(hidden, inner_body, _) if inner_body.is_value() => {
                let mut shifted = (**inner_body).clone();
                lc_ast::Shift::shift(&mut shifted, 1)?;
                let substituted = subst_top(&shifted, body)?;
                Some(type_into_term_top(hidden, &substituted)?)
            }
            _ => step(init)?.map(|initp| {
                ExisUnpack(tyname.clone(), varname.clone(), Box::new(initp), body.clone())
            }),
        },

        // 14. ExisPack(h, t, as) -> ExisPack(h, eval(t), as)
        ExisPack(hidden, body, as_ty) if !body.is_value() => {
            step(body)?.map(|bodyp| ExisPack(hidden.clone(), Box::new(bodyp), as_ty.clone()))
        }

        _ => None,
    };

    if let Some(ref result) = stepped {
        trace!("{t} -> {result}");
    }
    Ok(stepped)
}

/// Reduce the first non-value element of a tuple/fields list, leaving the
/// rest untouched (left-to-right evaluation order).
fn step_sequence(fields: &[Term]) -> Result<Option<Vec<Term>>, EvalError> {
    for (i, f) in fields.iter().enumerate() {
        if !f.is_value() {
            return Ok(step(f)?.map(|fp| {
                let mut out = fields.to_vec();
                out[i] = fp;
                out
            }));
        }
    }
    Ok(None)
}

fn step_record_fields(
    fields: &[(String, Term)],
) -> Result<Option<Vec<(String, Term)>>, EvalError> {
    for (i, (_, f)) in fields.iter().enumerate() {
        if !f.is_value() {
            return Ok(step(f)?.map(|fp| {
                let mut out = fields.to_vec();
                out[i].1 = fp;
                out
            }));
        }
    }
    Ok(None)
}

/// Iterate [`step`] until `NoRuleApplies`, returning the resulting term.
/// Non-termination is possible and not bounded here (§5): callers that need
/// a timeout must impose one externally.
pub fn normalize(t: &Term) -> Result<Term, EvalError> {
    let mut current = t.clone();
    while let Some(next) = step(&current)? {
        current = next;
    }
    Ok(current)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lc_ast::Type;

    fn id() -> Term {
        Term::Abs("x".into(), None, Box::new(Term::Var(0, 1)))
    }

    #[test]
    fn beta_reduces_identity_application() {
        let t = Term::app(id(), Term::True);
        assert_eq!(normalize(&t).unwrap().to_string(), "true");
    }

    #[test]
    fn scenario_booleans_and_naturals() {
        // true; if false then true else false; 0; succ (pred 0); iszero (pred (succ (succ 0)));
        assert_eq!(normalize(&Term::True).unwrap().to_string(), "true");
        let if_expr =
            Term::If(Box::new(Term::False), Box::new(Term::True), Box::new(Term::False));
        assert_eq!(normalize(&if_expr).unwrap().to_string(), "false");
        assert_eq!(normalize(&Term::Zero).unwrap().to_string(), "0");
        let succ_pred = Term::Succ(Box::new(Term::Pred(Box::new(Term::Zero))));
        assert_eq!(normalize(&succ_pred).unwrap().to_string(), "succ 0");
        let iszero = Term::IsZero(Box::new(Term::Pred(Box::new(Term::Succ(Box::new(
            Term::Succ(Box::new(Term::Zero)),
        ))))));
        assert_eq!(normalize(&iszero).unwrap().to_string(), "false");
    }

    #[test]
    fn scenario_self_application_under_identity() {
        // (lambda x. x) (lambda x. x x);
        let omega_arg = Term::Abs(
            "x".into(),
            None,
            Box::new(Term::app(Term::Var(0, 1), Term::Var(0, 1))),
        );
        let t = Term::app(id(), omega_arg);
        assert_eq!(normalize(&t).unwrap().to_string(), "(lambda x. (x x))");
    }

    #[test]
    fn record_projection_reduces_leftmost_field_first() {
        let inner = Term::Record(vec![(
            "x1".into(),
            Term::Abs("m".into(), Some(Box::new(Type::Top)), Box::new(Term::Var(0, 1))),
        )]);
        let outer = Term::Record(vec![
            (
                "x".into(),
                Term::Abs("z".into(), Some(Box::new(Type::Top)), Box::new(Term::Var(0, 1))),
            ),
            (
                "y".into(),
                Term::Abs("z".into(), Some(Box::new(Type::Top)), Box::new(Term::Var(0, 1))),
            ),
            ("w".into(), inner),
        ]);
        let proj = Term::Proj(Box::new(Term::Proj(Box::new(outer), "w".into())), "x1".into());
        assert_eq!(normalize(&proj).unwrap().to_string(), "(lambda m:Top. m)");
    }

    #[test]
    fn missing_label_is_an_error() {
        let r = Term::Record(vec![("x".into(), Term::True)]);
        let proj = Term::Proj(Box::new(r), "y".into());
        assert!(matches!(step(&proj), Err(EvalError::MissingLabel(l)) if l == "y"));
    }

    #[test]
    fn system_f_type_application() {
        // (lambda X. lambda x:X. x) [Nat] 0;
        let poly = Term::TypeAbs(
            "X".into(),
            Box::new(Term::Abs(
                "x".into(),
                Some(Box::new(Type::TyVar(0, 1))),
                Box::new(Term::Var(0, 2)),
            )),
        );
        let applied = Term::TypeApp(Box::new(poly), Box::new(Type::Nat));
        let t = Term::app(applied, Term::Zero);
        assert_eq!(normalize(&t).unwrap().to_string(), "0");
    }
}
