//! Capture-avoiding substitution, built on [`crate::shift::Shift`].
//!
//! `subst(t, j, s)` replaces `Var(j, _)` in `t` with `s`; `substTop` is the
//! specialization used by every beta-like reduction rule to drop the
//! outermost bound variable after substituting it away.

use crate::error::CoreError;
use crate::shift::Shift;
use crate::term::Term;
use crate::types::{type_subst, Type};

/// `subst(t, j, s)`: replace `Var(j + cutoff, _)` with `shift(s, cutoff)` at
/// every occurrence, threading `cutoff` from 0 and bumping it by one (or two,
/// for `ExisUnpack`) under each binder — exactly mirroring [`Shift::shift_above`].
pub fn subst(t: &Term, j: usize, s: &Term) -> Term {
    fn go(t: &Term, j: usize, cutoff: usize, s: &Term) -> Term {
        match t {
            Term::Var(idx, ctx_len) => {
                if *idx == j + cutoff {
                    let mut shifted = s.clone();
                    shifted.shift(cutoff as isize).expect("shifting by a non-negative amount");
                    shifted
                } else {
                    Term::Var(*idx, *ctx_len)
                }
            }
            Term::Abs(name, ty, body) => {
                Term::Abs(name.clone(), ty.clone(), Box::new(go(body, j, cutoff + 1, s)))
            }
            Term::App(t1, t2) => Term::app(go(t1, j, cutoff, s), go(t2, j, cutoff, s)),
            Term::If(c, a, b) => Term::If(
                Box::new(go(c, j, cutoff, s)),
                Box::new(go(a, j, cutoff, s)),
                Box::new(go(b, j, cutoff, s)),
            ),
            Term::Let(name, init, body) => Term::Let(
                name.clone(),
                Box::new(go(init, j, cutoff, s)),
                Box::new(go(body, j, cutoff + 1, s)),
            ),
            Term::Tuple(fields) => {
                Term::Tuple(fields.iter().map(|f| go(f, j, cutoff, s)).collect())
            }
            Term::Record(fields) => Term::Record(
                fields.iter().map(|(l, f)| (l.clone(), go(f, j, cutoff, s))).collect(),
            ),
            Term::Proj(t, label) => Term::Proj(Box::new(go(t, j, cutoff, s)), label.clone()),
            Term::True | Term::False | Term::Zero => t.clone(),
            Term::Succ(inner) => Term::Succ(Box::new(go(inner, j, cutoff, s))),
            Term::Pred(inner) => Term::Pred(Box::new(go(inner, j, cutoff, s))),
            Term::IsZero(inner) => Term::IsZero(Box::new(go(inner, j, cutoff, s))),
            Term::TypeAbs(name, body) => {
                Term::TypeAbs(name.clone(), Box::new(go(body, j, cutoff + 1, s)))
            }
            Term::TypeApp(inner, ty) => {
                Term::TypeApp(Box::new(go(inner, j, cutoff, s)), ty.clone())
            }
            Term::ExisPack(hidden, body, as_ty) => Term::ExisPack(
                hidden.clone(),
                Box::new(go(body, j, cutoff, s)),
                as_ty.clone(),
            ),
            Term::ExisUnpack(tn, vn, init, body) => Term::ExisUnpack(
                tn.clone(),
                vn.clone(),
                Box::new(go(init, j, cutoff, s)),
                Box::new(go(body, j, cutoff + 2, s)),
            ),
        }
    }
    go(t, j, 0, s)
}

/// `substTop(s, t) = shift(subst(t, 0, shift(s, 1)), -1)`.
pub fn subst_top(s: &Term, t: &Term) -> Result<Term, CoreError> {
    let mut s_up = s.clone();
    s_up.shift(1)?;
    let mut substituted = subst(t, 0, &s_up);
    substituted.shift(-1)?;
    Ok(substituted)
}

/// `typeIntoTerm(ty, t, j)`: apply `typeSubst(_, j, ty)` to every type
/// occurring inside `t` (annotations, `TypeApp` payloads, `ExisPack`
/// fields); leave term variables untouched. Level 6 only.
pub fn type_into_term(ty: &Type, t: &Term, j: usize) -> Term {
    fn go(ty: &Type, t: &Term, j: usize) -> Term {
        match t {
            Term::Var(idx, ctx_len) => Term::Var(*idx, *ctx_len),
            Term::Abs(name, ann, body) => Term::Abs(
                name.clone(),
                ann.as_ref().map(|a| Box::new(type_subst(a, j, ty))),
                Box::new(go(ty, body, j + 1)),
            ),
            Term::App(t1, t2) => Term::app(go(ty, t1, j), go(ty, t2, j)),
            Term::If(c, a, b) => Term::If(
                Box::new(go(ty, c, j)),
                Box::new(go(ty, a, j)),
                Box::new(go(ty, b, j)),
            ),
            Term::Let(name, init, body) => Term::Let(
                name.clone(),
                Box::new(go(ty, init, j)),
                Box::new(go(ty, body, j + 1)),
            ),
            Term::Tuple(fields) => Term::Tuple(fields.iter().map(|f| go(ty, f, j)).collect()),
            Term::Record(fields) => {
                Term::Record(fields.iter().map(|(l, f)| (l.clone(), go(ty, f, j))).collect())
            }
            Term::Proj(inner, label) => Term::Proj(Box::new(go(ty, inner, j)), label.clone()),
            Term::True | Term::False | Term::Zero => t.clone(),
            Term::Succ(inner) => Term::Succ(Box::new(go(ty, inner, j))),
            Term::Pred(inner) => Term::Pred(Box::new(go(ty, inner, j))),
            Term::IsZero(inner) => Term::IsZero(Box::new(go(ty, inner, j))),
            Term::TypeAbs(name, body) => {
                Term::TypeAbs(name.clone(), Box::new(go(ty, body, j + 1)))
            }
            Term::TypeApp(inner, payload) => {
                Term::TypeApp(Box::new(go(ty, inner, j)), Box::new(type_subst(payload, j, ty)))
            }
            Term::ExisPack(hidden, body, as_ty) => Term::ExisPack(
                Box::new(type_subst(hidden, j, ty)),
                Box::new(go(ty, body, j)),
                Box::new(type_subst(as_ty, j, ty)),
            ),
            Term::ExisUnpack(tn, vn, init, body) => Term::ExisUnpack(
                tn.clone(),
                vn.clone(),
                Box::new(go(ty, init, j)),
                Box::new(go(ty, body, j + 2)),
            ),
        }
    }
    go(ty, t, j)
}

/// `typeIntoTermTop(ty, t) = shift(typeIntoTerm(shift(ty,1), t, 0), -1)`,
/// used when reducing `TypeApp(TypeAbs(_, body), ty)` and when opening an
/// existential package.
pub fn type_into_term_top(ty: &Type, t: &Term) -> Result<Term, CoreError> {
    let mut ty_up = ty.clone();
    ty_up.shift(1)?;
    let mut substituted = type_into_term(&ty_up, t, 0);
    substituted.shift(-1)?;
    Ok(substituted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::term::Term;

    fn is_closed_approx(t: &Term) -> bool {
        // crude closed-ness probe good enough for these tests: shifting a
        // closed term by any amount is the identity (P2).
        let mut shifted = t.clone();
        shifted.shift(5).unwrap();
        format!("{shifted:?}") == format!("{t:?}")
    }

    #[test]
    fn shift_by_zero_is_identity() {
        let t = Term::Abs("x".into(), None, Box::new(Term::Var(0, 1)));
        let mut shifted = t.clone();
        shifted.shift(0).unwrap();
        assert_eq!(format!("{shifted:?}"), format!("{t:?}"));
    }

    #[test]
    fn shift_composes() {
        let t = Term::app(Term::Var(0, 2), Term::Var(1, 2));
        let mut once = t.clone();
        once.shift(3).unwrap();
        let mut twice = t.clone();
        twice.shift(1).unwrap();
        twice.shift(2).unwrap();
        assert_eq!(format!("{once:?}"), format!("{twice:?}"));
    }

    #[test]
    fn closed_term_unaffected_by_shift() {
        // (lambda x. x) is closed.
        let t = Term::Abs("x".into(), None, Box::new(Term::Var(0, 1)));
        assert!(is_closed_approx(&t));
    }

    #[test]
    fn subst_top_of_lifted_term_is_identity() {
        // substTop(v, shift(t, 1)) = t  (P3)
        let t = Term::app(Term::Var(0, 1), Term::True);
        let v = Term::False;
        let mut lifted = t.clone();
        lifted.shift(1).unwrap();
        let result = subst_top(&v, &lifted).unwrap();
        assert_eq!(format!("{result:?}"), format!("{t:?}"));
    }

    #[test]
    fn negative_shift_below_zero_is_scoping_error() {
        let mut t = Term::Var(0, 1);
        assert!(t.shift(-1).is_err());
    }

    #[test]
    fn church_numeral_roundtrip() {
        for n in 0..5u64 {
            let t = Term::from_numeral(n);
            assert!(t.is_numeric_value());
            let expected = "succ ".repeat(n as usize) + "0";
            assert_eq!(t.to_string(), expected);
        }
    }
}
