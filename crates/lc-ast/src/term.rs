use std::fmt;

use crate::error::CoreError;
use crate::shift::Shift;
use crate::types::Type;

/// The term language shared by every calculus. As with [`Type`], the variant
/// set stays closed across all six levels; an individual level's evaluator
/// or checker simply never produces (or accepts) the variants it has no use
/// for. See DESIGN.md for why a single tagged union was chosen over one ADT
/// per calculus.
#[derive(Debug, Clone, PartialEq)]
pub enum Term {
    /// `idx` is a de Bruijn index (0 = innermost binder). `ctx_len` is the
    /// context depth recorded at construction time; it is a defensive
    /// sanity tag only (I2) and plays no role in reduction or typing.
    Var(usize, usize),
    /// `ty` is present in checked calculi and in reconstruction once an
    /// annotation was given; it is `None` for untyped lambdas and for
    /// un-annotated reconstruction-mode lambdas.
    Abs(String, Option<Box<Type>>, Box<Term>),
    App(Box<Term>, Box<Term>),
    If(Box<Term>, Box<Term>, Box<Term>),
    Let(String, Box<Term>, Box<Term>),
    Tuple(Vec<Term>),
    /// Ordered in source, unordered label -> term mapping semantically.
    Record(Vec<(String, Term)>),
    Proj(Box<Term>, String),
    True,
    False,
    Zero,
    Succ(Box<Term>),
    Pred(Box<Term>),
    IsZero(Box<Term>),
    /// `lambda X. body` (level 6 type abstraction).
    TypeAbs(String, Box<Term>),
    /// `term [Type]` (level 6 type application).
    TypeApp(Box<Term>, Box<Type>),
    /// `{*hiddenTy, body} as asTy` (level 6 existential package).
    ExisPack(Box<Type>, Box<Term>, Box<Type>),
    /// `let {tyName, varName} = init in body` (level 6 unpack).
    ExisUnpack(String, String, Box<Term>, Box<Term>),
}

impl Term {
    pub fn app(t1: Term, t2: Term) -> Term {
        Term::App(Box::new(t1), Box::new(t2))
    }

    /// Church-style expansion of a numeric literal: `0` is `Zero`, `n` is
    /// `Succ(expand(n-1))`.
    pub fn from_numeral(n: u64) -> Term {
        let mut t = Term::Zero;
        for _ in 0..n {
            t = Term::Succ(Box::new(t));
        }
        t
    }

    pub fn is_numeric_value(&self) -> bool {
        match self {
            Term::Zero => true,
            Term::Succ(t) => t.is_numeric_value(),
            _ => false,
        }
    }

    /// Values per §4.4: abstractions, type abstractions, booleans, numerals,
    /// fully-valued records/tuples, and existential packages whose payload
    /// is itself a value.
    pub fn is_value(&self) -> bool {
        match self {
            Term::Abs(..) | Term::TypeAbs(..) | Term::True | Term::False => true,
            Term::Record(fields) => fields.iter().all(|(_, t)| t.is_value()),
            Term::Tuple(tys) => tys.iter().all(|t| t.is_value()),
            Term::ExisPack(_, body, _) => body.is_value(),
            _ => self.is_numeric_value(),
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Var(idx, _) => write!(f, "#{idx}"),
            Term::Abs(name, Some(ty), body) => write!(f, "(lambda {name}:{ty}. {body})"),
            Term::Abs(name, None, body) => write!(f, "(lambda {name}. {body})"),
            Term::App(t1, t2) => write!(f, "({t1} {t2})"),
            Term::If(c, a, b) => write!(f, "if {c} then {a} else {b}"),
            Term::Let(n, init, body) => write!(f, "let {n} = {init} in {body}"),
            Term::Tuple(fields) => {
                write!(f, "(")?;
                for (i, t) in fields.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{t}")?;
                }
                write!(f, ")")
            }
            Term::Record(fields) => {
                write!(f, "{{")?;
                for (i, (l, t)) in fields.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{l}={t}")?;
                }
                write!(f, "}}")
            }
            Term::Proj(t, label) => write!(f, "{t}.{label}"),
            Term::True => write!(f, "true"),
            Term::False => write!(f, "false"),
            Term::Zero => write!(f, "0"),
            Term::Succ(t) => write!(f, "succ {t}"),
            Term::Pred(t) => write!(f, "pred {t}"),
            Term::IsZero(t) => write!(f, "iszero {t}"),
            Term::TypeAbs(name, body) => write!(f, "(lambda {name}. {body})"),
            Term::TypeApp(t, ty) => write!(f, "{t} [{ty}]"),
            Term::ExisPack(hidden, body, as_ty) => {
                write!(f, "{{*{hidden}, {body}}} as {as_ty}")
            }
            Term::ExisUnpack(tn, vn, init, body) => {
                write!(f, "let {{{tn}, {vn}}} = {init} in {body}")
            }
        }
    }
}

impl Shift for Term {
    fn shift_above(&mut self, cutoff: usize, d: isize) -> Result<(), CoreError> {
        match self {
            Term::Var(idx, ctx_len) => {
                if *idx >= cutoff {
                    let new_idx = *idx as isize + d;
                    if new_idx < 0 {
                        return Err(CoreError::ScopingError(format!(
                            "shift would produce negative variable index (idx={idx}, d={d})"
                        )));
                    }
                    *idx = new_idx as usize;
                }
                *ctx_len = (*ctx_len as isize + d) as usize;
                Ok(())
            }
            Term::Abs(_, ty, body) => {
                ty.shift_above(cutoff, d)?;
                body.shift_above(cutoff + 1, d)
            }
            Term::App(t1, t2) => {
                t1.shift_above(cutoff, d)?;
                t2.shift_above(cutoff, d)
            }
            Term::If(c, a, b) => {
                c.shift_above(cutoff, d)?;
                a.shift_above(cutoff, d)?;
                b.shift_above(cutoff, d)
            }
            Term::Let(_, init, body) => {
                init.shift_above(cutoff, d)?;
                body.shift_above(cutoff + 1, d)
            }
            Term::Tuple(fields) => fields.shift_above(cutoff, d),
            Term::Record(fields) => {
                for (_, t) in fields.iter_mut() {
                    t.shift_above(cutoff, d)?;
                }
                Ok(())
            }
            Term::Proj(t, _) => t.shift_above(cutoff, d),
            Term::True | Term::False | Term::Zero => Ok(()),
            Term::Succ(t) | Term::Pred(t) | Term::IsZero(t) => t.shift_above(cutoff, d),
            Term::TypeAbs(_, body) => body.shift_above(cutoff + 1, d),
            Term::TypeApp(t, ty) => {
                t.shift_above(cutoff, d)?;
                ty.shift_above(cutoff, d)
            }
            Term::ExisPack(hidden, body, as_ty) => {
                hidden.shift_above(cutoff, d)?;
                body.shift_above(cutoff, d)?;
                as_ty.shift_above(cutoff, d)
            }
            Term::ExisUnpack(_, _, init, body) => {
                init.shift_above(cutoff, d)?;
                body.shift_above(cutoff + 2, d)
            }
        }
    }
}
