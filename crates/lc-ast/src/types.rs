use std::fmt;

use crate::error::CoreError;
use crate::shift::Shift;

/// The type language shared by every checked calculus (levels 3, 4, 5, 6).
/// Earlier calculi simply never construct the variants they don't need; the
/// variant set stays closed so that every match below is exhaustive and the
/// compiler enforces it (see DESIGN.md on the tagged-union decision).
#[derive(Debug, Clone)]
pub enum Type {
    Bool,
    Nat,
    /// Top of the record/arrow subtype lattice (level 4).
    Top,
    /// Bottom of the subtype lattice (level 4).
    Bot,
    Arrow(Box<Type>, Box<Type>),
    /// Ordered in source but semantically an unordered label -> type mapping;
    /// labels are unique by construction (enforced by the AST builder in
    /// `lc-surface`, which this crate does not depend on).
    Record(Vec<(String, Type)>),
    /// Un-labeled product (level 5 extension).
    Tuple(Vec<Type>),
    /// De Bruijn-indexed type variable (level 6); shares numbering with term
    /// variables because both live in the same context (I4).
    TyVar(usize, usize),
    /// A unification variable or a source-annotated free type name (level 5
    /// only). Unification variables are minted with [`crate::FreshVarGen`]
    /// and carry the reserved `?X` prefix.
    Id(String),
    /// `All X. T`
    Univ(String, Box<Type>),
    /// `Some X. T`
    Exis(String, Box<Type>),
}

impl Type {
    pub fn arrow(t1: Type, t2: Type) -> Type {
        Type::Arrow(Box::new(t1), Box::new(t2))
    }

    pub fn record_get(&self, label: &str) -> Option<&Type> {
        match self {
            Type::Record(fields) => fields.iter().find(|(l, _)| l == label).map(|(_, t)| t),
            _ => None,
        }
    }

    pub fn as_arrow(&self) -> Option<(&Type, &Type)> {
        match self {
            Type::Arrow(t1, t2) => Some((t1, t2)),
            _ => None,
        }
    }

    pub fn as_univ(&self) -> Option<(&str, &Type)> {
        match self {
            Type::Univ(n, body) => Some((n.as_str(), body)),
            _ => None,
        }
    }

    pub fn as_exis(&self) -> Option<(&str, &Type)> {
        match self {
            Type::Exis(n, body) => Some((n.as_str(), body)),
            _ => None,
        }
    }

    /// Structural walk used by the occurs check (level 5): does `self`
    /// contain the unification variable named `name` anywhere?
    pub fn contains_id(&self, name: &str) -> bool {
        match self {
            Type::Id(n) => n == name,
            Type::Arrow(t1, t2) => t1.contains_id(name) || t2.contains_id(name),
            Type::Tuple(tys) => tys.iter().any(|t| t.contains_id(name)),
            Type::Record(fields) => fields.iter().any(|(_, t)| t.contains_id(name)),
            Type::Univ(_, body) | Type::Exis(_, body) => body.contains_id(name),
            Type::Bool | Type::Nat | Type::Top | Type::Bot | Type::TyVar(..) => false,
        }
    }

    /// Free `Id` names occurring in `self` (unification variables and free
    /// type names). Used by let-generalization to compute `free(ctx)`.
    pub fn free_ids(&self, out: &mut Vec<String>) {
        match self {
            Type::Id(n) => {
                if !out.contains(n) {
                    out.push(n.clone());
                }
            }
            Type::Arrow(t1, t2) => {
                t1.free_ids(out);
                t2.free_ids(out);
            }
            Type::Tuple(tys) => tys.iter().for_each(|t| t.free_ids(out)),
            Type::Record(fields) => fields.iter().for_each(|(_, t)| t.free_ids(out)),
            Type::Univ(_, body) | Type::Exis(_, body) => body.free_ids(out),
            Type::Bool | Type::Nat | Type::Top | Type::Bot | Type::TyVar(..) => {}
        }
    }
}

/// Replace every occurrence of the free type name `name` (an `Id`) with
/// `replacement`. Used to instantiate a let-generalized [`crate::Binding::Scheme`]
/// with fresh unification variables.
pub fn subst_id(ty: &Type, name: &str, replacement: &Type) -> Type {
    match ty {
        Type::Id(n) if n == name => replacement.clone(),
        Type::Id(_) | Type::Bool | Type::Nat | Type::Top | Type::Bot | Type::TyVar(..) => {
            ty.clone()
        }
        Type::Arrow(t1, t2) => {
            Type::arrow(subst_id(t1, name, replacement), subst_id(t2, name, replacement))
        }
        Type::Tuple(tys) => {
            Type::Tuple(tys.iter().map(|t| subst_id(t, name, replacement)).collect())
        }
        Type::Record(fields) => Type::Record(
            fields.iter().map(|(l, t)| (l.clone(), subst_id(t, name, replacement))).collect(),
        ),
        Type::Univ(n, body) => {
            Type::Univ(n.clone(), Box::new(subst_id(body, name, replacement)))
        }
        Type::Exis(n, body) => {
            Type::Exis(n.clone(), Box::new(subst_id(body, name, replacement)))
        }
    }
}

/// Structural equality. Record fields are compared as an unordered mapping;
/// the binder name on `Univ`/`Exis` is cosmetic (real scoping is de Bruijn)
/// and so is ignored.
impl PartialEq for Type {
    fn eq(&self, other: &Self) -> bool {
        use Type::*;
        match (self, other) {
            (Bool, Bool) | (Nat, Nat) | (Top, Top) | (Bot, Bot) => true,
            (Arrow(a1, b1), Arrow(a2, b2)) => a1 == a2 && b1 == b2,
            (Record(f1), Record(f2)) => {
                f1.len() == f2.len()
                    && f1.iter().all(|(l, t)| f2.iter().any(|(l2, t2)| l == l2 && t == t2))
            }
            (Tuple(a), Tuple(b)) => a == b,
            (TyVar(i1, c1), TyVar(i2, c2)) => i1 == i2 && c1 == c2,
            (Id(a), Id(b)) => a == b,
            (Univ(_, b1), Univ(_, b2)) => b1 == b2,
            (Exis(_, b1), Exis(_, b2)) => b1 == b2,
            _ => false,
        }
    }
}

impl Eq for Type {}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Bool => write!(f, "Bool"),
            Type::Nat => write!(f, "Nat"),
            Type::Top => write!(f, "Top"),
            Type::Bot => write!(f, "Bot"),
            Type::Arrow(t1, t2) => {
                if matches!(**t1, Type::Arrow(..)) {
                    write!(f, "({t1})->{t2}")
                } else {
                    write!(f, "{t1}->{t2}")
                }
            }
            Type::Record(fields) => {
                write!(f, "{{")?;
                for (i, (l, t)) in fields.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{l}:{t}")?;
                }
                write!(f, "}}")
            }
            Type::Tuple(tys) => {
                write!(f, "(")?;
                for (i, t) in tys.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{t}")?;
                }
                write!(f, ")")
            }
            Type::TyVar(idx, _) => write!(f, "#{idx}"),
            Type::Id(name) => write!(f, "{name}"),
            Type::Univ(name, body) => write!(f, "All {name}.{body}"),
            Type::Exis(name, body) => write!(f, "Some {name}.{body}"),
        }
    }
}

impl Shift for Type {
    fn shift_above(&mut self, cutoff: usize, d: isize) -> Result<(), CoreError> {
        match self {
            Type::TyVar(idx, ctx_len) => {
                if *idx >= cutoff {
                    let new_idx = *idx as isize + d;
                    if new_idx < 0 {
                        return Err(CoreError::ScopingError(format!(
                            "shift would produce negative type index (idx={idx}, d={d})"
                        )));
                    }
                    *idx = new_idx as usize;
                }
                *ctx_len = (*ctx_len as isize + d) as usize;
                Ok(())
            }
            Type::Arrow(t1, t2) => {
                t1.shift_above(cutoff, d)?;
                t2.shift_above(cutoff, d)
            }
            Type::Record(fields) => {
                for (_, t) in fields.iter_mut() {
                    t.shift_above(cutoff, d)?;
                }
                Ok(())
            }
            Type::Tuple(tys) => {
                for t in tys.iter_mut() {
                    t.shift_above(cutoff, d)?;
                }
                Ok(())
            }
            Type::Univ(_, body) | Type::Exis(_, body) => body.shift_above(cutoff + 1, d),
            Type::Bool | Type::Nat | Type::Top | Type::Bot | Type::Id(_) => Ok(()),
        }
    }
}

/// `typeSubst(ty, j, s)`: replace `TyVar(j, _)` with `s`, recursing under
/// `Univ`/`Exis` binders with an incremented cutoff; the replacement is
/// re-shifted by the cutoff at the point of substitution so it stays correct
/// under however many binders it was carried through.
pub fn type_subst(ty: &Type, j: usize, s: &Type) -> Type {
    fn go(ty: &Type, j: usize, cutoff: usize, s: &Type) -> Type {
        match ty {
            Type::TyVar(idx, ctx_len) => {
                if *idx == j + cutoff {
                    let mut shifted = s.clone();
                    shifted.shift(cutoff as isize).expect("shifting by a non-negative amount");
                    shifted
                } else {
                    Type::TyVar(*idx, *ctx_len)
                }
            }
            Type::Arrow(t1, t2) => Type::arrow(go(t1, j, cutoff, s), go(t2, j, cutoff, s)),
            Type::Record(fields) => Type::Record(
                fields.iter().map(|(l, t)| (l.clone(), go(t, j, cutoff, s))).collect(),
            ),
            Type::Tuple(tys) => Type::Tuple(tys.iter().map(|t| go(t, j, cutoff, s)).collect()),
            Type::Univ(n, body) => Type::Univ(n.clone(), Box::new(go(body, j, cutoff + 1, s))),
            Type::Exis(n, body) => Type::Exis(n.clone(), Box::new(go(body, j, cutoff + 1, s))),
            Type::Bool | Type::Nat | Type::Top | Type::Bot | Type::Id(_) => ty.clone(),
        }
    }
    go(ty, j, 0, s)
}

/// `typeSubstTop(body, s) = typeShift(typeSubst(body, typeShift(s,1), 0), -1)`:
/// substitute the innermost type variable in `body` with `s`.
pub fn type_subst_top(body: &Type, s: &Type) -> Result<Type, CoreError> {
    let mut s_up = s.clone();
    s_up.shift(1)?;
    let mut substituted = type_subst(body, 0, &s_up);
    substituted.shift(-1)?;
    Ok(substituted)
}
