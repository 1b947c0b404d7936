//! Subtype/join/meet lattice operations over records and arrows (§4.6,
//! level 4): width/depth/permutation subtyping on records, contravariant
//! arg/covariant result on arrows, `Top`/`Bot` as lattice identities.

use lc_ast::Type;

/// `S <: T`.
pub fn subtype(s: &Type, t: &Type) -> bool {
    if s == t || matches!(t, Type::Top) || matches!(s, Type::Bot) {
        return true;
    }
    match (s, t) {
        (Type::Record(s_fields), Type::Record(t_fields)) => t_fields.iter().all(|(l, t_ty)| {
            s_fields.iter().any(|(sl, s_ty)| sl == l && subtype(s_ty, t_ty))
        }),
        (Type::Arrow(s1, s2), Type::Arrow(t1, t2)) => subtype(t1, s1) && subtype(s2, t2),
        _ => false,
    }
}

/// Least upper bound. `Top` is returned wherever no more precise bound is
/// known (records with disjoint arrow fields, or genuinely unrelated
/// shapes) — this is an approximation, as in the source this system is
/// modeled on.
pub fn join(s: &Type, t: &Type) -> Type {
    if s == t {
        return s.clone();
    }
    match (s, t) {
        (Type::Bool, Type::Bool) => Type::Bool,
        (Type::Nat, Type::Nat) => Type::Nat,
        (Type::Arrow(s1, s2), Type::Arrow(t1, t2)) => match meet(s1, t1) {
            Some(arg) => Type::arrow(arg, join(s2, t2)),
            None => Type::Top,
        },
        (Type::Record(s_fields), Type::Record(t_fields)) => {
            let mut out = Vec::new();
            for (l, s_ty) in s_fields {
                if let Some((_, t_ty)) = t_fields.iter().find(|(tl, _)| tl == l) {
                    out.push((l.clone(), join(s_ty, t_ty)));
                }
            }
            Type::Record(out)
        }
        _ => Type::Top,
    }
}

/// Greatest lower bound. Returns `None` when the meet genuinely doesn't
/// exist (a shared record label whose field types have no meet): per §4.6
/// that makes the *whole* meet undefined, not just that field.
pub fn meet(s: &Type, t: &Type) -> Option<Type> {
    if s == t {
        return Some(s.clone());
    }
    match (s, t) {
        (Type::Top, other) | (other, Type::Top) => Some(other.clone()),
        (Type::Arrow(s1, s2), Type::Arrow(t1, t2)) => {
            Some(Type::arrow(join(s1, t1), meet(s2, t2)?))
        }
        (Type::Record(s_fields), Type::Record(t_fields)) => {
            let mut out = s_fields.clone();
            for (l, t_ty) in t_fields {
                match out.iter().position(|(sl, _)| sl == l) {
                    Some(pos) => {
                        let m = meet(&out[pos].1, t_ty)?;
                        out[pos].1 = m;
                    }
                    None => out.push((l.clone(), t_ty.clone())),
                }
            }
            Some(Type::Record(out))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subtype_is_reflexive() {
        assert!(subtype(&Type::Bool, &Type::Bool));
        let r = Type::Record(vec![("x".into(), Type::Nat)]);
        assert!(subtype(&r, &r));
    }

    #[test]
    fn top_is_supertype_of_everything() {
        assert!(subtype(&Type::Bool, &Type::Top));
        assert!(subtype(&Type::arrow(Type::Bool, Type::Nat), &Type::Top));
    }

    #[test]
    fn record_width_subtyping() {
        let wide = Type::Record(vec![("x".into(), Type::Nat), ("y".into(), Type::Bool)]);
        let narrow = Type::Record(vec![("x".into(), Type::Nat)]);
        assert!(subtype(&wide, &narrow));
        assert!(!subtype(&narrow, &wide));
    }

    #[test]
    fn record_permutation_subtyping() {
        let a = Type::Record(vec![("x".into(), Type::Nat), ("y".into(), Type::Bool)]);
        let b = Type::Record(vec![("y".into(), Type::Bool), ("x".into(), Type::Nat)]);
        assert!(subtype(&a, &b));
        assert!(subtype(&b, &a));
    }

    #[test]
    fn arrow_is_contravariant_in_argument() {
        let narrow_arg = Type::Record(vec![("x".into(), Type::Nat)]);
        let wide_arg = Type::Record(vec![]);
        // (wide_arg -> Nat) <: (narrow_arg -> Nat) because wide_arg <: narrow_arg
        let s = Type::arrow(wide_arg.clone(), Type::Nat);
        let t = Type::arrow(narrow_arg.clone(), Type::Nat);
        assert!(subtype(&s, &t));
        assert!(!subtype(&t, &s));
    }

    #[test]
    fn join_of_disjoint_records_is_top() {
        let a = Type::Record(vec![("x".into(), Type::Nat)]);
        let b = Type::Record(vec![("y".into(), Type::Bool)]);
        // disjoint labels -> empty intersection record, which is fine (not Top)
        assert_eq!(join(&a, &b), Type::Record(vec![]));
    }

    #[test]
    fn meet_of_incompatible_atoms_is_none() {
        assert_eq!(meet(&Type::Bool, &Type::Nat), None);
    }
}
