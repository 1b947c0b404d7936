//! Worklist unifier (§4.7): solves a list of equality constraints into a
//! substitution list, with the occurs check guarding every variable bind.

use std::collections::VecDeque;

use lc_ast::{subst_id, Type};

use crate::constraint::Constraint;
use crate::error::InferError;

/// A single binding `name ↦ ty` produced by the unifier.
pub type Subst = (String, Type);

/// Solves `constraints`, returning the substitution list in the order the
/// unifier discovered them.
pub fn unify(constraints: Vec<Constraint>) -> Result<Vec<Subst>, InferError> {
    let mut worklist: VecDeque<Constraint> = constraints.into();
    let mut substs = Vec::new();

    while let Some(Constraint(l, r)) = worklist.pop_front() {
        if l == r {
            continue;
        }
        match (&l, &r) {
            (Type::Id(a), _) if !r.contains_id(a) => {
                bind(a.clone(), r, &mut worklist, &mut substs);
            }
            (_, Type::Id(a)) if !l.contains_id(a) => {
                bind(a.clone(), l, &mut worklist, &mut substs);
            }
            (Type::Id(a), _) => {
                return Err(InferError::OccursCheck { var: a.clone(), ty: r });
            }
            (_, Type::Id(a)) => {
                return Err(InferError::OccursCheck { var: a.clone(), ty: l });
            }
            (Type::Arrow(l1, l2), Type::Arrow(r1, r2)) => {
                worklist.push_back(Constraint((**l1).clone(), (**r1).clone()));
                worklist.push_back(Constraint((**l2).clone(), (**r2).clone()));
            }
            (Type::Tuple(ls), Type::Tuple(rs)) => {
                if ls.len() != rs.len() {
                    return Err(InferError::TupleArityMismatch { left: ls.len(), right: rs.len() });
                }
                for (lt, rt) in ls.iter().zip(rs.iter()) {
                    worklist.push_back(Constraint(lt.clone(), rt.clone()));
                }
            }
            _ => return Err(InferError::UnifyFail { left: l, right: r }),
        }
    }

    Ok(substs)
}

fn bind(var: String, replacement: Type, worklist: &mut VecDeque<Constraint>, substs: &mut Vec<Subst>) {
    for c in worklist.iter_mut() {
        c.0 = subst_id(&c.0, &var, &replacement);
        c.1 = subst_id(&c.1, &var, &replacement);
    }
    substs.push((var, replacement));
}

/// Applies every substitution in `substs` to `ty`, re-applying the whole
/// list until the result stops changing — substitutions aren't necessarily
/// composed ahead of time, so a single pass can leave a variable only
/// partially resolved.
pub fn apply_all(ty: &Type, substs: &[Subst]) -> Type {
    let mut current = ty.clone();
    loop {
        let mut next = current.clone();
        for (name, replacement) in substs {
            next = subst_id(&next, name, replacement);
        }
        if next == current {
            return current;
        }
        current = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_types_need_no_substitution() {
        let cs = vec![Constraint(Type::Bool, Type::Bool)];
        assert_eq!(unify(cs).unwrap(), Vec::new());
    }

    #[test]
    fn binds_a_variable_to_a_concrete_type() {
        let cs = vec![Constraint(Type::Id("a".into()), Type::Nat)];
        let substs = unify(cs).unwrap();
        assert_eq!(substs, vec![("a".to_string(), Type::Nat)]);
    }

    #[test]
    fn decomposes_arrows_componentwise() {
        let cs = vec![Constraint(
            Type::arrow(Type::Id("a".into()), Type::Id("b".into())),
            Type::arrow(Type::Nat, Type::Bool),
        )];
        let substs = unify(cs).unwrap();
        assert_eq!(apply_all(&Type::Id("a".into()), &substs), Type::Nat);
        assert_eq!(apply_all(&Type::Id("b".into()), &substs), Type::Bool);
    }

    #[test]
    fn occurs_check_rejects_infinite_type() {
        let cs = vec![Constraint(
            Type::Id("a".into()),
            Type::arrow(Type::Id("a".into()), Type::Nat),
        )];
        assert!(matches!(unify(cs), Err(InferError::OccursCheck { .. })));
    }

    #[test]
    fn mismatched_atoms_fail() {
        let cs = vec![Constraint(Type::Bool, Type::Nat)];
        assert!(matches!(unify(cs), Err(InferError::UnifyFail { .. })));
    }

    #[test]
    fn tuple_arity_mismatch_fails() {
        let cs = vec![Constraint(
            Type::Tuple(vec![Type::Bool]),
            Type::Tuple(vec![Type::Bool, Type::Nat]),
        )];
        assert!(matches!(unify(cs), Err(InferError::TupleArityMismatch { .. })));
    }
}
