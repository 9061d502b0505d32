//! Inference steps shared by [crate::dpll] and [crate::davis_putnam]

use crate::{Assignment, Clause, Literal, CNF};
use std::collections::BTreeSet;

/// A clause is falsified by the current assignment
///
/// This is not a failure of the solver. It tells the caller that the current branch is infeasible.
#[derive(Debug, Clone, PartialEq, Eq, Hash, thiserror::Error)]
#[error("Conflict on {clause}")]
pub struct Conflict {
    /// The clause which became `⊥`, before the last substitution
    pub clause: Clause,
}

/// Unit propagation
///
/// The clauses are restricted by `state` first. Then the first unit clause is taken repeatedly,
/// its literal is added to `state` and substituted, until no unit clause remains.
///
/// ```rust
/// use satlab::{clause, lit, unit_propagation, Assignment};
///
/// let cnf = clause![-1, 2] & clause![-2, 3] & clause![-3, 4, 5];
/// let mut state: Assignment = [lit!(1)].into_iter().collect();
/// let cnf = unit_propagation(cnf, &mut state).unwrap();
/// assert_eq!(cnf, clause![4, 5].into());
/// assert_eq!(state.to_string(), "1 2 3");
/// ```
pub fn unit_propagation(cnf: CNF, state: &mut Assignment) -> Result<CNF, Conflict> {
    if let Some(clause) = cnf.conflicted_clause() {
        return Err(Conflict {
            clause: clause.clone(),
        });
    }
    let mut cnf = cnf.restrict(state)?;
    while let Some(lit) = cnf.clauses().iter().find_map(Clause::as_unit) {
        log::trace!("Unit: {}", lit);
        state.assign(lit);
        cnf = cnf.substitute(lit)?;
    }
    Ok(cnf)
}

/// Literals of unassigned variables whose negation never appears in `cnf`, in the order of ID
pub fn pure_literals(cnf: &CNF, state: &Assignment) -> Vec<Literal> {
    let literals: BTreeSet<Literal> = cnf
        .clauses()
        .iter()
        .flat_map(|c| c.literals().copied())
        .filter(|lit| !state.is_assigned(lit.id))
        .collect();
    literals
        .iter()
        .filter(|lit| !literals.contains(&!**lit))
        .copied()
        .collect()
}

/// Pure literal elimination
///
/// Every pure literal is set to true and the clauses containing one of them are removed.
///
/// ```rust
/// use satlab::{clause, pure_literal_elimination, Assignment};
///
/// let cnf = clause![1, 2] & clause![-1, 3] & clause![-3, 2];
/// let mut state = Assignment::default();
/// let cnf = pure_literal_elimination(cnf, &mut state);
/// // x2 is pure
/// assert_eq!(cnf, clause![-1, 3].into());
/// assert_eq!(state.to_string(), "2");
/// ```
pub fn pure_literal_elimination(cnf: CNF, state: &mut Assignment) -> CNF {
    let pure = pure_literals(&cnf, state);
    if pure.is_empty() {
        return cnf;
    }
    log::trace!("Pure literals: {:?}", pure);
    state.extend(pure.iter().copied());
    cnf.into_iter()
        .filter(|c| !pure.iter().any(|lit| c.contains(*lit)))
        .collect()
}
