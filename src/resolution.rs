use crate::{Assignment, Clause, Literal, Solution, Solver, CNF};
use std::{
    collections::{BTreeMap, BTreeSet},
    num::NonZeroU32,
};

/// Refutation by resolution
///
/// The clause set is saturated by [saturate]. `UNSAT` iff `⊥` is derived.
/// For a satisfiable input, a model is read off the saturated set by [saturated_model].
///
/// ```rust
/// use satlab::{clause, resolution, Solution};
///
/// let cnf = clause![1, 2] & clause![-1, 2] & clause![-2];
/// assert_eq!(resolution(&cnf), Solution::UnSat);
///
/// let cnf = clause![1, 2] & clause![-1, 2];
/// assert!(resolution(&cnf).is_sat());
/// ```
pub fn resolution(input: &CNF) -> Solution {
    match saturate(input) {
        Some(known) => Solution::Sat(saturated_model(&known, input.supp())),
        None => Solution::UnSat,
    }
}

/// Close the clause set under resolution. Returns `None` if `⊥` is derived.
///
/// Tautologies are never added to the set. Each pass resolves the clauses found in the previous
/// pass against all older clauses and against each other, so every pair is examined once.
pub fn saturate(input: &CNF) -> Option<BTreeSet<Clause>> {
    if let Some(clause) = input.conflicted_clause() {
        log::debug!("Input contains {}", clause);
        return None;
    }

    let mut known = BTreeSet::new();
    let mut frontier = Vec::new();
    for clause in input.clauses() {
        if !clause.is_tautology() && known.insert(clause.clone()) {
            frontier.push(clause.clone());
        }
    }

    let mut processed: Vec<Clause> = Vec::new();
    let mut pass = 0;
    while !frontier.is_empty() {
        pass += 1;
        let mut found = Vec::new();
        for (i, clause) in frontier.iter().enumerate() {
            for other in processed.iter().chain(&frontier[i + 1..]) {
                let Ok(resolvent) = clause.resolution(other) else {
                    continue;
                };
                if resolvent.is_conflicted() {
                    log::debug!("⊥ from {} and {} in pass {}", clause, other, pass);
                    return None;
                }
                if !resolvent.is_tautology() && known.insert(resolvent.clone()) {
                    found.push(resolvent);
                }
            }
        }
        log::debug!(
            "Pass {}: {} new resolvents, {} clauses",
            pass,
            found.len(),
            known.len()
        );
        processed.append(&mut frontier);
        frontier = found;
    }
    Some(known)
}

/// Model of a clause set which is closed under resolution and does not contain `⊥`
///
/// Variables are assigned in the order of ID, `false` unless it falsifies a clause whose largest
/// variable is the current one. If both values falsified such clauses, their resolvent would be a
/// clause over the earlier variables that is already false, which closure rules out.
pub fn saturated_model(
    saturated: &BTreeSet<Clause>,
    ids: impl IntoIterator<Item = NonZeroU32>,
) -> Assignment {
    let mut by_last: BTreeMap<NonZeroU32, Vec<&Clause>> = BTreeMap::new();
    for clause in saturated {
        if let Some(last) = clause.literals().next_back() {
            by_last.entry(last.id).or_default().push(clause);
        }
    }

    let mut state = Assignment::default();
    for id in ids {
        state.assign(Literal::negative(id));
        let falsified = by_last
            .get(&id)
            .is_some_and(|clauses| clauses.iter().any(|c| c.evaluate(&state) == Some(false)));
        if falsified {
            state.flip(id);
        }
    }
    state
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Resolution;

impl Solver for Resolution {
    fn name(&self) -> &'static str {
        "resolution"
    }

    fn solve(&mut self, cnf: &CNF) -> Solution {
        resolution(cnf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{brute_force, clause, testing};
    use proptest::prelude::*;

    #[test]
    fn test_resolution() {
        for (expr, expected) in testing::single_solution_cases() {
            assert_eq!(resolution(&expr), expected, "Failed on {expr:?}");
        }
        for expr in testing::unsat_cases() {
            assert_eq!(resolution(&expr), Solution::UnSat, "Failed on {expr:?}");
        }
    }

    #[test]
    fn test_saturate() {
        let cnf = clause![1, 2] & clause![-1, 3] & clause![-2];
        let known = saturate(&cnf).unwrap();
        let expected: BTreeSet<Clause> = [
            clause![1, 2],
            clause![-1, 3],
            clause![-2],
            clause![2, 3],
            clause![1],
            clause![3],
        ]
        .into_iter()
        .collect();
        assert_eq!(known, expected);
    }

    #[test]
    fn test_input_tautology_is_dropped() {
        let cnf = clause![1, -1] & clause![2];
        let known = saturate(&cnf).unwrap();
        assert_eq!(known.len(), 1);
        // x1 only appears in the tautology but is still assigned
        let state = resolution(&cnf).as_sat().cloned().unwrap();
        assert_eq!(state.len(), 2);
    }

    proptest! {
        #[test]
        fn test_agrees_with_brute_force(cnf in testing::small_cnf()) {
            let solution = resolution(&cnf);
            prop_assert_eq!(solution.is_sat(), brute_force(&cnf).is_sat());
            if let Solution::Sat(state) = solution {
                prop_assert!(cnf.is_satisfied_by(&state));
            }
        }

        #[test]
        fn test_saturated_set_is_closed(cnf in testing::small_cnf()) {
            if let Some(known) = saturate(&cnf) {
                for a in &known {
                    prop_assert!(!a.is_tautology());
                    for b in &known {
                        if let Ok(resolvent) = a.resolution(b) {
                            prop_assert!(resolvent.is_tautology() || known.contains(&resolvent));
                        }
                    }
                }
            }
        }
    }
}
