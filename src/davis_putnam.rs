use crate::{
    pure_literal_elimination, take_minimal_id, unit_propagation, Assignment, Clause, Literal,
    Solution, Solver, CNF,
};
use std::{collections::BTreeSet, num::NonZeroU32};

/// Davis-Putnam procedure
///
/// Each round runs unit propagation and pure literal elimination, and then eliminates the
/// variable with the smallest ID by resolution (see [CNF::eliminate]). The number of clauses may
/// grow exponentially; this is inherent in the algorithm and is not capped.
///
/// The eliminated variables are recorded with the clauses they removed, and assigned again in
/// reverse order when the clauses run out, so the returned model satisfies the input.
///
/// ```rust
/// use satlab::{clause, davis_putnam, Solution};
///
/// let cnf = clause![1, 2] & clause![-1, 2] & clause![1, -2] & clause![-1, -2];
/// assert_eq!(davis_putnam(&cnf), Solution::UnSat);
/// ```
pub fn davis_putnam(input: &CNF) -> Solution {
    let mut cnf = input.clone();
    let mut state = Assignment::default();
    let mut eliminated: Vec<(NonZeroU32, Vec<Clause>)> = Vec::new();

    loop {
        cnf = match unit_propagation(cnf, &mut state) {
            Ok(cnf) => cnf,
            Err(conflict) => {
                log::debug!("{} after {} eliminations", conflict, eliminated.len());
                return Solution::UnSat;
            }
        };
        if cnf.is_empty() {
            break;
        }

        cnf = pure_literal_elimination(cnf, &mut state);
        if cnf.is_empty() {
            break;
        }
        if cnf.has_conflict() {
            return Solution::UnSat;
        }

        let Some(id) = take_minimal_id(&cnf) else {
            break;
        };
        let (next, removed) = cnf.eliminate(id);
        log::debug!(
            "Round {}: eliminate x{id}, {} clauses left",
            eliminated.len() + 1,
            next.len()
        );
        eliminated.push((id, removed));
        cnf = next;
    }

    Solution::Sat(extend_model(input, state, &eliminated))
}

/// Assign the eliminated variables, latest first
///
/// Variables which vanished without being assigned or eliminated are free and set to `false`
/// beforehand, so every other variable of a removed clause has a value when it is examined.
fn extend_model(
    input: &CNF,
    mut state: Assignment,
    eliminated: &[(NonZeroU32, Vec<Clause>)],
) -> Assignment {
    let ids: BTreeSet<NonZeroU32> = eliminated.iter().map(|(id, _)| *id).collect();
    state.fill_unassigned(
        input.supp().into_iter().filter(|id| !ids.contains(id)),
        false,
    );
    for (id, removed) in eliminated.iter().rev() {
        state.assign(Literal::negative(*id));
        if !removed.iter().all(|c| c.is_satisfied_by(&state)) {
            state.flip(*id);
        }
        debug_assert!(removed.iter().all(|c| c.is_satisfied_by(&state)));
    }
    state
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DavisPutnam;

impl Solver for DavisPutnam {
    fn name(&self) -> &'static str {
        "davis_putnam"
    }

    fn solve(&mut self, cnf: &CNF) -> Solution {
        davis_putnam(cnf)
    }
}
