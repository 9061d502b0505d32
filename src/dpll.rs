use crate::{
    pure_literal_elimination, take_first_unassigned, unit_propagation, Assignment, Literal,
    Solution, Solver, CNF,
};

/// Davis-Putnam-Logemann-Loveland algorithm
///
/// Each call simplifies the clauses by unit propagation and pure literal elimination,
/// then splits on the first unassigned variable in clause order, trying `true` first.
/// Variables which the search never had to fix are set to `false` in the returned model.
///
/// ```rust
/// use satlab::{clause, dpll, lit, Solution};
///
/// let cnf = clause![1, 2] & clause![-1, 2] & clause![-2, 3];
/// let Solution::Sat(state) = dpll(&cnf) else { panic!() };
/// assert!(cnf.is_satisfied_by(&state));
///
/// let cnf = clause![1] & clause![-1];
/// assert_eq!(dpll(&cnf), Solution::UnSat);
/// ```
pub fn dpll(input: &CNF) -> Solution {
    match search(input.clone(), Assignment::default()) {
        Some(mut state) => {
            state.fill_unassigned(input.supp(), false);
            Solution::Sat(state)
        }
        None => Solution::UnSat,
    }
}

fn search(input: CNF, mut state: Assignment) -> Option<Assignment> {
    let input = match unit_propagation(input, &mut state) {
        Ok(input) => input,
        Err(conflict) => {
            log::trace!("{}", conflict);
            return None;
        }
    };
    if input.is_empty() {
        return Some(state);
    }
    if input.has_conflict() {
        return None;
    }

    let input = pure_literal_elimination(input, &mut state);
    if input.is_empty() {
        return Some(state);
    }

    // Propagation leaves only unassigned variables, so this is found whenever clauses remain
    let fix = take_first_unassigned(&input, &state)?;
    for positive in [true, false] {
        let lit = Literal { id: fix, positive };
        log::trace!("Decision: {}", lit);
        let Ok(next) = input.clone().substitute(lit) else {
            continue;
        };
        let mut branch = state.clone();
        branch.assign(lit);
        if let Some(found) = search(next, branch) {
            return Some(found);
        }
    }
    None
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DPLL;

impl Solver for DPLL {
    fn name(&self) -> &'static str {
        "dpll"
    }

    fn solve(&mut self, cnf: &CNF) -> Solution {
        dpll(cnf)
    }
}
