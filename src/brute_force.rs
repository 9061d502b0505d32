use crate::{take_minimal_id, Assignment, Literal, Solution, Solver, CNF};

/// Case splitting on the smallest variable without any inference
///
/// This explores up to `2^n` branches and is meant as the reference answer for small inputs.
pub fn brute_force(input: &CNF) -> Solution {
    match split(input.clone()) {
        Some(mut state) => {
            state.fill_unassigned(input.supp(), false);
            Solution::Sat(state)
        }
        None => Solution::UnSat,
    }
}

fn split(input: CNF) -> Option<Assignment> {
    if input.has_conflict() {
        return None;
    }
    // Already solved
    let Some(fix) = take_minimal_id(&input) else {
        return Some(Assignment::default());
    };
    for positive in [true, false] {
        let lit = Literal { id: fix, positive };
        log::trace!("Set {}", lit);
        let Ok(next) = input.clone().substitute(lit) else {
            continue;
        };
        if let Some(mut state) = split(next) {
            state.assign(lit);
            return Some(state);
        }
    }
    None
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BruteForce;

impl Solver for BruteForce {
    fn name(&self) -> &'static str {
        "brute_force"
    }

    fn solve(&mut self, cnf: &CNF) -> Solution {
        brute_force(cnf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{clause, testing};

    #[test]
    fn test_brute_force() {
        for (expr, expected) in testing::single_solution_cases() {
            assert_eq!(brute_force(&expr), expected, "Failed on {expr:?}");
        }
        for expr in testing::unsat_cases() {
            assert_eq!(brute_force(&expr), Solution::UnSat, "Failed on {expr:?}");
        }
    }

    #[test]
    fn test_model_is_total() {
        // x5 only appears in a tautology
        let expr = clause![3, 4] & clause![5, -5];
        let state = brute_force(&expr).as_sat().cloned().unwrap();
        assert!(expr.is_satisfied_by(&state));
        assert_eq!(state.len(), 3);
    }
}
