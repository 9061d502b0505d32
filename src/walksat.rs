use crate::{Assignment, Clause, Literal, Solution, Solver, CNF};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::num::NonZeroU32;

/// WalkSAT local search
///
/// Start from a random assignment over [CNF::supp]. Each step picks one unsatisfied clause at
/// random, and flips one of its variables: a random one with probability `noise`, otherwise the
/// one leaving the fewest unsatisfied clauses, taking the first in clause order on ties.
///
/// Returns [Solution::Unknown] when `max_flips` steps do not reach a model.
/// [Solution::UnSat] is only returned for a formula containing `⊥`.
///
/// ```rust
/// use satlab::{clause, walksat, Solution};
/// use rand::SeedableRng;
/// use rand_chacha::ChaCha8Rng;
///
/// let mut rng = ChaCha8Rng::seed_from_u64(0);
/// let cnf = clause![1, 2] & clause![-1, 2] & clause![1, -2];
/// let state = walksat(&cnf, 1000, 0.5, &mut rng).as_sat().cloned().unwrap();
/// assert!(cnf.is_satisfied_by(&state));
///
/// // Local search cannot prove unsatisfiability
/// let cnf = clause![1] & clause![-1];
/// assert_eq!(walksat(&cnf, 1000, 0.5, &mut rng), Solution::Unknown);
/// ```
pub fn walksat(cnf: &CNF, max_flips: usize, noise: f64, rng: &mut impl Rng) -> Solution {
    if let Some(clause) = cnf.conflicted_clause() {
        log::debug!("Input contains {}", clause);
        return Solution::UnSat;
    }
    let noise = noise.clamp(0.0, 1.0);

    let mut state: Assignment = cnf
        .supp()
        .into_iter()
        .map(|id| Literal {
            id,
            positive: rng.random(),
        })
        .collect();

    for flip in 0..max_flips {
        let unsat = unsatisfied(cnf, &state);
        if unsat.is_empty() {
            log::debug!("Model found after {} flips", flip);
            return Solution::Sat(state);
        }
        let clause = unsat[rng.random_range(0..unsat.len())];
        let pick = if rng.random::<f64>() < noise {
            let i = rng.random_range(0..clause.len());
            clause.literals().nth(i).map(|lit| lit.id)
        } else {
            greedy_pick(cnf, &mut state, clause)
        };
        let Some(id) = pick else {
            break;
        };
        log::trace!("Flip x{} in {}", id, clause);
        state.flip(id);
    }

    if unsatisfied(cnf, &state).is_empty() {
        return Solution::Sat(state);
    }
    log::debug!("No model within {} flips", max_flips);
    Solution::Unknown
}

fn unsatisfied<'a>(cnf: &'a CNF, state: &Assignment) -> Vec<&'a Clause> {
    cnf.clauses()
        .iter()
        .filter(|c| !c.is_satisfied_by(state))
        .collect()
}

/// Variable of `clause` whose flip leaves the fewest unsatisfied clauses
fn greedy_pick(cnf: &CNF, state: &mut Assignment, clause: &Clause) -> Option<NonZeroU32> {
    let mut best: Option<(NonZeroU32, usize)> = None;
    for lit in clause.literals() {
        state.flip(lit.id);
        let count = unsatisfied(cnf, state).len();
        state.flip(lit.id);
        if best.is_none_or(|(_, min)| count < min) {
            best = Some((lit.id, count));
        }
    }
    best.map(|(id, _)| id)
}

/// [walksat] with a fixed seed. Solving the same formula twice gives the same result.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WalkSat {
    pub max_flips: usize,
    pub noise: f64,
    pub seed: u64,
}

impl Default for WalkSat {
    fn default() -> Self {
        WalkSat {
            max_flips: 10_000,
            noise: 0.5,
            seed: 0,
        }
    }
}

impl Solver for WalkSat {
    fn name(&self) -> &'static str {
        "walksat"
    }

    fn solve(&mut self, cnf: &CNF) -> Solution {
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        walksat(cnf, self.max_flips, self.noise, &mut rng)
    }
}
