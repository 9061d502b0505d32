//! Classic SAT algorithms over a shared CNF model, for learning
//!
//! - [dpll]: backtracking search with unit propagation and pure literal elimination
//! - [davis_putnam]: variable elimination by resolution
//! - [resolution]: refutation by saturating the clause set under resolution
//! - [walksat]: stochastic local search
//! - [brute_force]: plain case splitting, used as the reference answer
//!
//! ```rust
//! use satlab::{dimacs, dpll, Solution};
//!
//! let input = dimacs::parse_str("p cnf 2 3\n1 2 0\n-1 2 0\n-2 0\n").unwrap();
//! assert_eq!(dpll(&input.cnf), Solution::UnSat);
//! ```

mod assignment;
mod brute_force;
mod cnf;
mod davis_putnam;
mod dpll;
mod propagation;
mod resolution;
mod selector;
mod solver;
mod walksat;

pub mod benchmark;
pub mod dimacs;

#[cfg(test)]
mod testing;

pub use assignment::*;
pub use brute_force::*;
pub use cnf::*;
pub use davis_putnam::*;
pub use dpll::*;
pub use propagation::*;
pub use resolution::*;
pub use selector::*;
pub use solver::*;
pub use walksat::*;

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "result", content = "assignment")]
pub enum Solution {
    /// Find a satisfying assignment
    #[serde(rename = "SAT")]
    Sat(Assignment),
    /// Prove unsatisfiability
    #[serde(rename = "UNSAT")]
    UnSat,
    /// Local search gave up. This is not a proof of unsatisfiability.
    #[serde(rename = "UNKNOWN")]
    Unknown,
}

impl Solution {
    pub fn as_sat(&self) -> Option<&Assignment> {
        match self {
            Solution::Sat(state) => Some(state),
            _ => None,
        }
    }

    pub fn is_sat(&self) -> bool {
        matches!(self, Solution::Sat(_))
    }

    /// `SAT`, `UNSAT`, or `UNKNOWN`
    pub fn tag(&self) -> &'static str {
        match self {
            Solution::Sat(_) => "SAT",
            Solution::UnSat => "UNSAT",
            Solution::Unknown => "UNKNOWN",
        }
    }
}

impl From<Option<Assignment>> for Solution {
    fn from(state: Option<Assignment>) -> Self {
        match state {
            Some(state) => Solution::Sat(state),
            None => Solution::UnSat,
        }
    }
}
