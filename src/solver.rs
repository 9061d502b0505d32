use crate::{BruteForce, DavisPutnam, Resolution, Solution, WalkSat, CNF, DPLL};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Common interface of the algorithms, used by the CLI and [crate::benchmark]
pub trait Solver {
    /// Name used in logs and reports
    fn name(&self) -> &'static str;

    /// Decide the satisfiability of `cnf`. A returned model assigns every variable of [CNF::supp].
    fn solve(&mut self, cnf: &CNF) -> Solution;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Algorithm {
    Dpll,
    DavisPutnam,
    Resolution,
    Walksat,
    BruteForce,
}

impl Algorithm {
    /// Instantiate the solver. `walksat` is only used by [Algorithm::Walksat].
    pub fn solver(self, walksat: WalkSat) -> Box<dyn Solver + Send> {
        match self {
            Algorithm::Dpll => Box::new(DPLL),
            Algorithm::DavisPutnam => Box::new(DavisPutnam),
            Algorithm::Resolution => Box::new(Resolution),
            Algorithm::Walksat => Box::new(walksat),
            Algorithm::BruteForce => Box::new(BruteForce),
        }
    }

    /// Complete algorithms never answer [Solution::Unknown]
    pub fn is_complete(self) -> bool {
        !matches!(self, Algorithm::Walksat)
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            Algorithm::Dpll => "dpll",
            Algorithm::DavisPutnam => "davis-putnam",
            Algorithm::Resolution => "resolution",
            Algorithm::Walksat => "walksat",
            Algorithm::BruteForce => "brute-force",
        };
        write!(f, "{}", name)
    }
}
