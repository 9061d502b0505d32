use crate::{Assignment, Conflict};
use std::{
    collections::BTreeSet,
    fmt,
    num::NonZeroU32,
    ops::BitAnd,
};

mod clause;
mod literal;

pub use clause::Clause;
pub use literal::Literal;

/// Expression in Conjunctive Normal Form
///
/// The clauses are kept in the given order. Solvers scan them in this order when they look for
/// a unit clause or a branching variable.
///
/// ```rust
/// use satlab::{clause, CNF};
///
/// let cnf = clause![1, -2] & clause![2];
/// assert_eq!(cnf.to_string(), "(x1 ∨ ¬x2) ∧ x2");
///
/// // No clause means always true
/// assert_eq!(CNF::tautology().to_string(), "⊤");
/// ```
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct CNF {
    clauses: Vec<Clause>,
}

impl CNF {
    /// CNF without clauses, which is always satisfied
    pub fn tautology() -> Self {
        Self::default()
    }

    pub fn from_clauses(clauses: Vec<Clause>) -> Self {
        Self { clauses }
    }

    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    pub fn into_clauses(self) -> Vec<Clause> {
        self.clauses
    }

    /// Number of clauses
    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    pub fn push(&mut self, clause: Clause) {
        self.clauses.push(clause);
    }

    /// The first `⊥` in the clauses, if any
    pub fn conflicted_clause(&self) -> Option<&Clause> {
        self.clauses.iter().find(|c| c.is_conflicted())
    }

    pub fn has_conflict(&self) -> bool {
        self.conflicted_clause().is_some()
    }

    /// Variables appearing in the clauses
    pub fn supp(&self) -> BTreeSet<NonZeroU32> {
        self.clauses.iter().flat_map(Clause::supp).collect()
    }

    /// Set `lit` to true, drop the clauses it satisfies and remove `¬lit` from the others
    ///
    /// Fails if a clause is reduced to `⊥`. Clauses which are already `⊥` are kept as is.
    ///
    /// ```rust
    /// use satlab::{clause, lit};
    ///
    /// let cnf = clause![1, 2] & clause![-1, 3];
    /// assert_eq!(cnf.clone().substitute(lit!(1)).unwrap(), clause![3].into());
    ///
    /// let cnf = clause![1] & clause![2];
    /// assert!(cnf.substitute(lit!(-1)).is_err());
    /// ```
    pub fn substitute(self, lit: Literal) -> Result<Self, Conflict> {
        let mut clauses = Vec::with_capacity(self.clauses.len());
        for clause in self.clauses {
            if clause.as_unit() == Some(!lit) {
                return Err(Conflict { clause });
            }
            if let Some(reduced) = clause.substitute(lit) {
                clauses.push(reduced);
            }
        }
        Ok(Self { clauses })
    }

    /// [CNF::substitute] every literal fixed by `state`
    pub fn restrict(self, state: &Assignment) -> Result<Self, Conflict> {
        state.literals().try_fold(self, |cnf, lit| cnf.substitute(lit))
    }

    /// Truth value under a partial assignment, see [Clause::evaluate]
    pub fn evaluate(&self, state: &Assignment) -> Option<bool> {
        let mut all_true = true;
        for clause in &self.clauses {
            match clause.evaluate(state) {
                Some(true) => {}
                Some(false) => return Some(false),
                None => all_true = false,
            }
        }
        if all_true {
            Some(true)
        } else {
            None
        }
    }

    pub fn is_satisfied_by(&self, state: &Assignment) -> bool {
        self.evaluate(state) == Some(true)
    }

    /// Eliminate the variable `id` by resolution
    ///
    /// Every clause containing `x_id` or `¬x_id` is replaced by the resolvents of all
    /// positive/negative pairs. Tautological resolvents are dropped and duplicated ones are
    /// added once. The removed clauses are returned as the second element.
    ///
    /// ```rust
    /// use satlab::clause;
    /// use std::num::NonZeroU32;
    ///
    /// let cnf = clause![1, 2] & clause![-1, 3] & clause![-1, -2] & clause![4];
    /// let (cnf, removed) = cnf.eliminate(NonZeroU32::new(1).unwrap());
    /// assert_eq!(cnf.to_string(), "x4 ∧ (x2 ∨ x3)");
    /// assert_eq!(removed.len(), 3);
    /// ```
    pub fn eliminate(self, id: NonZeroU32) -> (Self, Vec<Clause>) {
        let p = Literal::positive(id);
        let n = Literal::negative(id);
        let (removed, mut clauses): (Vec<Clause>, Vec<Clause>) = self
            .clauses
            .into_iter()
            .partition(|c| c.contains(p) || c.contains(n));

        // A tautology containing x_id would carry x_id into its resolvents
        let candidates: Vec<&Clause> = removed.iter().filter(|c| !c.is_tautology()).collect();
        let positives: Vec<&Clause> = candidates.iter().copied().filter(|c| c.contains(p)).collect();
        let negatives: Vec<&Clause> = candidates.iter().copied().filter(|c| c.contains(n)).collect();

        let mut seen = BTreeSet::new();
        for pos in &positives {
            for neg in &negatives {
                let Ok(resolvent) = pos.resolve_on(neg, id) else {
                    continue;
                };
                if resolvent.is_tautology() || !seen.insert(resolvent.clone()) {
                    continue;
                }
                clauses.push(resolvent);
            }
        }
        log::trace!(
            "Eliminate x{id}: {} clauses -> {} resolvents",
            removed.len(),
            seen.len()
        );
        (Self { clauses }, removed)
    }

    /// Convert to DIMACS format. `num_vars` is raised to the largest ID if it is too small.
    ///
    /// ```rust
    /// use satlab::clause;
    ///
    /// let cnf = clause![1, -2] & clause![3];
    /// assert_eq!(cnf.to_dimacs(0), "p cnf 3 2\n1 -2 0\n3 0\n");
    /// ```
    pub fn to_dimacs(&self, num_vars: u32) -> String {
        let max_id = self.supp().last().map_or(0, |id| id.get());
        let mut out = format!("p cnf {} {}\n", num_vars.max(max_id), self.clauses.len());
        for clause in &self.clauses {
            out.push_str(&clause.as_dimacs());
            out.push('\n');
        }
        out
    }
}

impl From<Clause> for CNF {
    fn from(clause: Clause) -> Self {
        Self::from_clauses(vec![clause])
    }
}

impl From<Literal> for CNF {
    fn from(literal: Literal) -> Self {
        Self::from(Clause::from(literal))
    }
}

impl From<Vec<Vec<i32>>> for CNF {
    fn from(clauses: Vec<Vec<i32>>) -> Self {
        clauses.into_iter().map(Clause::from).collect()
    }
}

impl FromIterator<Clause> for CNF {
    fn from_iter<I: IntoIterator<Item = Clause>>(iter: I) -> Self {
        Self::from_clauses(iter.into_iter().collect())
    }
}

impl IntoIterator for CNF {
    type Item = Clause;
    type IntoIter = std::vec::IntoIter<Clause>;
    fn into_iter(self) -> Self::IntoIter {
        self.clauses.into_iter()
    }
}

impl<'a> IntoIterator for &'a CNF {
    type Item = &'a Clause;
    type IntoIter = std::slice::Iter<'a, Clause>;
    fn into_iter(self) -> Self::IntoIter {
        self.clauses.iter()
    }
}

impl BitAnd for CNF {
    type Output = Self;
    fn bitand(mut self, mut rhs: Self) -> Self {
        self.clauses.append(&mut rhs.clauses);
        self
    }
}

impl BitAnd<Clause> for CNF {
    type Output = Self;
    fn bitand(mut self, rhs: Clause) -> Self {
        self.clauses.push(rhs);
        self
    }
}

impl BitAnd<Literal> for CNF {
    type Output = Self;
    fn bitand(self, rhs: Literal) -> Self {
        self & Clause::from(rhs)
    }
}

impl fmt::Display for CNF {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.clauses.is_empty() {
            return write!(f, "⊤");
        }
        let single = self.clauses.len() == 1;
        for (i, clause) in self.clauses.iter().enumerate() {
            if i > 0 {
                write!(f, " ∧ ")?;
            }
            if clause.len() > 1 && !single {
                write!(f, "({})", clause)?;
            } else {
                write!(f, "{}", clause)?;
            }
        }
        Ok(())
    }
}

impl fmt::Debug for CNF {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{clause, lit};

    #[test]
    fn test_restrict() {
        let cnf = clause![1, 2, 3] & clause![-1, 2] & clause![-2, -3];
        let state: Assignment = [lit!(1), lit!(-3)].into_iter().collect();
        let restricted = cnf.restrict(&state).unwrap();
        assert_eq!(restricted, clause![2].into());
    }

    #[test]
    fn test_substitute_conflict_reports_clause() {
        let cnf = clause![1, 2] & clause![-2];
        let conflict = cnf.substitute(lit!(2)).unwrap_err();
        assert_eq!(conflict.clause, clause![-2]);
    }

    #[test]
    fn test_eliminate_keeps_empty_resolvent() {
        let (cnf, removed) = (clause![1] & clause![-1]).eliminate(lit!(1).id);
        assert_eq!(removed, vec![clause![1], clause![-1]]);
        assert!(cnf.has_conflict());
    }

    #[test]
    fn test_eliminate_drops_tautologies() {
        let cnf = clause![1, 2] & clause![-1, -2] & clause![1, -1, 3];
        let (cnf, removed) = cnf.eliminate(lit!(1).id);
        assert!(cnf.is_empty());
        assert_eq!(removed.len(), 3);
    }

    #[test]
    fn test_display() {
        let cnf = clause![1, -2] & clause![3] & clause![-1, 2, 3];
        insta::assert_snapshot!(cnf.to_string(), @"(x1 ∨ ¬x2) ∧ x3 ∧ (¬x1 ∨ x2 ∨ x3)");
        insta::assert_snapshot!(cnf.to_dimacs(5), @r"
        p cnf 5 3
        1 -2 0
        3 0
        -1 2 3 0
        ");
    }
}
