use super::{Literal, CNF};
use crate::Assignment;
use anyhow::{bail, Result};
use maplit::btreeset;
use proptest::prelude::*;
use std::{
    collections::BTreeSet,
    fmt,
    num::NonZeroU32,
    ops::{BitAnd, BitOr},
};

/// A clause in [Conjunctive Normal Form](https://en.wikipedia.org/wiki/Conjunctive_normal_form)
///
/// Literals are kept in a set, so two clauses are equal iff they have the same literals.
/// The empty clause is `⊥`. A clause containing a literal and its negation is a tautology,
/// and it is kept as is, see [Clause::is_tautology].
///
/// # Order
///
/// Clauses are in graded lexical order, i.e. the number of literals is the primary key.
///
/// ```rust
/// use satlab::clause;
///
/// let a = clause![1, 2];
/// let b = clause![1];
/// let c = clause![2];
/// let d = clause![];
///
/// assert!(d < b);
/// assert!(b < c); // since 1 < 2
/// assert!(c < a);
/// ```
///
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct Clause {
    literals: BTreeSet<Literal>,
}

#[macro_export]
macro_rules! clause {
    ($($lit:expr),*) => {
        $crate::Clause::from_literals(&[$($lit.into()),*])
    };
}

impl PartialOrd for Clause {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Clause {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        match self.literals.len().cmp(&other.literals.len()) {
            std::cmp::Ordering::Equal => self.literals.cmp(&other.literals),
            ordering => ordering,
        }
    }
}

impl Clause {
    pub fn new(literals: BTreeSet<Literal>) -> Self {
        Self { literals }
    }

    pub fn from_literals(literals: &[Literal]) -> Self {
        literals.iter().copied().collect()
    }

    /// The empty clause `⊥`
    pub fn conflicted() -> Self {
        Self::default()
    }

    /// Parse a clause from a line of DIMACS clause section
    ///
    /// Every token accepted by [Literal::try_new] becomes a literal. `0` and other tokens are
    /// skipped.
    ///
    /// ```rust
    /// use satlab::Clause;
    /// let clause = Clause::from_dimacs("1 -2 0");
    /// assert_eq!(clause.to_string(), "x1 ∨ ¬x2");
    ///
    /// // Empty clause means a conflict
    /// let clause = Clause::from_dimacs("0");
    /// assert_eq!(clause.to_string(), "⊥");
    /// ```
    pub fn from_dimacs(s: &str) -> Self {
        s.split_whitespace()
            .filter_map(|s| s.parse::<i32>().ok())
            .filter_map(Literal::try_new)
            .collect()
    }

    /// Convert the clause to a DIMACS format string
    ///
    /// ```rust
    /// use satlab::{clause, Clause};
    /// assert_eq!(clause![2, -1].as_dimacs(), "-1 2 0");
    /// assert_eq!(Clause::conflicted().as_dimacs(), "0");
    /// ```
    pub fn as_dimacs(&self) -> String {
        let mut s = String::new();
        for lit in &self.literals {
            s.push_str(&lit.as_i32().to_string());
            s.push(' ');
        }
        s.push('0');
        s
    }

    pub fn literals(&self) -> impl DoubleEndedIterator<Item = &Literal> + ExactSizeIterator {
        self.literals.iter()
    }

    /// Number of literals in the clause
    pub fn len(&self) -> usize {
        self.literals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.literals.is_empty()
    }

    /// Same as [Clause::is_empty]; the empty clause can never be satisfied
    pub fn is_conflicted(&self) -> bool {
        self.literals.is_empty()
    }

    pub fn contains(&self, lit: Literal) -> bool {
        self.literals.contains(&lit)
    }

    pub fn is_tautology(&self) -> bool {
        // The negation of some literal must be next to it since sorted.
        let mut iter = self.literals.iter();
        let Some(mut prev) = iter.next() else {
            return false;
        };
        for lit in iter {
            if prev.is_complement_of(lit) {
                return true;
            }
            prev = lit;
        }
        false
    }

    pub fn as_unit(&self) -> Option<Literal> {
        if self.literals.len() == 1 {
            self.literals.first().copied()
        } else {
            None
        }
    }

    pub fn supp(&self) -> BTreeSet<NonZeroU32> {
        self.literals.iter().map(|lit| lit.id).collect()
    }

    /// Partially evaluate the clause with given literal set to true.
    /// Returns `None` if the clause is satisfied by it.
    ///
    /// ```rust
    /// use satlab::{clause, lit};
    ///
    /// // x1 ∨ x2 is always true when x1 is true
    /// assert_eq!(clause![1, 2].substitute(lit!(1)), None);
    ///
    /// // x1 ∨ x2 becomes x2 when x1 is false
    /// assert_eq!(clause![1, 2].substitute(lit!(-1)), Some(clause![2]));
    ///
    /// // x1 becomes ⊥ when ¬x1 is true
    /// assert!(clause![1].substitute(lit!(-1)).unwrap().is_conflicted());
    /// ```
    pub fn substitute(mut self, lit: Literal) -> Option<Self> {
        if self.literals.contains(&lit) {
            return None;
        }
        self.literals.remove(&!lit);
        Some(self)
    }

    /// Truth value under a partial assignment
    ///
    /// - `Some(true)` if some literal is true
    /// - `Some(false)` if every literal is false, including `⊥`
    /// - `None` otherwise
    pub fn evaluate(&self, state: &Assignment) -> Option<bool> {
        let mut open = false;
        for lit in &self.literals {
            match lit.evaluate(state) {
                Some(true) => return Some(true),
                Some(false) => {}
                None => open = true,
            }
        }
        if open {
            None
        } else {
            Some(false)
        }
    }

    pub fn is_satisfied_by(&self, state: &Assignment) -> bool {
        self.evaluate(state) == Some(true)
    }

    /// Resolvent of two clauses on the variable `id`
    ///
    /// `self` and `other` must contain `x_id` with opposite polarity.
    /// The resolvent may be a tautology; callers building a working set must drop those.
    ///
    /// ```rust
    /// use satlab::clause;
    /// use std::num::NonZeroU32;
    ///
    /// let one = NonZeroU32::new(1).unwrap();
    /// let a = clause![1, 2];
    /// let b = clause![-1, 3];
    /// assert_eq!(a.resolve_on(&b, one).unwrap().to_string(), "x2 ∨ x3");
    /// assert_eq!(b.resolve_on(&a, one).unwrap().to_string(), "x2 ∨ x3");
    ///
    /// // x1 and x1 cannot be a pair
    /// assert!(a.resolve_on(&clause![1, 3], one).is_err());
    /// ```
    pub fn resolve_on(&self, other: &Self, id: NonZeroU32) -> Result<Self> {
        let p = Literal::positive(id);
        let n = Literal::negative(id);
        let (pos, neg) = if self.contains(p) && other.contains(n) {
            (self, other)
        } else if self.contains(n) && other.contains(p) {
            (other, self)
        } else {
            bail!("{self} and {other} cannot be resolved on x{id}");
        };
        Ok(pos
            .literals
            .iter()
            .filter(|lit| **lit != p)
            .chain(neg.literals.iter().filter(|lit| **lit != n))
            .copied()
            .collect())
    }

    /// Get the resolvent of two clauses on the first variable they clash on
    ///
    /// ```rust
    /// use satlab::clause;
    ///
    /// let a = clause![1, 2];
    /// let b = clause![-1, 3];
    /// assert_eq!(a.resolution(&b).unwrap().to_string(), "x2 ∨ x3");
    ///
    /// // No pair
    /// assert!(a.resolution(&clause![3, 4]).is_err());
    ///
    /// // Multiple pairs always give a tautology
    /// assert!(a.resolution(&clause![-1, -2]).unwrap().is_tautology());
    ///
    /// // x1 and ¬x1 give ⊥
    /// assert!(clause![1].resolution(&clause![-1]).unwrap().is_conflicted());
    /// ```
    ///
    /// <https://en.wikipedia.org/wiki/Resolution_(logic)>
    pub fn resolution(&self, other: &Self) -> Result<Self> {
        let Some(pivot) = self
            .literals
            .iter()
            .find(|lit| other.contains(!**lit))
        else {
            bail!("No complementary literals for resolution");
        };
        self.resolve_on(other, pivot.id)
    }
}

impl From<Literal> for Clause {
    fn from(literal: Literal) -> Self {
        Self::new(btreeset! {literal})
    }
}

impl From<Vec<i32>> for Clause {
    fn from(literals: Vec<i32>) -> Self {
        literals.into_iter().map(Literal::new).collect()
    }
}

impl FromIterator<Literal> for Clause {
    fn from_iter<I: IntoIterator<Item = Literal>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl PartialEq<Literal> for Clause {
    fn eq(&self, other: &Literal) -> bool {
        self.as_unit() == Some(*other)
    }
}

impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.literals.is_empty() {
            return write!(f, "⊥");
        }
        for (i, literal) in self.literals.iter().enumerate() {
            if i > 0 {
                write!(f, " ∨ ")?;
            }
            write!(f, "{}", literal)?;
        }
        Ok(())
    }
}

impl fmt::Debug for Clause {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self)
    }
}

impl BitOr for Clause {
    type Output = Self;
    fn bitor(mut self, mut rhs: Self) -> Self {
        self.literals.append(&mut rhs.literals);
        self
    }
}

impl BitOr<Literal> for Clause {
    type Output = Self;
    fn bitor(mut self, rhs: Literal) -> Self {
        self.literals.insert(rhs);
        self
    }
}

impl BitAnd for Clause {
    type Output = CNF;
    fn bitand(self, rhs: Self) -> Self::Output {
        CNF::from_clauses(vec![self, rhs])
    }
}

impl BitAnd<Literal> for Clause {
    type Output = CNF;
    fn bitand(self, rhs: Literal) -> Self::Output {
        CNF::from_clauses(vec![self, rhs.into()])
    }
}

impl Arbitrary for Clause {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        prop_oneof![
            Just(Clause::conflicted()),
            proptest::collection::vec(any::<Literal>(), 1..5)
                .prop_map(|literals| Clause::from_literals(&literals))
        ]
        .boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lit;

    #[test]
    fn test_from_dimacs_ignores_noise() {
        assert_eq!(Clause::from_dimacs("1 x -3 0"), clause![1, -3]);
        assert_eq!(Clause::from_dimacs("2 0 3"), clause![2, 3]);
        assert_eq!(Clause::from_dimacs("  -2   1 0 "), clause![1, -2]);
        assert_eq!(Clause::from_dimacs("1 -2147483648 0"), clause![1]);
    }

    #[test]
    fn test_set_semantics() {
        assert_eq!(clause![2, 1, 2], clause![1, 2]);
        assert_eq!(clause![2, 1, 2].len(), 2);
    }

    #[test]
    fn test_evaluate() {
        let state: Assignment = [lit!(1), lit!(-2)].into_iter().collect();
        assert_eq!(clause![-1, 2].evaluate(&state), Some(false));
        assert_eq!(clause![-1, 2, 3].evaluate(&state), None);
        assert_eq!(clause![-1, -2, 3].evaluate(&state), Some(true));
        assert_eq!(Clause::conflicted().evaluate(&state), Some(false));
    }

    #[test]
    fn test_resolution_on_specific_variable() {
        let id = NonZeroU32::new(2).unwrap();
        let resolvent = clause![1, 2].resolve_on(&clause![-1, -2], id).unwrap();
        assert!(resolvent.is_tautology());
        assert_eq!(resolvent, clause![1, -1]);
    }

    #[test]
    fn test_display() {
        insta::assert_snapshot!(clause![3, -1, 2].to_string(), @"¬x1 ∨ x2 ∨ x3");
        insta::assert_snapshot!(Clause::conflicted().to_string(), @"⊥");
    }

    proptest! {
        #[test]
        fn test_commutative_or(a: Clause, b: Clause) {
            prop_assert_eq!(a.clone() | b.clone(), b | a);
        }

        #[test]
        fn test_dedup(a: Clause) {
            prop_assert_eq!(a.clone() | a.clone(), a);
        }

        #[test]
        fn test_tautology_with_negation(a: Clause, lit: Literal) {
            prop_assert!((a | lit | !lit).is_tautology());
        }

        #[test]
        fn test_dimacs_roundtrip(a: Clause) {
            prop_assert_eq!(Clause::from_dimacs(&a.as_dimacs()), a);
        }

        #[test]
        fn test_resolvent_drops_pivot(a: Clause, b: Clause, lit: Literal) {
            let left = a | lit;
            let right = b | !lit;
            prop_assume!(!left.is_tautology() && !right.is_tautology());
            let resolvent = left.resolve_on(&right, lit.id).unwrap();
            prop_assert!(!resolvent.contains(lit));
            prop_assert!(!resolvent.contains(!lit));
            for l in left.literals().chain(right.literals()) {
                if l.id != lit.id {
                    prop_assert!(resolvent.contains(*l));
                }
            }
        }

        #[test]
        fn test_resolvent_is_implied(a: Clause, b: Clause, lit: Literal) {
            // Any assignment satisfying both parents satisfies the resolvent
            let left = a | lit;
            let right = b | !lit;
            let resolvent = left.resolve_on(&right, lit.id).unwrap();
            let supp: Vec<_> = left.supp().union(&right.supp()).copied().collect();
            for bits in 0u32..(1 << supp.len().min(10)) {
                let state: Assignment = supp
                    .iter()
                    .enumerate()
                    .map(|(i, id)| Literal { id: *id, positive: bits >> i & 1 == 1 })
                    .collect();
                if left.is_satisfied_by(&state) && right.is_satisfied_by(&state) {
                    prop_assert!(resolvent.is_satisfied_by(&state));
                }
            }
        }
    }
}
