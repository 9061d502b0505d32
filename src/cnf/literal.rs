use super::{Clause, CNF};
use crate::Assignment;
use maplit::btreeset;
use proptest::prelude::*;
use std::{
    fmt,
    num::NonZeroU32,
    ops::{BitAnd, BitOr, Not},
};

/// A literal in [Conjunctive Normal Form](https://en.wikipedia.org/wiki/Conjunctive_normal_form)
///
/// # Order
///
/// - Literals are ordered by their ID
/// - If the IDs are the same, positive literals are less than negative literals,
///   so a literal and its complement are adjacent in a sorted set.
///
/// ```rust
/// use satlab::lit;
///
/// let a = lit!(1);
/// let b = lit!(-1);
/// let c = lit!(2);
/// let d = lit!(-2);
///
/// assert!(a < b); // x1 < ¬x1
/// assert!(b < c); // ¬x1 < x2
/// assert!(c < d); // x2 < ¬x2
/// ```
///
/// # Operations
///
/// `|` builds a [Clause] and `&` builds a [CNF] from two literals
///
/// ```rust
/// use satlab::lit;
///
/// let a = lit!(1);
/// let b = lit!(-1);
/// let c = lit!(2);
///
/// assert_eq!((a | a).to_string(), "x1"); // deduped
/// assert_eq!((a | c).to_string(), "x1 ∨ x2");
/// assert!((a | b).is_tautology());
/// assert_eq!((a & c).to_string(), "x1 ∧ x2");
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Literal {
    pub id: NonZeroU32,
    pub positive: bool,
}

#[macro_export]
macro_rules! lit {
    ($lit:expr) => {
        $crate::Literal::new($lit)
    };
}

impl Literal {
    /// Similar to DIMACS format, literals are 1-indexed and negative literals are negated
    ///
    /// # Panics
    ///
    /// If `lit` is `0` or `i32::MIN`. Use [Literal::try_new] for untrusted input.
    pub fn new(lit: i32) -> Self {
        let Some(lit) = Self::try_new(lit) else {
            panic!("{lit} is not a literal");
        };
        lit
    }

    /// `None` for `0`, which is the clause terminator in DIMACS rather than a literal,
    /// and for `i32::MIN`, whose variable would not fit back into `i32`
    pub fn try_new(lit: i32) -> Option<Self> {
        if lit == i32::MIN {
            return None;
        }
        NonZeroU32::new(lit.unsigned_abs()).map(|id| Self {
            id,
            positive: lit > 0,
        })
    }

    pub fn positive(id: NonZeroU32) -> Self {
        Self { id, positive: true }
    }

    pub fn negative(id: NonZeroU32) -> Self {
        Self {
            id,
            positive: false,
        }
    }

    /// # Panics
    ///
    /// If the ID is larger than `i32::MAX`, which [Literal::try_new] never creates.
    pub fn as_i32(&self) -> i32 {
        let id = i32::try_from(self.id.get()).expect("ID exceeds i32::MAX");
        if self.positive {
            id
        } else {
            -id
        }
    }

    /// Same variable, opposite polarity
    pub fn is_complement_of(&self, other: &Self) -> bool {
        self.id == other.id && self.positive != other.positive
    }

    /// Truth value of the literal, `None` if the variable is unassigned
    pub fn evaluate(&self, state: &Assignment) -> Option<bool> {
        state.get(self.id).map(|value| value == self.positive)
    }
}

impl From<i32> for Literal {
    fn from(id: i32) -> Self {
        Self::new(id)
    }
}

impl Not for Literal {
    type Output = Self;

    fn not(self) -> Self::Output {
        Self::Output {
            positive: !self.positive,
            ..self
        }
    }
}

impl PartialOrd for Literal {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Literal {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        match self.id.cmp(&other.id) {
            std::cmp::Ordering::Equal => self.positive.cmp(&other.positive).reverse(),
            ordering => ordering,
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.positive {
            write!(f, "x{}", self.id)
        } else {
            write!(f, "¬x{}", self.id)
        }
    }
}

impl fmt::Debug for Literal {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self)
    }
}

impl BitOr for Literal {
    type Output = Clause;
    fn bitor(self, rhs: Self) -> Self::Output {
        Clause::new(btreeset! {self, rhs})
    }
}

impl BitOr<Clause> for Literal {
    type Output = Clause;
    fn bitor(self, rhs: Clause) -> Self::Output {
        rhs | self
    }
}

impl BitAnd for Literal {
    type Output = CNF;
    fn bitand(self, rhs: Self) -> Self::Output {
        CNF::from(self) & CNF::from(rhs)
    }
}

impl BitAnd<Clause> for Literal {
    type Output = CNF;
    fn bitand(self, rhs: Clause) -> Self::Output {
        CNF::from(self) & rhs
    }
}

impl Arbitrary for Literal {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        // Small IDs so that generated literals collide often
        (1..=16_i32, any::<bool>())
            .prop_map(|(id, positive)| Literal::new(if positive { id } else { -id }))
            .boxed()
    }
}
