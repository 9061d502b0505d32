use crate::Literal;
use serde::Serialize;
use std::{collections::BTreeMap, fmt, num::NonZeroU32};

/// Partial assignment of truth values to variables
///
/// A variable which is not in the map is unassigned.
///
/// ```rust
/// use satlab::{lit, Assignment};
///
/// let mut state = Assignment::default();
/// state.assign(lit!(1));
/// state.assign(lit!(-3));
/// assert_eq!(state.get(lit!(1).id), Some(true));
/// assert_eq!(state.get(lit!(2).id), None);
/// assert_eq!(state.to_string(), "1 -3");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Assignment(BTreeMap<NonZeroU32, bool>);

impl Assignment {
    pub fn get(&self, id: NonZeroU32) -> Option<bool> {
        self.0.get(&id).copied()
    }

    pub fn is_assigned(&self, id: NonZeroU32) -> bool {
        self.0.contains_key(&id)
    }

    /// Make `lit` true
    pub fn assign(&mut self, lit: Literal) {
        let previous = self.0.insert(lit.id, lit.positive);
        debug_assert!(
            previous.is_none_or(|value| value == lit.positive),
            "x{} is already assigned to {:?}",
            lit.id,
            previous
        );
    }

    /// Negate the value of an assigned variable. Returns the new value.
    pub fn flip(&mut self, id: NonZeroU32) -> Option<bool> {
        let value = self.0.get_mut(&id)?;
        *value = !*value;
        Some(*value)
    }

    /// Assign `value` to every variable of `ids` which is not assigned yet
    pub fn fill_unassigned(&mut self, ids: impl IntoIterator<Item = NonZeroU32>, value: bool) {
        for id in ids {
            self.0.entry(id).or_insert(value);
        }
    }

    /// Number of assigned variables
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NonZeroU32, bool)> + '_ {
        self.0.iter().map(|(&id, &value)| (id, value))
    }

    /// The assignment as true literals, in the order of ID
    pub fn literals(&self) -> impl Iterator<Item = Literal> + '_ {
        self.iter().map(|(id, positive)| Literal { id, positive })
    }
}

impl FromIterator<Literal> for Assignment {
    fn from_iter<I: IntoIterator<Item = Literal>>(iter: I) -> Self {
        let mut state = Self::default();
        state.extend(iter);
        state
    }
}

impl Extend<Literal> for Assignment {
    fn extend<I: IntoIterator<Item = Literal>>(&mut self, iter: I) {
        for lit in iter {
            self.assign(lit);
        }
    }
}

/// Space separated DIMACS literals, e.g. `1 -2 3`
impl fmt::Display for Assignment {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (i, lit) in self.literals().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}", lit.as_i32())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lit;

    #[test]
    fn test_flip() {
        let mut state: Assignment = [lit!(1)].into_iter().collect();
        assert_eq!(state.flip(lit!(1).id), Some(false));
        assert_eq!(state.flip(lit!(1).id), Some(true));
        assert_eq!(state.flip(lit!(2).id), None);
        assert_eq!(state.len(), 1);
    }

    #[test]
    fn test_fill_unassigned_keeps_values() {
        let mut state: Assignment = [lit!(2)].into_iter().collect();
        state.fill_unassigned([1, 2, 3].map(|i| lit!(i).id), false);
        assert_eq!(state.to_string(), "-1 2 -3");
    }

    #[test]
    fn test_serialize() {
        let state: Assignment = [lit!(1), lit!(-2)].into_iter().collect();
        assert_eq!(
            serde_json::to_string(&state).unwrap(),
            r#"{"1":true,"2":false}"#
        );
    }
}
