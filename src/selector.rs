use crate::{Assignment, CNF};
use std::num::NonZeroU32;

/// The smallest variable ID in the clauses, `None` if there is no literal
pub fn take_minimal_id(cnf: &CNF) -> Option<NonZeroU32> {
    cnf.clauses()
        .iter()
        .filter_map(|c| c.literals().next())
        .map(|lit| lit.id)
        .min()
}

/// The first unassigned variable found by scanning the clauses in order
pub fn take_first_unassigned(cnf: &CNF, state: &Assignment) -> Option<NonZeroU32> {
    cnf.clauses()
        .iter()
        .flat_map(|c| c.literals())
        .map(|lit| lit.id)
        .find(|id| !state.is_assigned(*id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{clause, lit, Literal};

    #[test]
    fn test_take_minimal_id() {
        let cnf = clause![4, -7] & clause![-3, 9] & clause![5];
        assert_eq!(take_minimal_id(&cnf), Some(lit!(3).id));
        assert_eq!(take_minimal_id(&CNF::tautology()), None);
        assert_eq!(take_minimal_id(&clause![].into()), None);
    }

    #[test]
    fn test_take_first_unassigned() {
        let cnf = clause![4, -7] & clause![-3, 9];
        assert_eq!(take_first_unassigned(&cnf, &Assignment::default()), Some(lit!(4).id));
        let state: Assignment = [lit!(4), lit!(7)].into_iter().collect();
        assert_eq!(take_first_unassigned(&cnf, &state), Some(lit!(3).id));
        let state: Assignment = [4, 7, 3, 9].map(Literal::new).into_iter().collect();
        assert_eq!(take_first_unassigned(&cnf, &state), None);
    }
}
