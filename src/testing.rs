use crate::{clause, lit, Clause, Literal, Solution, CNF};
use maplit::btreeset;
use proptest::prelude::*;
use std::collections::BTreeSet;

// Same allocator as the binary, so that the harness reads real statistics in tests
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

fn sat(model: BTreeSet<Literal>) -> Solution {
    Solution::Sat(model.into_iter().collect())
}

/// Formulas with exactly one model over their variables
pub fn single_solution_cases() -> Vec<(CNF, Solution)> {
    vec![
        // True
        (CNF::tautology(), sat(btreeset! {})),
        // False
        (CNF::from(Clause::conflicted()), Solution::UnSat),
        // x3
        (CNF::from(lit!(3)), sat(btreeset! { 3.into() })),
        // ¬x3
        (CNF::from(lit!(-3)), sat(btreeset! { (-3).into() })),
        // x3 ∧ x4
        (lit!(3) & lit!(4), sat(btreeset! { 3.into(), 4.into() })),
        // x3 ∧ ¬x4
        (lit!(3) & lit!(-4), sat(btreeset! { 3.into(), (-4).into() })),
        // ¬x3 ∧ x4
        (lit!(-3) & lit!(4), sat(btreeset! { (-3).into(), 4.into() })),
        // ¬x3 ∧ ¬x4
        (lit!(-3) & lit!(-4), sat(btreeset! { (-3).into(), (-4).into() })),
        // x3 ∧ x4 ∧ x5
        (
            lit!(3) & lit!(4) & lit!(5),
            sat(btreeset! { 3.into(), 4.into(), 5.into() }),
        ),
        // (x1 ∨ x2) ∧ ¬x1
        (
            clause![1, 2] & lit!(-1),
            sat(btreeset! { (-1).into(), 2.into() }),
        ),
        // (x1 ∨ x2) ∧ (¬x1 ∨ x2) ∧ (x1 ∨ ¬x2)
        (
            clause![1, 2] & clause![-1, 2] & clause![1, -2],
            sat(btreeset! { 1.into(), 2.into() }),
        ),
    ]
}

pub fn unsat_cases() -> Vec<CNF> {
    vec![
        lit!(1) & lit!(-1),
        clause![1, 2] & clause![-1, 2] & clause![-2],
        clause![1, 2] & clause![-1, 2] & clause![1, -2] & clause![-1, -2],
        // Explicit empty clause next to satisfiable ones
        clause![1, 2] & Clause::conflicted() & clause![-3],
        // (112) of Knuth TAOCP Vol.4B, Section 7.2.2.2
        clause![1, 2, 3, 4]
            & clause![1, -2]
            & clause![-1, -2, -3]
            & clause![-1, 3]
            & clause![2, -3]
            & clause![3, -4],
        pigeonhole(3),
    ]
}

/// `n` pigeons into `n - 1` holes. `x(p(n-1) + h + 1)` means pigeon `p` is in hole `h`.
pub fn pigeonhole(n: i32) -> CNF {
    let holes = n - 1;
    let var = |p: i32, h: i32| p * holes + h + 1;
    let mut cnf: CNF = (0..n)
        .map(|p| (0..holes).map(|h| Literal::new(var(p, h))).collect::<Clause>())
        .collect();
    for h in 0..holes {
        for p in 0..n {
            for q in (p + 1)..n {
                cnf.push(clause![-var(p, h), -var(q, h)]);
            }
        }
    }
    cnf
}

/// Random formulas over `x1..=x5`, small enough to compare with [crate::brute_force]
pub fn small_cnf() -> impl Strategy<Value = CNF> {
    let lit = (1..=5_i32, any::<bool>()).prop_map(|(id, positive)| if positive { id } else { -id });
    prop::collection::vec(prop::collection::vec(lit, 1..4), 0..10)
        .prop_map(|clauses| clauses.into_iter().map(Clause::from).collect())
}
