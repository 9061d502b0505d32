//! DIMACS CNF reader
//!
//! ```text
//! c comment
//! p cnf 3 2
//! 1 -3 0
//! 2 3 -1 0
//! ```
//!
//! The declared variable count is kept as [Dimacs::num_vars] but is only a hint. Solvers work on
//! the variables actually appearing in the clauses.

use crate::{Clause, Literal, CNF};
use std::{
    fs,
    io::{self, BufRead, BufReader},
    path::Path,
};

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("Line {line}: not a CNF problem: {header:?}")]
    NotCnf { line: usize, header: String },
    #[error("Line {line}: invalid variable count in {header:?}")]
    InvalidHeader { line: usize, header: String },
    #[error(transparent)]
    Io(#[from] io::Error),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dimacs {
    pub cnf: CNF,
    /// Declared in the problem line, `0` if there is none
    pub num_vars: u32,
}

impl Dimacs {
    pub fn num_clauses(&self) -> usize {
        self.cnf.len()
    }
}

pub fn parse_str(input: &str) -> Result<Dimacs, ParseError> {
    parse_reader(input.as_bytes())
}

pub fn parse_file(path: impl AsRef<Path>) -> Result<Dimacs, ParseError> {
    let file = fs::File::open(path)?;
    parse_reader(BufReader::new(file))
}

pub fn parse_reader(reader: impl BufRead) -> Result<Dimacs, ParseError> {
    let mut cnf = CNF::default();
    let mut num_vars = None;

    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim();
        let number = i + 1;
        if line.is_empty() || line.starts_with('c') || line.starts_with('%') {
            continue;
        }

        if line.starts_with('p') {
            let declared = parse_header(line, number)?;
            match num_vars {
                None => num_vars = Some(declared),
                Some(first) => log::debug!(
                    "Line {}: keep the first problem line ({} variables), ignore {:?}",
                    number,
                    first,
                    line
                ),
            }
            continue;
        }

        for token in line.split_whitespace() {
            let ignored = match token.parse::<i32>() {
                Ok(0) => false,
                Ok(i) => Literal::try_new(i).is_none(),
                Err(_) => true,
            };
            if ignored {
                log::debug!("Line {}: ignore token {:?}", number, token);
            }
        }
        let clause = Clause::from_dimacs(line);
        if !clause.is_empty() {
            cnf.push(clause);
        }
    }

    Ok(Dimacs {
        cnf,
        num_vars: num_vars.unwrap_or(0),
    })
}

fn parse_header(header: &str, line: usize) -> Result<u32, ParseError> {
    let mut tokens = header.split_whitespace().skip(1);
    if tokens.next() != Some("cnf") {
        return Err(ParseError::NotCnf {
            line,
            header: header.to_string(),
        });
    }
    tokens
        .next()
        .and_then(|count| count.parse().ok())
        .ok_or_else(|| ParseError::InvalidHeader {
            line,
            header: header.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{clause, testing};

    #[test]
    fn test_parse() {
        let input = r#"
c example
p cnf 3 2
1 -3 0
 2 3 -1 0

%
0
"#;
        let dimacs = parse_str(input).unwrap();
        assert_eq!(dimacs.num_vars, 3);
        assert_eq!(dimacs.num_clauses(), 2);
        assert_eq!(dimacs.cnf, clause![1, -3] & clause![-1, 2, 3]);
    }

    #[test]
    fn test_declared_count_is_a_hint() {
        let dimacs = parse_str("p cnf 0 1\n1 5 0\n").unwrap();
        assert_eq!(dimacs.num_vars, 0);
        assert_eq!(dimacs.cnf, CNF::from(clause![1, 5]));

        // No problem line at all
        let dimacs = parse_str("1 -2 0\n").unwrap();
        assert_eq!(dimacs.num_vars, 0);
        assert_eq!(dimacs.num_clauses(), 1);
    }

    #[test]
    fn test_noise_tokens() {
        let dimacs = parse_str("p cnf 2 1\n1 x 2.5 -2 0 end\n").unwrap();
        assert_eq!(dimacs.cnf, CNF::from(clause![1, -2]));
    }

    #[test]
    fn test_header_errors() {
        assert!(matches!(
            parse_str("p sat 3\n"),
            Err(ParseError::NotCnf { line: 1, .. })
        ));
        assert!(matches!(
            parse_str("c\np\n"),
            Err(ParseError::NotCnf { line: 2, .. })
        ));
        assert!(matches!(
            parse_str("p cnf many 2\n"),
            Err(ParseError::InvalidHeader { line: 1, .. })
        ));
        assert!(matches!(
            parse_str("p cnf\n"),
            Err(ParseError::InvalidHeader { line: 1, .. })
        ));
    }

    #[test]
    fn test_repeated_header() {
        let dimacs = parse_str("p cnf 2 1\n1 0\np cnf 7 1\n-2 0\n").unwrap();
        assert_eq!(dimacs.num_vars, 2);
        assert_eq!(dimacs.cnf, clause![1] & clause![-2]);
        // Later problem lines are still checked
        assert!(matches!(
            parse_str("p cnf 2 1\n1 0\np dnf 2 1\n"),
            Err(ParseError::NotCnf { line: 3, .. })
        ));
    }

    #[test]
    fn test_out_of_range_literal() {
        let dimacs = parse_str("p cnf 1 1\n-2147483648 0\n").unwrap();
        assert_eq!(dimacs.num_clauses(), 0);

        let dimacs = parse_str("p cnf 2 1\n-2147483648 2 0\n2147483647 0\n").unwrap();
        assert_eq!(dimacs.cnf, clause![2] & clause![2147483647]);
        let state = crate::dpll(&dimacs.cnf).as_sat().cloned().unwrap();
        assert_eq!(state.to_string(), "2 2147483647");
        assert_eq!(
            dimacs.cnf.to_dimacs(0),
            "p cnf 2147483647 2\n2 0\n2147483647 0\n"
        );
    }

    #[test]
    fn test_error_message() {
        let err = parse_str("p dnf 3 2\n").unwrap_err();
        insta::assert_snapshot!(err, @r#"Line 1: not a CNF problem: "p dnf 3 2""#);
    }

    #[test]
    fn test_missing_file() {
        let err = parse_file("/nonexistent/satlab.cnf").unwrap_err();
        assert!(matches!(err, ParseError::Io(_)));
    }

    #[test]
    fn test_write_and_parse() {
        for cnf in testing::unsat_cases() {
            // The explicit empty clause is not representable as a line with literals
            if cnf.has_conflict() {
                continue;
            }
            let num_vars = cnf.supp().last().map_or(0, |id| id.get());
            let dimacs = parse_str(&cnf.to_dimacs(num_vars)).unwrap();
            assert_eq!(dimacs.num_vars, num_vars);
            assert_eq!(dimacs.cnf, cnf);
        }
    }
}
