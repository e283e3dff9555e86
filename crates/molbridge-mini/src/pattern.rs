//! Substructure patterns of the built-in toolkit.
//!
//! A deliberately small SMARTS dialect: a linear chain of atom tests, each
//! either an organic-subset symbol (`C`, `Cl`, ...) or an atomic-number
//! primitive in brackets (`[#6]`). Matching is a backtracking walk over the
//! molecular graph without atom reuse.

use std::collections::HashSet;

use molbridge_core::BridgeError;

use crate::element::{self, ORGANIC_SUBSET};
use crate::graph::MiniMol;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MiniQuery {
    tests: Vec<u8>, // atomic numbers, one per pattern position
}

fn malformed(detail: impl Into<String>) -> BridgeError {
    BridgeError::MalformedInput { format: "smarts".into(), detail: detail.into() }
}

pub fn compile(pattern: &str) -> Result<MiniQuery, BridgeError> {
    let chars: Vec<char> = pattern.trim().chars().collect();
    let mut tests = Vec::new();
    let mut i = 0;
    while i < chars.len() {
        match chars[i] {
            '[' => {
                let close = chars[i..]
                    .iter()
                    .position(|&c| c == ']')
                    .ok_or_else(|| malformed("unterminated bracket"))?;
                let body: String = chars[i + 1..i + close].iter().collect();
                let number = body
                    .strip_prefix('#')
                    .and_then(|n| n.parse::<u8>().ok())
                    .ok_or_else(|| malformed(format!("unsupported atom primitive '[{body}]'")))?;
                tests.push(number);
                i += close + 1;
            }
            'A'..='Z' => {
                let two: String = chars[i..chars.len().min(i + 2)].iter().collect();
                let symbol = if two.len() == 2 && ORGANIC_SUBSET.contains(&two.as_str()) {
                    i += 2;
                    two
                } else {
                    i += 1;
                    chars[i - 1].to_string()
                };
                let elem = element::by_symbol(&symbol)
                    .ok_or_else(|| malformed(format!("unknown element '{symbol}'")))?;
                tests.push(elem.number);
            }
            c => return Err(malformed(format!("unsupported SMARTS character '{c}'"))),
        }
    }
    if tests.is_empty() {
        return Err(malformed("empty pattern"));
    }
    Ok(MiniQuery { tests })
}

/// All matches as atom-index chains, deduplicated up to direction.
pub fn find(mol: &MiniMol, query: &MiniQuery) -> Vec<Vec<usize>> {
    let mut matches = Vec::new();
    let mut seen: HashSet<Vec<usize>> = HashSet::new();
    for start in 0..mol.atom_count() {
        let mut walk = Vec::with_capacity(query.tests.len());
        grow(mol, query, start, &mut walk, &mut seen, &mut matches);
    }
    matches
}

fn grow(
    mol: &MiniMol,
    query: &MiniQuery,
    candidate: usize,
    walk: &mut Vec<usize>,
    seen: &mut HashSet<Vec<usize>>,
    matches: &mut Vec<Vec<usize>>,
) {
    if walk.contains(&candidate) {
        return;
    }
    if mol.atom(candidate).element.number != query.tests[walk.len()] {
        return;
    }
    walk.push(candidate);
    if walk.len() == query.tests.len() {
        let mut key = walk.clone();
        if key.first() > key.last() {
            key.reverse();
        }
        if seen.insert(key) {
            matches.push(walk.clone());
        }
    } else {
        for nb in mol.neighbors(candidate) {
            grow(mol, query, nb, walk, seen, matches);
        }
    }
    walk.pop();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::smiles;

    #[test]
    fn ethyl_groups_in_triethylamine() {
        let mol = smiles::parse("CCN(CC)CC").unwrap();
        let query = compile("[#6][#6]").unwrap();
        let found = find(&mol, &query);
        assert_eq!(found, vec![vec![0, 1], vec![3, 4], vec![5, 6]]);
    }

    #[test]
    fn symbol_form_matches_bracket_form() {
        let mol = smiles::parse("CCO").unwrap();
        let a = find(&mol, &compile("CO").unwrap());
        let b = find(&mol, &compile("[#6][#8]").unwrap());
        assert_eq!(a, b);
        assert_eq!(a, vec![vec![1, 2]]);
    }

    #[test]
    fn no_match_returns_empty() {
        let mol = smiles::parse("CCC").unwrap();
        assert!(find(&mol, &compile("N").unwrap()).is_empty());
    }

    #[test]
    fn bad_patterns_are_malformed() {
        for bad in ["", "[C@]", "c1ccccc1", "[#6"] {
            assert!(
                matches!(compile(bad), Err(BridgeError::MalformedInput { .. })),
                "expected MalformedInput for {bad:?}"
            );
        }
    }
}
