//! Subset SMILES reader and writer.
//!
//! Covers the organic subset, bracket atoms (isotope, explicit hydrogen
//! count, formal charge), single/double/triple bonds, branches, ring
//! closures (including `%nn`) and dot-separated fragments. Aromatic
//! (lowercase) input and stereo descriptors are rejected; kekulized input is
//! the contract with this backend.

use std::collections::HashMap;

use molbridge_core::BridgeError;

use crate::element::{self, ORGANIC_SUBSET};
use crate::graph::{AtomNode, MiniMol};

fn malformed(detail: impl Into<String>) -> BridgeError {
    BridgeError::MalformedInput { format: "smi".into(), detail: detail.into() }
}

/// Parse a SMILES line. Anything after the first whitespace run becomes the
/// molecule title.
pub fn parse(line: &str) -> Result<MiniMol, BridgeError> {
    let trimmed = line.trim();
    let (smiles, title) = match trimmed.split_once(char::is_whitespace) {
        Some((s, t)) => (s, t.trim()),
        None => (trimmed, ""),
    };
    if smiles.is_empty() {
        return Err(malformed("empty SMILES string"));
    }

    let mut mol = MiniMol::new();
    mol.title = title.to_string();
    // Atoms written in brackets state their hydrogen count explicitly and
    // are excluded from valence filling afterwards.
    let mut bracketed: Vec<bool> = Vec::new();

    let mut prev: Option<usize> = None;
    let mut branch_stack: Vec<Option<usize>> = Vec::new();
    let mut pending_bond: Option<u8> = None;
    // ring closure number -> (atom index, bond order stated at opening)
    let mut open_rings: HashMap<u16, (usize, Option<u8>)> = HashMap::new();

    let chars: Vec<char> = smiles.chars().collect();
    let mut i = 0;

    let mut attach = |mol: &mut MiniMol,
                      bracketed: &mut Vec<bool>,
                      prev: &mut Option<usize>,
                      pending: &mut Option<u8>,
                      atom: AtomNode,
                      from_bracket: bool| {
        let idx = mol.add_atom(atom);
        bracketed.push(from_bracket);
        if let Some(p) = *prev {
            mol.add_bond(p, idx, pending.take().unwrap_or(1));
        }
        *prev = Some(idx);
    };

    while i < chars.len() {
        let c = chars[i];
        match c {
            '(' => {
                branch_stack.push(prev);
                i += 1;
            }
            ')' => {
                prev = branch_stack.pop().ok_or_else(|| malformed("unmatched ')'"))?;
                i += 1;
            }
            '-' | '=' | '#' => {
                pending_bond = Some(match c {
                    '=' => 2,
                    '#' => 3,
                    _ => 1,
                });
                i += 1;
            }
            '.' => {
                prev = None;
                pending_bond = None;
                i += 1;
            }
            '0'..='9' | '%' => {
                let number = if c == '%' {
                    let d1 = chars.get(i + 1).and_then(|c| c.to_digit(10));
                    let d2 = chars.get(i + 2).and_then(|c| c.to_digit(10));
                    i += 3;
                    match (d1, d2) {
                        (Some(a), Some(b)) => (a * 10 + b) as u16,
                        _ => return Err(malformed("'%' needs two digits")),
                    }
                } else {
                    i += 1;
                    c.to_digit(10).unwrap() as u16
                };
                let here = prev.ok_or_else(|| malformed("ring closure before any atom"))?;
                match open_rings.remove(&number) {
                    None => {
                        open_rings.insert(number, (here, pending_bond.take()));
                    }
                    Some((there, opened_with)) => {
                        let closing = pending_bond.take();
                        let order = match (opened_with, closing) {
                            (Some(a), Some(b)) if a != b => {
                                return Err(malformed(format!(
                                    "conflicting bond orders on ring closure {number}"
                                )))
                            }
                            (a, b) => a.or(b).unwrap_or(1),
                        };
                        mol.add_bond(there, here, order);
                    }
                }
            }
            '[' => {
                let close = chars[i..]
                    .iter()
                    .position(|&c| c == ']')
                    .ok_or_else(|| malformed("unterminated bracket atom"))?;
                let body: String = chars[i + 1..i + close].iter().collect();
                let atom = parse_bracket(&body)?;
                attach(&mut mol, &mut bracketed, &mut prev, &mut pending_bond, atom, true);
                i += close + 1;
            }
            'A'..='Z' => {
                // Two-letter organic-subset symbols first (Cl, Br)
                let two: String = chars[i..chars.len().min(i + 2)].iter().collect();
                let symbol = if two.len() == 2 && ORGANIC_SUBSET.contains(&two.as_str()) {
                    i += 2;
                    two
                } else {
                    i += 1;
                    c.to_string()
                };
                if !ORGANIC_SUBSET.contains(&symbol.as_str()) {
                    return Err(malformed(format!("'{symbol}' must be written in brackets")));
                }
                let elem = element::by_symbol(&symbol)
                    .ok_or_else(|| malformed(format!("unknown element '{symbol}'")))?;
                attach(
                    &mut mol,
                    &mut bracketed,
                    &mut prev,
                    &mut pending_bond,
                    AtomNode::new(elem),
                    false,
                );
            }
            'a'..='z' => {
                return Err(malformed(
                    "aromatic SMILES is not supported by the mini toolkit; use a kekulized form",
                ));
            }
            _ => return Err(malformed(format!("unexpected character '{c}'"))),
        }
    }

    if !branch_stack.is_empty() {
        return Err(malformed("unmatched '('"));
    }
    if let Some(number) = open_rings.keys().next() {
        return Err(malformed(format!("unclosed ring closure {number}")));
    }
    if mol.atom_count() == 0 {
        return Err(malformed("no atoms"));
    }

    for idx in 0..mol.atom_count() {
        if !bracketed[idx] && mol.atom(idx).formal_charge == 0 {
            let bonded = mol.bond_order_sum(idx);
            mol.atom_mut(idx).implicit_h = element::implicit_hydrogens(mol.atom(idx).element, bonded);
        }
    }
    Ok(mol)
}

/// Parse the inside of `[...]`: `isotope? symbol chirality? Hcount? charge?`.
fn parse_bracket(body: &str) -> Result<AtomNode, BridgeError> {
    let chars: Vec<char> = body.chars().collect();
    let mut i = 0;

    let mut isotope: u32 = 0;
    while i < chars.len() && chars[i].is_ascii_digit() {
        isotope = isotope * 10 + chars[i].to_digit(10).unwrap();
        i += 1;
        if isotope > u16::MAX as u32 {
            return Err(malformed(format!("isotope label out of range in '[{body}]'")));
        }
    }

    if i >= chars.len() || !chars[i].is_ascii_uppercase() {
        return Err(malformed(format!("bad bracket atom '[{body}]'")));
    }
    let mut symbol = chars[i].to_string();
    i += 1;
    if i < chars.len() && chars[i].is_ascii_lowercase() {
        symbol.push(chars[i]);
        i += 1;
    }
    let elem = element::by_symbol(&symbol)
        .ok_or_else(|| malformed(format!("unknown element '{symbol}'")))?;
    let mut atom = AtomNode::new(elem);
    atom.isotope = isotope as u16;

    // Chirality marks are accepted and discarded
    while i < chars.len() && chars[i] == '@' {
        i += 1;
    }

    if i < chars.len() && chars[i] == 'H' {
        i += 1;
        // Accumulate wide, then range-check: `[CH999]` is malformed, not a
        // debug-build overflow.
        let mut count = 0u32;
        let mut any = false;
        while i < chars.len() && chars[i].is_ascii_digit() {
            count = count * 10 + chars[i].to_digit(10).unwrap();
            i += 1;
            any = true;
            if count > u8::MAX as u32 {
                return Err(malformed(format!("hydrogen count out of range in '[{body}]'")));
            }
        }
        atom.implicit_h = if any { count as u8 } else { 1 };
    }

    if i < chars.len() && (chars[i] == '+' || chars[i] == '-') {
        let sign: i32 = if chars[i] == '+' { 1 } else { -1 };
        let symbol_char = chars[i];
        i += 1;
        let mut magnitude = 1i32;
        if i < chars.len() && chars[i].is_ascii_digit() {
            magnitude = 0;
            while i < chars.len() && chars[i].is_ascii_digit() {
                magnitude = magnitude * 10 + chars[i].to_digit(10).unwrap() as i32;
                i += 1;
                if magnitude > i8::MAX as i32 {
                    return Err(malformed(format!("charge out of range in '[{body}]'")));
                }
            }
        } else {
            while i < chars.len() && chars[i] == symbol_char {
                magnitude += 1;
                i += 1;
            }
        }
        if magnitude > i8::MAX as i32 {
            return Err(malformed(format!("charge out of range in '[{body}]'")));
        }
        atom.formal_charge = (sign * magnitude) as i8;
    }

    if i != chars.len() {
        return Err(malformed(format!("trailing characters in bracket atom '[{body}]'")));
    }
    Ok(atom)
}

/// Serialize to a bare SMILES string (no title column).
pub fn write(mol: &MiniMol) -> String {
    let n = mol.atom_count();
    let mut visited = vec![false; n];
    let mut fragments: Vec<String> = Vec::new();

    for root in 0..n {
        if visited[root] {
            continue;
        }
        // First pass: spanning tree + ring closure (back) edges
        let mut tree_children: Vec<Vec<usize>> = vec![Vec::new(); n];
        let mut closures: Vec<Vec<(u16, u8)>> = vec![Vec::new(); n];
        let mut next_digit: u16 = 1;
        let mut stack = vec![(root, usize::MAX)];
        let mut seen = vec![false; n];
        let mut order = Vec::new();
        // Iterative DFS; neighbor order is ascending for determinism
        let mut parents = vec![usize::MAX; n];
        while let Some((idx, parent)) = stack.pop() {
            if seen[idx] {
                continue;
            }
            seen[idx] = true;
            parents[idx] = parent;
            order.push(idx);
            if parent != usize::MAX {
                tree_children[parent].push(idx);
            }
            let mut neighbors = mol.neighbors(idx);
            neighbors.retain(|&nb| nb != parent);
            for &nb in neighbors.iter().rev() {
                if seen[nb] {
                    // Back edge; record a closure at both endpoints once
                    if parents[idx] != nb
                        && !closures[idx].iter().any(|&(d, _)| {
                            closures[nb].iter().any(|&(d2, _)| d == d2)
                        })
                    {
                        let bond = mol.bond_between(idx, nb).unwrap_or(1);
                        closures[idx].push((next_digit, bond));
                        closures[nb].push((next_digit, bond));
                        next_digit += 1;
                    }
                } else {
                    stack.push((nb, idx));
                }
            }
        }
        for &idx in &order {
            visited[idx] = true;
        }
        fragments.push(emit(mol, root, &tree_children, &closures));
    }
    fragments.join(".")
}

fn emit(
    mol: &MiniMol,
    idx: usize,
    tree_children: &[Vec<usize>],
    closures: &[Vec<(u16, u8)>],
) -> String {
    let mut out = atom_token(mol, idx);
    for &(digit, order) in &closures[idx] {
        out.push_str(bond_symbol(order));
        if digit < 10 {
            out.push_str(&digit.to_string());
        } else {
            out.push_str(&format!("%{digit:02}"));
        }
    }
    let children = &tree_children[idx];
    for (pos, &child) in children.iter().enumerate() {
        let bond = bond_symbol(mol.bond_between(idx, child).unwrap_or(1));
        let sub = emit(mol, child, tree_children, closures);
        if pos + 1 < children.len() {
            out.push('(');
            out.push_str(bond);
            out.push_str(&sub);
            out.push(')');
        } else {
            out.push_str(bond);
            out.push_str(&sub);
        }
    }
    out
}

fn bond_symbol(order: u8) -> &'static str {
    match order {
        2 => "=",
        3 => "#",
        _ => "",
    }
}

fn atom_token(mol: &MiniMol, idx: usize) -> String {
    let atom = mol.atom(idx);
    let symbol = atom.element.symbol;
    let plain = ORGANIC_SUBSET.contains(&symbol)
        && atom.formal_charge == 0
        && atom.isotope == 0
        && atom.implicit_h
            == element::implicit_hydrogens(atom.element, mol.bond_order_sum(idx));
    if plain {
        return symbol.to_string();
    }
    let mut out = String::from("[");
    if atom.isotope != 0 {
        out.push_str(&atom.isotope.to_string());
    }
    out.push_str(symbol);
    match atom.implicit_h {
        0 => {}
        1 => out.push('H'),
        n => out.push_str(&format!("H{n}")),
    }
    match atom.formal_charge {
        0 => {}
        1 => out.push('+'),
        -1 => out.push('-'),
        n if n > 0 => out.push_str(&format!("+{n}")),
        n => out.push_str(&format!("-{}", -n)),
    }
    out.push(']');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linear_chain_round_trips() {
        let mol = parse("CCCC").unwrap();
        assert_eq!(mol.atom_count(), 4);
        assert_eq!(mol.bond_count(), 3);
        assert_eq!(write(&mol), "CCCC");
    }

    #[test]
    fn title_is_split_off() {
        let mol = parse("CCO ethanol").unwrap();
        assert_eq!(mol.title, "ethanol");
        assert_eq!(mol.atom_count(), 3);
    }

    #[test]
    fn branches_round_trip() {
        let mol = parse("CC(C)C").unwrap();
        assert_eq!(mol.atom_count(), 4);
        assert_eq!(mol.degree(1), 3);
        assert_eq!(write(&mol), "CC(C)C");
    }

    #[test]
    fn ring_closure_round_trips() {
        let mol = parse("C1CCCCC1").unwrap();
        assert_eq!(mol.atom_count(), 6);
        assert_eq!(mol.bond_count(), 6);
        assert_eq!(write(&mol), "C1CCCCC1");
    }

    #[test]
    fn multiple_bonds() {
        let mol = parse("O=C=O").unwrap();
        assert_eq!(mol.bond_between(0, 1), Some(2));
        assert_eq!(write(&mol), "O=C=O");
        let hcn = parse("C#N").unwrap();
        assert_eq!(hcn.atom(0).implicit_h, 1);
        assert_eq!(write(&hcn), "C#N");
    }

    #[test]
    fn bracket_atoms() {
        let ammonium = parse("[NH4+]").unwrap();
        let atom = ammonium.atom(0);
        assert_eq!(atom.formal_charge, 1);
        assert_eq!(atom.implicit_h, 4);
        assert_eq!(write(&ammonium), "[NH4+]");

        let labeled = parse("[13CH4]").unwrap();
        assert_eq!(labeled.atom(0).isotope, 13);
        assert_eq!(write(&labeled), "[13CH4]");

        let chloride = parse("[Cl-]").unwrap();
        assert_eq!(chloride.atom(0).formal_charge, -1);
    }

    #[test]
    fn disconnected_fragments() {
        let salt = parse("[Na+].[Cl-]").unwrap();
        assert_eq!(salt.atom_count(), 2);
        assert_eq!(salt.bond_count(), 0);
        assert_eq!(write(&salt), "[Na+].[Cl-]");
    }

    #[test]
    fn thiophene_like_ring_with_heteroatom() {
        let mol = parse("C1=CC=CS1").unwrap();
        assert_eq!(mol.atom_count(), 5);
        assert_eq!(mol.bond_count(), 5);
    }

    #[test]
    fn garbage_is_malformed() {
        for bad in ["&*)(%)($)", "C(", "C1CC", "", "[Xx]", "C%1C"] {
            let err = parse(bad).unwrap_err();
            assert!(
                matches!(err, BridgeError::MalformedInput { .. }),
                "expected MalformedInput for {bad:?}"
            );
        }
    }

    #[test]
    fn out_of_range_bracket_numbers_are_malformed_not_panics() {
        for bad in ["[N+200]", "[CH999]", "[99999C]"] {
            let err = parse(bad).unwrap_err();
            assert!(
                matches!(err, BridgeError::MalformedInput { .. }),
                "expected MalformedInput for {bad:?}"
            );
        }
    }

    #[test]
    fn aromatic_input_is_rejected() {
        let err = parse("c1ccccc1").unwrap_err();
        assert!(matches!(err, BridgeError::MalformedInput { .. }));
    }

    #[test]
    fn explicit_hydrogens_write_bracketed() {
        let mut mol = parse("C").unwrap();
        mol.add_hydrogens();
        assert_eq!(mol.atom_count(), 5);
        assert_eq!(write(&mol), "C([H])([H])([H])[H]");
    }
}
