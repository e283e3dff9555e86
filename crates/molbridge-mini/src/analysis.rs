//! Derived molecular properties: formula, masses, charge, ring perception.

use std::collections::BTreeMap;

use crate::element;
use crate::graph::MiniMol;

/// Molecular formula in Hill order: C, H, then the rest alphabetically;
/// purely alphabetical when there is no carbon.
pub fn formula(mol: &MiniMol) -> String {
    let mut counts: BTreeMap<&'static str, u32> = BTreeMap::new();
    for idx in 0..mol.atom_count() {
        let atom = mol.atom(idx);
        *counts.entry(atom.element.symbol).or_default() += 1;
        if atom.implicit_h > 0 {
            *counts.entry("H").or_default() += atom.implicit_h as u32;
        }
    }
    let mut ordered: Vec<(&str, u32)> = Vec::new();
    if counts.contains_key("C") {
        for symbol in ["C", "H"] {
            if let Some(n) = counts.remove(symbol) {
                ordered.push((symbol, n));
            }
        }
    }
    ordered.extend(counts.into_iter());

    let mut out = String::new();
    for (symbol, n) in ordered {
        out.push_str(symbol);
        if n > 1 {
            out.push_str(&n.to_string());
        }
    }
    out
}

/// Average molecular weight, implicit hydrogens included.
pub fn molecular_weight(mol: &MiniMol) -> f64 {
    let h = element::HYDROGEN;
    (0..mol.atom_count())
        .map(|idx| {
            let atom = mol.atom(idx);
            atom.element.mass + atom.implicit_h as f64 * h.mass
        })
        .sum()
}

/// Monoisotopic mass; an explicit isotope label overrides the element's
/// principal isotope with the nominal mass number.
pub fn exact_mass(mol: &MiniMol) -> f64 {
    let h = element::HYDROGEN;
    (0..mol.atom_count())
        .map(|idx| {
            let atom = mol.atom(idx);
            let base = if atom.isotope != 0 {
                atom.isotope as f64
            } else {
                atom.element.monoisotopic
            };
            base + atom.implicit_h as f64 * h.monoisotopic
        })
        .sum()
}

/// Net formal charge.
pub fn net_charge(mol: &MiniMol) -> i64 {
    (0..mol.atom_count()).map(|idx| mol.atom(idx).formal_charge as i64).sum()
}

/// Number of independent rings (circuit rank).
pub fn ring_count(mol: &MiniMol) -> usize {
    let components = petgraph::algo::connected_components(&mol.graph);
    mol.bond_count() + components - mol.atom_count()
}

/// Smallest set of smallest rings, approximated as the shortest cycle
/// through each non-tree bond of a BFS spanning forest. One ring per
/// independent cycle; rings are reported smallest first.
pub fn sssr(mol: &MiniMol) -> Vec<Vec<usize>> {
    let n = mol.atom_count();
    let mut seen = vec![false; n];
    let mut tree_edges: Vec<(usize, usize)> = Vec::new();

    for root in 0..n {
        if seen[root] {
            continue;
        }
        seen[root] = true;
        let mut queue = std::collections::VecDeque::from([root]);
        while let Some(idx) = queue.pop_front() {
            for nb in mol.neighbors(idx) {
                if !seen[nb] {
                    seen[nb] = true;
                    tree_edges.push((idx.min(nb), idx.max(nb)));
                    queue.push_back(nb);
                }
            }
        }
    }

    let mut rings = Vec::new();
    for (a, b, _) in mol.bonds() {
        let key = (a.min(b), a.max(b));
        if tree_edges.contains(&key) {
            continue;
        }
        if let Some(ring) = shortest_path_avoiding(mol, a, b) {
            rings.push(ring);
        }
    }
    rings.sort_by_key(|r| r.len());
    rings
}

/// Shortest path from `a` to `b` that does not take the direct `a`-`b` bond.
/// Closed by that bond, the path is the smallest ring containing it.
fn shortest_path_avoiding(mol: &MiniMol, a: usize, b: usize) -> Option<Vec<usize>> {
    let n = mol.atom_count();
    let mut prev = vec![usize::MAX; n];
    prev[a] = a;
    let mut queue = std::collections::VecDeque::from([a]);
    while let Some(idx) = queue.pop_front() {
        for nb in mol.neighbors(idx) {
            if idx == a && nb == b {
                continue;
            }
            if prev[nb] == usize::MAX {
                prev[nb] = idx;
                if nb == b {
                    let mut path = vec![b];
                    let mut cur = b;
                    while cur != a {
                        cur = prev[cur];
                        path.push(cur);
                    }
                    path.reverse();
                    return Some(path);
                }
                queue.push_back(nb);
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::smiles;

    #[test]
    fn ethanol_formula_and_masses() {
        let mol = smiles::parse("CCO").unwrap();
        assert_eq!(formula(&mol), "C2H6O");
        assert!((molecular_weight(&mol) - 46.07).abs() < 0.01);
        assert!((exact_mass(&mol) - 46.041865).abs() < 1e-4);
    }

    #[test]
    fn hill_order_without_carbon() {
        let mol = smiles::parse("O").unwrap();
        assert_eq!(formula(&mol), "H2O");
    }

    #[test]
    fn ammonium_charge() {
        let mol = smiles::parse("[NH4+]").unwrap();
        assert_eq!(net_charge(&mol), 1);
        assert_eq!(formula(&mol), "H4N");
    }

    #[test]
    fn acyclic_molecules_have_no_rings() {
        let mol = smiles::parse("CCCC").unwrap();
        assert_eq!(ring_count(&mol), 0);
        assert!(sssr(&mol).is_empty());
    }

    #[test]
    fn cyclohexane_has_one_six_ring() {
        let mol = smiles::parse("C1CCCCC1").unwrap();
        assert_eq!(ring_count(&mol), 1);
        let rings = sssr(&mol);
        assert_eq!(rings.len(), 1);
        assert_eq!(rings[0].len(), 6);
    }

    #[test]
    fn bicyclic_ring_count() {
        // Decalin, kekulized
        let mol = smiles::parse("C1CCC2CCCCC2C1").unwrap();
        assert_eq!(ring_count(&mol), 2);
        let rings = sssr(&mol);
        assert_eq!(rings.len(), 2);
        // Fused six-rings, not a six and a ten envelope
        assert!(rings.iter().all(|r| r.len() == 6));
    }
}
