//! The native molecule handle of the built-in toolkit: an undirected graph
//! of atoms and bonds plus title, property store and optional coordinates.

use indexmap::IndexMap;
use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;

use crate::element::{self, Element};

#[derive(Debug, Clone)]
pub struct AtomNode {
    pub element: &'static Element,
    pub formal_charge: i8,
    /// 0 means the natural isotope mix.
    pub isotope: u16,
    pub implicit_h: u8,
    pub coords: Option<[f64; 3]>,
}

impl AtomNode {
    pub fn new(element: &'static Element) -> Self {
        AtomNode { element, formal_charge: 0, isotope: 0, implicit_h: 0, coords: None }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct BondEdge {
    /// 1, 2 or 3.
    pub order: u8,
}

/// Native handle of the mini toolkit. Atom order is insertion order and is
/// stable for the lifetime of the handle; hydrogen addition appends,
/// hydrogen removal produces a freshly built handle.
#[derive(Debug, Clone, Default)]
pub struct MiniMol {
    pub(crate) graph: UnGraph<AtomNode, BondEdge>,
    pub(crate) title: String,
    pub(crate) props: IndexMap<String, String>,
    /// 0 (topology only), 2 or 3.
    pub(crate) dimension: u8,
}

impl MiniMol {
    pub fn new() -> Self {
        MiniMol::default()
    }

    pub fn atom_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn bond_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn atom(&self, idx: usize) -> &AtomNode {
        &self.graph[NodeIndex::new(idx)]
    }

    pub fn atom_mut(&mut self, idx: usize) -> &mut AtomNode {
        &mut self.graph[NodeIndex::new(idx)]
    }

    pub fn add_atom(&mut self, atom: AtomNode) -> usize {
        self.graph.add_node(atom).index()
    }

    pub fn add_bond(&mut self, a: usize, b: usize, order: u8) {
        self.graph.add_edge(NodeIndex::new(a), NodeIndex::new(b), BondEdge { order });
    }

    pub fn neighbors(&self, idx: usize) -> Vec<usize> {
        let mut out: Vec<usize> =
            self.graph.neighbors(NodeIndex::new(idx)).map(|n| n.index()).collect();
        out.sort_unstable();
        out
    }

    pub fn degree(&self, idx: usize) -> usize {
        self.graph.neighbors(NodeIndex::new(idx)).count()
    }

    pub fn bond_between(&self, a: usize, b: usize) -> Option<u8> {
        self.graph
            .find_edge(NodeIndex::new(a), NodeIndex::new(b))
            .map(|e| self.graph[e].order)
    }

    /// Sum of explicit bond orders at `idx`.
    pub fn bond_order_sum(&self, idx: usize) -> u8 {
        self.graph
            .edges(NodeIndex::new(idx))
            .map(|e| e.weight().order)
            .sum()
    }

    pub fn bonds(&self) -> Vec<(usize, usize, u8)> {
        self.graph
            .edge_references()
            .map(|e| (e.source().index(), e.target().index(), e.weight().order))
            .collect()
    }

    pub fn has_coordinates(&self) -> bool {
        self.dimension > 0
    }

    /// Fill implicit hydrogen counts from the valence table. Used after a
    /// parse that did not state hydrogens explicitly.
    pub fn assign_implicit_hydrogens(&mut self) {
        for idx in 0..self.atom_count() {
            let bonded = self.bond_order_sum(idx);
            let atom = self.atom(idx);
            if atom.formal_charge == 0 {
                let h = element::implicit_hydrogens(atom.element, bonded);
                self.atom_mut(idx).implicit_h = h;
            }
        }
    }

    /// Materialize implicit hydrogens as explicit atoms, appended after the
    /// existing atoms.
    pub fn add_hydrogens(&mut self) {
        for idx in 0..self.atom_count() {
            let n = self.atom(idx).implicit_h;
            self.atom_mut(idx).implicit_h = 0;
            for _ in 0..n {
                let h = self.add_atom(AtomNode::new(element::HYDROGEN));
                self.add_bond(idx, h, 1);
            }
        }
    }

    /// Strip plain explicit hydrogens, folding them back into the implicit
    /// count of their heavy neighbor. Returns a freshly built handle since
    /// node removal would renumber atoms unpredictably.
    pub fn remove_hydrogens(&self) -> MiniMol {
        let strippable = |idx: usize| {
            let atom = self.atom(idx);
            atom.element.number == 1
                && atom.isotope == 0
                && atom.formal_charge == 0
                && self.degree(idx) == 1
                && self.neighbors(idx).iter().all(|&n| self.atom(n).element.number != 1)
        };

        let mut out = MiniMol {
            graph: UnGraph::default(),
            title: self.title.clone(),
            props: self.props.clone(),
            dimension: self.dimension,
        };
        let mut mapping = vec![None; self.atom_count()];
        for idx in 0..self.atom_count() {
            if !strippable(idx) {
                mapping[idx] = Some(out.add_atom(self.atom(idx).clone()));
            }
        }
        for (a, b, order) in self.bonds() {
            match (mapping[a], mapping[b]) {
                (Some(na), Some(nb)) => out.add_bond(na, nb, order),
                (Some(na), None) => out.atom_mut(na).implicit_h += 1,
                (None, Some(nb)) => out.atom_mut(nb).implicit_h += 1,
                (None, None) => {}
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::by_symbol;

    fn ethanol() -> MiniMol {
        // CCO with implicit hydrogens
        let mut mol = MiniMol::new();
        let c1 = mol.add_atom(AtomNode::new(by_symbol("C").unwrap()));
        let c2 = mol.add_atom(AtomNode::new(by_symbol("C").unwrap()));
        let o = mol.add_atom(AtomNode::new(by_symbol("O").unwrap()));
        mol.add_bond(c1, c2, 1);
        mol.add_bond(c2, o, 1);
        mol.assign_implicit_hydrogens();
        mol
    }

    #[test]
    fn implicit_hydrogen_assignment() {
        let mol = ethanol();
        assert_eq!(mol.atom(0).implicit_h, 3);
        assert_eq!(mol.atom(1).implicit_h, 2);
        assert_eq!(mol.atom(2).implicit_h, 1);
    }

    #[test]
    fn addh_then_removeh_round_trips_atom_count() {
        let mut mol = ethanol();
        mol.add_hydrogens();
        assert_eq!(mol.atom_count(), 9);
        // Heavy atoms keep their original indices after addh
        assert_eq!(mol.atom(2).element.symbol, "O");
        let stripped = mol.remove_hydrogens();
        assert_eq!(stripped.atom_count(), 3);
        assert_eq!(stripped.atom(0).implicit_h, 3);
        assert_eq!(stripped.bond_count(), 2);
    }

    #[test]
    fn charged_atom_keeps_stated_hydrogens() {
        let mut mol = MiniMol::new();
        let n = mol.add_atom(AtomNode::new(by_symbol("N").unwrap()));
        mol.atom_mut(n).formal_charge = 1;
        mol.atom_mut(n).implicit_h = 4;
        mol.assign_implicit_hydrogens();
        assert_eq!(mol.atom(n).implicit_h, 4);
    }
}
