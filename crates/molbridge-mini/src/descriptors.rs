//! Descriptor registry of the built-in toolkit.

use indexmap::IndexMap;
use molbridge_core::BridgeError;
use once_cell::sync::Lazy;

use crate::analysis;
use crate::graph::MiniMol;

type DescFn = fn(&MiniMol) -> Result<f64, BridgeError>;

pub static REGISTRY: Lazy<IndexMap<&'static str, DescFn>> = Lazy::new(|| {
    let mut registry: IndexMap<&'static str, DescFn> = IndexMap::new();
    registry.insert("natoms", |m| Ok(m.atom_count() as f64));
    registry.insert("nbonds", |m| Ok(m.bond_count() as f64));
    registry.insert("heavyatoms", |m| {
        Ok((0..m.atom_count()).filter(|&i| m.atom(i).element.number != 1).count() as f64)
    });
    registry.insert("nrings", |m| Ok(analysis::ring_count(m) as f64));
    registry.insert("molwt", |m| Ok(analysis::molecular_weight(m)));
    registry.insert("exactmass", |m| Ok(analysis::exact_mass(m)));
    registry.insert("charge", |m| Ok(analysis::net_charge(m) as f64));
    registry.insert("rgyr", radius_of_gyration);
    registry
});

pub fn names() -> Vec<String> {
    REGISTRY.keys().map(|k| k.to_string()).collect()
}

pub fn compute(mol: &MiniMol, name: &str) -> Result<f64, BridgeError> {
    let f = REGISTRY
        .get(name)
        .ok_or_else(|| BridgeError::UnrecognizedDescriptor(name.to_string()))?;
    f(mol)
}

/// Unweighted radius of gyration. A geometric descriptor: fails on a
/// topology-only molecule, which exercises the facade's omission policy for
/// per-descriptor engine failures.
fn radius_of_gyration(mol: &MiniMol) -> Result<f64, BridgeError> {
    if !mol.has_coordinates() || mol.atom_count() == 0 {
        return Err(BridgeError::Engine("rgyr needs 2D or 3D coordinates".into()));
    }
    let coords: Vec<[f64; 3]> = (0..mol.atom_count())
        .map(|i| mol.atom(i).coords.unwrap_or([0.0, 0.0, 0.0]))
        .collect();
    let n = coords.len() as f64;
    let centroid = coords.iter().fold([0.0; 3], |acc, c| {
        [acc[0] + c[0] / n, acc[1] + c[1] / n, acc[2] + c[2] / n]
    });
    let variance: f64 = coords
        .iter()
        .map(|c| {
            (c[0] - centroid[0]).powi(2)
                + (c[1] - centroid[1]).powi(2)
                + (c[2] - centroid[2]).powi(2)
        })
        .sum::<f64>()
        / n;
    Ok(variance.sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::smiles;

    #[test]
    fn counting_descriptors() {
        let mol = smiles::parse("C1CCCCC1").unwrap();
        assert_eq!(compute(&mol, "natoms").unwrap(), 6.0);
        assert_eq!(compute(&mol, "nbonds").unwrap(), 6.0);
        assert_eq!(compute(&mol, "nrings").unwrap(), 1.0);
        assert_eq!(compute(&mol, "heavyatoms").unwrap(), 6.0);
    }

    #[test]
    fn unknown_descriptor_is_rejected() {
        let mol = smiles::parse("C").unwrap();
        let err = compute(&mol, "logP").unwrap_err();
        assert!(matches!(err, BridgeError::UnrecognizedDescriptor(n) if n == "logP"));
    }

    #[test]
    fn rgyr_needs_coordinates() {
        let mol = smiles::parse("CC").unwrap();
        assert!(matches!(compute(&mol, "rgyr"), Err(BridgeError::Engine(_))));

        let mut with_coords = smiles::parse("CC").unwrap();
        with_coords.atom_mut(0).coords = Some([0.0, 0.0, 0.0]);
        with_coords.atom_mut(1).coords = Some([2.0, 0.0, 0.0]);
        with_coords.dimension = 2;
        // Two points two units apart: each is one unit from the centroid
        let r = compute(&with_coords, "rgyr").unwrap();
        assert!((r - 1.0).abs() < 1e-12);
    }
}
