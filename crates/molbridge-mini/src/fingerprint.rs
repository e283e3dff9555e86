//! Fingerprints of the built-in toolkit.

use std::collections::HashSet;

use molbridge_core::{BridgeError, Fingerprint};
use sha2::{Digest, Sha256};

use crate::graph::MiniMol;

pub const KINDS: &[&str] = &["paths", "elements"];

const PATH_BITS: u32 = 1024;
const MAX_PATH_ATOMS: usize = 7;

pub fn calculate(mol: &MiniMol, kind: &str) -> Result<Fingerprint, BridgeError> {
    match kind {
        "paths" => Ok(Fingerprint::from_bits("paths", path_bits(mol))),
        "elements" => Ok(Fingerprint::from_bits(
            "elements",
            (0..mol.atom_count()).map(|idx| mol.atom(idx).element.number as u32),
        )),
        other => Err(BridgeError::UnrecognizedFingerprintKind(other.to_string())),
    }
}

/// Hash every linear path of up to seven atoms into a 1024-bit space.
fn path_bits(mol: &MiniMol) -> Vec<u32> {
    let mut keys: HashSet<String> = HashSet::new();
    for start in 0..mol.atom_count() {
        let mut path = vec![start];
        extend(mol, &mut path, &mut keys);
    }
    keys.into_iter().map(|key| hash_bit(&key)).collect()
}

fn extend(mol: &MiniMol, path: &mut Vec<usize>, keys: &mut HashSet<String>) {
    keys.insert(canonical_key(mol, path));
    if path.len() == MAX_PATH_ATOMS {
        return;
    }
    let Some(&last) = path.last() else { return };
    for nb in mol.neighbors(last) {
        if !path.contains(&nb) {
            path.push(nb);
            extend(mol, path, keys);
            path.pop();
        }
    }
}

/// Symbol/bond-order string of the path, direction-independent.
fn canonical_key(mol: &MiniMol, path: &[usize]) -> String {
    let forward = render(mol, path.iter().copied());
    let backward = render(mol, path.iter().rev().copied());
    forward.min(backward)
}

fn render(mol: &MiniMol, indices: impl Iterator<Item = usize>) -> String {
    let mut out = String::new();
    let mut prev: Option<usize> = None;
    for idx in indices {
        if let Some(p) = prev {
            let order = mol.bond_between(p, idx).unwrap_or(1);
            out.push_str(&order.to_string());
        }
        out.push_str(mol.atom(idx).element.symbol);
        prev = Some(idx);
    }
    out
}

fn hash_bit(key: &str) -> u32 {
    let digest = Sha256::digest(key.as_bytes());
    u32::from_be_bytes([digest[0], digest[1], digest[2], digest[3]]) % PATH_BITS
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::smiles;

    #[test]
    fn unknown_kind_is_rejected() {
        let mol = smiles::parse("CC").unwrap();
        let err = calculate(&mol, "daylight").unwrap_err();
        assert!(matches!(err, BridgeError::UnrecognizedFingerprintKind(k) if k == "daylight"));
    }

    #[test]
    fn element_bits_are_atomic_numbers() {
        let mol = smiles::parse("CCO").unwrap();
        let fp = calculate(&mol, "elements").unwrap();
        assert_eq!(fp.bits(), vec![6, 8]);
    }

    #[test]
    fn path_fingerprint_is_deterministic_and_subset_sensitive() {
        let butane = smiles::parse("CCCC").unwrap();
        let again = smiles::parse("CCCC").unwrap();
        let propane = smiles::parse("CCC").unwrap();
        let a = calculate(&butane, "paths").unwrap();
        let b = calculate(&again, "paths").unwrap();
        let c = calculate(&propane, "paths").unwrap();
        assert_eq!(a.bits(), b.bits());
        // Propane's paths are a subset of butane's
        let abits: std::collections::HashSet<u32> = a.bits().into_iter().collect();
        assert!(c.bits().iter().all(|bit| abits.contains(bit)));
        assert!(a.len() > c.len());
    }

    #[test]
    fn direction_independence() {
        // N at one end vs the other: identical path sets
        let a = calculate(&smiles::parse("NCCC").unwrap(), "paths").unwrap();
        let b = calculate(&smiles::parse("CCCN").unwrap(), "paths").unwrap();
        assert_eq!(a.bits(), b.bits());
    }
}
