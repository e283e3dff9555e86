//! Bit-vector fingerprints and Tanimoto similarity.

use std::collections::BTreeSet;
use std::ops::BitOr;

use serde::{Deserialize, Serialize};

/// A molecular fingerprint: a sparse set of set-bit indices plus the kind
/// that produced it.
///
/// Comparison between fingerprints is defined only through the similarity
/// operator; there is deliberately no `PartialEq`. The `|` operator computes
/// the Tanimoto coefficient:
///
/// ```ignore
/// let tanimoto = &fp_a | &fp_b;
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fingerprint {
    kind: String,
    bits: BTreeSet<u32>,
}

impl Fingerprint {
    pub fn from_bits(kind: impl Into<String>, bits: impl IntoIterator<Item = u32>) -> Self {
        Fingerprint { kind: kind.into(), bits: bits.into_iter().collect() }
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Set bits in ascending index order.
    pub fn bits(&self) -> Vec<u32> {
        self.bits.iter().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// Tanimoto coefficient |A∩B| / |A∪B|, computed by plain float division.
    /// Two empty fingerprints therefore yield NaN, not a defined zero.
    pub fn tanimoto(&self, other: &Fingerprint) -> f64 {
        let intersection = self.bits.intersection(&other.bits).count();
        let union = self.bits.union(&other.bits).count();
        intersection as f64 / union as f64
    }
}

impl BitOr for &Fingerprint {
    type Output = f64;

    fn bitor(self, rhs: &Fingerprint) -> f64 {
        self.tanimoto(rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bits_are_ascending_and_deduplicated() {
        let fp = Fingerprint::from_bits("paths", [742, 5, 637, 5]);
        assert_eq!(fp.bits(), vec![5, 637, 742]);
        assert_eq!(fp.len(), 3);
    }

    #[test]
    fn tanimoto_matches_hand_calculation() {
        let a = Fingerprint::from_bits("paths", [1, 2, 3, 4]);
        let b = Fingerprint::from_bits("paths", [3, 4, 5]);
        // |{3,4}| / |{1,2,3,4,5}|
        assert!((a.tanimoto(&b) - 2.0 / 5.0).abs() < 1e-12);
        assert_eq!(&a | &b, b.tanimoto(&a));
    }

    #[test]
    fn tanimoto_is_symmetric() {
        let a = Fingerprint::from_bits("elements", [6, 8]);
        let b = Fingerprint::from_bits("elements", [6, 7]);
        assert_eq!(a.tanimoto(&b), b.tanimoto(&a));
    }

    #[test]
    fn both_empty_propagates_nan() {
        let a = Fingerprint::from_bits("paths", []);
        let b = Fingerprint::from_bits("paths", []);
        assert!(a.tanimoto(&b).is_nan());
    }

    #[test]
    fn disjoint_sets_give_zero() {
        let a = Fingerprint::from_bits("paths", [1]);
        let b = Fingerprint::from_bits("paths", [2]);
        assert_eq!(a.tanimoto(&b), 0.0);
    }

    #[test]
    fn survives_json_round_trip() {
        let fp = Fingerprint::from_bits("maccs", [11, 42, 960]);
        let json = serde_json::to_string(&fp).unwrap();
        let back: Fingerprint = serde_json::from_str(&json).unwrap();
        assert_eq!(back.kind(), "maccs");
        assert_eq!(back.bits(), fp.bits());
    }
}
