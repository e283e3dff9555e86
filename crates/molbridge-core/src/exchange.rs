//! The exchange protocol: how a molecule leaves one toolkit and enters
//! another.
//!
//! A molecule serializes itself to a neutral text form — SMILES when it is a
//! pure topology, a structure-file block when it carries 2D/3D coordinates —
//! and the receiving toolkit re-parses that text with its own reader.
//! Anything implementing [`Exchangeable`] can be adopted by any backend via
//! `Molecule::adopt`, regardless of which toolkit produced it.

use serde::{Deserialize, Serialize};

use crate::errors::BridgeError;

/// The tagged payload of the exchange protocol. Constructed on demand, never
/// persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExchangePayload {
    /// Topology only; coordinates are discarded on this path.
    Smiles(String),
    /// An MDL molblock carrying coordinate data.
    StructureBlock(String),
}

impl ExchangePayload {
    /// Format tag the receiving toolkit should parse this payload with.
    pub fn tag(&self) -> &'static str {
        match self {
            ExchangePayload::Smiles(_) => "smi",
            ExchangePayload::StructureBlock(_) => "mol",
        }
    }

    pub fn text(&self) -> &str {
        match self {
            ExchangePayload::Smiles(text) => text,
            ExchangePayload::StructureBlock(text) => text,
        }
    }
}

/// Capability of producing an [`ExchangePayload`]. The cross-toolkit
/// construction contract is `adopt_B(exchange_A(source))`.
pub trait Exchangeable {
    fn to_exchange(&self) -> Result<ExchangePayload, BridgeError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_tags_match_variants() {
        assert_eq!(ExchangePayload::Smiles("CCO".into()).tag(), "smi");
        assert_eq!(ExchangePayload::StructureBlock("...".into()).tag(), "mol");
        assert_eq!(ExchangePayload::Smiles("CCO".into()).text(), "CCO");
    }
}
