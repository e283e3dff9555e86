//! Self-contained chemistry backend with no external engine.
//!
//! `molbridge-mini` implements the [`molbridge_core::Toolkit`] contract on a
//! small in-crate molecule model: a petgraph atom/bond graph, a SMILES subset
//! parser and writer, MDL MOL/SD file support, composition analysis, hashed
//! path fingerprints and a handful of descriptors. It exists so the facade is
//! fully exercisable without Python or a native chemistry library.

pub mod analysis;
pub mod descriptors;
pub mod element;
pub mod fingerprint;
pub mod graph;
pub mod mdl;
pub mod pattern;
pub mod smiles;
mod toolkit;

pub use graph::{AtomNode, BondEdge, MiniMol};
pub use pattern::MiniQuery;
pub use toolkit::Mini;
