//! molbridge: one molecule API over interchangeable chemistry toolkits.
//!
//! The facade (`molbridge-core`) is generic over a [`Toolkit`]; every backend
//! exposes the same reading, writing, attribute, fingerprint, descriptor and
//! substructure surface. The crate ships two backends:
//!
//! - [`Mini`], a self-contained pure-Rust toolkit (always available)
//! - `Rdkit`, bridging to RDKit over embedded Python (feature `rdkit`)
//!
//! ```
//! use molbridge::{read_string, Mini};
//!
//! let mol = read_string::<Mini>("smi", "CCO").unwrap();
//! assert_eq!(mol.formula().unwrap(), "C2H6O");
//! ```

pub use molbridge_core::{
    lookup_format, read_file, read_string, Atom, AtomAttr, AttrValue, BridgeError,
    Exchangeable, ExchangePayload, Fingerprint, Format, FormatDirection, Framing, MolAttr,
    Molecule, MoleculeData, MoleculeReader, OutputFile, Smarts, Toolkit,
};
pub use molbridge_mini::Mini;
#[cfg(feature = "rdkit")]
pub use molbridge_rdkit::Rdkit;
