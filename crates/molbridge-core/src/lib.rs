//! molbridge-core: a uniform facade over pluggable cheminformatics toolkits.
//!
//! The facade is purely translational. A backend implements the [`Toolkit`]
//! trait over its own native molecule handle; the generic [`Molecule`],
//! [`Atom`], [`Fingerprint`], [`Smarts`] and I/O types present one API on top
//! of it. Molecules cross toolkit boundaries through the exchange protocol:
//! serialize to a neutral text form ([`ExchangePayload`]), re-parse with the
//! receiving toolkit's reader ([`Molecule::adopt`]).

pub mod atom;
pub mod data;
pub mod errors;
pub mod exchange;
pub mod fingerprint;
pub mod io;
pub mod molecule;
pub mod smarts;
pub mod toolkit;

pub use atom::Atom;
pub use data::MoleculeData;
pub use errors::{BridgeError, FormatDirection};
pub use exchange::{Exchangeable, ExchangePayload};
pub use fingerprint::Fingerprint;
pub use io::{read_file, read_string, MoleculeReader, OutputFile};
pub use molecule::Molecule;
pub use smarts::Smarts;
pub use toolkit::{lookup_format, AtomAttr, AttrValue, Format, Framing, MolAttr, Toolkit};
