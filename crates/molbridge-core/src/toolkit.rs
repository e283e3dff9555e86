//! The `Toolkit` capability seam and the enumerated attribute dispatch.
//!
//! A backend implements [`Toolkit`] over an opaque native handle. The facade
//! types (`Molecule`, `Atom`, `Smarts`, the readers and writers) are generic
//! over this trait and never look inside the handle. Attribute access goes
//! through [`MolAttr`] / [`AtomAttr`] rather than stringly-typed interception,
//! so an unmapped name fails with `UnknownAttribute` at one well-defined
//! point.

use serde::{Deserialize, Serialize};

use crate::errors::{BridgeError, FormatDirection};
use crate::fingerprint::Fingerprint;

/// How a multi-molecule stream of this format is split into parse units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Framing {
    /// One molecule per line (SMILES-style).
    Line,
    /// Records terminated by a `$$$$` line (SD files).
    SdRecord,
    /// The whole input is a single unit (a lone molblock).
    WholeFile,
}

/// One entry of a toolkit's format registry.
#[derive(Debug, Clone, Copy)]
pub struct Format {
    pub tag: &'static str,
    pub description: &'static str,
    pub framing: Framing,
}

/// Look up `tag` (case-insensitive, as the original toolkits do) in a format
/// table.
pub fn lookup_format<T: Toolkit>(
    direction: FormatDirection,
    tag: &str,
) -> Result<&'static Format, BridgeError> {
    let table = match direction {
        FormatDirection::Input => T::informats(),
        FormatDirection::Output => T::outformats(),
    };
    let lowered = tag.to_ascii_lowercase();
    table
        .iter()
        .find(|f| f.tag == lowered)
        .ok_or(BridgeError::UnrecognizedFormat { toolkit: T::name(), direction, tag: lowered })
}

/// Recognized derived attributes of a molecule. Each maps to a pure
/// computation on the native handle; values are recomputed on every access.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MolAttr {
    Formula,
    MolWt,
    ExactMass,
    Charge,
    Spin,
    Title,
    Dim,
    NumAtoms,
    Sssr,
}

impl MolAttr {
    pub const ALL: [MolAttr; 9] = [
        MolAttr::Formula,
        MolAttr::MolWt,
        MolAttr::ExactMass,
        MolAttr::Charge,
        MolAttr::Spin,
        MolAttr::Title,
        MolAttr::Dim,
        MolAttr::NumAtoms,
        MolAttr::Sssr,
    ];

    pub fn name(self) -> &'static str {
        match self {
            MolAttr::Formula => "formula",
            MolAttr::MolWt => "molwt",
            MolAttr::ExactMass => "exactmass",
            MolAttr::Charge => "charge",
            MolAttr::Spin => "spin",
            MolAttr::Title => "title",
            MolAttr::Dim => "dim",
            MolAttr::NumAtoms => "natoms",
            MolAttr::Sssr => "sssr",
        }
    }

    pub fn from_name(name: &str) -> Result<Self, BridgeError> {
        Self::ALL
            .into_iter()
            .find(|a| a.name() == name)
            .ok_or_else(|| BridgeError::UnknownAttribute(name.to_string()))
    }
}

/// Recognized per-atom attributes. Coordinates are handled separately
/// (`Toolkit::atom_coords`) because their absence is data, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AtomAttr {
    AtomicNum,
    Symbol,
    FormalCharge,
    Isotope,
    AtomicMass,
    Degree,
}

impl AtomAttr {
    pub const ALL: [AtomAttr; 6] = [
        AtomAttr::AtomicNum,
        AtomAttr::Symbol,
        AtomAttr::FormalCharge,
        AtomAttr::Isotope,
        AtomAttr::AtomicMass,
        AtomAttr::Degree,
    ];

    pub fn name(self) -> &'static str {
        match self {
            AtomAttr::AtomicNum => "atomicnum",
            AtomAttr::Symbol => "symbol",
            AtomAttr::FormalCharge => "formalcharge",
            AtomAttr::Isotope => "isotope",
            AtomAttr::AtomicMass => "atomicmass",
            AtomAttr::Degree => "degree",
        }
    }

    pub fn from_name(name: &str) -> Result<Self, BridgeError> {
        Self::ALL
            .into_iter()
            .find(|a| a.name() == name)
            .ok_or_else(|| BridgeError::UnknownAttribute(name.to_string()))
    }
}

/// A computed attribute value, toolkit-neutral.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AttrValue {
    Int(i64),
    Float(f64),
    Text(String),
    Rings(Vec<Vec<usize>>),
}

impl AttrValue {
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            AttrValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Numeric view; integers widen to `f64`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            AttrValue::Float(v) => Some(*v),
            AttrValue::Int(v) => Some(*v as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttrValue::Text(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_rings(&self) -> Option<&[Vec<usize>]> {
        match self {
            AttrValue::Rings(v) => Some(v),
            _ => None,
        }
    }
}

/// A cheminformatics backend.
///
/// Every operation is a direct, blocking call into the native engine. The
/// trait is stateless on the Rust side: all per-molecule state lives in
/// `Handle`, all process-wide state behind `ensure_ready`.
pub trait Toolkit: Sized + 'static {
    /// The native molecule representation. Opaque to the facade.
    type Handle;
    /// A compiled substructure pattern.
    type Query;

    fn name() -> &'static str;

    /// Formats accepted by `parse` / `read_string` / `read_file`.
    fn informats() -> &'static [Format];
    /// Formats accepted by `serialize` / `write` / `OutputFile`.
    fn outformats() -> &'static [Format];

    /// Fixed set of fingerprint kinds this toolkit can compute.
    fn fingerprint_kinds() -> &'static [&'static str];
    /// Registered descriptor names, in the toolkit's own order.
    fn descriptor_names() -> Vec<String>;

    /// Guarded process-wide initialization. Idempotent; called by every
    /// facade entry point before touching the engine. A backend with no
    /// external runtime returns `Ok(())` unconditionally.
    fn ensure_ready() -> Result<(), BridgeError>;

    fn parse(tag: &str, text: &str) -> Result<Self::Handle, BridgeError>;
    fn serialize(handle: &Self::Handle, tag: &str) -> Result<String, BridgeError>;

    /// Whether any 2D or 3D coordinate data is present. Drives the choice of
    /// exchange payload.
    fn has_coordinates(handle: &Self::Handle) -> bool;

    fn title_of(handle: &Self::Handle) -> String;
    fn set_title(handle: &mut Self::Handle, title: &str);

    fn attribute(handle: &Self::Handle, attr: MolAttr) -> Result<AttrValue, BridgeError>;

    fn atom_count(handle: &Self::Handle) -> usize;
    fn atom_attribute(
        handle: &Self::Handle,
        idx: usize,
        attr: AtomAttr,
    ) -> Result<AttrValue, BridgeError>;
    fn atom_coords(handle: &Self::Handle, idx: usize) -> Option<[f64; 3]>;

    /// May replace the handle wholesale; the facade only ever calls these
    /// through `&mut Molecule`, so stale atom views cannot survive.
    fn add_hydrogens(handle: &mut Self::Handle) -> Result<(), BridgeError>;
    fn remove_hydrogens(handle: &mut Self::Handle) -> Result<(), BridgeError>;

    fn fingerprint(handle: &Self::Handle, kind: &str) -> Result<Fingerprint, BridgeError>;
    fn descriptor(handle: &Self::Handle, name: &str) -> Result<f64, BridgeError>;

    fn prop_keys(handle: &Self::Handle) -> Vec<String>;
    fn prop_get(handle: &Self::Handle, key: &str) -> Option<String>;
    fn prop_set(handle: &mut Self::Handle, key: &str, value: &str);
    /// Returns false when the key was absent.
    fn prop_remove(handle: &mut Self::Handle, key: &str) -> bool;

    fn compile_query(pattern: &str) -> Result<Self::Query, BridgeError>;
    fn find_matches(handle: &Self::Handle, query: &Self::Query) -> Vec<Vec<usize>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mol_attr_round_trips_names() {
        for attr in MolAttr::ALL {
            assert_eq!(MolAttr::from_name(attr.name()).unwrap(), attr);
        }
    }

    #[test]
    fn unknown_attr_name_is_rejected() {
        let err = MolAttr::from_name("nosuchname").unwrap_err();
        assert!(matches!(err, BridgeError::UnknownAttribute(n) if n == "nosuchname"));
        let err = AtomAttr::from_name("cidx").unwrap_err();
        assert!(matches!(err, BridgeError::UnknownAttribute(_)));
    }

    #[test]
    fn attr_value_views() {
        assert_eq!(AttrValue::Int(3).as_f64(), Some(3.0));
        assert_eq!(AttrValue::Float(1.5).as_f64(), Some(1.5));
        assert_eq!(AttrValue::Text("C2H6O".into()).as_str(), Some("C2H6O"));
        assert!(AttrValue::Text("x".into()).as_f64().is_none());
    }
}
