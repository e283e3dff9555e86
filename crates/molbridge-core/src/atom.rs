//! Borrowing atom views.

use crate::errors::BridgeError;
use crate::toolkit::{AtomAttr, AttrValue, Toolkit};

/// One atom of a molecule, identified by its index in the molecule's stable
/// insertion order. The view borrows the native handle; every accessor
/// delegates to the toolkit on each call.
pub struct Atom<'a, T: Toolkit> {
    handle: &'a T::Handle,
    idx: usize,
}

impl<'a, T: Toolkit> Atom<'a, T> {
    pub(crate) fn new(handle: &'a T::Handle, idx: usize) -> Self {
        Atom { handle, idx }
    }

    pub fn idx(&self) -> usize {
        self.idx
    }

    pub fn attr(&self, attr: AtomAttr) -> Result<AttrValue, BridgeError> {
        T::atom_attribute(self.handle, self.idx, attr)
    }

    /// String-keyed access; unknown names fail with `UnknownAttribute`.
    pub fn attribute(&self, name: &str) -> Result<AttrValue, BridgeError> {
        self.attr(AtomAttr::from_name(name)?)
    }

    pub fn atomicnum(&self) -> Result<i64, BridgeError> {
        self.attr(AtomAttr::AtomicNum)?
            .as_i64()
            .ok_or_else(|| BridgeError::Engine("atomicnum did not yield an integer".into()))
    }

    pub fn symbol(&self) -> Result<String, BridgeError> {
        Ok(self.attr(AtomAttr::Symbol)?.as_str().unwrap_or_default().to_string())
    }

    pub fn formalcharge(&self) -> Result<i64, BridgeError> {
        self.attr(AtomAttr::FormalCharge)?
            .as_i64()
            .ok_or_else(|| BridgeError::Engine("formalcharge did not yield an integer".into()))
    }

    /// 0 for the natural isotope mix.
    pub fn isotope(&self) -> Result<i64, BridgeError> {
        self.attr(AtomAttr::Isotope)?
            .as_i64()
            .ok_or_else(|| BridgeError::Engine("isotope did not yield an integer".into()))
    }

    pub fn atomicmass(&self) -> Result<f64, BridgeError> {
        self.attr(AtomAttr::AtomicMass)?
            .as_f64()
            .ok_or_else(|| BridgeError::Engine("atomicmass did not yield a number".into()))
    }

    /// Number of explicit bonds.
    pub fn degree(&self) -> Result<i64, BridgeError> {
        self.attr(AtomAttr::Degree)?
            .as_i64()
            .ok_or_else(|| BridgeError::Engine("degree did not yield an integer".into()))
    }

    /// `None` for a 0D structure.
    pub fn coords(&self) -> Option<[f64; 3]> {
        T::atom_coords(self.handle, self.idx)
    }
}
