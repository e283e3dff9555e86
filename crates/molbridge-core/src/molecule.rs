//! The uniform molecule facade.

use std::fmt;
use std::fs;
use std::path::Path;

use indexmap::IndexMap;

use crate::atom::Atom;
use crate::data::MoleculeData;
use crate::errors::{BridgeError, FormatDirection};
use crate::exchange::{Exchangeable, ExchangePayload};
use crate::fingerprint::Fingerprint;
use crate::io::read_string;
use crate::toolkit::{lookup_format, AttrValue, MolAttr, Toolkit};

/// A molecule of toolkit `T`, wrapping exactly one native handle.
///
/// Derived attributes (formula, masses, SSSR, ...) are recomputed on every
/// access by delegating to the toolkit; nothing is cached. Store the value in
/// a local if you read the same attribute repeatedly.
pub struct Molecule<T: Toolkit> {
    handle: T::Handle,
}

impl<T: Toolkit> Molecule<T> {
    pub fn from_handle(handle: T::Handle) -> Self {
        Molecule { handle }
    }

    /// The underlying native handle.
    pub fn handle(&self) -> &T::Handle {
        &self.handle
    }

    pub fn handle_mut(&mut self) -> &mut T::Handle {
        &mut self.handle
    }

    pub fn into_handle(self) -> T::Handle {
        self.handle
    }

    /// Re-hydrate a molecule of this toolkit from anything exchangeable —
    /// typically a molecule of another toolkit. The self-conversion case
    /// (source and target toolkit identical) goes through the same payload.
    pub fn adopt(source: &dyn Exchangeable) -> Result<Self, BridgeError> {
        let payload = source.to_exchange()?;
        read_string::<T>(payload.tag(), payload.text())
    }

    pub fn title(&self) -> String {
        T::title_of(&self.handle)
    }

    pub fn set_title(&mut self, title: &str) {
        T::set_title(&mut self.handle, title)
    }

    /// Enumerated attribute access.
    pub fn attr(&self, attr: MolAttr) -> Result<AttrValue, BridgeError> {
        T::attribute(&self.handle, attr)
    }

    /// String-keyed attribute access; unknown names fail with
    /// `UnknownAttribute`.
    pub fn attribute(&self, name: &str) -> Result<AttrValue, BridgeError> {
        self.attr(MolAttr::from_name(name)?)
    }

    pub fn formula(&self) -> Result<String, BridgeError> {
        Ok(self.attr(MolAttr::Formula)?.as_str().unwrap_or_default().to_string())
    }

    pub fn molwt(&self) -> Result<f64, BridgeError> {
        self.attr(MolAttr::MolWt)?
            .as_f64()
            .ok_or_else(|| BridgeError::Engine("molwt did not yield a number".into()))
    }

    pub fn exactmass(&self) -> Result<f64, BridgeError> {
        self.attr(MolAttr::ExactMass)?
            .as_f64()
            .ok_or_else(|| BridgeError::Engine("exactmass did not yield a number".into()))
    }

    /// Net formal charge.
    pub fn charge(&self) -> Result<i64, BridgeError> {
        self.attr(MolAttr::Charge)?
            .as_i64()
            .ok_or_else(|| BridgeError::Engine("charge did not yield an integer".into()))
    }

    pub fn spin(&self) -> Result<i64, BridgeError> {
        self.attr(MolAttr::Spin)?
            .as_i64()
            .ok_or_else(|| BridgeError::Engine("spin did not yield an integer".into()))
    }

    /// Coordinate dimensionality: 0, 2 or 3.
    pub fn dim(&self) -> Result<i64, BridgeError> {
        self.attr(MolAttr::Dim)?
            .as_i64()
            .ok_or_else(|| BridgeError::Engine("dim did not yield an integer".into()))
    }

    /// Smallest set of smallest rings, as computed by the native engine.
    pub fn sssr(&self) -> Result<Vec<Vec<usize>>, BridgeError> {
        Ok(self.attr(MolAttr::Sssr)?.as_rings().unwrap_or_default().to_vec())
    }

    pub fn num_atoms(&self) -> usize {
        T::atom_count(&self.handle)
    }

    /// Atom views in insertion order from the original parse. The views
    /// borrow the molecule, so mutating operations (`addh`, `removeh`,
    /// property writes) cannot run while any view is alive.
    pub fn atoms(&self) -> impl Iterator<Item = Atom<'_, T>> {
        (0..self.num_atoms()).map(move |idx| Atom::new(&self.handle, idx))
    }

    pub fn atom(&self, idx: usize) -> Option<Atom<'_, T>> {
        (idx < self.num_atoms()).then(|| Atom::new(&self.handle, idx))
    }

    pub fn has_coordinates(&self) -> bool {
        T::has_coordinates(&self.handle)
    }

    /// Make implicit hydrogens explicit. May replace the native handle.
    pub fn addh(&mut self) -> Result<(), BridgeError> {
        T::add_hydrogens(&mut self.handle)
    }

    /// Strip explicit hydrogens. May replace the native handle.
    pub fn removeh(&mut self) -> Result<(), BridgeError> {
        T::remove_hydrogens(&mut self.handle)
    }

    /// Serialize to `tag` and return the text. The facade performs no
    /// transformation on the writer's output.
    pub fn write(&self, tag: &str) -> Result<String, BridgeError> {
        let format = lookup_format::<T>(FormatDirection::Output, tag)?;
        T::serialize(&self.handle, format.tag)
    }

    /// Serialize to `tag` and write the result to `path`. Fails with
    /// `FileAlreadyExists` unless `overwrite` is set.
    pub fn write_file(
        &self,
        tag: &str,
        path: impl AsRef<Path>,
        overwrite: bool,
    ) -> Result<(), BridgeError> {
        let path = path.as_ref();
        if !overwrite && path.is_file() {
            return Err(BridgeError::FileAlreadyExists(path.to_path_buf()));
        }
        let mut text = self.write(tag)?;
        if !text.ends_with('\n') {
            text.push('\n');
        }
        fs::write(path, text)?;
        Ok(())
    }

    /// Calculate a fingerprint of the given kind. The kind must be one of
    /// `T::fingerprint_kinds()`; anything else fails with
    /// `UnrecognizedFingerprintKind` and never returns a partial value.
    pub fn calcfp(&self, kind: &str) -> Result<Fingerprint, BridgeError> {
        let lowered = kind.to_ascii_lowercase();
        if !T::fingerprint_kinds().contains(&lowered.as_str()) {
            return Err(BridgeError::UnrecognizedFingerprintKind(kind.to_string()));
        }
        T::fingerprint(&self.handle, &lowered)
    }

    /// Calculate descriptor values.
    ///
    /// With `None`, the toolkit's full registered set is computed. Any
    /// requested name missing from the registry fails up front with
    /// `UnrecognizedDescriptor`, before anything is computed.
    ///
    /// Compatibility-preserving wart: a descriptor whose *computation* fails
    /// in the native engine (e.g. a geometric descriptor on a molecule with
    /// no coordinates) is silently omitted from the result map. Callers must
    /// treat the map as possibly sparse relative to the requested list.
    pub fn calcdesc(&self, names: Option<&[&str]>) -> Result<IndexMap<String, f64>, BridgeError> {
        let registry = T::descriptor_names();
        let requested: Vec<String> = match names {
            Some(names) => {
                for name in names {
                    if !registry.iter().any(|r| r == name) {
                        return Err(BridgeError::UnrecognizedDescriptor(name.to_string()));
                    }
                }
                names.iter().map(|n| n.to_string()).collect()
            }
            None => registry,
        };
        let mut values = IndexMap::new();
        for name in requested {
            match T::descriptor(&self.handle, &name) {
                Ok(value) => {
                    values.insert(name, value);
                }
                Err(_) => {} // omitted; see doc comment
            }
        }
        Ok(values)
    }

    /// Live view over the molecule's free-form property store.
    pub fn data(&mut self) -> MoleculeData<'_, T> {
        MoleculeData::new(&mut self.handle)
    }
}

// Manual impl: `T::Handle` is opaque and need not be `Debug` itself.
impl<T: Toolkit> fmt::Debug for Molecule<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Molecule")
            .field("toolkit", &T::name())
            .field("title", &self.title())
            .field("atoms", &self.num_atoms())
            .finish()
    }
}

impl<T: Toolkit> Exchangeable for Molecule<T> {
    fn to_exchange(&self) -> Result<ExchangePayload, BridgeError> {
        if self.has_coordinates() {
            Ok(ExchangePayload::StructureBlock(self.write("mol")?))
        } else {
            Ok(ExchangePayload::Smiles(self.write("smi")?))
        }
    }
}
