//! RDKit backend for the molbridge facade.
//!
//! Molecules are owned by the embedded Python interpreter; the Rust handle is
//! a reference-counted pointer into it. Structured results (rings, matches,
//! fingerprint bits) cross the boundary as JSON, scalars are extracted
//! directly.

mod engine;

use pyo3::prelude::*;

use molbridge_core::{
    AtomAttr, AttrValue, BridgeError, Fingerprint, Format, Framing, MolAttr, Toolkit,
};

use engine::{engine_error, input_error, with_module};

/// The RDKit-backed toolkit. Needs a Python with the `rdkit` package at
/// runtime; `name` input additionally needs `py2opsin`.
pub struct Rdkit;

const INFORMATS: &[Format] = &[
    Format { tag: "smi", description: "SMILES", framing: Framing::Line },
    Format { tag: "mol", description: "MDL MOL file", framing: Framing::WholeFile },
    Format { tag: "sdf", description: "MDL SDF file", framing: Framing::SdRecord },
    Format { tag: "name", description: "IUPAC name (via OPSIN)", framing: Framing::Line },
];

const OUTFORMATS: &[Format] = &[
    Format { tag: "smi", description: "SMILES", framing: Framing::Line },
    Format { tag: "iso", description: "Isomeric SMILES", framing: Framing::Line },
    Format { tag: "mol", description: "MDL MOL file", framing: Framing::WholeFile },
    Format { tag: "sdf", description: "MDL SDF file", framing: Framing::SdRecord },
    Format { tag: "inchi", description: "IUPAC InChI", framing: Framing::Line },
];

fn json_result<T: serde::de::DeserializeOwned>(text: &str) -> Result<T, BridgeError> {
    serde_json::from_str(text)
        .map_err(|e| BridgeError::Engine(format!("bad JSON from the bridge: {e}")))
}

impl Toolkit for Rdkit {
    type Handle = Py<PyAny>;
    type Query = Py<PyAny>;

    fn name() -> &'static str {
        "rdkit"
    }

    fn informats() -> &'static [Format] {
        INFORMATS
    }

    fn outformats() -> &'static [Format] {
        OUTFORMATS
    }

    fn fingerprint_kinds() -> &'static [&'static str] {
        &["rdkit", "maccs", "morgan"]
    }

    fn descriptor_names() -> Vec<String> {
        with_module(|_py, module| {
            let text: String = module
                .getattr("descriptor_names")
                .and_then(|f| f.call0())
                .and_then(|v| v.extract())
                .map_err(engine_error)?;
            json_result(&text)
        })
        .unwrap_or_default()
    }

    fn ensure_ready() -> Result<(), BridgeError> {
        engine::ensure_ready()
    }

    fn parse(tag: &str, text: &str) -> Result<Self::Handle, BridgeError> {
        with_module(|py, module| {
            module
                .getattr("parse")
                .and_then(|f| f.call1((tag, text)))
                .map(|mol| mol.unbind())
                .map_err(|e| input_error(py, tag, e))
        })
    }

    fn serialize(handle: &Self::Handle, tag: &str) -> Result<String, BridgeError> {
        with_module(|_py, module| {
            module
                .getattr("serialize")
                .and_then(|f| f.call1((handle, tag)))
                .and_then(|v| v.extract())
                .map_err(engine_error)
        })
    }

    fn has_coordinates(handle: &Self::Handle) -> bool {
        with_module(|_py, module| {
            module
                .getattr("has_coordinates")
                .and_then(|f| f.call1((handle,)))
                .and_then(|v| v.extract())
                .map_err(engine_error)
        })
        .unwrap_or(false)
    }

    fn title_of(handle: &Self::Handle) -> String {
        with_module(|_py, module| {
            module
                .getattr("get_title")
                .and_then(|f| f.call1((handle,)))
                .and_then(|v| v.extract())
                .map_err(engine_error)
        })
        .unwrap_or_default()
    }

    fn set_title(handle: &mut Self::Handle, title: &str) {
        let _ = with_module(|_py, module| {
            module
                .getattr("set_title")
                .and_then(|f| f.call1((&*handle, title)))
                .map(|_| ())
                .map_err(engine_error)
        });
    }

    fn attribute(handle: &Self::Handle, attr: MolAttr) -> Result<AttrValue, BridgeError> {
        let text: String = with_module(|_py, module| {
            module
                .getattr("mol_attr")
                .and_then(|f| f.call1((handle, attr.name())))
                .and_then(|v| v.extract())
                .map_err(engine_error)
        })?;
        Ok(match attr {
            MolAttr::Formula | MolAttr::Title => AttrValue::Text(json_result(&text)?),
            MolAttr::MolWt | MolAttr::ExactMass => AttrValue::Float(json_result(&text)?),
            MolAttr::Charge | MolAttr::Spin | MolAttr::Dim | MolAttr::NumAtoms => {
                AttrValue::Int(json_result(&text)?)
            }
            MolAttr::Sssr => AttrValue::Rings(json_result(&text)?),
        })
    }

    fn atom_count(handle: &Self::Handle) -> usize {
        with_module(|_py, module| {
            module
                .getattr("atom_count")
                .and_then(|f| f.call1((handle,)))
                .and_then(|v| v.extract())
                .map_err(engine_error)
        })
        .unwrap_or(0)
    }

    fn atom_attribute(
        handle: &Self::Handle,
        idx: usize,
        attr: AtomAttr,
    ) -> Result<AttrValue, BridgeError> {
        let text: String = with_module(|_py, module| {
            module
                .getattr("atom_attr")
                .and_then(|f| f.call1((handle, idx, attr.name())))
                .and_then(|v| v.extract())
                .map_err(engine_error)
        })?;
        Ok(match attr {
            AtomAttr::Symbol => AttrValue::Text(json_result(&text)?),
            AtomAttr::AtomicMass => AttrValue::Float(json_result(&text)?),
            AtomAttr::AtomicNum
            | AtomAttr::FormalCharge
            | AtomAttr::Isotope
            | AtomAttr::Degree => AttrValue::Int(json_result(&text)?),
        })
    }

    fn atom_coords(handle: &Self::Handle, idx: usize) -> Option<[f64; 3]> {
        with_module(|_py, module| {
            module
                .getattr("atom_coords")
                .and_then(|f| f.call1((handle, idx)))
                .and_then(|v| v.extract::<Option<[f64; 3]>>())
                .map_err(engine_error)
        })
        .ok()
        .flatten()
    }

    fn add_hydrogens(handle: &mut Self::Handle) -> Result<(), BridgeError> {
        *handle = with_module(|_py, module| {
            module
                .getattr("addh")
                .and_then(|f| f.call1((&*handle,)))
                .map(|mol| mol.unbind())
                .map_err(engine_error)
        })?;
        Ok(())
    }

    fn remove_hydrogens(handle: &mut Self::Handle) -> Result<(), BridgeError> {
        *handle = with_module(|_py, module| {
            module
                .getattr("removeh")
                .and_then(|f| f.call1((&*handle,)))
                .map(|mol| mol.unbind())
                .map_err(engine_error)
        })?;
        Ok(())
    }

    fn fingerprint(handle: &Self::Handle, kind: &str) -> Result<Fingerprint, BridgeError> {
        let text: String = with_module(|_py, module| {
            module
                .getattr("fingerprint_bits")
                .and_then(|f| f.call1((handle, kind)))
                .and_then(|v| v.extract())
                .map_err(engine_error)
        })?;
        let bits: Vec<u32> = json_result(&text)?;
        Ok(Fingerprint::from_bits(kind, bits))
    }

    fn descriptor(handle: &Self::Handle, name: &str) -> Result<f64, BridgeError> {
        with_module(|_py, module| {
            module
                .getattr("descriptor")
                .and_then(|f| f.call1((handle, name)))
                .and_then(|v| v.extract())
                .map_err(engine_error)
        })
    }

    fn prop_keys(handle: &Self::Handle) -> Vec<String> {
        with_module(|_py, module| {
            let text: String = module
                .getattr("prop_keys")
                .and_then(|f| f.call1((handle,)))
                .and_then(|v| v.extract())
                .map_err(engine_error)?;
            json_result(&text)
        })
        .unwrap_or_default()
    }

    fn prop_get(handle: &Self::Handle, key: &str) -> Option<String> {
        with_module(|_py, module| {
            module
                .getattr("prop_get")
                .and_then(|f| f.call1((handle, key)))
                .and_then(|v| v.extract())
                .map_err(engine_error)
        })
        .ok()
        .flatten()
    }

    fn prop_set(handle: &mut Self::Handle, key: &str, value: &str) {
        let _ = with_module(|_py, module| {
            module
                .getattr("prop_set")
                .and_then(|f| f.call1((&*handle, key, value)))
                .map(|_| ())
                .map_err(engine_error)
        });
    }

    fn prop_remove(handle: &mut Self::Handle, key: &str) -> bool {
        with_module(|_py, module| {
            module
                .getattr("prop_remove")
                .and_then(|f| f.call1((&*handle, key)))
                .and_then(|v| v.extract())
                .map_err(engine_error)
        })
        .unwrap_or(false)
    }

    fn compile_query(pattern: &str) -> Result<Self::Query, BridgeError> {
        with_module(|py, module| {
            module
                .getattr("compile_smarts")
                .and_then(|f| f.call1((pattern,)))
                .map(|query| query.unbind())
                .map_err(|e| input_error(py, "smarts", e))
        })
    }

    fn find_matches(handle: &Self::Handle, query: &Self::Query) -> Vec<Vec<usize>> {
        with_module(|_py, module| {
            let text: String = module
                .getattr("find_matches")
                .and_then(|f| f.call1((handle, query)))
                .and_then(|v| v.extract())
                .map_err(engine_error)?;
            json_result(&text)
        })
        .unwrap_or_default()
    }
}

// These touch a live RDKit install and stay ignored in a plain test run.
#[cfg(test)]
mod tests {
    use super::*;
    use molbridge_core::{read_string, Smarts};

    #[test]
    #[ignore = "needs a Python with the rdkit package"]
    fn ethanol_basics() {
        let mol = read_string::<Rdkit>("smi", "CCO").unwrap();
        assert_eq!(mol.num_atoms(), 3);
        assert_eq!(mol.formula().unwrap(), "C2H6O");
        assert!((mol.molwt().unwrap() - 46.07).abs() < 0.1);
    }

    #[test]
    #[ignore = "needs a Python with the rdkit package"]
    fn maccs_self_similarity_is_one() {
        let mol = read_string::<Rdkit>("smi", "c1ccccc1C(=O)O").unwrap();
        let fp = mol.calcfp("maccs").unwrap();
        assert!((fp.tanimoto(&mol.calcfp("maccs").unwrap()) - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    #[ignore = "needs a Python with the rdkit package"]
    fn smarts_matches_ethyl_groups() {
        let mol = read_string::<Rdkit>("smi", "CCN(CC)CC").unwrap();
        let smarts = Smarts::<Rdkit>::new("[#6][#6]").unwrap();
        assert_eq!(smarts.find_all(&mol).len(), 3);
    }

    #[test]
    #[ignore = "needs a Python with the rdkit package"]
    fn inchi_output() {
        let mol = read_string::<Rdkit>("smi", "CCO").unwrap();
        assert_eq!(mol.write("inchi").unwrap(), "InChI=1S/C2H6O/c1-2-3/h3H,1-2H3");
    }
}
