//! [`Toolkit`] implementation wiring the mini backend into the facade.

use molbridge_core::{
    AtomAttr, AttrValue, BridgeError, Fingerprint, Format, Framing, MolAttr, Toolkit,
};

use crate::graph::MiniMol;
use crate::pattern::{self, MiniQuery};
use crate::{analysis, descriptors, fingerprint, mdl, smiles};

/// The self-contained backend. Parses a SMILES subset and MDL MOL/SD files
/// without any external chemistry engine.
#[derive(Debug)]
pub struct Mini;

const INFORMATS: &[Format] = &[
    Format { tag: "smi", description: "SMILES", framing: Framing::Line },
    Format { tag: "mol", description: "MDL MOL file", framing: Framing::WholeFile },
    Format { tag: "sdf", description: "MDL SDF file", framing: Framing::SdRecord },
];

const OUTFORMATS: &[Format] = &[
    Format { tag: "smi", description: "SMILES", framing: Framing::Line },
    Format { tag: "mol", description: "MDL MOL file", framing: Framing::WholeFile },
    Format { tag: "sdf", description: "MDL SDF file", framing: Framing::SdRecord },
];

impl Toolkit for Mini {
    type Handle = MiniMol;
    type Query = MiniQuery;

    fn name() -> &'static str {
        "mini"
    }

    fn informats() -> &'static [Format] {
        INFORMATS
    }

    fn outformats() -> &'static [Format] {
        OUTFORMATS
    }

    fn fingerprint_kinds() -> &'static [&'static str] {
        fingerprint::KINDS
    }

    fn descriptor_names() -> Vec<String> {
        descriptors::names()
    }

    fn ensure_ready() -> Result<(), BridgeError> {
        // Nothing to initialize, the backend is pure Rust.
        Ok(())
    }

    fn parse(tag: &str, text: &str) -> Result<Self::Handle, BridgeError> {
        match tag {
            "smi" => smiles::parse(text),
            "mol" | "sdf" => mdl::parse(text),
            other => Err(BridgeError::MalformedInput {
                format: other.to_string(),
                detail: "no parser for this format".into(),
            }),
        }
    }

    fn serialize(handle: &Self::Handle, tag: &str) -> Result<String, BridgeError> {
        match tag {
            "smi" => {
                let mut line = smiles::write(handle);
                if !handle.title.is_empty() {
                    line.push('\t');
                    line.push_str(&handle.title);
                }
                Ok(line)
            }
            "mol" => Ok(mdl::write_molblock(handle)),
            "sdf" => Ok(mdl::write_sd_record(handle)),
            other => Err(BridgeError::MalformedInput {
                format: other.to_string(),
                detail: "no writer for this format".into(),
            }),
        }
    }

    fn has_coordinates(handle: &Self::Handle) -> bool {
        handle.has_coordinates()
    }

    fn title_of(handle: &Self::Handle) -> String {
        handle.title.clone()
    }

    fn set_title(handle: &mut Self::Handle, title: &str) {
        handle.title = title.to_string();
    }

    fn attribute(handle: &Self::Handle, attr: MolAttr) -> Result<AttrValue, BridgeError> {
        Ok(match attr {
            MolAttr::Formula => AttrValue::Text(analysis::formula(handle)),
            MolAttr::MolWt => AttrValue::Float(analysis::molecular_weight(handle)),
            MolAttr::ExactMass => AttrValue::Float(analysis::exact_mass(handle)),
            MolAttr::Charge => AttrValue::Int(analysis::net_charge(handle)),
            // Radical electrons are not modelled; everything is a singlet.
            MolAttr::Spin => AttrValue::Int(1),
            MolAttr::Title => AttrValue::Text(handle.title.clone()),
            MolAttr::Dim => AttrValue::Int(i64::from(handle.dimension)),
            MolAttr::NumAtoms => AttrValue::Int(handle.atom_count() as i64),
            MolAttr::Sssr => AttrValue::Rings(analysis::sssr(handle)),
        })
    }

    fn atom_count(handle: &Self::Handle) -> usize {
        handle.atom_count()
    }

    fn atom_attribute(
        handle: &Self::Handle,
        idx: usize,
        attr: AtomAttr,
    ) -> Result<AttrValue, BridgeError> {
        let atom = handle.atom(idx);
        Ok(match attr {
            AtomAttr::AtomicNum => AttrValue::Int(i64::from(atom.element.number)),
            AtomAttr::Symbol => AttrValue::Text(atom.element.symbol.to_string()),
            AtomAttr::FormalCharge => AttrValue::Int(i64::from(atom.formal_charge)),
            AtomAttr::Isotope => AttrValue::Int(i64::from(atom.isotope)),
            AtomAttr::AtomicMass => AttrValue::Float(atom.element.mass),
            AtomAttr::Degree => AttrValue::Int(handle.degree(idx) as i64),
        })
    }

    fn atom_coords(handle: &Self::Handle, idx: usize) -> Option<[f64; 3]> {
        handle.atom(idx).coords
    }

    fn add_hydrogens(handle: &mut Self::Handle) -> Result<(), BridgeError> {
        handle.add_hydrogens();
        Ok(())
    }

    fn remove_hydrogens(handle: &mut Self::Handle) -> Result<(), BridgeError> {
        *handle = handle.remove_hydrogens();
        Ok(())
    }

    fn fingerprint(handle: &Self::Handle, kind: &str) -> Result<Fingerprint, BridgeError> {
        fingerprint::calculate(handle, kind)
    }

    fn descriptor(handle: &Self::Handle, name: &str) -> Result<f64, BridgeError> {
        descriptors::compute(handle, name)
    }

    fn prop_keys(handle: &Self::Handle) -> Vec<String> {
        handle.props.keys().cloned().collect()
    }

    fn prop_get(handle: &Self::Handle, key: &str) -> Option<String> {
        handle.props.get(key).cloned()
    }

    fn prop_set(handle: &mut Self::Handle, key: &str, value: &str) {
        handle.props.insert(key.to_string(), value.to_string());
    }

    fn prop_remove(handle: &mut Self::Handle, key: &str) -> bool {
        handle.props.shift_remove(key).is_some()
    }

    fn compile_query(pattern: &str) -> Result<Self::Query, BridgeError> {
        pattern::compile(pattern)
    }

    fn find_matches(handle: &Self::Handle, query: &Self::Query) -> Vec<Vec<usize>> {
        pattern::find(handle, query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use molbridge_core::Toolkit;

    #[test]
    fn smiles_serialization_carries_the_title() {
        let mut mol = Mini::parse("smi", "CCO").unwrap();
        Mini::set_title(&mut mol, "ethanol");
        assert_eq!(Mini::serialize(&mol, "smi").unwrap(), "CCO\tethanol");
    }

    #[test]
    fn attribute_dispatch_covers_every_variant() {
        let mol = Mini::parse("smi", "C1CC1").unwrap();
        for attr in MolAttr::ALL {
            Mini::attribute(&mol, attr).unwrap();
        }
        let rings = Mini::attribute(&mol, MolAttr::Sssr).unwrap();
        assert_eq!(rings.as_rings().unwrap().len(), 1);
    }

    #[test]
    fn mol_and_sdf_share_the_parser() {
        let mol = Mini::parse("smi", "CC").unwrap();
        let block = Mini::serialize(&mol, "mol").unwrap();
        let back = Mini::parse("sdf", &block).unwrap();
        assert_eq!(back.atom_count(), 2);
    }
}
