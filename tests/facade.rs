//! Whole-crate checks through the public re-exports.

use std::fs;
use std::path::PathBuf;

use molbridge::{
    read_file, read_string, BridgeError, Mini, Molecule, OutputFile, Smarts, Toolkit,
};
use uuid::Uuid;

fn temp_path(suffix: &str) -> PathBuf {
    std::env::temp_dir().join(format!("molbridge-facade-{}.{suffix}", Uuid::new_v4()))
}

#[test]
fn format_tables_are_published() {
    assert!(Mini::informats().iter().any(|f| f.tag == "smi"));
    assert!(Mini::outformats().iter().any(|f| f.tag == "sdf"));
    assert_eq!(Mini::fingerprint_kinds(), ["paths", "elements"]);
    assert!(Mini::descriptor_names().contains(&"molwt".to_string()));
}

#[test]
fn smiles_file_to_sd_file_pipeline() {
    let smi_path = temp_path("smi");
    let sdf_path = temp_path("sdf");
    fs::write(&smi_path, "CCO ethanol\nCCC propane\nCCCC butane\n").unwrap();

    let mut out = OutputFile::<Mini>::create("sdf", &sdf_path, false).unwrap();
    for mol in read_file::<Mini>("smi", &smi_path).unwrap() {
        let mut mol = mol.unwrap();
        let natoms = mol.num_atoms();
        mol.data().set("natoms", natoms);
        out.append(&mol).unwrap();
    }
    assert_eq!(out.count(), 3);
    out.close().unwrap();

    let back: Vec<Molecule<Mini>> =
        read_file::<Mini>("sdf", &sdf_path).unwrap().map(|m| m.unwrap()).collect();
    assert_eq!(back.len(), 3);
    assert_eq!(back[2].title(), "butane");
    let mut last = back.into_iter().last().unwrap();
    assert_eq!(last.data().get("natoms").unwrap(), "4");

    fs::remove_file(&smi_path).unwrap();
    fs::remove_file(&sdf_path).unwrap();
}

#[test]
fn similarity_orders_homologues_sensibly() {
    let butane = read_string::<Mini>("smi", "CCCC").unwrap().calcfp("paths").unwrap();
    let pentane = read_string::<Mini>("smi", "CCCCC").unwrap().calcfp("paths").unwrap();
    let ether = read_string::<Mini>("smi", "COC").unwrap().calcfp("paths").unwrap();

    // A chain one carbon longer stays closer than a different heteroatom skeleton.
    assert!(butane.tanimoto(&pentane) > butane.tanimoto(&ether));
}

#[test]
fn error_variants_have_readable_messages() {
    let err = read_string::<Mini>("cml", "x").unwrap_err();
    assert_eq!(err.to_string(), "'cml' is not a recognised input format for mini");

    let err = read_string::<Mini>("smi", "C)").unwrap_err();
    assert!(err.to_string().contains("smi"));
}

#[test]
fn smarts_and_descriptors_compose() {
    let mol = read_string::<Mini>("smi", "OCCO").unwrap();
    let hydroxyls = Smarts::<Mini>::new("[#8]").unwrap().find_all(&mol);
    assert_eq!(hydroxyls.len(), 2);

    let desc = mol.calcdesc(Some(&["heavyatoms", "charge"])).unwrap();
    assert_eq!(desc["heavyatoms"], 4.0);
    assert_eq!(desc["charge"], 0.0);
}

#[test]
fn double_close_is_guarded() {
    let path = temp_path("smi");
    let mut out = OutputFile::<Mini>::create("smi", &path, false).unwrap();
    out.close().unwrap();
    assert!(matches!(out.close(), Err(BridgeError::StreamClosed)));
    fs::remove_file(&path).unwrap();
}
