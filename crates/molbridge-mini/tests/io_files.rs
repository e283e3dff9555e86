//! File reading and writing through the facade, against real temp files.

use std::fs;
use std::path::PathBuf;

use molbridge_core::{read_file, read_string, BridgeError, Molecule, OutputFile};
use molbridge_mini::Mini;
use uuid::Uuid;

fn temp_path(suffix: &str) -> PathBuf {
    std::env::temp_dir().join(format!("molbridge-{}.{suffix}", Uuid::new_v4()))
}

#[test]
fn read_file_is_lazy_and_ordered() {
    let path = temp_path("smi");
    fs::write(&path, "CCCC butane\n\nCCC propane\nCC ethane\n").unwrap();

    let mut reader = read_file::<Mini>("smi", &path).unwrap();
    let first = reader.next().unwrap().unwrap();
    assert_eq!(first.title(), "butane");
    assert_eq!(first.num_atoms(), 4);

    // Blank lines are skipped, order is file order.
    let rest: Vec<Molecule<Mini>> = reader.map(|m| m.unwrap()).collect();
    assert_eq!(rest.len(), 2);
    assert_eq!(rest[0].title(), "propane");
    assert_eq!(rest[1].title(), "ethane");

    fs::remove_file(&path).unwrap();
}

#[test]
fn read_file_missing_path() {
    let path = temp_path("smi");
    let err = read_file::<Mini>("smi", &path).unwrap_err();
    assert!(matches!(err, BridgeError::FileNotFound(p) if p == path));
}

#[test]
fn read_file_surfaces_parse_errors_per_molecule() {
    let path = temp_path("smi");
    fs::write(&path, "CCO\nnot_a_molecule!\nCC\n").unwrap();

    let results: Vec<_> = read_file::<Mini>("smi", &path).unwrap().collect();
    assert_eq!(results.len(), 3);
    assert!(results[0].is_ok());
    assert!(results[1].is_err());
    assert!(results[2].is_ok());

    fs::remove_file(&path).unwrap();
}

#[test]
fn sd_file_framing() {
    let path = temp_path("sdf");
    let one = {
        let mut m = read_string::<Mini>("smi", "CCO").unwrap();
        m.set_title("ethanol");
        m.data().set("ID", "1");
        m
    };
    let two = {
        let mut m = read_string::<Mini>("smi", "CC=O").unwrap();
        m.set_title("acetaldehyde");
        m
    };

    let mut out = OutputFile::<Mini>::create("sdf", &path, false).unwrap();
    out.append(&one).unwrap();
    out.append(&two).unwrap();
    assert_eq!(out.count(), 2);
    out.close().unwrap();

    let back: Vec<Molecule<Mini>> =
        read_file::<Mini>("sdf", &path).unwrap().map(|m| m.unwrap()).collect();
    assert_eq!(back.len(), 2);
    assert_eq!(back[0].title(), "ethanol");
    assert_eq!(back[1].title(), "acetaldehyde");
    assert_eq!(back[0].num_atoms(), 3);

    fs::remove_file(&path).unwrap();
}

#[test]
fn write_file_refuses_to_clobber() {
    let path = temp_path("smi");
    let mol = read_string::<Mini>("smi", "CCO").unwrap();

    mol.write_file("smi", &path, false).unwrap();
    let err = mol.write_file("smi", &path, false).unwrap_err();
    assert!(matches!(err, BridgeError::FileAlreadyExists(p) if p == path));
    // With overwrite set the same call succeeds.
    mol.write_file("smi", &path, true).unwrap();

    let text = fs::read_to_string(&path).unwrap();
    assert_eq!(text, "CCO\n");

    fs::remove_file(&path).unwrap();
}

#[test]
fn output_file_refuses_to_clobber() {
    let path = temp_path("sdf");
    fs::write(&path, "occupied\n").unwrap();
    let err = OutputFile::<Mini>::create("sdf", &path, false).unwrap_err();
    assert!(matches!(err, BridgeError::FileAlreadyExists(_)));
    fs::remove_file(&path).unwrap();
}

#[test]
fn output_file_close_semantics() {
    let path = temp_path("smi");
    let mol = read_string::<Mini>("smi", "CC").unwrap();

    let mut out = OutputFile::<Mini>::create("smi", &path, false).unwrap();
    out.append(&mol).unwrap();
    out.close().unwrap();

    // Appending after close and closing twice both fail the same way.
    assert!(matches!(out.append(&mol), Err(BridgeError::StreamClosed)));
    assert!(matches!(out.close(), Err(BridgeError::StreamClosed)));

    fs::remove_file(&path).unwrap();
}

#[test]
fn unknown_output_format_is_rejected_at_open() {
    let path = temp_path("xyz");
    let err = OutputFile::<Mini>::create("xyz", &path, false).unwrap_err();
    assert!(matches!(err, BridgeError::UnrecognizedFormat { .. }));
    assert!(!path.exists());
}

#[test]
fn whole_file_framing_reads_one_molblock() {
    let src = temp_path("mol");
    let mol = {
        let mut m = read_string::<Mini>("smi", "O").unwrap();
        m.set_title("water");
        m
    };
    mol.write_file("mol", &src, false).unwrap();

    let back: Vec<Molecule<Mini>> =
        read_file::<Mini>("mol", &src).unwrap().map(|m| m.unwrap()).collect();
    assert_eq!(back.len(), 1);
    assert_eq!(back[0].title(), "water");
    assert_eq!(back[0].num_atoms(), 1);

    fs::remove_file(&src).unwrap();
}
