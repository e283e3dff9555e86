//! Tiny smoke binary: parse a molecule with the built-in toolkit and print
//! what the facade derives from it. Accepts a SMILES argument, defaults to
//! n-butane.

use molbridge::{read_string, BridgeError, Exchangeable, Mini, Molecule};

fn main() -> Result<(), BridgeError> {
    let smiles = std::env::args().nth(1).unwrap_or_else(|| "CCCC".to_string());

    let mol: Molecule<Mini> = read_string("smi", &smiles)?;
    println!("input     {smiles}");
    println!("formula   {}", mol.formula()?);
    println!("molwt     {:.3}", mol.molwt()?);
    println!("exactmass {:.5}", mol.exactmass()?);
    println!("charge    {}", mol.charge()?);
    println!("atoms     {}", mol.num_atoms());
    println!("rings     {}", mol.sssr()?.len());

    let fp = mol.calcfp("paths")?;
    println!("fp[paths] {} bits set", fp.len());

    for (name, value) in mol.calcdesc(None)? {
        println!("desc {name:<10} {value:.4}");
    }

    let payload = mol.to_exchange()?;
    let copy = Molecule::<Mini>::adopt(&mol)?;
    println!(
        "exchange  {} -> {} atoms (tanimoto {:.3})",
        payload.tag(),
        copy.num_atoms(),
        fp.tanimoto(&copy.calcfp("paths")?)
    );

    Ok(())
}
