//! MDL V2000 molblock and SD record codec.

use molbridge_core::BridgeError;

use crate::element::{self, Element};
use crate::graph::{AtomNode, MiniMol};

fn malformed(detail: impl Into<String>) -> BridgeError {
    BridgeError::MalformedInput { format: "mol".into(), detail: detail.into() }
}

/// Parse a molblock, optionally followed by SD data items and a `$$$$`
/// terminator.
pub fn parse(text: &str) -> Result<MiniMol, BridgeError> {
    let lines: Vec<&str> = text.lines().collect();
    if lines.len() < 4 {
        return Err(malformed("molblock shorter than the 4-line header"));
    }

    // `get` instead of indexing: a stray multi-byte character must surface
    // as a parse error, not a char-boundary panic.
    let counts = lines[3];
    let natoms: usize = counts
        .get(0..3)
        .and_then(|s| s.trim().parse().ok())
        .ok_or_else(|| malformed("bad atom count"))?;
    let nbonds: usize = counts
        .get(3..6)
        .and_then(|s| s.trim().parse().ok())
        .ok_or_else(|| malformed("bad bond count"))?;
    if lines.len() < 4 + natoms + nbonds {
        return Err(malformed("truncated molblock"));
    }

    let mut mol = MiniMol::new();
    mol.title = lines[0].trim().to_string();

    let mut coords: Vec<[f64; 3]> = Vec::with_capacity(natoms);
    for line in &lines[4..4 + natoms] {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() < 4 {
            return Err(malformed(format!("bad atom line '{line}'")));
        }
        let x: f64 = fields[0].parse().map_err(|_| malformed("bad x coordinate"))?;
        let y: f64 = fields[1].parse().map_err(|_| malformed("bad y coordinate"))?;
        let z: f64 = fields[2].parse().map_err(|_| malformed("bad z coordinate"))?;
        let elem: &Element = element::by_symbol(fields[3])
            .ok_or_else(|| malformed(format!("unknown element '{}'", fields[3])))?;
        coords.push([x, y, z]);
        mol.add_atom(AtomNode::new(elem));
    }

    for line in &lines[4 + natoms..4 + natoms + nbonds] {
        let (a, b, order) = parse_bond_line(line)?;
        if a == 0 || b == 0 || a > natoms || b > natoms {
            return Err(malformed(format!("bond references missing atom in '{line}'")));
        }
        mol.add_bond(a - 1, b - 1, order);
    }

    let mut rest = lines[4 + natoms + nbonds..].iter();
    let mut past_end = false;
    while let Some(line) = rest.next() {
        if !past_end {
            if line.starts_with("M  END") {
                past_end = true;
            } else if let Some(pairs) = parse_property_pairs(line, "M  CHG") {
                for (idx, value) in pairs? {
                    if idx == 0 || idx > natoms {
                        return Err(malformed(format!("charge on missing atom {idx}")));
                    }
                    mol.atom_mut(idx - 1).formal_charge = value as i8;
                }
            } else if let Some(pairs) = parse_property_pairs(line, "M  ISO") {
                for (idx, value) in pairs? {
                    if idx == 0 || idx > natoms {
                        return Err(malformed(format!("isotope on missing atom {idx}")));
                    }
                    mol.atom_mut(idx - 1).isotope = value as u16;
                }
            }
            continue;
        }
        // SD data items
        if line.starts_with("$$$$") {
            break;
        }
        if let Some(key) = data_header_key(line) {
            let mut value_lines = Vec::new();
            for value in rest.by_ref() {
                if value.trim().is_empty() || value.starts_with("$$$$") {
                    break;
                }
                value_lines.push(*value);
            }
            mol.props.insert(key.to_string(), value_lines.join("\n"));
        }
    }

    let dimension = if coords.iter().any(|c| c[2].abs() > 1e-8) {
        3
    } else if coords.iter().any(|c| c[0].abs() > 1e-8 || c[1].abs() > 1e-8) {
        2
    } else {
        0
    };
    mol.dimension = dimension;
    if dimension > 0 {
        for (idx, c) in coords.into_iter().enumerate() {
            mol.atom_mut(idx).coords = Some(c);
        }
    }

    mol.assign_implicit_hydrogens();
    Ok(mol)
}

/// Fixed-width `aaabbbttt`, falling back to whitespace splitting.
fn parse_bond_line(line: &str) -> Result<(usize, usize, u8), BridgeError> {
    let fixed = || {
        let a = line.get(0..3)?.trim().parse::<usize>().ok()?;
        let b = line.get(3..6)?.trim().parse::<usize>().ok()?;
        let t = line.get(6..9)?.trim().parse::<u8>().ok()?;
        Some((a, b, t))
    };
    if let Some(bond) = fixed() {
        return Ok(bond);
    }
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() >= 3 {
        if let (Ok(a), Ok(b), Ok(t)) =
            (fields[0].parse(), fields[1].parse(), fields[2].parse())
        {
            return Ok((a, b, t));
        }
    }
    Err(malformed(format!("bad bond line '{line}'")))
}

/// `M  CHG  n  aaa vvv ...` style property lines.
#[allow(clippy::type_complexity)]
fn parse_property_pairs(
    line: &str,
    prefix: &str,
) -> Option<Result<Vec<(usize, i32)>, BridgeError>> {
    let rest = line.strip_prefix(prefix)?;
    let fields: Vec<&str> = rest.split_whitespace().collect();
    let parse = || {
        let count: usize = fields
            .first()
            .ok_or_else(|| malformed("empty property line"))?
            .parse()
            .map_err(|_| malformed("bad property count"))?;
        let mut pairs = Vec::with_capacity(count);
        for i in 0..count {
            let idx: usize = fields
                .get(1 + 2 * i)
                .ok_or_else(|| malformed("truncated property line"))?
                .parse()
                .map_err(|_| malformed("bad property atom index"))?;
            let value: i32 = fields
                .get(2 + 2 * i)
                .ok_or_else(|| malformed("truncated property line"))?
                .parse()
                .map_err(|_| malformed("bad property value"))?;
            pairs.push((idx, value));
        }
        Ok(pairs)
    };
    Some(parse())
}

/// `> <KEY>` (arbitrary spacing after `>`).
fn data_header_key(line: &str) -> Option<&str> {
    let rest = line.strip_prefix('>')?.trim();
    let start = rest.find('<')?;
    let end = rest.rfind('>')?;
    (start < end).then(|| &rest[start + 1..end])
}

/// Serialize as a bare molblock (no data items, no terminator).
pub fn write_molblock(mol: &MiniMol) -> String {
    let mut out = String::new();
    out.push_str(&mol.title);
    out.push('\n');
    out.push_str("  molbridge\n\n");
    out.push_str(&format!(
        "{:>3}{:>3}  0  0  0  0  0  0  0  0999 V2000\n",
        mol.atom_count(),
        mol.bond_count()
    ));
    for idx in 0..mol.atom_count() {
        let atom = mol.atom(idx);
        let [x, y, z] = atom.coords.unwrap_or([0.0, 0.0, 0.0]);
        out.push_str(&format!(
            "{x:>10.4}{y:>10.4}{z:>10.4} {:<3} 0  0  0  0  0  0  0  0  0  0  0  0\n",
            atom.element.symbol
        ));
    }
    for (a, b, order) in mol.bonds() {
        out.push_str(&format!("{:>3}{:>3}{:>3}  0\n", a + 1, b + 1, order));
    }
    let charged: Vec<(usize, i8)> = (0..mol.atom_count())
        .filter_map(|i| {
            let q = mol.atom(i).formal_charge;
            (q != 0).then_some((i + 1, q))
        })
        .collect();
    if !charged.is_empty() {
        out.push_str(&format!("M  CHG{:>3}", charged.len()));
        for (idx, q) in charged {
            out.push_str(&format!("{idx:>4}{q:>4}"));
        }
        out.push('\n');
    }
    let labeled: Vec<(usize, u16)> = (0..mol.atom_count())
        .filter_map(|i| {
            let iso = mol.atom(i).isotope;
            (iso != 0).then_some((i + 1, iso))
        })
        .collect();
    if !labeled.is_empty() {
        out.push_str(&format!("M  ISO{:>3}", labeled.len()));
        for (idx, iso) in labeled {
            out.push_str(&format!("{idx:>4}{iso:>4}"));
        }
        out.push('\n');
    }
    out.push_str("M  END\n");
    out
}

/// Serialize as one SD record: molblock, data items, `$$$$`.
pub fn write_sd_record(mol: &MiniMol) -> String {
    let mut out = write_molblock(mol);
    for (key, value) in &mol.props {
        out.push_str(&format!("> <{key}>\n{value}\n\n"));
    }
    out.push_str("$$$$\n");
    out
}
