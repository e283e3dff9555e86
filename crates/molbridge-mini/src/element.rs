//! Compact element table: enough chemistry for the built-in toolkit.

/// Static data for one element. `valences` lists the accepted valence states
/// in ascending order; the smallest state that fits the explicit bond order
/// sum decides the implicit hydrogen count.
#[derive(Debug, PartialEq)]
pub struct Element {
    pub number: u8,
    pub symbol: &'static str,
    /// Standard atomic weight.
    pub mass: f64,
    /// Mass of the most abundant isotope.
    pub monoisotopic: f64,
    pub valences: &'static [u8],
}

pub const ELEMENTS: &[Element] = &[
    Element { number: 1, symbol: "H", mass: 1.008, monoisotopic: 1.007825, valences: &[1] },
    Element { number: 5, symbol: "B", mass: 10.81, monoisotopic: 11.009305, valences: &[3] },
    Element { number: 6, symbol: "C", mass: 12.011, monoisotopic: 12.0, valences: &[4] },
    Element { number: 7, symbol: "N", mass: 14.007, monoisotopic: 14.003074, valences: &[3, 5] },
    Element { number: 8, symbol: "O", mass: 15.999, monoisotopic: 15.994915, valences: &[2] },
    Element { number: 9, symbol: "F", mass: 18.998, monoisotopic: 18.998403, valences: &[1] },
    Element { number: 11, symbol: "Na", mass: 22.990, monoisotopic: 22.989770, valences: &[1] },
    Element { number: 12, symbol: "Mg", mass: 24.305, monoisotopic: 23.985042, valences: &[2] },
    Element { number: 14, symbol: "Si", mass: 28.085, monoisotopic: 27.976927, valences: &[4] },
    Element { number: 15, symbol: "P", mass: 30.974, monoisotopic: 30.973762, valences: &[3, 5] },
    Element { number: 16, symbol: "S", mass: 32.06, monoisotopic: 31.972071, valences: &[2, 4, 6] },
    Element { number: 17, symbol: "Cl", mass: 35.45, monoisotopic: 34.968853, valences: &[1] },
    Element { number: 19, symbol: "K", mass: 39.098, monoisotopic: 38.963707, valences: &[1] },
    Element { number: 20, symbol: "Ca", mass: 40.078, monoisotopic: 39.962591, valences: &[2] },
    Element { number: 35, symbol: "Br", mass: 79.904, monoisotopic: 78.918338, valences: &[1] },
    Element { number: 53, symbol: "I", mass: 126.904, monoisotopic: 126.904473, valences: &[1] },
];

pub const HYDROGEN: &Element = &ELEMENTS[0];

/// Elements that may be written without brackets in SMILES.
pub const ORGANIC_SUBSET: &[&str] = &["B", "C", "N", "O", "P", "S", "F", "Cl", "Br", "I"];

pub fn by_symbol(symbol: &str) -> Option<&'static Element> {
    ELEMENTS.iter().find(|e| e.symbol == symbol)
}

pub fn by_number(number: u8) -> Option<&'static Element> {
    ELEMENTS.iter().find(|e| e.number == number)
}

/// Smallest accepted valence that fits `bonded`; falls back to `bonded`
/// itself for hypervalent cases.
pub fn default_valence(element: &Element, bonded: u8) -> u8 {
    element.valences.iter().copied().find(|&v| v >= bonded).unwrap_or(bonded)
}

/// Implicit hydrogen count for an uncharged atom with `bonded` explicit bond
/// order sum.
pub fn implicit_hydrogens(element: &Element, bonded: u8) -> u8 {
    default_valence(element, bonded).saturating_sub(bonded)
}
