//! Static element data indexed by atomic number.
//!
//! The bridge itself never needs element identities beyond the atomic
//! numbers it forwards to the calculator; the symbol and mass tables here
//! serve the dynamics driver (masses) and diagnostics (symbols).

use phf::phf_map;

/// Per-element reference data.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Element {
    /// The IUPAC element symbol (e.g. "H", "O").
    pub symbol: &'static str,
    /// The standard atomic weight in atomic mass units.
    pub mass: f64,
}

static ELEMENTS: phf::Map<u8, Element> = phf_map! {
    1u8 => Element { symbol: "H", mass: 1.008 },
    2u8 => Element { symbol: "He", mass: 4.002602 },
    3u8 => Element { symbol: "Li", mass: 6.94 },
    4u8 => Element { symbol: "Be", mass: 9.0121831 },
    5u8 => Element { symbol: "B", mass: 10.81 },
    6u8 => Element { symbol: "C", mass: 12.011 },
    7u8 => Element { symbol: "N", mass: 14.007 },
    8u8 => Element { symbol: "O", mass: 15.999 },
    9u8 => Element { symbol: "F", mass: 18.998403163 },
    10u8 => Element { symbol: "Ne", mass: 20.1797 },
    11u8 => Element { symbol: "Na", mass: 22.98976928 },
    12u8 => Element { symbol: "Mg", mass: 24.305 },
    13u8 => Element { symbol: "Al", mass: 26.9815385 },
    14u8 => Element { symbol: "Si", mass: 28.085 },
    15u8 => Element { symbol: "P", mass: 30.973761998 },
    16u8 => Element { symbol: "S", mass: 32.06 },
    17u8 => Element { symbol: "Cl", mass: 35.45 },
    18u8 => Element { symbol: "Ar", mass: 39.948 },
};

/// Looks up reference data for an atomic number.
///
/// Returns `None` for atomic numbers outside the supported table (H through
/// Ar).
pub fn element(atomic_number: u8) -> Option<&'static Element> {
    ELEMENTS.get(&atomic_number)
}
