/// Module to calculate the molar mass and the Hill formula of an atomic composition
///
///
use std::collections::HashMap;

// Define a struct to hold element data
#[derive(Debug)]
pub struct Element {
    pub name: &'static str,
    pub atomic_number: u8,
    pub atomic_mass: f64,
}

pub const HYDROGEN_MASS: f64 = 1.008;

// Conventional average atomic masses, g/mol
const ELEMENTS: &[Element] = &[
    Element {
        name: "H",
        atomic_number: 1,
        atomic_mass: HYDROGEN_MASS,
    },
    Element {
        name: "He",
        atomic_number: 2,
        atomic_mass: 4.003,
    },
    Element {
        name: "Li",
        atomic_number: 3,
        atomic_mass: 6.941,
    },
    Element {
        name: "Be",
        atomic_number: 4,
        atomic_mass: 9.012,
    },
    Element {
        name: "B",
        atomic_number: 5,
        atomic_mass: 10.812,
    },
    Element {
        name: "C",
        atomic_number: 6,
        atomic_mass: 12.011,
    },
    Element {
        name: "N",
        atomic_number: 7,
        atomic_mass: 14.007,
    },
    Element {
        name: "O",
        atomic_number: 8,
        atomic_mass: 15.999,
    },
    Element {
        name: "F",
        atomic_number: 9,
        atomic_mass: 18.998,
    },
    Element {
        name: "Ne",
        atomic_number: 10,
        atomic_mass: 20.18,
    },
    Element {
        name: "Na",
        atomic_number: 11,
        atomic_mass: 22.99,
    },
    Element {
        name: "Mg",
        atomic_number: 12,
        atomic_mass: 24.305,
    },
    Element {
        name: "Al",
        atomic_number: 13,
        atomic_mass: 26.982,
    },
    Element {
        name: "Si",
        atomic_number: 14,
        atomic_mass: 28.086,
    },
    Element {
        name: "P",
        atomic_number: 15,
        atomic_mass: 30.974,
    },
    Element {
        name: "S",
        atomic_number: 16,
        atomic_mass: 32.067,
    },
    Element {
        name: "Cl",
        atomic_number: 17,
        atomic_mass: 35.453,
    },
    Element {
        name: "Ar",
        atomic_number: 18,
        atomic_mass: 39.948,
    },
    Element {
        name: "K",
        atomic_number: 19,
        atomic_mass: 39.098,
    },
    Element {
        name: "Ca",
        atomic_number: 20,
        atomic_mass: 40.078,
    },
    Element {
        name: "Sc",
        atomic_number: 21,
        atomic_mass: 44.956,
    },
    Element {
        name: "Ti",
        atomic_number: 22,
        atomic_mass: 47.867,
    },
    Element {
        name: "V",
        atomic_number: 23,
        atomic_mass: 50.942,
    },
    Element {
        name: "Cr",
        atomic_number: 24,
        atomic_mass: 51.996,
    },
    Element {
        name: "Mn",
        atomic_number: 25,
        atomic_mass: 54.938,
    },
    Element {
        name: "Fe",
        atomic_number: 26,
        atomic_mass: 55.845,
    },
    Element {
        name: "Co",
        atomic_number: 27,
        atomic_mass: 58.933,
    },
    Element {
        name: "Ni",
        atomic_number: 28,
        atomic_mass: 58.693,
    },
    Element {
        name: "Cu",
        atomic_number: 29,
        atomic_mass: 63.546,
    },
    Element {
        name: "Zn",
        atomic_number: 30,
        atomic_mass: 65.39,
    },
    Element {
        name: "Ga",
        atomic_number: 31,
        atomic_mass: 69.723,
    },
    Element {
        name: "Ge",
        atomic_number: 32,
        atomic_mass: 72.61,
    },
    Element {
        name: "As",
        atomic_number: 33,
        atomic_mass: 74.922,
    },
    Element {
        name: "Se",
        atomic_number: 34,
        atomic_mass: 78.96,
    },
    Element {
        name: "Br",
        atomic_number: 35,
        atomic_mass: 79.904,
    },
    Element {
        name: "Kr",
        atomic_number: 36,
        atomic_mass: 83.8,
    },
    Element {
        name: "Rb",
        atomic_number: 37,
        atomic_mass: 85.468,
    },
    Element {
        name: "Sr",
        atomic_number: 38,
        atomic_mass: 87.62,
    },
    Element {
        name: "Y",
        atomic_number: 39,
        atomic_mass: 88.906,
    },
    Element {
        name: "Zr",
        atomic_number: 40,
        atomic_mass: 91.224,
    },
    Element {
        name: "Nb",
        atomic_number: 41,
        atomic_mass: 92.906,
    },
    Element {
        name: "Mo",
        atomic_number: 42,
        atomic_mass: 95.94,
    },
    Element {
        name: "Tc",
        atomic_number: 43,
        atomic_mass: 98.0,
    },
    Element {
        name: "Ru",
        atomic_number: 44,
        atomic_mass: 101.07,
    },
    Element {
        name: "Rh",
        atomic_number: 45,
        atomic_mass: 102.906,
    },
    Element {
        name: "Pd",
        atomic_number: 46,
        atomic_mass: 106.42,
    },
    Element {
        name: "Ag",
        atomic_number: 47,
        atomic_mass: 107.868,
    },
    Element {
        name: "Cd",
        atomic_number: 48,
        atomic_mass: 112.411,
    },
    Element {
        name: "In",
        atomic_number: 49,
        atomic_mass: 114.818,
    },
    Element {
        name: "Sn",
        atomic_number: 50,
        atomic_mass: 118.71,
    },
    Element {
        name: "Sb",
        atomic_number: 51,
        atomic_mass: 121.76,
    },
    Element {
        name: "Te",
        atomic_number: 52,
        atomic_mass: 127.6,
    },
    Element {
        name: "I",
        atomic_number: 53,
        atomic_mass: 126.904,
    },
    Element {
        name: "Xe",
        atomic_number: 54,
        atomic_mass: 131.29,
    },
    Element {
        name: "Cs",
        atomic_number: 55,
        atomic_mass: 132.905,
    },
    Element {
        name: "Ba",
        atomic_number: 56,
        atomic_mass: 137.328,
    },
    Element {
        name: "La",
        atomic_number: 57,
        atomic_mass: 138.906,
    },
    Element {
        name: "Ce",
        atomic_number: 58,
        atomic_mass: 140.116,
    },
    Element {
        name: "Pr",
        atomic_number: 59,
        atomic_mass: 140.908,
    },
    Element {
        name: "Nd",
        atomic_number: 60,
        atomic_mass: 144.24,
    },
    Element {
        name: "Pm",
        atomic_number: 61,
        atomic_mass: 145.0,
    },
    Element {
        name: "Sm",
        atomic_number: 62,
        atomic_mass: 150.36,
    },
    Element {
        name: "Eu",
        atomic_number: 63,
        atomic_mass: 151.964,
    },
    Element {
        name: "Gd",
        atomic_number: 64,
        atomic_mass: 157.25,
    },
    Element {
        name: "Tb",
        atomic_number: 65,
        atomic_mass: 158.925,
    },
    Element {
        name: "Dy",
        atomic_number: 66,
        atomic_mass: 162.5,
    },
    Element {
        name: "Ho",
        atomic_number: 67,
        atomic_mass: 164.93,
    },
    Element {
        name: "Er",
        atomic_number: 68,
        atomic_mass: 167.26,
    },
    Element {
        name: "Tm",
        atomic_number: 69,
        atomic_mass: 168.934,
    },
    Element {
        name: "Yb",
        atomic_number: 70,
        atomic_mass: 173.04,
    },
    Element {
        name: "Lu",
        atomic_number: 71,
        atomic_mass: 174.967,
    },
    Element {
        name: "Hf",
        atomic_number: 72,
        atomic_mass: 178.49,
    },
    Element {
        name: "Ta",
        atomic_number: 73,
        atomic_mass: 180.948,
    },
    Element {
        name: "W",
        atomic_number: 74,
        atomic_mass: 183.84,
    },
    Element {
        name: "Re",
        atomic_number: 75,
        atomic_mass: 186.207,
    },
    Element {
        name: "Os",
        atomic_number: 76,
        atomic_mass: 190.23,
    },
    Element {
        name: "Ir",
        atomic_number: 77,
        atomic_mass: 192.217,
    },
    Element {
        name: "Pt",
        atomic_number: 78,
        atomic_mass: 195.078,
    },
    Element {
        name: "Au",
        atomic_number: 79,
        atomic_mass: 196.967,
    },
    Element {
        name: "Hg",
        atomic_number: 80,
        atomic_mass: 200.59,
    },
    Element {
        name: "Tl",
        atomic_number: 81,
        atomic_mass: 204.383,
    },
    Element {
        name: "Pb",
        atomic_number: 82,
        atomic_mass: 207.2,
    },
    Element {
        name: "Bi",
        atomic_number: 83,
        atomic_mass: 208.98,
    },
    Element {
        name: "Po",
        atomic_number: 84,
        atomic_mass: 209.0,
    },
    Element {
        name: "At",
        atomic_number: 85,
        atomic_mass: 210.0,
    },
    Element {
        name: "Rn",
        atomic_number: 86,
        atomic_mass: 222.0,
    },
    Element {
        name: "Fr",
        atomic_number: 87,
        atomic_mass: 223.0,
    },
    Element {
        name: "Ra",
        atomic_number: 88,
        atomic_mass: 226.0,
    },
    Element {
        name: "Ac",
        atomic_number: 89,
        atomic_mass: 227.0,
    },
    Element {
        name: "Th",
        atomic_number: 90,
        atomic_mass: 232.038,
    },
    Element {
        name: "Pa",
        atomic_number: 91,
        atomic_mass: 231.036,
    },
    Element {
        name: "U",
        atomic_number: 92,
        atomic_mass: 238.029,
    },
    Element {
        name: "Np",
        atomic_number: 93,
        atomic_mass: 237.0,
    },
    Element {
        name: "Pu",
        atomic_number: 94,
        atomic_mass: 244.0,
    },
    Element {
        name: "Am",
        atomic_number: 95,
        atomic_mass: 243.0,
    },
    Element {
        name: "Cm",
        atomic_number: 96,
        atomic_mass: 247.0,
    },
];

// Exact masses of the isotopes met in labelled compounds, g/mol
const ISOTOPES: &[(&str, u16, f64)] = &[
    ("H", 1, 1.007825),
    ("H", 2, 2.014102),
    ("H", 3, 3.016049),
    ("B", 10, 10.012937),
    ("B", 11, 11.009305),
    ("C", 11, 11.011434),
    ("C", 12, 12.0),
    ("C", 13, 13.003355),
    ("C", 14, 14.003242),
    ("N", 14, 14.003074),
    ("N", 15, 15.000109),
    ("O", 15, 15.003066),
    ("O", 16, 15.994915),
    ("O", 17, 16.999132),
    ("O", 18, 17.999160),
    ("F", 18, 18.000938),
    ("F", 19, 18.998403),
    ("P", 31, 30.973762),
    ("P", 32, 31.973907),
    ("S", 32, 31.972071),
    ("S", 34, 33.967867),
    ("S", 35, 34.969032),
    ("Cl", 35, 34.968853),
    ("Cl", 36, 35.968307),
    ("Cl", 37, 36.965903),
    ("Br", 79, 78.918338),
    ("Br", 81, 80.916291),
    ("I", 123, 122.905589),
    ("I", 125, 124.904630),
    ("I", 127, 126.904473),
    ("I", 131, 130.906125),
];

/// Mass of one isotope; the mass number when the isotope is not tabulated.
pub fn isotope_mass(symbol: &str, mass_number: u16) -> f64 {
    ISOTOPES
        .iter()
        .find(|(s, a, _)| *s == symbol && *a == mass_number)
        .map(|(_, _, mass)| *mass)
        .unwrap_or(mass_number as f64)
}

/// Looks up an element by its symbol as written in a formula ("C", "Cl", "Na").
pub fn element_by_symbol(symbol: &str) -> Option<&'static Element> {
    ELEMENTS.iter().find(|element| element.name == symbol)
}

/// Atomic composition of a molecule: element symbol -> number of atoms.
/// Atoms labelled with an isotope are tracked separately, because their mass is
/// the isotope mass and not the average atomic mass of the element.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Composition {
    pub counts: HashMap<String, usize>,
    labelled: HashMap<String, usize>,
    isotopic_mass: f64,
    pub charge: i32,
}

impl Composition {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_atoms(&mut self, symbol: &str, count: usize) {
        if count == 0 {
            return;
        }
        *self.counts.entry(symbol.to_string()).or_insert(0) += count;
    }

    /// Adds an isotope-labelled atom: it shows up under its element in the formula,
    /// while its mass is the exact mass of the isotope.
    pub fn add_isotope(&mut self, symbol: &str, mass_number: u16) {
        self.add_atoms(symbol, 1);
        self.isotopic_mass += isotope_mass(symbol, mass_number);
        *self.labelled.entry(symbol.to_string()).or_insert(0) += 1;
    }

    /// Molar mass in g/mol
    pub fn molar_mass(&self) -> f64 {
        let mut molar_mass = self.isotopic_mass;
        // sorted so that equal compositions always sum to the same float
        let mut symbols: Vec<(&String, &usize)> = self.counts.iter().collect();
        symbols.sort();
        for (symbol, &count) in symbols {
            let labelled = self.labelled.get(symbol).copied().unwrap_or(0);
            if let Some(element) = element_by_symbol(symbol) {
                molar_mass += element.atomic_mass * (count - labelled) as f64;
            }
        }
        molar_mass
    }

    /// Hill notation: carbon first, hydrogen second, then the rest alphabetically.
    /// Without carbon every element, hydrogen included, goes alphabetically.
    pub fn hill_formula(&self) -> String {
        let mut symbols: Vec<&String> = self.counts.keys().collect();
        let has_carbon = self.counts.contains_key("C");
        symbols.sort_by(|a, b| {
            hill_rank(a, has_carbon)
                .cmp(&hill_rank(b, has_carbon))
                .then_with(|| a.cmp(b))
        });

        let mut formula = String::new();
        for symbol in symbols {
            let count = self.counts[symbol];
            formula.push_str(symbol);
            if count > 1 {
                formula.push_str(&count.to_string());
            }
        }
        match self.charge {
            0 => {}
            1 => formula.push('+'),
            -1 => formula.push('-'),
            c if c > 0 => formula.push_str(&format!("+{}", c)),
            c => formula.push_str(&format!("-{}", -c)),
        }
        formula
    }
}

fn hill_rank(symbol: &str, has_carbon: bool) -> u8 {
    match (symbol, has_carbon) {
        ("C", true) => 0,
        ("H", true) => 1,
        _ => 2,
    }
}
