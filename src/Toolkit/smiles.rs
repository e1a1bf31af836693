//! # SMILES interpreter
//!
//! Turns a SMILES string into a [`MolGraph`]: atoms with their total hydrogen count and the
//! bonds between them. Supported grammar:
//! - organic subset atoms `B C N O P S F Cl Br I`, aromatic `b c n o p s` and the wildcard `*`
//! - bracket atoms `[13CH3+]`, `[nH]`, `[Fe+2]`, `[C@@H]`, `[CH3:1]`
//! - bonds `- = # $ : / \`, branches `( )`, ring closures `1`..`9` and `%10`..`%99`
//! - disconnected components separated by `.`
//!
//! Organic subset atoms get implicit hydrogens from their default valences. Aromatic atoms
//! reserve one valence for the aromatic system and only use their lowest valence, which
//! gives the usual counts for benzene, pyridine, furan and thiophene. Every aromatic system
//! must admit alternating double bonds (a Kekulé structure), so `c1ccnc1` is rejected while
//! `c1cc[nH]c1` is pyrrole. Chirality and double bond geometry are accepted and dropped.
use crate::Toolkit::molmass::{Composition, element_by_symbol};
use log::debug;
use regex::Regex;
use std::collections::HashMap;
use std::sync::OnceLock;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum SmilesError {
    #[error("empty SMILES")]
    Empty,
    #[error("unexpected character '{character}' at position {position}")]
    UnexpectedCharacter { character: char, position: usize },
    #[error("unknown element '{0}'")]
    UnknownElement(String),
    #[error("invalid bracket atom '[{0}]'")]
    InvalidBracketAtom(String),
    #[error("unclosed bracket atom starting at position {0}")]
    UnclosedBracket(usize),
    #[error("unbalanced branch at position {0}")]
    UnbalancedBranch(usize),
    #[error("bond symbol without an atom to attach at position {0}")]
    DanglingBond(usize),
    #[error("ring closure {0} is never closed")]
    UnclosedRing(u16),
    #[error("ring closure {0} bonds an atom to itself")]
    RingClosureToSelf(u16),
    #[error("ring closure {0} has conflicting bond symbols")]
    ConflictingRingBond(u16),
    #[error("atoms {0} and {1} are bonded twice")]
    DuplicateBond(usize, usize),
    #[error("valence of {symbol} exceeded: {bond_order_sum} bonds")]
    ValenceExceeded { symbol: String, bond_order_sum: u32 },
    #[error("aromatic system around atom {0} has no Kekulé structure")]
    Kekulization(usize),
    /// rejection reported by an external toolkit
    #[error("{0}")]
    Toolkit(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BondOrder {
    Single,
    Double,
    Triple,
    Quadruple,
    Aromatic,
}

impl BondOrder {
    /// contribution to the valence of each end; aromatic bonds count as single here
    pub fn valence(&self) -> u8 {
        match self {
            BondOrder::Single | BondOrder::Aromatic => 1,
            BondOrder::Double => 2,
            BondOrder::Triple => 3,
            BondOrder::Quadruple => 4,
        }
    }

    fn from_symbol(symbol: char) -> Option<Self> {
        match symbol {
            '-' | '/' | '\\' => Some(BondOrder::Single),
            '=' => Some(BondOrder::Double),
            '#' => Some(BondOrder::Triple),
            '$' => Some(BondOrder::Quadruple),
            ':' => Some(BondOrder::Aromatic),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    /// element symbol with the capitalisation of the periodic table, `*` for the wildcard
    pub symbol: String,
    pub atomic_number: u8,
    pub aromatic: bool,
    pub bracketed: bool,
    pub isotope: Option<u16>,
    pub charge: i32,
    /// attached hydrogens: explicit for bracket atoms, implicit otherwise
    pub hydrogens: u8,
    pub atom_class: Option<u32>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Bond {
    pub begin: usize,
    pub end: usize,
    pub order: BondOrder,
}

impl Bond {
    pub fn other(&self, atom: usize) -> usize {
        if self.begin == atom { self.end } else { self.begin }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct MolGraph {
    pub atoms: Vec<Atom>,
    pub bonds: Vec<Bond>,
}

impl MolGraph {
    /// (neighbour atom, bond index) pairs of the atom
    pub fn neighbors(&self, atom: usize) -> Vec<(usize, usize)> {
        self.bonds
            .iter()
            .enumerate()
            .filter(|(_, bond)| bond.begin == atom || bond.end == atom)
            .map(|(i, bond)| (bond.other(atom), i))
            .collect()
    }

    pub fn bond_order_sum(&self, atom: usize) -> u32 {
        self.bonds
            .iter()
            .filter(|bond| bond.begin == atom || bond.end == atom)
            .map(|bond| u32::from(bond.order.valence()))
            .sum()
    }

    fn bond_between(&self, a: usize, b: usize) -> bool {
        self.bonds
            .iter()
            .any(|bond| (bond.begin == a && bond.end == b) || (bond.begin == b && bond.end == a))
    }

    /// Element counts (hydrogens included), isotope labels and net charge.
    pub fn composition(&self) -> Composition {
        let mut composition = Composition::new();
        let mut hydrogens = 0usize;
        for atom in self.atoms.iter() {
            hydrogens += atom.hydrogens as usize;
            composition.charge += atom.charge;
            if atom.atomic_number == 0 {
                continue;
            }
            match atom.isotope {
                Some(mass_number) => composition.add_isotope(&atom.symbol, mass_number),
                None => composition.add_atoms(&atom.symbol, 1),
            }
        }
        composition.add_atoms("H", hydrogens);
        composition
    }
}

/// Default valences of the organic subset; an empty slice means "no implicit hydrogens".
pub fn default_valences(symbol: &str) -> &'static [u8] {
    match symbol {
        "B" => &[3],
        "C" => &[4],
        "N" => &[3, 5],
        "O" => &[2],
        "P" => &[3, 5],
        "S" => &[2, 4, 6],
        "F" | "Cl" | "Br" | "I" => &[1],
        _ => &[],
    }
}

/// Implicit hydrogen count of an organic subset atom with the given bond order sum.
pub fn implicit_hydrogens(symbol: &str, aromatic: bool, bond_order_sum: u32) -> Option<u8> {
    let valences = default_valences(symbol);
    let Some(&lowest) = valences.first() else {
        return Some(0);
    };
    let hydrogens = if aromatic {
        u32::from(lowest).saturating_sub(bond_order_sum + 1)
    } else {
        valences
            .iter()
            .map(|&valence| u32::from(valence))
            .find(|&valence| valence >= bond_order_sum)?
            - bond_order_sum
    };
    u8::try_from(hydrogens).ok()
}

/// Valence an aromatic atom shares between its sigma bonds, hydrogens and the pi system.
fn aromatic_valence(atom: &Atom) -> Option<i32> {
    let neutral = match atom.symbol.as_str() {
        "B" => 3,
        "C" => 4,
        "N" | "P" | "As" => 3,
        "O" | "S" | "Se" | "Te" => 2,
        _ => return None,
    };
    let valence = match atom.symbol.as_str() {
        "C" => neutral - atom.charge.abs(),
        "B" => neutral - atom.charge,
        _ => neutral + atom.charge,
    };
    Some(valence)
}

fn bracket_atom_regex() -> &'static Regex {
    static BRACKET_ATOM: OnceLock<Regex> = OnceLock::new();
    BRACKET_ATOM.get_or_init(|| {
        Regex::new(
            r"^(?P<isotope>\d+)?(?P<symbol>[A-Z][a-z]?|se|as|te|[bcnops]|\*)(?P<chirality>@{1,2}(?:TH[12]|AL[12]|SP[123]|TB\d{1,2}|OH\d{1,2})?)?(?P<hydrogens>H\d?)?(?P<charge>\++|-+|[+-]\d{1,2})?(?::(?P<class>\d+))?$",
        )
        .expect("bracket atom pattern is valid")
    })
}

fn capitalise(symbol: &str) -> String {
    let mut chars = symbol.chars();
    match chars.next() {
        Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
        None => String::new(),
    }
}

fn make_atom(symbol: &str, bracketed: bool) -> Result<Atom, SmilesError> {
    if symbol == "*" {
        return Ok(Atom {
            symbol: "*".to_string(),
            atomic_number: 0,
            aromatic: false,
            bracketed,
            isotope: None,
            charge: 0,
            hydrogens: 0,
            atom_class: None,
        });
    }
    let aromatic = symbol.starts_with(|c: char| c.is_ascii_lowercase());
    let element_symbol = capitalise(symbol);
    let element = element_by_symbol(&element_symbol)
        .ok_or_else(|| SmilesError::UnknownElement(symbol.to_string()))?;
    Ok(Atom {
        symbol: element_symbol,
        atomic_number: element.atomic_number,
        aromatic,
        bracketed,
        isotope: None,
        charge: 0,
        hydrogens: 0,
        atom_class: None,
    })
}

fn parse_charge(text: &str) -> i32 {
    let sign = if text.starts_with('-') { -1 } else { 1 };
    let digits = text.trim_start_matches(['+', '-']);
    if digits.is_empty() {
        sign * text.len() as i32
    } else {
        sign * digits.parse::<i32>().unwrap_or(1)
    }
}

fn parse_bracket_atom(content: &str) -> Result<Atom, SmilesError> {
    let invalid = || SmilesError::InvalidBracketAtom(content.to_string());
    let captures = bracket_atom_regex().captures(content).ok_or_else(invalid)?;
    let mut atom = make_atom(&captures["symbol"], true)?;
    if let Some(isotope) = captures.name("isotope") {
        atom.isotope = Some(isotope.as_str().parse().map_err(|_| invalid())?);
    }
    if let Some(hydrogens) = captures.name("hydrogens") {
        let count = &hydrogens.as_str()[1..];
        atom.hydrogens = if count.is_empty() {
            1
        } else {
            count.parse().map_err(|_| invalid())?
        };
    }
    if let Some(charge) = captures.name("charge") {
        atom.charge = parse_charge(charge.as_str());
    }
    if let Some(class) = captures.name("class") {
        atom.atom_class = Some(class.as_str().parse().map_err(|_| invalid())?);
    }
    Ok(atom)
}

struct OpenRing {
    atom: usize,
    bond: Option<char>,
    position: usize,
}

/// Parses a SMILES string into a molecule graph with hydrogens assigned.
pub fn parse_smiles(smiles: &str) -> Result<MolGraph, SmilesError> {
    let chars: Vec<char> = smiles.trim().chars().collect();
    if chars.is_empty() {
        return Err(SmilesError::Empty);
    }
    let mut graph = MolGraph::default();
    let mut previous: Option<usize> = None;
    let mut branches: Vec<(Option<usize>, usize)> = Vec::new();
    let mut pending_bond: Option<(char, usize)> = None;
    let mut open_rings: HashMap<u16, OpenRing> = HashMap::new();

    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        match c {
            '(' => {
                if previous.is_none() || pending_bond.is_some() {
                    return Err(SmilesError::UnbalancedBranch(i));
                }
                branches.push((previous, i));
                i += 1;
            }
            ')' => {
                if pending_bond.is_some() {
                    return Err(SmilesError::DanglingBond(i));
                }
                let (branch_root, _) = branches.pop().ok_or(SmilesError::UnbalancedBranch(i))?;
                previous = branch_root;
                i += 1;
            }
            '-' | '=' | '#' | '$' | ':' | '/' | '\\' => {
                if previous.is_none() || pending_bond.is_some() {
                    return Err(SmilesError::DanglingBond(i));
                }
                pending_bond = Some((c, i));
                i += 1;
            }
            '.' => {
                if pending_bond.is_some() || previous.is_none() {
                    return Err(SmilesError::UnexpectedCharacter {
                        character: c,
                        position: i,
                    });
                }
                previous = None;
                i += 1;
            }
            '0'..='9' | '%' => {
                let atom = previous.ok_or(SmilesError::UnexpectedCharacter {
                    character: c,
                    position: i,
                })?;
                let (number, consumed) = read_ring_number(&chars, i)?;
                let bond_symbol = pending_bond.take().map(|(symbol, _)| symbol);
                match open_rings.remove(&number) {
                    Some(open) => {
                        if open.atom == atom {
                            return Err(SmilesError::RingClosureToSelf(number));
                        }
                        let symbol = match (open.bond, bond_symbol) {
                            (Some(a), Some(b)) if a != b && !is_geometry_mark(a, b) => {
                                return Err(SmilesError::ConflictingRingBond(number));
                            }
                            (Some(a), _) => Some(a),
                            (None, b) => b,
                        };
                        add_bond(&mut graph, open.atom, atom, symbol)?;
                    }
                    None => {
                        open_rings.insert(
                            number,
                            OpenRing {
                                atom,
                                bond: bond_symbol,
                                position: i,
                            },
                        );
                    }
                }
                i += consumed;
            }
            '[' => {
                let close = chars[i..]
                    .iter()
                    .position(|&ch| ch == ']')
                    .ok_or(SmilesError::UnclosedBracket(i))?;
                let content: String = chars[i + 1..i + close].iter().collect();
                let atom = parse_bracket_atom(&content)?;
                attach_atom(&mut graph, atom, &mut previous, &mut pending_bond)?;
                i += close + 1;
            }
            'B' | 'C' | 'N' | 'O' | 'P' | 'S' | 'F' | 'I' | 'b' | 'c' | 'n' | 'o' | 'p' | 's'
            | '*' => {
                let next = chars.get(i + 1).copied();
                let symbol = match (c, next) {
                    ('C', Some('l')) => "Cl".to_string(),
                    ('B', Some('r')) => "Br".to_string(),
                    _ => c.to_string(),
                };
                i += symbol.len();
                let atom = make_atom(&symbol, false)?;
                attach_atom(&mut graph, atom, &mut previous, &mut pending_bond)?;
            }
            _ => {
                return Err(SmilesError::UnexpectedCharacter {
                    character: c,
                    position: i,
                });
            }
        }
    }

    if let Some((_, position)) = pending_bond {
        return Err(SmilesError::DanglingBond(position));
    }
    if let Some((_, position)) = branches.pop() {
        return Err(SmilesError::UnbalancedBranch(position));
    }
    if let Some((&number, open)) = open_rings.iter().min_by_key(|(_, open)| open.position) {
        debug!("ring {} opened at position {} is never closed", number, open.position);
        return Err(SmilesError::UnclosedRing(number));
    }

    assign_hydrogens(&mut graph)?;
    check_kekule(&graph)?;
    Ok(graph)
}

// "/" and "\" on the two ends of one ring bond are both plain single bonds here
fn is_geometry_mark(a: char, b: char) -> bool {
    matches!(a, '/' | '\\') && matches!(b, '/' | '\\')
}

fn read_ring_number(chars: &[char], i: usize) -> Result<(u16, usize), SmilesError> {
    if chars[i] != '%' {
        let digit = chars[i].to_digit(10).unwrap_or(0) as u16;
        return Ok((digit, 1));
    }
    let digits: String = chars.iter().skip(i + 1).take(2).collect();
    if digits.len() != 2 || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(SmilesError::UnexpectedCharacter {
            character: '%',
            position: i,
        });
    }
    let number = digits
        .parse::<u16>()
        .map_err(|_| SmilesError::UnexpectedCharacter { character: '%', position: i })?;
    Ok((number, 3))
}

fn attach_atom(
    graph: &mut MolGraph,
    atom: Atom,
    previous: &mut Option<usize>,
    pending_bond: &mut Option<(char, usize)>,
) -> Result<(), SmilesError> {
    graph.atoms.push(atom);
    let index = graph.atoms.len() - 1;
    if let Some(prev) = *previous {
        let symbol = pending_bond.take().map(|(symbol, _)| symbol);
        add_bond(graph, prev, index, symbol)?;
    }
    *previous = Some(index);
    Ok(())
}

fn add_bond(
    graph: &mut MolGraph,
    begin: usize,
    end: usize,
    symbol: Option<char>,
) -> Result<(), SmilesError> {
    if graph.bond_between(begin, end) {
        return Err(SmilesError::DuplicateBond(begin, end));
    }
    let order = match symbol.and_then(BondOrder::from_symbol) {
        Some(order) => order,
        None if graph.atoms[begin].aromatic && graph.atoms[end].aromatic => BondOrder::Aromatic,
        None => BondOrder::Single,
    };
    graph.bonds.push(Bond { begin, end, order });
    Ok(())
}

fn assign_hydrogens(graph: &mut MolGraph) -> Result<(), SmilesError> {
    for index in 0..graph.atoms.len() {
        if graph.atoms[index].bracketed {
            continue;
        }
        let bond_order_sum = graph.bond_order_sum(index);
        let atom = &graph.atoms[index];
        let hydrogens = implicit_hydrogens(&atom.symbol, atom.aromatic, bond_order_sum)
            .ok_or_else(|| SmilesError::ValenceExceeded {
                symbol: atom.symbol.clone(),
                bond_order_sum,
            })?;
        graph.atoms[index].hydrogens = hydrogens;
    }
    Ok(())
}

/// Aromatic atoms with a free valence must pair up over aromatic bonds, each pair being one
/// double bond of the Kekulé structure.
fn check_kekule(graph: &MolGraph) -> Result<(), SmilesError> {
    let needs_double: Vec<bool> = graph
        .atoms
        .iter()
        .enumerate()
        .map(|(index, atom)| {
            atom.aromatic
                && aromatic_valence(atom).is_some_and(|valence| {
                    valence
                        - graph.bond_order_sum(index) as i32
                        - i32::from(atom.hydrogens)
                        >= 1
                })
        })
        .collect();
    let mut partners: Vec<Vec<usize>> = vec![Vec::new(); graph.atoms.len()];
    for bond in graph.bonds.iter() {
        if bond.order == BondOrder::Aromatic && needs_double[bond.begin] && needs_double[bond.end]
        {
            partners[bond.begin].push(bond.end);
            partners[bond.end].push(bond.begin);
        }
    }
    let mut mate: Vec<Option<usize>> = vec![None; graph.atoms.len()];
    match pair_from(0, &needs_double, &partners, &mut mate) {
        None => Ok(()),
        Some(atom) => Err(SmilesError::Kekulization(atom)),
    }
}

/// Pairs every atom from `start` on that needs a double bond; the atom left without a
/// partner on failure.
fn pair_from(
    start: usize,
    needs_double: &[bool],
    partners: &[Vec<usize>],
    mate: &mut [Option<usize>],
) -> Option<usize> {
    let atom = (start..needs_double.len()).find(|&a| needs_double[a] && mate[a].is_none())?;
    for &partner in partners[atom].iter() {
        if mate[partner].is_some() {
            continue;
        }
        mate[atom] = Some(partner);
        mate[partner] = Some(atom);
        if pair_from(atom + 1, needs_double, partners, mate).is_none() {
            return None;
        }
        mate[atom] = None;
        mate[partner] = None;
    }
    Some(atom)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hydrogens(smiles: &str) -> Vec<u8> {
        parse_smiles(smiles)
            .unwrap()
            .atoms
            .iter()
            .map(|atom| atom.hydrogens)
            .collect()
    }

    #[test]
    fn test_chain_and_branches() {
        let graph = parse_smiles("CC(C)(OO)c1ccccc1").unwrap();
        assert_eq!(graph.atoms.len(), 11);
        assert_eq!(graph.bonds.len(), 11);
        assert_eq!(hydrogens("CC(C)=O"), vec![3, 0, 3, 0]);
        assert_eq!(hydrogens("C=CC"), vec![2, 1, 3]);
        assert_eq!(hydrogens("C#N"), vec![1, 0]);
    }

    #[test]
    fn test_aromatic_hydrogens() {
        assert_eq!(hydrogens("c1ccccc1"), vec![1; 6]);
        assert_eq!(hydrogens("c1ccncc1"), vec![1, 1, 1, 0, 1, 1]);
        assert_eq!(hydrogens("c1ccoc1"), vec![1, 1, 1, 0, 1]);
        assert_eq!(hydrogens("c1ccsc1"), vec![1, 1, 1, 0, 1]);
        assert_eq!(hydrogens("c1cc[nH]c1"), vec![1, 1, 1, 1, 1]);
    }

    #[test]
    fn test_bracket_atoms() {
        let graph = parse_smiles("[13CH3][NH3+]").unwrap();
        assert_eq!(graph.atoms[0].isotope, Some(13));
        assert_eq!(graph.atoms[0].hydrogens, 3);
        assert_eq!(graph.atoms[1].charge, 1);
        let graph = parse_smiles("[Fe+2]").unwrap();
        assert_eq!(graph.atoms[0].charge, 2);
        assert_eq!(graph.atoms[0].hydrogens, 0);
        let graph = parse_smiles("[O--]").unwrap();
        assert_eq!(graph.atoms[0].charge, -2);
        let graph = parse_smiles("N[C@@H](C)C(=O)O").unwrap();
        assert_eq!(graph.atoms[1].hydrogens, 1);
        let graph = parse_smiles("[CH3:7]Cl").unwrap();
        assert_eq!(graph.atoms[0].atom_class, Some(7));
        assert_eq!(graph.atoms[1].symbol, "Cl");
    }

    #[test]
    fn test_hypervalent_defaults() {
        assert_eq!(hydrogens("CS(=O)(=O)C"), vec![3, 0, 0, 0, 3]);
        assert_eq!(hydrogens("OP(=O)(O)O"), vec![1, 0, 0, 1, 1]);
    }

    #[test]
    fn test_ring_closures() {
        let graph = parse_smiles("C1CC%10CC1CC%10").unwrap();
        assert_eq!(graph.bonds.len(), 8);
        let graph = parse_smiles("C=1CC1").unwrap();
        assert_eq!(graph.bonds.iter().filter(|b| b.order == BondOrder::Double).count(), 1);
    }

    #[test]
    fn test_disconnected_components() {
        let graph = parse_smiles("[Na+].[Cl-]").unwrap();
        assert_eq!(graph.atoms.len(), 2);
        assert!(graph.bonds.is_empty());
    }

    #[test]
    fn test_rejections() {
        assert_eq!(parse_smiles(""), Err(SmilesError::Empty));
        assert_eq!(parse_smiles("C1CC"), Err(SmilesError::UnclosedRing(1)));
        assert_eq!(parse_smiles("C11"), Err(SmilesError::RingClosureToSelf(1)));
        assert_eq!(parse_smiles("CC)"), Err(SmilesError::UnbalancedBranch(2)));
        assert_eq!(parse_smiles("CC(C"), Err(SmilesError::UnbalancedBranch(2)));
        assert_eq!(parse_smiles("CC="), Err(SmilesError::DanglingBond(2)));
        assert_eq!(parse_smiles("C12CC12"), Err(SmilesError::DuplicateBond(0, 2)));
        assert!(matches!(
            parse_smiles("C(C)(C)(C)(C)C"),
            Err(SmilesError::ValenceExceeded { .. })
        ));
        assert!(matches!(
            parse_smiles("Xy"),
            Err(SmilesError::UnexpectedCharacter { character: 'X', position: 0 })
        ));
        assert_eq!(parse_smiles("[Xx]"), Err(SmilesError::UnknownElement("Xx".to_string())));
        assert!(matches!(parse_smiles("[C"), Err(SmilesError::UnclosedBracket(0))));
        assert!(matches!(parse_smiles("acid"), Err(_)));
    }

    #[test]
    fn test_kekule_structure_required() {
        assert_eq!(parse_smiles("c1ccnc1"), Err(SmilesError::Kekulization(0)));
        assert!(parse_smiles("c1cccc1").is_err());
        assert!(parse_smiles("c1cc[nH]c1").is_ok());
        assert!(parse_smiles("Cn1cccc1").is_ok());
        assert!(parse_smiles("c1ccc2ccccc2c1").is_ok());
        assert!(parse_smiles("O=c1cccc[nH]1").is_ok());
        assert!(parse_smiles("C[n+]1ccccc1").is_ok());
        assert!(parse_smiles("[cH-]1cccc1").is_ok());
    }

    #[test]
    fn test_many_branches_exceed_valence() {
        let smiles = format!("C{}", "(C)".repeat(300));
        assert_eq!(
            parse_smiles(&smiles),
            Err(SmilesError::ValenceExceeded {
                symbol: "C".to_string(),
                bond_order_sum: 300,
            })
        );
    }
}
