use crate::Toolkit::canonical::canonical_smiles;
use crate::Toolkit::smiles::{MolGraph, SmilesError, parse_smiles};
use log::warn;
use serde::{Deserialize, Serialize};

/// Boundary between the atom economy calculation and whatever interprets structures.
/// A toolkit turns an identifier into a molecule handle and reports mass, canonical
/// identifier and formula of the handle.
pub trait StructureToolkit {
    type Handle;
    fn parse(&self, identifier: &str) -> Result<Self::Handle, SmilesError>;
    /// average molecular weight, g/mol
    fn mol_weight(&self, molecule: &Self::Handle) -> f64;
    fn canonical_identifier(&self, molecule: &Self::Handle) -> String;
    fn formula(&self, molecule: &Self::Handle) -> String;
}

/// Which toolkit interprets the identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolkitKind {
    /// `SmilesToolkit`
    #[default]
    Builtin,
    /// RDKit through Python, needs the `rdkit` cargo feature; falls back to `Builtin` when
    /// RDKit cannot be loaded
    Rdkit,
}

/// Passed once when the toolkit is created.
#[derive(Debug, Clone, Copy, Default)]
pub struct ToolkitConfig {
    /// log every identifier the toolkit rejects
    pub diagnostics: bool,
}

/// Molecule interpreted from SMILES
#[derive(Debug, Clone)]
pub struct Molecule {
    pub smiles: String,
    pub graph: MolGraph,
}

impl Molecule {
    pub fn from_smiles(smiles: &str) -> Result<Self, SmilesError> {
        let graph = parse_smiles(smiles)?;
        Ok(Self {
            smiles: smiles.trim().to_string(),
            graph,
        })
    }

    pub fn mol_weight(&self) -> f64 {
        self.graph.composition().molar_mass()
    }

    pub fn formula(&self) -> String {
        self.graph.composition().hill_formula()
    }

    pub fn canonical_smiles(&self) -> String {
        canonical_smiles(&self.graph)
    }
}

/// The built-in toolkit: SMILES identifiers, average atomic masses, Hill formulas.
#[derive(Debug, Clone, Default)]
pub struct SmilesToolkit {
    config: ToolkitConfig,
}

impl SmilesToolkit {
    pub fn new(config: ToolkitConfig) -> Self {
        Self { config }
    }
}

impl StructureToolkit for SmilesToolkit {
    type Handle = Molecule;

    fn parse(&self, identifier: &str) -> Result<Molecule, SmilesError> {
        Molecule::from_smiles(identifier).inspect_err(|e| {
            if self.config.diagnostics {
                warn!("SMILES Parse Error: {} for input: '{}'", e, identifier);
            }
        })
    }

    fn mol_weight(&self, molecule: &Molecule) -> f64 {
        molecule.mol_weight()
    }

    fn canonical_identifier(&self, molecule: &Molecule) -> String {
        molecule.canonical_smiles()
    }

    fn formula(&self, molecule: &Molecule) -> String {
        molecule.formula()
    }
}
