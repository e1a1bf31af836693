/// Module to calculate the atomic composition, molar mass and Hill formula of a molecule
///
///  # Examples
/// ```
/// use AtomEco::Toolkit::molmass::Composition;
/// let mut composition = Composition::new();
/// composition.add_atoms("C", 3);
/// composition.add_atoms("H", 6);
/// composition.add_atoms("O", 1);
/// println!("{} {:.2} g/mol", composition.hill_formula(), composition.molar_mass());
/// ```
pub mod molmass;
/// SMILES strings into molecule graphs with implicit hydrogens
///
///  # Examples
/// ```
/// use AtomEco::Toolkit::smiles::parse_smiles;
/// let graph = parse_smiles("CC(C)(OO)c1ccccc1").unwrap();
/// assert_eq!(graph.composition().hill_formula(), "C9H12O2");
/// ```
pub mod smiles;
/// canonical SMILES of a molecule graph
pub mod canonical;
/// The toolkit boundary used by the atom economy calculator and the built-in SMILES toolkit
///
///  # Examples
/// ```
/// use AtomEco::Toolkit::molecule::{SmilesToolkit, StructureToolkit, ToolkitConfig};
/// let toolkit = SmilesToolkit::new(ToolkitConfig { diagnostics: false });
/// let acetone = toolkit.parse("O=C(C)C").unwrap();
/// println!("{} {} {:.2} g/mol", toolkit.canonical_identifier(&acetone), toolkit.formula(&acetone), toolkit.mol_weight(&acetone));
/// ```
pub mod molecule;
/// RDKit through an embedded Python interpreter, built with the `rdkit` feature
#[cfg(feature = "rdkit")]
pub mod rdkit;
