/// Tokenizing one side of a reaction SMILES into entities with stoichiometric coefficients
///
///  # Examples
/// ```
/// use AtomEco::AtomEconomy::coefficients::extract_coefficients;
/// let entities = extract_coefficients("{2}C=CC.O=O").unwrap();
/// assert_eq!(entities[0].identifier, "C=CC");
/// assert_eq!(entities[0].coefficient, 2.0);
/// assert_eq!(entities[1].coefficient, 1.0);
/// ```
pub mod coefficients;
/// errors of reaction parsing and of the atom economy calculation
pub mod errors;
/// One reaction line `reactants>agents>products` into a reaction step; multi-line text into
/// per-line outcomes, so that one bad line is reported and the rest are still used
///
///  # Examples
/// ```
/// use AtomEco::AtomEconomy::reaction_step::{parse_reaction_lines, parsed_steps};
/// let outcomes = parse_reaction_lines("CC(C)(OO)c1ccccc1>acid>CC(C)=O\nnot a reaction");
/// assert_eq!(outcomes.len(), 2);
/// assert_eq!(parsed_steps(&outcomes).len(), 1);
/// ```
pub mod reaction_step;
/// Several steps into one mass balance. Reactants produced by an earlier step are
/// intermediates and are left out; the products are those of the last parsed step
/// (or of every step, with the consumed intermediates left out, under `ProductPolicy::AccumulateAll`).
pub mod multistep;
/// Atom economy = product mass / reactant mass * 100, masses from a structure toolkit
///
///  # Examples
/// ```
/// use AtomEco::AtomEconomy::calculator::get_atom_economy;
/// let atom_economy = get_atom_economy("CC(C)O>Cu>CC(C)=O").unwrap();
/// assert_eq!(atom_economy, 96.65);
/// ```
pub mod calculator;
/// report tables and numeric output
pub mod report;
