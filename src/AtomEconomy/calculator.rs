use crate::AtomEconomy::coefficients::Entity;
use crate::AtomEconomy::errors::ReactionError;
use crate::AtomEconomy::multistep::{
    IntermediateMatching, MassBalance, MultiStepAccumulator, ProductPolicy, accumulate_steps,
    identifier_key,
};
use crate::AtomEconomy::reaction_step::{
    LineOutcome, ReactionStep, parse_reaction_lines, parsed_steps,
};
use crate::Toolkit::molecule::{SmilesToolkit, StructureToolkit, ToolkitKind};
#[cfg(feature = "rdkit")]
use crate::Toolkit::rdkit::RdkitToolkit;
use crate::settings::Settings;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// What to do with an identifier the structure toolkit rejects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvalidEntityPolicy {
    /// the whole calculation fails
    Abort,
    /// the entity is left out and listed in the result
    #[default]
    Skip,
}

/// Entity with the data the toolkit derived from its identifier
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedEntity {
    pub entity: Entity,
    pub canonical: String,
    pub formula: String,
    /// g/mol, per unit coefficient
    pub mass: f64,
}

impl ResolvedEntity {
    pub fn weighted_mass(&self) -> f64 {
        self.mass * self.entity.coefficient
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RejectedLine {
    pub line_number: usize,
    pub line: String,
    pub error: ReactionError,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AtomEconomyResult {
    pub reactants: Vec<ResolvedEntity>,
    pub products: Vec<ResolvedEntity>,
    pub reactant_mass: f64,
    pub product_mass: f64,
    /// percent, not rounded
    pub atom_economy: f64,
    pub rejected_lines: Vec<RejectedLine>,
    /// `ReactionError::InvalidEntity` for every identifier left out
    pub skipped: Vec<ReactionError>,
    pub excluded_intermediates: Vec<Entity>,
}

/// A calculation that gave no atom economy, with the lines and entities it had to leave out
/// before it failed
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{error}")]
pub struct CalculationFailure {
    pub error: ReactionError,
    pub rejected_lines: Vec<RejectedLine>,
    pub skipped: Vec<ReactionError>,
}

impl AtomEconomyResult {
    /// atom economy rounded to two decimals
    pub fn rounded(&self) -> f64 {
        round2(self.atom_economy)
    }
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Computes product mass / reactant mass of a reaction route with masses from a toolkit
pub struct AtomEconomyCalculator<T: StructureToolkit> {
    pub toolkit: T,
    pub product_policy: ProductPolicy,
    pub intermediate_matching: IntermediateMatching,
    pub invalid_entities: InvalidEntityPolicy,
}

impl AtomEconomyCalculator<SmilesToolkit> {
    pub fn from_settings(settings: &Settings) -> Self {
        Self::with_toolkit(SmilesToolkit::new(settings.toolkit_config()), settings)
    }
}

impl<T: StructureToolkit> AtomEconomyCalculator<T> {
    pub fn new(toolkit: T) -> Self {
        Self {
            toolkit,
            product_policy: ProductPolicy::default(),
            intermediate_matching: IntermediateMatching::default(),
            invalid_entities: InvalidEntityPolicy::default(),
        }
    }

    pub fn with_toolkit(toolkit: T, settings: &Settings) -> Self {
        Self {
            toolkit,
            product_policy: settings.product_policy,
            intermediate_matching: settings.intermediate_matching,
            invalid_entities: settings.invalid_entities,
        }
    }

    /// canonical SMILES when the toolkit understands the identifier, the identifier otherwise
    fn canonical_key(&self, identifier: &str) -> String {
        match self.toolkit.parse(identifier) {
            Ok(molecule) => self.toolkit.canonical_identifier(&molecule),
            Err(_) => identifier_key(identifier),
        }
    }

    pub fn mass_balance(&self, steps: &[&ReactionStep]) -> MassBalance {
        match self.intermediate_matching {
            IntermediateMatching::Identifier => accumulate_steps(steps, self.product_policy),
            IntermediateMatching::Canonical => {
                let mut accumulator = MultiStepAccumulator::new(self.product_policy, |id: &str| {
                    self.canonical_key(id)
                });
                for step in steps {
                    accumulator.push_step(step);
                }
                accumulator.finish()
            }
        }
    }

    pub fn resolve(&self, entity: &Entity) -> Result<ResolvedEntity, ReactionError> {
        let molecule =
            self.toolkit
                .parse(&entity.identifier)
                .map_err(|e| ReactionError::InvalidEntity {
                    identifier: entity.identifier.clone(),
                    reason: e.to_string(),
                })?;
        Ok(ResolvedEntity {
            entity: entity.clone(),
            canonical: self.toolkit.canonical_identifier(&molecule),
            formula: self.toolkit.formula(&molecule),
            mass: self.toolkit.mol_weight(&molecule),
        })
    }

    fn resolve_all(
        &self,
        entities: &[Entity],
        skipped: &mut Vec<ReactionError>,
    ) -> Result<Vec<ResolvedEntity>, ReactionError> {
        let mut resolved = Vec::with_capacity(entities.len());
        for entity in entities {
            match self.resolve(entity) {
                Ok(r) => resolved.push(r),
                Err(e) => match self.invalid_entities {
                    InvalidEntityPolicy::Abort => return Err(e),
                    InvalidEntityPolicy::Skip => {
                        warn!("{}, left out of the mass balance", e);
                        skipped.push(e);
                    }
                },
            }
        }
        Ok(resolved)
    }

    /// Atom economy of multi-line reaction text, one reaction per line
    pub fn calculate(&self, text: &str) -> Result<AtomEconomyResult, CalculationFailure> {
        let outcomes = parse_reaction_lines(text);
        let rejected_lines: Vec<RejectedLine> = outcomes
            .iter()
            .filter_map(|outcome| match outcome {
                LineOutcome::Rejected {
                    line_number,
                    line,
                    error,
                } => Some(RejectedLine {
                    line_number: *line_number,
                    line: line.clone(),
                    error: error.clone(),
                }),
                LineOutcome::Parsed { .. } => None,
            })
            .collect();
        let steps = parsed_steps(&outcomes);
        let balance = self.mass_balance(&steps);

        let mut skipped = Vec::new();
        let resolved = self
            .resolve_all(&balance.reactants, &mut skipped)
            .and_then(|reactants| {
                let products = self.resolve_all(&balance.products, &mut skipped)?;
                Ok((reactants, products))
            });
        let (reactants, products) = match resolved {
            Ok(resolved) => resolved,
            Err(error) => {
                return Err(CalculationFailure {
                    error,
                    rejected_lines,
                    skipped,
                });
            }
        };
        let reactant_mass: f64 = reactants.iter().map(ResolvedEntity::weighted_mass).sum();
        let product_mass: f64 = products.iter().map(ResolvedEntity::weighted_mass).sum();
        if reactant_mass == 0.0 {
            return Err(CalculationFailure {
                error: ReactionError::ZeroReactantMass,
                rejected_lines,
                skipped,
            });
        }
        let atom_economy = product_mass / reactant_mass * 100.0;
        info!(
            "reactant mass {:.3} g/mol, product mass {:.3} g/mol, atom economy {:.2}%",
            reactant_mass, product_mass, atom_economy
        );
        Ok(AtomEconomyResult {
            reactants,
            products,
            reactant_mass,
            product_mass,
            atom_economy,
            rejected_lines,
            skipped,
            excluded_intermediates: balance.excluded_intermediates,
        })
    }
}

/// Full result with the toolkit chosen in the settings
pub fn calculate_atom_economy(
    text: &str,
    settings: &Settings,
) -> Result<AtomEconomyResult, CalculationFailure> {
    match settings.toolkit {
        ToolkitKind::Builtin => AtomEconomyCalculator::from_settings(settings).calculate(text),
        ToolkitKind::Rdkit => calculate_with_rdkit(text, settings),
    }
}

#[cfg(feature = "rdkit")]
fn calculate_with_rdkit(
    text: &str,
    settings: &Settings,
) -> Result<AtomEconomyResult, CalculationFailure> {
    match RdkitToolkit::new(settings.toolkit_config()) {
        Ok(toolkit) => AtomEconomyCalculator::with_toolkit(toolkit, settings).calculate(text),
        Err(e) => {
            warn!("RDKit is not available ({}), using the built-in SMILES toolkit", e);
            AtomEconomyCalculator::from_settings(settings).calculate(text)
        }
    }
}

#[cfg(not(feature = "rdkit"))]
fn calculate_with_rdkit(
    text: &str,
    settings: &Settings,
) -> Result<AtomEconomyResult, CalculationFailure> {
    warn!("built without the rdkit feature, using the built-in SMILES toolkit");
    AtomEconomyCalculator::from_settings(settings).calculate(text)
}

/// Atom economy in percent, rounded to two decimals, with default settings
pub fn get_atom_economy(text: &str) -> Result<f64, ReactionError> {
    calculate_atom_economy(text, &Settings::default())
        .map(|result| result.rounded())
        .map_err(|failure| failure.error)
}
