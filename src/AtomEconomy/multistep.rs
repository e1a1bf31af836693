//! Folding of several reaction steps into one overall mass balance.
//!
//! A reactant of step i that was produced by any of the steps 0..i-1 is an intermediate: it is
//! generated and consumed inside the route, so its mass is counted neither as a reactant nor
//! (under `ProductPolicy::AccumulateAll`) as a product.
use crate::AtomEconomy::coefficients::Entity;
use crate::AtomEconomy::reaction_step::ReactionStep;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Which products enter the product mass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductPolicy {
    /// products of the last parsed step only
    #[default]
    TerminalOnly,
    /// products of every step except those consumed by a later step
    AccumulateAll,
}

/// How a reactant is recognised as a product of an earlier step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntermediateMatching {
    /// identifiers compared as written
    #[default]
    Identifier,
    /// identifiers compared by canonical SMILES
    Canonical,
}

/// Result of folding all steps
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MassBalance {
    pub reactants: Vec<Entity>,
    pub products: Vec<Entity>,
    /// reactants left out because an earlier step produced them
    pub excluded_intermediates: Vec<Entity>,
}

pub fn identifier_key(identifier: &str) -> String {
    identifier.trim().to_string()
}

pub struct MultiStepAccumulator<F>
where
    F: Fn(&str) -> String,
{
    policy: ProductPolicy,
    key: F,
    /// keys of products of the steps pushed so far
    history: HashSet<String>,
    reactants: Vec<Entity>,
    excluded: Vec<Entity>,
    /// (step index, product)
    products: Vec<(usize, Entity)>,
    /// (step index, key) of every excluded intermediate
    consumed: Vec<(usize, String)>,
    steps: usize,
}

impl MultiStepAccumulator<fn(&str) -> String> {
    /// Accumulator comparing identifiers as written
    pub fn by_identifier(policy: ProductPolicy) -> Self {
        MultiStepAccumulator::new(policy, identifier_key as fn(&str) -> String)
    }
}

impl<F> MultiStepAccumulator<F>
where
    F: Fn(&str) -> String,
{
    /// `key` maps an identifier to the value intermediates are matched on
    pub fn new(policy: ProductPolicy, key: F) -> Self {
        Self {
            policy,
            key,
            history: HashSet::new(),
            reactants: Vec::new(),
            excluded: Vec::new(),
            products: Vec::new(),
            consumed: Vec::new(),
            steps: 0,
        }
    }

    pub fn push_step(&mut self, step: &ReactionStep) {
        let index = self.steps;
        for reactant in &step.reactants {
            let key = (self.key)(&reactant.identifier);
            if self.history.contains(&key) {
                debug!(
                    "step {}: '{}' is an intermediate, excluded from reactants",
                    index + 1,
                    reactant.identifier
                );
                self.excluded.push(reactant.clone());
                self.consumed.push((index, key));
            } else {
                self.reactants.push(reactant.clone());
            }
        }
        // only products of earlier steps count, so history grows after the reactant pass
        for product in &step.products {
            self.history.insert((self.key)(&product.identifier));
            self.products.push((index, product.clone()));
        }
        self.steps += 1;
    }

    pub fn finish(self) -> MassBalance {
        let last = self.steps.checked_sub(1);
        let products: Vec<Entity> = match self.policy {
            ProductPolicy::TerminalOnly => self
                .products
                .into_iter()
                .filter(|(index, _)| Some(*index) == last)
                .map(|(_, product)| product)
                .collect(),
            ProductPolicy::AccumulateAll => {
                let key = &self.key;
                let consumed = &self.consumed;
                self.products
                    .into_iter()
                    .filter(|(index, product)| {
                        let product_key = key(&product.identifier);
                        !consumed.iter().any(|(later, consumed_key)| {
                            later > index && *consumed_key == product_key
                        })
                    })
                    .map(|(_, product)| product)
                    .collect()
            }
        };
        info!(
            "{} step(s): {} reactant(s), {} product(s), {} intermediate(s) excluded",
            self.steps,
            self.reactants.len(),
            products.len(),
            self.excluded.len()
        );
        MassBalance {
            reactants: self.reactants,
            products,
            excluded_intermediates: self.excluded,
        }
    }
}

/// Folds the steps in order with identifiers compared as written
pub fn accumulate_steps(steps: &[&ReactionStep], policy: ProductPolicy) -> MassBalance {
    let mut accumulator = MultiStepAccumulator::by_identifier(policy);
    for step in steps {
        accumulator.push_step(step);
    }
    accumulator.finish()
}
