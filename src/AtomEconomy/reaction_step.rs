use crate::AtomEconomy::coefficients::{Entity, extract_coefficients};
use crate::AtomEconomy::errors::ReactionError;
use log::{info, warn};

/// separator between reactants, agents and products
pub const STEP_SEPARATOR: char = '>';

/// One line of reaction SMILES: reactants>agents>products
#[derive(Debug, Clone, PartialEq)]
pub struct ReactionStep {
    pub reactants: Vec<Entity>,
    /// agents split on '.', only shown, never weighed
    pub agents: Vec<String>,
    /// agent segment as written
    pub agents_raw: String,
    pub products: Vec<Entity>,
}

/// Parses one reaction line. A line must have exactly two '>' separators.
pub fn parse_reaction_step(line: &str) -> Result<ReactionStep, ReactionError> {
    let segments: Vec<&str> = line.split(STEP_SEPARATOR).collect();
    let [reactants, agents, products] = segments[..] else {
        return Err(ReactionError::Format {
            segments: segments.len(),
        });
    };
    let reactants = extract_coefficients(reactants)?;
    let products = extract_coefficients(products)?;
    let agents_raw = agents.trim().to_string();
    let agents = agents_raw
        .split('.')
        .map(str::trim)
        .filter(|agent| !agent.is_empty())
        .map(str::to_string)
        .collect();
    Ok(ReactionStep {
        reactants,
        agents,
        agents_raw,
        products,
    })
}

/// What became of one input line
#[derive(Debug, Clone, PartialEq)]
pub enum LineOutcome {
    Parsed {
        line_number: usize,
        step: ReactionStep,
    },
    Rejected {
        line_number: usize,
        line: String,
        error: ReactionError,
    },
}

impl LineOutcome {
    pub fn step(&self) -> Option<&ReactionStep> {
        match self {
            LineOutcome::Parsed { step, .. } => Some(step),
            LineOutcome::Rejected { .. } => None,
        }
    }

    pub fn line_number(&self) -> usize {
        match self {
            LineOutcome::Parsed { line_number, .. } | LineOutcome::Rejected { line_number, .. } => {
                *line_number
            }
        }
    }
}

/// Splits multi-line reaction text into lines (blank lines are ignored) and parses each of
/// them. A rejected line does not stop the lines after it.
pub fn parse_reaction_lines(text: &str) -> Vec<LineOutcome> {
    let mut outcomes = Vec::new();
    for (i, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let line_number = i + 1;
        match parse_reaction_step(line) {
            Ok(step) => {
                info!(
                    "line {}: {} reactant(s), {} product(s)",
                    line_number,
                    step.reactants.len(),
                    step.products.len()
                );
                outcomes.push(LineOutcome::Parsed { line_number, step });
            }
            Err(error) => {
                warn!("line {} rejected: {}", line_number, error);
                outcomes.push(LineOutcome::Rejected {
                    line_number,
                    line: line.to_string(),
                    error,
                });
            }
        }
    }
    outcomes
}

/// Steps of the lines that parsed, in input order
pub fn parsed_steps(outcomes: &[LineOutcome]) -> Vec<&ReactionStep> {
    outcomes.iter().filter_map(LineOutcome::step).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_reaction_step() {
        let step = parse_reaction_step("{2}C=CC.O=O>Pd/Cu>{2}CC(C)=O").unwrap();
        assert_eq!(
            step.reactants,
            vec![Entity::new("C=CC", 2.0), Entity::new("O=O", 1.0)]
        );
        assert_eq!(step.agents, vec!["Pd/Cu".to_string()]);
        assert_eq!(step.products, vec![Entity::new("CC(C)=O", 2.0)]);
    }

    #[test]
    fn test_agents_are_not_parsed() {
        let err = parse_reaction_step("CCO>{weird}>[Pd]>CC=O").unwrap_err();
        assert_eq!(err, ReactionError::Format { segments: 4 });
        let step = parse_reaction_step("CCO>{weird}.[Pd].{>CC=O").unwrap();
        assert_eq!(step.agents, vec!["{weird}", "[Pd]", "{"]);
        let step = parse_reaction_step("CCO>{weird}.[Pd]>CC=O").unwrap();
        assert_eq!(step.agents_raw, "{weird}.[Pd]");
        assert_eq!(step.agents, vec!["{weird}".to_string(), "[Pd]".to_string()]);
        let step = parse_reaction_step("CCO>>CC=O").unwrap();
        assert!(step.agents.is_empty());
    }

    #[test]
    fn test_wrong_number_of_separators() {
        assert_eq!(
            parse_reaction_step("CCO>CC=O"),
            Err(ReactionError::Format { segments: 2 })
        );
        assert_eq!(
            parse_reaction_step("CCO"),
            Err(ReactionError::Format { segments: 1 })
        );
        assert_eq!(
            parse_reaction_step("C>C>C>C"),
            Err(ReactionError::Format { segments: 4 })
        );
    }

    #[test]
    fn test_malformed_group_rejects_line() {
        assert!(matches!(
            parse_reaction_step("{x}CCO>>CC=O"),
            Err(ReactionError::MalformedGroup { .. })
        ));
        assert!(matches!(
            parse_reaction_step("CCO>>{2CC=O"),
            Err(ReactionError::MalformedGroup { .. })
        ));
    }

    #[test]
    fn test_lines_continue_after_rejection() {
        let text = "CC(C)(OO)c1ccccc1>acid>CC(C)=O\nnot a reaction\r\n\n{?}C>>C\nCC(C)=O>>CC(C)O\n";
        let outcomes = parse_reaction_lines(text);
        assert_eq!(outcomes.len(), 4);
        assert_eq!(
            outcomes.iter().map(LineOutcome::line_number).collect::<Vec<_>>(),
            vec![1, 2, 4, 5]
        );
        assert!(matches!(
            outcomes[1],
            LineOutcome::Rejected {
                error: ReactionError::Format { segments: 1 },
                ..
            }
        ));
        assert!(matches!(
            outcomes[2],
            LineOutcome::Rejected {
                error: ReactionError::MalformedGroup { .. },
                ..
            }
        ));
        let steps = parsed_steps(&outcomes);
        assert_eq!(steps.len(), 2);
        assert_eq!(steps[1].products, vec![Entity::new("CC(C)O", 1.0)]);
    }
}
