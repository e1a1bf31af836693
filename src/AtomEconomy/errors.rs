use thiserror::Error;

/// Everything that can go wrong between reaction text and an atom economy value.
/// `Format` and `MalformedGroup` reject one line, `InvalidEntity` one identifier,
/// `ZeroReactantMass` the whole calculation.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ReactionError {
    #[error(
        "Each reaction SMILES must be in the form 'reactants>agents>products', found {segments} segment(s)"
    )]
    Format { segments: usize },
    #[error("Malformed entity group '{group}': {reason}")]
    MalformedGroup { group: String, reason: String },
    #[error("Invalid SMILES '{identifier}': {reason}")]
    InvalidEntity { identifier: String, reason: String },
    #[error("No reactants specified.")]
    ZeroReactantMass,
}

impl ReactionError {
    pub fn malformed(group: &str, reason: &str) -> Self {
        ReactionError::MalformedGroup {
            group: group.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Process exit code of the command line tool for a fatal error of this kind.
    /// `Format` and `MalformedGroup` only ever reject single lines and never end a run, so they
    /// get the generic failure code 1 for callers that report a single parsed line on their own.
    pub fn exit_code(&self) -> i32 {
        match self {
            ReactionError::Format { .. } | ReactionError::MalformedGroup { .. } => 1,
            ReactionError::InvalidEntity { .. } => 3,
            ReactionError::ZeroReactantMass => 4,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AtomEconomy::reaction_step::parse_reaction_step;

    #[test]
    fn test_exit_codes() {
        assert_eq!(ReactionError::ZeroReactantMass.exit_code(), 4);
        let invalid = ReactionError::InvalidEntity {
            identifier: "Xx".to_string(),
            reason: "unknown element".to_string(),
        };
        assert_eq!(invalid.exit_code(), 3);
        // line errors of a single parsed step
        assert_eq!(parse_reaction_step("CCO").unwrap_err().exit_code(), 1);
        assert_eq!(parse_reaction_step("{x}C>>C").unwrap_err().exit_code(), 1);
    }
}
