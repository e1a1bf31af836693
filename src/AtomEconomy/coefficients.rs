//! Tokenizer for one side of a reaction SMILES: `{2}C=CC.O=O` -> [("C=CC", 2.0), ("O=O", 1.0)].
//!
//! A side is a `.`-separated list of entity groups, each optionally prefixed with a
//! stoichiometric coefficient in braces. Written as a small state machine over the characters
//! of the side so that a malformed prefix is reported as a value instead of being skipped.
use crate::AtomEconomy::errors::ReactionError;
use log::debug;

/// A species taking part in a reaction: SMILES identifier and stoichiometric coefficient.
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    pub identifier: String,
    pub coefficient: f64,
}

impl Entity {
    pub fn new(identifier: &str, coefficient: f64) -> Self {
        Self {
            identifier: identifier.to_string(),
            coefficient,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum State {
    /// between groups, or after a prefix and before its identifier
    ExpectGroup,
    InPrefix,
    InIdentifier,
}

struct Extractor<'a> {
    segment: &'a str,
    entities: Vec<Entity>,
    group_start: usize,
    prefix: String,
    identifier: String,
    coefficient: Option<f64>,
}

impl<'a> Extractor<'a> {
    fn new(segment: &'a str) -> Self {
        Self {
            segment,
            entities: Vec::new(),
            group_start: 0,
            prefix: String::new(),
            identifier: String::new(),
            coefficient: None,
        }
    }

    fn malformed(&self, reason: &str) -> ReactionError {
        let rest = &self.segment[self.group_start..];
        // a '.' before the closing brace is a decimal point, not a group separator
        let prefix_end = if rest.trim_start().starts_with('{') {
            rest.find('}').map_or(rest.len(), |close| close + 1)
        } else {
            0
        };
        let end = rest[prefix_end..]
            .find('.')
            .map_or(rest.len(), |dot| prefix_end + dot);
        ReactionError::malformed(rest[..end].trim(), reason)
    }

    fn finish_group(&mut self) {
        let identifier = self.identifier.trim();
        let coefficient = self.coefficient.take().unwrap_or(1.0);
        self.entities.push(Entity::new(identifier, coefficient));
        self.identifier.clear();
    }

    fn step(&mut self, state: State, position: usize, c: char) -> Result<State, ReactionError> {
        let next = match (state, c) {
            (State::ExpectGroup, '{') if self.coefficient.is_some() => {
                return Err(self.malformed("more than one coefficient prefix"));
            }
            (State::ExpectGroup, '{') => State::InPrefix,
            (State::ExpectGroup, '}') => return Err(self.malformed("'}' without '{'")),
            (State::ExpectGroup, '.') => {
                if self.coefficient.is_some() {
                    return Err(self.malformed("coefficient prefix without identifier"));
                }
                self.group_start = position + 1;
                State::ExpectGroup
            }
            (State::ExpectGroup, c) if c.is_whitespace() => State::ExpectGroup,
            (State::ExpectGroup, c) => {
                self.identifier.push(c);
                State::InIdentifier
            }
            (State::InPrefix, '}') => {
                let coefficient =
                    parse_coefficient(&self.prefix).map_err(|reason| self.malformed(&reason))?;
                self.coefficient = Some(coefficient);
                self.prefix.clear();
                State::ExpectGroup
            }
            (State::InPrefix, '{') => {
                return Err(self.malformed("unterminated coefficient prefix"));
            }
            (State::InPrefix, c) => {
                self.prefix.push(c);
                State::InPrefix
            }
            (State::InIdentifier, '.') => {
                self.finish_group();
                self.group_start = position + 1;
                State::ExpectGroup
            }
            (State::InIdentifier, '{') | (State::InIdentifier, '}') => {
                return Err(self.malformed("braces inside an identifier"));
            }
            (State::InIdentifier, c) => {
                self.identifier.push(c);
                State::InIdentifier
            }
        };
        Ok(next)
    }

    fn run(mut self) -> Result<Vec<Entity>, ReactionError> {
        let mut state = State::ExpectGroup;
        for (position, c) in self.segment.char_indices() {
            state = self.step(state, position, c)?;
        }
        match state {
            State::InPrefix => return Err(self.malformed("unterminated coefficient prefix")),
            State::InIdentifier => self.finish_group(),
            State::ExpectGroup if self.coefficient.is_some() => {
                return Err(self.malformed("coefficient prefix without identifier"));
            }
            State::ExpectGroup => {}
        }
        Ok(self.entities)
    }
}

/// Coefficient inside `{}`: plain decimal digits with at most one decimal point.
fn parse_coefficient(text: &str) -> Result<f64, String> {
    let text = text.trim();
    let digits = text.chars().filter(|c| c.is_ascii_digit()).count();
    let points = text.chars().filter(|&c| c == '.').count();
    if digits == 0 || points > 1 || digits + points != text.chars().count() {
        return Err(format!("'{}' is not a non-negative number", text));
    }
    let coefficient: f64 = text
        .parse()
        .map_err(|_| format!("'{}' is not a non-negative number", text))?;
    if !coefficient.is_finite() {
        return Err(format!("'{}' is not a finite number", text));
    }
    Ok(coefficient)
}

/// Splits one side of a reaction into entities; groups without a prefix get coefficient 1.0.
/// Empty groups ("A..B", a trailing ".") are skipped, an empty side gives no entities.
pub fn extract_coefficients(segment: &str) -> Result<Vec<Entity>, ReactionError> {
    let entities = Extractor::new(segment).run()?;
    debug!("parsed '{}' into {:?}", segment, entities);
    Ok(entities)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(segment: &str) -> Vec<(String, f64)> {
        extract_coefficients(segment)
            .unwrap()
            .into_iter()
            .map(|e| (e.identifier, e.coefficient))
            .collect()
    }

    #[test]
    fn test_default_and_explicit_coefficients() {
        assert_eq!(
            pairs("{2}C=CC.O=O"),
            vec![("C=CC".to_string(), 2.0), ("O=O".to_string(), 1.0)]
        );
        assert_eq!(pairs("CC(C)=O"), vec![("CC(C)=O".to_string(), 1.0)]);
        assert_eq!(pairs("{0.5}O=O"), vec![("O=O".to_string(), 0.5)]);
        assert_eq!(pairs("{.5}O=O"), vec![("O=O".to_string(), 0.5)]);
        assert_eq!(pairs("{0}O"), vec![("O".to_string(), 0.0)]);
    }

    #[test]
    fn test_omitted_prefix_equals_unit_prefix() {
        assert_eq!(pairs("{1}CCO.{1}O"), pairs("CCO.O"));
    }

    #[test]
    fn test_whitespace_and_empty_groups() {
        assert_eq!(
            pairs(" {3} CCO .. O "),
            vec![("CCO".to_string(), 3.0), ("O".to_string(), 1.0)]
        );
        assert!(pairs("").is_empty());
        assert!(pairs(".").is_empty());
    }

    #[test]
    fn test_multiple_prefixed_groups() {
        assert_eq!(
            pairs("{2}[Na+].{2}[Cl-].{1.5}O"),
            vec![
                ("[Na+]".to_string(), 2.0),
                ("[Cl-]".to_string(), 2.0),
                ("O".to_string(), 1.5)
            ]
        );
    }

    #[test]
    fn test_malformed_prefixes() {
        for segment in [
            "{}C", "{-1}C", "{abc}C", "{1e3}C", "{1.2.3}C", "{2C", "{2}", "{2}.O", "C{2}", "2}C",
            "{2}{3}C",
        ] {
            assert!(
                matches!(
                    extract_coefficients(segment),
                    Err(ReactionError::MalformedGroup { .. })
                ),
                "{} should be rejected",
                segment
            );
        }
    }

    #[test]
    fn test_malformed_group_is_named() {
        let err = extract_coefficients("CCO.{x}O.C").unwrap_err();
        assert_eq!(
            err,
            ReactionError::malformed("{x}O", "'x' is not a non-negative number")
        );
        let err = extract_coefficients("O.{1.5.2}CC.C").unwrap_err();
        assert_eq!(
            err,
            ReactionError::malformed("{1.5.2}CC", "'1.5.2' is not a non-negative number")
        );
        let err = extract_coefficients("{0.5C").unwrap_err();
        assert_eq!(
            err,
            ReactionError::malformed("{0.5C", "unterminated coefficient prefix")
        );
    }

    #[test]
    fn test_fractional_coefficients() {
        assert_eq!(
            pairs("CC(C)O.{0.5}O=O"),
            vec![("CC(C)O".to_string(), 1.0), ("O=O".to_string(), 0.5)]
        );
        assert_eq!(pairs("{1.5}O"), vec![("O".to_string(), 1.5)]);
        assert_eq!(pairs("{2.}O"), vec![("O".to_string(), 2.0)]);
    }
}
