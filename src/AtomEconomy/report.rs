use crate::AtomEconomy::calculator::{
    AtomEconomyResult, CalculationFailure, RejectedLine, ResolvedEntity,
};
use crate::AtomEconomy::errors::ReactionError;
use prettytable::{Table, row};
use std::fmt::Write;

/// percentage as printed in both output modes
pub fn format_percentage(atom_economy: f64) -> String {
    format!("{:.1}", atom_economy)
}

/// Numeric output mode: the percentage on the last line, after any rejected lines or skipped
/// entities
pub fn numeric_output(result: &AtomEconomyResult) -> String {
    let mut out = render_diagnostics(&result.rejected_lines, &result.skipped);
    let _ = writeln!(out, "{}", format_percentage(result.atom_economy));
    out
}

/// Lines rejected by the parser and entities rejected by the toolkit, empty when there are none
pub fn render_diagnostics(rejected_lines: &[RejectedLine], skipped: &[ReactionError]) -> String {
    let mut out = String::new();
    if !rejected_lines.is_empty() {
        out.push_str("Rejected lines:\n");
        for rejected in rejected_lines {
            let _ = writeln!(out, "line {}: {}", rejected.line_number, rejected.error);
        }
    }
    if !skipped.is_empty() {
        out.push_str("Skipped entities:\n");
        for error in skipped {
            let _ = writeln!(out, "{}", error);
        }
    }
    out
}

/// What went wrong before the run ended without an atom economy
pub fn render_failure(failure: &CalculationFailure) -> String {
    let mut out = render_diagnostics(&failure.rejected_lines, &failure.skipped);
    let _ = writeln!(out, "Error: {}", failure.error);
    out
}

fn entity_table(entities: &[ResolvedEntity]) -> Table {
    let mut table = Table::new();
    table.add_row(row!["SMILES", "Molecular Formula", "Molecular Weight", "Coefficient"]);
    for e in entities {
        table.add_row(row![
            e.canonical,
            e.formula,
            format!("{:.2} g/mol", e.mass),
            format!("{}", e.entity.coefficient)
        ]);
    }
    table
}

/// Human readable breakdown: problems found while reading the input, one table per group and
/// the final atom economy line
pub fn render_report(result: &AtomEconomyResult) -> String {
    let mut out = render_diagnostics(&result.rejected_lines, &result.skipped);
    if !result.excluded_intermediates.is_empty() {
        let names: Vec<&str> = result
            .excluded_intermediates
            .iter()
            .map(|e| e.identifier.as_str())
            .collect();
        let _ = writeln!(out, "Excluded intermediates: {}", names.join(", "));
    }
    out.push_str("REACTANTS\n");
    let _ = write!(out, "{}", entity_table(&result.reactants));
    out.push_str("PRODUCTS\n");
    let _ = write!(out, "{}", entity_table(&result.products));
    let _ = writeln!(out, "Atom Economy: {}%", format_percentage(result.atom_economy));
    out
}
