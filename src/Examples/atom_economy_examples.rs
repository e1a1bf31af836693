use crate::AtomEconomy::calculator::{
    AtomEconomyResult, CalculationFailure, calculate_atom_economy,
};
use crate::AtomEconomy::report::render_report;
use crate::settings::Settings;

/// Reference routes to acetone and isopropanol
pub fn ae_examples(task: usize) -> Result<AtomEconomyResult, CalculationFailure> {
    let settings = Settings::default();
    let reactions = match task {
        0 => {
            // HOCK PROCESS: acid cleavage of cumene hydroperoxide, phenol is left as byproduct
            "CC(C)(OO)c1ccccc1>acid>CC(C)=O"
        }
        1 => {
            // DEHYDROGENATION OF ISOPROPANOL
            "CC(C)O>Cu>CC(C)=O"
        }
        2 => {
            // WACKER-TYPE OXIDATION OF PROPENE
            "{2}C=CC.O=O>Pd/Cu>{2}CC(C)=O"
        }
        _ => {
            // TWO STEPS: acetone from the Hock process is hydrogenated, acetone is an intermediate
            "CC(C)(OO)c1ccccc1>acid>CC(C)=O\nCC(C)=O>H2>CC(C)O"
        }
    };
    println!("{}", reactions);
    let result = calculate_atom_economy(reactions, &settings)?;
    println!("{}", render_report(&result));
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_all_examples() {
        let expected = [38.16, 96.65, 100.0, 39.49];
        for (task, atom_economy) in expected.into_iter().enumerate() {
            let result = ae_examples(task).unwrap();
            assert_relative_eq!(result.rounded(), atom_economy, epsilon = 1e-9);
        }
    }
}
