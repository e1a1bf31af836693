use crate::AtomEconomy::calculator::calculate_atom_economy;
use crate::AtomEconomy::report::{numeric_output, render_failure, render_report};
use crate::settings::Settings;
use clap::Parser;
use log::{LevelFilter, debug};
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};

/// exit code when the settings file cannot be used
pub const SETTINGS_EXIT_CODE: i32 = 5;

/// Calculate Atom Economy for reactions using Reaction SMILES.
#[derive(Parser, PartialEq, Debug)]
#[command(name = "atom-eco", version, about, long_about = None)]
pub struct Cli {
    /// Reaction SMILES 'reactants>agents>products', one reaction per line; reactants produced by
    /// an earlier line are treated as intermediates
    pub reactions: String,

    /// Print only the atom economy percentage
    #[clap(long)]
    pub numeric: bool,
}

/// Text for stdout and the process exit code of one run
#[derive(Debug, Clone, PartialEq)]
pub struct Execution {
    pub output: String,
    pub exit_code: i32,
}

/// Report or bare percentage for the reactions on the command line. Rejected lines and skipped
/// entities are part of the output in both modes, also when the run fails.
pub fn execute(cli: &Cli, settings: &Settings) -> Execution {
    match calculate_atom_economy(&cli.reactions, settings) {
        Ok(result) => Execution {
            output: if cli.numeric {
                numeric_output(&result)
            } else {
                render_report(&result)
            },
            exit_code: 0,
        },
        Err(failure) => Execution {
            output: render_failure(&failure),
            exit_code: failure.error.exit_code(),
        },
    }
}

fn init_logger(level: LevelFilter) {
    // a second initialisation only fails, the first logger stays
    let _ = TermLogger::init(
        level,
        Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    );
}

/// Runs the tool and returns the process exit code
pub fn run(cli: Cli) -> i32 {
    let settings = match Settings::load() {
        Ok(settings) => settings,
        Err(e) => {
            init_logger(LevelFilter::Warn);
            println!("Error: {}", e);
            return SETTINGS_EXIT_CODE;
        }
    };
    init_logger(settings.level_filter().unwrap_or(LevelFilter::Warn));
    debug!("{:?}", settings);
    let execution = execute(&cli, &settings);
    print!("{}", execution.output);
    execution.exit_code
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AtomEconomy::calculator::InvalidEntityPolicy;
    use crate::AtomEconomy::errors::ReactionError;

    #[test]
    fn test_parse_arguments() {
        let cli = Cli::try_parse_from(["atom-eco", "CC(C)O>Cu>CC(C)=O", "--numeric"]).unwrap();
        assert_eq!(
            cli,
            Cli {
                reactions: "CC(C)O>Cu>CC(C)=O".to_string(),
                numeric: true
            }
        );
        let cli = Cli::try_parse_from(["atom-eco", "CC(C)O>Cu>CC(C)=O"]).unwrap();
        assert!(!cli.numeric);
    }

    #[test]
    fn test_usage_errors() {
        let err = Cli::try_parse_from(["atom-eco"]).unwrap_err();
        assert_eq!(err.exit_code(), 2);
        let err = Cli::try_parse_from(["atom-eco", "A>>B", "--verbose"]).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_numeric_and_report_output() {
        let settings = Settings::default();
        let mut cli = Cli {
            reactions: "CC(C)(OO)c1ccccc1>acid>CC(C)=O".to_string(),
            numeric: true,
        };
        let execution = execute(&cli, &settings);
        assert_eq!(execution.output, "38.2\n");
        assert_eq!(execution.exit_code, 0);
        cli.numeric = false;
        let report = execute(&cli, &settings).output;
        assert!(report.contains("REACTANTS"));
        assert!(report.contains("Atom Economy: 38.2%"));
    }

    #[test]
    fn test_numeric_output_lists_rejected_and_skipped() {
        let cli = Cli {
            reactions: "CC(C)O.Xq>Cu>CC(C)=O\nnot a reaction".to_string(),
            numeric: true,
        };
        let execution = execute(&cli, &Settings::default());
        assert_eq!(execution.exit_code, 0);
        assert!(execution.output.contains("Rejected lines:\nline 2: "));
        assert!(execution.output.contains("Skipped entities:\nInvalid SMILES 'Xq'"));
        // the percentage stays the last line
        let last = execution.output.lines().last().unwrap();
        assert!(last.parse::<f64>().is_ok());
    }

    #[test]
    fn test_fatal_errors_map_to_exit_codes() {
        let settings = Settings::default();
        let cli = Cli {
            reactions: "not a reaction".to_string(),
            numeric: true,
        };
        let execution = execute(&cli, &settings);
        assert_eq!(execution.exit_code, 4);
        assert!(execution.output.starts_with("Rejected lines:\nline 1: "));
        let error_line = format!("Error: {}\n", ReactionError::ZeroReactantMass);
        assert!(execution.output.ends_with(&error_line));

        let settings = Settings {
            invalid_entities: InvalidEntityPolicy::Abort,
            ..Settings::default()
        };
        let cli = Cli {
            reactions: "CC(C)O.Xx>Cu>CC(C)=O\nA>B".to_string(),
            numeric: false,
        };
        let execution = execute(&cli, &settings);
        assert_eq!(execution.exit_code, 3);
        assert!(execution.output.contains("line 2: "));
        assert!(execution.output.contains("Error: Invalid SMILES 'Xx'"));
    }
}
