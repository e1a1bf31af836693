use AtomEco::cli::cli_main::{Cli, run};
use clap::Parser;

pub fn main() {
    let cli = Cli::parse();
    std::process::exit(run(cli));
}
