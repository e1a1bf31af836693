/// command line front end: argument parsing, logger set-up and exit codes
pub mod cli_main;
