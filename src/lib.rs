#[allow(non_snake_case)]
pub mod AtomEconomy;
#[allow(non_snake_case)]
pub mod Examples;
#[allow(non_snake_case)]
pub mod Toolkit;
pub mod cli;
pub mod settings;
