/// worked atom economy calculations for acetone routes
pub mod atom_economy_examples;
