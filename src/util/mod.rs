pub mod dna;
pub mod symbol;
