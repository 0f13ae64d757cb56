//! Bond data structures and holdings loading

mod data;
pub mod loader;

pub use data::BondInput;
pub use loader::{load_bonds, load_bonds_from_reader, LoadReport, SkippedRow};
