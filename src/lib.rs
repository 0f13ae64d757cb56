//! Bond Rotation - estimates whether redeeming a savings bond and buying a
//! new one with a higher fixed rate pays off
//!
//! This library provides:
//! - Holdings CSV loading with per-row validation
//! - Per-bond rotation analysis (penalty, taxes, compounded benefit, break-even)
//! - Batch analysis and portfolio summary
//! - Plain-text reporting

pub mod bond;
pub mod parameters;
pub mod rotation;
pub mod batch;
pub mod report;
pub mod error;

// Re-export commonly used types
pub use bond::{BondInput, load_bonds, load_bonds_from_reader, LoadReport};
pub use parameters::PolicyParameters;
pub use rotation::{RotationCalculator, RotationResult, RotationStatus, BreakEven, Recommendation};
pub use batch::{BatchRunner, BatchResult, BatchSummary};
pub use error::{LoadError, RowError, ParameterError};
