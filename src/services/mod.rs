pub mod import;

pub use import::{ImportCandidate, ImportService, Provider};
