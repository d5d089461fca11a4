pub mod cli;
pub mod config;
pub mod errors;
pub mod fetch;
pub mod output;
pub mod runner;
pub mod scan;
pub mod severity;
pub mod signatures;

// re-export the types most callers need
pub use crate::scan::{Finding, ScanReport, Scanner};
pub use crate::severity::Severity;
pub use crate::signatures::Signatures;
