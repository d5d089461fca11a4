pub mod coordinator;
pub mod findings;
pub mod partition;

pub use coordinator::{ScanReport, Scanner};
pub use findings::{Finding, FindingStore};
pub use partition::{partition, Job};
