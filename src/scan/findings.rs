use parking_lot::Mutex;
use serde::Serialize;

use crate::severity::Severity;

/// One recorded match between a job's check and the observed response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    pub url: String,
    pub endpoint: String,
    #[serde(rename = "checkName")]
    pub check_name: String,
    pub severity: Severity,
    pub remediation: String,
}

/// Append-only finding collector shared by the scan workers.
///
/// A single mutex around the vector is all the synchronization the scan
/// needs: workers only append, and the snapshot is taken after they join.
#[derive(Debug, Default)]
pub struct FindingStore {
    inner: Mutex<Vec<Finding>>,
}

impl FindingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self, finding: Finding) {
        self.inner.lock().push(finding);
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    /// Snapshot sorted by URL, then endpoint. The sort is stable so equal
    /// keys keep insertion order and repeated runs diff cleanly.
    pub fn sorted(&self) -> Vec<Finding> {
        let mut findings = self.inner.lock().clone();
        findings.sort_by(|a, b| a.url.cmp(&b.url).then_with(|| a.endpoint.cmp(&b.endpoint)));
        findings
    }
}
