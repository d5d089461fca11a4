pub mod writer_csv;
pub mod writer_json;
pub mod writer_table;

pub use writer_csv::write_csv;
pub use writer_json::write_json;
pub use writer_table::{write_checks_table, write_table};

use std::io::Write;
use std::path::PathBuf;

use crate::scan::Finding;

type ExporterFn = fn(&[Finding], &mut dyn Write) -> anyhow::Result<()>;

/// One named export format.
pub struct Exporter {
    pub name: &'static str,
    pub extension: &'static str,
    write: ExporterFn,
}

impl Exporter {
    pub fn write(&self, findings: &[Finding], w: &mut dyn Write) -> anyhow::Result<()> {
        (self.write)(findings, w)
    }
}

/// Explicit registry of exporters, built at startup and passed where needed
/// so tests can substitute their own set without global state.
pub struct ExporterRegistry {
    exporters: Vec<Exporter>,
}

impl ExporterRegistry {
    pub fn standard() -> Self {
        Self {
            exporters: vec![
                Exporter {
                    name: "csv",
                    extension: "csv",
                    write: write_csv,
                },
                Exporter {
                    name: "json",
                    extension: "json",
                    write: write_json,
                },
            ],
        }
    }

    pub fn get(&self, name: &str) -> Option<&Exporter> {
        self.exporters.iter().find(|e| e.name == name)
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.exporters.iter().map(|e| e.name).collect()
    }

    /// Exports `findings` in `format` to `<filename>.<ext>` and returns the
    /// written path.
    pub fn export_to_file(
        &self,
        format: &str,
        filename: &str,
        findings: &[Finding],
    ) -> anyhow::Result<PathBuf> {
        let exporter = self
            .get(format)
            .ok_or_else(|| anyhow::anyhow!("unsupported exporter: {format}"))?;
        let path = PathBuf::from(format!("{filename}.{}", exporter.extension));
        let mut file = std::fs::File::create(&path)?;
        exporter.write(findings, &mut file)?;
        Ok(path)
    }
}
