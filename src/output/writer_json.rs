use std::io::Write;

use crate::scan::Finding;

pub fn write_json(findings: &[Finding], w: &mut dyn Write) -> anyhow::Result<()> {
    serde_json::to_writer(w, findings)?;
    Ok(())
}
