use std::io::Write;

use crate::scan::Finding;
use crate::severity::Severity;
use crate::signatures::Signatures;

const COLOR_RESET: &str = "\x1b[0m";
const COLOR_RED: &str = "\x1b[31m";
const COLOR_GREEN: &str = "\x1b[32m";
const COLOR_YELLOW: &str = "\x1b[33m";
const COLOR_CYAN: &str = "\x1b[36m";

fn colored_severity(severity: Severity) -> String {
    let color = match severity {
        Severity::High => COLOR_RED,
        Severity::Medium => COLOR_YELLOW,
        Severity::Low => COLOR_GREEN,
        Severity::Informational => COLOR_CYAN,
    };
    format!("{color}{severity}{COLOR_RESET}")
}

/// Renders the findings as an aligned text table on `w`.
pub fn write_table(findings: &[Finding], w: &mut dyn Write) -> anyhow::Result<()> {
    let rows: Vec<[String; 5]> = findings
        .iter()
        .map(|f| {
            [
                f.url.clone(),
                f.endpoint.clone(),
                f.severity.to_string(),
                f.check_name.clone(),
                f.remediation.clone(),
            ]
        })
        .collect();
    let widths = column_widths(&["URL", "Endpoint", "Severity", "Check", "Remediation"], &rows);

    write_row(
        w,
        &widths,
        &[
            "URL".to_string(),
            "Endpoint".to_string(),
            "Severity".to_string(),
            "Check".to_string(),
            "Remediation".to_string(),
        ],
        None,
    )?;
    write_separator(w, &widths)?;
    for (finding, row) in findings.iter().zip(&rows) {
        write_row(w, &widths, row, Some(colored_severity(finding.severity)))?;
    }
    Ok(())
}

/// Lists every check of the catalog, optionally restricted to one severity.
/// Returns the number of listed checks.
pub fn write_checks_table(
    signatures: &Signatures,
    severity: Option<Severity>,
    w: &mut dyn Write,
) -> anyhow::Result<usize> {
    let mut rows: Vec<[String; 4]> = Vec::new();
    for plugin in &signatures.plugins {
        for check in &plugin.checks {
            if severity.is_some_and(|s| s != check.severity) {
                continue;
            }
            rows.push([
                plugin.endpoints.join(", "),
                check.name.clone(),
                check.severity.to_string(),
                check.description.clone(),
            ]);
        }
    }
    let widths = column_widths(&["Endpoint", "Check", "Severity", "Description"], &rows);

    write_row(
        w,
        &widths,
        &[
            "Endpoint".to_string(),
            "Check".to_string(),
            "Severity".to_string(),
            "Description".to_string(),
        ],
        None,
    )?;
    write_separator(w, &widths)?;
    for row in &rows {
        write_row(w, &widths, row, None)?;
    }
    write_separator(w, &widths)?;
    writeln!(w, "Total checks: {}", rows.len())?;
    Ok(rows.len())
}

fn column_widths<const N: usize>(headers: &[&str; N], rows: &[[String; N]]) -> [usize; N] {
    let mut widths = headers.map(str::len);
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.len());
        }
    }
    widths
}

fn write_row<const N: usize>(
    w: &mut dyn Write,
    widths: &[usize; N],
    row: &[String; N],
    severity_override: Option<String>,
) -> anyhow::Result<()> {
    let mut cells = Vec::with_capacity(N);
    for (i, (cell, &width)) in row.iter().zip(widths).enumerate() {
        // ANSI escapes throw off padding, pad on the plain text first.
        let padded = format!("{cell:<width$}");
        match (&severity_override, cell) {
            (Some(colored), plain) if i == 2 => {
                cells.push(padded.replace(plain.as_str(), colored.as_str()));
            }
            _ => cells.push(padded),
        }
    }
    writeln!(w, "| {} |", cells.join(" | "))?;
    Ok(())
}

fn write_separator<const N: usize>(w: &mut dyn Write, widths: &[usize; N]) -> anyhow::Result<()> {
    let line: Vec<String> = widths.iter().map(|width| "-".repeat(*width)).collect();
    writeln!(w, "|-{}-|", line.join("-|-"))?;
    Ok(())
}
