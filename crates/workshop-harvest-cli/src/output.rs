//! Rendering of the final report.
//!
//! The config lines (or JSON) go to stdout so they can be piped or pasted;
//! the human summary goes to stderr.

use workshop_harvest::HarvestReport;

/// Text written to stdout for `report`.
pub fn render(report: &HarvestReport, json: bool) -> anyhow::Result<String> {
    if json {
        return Ok(serde_json::to_string_pretty(report)?);
    }
    Ok(report.identifiers.config_lines().join("\n"))
}

/// One-line account of what happened during the run.
pub fn summary(report: &HarvestReport) -> String {
    let mut line = format!(
        "Processed {} item page{}",
        report.processed,
        if report.processed == 1 { "" } else { "s" }
    );
    if report.modpacks_expanded > 0 {
        line.push_str(&format!(", expanded {} modpack(s)", report.modpacks_expanded));
    }
    if report.fetch_failures > 0 {
        line.push_str(&format!(", {} fetch failure(s)", report.fetch_failures));
    }
    if report.missing_descriptions > 0 {
        line.push_str(&format!(
            ", {} page(s) without description",
            report.missing_descriptions
        ));
    }
    if report.interrupted {
        line.push_str(" (interrupted)");
    }
    line
}
