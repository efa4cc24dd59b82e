//! Human-readable reports.

use colored::Colorize;
use std::io::{self, Write};

use triage_route::{BatchReport, TopicCounts, TopicLabel};
use triage_text::CleanedRecord;

pub const PREVIEW_ROWS: usize = 4;
const RULE_WIDTH: usize = 135;

/// First rows of the cleaned data: incident, summary, cleaned text.
pub fn preview(out: &mut dyn Write, cleaned: &[CleanedRecord]) -> io::Result<()> {
    writeln!(out, "{}", "Preview".green().bold())?;
    writeln!(out, "Incident Number\tSummary\tCleaned_Complaint")?;
    for c in cleaned.iter().take(PREVIEW_ROWS) {
        writeln!(
            out,
            "{}\t{}\t{}",
            c.record.incident_id, c.record.summary, c.cleaned_complaint
        )?;
    }
    if cleaned.len() > PREVIEW_ROWS {
        writeln!(out, "{}", format!("... {} more", cleaned.len() - PREVIEW_ROWS).dimmed())?;
    }
    writeln!(out)
}

/// Label counts, in label order.
pub fn distribution(out: &mut dyn Write, counts: &TopicCounts) -> io::Result<()> {
    writeln!(out, "{}", "Topic distribution".green().bold())?;
    let width = counts
        .iter()
        .map(|(label, _)| label.as_str().len())
        .max()
        .unwrap_or(0);
    for (label, count) in counts.iter() {
        let name = format!("{:<width$}", label.as_str());
        let name = if label.is_sentinel() {
            name.yellow()
        } else {
            name.normal()
        };
        writeln!(out, "  {name}  {count}")?;
    }
    writeln!(out, "  {} {}", "total".bold(), counts.total())?;
    writeln!(out)
}

/// Full complaint text per incident, optionally limited to one label.
pub fn listing(
    out: &mut dyn Write,
    report: &BatchReport,
    topic: Option<TopicLabel>,
) -> io::Result<()> {
    let heading = match topic {
        Some(t) => format!("Complaints: {t}"),
        None => "Complaints: all topics".to_string(),
    };
    writeln!(out, "{}", heading.green().bold())?;

    let rule = "=".repeat(RULE_WIDTH);
    for r in report.filter_topic(topic) {
        writeln!(out, "{rule}")?;
        writeln!(out, "{}: {}", "Incident Number".bold(), r.cleaned.record.incident_id)?;
        writeln!(out, "{}: {}", "Complaint".bold(), r.cleaned.complaint)?;
        writeln!(out, "{rule}")?;
        writeln!(out)?;
    }
    Ok(())
}
