//! Ticket tables in and out (CSV).
//!
//! Every input column is written back unchanged, followed by the derived
//! columns. An input column sharing a derived column's name is replaced.

use anyhow::{anyhow, Context, Result};
use csv::{Reader, StringRecord, Writer};
use serde::Serialize;
use std::fs::File;
use std::io::{self, Read, Write};
use std::path::Path;

use triage_route::{BatchReport, TopicCounts};
use triage_text::{CleanedRecord, Record};

const CLEANED_COLUMNS: [&str; 2] = ["Complaint", "Cleaned_Complaint"];
const CLASSIFIED_COLUMNS: [&str; 4] = [
    "Complaint",
    "Cleaned_Complaint",
    "Topic_Name",
    "Topic_Name_Count",
];

/// Rows as read, plus the typed view the pipeline works on.
#[derive(Debug, Clone)]
pub struct TicketTable {
    headers: StringRecord,
    rows: Vec<StringRecord>,
    pub records: Vec<Record>,
}

#[derive(Serialize)]
struct CountRow<'a> {
    #[serde(rename = "Topic_Name")]
    topic_name: &'a str,
    #[serde(rename = "Count")]
    count: usize,
}

impl TicketTable {
    pub fn read(path: &Path) -> Result<Self> {
        let file =
            File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
        Self::read_from(file)
            .with_context(|| format!("failed to read records from {}", path.display()))
    }

    /// Rows need an `Incident Number` column; `Summary` and `Notes` may be absent.
    pub fn read_from<R: Read>(input: R) -> Result<Self> {
        let mut reader = Reader::from_reader(input);
        let headers = reader.headers()?.clone();
        if !headers.iter().any(|h| h == "Incident Number") {
            return Err(anyhow!(
                "missing column \"Incident Number\" (found: {})",
                headers.iter().collect::<Vec<_>>().join(", ")
            ));
        }

        let mut rows = Vec::new();
        let mut records = Vec::new();
        for (i, row) in reader.records().enumerate() {
            // Header is line 1.
            let line = i + 2;
            let row = row.with_context(|| format!("bad row at line {line}"))?;
            let record: Record = row
                .deserialize(Some(&headers))
                .with_context(|| format!("bad row at line {line}"))?;
            rows.push(row);
            records.push(record);
        }
        Ok(Self {
            headers,
            rows,
            records,
        })
    }

    pub fn write_cleaned<W: Write>(&self, out: W, cleaned: &[CleanedRecord]) -> Result<()> {
        let derived = cleaned
            .iter()
            .map(|c| vec![c.complaint.clone(), c.cleaned_complaint.clone()]);
        self.write_with(out, &CLEANED_COLUMNS, derived)
    }

    pub fn write_classified<W: Write>(&self, out: W, report: &BatchReport) -> Result<()> {
        let derived = report.records.iter().map(|r| {
            vec![
                r.cleaned.complaint.clone(),
                r.cleaned.cleaned_complaint.clone(),
                r.topic_label.as_str().to_string(),
                r.topic_count.to_string(),
            ]
        });
        self.write_with(out, &CLASSIFIED_COLUMNS, derived)
    }

    fn write_with<W, I>(&self, out: W, columns: &[&str], derived: I) -> Result<()>
    where
        W: Write,
        I: Iterator<Item = Vec<String>>,
    {
        let keep: Vec<usize> = self
            .headers
            .iter()
            .enumerate()
            .filter(|(_, h)| !columns.contains(h))
            .map(|(i, _)| i)
            .collect();

        let mut writer = Writer::from_writer(out);
        writer.write_record(
            keep.iter()
                .map(|&i| &self.headers[i])
                .chain(columns.iter().copied()),
        )?;
        for (row, extra) in self.rows.iter().zip(derived) {
            writer.write_record(
                keep.iter()
                    .map(|&i| row.get(i).unwrap_or(""))
                    .chain(extra.iter().map(String::as_str)),
            )?;
        }
        writer.flush()?;
        Ok(())
    }
}

/// Open `path` for writing, or stdout when `None`.
pub fn output(path: Option<&Path>) -> Result<Box<dyn Write>> {
    Ok(match path {
        Some(p) => Box::new(
            File::create(p).with_context(|| format!("failed to create {}", p.display()))?,
        ),
        None => Box::new(io::stdout().lock()),
    })
}

/// Counts as CSV (`Topic_Name,Count`) for `.csv` paths, JSON otherwise.
pub fn write_counts(path: &Path, counts: &TopicCounts) -> Result<()> {
    let is_csv = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("csv"));

    if is_csv {
        let file =
            File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
        let mut writer = Writer::from_writer(file);
        for (label, count) in counts.ranked() {
            writer.serialize(CountRow {
                topic_name: label.as_str(),
                count,
            })?;
        }
        writer.flush()?;
    } else {
        std::fs::write(path, serde_json::to_string_pretty(counts)?)
            .with_context(|| format!("failed to write {}", path.display()))?;
    }
    Ok(())
}
