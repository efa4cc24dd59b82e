use serde::{Deserialize, Serialize};

/// One helpdesk ticket as it arrives in the input table.
///
/// Field names follow the table headers so CSV rows deserialize directly.
/// An empty `Notes` cell becomes `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    #[serde(rename = "Incident Number")]
    pub incident_id: String,
    #[serde(rename = "Summary", default)]
    pub summary: String,
    #[serde(rename = "Notes", default)]
    pub notes: Option<String>,
}

impl Record {
    pub fn new(incident_id: impl Into<String>, summary: impl Into<String>, notes: Option<String>) -> Self {
        Self {
            incident_id: incident_id.into(),
            summary: summary.into(),
            notes,
        }
    }

    /// A complaint typed in by hand: no incident number, no summary.
    pub fn manual(text: impl Into<String>) -> Self {
        Self::new("Manual", "", Some(text.into()))
    }
}

/// A record after the text stages. Every field is derived from the ones
/// before it; the input record is carried unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanedRecord {
    pub record: Record,
    /// Notes after boilerplate stripping and redaction.
    pub complaint_raw: String,
    /// `complaint_raw` joined with the summary, subject prefix removed.
    pub complaint: String,
    pub cleaned_complaint: String,
}
