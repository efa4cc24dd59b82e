//! Text stages composed: strip → redact → combine → normalize.

use rayon::prelude::*;

use crate::lexicon::{LexiconError, LexiconFileV1, StopwordList};
use crate::normalize::Normalizer;
use crate::record::{CleanedRecord, Record};
use crate::redact::Redactor;
use crate::strip::{BoilerplateStripper, COMPLAINT_NOT_FOUND};

#[derive(Debug, Clone)]
pub struct TextPipeline {
    stripper: BoilerplateStripper,
    redactor: Redactor,
    normalizer: Normalizer,
}

impl TextPipeline {
    pub fn new(lexicon: &LexiconFileV1, stopwords: &StopwordList) -> Result<Self, LexiconError> {
        Ok(Self {
            stripper: BoilerplateStripper::from_lexicon(lexicon)?,
            redactor: Redactor::from_lexicon(lexicon)?,
            normalizer: Normalizer::new(lexicon, stopwords)?,
        })
    }

    /// Pipeline over the built-in lexicon and stopword list.
    pub fn builtin() -> Result<Self, LexiconError> {
        Self::new(&LexiconFileV1::builtin()?, &StopwordList::builtin())
    }

    pub fn stripper(&self) -> &BoilerplateStripper {
        &self.stripper
    }

    pub fn redactor(&self) -> &Redactor {
        &self.redactor
    }

    pub fn normalizer(&self) -> &Normalizer {
        &self.normalizer
    }

    /// Complaint body of the notes: stripped, sensitive fields removed, then
    /// cut at denylist literals. A body left empty before the cut-offs becomes
    /// the "not found" sentinel.
    pub fn extract_complaint(&self, notes: Option<&str>) -> String {
        let stripped = self.stripper.strip(notes);
        let body = self.redactor.remove_sensitive(&stripped);
        if body.trim().is_empty() {
            return COMPLAINT_NOT_FOUND.to_string();
        }
        self.redactor.cut_off(&body)
    }

    pub fn clean(&self, record: &Record) -> CleanedRecord {
        let complaint_raw = self.extract_complaint(record.notes.as_deref());
        let complaint = self.redactor.combine(&complaint_raw, &record.summary);
        let cleaned_complaint = self.normalizer.normalize(&complaint);
        CleanedRecord {
            record: record.clone(),
            complaint_raw,
            complaint,
            cleaned_complaint,
        }
    }

    /// Clean every record. Rows are independent, so they fan out across the
    /// rayon pool; output order matches input order.
    pub fn clean_batch(&self, records: &[Record]) -> Vec<CleanedRecord> {
        let cleaned: Vec<CleanedRecord> = records.par_iter().map(|r| self.clean(r)).collect();
        let empty = cleaned.iter().filter(|c| c.cleaned_complaint.is_empty()).count();
        tracing::info!(records = cleaned.len(), empty, "cleaned batch");
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cleans_forwarded_complaint_end_to_end() {
        let pipeline = TextPipeline::builtin().unwrap();
        let record = Record::new(
            "INC0001",
            "reset password",
            Some("Dear Bapak/Ibu Helpdesk OJK, saya lupa password. Best regards, John".to_string()),
        );
        let cleaned = pipeline.clean(&record);
        assert_eq!(cleaned.complaint_raw, ", saya lupa password.");
        assert_eq!(cleaned.complaint, ", saya lupa password. reset password");
        assert_eq!(cleaned.cleaned_complaint, "lupa password reset password");
        assert_eq!(cleaned.record, record);
    }

    #[test]
    fn missing_notes_flow_through_sentinel() {
        let pipeline = TextPipeline::builtin().unwrap();
        let cleaned = pipeline.clean(&Record::new("INC0002", "", None));
        assert_eq!(cleaned.complaint_raw, COMPLAINT_NOT_FOUND);
        assert_eq!(cleaned.cleaned_complaint, "bagian komplain ditemukan");
    }

    #[test]
    fn body_emptied_by_stripping_falls_back_to_sentinel() {
        let pipeline = TextPipeline::builtin().unwrap();
        let cleaned = pipeline.clean(&Record::new("INC0003", "", Some("Best regards, John".to_string())));
        assert_eq!(cleaned.complaint_raw, COMPLAINT_NOT_FOUND);
        assert_eq!(cleaned.cleaned_complaint, "bagian komplain ditemukan");
    }

    #[test]
    fn body_emptied_by_sensitive_fields_falls_back_to_sentinel() {
        let pipeline = TextPipeline::builtin().unwrap();
        let cleaned = pipeline.clean(&Record::new("INC0004", "akses", Some("Email: a@b.c".to_string())));
        assert_eq!(cleaned.complaint_raw, COMPLAINT_NOT_FOUND);
        assert_eq!(cleaned.complaint, "Bagian komplain tidak ditemukan. akses");
        assert_eq!(cleaned.cleaned_complaint, "bagian komplain ditemukan akses");
    }

    #[test]
    fn body_emptied_by_cut_off_stays_empty() {
        let pipeline = TextPipeline::builtin().unwrap();
        let cleaned = pipeline.clean(&Record::new("INC0005", "", Some("Tembusan direksi".to_string())));
        assert_eq!(cleaned.complaint_raw, "");
        assert_eq!(cleaned.cleaned_complaint, "");
    }

    #[test]
    fn batch_preserves_order() {
        let pipeline = TextPipeline::builtin().unwrap();
        let records: Vec<Record> = (0..50)
            .map(|i| Record::new(format!("INC{i:04}"), format!("summary {i}"), None))
            .collect();
        let cleaned = pipeline.clean_batch(&records);
        let ids: Vec<&str> = cleaned.iter().map(|c| c.record.incident_id.as_str()).collect();
        let expected: Vec<String> = (0..50).map(|i| format!("INC{i:04}")).collect();
        assert_eq!(ids, expected.iter().map(String::as_str).collect::<Vec<_>>());
    }
}
