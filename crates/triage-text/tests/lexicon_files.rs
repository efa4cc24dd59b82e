use std::io::Write;

use triage_text::{LexiconError, LexiconFileV1, Record, StopwordList, TextPipeline};

#[test]
fn exported_lexicon_round_trips_through_a_file() {
    let lexicon = LexiconFileV1::builtin().unwrap();
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(lexicon.to_json_pretty().unwrap().as_bytes())
        .unwrap();

    let loaded = LexiconFileV1::load(file.path()).unwrap();
    assert_eq!(loaded, lexicon);
}

#[test]
fn edited_lexicon_changes_pipeline_behaviour() {
    let mut lexicon = LexiconFileV1::builtin().unwrap();
    lexicon.cutoff_literals.push("Hormat kami".to_string());
    lexicon.domain_stopwords.push("portal".to_string());

    let pipeline = TextPipeline::new(&lexicon, &StopwordList::builtin()).unwrap();
    let cleaned = pipeline.clean(&Record::new(
        "INC9",
        "",
        Some("portal error upload Hormat kami, Divisi TI".to_string()),
    ));
    assert_eq!(cleaned.complaint_raw, "portal error upload ");
    assert_eq!(cleaned.cleaned_complaint, "error upload");
}

#[test]
fn custom_stopword_file_replaces_builtin_list() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "# tiny list\nerror").unwrap();
    let stopwords = StopwordList::load(file.path()).unwrap();
    assert_eq!(stopwords.len(), 1);

    let pipeline = TextPipeline::new(&LexiconFileV1::builtin().unwrap(), &stopwords).unwrap();
    // "bisa" is only in the built-in general list, so it survives here.
    assert_eq!(
        pipeline.normalizer().normalize("bisa error upload"),
        "bisa upload"
    );
}

#[test]
fn missing_file_reports_path() {
    let err = LexiconFileV1::load(std::path::Path::new("/nonexistent/lexicon.json")).unwrap_err();
    match err {
        LexiconError::Io { path, .. } => assert!(path.contains("lexicon.json")),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn invalid_pattern_fails_pipeline_construction() {
    let mut lexicon = LexiconFileV1::builtin().unwrap();
    lexicon.sensitive_field_patterns.push("No\\.(".to_string());
    let err = TextPipeline::new(&lexicon, &StopwordList::builtin()).unwrap_err();
    assert!(matches!(
        err,
        LexiconError::Pattern {
            field: "sensitive_field_patterns",
            ..
        }
    ));
}
