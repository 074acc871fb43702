//! Runs the subprocess strategy and the full validate/save path against a
//! stand-in `espeak-ng` shell script.
#![cfg(unix)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::PathBuf;
use std::sync::OnceLock;
use std::time::Duration;

use g2pcheck::availability::is_reference_tool_available;
use g2pcheck::reference::{ProcessStrategy, ReferenceStrategy, StrategyOutcome};
use g2pcheck::{
    LanguageRegistry, ReferenceAdapter, ReferenceStore, Transcription, Validator,
};

const FAKE_ESPEAK: &str = r#"#!/bin/sh
if [ "$1" = "--version" ]; then
    echo "eSpeak NG text-to-speech: 1.51"
    exit 0
fi
# -v <dialect> --ipa -q <text>
case "$5" in
    kaputt) echo "voice not found" >&2; exit 1 ;;
    langsam) sleep 5 ;;
    leer) ;;
    *) printf '  %s/%s\n' "$2" "$5" ;;
esac
"#;

fn fake_espeak() -> &'static PathBuf {
    static PATH: OnceLock<PathBuf> = OnceLock::new();
    PATH.get_or_init(|| {
        let dir = tempfile::tempdir().unwrap().keep();
        let path = dir.join("espeak-ng");
        fs::write(&path, FAKE_ESPEAK).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        path
    })
}

fn strategy(timeout: Duration) -> ProcessStrategy {
    ProcessStrategy::new(fake_espeak(), timeout).unwrap()
}

fn failure_reason(outcome: StrategyOutcome) -> String {
    match outcome {
        StrategyOutcome::Done(Transcription::Failed(reason)) => reason,
        other => panic!("expected a failure, got {:?}", other),
    }
}

#[test]
fn version_query_marks_tool_available() {
    assert!(is_reference_tool_available(
        fake_espeak(),
        Duration::from_secs(5)
    ));
}

#[test]
fn passes_dialect_and_trims_output() {
    let outcome = strategy(Duration::from_secs(5)).phonemize("Guten", "de");
    assert_eq!(
        outcome,
        StrategyOutcome::Done(Transcription::Ipa("de/Guten".into()))
    );
}

#[test]
fn keeps_non_ascii_intact() {
    let outcome = strategy(Duration::from_secs(5)).phonemize("안녕", "ko");
    assert_eq!(
        outcome,
        StrategyOutcome::Done(Transcription::Ipa("ko/안녕".into()))
    );
}

#[test]
fn non_zero_exit_is_a_failure_with_stderr() {
    let reason = failure_reason(strategy(Duration::from_secs(5)).phonemize("kaputt", "de"));
    assert!(reason.contains("voice not found"), "{reason}");
}

#[test]
fn empty_output_is_a_failure() {
    let reason = failure_reason(strategy(Duration::from_secs(5)).phonemize("leer", "de"));
    assert!(reason.contains("empty output"), "{reason}");
}

#[test]
fn hung_process_times_out() {
    let reason = failure_reason(strategy(Duration::from_millis(200)).phonemize("langsam", "de"));
    assert!(reason.contains("timed out"), "{reason}");
}

#[test]
fn guten_lands_in_the_de_reference_file() {
    let registry = LanguageRegistry::builtin();
    let adapter = ReferenceAdapter::new(vec![Box::new(strategy(Duration::from_secs(5)))]);
    let validator = Validator::new(&registry, adapter).with_sample(1);

    let report = validator.validate("de", None, &mut std::io::sink());
    assert_eq!(report.len(), 1);

    let dir = tempfile::tempdir().unwrap();
    let store = ReferenceStore::new(dir.path());
    let path = store.save(&report).unwrap();

    let raw = fs::read_to_string(path).unwrap();
    let records: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(records[0]["word"], "Guten");
    assert_eq!(records[0]["espeak_ipa"], "de/Guten");
}

#[test]
fn failing_tool_stores_error_marker() {
    let registry = LanguageRegistry::builtin();
    let adapter = ReferenceAdapter::new(vec![Box::new(strategy(Duration::from_secs(5)))]);
    let validator = Validator::new(&registry, adapter);
    let words = vec!["kaputt".to_string(), "Tag".to_string()];

    let report = validator.validate("de", Some(&words), &mut std::io::sink());
    let dir = tempfile::tempdir().unwrap();
    let store = ReferenceStore::new(dir.path());
    store.save(&report).unwrap();

    let loaded = store.load("de").unwrap();
    assert!(loaded.results[0].reference.to_string().starts_with("ERROR:"));
    assert_eq!(
        loaded.results[1].reference,
        Transcription::Ipa("de/Tag".into())
    );
}
