//! Reference vs. subject diffing.
//!
//! Comparison is exact equality after [`normalize_ipa`]; there is no partial
//! credit for near misses.

use std::fmt;

use crate::orchestrator::LanguageReport;
use crate::reference::Transcription;
use crate::subject::SubjectEngine;

/// Strips marks espeak-ng and G2P engines disagree on by convention and folds
/// equivalent spellings of the same sound.
pub fn normalize_ipa(ipa: &str) -> String {
    let stripped: String = ipa
        .chars()
        .filter(|c| !matches!(c, 'ˈ' | 'ˌ' | 'ː' | '.' | '→' | '↗' | '↘' | '↓'))
        .filter(|c| !c.is_whitespace())
        .collect();

    stripped
        .replace("tʃ", "ʧ")
        .replace("dʒ", "ʤ")
        .replace('ᵊ', "ə")
        .replace('ɚ', "əɹ")
        .replace('ɝ', "ɜɹ")
        .replace('ɡ', "g")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Match,
    Mismatch,
    /// espeak-ng gave no transcription to compare against
    ReferenceFailed,
    /// No real subject output was recorded
    NoSubject,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Verdict::Match => "match",
            Verdict::Mismatch => "MISMATCH",
            Verdict::ReferenceFailed => "reference failed",
            Verdict::NoSubject => "no subject",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordDiff {
    pub word: String,
    pub reference: Transcription,
    pub subject: Option<String>,
    pub verdict: Verdict,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Comparison {
    pub lang: String,
    pub diffs: Vec<WordDiff>,
}

impl Comparison {
    pub fn count(&self, verdict: Verdict) -> usize {
        self.diffs.iter().filter(|d| d.verdict == verdict).count()
    }

    /// Share of comparable words that matched; `None` when nothing was
    /// comparable.
    pub fn match_rate(&self) -> Option<f64> {
        let matched = self.count(Verdict::Match);
        let comparable = matched + self.count(Verdict::Mismatch);
        (comparable > 0).then(|| matched as f64 / comparable as f64)
    }
}

/// Fills in subject output for a report loaded from disk.
///
/// Placeholder engines leave `subject` empty so their output never counts as
/// a mismatch.
pub fn attach_subject(report: &mut LanguageReport, engine: &dyn SubjectEngine) {
    if !engine.is_real() {
        tracing::warn!(
            "Subject engine '{}' is a placeholder, skipping {}",
            engine.name(),
            report.lang
        );
        return;
    }
    for result in &mut report.results {
        result.subject = Some(engine.phonemize(&result.word, &report.lang));
    }
}

pub fn diff_report(report: &LanguageReport) -> Comparison {
    let diffs = report
        .results
        .iter()
        .map(|result| {
            let verdict = match (&result.reference, &result.subject) {
                (Transcription::Failed(_), _) => Verdict::ReferenceFailed,
                (Transcription::Ipa(_), None) => Verdict::NoSubject,
                (Transcription::Ipa(reference), Some(subject)) => {
                    if normalize_ipa(reference) == normalize_ipa(subject) {
                        Verdict::Match
                    } else {
                        Verdict::Mismatch
                    }
                }
            };
            WordDiff {
                word: result.word.clone(),
                reference: result.reference.clone(),
                subject: result.subject.clone(),
                verdict,
            }
        })
        .collect();

    Comparison {
        lang: report.lang.clone(),
        diffs,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orchestrator::WordResult;
    use crate::subject::PlaceholderEngine;

    struct Table;

    impl SubjectEngine for Table {
        fn name(&self) -> &str {
            "table"
        }

        fn phonemize(&self, text: &str, _lang: &str) -> String {
            match text {
                "Guten" => "gˈuːtən".to_string(),
                "Tag" => "tˈaːk".to_string(),
                _ => "???".to_string(),
            }
        }
    }

    fn report() -> LanguageReport {
        let result = |word: &str, reference: Transcription| WordResult {
            word: word.to_string(),
            reference,
            subject: None,
        };
        LanguageReport {
            lang: "de".into(),
            results: vec![
                result("Guten", Transcription::Ipa("ɡˈuːtən".into())),
                result("Tag", Transcription::Ipa("tˈaːk".into())),
                result("Welt", Transcription::Ipa("vˈɛlt".into())),
                result("Buch", Transcription::Failed("timed out".into())),
            ],
        }
    }

    #[test]
    fn normalization_folds_marks_and_variants() {
        assert_eq!(normalize_ipa("ˈtʃiː.zə"), "ʧizə");
        assert_eq!(normalize_ipa("ɡʊt ən"), "gʊtən");
        assert_eq!(normalize_ipa("bɝd"), "bɜɹd");
    }

    #[test]
    fn verdicts() {
        let mut report = report();
        attach_subject(&mut report, &Table);
        let comparison = diff_report(&report);

        let verdicts: Vec<Verdict> = comparison.diffs.iter().map(|d| d.verdict).collect();
        assert_eq!(
            verdicts,
            [
                Verdict::Match,
                Verdict::Match,
                Verdict::Mismatch,
                Verdict::ReferenceFailed
            ]
        );
        assert_eq!(comparison.match_rate(), Some(2.0 / 3.0));
    }

    #[test]
    fn placeholder_output_is_not_compared() {
        let mut report = report();
        attach_subject(&mut report, &PlaceholderEngine);
        let comparison = diff_report(&report);

        assert_eq!(comparison.count(Verdict::NoSubject), 3);
        assert_eq!(comparison.count(Verdict::Mismatch), 0);
        assert_eq!(comparison.match_rate(), None);
    }
}
