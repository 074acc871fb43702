//! Drives the reference phonemizer over a language's corpus.

use std::io::Write;

use crate::reference::{ReferenceAdapter, Transcription};
use crate::registry::LanguageRegistry;
use crate::subject::SubjectEngine;

/// One word run through the reference (and, if attached, the subject).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordResult {
    pub word: String,
    pub reference: Transcription,
    pub subject: Option<String>,
}

/// Results for one language, in corpus order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LanguageReport {
    pub lang: String,
    pub results: Vec<WordResult>,
}

impl LanguageReport {
    pub fn empty(lang: &str) -> Self {
        Self {
            lang: lang.to_string(),
            results: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn failures(&self) -> usize {
        self.results
            .iter()
            .filter(|r| r.reference.is_failure())
            .count()
    }
}

const RULE_WIDTH: usize = 50;

pub struct Validator<'a> {
    registry: &'a LanguageRegistry,
    reference: ReferenceAdapter,
    subject: Option<Box<dyn SubjectEngine>>,
    sample: Option<usize>,
}

impl<'a> Validator<'a> {
    pub fn new(registry: &'a LanguageRegistry, reference: ReferenceAdapter) -> Self {
        Self {
            registry,
            reference,
            subject: None,
            sample: None,
        }
    }

    pub fn with_subject(mut self, engine: Box<dyn SubjectEngine>) -> Self {
        self.subject = Some(engine);
        self
    }

    /// Only the first `n` words of each list are run.
    pub fn with_sample(mut self, n: usize) -> Self {
        self.sample = Some(n);
        self
    }

    /// Runs `words`, or the registered corpus of `lang` when `words` is `None`.
    ///
    /// Never fails: an unknown language yields an empty report and a warning,
    /// and a failed reference call is recorded in that word's result.
    pub fn validate(
        &self,
        lang: &str,
        words: Option<&[String]>,
        out: &mut dyn Write,
    ) -> LanguageReport {
        let words = match words {
            Some(words) => words,
            None => match self.registry.resolve(lang) {
                Ok(entry) => entry.corpus.as_slice(),
                Err(e) => {
                    tracing::warn!("{}", e);
                    emit(out, format_args!("\nWARNING: {}, skipping\n", e));
                    return LanguageReport::empty(lang);
                }
            },
        };
        let limit = self.sample.unwrap_or(words.len());
        let dialect = self.registry.dialect_for(lang);

        let rule = "=".repeat(RULE_WIDTH);
        emit(
            out,
            format_args!("\n{rule}\nLanguage: {lang} (espeak: {dialect})\n{rule}\n"),
        );

        let mut report = LanguageReport::empty(lang);
        for word in words.iter().take(limit) {
            if word.trim().is_empty() {
                tracing::warn!("Skipping blank entry in {} word list", lang);
                continue;
            }

            let reference = self.reference.phonemize(word, dialect);
            let subject = self
                .subject
                .as_ref()
                .map(|engine| engine.phonemize(word, lang));

            match &subject {
                Some(subject) => emit(
                    out,
                    format_args!("  {:20} → {} | g2p: {}\n", word, reference, subject),
                ),
                None => emit(out, format_args!("  {:20} → {}\n", word, reference)),
            }

            report.results.push(WordResult {
                word: word.clone(),
                reference,
                subject,
            });
        }

        tracing::info!(
            "{}: {} words, {} reference failures",
            lang,
            report.len(),
            report.failures()
        );
        report
    }

    /// Every registered language in registry order. Each report is handed to
    /// `sink` as soon as it is complete.
    pub fn validate_all<F>(&self, out: &mut dyn Write, mut sink: F)
    where
        F: FnMut(LanguageReport),
    {
        for code in self.registry.codes() {
            sink(self.validate(code, None, out));
        }
    }
}

/// Writes and flushes one piece of operator output. A broken stream is
/// logged and otherwise ignored so it cannot cut a batch short.
pub fn emit(out: &mut dyn Write, args: std::fmt::Arguments<'_>) {
    if let Err(e) = out.write_fmt(args).and_then(|_| out.flush()) {
        tracing::warn!("Failed to write progress: {}", e);
    }
}
