//! Internal language codes, their espeak-ng voices and the word lists used to
//! exercise each language's phonology.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::{HarnessError, Result};

/// One registered language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageEntry {
    pub code: String,
    /// espeak-ng voice, opaque to everything but the reference adapter
    pub dialect_code: String,
    pub corpus: Vec<String>,
}

impl LanguageEntry {
    /// Entry whose espeak-ng voice is the internal code itself.
    pub fn new<S: AsRef<str>>(code: &str, corpus: &[S]) -> Self {
        Self {
            code: code.to_string(),
            dialect_code: code.to_string(),
            corpus: corpus.iter().map(|w| w.as_ref().to_string()).collect(),
        }
    }

    pub fn with_dialect(mut self, dialect: &str) -> Self {
        self.dialect_code = dialect.to_string();
        self
    }
}

#[derive(Debug, Deserialize)]
struct EntryFile {
    code: String,
    #[serde(default)]
    dialect: Option<String>,
    corpus: Vec<String>,
}

/// Immutable table of languages, kept in registration order.
#[derive(Debug, Clone)]
pub struct LanguageRegistry {
    entries: Vec<LanguageEntry>,
}

impl LanguageRegistry {
    /// Builds a registry, rejecting duplicate codes and empty corpora.
    pub fn from_entries(entries: Vec<LanguageEntry>) -> Result<Self> {
        let mut seen = HashSet::new();
        for entry in &entries {
            if !seen.insert(entry.code.as_str()) {
                return Err(HarnessError::DuplicateLanguage(entry.code.clone()));
            }
            if entry.corpus.iter().all(|w| w.trim().is_empty()) {
                return Err(HarnessError::EmptyCorpus(entry.code.clone()));
            }
        }
        Ok(Self { entries })
    }

    /// Loads a registry from a JSON array of `{code, dialect?, corpus}` objects.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        let specs: Vec<EntryFile> = serde_json::from_str(&raw)?;
        let entries = specs
            .into_iter()
            .map(|spec| {
                let entry = LanguageEntry::new(&spec.code, spec.corpus.as_slice());
                match spec.dialect {
                    Some(dialect) => entry.with_dialect(&dialect),
                    None => entry,
                }
            })
            .collect();
        let registry = Self::from_entries(entries)?;
        tracing::info!(
            "Loaded {} languages from {}",
            registry.entries.len(),
            path.display()
        );
        Ok(registry)
    }

    /// The languages shipped with the harness.
    pub fn builtin() -> Self {
        let entries = vec![
            LanguageEntry::new(
                "de",
                &[
                    "Guten", "Tag", "Welt", "Schule", "Buch", "Mädchen", "König", "schön", "über",
                    "München",
                ],
            ),
            LanguageEntry::new(
                "pt",
                &[
                    "olá", "mundo", "Brasil", "coração", "manhã", "pão", "cidade", "trabalho",
                ],
            )
            .with_dialect("pt-br"),
            LanguageEntry::new("ko", &["안녕", "하세요", "감사", "합니다", "한국", "서울", "사랑"]),
            LanguageEntry::new("vi", &["xin", "chào", "cảm", "ơn", "Việt", "Nam", "Hà", "Nội"]),
            LanguageEntry::new(
                "es",
                &["hola", "mundo", "gracias", "ciudad", "noche", "llorar", "año"],
            )
            .with_dialect("es-419"),
            LanguageEntry::new(
                "id",
                &["selamat", "pagi", "terima", "kasih", "Indonesia", "Jakarta"],
            ),
            LanguageEntry::new(
                "tr",
                &["merhaba", "dünya", "teşekkür", "ederim", "Türkiye", "İstanbul"],
            ),
            LanguageEntry::new(
                "it",
                &["ciao", "mondo", "grazie", "famiglia", "città", "notte", "gli"],
            ),
            LanguageEntry::new(
                "en",
                &["hello", "world", "beautiful", "language", "computer", "science"],
            )
            .with_dialect("en-us"),
            LanguageEntry::new("zh", &["你好", "世界", "中国", "谢谢", "北京", "学生"])
                .with_dialect("cmn"),
        ];
        Self { entries }
    }

    pub fn resolve(&self, code: &str) -> Result<&LanguageEntry> {
        self.entries
            .iter()
            .find(|entry| entry.code == code)
            .ok_or_else(|| HarnessError::UnknownLanguage(code.to_string()))
    }

    /// espeak-ng voice for `code`, falling back to the code itself.
    pub fn dialect_for<'a>(&'a self, code: &'a str) -> &'a str {
        self.resolve(code)
            .map(|entry| entry.dialect_code.as_str())
            .unwrap_or(code)
    }

    pub fn entries(&self) -> &[LanguageEntry] {
        &self.entries
    }

    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.code.as_str())
    }
}

impl Default for LanguageRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}
