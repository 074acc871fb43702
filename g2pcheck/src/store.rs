//! Reference snapshots on disk, one JSON file per language.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{HarnessError, Result};
use crate::orchestrator::{LanguageReport, WordResult};
use crate::reference::Transcription;

#[derive(Debug, Serialize, Deserialize)]
struct ReferenceRecord {
    word: String,
    espeak_ipa: Transcription,
}

#[derive(Debug, Clone)]
pub struct ReferenceStore {
    dir: PathBuf,
}

impl ReferenceStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Snapshot path for `lang`. Codes are limited to letters, digits, `-`
    /// and `_` so they always name a file directly inside the store.
    pub fn path_for(&self, lang: &str) -> Result<PathBuf> {
        let valid = !lang.is_empty()
            && lang
                .chars()
                .all(|c| c.is_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(HarnessError::InvalidLanguageCode(lang.to_string()));
        }
        Ok(self.dir.join(format!("espeak_ref_{lang}.json")))
    }

    /// Replaces the snapshot for `report.lang`.
    ///
    /// The JSON is written to a temporary file next to the target and renamed
    /// over it, so readers see either the old snapshot or the new one.
    pub fn save(&self, report: &LanguageReport) -> Result<PathBuf> {
        let path = self.path_for(&report.lang)?;
        fs::create_dir_all(&self.dir)?;

        let records: Vec<ReferenceRecord> = report
            .results
            .iter()
            .map(|r| ReferenceRecord {
                word: r.word.clone(),
                espeak_ipa: r.reference.clone(),
            })
            .collect();
        let mut raw = serde_json::to_string_pretty(&records)?;
        raw.push('\n');

        let tmp = self.dir.join(format!(".espeak_ref_{}.json.tmp", report.lang));
        {
            let mut file = fs::File::create(&tmp)?;
            file.write_all(raw.as_bytes())?;
            file.sync_all()?;
        }
        if let Err(e) = fs::rename(&tmp, &path) {
            let _ = fs::remove_file(&tmp);
            return Err(e.into());
        }

        tracing::info!(
            "Saved {} reference entries to {}",
            records.len(),
            path.display()
        );
        Ok(path)
    }

    pub fn load(&self, lang: &str) -> Result<LanguageReport> {
        let raw = fs::read_to_string(self.path_for(lang)?)?;
        let records: Vec<ReferenceRecord> = serde_json::from_str(&raw)?;
        Ok(LanguageReport {
            lang: lang.to_string(),
            results: records
                .into_iter()
                .map(|record| WordResult {
                    word: record.word,
                    reference: record.espeak_ipa,
                    subject: None,
                })
                .collect(),
        })
    }
}
