#[cfg(feature = "espeak-lib")]
use super::Transcription;
use super::{ReferenceStrategy, StrategyOutcome};

/// In-process espeak-ng through `espeak-rs`.
///
/// Only compiled in with the `espeak-lib` feature; otherwise every call
/// reports [`StrategyOutcome::Unavailable`] and the adapter moves on.
#[derive(Debug, Default)]
pub struct LibraryStrategy;

impl LibraryStrategy {
    pub fn new() -> Self {
        Self
    }
}

impl ReferenceStrategy for LibraryStrategy {
    fn name(&self) -> &'static str {
        "espeak-rs"
    }

    #[cfg(feature = "espeak-lib")]
    fn phonemize(&self, text: &str, dialect: &str) -> StrategyOutcome {
        match espeak_rs::text_to_phonemes(text, dialect, None, true, false) {
            Ok(clauses) => {
                let ipa = clauses
                    .iter()
                    .map(|clause| clause.trim())
                    .filter(|clause| !clause.is_empty())
                    .collect::<Vec<_>>()
                    .join(" ");
                StrategyOutcome::Done(Transcription::Ipa(ipa))
            }
            Err(e) => StrategyOutcome::Done(Transcription::Failed(format!("{:?}", e))),
        }
    }

    #[cfg(not(feature = "espeak-lib"))]
    fn phonemize(&self, _text: &str, _dialect: &str) -> StrategyOutcome {
        StrategyOutcome::Unavailable
    }
}
