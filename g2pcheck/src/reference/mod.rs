//! Reference phonemizer adapter.
//!
//! espeak-ng can be reached in-process through the `espeak-rs` binding or as
//! a subprocess. Each way is a [`ReferenceStrategy`]; the [`ReferenceAdapter`]
//! tries them in order and takes the first one that is actually installed.

pub mod library;
pub mod process;

pub use library::LibraryStrategy;
pub use process::ProcessStrategy;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::HarnessConfig;
use crate::error::Result;

/// Marker written in place of a transcription when espeak-ng failed.
pub const ERROR_MARKER: &str = "ERROR: ";

/// Outcome of one reference call.
///
/// Persisted as a single string; failures carry [`ERROR_MARKER`] as prefix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum Transcription {
    Ipa(String),
    Failed(String),
}

impl Transcription {
    pub fn is_failure(&self) -> bool {
        matches!(self, Transcription::Failed(_))
    }
}

impl fmt::Display for Transcription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Transcription::Ipa(ipa) => f.write_str(ipa),
            Transcription::Failed(reason) => write!(f, "{ERROR_MARKER}{reason}"),
        }
    }
}

impl From<Transcription> for String {
    fn from(value: Transcription) -> Self {
        value.to_string()
    }
}

impl From<String> for Transcription {
    fn from(value: String) -> Self {
        match value.strip_prefix(ERROR_MARKER) {
            Some(reason) => Transcription::Failed(reason.to_string()),
            None => Transcription::Ipa(value),
        }
    }
}

/// What a strategy made of a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StrategyOutcome {
    /// The strategy is not installed; the next one should be tried
    Unavailable,
    Done(Transcription),
}

/// One way of reaching the reference phonemizer.
pub trait ReferenceStrategy {
    fn name(&self) -> &'static str;

    /// Must not panic or abort; failures are reported as
    /// [`Transcription::Failed`].
    fn phonemize(&self, text: &str, dialect: &str) -> StrategyOutcome;
}

/// Ordered chain of strategies.
pub struct ReferenceAdapter {
    strategies: Vec<Box<dyn ReferenceStrategy>>,
}

impl ReferenceAdapter {
    pub fn new(strategies: Vec<Box<dyn ReferenceStrategy>>) -> Self {
        Self { strategies }
    }

    /// Library binding first, then the `espeak-ng` executable.
    pub fn from_config(config: &HarnessConfig) -> Result<Self> {
        let process = ProcessStrategy::new(&config.espeak_binary, config.timeout)?;
        Ok(Self::new(vec![
            Box::new(LibraryStrategy::new()),
            Box::new(process),
        ]))
    }

    pub fn strategy_names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    pub fn phonemize(&self, text: &str, dialect: &str) -> Transcription {
        for strategy in &self.strategies {
            match strategy.phonemize(text, dialect) {
                StrategyOutcome::Unavailable => {
                    tracing::debug!("{} strategy unavailable, trying next", strategy.name());
                }
                StrategyOutcome::Done(transcription) => {
                    if let Transcription::Failed(reason) = &transcription {
                        tracing::warn!(
                            "{} failed for {:?} ({}): {}",
                            strategy.name(),
                            text,
                            dialect,
                            reason
                        );
                    }
                    return transcription;
                }
            }
        }
        Transcription::Failed("no reference strategy available".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    struct Fixed {
        outcome: StrategyOutcome,
        calls: Rc<Cell<usize>>,
    }

    impl ReferenceStrategy for Fixed {
        fn name(&self) -> &'static str {
            "fixed"
        }

        fn phonemize(&self, _text: &str, _dialect: &str) -> StrategyOutcome {
            self.calls.set(self.calls.get() + 1);
            self.outcome.clone()
        }
    }

    fn fixed(outcome: StrategyOutcome) -> (Box<dyn ReferenceStrategy>, Rc<Cell<usize>>) {
        let calls = Rc::new(Cell::new(0));
        let strategy = Fixed {
            outcome,
            calls: Rc::clone(&calls),
        };
        (Box::new(strategy), calls)
    }

    #[test]
    fn skips_unavailable_strategies() {
        let (first, first_calls) = fixed(StrategyOutcome::Unavailable);
        let (second, second_calls) =
            fixed(StrategyOutcome::Done(Transcription::Ipa("ɡˈuːtən".into())));
        let (third, third_calls) = fixed(StrategyOutcome::Unavailable);
        let adapter = ReferenceAdapter::new(vec![first, second, third]);

        assert_eq!(
            adapter.phonemize("Guten", "de"),
            Transcription::Ipa("ɡˈuːtən".into())
        );
        assert_eq!(first_calls.get(), 1);
        assert_eq!(second_calls.get(), 1);
        assert_eq!(third_calls.get(), 0);
    }

    #[test]
    fn failure_stops_the_chain() {
        let (failing, _) = fixed(StrategyOutcome::Done(Transcription::Failed("boom".into())));
        let (fallback, fallback_calls) =
            fixed(StrategyOutcome::Done(Transcription::Ipa("x".into())));
        let adapter = ReferenceAdapter::new(vec![failing, fallback]);

        assert!(adapter.phonemize("Tag", "de").is_failure());
        assert_eq!(fallback_calls.get(), 0);
    }

    #[test]
    fn nothing_available_is_a_failure() {
        let (only, _) = fixed(StrategyOutcome::Unavailable);
        let adapter = ReferenceAdapter::new(vec![only]);
        let result = adapter.phonemize("Tag", "de");
        assert!(result.to_string().starts_with(ERROR_MARKER));
    }

    #[test]
    fn transcription_string_form() {
        let failed = Transcription::Failed("exit status 1".into());
        assert_eq!(failed.to_string(), "ERROR: exit status 1");
        assert_eq!(Transcription::from(failed.to_string()), failed);
        assert_eq!(
            Transcription::from("ˈtaːk".to_string()),
            Transcription::Ipa("ˈtaːk".into())
        );
        assert!(failed.is_failure());
    }
}
