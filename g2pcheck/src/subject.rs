//! The G2P engine under test.
//!
//! The harness only sees it through [`SubjectEngine`], so a real engine can
//! be attached to the validator without touching orchestration code.

/// Output of [`PlaceholderEngine`] for every input.
pub const PLACEHOLDER_OUTPUT: &str = "[G2P output]";

pub trait SubjectEngine {
    fn name(&self) -> &str;

    /// IPA for `text` in the harness language `lang`.
    fn phonemize(&self, text: &str, lang: &str) -> String;

    /// Whether the output means anything. Placeholders say no, which keeps
    /// their output out of the comparison verdicts.
    fn is_real(&self) -> bool {
        true
    }
}

/// Stands in until the engine is wired up.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlaceholderEngine;

impl SubjectEngine for PlaceholderEngine {
    fn name(&self) -> &str {
        "placeholder"
    }

    fn phonemize(&self, _text: &str, _lang: &str) -> String {
        PLACEHOLDER_OUTPUT.to_string()
    }

    fn is_real(&self) -> bool {
        false
    }
}
