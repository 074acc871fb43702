//! Cross-checks a grapheme-to-phoneme engine against espeak-ng.
//!
//! The [`registry::LanguageRegistry`] supplies per-language word lists and
//! espeak-ng voices, the [`orchestrator::Validator`] runs them through the
//! [`reference::ReferenceAdapter`], and the [`store::ReferenceStore`] keeps
//! the results as JSON snapshots for later diffing with [`compare`].

pub mod availability;
pub mod compare;
pub mod config;
pub mod error;
pub mod orchestrator;
pub mod reference;
pub mod registry;
pub mod store;
pub mod subject;

pub use config::HarnessConfig;
pub use error::{HarnessError, Result};
pub use orchestrator::{LanguageReport, Validator, WordResult, emit};
pub use reference::{ReferenceAdapter, Transcription};
pub use registry::{LanguageEntry, LanguageRegistry};
pub use store::ReferenceStore;
pub use subject::{PlaceholderEngine, SubjectEngine};
