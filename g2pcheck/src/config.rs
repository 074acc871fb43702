use std::path::PathBuf;
use std::time::Duration;

/// Default espeak-ng executable, resolved through `PATH`.
pub const DEFAULT_ESPEAK_BINARY: &str = "espeak-ng";

/// Per-invocation bound on the espeak-ng subprocess.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Where reference files land unless told otherwise.
pub const DEFAULT_OUTPUT_DIR: &str = "tests/espeak_reference";

/// Process-wide harness settings, filled from the command line.
#[derive(Debug, Clone)]
pub struct HarnessConfig {
    pub espeak_binary: PathBuf,
    pub timeout: Duration,
    pub output_dir: PathBuf,
    /// Custom registry file replacing the builtin corpora
    pub corpus_file: Option<PathBuf>,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            espeak_binary: PathBuf::from(DEFAULT_ESPEAK_BINARY),
            timeout: DEFAULT_TIMEOUT,
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            corpus_file: None,
        }
    }
}
