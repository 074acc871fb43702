use std::path::{Path, PathBuf};
use std::time::Duration;

use tokio::process::Command;
use tokio::runtime::{Builder, Runtime};

use super::{ReferenceStrategy, StrategyOutcome, Transcription};
use crate::error::{HarnessError, Result};

/// Runs `espeak-ng -v <dialect> --ipa -q <text>` and reads the IPA from stdout.
///
/// Each call is bounded by `timeout`; a child still running when it elapses
/// is killed and the word is recorded as failed.
pub struct ProcessStrategy {
    binary: PathBuf,
    timeout: Duration,
    runtime: Runtime,
}

impl ProcessStrategy {
    pub fn new(binary: impl AsRef<Path>, timeout: Duration) -> Result<Self> {
        let runtime = Builder::new_current_thread().enable_all().build()?;
        Ok(Self {
            binary: binary.as_ref().to_path_buf(),
            timeout,
            runtime,
        })
    }

    fn run(&self, text: &str, dialect: &str) -> Result<String> {
        let mut command = Command::new(&self.binary);
        command
            .arg("-v")
            .arg(dialect)
            .arg("--ipa")
            .arg("-q")
            .arg(text)
            .kill_on_drop(true);

        let output = self
            .runtime
            .block_on(async { tokio::time::timeout(self.timeout, command.output()).await })
            .map_err(|_| {
                HarnessError::InvocationFailure(format!(
                    "timed out after {}s",
                    self.timeout.as_secs_f32()
                ))
            })?
            .map_err(|e| {
                HarnessError::InvocationFailure(format!(
                    "failed to run {}: {}",
                    self.binary.display(),
                    e
                ))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(HarnessError::InvocationFailure(format!(
                "{} exited with {}: {}",
                self.binary.display(),
                output.status,
                stderr.trim()
            )));
        }

        let stdout = String::from_utf8(output.stdout).map_err(|e| {
            HarnessError::InvocationFailure(format!("output is not valid UTF-8: {}", e))
        })?;
        let ipa = stdout.trim();
        if ipa.is_empty() {
            return Err(HarnessError::InvocationFailure("empty output".to_string()));
        }
        Ok(ipa.to_string())
    }
}

impl ReferenceStrategy for ProcessStrategy {
    fn name(&self) -> &'static str {
        "espeak-ng process"
    }

    fn phonemize(&self, text: &str, dialect: &str) -> StrategyOutcome {
        let transcription = match self.run(text, dialect) {
            Ok(ipa) => Transcription::Ipa(ipa),
            Err(HarnessError::InvocationFailure(reason)) => Transcription::Failed(reason),
            Err(e) => Transcription::Failed(e.to_string()),
        };
        StrategyOutcome::Done(transcription)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_binary_is_a_word_failure() {
        let strategy =
            ProcessStrategy::new("/nonexistent/espeak-ng", Duration::from_secs(1)).unwrap();
        match strategy.phonemize("Guten", "de") {
            StrategyOutcome::Done(Transcription::Failed(reason)) => {
                assert!(reason.contains("failed to run"), "{reason}");
            }
            other => panic!("expected failure, got {:?}", other),
        }
    }
}
