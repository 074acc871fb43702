use std::path::Path;
use std::process::{ExitStatus, Stdio};
use std::time::Duration;

use tokio::process::Command;

use crate::error::{HarnessError, Result};

/// Printed when espeak-ng cannot be found.
pub const INSTALL_GUIDANCE: &str = "\
Install espeak-ng:
  Windows: Download from https://github.com/espeak-ng/espeak-ng/releases
  macOS:   brew install espeak-ng
  Linux:   sudo apt install espeak-ng";

/// Runs `<binary> --version`; a clean exit within `timeout` means the tool is
/// usable. A version query that hangs is killed and counts as unavailable.
pub fn is_reference_tool_available(binary: &Path, timeout: Duration) -> bool {
    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            tracing::error!("Could not start runtime for the version query: {}", e);
            return false;
        }
    };

    let mut command = Command::new(binary);
    command
        .arg("--version")
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .kill_on_drop(true);

    let status: std::io::Result<Option<ExitStatus>> = runtime.block_on(async {
        let mut child = command.spawn()?;
        match tokio::time::timeout(timeout, child.wait()).await {
            Ok(status) => status.map(Some),
            Err(_) => Ok(None),
        }
    });

    match status {
        Ok(Some(status)) => {
            if !status.success() {
                tracing::debug!("{} --version exited with {}", binary.display(), status);
            }
            status.success()
        }
        Ok(None) => {
            tracing::warn!(
                "{} --version did not finish within {}s",
                binary.display(),
                timeout.as_secs_f32()
            );
            false
        }
        Err(e) => {
            tracing::debug!("Could not run {}: {}", binary.display(), e);
            false
        }
    }
}

pub fn ensure_reference_tool(binary: &Path, timeout: Duration) -> Result<()> {
    if is_reference_tool_available(binary, timeout) {
        Ok(())
    } else {
        Err(HarnessError::ToolUnavailable {
            binary: binary.to_path_buf(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_binary_is_unavailable() {
        let binary = Path::new("/nonexistent/espeak-ng");
        assert!(!is_reference_tool_available(binary, Duration::from_secs(1)));
        assert!(matches!(
            ensure_reference_tool(binary, Duration::from_secs(1)),
            Err(HarnessError::ToolUnavailable { .. })
        ));
    }

    #[test]
    fn guidance_names_package_managers() {
        assert!(INSTALL_GUIDANCE.contains("brew install espeak-ng"));
        assert!(INSTALL_GUIDANCE.contains("apt install espeak-ng"));
    }

    #[cfg(unix)]
    #[test]
    fn hung_version_query_is_unavailable() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let binary = dir.path().join("espeak-ng");
        std::fs::write(&binary, "#!/bin/sh\nsleep 30\n").unwrap();
        std::fs::set_permissions(&binary, std::fs::Permissions::from_mode(0o755)).unwrap();

        let started = std::time::Instant::now();
        assert!(!is_reference_tool_available(&binary, Duration::from_millis(300)));
        assert!(started.elapsed() < Duration::from_secs(10));
    }
}
