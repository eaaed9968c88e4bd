//! OS-dispatched archive extraction
//!
//! Zip archives are unpacked by the platform's archive tool: `unzip` on
//! POSIX systems, PowerShell's `Expand-Archive` on Windows. Both run with
//! force-overwrite semantics, so existing entries under the destination are
//! replaced. A non-zero exit surfaces the tool's captured standard-error
//! text verbatim; an operating system with no configured tool is an
//! explicit error, not a silent no-op.

use crate::error::{ExtractError, Result};
use std::path::Path;
use tokio::process::Command;
use tracing::{debug, info};

#[cfg(unix)]
const UNZIP_BINARY: &str = "unzip";

/// Unpack `archive` into `dest_dir`, creating the destination if absent
///
/// # Errors
///
/// [`ExtractError::ToolNotFound`] when the platform's unpacking tool is not
/// installed, [`ExtractError::ToolFailed`] carrying the tool's stderr on a
/// non-zero exit, and [`ExtractError::UnsupportedPlatform`] on operating
/// systems with no configured tool.
pub async fn extract_archive(archive: &Path, dest_dir: &Path) -> Result<()> {
    debug!(
        archive = %archive.display(),
        dest_dir = %dest_dir.display(),
        "extracting archive"
    );

    tokio::fs::create_dir_all(dest_dir).await?;

    let command = unpack_command(archive, dest_dir)?;
    run_unpack_tool(command, archive).await?;

    info!(
        archive = %archive.display(),
        dest_dir = %dest_dir.display(),
        "archive extracted"
    );
    Ok(())
}

/// Run the prepared tool invocation, mapping a non-zero exit to
/// [`ExtractError::ToolFailed`] with the captured stderr verbatim
async fn run_unpack_tool(mut command: Command, archive: &Path) -> Result<()> {
    let output = command.output().await?;

    if !output.status.success() {
        return Err(ExtractError::ToolFailed {
            archive: archive.to_path_buf(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        }
        .into());
    }

    Ok(())
}

#[cfg(unix)]
fn unpack_command(archive: &Path, dest_dir: &Path) -> Result<Command> {
    let binary = which::which(UNZIP_BINARY).map_err(|_| ExtractError::ToolNotFound {
        tool: UNZIP_BINARY.to_string(),
    })?;

    let mut command = Command::new(binary);
    command.arg("-o").arg(archive).arg("-d").arg(dest_dir);
    Ok(command)
}

#[cfg(windows)]
fn unpack_command(archive: &Path, dest_dir: &Path) -> Result<Command> {
    let binary = which::which("powershell").map_err(|_| ExtractError::ToolNotFound {
        tool: "powershell".to_string(),
    })?;

    let mut command = Command::new(binary);
    command.arg("-NoProfile").arg("-Command").arg(format!(
        "Expand-Archive -Force -Path \"{}\" -DestinationPath \"{}\"",
        archive.display(),
        dest_dir.display()
    ));
    Ok(command)
}

#[cfg(not(any(unix, windows)))]
fn unpack_command(_archive: &Path, _dest_dir: &Path) -> Result<Command> {
    Err(ExtractError::UnsupportedPlatform {
        os: std::env::consts::OS.to_string(),
    }
    .into())
}
