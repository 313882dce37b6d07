//! Hands PDF bytes to the OS print spooler

use std::process::Stdio;

use tokio::process::Command;

use crate::error::{PrinterError, PrinterResult};

/// Write `pdf` to a scratch file and submit it with `lp -d <printer>`.
///
/// The scratch file lives until `lp` returns; CUPS copies the job into
/// its own spool before exiting, so the file can then be removed.
pub async fn print_pdf(lp_path: &str, printer: &str, pdf: &[u8]) -> PrinterResult<()> {
    let file = tempfile::Builder::new().suffix(".pdf").tempfile()?;
    tokio::fs::write(file.path(), pdf).await?;

    let output = Command::new(lp_path)
        .arg("-d")
        .arg(printer)
        .arg(file.path())
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .await?;

    if !output.status.success() {
        return Err(PrinterError::PrintCommand {
            status: output.status.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        });
    }

    tracing::info!(
        printer = %printer,
        stdout = %String::from_utf8_lossy(&output.stdout).trim(),
        "print job submitted"
    );
    Ok(())
}
