//! Label document compiler
//!
//! Drives the external `latexmk` toolchain to turn rendered LaTeX into
//! a PDF. Invocations are serialized process-wide: latexmk keeps state
//! on disk and is not safe to run concurrently. Each run gets a fresh
//! scratch directory that is removed on every exit path.

use std::process::Stdio;
use std::sync::Arc;

use thiserror::Error;
use tokio::process::Command;
use tokio::sync::Semaphore;

#[derive(Debug, Error)]
pub enum CompileError {
    /// The toolchain ran but produced no PDF. Carries everything
    /// needed to debug the failure offline; `exit_code` is -1 when
    /// the toolchain was killed by a signal.
    #[error("latexmk failed with exit code {exit_code}")]
    Failed {
        tex: String,
        stdout: String,
        stderr: String,
        exit_code: i32,
    },

    /// The toolchain exited zero yet produced no PDF. This is an
    /// environment defect, not a normal failure path.
    #[error("toolchain exited successfully but produced no artifact")]
    MissingArtifact {
        tex: String,
        stdout: String,
        stderr: String,
    },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type CompileResult<T> = Result<T, CompileError>;

/// Serialized LaTeX-to-PDF compiler
#[derive(Clone)]
pub struct LabelCompiler {
    /// Toolchain program, normally `latexmk` (tests point this at a stub)
    program: String,
    /// Single-permit admission gate: at most one toolchain run at a time
    gate: Arc<Semaphore>,
}

impl LabelCompiler {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            gate: Arc::new(Semaphore::new(1)),
        }
    }

    /// Compile LaTeX source to PDF bytes.
    ///
    /// Suspends until the admission gate admits this caller, then runs
    /// the toolchain in a fresh scratch directory. The scratch
    /// directory is removed on success, failure, and cancellation
    /// alike (it is dropped with this future).
    pub async fn compile(&self, tex: &str) -> CompileResult<Vec<u8>> {
        // Never closed; held for the whole toolchain run
        let _permit = self
            .gate
            .acquire()
            .await
            .expect("compiler admission gate closed");

        let scratch = tempfile::TempDir::new()?;
        let tex_path = scratch.path().join("label.tex");
        let pdf_path = scratch.path().join("label.pdf");

        tokio::fs::write(&tex_path, tex).await?;

        let output = Command::new(&self.program)
            .arg("-pdf")
            .arg("-cd")
            .arg(&tex_path)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

        if pdf_path.exists() {
            // Toolchain warnings are common; keep the capture for audit
            tracing::info!(
                exit_code = output.status.code().unwrap_or(-1),
                stdout = %stdout,
                stderr = %stderr,
                "Successfully compiled label"
            );
            return Ok(tokio::fs::read(&pdf_path).await?);
        }

        match output.status.code() {
            Some(0) => {
                tracing::error!(
                    stdout = %stdout,
                    stderr = %stderr,
                    "Toolchain reported success but produced no PDF"
                );
                Err(CompileError::MissingArtifact {
                    tex: tex.to_string(),
                    stdout,
                    stderr,
                })
            }
            // Killed by a signal (no exit code); sentinel -1
            None => {
                tracing::error!(
                    stdout = %stdout,
                    stderr = %stderr,
                    tex = %tex,
                    "Toolchain terminated by signal"
                );
                Err(CompileError::Failed {
                    tex: tex.to_string(),
                    stdout,
                    stderr,
                    exit_code: -1,
                })
            }
            Some(exit_code) => {
                // The error value reaches the client as a bare status
                // line; the server log keeps the full diagnostics
                tracing::error!(
                    exit_code,
                    stdout = %stdout,
                    stderr = %stderr,
                    tex = %tex,
                    "Toolchain failed to compile label"
                );
                Err(CompileError::Failed {
                    tex: tex.to_string(),
                    stdout,
                    stderr,
                    exit_code,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    /// Write an executable stub toolchain script. The stub receives the
    /// same arguments as latexmk (`-pdf -cd <tex>`) and must create
    /// `label.pdf` next to the tex file, or exit non-zero without it.
    fn write_stub_toolchain(dir: &Path, body: &str) -> std::io::Result<std::path::PathBuf> {
        use std::os::unix::fs::PermissionsExt;

        let path = dir.join("fake-latexmk.sh");
        std::fs::write(&path, format!("#!/bin/sh\n{body}\n"))?;
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))?;
        Ok(path)
    }

    fn compiler_with_stub(dir: &Path, body: &str) -> LabelCompiler {
        let script = write_stub_toolchain(dir, body).unwrap();
        LabelCompiler::new(script.to_string_lossy().into_owned())
    }

    #[tokio::test]
    async fn test_compile_success_returns_artifact_bytes() {
        let dir = tempfile::TempDir::new().unwrap();
        // $3 is the tex path; emit the PDF next to it
        let compiler = compiler_with_stub(
            dir.path(),
            r#"printf '%%PDF-stub' > "$(dirname "$3")/label.pdf""#,
        );

        let bytes = compiler.compile("\\documentclass{article}").await.unwrap();
        assert_eq!(bytes, b"%PDF-stub");
    }

    #[tokio::test]
    async fn test_compile_failure_carries_diagnostics() {
        let dir = tempfile::TempDir::new().unwrap();
        let compiler = compiler_with_stub(dir.path(), "echo out; echo err >&2; exit 1");

        let err = compiler.compile("bad tex").await.unwrap_err();
        match err {
            CompileError::Failed {
                tex,
                stdout,
                stderr,
                exit_code,
            } => {
                assert_eq!(tex, "bad tex");
                assert_eq!(exit_code, 1);
                assert!(stdout.contains("out"));
                assert!(stderr.contains("err"));
            }
            other => panic!("expected Failed, got {other:?}"),
        }
    }

    /// Collects formatted log output for assertions
    #[derive(Clone, Default)]
    struct LogCapture(std::sync::Arc<std::sync::Mutex<Vec<u8>>>);

    impl LogCapture {
        fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    impl std::io::Write for LogCapture {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for LogCapture {
        type Writer = LogCapture;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    #[tokio::test]
    async fn test_compile_failure_diagnostics_reach_the_log() {
        use tracing::instrument::WithSubscriber;

        let dir = tempfile::TempDir::new().unwrap();
        let compiler = compiler_with_stub(
            dir.path(),
            "echo 'Undefined control sequence' >&2; exit 1",
        );

        let capture = LogCapture::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(capture.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::ERROR)
            .finish();

        let err = async { compiler.compile("\\brokenmacro").await }
            .with_subscriber(subscriber)
            .await
            .unwrap_err();
        assert!(matches!(err, CompileError::Failed { .. }));

        // stderr and the document text must survive in the server log,
        // not only inside the error value
        let logs = capture.contents();
        assert!(logs.contains("Undefined control sequence"));
        assert!(logs.contains("brokenmacro"));
    }

    #[tokio::test]
    async fn test_signal_killed_toolchain_fails_with_sentinel_code() {
        let dir = tempfile::TempDir::new().unwrap();
        let compiler = compiler_with_stub(dir.path(), "kill -9 $$");

        let err = compiler.compile("tex").await.unwrap_err();
        match err {
            CompileError::Failed { exit_code, .. } => assert_eq!(exit_code, -1),
            other => panic!("expected Failed, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_zero_exit_without_artifact_is_a_defect() {
        let dir = tempfile::TempDir::new().unwrap();
        let compiler = compiler_with_stub(dir.path(), "exit 0");

        let err = compiler.compile("tex").await.unwrap_err();
        assert!(matches!(err, CompileError::MissingArtifact { .. }));
    }

    #[tokio::test]
    async fn test_concurrent_compiles_never_overlap() {
        let dir = tempfile::TempDir::new().unwrap();
        let marker = dir.path().join("overlap");
        let lock = dir.path().join("lock");
        // mkdir is atomic: if it fails, another invocation is mid-run
        let body = format!(
            r#"mkdir "{lock}" || touch "{marker}"
sleep 0.05
printf '%%PDF' > "$(dirname "$3")/label.pdf"
rmdir "{lock}""#,
            lock = lock.display(),
            marker = marker.display(),
        );
        let compiler = compiler_with_stub(dir.path(), &body);

        let mut tasks = Vec::new();
        for _ in 0..10 {
            let c = compiler.clone();
            tasks.push(tokio::spawn(async move { c.compile("tex").await }));
        }
        for task in tasks {
            task.await.unwrap().unwrap();
        }

        assert!(!marker.exists(), "toolchain invocations overlapped");
    }
}
