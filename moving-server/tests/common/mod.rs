#![allow(dead_code)]
//! Shared helpers for integration tests

use std::path::{Path, PathBuf};

use moving_server::{Config, ServerState};
use tempfile::TempDir;

/// Bytes the success stub emits as its artifact
pub const STUB_PDF: &[u8] = b"%PDF-stub";

/// Stub body that compiles every document successfully
pub const SUCCESS_BODY: &str = r#"printf '%%PDF-stub' > "$(dirname "$3")/label.pdf""#;

/// Stub body that fails every compile with diagnostics
pub const FAILURE_BODY: &str = "echo 'Emergency stop' >&2; exit 12";

/// Write an executable stub toolchain script. The stub receives the
/// same arguments as latexmk (`-pdf -cd <tex>`) and must create
/// `label.pdf` next to the tex file, or exit non-zero without it.
pub fn write_stub_toolchain(dir: &Path, body: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join("fake-latexmk.sh");
    std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path
}

/// Fully initialized server state over a scratch working directory,
/// with a stub toolchain and one known credential pair
/// (`alice` / `hunter2`).
pub async fn test_state(toolchain_body: &str) -> (TempDir, ServerState) {
    let dir = TempDir::new().unwrap();
    let stub = write_stub_toolchain(dir.path(), toolchain_body);

    let secrets = dir.path().join(".secrets.json");
    std::fs::write(&secrets, r#"[["alice", "hunter2"]]"#).unwrap();

    let config = Config {
        work_dir: dir.path().to_string_lossy().into_owned(),
        http_port: 0,
        public_url: "http://testserver".into(),
        secrets_path: secrets.to_string_lossy().into_owned(),
        latexmk_path: stub.to_string_lossy().into_owned(),
        label_queue_capacity: 16,
        environment: "development".into(),
    };

    let state = ServerState::initialize(&config).await.unwrap();
    (dir, state)
}
