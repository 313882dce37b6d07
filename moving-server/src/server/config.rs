//! Server configuration
//!
//! All settings can be overridden through environment variables:
//!
//! | Environment variable | Default | Meaning |
//! |----------------------|---------|---------|
//! | WORK_DIR | /var/lib/moving | databases and state files |
//! | HTTP_PORT | 8000 | HTTP API port |
//! | PUBLIC_URL | http://localhost:8000 | base URL baked into QR permalinks |
//! | SECRETS_PATH | <WORK_DIR>/.secrets.json | Basic auth credential file |
//! | LATEXMK_PATH | latexmk | label toolchain program |
//! | LABEL_QUEUE_CAPACITY | 128 | print-event queue depth |
//! | ENVIRONMENT | development | development \| production |

use crate::labels::events::DEFAULT_QUEUE_CAPACITY;

#[derive(Debug, Clone)]
pub struct Config {
    /// Working directory: SQLite db, label artifact db, secrets
    pub work_dir: String,
    /// HTTP API port
    pub http_port: u16,
    /// Public base URL used for QR permalinks
    pub public_url: String,
    /// Path to the Basic auth secrets file
    pub secrets_path: String,
    /// Label toolchain program
    pub latexmk_path: String,
    /// Print-event queue capacity
    pub label_queue_capacity: usize,
    /// Runtime environment: development | production
    pub environment: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let work_dir = std::env::var("WORK_DIR").unwrap_or_else(|_| "/var/lib/moving".into());
        Self {
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8000),
            public_url: std::env::var("PUBLIC_URL")
                .unwrap_or_else(|_| "http://localhost:8000".into()),
            secrets_path: std::env::var("SECRETS_PATH")
                .unwrap_or_else(|_| format!("{work_dir}/.secrets.json")),
            latexmk_path: std::env::var("LATEXMK_PATH").unwrap_or_else(|_| "latexmk".into()),
            label_queue_capacity: std::env::var("LABEL_QUEUE_CAPACITY")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_QUEUE_CAPACITY),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            work_dir,
        }
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
