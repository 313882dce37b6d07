//! Printer client configuration

/// Printer client configuration, loaded from environment variables.
#[derive(Debug, Clone)]
pub struct PrinterConfig {
    /// Server base URL (e.g. "http://localhost:8000")
    pub server_url: String,

    /// Basic-auth username
    pub username: String,

    /// Basic-auth password
    pub password: String,

    /// CUPS destination name passed to `lp -d`
    pub printer_name: String,

    /// Spool command, normally `lp`
    pub lp_path: String,

    /// Seconds to wait before reconnecting a dropped event stream
    pub retry_secs: u64,
}

impl PrinterConfig {
    /// Load configuration from environment variables.
    ///
    /// | Variable            | Default                    |
    /// |---------------------|----------------------------|
    /// | `MOVING_SERVER_URL` | `http://localhost:8000`    |
    /// | `MOVING_USERNAME`   | (required)                 |
    /// | `MOVING_PASSWORD`   | (required)                 |
    /// | `PRINTER_NAME`      | `DYMO_LabelWriter_310`     |
    /// | `LP_PATH`           | `lp`                       |
    /// | `RETRY_SECS`        | `5`                        |
    pub fn from_env() -> anyhow::Result<Self> {
        let server_url = std::env::var("MOVING_SERVER_URL")
            .unwrap_or_else(|_| "http://localhost:8000".to_string());
        let username = std::env::var("MOVING_USERNAME")
            .map_err(|_| anyhow::anyhow!("MOVING_USERNAME is not set"))?;
        let password = std::env::var("MOVING_PASSWORD")
            .map_err(|_| anyhow::anyhow!("MOVING_PASSWORD is not set"))?;
        let printer_name = std::env::var("PRINTER_NAME")
            .unwrap_or_else(|_| "DYMO_LabelWriter_310".to_string());
        let lp_path = std::env::var("LP_PATH").unwrap_or_else(|_| "lp".to_string());
        let retry_secs = std::env::var("RETRY_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(5);

        Ok(Self {
            server_url: server_url.trim_end_matches('/').to_string(),
            username,
            password,
            printer_name,
            lp_path,
            retry_secs,
        })
    }
}
