//! Label service - orchestrates the label lifecycle
//!
//! render -> compile -> store -> publish on box creation;
//! publish-only on reprint.

use super::compiler::{CompileError, LabelCompiler};
use super::events::PrintEvents;
use super::renderer::Label;
use super::store::{LabelStore, LabelStoreError};
use crate::utils::AppError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LabelError {
    #[error(transparent)]
    Compile(#[from] CompileError),

    #[error("Storage error: {0}")]
    Store(#[from] LabelStoreError),

    #[error("Print event channel closed")]
    ChannelClosed,
}

pub type LabelResult<T> = Result<T, LabelError>;

impl From<LabelError> for AppError {
    fn from(err: LabelError) -> Self {
        match err {
            LabelError::Compile(e @ CompileError::Failed { .. }) => {
                AppError::Compilation(e.to_string())
            }
            LabelError::Compile(e) => AppError::Internal(e.to_string()),
            LabelError::Store(LabelStoreError::NotFound(id)) => {
                AppError::NotFound(format!("No label for box {id}"))
            }
            LabelError::Store(LabelStoreError::AlreadyExists(id)) => {
                AppError::Conflict(format!("Label for box {id} already exists"))
            }
            LabelError::Store(e) => AppError::Database(e.to_string()),
            LabelError::ChannelClosed => {
                AppError::Internal("print event channel closed".to_string())
            }
        }
    }
}

/// Label lifecycle service
///
/// Responsibilities:
/// - Compile and store the label PDF when a box is created
/// - Re-enqueue existing labels on reprint (no recompilation)
/// - Serve stored artifacts to the printer client
#[derive(Clone)]
pub struct LabelService {
    compiler: LabelCompiler,
    store: LabelStore,
    events: PrintEvents,
    /// Public base URL embedded in the QR permalink
    public_url: String,
}

impl LabelService {
    pub fn new(
        compiler: LabelCompiler,
        store: LabelStore,
        events: PrintEvents,
        public_url: impl Into<String>,
    ) -> Self {
        Self {
            compiler,
            store,
            events,
            public_url: public_url.into(),
        }
    }

    /// The permalink a label's QR code points at.
    ///
    /// `/box/{id}` is the human-facing box page, served by the web
    /// frontend in front of this API; this server's own record
    /// endpoint lives at `/api/boxes/{id}`. Labels outlive server
    /// deployments, so the QR payload targets the stable public URL
    /// rather than an API route.
    pub fn permalink(&self, box_id: i64) -> String {
        format!("{}/box/{box_id}", self.public_url.trim_end_matches('/'))
    }

    /// Create and announce the label for a freshly registered box.
    ///
    /// On compile failure nothing is stored and nothing is published.
    /// Storage and publication are not transactional with the caller's
    /// box insert: a stored-but-unannounced label cannot happen (the
    /// publish cannot fail while the channel is open), but a box row
    /// without a label can, and reads of its label surface not-found.
    pub async fn create_label(&self, box_id: i64, title: &str) -> LabelResult<()> {
        let label = Label {
            qr_contents: self.permalink(box_id),
            no: box_id,
            title: title.to_string(),
        };

        let tex = label.render();
        let pdf = self.compiler.compile(&tex).await?;
        self.store.put(box_id, &pdf)?;

        tracing::info!(box_id, bytes = pdf.len(), "Stored compiled label");

        self.events
            .publish(box_id)
            .await
            .map_err(|_| LabelError::ChannelClosed)
    }

    /// Queue an existing label for another physical print.
    ///
    /// Publish-only: no recompilation, and no existence check — the
    /// printer client skips ids whose artifact fetch 404s.
    pub async fn reprint(&self, box_id: i64) -> LabelResult<()> {
        tracing::info!(box_id, "Reprint requested");
        self.events
            .publish(box_id)
            .await
            .map_err(|_| LabelError::ChannelClosed)
    }

    /// Fetch the stored artifact bytes for a box
    pub fn artifact(&self, box_id: i64) -> LabelResult<Vec<u8>> {
        Ok(self.store.get(box_id)?)
    }
}
