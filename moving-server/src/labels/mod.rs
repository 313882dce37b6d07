//! Label lifecycle module
//!
//! Pipeline for box labels:
//! rendering (LaTeX template) -> compilation (latexmk, serialized) ->
//! artifact storage (redb, write-once) -> print-event publication
//! (bounded FIFO channel with a single-subscriber gate).

pub mod compiler;
pub mod events;
pub mod renderer;
pub mod service;
pub mod store;

pub use compiler::{CompileError, CompileResult, LabelCompiler};
pub use events::{EventSubscription, PrintEvents, SubscribeError};
pub use renderer::Label;
pub use service::{LabelError, LabelResult, LabelService};
pub use store::{LabelStore, LabelStoreError, LabelStoreResult};
