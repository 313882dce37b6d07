//! Moving Server - 搬家纸箱库存与标签打印服务
//!
//! A small self-hosted inventory for household-moving boxes. Every box
//! gets a printable PDF label (QR permalink + box number + title); a
//! separate printer client subscribes to the label-event stream and
//! drives the physical printer.
//!
//! # Module structure
//!
//! ```text
//! moving-server/src/
//! ├── server/        # config, state, HTTP server assembly
//! ├── auth/          # HTTP Basic authentication
//! ├── api/           # HTTP routes and handlers
//! ├── db/            # SQLite box records
//! ├── labels/        # render -> compile -> store -> publish pipeline
//! └── utils/         # errors, logging, validation helpers
//! ```

pub mod api;
pub mod auth;
pub mod db;
pub mod labels;
pub mod server;
pub mod utils;

// Re-export public types
pub use auth::{Credentials, CurrentUser};
pub use labels::{
    CompileError, EventSubscription, Label, LabelCompiler, LabelError, LabelService, LabelStore,
    PrintEvents, SubscribeError,
};
pub use server::{Config, Server, ServerState};
pub use utils::{AppError, AppResponse, AppResult};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};
