//! Application layer for lcmuse.
//!
//! Use cases that coordinate the domain traits with their infrastructure and
//! interaction implementations, plus the background process serving the shell.

pub mod background;
pub mod bootstrap;
pub mod bridge;
pub mod context;
pub mod history_recorder;
pub mod identity;
pub mod send_script;
pub mod suggestion_service;

pub use background::BackgroundProcess;
pub use bootstrap::bootstrap;
pub use bridge::{BackgroundCommand, ShellBridge};
pub use context::AppContext;
pub use history_recorder::HistoryRecorder;
pub use send_script::SendScriptUseCase;
pub use suggestion_service::SuggestionService;
