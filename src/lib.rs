//! Telegram Message Purge Library
//!
//! This library provides tools to:
//! - Sign in as a Telegram user with a local, disposable session
//! - List dialogs (users, groups, channels)
//! - Find the account's own outgoing messages, optionally within a time window
//! - Delete them in rate-limited batches after explicit confirmation
//! - Remove the session files when done

pub mod api;
pub mod chat;
pub mod config;
pub mod console;
pub mod error;
pub mod purge;
pub mod session;

// Re-export common types
pub use api::{ChatApi, TelegramApi};
pub use chat::{ChatKind, ChatSummary, MessageRecord, OutgoingMessage};
pub use config::Config;
pub use console::Console;
pub use error::{Error, Result};
pub use purge::{Period, PurgeOutcome, PurgeStatus};
pub use session::{purge_session_artifacts, SessionLock, TelegramClient};

// Commands module uses re-exported types, so it must be declared after the re-exports
pub mod commands;
