//! Error types for the message purger

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Session is locked by another process")]
    SessionLocked,

    #[error("Failed to acquire session lock: {0}")]
    LockError(String),

    #[error("Session error: {0}")]
    SessionError(String),

    #[error("No permission to delete some messages")]
    DeleteForbidden,

    #[error("Flood wait: retry after {seconds} seconds")]
    FloodWait { seconds: u64 },

    #[error("Telegram API error: {0}")]
    TelegramError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Authorization required")]
    AuthorizationRequired,

    #[error("Unknown error: {0}")]
    Unknown(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Classify a textual Telegram error into forbidden / flood-wait / generic.
    pub fn from_telegram(message: &str) -> Self {
        if message.contains("MESSAGE_DELETE_FORBIDDEN") || message.contains("CHAT_ADMIN_REQUIRED")
        {
            return Error::DeleteForbidden;
        }
        if let Some(seconds) = parse_flood_wait_seconds(message) {
            return Error::FloodWait { seconds };
        }
        Error::TelegramError(message.to_string())
    }
}

impl From<grammers_client::InvocationError> for Error {
    fn from(err: grammers_client::InvocationError) -> Self {
        Error::from_telegram(&err.to_string())
    }
}

impl From<grammers_client::SignInError> for Error {
    fn from(err: grammers_client::SignInError) -> Self {
        Error::TelegramError(format!("Sign in failed: {}", err))
    }
}

/// Extract flood wait seconds from an error string (best-effort).
///
/// Telegram reports `FLOOD_WAIT_<n>`; grammers normalizes it to `FLOOD_WAIT`
/// with the number rendered as `value: <n>`.
pub fn parse_flood_wait_seconds(error: &str) -> Option<u64> {
    let idx = error.find("FLOOD_WAIT")?;
    let rest = &error[idx + "FLOOD_WAIT".len()..];

    if let Some(tail) = rest.strip_prefix('_') {
        let secs = tail
            .chars()
            .take_while(|c| c.is_ascii_digit())
            .collect::<String>();
        if let Ok(v) = secs.parse::<u64>() {
            return Some(v);
        }
    }

    if let Some(pos) = rest.find("value:") {
        let secs = rest[pos + "value:".len()..]
            .trim_start()
            .trim_start_matches("Some(")
            .chars()
            .take_while(|c| c.is_ascii_digit())
            .collect::<String>();
        if let Ok(v) = secs.parse::<u64>() {
            return Some(v);
        }
    }

    None
}
