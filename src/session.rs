//! Session management for Telegram client
//!
//! Provides:
//! - File-based session locking to prevent parallel execution
//! - Client creation and interactive sign-in
//! - Idempotent disconnect
//! - Removal of session artifacts on exit

use std::fs::{File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use fs2::FileExt;
use grammers_client::{Client, SignInError};
use grammers_mtsender::{SenderPool, SenderPoolHandle};
use grammers_session::storages::SqliteSession;
use tokio::io::AsyncBufRead;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::config::Config;
use crate::console::Console;
use crate::error::{Error, Result};

/// Session lock guard that ensures exclusive access to the Telegram session.
pub struct SessionLock {
    path: PathBuf,
    lock_file: Option<File>,
}

impl SessionLock {
    /// Acquire an exclusive lock on the session.
    pub fn acquire(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let lock_file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&path)
            .map_err(|e| Error::LockError(format!("Failed to open lock file: {}", e)))?;

        match lock_file.try_lock_exclusive() {
            Ok(()) => Ok(Self {
                path,
                lock_file: Some(lock_file),
            }),
            Err(_) => {
                eprintln!(
                    r#"
⚠️  ОШИБКА: Telegram сессия уже используется другим процессом!

Подождите, пока он завершится, и попробуйте снова.
"#
                );
                Err(Error::SessionLocked)
            }
        }
    }

    /// Release the lock manually
    pub fn release(&mut self) {
        if let Some(file) = self.lock_file.take() {
            let _ = file.unlock();
            let _ = std::fs::remove_file(&self.path);
        }
    }
}

impl Drop for SessionLock {
    fn drop(&mut self) {
        self.release();
    }
}

/// Open (or create) the sqlite session file.
pub fn open_session(config: &Config) -> Result<Arc<SqliteSession>> {
    let session_file = config.session_file();
    let session = SqliteSession::open(&session_file)
        .map_err(|e| Error::SessionError(format!("Failed to open {}: {}", session_file, e)))?;
    Ok(Arc::new(session))
}

/// Holder for SenderPool components and Client
pub struct TelegramClient {
    pub client: Client,
    _handle: SenderPoolHandle,
    runner: Option<JoinHandle<()>>,
    updates_drain: Option<JoinHandle<()>>,
}

impl TelegramClient {
    /// Create a new TelegramClient from session
    pub fn connect(session: Arc<SqliteSession>, api_id: i32) -> Self {
        let pool = SenderPool::new(session, api_id);

        // Client needs the whole pool before it is split
        let client = Client::new(&pool);

        let SenderPool {
            runner,
            updates,
            handle,
        } = pool;

        let runner = tokio::spawn(async move {
            runner.run().await;
        });

        Self {
            client,
            _handle: handle,
            runner: Some(runner),
            updates_drain: Some(tokio::spawn(drain_updates(updates))),
        }
    }

    /// Stop the network runner. Safe to call more than once.
    pub fn disconnect(&mut self) {
        if let Some(drain) = self.updates_drain.take() {
            drain.abort();
        }
        if let Some(runner) = self.runner.take() {
            runner.abort();
            info!("Telegram client disconnected");
        }
    }

    /// Sign in interactively unless the session is already authorized.
    /// Returns the display name of the account.
    pub async fn authorize<R, W>(
        &self,
        config: &Config,
        console: &mut Console<R, W>,
    ) -> Result<String>
    where
        R: AsyncBufRead + Unpin + Send,
        W: Write + Send,
    {
        if self.client.is_authorized().await? {
            let me = self.client.get_me().await?;
            return Ok(me.full_name());
        }

        let phone = if config.phone.trim().is_empty() {
            console
                .prompt("📱 Введите номер телефона (в международном формате): ")
                .await?
                .ok_or(Error::AuthorizationRequired)?
        } else {
            config.phone.trim().to_string()
        };

        let token = self
            .client
            .request_login_code(&phone, &config.api_hash)
            .await
            .map_err(|e| Error::TelegramError(format!("Failed to request code: {}", e)))?;

        let code = console
            .prompt("Введите код из Telegram: ")
            .await?
            .ok_or(Error::AuthorizationRequired)?;

        let user = match self.client.sign_in(&token, &code).await {
            Ok(user) => user,
            Err(SignInError::PasswordRequired(password_token)) => {
                let hint = password_token.hint().unwrap_or("нет").to_string();
                let password = console
                    .prompt(format!("🔐 Введите пароль 2FA (подсказка: {}): ", hint))
                    .await?
                    .ok_or(Error::AuthorizationRequired)?;
                self.client
                    .check_password(password_token, password.trim())
                    .await?
            }
            Err(e) => return Err(e.into()),
        };

        info!("Signed in as {}", user.full_name());
        Ok(user.full_name())
    }
}

/// Discard incoming updates; nothing here reacts to them.
async fn drain_updates<T>(mut updates: mpsc::UnboundedReceiver<T>) {
    let mut skipped = 0u64;
    while updates.recv().await.is_some() {
        skipped += 1;
    }
    debug!("Update stream closed after {} updates", skipped);
}

impl Drop for TelegramClient {
    fn drop(&mut self) {
        self.disconnect();
    }
}

// Implement Deref to allow using TelegramClient as &Client
impl std::ops::Deref for TelegramClient {
    type Target = Client;

    fn deref(&self) -> &Self::Target {
        &self.client
    }
}

/// Whether `name` is one of the session's own files: `<prefix>` itself or
/// `<prefix>.<anything>` (`.session`, `.session-journal`, `.lock`).
fn is_session_artifact(name: &str, prefix: &str) -> bool {
    match name.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with('.'),
        None => false,
    }
}

/// Delete the session files of `prefix` found directly in `dir`.
///
/// Each failure is reported and skipped; files that are already gone are
/// not an error. Returns the number of files removed.
pub fn purge_session_artifacts(dir: &Path, prefix: &str, out: &mut impl Write) -> usize {
    let mut removed = 0;

    for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                warn!("Failed to read directory entry: {}", err);
                let _ = writeln!(out, "⚠️ Не удалось прочитать каталог: {}", err);
                continue;
            }
        };

        let matches = entry
            .file_name()
            .to_str()
            .is_some_and(|name| is_session_artifact(name, prefix));
        if !matches || entry.file_type().is_dir() {
            continue;
        }

        let path = entry.path();
        match std::fs::remove_file(path) {
            Ok(()) => {
                removed += 1;
                info!("Removed session file {}", path.display());
                let _ = writeln!(out, "🗑️ Удален файл сессии: {}", path.display());
            }
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!("Session file {} already gone", path.display());
            }
            Err(err) => {
                warn!("Failed to remove {}: {}", path.display(), err);
                let _ = writeln!(out, "⚠️ Не удалось удалить {}: {}", path.display(), err);
            }
        }
    }

    removed
}
