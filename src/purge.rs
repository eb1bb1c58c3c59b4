//! Selection and batch deletion of the account's own messages
//!
//! A chat's history is scanned up to [`MESSAGE_SCAN_LIMIT`] messages, reduced
//! to outgoing ones (optionally newer than a cutoff) and, after explicit
//! confirmation, deleted in batches of [`BATCH_SIZE`] with a fixed pause.
//!
//! On a flood-wait the batch that triggered it is not retried, so its
//! messages are neither counted nor deleted by this run.

use std::io::Write;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::io::AsyncBufRead;
use tokio::time::sleep;
use tracing::{info, warn};

use crate::api::ChatApi;
use crate::chat::{ChatKind, ChatSummary, MessageRecord, OutgoingMessage};
use crate::console::Console;
use crate::error::{Error, Result};

pub const BATCH_SIZE: usize = 100;
pub const MESSAGE_SCAN_LIMIT: usize = 10_000;
pub const BATCH_PAUSE: Duration = Duration::from_secs(1);

/// Time window for the private-message workflow
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    Day,
    Week,
    AllTime,
}

impl Period {
    /// Map the period submenu number (1-3)
    pub fn from_menu(choice: usize) -> Option<Self> {
        match choice {
            1 => Some(Period::Day),
            2 => Some(Period::Week),
            3 => Some(Period::AllTime),
            _ => None,
        }
    }

    pub fn cutoff(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match self {
            Period::Day => Some(now - chrono::Duration::hours(24)),
            Period::Week => Some(now - chrono::Duration::days(7)),
            Period::AllTime => None,
        }
    }

    pub fn describe(&self) -> &'static str {
        match self {
            Period::Day => "последние 24 часа",
            Period::Week => "последнюю неделю",
            Period::AllTime => "все время",
        }
    }
}

/// Keep outgoing messages, dropping those older than `cutoff` when given.
pub fn select_outgoing(
    records: &[MessageRecord],
    cutoff: Option<DateTime<Utc>>,
) -> Vec<OutgoingMessage> {
    records
        .iter()
        .filter(|m| m.outgoing)
        .filter(|m| cutoff.map_or(true, |c| m.date >= c))
        .map(|m| OutgoingMessage {
            id: m.id,
            date: m.date,
        })
        .collect()
}

/// How the batch loop ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PurgeStatus {
    Completed,
    Forbidden,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PurgeOutcome {
    pub deleted: usize,
    pub total: usize,
    pub status: PurgeStatus,
}

pub fn progress_line(deleted: usize, total: usize) -> String {
    let percent = if total == 0 {
        100.0
    } else {
        deleted as f64 / total as f64 * 100.0
    };
    format!("📊 Прогресс: {}/{} ({:.1}%)", deleted, total, percent)
}

/// Delete `ids` in batches, pausing between successful batches.
///
/// Only console I/O errors are returned as `Err`; API failures end up in
/// [`PurgeOutcome::status`].
pub async fn delete_in_batches<A, R, W>(
    api: &mut A,
    console: &mut Console<R, W>,
    peer: &A::Peer,
    ids: &[i32],
) -> Result<PurgeOutcome>
where
    A: ChatApi,
    R: AsyncBufRead + Unpin + Send,
    W: Write + Send,
{
    let total = ids.len();
    let mut deleted = 0;
    let mut status = PurgeStatus::Completed;

    for batch in ids.chunks(BATCH_SIZE) {
        match api.delete_messages(peer, batch).await {
            Ok(_) => {
                deleted += batch.len();
                console.say(progress_line(deleted, total))?;
                sleep(BATCH_PAUSE).await;
            }
            Err(Error::DeleteForbidden) => {
                warn!("Delete forbidden after {} of {} messages", deleted, total);
                console.say("❌ Нет прав для удаления некоторых сообщений")?;
                status = PurgeStatus::Forbidden;
                break;
            }
            Err(Error::FloodWait { seconds }) => {
                warn!("Flood wait of {}s, skipping batch of {}", seconds, batch.len());
                console.say(format!(
                    "⏰ Слишком много запросов. Ждем {} секунд...",
                    seconds
                ))?;
                sleep(Duration::from_secs(seconds)).await;
            }
            Err(err) => {
                warn!("Delete failed: {}", err);
                console.say(format!("❌ Ошибка при удалении: {}", err))?;
                status = PurgeStatus::Failed(err.to_string());
                break;
            }
        }
    }

    Ok(PurgeOutcome {
        deleted,
        total,
        status,
    })
}

fn place(kind: ChatKind) -> &'static str {
    match kind {
        ChatKind::User => "диалоге",
        ChatKind::Group => "группе",
        ChatKind::Channel => "канале",
    }
}

/// Full per-chat workflow: scan, filter, confirm, delete.
///
/// Returns the number of deleted messages; fetch errors and cancellation
/// yield 0 after a console message.
pub async fn purge_chat<A, R, W>(
    api: &mut A,
    console: &mut Console<R, W>,
    chat: &ChatSummary<A::Peer>,
    period: Option<Period>,
    now: DateTime<Utc>,
) -> Result<usize>
where
    A: ChatApi,
    R: AsyncBufRead + Unpin + Send,
    W: Write + Send,
{
    console.say(format!(
        "\n🔍 Поиск ваших сообщений в {}: {}",
        place(chat.kind),
        chat.name
    ))?;
    if let Some(period) = period {
        console.say(format!("📅 Период: {}", period.describe()))?;
    }

    let records = match api.scan_messages(&chat.peer, MESSAGE_SCAN_LIMIT).await {
        Ok(records) => records,
        Err(err) => {
            warn!("Failed to scan {}: {}", chat.name, err);
            console.say(format!("❌ Ошибка: {}", err))?;
            return Ok(0);
        }
    };

    let cutoff = period.and_then(|p| p.cutoff(now));
    let messages = select_outgoing(&records, cutoff);

    if messages.is_empty() {
        match period {
            Some(_) => console.say("✅ Ваши сообщения за указанный период не найдены.")?,
            None => console.say("✅ Ваши сообщения не найдены.")?,
        }
        return Ok(0);
    }

    match period {
        Some(p) => console.say(format!(
            "📝 Найдено {} ваших сообщений за {}",
            messages.len(),
            p.describe()
        ))?,
        None => console.say(format!("📝 Найдено {} ваших сообщений", messages.len()))?,
    }

    let confirmed = console
        .confirm(format!("⚠️ Удалить все {} сообщений?", messages.len()))
        .await?;
    if !confirmed {
        console.say("❌ Операция отменена.")?;
        return Ok(0);
    }

    console.say("🔄 Начинаю удаление...")?;
    let ids: Vec<i32> = messages.iter().map(|m| m.id).collect();
    let outcome = delete_in_batches(api, console, &chat.peer, &ids).await?;

    info!(
        chat = %chat.name,
        deleted = outcome.deleted,
        total = outcome.total,
        status = ?outcome.status,
        "Purge finished"
    );
    console.say(format!(
        "✅ Удалено {} сообщений в {} {}",
        outcome.deleted,
        place(chat.kind),
        chat.name
    ))?;

    Ok(outcome.deleted)
}
