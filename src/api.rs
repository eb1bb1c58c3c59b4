//! Chat provider operations used by the purge workflows
//!
//! `ChatApi` names the four calls the menu needs; `TelegramApi` implements
//! them on top of a connected grammers client.

use async_trait::async_trait;
use grammers_client::types::peer::Peer;
use tracing::debug;

use crate::chat::{summarize, ChatSummary, MessageRecord};
use crate::error::Result;
use crate::session::TelegramClient;

#[async_trait(?Send)]
pub trait ChatApi {
    /// Handle used to address a chat in later calls
    type Peer: Clone;

    /// Every dialog, in the provider's order
    async fn list_dialogs(&mut self) -> Result<Vec<ChatSummary<Self::Peer>>>;

    /// Newest-first history of a chat, at most `limit` messages
    async fn scan_messages(&mut self, peer: &Self::Peer, limit: usize)
        -> Result<Vec<MessageRecord>>;

    /// Delete messages for everyone. Failures are classified into
    /// `Error::DeleteForbidden`, `Error::FloodWait` or a generic error.
    async fn delete_messages(&mut self, peer: &Self::Peer, ids: &[i32]) -> Result<usize>;

    /// Close the connection; further calls are no-ops.
    async fn disconnect(&mut self);
}

pub struct TelegramApi {
    client: TelegramClient,
}

impl TelegramApi {
    pub fn new(client: TelegramClient) -> Self {
        Self { client }
    }
}

#[async_trait(?Send)]
impl ChatApi for TelegramApi {
    type Peer = Peer;

    async fn list_dialogs(&mut self) -> Result<Vec<ChatSummary<Peer>>> {
        let mut chats = Vec::new();
        let mut dialogs = self.client.iter_dialogs();

        while let Some(dialog) = dialogs.next().await? {
            chats.push(summarize(dialog.peer.clone()));
        }

        debug!("Fetched {} dialogs", chats.len());
        Ok(chats)
    }

    async fn scan_messages(&mut self, peer: &Peer, limit: usize) -> Result<Vec<MessageRecord>> {
        let mut records = Vec::new();
        let mut messages = self.client.iter_messages(peer);

        while records.len() < limit {
            let Some(message) = messages.next().await? else {
                break;
            };
            records.push(MessageRecord {
                id: message.id(),
                date: message.date(),
                outgoing: message.outgoing(),
            });
        }

        debug!("Scanned {} messages", records.len());
        Ok(records)
    }

    async fn delete_messages(&mut self, peer: &Peer, ids: &[i32]) -> Result<usize> {
        let deleted = self.client.delete_messages(peer, ids).await?;
        Ok(deleted)
    }

    async fn disconnect(&mut self) {
        self.client.disconnect();
    }
}
