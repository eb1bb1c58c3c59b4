//! Chat summaries and message records
//!
//! Transient, in-memory views of dialogs and messages. `ChatSummary` carries
//! the peer handle needed to address the chat again; the rest is display data.

use chrono::{DateTime, Utc};
use grammers_client::types::peer::Peer;

/// Dialog type as shown in menus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatKind {
    User,
    Group,
    Channel,
}

impl ChatKind {
    pub fn icon(&self) -> &'static str {
        match self {
            ChatKind::User => "👤",
            ChatKind::Group => "👥",
            ChatKind::Channel => "📢",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ChatKind::User => "Личный",
            ChatKind::Group => "Группа",
            ChatKind::Channel => "Канал",
        }
    }

    pub fn is_group_or_channel(&self) -> bool {
        matches!(self, ChatKind::Group | ChatKind::Channel)
    }
}

/// One dialog as listed by the API, in the API's order.
#[derive(Debug, Clone)]
pub struct ChatSummary<P> {
    pub name: String,
    pub id: i64,
    pub kind: ChatKind,
    pub is_bot: bool,
    pub peer: P,
}

impl<P> ChatSummary<P> {
    /// Private dialog with a real person
    pub fn is_private(&self) -> bool {
        self.kind == ChatKind::User && !self.is_bot
    }
}

/// A message as seen while scanning history
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageRecord {
    pub id: i32,
    pub date: DateTime<Utc>,
    pub outgoing: bool,
}

/// A message sent by the authenticated account, selected for deletion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutgoingMessage {
    pub id: i32,
    pub date: DateTime<Utc>,
}

/// Classify a peer; bots are still users here, callers filter them.
pub fn classify_peer(peer: &Peer) -> (ChatKind, bool) {
    match peer {
        Peer::Channel(_) => (ChatKind::Channel, false),
        Peer::Group(_) => (ChatKind::Group, false),
        Peer::User(user) => {
            let is_bot = match &user.raw {
                grammers_tl_types::enums::User::User(u) => u.bot,
                grammers_tl_types::enums::User::Empty(_) => false,
            };
            (ChatKind::User, is_bot)
        }
    }
}

pub fn chat_title(chat: &Peer) -> String {
    match chat {
        Peer::Channel(c) => c.title().to_string(),
        Peer::Group(g) => g.title().unwrap_or("Group").to_string(),
        Peer::User(u) => u.full_name(),
    }
}

pub fn peer_id(chat: &Peer) -> i64 {
    match chat {
        Peer::Channel(c) => c.raw.id,
        Peer::Group(g) => match &g.raw {
            grammers_tl_types::enums::Chat::Empty(c) => c.id,
            grammers_tl_types::enums::Chat::Chat(c) => c.id,
            grammers_tl_types::enums::Chat::Forbidden(c) => c.id,
            grammers_tl_types::enums::Chat::Channel(c) => c.id,
            grammers_tl_types::enums::Chat::ChannelForbidden(c) => c.id,
        },
        Peer::User(u) => u.raw.id(),
    }
}

/// Build a summary from a dialog peer
pub fn summarize(peer: Peer) -> ChatSummary<Peer> {
    let (kind, is_bot) = classify_peer(&peer);
    ChatSummary {
        name: chat_title(&peer),
        id: peer_id(&peer),
        kind,
        is_bot,
        peer,
    }
}
