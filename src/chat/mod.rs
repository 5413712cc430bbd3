/// HTTP endpoints the chat gateway talks to
pub mod endpoints;

use std::{future::Future, sync::Arc, time::Duration};

use dashmap::{DashMap, mapref::entry::Entry};
use log::debug;
use serde::{Deserialize, Serialize};
use tokio::sync::{
    Mutex,
    mpsc::{self, error::TrySendError},
};

use crate::error::{DeliverError, SheetError, SheetResult};

/// Replies buffered per conversation before new ones are refused
pub const MAILBOX_SIZE: usize = 16;

/// Messages kept per channel until the gateway drains them, oldest go first
pub const OUTBOX_LIMIT: usize = 64;

/// A message the bot posts into a channel
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(tag = "kind", content = "content", rename_all = "snake_case")]
pub enum OutboundMessage {
    Text(String),
    Image(String),
}

/// One user in one channel
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ConversationKey {
    pub user_id: String,
    pub channel_id: String,
}

/// The chat side of a running workflow
pub trait Conversation: Send + Sync {
    /// Posts a message into the invoking channel
    fn send(&self, message: OutboundMessage) -> impl Future<Output = SheetResult<()>> + Send;

    /// Waits for the next message of the invoking user in the invoking channel
    /// `None` when nothing arrived in time
    fn await_reply(&self, timeout: Duration) -> impl Future<Output = Option<String>> + Send;

    fn say(&self, text: impl Into<String>) -> impl Future<Output = SheetResult<()>> + Send {
        self.send(OutboundMessage::Text(text.into()))
    }
}

/// Routes incoming user messages to waiting workflows and
/// queues outgoing messages per channel for the gateway to collect
#[derive(Default)]
pub struct ChatHub {
    mailboxes: DashMap<ConversationKey, mpsc::Sender<String>>,
    outboxes: DashMap<String, Vec<OutboundMessage>>,
}

impl ChatHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a conversation with a user in a channel
    /// Only one conversation per user and channel can be open at a time
    pub fn open(self: &Arc<Self>, key: ConversationKey) -> SheetResult<HubConversation> {
        match self.mailboxes.entry(key.clone()) {
            Entry::Occupied(_) => Err(SheetError::ConversationBusy),
            Entry::Vacant(slot) => {
                let (tx, rx) = mpsc::channel(MAILBOX_SIZE);
                slot.insert(tx);
                debug!("Opened conversation {:?}", key);
                Ok(HubConversation {
                    hub: Arc::clone(self),
                    key,
                    replies: Mutex::new(rx),
                })
            }
        }
    }

    /// Hands a user message to the conversation it belongs to
    pub fn deliver(&self, key: &ConversationKey, content: String) -> Result<(), DeliverError> {
        let mailbox = self.mailboxes.get(key).ok_or(DeliverError::NoConversation)?;

        match mailbox.try_send(content) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(_)) => Err(DeliverError::MailboxFull),
            Err(TrySendError::Closed(_)) => Err(DeliverError::NoConversation),
        }
    }

    /// Queues a message for a channel
    pub fn post(&self, channel_id: &str, message: OutboundMessage) {
        let mut outbox = self.outboxes.entry(channel_id.to_string()).or_default();
        outbox.push(message);

        if outbox.len() > OUTBOX_LIMIT {
            let overflow = outbox.len() - OUTBOX_LIMIT;
            outbox.drain(..overflow);
            debug!("Dropped {} unread messages in {}", overflow, channel_id);
        }
    }

    /// Takes every queued message of a channel, oldest first
    pub fn drain(&self, channel_id: &str) -> Vec<OutboundMessage> {
        self.outboxes
            .remove(channel_id)
            .map(|(_, messages)| messages)
            .unwrap_or_default()
    }

    fn close(&self, key: &ConversationKey) {
        if self.mailboxes.remove(key).is_some() {
            debug!("Closed conversation {:?}", key);
        }
    }
}

/// A conversation opened on a [`ChatHub`], closed when dropped
pub struct HubConversation {
    hub: Arc<ChatHub>,
    key: ConversationKey,
    replies: Mutex<mpsc::Receiver<String>>,
}

impl HubConversation {
    pub fn key(&self) -> &ConversationKey {
        &self.key
    }
}

impl Conversation for HubConversation {
    fn send(&self, message: OutboundMessage) -> impl Future<Output = SheetResult<()>> + Send {
        async move {
            // a reply only counts if it comes after the latest prompt
            let mut replies = self.replies.lock().await;
            while replies.try_recv().is_ok() {}

            self.hub.post(&self.key.channel_id, message);
            Ok(())
        }
    }

    fn await_reply(&self, timeout: Duration) -> impl Future<Output = Option<String>> + Send {
        async move {
            let mut replies = self.replies.lock().await;
            tokio::time::timeout(timeout, replies.recv())
                .await
                .ok()
                .flatten()
        }
    }
}

impl Drop for HubConversation {
    fn drop(&mut self) {
        self.hub.close(&self.key);
    }
}
