use thiserror::Error;

use crate::workflow::step::Step;

/// Failures that end a sheet command
#[derive(Debug, Error)]
pub enum SheetError {
    /// The reference API answered with a non-success status
    #[error("could not fetch {url} (status {status})")]
    Remote { status: u16, url: String },

    /// The reference API did not answer within the fetch bound
    #[error("timed out fetching {url}")]
    Timeout { url: String },

    /// The request never reached the reference API
    #[error("could not reach {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The reference API answered with something we can't read
    #[error("unexpected data from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    /// A step whose policy is to abort got no usable reply
    #[error("no valid reply to the {0} prompt")]
    StepAborted(Step),

    /// The command arguments were rejected before anything was fetched
    #[error("{0}")]
    InvalidCommand(String),

    /// The user already has a sheet in progress in this channel
    #[error("a sheet is already being built for this user in this channel")]
    ConversationBusy,
}

impl SheetError {
    /// The single plain-text line shown to the chat user
    pub fn user_message(&self) -> String {
        match self {
            SheetError::StepAborted(Step::AwaitAbility) => "❌ Invalid ability.".to_string(),
            SheetError::StepAborted(_) => "❌ Invalid reply.".to_string(),
            other => format!("❌ Error: {}", other),
        }
    }
}

/// Why a reply couldn't be used by a workflow step
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ReplyError {
    #[error("no reply in time")]
    TimedOut,

    #[error("reply doesn't match any option")]
    Invalid,
}

/// Why a user message couldn't be handed to a running sheet
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum DeliverError {
    #[error("No sheet is waiting for a reply from this user here")]
    NoConversation,

    #[error("Too many unread replies, wait for the next prompt")]
    MailboxFull,
}

pub type SheetResult<T> = Result<T, SheetError>;
