//! What [`decode`](crate::decode) hands back.
//!
//! A compact token always decodes to a well-typed [`InviteMessage`]: the
//! 5-byte layout leaves no room for anything else. Legacy senders, on the
//! other hand, wrote free-form JSON, and their objects are returned exactly
//! as they arrived: a session id like `"sess-1"` or an operation this build
//! has never heard of stays the way the sender wrote it.
//!
//! [`GameMessage`] covers both. Its accessors give the typed view where
//! one exists, so most callers never need to match on the variant.
//!
//! `#[serde(untagged)]` means the enum serializes as whatever is inside
//! it, with no `"Compact"`/`"Legacy"` wrapper: a compact message becomes
//! the usual `{"type":"game",...}` record, a legacy one becomes its
//! original object.

use serde::Serialize;

#[cfg(feature = "legacy")]
use crate::LegacyMessage;
use crate::{InviteMessage, Operation, SessionId};

/// A decoded game message.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum GameMessage {
    /// Decoded from a `gw:` token.
    Compact(InviteMessage),

    /// A legacy JSON object, field for field as received.
    #[cfg(feature = "legacy")]
    Legacy(LegacyMessage),
}

impl GameMessage {
    /// The operation, if it is one this build can name or a numeric code.
    /// `None` for a legacy `op` this build doesn't recognise.
    pub fn op(&self) -> Option<Operation> {
        match self {
            GameMessage::Compact(msg) => Some(msg.op),
            #[cfg(feature = "legacy")]
            GameMessage::Legacy(msg) => msg.op(),
        }
    }

    /// The game identifier as text.
    pub fn game(&self) -> Option<&str> {
        match self {
            GameMessage::Compact(msg) => Some(msg.game.as_str()),
            #[cfg(feature = "legacy")]
            GameMessage::Legacy(msg) => msg.game(),
        }
    }

    /// The session id, when it fits the 24-bit compact format.
    pub fn session(&self) -> Option<SessionId> {
        match self {
            GameMessage::Compact(msg) => msg.id,
            #[cfg(feature = "legacy")]
            GameMessage::Legacy(msg) => msg.session(),
        }
    }

    /// The session id exactly as it should be displayed: 6 hex digits for
    /// compact messages, the sender's own text for legacy ones.
    pub fn session_text(&self) -> Option<String> {
        match self {
            GameMessage::Compact(msg) => msg.id.map(|id| id.to_string()),
            #[cfg(feature = "legacy")]
            GameMessage::Legacy(msg) => msg.session_text(),
        }
    }

    /// The operation as text, for messages and logs. Unrecognised legacy
    /// operations come back verbatim.
    pub fn op_text(&self) -> String {
        match self {
            GameMessage::Compact(msg) => msg.op.to_string(),
            #[cfg(feature = "legacy")]
            GameMessage::Legacy(msg) => msg.op_text(),
        }
    }

    /// A typed record, if this message has a known operation and a
    /// string game. Used to build replies; the session id is `None` when
    /// the sender's id can't be carried by a compact token.
    pub fn to_invite(&self) -> Option<InviteMessage> {
        match self {
            GameMessage::Compact(msg) => Some(msg.clone()),
            #[cfg(feature = "legacy")]
            GameMessage::Legacy(_) => {
                let mut invite = InviteMessage::new(self.op()?, self.game()?);
                invite.id = self.session();
                Some(invite)
            }
        }
    }

    pub fn is_legacy(&self) -> bool {
        !matches!(self, GameMessage::Compact(_))
    }
}

impl From<InviteMessage> for GameMessage {
    fn from(msg: InviteMessage) -> Self {
        GameMessage::Compact(msg)
    }
}
