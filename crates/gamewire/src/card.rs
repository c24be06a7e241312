//! The invite card: what a chat UI shows for an incoming game message.
//!
//! The UI owns rendering and button wiring. This module gives it the two
//! things it needs from the codec: "is this text a game message, and what
//! does it say?" and "turn the user's answer into a token to send back".
//!
//! ```text
//! incoming text ──→ InviteCard::from_text ──→ None  (not a game message, ignore)
//!                                        └──→ Some(card) ──→ render
//!                                                  │
//!                               accept() / decline()
//!                                                  ▼
//!                                           reply token ──→ transport
//! ```
//!
//! Sender attribution comes from the transport envelope, not from here.

use gamewire_protocol::{
    decode, encode, EncodeError, GameMessage, InviteMessage, Operation,
};

use crate::{labels, CardError};

/// A decoded game message, ready for display.
#[derive(Debug, Clone, PartialEq)]
pub struct InviteCard {
    message: GameMessage,
}

impl InviteCard {
    /// Decodes incoming text. `None` means the text is not a game message
    /// and no card should be shown.
    pub fn from_text(text: &str) -> Option<Self> {
        decode(text).map(|message| Self { message })
    }

    /// Wraps an already-decoded message, or a record built locally.
    pub fn from_message(message: impl Into<GameMessage>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &GameMessage {
        &self.message
    }

    /// The game identifier, if the message names one.
    pub fn game(&self) -> Option<&str> {
        self.message.game()
    }

    /// The game's display name, or its raw identifier (e.g. `code_200`
    /// from a newer sender) when no label is known.
    pub fn label(&self) -> &str {
        let Some(game) = self.message.game() else {
            return "unknown game";
        };
        match labels::display_name(game) {
            Some(label) => label,
            None => game,
        }
    }

    /// True for invites that can still be answered.
    pub fn is_invite(&self) -> bool {
        self.message.op() == Some(Operation::Create)
    }

    /// Builds the "accept" reply token.
    ///
    /// # Errors
    /// See [`InviteCard::decline`].
    pub fn accept(&self) -> Result<String, CardError> {
        self.respond(Operation::Accept)
    }

    /// Builds the "decline" reply token.
    ///
    /// Replies are always compact tokens, even to a legacy invite.
    ///
    /// # Errors
    /// - [`CardError::NotAnInvite`] if this card isn't a `create` message
    /// - [`CardError::MissingSession`] if the invite had no usable session id
    /// - [`CardError::Encode`] if the game can't be put on the wire
    pub fn decline(&self) -> Result<String, CardError> {
        self.respond(Operation::Decline)
    }

    fn respond(&self, op: Operation) -> Result<String, CardError> {
        let Some(invite) = self
            .message
            .to_invite()
            .filter(|invite| invite.op == Operation::Create)
        else {
            return Err(CardError::NotAnInvite(self.message.op_text()));
        };
        let Some(session) = invite.id else {
            return Err(CardError::MissingSession);
        };

        let reply = encode(&invite.reply(op))?;
        tracing::debug!(%op, game = %invite.game, %session, "invite answered");
        Ok(reply)
    }
}

/// Creates a token inviting the recipient to play `game`, with a fresh
/// random session id.
///
/// # Errors
/// [`EncodeError::UnknownGame`] if `game` isn't registered.
pub fn new_invite(game: &str) -> Result<String, EncodeError> {
    encode(&InviteMessage::new(Operation::Create, game))
}
