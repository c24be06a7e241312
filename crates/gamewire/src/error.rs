//! Error type for the invite-card helpers.

use gamewire_protocol::EncodeError;

/// Errors from answering an invite.
///
/// The `#[from]` on [`CardError::Encode`] lets `?` lift codec errors
/// straight into this type.
#[derive(Debug, thiserror::Error)]
pub enum CardError {
    /// Only `create` messages can be accepted or declined. Carries the
    /// message's operation as text, so a legacy `"rematch"` reads as such.
    #[error("cannot respond to a {0} message")]
    NotAnInvite(String),

    /// The invite carried no session id that fits a compact token, so a
    /// reply couldn't be matched to it. Only legacy senders can produce
    /// this (no `id`, or one like `"sess-1"`).
    #[error("invite has no session id")]
    MissingSession,

    /// The reply could not be encoded (e.g. the game isn't registered in
    /// this build).
    #[error(transparent)]
    Encode(#[from] EncodeError),
}
