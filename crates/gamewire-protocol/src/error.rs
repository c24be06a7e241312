//! Error types for the codec.
//!
//! Encoding and decoding fail for very different reasons, so they get
//! separate enums:
//!
//! - [`EncodeError`] means the *caller* handed us something we can't put
//!   on the wire (a typo'd game name, a reserved operation). These are
//!   bugs in the calling code and are returned loudly.
//! - [`DecodeError`] means some text from the transport isn't a game
//!   message we understand. The transport is untrusted, so
//!   [`decode`](crate::decode) swallows these and returns `None`;
//!   [`try_decode`](crate::try_decode) hands them back for diagnostics.

/// Errors returned when building a transport token.
///
/// `#[derive(thiserror::Error)]` generates the `std::error::Error` impl;
/// each `#[error("...")]` is the message shown when the error is printed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EncodeError {
    /// The operation is not one of `create`, `accept`, `decline`.
    ///
    /// Reserved codes (3-15) decode fine but can't be sent by this
    /// version of the codec.
    #[error("unknown operation: {0}")]
    UnknownOperation(String),

    /// The game identifier has no entry in the registry.
    #[error("unknown game: {0}")]
    UnknownGame(String),

    /// A session id string that isn't hexadecimal.
    #[error("invalid session id: {0:?}")]
    InvalidSessionId(String),
}

/// Reasons a piece of text was not accepted as a game message.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    /// None of the known formats recognised the text.
    #[error("not a recognised game message format")]
    UnknownFormat,

    /// The compact payload had fewer than 5 bytes.
    #[error("payload truncated: expected 5 bytes, got {0}")]
    Truncated(usize),

    /// The compact payload was written by a newer codec version.
    #[error("unsupported payload version {0}")]
    UnsupportedVersion(u8),

    /// The token body was not valid base64.
    #[error("invalid base64: {0}")]
    InvalidBase64(#[from] base64::DecodeError),

    /// A legacy message body was not valid JSON.
    #[cfg(feature = "legacy")]
    #[error("invalid json: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// Well-formed JSON that isn't a game message (wrong `type`, or a
    /// missing `op` / `game` / `id`).
    #[error("not a game message: {0}")]
    NotAGameMessage(String),
}
