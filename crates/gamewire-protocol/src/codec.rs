//! Encoding records to tokens and recognising tokens as records.
//!
//! # Encoding
//!
//! [`encode`] accepts anything implementing [`ToWire`]. An
//! [`InviteMessage`] becomes a compact `gw:` token; a string is passed
//! through untouched, for callers that already hold a token (or a legacy
//! string) and just want to forward it.
//!
//! # Decoding
//!
//! Text from the transport is untrusted: it may be a chat message, a
//! corrupted payload, or something from a newer client. [`decode`] runs the
//! text past an ordered list of recognizers, first match wins:
//!
//! ```text
//! "gw:…"        → compact token
//! {…}           → legacy raw JSON          (feature "legacy")
//! "gamewire:…"  → legacy base64 JSON       (feature "legacy")
//! anything else → None
//! ```
//!
//! A recognizer that *structurally* claims the text but finds it
//! semantically wrong (valid JSON without `"type":"game"`, a compact
//! payload from a newer version) ends the search: later recognizers are
//! not tried.
//!
//! Compact tokens decode to a typed [`InviteMessage`]. Legacy JSON comes
//! back as the sender's own object, wrapped in [`GameMessage`].

use crate::payload::CompactPayload;
use crate::session::random_session_id;
use crate::{token, DecodeError, EncodeError, GameMessage, InviteMessage, MessageKind};

// ---------------------------------------------------------------------------
// Encoding
// ---------------------------------------------------------------------------

/// Something that can be turned into text for the transport.
///
/// Implemented for [`InviteMessage`] (encodes a compact token) and for
/// strings (returned unchanged).
pub trait ToWire {
    /// Produces the transport text.
    ///
    /// # Errors
    /// See [`encode`].
    fn to_wire(&self) -> Result<String, EncodeError>;
}

impl ToWire for InviteMessage {
    fn to_wire(&self) -> Result<String, EncodeError> {
        let payload = encode_payload(self)?;
        let token = token::to_token(&payload);
        tracing::trace!(op = %self.op, game = %self.game, %token, "encoded game message");
        Ok(token)
    }
}

impl ToWire for str {
    fn to_wire(&self) -> Result<String, EncodeError> {
        Ok(self.to_owned())
    }
}

impl ToWire for String {
    fn to_wire(&self) -> Result<String, EncodeError> {
        Ok(self.clone())
    }
}

/// Encodes a record (or passes a string through) as transport text.
///
/// When the message has no session id, a random one is generated; this
/// is the only side effect.
///
/// # Errors
/// - [`EncodeError::UnknownOperation`] for reserved operation codes
/// - [`EncodeError::UnknownGame`] for games missing from the registry
///
/// # Example
///
/// ```rust
/// use gamewire_protocol::{encode, InviteMessage, Operation};
///
/// let invite = InviteMessage::new(Operation::Create, "tic_tac_toe")
///     .with_session(0x12AB34_u32);
/// assert_eq!(encode(&invite).unwrap(), "gw:AAESqzQ");
///
/// // Strings are forwarded as-is.
/// assert_eq!(encode("gw:AAESqzQ").unwrap(), "gw:AAESqzQ");
/// ```
// `?Sized` lifts the implicit `T: Sized` bound so `T` can be `str` itself,
// letting callers write `encode("gw:...")` without `.to_string()`.
pub fn encode<T: ToWire + ?Sized>(value: &T) -> Result<String, EncodeError> {
    value.to_wire()
}

/// Builds the 5-byte payload for a message without wrapping it as text.
///
/// Useful for transports that carry raw bytes.
///
/// # Errors
/// Same as [`encode`].
pub fn encode_payload(message: &InviteMessage) -> Result<CompactPayload, EncodeError> {
    let op_code = message.op.wire_code()?;
    let game_code = message
        .game
        .code()
        .ok_or_else(|| EncodeError::UnknownGame(message.game.to_string()))?;
    let session = message.id.unwrap_or_else(random_session_id);
    Ok(CompactPayload::new(op_code, game_code, session))
}

// ---------------------------------------------------------------------------
// Decoding
// ---------------------------------------------------------------------------

/// Outcome of offering text to one recognizer.
#[derive(Debug)]
pub(crate) enum Recognition {
    /// The text is a game message in this format.
    Match(GameMessage),
    /// The text is in this format but isn't an acceptable game message.
    /// Decoding stops.
    Reject(DecodeError),
    /// The text isn't in this format. Try the next recognizer.
    Skip(DecodeError),
}

// A plain function pointer rather than `Box<dyn Fn>`: recognizers hold no
// state, and `fn` pointers can live in a `const` table. `#[cfg]` on an
// element of an array literal drops that element entirely, so with the
// `legacy` feature off the table is just `[compact]`.
type Recognizer = fn(&str) -> Recognition;

/// Recognizers in priority order, paired with a name for trace logs.
const RECOGNIZERS: &[(&str, Recognizer)] = &[
    ("compact", recognize_compact),
    #[cfg(feature = "legacy")]
    ("legacy_json", crate::legacy::recognize_json),
    #[cfg(feature = "legacy")]
    ("legacy_prefixed", crate::legacy::recognize_prefixed),
];

/// Decodes transport text into a message, or `None` if the text isn't a
/// game message this codec understands.
///
/// Never panics and never returns an error: anything malformed,
/// truncated, from a future version, or simply unrelated is `None`. The
/// UI should treat `None` as "not an invite" and ignore it.
///
/// Decoded compact messages always carry a session id.
///
/// # Example
///
/// ```rust
/// use gamewire_protocol::{decode, Operation};
///
/// let msg = decode("gw:AAESqzQ").unwrap();
/// assert_eq!(msg.op(), Some(Operation::Create));
/// assert_eq!(msg.game(), Some("tic_tac_toe"));
/// assert_eq!(msg.session_text().as_deref(), Some("12ab34"));
///
/// assert!(decode("see you at 5").is_none());
/// ```
pub fn decode(text: &str) -> Option<GameMessage> {
    match try_decode(text) {
        Ok(message) => Some(message),
        Err(e) => {
            tracing::debug!(reason = %e, "ignoring text that is not a game message");
            None
        }
    }
}

/// Like [`decode`], but says why the text was not accepted.
///
/// # Errors
/// The [`DecodeError`] from the recognizer that rejected the text, or
/// [`DecodeError::UnknownFormat`] when no recognizer claimed it.
pub fn try_decode(text: &str) -> Result<GameMessage, DecodeError> {
    for &(format, recognize) in RECOGNIZERS {
        match recognize(text) {
            Recognition::Match(message) => {
                tracing::trace!(format, op = %message.op_text(), game = ?message.game(), "decoded game message");
                return Ok(message);
            }
            Recognition::Reject(e) => return Err(e),
            Recognition::Skip(e) => {
                tracing::trace!(format, reason = %e, "format did not match");
            }
        }
    }
    Err(DecodeError::UnknownFormat)
}

/// The compact `gw:` token.
///
/// Bad base64 skips to the next recognizer; a short payload or a
/// version other than 0 rejects.
fn recognize_compact(text: &str) -> Recognition {
    let bytes = match token::from_token(text) {
        Ok(bytes) => bytes,
        Err(e) => return Recognition::Skip(e),
    };
    match CompactPayload::from_bytes(&bytes) {
        Ok(payload) => Recognition::Match(GameMessage::Compact(InviteMessage {
            kind: MessageKind::Game,
            op: payload.operation(),
            game: payload.game(),
            id: Some(payload.session()),
        })),
        Err(e) => Recognition::Reject(e),
    }
}
