//! Compact wire codec for game invites over low-bitrate transports.
//!
//! On links like LoRa or store-and-forward mesh messaging, every byte
//! counts. This crate squeezes a game invite, or the answer to one, into
//! 5 bytes and carries them as a 10-character text token:
//!
//! ```text
//! { op: create, game: tic_tac_toe, id: 12ab34 }
//!     ↕  encode / decode
//! [0x00, 0x01, 0x12, 0xAB, 0x34]
//!     ↕  base64url, no padding, "gw:" prefix
//! "gw:AAESqzQ"
//! ```
//!
//! - **Types** ([`InviteMessage`], [`Operation`], [`GameId`], [`SessionId`])
//!   are the record callers build. [`GameMessage`] is what decoding hands
//!   back: a typed record for compact tokens, the sender's own JSON object
//!   for legacy formats.
//! - **Registry** ([`registry`]) maps game names to wire codes.
//! - **Codec** ([`encode`], [`decode`]) converts records to tokens and
//!   back. Decoding also understands two older JSON formats (feature
//!   `legacy`, on by default).
//! - **Errors** ([`EncodeError`], [`DecodeError`]).
//!
//! There is no encryption and no sender field: identity comes from the
//! transport envelope. The codec holds no state beyond its constant
//! tables, so every function is safe to call from any thread.

mod codec;
mod error;
#[cfg(feature = "legacy")]
mod legacy;
mod message;
mod payload;
pub mod registry;
mod session;
pub mod token;
mod types;

pub use codec::{decode, encode, encode_payload, try_decode, ToWire};
pub use error::{DecodeError, EncodeError};
#[cfg(feature = "legacy")]
pub use legacy::{LegacyMessage, PREFIX as LEGACY_PREFIX};
pub use message::GameMessage;
pub use payload::CompactPayload;
pub use session::random_session_id;
pub use types::{GameId, InviteMessage, MessageKind, Operation, SessionId};
