//! The fixed 5-byte binary payload.
//!
//! ```text
//!  byte 0          byte 1      bytes 2..5
//! ┌────────┬────────┬───────────┬──────────────────────────┐
//! │version │   op   │ game code │ session id (24-bit, BE)  │
//! │ 7:4    │  3:0   │   7:0     │  23:16 · 15:8 · 7:0      │
//! └────────┴────────┴───────────┴──────────────────────────┘
//! ```
//!
//! The version nibble is 0. Decoders refuse any other version rather than
//! guess at a layout they don't know.

use crate::{DecodeError, GameId, Operation, SessionId};

const PAYLOAD_LEN: usize = 5;

/// Exactly 5 bytes, laid out as in the module docs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CompactPayload([u8; PAYLOAD_LEN]);

impl CompactPayload {
    /// Payload size in bytes.
    pub const LEN: usize = PAYLOAD_LEN;

    /// The only layout version this codec reads or writes.
    pub const VERSION: u8 = 0;

    /// Assembles a payload. `op_code` is masked to its 4-bit field.
    pub fn new(op_code: u8, game_code: u8, session: SessionId) -> Self {
        let [s0, s1, s2] = session.to_be_bytes();
        Self([
            (Self::VERSION << 4) | (op_code & 0x0F),
            game_code,
            s0,
            s1,
            s2,
        ])
    }

    /// Reads a payload from raw bytes.
    ///
    /// Bytes past the fifth are ignored.
    ///
    /// # Errors
    /// - [`DecodeError::Truncated`] for fewer than 5 bytes
    /// - [`DecodeError::UnsupportedVersion`] when the version nibble isn't 0
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, DecodeError> {
        let head: [u8; Self::LEN] = bytes
            .get(..Self::LEN)
            .and_then(|b| b.try_into().ok())
            .ok_or(DecodeError::Truncated(bytes.len()))?;

        let payload = Self(head);
        if payload.version() != Self::VERSION {
            return Err(DecodeError::UnsupportedVersion(payload.version()));
        }
        Ok(payload)
    }

    pub fn as_bytes(&self) -> &[u8; Self::LEN] {
        &self.0
    }

    pub fn version(&self) -> u8 {
        self.0[0] >> 4
    }

    pub fn operation(&self) -> Operation {
        Operation::from_code(self.0[0])
    }

    pub fn game_code(&self) -> u8 {
        self.0[1]
    }

    /// The game, or a `code_<n>` placeholder if it isn't registered.
    pub fn game(&self) -> GameId {
        GameId::from_code(self.game_code())
    }

    pub fn session(&self) -> SessionId {
        SessionId::from_be_bytes([self.0[2], self.0[3], self.0[4]])
    }
}
