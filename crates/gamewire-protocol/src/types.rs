//! The logical record exchanged between peers, and its building blocks.
//!
//! An [`InviteMessage`] is what callers build before encoding, and what a
//! compact token decodes into. Its JSON shape is the one UI code already
//! speaks:
//!
//! ```text
//! { "type": "game", "op": "create", "game": "tic_tac_toe", "id": "12ab34" }
//! ```
//!
//! Callers holding that JSON can deserialize it and hand it to
//! [`encode`](crate::encode); the session id may be a hex string or a
//! plain integer.

use std::fmt;
use std::str::FromStr;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{registry, EncodeError};

// ---------------------------------------------------------------------------
// Operation
// ---------------------------------------------------------------------------

/// What happened in the invite exchange.
///
/// The wire reserves 4 bits for the operation, so codes 3-15 exist on the
/// wire without a name yet. Instead of failing to decode them, a newer
/// sender's message comes through as [`Operation::Reserved`] carrying the
/// raw code, and the caller decides whether to care.
///
/// In JSON, named operations are lowercase strings and reserved ones are
/// the bare number: `"accept"`, `7`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Sender invites the recipient to a new game session.
    Create,
    /// Recipient accepts an invite.
    Accept,
    /// Recipient declines an invite.
    Decline,
    /// A code this version has no name for (3-15).
    Reserved(u8),
}

impl Operation {
    /// Maps a 4-bit wire code to an operation. Bits above the low nibble
    /// are ignored.
    pub fn from_code(code: u8) -> Self {
        match code & 0x0F {
            0 => Operation::Create,
            1 => Operation::Accept,
            2 => Operation::Decline,
            n => Operation::Reserved(n),
        }
    }

    /// The raw 4-bit code, including reserved ones.
    pub fn code(self) -> u8 {
        match self {
            Operation::Create => 0,
            Operation::Accept => 1,
            Operation::Decline => 2,
            Operation::Reserved(n) => n & 0x0F,
        }
    }

    /// The wire name, or `None` for reserved codes.
    pub fn name(self) -> Option<&'static str> {
        match self {
            Operation::Create => Some("create"),
            Operation::Accept => Some("accept"),
            Operation::Decline => Some("decline"),
            Operation::Reserved(_) => None,
        }
    }

    /// The code to put on the wire when encoding.
    ///
    /// # Errors
    /// [`EncodeError::UnknownOperation`] for reserved codes: this version
    /// only sends the three named operations.
    pub(crate) fn wire_code(self) -> Result<u8, EncodeError> {
        match self {
            Operation::Reserved(n) => Err(EncodeError::UnknownOperation(
                format!("reserved code {n}"),
            )),
            named => Ok(named.code()),
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => f.write_str(name),
            None => write!(f, "reserved({})", self.code()),
        }
    }
}

impl FromStr for Operation {
    type Err = EncodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "create" => Ok(Operation::Create),
            "accept" => Ok(Operation::Accept),
            "decline" => Ok(Operation::Decline),
            other => Err(EncodeError::UnknownOperation(other.to_owned())),
        }
    }
}

impl Serialize for Operation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.name() {
            Some(name) => serializer.serialize_str(name),
            None => serializer.serialize_u8(self.code()),
        }
    }
}

impl<'de> Deserialize<'de> for Operation {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct OperationVisitor;

        impl Visitor<'_> for OperationVisitor {
            type Value = Operation;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an operation name or a code between 0 and 15")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Operation, E> {
                v.parse().map_err(E::custom)
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Operation, E> {
                if v > 0x0F {
                    return Err(E::custom(format!("operation code {v} out of range")));
                }
                Ok(Operation::from_code(v as u8))
            }
        }

        deserializer.deserialize_any(OperationVisitor)
    }
}

// ---------------------------------------------------------------------------
// GameId
// ---------------------------------------------------------------------------

/// A symbolic game identifier such as `"tic_tac_toe"`.
///
/// Any string can be held here; only registered ones can be encoded.
/// Decoding never fails on an unknown game code: it produces a
/// placeholder like `"code_200"` so the UI can still show something.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GameId(String);

impl GameId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Resolves a wire code through the registry, or synthesizes
    /// `code_<n>` when the code isn't registered in this build.
    pub fn from_code(code: u8) -> Self {
        match registry::name_for(code) {
            Some(name) => Self(name.to_owned()),
            None => Self(format!("code_{code}")),
        }
    }

    /// The registry code for this game, if it has one.
    pub fn code(&self) -> Option<u8> {
        registry::code_for(&self.0)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for GameId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for GameId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

// ---------------------------------------------------------------------------
// SessionId
// ---------------------------------------------------------------------------

/// A 24-bit id tying an invite to its responses.
///
/// The wire has exactly 24 bits for it, so every constructor masks:
/// `SessionId::new(0x1FF_FFFF)` is the same id as `SessionId::new(0xFF_FFFF)`.
/// At the API boundary it reads and writes as 6 lowercase hex digits
/// (`"0012ab"`), and deserializing also accepts a plain integer.
///
/// Session ids are collision-avoidance tokens, not secrets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId(u32);

impl SessionId {
    /// Largest representable id.
    pub const MAX: u32 = 0x00FF_FFFF;

    /// Creates an id from the low 24 bits of `raw`. Higher bits are
    /// silently dropped.
    pub fn new(raw: u64) -> Self {
        Self((raw & Self::MAX as u64) as u32)
    }

    pub fn get(self) -> u32 {
        self.0
    }

    /// The id as 3 big-endian bytes, as laid out in the payload.
    pub fn to_be_bytes(self) -> [u8; 3] {
        let [_, hi, mid, lo] = self.0.to_be_bytes();
        [hi, mid, lo]
    }

    pub fn from_be_bytes(bytes: [u8; 3]) -> Self {
        Self(u32::from_be_bytes([0, bytes[0], bytes[1], bytes[2]]))
    }
}

impl From<u32> for SessionId {
    fn from(raw: u32) -> Self {
        Self::new(raw as u64)
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:06x}", self.0)
    }
}

/// Parses a hex string (optionally `0x`-prefixed, either case) and masks
/// it to 24 bits.
impl FromStr for SessionId {
    type Err = EncodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .unwrap_or(s);
        u64::from_str_radix(digits, 16)
            .map(Self::new)
            .map_err(|_| EncodeError::InvalidSessionId(s.to_owned()))
    }
}

impl Serialize for SessionId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for SessionId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct SessionIdVisitor;

        impl Visitor<'_> for SessionIdVisitor {
            type Value = SessionId;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a hex session id string or a non-negative integer")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<SessionId, E> {
                v.parse().map_err(E::custom)
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<SessionId, E> {
                Ok(SessionId::new(v))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<SessionId, E> {
                u64::try_from(v)
                    .map(SessionId::new)
                    .map_err(|_| E::custom("session id must not be negative"))
            }
        }

        deserializer.deserialize_any(SessionIdVisitor)
    }
}

// ---------------------------------------------------------------------------
// InviteMessage
// ---------------------------------------------------------------------------

/// The `type` discriminator. Only one family of messages exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    #[default]
    Game,
}

/// One event in an invite exchange: who wants to play what, and which
/// exchange it belongs to.
///
/// Sender identity is deliberately absent: it comes from the transport
/// envelope, not the payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InviteMessage {
    /// Always [`MessageKind::Game`]; serialized as `"type": "game"`.
    #[serde(rename = "type", default)]
    pub kind: MessageKind,

    pub op: Operation,

    pub game: GameId,

    /// `None` when encoding means "generate a fresh random id".
    /// Decoded messages always carry one.
    ///
    /// `skip_serializing_if` leaves the field out of the JSON entirely
    /// (rather than writing `"id": null`) while it is unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<SessionId>,
}

impl InviteMessage {
    /// Creates a message without a session id.
    pub fn new(op: Operation, game: impl Into<GameId>) -> Self {
        Self {
            kind: MessageKind::Game,
            op,
            game: game.into(),
            id: None,
        }
    }

    /// Sets the session id (builder style).
    pub fn with_session(mut self, id: impl Into<SessionId>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Builds the reply to this message for the same game and session.
    pub fn reply(&self, op: Operation) -> Self {
        Self {
            kind: MessageKind::Game,
            op,
            game: self.game.clone(),
            id: self.id,
        }
    }
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    // =====================================================================
    // Operation
    // =====================================================================

    #[test]
    fn test_operation_codes_match_wire_layout() {
        assert_eq!(Operation::Create.code(), 0);
        assert_eq!(Operation::Accept.code(), 1);
        assert_eq!(Operation::Decline.code(), 2);
    }

    #[test]
    fn test_operation_from_code_reserved_keeps_raw_code() {
        assert_eq!(Operation::from_code(3), Operation::Reserved(3));
        assert_eq!(Operation::from_code(15), Operation::Reserved(15));
        assert_eq!(Operation::from_code(15).code(), 15);
    }

    #[test]
    fn test_operation_from_code_ignores_high_nibble() {
        assert_eq!(Operation::from_code(0x21), Operation::Accept);
    }

    #[test]
    fn test_operation_reserved_cannot_be_encoded() {
        let err = Operation::Reserved(9).wire_code().unwrap_err();
        assert!(matches!(err, EncodeError::UnknownOperation(_)));
    }

    #[test]
    fn test_operation_parse_unknown_name_fails() {
        let err = "rematch".parse::<Operation>().unwrap_err();
        assert_eq!(err, EncodeError::UnknownOperation("rematch".into()));
    }

    #[test]
    fn test_operation_serializes_named_as_string_reserved_as_number() {
        assert_eq!(
            serde_json::to_string(&Operation::Decline).unwrap(),
            "\"decline\""
        );
        assert_eq!(serde_json::to_string(&Operation::Reserved(5)).unwrap(), "5");
    }

    #[test]
    fn test_operation_deserializes_from_name_or_code() {
        let op: Operation = serde_json::from_str("\"accept\"").unwrap();
        assert_eq!(op, Operation::Accept);
        let op: Operation = serde_json::from_str("4").unwrap();
        assert_eq!(op, Operation::Reserved(4));
        assert!(serde_json::from_str::<Operation>("16").is_err());
    }

    #[test]
    fn test_operation_display() {
        assert_eq!(Operation::Create.to_string(), "create");
        assert_eq!(Operation::Reserved(7).to_string(), "reserved(7)");
    }

    // =====================================================================
    // GameId
    // =====================================================================

    #[test]
    fn test_game_id_from_registered_code() {
        assert_eq!(GameId::from_code(1).as_str(), "tic_tac_toe");
    }

    #[test]
    fn test_game_id_from_unknown_code_is_placeholder() {
        let game = GameId::from_code(200);
        assert_eq!(game.as_str(), "code_200");
        assert_eq!(game.code(), None);
    }

    #[test]
    fn test_game_id_serializes_as_plain_string() {
        let json = serde_json::to_string(&GameId::new("tic_tac_toe")).unwrap();
        assert_eq!(json, "\"tic_tac_toe\"");
    }

    // =====================================================================
    // SessionId
    // =====================================================================

    #[test]
    fn test_session_id_display_is_zero_padded_lowercase_hex() {
        assert_eq!(SessionId::new(1).to_string(), "000001");
        assert_eq!(SessionId::new(0x12AB34).to_string(), "12ab34");
    }

    #[test]
    fn test_session_id_masks_to_24_bits() {
        assert_eq!(SessionId::new(0x1FF_FFFF), SessionId::new(0xFF_FFFF));
        assert_eq!(SessionId::new(0x1FF_FFFF).get(), SessionId::MAX);
        assert_eq!(SessionId::from(0xAB00_0001_u32).get(), 1);
    }

    #[test]
    fn test_session_id_parse_hex() {
        assert_eq!("12ab34".parse::<SessionId>().unwrap().get(), 0x12AB34);
        assert_eq!("12AB34".parse::<SessionId>().unwrap().get(), 0x12AB34);
        assert_eq!("0x000001".parse::<SessionId>().unwrap().get(), 1);
    }

    #[test]
    fn test_session_id_parse_long_hex_is_masked() {
        assert_eq!("ff12ab34".parse::<SessionId>().unwrap().get(), 0x12AB34);
    }

    #[test]
    fn test_session_id_parse_rejects_non_hex() {
        assert!(matches!(
            "xyz".parse::<SessionId>(),
            Err(EncodeError::InvalidSessionId(_))
        ));
        assert!("".parse::<SessionId>().is_err());
    }

    #[test]
    fn test_session_id_be_bytes() {
        let id = SessionId::new(0x12AB34);
        assert_eq!(id.to_be_bytes(), [0x12, 0xAB, 0x34]);
        assert_eq!(SessionId::from_be_bytes([0x12, 0xAB, 0x34]), id);
    }

    #[test]
    fn test_session_id_deserializes_from_string_or_integer() {
        let from_str: SessionId = serde_json::from_str("\"00ff00\"").unwrap();
        let from_int: SessionId = serde_json::from_str("65280").unwrap();
        assert_eq!(from_str, from_int);
        assert!(serde_json::from_str::<SessionId>("-1").is_err());
    }

    // =====================================================================
    // InviteMessage
    // =====================================================================

    #[test]
    fn test_invite_message_json_shape() {
        let msg = InviteMessage::new(Operation::Create, "tic_tac_toe")
            .with_session(0x12AB34_u32);
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "type": "game",
                "op": "create",
                "game": "tic_tac_toe",
                "id": "12ab34",
            })
        );
    }

    #[test]
    fn test_invite_message_without_id_omits_field() {
        let msg = InviteMessage::new(Operation::Accept, "tic_tac_toe");
        let json = serde_json::to_value(&msg).unwrap();
        assert!(json.get("id").is_none());
    }

    #[test]
    fn test_invite_message_reply_keeps_game_and_session() {
        let invite = InviteMessage::new(Operation::Create, "tic_tac_toe")
            .with_session(7_u32);
        let reply = invite.reply(Operation::Decline);
        assert_eq!(reply.op, Operation::Decline);
        assert_eq!(reply.game, invite.game);
        assert_eq!(reply.id, Some(SessionId::new(7)));
    }
}
