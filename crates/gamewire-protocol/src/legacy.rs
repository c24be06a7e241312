//! Recognizers for the two legacy text formats.
//!
//! Before the compact token existed, game messages travelled as JSON:
//!
//! - **Raw JSON**: `{"type":"game","op":"create","game":"tic_tac_toe","id":"abc123"}`
//! - **Prefixed**: `gamewire:` + standard base64 of that same JSON
//!
//! Nothing sends these any more, but old clients on slow store-and-forward
//! links do, so they are still decoded. Only decoding: the encoder always
//! writes compact tokens.
//!
//! Legacy objects are handed back as a [`LegacyMessage`] holding the parsed
//! JSON object untouched. Nothing is renamed, re-cased or re-padded: if
//! the sender wrote `"id":"sess-1"` or `"op":"rematch"`, that's what the
//! caller gets.
//!
//! Compiled only with the `legacy` feature (on by default).

use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine as _;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::codec::Recognition;
use crate::{DecodeError, GameMessage, Operation, SessionId};

/// Marks the legacy base64-wrapped JSON format.
pub const PREFIX: &str = "gamewire:";

/// Standard-alphabet decoder, lenient about padding and trailing bits.
///
/// The stock `STANDARD` engine insists on `=` padding and rejects input
/// whose last character carries stray low bits. Legacy senders used the
/// browser's `btoa`/`atob`, which are relaxed about both, so this engine
/// is configured the same way:
///
/// - `DecodePaddingMode::Indifferent` → accept `eyJ9` and `eyJ9==` alike
/// - `with_decode_allow_trailing_bits(true)` → ignore unused bits in the
///   final character instead of erroring
const LENIENT_STANDARD: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

// ---------------------------------------------------------------------------
// LegacyMessage
// ---------------------------------------------------------------------------

/// A legacy JSON game message, exactly as the sender wrote it.
///
/// `#[serde(transparent)]` makes it serialize as the inner object, so
/// `serde_json::to_value(&msg)` gives back the original JSON.
///
/// The accessors offer a typed reading of the well-known fields; they
/// return `None` rather than fail when a field doesn't fit.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct LegacyMessage(Map<String, Value>);

impl LegacyMessage {
    /// All fields, including `type`.
    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    pub fn into_fields(self) -> Map<String, Value> {
        self.0
    }

    /// `op` as a known name or a code 0-15.
    pub fn op(&self) -> Option<Operation> {
        match self.get("op")? {
            Value::String(name) => name.parse().ok(),
            Value::Number(n) => n
                .as_u64()
                .filter(|code| *code <= 0x0F)
                .map(|code| Operation::from_code(code as u8)),
            _ => None,
        }
    }

    /// `op` as text, verbatim when it's a string.
    pub fn op_text(&self) -> String {
        match self.get("op") {
            Some(Value::String(name)) => name.clone(),
            Some(other) => other.to_string(),
            None => "unknown".to_owned(),
        }
    }

    pub fn game(&self) -> Option<&str> {
        self.get("game").and_then(Value::as_str)
    }

    /// `id` read as a compact session id: a hex string or a non-negative
    /// integer, masked to 24 bits. `None` for ids like `"sess-1"`.
    pub fn session(&self) -> Option<SessionId> {
        match self.get("id")? {
            Value::String(text) => text.parse().ok(),
            Value::Number(n) => n.as_u64().map(SessionId::new),
            _ => None,
        }
    }

    /// `id` as the sender wrote it.
    pub fn session_text(&self) -> Option<String> {
        match self.get("id")? {
            Value::String(text) => Some(text.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Recognizers
// ---------------------------------------------------------------------------

/// Raw JSON form.
///
/// Any text that parses as JSON is *claimed* by this recognizer: if it
/// isn't a complete game message, decoding stops here with a rejection
/// instead of moving on to the prefixed form.
pub(crate) fn recognize_json(text: &str) -> Recognition {
    let value: Value = match serde_json::from_str(text) {
        Ok(value) => value,
        Err(e) => return Recognition::Skip(e.into()),
    };

    if !is_game(&value) {
        return Recognition::Reject(not_a_game("type is not \"game\""));
    }
    if let Some(field) = ["op", "game", "id"]
        .into_iter()
        .find(|f| !value.get(f).is_some_and(is_truthy))
    {
        return Recognition::Reject(not_a_game(&format!("missing {field}")));
    }

    into_message(value)
}

/// `gamewire:` + base64(JSON) form. Only `type` is checked here.
pub(crate) fn recognize_prefixed(text: &str) -> Recognition {
    let Some(body) = text.strip_prefix(PREFIX) else {
        return Recognition::Skip(DecodeError::UnknownFormat);
    };

    let bytes = match LENIENT_STANDARD.decode(body) {
        Ok(bytes) => bytes,
        Err(e) => return Recognition::Skip(e.into()),
    };
    let value: Value = match serde_json::from_slice(&bytes) {
        Ok(value) => value,
        Err(e) => return Recognition::Skip(e.into()),
    };

    if !is_game(&value) {
        return Recognition::Reject(not_a_game("type is not \"game\""));
    }

    into_message(value)
}

fn is_game(value: &Value) -> bool {
    value.get("type").and_then(Value::as_str) == Some("game")
}

/// JavaScript truthiness, which is what the legacy senders checked.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Wraps the object as-is. `is_game` has already established it's an
/// object, so the fallback arm is never taken in practice.
fn into_message(value: Value) -> Recognition {
    match value {
        Value::Object(fields) => {
            Recognition::Match(GameMessage::Legacy(LegacyMessage(fields)))
        }
        _ => Recognition::Reject(not_a_game("not a JSON object")),
    }
}

fn not_a_game(reason: &str) -> DecodeError {
    DecodeError::NotAGameMessage(reason.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::engine::general_purpose::STANDARD;
    use serde_json::json;

    fn wrap(value: &Value) -> String {
        format!("{PREFIX}{}", STANDARD.encode(value.to_string()))
    }

    /// Unwraps a match into the JSON object it carries.
    fn matched(recognition: Recognition) -> Value {
        match recognition {
            Recognition::Match(msg) => serde_json::to_value(msg).unwrap(),
            Recognition::Reject(e) => panic!("rejected: {e}"),
            Recognition::Skip(e) => panic!("skipped: {e}"),
        }
    }

    fn legacy(recognition: Recognition) -> LegacyMessage {
        match recognition {
            Recognition::Match(GameMessage::Legacy(msg)) => msg,
            other => panic!("expected a legacy match, got {other:?}"),
        }
    }

    // =========================================================================
    // Raw JSON
    // =========================================================================

    #[test]
    fn test_json_full_message_matches() {
        let input = json!({
            "type": "game", "op": "create", "game": "tic_tac_toe", "id": "12ab34",
        });
        let msg = legacy(recognize_json(&input.to_string()));
        assert_eq!(msg.op(), Some(Operation::Create));
        assert_eq!(msg.game(), Some("tic_tac_toe"));
        assert_eq!(msg.session(), Some(SessionId::new(0x12AB34)));
        assert_eq!(serde_json::to_value(&msg).unwrap(), input);
    }

    #[test]
    fn test_json_keeps_unknown_fields() {
        let input = json!({
            "type": "game", "op": "create", "game": "tic_tac_toe", "id": "12ab34",
            "from": "alice", "ts": 1_700_000_000,
        });
        assert_eq!(matched(recognize_json(&input.to_string())), input);
    }

    #[test]
    fn test_json_non_hex_id_is_returned_verbatim() {
        let input = json!({
            "type": "game", "op": "create", "game": "tic_tac_toe", "id": "game-42",
        });
        let msg = legacy(recognize_json(&input.to_string()));
        assert_eq!(msg.session_text().as_deref(), Some("game-42"));
        assert_eq!(msg.session(), None);
        assert_eq!(serde_json::to_value(&msg).unwrap(), input);
    }

    #[test]
    fn test_json_unknown_op_is_returned_verbatim() {
        let input = json!({
            "type": "game", "op": "rematch", "game": "tic_tac_toe", "id": "12ab34",
        });
        let msg = legacy(recognize_json(&input.to_string()));
        assert_eq!(msg.op(), None);
        assert_eq!(msg.op_text(), "rematch");
        assert_eq!(serde_json::to_value(&msg).unwrap(), input);
    }

    #[test]
    fn test_json_id_spelling_is_not_normalised() {
        let upper = json!({
            "type": "game", "op": "accept", "game": "tic_tac_toe", "id": "ABC123",
        });
        assert_eq!(matched(recognize_json(&upper.to_string())), upper);

        let numeric = json!({
            "type": "game", "op": "accept", "game": "tic_tac_toe", "id": 5,
        });
        let msg = legacy(recognize_json(&numeric.to_string()));
        assert_eq!(msg.session_text().as_deref(), Some("5"));
        assert_eq!(msg.session(), Some(SessionId::new(5)));
        assert_eq!(serde_json::to_value(&msg).unwrap(), numeric);
    }

    #[test]
    fn test_json_numeric_op_reads_as_code() {
        let input = json!({ "type": "game", "op": 2, "game": "tic_tac_toe", "id": "1" });
        let msg = legacy(recognize_json(&input.to_string()));
        assert_eq!(msg.op(), Some(Operation::Decline));
        assert_eq!(msg.op_text(), "2");
    }

    #[test]
    fn test_json_wrong_type_is_rejected() {
        let text = json!({ "type": "chat", "op": "create", "game": "x", "id": "1" })
            .to_string();
        assert!(matches!(recognize_json(&text), Recognition::Reject(_)));
    }

    #[test]
    fn test_json_falsy_fields_are_rejected() {
        for field in ["op", "game", "id"] {
            let mut value =
                json!({ "type": "game", "op": "create", "game": "x", "id": "1" });
            value[field] = json!("");
            assert!(
                matches!(recognize_json(&value.to_string()), Recognition::Reject(_)),
                "empty {field} should be rejected"
            );
            value.as_object_mut().unwrap().remove(field);
            assert!(
                matches!(recognize_json(&value.to_string()), Recognition::Reject(_)),
                "missing {field} should be rejected"
            );
        }
    }

    #[test]
    fn test_json_non_object_is_rejected() {
        assert!(matches!(recognize_json("42"), Recognition::Reject(_)));
        assert!(matches!(recognize_json("[1,2]"), Recognition::Reject(_)));
    }

    #[test]
    fn test_json_unparseable_is_skipped() {
        assert!(matches!(recognize_json("hello"), Recognition::Skip(_)));
        assert!(matches!(recognize_json("gamewire:e30"), Recognition::Skip(_)));
    }

    // =========================================================================
    // Prefixed
    // =========================================================================

    #[test]
    fn test_prefixed_full_message_matches() {
        let input = json!({
            "type": "game", "op": "accept", "game": "tic_tac_toe", "id": "00002a",
        });
        assert_eq!(matched(recognize_prefixed(&wrap(&input))), input);
    }

    #[test]
    fn test_prefixed_type_alone_is_enough() {
        let input = json!({ "type": "game" });
        let msg = legacy(recognize_prefixed(&wrap(&input)));
        assert_eq!(msg.op(), None);
        assert_eq!(msg.op_text(), "unknown");
        assert_eq!(msg.game(), None);
        assert_eq!(serde_json::to_value(&msg).unwrap(), input);
    }

    #[test]
    fn test_prefixed_keeps_free_form_session() {
        let input = json!({
            "type": "game", "op": "create", "game": "tic_tac_toe", "id": "sess-1",
        });
        let msg = legacy(recognize_prefixed(&wrap(&input)));
        assert_eq!(msg.session_text().as_deref(), Some("sess-1"));
        assert_eq!(msg.into_fields(), *input.as_object().unwrap());
    }

    #[test]
    fn test_prefixed_wrong_type_is_rejected() {
        let text = wrap(&json!({ "type": "chat" }));
        assert!(matches!(recognize_prefixed(&text), Recognition::Reject(_)));
    }

    #[test]
    fn test_prefixed_bad_base64_is_skipped() {
        assert!(matches!(
            recognize_prefixed("gamewire:!!!"),
            Recognition::Skip(DecodeError::InvalidBase64(_))
        ));
    }

    #[test]
    fn test_prefixed_accepts_missing_padding() {
        // `{"type":"game","n":10}` is 22 bytes, so its base64 ends in `==`.
        let padded = wrap(&json!({ "type": "game", "n": 10 }));
        assert!(padded.ends_with('='));
        let unpadded = padded.trim_end_matches('=');
        assert!(matches!(recognize_prefixed(unpadded), Recognition::Match(_)));
    }

    #[test]
    fn test_prefixed_missing_prefix_is_skipped() {
        assert!(matches!(
            recognize_prefixed("gw:AAESqzQ"),
            Recognition::Skip(DecodeError::UnknownFormat)
        ));
    }

    // =========================================================================
    // Truthiness
    // =========================================================================

    #[test]
    fn test_truthiness_follows_javascript() {
        for falsy in [json!(null), json!(false), json!(0), json!(0.0), json!("")] {
            assert!(!is_truthy(&falsy), "{falsy} should be falsy");
        }
        for truthy in [json!(true), json!(1), json!(-1), json!("0"), json!([]), json!({})] {
            assert!(is_truthy(&truthy), "{truthy} should be truthy");
        }
    }
}
