//! Transport tokens: the compact payload as URL-safe text.
//!
//! A token is `"gw:"` followed by the payload in base64url with the
//! padding stripped. Five bytes always become eight base64 characters
//! ending in a single `=`; dropping it leaves seven, so every token is
//! exactly ten ASCII characters:
//!
//! ```text
//! [0x00, 0x01, 0x12, 0xAB, 0x34]  →  "gw:AAESqzQ"
//! ```
//!
//! Decoding is lenient about padding (present or not) and about unused
//! trailing bits, the same way browser `atob` is, so tokens produced by
//! other implementations still read. It also accepts the standard
//! alphabet's `+` and `/` in place of `-` and `_`, for senders that
//! encoded with plain base64.

use std::borrow::Cow;

use base64::alphabet;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine as _;

use crate::{CompactPayload, DecodeError};

/// Marks a compact transport token.
pub const PREFIX: &str = "gw:";

/// Length of every token produced by [`to_token`].
pub const TOKEN_LEN: usize = PREFIX.len() + 7;

/// base64url decoder that accepts padded and unpadded input.
///
/// The `base64` crate ships ready-made engines (`URL_SAFE`,
/// `URL_SAFE_NO_PAD`, ...), but each one is strict in its own way: the
/// `NO_PAD` engines reject `=`, the padded ones require it, and all of
/// them reject a final character with non-zero unused bits. Building a
/// `GeneralPurpose` engine by hand lets us pick:
///
/// - `alphabet::URL_SAFE` → `-` and `_` instead of `+` and `/`
/// - `DecodePaddingMode::Indifferent` → `=` optional
/// - `with_decode_allow_trailing_bits(true)` → `gw:AAESqzR` reads the
///   same as `gw:AAESqzQ`
///
/// `GeneralPurpose::new` is a `const fn`, so the engine is built at
/// compile time and costs nothing at runtime.
const LENIENT_URL_SAFE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

/// Encodes a payload as a `gw:` token.
pub fn to_token(payload: &CompactPayload) -> String {
    let mut token = String::with_capacity(TOKEN_LEN);
    token.push_str(PREFIX);
    // `encode_string` appends to an existing `String`, so the prefix and
    // the body share one allocation.
    URL_SAFE_NO_PAD.encode_string(payload.as_bytes(), &mut token);
    token
}

/// Decodes the bytes carried by a `gw:` token.
///
/// The byte count is not checked here; [`CompactPayload::from_bytes`]
/// does that.
///
/// # Errors
/// - [`DecodeError::UnknownFormat`] when the `gw:` prefix is missing
/// - [`DecodeError::InvalidBase64`] when the body isn't base64 in either
///   alphabet
pub fn from_token(text: &str) -> Result<Vec<u8>, DecodeError> {
    let body = text.strip_prefix(PREFIX).ok_or(DecodeError::UnknownFormat)?;
    Ok(LENIENT_URL_SAFE.decode(to_url_safe(body).as_bytes())?)
}

/// Rewrites standard-alphabet `+` and `/` to their URL-safe counterparts.
///
/// Returns `Cow::Borrowed` for the usual case of an already URL-safe body,
/// so only mixed-alphabet input pays for a copy.
fn to_url_safe(body: &str) -> Cow<'_, str> {
    if body.contains(['+', '/']) {
        Cow::Owned(body.replace('+', "-").replace('/', "_"))
    } else {
        Cow::Borrowed(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SessionId;

    #[test]
    fn test_to_token_known_vector() {
        let payload = CompactPayload::new(0, 1, SessionId::new(0x12AB34));
        assert_eq!(to_token(&payload), "gw:AAESqzQ");
    }

    #[test]
    fn test_to_token_is_fixed_length_url_safe() {
        // All-ones bytes exercise the `-` and `_` characters.
        let payload = CompactPayload::new(0x0F, 0xFF, SessionId::new(0xFF_FFFF));
        let token = to_token(&payload);
        assert_eq!(token.len(), TOKEN_LEN);
        let body = &token[PREFIX.len()..];
        assert!(body
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }

    #[test]
    fn test_from_token_accepts_unpadded_and_padded() {
        let expected = vec![0x00, 0x01, 0x12, 0xAB, 0x34];
        assert_eq!(from_token("gw:AAESqzQ").unwrap(), expected);
        assert_eq!(from_token("gw:AAESqzQ=").unwrap(), expected);
    }

    #[test]
    fn test_from_token_accepts_non_canonical_trailing_bits() {
        // `R` instead of `Q` sets a bit that falls off the end.
        assert_eq!(
            from_token("gw:AAESqzR").unwrap(),
            vec![0x00, 0x01, 0x12, 0xAB, 0x34]
        );
    }

    #[test]
    fn test_from_token_accepts_standard_alphabet() {
        let expected = vec![0x00, 0x01, 0xFF, 0xFF, 0xFF];
        assert_eq!(from_token("gw:AAH___8").unwrap(), expected);
        assert_eq!(from_token("gw:AAH///8").unwrap(), expected);
        assert_eq!(from_token("gw:AAH/_/8=").unwrap(), expected);
    }

    #[test]
    fn test_to_url_safe_borrows_when_nothing_to_rewrite() {
        assert!(matches!(to_url_safe("AAESqzQ"), Cow::Borrowed(_)));
        assert_eq!(to_url_safe("a+b/c"), "a-b_c");
    }

    #[test]
    fn test_from_token_without_prefix_is_unknown_format() {
        assert!(matches!(
            from_token("AAESqzQ"),
            Err(DecodeError::UnknownFormat)
        ));
    }

    #[test]
    fn test_from_token_rejects_bad_characters() {
        assert!(matches!(
            from_token("gw:AA*Sqz!"),
            Err(DecodeError::InvalidBase64(_))
        ));
    }
}
