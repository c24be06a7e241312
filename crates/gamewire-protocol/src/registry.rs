//! The game registry: symbolic game identifiers ↔ single-byte wire codes.
//!
//! Every compact payload carries its game as one byte, so both peers need
//! the same table to agree on what `0x01` means. Codes already handed out
//! live on in payloads that are still in transit (store-and-forward
//! networks can hold a message for hours), which gives the table one hard
//! rule:
//!
//! **Append only.** Never reuse, renumber, or remove an entry. Code `0` is
//! reserved and never assigned.
//!
//! The table is a plain `const` slice rather than a `HashMap` behind a
//! lazy global: it is tiny, immutable, and a linear scan over a handful of
//! entries is as fast as hashing.

/// All registered games, in code order.
///
/// `&[(&str, u8)]` is a slice of tuples with `'static` lifetime: the
/// strings and the array both live in the binary's read-only data, so
/// [`name_for`] can hand out `&'static str` without allocating.
pub const GAMES: &[(&str, u8)] = &[
    ("tic_tac_toe", 1),
];

/// Looks up the wire code for a game identifier.
///
/// Returns `None` for identifiers that were never registered.
pub fn code_for(game: &str) -> Option<u8> {
    // `find` yields `&(&str, u8)`; the closure pattern `(name, _)`
    // destructures through that reference, leaving `name: &&str`.
    GAMES
        .iter()
        .find(|(name, _)| *name == game)
        .map(|(_, code)| *code)
}

/// Looks up the game identifier for a wire code.
///
/// Returns `None` for codes this build doesn't know; the caller decides
/// what to show instead (see [`GameId::from_code`](crate::GameId::from_code)).
pub fn name_for(code: u8) -> Option<&'static str> {
    GAMES
        .iter()
        .find(|(_, c)| *c == code)
        .map(|(name, _)| *name)
}
