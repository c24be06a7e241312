//! Human-readable game names for display.
//!
//! This table belongs to the UI, not the wire: it can be translated,
//! reworded or extended freely without touching the
//! [`registry`](gamewire_protocol::registry).

const LABELS: &[(&str, &str)] = &[
    ("tic_tac_toe", "Tic-Tac-Toe"),
];

/// The display name for a game identifier, if one is known.
pub fn display_name(game: &str) -> Option<&'static str> {
    LABELS
        .iter()
        .find(|(id, _)| *id == game)
        .map(|(_, label)| *label)
}
