//! # GameWire
//!
//! Game invites and responses for low-bitrate messaging transports.
//!
//! The wire codec lives in [`gamewire_protocol`] and is re-exported here.
//! On top of it this crate adds the small amount of glue a chat UI needs
//! to show an invite and answer it:
//!
//! - [`InviteCard`]: a decoded message ready to render, with
//!   [`accept`](InviteCard::accept) / [`decline`](InviteCard::decline)
//!   producing the reply token.
//! - [`labels`]: human-readable game names, separate from wire codes.
//! - [`new_invite`]: start a fresh invite.
//!
//! ## Quick Start
//!
//! ```rust
//! use gamewire::prelude::*;
//!
//! // Alice invites Bob.
//! let token = new_invite("tic_tac_toe")?;
//!
//! // Bob's client sees the token arrive and renders a card.
//! let card = InviteCard::from_text(&token).expect("a game invite");
//! assert_eq!(card.label(), "Tic-Tac-Toe");
//!
//! // Bob taps "accept"; the reply goes back over the transport.
//! let reply = card.accept()?;
//! let answer = decode(&reply).expect("a game message");
//! assert_eq!(answer.op(), Some(Operation::Accept));
//! assert_eq!(answer.session(), card.message().session());
//! # Ok::<(), gamewire::CardError>(())
//! ```

mod card;
mod error;
pub mod labels;

pub use card::{new_invite, InviteCard};
pub use error::CardError;
pub use gamewire_protocol::*;

/// Everything a UI layer usually needs.
pub mod prelude {
    pub use crate::{
        decode, encode, new_invite, CardError, EncodeError, GameId, GameMessage,
        InviteCard, InviteMessage, Operation, SessionId,
    };
}
