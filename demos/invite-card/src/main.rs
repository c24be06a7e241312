//! A terminal stand-in for a chat UI that understands game invites.
//!
//! ```text
//! invite-card invite tic_tac_toe     # print a fresh invite token
//! invite-card [accept|decline]       # read messages from stdin, answer invites
//! ```
//!
//! Each stdin line is one message as it arrived from the transport. Lines
//! that aren't game messages are skipped silently, the same way a chat UI
//! would just show them as text. Set `RUST_LOG=gamewire_protocol=debug` to
//! see why a line was skipped.

use std::io::{self, BufRead, Write};

use gamewire::prelude::*;
use tracing_subscriber::EnvFilter;

// ---------------------------------------------------------------------------
// Arguments
// ---------------------------------------------------------------------------

enum Command {
    Invite(String),
    Answer(Operation),
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Command, String> {
    match args.next().as_deref() {
        Some("invite") => args
            .next()
            .map(Command::Invite)
            .ok_or_else(|| "usage: invite-card invite <game>".to_owned()),
        None | Some("accept") => Ok(Command::Answer(Operation::Accept)),
        Some("decline") => Ok(Command::Answer(Operation::Decline)),
        Some(other) => Err(format!("unknown command {other:?}")),
    }
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

fn render(card: &InviteCard) -> String {
    let msg = card.message();
    let session = msg.session_text().unwrap_or_else(|| "------".into());
    let headline = match msg.op() {
        Some(Operation::Create) => format!("Invitation to play {}", card.label()),
        Some(Operation::Accept) => format!("{} invite accepted", card.label()),
        Some(Operation::Decline) => format!("{} invite declined", card.label()),
        Some(Operation::Reserved(code)) => {
            format!("{} (unsupported action {code})", card.label())
        }
        None => format!("{} (unsupported action {})", card.label(), msg.op_text()),
    };
    format!("[{session}] {headline}")
}

/// Handles one incoming line. Returns the lines to print.
fn answer_line(line: &str, op: Operation) -> Vec<String> {
    let Some(card) = InviteCard::from_text(line.trim()) else {
        return Vec::new();
    };

    let mut out = vec![render(&card)];
    if card.is_invite() {
        let reply = match op {
            Operation::Decline => card.decline(),
            _ => card.accept(),
        };
        match reply {
            Ok(token) => out.push(format!("  reply: {token}")),
            Err(e) => {
                tracing::warn!(error = %e, "could not answer invite");
                out.push(format!("  cannot answer: {e}"));
            }
        }
    }
    out
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let command = parse_args(std::env::args().skip(1))?;

    match command {
        Command::Invite(game) => println!("{}", new_invite(&game)?),
        Command::Answer(op) => {
            let stdout = io::stdout();
            let mut stdout = stdout.lock();
            for line in io::stdin().lock().lines() {
                for out in answer_line(&line?, op) {
                    writeln!(stdout, "{out}")?;
                }
            }
        }
    }
    Ok(())
}
