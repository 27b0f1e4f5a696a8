//! Command line client for the deaddrop relay.
//!
//! Keeps a key pair under a local state directory, registers the public
//! half with a relay, and seals or opens envelopes entirely on this side
//! of the wire. The relay only ever sees ciphertext.

pub mod api;
pub mod args;
pub mod op;
pub mod ops;
pub mod relay;
pub mod state;

use clap::Subcommand;
use ops::{Init, Pull, Push, Status};

command_enum! {
    (Init, Init),
    (Pull, Pull),
    (Push, Push),
    (Status, Status),
}
