//! The deaddrop relay: a blind store-and-forward service.
//!
//! The relay keeps a directory of public keys and one pending envelope
//! per identity. It never holds private keys and never inspects payloads,
//! so a compromised relay leaks metadata but no plaintext.

pub mod config;
pub mod directory;
pub mod http;
pub mod mailbox;
pub mod process;
pub mod state;
pub mod store;

pub use config::ServiceConfig;
pub use directory::IdentityMode;
pub use state::ServiceState;
