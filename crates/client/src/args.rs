pub use clap::Parser;

use std::path::PathBuf;
use url::Url;

#[derive(Parser, Debug)]
#[command(name = "deaddrop")]
#[command(version, about = "Send and receive end-to-end encrypted drops")]
pub struct Args {
    /// Relay URL (defaults to the one recorded at init, then localhost:8080)
    #[arg(long, global = true)]
    pub server: Option<Url>,

    /// Path to the deaddrop state directory (defaults to ~/.deaddrop)
    #[arg(long, global = true)]
    pub state_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: crate::Command,
}
