use clap::Parser;

use deaddrop_client::args::Args;
use deaddrop_client::op::{self, Op};

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Resolve relay URL: explicit flag > state config > hardcoded 8080
    let server = op::resolve_server(args.server, args.state_dir.clone());

    let ctx = match op::OpContext::new(server, args.state_dir) {
        Ok(ctx) => ctx,
        Err(e) => {
            eprintln!("Error: Failed to create API client: {}", e);
            std::process::exit(1);
        }
    };

    match args.command.execute(&ctx).await {
        Ok(output) => {
            println!("{}", output);
            std::process::exit(0);
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
