//! skypost: publish one post and exit.
//!
//! Reads a `.env` file when present; every flag can also be set through its environment
//! variable.

use clap::Parser;
use skypost_cli::{init_tracing, run, AppContext, Cli};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(&cli.log_level, cli.log_format);

    let ctx = AppContext::new();
    tracing::info!(version = ctx.version, revision = ctx.revision, "Starting skypost");

    match run(&cli).await {
        Ok(_) => {
            tracing::info!(elapsed_ms = ctx.elapsed_ms(), "Done");
        }
        Err(e) => {
            tracing::error!(
                error = %format!("{:#}", e),
                elapsed_ms = ctx.elapsed_ms(),
                "Failed to publish post"
            );
            std::process::exit(1);
        }
    }
}
