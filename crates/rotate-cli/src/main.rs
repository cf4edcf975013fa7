//! rotate-backups - Rotate backups according to a retention scheme.

use clap::Parser;
use rotate_cli::{logging, Cli};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose, cli.quiet);

    match rotate_cli::run(&cli).await {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
