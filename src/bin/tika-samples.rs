use anyhow::Result;
use clap::Parser;
use tika_samples::cli;
use tracing::error;

fn main() -> Result<()> {
    let args = cli::GenerateArgs::parse();
    if let Err(err) = cli::generate(args) {
        if tracing::dispatcher::has_been_set() {
            error!("{:#}", err);
        } else {
            // Config or logging setup failed; no subscriber is listening.
            eprintln!("error: {:#}", err);
        }
        std::process::exit(1);
    }
    Ok(())
}
