//! A command line driver for swapping assets on Base into THORChain
//!
//! The driver collects inputs, signs with a locally configured key and
//! renders notifications and settlement progress through the log

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::missing_docs_in_private_items)]
#![deny(clippy::needless_pass_by_value)]
#![deny(clippy::needless_pass_by_ref_mut)]

use clap::Parser;
use cli::{Cli, Command};
use swap_client::SwapClientError;
use telemetry::setup_logging;
use tracing::error;

mod cli;
mod commands;
mod telemetry;

#[tokio::main]
async fn main() -> Result<(), SwapClientError> {
    let cli = Cli::parse();
    setup_logging(cli.json_logs);

    if let Err(e) = cli.validate() {
        error!("invalid arguments: {e}");
        return Err(SwapClientError::validation(e));
    }

    let config = cli.client_config();
    let res = match cli.command {
        Command::Quote(args) => commands::quote(&config, &args).await,
        Command::Swap(args) => commands::swap(config, &args).await,
        Command::Track(args) => commands::track(&config, &args).await,
        Command::Inbound => commands::inbound(&config).await,
    };

    if let Err(e) = &res {
        error!("{e}");
    }
    res
}
