//! kms-aead - AWS KMS keys as an AEAD primitive.

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use kms_aead::cli::output;
use kms_aead::cli::{execute, Cli};
use kms_aead::core::constants::LOG_ENV;
use kms_aead::error::{ConfigError, Error};

fn main() {
    let cli = Cli::parse();

    // Initialize tracing subscriber with env-filter support
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("kms_aead=debug")
        } else {
            EnvFilter::new("kms_aead=warn")
        }
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).without_time().with_writer(std::io::stderr))
        .init();

    if let Err(e) = execute(cli) {
        let error_msg = e.to_string();
        let suggestion = match &e {
            Error::Config(ConfigError::NotFound(_)) | Error::Config(ConfigError::NoClients) => {
                Some("add a [[client]] entry with key_uri = \"aws-kms://arn:...\" to the config file, or pass --config")
            }
            Error::Config(ConfigError::BackendUnavailable(_)) => {
                Some("rebuild with: cargo install kms-aead --features aws")
            }
            _ => None,
        };

        output::error(&error_msg);
        if let Some(hint) = suggestion {
            output::hint(hint);
        }
        std::process::exit(1);
    }
}
