//! Command-line interface.

pub mod crypt;
pub mod output;
pub mod supports;

use std::path::PathBuf;

use clap::{CommandFactory, Parser, Subcommand};

use crate::core::config::Config;
use crate::core::registry::KmsClientRegistry;
use crate::core::scope::CallScope;
use crate::core::EncryptionContextName;
use crate::error::Result;

/// kms-aead - Encrypt and decrypt with AWS KMS keys as an AEAD.
#[derive(Parser)]
#[command(
    name = "kms-aead",
    about = "Encrypt and decrypt with AWS KMS keys, binding associated data",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Config file (default: $KMS_AEAD_CONFIG or ~/.config/kms-aead/config.toml)
    #[arg(short, long, global = true, env = "KMS_AEAD_CONFIG")]
    pub config: Option<PathBuf>,

    /// Use the legacy "additionalData" encryption context name for every client
    #[arg(long, global = true)]
    pub legacy_context: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Top-level commands.
#[derive(Subcommand)]
pub enum Command {
    /// Encrypt plaintext under a KMS key (output is base64)
    Encrypt(crypt::Args),

    /// Decrypt base64 ciphertext produced by `encrypt`
    Decrypt(crypt::Args),

    /// Show whether a configured client supports a key URI
    Supports {
        /// Key URI (aws-kms://arn:aws:kms:...)
        #[arg(short, long)]
        key_uri: String,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Run a parsed command line.
pub fn execute(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "kms-aead", &mut std::io::stdout());
            Ok(())
        }
        Command::Encrypt(args) => {
            let registry = load_registry(cli.config, cli.legacy_context)?;
            crypt::encrypt(&registry, &args)
        }
        Command::Decrypt(args) => {
            let registry = load_registry(cli.config, cli.legacy_context)?;
            crypt::decrypt(&registry, &args)
        }
        Command::Supports { key_uri } => {
            let registry = load_registry(cli.config, cli.legacy_context)?;
            supports::execute(&registry, &key_uri)
        }
    }
}

fn load_registry(config: Option<PathBuf>, legacy_context: bool) -> Result<KmsClientRegistry> {
    let mut config = Config::load(config.as_deref())?;
    if legacy_context {
        config.force_context_name(EncryptionContextName::LegacyAdditionalData);
    }
    config.registry(&CallScope::background())
}
