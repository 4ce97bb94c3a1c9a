//! Encrypt and decrypt commands.
//!
//! Ciphertext travels as base64 text; plaintext as raw bytes. Both default
//! to stdin/stdout.

use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use base64::Engine;
use tracing::debug;
use zeroize::Zeroizing;

use crate::core::registry::KmsClientRegistry;
use crate::error::{Error, Result};

/// Arguments shared by `encrypt` and `decrypt`.
#[derive(clap::Args, Debug)]
pub struct Args {
    /// Key URI (aws-kms://arn:aws:kms:...)
    #[arg(short, long)]
    pub key_uri: String,

    /// Associated data to bind to the ciphertext
    #[arg(short, long, default_value = "")]
    pub associated_data: String,

    /// Read input from a file instead of stdin
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Write output to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Encrypt the input and write base64 ciphertext.
pub fn encrypt(registry: &KmsClientRegistry, args: &Args) -> Result<()> {
    let aead = registry.get_aead(&args.key_uri)?;
    let plaintext = Zeroizing::new(read_input(args.input.as_deref())?);
    debug!(plaintext_len = plaintext.len(), "read plaintext");

    let ciphertext = aead.encrypt(&plaintext, args.associated_data.as_bytes())?;

    let mut encoded = base64::engine::general_purpose::STANDARD.encode(ciphertext);
    encoded.push('\n');
    write_output(args.output.as_deref(), encoded.as_bytes())
}

/// Decode base64 ciphertext, decrypt it, and write the plaintext.
pub fn decrypt(registry: &KmsClientRegistry, args: &Args) -> Result<()> {
    let aead = registry.get_aead(&args.key_uri)?;
    let input = read_input(args.input.as_deref())?;
    let ciphertext = decode_ciphertext(&input)?;
    debug!(ciphertext_len = ciphertext.len(), "read ciphertext");

    let plaintext = Zeroizing::new(aead.decrypt(&ciphertext, args.associated_data.as_bytes())?);
    write_output(args.output.as_deref(), &plaintext)
}

fn decode_ciphertext(input: &[u8]) -> Result<Vec<u8>> {
    let text = std::str::from_utf8(input)
        .map_err(|e| Error::Encoding(format!("ciphertext is not UTF-8: {}", e)))?;
    base64::engine::general_purpose::STANDARD
        .decode(text.trim())
        .map_err(|e| Error::Encoding(format!("invalid base64: {}", e)))
}

fn read_input(path: Option<&Path>) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    match path {
        Some(p) => std::fs::File::open(p)?.read_to_end(&mut buf)?,
        None => std::io::stdin().lock().read_to_end(&mut buf)?,
    };
    Ok(buf)
}

fn write_output(path: Option<&Path>, bytes: &[u8]) -> Result<()> {
    match path {
        Some(p) => std::fs::write(p, bytes)?,
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(bytes)?;
            stdout.flush()?;
        }
    }
    Ok(())
}
