//! Test support utilities for kms-aead integration tests.
//!
//! Provides isolated config directories and CLI command helpers.

#![allow(dead_code)]

pub mod assertions;
pub mod fixtures;
pub mod skip;

#[allow(unused_imports)]
pub use assertions::*;
#[allow(unused_imports)]
pub use fixtures::*;

use std::path::PathBuf;
use std::process::Output;

use assert_cmd::Command;
use tempfile::TempDir;

/// Test environment with an isolated config directory.
///
/// No process-global state is mutated: child processes get the config
/// path and HOME through their own environment, so tests run in parallel.
pub struct Test {
    /// Temporary directory holding the config file and any payloads
    pub dir: TempDir,
}

impl Test {
    /// Create an environment with no config file.
    pub fn new() -> Self {
        let dir = TempDir::new().expect("failed to create temp dir");
        Self { dir }
    }

    /// Create an environment whose config holds `contents`.
    pub fn with_config(contents: &str) -> Self {
        let t = Self::new();
        std::fs::write(t.config_path(), contents).expect("failed to write config");
        t
    }

    pub fn config_path(&self) -> PathBuf {
        self.dir.path().join("config.toml")
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    /// A kms-aead command pointed at this environment's config.
    pub fn cmd(&self) -> Command {
        #[allow(deprecated)]
        let mut cmd = Command::cargo_bin("kms-aead").expect("failed to find kms-aead binary");
        cmd.env("KMS_AEAD_CONFIG", self.config_path());
        cmd.env("HOME", self.dir.path());
        cmd.env("NO_COLOR", "1");
        cmd.env_remove("KMS_AEAD_LOG");
        cmd.current_dir(self.dir.path());
        cmd
    }

    /// Shortcut for `kms-aead supports --key-uri <uri>`.
    pub fn supports(&self, key_uri: &str) -> Output {
        self.cmd()
            .args(["supports", "--key-uri", key_uri])
            .output()
            .expect("failed to run kms-aead supports")
    }
}
