//! Command-line arguments and environment configuration.

use std::path::PathBuf;

use clap::builder::FalseyValueParser;
use clap::{ArgAction, Parser};
use drlatest_core::config::{Credentials, FailurePolicy, ResolveConfig};

/// Resolve the latest tag of every image declared in YAML values files and
/// print the tags as a YAML mapping.
#[derive(Parser, Debug)]
#[command(name = "drlatestyaml", version, about)]
pub struct Cli {
    /// Values files, merged in order (later keys overwrite earlier ones)
    #[arg(required = true, value_name = "VALUES_FILE")]
    pub files: Vec<PathBuf>,

    /// Key prefix selecting image locations (e.g. "image.")
    #[arg(long, env = "KeyPrefix")]
    pub key_prefix: Option<String>,

    /// Replacement for the key prefix in output keys (e.g. "tag.")
    #[arg(long, env = "KeyPrefixReplace")]
    pub key_prefix_replace: Option<String>,

    /// Registry username (empty for anonymous access)
    #[arg(long, env = "RegistryUsername", default_value = "")]
    pub registry_username: String,

    /// Registry password
    #[arg(long, env = "RegistryPassword", default_value = "", hide_env_values = true)]
    pub registry_password: String,

    /// Abort on the first registry failure or empty tag list
    #[arg(long, env = "Strict", value_parser = FalseyValueParser::new())]
    pub strict: bool,

    /// Maximum number of concurrent registry requests
    #[arg(long, env = "Concurrency", default_value_t = 1)]
    pub concurrency: usize,

    /// Accept invalid registry TLS certificates
    #[arg(
        long = "insecure",
        env = "RegistryInsecure",
        action = ArgAction::Set,
        default_value_t = true,
        value_parser = FalseyValueParser::new()
    )]
    pub insecure: bool,

    /// Verbose diagnostics on stderr (any non-empty value enables)
    #[arg(long, env = "DEBUG", num_args = 0..=1, require_equals = true, default_missing_value = "1")]
    pub debug: Option<String>,
}

impl Cli {
    pub fn debug_enabled(&self) -> bool {
        self.debug.as_deref().is_some_and(|v| !v.is_empty())
    }

    /// Default log filter when `RUST_LOG` is not set.
    pub fn log_filter(&self) -> &'static str {
        if self.debug_enabled() {
            "debug"
        } else {
            "warn"
        }
    }

    /// Build the resolution configuration. Call `validate()` on the result.
    pub fn resolve_config(&self) -> ResolveConfig {
        let policy = if self.strict {
            FailurePolicy::Strict
        } else {
            FailurePolicy::Lenient
        };

        ResolveConfig::new(
            self.key_prefix.clone().unwrap_or_default(),
            self.key_prefix_replace.clone().unwrap_or_default(),
        )
        .with_credentials(Credentials::new(
            &self.registry_username,
            &self.registry_password,
        ))
        .with_policy(policy)
        .with_concurrency(self.concurrency)
        .with_insecure(self.insecure)
    }
}
