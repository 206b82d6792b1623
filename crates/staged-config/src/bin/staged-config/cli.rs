//! staged-config cli interface

use clap::{Args, Parser, Subcommand, ValueEnum};
use staged_config::config::TargetSettings;
use staged_config::credential::RevealPolicy;
use std::fmt::Formatter;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[clap(flatten)]
    pub target: TargetArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate a config from a staged product
    ///
    /// The output can be passed to configure-product. Credentials are left out unless
    /// --include-credentials or --include-placeholder is given.
    #[command(alias = "sc")]
    StagedConfig(StagedConfigCommand),

    /// Print debug information for development
    Dev(DevCommand),
}

#[derive(Args, Debug)]
pub struct TargetArgs {
    /// Load connection settings from a yaml file
    ///
    /// Flags and environment variables take precedence over the file.
    #[clap(short = 'e', long = "env", global(true))]
    pub env_file: Option<PathBuf>,

    /// Url of the configuration API
    #[clap(short = 't', long = "target", env = "OM_TARGET", global(true))]
    pub target: Option<String>,

    /// Bearer token used to authenticate requests
    #[clap(long = "token", env = "OM_TOKEN", global(true), hide_env_values(true))]
    pub token: Option<String>,

    /// Skip TLS certificate validation
    #[clap(
        short = 'k',
        long = "skip-ssl-validation",
        env = "OM_SKIP_SSL_VALIDATION",
        global(true),
        num_args(0..=1),
        require_equals(true),
        default_missing_value("true")
    )]
    pub skip_ssl_validation: Option<bool>,

    /// Timeout for each request in seconds
    #[clap(long = "request-timeout", env = "OM_REQUEST_TIMEOUT", global(true))]
    pub request_timeout: Option<u64>,
}

impl TargetArgs {
    pub fn settings(&self) -> TargetSettings {
        TargetSettings {
            target: self.target.clone(),
            token: self.token.clone(),
            skip_ssl_validation: self.skip_ssl_validation,
            request_timeout: self.request_timeout,
        }
    }
}

#[derive(Parser, Debug)]
pub struct StagedConfigCommand {
    #[clap(flatten)]
    pub product: ProductArgs,

    /// Include credentials (requires the product to have been deployed)
    #[clap(short = 'c', long = "include-credentials", conflicts_with("include_placeholders"))]
    pub include_credentials: bool,

    /// Replace credentials with interpolatable placeholders
    #[clap(short = 'r', long = "include-placeholder", visible_alias = "include-placeholders")]
    pub include_placeholders: bool,

    #[clap(flatten)]
    pub output: OutputArgs,
}

impl StagedConfigCommand {
    pub fn policy(&self) -> RevealPolicy {
        match (self.include_credentials, self.include_placeholders) {
            (true, _) => RevealPolicy::Reveal,
            (false, true) => RevealPolicy::Placeholder,
            (false, false) => RevealPolicy::Omit,
        }
    }
}

#[derive(Args, Debug)]
pub struct ProductArgs {
    /// Name of the staged product
    #[clap(short = 'p', long = "product-name")]
    pub product_name: String,
}

#[derive(Args, Debug)]
pub struct OutputArgs {
    #[arg(short = 'F', long = "output-format", default_value_t)]
    pub format: OutputFormat,

    /// Write to a file instead of stdout
    ///
    /// The file is created with permissions 0600 as it may contain credentials.
    #[clap(short = 'o', long = "output-file")]
    pub output_file: Option<PathBuf>,
}

#[derive(ValueEnum, Clone, Default, Debug)]
pub enum OutputFormat {
    Json,
    #[default]
    Yaml,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Json => f.write_str("json"),
            OutputFormat::Yaml => f.write_str("yaml"),
        }
    }
}

#[derive(Parser, Debug)]
pub struct DevCommand {
    #[command(subcommand)]
    pub command: DevSubCommand,
}

#[derive(Subcommand, Debug)]
pub enum DevSubCommand {
    /// Properties as returned by the API
    Properties(ProductArgs),
    /// Decomposed property paths
    Tree(ProductArgs),
}
