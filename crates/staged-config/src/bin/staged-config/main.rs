mod cli;

use staged_config::api::StagedConfigService;
use staged_config::config::TargetSettings;
use staged_config::document::StagedConfig;
use staged_config::http::HttpService;
use staged_config::path::{PathTree, PropertyPath};

fn main() {
    use clap::Parser;
    let cli = cli::Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_env("STAGED_CONFIG_LOG"))
        .with_writer(std::io::stderr)
        .init();

    let command_result = match &cli.command {
        cli::Command::StagedConfig(command) => generate(&cli.target, command),
        cli::Command::Dev(dev_cli) => dev(&cli.target, dev_cli),
    };

    if let Err(e) = command_result {
        for error in e.chain() {
            eprintln!("{error}")
        }
        std::process::exit(1);
    }
}

pub fn generate(
    target: &cli::TargetArgs,
    cli: &cli::StagedConfigCommand,
) -> anyhow::Result<()> {
    let service = connect(target)?;
    let config =
        staged_config::document::generate(&service, &cli.product.product_name, cli.policy())?;

    output(&cli.output, &config)?;
    Ok(())
}

fn connect(target: &cli::TargetArgs) -> anyhow::Result<HttpService> {
    let settings = match &target.env_file {
        Some(path) => TargetSettings::load(path)?,
        None => TargetSettings::default(),
    };
    let target = settings.merge(target.settings()).resolve()?;

    tracing::info!(url=%target.url, "connecting");
    Ok(HttpService::new(&target)?)
}

fn output(output: &cli::OutputArgs, config: &StagedConfig) -> anyhow::Result<()> {
    let rendered = match output.format {
        cli::OutputFormat::Yaml => serde_yaml::to_string(config)?,
        cli::OutputFormat::Json => serde_json::to_string_pretty(config)? + "\n",
    };

    match &output.output_file {
        None => print!("{rendered}"),
        Some(path) => {
            use std::io::Write;
            let mut file = create_private(path)?;
            file.write_all(rendered.as_bytes())?;
            tracing::info!(path=%path.display(), "config written");
        }
    }

    Ok(())
}

/// Create (or truncate) a file only readable by the current user
fn create_private(path: &std::path::Path) -> std::io::Result<std::fs::File> {
    let mut options = std::fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);

    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    options.open(path)
}

/// (staged-config-)developer utilities
///
/// A quick way to expose internal structures for debugging purposes
pub fn dev(target: &cli::TargetArgs, cli: &cli::DevCommand) -> anyhow::Result<()> {
    use cli::DevSubCommand::*;

    let service = connect(target)?;

    match &cli.command {
        Properties(product) => {
            let guid = service.get_staged_product_by_name(&product.product_name)?.guid;
            let properties = service.get_staged_product_properties(&guid)?;
            println!("{properties:#?}");
        }
        Tree(product) => {
            let guid = service.get_staged_product_by_name(&product.product_name)?.guid;
            let properties = service.get_staged_product_properties(&guid)?;
            let tree = properties
                .into_iter()
                .map(|(name, property)| Ok((name.parse::<PropertyPath>()?, property.property_type)))
                .collect::<anyhow::Result<PathTree<_>>>()?;
            println!("{tree:#?}");
        }
    }

    Ok(())
}
