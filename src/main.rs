use clap::Parser;
use tracing::debug;

use unity_versions::cli::{self, Cli};
use unity_versions::config::{self, CliConfig};
use unity_versions::logging::{self, LogFormat};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => CliConfig::load(path)?,
        None => CliConfig::load_default()?,
    };

    let log_file = match (&cli.log_file, cli.log) {
        (Some(path), _) => Some(path.clone()),
        (None, true) => Some(config::log_path()),
        (None, false) => None,
    };
    let format = if cli.json_logs {
        LogFormat::Json
    } else {
        LogFormat::Text
    };
    let _guard = logging::init_logging(&config.log_filter, format, log_file.as_deref())?;
    debug!("Loaded config: {:?}", config);

    let registry = cli::build_registry(&config)?;
    let output = cli::run(cli.command, &registry, &config)?;
    println!("{}", output);
    Ok(())
}
