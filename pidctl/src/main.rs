use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

use strongspace_registry::ProcessRegistry;
use strongspace_shared::logging::set_log_level;
use strongspace_shared::{log_system, Config};

mod commands;

use commands::Command;

#[derive(Parser)]
#[command(name = "strongspace-pids")]
#[command(about = "Inspect and manage PID files of strongspace background processes")]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file path (default: auto-detect)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Override the PID file directory
    #[arg(long, global = true)]
    pids_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let config = load_config(&cli)?;
    set_log_level(config.log_level());

    let paths = config.paths()?;
    let registry = ProcessRegistry::new(config.to_registry_config()?);
    log_system!(debug, "Using PID directory {}", registry.pids_dir().display());

    let ok = commands::execute(&cli.command, &registry, &paths, &mut std::io::stdout().lock())?;

    Ok(if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

/// 設定ファイル → 環境変数 → コマンドライン引数の順に適用
fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::load_auto()?
            .map(|(config, _path)| config)
            .unwrap_or_default(),
    };

    config.apply_env_overrides();

    if cli.verbose {
        config.logging.verbose = true;
    }
    if let Some(pids_dir) = &cli.pids_dir {
        config.paths.pids_dir = Some(pids_dir.clone());
    }

    Ok(config)
}
