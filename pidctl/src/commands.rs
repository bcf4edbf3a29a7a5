use anyhow::{Context, Result};
use clap::Subcommand;
use std::io::Write;

use strongspace_registry::ProcessRegistry;
use strongspace_shared::StrongspacePaths;

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show whether a named process is running
    Status {
        /// Logical process name (e.g. "sync")
        name: String,
    },

    /// Record a PID for a named process unless it is already running
    Create {
        name: String,

        /// Process ID to record
        #[arg(long)]
        pid: u32,
    },

    /// Remove the PID file for a named process
    Delete { name: String },

    /// List every recorded process and its liveness
    List,

    /// Print the resolved strongspace folders
    Paths,
}

/// コマンド実行（戻り値は終了コード 0 にするか）
pub fn execute(
    command: &Command,
    registry: &ProcessRegistry,
    paths: &StrongspacePaths,
    out: &mut impl Write,
) -> Result<bool> {
    match command {
        Command::Status { name } => {
            if registry.is_process_running(name) {
                let pid = registry.read_pid_record(name)?.unwrap_or_default();
                writeln!(out, "{name}: running (pid {pid})")?;
                Ok(true)
            } else {
                writeln!(out, "{name}: not running")?;
                Ok(false)
            }
        }
        Command::Create { name, pid } => {
            let created = registry
                .create_pid_file(name, *pid)
                .with_context(|| format!("Failed to create PID file for {name}"))?;
            if created {
                writeln!(out, "{name}: recorded pid {pid}")?;
            } else {
                writeln!(out, "{name}: already running, PID file left unchanged")?;
            }
            Ok(created)
        }
        Command::Delete { name } => {
            registry
                .delete_pid_file(name)
                .with_context(|| format!("Failed to delete PID file for {name}"))?;
            writeln!(out, "{name}: PID file removed")?;
            Ok(true)
        }
        Command::List => {
            let records = registry.list_records()?;
            if records.is_empty() {
                writeln!(out, "No PID files in {}", registry.pids_dir().display())?;
            }
            for record in records {
                // 生存確認で孤児は削除される
                let state = if registry.is_process_running(&record.name) {
                    "running"
                } else {
                    "not running"
                };
                writeln!(out, "{:<20} {:>10}  {state}", record.name, record.pid)?;
            }
            Ok(true)
        }
        Command::Paths => {
            writeln!(out, "home:          {}", paths.home_dir().display())?;
            writeln!(out, "pids:          {}", registry.pids_dir().display())?;
            writeln!(out, "bin:           {}", paths.bin_dir().display())?;
            writeln!(out, "plugins:       {}", paths.plugins_dir().display())?;
            if strongspace_shared::running_on_a_mac() {
                writeln!(out, "launch agents: {}", paths.launch_agents_dir().display())?;
            }
            Ok(true)
        }
    }
}
