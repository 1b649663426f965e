//! CLI for the snippets batch execution tools.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use snippets_core::config;

use commands::{run_perf_command, PerfArgs};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "snippets")]
#[command(about = "Bounded-concurrency batch execution and service perf testing", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Run a performance test: POST each input record to a service URL.
    Perf {
        /// Input file with one JSON object per line (blank lines skipped).
        #[arg(long)]
        input_path: String,

        /// Target service URL.
        #[arg(long)]
        url: String,

        /// Concurrent workers (default: config file value).
        #[arg(long, value_name = "N")]
        workers: Option<usize>,

        /// Result file path (default: derived from the input path).
        #[arg(long)]
        output: Option<String>,

        /// Only test the first N input records.
        #[arg(long, value_name = "N")]
        max_num: Option<usize>,

        /// Retries per request on failure (default: config file value, else 0).
        #[arg(long, value_name = "N")]
        retries: Option<u32>,
    },
}

impl CliCommand {
    pub fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Perf {
                input_path,
                url,
                workers,
                output,
                max_num,
                retries,
            } => run_perf_command(
                &cfg,
                PerfArgs {
                    input_path,
                    url,
                    workers,
                    output,
                    max_num,
                    retries,
                },
            ),
        }
    }
}

#[cfg(test)]
mod tests;
