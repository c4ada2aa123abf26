mod command;
pub use command::Command;

use anyhow::Result;
use autorm::Registry;
use clap::Parser;
use std::io::Write;
use tracing_subscriber::EnvFilter;

/// autorm CLI library for building custom command-line tools.
///
/// Custom tools register their own filters, column types and generators on
/// the registry before running; those from the model document are added
/// on top.
#[derive(Debug, Default)]
pub struct AutormCli {
    registry: Registry,
}

impl AutormCli {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_registry(registry: Registry) -> Self {
        Self { registry }
    }

    pub fn registry_mut(&mut self) -> &mut Registry {
        &mut self.registry
    }

    /// Parse and execute CLI commands from command-line arguments
    pub fn parse_and_run(&self) -> Result<()> {
        let cli = Cli::parse();
        init_tracing(cli.verbose);
        self.run(cli.command, &mut std::io::stdout().lock())
    }

    /// Parse and execute CLI commands from an iterator of arguments,
    /// writing to `out`.
    pub fn parse_from<I, T>(&self, args: I, out: &mut dyn Write) -> Result<()>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let cli = Cli::try_parse_from(args)?;
        self.run(cli.command, out)
    }

    fn run(&self, command: Command, out: &mut dyn Write) -> Result<()> {
        command.run(&self.registry, out)
    }
}

#[derive(Parser, Debug)]
#[command(name = "autorm")]
#[command(about = "autorm - Convention-based ORM mapping configuration")]
#[command(version)]
struct Cli {
    /// Log compilation steps (overrides RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

/// Logs to stderr so that JSON on stdout stays clean.
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    // A subscriber may already be installed by an embedding tool
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
