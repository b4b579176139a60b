//! au-check - Aurelia template checker.

use clap::Parser;
use miette::Result;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod cli;
mod config;
mod orchestrator;
mod output;

use cli::Args;
use orchestrator::Orchestrator;

/// Initialize the tracing subscriber for logging.
///
/// `--verbose` sets the level to DEBUG for every au-* crate; otherwise
/// `RUST_LOG` applies, defaulting to INFO for the binary only. Logs go to
/// stderr so JSON and machine output stay clean.
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("au_check=debug,au_file=debug,au_diagnostics=debug,au_markup=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("au_check=info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);

    // Set up miette for nice error output
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .build(),
        )
    }))
    .ok();

    match run(args).await {
        Ok(exit_code) => exit_code,
        Err(e) => {
            eprintln!("{:?}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<ExitCode> {
    let workspace = args
        .workspace
        .clone()
        .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")));

    let watch = args.watch;
    let fail_on_warning = args.fail_on_warning;

    let orchestrator = Orchestrator::new(workspace, args)?;

    if watch {
        orchestrator.run_watch_mode().await?;
        return Ok(ExitCode::SUCCESS);
    }

    let result = orchestrator.run_single_check().await?;
    if result.error_count > 0 || (fail_on_warning && result.warning_count > 0) {
        Ok(ExitCode::from(1))
    } else {
        Ok(ExitCode::SUCCESS)
    }
}
