//! Command-line argument parsing.

use clap::Parser;
use std::path::PathBuf;

/// Aurelia template checker - parses templates and reports binding issues
#[derive(Parser, Debug, Clone)]
#[command(name = "au-check")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Workspace directory to check
    #[arg(short, long)]
    pub workspace: Option<PathBuf>,

    /// Path to au-check.json
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Run in watch mode
    #[arg(long)]
    pub watch: bool,

    /// Output format
    #[arg(long, default_value = "human")]
    pub output: OutputFormat,

    /// Fail on warnings
    #[arg(long)]
    pub fail_on_warning: bool,

    /// Show timing information
    #[arg(long)]
    pub timings: bool,

    /// Maximum number of diagnostics to show
    #[arg(long)]
    pub max_errors: Option<usize>,

    /// Ignore patterns (glob)
    #[arg(long)]
    pub ignore: Vec<String>,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Skip attribute validation (only build file models)
    #[arg(long)]
    pub no_validate: bool,

    /// Print each file model as JSON
    #[arg(long)]
    pub dump_model: bool,

    /// Preserve watch output (don't clear screen)
    #[arg(long)]
    pub preserve_watch_output: bool,
}

/// Output format for diagnostics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output
    #[default]
    Human,
    /// JSON lines
    Json,
    /// Machine-readable output
    Machine,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flags() {
        let args = Args::parse_from([
            "au-check",
            "--workspace",
            "app",
            "--output",
            "machine",
            "--ignore",
            "**/legacy/**",
            "--max-errors",
            "5",
            "--no-validate",
        ]);
        assert_eq!(args.workspace, Some(PathBuf::from("app")));
        assert_eq!(args.output, OutputFormat::Machine);
        assert_eq!(args.ignore, vec!["**/legacy/**"]);
        assert_eq!(args.max_errors, Some(5));
        assert!(args.no_validate);
        assert!(!args.watch);
    }
}
