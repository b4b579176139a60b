//! Orchestrator for checking a workspace.

use crate::cli::Args;
use crate::config::Config;
use crate::output::OutputFormatter;
use au_diagnostics::{Diagnostic, DiagnosticCode, HtmlValidator, Severity, TextDocument};
use au_file::{BuildError, FileModel, FileModelBuilder};
use miette::{IntoDiagnostic, Result, WrapErr};
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Result of a check run.
#[derive(Debug, Default)]
pub struct CheckResult {
    /// Number of files checked.
    pub file_count: usize,
    /// Number of errors.
    pub error_count: usize,
    /// Number of warnings.
    pub warning_count: usize,
    /// Diagnostics not printed because of `--max-errors`.
    pub hidden_count: usize,
    /// Time taken.
    pub duration_ms: u64,
}

/// What checking one file produced.
pub struct FileReport {
    pub model: Option<FileModel>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Orchestrator for running au-check.
pub struct Orchestrator {
    config: Config,
    args: Args,
    formatter: OutputFormatter,
    builder: FileModelBuilder,
    validator: HtmlValidator,
}

impl Orchestrator {
    /// Create a new orchestrator.
    pub fn new(workspace: PathBuf, args: Args) -> Result<Self> {
        let config = Config::load(&workspace, &args)?;
        let formatter = OutputFormatter::new(args.output);
        let validator = HtmlValidator::with_builtins(config.settings);
        tracing::debug!(
            config = ?config.config_path,
            ignore = ?config.ignore_patterns,
            rules = ?validator.rules().map(|r| r.id()).collect::<Vec<_>>(),
            "using configuration"
        );

        Ok(Self {
            config,
            args,
            formatter,
            builder: FileModelBuilder::default(),
            validator,
        })
    }

    /// Run a single check.
    pub async fn run_single_check(&self) -> Result<CheckResult> {
        let start = Instant::now();

        let files = self.find_template_files();
        tracing::info!(
            count = files.len(),
            workspace = %self.config.workspace.display(),
            "found template files"
        );

        let mut result = CheckResult {
            file_count: files.len(),
            ..CheckResult::default()
        };
        let mut shown = 0usize;

        for file in &files {
            let report = match self.check_file(file).await {
                Ok(report) => report,
                Err(e) => {
                    tracing::warn!(file = %file.display(), "{:?}", e);
                    result.error_count += 1;
                    continue;
                }
            };

            if self.args.dump_model {
                if let Some(model) = &report.model {
                    self.formatter.print_model(model);
                }
            }

            for diag in &report.diagnostics {
                match diag.severity {
                    Severity::Error => result.error_count += 1,
                    Severity::Warning => result.warning_count += 1,
                    Severity::Information | Severity::Hint => {}
                }
                if self.args.max_errors.is_some_and(|max| shown >= max) {
                    result.hidden_count += 1;
                    continue;
                }
                let display_path = file.strip_prefix(&self.config.workspace).unwrap_or(file);
                self.formatter.print_diagnostic(display_path, diag);
                shown += 1;
            }
        }

        result.duration_ms = start.elapsed().as_millis() as u64;

        if self.args.timings {
            eprintln!("\nTiming: {}ms", result.duration_ms);
        }

        self.formatter.print_summary(&result);

        Ok(result)
    }

    /// Run in watch mode.
    pub async fn run_watch_mode(&self) -> Result<()> {
        use notify::{Config as NotifyConfig, RecommendedWatcher, RecursiveMode, Watcher};
        use std::time::Duration;

        eprintln!("Starting watch mode...\n");

        if let Err(e) = self.run_single_check().await {
            eprintln!("{:?}", e);
        }

        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<notify::Event>| {
                if let Ok(event) = res {
                    let _ = tx.send(event);
                }
            },
            NotifyConfig::default().with_poll_interval(Duration::from_millis(500)),
        )
        .into_diagnostic()?;

        watcher
            .watch(&self.config.workspace, RecursiveMode::Recursive)
            .into_diagnostic()?;

        while let Some(event) = rx.recv().await {
            let should_recheck = event.paths.iter().any(|p| self.config.is_watched(p));
            if !should_recheck {
                continue;
            }

            // Coalesce the burst of events a single save produces
            tokio::time::sleep(Duration::from_millis(50)).await;
            while rx.try_recv().is_ok() {}

            if !self.args.preserve_watch_output {
                // Clear screen
                print!("\x1B[2J\x1B[1;1H");
            }

            eprintln!("File change detected. Rerunning...\n");
            if let Err(e) = self.run_single_check().await {
                eprintln!("{:?}", e);
            }
        }

        Ok(())
    }

    /// Find all template files in the workspace, in a stable order.
    fn find_template_files(&self) -> Vec<PathBuf> {
        let mut files: Vec<PathBuf> = walkdir::WalkDir::new(&self.config.workspace)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|entry| entry.file_type().is_file())
            .map(|entry| entry.into_path())
            .filter(|path| {
                let relative = path.strip_prefix(&self.config.workspace).unwrap_or(path);
                self.config.should_process(relative)
            })
            .collect();
        files.sort();
        files
    }

    /// Build and validate a single template.
    pub async fn check_file(&self, path: &Path) -> Result<FileReport> {
        let content = tokio::fs::read_to_string(path)
            .await
            .into_diagnostic()
            .wrap_err_with(|| format!("Failed to read {}", path.display()))?;
        let document = TextDocument::new(path.display().to_string(), content);

        let mut diagnostics = Vec::new();
        let model = match self.builder.build(path, &document.text).await {
            Ok(model) => {
                diagnostics.extend(expression_diagnostics(&model, &document));
                Some(model)
            }
            Err(e) => {
                diagnostics.push(build_error_diagnostic(&e, &document));
                None
            }
        };

        let validation = self
            .validator
            .validate(&document)
            .await
            .into_diagnostic()?;
        diagnostics.extend(validation);
        diagnostics.sort_by_key(|d| d.span.start);

        Ok(FileReport {
            model,
            diagnostics,
        })
    }
}

/// One error per binding or interpolation expression that did not parse.
fn expression_diagnostics(model: &FileModel, document: &TextDocument) -> Vec<Diagnostic> {
    model
        .expression_errors
        .iter()
        .map(|failure| {
            Diagnostic::error(
                format!("Invalid expression '{}': {}", failure.text, failure.error),
                failure.error_span(),
                DiagnosticCode::InvalidExpression,
                document,
            )
        })
        .collect()
}

fn build_error_diagnostic(error: &BuildError, document: &TextDocument) -> Diagnostic {
    Diagnostic::error(
        error.to_string(),
        error.span().unwrap_or_default(),
        DiagnosticCode::InvalidTemplate,
        document,
    )
}
