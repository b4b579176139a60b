//! Output formatting for diagnostics.

use crate::cli::OutputFormat;
use crate::orchestrator::CheckResult;
use au_diagnostics::{Diagnostic, Severity};
use au_file::FileModel;
use serde::Serialize;
use std::path::Path;

/// One JSON line carrying a file model.
#[derive(Serialize)]
struct ModelLine<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    model: &'a FileModel,
}

/// Formatter for diagnostic output.
pub struct OutputFormatter {
    format: OutputFormat,
}

impl OutputFormatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Print a diagnostic.
    pub fn print_diagnostic(&self, file: &Path, diagnostic: &Diagnostic) {
        match self.format {
            OutputFormat::Human => println!("{}", format_human(file, diagnostic)),
            OutputFormat::Json => println!("{}", format_json(file, diagnostic)),
            OutputFormat::Machine => println!("{}", format_machine(file, diagnostic)),
        }
    }

    /// Print a file model.
    pub fn print_model(&self, model: &FileModel) {
        let rendered = match self.format {
            OutputFormat::Human => serde_json::to_string_pretty(model),
            OutputFormat::Json | OutputFormat::Machine => serde_json::to_string(&ModelLine {
                kind: "model",
                model,
            }),
        };
        match rendered {
            Ok(text) => println!("{}", text),
            Err(e) => tracing::warn!(file = %model.file_name.display(), "failed to serialize model: {}", e),
        }
    }

    /// Print the summary.
    pub fn print_summary(&self, result: &CheckResult) {
        match self.format {
            OutputFormat::Human => {
                self.print_summary_human(result);
            }
            OutputFormat::Json => {
                self.print_summary_json(result);
            }
            OutputFormat::Machine => {
                // No summary for machine format
            }
        }
    }

    fn print_summary_human(&self, result: &CheckResult) {
        println!();
        if result.error_count == 0 && result.warning_count == 0 {
            println!(
                "\x1b[32m✓\x1b[0m No issues found in {} files ({}ms)",
                result.file_count, result.duration_ms
            );
        } else {
            if result.error_count > 0 {
                println!(
                    "\x1b[31m✗\x1b[0m Found {} error{} in {} files",
                    result.error_count,
                    if result.error_count == 1 { "" } else { "s" },
                    result.file_count
                );
            }
            if result.warning_count > 0 {
                println!(
                    "\x1b[33m⚠\x1b[0m Found {} warning{}",
                    result.warning_count,
                    if result.warning_count == 1 { "" } else { "s" }
                );
            }
            if result.hidden_count > 0 {
                println!("{} more not shown (--max-errors)", result.hidden_count);
            }
            println!("Time: {}ms", result.duration_ms);
        }
    }

    fn print_summary_json(&self, result: &CheckResult) {
        let json = serde_json::json!({
            "type": "summary",
            "files": result.file_count,
            "errors": result.error_count,
            "warnings": result.warning_count,
            "hidden": result.hidden_count,
            "duration_ms": result.duration_ms
        });
        println!("{}", json);
    }
}

fn format_human(file: &Path, diagnostic: &Diagnostic) -> String {
    let severity_str = match diagnostic.severity {
        Severity::Error => "\x1b[31merror\x1b[0m",
        Severity::Warning => "\x1b[33mwarning\x1b[0m",
        Severity::Information => "\x1b[36minfo\x1b[0m",
        Severity::Hint => "\x1b[34mhint\x1b[0m",
    };
    let (line, col) = diagnostic.range.start.to_display();

    format!(
        "{}:{}:{}: {} {}: {}",
        file.display(),
        line,
        col,
        severity_str,
        diagnostic.code,
        diagnostic.message
    )
}

fn format_json(file: &Path, diagnostic: &Diagnostic) -> serde_json::Value {
    serde_json::json!({
        "type": "diagnostic",
        "file": file.to_string_lossy(),
        "severity": diagnostic.severity.as_str(),
        "message": diagnostic.message,
        "code": diagnostic.code.as_str(),
        "source": diagnostic.source,
        "range": diagnostic.range,
        "span": {
            "start": diagnostic.span.start,
            "end": diagnostic.span.end
        }
    })
}

/// `file:line:col:severity:code:message`, 1-based, colons in the message
/// escaped.
fn format_machine(file: &Path, diagnostic: &Diagnostic) -> String {
    let (line, col) = diagnostic.range.start.to_display();
    format!(
        "{}:{}:{}:{}:{}:{}",
        file.display(),
        line,
        col,
        diagnostic.severity.as_str(),
        diagnostic.code.as_str(),
        diagnostic.message.replace(':', "\\:")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use au_diagnostics::{DiagnosticCode, TextDocument};
    use au_span::Span;
    use pretty_assertions::assert_eq;

    fn sample() -> Diagnostic {
        let doc = TextDocument::new("a.html", "<div>\n  <input value.one-way=\"x\">");
        Diagnostic::warning(
            "use: to-view",
            Span::new(15, 28),
            DiagnosticCode::OneWayDeprecated,
            &doc,
        )
    }

    #[test]
    fn test_machine_format() {
        assert_eq!(
            format_machine(Path::new("src/a.html"), &sample()),
            "src/a.html:2:10:warning:binding-one-way-deprecated:use\\: to-view"
        );
    }

    #[test]
    fn test_json_format() {
        let json = format_json(Path::new("a.html"), &sample());
        assert_eq!(json["code"], "binding-one-way-deprecated");
        assert_eq!(json["severity"], "warning");
        assert_eq!(json["range"]["start"]["line"], 1);
        assert_eq!(json["range"]["start"]["col"], 9);
        assert_eq!(json["span"]["end"], 28);
    }

    #[test]
    fn test_human_format_has_location() {
        let line = format_human(Path::new("a.html"), &sample());
        assert!(line.starts_with("a.html:2:10: "));
        assert!(line.ends_with("binding-one-way-deprecated: use: to-view"));
    }
}
