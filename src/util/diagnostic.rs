//! User-friendly diagnostic messages.
//!
//! Every per-repository failure is reported with its cause, the output the
//! collaborator produced, and what to try next.

use std::fmt;
use std::path::PathBuf;

use miette::Diagnostic as MietteDiagnostic;

use crate::resolver::ResolveError;

/// Common suggestion messages for consistent error handling.
pub mod suggestions {
    /// Suggestion when repositories are missing locally.
    pub const NOT_CHECKED_OUT: &str = "Run `flotilla init` to clone missing repositories";

    /// Suggestion when a clone failed.
    pub const CLONE_FAILED: &str =
        "Check your network connection and access to the remote, then rerun `flotilla init`";

    /// Suggestion when a pin does not exist upstream.
    pub const BAD_PIN: &str = "Check the `[pins]` table in Flotilla.toml";

    /// Suggestion when a version control command failed.
    pub const VCS_FAILED: &str = "Resolve the problem in that repository and rerun the command";

    /// Suggestion for more detail.
    pub const VERBOSE: &str = "Rerun with `--verbose` for more details";
}

/// Severity level for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
    Note,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Note => write!(f, "note"),
        }
    }
}

/// A diagnostic message with optional suggestions.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    /// Primary message
    pub message: String,
    /// Severity level
    pub severity: Severity,
    /// Additional context lines
    pub context: Vec<String>,
    /// Suggested fixes
    pub suggestions: Vec<String>,
    /// Related location (file path)
    pub location: Option<PathBuf>,
}

impl Diagnostic {
    /// Create a new error diagnostic.
    pub fn error(message: impl Into<String>) -> Self {
        Diagnostic {
            message: message.into(),
            severity: Severity::Error,
            context: Vec::new(),
            suggestions: Vec::new(),
            location: None,
        }
    }

    /// Create a new warning diagnostic.
    pub fn warning(message: impl Into<String>) -> Self {
        Diagnostic {
            severity: Severity::Warning,
            ..Diagnostic::error(message)
        }
    }

    /// Add context to the diagnostic.
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context.push(context.into());
        self
    }

    /// Add a suggestion for fixing the issue.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    /// Add a file location.
    pub fn with_location(mut self, path: impl Into<PathBuf>) -> Self {
        self.location = Some(path.into());
        self
    }

    /// Build a diagnostic for a per-repository failure.
    ///
    /// Unavailable repositories become warnings; collaborator output is kept
    /// line by line as context.
    pub fn from_resolve_error(err: &ResolveError) -> Self {
        let mut diag = if err.is_unavailable() {
            Diagnostic::warning(err.to_string())
        } else {
            Diagnostic::error(err.to_string())
        };

        match err {
            ResolveError::ManifestParse { source, .. } => {
                diag = diag
                    .with_location(source.path.clone())
                    .with_context(source.message.clone())
                    .with_suggestion(suggestions::NOT_CHECKED_OUT);
            }
            ResolveError::Acquisition { output, .. } => {
                diag = with_output(diag, output)
                    .with_suggestion(suggestions::CLONE_FAILED)
                    .with_suggestion(suggestions::BAD_PIN);
            }
            ResolveError::VersionControl(e) => {
                diag = diag.with_location(e.path.clone());
                diag = with_output(diag, &e.output).with_suggestion(suggestions::VCS_FAILED);
            }
            ResolveError::Compose { .. } => {
                diag = diag.with_suggestion(suggestions::VERBOSE);
            }
        }

        if let Some(help) = err.help() {
            let help = help.to_string();
            if !diag.suggestions.contains(&help) {
                diag.suggestions.insert(0, help);
            }
        }

        diag
    }

    /// Format the diagnostic for terminal output.
    pub fn format(&self, color: bool) -> String {
        let mut output = String::new();

        let severity_str = if color {
            match self.severity {
                Severity::Error => "\x1b[1;31merror\x1b[0m",
                Severity::Warning => "\x1b[1;33mwarning\x1b[0m",
                Severity::Note => "\x1b[1;36mnote\x1b[0m",
            }
        } else {
            match self.severity {
                Severity::Error => "error",
                Severity::Warning => "warning",
                Severity::Note => "note",
            }
        };

        output.push_str(&format!("{}: {}\n", severity_str, self.message));

        if let Some(ref path) = self.location {
            output.push_str(&format!("  --> {}\n", path.display()));
        }

        for ctx in &self.context {
            output.push_str(&format!("  | {}\n", ctx));
        }

        if !self.suggestions.is_empty() {
            output.push('\n');
            let help_prefix = if color {
                "\x1b[1;32mhelp\x1b[0m"
            } else {
                "help"
            };
            output.push_str(&format!("{}: consider:\n", help_prefix));
            for (i, suggestion) in self.suggestions.iter().enumerate() {
                output.push_str(&format!("  {}. {}\n", i + 1, suggestion));
            }
        }

        output
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format(false))
    }
}

fn with_output(mut diag: Diagnostic, output: &str) -> Diagnostic {
    for line in output.lines().filter(|l| !l.trim().is_empty()) {
        diag = diag.with_context(line);
    }
    diag
}

/// Print a diagnostic to stderr.
pub fn emit(diagnostic: &Diagnostic, color: bool) {
    eprint!("{}", diagnostic.format(color));
}
