//! Centralized shell output and progress management.
//!
//! Every command reports through a [`Shell`]: one right-aligned status line
//! per repository, progress bars for fan-out batches, and timing spans for
//! whole-graph passes. In JSON mode the same events are printed to stdout as
//! one JSON object per line and nothing else is written.

use std::fmt::Display;
use std::io::{self, IsTerminal, Write};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use indicatif::{ProgressBar, ProgressStyle};

/// Shell output mode - Human and Json are mutually exclusive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellMode {
    /// Human-readable output with optional colors and progress bars.
    Human {
        verbosity: Verbosity,
        color: ColorChoice,
    },
    /// Machine-readable JSON output only.
    Json,
}

impl Default for ShellMode {
    fn default() -> Self {
        ShellMode::Human {
            verbosity: Verbosity::Normal,
            color: ColorChoice::Auto,
        }
    }
}

/// Output verbosity level (Human mode only).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    /// --quiet: errors only, no progress
    Quiet,
    /// Default: status messages + progress bars
    #[default]
    Normal,
    /// --verbose: immediate status lines, debug info, no progress bars
    Verbose,
}

/// Color output mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorChoice {
    /// Detect TTY and use colors if available.
    #[default]
    Auto,
    /// Always use ANSI colors.
    Always,
    /// Never use ANSI colors.
    Never,
}

impl std::str::FromStr for ColorChoice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "auto" => Ok(ColorChoice::Auto),
            "always" => Ok(ColorChoice::Always),
            "never" => Ok(ColorChoice::Never),
            _ => Err(format!(
                "invalid color choice '{}'; expected 'auto', 'always', or 'never'",
                s
            )),
        }
    }
}

/// Status types for output messages.
///
/// Shell handles all formatting - callers just specify the semantic status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    // Success statuses (green)
    Cloned,
    Committed,
    Finished,
    Pulled,
    Pushed,
    Switched,
    Tagged,
    Wrote,
    Clean,

    // In-progress statuses (cyan)
    Cloning,
    Resolving,

    // Info statuses (blue/default)
    Info,

    // Warning statuses (yellow)
    Dirty,
    Skipped,

    // Error statuses (red)
    Failed,
}

impl Status {
    /// Get the display text for this status.
    fn as_str(&self) -> &'static str {
        match self {
            Status::Cloned => "Cloned",
            Status::Committed => "Committed",
            Status::Finished => "Finished",
            Status::Pulled => "Pulled",
            Status::Pushed => "Pushed",
            Status::Switched => "Switched",
            Status::Tagged => "Tagged",
            Status::Wrote => "Wrote",
            Status::Clean => "Clean",
            Status::Cloning => "Cloning",
            Status::Resolving => "Resolving",
            Status::Info => "Info",
            Status::Dirty => "Dirty",
            Status::Skipped => "Skipped",
            Status::Failed => "Failed",
        }
    }

    /// Get the ANSI color code for this status.
    fn color_code(&self) -> &'static str {
        match self {
            // Success: bold green
            Status::Cloned
            | Status::Committed
            | Status::Finished
            | Status::Pulled
            | Status::Pushed
            | Status::Switched
            | Status::Tagged
            | Status::Wrote
            | Status::Clean => "\x1b[1;32m",
            // In-progress: bold cyan
            Status::Cloning | Status::Resolving => "\x1b[1;36m",
            // Info: bold blue
            Status::Info => "\x1b[1;34m",
            // Warning: bold yellow
            Status::Dirty | Status::Skipped => "\x1b[1;33m",
            // Error: bold red
            Status::Failed => "\x1b[1;31m",
        }
    }

    /// Whether this status reports a failure.
    fn is_error(&self) -> bool {
        matches!(self, Status::Failed)
    }

    /// Get the width for alignment (12 characters).
    fn width(&self) -> usize {
        12
    }
}

/// Central shell for all CLI output.
#[derive(Debug)]
pub struct Shell {
    mode: ShellMode,
    use_color: bool,
    /// JSON output buffer for machine-readable mode
    json_output: Mutex<Vec<String>>,
}

impl Shell {
    /// Create a new shell with the given mode.
    pub fn new(mode: ShellMode) -> Self {
        let use_color = match &mode {
            ShellMode::Json => false,
            ShellMode::Human { color, .. } => match color {
                ColorChoice::Auto => io::stderr().is_terminal(),
                ColorChoice::Always => true,
                ColorChoice::Never => false,
            },
        };

        Shell {
            mode,
            use_color,
            json_output: Mutex::new(Vec::new()),
        }
    }

    /// Create a shell from CLI flags with proper precedence.
    ///
    /// JSON mode takes precedence over quiet/verbose.
    pub fn from_flags(
        quiet: bool,
        verbose: bool,
        color: ColorChoice,
        message_format_json: bool,
    ) -> Self {
        let mode = if message_format_json {
            ShellMode::Json
        } else {
            let verbosity = if quiet {
                Verbosity::Quiet
            } else if verbose {
                Verbosity::Verbose
            } else {
                Verbosity::Normal
            };
            ShellMode::Human {
                verbosity,
                color,
            }
        };

        Shell::new(mode)
    }

    /// Check if shell is in quiet mode.
    pub fn is_quiet(&self) -> bool {
        matches!(
            self.mode,
            ShellMode::Human {
                verbosity: Verbosity::Quiet,
                ..
            }
        )
    }

    /// Check if shell is in verbose mode.
    pub fn is_verbose(&self) -> bool {
        matches!(
            self.mode,
            ShellMode::Human {
                verbosity: Verbosity::Verbose,
                ..
            }
        )
    }

    /// Check if shell is in JSON mode.
    pub fn is_json(&self) -> bool {
        matches!(self.mode, ShellMode::Json)
    }

    /// Check if colors are enabled.
    pub fn use_color(&self) -> bool {
        self.use_color
    }

    /// Print a status message.
    ///
    /// Format: `{status:>12} {message}`
    ///
    /// In quiet mode, only Error status is printed.
    /// In JSON mode, messages are silently ignored (use json_event for JSON output).
    pub fn status(&self, status: Status, msg: impl Display) {
        if self.is_json() {
            return;
        }

        if self.is_quiet() && !status.is_error() {
            return;
        }

        let prefix = self.format_status(status);
        eprintln!("{} {}", prefix, msg);
    }

    /// Print the outcome of an operation on one repository.
    ///
    /// Format: `{status:>12} {repo}: {detail}`, or just the repository when
    /// there is no detail. In JSON mode this emits a `repo` event instead.
    pub fn repo_status(&self, status: Status, repo: impl Display, detail: &str) {
        if self.is_json() {
            let event = serde_json::json!({
                "reason": "repo",
                "repo": repo.to_string(),
                "status": status.as_str().to_lowercase(),
                "detail": detail,
            });
            self.json_event(&event);
            return;
        }

        let detail = detail.trim();
        if detail.is_empty() {
            self.status(status, repo);
        } else if detail.contains('\n') {
            // Multi-line collaborator output goes below, indented
            let indented: Vec<String> = detail.lines().map(|l| format!("{:>12} {}", "", l)).collect();
            self.status(status, format!("{}\n{}", repo, indented.join("\n")));
        } else {
            self.status(status, format!("{}: {}", repo, detail));
        }
    }

    /// Print the closing `N succeeded, N skipped, N failed` line.
    pub fn summary(&self, succeeded: usize, skipped: usize, failed: usize) {
        if self.is_json() {
            let event = serde_json::json!({
                "reason": "summary",
                "succeeded": succeeded,
                "skipped": skipped,
                "failed": failed,
            });
            self.json_event(&event);
            return;
        }

        let status = if failed > 0 { Status::Failed } else { Status::Finished };
        self.status(
            status,
            format!("{} succeeded, {} skipped, {} failed", succeeded, skipped, failed),
        );
    }

    /// Print a JSON event to stdout.
    ///
    /// Only works in JSON mode; silently ignored in human mode.
    pub fn json_event(&self, event: &serde_json::Value) {
        if !self.is_json() {
            return;
        }

        let json_str = serde_json::to_string(event).unwrap_or_default();
        println!("{}", json_str);
        let _ = io::stdout().flush();

        // Also store for potential batch retrieval
        if let Ok(mut buffer) = self.json_output.lock() {
            buffer.push(json_str);
        }
    }

    /// JSON events emitted so far.
    pub fn json_events(&self) -> Vec<String> {
        self.json_output
            .lock()
            .map(|buffer| buffer.clone())
            .unwrap_or_default()
    }

    /// Format a status prefix with optional color.
    fn format_status(&self, status: Status) -> String {
        let text = status.as_str();
        let width = status.width();

        if self.use_color {
            let color = status.color_code();
            format!("{}{:>width$}\x1b[0m", color, text, width = width)
        } else {
            format!("{:>width$}", text, width = width)
        }
    }

    /// Start a timed span.
    pub fn span(self: &Arc<Self>, status: Status, msg: impl Display) -> Span {
        Span::new(Arc::clone(self), status, msg.to_string())
    }

    /// Create a progress bar over `total` repositories.
    ///
    /// In quiet or verbose mode, returns a no-op progress bar.
    /// In JSON mode, progress updates are emitted as JSON events.
    pub fn progress(self: &Arc<Self>, total: u64, msg: impl Display) -> Progress {
        Progress::new(Arc::clone(self), total, msg.to_string())
    }

}

impl Default for Shell {
    fn default() -> Self {
        Shell::new(ShellMode::default())
    }
}

/// A timed pass over the graph.
///
/// The start line is printed right away; the closing line, with the elapsed
/// time, only when the span is finished explicitly. A span dropped on an
/// error path prints nothing more.
pub struct Span {
    shell: Arc<Shell>,
    start: Instant,
}

impl Span {
    fn new(shell: Arc<Shell>, status: Status, message: String) -> Self {
        if !shell.is_quiet() && !shell.is_json() {
            shell.status(status, &message);
        }

        Span {
            shell,
            start: Instant::now(),
        }
    }

    /// Print the closing line.
    pub fn finish_with_message(self, msg: impl Display) {
        if self.shell.is_json() || self.shell.is_quiet() {
            return;
        }

        let duration_str = format_duration(self.start.elapsed());
        self.shell
            .status(Status::Finished, format!("{} in {}", msg, duration_str));
    }
}

/// Progress bar wrapper that respects shell mode.
///
/// Safe to advance from the worker threads of a fan-out batch.
pub struct Progress {
    shell: Arc<Shell>,
    pb: Option<ProgressBar>,
    total: u64,
    current: AtomicU64,
    message: String,
}

impl Progress {
    /// Create a new progress bar.
    fn new(shell: Arc<Shell>, total: u64, message: String) -> Self {
        let pb = if shell.is_quiet() || shell.is_verbose() || shell.is_json() {
            None
        } else if total > 1 {
            let pb = ProgressBar::new(total);
            let style = ProgressStyle::default_bar()
                .template("{spinner:.green} {msg} [{bar:40.cyan/blue}] {pos}/{len}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-");
            pb.set_style(style);
            pb.set_message(message.clone());
            Some(pb)
        } else {
            None
        };

        Progress {
            shell,
            pb,
            total,
            current: AtomicU64::new(0),
            message,
        }
    }

    /// Advance by one finished repository.
    pub fn tick(&self, repo: impl Display) {
        let current = self.current.fetch_add(1, Ordering::SeqCst) + 1;

        if let Some(pb) = &self.pb {
            pb.inc(1);
        }

        if self.shell.is_json() {
            let event = serde_json::json!({
                "reason": "progress",
                "current": current,
                "total": self.total,
                "message": self.message,
                "repo": repo.to_string(),
            });
            self.shell.json_event(&event);
        }

        // In verbose mode, print raw lines
        if self.shell.is_verbose() && !self.shell.is_json() {
            eprintln!("  {} {} [{}/{}]", self.message, repo, current, self.total);
        }
    }

    /// Finish the progress bar.
    pub fn finish(&self) {
        if let Some(pb) = &self.pb {
            pb.finish_and_clear();
        }
    }

    /// Get the current position.
    pub fn position(&self) -> u64 {
        self.current.load(Ordering::SeqCst)
    }
}

/// Format a duration in a human-readable way.
fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs_f64();
    if secs < 60.0 {
        format!("{:.2}s", secs)
    } else {
        let mins = secs / 60.0;
        format!("{:.1}m", mins)
    }
}
