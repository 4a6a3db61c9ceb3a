//! Output formatting module

pub mod progress;
pub mod reporter;
pub mod styles;

use std::io::{self, Write};

use console::Term;
use owo_colors::OwoColorize as _;
pub use reporter::TerminalReporter;
pub use styles::Styles;

/// Output context carrying styling and terminal state.
///
/// Results go to stdout; progress and errors go to stderr so piped output
/// (a thread dump, say) stays clean.
pub struct OutputContext {
    /// Stylesheet for colored output.
    pub styles: Styles,
    /// Whether stdout is a TTY.
    pub is_tty: bool,
    /// Whether stderr is a TTY; spinners draw there.
    pub stderr_tty: bool,
    /// Whether to suppress progress output.
    pub quiet: bool,
}

impl OutputContext {
    /// Create output context based on CLI flags and environment.
    #[must_use]
    pub fn new(no_color: bool, quiet: bool) -> Self {
        let is_tty = Term::stdout().is_term();
        let stderr_tty = Term::stderr().is_term();
        let use_colors = !no_color && stderr_tty && std::env::var("NO_COLOR").is_err();

        let mut styles = Styles::default();
        if use_colors {
            styles.colorize();
        }

        Self {
            styles,
            is_tty,
            stderr_tty,
            quiet,
        }
    }

    /// Check if progress indicators should be shown.
    #[must_use]
    pub fn show_progress(&self) -> bool {
        self.stderr_tty && !self.quiet
    }

    /// Print a success message prefixed with `✓`. Suppressed when `quiet`.
    pub fn success(&self, msg: &str) {
        if !self.quiet {
            eprintln!("  {} {msg}", "✓".style(self.styles.success));
        }
    }

    /// Print a warning message prefixed with `!`. Suppressed when `quiet`.
    pub fn warn(&self, msg: &str) {
        if !self.quiet {
            eprintln!("  {} {msg}", "!".style(self.styles.warning));
        }
    }

    /// Print an error message prefixed with `✗` to stderr. Never suppressed.
    pub fn error(&self, msg: &str) {
        eprintln!("  {} {msg}", "✗".style(self.styles.error));
    }

    /// Print a step message prefixed with `→`. Suppressed when `quiet`.
    pub fn info(&self, msg: &str) {
        if !self.quiet {
            eprintln!("  {} {msg}", "→".style(self.styles.info));
        }
    }

    /// Print the result of a run to stdout. Never suppressed.
    pub fn result(&self, text: &str) {
        if !text.is_empty() {
            stdout_line(text);
        }
    }

    /// Print a section header to stdout.
    pub fn header(&self, msg: &str) {
        stdout_line(&msg.style(self.styles.header).to_string());
    }

    /// Print a key-value pair with the key padded to `width` and bolded.
    pub fn kv(&self, key: &str, value: &str, width: usize) {
        let key = format!("{key:<width$}");
        stdout_line(&format!("  {}  {value}", key.style(self.styles.bold)));
    }
}

/// Write `text` and a newline to `out`. A closed pipe (`| head`) is not an error.
///
/// # Errors
///
/// Returns any write error other than `BrokenPipe`.
pub fn write_line(out: &mut impl Write, text: &str) -> io::Result<()> {
    match writeln!(out, "{text}").and_then(|()| out.flush()) {
        Err(e) if e.kind() == io::ErrorKind::BrokenPipe => Ok(()),
        other => other,
    }
}

fn stdout_line(text: &str) {
    if let Err(e) = write_line(&mut io::stdout().lock(), text) {
        tracing::debug!(error = %e, "cannot write to stdout");
    }
}
