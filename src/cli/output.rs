//! Colored terminal output and workflow annotations
//!
//! Inside a GitHub Actions job warnings, errors and debug messages become
//! workflow commands so the runner can surface them; elsewhere they are
//! printed with color.

use crate::outputs::command::workflow_command;
use std::io::Write;
use termcolor::{BufferWriter, Color, ColorChoice, ColorSpec, WriteColor};

/// Output manager for consistent colored terminal output
#[derive(Debug)]
pub struct OutputManager {
    bufwtr: BufferWriter,
    annotations: bool,
    debug: bool,
}

impl Clone for OutputManager {
    fn clone(&self) -> Self {
        Self::new(self.annotations, self.debug)
    }
}

impl OutputManager {
    /// Create a new output manager.
    ///
    /// `annotations` switches warnings, errors and debug lines to workflow
    /// commands; `debug` shows debug lines outside a workflow.
    pub fn new(annotations: bool, debug: bool) -> Self {
        let choice = if annotations {
            ColorChoice::Never
        } else {
            ColorChoice::Auto
        };
        Self {
            bufwtr: BufferWriter::stdout(choice),
            annotations,
            debug,
        }
    }

    /// Whether messages are emitted as workflow commands
    pub fn annotations(&self) -> bool {
        self.annotations
    }

    fn print_line(&self, line: &str) -> std::io::Result<()> {
        let mut buffer = self.bufwtr.buffer();
        writeln!(&mut buffer, "{}", line)?;
        self.bufwtr.print(&buffer)
    }

    /// Print plain text
    pub fn println(&self, message: &str) -> std::io::Result<()> {
        self.print_line(message)
    }

    /// Print an info message
    pub fn info(&self, message: &str) -> std::io::Result<()> {
        let mut buffer = self.bufwtr.buffer();
        let _ = buffer.set_color(ColorSpec::new().set_fg(Some(Color::Cyan)));
        let _ = write!(&mut buffer, "ℹ");
        let _ = buffer.reset();
        let _ = writeln!(&mut buffer, " {}", message);
        self.bufwtr.print(&buffer)
    }

    /// Print a success message
    pub fn success(&self, message: &str) -> std::io::Result<()> {
        let mut buffer = self.bufwtr.buffer();
        let _ = buffer.set_color(ColorSpec::new().set_fg(Some(Color::Green)).set_bold(true));
        let _ = write!(&mut buffer, "✓");
        let _ = buffer.reset();
        let _ = writeln!(&mut buffer, " {}", message);
        self.bufwtr.print(&buffer)
    }

    /// Print a warning message
    pub fn warn(&self, message: &str) -> std::io::Result<()> {
        if self.annotations {
            return self.print_line(&workflow_command("warning", &[], message));
        }

        let mut buffer = self.bufwtr.buffer();
        let _ = buffer.set_color(ColorSpec::new().set_fg(Some(Color::Yellow)).set_bold(true));
        let _ = write!(&mut buffer, "⚠");
        let _ = buffer.reset();
        let _ = buffer.set_color(ColorSpec::new().set_fg(Some(Color::Yellow)));
        let _ = writeln!(&mut buffer, " {}", message);
        let _ = buffer.reset();
        self.bufwtr.print(&buffer)
    }

    /// Print an error message (always shown)
    pub fn error(&self, message: &str) {
        // The runner only reads workflow commands from stdout
        if self.annotations {
            if self.print_line(&workflow_command("error", &[], message)).is_err() {
                eprintln!("{}", workflow_command("error", &[], message));
            }
            return;
        }

        let bufwtr = BufferWriter::stderr(ColorChoice::Auto);
        let mut buffer = bufwtr.buffer();

        if buffer.set_color(ColorSpec::new().set_fg(Some(Color::Red)).set_bold(true)).is_err()
            || write!(&mut buffer, "✗").is_err()
            || buffer.reset().is_err()
            || buffer.set_color(ColorSpec::new().set_fg(Some(Color::Red))).is_err()
            || writeln!(&mut buffer, " {}", message).is_err()
            || buffer.reset().is_err()
            || bufwtr.print(&buffer).is_err()
        {
            println!("✗ {}", message);
        }
    }

    /// Print a debug message
    pub fn debug(&self, message: &str) -> std::io::Result<()> {
        if self.annotations {
            return self.print_line(&workflow_command("debug", &[], message));
        }
        if !self.debug {
            return Ok(());
        }

        let mut buffer = self.bufwtr.buffer();
        let _ = buffer.set_color(ColorSpec::new().set_fg(Some(Color::Blue)));
        let _ = write!(&mut buffer, "→");
        let _ = buffer.reset();
        let _ = writeln!(&mut buffer, " {}", message);
        self.bufwtr.print(&buffer)
    }

    /// Print indented text (for sub-items)
    pub fn indent(&self, message: &str) -> std::io::Result<()> {
        self.print_line(&format!("  {}", message))
    }
}

impl Default for OutputManager {
    fn default() -> Self {
        Self::new(false, false)
    }
}
