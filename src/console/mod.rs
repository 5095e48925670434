//! Console output sink for Tern.
//!
//! The evaluators render through this seam so the binary can write to
//! stdout while tests capture the exact text that was produced.

use std::io::Write;

/// Notice written when an evaluation is requested with no open repository.
pub const UNOPENED_NOTICE: &str =
    "No repository is open. Load data with --data or name one with --repository.";

/// Line-oriented output sink used by the query evaluators.
pub trait ConsoleOutput {
    /// Writes text without a trailing newline.
    fn write(&mut self, text: &str);

    /// Writes text followed by a newline.
    fn write_line(&mut self, text: &str);

    /// Reports the unopened-repository condition.
    fn write_unopened_notice(&mut self) {
        self.write_line(UNOPENED_NOTICE);
    }
}

/// Output sink writing to standard output.
#[derive(Debug, Default)]
pub struct StdoutOutput;

impl StdoutOutput {
    /// Creates a stdout sink.
    pub fn new() -> Self {
        Self
    }
}

impl ConsoleOutput for StdoutOutput {
    fn write(&mut self, text: &str) {
        print!("{text}");
        let _ = std::io::stdout().flush();
    }

    fn write_line(&mut self, text: &str) {
        println!("{text}");
    }
}

/// Output sink accumulating text in memory, for tests.
#[derive(Debug, Default)]
pub struct CapturedOutput {
    buffer: String,
}

impl CapturedOutput {
    /// Creates an empty capture buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written so far.
    pub fn contents(&self) -> &str {
        &self.buffer
    }

    /// The captured text split into lines.
    pub fn lines(&self) -> Vec<&str> {
        self.buffer.lines().collect()
    }
}

impl ConsoleOutput for CapturedOutput {
    fn write(&mut self, text: &str) {
        self.buffer.push_str(text);
    }

    fn write_line(&mut self, text: &str) {
        self.buffer.push_str(text);
        self.buffer.push('\n');
    }
}
