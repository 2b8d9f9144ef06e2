//! Line-oriented terminal prompts
//!
//! All user-facing text and typed answers flow through [`Console`], so handlers
//! can be driven from a script in tests. Reads are blocking and synchronous;
//! end of input is treated exactly like an empty answer.
//!
//! Commands whose stdout is consumed by scripts call [`Console::divert_to_stderr`]
//! first. Menus, prompts and progress then go to stderr and only [`Console::data`]
//! writes reach stdout.

use std::cell::RefCell;
use std::fmt::Display;
use std::io::{self, BufRead, Cursor, Write};
use std::rc::Rc;

use crate::error::Result;

/// Prompt shown before destructive operations
pub const CONFIRM_PROMPT: &str = "Are you sure you want to continue?";

/// Reader/writer pair for prompts and progress output
pub struct Console {
    input: Box<dyn BufRead>,
    output: Box<dyn Write>,
    errors: Box<dyn Write>,
    diverted: bool,
}

impl Console {
    pub fn new(input: impl BufRead + 'static, output: impl Write + 'static) -> Self {
        Self {
            input: Box::new(input),
            output: Box::new(output),
            errors: Box::new(io::stderr()),
            diverted: false,
        }
    }

    /// Replace the stream used while diverted (stderr by default)
    pub fn with_errors(mut self, errors: impl Write + 'static) -> Self {
        self.errors = Box::new(errors);
        self
    }

    /// Console bound to the process's stdin/stdout
    pub fn stdio() -> Self {
        Self::new(io::BufReader::new(io::stdin()), io::stdout())
    }

    /// Console that answers prompts from `input` and records everything written
    pub fn scripted(input: &str) -> (Self, CapturedOutput) {
        let (console, output, _errors) = Self::scripted_split(input);
        (console, output)
    }

    /// Like [`Console::scripted`], with stdout and stderr recorded separately
    pub fn scripted_split(input: &str) -> (Self, CapturedOutput, CapturedOutput) {
        let output = CapturedOutput::default();
        let errors = CapturedOutput::default();
        let console = Self::new(Cursor::new(input.to_string().into_bytes()), output.clone())
            .with_errors(errors.clone());
        (console, output, errors)
    }

    /// Send prompts, menus and progress to stderr from now on
    pub fn divert_to_stderr(&mut self) {
        self.diverted = true;
    }

    /// Stdout, regardless of diversion. For machine-readable results.
    pub fn data(&mut self) -> &mut dyn Write {
        &mut *self.output
    }

    fn interface(&mut self) -> &mut dyn Write {
        if self.diverted {
            &mut *self.errors
        } else {
            &mut *self.output
        }
    }

    /// Read one line, without its trailing newline. `None` at end of input.
    pub fn read_line(&mut self) -> Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    /// Print `message` (no newline) and return the trimmed answer, empty at end of input
    pub fn prompt(&mut self, message: impl Display) -> Result<String> {
        let out = self.interface();
        write!(out, "{}", message)?;
        out.flush()?;
        Ok(self
            .read_line()?
            .map(|line| line.trim().to_string())
            .unwrap_or_default())
    }

    /// Ask a yes/no question. Only `y`/`yes` (any case) count as consent.
    pub fn confirm(&mut self, question: impl Display) -> Result<bool> {
        let answer = self.prompt(format_args!("{} [y/N]: ", question))?;
        Ok(matches!(answer.to_lowercase().as_str(), "y" | "yes"))
    }

    /// The standard "Are you sure you want to continue?" confirmation
    pub fn confirm_continue(&mut self) -> Result<bool> {
        self.confirm(CONFIRM_PROMPT)
    }
}

impl Write for Console {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.interface().write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.interface().flush()
    }
}

/// Shared in-memory sink used by [`Console::scripted`]
#[derive(Debug, Clone, Default)]
pub struct CapturedOutput(Rc<RefCell<Vec<u8>>>);

impl CapturedOutput {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.borrow()).to_string()
    }
}

impl Write for CapturedOutput {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_trims_answer() {
        let (mut console, out) = Console::scripted("  feature-x  \n");
        let answer = console.prompt("Branch name: ").unwrap();
        assert_eq!(answer, "feature-x");
        assert_eq!(out.contents(), "Branch name: ");
    }

    #[test]
    fn test_prompt_at_eof_is_empty() {
        let (mut console, _out) = Console::scripted("");
        assert_eq!(console.prompt("> ").unwrap(), "");
        assert!(console.read_line().unwrap().is_none());
    }

    #[test]
    fn test_confirm_defaults_to_no() {
        for input in ["\n", "", "n\n", "no\n", "sure\n"] {
            let (mut console, _out) = Console::scripted(input);
            assert!(!console.confirm_continue().unwrap(), "input {:?}", input);
        }
    }

    #[test]
    fn test_confirm_accepts_yes() {
        for input in ["y\n", "Y\n", "yes\n", "YES\r\n"] {
            let (mut console, _out) = Console::scripted(input);
            assert!(console.confirm_continue().unwrap(), "input {:?}", input);
        }
    }

    #[test]
    fn test_confirm_prompt_text() {
        let (mut console, out) = Console::scripted("n\n");
        console.confirm_continue().unwrap();
        assert_eq!(
            out.contents(),
            "Are you sure you want to continue? [y/N]: "
        );
    }

    #[test]
    fn test_write_through() {
        let (mut console, out) = Console::scripted("");
        writeln!(console, "hello {}", 42).unwrap();
        assert_eq!(out.contents(), "hello 42\n");
    }

    #[test]
    fn test_divert_keeps_stdout_for_data() {
        let (mut console, out, err) = Console::scripted_split("2\n");
        console.divert_to_stderr();
        writeln!(console, "1: first").unwrap();
        assert_eq!(console.prompt("Pick: ").unwrap(), "2");
        writeln!(console.data(), "/work/second").unwrap();

        assert_eq!(out.contents(), "/work/second\n");
        assert_eq!(err.contents(), "1: first\nPick: ");
    }
}
