//! Test doubles shared by unit tests

use std::cell::RefCell;

use crate::error::{Error, Result};
use crate::process::{CommandSpec, Mode, ProcessOutcome, ProcessRunner};

/// Scripted `ProcessRunner` that records every call
///
/// Rules match on the prefix of the command's display form. When several
/// rules share a prefix they are consumed in order and the last one sticks.
/// Unmatched commands succeed with empty output. Interactive commands report
/// no stderr, since the real runner leaves it on the terminal.
#[derive(Default)]
pub struct RecordingRunner {
    rules: RefCell<Vec<(String, ProcessOutcome)>>,
    installed: Vec<String>,
    missing: Vec<String>,
    calls: RefCell<Vec<CommandSpec>>,
}

impl RecordingRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(self, prefix: &str, outcome: ProcessOutcome) -> Self {
        self.rules.borrow_mut().push((prefix.to_string(), outcome));
        self
    }

    pub fn installed(mut self, program: &str) -> Self {
        self.installed.push(program.to_string());
        self
    }

    pub fn missing(mut self, program: &str) -> Self {
        self.missing.push(program.to_string());
        self
    }

    pub fn calls(&self) -> Vec<CommandSpec> {
        self.calls.borrow().clone()
    }

    pub fn commands(&self) -> Vec<String> {
        self.calls.borrow().iter().map(CommandSpec::display).collect()
    }

    /// Whether any recorded command starts with `prefix`
    pub fn ran(&self, prefix: &str) -> bool {
        self.commands().iter().any(|c| c.starts_with(prefix))
    }
}

impl ProcessRunner for RecordingRunner {
    fn run(&self, spec: &CommandSpec) -> Result<ProcessOutcome> {
        self.calls.borrow_mut().push(spec.clone());

        if self.missing.contains(&spec.program) {
            return Err(Error::ToolNotFound {
                program: spec.program.clone(),
            });
        }

        let display = spec.display();
        let mut rules = self.rules.borrow_mut();
        let matching: Vec<usize> = rules
            .iter()
            .enumerate()
            .filter(|(_, (prefix, _))| display.starts_with(prefix.as_str()))
            .map(|(i, _)| i)
            .collect();

        let mut outcome = match matching.as_slice() {
            [] => ProcessOutcome::ok(""),
            [only] => rules[*only].1.clone(),
            [first, ..] => rules.remove(*first).1,
        };
        outcome.command = display;
        if spec.mode == Mode::Interactive {
            outcome.stderr.clear();
        }
        Ok(outcome)
    }

    fn is_installed(&self, program: &str) -> bool {
        self.installed.iter().any(|p| p == program)
    }
}

/// Empty repository (unborn `HEAD`) for tests that read through gitoxide
pub fn init_repo() -> tempfile::TempDir {
    let temp = tempfile::TempDir::new().unwrap();
    gix::init(temp.path()).unwrap();
    temp
}

/// Loose `refs/heads/<name>` pointing at a fixed commit id
pub fn add_branch_ref(repo: &std::path::Path, name: &str) {
    let path = repo.join(".git/refs/heads").join(name);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, "0123456789abcdef0123456789abcdef01234567\n").unwrap();
}

/// Point `HEAD` straight at a commit id, as a checkout of a hash does
pub fn detach_head(repo: &std::path::Path) {
    std::fs::write(
        repo.join(".git/HEAD"),
        "0123456789abcdef0123456789abcdef01234567\n",
    )
    .unwrap();
}
