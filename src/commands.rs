//! Post-create shell commands.
//!
//! Deciding what happens to each command line is a pure step
//! ([`plan_commands`]); running it is a separate effectful step
//! ([`execute_plan`]) driven by a [`Prompter`] and a [`CommandRunner`].

use std::path::Path;
use std::process::Command;

use log::{debug, warn};

use crate::document::Platform;
use crate::error::{Error, Result};
use crate::prompt::Prompter;

/// How the commands of a block are handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandMode {
    /// Run every line and record it in the script
    AutoConfirm,
    /// Ask the operator per line
    Interactive,
    /// Never run, only record (archives)
    RecordOnly,
}

/// What to do with one command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandAction {
    RunAndRecord,
    Ask,
    RecordOnly,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandStep {
    pub line: String,
    pub action: CommandAction,
}

/// Turns a raw command block into steps, one per non-blank line.
pub fn plan_commands(block: &str, mode: CommandMode) -> Vec<CommandStep> {
    let action = match mode {
        CommandMode::AutoConfirm => CommandAction::RunAndRecord,
        CommandMode::Interactive => CommandAction::Ask,
        CommandMode::RecordOnly => CommandAction::RecordOnly,
    };
    block
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| CommandStep { line: line.to_string(), action })
        .collect()
}

/// Runs a single shell command line.
pub trait CommandRunner {
    fn run(&self, line: &str, cwd: &Path) -> Result<()>;
}

/// Runs command lines through the platform shell.
pub struct ShellRunner {
    platform: Platform,
}

impl ShellRunner {
    pub fn new(platform: Platform) -> Self {
        Self { platform }
    }
}

impl Default for ShellRunner {
    fn default() -> Self {
        ShellRunner::new(Platform::current())
    }
}

impl CommandRunner for ShellRunner {
    fn run(&self, line: &str, cwd: &Path) -> Result<()> {
        let mut command = match self.platform {
            Platform::Windows => {
                let mut command = Command::new("cmd");
                command.arg("/C").arg(line);
                command
            }
            Platform::Mac | Platform::Linux => {
                let mut command = Command::new("sh");
                command.arg("-c").arg(line);
                command
            }
        };

        let status = command
            .current_dir(cwd)
            .status()
            .map_err(|e| Error::CommandError(format!("cannot start '{line}': {e}")))?;

        if !status.success() {
            return Err(Error::CommandError(format!("'{line}' failed with {status}")));
        }
        Ok(())
    }
}

/// What happened while executing a plan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutcome {
    /// Lines that were run, successfully or not
    pub executed: Vec<String>,
    /// Lines that go into the install script, in original order
    pub recorded: Vec<String>,
}

/// Executes a plan.
///
/// Lines the operator accepts are run right away and left out of the
/// script; declined lines are only recorded. A line the operator cannot be
/// asked about counts as declined. A failing command is logged and the
/// remaining lines still run.
pub fn execute_plan(
    plan: &[CommandStep],
    prompt: &dyn Prompter,
    runner: &dyn CommandRunner,
    cwd: &Path,
) -> CommandOutcome {
    let mut outcome = CommandOutcome::default();

    for step in plan {
        let (run, record) = match step.action {
            CommandAction::RunAndRecord => (true, true),
            CommandAction::RecordOnly => (false, true),
            CommandAction::Ask => {
                let accepted = match prompt.confirm(false, format!("Execute '{}' now?", step.line)) {
                    Ok(accepted) => accepted,
                    Err(e) => {
                        warn!("Not running '{}': {}", step.line, e);
                        false
                    }
                };
                (accepted, !accepted)
            }
        };

        if record {
            outcome.recorded.push(step.line.clone());
        }
        if run {
            debug!("Running '{}' in {}", step.line, cwd.display());
            if let Err(e) = runner.run(&step.line, cwd) {
                warn!("{}", e);
            }
            outcome.executed.push(step.line.clone());
        }
    }

    outcome
}

/// A generated install script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallScript {
    pub platform: Platform,
    pub lines: Vec<String>,
}

impl InstallScript {
    pub fn new(platform: Platform, lines: Vec<String>) -> Self {
        Self { platform, lines }
    }

    pub fn file_name(&self) -> &'static str {
        self.platform.script_name()
    }

    fn preamble(&self) -> &'static str {
        match self.platform {
            Platform::Windows => "@echo off\n",
            Platform::Mac | Platform::Linux => "#!/bin/bash\n\n",
        }
    }

    /// Renders the script with one command per line.
    pub fn render(&self) -> String {
        let mut script = self.preamble().to_string();
        for line in &self.lines {
            script.push_str(line);
            script.push('\n');
        }
        script
    }

    /// Renders the script with an `echo` announcing each command, for
    /// scripts bundled into archives.
    pub fn render_described(&self) -> String {
        let mut script = self.preamble().to_string();
        for line in &self.lines {
            script.push_str(&format!("echo {}\n", describe(self.platform, line)));
            script.push_str(line);
            script.push('\n');
        }
        script
    }
}

fn describe(platform: Platform, line: &str) -> String {
    match platform {
        // cmd needs its metacharacters escaped with ^
        Platform::Windows => {
            let mut escaped = String::from("Running: ");
            for c in line.chars() {
                if matches!(c, '&' | '|' | '<' | '>' | '^' | '%') {
                    escaped.push('^');
                }
                escaped.push(c);
            }
            escaped
        }
        Platform::Mac | Platform::Linux => {
            format!("'Running: {}'", line.replace('\'', r"'\''"))
        }
    }
}
