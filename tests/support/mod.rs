#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::Path;

use vibezip::commands::CommandRunner;
use vibezip::error::{Error, Result};
use vibezip::loader::Fetcher;
use vibezip::prompt::Prompter;

/// Serves canned responses instead of going to the network.
#[derive(Default)]
pub struct MockFetcher {
    responses: HashMap<String, Vec<u8>>,
    pub requests: RefCell<Vec<String>>,
}

impl MockFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, url: &str, body: impl Into<Vec<u8>>) -> Self {
        self.responses.insert(url.to_string(), body.into());
        self
    }
}

impl Fetcher for MockFetcher {
    fn fetch_text(&self, url: &str) -> Result<String> {
        let bytes = self.fetch_bytes(url)?;
        String::from_utf8(bytes).map_err(|e| Error::TransportFailure {
            url: url.to_string(),
            message: e.to_string(),
        })
    }

    fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>> {
        self.requests.borrow_mut().push(url.to_string());
        self.responses.get(url).cloned().ok_or_else(|| Error::TransportFailure {
            url: url.to_string(),
            message: "404 Not Found".to_string(),
        })
    }
}

/// Answers prompts from a fixed list and remembers the questions.
#[derive(Default)]
pub struct ScriptedPrompter {
    answers: RefCell<Vec<bool>>,
    pub asked: RefCell<Vec<String>>,
}

impl ScriptedPrompter {
    pub fn new(answers: &[bool]) -> Self {
        Self { answers: RefCell::new(answers.iter().rev().copied().collect()), asked: RefCell::default() }
    }
}

impl Prompter for ScriptedPrompter {
    fn confirm(&self, skip_prompt: bool, prompt: String) -> Result<bool> {
        if skip_prompt {
            return Ok(true);
        }
        self.asked.borrow_mut().push(prompt);
        self.answers
            .borrow_mut()
            .pop()
            .ok_or_else(|| Error::PromptError("no scripted answer left".to_string()))
    }
}

/// Records command lines instead of spawning processes.
#[derive(Default)]
pub struct RecordingRunner {
    pub ran: RefCell<Vec<String>>,
    pub fail_on: Option<String>,
}

impl CommandRunner for RecordingRunner {
    fn run(&self, line: &str, _cwd: &Path) -> Result<()> {
        self.ran.borrow_mut().push(line.to_string());
        if self.fail_on.as_deref() == Some(line) {
            return Err(Error::CommandError(format!("'{line}' failed")));
        }
        Ok(())
    }
}
