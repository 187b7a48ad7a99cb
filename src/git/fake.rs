//! In-memory [`CommandRunner`] for unit tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::CommandError;

use super::CommandRunner;

/// Answers each joined argument list from a table and records every call.
#[derive(Default)]
pub struct FakeGit {
    captures: HashMap<String, Result<String, String>>,
    exit_code: i32,
    calls: Mutex<Vec<String>>,
}

impl FakeGit {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_output(mut self, args: &str, output: &str) -> Self {
        self.captures.insert(args.to_string(), Ok(output.to_string()));
        self
    }

    pub fn with_failure(mut self, args: &str, message: &str) -> Self {
        self.captures.insert(args.to_string(), Err(message.to_string()));
        self
    }

    pub fn with_exit_code(mut self, code: i32) -> Self {
        self.exit_code = code;
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl CommandRunner for FakeGit {
    async fn run_capture(&self, args: &[&str]) -> Result<String, CommandError> {
        let key = args.join(" ");
        self.calls.lock().unwrap().push(key.clone());
        match self.captures.get(&key) {
            Some(Ok(output)) => Ok(output.clone()),
            Some(Err(message)) => Err(CommandError::NonZeroExit {
                command: key,
                code: 128,
                output: message.clone(),
            }),
            None => Ok(String::new()),
        }
    }

    async fn run(&self, args: &[&str]) -> Result<i32, CommandError> {
        self.calls.lock().unwrap().push(args.join(" "));
        Ok(self.exit_code)
    }
}
