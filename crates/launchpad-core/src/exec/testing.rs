//! Scripted command runner for unit tests.

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};

use super::{CommandOutput, CommandRunner, CommandSpec};

/// Answers commands from a script keyed by their display form and records
/// every invocation. Unscripted commands succeed with empty output.
#[derive(Default)]
pub(crate) struct ScriptedRunner {
    responses: RefCell<HashMap<String, VecDeque<CommandOutput>>>,
    calls: RefCell<Vec<String>>,
}

impl ScriptedRunner {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Queue a response for `command`; the last queued response repeats.
    pub(crate) fn on(self, command: &str, output: CommandOutput) -> Self {
        self.responses
            .borrow_mut()
            .entry(command.to_string())
            .or_default()
            .push_back(output);
        self
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    pub(crate) fn was_called(&self, command: &str) -> bool {
        self.calls.borrow().iter().any(|c| c == command)
    }
}

impl CommandRunner for ScriptedRunner {
    fn run(&self, spec: &CommandSpec) -> CommandOutput {
        let key = spec.to_string();
        self.calls.borrow_mut().push(key.clone());

        let mut responses = self.responses.borrow_mut();
        let Some(queue) = responses.get_mut(&key) else {
            return CommandOutput::succeeded("");
        };
        let next = if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        };
        next.unwrap_or_else(|| CommandOutput::succeeded(""))
    }
}
