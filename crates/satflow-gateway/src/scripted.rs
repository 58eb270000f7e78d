//! Scripted command runner for tests
//!
//! Responses are matched by tool name and a contiguous run of arguments.
//! The most recently added matching rule wins; unmatched commands succeed
//! with empty output. One-shot rules are consumed by their first match, which
//! lets a test model a listing that changes after a create call.

use crate::error::Result;
use crate::runner::{CommandOutput, CommandRunner, tool_name};
use async_trait::async_trait;
use std::sync::Mutex;

/// One recorded invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
}

impl Invocation {
    pub fn tool(&self) -> &str {
        tool_name(&self.program)
    }

    /// Whether `pattern` appears as a contiguous run of arguments
    pub fn contains(&self, pattern: &[&str]) -> bool {
        if pattern.is_empty() {
            return true;
        }
        self.args
            .windows(pattern.len())
            .any(|w| w.iter().zip(pattern).all(|(a, p)| a == p))
    }
}

struct Rule {
    tool: String,
    pattern: Vec<String>,
    output: CommandOutput,
    once: bool,
}

#[derive(Default)]
pub struct ScriptedRunner {
    rules: Mutex<Vec<Rule>>,
    calls: Mutex<Vec<Invocation>>,
}

impl ScriptedRunner {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, tool: &str, pattern: &[&str], output: CommandOutput, once: bool) -> &Self {
        self.rules
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(Rule {
                tool: tool.to_string(),
                pattern: pattern.iter().map(|p| p.to_string()).collect(),
                output,
                once,
            });
        self
    }

    /// Answer matching commands with `output`
    pub fn on(&self, tool: &str, pattern: &[&str], output: CommandOutput) -> &Self {
        self.push(tool, pattern, output, false)
    }

    /// Answer only the next matching command with exit 0 and `stdout`
    pub fn respond_once(&self, tool: &str, pattern: &[&str], stdout: &str) -> &Self {
        self.push(tool, pattern, CommandOutput::success(stdout), true)
    }

    /// Fail only the next matching command
    pub fn fail_once(&self, tool: &str, pattern: &[&str], status: i32, stderr: &str) -> &Self {
        self.push(tool, pattern, CommandOutput::failure(status, stderr), true)
    }

    /// Answer matching commands with exit 0 and `stdout`
    pub fn respond(&self, tool: &str, pattern: &[&str], stdout: &str) -> &Self {
        self.on(tool, pattern, CommandOutput::success(stdout))
    }

    /// Answer matching commands with a non-zero exit status
    pub fn fail(&self, tool: &str, pattern: &[&str], status: i32, stderr: &str) -> &Self {
        self.on(tool, pattern, CommandOutput::failure(status, stderr))
    }

    pub fn calls(&self) -> Vec<Invocation> {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Number of recorded calls to `tool` whose arguments contain `pattern`
    pub fn count(&self, tool: &str, pattern: &[&str]) -> usize {
        self.calls()
            .iter()
            .filter(|c| c.tool() == tool && c.contains(pattern))
            .count()
    }

    pub fn was_called(&self, tool: &str, pattern: &[&str]) -> bool {
        self.count(tool, pattern) > 0
    }

    /// Index of the first call matching, for ordering assertions
    pub fn position(&self, tool: &str, pattern: &[&str]) -> Option<usize> {
        self.calls()
            .iter()
            .position(|c| c.tool() == tool && c.contains(pattern))
    }
}

#[async_trait]
impl CommandRunner for ScriptedRunner {
    async fn run(&self, program: &str, args: &[String]) -> Result<CommandOutput> {
        let invocation = Invocation {
            program: program.to_string(),
            args: args.to_vec(),
        };

        let output = {
            let mut rules = self.rules.lock().unwrap_or_else(|e| e.into_inner());
            let index = rules.iter().rposition(|r| {
                let pattern: Vec<&str> = r.pattern.iter().map(String::as_str).collect();
                invocation.tool() == r.tool && invocation.contains(&pattern)
            });

            match index {
                Some(i) if rules[i].once => rules.remove(i).output,
                Some(i) => rules[i].output.clone(),
                None => CommandOutput::success(""),
            }
        };

        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(invocation);

        Ok(output)
    }
}
