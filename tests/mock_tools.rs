//! Scripted stand-in for the external tools
//!
//! Responses are keyed by program file name and, optionally, the first
//! argument, so `tyc list` and `tyc upload` can answer differently. Every
//! invocation is recorded for later assertions.

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;
use teensybrew::utils::process::{ToolInvocation, ToolOutput, ToolRunner};

type Hook = Box<dyn Fn(&ToolInvocation) + Send + Sync>;

#[derive(Default)]
pub struct MockToolRunner {
    responses: Mutex<HashMap<(String, Option<String>), ToolOutput>>,
    hooks: Mutex<HashMap<String, Hook>>,
    calls: Mutex<Vec<ToolInvocation>>,
}

impl MockToolRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer every run of `program` with `output`
    pub fn respond(self, program: &str, output: ToolOutput) -> Self {
        self.responses
            .lock()
            .unwrap()
            .insert((program.to_string(), None), output);
        self
    }

    /// Answer runs of `program` whose first argument is `first_arg`
    pub fn respond_to(self, program: &str, first_arg: &str, output: ToolOutput) -> Self {
        self.responses
            .lock()
            .unwrap()
            .insert((program.to_string(), Some(first_arg.to_string())), output);
        self
    }

    /// Run `hook` whenever `program` is invoked, e.g. to drop a build product
    pub fn on_run(self, program: &str, hook: impl Fn(&ToolInvocation) + Send + Sync + 'static) -> Self {
        self.hooks
            .lock()
            .unwrap()
            .insert(program.to_string(), Box::new(hook));
        self
    }

    /// `tyc list` reporting the given serial numbers
    pub fn with_devices(self, serials: &[&str]) -> Self {
        let stdout: String = serials
            .iter()
            .map(|s| format!("add {}-Teensy Teensy LC\n", s))
            .collect();
        self.respond_to("tyc", "list", ToolOutput::success(stdout))
    }

    pub fn calls(&self) -> Vec<ToolInvocation> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_to(&self, program: &str) -> Vec<ToolInvocation> {
        self.calls()
            .into_iter()
            .filter(|c| c.tool_name() == program)
            .collect()
    }

    pub fn call_count(&self, program: &str, first_arg: &str) -> usize {
        self.calls_to(program)
            .iter()
            .filter(|c| c.arg_str(0).as_deref() == Some(first_arg))
            .count()
    }

    /// Image path passed to the last `tyc upload`
    pub fn uploaded_image(&self) -> Option<PathBuf> {
        self.calls_to("tyc")
            .into_iter()
            .filter(|c| c.arg_str(0).as_deref() == Some("upload"))
            .last()
            .and_then(|c| c.arg_str(3))
            .map(PathBuf::from)
    }
}

#[async_trait]
impl ToolRunner for MockToolRunner {
    async fn run(&self, invocation: &ToolInvocation) -> std::io::Result<ToolOutput> {
        self.calls.lock().unwrap().push(invocation.clone());

        let program = invocation.tool_name();
        if let Some(hook) = self.hooks.lock().unwrap().get(&program) {
            hook(invocation);
        }

        let responses = self.responses.lock().unwrap();
        let output = responses
            .get(&(program.clone(), invocation.arg_str(0)))
            .or_else(|| responses.get(&(program.clone(), None)))
            .cloned()
            .unwrap_or_else(|| ToolOutput::success(""));
        Ok(output)
    }
}
