// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shared helpers for the integration tests.

use hexsettings::domain::{Result, Setting, Value};
use hexsettings::ports::Source;
use std::collections::HashMap;
use std::io;
use std::sync::{Arc, Mutex};
use tracing_subscriber::fmt::MakeWriter;

/// A source that serves values by dotted path and records every read.
#[allow(dead_code)]
#[derive(Debug, Default)]
pub struct MockSource {
    values: HashMap<String, Value>,
    reads: Mutex<Vec<String>>,
}

#[allow(dead_code)]
impl MockSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, path: &str, value: impl Into<Value>) -> Self {
        self.values.insert(path.to_string(), value.into());
        self
    }

    /// Dotted paths of every read, in order.
    pub fn reads(&self) -> Vec<String> {
        self.reads.lock().unwrap().clone()
    }
}

impl Source for MockSource {
    fn name(&self) -> &str {
        "mock"
    }

    fn read(&self, setting: &Setting, parents: &[String]) -> Result<Option<Value>> {
        let mut path = parents.to_vec();
        path.push(setting.name().to_string());
        let path = path.join(".");
        self.reads.lock().unwrap().push(path.clone());
        Ok(self.values.get(&path).cloned())
    }
}

/// In-memory log sink for `tracing-subscriber`.
#[allow(dead_code)]
#[derive(Clone, Default)]
pub struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

#[allow(dead_code)]
impl CapturedLogs {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CapturedLogs {
    type Writer = CapturedLogs;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Runs `f` with a subscriber that captures all events and returns the output.
#[allow(dead_code)]
pub fn capture_logs<R>(f: impl FnOnce() -> R) -> (R, String) {
    let logs = CapturedLogs::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(logs.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::DEBUG)
        .finish();
    let result = tracing::subscriber::with_default(subscriber, f);
    (result, logs.contents())
}

/// Number of lines in `logs` that are warnings containing `needle`.
#[allow(dead_code)]
pub fn count_warnings(logs: &str, needle: &str) -> usize {
    logs.lines()
        .filter(|line| line.contains("WARN") && line.contains(needle))
        .count()
}
