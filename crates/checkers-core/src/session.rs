//! Test session state shared with the host runner
//!
//! A [`Session`] holds the project root and the [`Stats`] buckets the host
//! reads its pass/fail counts from. Checker failures land in the same
//! `failed` bucket as real test failures.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Final outcome of a report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Passed,
    Failed,
}

/// Phase name for reports produced by the test body itself
pub const CALL_PHASE: &str = "call";

/// `(path, line, name)` location of a report
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub path: PathBuf,
    pub line: u32,
    pub name: String,
}

/// Long-form failure explanation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LongRepr {
    pub title: String,
    pub line: u32,
    pub body: String,
}

/// A titled block of captured text attached to a report
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub title: String,
    pub text: String,
}

/// A test result as the host understands it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestReport {
    pub nodeid: String,
    pub location: Location,
    pub keywords: BTreeMap<String, u32>,
    pub when: &'static str,
    pub longrepr: Option<LongRepr>,
    pub sections: Vec<Section>,
    pub outcome: Outcome,
}

impl TestReport {
    pub fn failed(&self) -> bool {
        self.outcome == Outcome::Failed
    }
}

/// Reports collected so far, bucketed by outcome
#[derive(Debug, Clone, Default)]
pub struct Stats {
    pub passed: Vec<TestReport>,
    pub failed: Vec<TestReport>,
}

impl Stats {
    /// File a report into the bucket matching its outcome
    pub fn push(&mut self, report: TestReport) {
        match report.outcome {
            Outcome::Passed => self.passed.push(report),
            Outcome::Failed => self.failed.push(report),
        }
    }

    pub fn success(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn total(&self) -> usize {
        self.passed.len() + self.failed.len()
    }
}

/// One test run
#[derive(Debug, Clone)]
pub struct Session {
    root: PathBuf,
    pub stats: Stats,
}

impl Session {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            stats: Stats::default(),
        }
    }

    /// Project root the run was started from
    pub fn root(&self) -> &Path {
        &self.root
    }
}
