//! Student state — the raw facts a tutoring request is built from.
//!
//! These types deserialize from the camelCase JSON the practice tool sends
//! (`userQuestion`, `codeFiles`, `languageId`, `lastRun`, ...). Every field a
//! caller may omit has a serde default so partially-available state is the
//! normal case, not an error.

use serde::{Deserialize, Serialize};

/// Whether the student's code has been executed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    #[default]
    NotRun,
    Completed,
}

/// Outcome of the last execution, as reported by the code runner.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunResult {
    /// A `lastRun` that omits `status` is taken to have run; only an explicit
    /// `not_run` marks the streams as stale.
    #[serde(default = "assume_run")]
    pub status: RunStatus,

    #[serde(default)]
    pub stdout: String,

    #[serde(default)]
    pub stderr: String,

    #[serde(default)]
    pub error: String,

    /// What the console panel actually showed the student.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub console_display: String,
}

fn assume_run() -> RunStatus {
    RunStatus::Completed
}

impl RunResult {
    /// A completed run with the given streams.
    pub fn completed(
        stdout: impl Into<String>,
        stderr: impl Into<String>,
        error: impl Into<String>,
    ) -> Self {
        Self {
            status: RunStatus::Completed,
            stdout: stdout.into(),
            stderr: stderr.into(),
            error: error.into(),
            console_display: String::new(),
        }
    }

    /// True when the run produced an error message or anything on stderr.
    pub fn has_error(&self) -> bool {
        !self.error.is_empty() || !self.stderr.is_empty()
    }

    pub fn was_run(&self) -> bool {
        self.status != RunStatus::NotRun
    }
}

/// One source file of the student's project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeFile {
    pub path: String,

    #[serde(default)]
    pub language_id: String,

    #[serde(default)]
    pub source: String,
}

impl CodeFile {
    pub fn new(
        path: impl Into<String>,
        language_id: impl Into<String>,
        source: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            language_id: language_id.into(),
            source: source.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub description_markdown: String,
}

/// Execution environment snapshot passed alongside a request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Environment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_run: Option<RunResult>,
}

/// A free-text question about the student's work.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AskRequest {
    pub user_question: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub code_files: Vec<CodeFile>,

    /// Single-buffer code, used only when `code_files` is empty.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_code: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignment: Option<Assignment>,

    /// Plain assignment text, used when `assignment` carries no description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignment_text: Option<String>,

    #[serde(default)]
    pub environment: Environment,
}

impl AskRequest {
    pub fn new(question: impl Into<String>) -> Self {
        Self {
            user_question: question.into(),
            ..Self::default()
        }
    }

    /// The assignment description if any non-empty one was supplied.
    pub fn assignment_text(&self) -> Option<&str> {
        self.assignment
            .as_ref()
            .map(|a| a.description_markdown.as_str())
            .filter(|s| !s.is_empty())
            .or_else(|| self.assignment_text.as_deref().filter(|s| !s.is_empty()))
    }
}

/// A request to score the student's code against an assignment.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GradeRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignment_text: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_code: Option<String>,
}

/// A request to decide whether the assignment is passed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignment: Option<Assignment>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub code_files: Vec<CodeFile>,

    #[serde(default)]
    pub environment: Environment,
}
