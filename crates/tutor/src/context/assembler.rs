//! Context assembly — selects, orders and clips the student's state.
//!
//! Three variants, one per tutoring mode:
//!
//! | Mode | Sections (in order) |
//! |------|---------------------|
//! | Question | console error → student code → output → assignment |
//! | Grade | assignment + code, both always present |
//! | Validate | assignment → run output (always) → student code |
//!
//! Question mode is error-first: when the student is debugging, the error
//! and the code are what matter and the assignment is dropped. Validation is
//! output-first because the verdict should follow observed behaviour rather
//! than how the code looks.
//!
//! Every text field is clipped with [`truncate_to_tokens`] against its
//! budget from [`BudgetConfig`]. Assembly is deterministic.

use crate::context::truncate::truncate_to_tokens;
use serde::{Deserialize, Serialize};
use tutorbot_config::BudgetConfig;
use tutorbot_core::student::{AskRequest, CodeFile, GradeRequest, RunResult, ValidateRequest};

// ── Section text ──────────────────────────────────────────────────────────

pub const CONSOLE_ERROR_HEADER: &str = "=== CONSOLE ERROR ===";
pub const STUDENT_CODE_HEADER: &str = "=== STUDENT CODE ===";
pub const OUTPUT_HEADER: &str = "=== OUTPUT ===";
pub const ASSIGNMENT_HEADER: &str = "=== ASSIGNMENT ===";
pub const RUN_OUTPUT_HEADER: &str = "=== RUN OUTPUT (Most Important) ===";
pub const NO_OUTPUT_MARKER: &str = "(No output generated)";

const ANALYZE_ERROR_INSTRUCTION: &str =
    "[Instruction: Carefully analyze the error above and the code below to identify the exact problem]";

const NO_ASSIGNMENT: &str = "No assignment provided";
const NO_CODE: &str = "No code provided";

/// Words that mark a question as being about a failure.
pub const ERROR_KEYWORDS: [&str; 10] = [
    "error",
    "bug",
    "wrong",
    "fail",
    "issue",
    "problem",
    "fix",
    "debug",
    "crash",
    "exception",
];

// ── Types ─────────────────────────────────────────────────────────────────

/// Which section made it into an assembled context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    ConsoleError,
    StudentCode,
    Output,
    RunOutput,
    Assignment,
}

/// Question-mode context, ready for the prompt builder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssembledContext {
    /// Emitted sections joined by newlines; empty when nothing applied.
    pub context_text: String,
    /// The last run reported an error message or stderr output.
    pub has_error: bool,
    /// Sections in emission order.
    pub sections: Vec<SectionKind>,
}

/// Grade-mode context: both fields are always present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GradeContext {
    pub assignment_text: String,
    pub user_code: String,
}

/// True when the question is about a failure: the last run errored, or the
/// question mentions one of [`ERROR_KEYWORDS`].
pub fn is_error_focused_question(question: &str, last_run: Option<&RunResult>) -> bool {
    let question_lower = question.to_lowercase();
    let has_error_keyword = ERROR_KEYWORDS.iter().any(|kw| question_lower.contains(kw));
    has_error_keyword || last_run.is_some_and(RunResult::has_error)
}

// ── Assembler ─────────────────────────────────────────────────────────────

/// Builds the per-mode context text. Holds only its budgets.
#[derive(Debug, Clone, Default)]
pub struct ContextAssembler {
    budgets: BudgetConfig,
}

impl ContextAssembler {
    /// Create a new assembler with the given budgets.
    pub fn new(budgets: BudgetConfig) -> Self {
        Self { budgets }
    }

    pub fn budgets(&self) -> &BudgetConfig {
        &self.budgets
    }

    /// The student's question, clipped to its budget.
    pub fn question(&self, request: &AskRequest) -> String {
        truncate_to_tokens(&request.user_question, self.budgets.question).into_owned()
    }

    /// Assemble question-mode context.
    ///
    /// # Algorithm
    ///
    /// 1. `has_error` = last run present with non-empty error or stderr
    /// 2. Console error (only if `has_error` and the code was run)
    /// 3. Student code: every file, or the single `user_code` buffer
    /// 4. Output (only without error, with non-empty stdout, and if run)
    /// 5. Assignment (only if the question is not error-focused)
    pub fn question_context(&self, request: &AskRequest) -> AssembledContext {
        let last_run = request.environment.last_run.as_ref();
        let has_error = last_run.is_some_and(RunResult::has_error);
        let is_error_question = is_error_focused_question(&request.user_question, last_run);

        let mut parts: Vec<String> = Vec::new();
        let mut sections = Vec::new();

        // ── Priority 1: console error ──────────────────────────────────────
        if let Some(run) = last_run.filter(|run| has_error && run.was_run()) {
            parts.push(CONSOLE_ERROR_HEADER.into());
            if !run.error.is_empty() {
                parts.push("Error Message:".into());
                parts.push(truncate_to_tokens(&run.error, self.budgets.error_message).into_owned());
            }
            if !run.stderr.is_empty() {
                parts.push(String::new());
                parts.push("Standard Error (stderr):".into());
                parts.push(truncate_to_tokens(&run.stderr, self.budgets.stderr).into_owned());
            }
            parts.push(String::new());
            parts.push(ANALYZE_ERROR_INSTRUCTION.into());
            parts.push(String::new());
            sections.push(SectionKind::ConsoleError);
        }

        // ── Priority 2: student code ───────────────────────────────────────
        if !request.code_files.is_empty() {
            parts.push(STUDENT_CODE_HEADER.into());
            for file in &request.code_files {
                self.push_code_file(&mut parts, file, self.budgets.question_code);
            }
            parts.push(String::new());
            sections.push(SectionKind::StudentCode);
        } else if let Some(code) = request.user_code.as_deref().filter(|c| !c.is_empty()) {
            parts.push(STUDENT_CODE_HEADER.into());
            parts.push("```".into());
            parts.push(truncate_to_tokens(code, self.budgets.question_code).into_owned());
            parts.push("```".into());
            parts.push(String::new());
            sections.push(SectionKind::StudentCode);
        }

        // ── Priority 3: successful output ──────────────────────────────────
        if let Some(run) = last_run.filter(|run| !has_error && run.was_run() && !run.stdout.is_empty()) {
            parts.push(OUTPUT_HEADER.into());
            parts.push(truncate_to_tokens(&run.stdout, self.budgets.question_output).into_owned());
            parts.push(String::new());
            sections.push(SectionKind::Output);
        }

        // ── Priority 4: assignment ─────────────────────────────────────────
        if let Some(assignment) = request.assignment_text().filter(|_| !is_error_question) {
            parts.push(ASSIGNMENT_HEADER.into());
            parts.push(truncate_to_tokens(assignment, self.budgets.question_assignment).into_owned());
            parts.push(String::new());
            sections.push(SectionKind::Assignment);
        }

        AssembledContext {
            context_text: parts.join("\n"),
            has_error,
            sections,
        }
    }

    /// Assemble grade-mode context. Absent or empty fields get placeholders.
    pub fn grade_context(&self, request: &GradeRequest) -> GradeContext {
        let assignment = request
            .assignment_text
            .as_deref()
            .filter(|s| !s.is_empty())
            .unwrap_or(NO_ASSIGNMENT);
        let code = request
            .user_code
            .as_deref()
            .filter(|s| !s.is_empty())
            .unwrap_or(NO_CODE);

        GradeContext {
            assignment_text: truncate_to_tokens(assignment, self.budgets.grade_assignment).into_owned(),
            user_code: truncate_to_tokens(code, self.budgets.grade_code).into_owned(),
        }
    }

    /// Assemble validate-mode context.
    ///
    /// The run-output section is always present: stdout (or the console
    /// display), else the error, else [`NO_OUTPUT_MARKER`].
    pub fn validation_context(&self, request: &ValidateRequest) -> String {
        let empty_run = RunResult::default();
        let run = request.environment.last_run.as_ref().unwrap_or(&empty_run);

        let mut parts: Vec<String> = Vec::new();

        if let Some(assignment) = request
            .assignment
            .as_ref()
            .map(|a| a.description_markdown.as_str())
            .filter(|s| !s.is_empty())
        {
            parts.push(ASSIGNMENT_HEADER.into());
            parts.push(truncate_to_tokens(assignment, self.budgets.validate_assignment).into_owned());
            parts.push(String::new());
        }

        let stdout = if run.stdout.is_empty() {
            run.console_display.as_str()
        } else {
            run.stdout.as_str()
        };

        parts.push(RUN_OUTPUT_HEADER.into());
        if !stdout.is_empty() {
            parts.push("Standard Output:".into());
            parts.push(truncate_to_tokens(stdout, self.budgets.validate_output).into_owned());
        } else if !run.error.is_empty() {
            parts.push(format!(
                "Error: {}",
                truncate_to_tokens(&run.error, self.budgets.validate_error)
            ));
        } else {
            parts.push(NO_OUTPUT_MARKER.into());
        }
        parts.push(String::new());

        if !request.code_files.is_empty() {
            parts.push(STUDENT_CODE_HEADER.into());
            for file in &request.code_files {
                self.push_code_file(&mut parts, file, self.budgets.validate_code);
                parts.push(String::new());
            }
        }

        parts.join("\n")
    }

    fn push_code_file(&self, parts: &mut Vec<String>, file: &CodeFile, budget: usize) {
        parts.push(format!("File: {}", file.path));
        parts.push(format!("```{}", file.language_id));
        parts.push(truncate_to_tokens(&file.source, budget).into_owned());
        parts.push("```".into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tutorbot_core::student::{Assignment, RunStatus};

    fn assembler() -> ContextAssembler {
        ContextAssembler::default()
    }

    fn py(path: &str, source: &str) -> CodeFile {
        CodeFile::new(path, "python", source)
    }

    fn ask_with_run(question: &str, run: RunResult) -> AskRequest {
        let mut req = AskRequest::new(question);
        req.code_files = vec![py("main.py", "print(nme)")];
        req.environment.last_run = Some(run);
        req
    }

    fn section_pos(text: &str, header: &str) -> usize {
        text.find(header)
            .unwrap_or_else(|| panic!("missing section {header}"))
    }

    // ── Question mode ──

    #[test]
    fn error_section_precedes_code() {
        let req = ask_with_run(
            "what happened?",
            RunResult::completed("", "", "NameError: name 'nme' is not defined"),
        );
        let ctx = assembler().question_context(&req);

        assert!(ctx.has_error);
        assert_eq!(
            ctx.sections,
            vec![SectionKind::ConsoleError, SectionKind::StudentCode]
        );
        let error_at = section_pos(&ctx.context_text, CONSOLE_ERROR_HEADER);
        let code_at = section_pos(&ctx.context_text, STUDENT_CODE_HEADER);
        assert!(error_at < code_at);
        assert!(ctx.context_text.contains("Error Message:\nNameError"));
        assert!(ctx.context_text.contains(ANALYZE_ERROR_INSTRUCTION));
    }

    #[test]
    fn stderr_only_error_is_reported() {
        let req = ask_with_run("hm", RunResult::completed("", "Traceback ...", ""));
        let ctx = assembler().question_context(&req);
        assert!(ctx.has_error);
        assert!(!ctx.context_text.contains("Error Message:"));
        assert!(ctx
            .context_text
            .starts_with("=== CONSOLE ERROR ===\n\nStandard Error (stderr):\nTraceback ...\n\n[Instruction"));
    }

    #[test]
    fn error_and_stderr_are_separated_by_blank_line() {
        let req = ask_with_run(
            "hm",
            RunResult::completed("", "Traceback ...", "NameError: nme"),
        );
        let ctx = assembler().question_context(&req);
        let expected = format!(
            "=== CONSOLE ERROR ===\nError Message:\nNameError: nme\n\nStandard Error (stderr):\nTraceback ...\n\n{ANALYZE_ERROR_INSTRUCTION}\n\n{STUDENT_CODE_HEADER}"
        );
        assert!(ctx.context_text.starts_with(&expected));
    }

    #[test]
    fn status_less_last_run_reports_error() {
        let json = r#"{"userQuestion":"what now?","userCode":"print(nme)","environment":{"lastRun":{"stderr":"NameError: nme","error":"NameError"}}}"#;
        let req: AskRequest = serde_json::from_str(json).unwrap();
        let ctx = assembler().question_context(&req);
        assert!(ctx.has_error);
        assert!(ctx.context_text.starts_with("=== CONSOLE ERROR ===\nError Message:\nNameError\n"));
        assert_eq!(
            ctx.sections,
            vec![SectionKind::ConsoleError, SectionKind::StudentCode]
        );
    }

    #[test]
    fn status_less_last_run_reports_output() {
        let json = r#"{"userQuestion":"is this right?","userCode":"print(1)","environment":{"lastRun":{"stdout":"1\n"}}}"#;
        let req: AskRequest = serde_json::from_str(json).unwrap();
        let ctx = assembler().question_context(&req);
        assert!(ctx.context_text.contains("=== OUTPUT ===\n1\n"));
    }

    #[test]
    fn error_section_skipped_when_not_run() {
        let mut run = RunResult::completed("", "", "stale error");
        run.status = RunStatus::NotRun;
        let ctx = assembler().question_context(&ask_with_run("hm", run));
        assert!(ctx.has_error);
        assert!(!ctx.context_text.contains(CONSOLE_ERROR_HEADER));
        assert_eq!(ctx.sections, vec![SectionKind::StudentCode]);
    }

    #[test]
    fn code_files_render_with_language_fence() {
        let mut req = AskRequest::new("how do I loop?");
        req.code_files = vec![py("main.py", "for i in range(3):\n    pass"), CodeFile::new("util.js", "javascript", "let x = 1;")];
        let ctx = assembler().question_context(&req);
        assert_eq!(
            ctx.context_text,
            "=== STUDENT CODE ===\n\
             File: main.py\n```python\nfor i in range(3):\n    pass\n```\n\
             File: util.js\n```javascript\nlet x = 1;\n```\n"
        );
    }

    #[test]
    fn single_user_code_is_untagged() {
        let mut req = AskRequest::new("how do I loop?");
        req.user_code = Some("print(1)".into());
        let ctx = assembler().question_context(&req);
        assert_eq!(ctx.context_text, "=== STUDENT CODE ===\n```\nprint(1)\n```\n");
    }

    #[test]
    fn output_included_only_without_error() {
        let req = ask_with_run("is this right?", RunResult::completed("42\n", "", ""));
        let ctx = assembler().question_context(&req);
        assert!(ctx.context_text.contains("=== OUTPUT ===\n42\n"));

        let req = ask_with_run("is this right?", RunResult::completed("42\n", "warn", ""));
        let ctx = assembler().question_context(&req);
        assert!(!ctx.context_text.contains(OUTPUT_HEADER));
    }

    #[test]
    fn assignment_omitted_for_error_keyword() {
        let mut req = AskRequest::new("Why do I get an ERROR here?");
        req.assignment_text = Some("Print the numbers 1 to 10".into());
        let ctx = assembler().question_context(&req);
        assert!(!ctx.has_error);
        assert!(!ctx.context_text.contains(ASSIGNMENT_HEADER));
        assert!(ctx.context_text.is_empty());
    }

    #[test]
    fn assignment_included_for_general_question() {
        let mut req = AskRequest::new("What should I print?");
        req.assignment = Some(Assignment {
            title: "Counting".into(),
            description_markdown: "Print the numbers 1 to 10".into(),
        });
        let ctx = assembler().question_context(&req);
        assert_eq!(
            ctx.context_text,
            "=== ASSIGNMENT ===\nPrint the numbers 1 to 10\n"
        );
        assert_eq!(ctx.sections, vec![SectionKind::Assignment]);
    }

    #[test]
    fn assignment_omitted_when_run_has_error() {
        let mut req = ask_with_run("what now?", RunResult::completed("", "", "SyntaxError"));
        req.assignment_text = Some("Print hello".into());
        let ctx = assembler().question_context(&req);
        assert!(!ctx.sections.contains(&SectionKind::Assignment));
    }

    #[test]
    fn empty_request_yields_empty_context() {
        let ctx = assembler().question_context(&AskRequest::new("hello?"));
        assert!(ctx.context_text.is_empty());
        assert!(ctx.sections.is_empty());
        assert!(!ctx.has_error);
    }

    #[test]
    fn code_is_clipped_to_budget() {
        let budgets = BudgetConfig {
            question_code: 2,
            ..BudgetConfig::default()
        };
        let mut req = AskRequest::new("explain");
        req.code_files = vec![py("main.py", "print('hello world')")];
        let ctx = ContextAssembler::new(budgets).question_context(&req);
        assert!(ctx.context_text.contains("print('h\n... (truncated)\n```"));
    }

    #[test]
    fn question_is_clipped_to_budget() {
        let budgets = BudgetConfig {
            question: 1,
            ..BudgetConfig::default()
        };
        let req = AskRequest::new("abcdefgh");
        assert_eq!(
            ContextAssembler::new(budgets).question(&req),
            "abcd\n... (truncated)"
        );
    }

    #[test]
    fn keyword_detection_is_case_insensitive_substring() {
        assert!(is_error_focused_question("My code CRASHES", None));
        assert!(is_error_focused_question("how do I debug this", None));
        assert!(!is_error_focused_question("what does range do?", None));
        assert!(is_error_focused_question(
            "what does range do?",
            Some(&RunResult::completed("", "", "boom"))
        ));
    }

    // ── Grade mode ──

    #[test]
    fn grade_context_defaults() {
        let ctx = assembler().grade_context(&GradeRequest::default());
        assert_eq!(ctx.assignment_text, "No assignment provided");
        assert_eq!(ctx.user_code, "No code provided");

        let ctx = assembler().grade_context(&GradeRequest {
            assignment_text: Some(String::new()),
            user_code: Some("print(1)".into()),
        });
        assert_eq!(ctx.assignment_text, "No assignment provided");
        assert_eq!(ctx.user_code, "print(1)");
    }

    #[test]
    fn grade_context_clips_code() {
        let code = "x".repeat(9000);
        let ctx = assembler().grade_context(&GradeRequest {
            assignment_text: Some("Make x".into()),
            user_code: Some(code),
        });
        assert!(ctx.user_code.ends_with("\n... (truncated)"));
        assert_eq!(ctx.user_code.chars().count(), 8000 + "\n... (truncated)".len());
    }

    // ── Validate mode ──

    #[test]
    fn validation_always_has_run_output_section() {
        let ctx = assembler().validation_context(&ValidateRequest::default());
        assert_eq!(
            ctx,
            "=== RUN OUTPUT (Most Important) ===\n(No output generated)\n"
        );

        let req = ValidateRequest {
            environment: tutorbot_core::student::Environment {
                last_run: Some(RunResult::completed("", "", "")),
            },
            ..ValidateRequest::default()
        };
        assert!(assembler().validation_context(&req).contains(NO_OUTPUT_MARKER));
    }

    #[test]
    fn validation_orders_assignment_output_code() {
        let req = ValidateRequest {
            assignment: Some(Assignment {
                title: "Hello".into(),
                description_markdown: "Print Hello".into(),
            }),
            code_files: vec![py("main.py", "print('Hello')")],
            environment: tutorbot_core::student::Environment {
                last_run: Some(RunResult::completed("Hello\n", "", "")),
            },
        };
        let ctx = assembler().validation_context(&req);
        assert_eq!(
            ctx,
            "=== ASSIGNMENT ===\nPrint Hello\n\n\
             === RUN OUTPUT (Most Important) ===\nStandard Output:\nHello\n\n\n\
             === STUDENT CODE ===\nFile: main.py\n```python\nprint('Hello')\n```\n"
        );
    }

    #[test]
    fn validation_falls_back_to_console_then_error() {
        let mut run = RunResult::completed("", "", "ZeroDivisionError");
        run.console_display = "Traceback: ZeroDivisionError".into();
        let req = ValidateRequest {
            environment: tutorbot_core::student::Environment {
                last_run: Some(run.clone()),
            },
            ..ValidateRequest::default()
        };
        let ctx = assembler().validation_context(&req);
        assert!(ctx.contains("Standard Output:\nTraceback: ZeroDivisionError"));

        run.console_display.clear();
        let req = ValidateRequest {
            environment: tutorbot_core::student::Environment {
                last_run: Some(run),
            },
            ..ValidateRequest::default()
        };
        let ctx = assembler().validation_context(&req);
        assert!(ctx.contains("\nError: ZeroDivisionError\n"));
        assert!(!ctx.contains("Standard Output:"));
    }

    #[test]
    fn validation_separates_each_file() {
        let req = ValidateRequest {
            code_files: vec![py("a.py", "a = 1"), py("b.py", "b = 2")],
            ..ValidateRequest::default()
        };
        let ctx = assembler().validation_context(&req);
        assert!(ctx.ends_with(
            "File: a.py\n```python\na = 1\n```\n\nFile: b.py\n```python\nb = 2\n```\n"
        ));
    }
}
