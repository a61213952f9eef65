//! Prompt construction — turns assembled context into a system/user pair.
//!
//! Each mode has a fixed tutoring policy as its system prompt. The builders
//! are pure functions of their inputs.

use crate::context::{AssembledContext, GradeContext};
use tutorbot_core::message::Message;

/// Tutoring policy for free-text questions.
pub const ASK_SYSTEM_PROMPT: &str = concat!(
    "You are a smart, concise coding teacher. Keep responses under 250 words. ",
    "Read the error message and the code carefully before answering. ",
    "If there is an error, point to the EXACT line and explain what is wrong. ",
    "Check for the usual beginner mistakes: typos, undefined variables, syntax errors, logic errors. ",
    "Show code fixes in markdown fenced blocks with a language tag (for example ```python). ",
    "Be direct and answer exactly what the student asked. ",
    "Help the student understand the problem instead of handing over the solution. ",
    "If you are unsure, ask the student to clarify or to run the code and share the error."
);

/// Grading policy: lenient, score-first.
pub const GRADE_SYSTEM_PROMPT: &str = concat!(
    "You are a lenient, friendly coding teacher. ",
    "If the code looks like a valid attempt, give a high score (80-100). ",
    "If the code runs but is imperfect, give a passing score (60+). ",
    "Only FAIL (score < 50) if the code is empty, completely unrelated, or has broken syntax. ",
    "Start your response with: PASS/FAIL and Score: X/100."
);

/// Validation policy: trust the output, pass whenever possible.
pub const VALIDATE_SYSTEM_PROMPT: &str = concat!(
    "You are a very lenient and forgiving coding teacher grading a beginner.\n",
    "Your goal is to PASS the student whenever possible.\n",
    "\n",
    "PASSING RULES (apply these first):\n",
    "1. TRUST THE OUTPUT: if the \"Standard Output\" shows the expected result, PASS the student even if the code looks messy.\n",
    "2. IGNORE COMMENTS: never fail because of \"TODO\" comments or commented-out code. Only active code counts.\n",
    "3. IGNORE TYPOS: if names differ slightly but the logic works, PASS.\n",
    "4. IGNORE WARNINGS: if there is output, ignore \"Standard Error\" warnings.\n",
    "\n",
    "ONLY FAIL IF:\n",
    "- The code is completely empty.\n",
    "- A syntax error prevents ANY output.\n",
    "- The output is completely wrong (asked for \"Hello\", got \"Goodbye\").\n",
    "\n",
    "RESPONSE FORMAT:\n",
    "- Start with: \"Overall result: PASSED\" or \"Overall result: NOT PASSED\"\n",
    "- If PASSED: say \"Good job!\" and mention one thing they did right.\n",
    "- If NOT PASSED: give 1 very specific hint.\n",
    "- Keep the response under 100 words."
);

const PINPOINT_DEFECT_INSTRUCTION: &str = "\n[Your task: Read the error message, examine the code, find the exact mistake, and explain how to fix it briefly.]\n";

const QUESTION_HEADER: &str = "\n=== QUESTION ===\n";

const JUDGMENT_FRAMING: [&str; 6] = [
    "",
    "=== YOUR JUDGMENT ===",
    "Based on the OUTPUT above: Did the code basically do what was asked?",
    "Remember: Be forgiving. If the output looks roughly correct, say PASSED.",
    "Ignore \"TODO\" comments.",
    "Reply starting with \"Overall result: PASSED\" or \"Overall result: NOT PASSED\".",
];

/// A ready-to-send prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub system_prompt: String,
    pub user_prompt: String,
}

impl Prompt {
    fn new(system_prompt: &str, user_prompt: String) -> Self {
        Self {
            system_prompt: system_prompt.to_string(),
            user_prompt,
        }
    }

    /// System message first, then the user message.
    pub fn into_messages(self) -> Vec<Message> {
        vec![
            Message::system(self.system_prompt),
            Message::user(self.user_prompt),
        ]
    }
}

/// Build the ask-mode prompt. With no context the question goes out alone.
pub fn build_ask_prompt(context: &AssembledContext, question: &str) -> Prompt {
    let user_prompt = if context.context_text.is_empty() {
        question.to_string()
    } else {
        let instructions = if context.has_error {
            PINPOINT_DEFECT_INSTRUCTION
        } else {
            ""
        };
        format!(
            "{}{instructions}{QUESTION_HEADER}{question}",
            context.context_text
        )
    };
    Prompt::new(ASK_SYSTEM_PROMPT, user_prompt)
}

pub fn build_grade_prompt(context: &GradeContext) -> Prompt {
    let user_prompt = format!(
        "Assignment:\n{}\n\nStudent's code:\n```\n{}\n```\n\n\
         Grade this code leniently. Provide: Pass/Fail, Score (0-100), and concise feedback.",
        context.assignment_text, context.user_code
    );
    Prompt::new(GRADE_SYSTEM_PROMPT, user_prompt)
}

pub fn build_validate_prompt(context_text: &str) -> Prompt {
    let mut lines = Vec::with_capacity(JUDGMENT_FRAMING.len() + 1);
    lines.push(context_text);
    lines.extend(JUDGMENT_FRAMING);
    Prompt::new(VALIDATE_SYSTEM_PROMPT, lines.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tutorbot_core::message::Role;

    fn context(text: &str, has_error: bool) -> AssembledContext {
        AssembledContext {
            context_text: text.into(),
            has_error,
            sections: Vec::new(),
        }
    }

    #[test]
    fn ask_without_context_is_bare_question() {
        let prompt = build_ask_prompt(&context("", true), "How do loops work?");
        assert_eq!(prompt.user_prompt, "How do loops work?");
        assert_eq!(prompt.system_prompt, ASK_SYSTEM_PROMPT);
    }

    #[test]
    fn ask_with_context_appends_question() {
        let prompt = build_ask_prompt(&context("=== OUTPUT ===\n42\n", false), "Is 42 right?");
        assert_eq!(
            prompt.user_prompt,
            "=== OUTPUT ===\n42\n\n=== QUESTION ===\nIs 42 right?"
        );
    }

    #[test]
    fn ask_with_error_adds_pinpoint_instruction() {
        let prompt = build_ask_prompt(&context("=== CONSOLE ERROR ===\n", true), "Why?");
        assert!(prompt.user_prompt.contains("[Your task: Read the error message"));
        let task_at = prompt.user_prompt.find("[Your task").unwrap();
        let question_at = prompt.user_prompt.find("=== QUESTION ===").unwrap();
        assert!(task_at < question_at);
        assert!(prompt.user_prompt.ends_with("=== QUESTION ===\nWhy?"));
    }

    #[test]
    fn grade_prompt_fences_code() {
        let prompt = build_grade_prompt(&GradeContext {
            assignment_text: "Print hi".into(),
            user_code: "print('hi')".into(),
        });
        assert_eq!(
            prompt.user_prompt,
            "Assignment:\nPrint hi\n\nStudent's code:\n```\nprint('hi')\n```\n\n\
             Grade this code leniently. Provide: Pass/Fail, Score (0-100), and concise feedback."
        );
        assert!(prompt.system_prompt.starts_with("You are a lenient"));
    }

    #[test]
    fn validate_prompt_frames_judgment() {
        let prompt = build_validate_prompt("=== RUN OUTPUT (Most Important) ===\nhi\n");
        assert!(prompt.user_prompt.starts_with("=== RUN OUTPUT"));
        assert!(prompt.user_prompt.contains("\n\n\n=== YOUR JUDGMENT ===\n"));
        assert!(prompt
            .user_prompt
            .ends_with("Reply starting with \"Overall result: PASSED\" or \"Overall result: NOT PASSED\"."));
        assert!(prompt.system_prompt.contains("Overall result: NOT PASSED"));
    }

    #[test]
    fn messages_are_system_then_user() {
        let messages = build_validate_prompt("ctx").into_messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, Role::System);
        assert_eq!(messages[1].role, Role::User);
        assert!(messages[1].content.starts_with("ctx\n\n=== YOUR JUDGMENT ==="));
    }
}
