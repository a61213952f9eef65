//! Reply parsing — recovers structured verdicts from free-form model text.
//!
//! Small models drift from any requested format, so every extractor is
//! tolerant: a field the reply does not state stays `None` rather than
//! failing the call. Validation applies an ordered rule table:
//!
//! 1. the canonical `Overall result: PASSED | NOT PASSED` phrase
//! 2. the forgiveness keywords (`passed`, `good job`, `great work`)
//! 3. unknown
//!
//! Replies are only ever read through [`GenerationReply::text`].

use regex_lite::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;
use tutorbot_core::backend::GenerationReply;
use tutorbot_core::verdict::{AskVerdict, GradeVerdict, ValidateVerdict};

/// Prepended to a reply that passed only through the keyword fallback.
pub const CANONICAL_PASS_LINE: &str = "Overall result: PASSED";

/// Lower-case phrases that count as a pass when the canonical phrase is missing.
pub const FORGIVENESS_KEYWORDS: [&str; 3] = ["passed", "good job", "great work"];

static PASS_ANSWER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)pass(?:ed)?[:.]?\s*(yes|no)").expect("Invalid pass answer regex")
});

static PASS_OR_FAIL_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(pass|fail)\b").expect("Invalid pass/fail regex"));

static SCORE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)score[:.]?\s*(\d+)").expect("Invalid score regex"));

static NUMBERED_ITEM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+\.\s+").expect("Invalid numbered item regex"));

static OVERALL_RESULT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)overall result\s*[:\-]?\s*(passed|not passed)")
        .expect("Invalid overall result regex")
});

/// Pass/fail rules for grading, tried in order; the first match wins.
fn pass_rules() -> [&'static Regex; 2] {
    [&*PASS_ANSWER, &*PASS_OR_FAIL_TOKEN]
}

// ── Ask ───────────────────────────────────────────────────────────────────

pub fn parse_ask_reply(reply: &GenerationReply) -> AskVerdict {
    AskVerdict {
        feedback_text: reply.text().to_string(),
    }
}

// ── Grade ─────────────────────────────────────────────────────────────────

pub fn parse_grade_reply(reply: &GenerationReply) -> GradeVerdict {
    let text = reply.text();
    let suggestions = parse_suggestions(text);
    GradeVerdict {
        passed: parse_passed(text),
        score: parse_score(text),
        feedback_text: text.to_string(),
        suggestions: (!suggestions.is_empty()).then_some(suggestions),
    }
}

/// `yes` and `pass` mean passed, any other capture means failed.
pub fn parse_passed(text: &str) -> Option<bool> {
    pass_rules().iter().find_map(|rule| {
        rule.captures(text).map(|caps| {
            let answer = caps[1].to_lowercase();
            answer == "yes" || answer == "pass"
        })
    })
}

/// First `Score: N` in the reply. Values that overflow are treated as absent.
pub fn parse_score(text: &str) -> Option<u32> {
    SCORE
        .captures(text)
        .and_then(|caps| caps[1].parse().ok())
}

/// Numbered list items (`1. Use a loop`), with the number stripped.
pub fn parse_suggestions(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter_map(|line| {
            NUMBERED_ITEM
                .find(line)
                .map(|marker| line[marker.end()..].to_string())
        })
        .collect()
}

// ── Validate ──────────────────────────────────────────────────────────────

/// What the validation rule table concluded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationSignal {
    /// The canonical phrase was present.
    Explicit(bool),
    /// No canonical phrase, but a forgiveness keyword was.
    Forgiven,
    Unknown,
}

impl ValidationSignal {
    pub fn passed(self) -> Option<bool> {
        match self {
            ValidationSignal::Explicit(passed) => Some(passed),
            ValidationSignal::Forgiven => Some(true),
            ValidationSignal::Unknown => None,
        }
    }
}

/// Trim the reply, then drop blank lines and repeats of an already-seen
/// line. Comparison uses the trimmed line; the kept line is left as written.
pub fn dedup_lines(text: &str) -> String {
    let mut seen = HashSet::new();
    text.trim()
        .split('\n')
        .filter(|line| {
            let trimmed = line.trim();
            !trimmed.is_empty() && seen.insert(trimmed)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Run the validation rules over already-deduplicated text.
pub fn classify_validation(text: &str) -> ValidationSignal {
    if let Some(caps) = OVERALL_RESULT.captures(text) {
        return ValidationSignal::Explicit(caps[1].eq_ignore_ascii_case("passed"));
    }

    let lower = text.to_lowercase();
    if FORGIVENESS_KEYWORDS.iter().any(|kw| lower.contains(kw)) {
        ValidationSignal::Forgiven
    } else {
        ValidationSignal::Unknown
    }
}

pub fn parse_validation_reply(reply: &GenerationReply) -> (ValidateVerdict, ValidationSignal) {
    let cleaned = dedup_lines(reply.text());
    let signal = classify_validation(&cleaned);

    let feedback_text = match signal {
        ValidationSignal::Forgiven => format!("{CANONICAL_PASS_LINE}\n{cleaned}"),
        _ => cleaned,
    };

    (
        ValidateVerdict {
            passed: signal.passed(),
            feedback_text,
        },
        signal,
    )
}
