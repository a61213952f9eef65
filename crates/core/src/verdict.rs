//! Structured verdicts parsed out of backend replies.
//!
//! `None` means "the reply did not say", which callers must keep apart from
//! a negative verdict.

use serde::{Deserialize, Serialize};

/// Answer to a free-text question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AskVerdict {
    pub feedback_text: String,
}

/// Result of grading code against an assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GradeVerdict {
    pub passed: Option<bool>,
    pub score: Option<u32>,
    pub feedback_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestions: Option<Vec<String>>,
}

/// Result of validating an assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateVerdict {
    pub passed: Option<bool>,
    pub feedback_text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_fields_serialize_as_null() {
        let verdict = GradeVerdict {
            passed: None,
            score: None,
            feedback_text: "hmm".into(),
            suggestions: None,
        };
        let json = serde_json::to_value(&verdict).unwrap();
        assert!(json["passed"].is_null());
        assert!(json["score"].is_null());
        assert!(json.get("suggestions").is_none());
        assert_eq!(json["feedbackText"], "hmm");
    }
}
