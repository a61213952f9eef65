//! `tutorbot grade` — grade code against an assignment.

use tutorbot_core::student::GradeRequest;

use super::input::{read_assignment, read_code_files};
use super::{load_config, print_json, ready_tutor};
use crate::StudentArgs;

pub async fn run(args: StudentArgs) -> Result<(), Box<dyn std::error::Error>> {
    let files = read_code_files(&args)?;
    let request = GradeRequest {
        assignment_text: read_assignment(&args)?.map(|a| a.description_markdown),
        user_code: grading_source(&files),
    };

    let config = load_config()?;
    let tutor = ready_tutor(&config).await?;
    let verdict = tutor.grade_code(&request).await?;

    if args.json {
        return print_json(&verdict);
    }

    let passed = match verdict.passed {
        Some(true) => "PASS",
        Some(false) => "FAIL",
        None => "unknown",
    };
    let score = verdict
        .score
        .map(|s| format!("{s}/100"))
        .unwrap_or_else(|| "unknown".into());
    println!("Result: {passed}   Score: {score}\n");
    println!("{}", verdict.feedback_text);
    Ok(())
}

/// One file is graded as-is; several are concatenated under path headers.
fn grading_source(files: &[tutorbot_core::student::CodeFile]) -> Option<String> {
    match files {
        [] => None,
        [only] => Some(only.source.clone()),
        many => Some(
            many.iter()
                .map(|f| format!("// {}\n{}", f.path, f.source))
                .collect::<Vec<_>>()
                .join("\n\n"),
        ),
    }
}
