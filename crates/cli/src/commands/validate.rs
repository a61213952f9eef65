//! `tutorbot validate` — run the code, then decide whether the assignment is passed.
//!
//! With `--run-result` the given run is trusted as-is. Without it the entry
//! file is executed with the interpreter configured for its language.

use tutorbot_core::student::ValidateRequest;
use tutorbot_core::verdict::ValidateVerdict;

use super::input::{read_assignment, read_code_files, read_environment};
use super::runner::ProcessRunner;
use super::{load_config, print_json, ready_tutor};
use crate::StudentArgs;

pub async fn run(args: StudentArgs) -> Result<(), Box<dyn std::error::Error>> {
    let code_files = read_code_files(&args)?;
    let assignment = read_assignment(&args)?;

    let config = load_config()?;
    let tutor = ready_tutor(&config).await?;

    let verdict = if args.run_result.is_some() {
        let request = ValidateRequest {
            assignment,
            code_files,
            environment: read_environment(&args)?,
        };
        tutor.validate_assignment(&request).await?
    } else {
        let language = code_files
            .first()
            .map(|f| f.language_id.clone())
            .ok_or("validate needs at least one --file or a --run-result")?;
        let runner = ProcessRunner::for_language(&config.runner, &language)
            .ok_or_else(|| format!("No interpreter configured for '{language}' (see [runner.interpreters])"))?;
        tutor
            .validate_with_runner(&runner, assignment, code_files)
            .await?
    };

    if args.json {
        return print_json(&verdict);
    }
    print_verdict(&verdict);
    Ok(())
}

fn print_verdict(verdict: &ValidateVerdict) {
    match verdict.passed {
        Some(true) => println!("✅ Assignment passed\n"),
        Some(false) => println!("❌ Assignment not passed yet\n"),
        None => println!("⚠️  The tutor did not give a clear result\n"),
    }
    println!("{}", verdict.feedback_text);
}
