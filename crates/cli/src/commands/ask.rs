//! `tutorbot ask` — ask a question about your code.

use tutorbot_core::student::AskRequest;

use super::input::{read_assignment, read_code_files, read_environment};
use super::{load_config, print_json, ready_tutor};
use crate::StudentArgs;

pub async fn run(question: String, args: StudentArgs) -> Result<(), Box<dyn std::error::Error>> {
    let request = AskRequest {
        user_question: question,
        code_files: read_code_files(&args)?,
        assignment: read_assignment(&args)?,
        environment: read_environment(&args)?,
        ..AskRequest::default()
    };

    let config = load_config()?;
    let tutor = ready_tutor(&config).await?;
    let verdict = tutor.ask_question(&request).await?;

    if args.json {
        return print_json(&verdict);
    }
    println!("{}", verdict.feedback_text);
    Ok(())
}
