//! Reading student state from disk.

use std::path::Path;
use tutorbot_core::student::{Assignment, CodeFile, Environment, RunResult};

use crate::StudentArgs;

/// Language id for a source path, from its extension.
pub fn language_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    match ext.as_str() {
        "py" => "python",
        "js" | "mjs" | "cjs" => "javascript",
        "ts" => "typescript",
        "rb" => "ruby",
        "sh" | "bash" => "shell",
        "rs" => "rust",
        "java" => "java",
        "c" | "h" => "c",
        "cpp" | "cc" | "hpp" => "cpp",
        "go" => "go",
        "html" => "html",
        "css" => "css",
        _ => "plaintext",
    }
}

pub fn read_code_files(args: &StudentArgs) -> Result<Vec<CodeFile>, Box<dyn std::error::Error>> {
    args.files
        .iter()
        .map(|path| -> Result<CodeFile, Box<dyn std::error::Error>> {
            let source = std::fs::read_to_string(path)
                .map_err(|e| format!("Failed to read {}: {e}", path.display()))?;
            Ok(CodeFile::new(
                path.display().to_string(),
                language_for(path),
                source,
            ))
        })
        .collect()
}

pub fn read_assignment(args: &StudentArgs) -> Result<Option<Assignment>, Box<dyn std::error::Error>> {
    let Some(path) = &args.assignment else {
        return Ok(None);
    };
    let description_markdown = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read {}: {e}", path.display()))?;
    let title = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_string();

    Ok(Some(Assignment {
        title,
        description_markdown,
    }))
}

/// The `--run-result` JSON, if given.
pub fn read_environment(args: &StudentArgs) -> Result<Environment, Box<dyn std::error::Error>> {
    let Some(path) = &args.run_result else {
        return Ok(Environment::default());
    };
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read {}: {e}", path.display()))?;
    let run: RunResult = serde_json::from_str(&content)
        .map_err(|e| format!("Invalid run result in {}: {e}", path.display()))?;

    Ok(Environment {
        last_run: Some(run),
    })
}
