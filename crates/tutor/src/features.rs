//! The tutoring operations — ask, grade, validate.
//!
//! Every operation follows the same pipeline:
//!
//! ```text
//! readiness check → assemble context → build prompt → generate → parse
//! ```
//!
//! The readiness check happens before anything else so a cold engine never
//! sees a request. Backend failures propagate unchanged; nothing is retried.

use std::sync::Arc;
use tracing::{debug, error, info, warn};
use tutorbot_config::{BudgetConfig, ModeSampling, SamplingConfig, TutorConfig};
use tutorbot_core::backend::{GenerationBackend, GenerationReply, GenerationRequest};
use tutorbot_core::error::{Error, Result};
use tutorbot_core::readiness::{EngineState, EngineStatus};
use tutorbot_core::runner::CodeRunner;
use tutorbot_core::student::{
    AskRequest, Assignment, CodeFile, Environment, GradeRequest, RunResult, RunStatus,
    ValidateRequest,
};
use tutorbot_core::verdict::{AskVerdict, GradeVerdict, ValidateVerdict};

use crate::context::{estimate_tokens, ContextAssembler};
use crate::parser::{self, ValidationSignal};
use crate::prompt::{self, Prompt};

/// Which operation a generation call belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Ask,
    Grade,
    Validate,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Ask => "ask",
            Mode::Grade => "grade",
            Mode::Validate => "validate",
        }
    }
}

/// The tutor: one backend, one shared readiness state.
pub struct TutorBot {
    backend: Arc<dyn GenerationBackend>,
    engine: Arc<EngineState>,
    assembler: ContextAssembler,
    sampling: SamplingConfig,
}

impl TutorBot {
    /// Create a tutor with default budgets and sampling.
    pub fn new(backend: Arc<dyn GenerationBackend>, engine: Arc<EngineState>) -> Self {
        Self {
            backend,
            engine,
            assembler: ContextAssembler::default(),
            sampling: SamplingConfig::default(),
        }
    }

    /// Create a tutor that takes budgets and sampling from configuration.
    /// The engine starts uninitialized.
    pub fn from_config(config: &TutorConfig, backend: Arc<dyn GenerationBackend>) -> Self {
        Self::new(backend, Arc::new(EngineState::new()))
            .with_budgets(config.budgets.clone())
            .with_sampling(config.sampling.clone())
    }

    pub fn with_budgets(mut self, budgets: BudgetConfig) -> Self {
        self.assembler = ContextAssembler::new(budgets);
        self
    }

    pub fn with_sampling(mut self, sampling: SamplingConfig) -> Self {
        self.sampling = sampling;
        self
    }

    /// The shared readiness state.
    pub fn engine(&self) -> &Arc<EngineState> {
        &self.engine
    }

    pub fn backend_name(&self) -> &str {
        self.backend.name()
    }

    /// Bring the engine up against this tutor's backend.
    pub async fn initialize(&self) -> EngineStatus {
        self.engine.initialize(self.backend.as_ref()).await
    }

    fn ensure_ready(&self) -> Result<()> {
        match self.engine.status() {
            EngineStatus::Ready => Ok(()),
            status => Err(Error::NotReady { status }),
        }
    }

    /// Answer a free-text question about the student's work.
    pub async fn ask_question(&self, request: &AskRequest) -> Result<AskVerdict> {
        self.ensure_ready()?;

        let context = self.assembler.question_context(request);
        let question = self.assembler.question(request);
        info!(
            mode = Mode::Ask.as_str(),
            has_error = context.has_error,
            sections = ?context.sections,
            "Answering question"
        );

        let prompt = prompt::build_ask_prompt(&context, &question);
        let reply = self.generate(Mode::Ask, prompt).await?;
        Ok(parser::parse_ask_reply(&reply))
    }

    /// Score the student's code against the assignment.
    pub async fn grade_code(&self, request: &GradeRequest) -> Result<GradeVerdict> {
        self.ensure_ready()?;

        let context = self.assembler.grade_context(request);
        info!(mode = Mode::Grade.as_str(), "Grading code");

        let prompt = prompt::build_grade_prompt(&context);
        let reply = self.generate(Mode::Grade, prompt).await?;
        let verdict = parser::parse_grade_reply(&reply);

        if verdict.passed.is_none() {
            warn!(mode = Mode::Grade.as_str(), "Reply did not state pass or fail");
        }
        info!(
            mode = Mode::Grade.as_str(),
            passed = ?verdict.passed,
            score = ?verdict.score,
            "Grading complete"
        );
        Ok(verdict)
    }

    /// Decide whether the assignment is passed, trusting the run output.
    pub async fn validate_assignment(&self, request: &ValidateRequest) -> Result<ValidateVerdict> {
        self.ensure_ready()?;

        let context = self.assembler.validation_context(request);
        info!(
            mode = Mode::Validate.as_str(),
            files = request.code_files.len(),
            has_run = request.environment.last_run.is_some(),
            "Validating assignment"
        );

        let prompt = prompt::build_validate_prompt(&context);
        let reply = self.generate(Mode::Validate, prompt).await?;
        let (verdict, signal) = parser::parse_validation_reply(&reply);

        match signal {
            ValidationSignal::Forgiven => warn!(
                mode = Mode::Validate.as_str(),
                "No canonical result line; passing on keyword fallback"
            ),
            ValidationSignal::Unknown => warn!(
                mode = Mode::Validate.as_str(),
                "Reply did not state a validation result"
            ),
            ValidationSignal::Explicit(_) => {}
        }
        info!(mode = Mode::Validate.as_str(), passed = ?verdict.passed, "Validation complete");
        Ok(verdict)
    }

    /// Run the first code file, then validate against that run.
    ///
    /// A runner that cannot start records a `not_run` result carrying its
    /// failure text, so validation still happens on whatever is known.
    pub async fn validate_with_runner(
        &self,
        runner: &dyn CodeRunner,
        assignment: Option<Assignment>,
        code_files: Vec<CodeFile>,
    ) -> Result<ValidateVerdict> {
        self.ensure_ready()?;

        let last_run = match code_files.first() {
            Some(entry) => {
                debug!(runner = runner.name(), path = %entry.path, "Running entry file before validation");
                Some(match runner.run(&entry.source).await {
                    Ok(run) => with_console_display(run),
                    Err(e) => {
                        warn!(runner = runner.name(), error = %e, "Code runner failed");
                        RunResult {
                            status: RunStatus::NotRun,
                            error: e.to_string(),
                            ..RunResult::default()
                        }
                    }
                })
            }
            None => None,
        };

        let request = ValidateRequest {
            assignment,
            code_files,
            environment: Environment { last_run },
        };
        self.validate_assignment(&request).await
    }

    async fn generate(&self, mode: Mode, prompt: Prompt) -> Result<GenerationReply> {
        let ModeSampling {
            temperature,
            max_tokens,
        } = self.sampling_for(mode);

        debug!(
            mode = mode.as_str(),
            backend = self.backend.name(),
            system_tokens = estimate_tokens(&prompt.system_prompt),
            user_tokens = estimate_tokens(&prompt.user_prompt),
            temperature,
            max_tokens,
            "Sending generation request"
        );

        let request = GenerationRequest {
            messages: prompt.into_messages(),
            temperature,
            max_tokens,
        };

        match self.backend.generate(request).await {
            Ok(reply) => {
                if let Some(usage) = &reply.usage {
                    debug!(
                        mode = mode.as_str(),
                        prompt_tokens = usage.prompt_tokens,
                        completion_tokens = usage.completion_tokens,
                        "Generation complete"
                    );
                }
                Ok(reply)
            }
            Err(e) => {
                error!(mode = mode.as_str(), backend = self.backend.name(), error = %e, "Generation failed");
                Err(Error::Backend(e))
            }
        }
    }

    fn sampling_for(&self, mode: Mode) -> ModeSampling {
        match mode {
            Mode::Ask => self.sampling.ask,
            Mode::Grade => self.sampling.grade,
            Mode::Validate => self.sampling.validate,
        }
    }
}

/// Fill in what the console would have shown when the runner left it empty.
fn with_console_display(mut run: RunResult) -> RunResult {
    if run.console_display.is_empty() {
        run.console_display = [run.stdout.as_str(), run.stderr.as_str()]
            .into_iter()
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join("\n");
    }
    run
}
