//! Report drafting pipeline.
//!
//! Flow: work-done stage → plans stage. Each stage builds an instruction from
//! the work description alone, calls the text generator, and extracts at most
//! three tasks. Stages run strictly in order; the first failure aborts the run
//! and nothing is stored.

use tracing::info;

use crate::errors::AppError;
use crate::llm_client::prompts::ONE_SENTENCE_INSTRUCTION;
use crate::llm_client::TextGenerator;
use crate::report::extractor::extract_tasks;
use crate::report::models::{ReportRequest, ReportState, TaskList, TaskSection};
use crate::report::prompts::{PLANS_PROMPT_TEMPLATE, WORK_DONE_PROMPT_TEMPLATE};

/// One drafting step: which list it fills and the prompt that drives it.
#[derive(Debug, Clone, Copy)]
pub struct Stage {
    pub section: TaskSection,
    pub template: &'static str,
}

/// The stages in execution order.
pub const STAGES: [Stage; 2] = [
    Stage {
        section: TaskSection::WorkDone,
        template: WORK_DONE_PROMPT_TEMPLATE,
    },
    Stage {
        section: TaskSection::Plans,
        template: PLANS_PROMPT_TEMPLATE,
    },
];

/// Fills a stage template with the work description. The user's text goes in
/// last so placeholders typed into it are left alone.
pub fn build_instruction(template: &str, work_description: &str) -> String {
    template
        .replace("{one_sentence}", ONE_SENTENCE_INSTRUCTION)
        .replace("{work_description}", work_description.trim())
}

/// Runs a single stage and returns its task list.
pub async fn run_stage(
    generator: &dyn TextGenerator,
    stage: Stage,
    work_description: &str,
) -> Result<TaskList, AppError> {
    let instruction = build_instruction(stage.template, work_description);

    let raw = generator
        .generate(&instruction)
        .await
        .map_err(|source| AppError::Llm {
            stage: stage.section.label(),
            source,
        })?;

    Ok(extract_tasks(&raw))
}

/// Validates the request and drafts both task lists into a fresh `ReportState`.
pub async fn generate_report(
    generator: &dyn TextGenerator,
    request: ReportRequest,
) -> Result<ReportState, AppError> {
    request.validate()?;

    let mut state = ReportState::new(request);

    for stage in STAGES {
        let tasks = run_stage(generator, stage, &state.request.work_description).await?;
        info!(
            "Drafted {} {} item(s) for session {}",
            tasks.len(),
            stage.section.label(),
            state.session_id
        );
        *state.tasks_mut(stage.section) = tasks;
    }

    Ok(state)
}


#[cfg(test)]
mod tests {
    use super::testing::StubGenerator;
    use super::*;
    use crate::llm_client::LlmError;
    use crate::report::models::sample_request;

    #[tokio::test]
    async fn test_end_to_end_drafts_both_lists() {
        let generator = StubGenerator::always("Implemented login UI.\nWrote unit tests.");
        let state = generate_report(&generator, sample_request()).await.unwrap();

        assert_eq!(state.work_done.items(), &["Implemented login UI.", "Wrote unit tests."]);
        assert_eq!(state.plans.items(), &["Implemented login UI.", "Wrote unit tests."]);
        assert!(state.output_file.is_none());
    }

    #[tokio::test]
    async fn test_stages_run_work_done_then_plans() {
        let generator = StubGenerator::always("x");
        generate_report(&generator, sample_request()).await.unwrap();

        let calls = generator.recorded();
        assert_eq!(calls.len(), 2);
        assert!(calls[0].contains("completed last week"));
        assert!(calls[1].contains("planned for next week"));
        for call in &calls {
            assert!(call.contains("Built a login page and wrote unit tests"));
            assert!(call.ends_with("Each task should be one sentence."));
        }
    }

    #[tokio::test]
    async fn test_work_done_depends_only_on_description() {
        let first = StubGenerator::always("Did A.\nDid B.");
        let a = generate_report(&first, sample_request()).await.unwrap();

        let mut shuffled = sample_request();
        shuffled.student_name = "Someone Else".to_string();
        shuffled.organization = "Other Org".to_string();
        shuffled.hours = "12".to_string();
        shuffled.internal_guide_name = "Prof. X".to_string();
        let second = StubGenerator::always("Did A.\nDid B.");
        let b = generate_report(&second, shuffled).await.unwrap();

        assert_eq!(a.work_done, b.work_done);
        assert_eq!(first.recorded()[0], second.recorded()[0]);
    }

    #[tokio::test]
    async fn test_empty_request_never_calls_generator() {
        let generator = StubGenerator::always("x");
        let err = generate_report(&generator, ReportRequest::default())
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Validation(_)));
        assert!(generator.recorded().is_empty());
    }

    #[tokio::test]
    async fn test_single_line_response_gives_single_task() {
        let generator = StubGenerator::always("Wrote the README.");
        let state = generate_report(&generator, sample_request()).await.unwrap();
        assert_eq!(state.work_done.len(), 1);
        assert_eq!(state.plans.len(), 1);
    }

    #[tokio::test]
    async fn test_failure_in_plans_stage_aborts_with_stage_name() {
        let generator = StubGenerator::sequence(vec![
            Ok("Did A.".to_string()),
            Err(LlmError::Api {
                status: 429,
                message: "Resource has been exhausted".to_string(),
            }),
        ]);
        let err = generate_report(&generator, sample_request()).await.unwrap_err();

        match err {
            AppError::Llm { stage, source } => {
                assert_eq!(stage, "plans");
                assert!(source.to_string().contains("Resource has been exhausted"));
            }
            other => panic!("expected Llm error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_failure_in_first_stage_skips_second() {
        let generator = StubGenerator::sequence(vec![Err(LlmError::EmptyContent)]);
        let err = generate_report(&generator, sample_request()).await.unwrap_err();

        assert!(matches!(err, AppError::Llm { stage: "work done", .. }));
        assert_eq!(generator.recorded().len(), 1);
    }

    #[test]
    fn test_build_instruction_trims_description() {
        let instruction = build_instruction(WORK_DONE_PROMPT_TEMPLATE, "  Refactored auth  ");
        assert!(instruction.starts_with("Based on this work description: Refactored auth, generate"));
    }

    #[test]
    fn test_placeholders_in_description_are_kept_verbatim() {
        let instruction = build_instruction(
            PLANS_PROMPT_TEMPLATE,
            "Documented the {one_sentence} token",
        );
        assert!(instruction.contains("Documented the {one_sentence} token"));
        assert!(instruction.contains(ONE_SENTENCE_INSTRUCTION));
    }
}
