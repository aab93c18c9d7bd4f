//! Pipeline Orchestrator — a fixed-order five-stage state machine threading a
//! per-invocation accumulator from raw document text to the final report.
//!
//! Flow: NormalizeInputs → ExtractFields → MatchFields → Advise → AssembleOutput.
//! No stage is re-entered, none skipped, and every stage runs even when an
//! earlier one produced only empty-default data: a résumé whose skills could
//! not be extracted still goes through matching and advisory, simply matching
//! against an empty skill set.

pub mod advisor;
pub mod extractor;
pub mod matcher;
pub mod prompts;

use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use crate::config::Config;
use crate::errors::PipelineError;
use crate::llm_client::{LlmClient, TextCompletionService};
use crate::normalizer::normalize;
use crate::pipeline::advisor::{advise, AdvisoryResult, SuggestedRole};
use crate::pipeline::extractor::{extract_jd_fields, extract_resume_fields, ExtractedFields};
use crate::pipeline::matcher::{match_fields, MatchResult};

// ────────────────────────────────────────────────────────────────────────────
// Stages and state
// ────────────────────────────────────────────────────────────────────────────

/// The five pipeline stages, entered strictly in this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    NormalizeInputs,
    ExtractFields,
    MatchFields,
    Advise,
    AssembleOutput,
}

impl Stage {
    /// The successor stage. The run loop returns out of `AssembleOutput`
    /// before ever advancing past it.
    fn next(self) -> Stage {
        match self {
            Stage::NormalizeInputs => Stage::ExtractFields,
            Stage::ExtractFields => Stage::MatchFields,
            Stage::MatchFields => Stage::Advise,
            Stage::Advise => Stage::AssembleOutput,
            Stage::AssembleOutput => Stage::AssembleOutput,
        }
    }
}

/// Per-invocation mutable accumulator. Created fresh for every run, consumed
/// by output assembly, never shared across invocations.
///
/// Holds both text forms: the normalized texts feed the generative prompts,
/// while the raw inputs keep their line structure for the extractor's
/// section fallback (headings are invisible once newlines are collapsed).
#[derive(Debug, Default)]
struct PipelineState {
    resume_text: String,
    jd_text: String,
    raw_resume_text: String,
    raw_jd_text: String,
    resume_fields: ExtractedFields,
    jd_fields: ExtractedFields,
    match_result: MatchResult,
    advisory: AdvisoryResult,
}

impl PipelineState {
    /// Terminal-stage assembly: copies the accumulated fields into the
    /// immutable report and drops the accumulator.
    fn into_report(self) -> MatchReport {
        let PipelineState {
            match_result,
            advisory,
            ..
        } = self;

        // Advisory roles win; the matcher's optional suggestions are a backup
        // for when the advisory call degraded.
        let suggested_roles = if advisory.suggested_roles.is_empty() {
            match_result.suggested_roles
        } else {
            advisory.suggested_roles
        };

        MatchReport {
            score: match_result.score,
            matching_points: match_result.matching_points,
            missing_points: match_result.missing_points,
            matched_skills: match_result.matched_skills,
            unmatched_skills: match_result.unmatched_skills,
            matched_responsibilities: match_result.matched_responsibilities,
            unmatched_responsibilities: match_result.unmatched_responsibilities,
            suggested_roles,
            advisor_suggestions: advisory.advisor_suggestions,
            career_tips: advisory.career_tips,
            verified_skill_verdicts: advisory.verified_skill_verdicts,
        }
    }
}

/// Immutable final output of one pipeline run.
///
/// Every sequence field is always present; an empty section means the
/// producing stage degraded, never that it was skipped.
#[derive(Debug, Clone, Serialize)]
pub struct MatchReport {
    /// `matching_points / (matching_points + missing_points)`, `0.0` when
    /// both are empty. Always in `[0, 1]`.
    pub score: f64,
    pub matching_points: Vec<String>,
    pub missing_points: Vec<String>,
    pub matched_skills: Vec<String>,
    pub unmatched_skills: Vec<String>,
    pub matched_responsibilities: Vec<String>,
    pub unmatched_responsibilities: Vec<String>,
    pub suggested_roles: Vec<SuggestedRole>,
    pub advisor_suggestions: Vec<String>,
    pub career_tips: Vec<String>,
    pub verified_skill_verdicts: Vec<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Pipeline
// ────────────────────────────────────────────────────────────────────────────

/// Caller-facing handle over the stage pipeline.
///
/// Cheap to clone; concurrent runs share the completion service read-only and
/// nothing else — each invocation gets its own `PipelineState`.
#[derive(Clone)]
pub struct MatchPipeline {
    service: Arc<dyn TextCompletionService>,
}

impl MatchPipeline {
    pub fn new(service: Arc<dyn TextCompletionService>) -> Self {
        Self { service }
    }

    /// Builds a pipeline backed by the production Anthropic client,
    /// configured from environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        let config = Config::from_env()?;
        Ok(Self::new(Arc::new(LlmClient::new(config.anthropic_api_key))))
    }

    /// Runs the full pipeline over one résumé / job-description pair.
    ///
    /// The only error is an invocation precondition failure (blank input).
    /// Every downstream failure — unusable extraction, malformed response,
    /// transport error — degrades to empty-default sections in the report.
    pub async fn run(
        &self,
        resume_text: &str,
        jd_text: &str,
    ) -> Result<MatchReport, PipelineError> {
        if resume_text.trim().is_empty() {
            return Err(PipelineError::Validation(
                "resume text is required".to_string(),
            ));
        }
        if jd_text.trim().is_empty() {
            return Err(PipelineError::Validation(
                "job description text is required".to_string(),
            ));
        }

        let service = self.service.as_ref();
        let mut state = PipelineState::default();
        let mut stage = Stage::NormalizeInputs;

        loop {
            info!("entering pipeline stage {stage:?}");
            match stage {
                Stage::NormalizeInputs => {
                    state.resume_text = normalize(resume_text);
                    state.jd_text = normalize(jd_text);
                    state.raw_resume_text = resume_text.to_string();
                    state.raw_jd_text = jd_text.to_string();
                }
                Stage::ExtractFields => {
                    state.resume_fields =
                        extract_resume_fields(service, &state.resume_text, &state.raw_resume_text)
                            .await;
                    state.jd_fields =
                        extract_jd_fields(service, &state.jd_text, &state.raw_jd_text).await;
                    info!(
                        "extracted {} resume skills, {} JD skills",
                        state.resume_fields.skills.len(),
                        state.jd_fields.skills.len()
                    );
                }
                Stage::MatchFields => {
                    state.match_result =
                        match_fields(service, &state.resume_fields, &state.jd_fields).await;
                    info!("match score {:.2}", state.match_result.score);
                }
                Stage::Advise => {
                    state.advisory = advise(service, &state.resume_text, &state.jd_text).await;
                }
                Stage::AssembleOutput => {
                    return Ok(state.into_report());
                }
            }
            stage = stage.next();
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::LlmError;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Deterministic service that answers calls from a script, in order:
    /// résumé extraction, JD extraction, matching, advisory. `Err(status)`
    /// entries simulate a transport failure for that call. Every prompt
    /// received is recorded so tests can assert what a stage was fed.
    struct ScriptedService {
        replies: Mutex<VecDeque<Result<String, u16>>>,
        prompts: Mutex<Vec<String>>,
    }

    impl ScriptedService {
        fn new(replies: Vec<Result<&str, u16>>) -> Self {
            Self {
                replies: Mutex::new(
                    replies
                        .into_iter()
                        .map(|r| r.map(str::to_string))
                        .collect(),
                ),
                prompts: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl TextCompletionService for ScriptedService {
        async fn complete(&self, prompt: &str, _system: &str) -> Result<String, LlmError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            match self.replies.lock().unwrap().pop_front() {
                Some(Ok(text)) => Ok(text),
                Some(Err(status)) => Err(LlmError::Api {
                    status,
                    message: "scripted failure".to_string(),
                }),
                None => Err(LlmError::EmptyContent),
            }
        }
    }

    fn pipeline(replies: Vec<Result<&str, u16>>) -> MatchPipeline {
        MatchPipeline::new(Arc::new(ScriptedService::new(replies)))
    }

    const RESUME: &str = "SKILLS: Python, SQL\nPROJECTS\nBuilt an ETL pipeline";
    const JD: &str = "Responsibilities: Build data pipelines using Python and SQL";

    #[tokio::test]
    async fn test_full_match_scores_one() {
        let pipeline = pipeline(vec![
            Ok(r#"{"skills": ["Python", "SQL"], "projects": ["Built an ETL pipeline"]}"#),
            Ok(r#"{"skills": ["Python", "SQL"], "responsibilities": ["Build data pipelines"]}"#),
            Ok(r#"{
                "matched_skills": ["Python", "SQL"],
                "unmatched_skills": [],
                "matching_points": ["Python covers the pipeline requirement", "SQL matches"],
                "missing_points": []
            }"#),
            Ok(r#"{"career_improvement_tips": ["Add orchestration experience"]}"#),
        ]);

        let report = pipeline.run(RESUME, JD).await.unwrap();
        assert_eq!(report.score, 1.0);
        assert!(report.missing_points.is_empty());
        assert_eq!(report.matched_skills, vec!["Python", "SQL"]);
        assert_eq!(report.career_tips, vec!["Add orchestration experience"]);
    }

    #[tokio::test]
    async fn test_blank_resume_rejected() {
        let pipeline = pipeline(vec![]);
        let err = pipeline.run("   \n", JD).await.unwrap_err();
        assert!(matches!(err, PipelineError::Validation(_)));
    }

    #[tokio::test]
    async fn test_blank_jd_rejected() {
        let pipeline = pipeline(vec![]);
        let err = pipeline.run(RESUME, "").await.unwrap_err();
        assert!(matches!(err, PipelineError::Validation(_)));
    }

    #[tokio::test]
    async fn test_advisory_transport_failure_keeps_run_alive() {
        let pipeline = pipeline(vec![
            Ok(r#"{"skills": ["Python"], "projects": []}"#),
            Ok(r#"{"skills": ["Python"], "responsibilities": []}"#),
            Ok(r#"{"matching_points": ["Python aligns"], "missing_points": ["No SQL"]}"#),
            Err(503),
        ]);

        let report = pipeline.run(RESUME, JD).await.unwrap();
        assert_eq!(report.score, 0.5);
        assert!(report.suggested_roles.is_empty());
        assert!(report.career_tips.is_empty());
        assert!(report.verified_skill_verdicts.is_empty());
    }

    #[tokio::test]
    async fn test_every_call_failing_still_returns_report() {
        // All four generative calls fail; extraction degrades to the section
        // scan and the rest of the report comes back empty-default.
        let pipeline = pipeline(vec![Err(500), Err(500), Err(500), Err(500)]);

        let report = pipeline.run(RESUME, JD).await.unwrap();
        assert_eq!(report.score, 0.0);
        assert!(report.matching_points.is_empty());
        assert!(report.missing_points.is_empty());
        assert!(report.matched_skills.is_empty());
        assert!(report.unmatched_skills.is_empty());
        assert!(report.matched_responsibilities.is_empty());
        assert!(report.unmatched_responsibilities.is_empty());
        assert!(report.suggested_roles.is_empty());
        assert!(report.advisor_suggestions.is_empty());
        assert!(report.career_tips.is_empty());
        assert!(report.verified_skill_verdicts.is_empty());
    }

    #[tokio::test]
    async fn test_section_fallback_survives_normalization_into_matching() {
        // Both extraction calls fail, so the fields the matcher sees come
        // entirely from the section scan — which must read the raw input,
        // since the normalized text has no newlines left for heading
        // boundaries.
        let service = Arc::new(ScriptedService::new(vec![
            Err(500),
            Err(500),
            Ok(r#"{"matching_points": ["Python aligns"], "missing_points": []}"#),
            Ok(r#"{}"#),
        ]));
        let pipeline = MatchPipeline::new(service.clone());
        let report = pipeline.run(RESUME, JD).await.unwrap();
        assert_eq!(report.score, 1.0);

        let prompts = service.prompts.lock().unwrap();
        let match_prompt = &prompts[2];
        assert!(
            match_prompt.contains("CANDIDATE SKILLS: Python, SQL\n"),
            "skill list bled past its section: {match_prompt}"
        );
        assert!(match_prompt.contains("CANDIDATE PROJECTS: Built an ETL pipeline\n"));
        assert!(match_prompt
            .contains("JD RESPONSIBILITIES: Build data pipelines using Python and SQL"));
    }

    #[tokio::test]
    async fn test_matcher_roles_used_when_advisory_degrades() {
        let pipeline = pipeline(vec![
            Ok(r#"{"skills": ["Python"], "projects": []}"#),
            Ok(r#"{"skills": ["Python"], "responsibilities": []}"#),
            Ok(r#"{
                "matching_points": ["Python aligns"],
                "missing_points": [],
                "realistic_roles": [{"title": "Data Engineer", "reason": "pipelines"}]
            }"#),
            Err(503),
        ]);

        let report = pipeline.run(RESUME, JD).await.unwrap();
        assert_eq!(report.suggested_roles.len(), 1);
        assert_eq!(report.suggested_roles[0].title, "Data Engineer");
    }

    #[tokio::test]
    async fn test_advisory_roles_preferred_over_matcher_roles() {
        let pipeline = pipeline(vec![
            Ok(r#"{"skills": ["Python"], "projects": []}"#),
            Ok(r#"{"skills": ["Python"], "responsibilities": []}"#),
            Ok(r#"{
                "matching_points": ["ok"],
                "missing_points": [],
                "realistic_roles": [{"title": "Backup Role", "reason": "from matcher"}]
            }"#),
            Ok(r#"{"realistic_roles": [{"title": "Advisory Role", "reason": "from advisor"}]}"#),
        ]);

        let report = pipeline.run(RESUME, JD).await.unwrap();
        assert_eq!(report.suggested_roles.len(), 1);
        assert_eq!(report.suggested_roles[0].title, "Advisory Role");
    }

    #[tokio::test]
    async fn test_score_always_in_unit_interval() {
        let pipeline = pipeline(vec![
            Ok(r#"{"skills": ["Go"], "projects": []}"#),
            Ok(r#"{"skills": ["Rust"], "responsibilities": []}"#),
            Ok(r#"{"matching_points": [], "missing_points": ["No Rust", "No systems work"]}"#),
            Ok(r#"{}"#),
        ]);

        let report = pipeline.run("some resume", "some jd").await.unwrap();
        assert!((0.0..=1.0).contains(&report.score));
        assert_eq!(report.score, 0.0);
    }

    #[test]
    fn test_stage_order_is_linear() {
        let mut stage = Stage::NormalizeInputs;
        let mut order = vec![stage];
        while stage != Stage::AssembleOutput {
            stage = stage.next();
            order.push(stage);
        }
        assert_eq!(
            order,
            vec![
                Stage::NormalizeInputs,
                Stage::ExtractFields,
                Stage::MatchFields,
                Stage::Advise,
                Stage::AssembleOutput,
            ]
        );
    }
}
