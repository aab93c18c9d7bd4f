//! Matching Engine — classifies candidate fields against JD fields via one
//! generative call, then derives the score locally.

use serde::{Deserialize, Serialize};

use crate::llm_client::TextCompletionService;
use crate::parser::{request_json, string_list};
use crate::pipeline::advisor::{role_list, SuggestedRole};
use crate::pipeline::prompts::{MATCH_PROMPT_TEMPLATE, MATCH_SYSTEM};

use super::extractor::ExtractedFields;

/// Classified comparison of one résumé against one job description.
/// Every sequence defaults to empty; `score` is always derived locally.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MatchResult {
    pub matched_skills: Vec<String>,
    pub unmatched_skills: Vec<String>,
    pub matched_responsibilities: Vec<String>,
    pub unmatched_responsibilities: Vec<String>,
    pub matching_points: Vec<String>,
    pub missing_points: Vec<String>,
    /// Optional role suggestions from the matching call; the orchestrator
    /// prefers the advisory stage's and uses these only when it came back empty.
    pub suggested_roles: Vec<SuggestedRole>,
    pub score: f64,
}

/// Runs the matching call over the two extracted field sets. Never fails —
/// a degraded call yields a `MatchResult` with empty sets and a 0.0 score.
pub async fn match_fields(
    service: &dyn TextCompletionService,
    resume: &ExtractedFields,
    jd: &ExtractedFields,
) -> MatchResult {
    let prompt = MATCH_PROMPT_TEMPLATE
        .replace("{resume_skills}", &resume.skills.join(", "))
        .replace("{resume_projects}", &resume.items.join("; "))
        .replace("{jd_skills}", &jd.skills.join(", "))
        .replace("{jd_responsibilities}", &jd.items.join("; "));
    let parsed = request_json(service, &prompt, MATCH_SYSTEM).await;

    let matching_points = string_list(&parsed, "matching_points");
    let missing_points = string_list(&parsed, "missing_points");
    let score = match_score(matching_points.len(), missing_points.len());

    MatchResult {
        matched_skills: string_list(&parsed, "matched_skills"),
        unmatched_skills: string_list(&parsed, "unmatched_skills"),
        matched_responsibilities: string_list(&parsed, "matched_responsibilities"),
        unmatched_responsibilities: string_list(&parsed, "unmatched_responsibilities"),
        matching_points,
        missing_points,
        suggested_roles: role_list(&parsed, "realistic_roles"),
        score,
    }
}

/// Score is pure local arithmetic over the narrative point counts, never read
/// from the model reply: `matching / (matching + missing)`, `0.0` when both
/// are empty. Keeps the score deterministic and inside `[0, 1]`.
pub fn match_score(matching: usize, missing: usize) -> f64 {
    let total = matching + missing;
    if total == 0 {
        0.0
    } else {
        matching as f64 / total as f64
    }
}
