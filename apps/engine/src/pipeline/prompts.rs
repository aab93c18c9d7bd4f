// All LLM prompt constants for the pipeline stages.
// Extraction calls reuse the cross-cutting JSON-only fragment from
// llm_client::prompts; matching and advisory carry their own systems.

/// Résumé extraction prompt template. Replace `{resume_text}` before sending.
pub const RESUME_EXTRACT_PROMPT_TEMPLATE: &str = r#"From the following resume text, extract:
- All relevant skills
- All key project titles or descriptions

Return a JSON object with this EXACT schema (no extra fields):
{
  "skills": ["Python", "SQL"],
  "projects": ["Built an ETL pipeline ingesting 2M rows/day"]
}

RESUME:
{resume_text}"#;

/// Job-description extraction prompt template. Replace `{jd_text}` before sending.
pub const JD_EXTRACT_PROMPT_TEMPLATE: &str = r#"From the following job description, extract:
- All relevant skills
- All key responsibilities or requirements

Return a JSON object with this EXACT schema (no extra fields):
{
  "skills": ["Python", "SQL"],
  "responsibilities": ["Build and operate data pipelines"]
}

JOB DESCRIPTION:
{jd_text}"#;

/// System prompt for the matching stage — enforces JSON-only output.
pub const MATCH_SYSTEM: &str = "You are an expert technical recruiter comparing \
    a candidate's profile against a job description. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Matching prompt template.
/// Replace: {resume_skills}, {resume_projects}, {jd_skills}, {jd_responsibilities}
pub const MATCH_PROMPT_TEMPLATE: &str = r#"Compare the candidate's skills and projects with the job description's skills and responsibilities.

Return a JSON object with this EXACT schema (no extra fields):
{
  "matched_skills": ["skills the candidate has that the JD asks for"],
  "unmatched_skills": ["JD skills the candidate does not show"],
  "matched_responsibilities": ["JD responsibilities the candidate's background covers"],
  "unmatched_responsibilities": ["JD responsibilities with no supporting evidence"],
  "matching_points": ["one narrative sentence per concrete point of alignment"],
  "missing_points": ["one narrative sentence per concrete gap"],
  "realistic_roles": [
    {"title": "Data Engineer", "reason": "justification grounded in the inputs"}
  ]
}

Rules:
- Classify by meaning, not exact string equality ("K8s" matches "Kubernetes").
- Every matching_point and missing_point must reference a specific skill or responsibility from the inputs.
- Do NOT compute any score or percentage — classification only.
- realistic_roles is optional; return [] if nothing is well-grounded.

CANDIDATE SKILLS: {resume_skills}
CANDIDATE PROJECTS: {resume_projects}
JD SKILLS: {jd_skills}
JD RESPONSIBILITIES: {jd_responsibilities}"#;

/// System prompt for the advisory stage — enforces JSON-only output.
pub const ADVISE_SYSTEM: &str = "You are an intelligent career advisor. \
    You give realistic, grounded guidance — never flattery. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Advisory prompt template. Runs over the raw texts, not the extracted
/// fields. Replace: {resume_text}, {jd_text}
pub const ADVISE_PROMPT_TEMPLATE: &str = r#"Based on the resume and job description below, suggest realistic job roles with reasoning, career improvement tips, and verified skill verdicts for this candidate.

Return a JSON object with this EXACT schema (no extra fields):
{
  "realistic_roles": [
    {"title": "Backend Engineer", "reason": "3 years of production Go services"}
  ],
  "advisor_suggestions": ["concrete, actionable suggestions"],
  "career_improvement_tips": ["skills or experience worth adding and why"],
  "verified_skill_verdicts": ["✅ or ❌ verdict per claimed skill, with a short reason"]
}

Rules:
- Roles must be realistic for the candidate TODAY, not aspirational titles.
- Every verdict must cite evidence from the resume or note its absence.

RESUME:
{resume_text}

JOB DESCRIPTION:
{jd_text}"#;
