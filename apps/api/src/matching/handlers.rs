//! Axum route handlers for the Matching API.

use axum::{
    extract::{Multipart, State},
    Json,
};
use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::matching::extractor::{candidate_name_from_file, CandidateProfile};
use crate::matching::justification::Justification;
use crate::matching::learning_path::{generate_learning_path, LearningPath, Level};
use crate::matching::scorer::MatchResult;
use crate::matching::similarity::SimilarityParams;
use crate::matching::team::TeamRecommendation;
use crate::matching::{MatchError, Skill};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

/// One candidate as supplied by the caller: resume text, a skill list, or both.
#[derive(Debug, Clone, Deserialize)]
pub struct CandidateInput {
    #[serde(default, alias = "candidate_name")]
    pub name: Option<String>,
    #[serde(default)]
    pub resume_text: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct ScoreRequest {
    #[serde(flatten)]
    pub candidate: CandidateInput,
    pub required_skills: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct ScoreResponse {
    pub profile: CandidateProfile,
    pub match_result: MatchResult,
    pub normalized_score: f64,
    pub coverage_pct: f64,
}

#[derive(Debug, Serialize)]
pub struct JustifyResponse {
    pub justification: Justification,
    pub recommendation: String,
    pub match_result: MatchResult,
}

#[derive(Debug, Deserialize)]
pub struct TeamRequest {
    pub candidates: Vec<CandidateInput>,
    pub required_skills: Vec<String>,
    pub team_size: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct CandidateMetrics {
    pub total_analyzed: usize,
    pub shortlisted: usize,
    pub requested_team_size: usize,
}

#[derive(Debug, Serialize)]
pub struct ScreeningNote {
    pub candidate: String,
    pub advice: &'static str,
}

#[derive(Debug, Serialize)]
pub struct TeamResponse {
    pub analysis_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub required_skills: Vec<Skill>,
    pub team: TeamRecommendation,
    pub screening: Vec<ScreeningNote>,
    pub candidate_metrics: CandidateMetrics,
    pub analysis_parameters: SimilarityParams,
}

#[derive(Debug, Deserialize)]
pub struct EntanglementRequest {
    pub a: String,
    pub b: String,
}

#[derive(Debug, Serialize)]
pub struct EntanglementResponse {
    pub a: Skill,
    pub b: Skill,
    pub score: f64,
}

#[derive(Debug, Deserialize)]
pub struct LearningPathRequest {
    pub missing_skills: Vec<String>,
    #[serde(default)]
    pub level: Level,
}

#[derive(Debug, Serialize)]
pub struct ExtractResponse {
    pub file_name: String,
    pub text_length: usize,
    pub profile: CandidateProfile,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/match/score
///
/// Scores one candidate against the required skills.
pub async fn handle_score(
    State(state): State<AppState>,
    Json(request): Json<ScoreRequest>,
) -> Result<Json<ScoreResponse>, AppError> {
    let pipeline = &state.pipeline;
    let required = pipeline.required_skills(&request.required_skills)?;
    let profile = build_profile(&state, &request.candidate, &required, 0);

    let match_result = pipeline.score(&profile, &required)?;
    info!(
        "Scored {}: {} matched, {} missing, raw score {:.2}",
        profile.name,
        match_result.matched.len(),
        match_result.missing.len(),
        match_result.score
    );

    Ok(Json(ScoreResponse {
        normalized_score: match_result.normalized_score(),
        coverage_pct: match_result.coverage_pct(),
        profile,
        match_result,
    }))
}

/// POST /api/v1/match/justify
///
/// Scores one candidate and composes a shortlist justification.
pub async fn handle_justify(
    State(state): State<AppState>,
    Json(request): Json<ScoreRequest>,
) -> Result<Json<JustifyResponse>, AppError> {
    let required = state.pipeline.required_skills(&request.required_skills)?;
    let profile = build_profile(&state, &request.candidate, &required, 0);

    let (match_result, justification) = state.pipeline.justify(&profile, &required)?;
    info!(
        "Justified {}: {:?} ({:.1}/10)",
        profile.name, justification.recommendation_tier, justification.normalized_score
    );

    Ok(Json(JustifyResponse {
        recommendation: justification.recommendation_tier.label().to_string(),
        justification,
        match_result,
    }))
}

/// POST /api/v1/match/team
///
/// Ranks the candidate pool and recommends a team covering the requirements.
pub async fn handle_team(
    State(state): State<AppState>,
    Json(request): Json<TeamRequest>,
) -> Result<Json<TeamResponse>, AppError> {
    let team_size = match request.team_size {
        None => state.config.default_team_size,
        Some(size) if size > 0 => size as usize,
        Some(size) => {
            return Err(MatchError::InvalidInput(format!(
                "team_size must be at least 1, got {size}"
            ))
            .into())
        }
    };
    let required = state.pipeline.required_skills(&request.required_skills)?;

    let pool: Vec<CandidateProfile> = request
        .candidates
        .iter()
        .enumerate()
        .map(|(i, candidate)| build_profile(&state, candidate, &required, i))
        .collect();

    let team = state.pipeline.recommend_team(&pool, &required, team_size)?;
    let screening = team
        .members
        .iter()
        .map(|m| ScreeningNote {
            candidate: m.profile.name.clone(),
            advice: m.advice.describe(),
        })
        .collect();

    Ok(Json(TeamResponse {
        analysis_id: Uuid::new_v4(),
        generated_at: Utc::now(),
        candidate_metrics: CandidateMetrics {
            total_analyzed: pool.len(),
            shortlisted: team.members.len(),
            requested_team_size: team_size,
        },
        analysis_parameters: state.pipeline.params(),
        required_skills: required,
        team,
        screening,
    }))
}

/// POST /api/v1/match/entanglement
///
/// Closeness of two skills, after normalization.
pub async fn handle_entanglement(
    State(state): State<AppState>,
    Json(request): Json<EntanglementRequest>,
) -> Result<Json<EntanglementResponse>, AppError> {
    if request.a.trim().is_empty() || request.b.trim().is_empty() {
        return Err(AppError::Validation(
            "both skills must be non-empty".to_string(),
        ));
    }
    let (a, b, score) = state.pipeline.entanglement(&request.a, &request.b);
    Ok(Json(EntanglementResponse { a, b, score }))
}

/// POST /api/v1/match/learning-path
///
/// Curated resources for a list of missing skills.
pub async fn handle_learning_path(
    State(state): State<AppState>,
    Json(request): Json<LearningPathRequest>,
) -> Result<Json<LearningPath>, AppError> {
    let missing = state.pipeline.normalizer.normalize_all(&request.missing_skills);
    Ok(Json(generate_learning_path(&missing, request.level)))
}

/// POST /api/v1/resumes/extract
///
/// Multipart upload: `file` (PDF or text), optional `candidate_name` and
/// comma-separated `required_skills`. Returns the extracted candidate profile.
pub async fn handle_extract(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ExtractResponse>, AppError> {
    let mut upload: Option<(String, Option<String>, Bytes)> = None;
    let mut candidate_name: Option<String> = None;
    let mut required_raw = String::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed multipart body: {e}")))?
    {
        let field_name = field.name().map(str::to_string);
        match field_name.as_deref() {
            Some("file") => {
                let file_name = field.file_name().unwrap_or("resume").to_string();
                let content_type = field.content_type().map(str::to_string);
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("Failed to read upload: {e}")))?;
                upload = Some((file_name, content_type, data));
            }
            Some("candidate_name") => {
                candidate_name = Some(field.text().await.map_err(|e| {
                    AppError::Validation(format!("Failed to read candidate_name: {e}"))
                })?);
            }
            Some("required_skills") => {
                required_raw = field.text().await.map_err(|e| {
                    AppError::Validation(format!("Failed to read required_skills: {e}"))
                })?;
            }
            _ => {}
        }
    }

    let (file_name, content_type, data) =
        upload.ok_or_else(|| AppError::Validation("multipart field 'file' is required".to_string()))?;

    let raw_text = state
        .text_extractor
        .extract_text(&file_name, content_type.as_deref(), data)
        .await;

    let requested: Vec<&str> = required_raw.split(',').collect();
    let required = state.pipeline.normalizer.normalize_all(&requested);
    let name = candidate_name
        .filter(|n| !n.trim().is_empty())
        .unwrap_or_else(|| candidate_name_from_file(&file_name));
    let profile = state
        .pipeline
        .profile(&name, &raw_text, &[] as &[&str], &required);

    info!(
        "Extracted {} explicit / {} inferred skills from {file_name}",
        profile.explicit_skills.len(),
        profile.inferred_skills.len()
    );

    Ok(Json(ExtractResponse {
        file_name,
        text_length: raw_text.len(),
        profile,
    }))
}

fn build_profile(
    state: &AppState,
    candidate: &CandidateInput,
    required: &[Skill],
    index: usize,
) -> CandidateProfile {
    let name = candidate
        .name
        .clone()
        .filter(|n| !n.trim().is_empty())
        .unwrap_or_else(|| format!("Candidate {}", index + 1));
    let raw_text = candidate.resume_text.as_deref().unwrap_or_default();
    state
        .pipeline
        .profile(&name, raw_text, &candidate.skills, required)
}
