use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::dse::catalog::Catalog;
use crate::dse::grade::Grade;
use crate::dse::matcher::{match_programs, summarize, MatchSummary, ProgramMatch};
use crate::dse::scores::{ScoresInput, StudentScores, CORE_SUBJECTS, ELECTIVE_SUBJECTS};
use crate::errors::AppError;
use crate::state::AppState;
use crate::users::load_user;

const DEFAULT_TOP_N: usize = 5;

#[derive(Serialize)]
pub struct SubjectsResponse {
    pub grades: Vec<GradeInfo>,
    pub core_subjects: Vec<&'static str>,
    pub elective_subjects: Vec<&'static str>,
}

#[derive(Serialize)]
pub struct GradeInfo {
    pub grade: Grade,
    pub points: u8,
}

#[derive(Deserialize)]
pub struct MatchRequest {
    #[serde(flatten)]
    pub scores: ScoresInput,
    pub top_n: Option<usize>,
}

#[derive(Serialize)]
pub struct MatchResponse {
    pub matches: Vec<ProgramMatch>,
    pub summary: MatchSummary,
}

fn run_match(scores: &StudentScores, catalog: &Catalog, top_n: Option<usize>) -> MatchResponse {
    let matches = match_programs(scores, catalog);
    let summary = summarize(&matches, top_n.unwrap_or(DEFAULT_TOP_N));
    MatchResponse { matches, summary }
}

/// GET /api/v1/dse/subjects
pub async fn handle_subjects() -> Json<SubjectsResponse> {
    Json(SubjectsResponse {
        grades: Grade::ALL
            .iter()
            .map(|&grade| GradeInfo {
                grade,
                points: grade.points(),
            })
            .collect(),
        core_subjects: CORE_SUBJECTS.to_vec(),
        elective_subjects: ELECTIVE_SUBJECTS.to_vec(),
    })
}

/// GET /api/v1/dse/programs
pub async fn handle_programs(State(state): State<AppState>) -> Json<Catalog> {
    Json(state.catalog.as_ref().clone())
}

/// POST /api/v1/dse/match
pub async fn handle_match(
    State(state): State<AppState>,
    Json(req): Json<MatchRequest>,
) -> Result<Json<MatchResponse>, AppError> {
    let scores = req.scores.validate()?;
    Ok(Json(run_match(&scores, &state.catalog, req.top_n)))
}

/// POST /api/v1/users/:id/dse/match
pub async fn handle_profile_match(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<MatchResponse>, AppError> {
    let user = load_user(state.store.as_ref(), user_id).await?;
    let saved = user.dse_scores.as_ref().ok_or_else(|| {
        AppError::Validation(format!(
            "missing required subject scores: user {user_id} has no DSE scores saved"
        ))
    })?;
    let scores = StudentScores::from_profile(saved)?;
    Ok(Json(run_match(&scores, &state.catalog, None)))
}
