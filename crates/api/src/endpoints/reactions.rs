//! Reactions endpoints.

use agora_common::AppResult;
use agora_core::{ReactionCounts, ReactionOutcome, ReactionStatus};
use agora_db::{
    EntityKind, EntityRef,
    entities::reaction::Vote,
};
use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};
use sea_orm::prelude::DateTimeWithTimeZone;
use serde::{Deserialize, Serialize};

use crate::{
    extractors::{AuthUser, MaybeAuthUser},
    middleware::AppState,
    response::ApiResponse,
};

/// Submit reaction request.
///
/// Kind and vote arrive as strings so that bad values surface as validation errors
/// with a useful message rather than as a body rejection.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitReactionRequest {
    pub entity_type: String,
    pub entity_id: i32,
    pub vote: String,
}

/// Submit reaction response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReactionResponse {
    pub status: ReactionStatus,
    pub message: &'static str,
    pub reaction_id: Option<i32>,
    pub vote: Option<Vote>,
    pub created_at: Option<DateTimeWithTimeZone>,
}

impl From<ReactionOutcome> for ReactionResponse {
    fn from(outcome: ReactionOutcome) -> Self {
        let reaction = outcome.reaction;
        Self {
            status: outcome.status,
            message: outcome.status.message(),
            reaction_id: reaction.as_ref().map(|r| r.id),
            vote: reaction.as_ref().map(|r| r.vote),
            created_at: reaction.map(|r| r.created_at),
        }
    }
}

/// Like, dislike, take back or flip a vote.
async fn submit(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<SubmitReactionRequest>,
) -> AppResult<ApiResponse<ReactionResponse>> {
    let kind: EntityKind = req.entity_type.parse()?;
    let vote: Vote = req.vote.parse()?;

    let outcome = state
        .reaction_service
        .submit_reaction(user.id, EntityRef::new(kind, req.entity_id), vote)
        .await?;

    Ok(ApiResponse::ok(outcome.into()))
}

/// Like and dislike totals for an entity.
async fn counts(
    viewer: MaybeAuthUser,
    State(state): State<AppState>,
    Path((entity_type, entity_id)): Path<(String, i32)>,
) -> AppResult<ApiResponse<ReactionCounts>> {
    let kind: EntityKind = entity_type.parse()?;

    let counts = state
        .reaction_service
        .get_reaction_counts(EntityRef::new(kind, entity_id), viewer.id())
        .await?;

    Ok(ApiResponse::ok(counts))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(submit))
        .route("/{entity_type}/{entity_id}", get(counts))
}
