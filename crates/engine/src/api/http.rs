//! HTTP routes.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use uuid::Uuid;

use arena_domain::{BattleId, BattleMoveId, CharacterId};
use arena_shared::{
    BattleData, BattleMoveData, BattleMoveResultData, CharacterData, SaveCharacterRequest,
    StartBattleQuery, SubmitMoveQuery,
};

use crate::app::App;
use crate::use_cases::battle::{battle_move_to_protocol, battle_to_protocol, BattleError};
use crate::use_cases::character::CharacterError;

/// Create all HTTP routes.
pub fn routes() -> Router<Arc<App>> {
    Router::new()
        .route("/", get(health))
        .route("/api/health", get(health))
        .route("/api/battles", get(list_battles).post(start_battle))
        .route("/api/battles/{id}", get(get_battle))
        .route("/api/battles/{id}/moves", get(list_moves))
        .route("/api/battles/{id}/move", post(submit_move))
        .route("/api/moves/{id}", get(get_battle_move))
        .route("/api/characters", post(save_character))
        .route("/api/characters/{id}", get(get_character))
        .route("/api/characters/{id}/battles", get(character_battles))
}

async fn health() -> &'static str {
    "OK"
}

// =============================================================================
// Battles
// =============================================================================

async fn list_battles(State(app): State<Arc<App>>) -> Result<Json<Vec<BattleData>>, ApiError> {
    let battles = app.use_cases.battle.queries.list_battles().await?;
    Ok(Json(battles.iter().map(battle_to_protocol).collect()))
}

async fn get_battle(
    State(app): State<Arc<App>>,
    Path(id): Path<Uuid>,
) -> Result<Json<BattleData>, ApiError> {
    let battle = app
        .use_cases
        .battle
        .queries
        .get_battle(BattleId::from_uuid(id))
        .await?;
    Ok(Json(battle_to_protocol(&battle)))
}

async fn list_moves(
    State(app): State<Arc<App>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<BattleMoveData>>, ApiError> {
    let moves = app
        .use_cases
        .battle
        .queries
        .list_moves(BattleId::from_uuid(id))
        .await?;
    Ok(Json(moves.iter().map(battle_move_to_protocol).collect()))
}

async fn get_battle_move(
    State(app): State<Arc<App>>,
    Path(id): Path<Uuid>,
) -> Result<Json<BattleMoveData>, ApiError> {
    let battle_move = app
        .use_cases
        .battle
        .queries
        .get_battle_move(BattleMoveId::from_uuid(id))
        .await?;
    Ok(Json(battle_move_to_protocol(&battle_move)))
}

async fn start_battle(
    State(app): State<Arc<App>>,
    Query(query): Query<StartBattleQuery>,
) -> Result<(StatusCode, Json<BattleData>), ApiError> {
    let battle = app
        .use_cases
        .battle
        .start
        .execute(
            CharacterId::from_uuid(query.character1_id),
            CharacterId::from_uuid(query.character2_id),
        )
        .await?;
    Ok((StatusCode::CREATED, Json(battle_to_protocol(&battle))))
}

async fn submit_move(
    State(app): State<Arc<App>>,
    Path(id): Path<Uuid>,
    Query(query): Query<SubmitMoveQuery>,
) -> Result<Json<BattleMoveResultData>, ApiError> {
    let result = app
        .use_cases
        .battle
        .submit_move
        .execute(
            BattleId::from_uuid(id),
            CharacterId::from_uuid(query.character_id),
            &query.move_name,
        )
        .await?;
    Ok(Json(result.to_protocol()))
}

// =============================================================================
// Characters
// =============================================================================

async fn save_character(
    State(app): State<Arc<App>>,
    Json(request): Json<SaveCharacterRequest>,
) -> Result<Json<CharacterData>, ApiError> {
    Ok(Json(app.use_cases.character.crud.save(request).await?))
}

async fn get_character(
    State(app): State<Arc<App>>,
    Path(id): Path<Uuid>,
) -> Result<Json<CharacterData>, ApiError> {
    Ok(Json(
        app.use_cases
            .character
            .crud
            .get(CharacterId::from_uuid(id))
            .await?,
    ))
}

async fn character_battles(
    State(app): State<Arc<App>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<BattleData>>, ApiError> {
    let battles = app
        .use_cases
        .battle
        .queries
        .character_battles(CharacterId::from_uuid(id))
        .await?;
    Ok(Json(battles.iter().map(battle_to_protocol).collect()))
}

// =============================================================================
// Errors
// =============================================================================

#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
    BadRequest(String),
    Internal(String),
}

impl axum::response::IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg).into_response(),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg).into_response(),
            ApiError::Internal(msg) => {
                tracing::error!(error = %msg, "Request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal error").into_response()
            }
        }
    }
}

impl From<BattleError> for ApiError {
    fn from(e: BattleError) -> Self {
        if e.is_not_found() {
            ApiError::NotFound(e.to_string())
        } else if e.is_client_error() {
            ApiError::BadRequest(e.to_string())
        } else {
            ApiError::Internal(e.to_string())
        }
    }
}

impl From<CharacterError> for ApiError {
    fn from(e: CharacterError) -> Self {
        match e {
            CharacterError::NotFound(_) => ApiError::NotFound(e.to_string()),
            CharacterError::InvalidInput(_) | CharacterError::InBattle(_) => {
                ApiError::BadRequest(e.to_string())
            }
            CharacterError::Repo(ref repo) if repo.is_not_found() => {
                ApiError::NotFound(e.to_string())
            }
            CharacterError::Repo(_) => ApiError::Internal(e.to_string()),
        }
    }
}
