use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::instrument;

use crate::auth::extractors::AuthUser;
use crate::common::SuccessResponse;
use crate::cookbook::dto::CookbookSaveResponse;
use crate::cookbook::services;
use crate::error::ApiError;
use crate::state::AppState;

pub fn cookbook_routes() -> Router<AppState> {
    Router::new()
        .route("/cookbook", get(get_cookbook))
        .route(
            "/cookbook/:recipe_id",
            axum::routing::post(save_recipe).delete(remove_recipe),
        )
}

#[instrument(skip(state, user))]
async fn get_cookbook(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<Vec<CookbookSaveResponse>>, ApiError> {
    let saves = services::saved_recipes(&state.db, &user).await?;
    Ok(Json(saves.into_iter().map(CookbookSaveResponse::from).collect()))
}

#[instrument(skip(state, user))]
async fn save_recipe(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(recipe_id): Path<i32>,
) -> Result<(StatusCode, Json<SuccessResponse>), ApiError> {
    services::save_recipe(&state.db, recipe_id, &user).await?;
    Ok((
        StatusCode::CREATED,
        Json(SuccessResponse::new("Recipe saved to cookbook")),
    ))
}

#[instrument(skip(state, user))]
async fn remove_recipe(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(recipe_id): Path<i32>,
) -> Result<Json<SuccessResponse>, ApiError> {
    services::remove_saved_recipe(&state.db, recipe_id, &user).await?;
    Ok(Json(SuccessResponse::new("Recipe removed from cookbook")))
}
