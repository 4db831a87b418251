use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::instrument;

use crate::auth::dto::AuthorResponse;
use crate::auth::extractors::{AuthUser, MaybeUser};
use crate::common::SuccessResponse;
use crate::cookbook::services as cookbook_services;
use crate::error::ApiError;
use crate::recipes::dto::{ListParams, RecipeCreate, RecipeResponse, RecipeUpdate, RecipesResponse};
use crate::recipes::repo::RecipeFilter;
use crate::recipes::services;
use crate::state::AppState;

pub fn recipe_routes() -> Router<AppState> {
    Router::new()
        .route("/recipes", get(list_recipes).post(create_recipe))
        .route(
            "/recipes/:id",
            get(get_recipe).put(update_recipe).delete(delete_recipe),
        )
}

#[instrument(skip(state, params))]
async fn list_recipes(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<RecipesResponse>, ApiError> {
    params.validate()?;
    let filter = RecipeFilter {
        search: params.search.clone(),
        tag: params.tag.clone(),
        difficulty: params.parsed_difficulty()?,
    };

    let (rows, total) = services::list_recipes(&state.db, &filter, params.limit, params.offset).await?;

    Ok(Json(RecipesResponse {
        recipes: rows.into_iter().map(RecipeResponse::from).collect(),
        total,
        limit: params.limit,
        offset: params.offset,
    }))
}

#[instrument(skip(state, user, payload))]
async fn create_recipe(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(payload): Json<RecipeCreate>,
) -> Result<(StatusCode, Json<RecipeResponse>), ApiError> {
    payload.validate()?;

    let recipe = services::create_recipe(&state.db, &payload, &user).await?;
    let author = AuthorResponse {
        id: user.id,
        username: user.username,
    };

    Ok((
        StatusCode::CREATED,
        Json(RecipeResponse::from_recipe(recipe, Some(author))),
    ))
}

#[instrument(skip(state, maybe_user))]
async fn get_recipe(
    State(state): State<AppState>,
    MaybeUser(maybe_user): MaybeUser,
    Path(id): Path<i32>,
) -> Result<Json<RecipeResponse>, ApiError> {
    let Some(row) = services::get_recipe(&state.db, id).await? else {
        return Err(ApiError::not_found("Recipe not found"));
    };

    let mut response = RecipeResponse::from(row);
    if let Some(user) = maybe_user {
        let saved = cookbook_services::is_recipe_saved(&state.db, id, user.id).await?;
        response = response.with_saved(saved);
    }

    Ok(Json(response))
}

#[instrument(skip(state, user, payload))]
async fn update_recipe(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<i32>,
    Json(payload): Json<RecipeUpdate>,
) -> Result<Json<RecipeResponse>, ApiError> {
    payload.validate()?;

    let recipe = services::update_recipe(&state.db, id, &payload, &user).await?;
    let author = AuthorResponse {
        id: user.id,
        username: user.username,
    };

    Ok(Json(RecipeResponse::from_recipe(recipe, Some(author))))
}

#[instrument(skip(state, user))]
async fn delete_recipe(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<i32>,
) -> Result<Json<SuccessResponse>, ApiError> {
    services::delete_recipe(&state.db, id, &user).await?;
    Ok(Json(SuccessResponse::new("Recipe deleted")))
}
