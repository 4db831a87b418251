use sqlx::PgPool;
use tracing::info;

use crate::auth::repo::User;
use crate::error::ApiError;
use crate::recipes::dto::{RecipeCreate, RecipeUpdate};
use crate::recipes::repo::{Recipe, RecipeFilter, RecipeWithAuthor};

const RECIPE_NOT_FOUND: &str = "Recipe not found";

/// Create a recipe owned by the authenticated caller.
pub async fn create_recipe(
    db: &PgPool,
    payload: &RecipeCreate,
    author: &User,
) -> Result<Recipe, ApiError> {
    let recipe = Recipe::insert(
        db,
        &payload.title,
        &payload.description,
        &payload.ingredients,
        &payload.steps,
        &payload.tags,
        payload.time_minutes,
        payload.difficulty,
        payload.image_url.as_deref(),
        author.id,
    )
    .await
    .map_err(ApiError::Internal)?;

    info!(recipe_id = recipe.id, author_id = author.id, "recipe created");
    Ok(recipe)
}

pub async fn get_recipe(db: &PgPool, id: i32) -> Result<Option<RecipeWithAuthor>, ApiError> {
    Recipe::find_by_id(db, id).await.map_err(ApiError::Internal)
}

/// Filtered, newest-first page plus the total of the filtered set.
pub async fn list_recipes(
    db: &PgPool,
    filter: &RecipeFilter,
    limit: i64,
    offset: i64,
) -> Result<(Vec<RecipeWithAuthor>, i64), ApiError> {
    let total = Recipe::count(db, filter).await.map_err(ApiError::Internal)?;
    let recipes = Recipe::list(db, filter, limit, offset)
        .await
        .map_err(ApiError::Internal)?;
    Ok((recipes, total))
}

/// Apply a partial update; only the author may touch the recipe.
pub async fn update_recipe(
    db: &PgPool,
    id: i32,
    patch: &RecipeUpdate,
    actor: &User,
) -> Result<Recipe, ApiError> {
    let Some(existing) = Recipe::find_by_id(db, id).await.map_err(ApiError::Internal)? else {
        return Err(ApiError::not_found(RECIPE_NOT_FOUND));
    };
    if existing.recipe.author_id != actor.id {
        return Err(ApiError::forbidden("Not authorized to update this recipe"));
    }

    let recipe = Recipe::update(
        db,
        id,
        patch.title.as_deref(),
        patch.description.as_deref(),
        patch.ingredients.as_deref(),
        patch.steps.as_deref(),
        patch.tags.as_deref(),
        patch.time_minutes,
        patch.difficulty,
        patch.image_url.as_deref(),
    )
    .await
    .map_err(ApiError::Internal)?;

    info!(recipe_id = id, actor_id = actor.id, "recipe updated");
    Ok(recipe)
}

/// Delete a recipe and its cookbook saves; only the author may delete.
pub async fn delete_recipe(db: &PgPool, id: i32, actor: &User) -> Result<(), ApiError> {
    let Some(existing) = Recipe::find_by_id(db, id).await.map_err(ApiError::Internal)? else {
        return Err(ApiError::not_found(RECIPE_NOT_FOUND));
    };
    if existing.recipe.author_id != actor.id {
        return Err(ApiError::forbidden("Not authorized to delete this recipe"));
    }

    Recipe::delete(db, id).await.map_err(ApiError::Internal)?;
    info!(recipe_id = id, actor_id = actor.id, "recipe deleted");
    Ok(())
}
