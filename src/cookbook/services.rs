use sqlx::PgPool;
use tracing::{info, warn};

use crate::auth::repo::User;
use crate::cookbook::repo::{CookbookSave, SavedRecipeRow};
use crate::error::{is_unique_violation, ApiError};
use crate::recipes::repo::Recipe;

const ALREADY_SAVED: &str = "Recipe already saved to cookbook";

/// Save a recipe into the caller's cookbook. The (user, recipe) uniqueness
/// check runs twice: a proactive lookup, then the unique constraint as the
/// final arbiter when two saves race — both paths yield the same conflict.
pub async fn save_recipe(
    db: &PgPool,
    recipe_id: i32,
    user: &User,
) -> Result<CookbookSave, ApiError> {
    let recipe = Recipe::find_by_id(db, recipe_id)
        .await
        .map_err(ApiError::Internal)?;
    if recipe.is_none() {
        return Err(ApiError::not_found("Recipe not found"));
    }

    let existing = CookbookSave::find(db, user.id, recipe_id)
        .await
        .map_err(ApiError::Internal)?;
    if existing.is_some() {
        return Err(ApiError::conflict(ALREADY_SAVED));
    }

    match CookbookSave::insert(db, user.id, recipe_id).await {
        Ok(save) => {
            info!(user_id = user.id, recipe_id, "recipe saved to cookbook");
            Ok(save)
        }
        Err(e) => {
            let unique = e
                .downcast_ref::<sqlx::Error>()
                .map(is_unique_violation)
                .unwrap_or(false);
            if unique {
                warn!(user_id = user.id, recipe_id, "save lost uniqueness race");
                Err(ApiError::conflict(ALREADY_SAVED))
            } else {
                Err(ApiError::Internal(e))
            }
        }
    }
}

/// The caller's saves, newest first, each carrying its recipe.
pub async fn saved_recipes(db: &PgPool, user: &User) -> Result<Vec<SavedRecipeRow>, ApiError> {
    CookbookSave::list_by_user(db, user.id)
        .await
        .map_err(ApiError::Internal)
}

/// Remove a save from the caller's cookbook.
pub async fn remove_saved_recipe(db: &PgPool, recipe_id: i32, user: &User) -> Result<(), ApiError> {
    let removed = CookbookSave::delete(db, user.id, recipe_id)
        .await
        .map_err(ApiError::Internal)?;
    if !removed {
        return Err(ApiError::not_found("Recipe not found in cookbook"));
    }

    info!(user_id = user.id, recipe_id, "recipe removed from cookbook");
    Ok(())
}

/// Existence check, no side effects.
pub async fn is_recipe_saved(db: &PgPool, recipe_id: i32, user_id: i32) -> Result<bool, ApiError> {
    CookbookSave::exists(db, user_id, recipe_id)
        .await
        .map_err(ApiError::Internal)
}
