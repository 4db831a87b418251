use serde::Serialize;
use time::OffsetDateTime;

use crate::auth::dto::AuthorResponse;
use crate::cookbook::repo::SavedRecipeRow;
use crate::recipes::dto::RecipeResponse;

/// A cookbook entry with its full recipe. `saved_at` carries the save
/// row's creation time, under the name the frontend expects.
#[derive(Debug, Serialize)]
pub struct CookbookSaveResponse {
    pub id: i32,
    pub user_id: i32,
    pub recipe_id: i32,
    pub recipe: RecipeResponse,
    #[serde(with = "time::serde::rfc3339")]
    pub saved_at: OffsetDateTime,
}

impl From<SavedRecipeRow> for CookbookSaveResponse {
    fn from(row: SavedRecipeRow) -> Self {
        let author = AuthorResponse {
            id: row.recipe.author_id,
            username: row.author_username,
        };
        Self {
            id: row.save_id,
            user_id: row.user_id,
            recipe_id: row.recipe_id,
            recipe: RecipeResponse::from_recipe(row.recipe, Some(author)),
            saved_at: row.saved_at,
        }
    }
}
