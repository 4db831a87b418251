use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;

use crate::recipes::repo::Recipe;

/// Join row linking a user to a saved recipe.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CookbookSave {
    pub id: i32,
    pub user_id: i32,
    pub recipe_id: i32,
    pub created_at: OffsetDateTime,
}

/// A save joined with its recipe and the recipe author's username.
#[derive(Debug, FromRow)]
pub struct SavedRecipeRow {
    pub save_id: i32,
    pub user_id: i32,
    pub recipe_id: i32,
    pub saved_at: OffsetDateTime,
    #[sqlx(flatten)]
    pub recipe: Recipe,
    pub author_username: String,
}

impl CookbookSave {
    pub async fn insert(db: &PgPool, user_id: i32, recipe_id: i32) -> anyhow::Result<CookbookSave> {
        let save = sqlx::query_as::<_, CookbookSave>(
            r#"
            INSERT INTO cookbook_saves (user_id, recipe_id)
            VALUES ($1, $2)
            RETURNING id, user_id, recipe_id, created_at
            "#,
        )
        .bind(user_id)
        .bind(recipe_id)
        .fetch_one(db)
        .await?;
        Ok(save)
    }

    pub async fn find(
        db: &PgPool,
        user_id: i32,
        recipe_id: i32,
    ) -> anyhow::Result<Option<CookbookSave>> {
        let save = sqlx::query_as::<_, CookbookSave>(
            r#"
            SELECT id, user_id, recipe_id, created_at
            FROM cookbook_saves
            WHERE user_id = $1 AND recipe_id = $2
            "#,
        )
        .bind(user_id)
        .bind(recipe_id)
        .fetch_optional(db)
        .await?;
        Ok(save)
    }

    pub async fn exists(db: &PgPool, user_id: i32, recipe_id: i32) -> anyhow::Result<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM cookbook_saves WHERE user_id = $1 AND recipe_id = $2
            )
            "#,
        )
        .bind(user_id)
        .bind(recipe_id)
        .fetch_one(db)
        .await?;
        Ok(exists)
    }

    /// All saves owned by a user, newest first, with their recipes.
    pub async fn list_by_user(db: &PgPool, user_id: i32) -> anyhow::Result<Vec<SavedRecipeRow>> {
        let rows = sqlx::query_as::<_, SavedRecipeRow>(
            r#"
            SELECT cs.id AS save_id, cs.user_id, cs.recipe_id,
                   cs.created_at AS saved_at,
                   r.id, r.title, r.description, r.ingredients, r.steps,
                   r.tags, r.time_minutes, r.difficulty, r.image_url,
                   r.author_id, r.created_at, r.updated_at,
                   u.username AS author_username
            FROM cookbook_saves cs
            JOIN recipes r ON r.id = cs.recipe_id
            JOIN users u ON u.id = r.author_id
            WHERE cs.user_id = $1
            ORDER BY cs.created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    /// Delete a save; returns whether a row was removed.
    pub async fn delete(db: &PgPool, user_id: i32, recipe_id: i32) -> anyhow::Result<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM cookbook_saves WHERE user_id = $1 AND recipe_id = $2
            "#,
        )
        .bind(user_id)
        .bind(recipe_id)
        .execute(db)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
